//! Embedding acquisition: cache, provider abstraction, retrying client.
//!
//! - [`cache`] holds computed vectors keyed by exact text.
//! - [`client`] wraps an [`EmbeddingProvider`] with caching, retries and
//!   bounded-concurrency batching.
//! - [`similarity`] provides [`cosine_similarity`].

/// LRU + TTL embedding cache.
pub mod cache;
/// Cache-first retrying client.
pub mod client;
mod error;
/// OpenAI-compatible HTTP provider.
pub mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod provider;
/// Backoff policy for provider calls.
pub mod retry;
mod similarity;

#[cfg(test)]
mod client_tests;

pub use cache::{CacheConfig, CacheStats, CachedEmbedding, EmbeddingCache, EmbeddingCacheHandle};
pub use client::EmbeddingClient;
pub use error::{EmbeddingError, ProviderError};
pub use http::HttpEmbeddingProvider;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbeddingProvider;
pub use provider::EmbeddingProvider;
pub use retry::RetryPolicy;
pub use similarity::cosine_similarity;
