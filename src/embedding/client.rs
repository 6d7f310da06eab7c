use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, instrument, warn};

use crate::constants::{DEFAULT_MAX_CONCURRENCY, DimConfig, validate_embedding_dim};
use crate::hashing::{hash_text, short_hex};

use super::cache::EmbeddingCacheHandle;
use super::error::EmbeddingError;
use super::provider::EmbeddingProvider;
use super::retry::RetryPolicy;

/// Cache-first, retrying front end to an [`EmbeddingProvider`].
///
/// Every provider call holds a permit from one client-wide semaphore, so
/// callers sharing the client never exceed `max_concurrency` calls in flight.
pub struct EmbeddingClient<P: EmbeddingProvider> {
    provider: P,
    cache: Option<EmbeddingCacheHandle>,
    retry: RetryPolicy,
    dims: DimConfig,
    max_concurrency: usize,
    permits: Arc<Semaphore>,
}

impl<P: EmbeddingProvider> std::fmt::Debug for EmbeddingClient<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingClient")
            .field("model", &self.provider.model_name())
            .field("cache", &self.cache)
            .field("retry", &self.retry)
            .field("dims", &self.dims)
            .field("max_concurrency", &self.max_concurrency)
            .finish()
    }
}

impl<P: EmbeddingProvider> EmbeddingClient<P> {
    /// Creates a client with its own default-sized cache and the default retry policy.
    pub fn new(provider: P, dims: DimConfig) -> Self {
        Self {
            provider,
            cache: Some(EmbeddingCacheHandle::new()),
            retry: RetryPolicy::default(),
            dims,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            permits: Arc::new(Semaphore::new(DEFAULT_MAX_CONCURRENCY)),
        }
    }

    pub fn with_cache(mut self, cache: EmbeddingCacheHandle) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Disables caching; every call reaches the provider.
    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self.permits = Arc::new(Semaphore::new(self.max_concurrency));
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn cache(&self) -> Option<&EmbeddingCacheHandle> {
        self.cache.as_ref()
    }

    pub fn dims(&self) -> DimConfig {
        self.dims
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Embeds `text`, consulting the cache first and populating it on success.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        if let Some(cache) = &self.cache
            && let Some(vector) = cache.get(text)
        {
            debug!(key = %short_hex(&hash_text(text)), "Embedding cache hit");
            return Ok(vector);
        }

        let vector = self
            .retry
            .run("embed", |_attempt| async move {
                // The semaphore is never closed.
                let _permit = self.permits.acquire().await.ok();
                self.provider.embed(text).await
            })
            .await?;

        validate_embedding_dim(vector.len(), self.dims.embedding_dim).map_err(|_| {
            EmbeddingError::DimensionMismatch {
                expected: self.dims.embedding_dim,
                actual: vector.len(),
            }
        })?;

        if let Some(cache) = &self.cache {
            cache.set(text, &vector);
        }

        Ok(vector)
    }

    /// Embeds every text with at most `max_concurrency` provider calls in flight.
    ///
    /// The client-wide limit still applies, so a larger `max_concurrency`
    /// than the client's own has no effect.
    ///
    /// The output has one slot per input, in input order. A slot is empty when
    /// that text failed after retries; the batch itself never fails.
    #[instrument(skip(self, texts), fields(count = texts.len()))]
    pub async fn batch_embed<S: AsRef<str>>(
        &self,
        texts: &[S],
        max_concurrency: usize,
    ) -> Vec<Vec<f32>> {
        let semaphore = Semaphore::new(max_concurrency.max(1));

        let futures = texts.iter().enumerate().map(|(index, text)| {
            let semaphore = &semaphore;
            async move {
                let Ok(_permit) = semaphore.acquire().await else {
                    return Vec::new();
                };

                match self.embed(text.as_ref()).await {
                    Ok(vector) => vector,
                    Err(err) => {
                        warn!(index, error = %err, "Batch item failed to embed");
                        Vec::new()
                    }
                }
            }
        });

        let results = join_all(futures).await;

        let failed = results.iter().filter(|v| v.is_empty()).count();
        debug!(
            embedded = results.len() - failed,
            failed, "Batch embedding complete"
        );

        results
    }

    /// [`batch_embed`](Self::batch_embed) with the client's configured concurrency.
    pub async fn batch_embed_default<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Vec<f32>> {
        self.batch_embed(texts, self.max_concurrency).await
    }
}
