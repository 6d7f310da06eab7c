//! cvmatch library crate (used by the `cvmatch` binary and integration tests).
//!
//! Matches the requirements of a job posting against the structured items of
//! a candidate profile, scores each pair, aggregates the result into an
//! overall score with suggestions, and ranks alternate CV variants.
//!
//! # Public API Surface
//!
//! ## Pipeline
//! - [`MatchingEngine`], [`MatchingEngineBuilder`] - End-to-end orchestration
//! - [`MatchReport`] - Everything one run produces
//!
//! ## Stages
//! - [`EmbeddingClient`], [`EmbeddingCacheHandle`] - Cached, retrying embeddings
//! - [`CandidateRetriever`] - Indexed, brute-force and unranked candidate tiers
//! - [`PairScorer`], [`KeywordTables`] - Requirement/item scoring
//! - [`Aggregator`] - Weighted overall score and suggestions
//! - [`VariantRanker`], [`compare_variants`] - Focus-area CV variants
//!
//! ## Seams
//! - [`EmbeddingProvider`] ([`HttpEmbeddingProvider`])
//! - [`ComponentStore`] ([`QdrantComponentStore`], [`MemoryComponentStore`])
//! - [`ExplanationGenerator`] ([`TemplateExplainer`])
//! - [`VariantEvaluator`] ([`CoverageEvaluator`])
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod aggregate;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod engine;
pub mod fixture;
pub mod hashing;
pub mod model;
pub mod retrieval;
pub mod scoring;
pub mod store;
pub mod variants;

pub use aggregate::{Aggregator, AggregatorConfig, GENERIC_SUGGESTION};
pub use config::{Config, ConfigError};
pub use constants::{DimConfig, DimValidationError, validate_embedding_dim};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbeddingProvider;
pub use embedding::{
    CacheConfig, CacheStats, EmbeddingCache, EmbeddingCacheHandle, EmbeddingClient,
    EmbeddingError, EmbeddingProvider, HttpEmbeddingProvider, ProviderError, RetryPolicy,
    cosine_similarity,
};
pub use engine::{EngineError, EngineResult, MatchReport, MatchingEngine, MatchingEngineBuilder};
pub use fixture::{Fixture, FixtureError};
pub use hashing::{hash_text, short_hex};
pub use model::{
    AggregateScore, CategoryScores, CategorySelection, FocusArea, MatchResult, NO_MATCH_REASONING,
    ProfileCategory, ProfileItem, QualityTier, RequirementCategory, RequirementItem, Variant,
};
pub use retrieval::{
    CandidateRetriever, Retrieval, RetrievalConfig, RetrievalError, RetrievalTier, TierOutcome,
};
pub use scoring::{
    ExplanationError, ExplanationGenerator, KeywordTableError, KeywordTables, PairScorer,
    ScoredCandidate, ScoringConfig, TemplateExplainer,
};
#[cfg(any(test, feature = "mock"))]
pub use store::{MockComponentStore, SearchBehavior};
pub use store::{
    ComponentStore, MemoryComponentStore, QdrantComponentStore, StoreError, StoreResult,
    VectorSearch,
};
pub use variants::{
    CoverageEvaluator, EvaluationError, VariantComparison, VariantConfig, VariantEvaluator,
    VariantRanker, compare_variants,
};
