//! Cross-cutting, shared constants.
//!
//! Thresholds and defaults used by more than one module live here so the
//! retriever, scorer and config agree on them.
//!
//! # Dimension Invariants
//!
//! Every vector handled by one engine instance has the same dimension `D`.
//! Use [`DimConfig`] to carry `D` through construction and
//! [`validate_embedding_dim`] at boundaries where vectors enter the engine
//! (provider responses, stored profile items).

use std::time::Duration;

pub const DEFAULT_EMBEDDING_DIM: usize = 768;

pub const DEFAULT_CACHE_CAPACITY: u64 = 1_000;
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(300);

pub const DEFAULT_CANDIDATE_LIMIT: usize = 5;

/// Minimum cosine similarity kept by the brute-force retrieval tier (exclusive).
pub const DEFAULT_SCAN_THRESHOLD: f32 = 0.7;

/// Minimum combined score for a pair to count as a match (inclusive).
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.3;

/// Upper bound of the keyword-overlap bonus, in score points.
pub const MAX_KEYWORD_BONUS: u32 = 15;

pub const REQUIRED_WEIGHT: f64 = 0.7;
pub const OPTIONAL_WEIGHT: f64 = 0.3;

/// Category scores below this produce an improvement suggestion.
pub const CATEGORY_SUGGESTION_THRESHOLD: u8 = 60;

/// Runtime dimension configuration shared by the client, retriever and scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimConfig {
    /// The embedding vector dimension (number of floats).
    pub embedding_dim: usize,
}

impl Default for DimConfig {
    fn default() -> Self {
        Self {
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }
}

impl DimConfig {
    /// Creates a new dimension configuration with the specified embedding dimension.
    pub fn new(embedding_dim: usize) -> Self {
        Self { embedding_dim }
    }

    /// Returns an error if `embedding_dim` is zero.
    pub fn validate(&self) -> Result<(), DimValidationError> {
        if self.embedding_dim == 0 {
            return Err(DimValidationError::ZeroDimension);
        }
        Ok(())
    }

    /// Returns `true` if `vector` has exactly the configured dimension.
    #[inline]
    pub fn accepts(&self, vector: &[f32]) -> bool {
        vector.len() == self.embedding_dim
    }
}

/// Error returned when dimension validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimValidationError {
    /// Embedding dimension cannot be zero.
    ZeroDimension,
    /// Runtime dimension does not match expected dimension.
    DimensionMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for DimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "embedding dimension cannot be zero"),
            Self::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "dimension mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for DimValidationError {}

/// Validates that a runtime embedding dimension matches the expected dimension.
///
/// # Example
///
/// ```
/// use cvmatch::constants::{validate_embedding_dim, DEFAULT_EMBEDDING_DIM};
///
/// let provider_dim = 768;
/// validate_embedding_dim(provider_dim, DEFAULT_EMBEDDING_DIM).unwrap();
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
