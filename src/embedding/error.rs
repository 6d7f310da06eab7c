use thiserror::Error;

/// Failure reported by an [`EmbeddingProvider`](super::EmbeddingProvider).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Upstream answered with a non-success HTTP status.
    #[error("embedding provider returned HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// The request never produced a response (connect, DNS, timeout, reset).
    #[error("embedding provider transport error: {message}")]
    Transport {
        /// Full error chain, joined with `": "`.
        message: String,
    },

    /// A response arrived but could not be turned into a vector.
    #[error("invalid embedding provider response: {reason}")]
    InvalidResponse {
        /// Error message.
        reason: String,
    },
}

/// Lowercased fragments that mark a transport failure as transient.
const TRANSIENT_PATTERNS: &[&str] = &[
    "connection reset",
    "econnreset",
    "broken pipe",
    "timed out",
    "timeout",
    "etimedout",
    "dns error",
    "failed to lookup address",
    "enotfound",
    "eai_again",
    "name or service not known",
    "temporary failure in name resolution",
];

impl ProviderError {
    /// Returns `true` for failures worth retrying: HTTP 5xx, and transport
    /// failures caused by connection resets, timeouts or DNS lookups.
    pub fn is_retriable(&self) -> bool {
        match self {
            ProviderError::Http { status, .. } => (500..600).contains(status),
            ProviderError::Transport { message } => is_transient_message(message),
            ProviderError::InvalidResponse { .. } => false,
        }
    }
}

pub(crate) fn is_transient_message(message: &str) -> bool {
    let lowered = message.to_ascii_lowercase();
    TRANSIENT_PATTERNS.iter().any(|p| lowered.contains(p))
}

/// Errors returned by the embedding client and similarity helpers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmbeddingError {
    /// The provider failed permanently, or transiently on every attempt.
    #[error("embedding failed after {attempts} attempt(s): {source}")]
    Provider {
        /// Attempts made before giving up.
        attempts: u32,
        /// Last provider error.
        #[source]
        source: ProviderError,
    },

    /// Two vectors (or a vector and the configured dimension) disagree in length.
    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Empty or whitespace-only text cannot be embedded.
    #[error("cannot embed empty text")]
    EmptyInput,
}

impl EmbeddingError {
    /// Returns `true` when the failure came from a transient upstream condition
    /// that survived every retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, EmbeddingError::Provider { source, .. } if source.is_retriable())
    }
}
