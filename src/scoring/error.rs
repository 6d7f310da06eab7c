use std::path::PathBuf;

use thiserror::Error;

/// Failure to load keyword tables.
#[derive(Debug, Error)]
pub enum KeywordTableError {
    #[error("failed to read keyword tables from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid keyword tables: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },
}

/// Failure reported by an [`ExplanationGenerator`](super::ExplanationGenerator).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExplanationError {
    #[error("explanation service unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("explanation rejected: {reason}")]
    Rejected { reason: String },
}
