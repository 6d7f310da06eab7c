use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a match fixture.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed fixture JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("fixture owner id is empty")]
    MissingOwner,

    #[error("duplicate {kind} id '{id}' in fixture")]
    DuplicateId { kind: &'static str, id: String },
}

pub type FixtureResult<T> = Result<T, FixtureError>;
