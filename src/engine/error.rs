use thiserror::Error;

use crate::config::ConfigError;
use crate::retrieval::RetrievalError;
use crate::scoring::KeywordTableError;

/// Errors that abort a whole engine operation.
///
/// Per-requirement failures (embedding, scoring, explanation) never surface
/// here; they degrade to the no-match sentinel or templated reasoning.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("candidate retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("invalid engine configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to load keyword tables: {0}")]
    Keywords(#[from] KeywordTableError),
}

pub type EngineResult<T> = Result<T, EngineError>;
