use thiserror::Error;

/// Failure reported by a [`VariantEvaluator`](super::VariantEvaluator).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("variant evaluator unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("cannot evaluate selection: {reason}")]
    InvalidSelection { reason: String },
}
