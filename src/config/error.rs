//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was set but could not be parsed.
    #[error("invalid value '{value}' for {name}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// A count or size that must be positive was zero.
    #[error("{name} must be greater than zero")]
    ZeroValue { name: &'static str },

    /// A similarity threshold outside `[0, 1]`.
    #[error("{name} must be between 0 and 1, got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f32 },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a file (when a file was expected).
    #[error("path is not a file: {path}")]
    NotAFile { path: PathBuf },
}
