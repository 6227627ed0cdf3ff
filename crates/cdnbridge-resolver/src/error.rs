use cdnbridge_core::{ErrorMetadata, LogLevel};
use thiserror::Error;

/// Resolution errors
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Local file not found or could not resolve path from {0}")]
    NotFound(String),

    #[error("Index {index} out of range for {len} item(s)")]
    IndexOutOfRange { index: i64, len: usize },

    /// The producing node flagged its batch as failed.
    #[error("Upstream producer reported failure")]
    UpstreamFailure,

    #[error("Materialization failed: {0}")]
    MaterializationFailed(String),
}

pub type ResolveResult<T> = Result<T, ResolveError>;

impl ErrorMetadata for ResolveError {
    fn error_code(&self) -> &'static str {
        match self {
            ResolveError::NotFound(_) => "NOT_FOUND",
            ResolveError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            ResolveError::UpstreamFailure => "UPSTREAM_FAILURE",
            ResolveError::MaterializationFailed(_) => "MATERIALIZATION_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }

    fn log_level(&self) -> LogLevel {
        match self {
            ResolveError::NotFound(_) | ResolveError::IndexOutOfRange { .. } => LogLevel::Debug,
            ResolveError::UpstreamFailure => LogLevel::Warn,
            ResolveError::MaterializationFailed(_) => LogLevel::Error,
        }
    }
}
