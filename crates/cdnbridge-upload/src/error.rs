use cdnbridge_core::{ErrorMetadata, LogLevel};
use cdnbridge_resolver::ResolveError;
use cdnbridge_storage::StorageError;
use thiserror::Error;

/// Upload node errors
///
/// Resolution and storage failures are carried unchanged so callers can
/// still tell `NotFound` from `Unauthorized` from `Transport`.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Invalid node input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type UploadOutcome<T> = Result<T, UploadError>;

impl ErrorMetadata for UploadError {
    fn error_code(&self) -> &'static str {
        match self {
            UploadError::Resolve(e) => e.error_code(),
            UploadError::Storage(e) => e.error_code(),
            UploadError::InvalidInput(_) => "INVALID_INPUT",
            UploadError::Config(_) => "CONFIG_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            UploadError::Resolve(e) => e.is_recoverable(),
            UploadError::Storage(e) => e.is_recoverable(),
            _ => false,
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            UploadError::Resolve(e) => e.log_level(),
            UploadError::Storage(e) => e.log_level(),
            UploadError::InvalidInput(_) => LogLevel::Debug,
            UploadError::Config(_) => LogLevel::Error,
        }
    }
}
