//! Error reporting metadata
//!
//! Each crate owns its error enum (`StorageError`, `ResolveError`, `UploadError`).
//! They all implement [`ErrorMetadata`] so the CLI and the host adapter can
//! log and report failures without matching on every variant.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like a missing input file
    Debug,
    /// Warning level - for recoverable issues like a rejected upstream batch
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented and handled.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "NOT_FOUND")
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same call could succeed.
    ///
    /// Nothing in this workspace retries on its own; the flag is for callers.
    fn is_recoverable(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Emit `err` through `tracing` at the level its metadata asks for.
pub fn report<E>(err: &E, context: &str)
where
    E: ErrorMetadata + std::fmt::Display,
{
    let code = err.error_code();
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(error = %err, code, "{}", context),
        LogLevel::Warn => tracing::warn!(error = %err, code, "{}", context),
        LogLevel::Error => tracing::error!(error = %err, code, "{}", context),
    }
}
