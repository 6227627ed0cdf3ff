//! Storage abstraction trait
//!
//! This module defines the connector trait the upload orchestrator talks to,
//! along with its error taxonomy and request/response types.

use async_trait::async_trait;
use bytes::Bytes;
use cdnbridge_core::{ErrorMetadata, LogLevel, MediaReader};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("URL signing unavailable: {0}")]
    Signing(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl ErrorMetadata for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            StorageError::Unauthorized(_) => "UNAUTHORIZED",
            StorageError::NotFound(_) => "NOT_FOUND",
            StorageError::Transport(_) => "TRANSPORT_ERROR",
            StorageError::InvalidPath(_) => "INVALID_PATH",
            StorageError::Signing(_) => "SIGNING_UNAVAILABLE",
            StorageError::IoError(_) => "IO_ERROR",
            StorageError::ConfigError(_) => "CONFIG_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, StorageError::Transport(_) | StorageError::IoError(_))
    }

    fn log_level(&self) -> LogLevel {
        match self {
            StorageError::NotFound(_) | StorageError::InvalidPath(_) => LogLevel::Debug,
            StorageError::Signing(_) => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }
}

/// Content to upload.
pub enum UploadSource {
    /// Local file, read in full
    Path(PathBuf),
    Bytes(Bytes),
    /// Byte stream, consumed until EOF
    Reader(MediaReader),
}

impl Debug for UploadSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UploadSource::Path(p) => f.debug_tuple("Path").field(p).finish(),
            UploadSource::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            UploadSource::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

impl From<&Path> for UploadSource {
    fn from(path: &Path) -> Self {
        UploadSource::Path(path.to_path_buf())
    }
}

/// Outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadResult {
    /// Path relative to the namespace, e.g. `videos/clip.mp4`
    pub remote_relative_path: String,
    /// Unsigned public CDN URL
    pub public_url: String,
    /// Provider response body, or `{status_code, text}` when it is not JSON
    pub response: serde_json::Value,
}

/// One entry of a directory listing, as the storage API reports it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StorageEntry {
    pub guid: Option<String>,
    pub storage_zone_name: Option<String>,
    pub path: String,
    pub object_name: String,
    pub length: u64,
    pub last_changed: Option<String>,
    pub date_created: Option<String>,
    pub is_directory: bool,
    pub content_type: Option<String>,
    pub checksum: Option<String>,
}

/// Storage connector trait
///
/// The upload orchestrator only depends on this trait, so tests can swap the
/// HTTP connector for an in-memory one. Nothing here retries; callers decide.
///
/// **Path format:** all remote paths are relative to the CDN namespace. See the
/// crate root documentation.
#[async_trait]
pub trait StorageConnector: Send + Sync {
    /// Upload `source` as `{remote_dir}/{file_name}` in a single request.
    ///
    /// A single trailing `/` on `remote_dir` is ignored; an empty directory
    /// uploads to the namespace root.
    async fn upload(
        &self,
        remote_dir: &str,
        file_name: &str,
        source: UploadSource,
    ) -> StorageResult<UploadResult>;

    /// Download `remote_path` into `local_path`, or into the working
    /// directory under the remote file name. Returns the written path.
    async fn download(
        &self,
        remote_path: &str,
        local_path: Option<&Path>,
    ) -> StorageResult<PathBuf>;

    /// List the files and folders stored under `remote_dir`.
    async fn list(&self, remote_dir: &str) -> StorageResult<Vec<StorageEntry>>;

    /// Delete a file, or a directory when `remote_path` ends with `/`.
    async fn delete(&self, remote_path: &str) -> StorageResult<()>;

    /// Signed, expiring download URL for `remote_relative_path`. No network.
    fn sign_url(&self, remote_relative_path: &str) -> StorageResult<String>;
}
