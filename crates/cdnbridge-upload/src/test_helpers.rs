//! Test helpers for orchestrator unit tests
//!
//! `MockStorage` records every call and keeps uploaded bytes in memory, so
//! orchestration can be tested without a storage server.

use async_trait::async_trait;
use cdnbridge_storage::{
    StorageConnector, StorageEntry, StorageError, StorageResult, UploadResult, UploadSource,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const CDN_BASE: &str = "https://cdn.test/ns/";

/// What a failing mock should fail with.
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Unauthorized,
    Transport,
}

#[derive(Default)]
pub struct MockStorage {
    /// Remote relative path -> uploaded bytes
    pub uploads: Mutex<HashMap<String, Vec<u8>>>,
    /// Local paths the uploads were read from
    pub sources: Mutex<Vec<PathBuf>>,
    pub calls: Mutex<Vec<String>>,
    fail_upload: Option<Failure>,
    fail_sign: bool,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_upload(failure: Failure) -> Self {
        Self {
            fail_upload: Some(failure),
            ..Self::default()
        }
    }

    pub fn failing_sign() -> Self {
        Self {
            fail_sign: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl StorageConnector for MockStorage {
    async fn upload(
        &self,
        remote_dir: &str,
        file_name: &str,
        source: UploadSource,
    ) -> StorageResult<UploadResult> {
        self.record(format!("upload {}/{}", remote_dir, file_name));

        let data = match source {
            UploadSource::Path(path) => {
                let data = tokio::fs::read(&path).await?;
                self.sources.lock().unwrap().push(path);
                data
            }
            UploadSource::Bytes(bytes) => bytes.to_vec(),
            UploadSource::Reader(mut reader) => {
                let mut buf = Vec::new();
                tokio::io::AsyncReadExt::read_to_end(&mut reader, &mut buf).await?;
                buf
            }
        };

        match self.fail_upload {
            Some(Failure::Unauthorized) => {
                return Err(StorageError::Unauthorized("mock rejected key".into()))
            }
            Some(Failure::Transport) => {
                return Err(StorageError::Transport("mock connection reset".into()))
            }
            None => {}
        }

        let dir = remote_dir.strip_suffix('/').unwrap_or(remote_dir);
        let relative = if dir.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", dir, file_name)
        };
        self.uploads.lock().unwrap().insert(relative.clone(), data);

        Ok(UploadResult {
            public_url: format!("{}{}", CDN_BASE, relative),
            remote_relative_path: relative,
            response: serde_json::json!({"HttpCode": 201, "Message": "File uploaded."}),
        })
    }

    async fn download(
        &self,
        remote_path: &str,
        _local_path: Option<&Path>,
    ) -> StorageResult<PathBuf> {
        self.record(format!("download {}", remote_path));
        Err(StorageError::NotFound(remote_path.to_string()))
    }

    async fn list(&self, remote_dir: &str) -> StorageResult<Vec<StorageEntry>> {
        self.record(format!("list {}", remote_dir));
        Ok(Vec::new())
    }

    async fn delete(&self, remote_path: &str) -> StorageResult<()> {
        self.record(format!("delete {}", remote_path));
        self.uploads
            .lock()
            .unwrap()
            .remove(remote_path)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(remote_path.to_string()))
    }

    fn sign_url(&self, remote_relative_path: &str) -> StorageResult<String> {
        if self.fail_sign {
            return Err(StorageError::Signing("no signing secret".into()));
        }
        Ok(format!(
            "{}{}?token=mock&expires=1700086400",
            CDN_BASE, remote_relative_path
        ))
    }
}
