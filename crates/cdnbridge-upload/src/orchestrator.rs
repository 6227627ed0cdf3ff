//! Upload orchestration
//!
//! One call resolves a reference to a local file, uploads it, signs a URL
//! for it and removes any temporary file created along the way. Every step
//! runs sequentially and nothing is retried.

use cdnbridge_core::error::report;
use cdnbridge_core::FileReference;
use cdnbridge_resolver::{PathResolver, ResolvedFile};
use cdnbridge_storage::{StorageConnector, UploadSource};
use chrono::Local;
use std::sync::Arc;
use std::time::Instant;

use crate::error::UploadOutcome;
use crate::naming::remote_file_name;

/// Inputs of one upload run.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub reference: FileReference,
    /// Remote directory relative to the CDN namespace; empty for the root
    pub cdn_dir: String,
    /// Remote file stem; a timestamp is used when absent
    pub process_label: Option<String>,
    /// Positional pick within a batch; `None` applies the preference rules
    pub index: Option<usize>,
}

impl UploadRequest {
    pub fn new(reference: FileReference, cdn_dir: impl Into<String>) -> Self {
        Self {
            reference,
            cdn_dir: cdn_dir.into(),
            process_label: None,
            index: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.process_label = Some(label.into());
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

/// Result of a run: the URL plus the untouched input for chaining.
#[derive(Debug, Clone)]
pub struct NodeOutput {
    /// Signed URL; empty when the upstream batch reported failure
    pub url: String,
    pub passthrough: FileReference,
}

pub struct UploadOrchestrator {
    resolver: PathResolver,
    storage: Arc<dyn StorageConnector>,
}

impl UploadOrchestrator {
    pub fn new(storage: Arc<dyn StorageConnector>) -> Self {
        Self::with_resolver(PathResolver::new(), storage)
    }

    pub fn with_resolver(resolver: PathResolver, storage: Arc<dyn StorageConnector>) -> Self {
        Self { resolver, storage }
    }

    pub async fn run(&self, request: UploadRequest) -> UploadOutcome<NodeOutput> {
        let UploadRequest {
            reference,
            cdn_dir,
            process_label,
            index,
        } = request;

        if reference.upstream_failed() {
            tracing::warn!(
                cdn_dir = %cdn_dir,
                "Upstream batch reported failure; skipping upload"
            );
            return Ok(NodeOutput {
                url: String::new(),
                passthrough: reference,
            });
        }

        let resolved = self.resolver.resolve(&reference, index).await.map_err(|e| {
            report(&e, "Failed to resolve upload input");
            e
        })?;

        let uploaded = self
            .upload_resolved(&resolved, &cdn_dir, process_label.as_deref())
            .await;

        if resolved.is_owned() {
            let temp = resolved.path().to_path_buf();
            match resolved.release() {
                Ok(()) => tracing::debug!(path = %temp.display(), "Removed temporary file"),
                Err(e) => tracing::warn!(
                    path = %temp.display(),
                    error = %e,
                    "Failed to remove temporary file"
                ),
            }
        }

        Ok(NodeOutput {
            url: uploaded?,
            passthrough: reference,
        })
    }

    async fn upload_resolved(
        &self,
        resolved: &ResolvedFile,
        cdn_dir: &str,
        label: Option<&str>,
    ) -> UploadOutcome<String> {
        let file_name = remote_file_name(label, &resolved.extension(), Local::now());
        let start = Instant::now();

        let result = self
            .storage
            .upload(cdn_dir, &file_name, UploadSource::from(resolved.path()))
            .await
            .map_err(|e| {
                report(&e, "Upload failed");
                e
            })?;

        tracing::info!(
            local_path = %resolved.path().display(),
            remote_path = %result.remote_relative_path,
            materialized = resolved.is_owned(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Uploaded file to CDN storage"
        );

        match self.storage.sign_url(&result.remote_relative_path) {
            Ok(url) => Ok(url),
            Err(e) => {
                tracing::warn!(
                    remote_path = %result.remote_relative_path,
                    error = %e,
                    "URL signing failed; returning unsigned public URL"
                );
                Ok(result.public_url)
            }
        }
    }
}
