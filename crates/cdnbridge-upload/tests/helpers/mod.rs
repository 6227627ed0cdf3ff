//! Test helpers: a mock storage server plus an orchestrator wired to it.
//!
//! Run from workspace root: `cargo test -p cdnbridge-upload --test upload_flow_test`.

#![allow(dead_code)]

use async_trait::async_trait;
use cdnbridge_core::{Config, InMemoryMedia, MediaKind, MediaReader};
use cdnbridge_resolver::{Materializer, PathResolver};
use cdnbridge_storage::create_storage;
use cdnbridge_upload::UploadOrchestrator;
use std::io;
use std::path::Path;
use tempfile::TempDir;

pub const ZONE: &str = "zone";
pub const CDN_HOST: &str = "cdn.example.com";
pub const SECRET: &str = "s3cr3t";

pub fn config_for(server: &mockito::ServerGuard) -> Config {
    Config::new(ZONE, CDN_HOST)
        .with_access_key("test-key")
        .with_signing_secret(SECRET)
        .with_storage_endpoint(server.url())
}

/// Orchestrator against `server` whose temp files land in `temp_dir`.
pub fn orchestrator(server: &mockito::ServerGuard, temp_dir: &TempDir) -> UploadOrchestrator {
    let storage = create_storage(&config_for(server)).expect("valid test config");
    UploadOrchestrator::with_resolver(
        PathResolver::with_materializer(Materializer::with_temp_dir(temp_dir.path())),
        storage,
    )
}

pub fn upload_path(remote: &str) -> String {
    format!("/{}/ai-talking-videos/{}", ZONE, remote)
}

pub fn entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

/// Value of `key` in the query string of `url`.
pub fn query_param<'a>(url: &'a str, key: &str) -> Option<&'a str> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

/// In-memory clip that can only be streamed.
pub struct StreamOnlyClip(pub Vec<u8>);

#[async_trait]
impl InMemoryMedia for StreamOnlyClip {
    fn kind(&self) -> MediaKind {
        MediaKind::Video
    }

    fn can_stream(&self) -> bool {
        true
    }

    async fn open_stream(&self) -> io::Result<MediaReader> {
        Ok(Box::pin(io::Cursor::new(self.0.clone())))
    }
}
