use crate::keys;
use crate::signing::UrlSigner;
use crate::traits::{
    StorageConnector, StorageEntry, StorageError, StorageResult, UploadResult, UploadSource,
};
use async_trait::async_trait;
use bytes::Bytes;
use cdnbridge_core::Config;
use futures::StreamExt;
use reqwest::{Client, Method, Response, StatusCode};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Bunny storage-zone connector
#[derive(Clone)]
pub struct BunnyStorage {
    client: Client,
    access_key: String,
    storage_zone: String,
    /// `{endpoint}/{zone}/{namespace}/`
    base_url: String,
    signer: UrlSigner,
}

impl std::fmt::Debug for BunnyStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BunnyStorage")
            .field("storage_zone", &self.storage_zone)
            .field("base_url", &self.base_url)
            .field("signer", &self.signer)
            .finish()
    }
}

impl BunnyStorage {
    /// Create a connector from configuration.
    ///
    /// Region `de` (or empty) talks to the default storage host, any other
    /// region to `{region}.storage.bunnycdn.com`, unless `storage_endpoint`
    /// overrides both.
    pub fn new(config: &Config) -> StorageResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(BunnyStorage {
            client,
            access_key: config.access_key.clone(),
            storage_zone: config.storage_zone.clone(),
            base_url: config.storage_base_url(),
            signer: UrlSigner::from_config(config),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn signer(&self) -> &UrlSigner {
        &self.signer
    }

    fn url_for(&self, remote_path: &str) -> String {
        format!("{}{}", self.base_url, keys::encode_segments(remote_path))
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<Bytes>,
    ) -> StorageResult<Response> {
        let mut request = self
            .client
            .request(method, url)
            .header("AccessKey", self.access_key.as_str());
        if let Some(body) = body {
            request = request.body(body);
        }

        request.send().await.map_err(|e| {
            if e.is_timeout() {
                StorageError::Transport(format!("request to {} timed out", url))
            } else {
                StorageError::Transport(e.to_string())
            }
        })
    }

    /// Map a non-success status onto the error taxonomy.
    ///
    /// `404` only means `NotFound` for reads and deletes; elsewhere it is a
    /// transport failure like any other unexpected status.
    async fn check_status(
        response: Response,
        remote_path: &str,
        not_found_applies: bool,
    ) -> StorageResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StorageError::Unauthorized(format!(
                "storage API rejected the access key ({}): {}",
                status, body
            )),
            StatusCode::NOT_FOUND if not_found_applies => {
                StorageError::NotFound(remote_path.to_string())
            }
            _ => StorageError::Transport(format!(
                "storage API returned {} for {}: {}",
                status, remote_path, body
            )),
        })
    }

    async fn read_source(source: UploadSource) -> StorageResult<Bytes> {
        match source {
            UploadSource::Path(path) => Ok(Bytes::from(tokio::fs::read(&path).await?)),
            UploadSource::Bytes(bytes) => Ok(bytes),
            UploadSource::Reader(mut reader) => {
                let mut buffer = Vec::new();
                reader.read_to_end(&mut buffer).await.map_err(|e| {
                    StorageError::IoError(std::io::Error::new(
                        e.kind(),
                        format!("Failed to read from stream: {}", e),
                    ))
                })?;
                Ok(Bytes::from(buffer))
            }
        }
    }

    async fn write_body(response: Response, local_path: &Path) -> StorageResult<u64> {
        let mut file = tokio::fs::File::create(local_path).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| StorageError::Transport(e.to_string()))?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }
}

#[async_trait]
impl StorageConnector for BunnyStorage {
    async fn upload(
        &self,
        remote_dir: &str,
        file_name: &str,
        source: UploadSource,
    ) -> StorageResult<UploadResult> {
        let relative = keys::relative_path(remote_dir, file_name);
        keys::validate(&relative)?;

        let data = Self::read_source(source).await?;
        let size = data.len() as u64;
        let url = self.url_for(&relative);
        let start = Instant::now();

        let result = match self.send(Method::PUT, &url, Some(data)).await {
            Ok(response) => Self::check_status(response, &relative, false).await,
            Err(e) => Err(e),
        };

        let response = result.map_err(|e| {
            tracing::error!(
                error = %e,
                zone = %self.storage_zone,
                remote_path = %relative,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Storage upload failed"
            );
            e
        })?;

        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let response_json = serde_json::from_str(&text)
            .unwrap_or_else(|_| serde_json::json!({ "status_code": status, "text": text }));

        tracing::info!(
            zone = %self.storage_zone,
            remote_path = %relative,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Storage upload successful"
        );

        Ok(UploadResult {
            public_url: self.signer.public_url(&relative),
            remote_relative_path: relative,
            response: response_json,
        })
    }

    async fn download(
        &self,
        remote_path: &str,
        local_path: Option<&Path>,
    ) -> StorageResult<PathBuf> {
        let remote_path = keys::normalize_dir(remote_path);
        keys::validate(remote_path)?;

        let local_path = local_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(keys::file_name(remote_path)));
        let start = Instant::now();

        let response = self
            .send(Method::GET, &self.url_for(remote_path), None)
            .await?;
        let response = Self::check_status(response, remote_path, true).await?;

        let size = match Self::write_body(response, &local_path).await {
            Ok(size) => size,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    zone = %self.storage_zone,
                    remote_path = %remote_path,
                    local_path = %local_path.display(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Storage download failed"
                );
                match tokio::fs::remove_file(&local_path).await {
                    Ok(()) => {}
                    Err(ref cleanup) if cleanup.kind() == std::io::ErrorKind::NotFound => {}
                    Err(cleanup) => tracing::warn!(
                        local_path = %local_path.display(),
                        error = %cleanup,
                        "Failed to remove partial download"
                    ),
                }
                return Err(e);
            }
        };

        tracing::info!(
            zone = %self.storage_zone,
            remote_path = %remote_path,
            local_path = %local_path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Storage download successful"
        );

        Ok(local_path)
    }

    async fn list(&self, remote_dir: &str) -> StorageResult<Vec<StorageEntry>> {
        keys::validate(remote_dir)?;
        let mut url = self.url_for(remote_dir);
        if !url.ends_with('/') {
            url.push('/');
        }

        let response = self.send(Method::GET, &url, None).await?;
        let response = Self::check_status(response, remote_dir, true).await?;

        let entries: Vec<StorageEntry> = response
            .json()
            .await
            .map_err(|e| StorageError::Transport(format!("Failed to parse listing: {}", e)))?;

        tracing::debug!(
            zone = %self.storage_zone,
            remote_dir = %remote_dir,
            entries = entries.len(),
            "Storage listing fetched"
        );

        Ok(entries)
    }

    async fn delete(&self, remote_path: &str) -> StorageResult<()> {
        keys::validate(remote_path)?;
        let start = Instant::now();

        let response = self
            .send(Method::DELETE, &self.url_for(remote_path), None)
            .await?;
        Self::check_status(response, remote_path, true)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    zone = %self.storage_zone,
                    remote_path = %remote_path,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Storage delete failed"
                );
                e
            })?;

        tracing::info!(
            zone = %self.storage_zone,
            remote_path = %remote_path,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Storage delete successful"
        );

        Ok(())
    }

    fn sign_url(&self, remote_relative_path: &str) -> StorageResult<String> {
        keys::validate(remote_relative_path)?;
        self.signer.sign(remote_relative_path)
    }
}
