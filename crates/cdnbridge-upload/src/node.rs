//! Host adapter for the upload node
//!
//! The host hands over named inputs as a JSON object and expects a
//! `(url, filenames)` pair back. Credentials supplied as inputs take
//! precedence over the environment.

use cdnbridge_core::{Config, FileReference};
use cdnbridge_resolver::{PathResolver, ResolveError};
use cdnbridge_storage::create_storage;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{UploadError, UploadOutcome};
use crate::orchestrator::{UploadOrchestrator, UploadRequest};

/// Named inputs of the upload node.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadNodeInputs {
    /// Remote file stem; blank means a timestamp name
    #[serde(default)]
    pub process_id: String,
    pub filenames: Value,
    #[serde(default)]
    pub cdn_path: String,
    #[serde(default)]
    pub index: Option<i64>,
    #[serde(rename = "BUNNY_API_KEY", default)]
    pub api_key: String,
    #[serde(rename = "BUNNY_TOKEN_KEY", default)]
    pub token_key: String,
}

#[derive(Debug, Clone)]
pub struct UploadNode {
    config: Config,
    resolver: PathResolver,
}

impl UploadNode {
    pub const CATEGORY: &'static str = "TFI/Video";
    pub const RETURN_NAMES: [&'static str; 2] = ["url", "filenames"];

    pub fn new(config: Config) -> Self {
        Self {
            config,
            resolver: PathResolver::new(),
        }
    }

    pub fn from_env() -> UploadOutcome<Self> {
        let config = Config::from_env().map_err(|e| UploadError::Config(e.to_string()))?;
        Ok(Self::new(config))
    }

    pub fn with_resolver(mut self, resolver: PathResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Parse `inputs` and run the node.
    pub async fn run_json(&self, inputs: Value) -> UploadOutcome<(String, Value)> {
        let inputs: UploadNodeInputs = serde_json::from_value(inputs)
            .map_err(|e| UploadError::InvalidInput(e.to_string()))?;
        self.run(inputs).await
    }

    /// Upload the file `inputs.filenames` refers to.
    ///
    /// Returns the signed URL and the `filenames` value exactly as received.
    pub async fn run(&self, inputs: UploadNodeInputs) -> UploadOutcome<(String, Value)> {
        let reference = FileReference::from_json(&inputs.filenames);

        if reference.upstream_failed() {
            tracing::warn!(
                cdn_path = %inputs.cdn_path,
                "Upstream batch reported failure; skipping upload"
            );
            return Ok((String::new(), inputs.filenames));
        }

        let index = match inputs.index {
            Some(i) if i < 0 => {
                return Err(ResolveError::IndexOutOfRange {
                    index: i,
                    len: reference.item_count(),
                }
                .into())
            }
            Some(i) => Some(i as usize),
            None => None,
        };

        let config = self
            .config
            .clone()
            .with_access_key(&inputs.api_key)
            .with_signing_secret(&inputs.token_key);
        let storage = create_storage(&config)?;
        let orchestrator = UploadOrchestrator::with_resolver(self.resolver.clone(), storage);

        let mut request = UploadRequest::new(reference, inputs.cdn_path.trim());
        request.process_label = Some(inputs.process_id).filter(|p| !p.trim().is_empty());
        request.index = index;

        let output = orchestrator.run(request).await?;
        Ok((output.url, inputs.filenames))
    }
}
