use crate::{BunnyStorage, StorageConnector, StorageError, StorageResult};
use cdnbridge_core::Config;
use std::sync::Arc;

/// Create the storage connector described by `config`.
pub fn create_storage(config: &Config) -> StorageResult<Arc<dyn StorageConnector>> {
    config
        .validate()
        .map_err(|e| StorageError::ConfigError(e.to_string()))?;

    if config.access_key.is_empty() {
        tracing::warn!(
            zone = %config.storage_zone,
            "No storage access key configured; uploads will be rejected as unauthorized"
        );
    }

    let storage = BunnyStorage::new(config)?;
    tracing::debug!(base_url = %storage.base_url(), "Storage connector created");
    Ok(Arc::new(storage))
}
