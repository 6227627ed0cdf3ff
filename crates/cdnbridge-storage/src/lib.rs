//! cdnbridge storage library
//!
//! Connector for a Bunny-style object store: uploads, downloads, listings and
//! deletes over the storage HTTP API, plus signed, expiring CDN URLs.
//!
//! # Remote path format
//!
//! Every remote path is relative to the configured CDN namespace:
//!
//! - **Storage API**: `{storage_base}/{zone}/{namespace}/{dir}/{file}`
//! - **Public CDN**: `https://{cdn_host}/{namespace}/{dir}/{file}`
//!
//! Paths must not contain `..` segments. Path helpers live in the `keys`
//! module so the connector and the signer agree on the layout.

pub mod bunny;
pub mod factory;
pub mod keys;
pub mod signing;
pub mod traits;

// Re-export commonly used types
pub use bunny::BunnyStorage;
pub use factory::create_storage;
pub use signing::{SignedUrlToken, UrlSigner};
pub use traits::{
    StorageConnector, StorageEntry, StorageError, StorageResult, UploadResult, UploadSource,
};
