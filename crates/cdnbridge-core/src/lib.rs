//! cdnbridge core library
//!
//! Shared configuration, constants, error metadata and the file-reference model
//! consumed by the resolver, storage and upload crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{ErrorMetadata, LogLevel};
pub use models::{
    AttributeSource, FileReference, InMemoryMedia, MediaKind, MediaReader, PixelBuffer, PixelData,
};
