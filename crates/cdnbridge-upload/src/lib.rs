//! cdnbridge upload library
//!
//! The upload node's run logic: resolve a file reference, upload it to the
//! CDN storage zone, sign a download URL and clean up anything materialized
//! along the way. Also hosts the batch cleanup node.

pub mod cleanup;
pub mod error;
pub mod naming;
pub mod node;
pub mod orchestrator;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use cleanup::{CleanupFilenamesNode, CleanupReport};
pub use error::{UploadError, UploadOutcome};
pub use naming::remote_file_name;
pub use node::{UploadNode, UploadNodeInputs};
pub use orchestrator::{NodeOutput, UploadOrchestrator, UploadRequest};
