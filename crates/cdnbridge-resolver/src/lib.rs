//! cdnbridge resolver library
//!
//! Turns a [`FileReference`](cdnbridge_core::FileReference) into a concrete
//! local file, writing in-memory media to a temporary file when nothing on
//! disk matches.

pub mod error;
pub mod materialize;
pub mod resolved;
pub mod resolver;

pub use error::{ResolveError, ResolveResult};
pub use materialize::Materializer;
pub use resolved::ResolvedFile;
pub use resolver::PathResolver;
