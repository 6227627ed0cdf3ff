//! Input models shared by the resolver and the upload node.

pub mod media;
pub mod reference;

pub use media::{InMemoryMedia, MediaKind, MediaReader, PixelBuffer, PixelData};
pub use reference::{AttributeSource, FileReference};
