//! In-memory media that only reaches disk when asked to.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::io::AsyncRead;

/// Readable byte stream handed out by in-memory media.
pub type MediaReader = Pin<Box<dyn AsyncRead + Send + Unpin>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Image,
}

impl MediaKind {
    /// Extension (with leading dot) used for the materialized temp file.
    pub fn extension(self) -> &'static str {
        match self {
            MediaKind::Video => ".mp4",
            MediaKind::Image => ".png",
        }
    }
}

/// Media object produced in memory by an upstream node.
///
/// Capabilities are advertised through `can_stream` / `can_save` so callers
/// can decide how to materialize before invoking anything.
#[async_trait]
pub trait InMemoryMedia: Send + Sync {
    fn kind(&self) -> MediaKind;

    /// Backing file, when the object happens to have one.
    fn source_path(&self) -> Option<PathBuf> {
        None
    }

    fn can_stream(&self) -> bool {
        false
    }

    fn can_save(&self) -> bool {
        false
    }

    async fn open_stream(&self) -> io::Result<MediaReader> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "media does not expose a byte stream",
        ))
    }

    async fn save_to(&self, _path: &Path) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "media cannot save itself to a path",
        ))
    }

    fn describe(&self) -> String {
        format!("<in-memory {:?}>", self.kind())
    }
}

/// Raw pixel samples, row-major, interleaved channels.
#[derive(Clone, PartialEq)]
pub enum PixelData {
    U8(Vec<u8>),
    /// Normalized samples in `[0.0, 1.0]`, as image tensors carry them
    F32(Vec<f32>),
}

impl PixelData {
    pub fn len(&self) -> usize {
        match self {
            PixelData::U8(data) => data.len(),
            PixelData::F32(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Image held only as a pixel array, with no path at all.
#[derive(Clone, PartialEq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    /// 1 (gray), 3 (RGB) or 4 (RGBA)
    pub channels: u8,
    pub data: PixelData,
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &self.channels)
            .field("samples", &self.data.len())
            .finish()
    }
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, channels: u8, data: PixelData) -> Self {
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.channels as usize
    }

    /// Check dimensions and channel count against the sample buffer.
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "pixel buffer has empty dimensions {}x{}",
                self.width, self.height
            ));
        }
        if !matches!(self.channels, 1 | 3 | 4) {
            return Err(format!("unsupported channel count {}", self.channels));
        }
        if self.data.len() != self.expected_len() {
            return Err(format!(
                "pixel buffer holds {} samples, expected {}",
                self.data.len(),
                self.expected_len()
            ));
        }
        Ok(())
    }

    /// Samples as bytes; float samples are clamped to `[0, 1]` and scaled.
    pub fn to_u8(&self) -> Vec<u8> {
        match self.data {
            PixelData::U8(ref data) => data.clone(),
            PixelData::F32(ref data) => data
                .iter()
                .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_samples_are_clamped_and_scaled() {
        let buffer = PixelBuffer::new(2, 1, 1, PixelData::F32(vec![-0.5, 1.5]));
        assert_eq!(buffer.to_u8(), vec![0, 255]);

        let mid = PixelBuffer::new(1, 1, 1, PixelData::F32(vec![0.5]));
        assert_eq!(mid.to_u8(), vec![128]);
    }

    #[test]
    fn validate_checks_sample_count() {
        let ok = PixelBuffer::new(2, 2, 3, PixelData::U8(vec![0; 12]));
        assert!(ok.validate().is_ok());

        let short = PixelBuffer::new(2, 2, 3, PixelData::U8(vec![0; 11]));
        assert!(short.validate().is_err());

        let bad_channels = PixelBuffer::new(1, 1, 2, PixelData::U8(vec![0; 2]));
        assert!(bad_channels.validate().is_err());
    }

    #[test]
    fn kind_extensions() {
        assert_eq!(MediaKind::Video.extension(), ".mp4");
        assert_eq!(MediaKind::Image.extension(), ".png");
    }
}
