//! Materialization of in-memory media into temporary files.

use cdnbridge_core::constants::TEMP_FILE_PREFIX;
use cdnbridge_core::{FileReference, InMemoryMedia, MediaKind, PixelBuffer};
use image::{ColorType, ImageFormat};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempPath;

use crate::error::{ResolveError, ResolveResult};
use crate::resolved::ResolvedFile;

/// How an in-memory reference will be written to disk.
enum Plan {
    Save(Arc<dyn InMemoryMedia>),
    Stream(Arc<dyn InMemoryMedia>),
    EncodePng(Arc<PixelBuffer>),
}

/// Writes in-memory media to uniquely named temporary files.
#[derive(Debug, Clone, Default)]
pub struct Materializer {
    temp_dir: Option<PathBuf>,
}

impl Materializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create temp files under `dir` instead of the system temp directory.
    pub fn with_temp_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: Some(dir.into()),
        }
    }

    /// Whether `reference` itself can be written to disk.
    pub fn can_materialize(reference: &FileReference) -> bool {
        Self::plan(reference).is_some()
    }

    /// First materializable reference, searching sequences in order.
    pub fn find_candidate(reference: &FileReference) -> Option<&FileReference> {
        match reference {
            FileReference::Sequence(items) => items.iter().find_map(Self::find_candidate),
            other if Self::can_materialize(other) => Some(other),
            _ => None,
        }
    }

    // Saving directly is preferred over copying a stream.
    fn plan(reference: &FileReference) -> Option<Plan> {
        match reference {
            FileReference::Media(media) if media.can_save() => Some(Plan::Save(media.clone())),
            FileReference::Media(media) if media.can_stream() => {
                Some(Plan::Stream(media.clone()))
            }
            FileReference::Pixels(buffer) => Some(Plan::EncodePng(buffer.clone())),
            _ => None,
        }
    }

    /// Write `reference` to a fresh temp file and return it as owned.
    ///
    /// The temp file is removed again if any step fails.
    pub async fn materialize(&self, reference: &FileReference) -> ResolveResult<ResolvedFile> {
        let plan = Self::plan(reference).ok_or_else(|| {
            ResolveError::MaterializationFailed(format!(
                "{} reference exposes neither a byte stream nor a save capability",
                reference.variant_name()
            ))
        })?;

        let (kind, how) = match plan {
            Plan::Save(ref media) => (media.kind(), "save"),
            Plan::Stream(ref media) => (media.kind(), "stream"),
            Plan::EncodePng(_) => (MediaKind::Image, "encode"),
        };

        let temp = self.temp_path(kind.extension())?;
        let start = std::time::Instant::now();

        match plan {
            Plan::Save(media) => media.save_to(&temp).await.map_err(|e| {
                ResolveError::MaterializationFailed(format!("save to path failed: {}", e))
            })?,
            Plan::Stream(media) => Self::copy_stream(media.as_ref(), &temp).await?,
            Plan::EncodePng(buffer) => Self::encode_png(buffer, temp.to_path_buf()).await?,
        }

        let size = tokio::fs::metadata(&temp)
            .await
            .map_err(|e| ResolveError::MaterializationFailed(e.to_string()))?
            .len();
        if size == 0 {
            return Err(ResolveError::MaterializationFailed(
                "materialized file is empty".to_string(),
            ));
        }

        tracing::info!(
            path = %temp.display(),
            method = how,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Materialized in-memory media"
        );

        Ok(ResolvedFile::owned(temp))
    }

    fn temp_path(&self, extension: &str) -> ResolveResult<TempPath> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_FILE_PREFIX).suffix(extension);

        let file = match self.temp_dir {
            Some(ref dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| {
            ResolveError::MaterializationFailed(format!("Failed to create temp file: {}", e))
        })?;

        Ok(file.into_temp_path())
    }

    async fn copy_stream(media: &dyn InMemoryMedia, target: &Path) -> ResolveResult<()> {
        let mut reader = media.open_stream().await.map_err(|e| {
            ResolveError::MaterializationFailed(format!("Failed to open media stream: {}", e))
        })?;
        let mut file = tokio::fs::File::create(target)
            .await
            .map_err(|e| ResolveError::MaterializationFailed(e.to_string()))?;

        tokio::io::copy(&mut reader, &mut file)
            .await
            .map_err(|e| {
                ResolveError::MaterializationFailed(format!("Failed to copy media stream: {}", e))
            })?;
        tokio::io::AsyncWriteExt::flush(&mut file)
            .await
            .map_err(|e| ResolveError::MaterializationFailed(e.to_string()))?;

        Ok(())
    }

    async fn encode_png(buffer: Arc<PixelBuffer>, target: PathBuf) -> ResolveResult<()> {
        buffer.validate().map_err(ResolveError::MaterializationFailed)?;

        tokio::task::spawn_blocking(move || {
            let color = match buffer.channels {
                1 => ColorType::L8,
                3 => ColorType::Rgb8,
                _ => ColorType::Rgba8,
            };
            image::save_buffer_with_format(
                &target,
                &buffer.to_u8(),
                buffer.width,
                buffer.height,
                color,
                ImageFormat::Png,
            )
        })
        .await
        .map_err(|e| ResolveError::MaterializationFailed(format!("Failed to encode image: {}", e)))?
        .map_err(|e| ResolveError::MaterializationFailed(format!("Failed to encode image: {}", e)))
    }
}
