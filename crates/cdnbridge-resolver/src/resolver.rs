//! Path resolution for heterogeneous file references.
//!
//! Order, first match wins:
//!
//! 1. batch pair `(success, candidates)`: primary media without the sidecar
//!    marker, else the first existing candidate
//! 2. other sequences: each element in order
//! 3. plain paths and scalars
//! 4. mappings and objects: `filenames`/`filename`, then the conventional
//!    path keys
//! 5. the reference's string form
//!
//! Only when all of that fails is in-memory media written to a temp file.

use cdnbridge_core::constants::{
    FILENAME_KEYS, PATH_KEYS, PRIMARY_MEDIA_EXTENSIONS, SIDECAR_MARKER,
};
use cdnbridge_core::FileReference;
use std::path::{Path, PathBuf};

use crate::error::{ResolveError, ResolveResult};
use crate::materialize::Materializer;
use crate::resolved::ResolvedFile;

#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    materializer: Materializer,
}

impl PathResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_materializer(materializer: Materializer) -> Self {
        Self { materializer }
    }

    /// Resolve `reference` to an existing local file.
    ///
    /// With `index`, the top-level candidate list or sequence is treated as
    /// independent items and only the selected one is resolved; any other
    /// reference counts as a single item.
    pub async fn resolve(
        &self,
        reference: &FileReference,
        index: Option<usize>,
    ) -> ResolveResult<ResolvedFile> {
        if reference.upstream_failed() {
            return Err(ResolveError::UpstreamFailure);
        }

        let Some(index) = index else {
            return self.resolve_any(reference).await;
        };

        let out_of_range = || ResolveError::IndexOutOfRange {
            index: index as i64,
            len: reference.item_count(),
        };

        match reference {
            FileReference::Candidates { candidates, .. } => {
                let candidate = candidates.get(index).ok_or_else(out_of_range)?;
                existing_file(Path::new(candidate))
                    .map(ResolvedFile::borrowed)
                    .ok_or_else(|| ResolveError::NotFound(format!("candidate '{}'", candidate)))
            }
            FileReference::Sequence(items) => {
                let item = items.get(index).ok_or_else(out_of_range)?;
                self.resolve_any(item).await
            }
            _ if index == 0 => self.resolve_any(reference).await,
            _ => Err(out_of_range()),
        }
    }

    async fn resolve_any(&self, reference: &FileReference) -> ResolveResult<ResolvedFile> {
        if let Some(path) = locate(reference) {
            tracing::debug!(
                variant = reference.variant_name(),
                path = %path.display(),
                "Resolved file reference"
            );
            return Ok(ResolvedFile::borrowed(path));
        }

        if let Some(candidate) = Materializer::find_candidate(reference) {
            return self.materializer.materialize(candidate).await;
        }

        Err(ResolveError::NotFound(format!(
            "{} input ({})",
            reference.variant_name(),
            reference.describe()
        )))
    }
}

/// Find an existing file for `reference` without touching anything.
pub fn locate(reference: &FileReference) -> Option<PathBuf> {
    match reference {
        FileReference::Candidates {
            success: true,
            candidates,
        } => select_candidate(candidates),
        FileReference::Candidates { success: false, .. } => None,
        FileReference::Sequence(items) => items.iter().find_map(locate),
        FileReference::Path(_) | FileReference::Scalar(_) => {
            reference.as_path_like().and_then(|p| existing_file(&p))
        }
        FileReference::Mapping(map) => lookup_keys(|key| map.get(key).cloned()),
        FileReference::Object(object) => lookup_keys(|key| object.attribute(key))
            .or_else(|| existing_file(Path::new(&object.describe()))),
        FileReference::Media(media) => media.source_path().and_then(|p| existing_file(&p)),
        FileReference::Pixels(_) => None,
    }
}

/// Pick from a batch's sibling outputs.
///
/// Video exporters often write a silent `-audio` track next to the real file,
/// so a primary media extension without that marker wins over list order.
pub fn select_candidate(candidates: &[String]) -> Option<PathBuf> {
    let paths: Vec<&Path> = candidates.iter().map(Path::new).collect();

    paths
        .iter()
        .find(|p| is_primary_media(p) && p.is_file())
        .or_else(|| paths.iter().find(|p| p.is_file()))
        .map(|p| p.to_path_buf())
}

fn is_primary_media(path: &Path) -> bool {
    let extension = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()));
    let is_sidecar = path
        .file_name()
        .map(|name| name.to_string_lossy().contains(SIDECAR_MARKER))
        .unwrap_or(false);

    match extension {
        Some(ext) => PRIMARY_MEDIA_EXTENSIONS.contains(&ext.as_str()) && !is_sidecar,
        None => false,
    }
}

fn lookup_keys<F>(get: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<FileReference>,
{
    for key in FILENAME_KEYS.iter().copied() {
        let Some(value) = get(key) else { continue };
        let found = match value {
            FileReference::Sequence(ref items) => items
                .iter()
                .filter_map(FileReference::as_path_like)
                .find_map(|p| existing_file(&p)),
            FileReference::Candidates { .. } => locate(&value),
            ref other => other.as_path_like().and_then(|p| existing_file(&p)),
        };
        if found.is_some() {
            return found;
        }
    }

    PATH_KEYS
        .iter()
        .copied()
        .filter_map(|key| get(key))
        .filter_map(|value| value.as_path_like())
        .find_map(|p| existing_file(&p))
}

fn existing_file(path: &Path) -> Option<PathBuf> {
    let exists = path.is_file();
    tracing::trace!(path = %path.display(), exists, "Checking path candidate");
    exists.then(|| path.to_path_buf())
}
