use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// A concrete local file produced by resolution.
///
/// Owned files were created during resolution and are deleted when the value
/// is released or dropped, whichever happens first. Borrowed files belong to
/// the caller and are never touched.
#[derive(Debug)]
pub struct ResolvedFile {
    path: PathBuf,
    temp: Option<TempPath>,
}

impl ResolvedFile {
    pub fn borrowed(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            temp: None,
        }
    }

    pub fn owned(temp: TempPath) -> Self {
        Self {
            path: temp.to_path_buf(),
            temp: Some(temp),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_owned(&self) -> bool {
        self.temp.is_some()
    }

    /// Extension with its leading dot, or an empty string.
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default()
    }

    /// Delete the file if owned, reporting any failure.
    pub fn release(self) -> io::Result<()> {
        match self.temp {
            Some(temp) => temp.close(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borrowed_file_survives_release() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keep.mp4");
        std::fs::write(&path, b"x").unwrap();

        let resolved = ResolvedFile::borrowed(&path);
        assert!(!resolved.is_owned());
        assert_eq!(resolved.extension(), ".mp4");
        resolved.release().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn owned_file_is_deleted_on_release_and_drop() {
        let released = tempfile::NamedTempFile::new().unwrap().into_temp_path();
        let released_path = released.to_path_buf();
        let resolved = ResolvedFile::owned(released);
        assert!(resolved.is_owned());
        resolved.release().unwrap();
        assert!(!released_path.exists());

        let dropped = tempfile::NamedTempFile::new().unwrap().into_temp_path();
        let dropped_path = dropped.to_path_buf();
        drop(ResolvedFile::owned(dropped));
        assert!(!dropped_path.exists());
    }

    #[test]
    fn extension_is_empty_without_suffix() {
        assert_eq!(ResolvedFile::borrowed("/tmp/noext").extension(), "");
        assert_eq!(ResolvedFile::borrowed("/tmp/.hidden").extension(), "");
        assert_eq!(ResolvedFile::borrowed("a.tar.gz").extension(), ".gz");
    }
}
