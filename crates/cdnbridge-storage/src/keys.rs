//! Remote path helpers shared by the connector and the signer.
//!
//! Layout: `{dir}/{file}` relative to the namespace, or just `{file}` at the root.

use crate::traits::{StorageError, StorageResult};

/// Strip a single trailing `/` from a remote directory.
pub fn normalize_dir(remote_dir: &str) -> &str {
    remote_dir.strip_suffix('/').unwrap_or(remote_dir)
}

/// Relative path of `file_name` inside `remote_dir`.
pub fn relative_path(remote_dir: &str, file_name: &str) -> String {
    let dir = normalize_dir(remote_dir);
    if dir.is_empty() {
        file_name.to_string()
    } else {
        format!("{}/{}", dir, file_name)
    }
}

/// Reject paths that could climb out of the namespace.
pub fn validate(remote_path: &str) -> StorageResult<()> {
    if remote_path.split('/').any(|segment| segment == "..") {
        return Err(StorageError::InvalidPath(format!(
            "'{}' contains a '..' segment",
            remote_path
        )));
    }
    Ok(())
}

/// Percent-encode each segment for the storage API, keeping separators.
pub fn encode_segments(remote_path: &str) -> String {
    remote_path
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Last segment of a remote path, ignoring one trailing `/`.
pub fn file_name(remote_path: &str) -> &str {
    let trimmed = normalize_dir(remote_path);
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}
