//! Batch cleanup node
//!
//! Deletes the sibling files of a `(success, [paths])` batch once they have
//! been uploaded, and reports what happened as a one-line summary.

use serde_json::Value;
use std::path::PathBuf;

/// Files removed and files that were missing or could not be removed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CleanupReport {
    pub deleted: Vec<PathBuf>,
    pub failed: Vec<String>,
}

impl CleanupReport {
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.deleted.is_empty() {
            parts.push(format!("Deleted {} file(s)", self.deleted.len()));
        }
        if !self.failed.is_empty() {
            parts.push(format!(
                "{} file(s) missing or failed to delete",
                self.failed.len()
            ));
        }
        if parts.is_empty() {
            return "No files provided".to_string();
        }
        parts.join("; ")
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CleanupFilenamesNode;

impl CleanupFilenamesNode {
    pub const CATEGORY: &'static str = "TFI/Utils";
    pub const RETURN_NAMES: [&'static str; 1] = ["summary"];

    pub fn new() -> Self {
        Self
    }

    /// Delete every path listed in `filenames` and return the summary line.
    pub async fn run(&self, filenames: &Value) -> String {
        let Some((success, paths)) = split_batch(filenames) else {
            tracing::debug!(input = %filenames, "Cleanup input is not a batch pair");
            return "Invalid filenames input".to_string();
        };

        if !success {
            return "No files to delete (success flag is false)".to_string();
        }

        let report = Self::delete_all(paths).await;
        tracing::info!(
            deleted = report.deleted.len(),
            failed = report.failed.len(),
            "Cleaned up batch files"
        );
        report.summary()
    }

    async fn delete_all(paths: &[Value]) -> CleanupReport {
        let mut report = CleanupReport::default();

        for value in paths {
            let Some(raw) = value.as_str() else {
                report.failed.push(value.to_string());
                continue;
            };

            let path = PathBuf::from(raw);
            if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
                report.failed.push(raw.to_string());
                continue;
            }

            match tokio::fs::remove_file(&path).await {
                Ok(()) => report.deleted.push(path),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to delete file");
                    report.failed.push(raw.to_string());
                }
            }
        }

        report
    }
}

fn split_batch(value: &Value) -> Option<(bool, &[Value])> {
    let items = value.as_array()?;
    let success = truthy(items.first()?);
    let paths = match items.get(1) {
        Some(Value::Array(paths)) => paths.as_slice(),
        Some(_) => return None,
        None => &[],
    };
    Some((success, paths))
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn deletes_existing_and_counts_missing() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("out.mp4");
        let audio = dir.path().join("out-audio.mp4");
        std::fs::write(&video, b"v").unwrap();
        std::fs::write(&audio, b"a").unwrap();
        let missing = dir.path().join("gone.png");

        let input = json!([true, [video, audio, missing]]);
        let summary = CleanupFilenamesNode::new().run(&input).await;

        assert_eq!(summary, "Deleted 2 file(s); 1 file(s) missing or failed to delete");
        assert!(!video.exists());
        assert!(!audio.exists());
    }

    #[tokio::test]
    async fn false_flag_deletes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("out.mp4");
        std::fs::write(&video, b"v").unwrap();

        let summary = CleanupFilenamesNode::new()
            .run(&json!([false, [video]]))
            .await;

        assert_eq!(summary, "No files to delete (success flag is false)");
        assert!(video.exists());
    }

    #[tokio::test]
    async fn empty_and_invalid_inputs() {
        let node = CleanupFilenamesNode::new();
        assert_eq!(node.run(&json!([true, []])).await, "No files provided");
        assert_eq!(node.run(&json!([1])).await, "No files provided");
        assert_eq!(node.run(&json!([])).await, "Invalid filenames input");
        assert_eq!(node.run(&json!("a.mp4")).await, "Invalid filenames input");
        assert_eq!(node.run(&json!([true, "a.mp4"])).await, "Invalid filenames input");
    }

    #[tokio::test]
    async fn non_string_entries_count_as_failed() {
        let summary = CleanupFilenamesNode::new().run(&json!([1, [42, null]])).await;
        assert_eq!(summary, "2 file(s) missing or failed to delete");
    }
}
