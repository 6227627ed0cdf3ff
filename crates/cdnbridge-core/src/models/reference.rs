//! File reference model
//!
//! Upstream nodes hand the upload node whatever they produced: a path, a
//! `(success, [paths])` batch pair, nested lists, dictionaries, objects with
//! path-like attributes, or media that only exists in memory. `FileReference`
//! closes that set so resolution can match on it instead of probing.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::sync::Arc;

use super::media::{InMemoryMedia, PixelBuffer};

/// Object exposing path-like attributes (`filepath`, `path`, ...).
pub trait AttributeSource: Send + Sync {
    fn attribute(&self, name: &str) -> Option<FileReference>;

    fn type_name(&self) -> &str;

    /// String form used as the last-resort path candidate.
    fn describe(&self) -> String;
}

#[derive(Clone)]
pub enum FileReference {
    /// Plain path string or handle
    Path(PathBuf),
    /// Batch result: success flag plus sibling output files
    Candidates {
        success: bool,
        candidates: Vec<String>,
    },
    /// Generic sequence searched in order
    Sequence(Vec<FileReference>),
    /// Mapping exposing conventional keys
    Mapping(BTreeMap<String, FileReference>),
    /// Object exposing conventional attribute names
    Object(Arc<dyn AttributeSource>),
    /// Media held in memory with stream/save capabilities
    Media(Arc<dyn InMemoryMedia>),
    /// Pixel array with no path
    Pixels(Arc<PixelBuffer>),
    /// Any other scalar, kept in string form
    Scalar(String),
}

impl FileReference {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        FileReference::Path(path.into())
    }

    pub fn candidates<I, S>(success: bool, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FileReference::Candidates {
            success,
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    /// True for a batch pair whose producer reported failure.
    pub fn upstream_failed(&self) -> bool {
        matches!(self, FileReference::Candidates { success: false, .. })
    }

    /// Value usable directly as a filesystem path (non-empty path or scalar).
    pub fn as_path_like(&self) -> Option<PathBuf> {
        match self {
            FileReference::Path(p) if !p.as_os_str().is_empty() => Some(p.clone()),
            FileReference::Scalar(s) if !s.is_empty() => Some(PathBuf::from(s)),
            _ => None,
        }
    }

    /// Number of independently selectable items at the top level.
    pub fn item_count(&self) -> usize {
        match self {
            FileReference::Candidates { candidates, .. } => candidates.len(),
            FileReference::Sequence(items) => items.len(),
            _ => 1,
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            FileReference::Path(_) => "path",
            FileReference::Candidates { .. } => "candidates",
            FileReference::Sequence(_) => "sequence",
            FileReference::Mapping(_) => "mapping",
            FileReference::Object(_) => "object",
            FileReference::Media(_) => "media",
            FileReference::Pixels(_) => "pixels",
            FileReference::Scalar(_) => "scalar",
        }
    }

    /// String form of the reference, used for the final existence check
    /// and in error messages.
    pub fn describe(&self) -> String {
        match self {
            FileReference::Path(p) => p.display().to_string(),
            FileReference::Scalar(s) => s.clone(),
            FileReference::Object(obj) => obj.describe(),
            FileReference::Media(media) => media.describe(),
            FileReference::Pixels(buffer) => format!(
                "<pixels {}x{}x{}>",
                buffer.width, buffer.height, buffer.channels
            ),
            other => other.to_json().to_string(),
        }
    }

    /// Convert a JSON value received from the host into a reference.
    ///
    /// A two-element array whose first element is a bool (or integer) and
    /// whose second is an array is read as a batch pair; non-string entries
    /// in its candidate list are skipped.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => FileReference::Path(PathBuf::from(s)),
            Value::Array(items) => match items.as_slice() {
                [flag, Value::Array(paths)] if flag.is_boolean() || flag.is_i64() => {
                    let success = flag
                        .as_bool()
                        .unwrap_or_else(|| flag.as_i64().unwrap_or(0) != 0);
                    FileReference::Candidates {
                        success,
                        candidates: paths
                            .iter()
                            .filter_map(|p| p.as_str().map(String::from))
                            .collect(),
                    }
                }
                _ => FileReference::Sequence(items.iter().map(FileReference::from_json).collect()),
            },
            Value::Object(map) => FileReference::Mapping(
                map.iter()
                    .map(|(k, v)| (k.clone(), FileReference::from_json(v)))
                    .collect(),
            ),
            Value::Null => FileReference::Scalar(String::new()),
            other => FileReference::Scalar(other.to_string()),
        }
    }

    /// JSON form handed back to the host as the passthrough output.
    pub fn to_json(&self) -> Value {
        match self {
            FileReference::Path(p) => Value::String(p.display().to_string()),
            FileReference::Candidates {
                success,
                candidates,
            } => Value::Array(vec![
                Value::Bool(*success),
                Value::Array(candidates.iter().cloned().map(Value::String).collect()),
            ]),
            FileReference::Sequence(items) => {
                Value::Array(items.iter().map(FileReference::to_json).collect())
            }
            FileReference::Mapping(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<String, Value>>(),
            ),
            FileReference::Scalar(s) => Value::String(s.clone()),
            other => Value::String(other.describe()),
        }
    }
}

impl Debug for FileReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            FileReference::Path(p) => f.debug_tuple("Path").field(p).finish(),
            FileReference::Candidates {
                success,
                candidates,
            } => f
                .debug_struct("Candidates")
                .field("success", success)
                .field("candidates", candidates)
                .finish(),
            FileReference::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
            FileReference::Mapping(map) => f.debug_tuple("Mapping").field(map).finish(),
            FileReference::Object(obj) => f.debug_tuple("Object").field(&obj.type_name()).finish(),
            FileReference::Media(media) => f.debug_tuple("Media").field(&media.kind()).finish(),
            FileReference::Pixels(buffer) => f.debug_tuple("Pixels").field(buffer).finish(),
            FileReference::Scalar(s) => f.debug_tuple("Scalar").field(s).finish(),
        }
    }
}

impl From<PathBuf> for FileReference {
    fn from(path: PathBuf) -> Self {
        FileReference::Path(path)
    }
}

impl From<&str> for FileReference {
    fn from(path: &str) -> Self {
        FileReference::Path(PathBuf::from(path))
    }
}

impl From<PixelBuffer> for FileReference {
    fn from(buffer: PixelBuffer) -> Self {
        FileReference::Pixels(Arc::new(buffer))
    }
}
