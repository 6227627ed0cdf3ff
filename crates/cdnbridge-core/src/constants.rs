//! Fixed values shared across crates.

/// Region code routed to the default storage endpoint.
pub const DEFAULT_REGION: &str = "de";

/// Storage API host for the default region; other regions are prefixed onto it.
pub const DEFAULT_STORAGE_HOST: &str = "storage.bunnycdn.com";

/// CDN namespace every upload is rooted under.
pub const DEFAULT_NAMESPACE: &str = "ai-talking-videos";

/// Signed URLs stay valid for 24 hours.
pub const SIGNED_URL_TTL_SECS: u64 = 24 * 3600;

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 300;

/// Extensions treated as the primary output of a batch video export.
pub const PRIMARY_MEDIA_EXTENSIONS: &[&str] = &[".mp4", ".mov", ".mkv", ".webm"];

/// Substring that marks a silent-audio sidecar emitted next to the real video.
pub const SIDECAR_MARKER: &str = "-audio";

/// Keys holding one filename or a list of them, checked first.
pub const FILENAME_KEYS: &[&str] = &["filenames", "filename"];

/// Keys holding a single path, checked in this order after [`FILENAME_KEYS`].
pub const PATH_KEYS: &[&str] = &["filepath", "path", "file", "file_path", "output_path", "name"];

/// `chrono` format for the default remote file name when no label is given.
pub const UPLOAD_NAME_FORMAT: &str = "upload_%Y%m%d_%H%M%S";

/// Prefix for temporary files created while materializing in-memory media.
pub const TEMP_FILE_PREFIX: &str = "cdnbridge_";
