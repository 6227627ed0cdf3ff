//! Remote file naming.

use cdnbridge_core::constants::UPLOAD_NAME_FORMAT;
use chrono::{DateTime, Local};

/// Remote file name for an upload: the process label, or a timestamp when
/// no label is given, followed by the local file's extension.
///
/// `extension` carries its leading dot (`.mp4`) or is empty.
pub fn remote_file_name(label: Option<&str>, extension: &str, now: DateTime<Local>) -> String {
    match label.map(str::trim).filter(|l| !l.is_empty()) {
        Some(label) => format!("{}{}", label, extension),
        None => format!("{}{}", now.format(UPLOAD_NAME_FORMAT), extension),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 7, 9, 5, 1).unwrap()
    }

    #[test]
    fn label_takes_precedence() {
        assert_eq!(
            remote_file_name(Some("job-42"), ".mp4", fixed_now()),
            "job-42.mp4"
        );
        assert_eq!(
            remote_file_name(Some("  job-42 "), ".png", fixed_now()),
            "job-42.png"
        );
    }

    #[test]
    fn missing_label_falls_back_to_timestamp() {
        assert_eq!(
            remote_file_name(None, ".mp4", fixed_now()),
            "upload_20250307_090501.mp4"
        );
        assert_eq!(
            remote_file_name(Some("   "), "", fixed_now()),
            "upload_20250307_090501"
        );
    }
}
