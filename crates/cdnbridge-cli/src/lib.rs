use serde_json::Value;

/// Read a reference argument as the JSON value the upload node would receive.
///
/// `'[true, ["out.mp4"]]'` stays a batch pair; anything that is not a JSON
/// array or object, such as `out.mp4`, becomes a path string.
pub fn parse_reference(arg: &str) -> Value {
    match serde_json::from_str::<Value>(arg) {
        Ok(value) if value.is_array() || value.is_object() => value,
        _ => Value::String(arg.to_string()),
    }
}

/// Parse a cleanup argument, which must be JSON.
pub fn parse_filenames(arg: &str) -> anyhow::Result<Value> {
    serde_json::from_str(arg).map_err(|e| anyhow::anyhow!("filenames must be JSON: {}", e))
}

/// Initialize tracing for the CLI binary.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdnbridge_core::FileReference;
    use serde_json::json;

    #[test]
    fn plain_argument_is_a_path() {
        let value = parse_reference("renders/out.mp4");
        assert_eq!(value, json!("renders/out.mp4"));
        assert!(matches!(FileReference::from_json(&value), FileReference::Path(_)));
    }

    #[test]
    fn json_pair_is_a_batch() {
        let value = parse_reference(r#"[false, ["a.mp4", "b.png"]]"#);
        let reference = FileReference::from_json(&value);
        assert!(reference.upstream_failed());
        assert_eq!(reference.item_count(), 2);
    }

    #[test]
    fn batch_input_is_kept_verbatim() {
        // Integer flags and non-string entries survive for the passthrough.
        assert_eq!(parse_reference(r#"[1, ["a.mp4", 3]]"#), json!([1, ["a.mp4", 3]]));
    }

    #[test]
    fn json_scalars_stay_paths() {
        // A bare number is a valid file name, not a JSON document here.
        assert_eq!(parse_reference("42"), json!("42"));
    }

    #[test]
    fn cleanup_argument_must_be_json() {
        assert!(parse_filenames("[true, []]").is_ok());
        assert!(parse_filenames("not json").is_err());
    }
}
