//! Encoder configuration loading.
//!
//! The config is a flat JSON object. One key is special: `encoder_path`
//! names the DEE wrapper executable. Every other key is passed through to
//! the encoder as a `--key value` argument pair.

use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Config key naming the encoder executable.
pub const ENCODER_PATH_KEY: &str = "encoder_path";

/// Parsed encoder configuration.
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Path to the DEE wrapper executable, tilde-expanded.
    pub encoder_path: PathBuf,

    /// Remaining config keys. Sorted map so the derived argument list is
    /// deterministic regardless of JSON key order.
    pub args: BTreeMap<String, Value>,
}

/// Load configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<EncoderConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("failed to read config file {}: {e}", path.display())))?;

    let value: Value = serde_json::from_str(&content)
        .map_err(|e| Error::config(format!("invalid JSON in config file {}: {e}", path.display())))?;

    let Value::Object(map) = value else {
        return Err(Error::config(format!(
            "config file {} must contain a JSON object",
            path.display()
        )));
    };

    let mut args: BTreeMap<String, Value> = map.into_iter().collect();

    let encoder_path = match args.remove(ENCODER_PATH_KEY) {
        Some(Value::String(s)) if !s.is_empty() => {
            PathBuf::from(shellexpand::tilde(&s).as_ref())
        }
        Some(_) => {
            return Err(Error::config(format!(
                "'{ENCODER_PATH_KEY}' must be a non-empty string"
            )))
        }
        None => {
            return Err(Error::config(format!(
                "config must contain '{ENCODER_PATH_KEY}' pointing to the encoder executable"
            )))
        }
    };

    validate_args(&args)?;

    Ok(EncoderConfig { encoder_path, args })
}

/// Reject values that have no CLI argument rendering.
fn validate_args(args: &BTreeMap<String, Value>) -> Result<()> {
    for (key, value) in args {
        if matches!(value, Value::Array(_) | Value::Object(_)) {
            return Err(Error::config(format!(
                "config key '{key}' must be a scalar or null, not a nested value"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_valid_config() {
        let file = write_config(
            r#"{"encoder_path": "/opt/dee/dee_wrapper", "frame-rate": 24, "temp-dir": "/tmp/dee"}"#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.encoder_path, PathBuf::from("/opt/dee/dee_wrapper"));
        assert_eq!(config.args.len(), 2);
        assert_eq!(config.args["frame-rate"], Value::from(24));
    }

    #[test]
    fn missing_encoder_path_is_error() {
        let file = write_config(r#"{"frame-rate": 24}"#);
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("encoder_path"));
    }

    #[test]
    fn invalid_json_is_error() {
        let file = write_config("{not json");
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn nonexistent_file_is_error() {
        let err = load_config(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn non_object_root_is_error() {
        let file = write_config("[1, 2, 3]");
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("JSON object"));
    }

    #[test]
    fn nested_values_are_rejected() {
        let file = write_config(
            r#"{"encoder_path": "/opt/dee/dee_wrapper", "filters": {"denoise": true}}"#,
        );
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("filters"));
    }

    #[test]
    fn empty_encoder_path_is_error() {
        let file = write_config(r#"{"encoder_path": ""}"#);
        assert!(load_config(file.path()).is_err());
    }
}
