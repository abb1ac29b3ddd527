//! External encoder detection.
//!
//! Resolves the configured encoder executable and probes its version for
//! the `check-tools` command. The encoder itself is treated as opaque.

use crate::config::EncoderConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Availability information for the encoder, reported by `check-tools`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (file name of the configured executable).
    pub name: String,
    /// Whether the tool was found.
    pub available: bool,
    /// Version string (first line of `--version` output), if available.
    pub version: Option<String>,
    /// Resolved path to the executable.
    pub path: Option<PathBuf>,
}

fn tool_name(config: &EncoderConfig) -> String {
    config
        .encoder_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| config.encoder_path.to_string_lossy().to_string())
}

/// Resolve the encoder executable.
///
/// If the configured path exists it is used directly. Otherwise the file
/// name is looked up in `PATH`.
pub fn resolve_encoder(config: &EncoderConfig) -> Result<PathBuf> {
    if config.encoder_path.exists() {
        return Ok(config.encoder_path.clone());
    }

    let name = tool_name(config);
    which::which(&name).map_err(|_| {
        Error::tool(
            name.clone(),
            format!("{name} not found; is it installed and in PATH?"),
        )
    })
}

/// Check encoder availability without failing.
pub fn check_encoder(config: &EncoderConfig) -> ToolInfo {
    let name = tool_name(config);
    match resolve_encoder(config) {
        Ok(path) => ToolInfo {
            name,
            available: true,
            version: detect_version(&path),
            path: Some(path),
        },
        Err(_) => ToolInfo {
            name,
            available: false,
            version: None,
            path: None,
        },
    }
}

/// Run `<tool> --version` and return the first line of stdout.
fn detect_version(path: &Path) -> Option<String> {
    let output = std::process::Command::new(path)
        .arg("--version")
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn config_for(path: PathBuf) -> EncoderConfig {
        EncoderConfig {
            encoder_path: path,
            args: BTreeMap::new(),
        }
    }

    #[test]
    fn resolve_existing_path_is_used_directly() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = config_for(file.path().to_path_buf());
        let resolved = resolve_encoder(&config).unwrap();
        assert_eq!(resolved, file.path());
    }

    #[test]
    fn resolve_missing_tool_returns_error() {
        let config = config_for(PathBuf::from("/nonexistent/dee_wrapper_xyz_12345"));
        let err = resolve_encoder(&config).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn check_missing_tool_reports_unavailable() {
        let config = config_for(PathBuf::from("/nonexistent/dee_wrapper_xyz_12345"));
        let info = check_encoder(&config);
        assert_eq!(info.name, "dee_wrapper_xyz_12345");
        assert!(!info.available);
        assert!(info.path.is_none());
    }
}
