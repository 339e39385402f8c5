//! Concrete [`ConfigSource`](super::ConfigSource) implementations.
//!
//! Provides the [`FileSource`] (YAML, JSON, TOML gated by feature flags),
//! extension-based source selection and auto-detection, and the
//! [`parse_config_str`] parser shared by [`FileSource`] and the
//! `validate` and `check` commands.

pub mod file_source;

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::config::model::Config;
use crate::config::ConfigSource;
use crate::error::DevgateError;
use file_source::FileSource;

/// File names probed, in order, when no `--config` is given.
pub const CANDIDATES: &[&str] = &[
    "devgate.yaml",
    "devgate.yml",
    "devgate.json",
    "devgate.toml",
];

/// Parse a config string based on file extension.
pub fn parse_config_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<Config, DevgateError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| DevgateError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "json")]
        "json" => serde_json::from_str(content).map_err(|e| DevgateError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| DevgateError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(DevgateError::UnsupportedFormat(other.to_string())),
    }
}

/// Read and parse a config file synchronously. Does not validate.
pub fn read_config_file(path: &Path) -> Result<Config, DevgateError> {
    if !path.exists() {
        return Err(DevgateError::ConfigFileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    parse_config_str(ext, &content, &path.display().to_string())
}

/// Whether a parser for this extension is compiled in.
#[must_use]
pub const fn is_supported(ext: &str) -> bool {
    match ext.as_bytes() {
        #[cfg(feature = "yaml")]
        b"yaml" | b"yml" => true,
        #[cfg(feature = "json")]
        b"json" => true,
        #[cfg(feature = "toml")]
        b"toml" => true,
        _ => false,
    }
}

/// Boxed [`FileSource`] for `path`, rejecting extensions with no parser.
pub fn create_file_source(path: &Path) -> Result<Box<dyn ConfigSource>, DevgateError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !is_supported(ext) {
        return Err(DevgateError::UnsupportedFormat(ext.to_string()));
    }
    Ok(Box::new(FileSource::new(path.to_path_buf())))
}

/// First of [`CANDIDATES`] present in `dir`.
pub async fn detect_config_file(dir: &Path) -> Option<PathBuf> {
    for name in CANDIDATES {
        let path = dir.join(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Some(path);
        }
    }
    None
}

/// Compute a lowercase hex-encoded SHA-256 digest.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}
