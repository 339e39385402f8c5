//! Async file-based config source with SHA-256 change detection.
//!
//! [`FileSource`] implements [`ConfigSource`] for every enabled file
//! format; the extension picks the parser in [`parse_config_str`].
//! Content is read through Tokio, validated, and hashed; the hash is the
//! [`ConfigVersion`] the reload loop compares against.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{parse_config_str, sha256_hex};
use crate::config::model::Config;
use crate::config::validation::validate;
use crate::config::{ConfigSource, ConfigVersion};
use crate::error::DevgateError;

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Does not check the extension; [`create_file_source`](super::create_file_source) does.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn extension(&self) -> &str {
        self.path.extension().and_then(|e| e.to_str()).unwrap_or("")
    }

    async fn read_content(&self) -> Result<String, DevgateError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => DevgateError::ConfigFileNotFound {
                    path: self.path.clone(),
                },
                _ => DevgateError::Io(e),
            })
    }
}

#[async_trait]
impl ConfigSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> Result<(Config, ConfigVersion), DevgateError> {
        let content = self.read_content().await?;

        let config = parse_config_str(self.extension(), &content, &self.describe())?;
        validate(&config).map_err(|errors| DevgateError::ConfigValidation { errors })?;

        tracing::debug!(
            path = %self.path.display(),
            rules = config.rules.len(),
            "config file loaded"
        );
        Ok((config, ConfigVersion::Hash(sha256_hex(content.as_bytes()))))
    }

    async fn has_changed(&self, current: &ConfigVersion) -> Result<bool, DevgateError> {
        let content = self.read_content().await?;
        Ok(*current != ConfigVersion::Hash(sha256_hex(content.as_bytes())))
    }
}
