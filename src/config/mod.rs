//! Configuration loading, validation, and hot-reloading.
//!
//! Defines the [`ConfigSource`] trait for pluggable config backends, the
//! [`ConfigVersion`] enum for change detection, and [`Overrides`] for
//! command-line values that win over whatever a source loads.
//! Submodules provide the data model, validation logic, and concrete
//! file sources.

pub mod model;
pub mod sources;
pub mod validation;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::DevgateError;
use model::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigVersion {
    Hash(String),
    /// No config file: built-in defaults plus command-line flags.
    Builtin,
}

impl ConfigVersion {
    /// Short display form used in health output.
    #[must_use]
    pub fn short(&self) -> String {
        match self {
            Self::Hash(h) => h.get(..8).unwrap_or(h).to_string(),
            Self::Builtin => "builtin".to_string(),
        }
    }
}

/// Where a running proxy gets its config from. `run` holds the active
/// source as `Box<dyn ConfigSource>`; native async fn in traits is not
/// dyn-compatible, hence `async_trait`.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Label for logs and the health endpoint, e.g. the file path.
    fn describe(&self) -> String;
    async fn load(&self) -> Result<(Config, ConfigVersion), DevgateError>;
    async fn has_changed(&self, current: &ConfigVersion) -> Result<bool, DevgateError>;
}

/// Values given on the command line. Applied after every load, so a
/// reloaded file never undoes a flag.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub target: Option<String>,
    pub timeout: Option<u64>,
    pub static_dir: Option<PathBuf>,
}

impl Overrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref target) = self.target {
            config.backend.target.clone_from(target);
        }
        if let Some(timeout) = self.timeout {
            config.backend.timeout = timeout;
        }
        if let Some(ref dir) = self.static_dir {
            config.local.static_dir = Some(dir.clone());
        }
    }

    /// Apply the overrides and re-validate, since a flag can carry a bad value.
    pub fn apply_and_validate(&self, config: &mut Config) -> Result<(), DevgateError> {
        self.apply(config);
        validation::validate(config).map_err(|errors| DevgateError::ConfigValidation { errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_loaded_values() {
        let mut config = Config::default();
        let overrides = Overrides {
            target: Some("http://api.local:9000/".into()),
            timeout: Some(1500),
            static_dir: Some(PathBuf::from("build")),
        };
        overrides.apply_and_validate(&mut config).unwrap();
        assert_eq!(config.backend.target, "http://api.local:9000/");
        assert_eq!(config.backend.timeout, 1500);
        assert_eq!(config.local.static_dir, Some(PathBuf::from("build")));
    }

    #[test]
    fn empty_overrides_keep_config() {
        let mut config = Config::default();
        config.backend.target = "http://backend:1234/".into();
        Overrides::default().apply(&mut config);
        assert_eq!(config.backend.target, "http://backend:1234/");
        assert!(config.local.static_dir.is_none());
    }

    #[test]
    fn bad_override_is_rejected() {
        let mut config = Config::default();
        let overrides = Overrides {
            target: Some("nowhere".into()),
            ..Overrides::default()
        };
        assert!(matches!(
            overrides.apply_and_validate(&mut config),
            Err(DevgateError::ConfigValidation { .. })
        ));
    }

    #[test]
    fn version_short_form() {
        let hash = ConfigVersion::Hash("0123456789abcdef".into());
        assert_eq!(hash.short(), "01234567");
        assert_eq!(ConfigVersion::Builtin.short(), "builtin");
    }
}
