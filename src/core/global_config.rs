//! Global configuration management
//!
//! Reads user-wide settings from `config.toml` in the config directory.
//! Only the registry location is configurable for now.

use crate::infra::dirs::UnitbuildDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Global configuration error types
#[derive(Error, Debug)]
pub enum GlobalConfigError {
    /// Failed to read or write the config file
    #[error("Failed to access config file '{path}': {error}")]
    Io { path: String, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    Parse { path: String, error: String },
}

/// Global configuration for unitbuild
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Registry settings
    #[serde(default)]
    pub registry: RegistryConfig,
}

/// Registry configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Custom component registry URL
    pub url: Option<String>,
}

impl GlobalConfig {
    /// Load global configuration from the config directory
    ///
    /// A missing file yields the defaults; an invalid one is an error.
    pub fn load(dirs: &UnitbuildDirs) -> Result<Self, GlobalConfigError> {
        Self::load_from_path(&dirs.global_config_path())
    }

    /// Load global configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, GlobalConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| GlobalConfigError::Io {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| GlobalConfigError::Parse {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    /// Save global configuration to a specific path, creating parents
    pub fn save_to_path(&self, path: &Path) -> Result<(), GlobalConfigError> {
        let io_err = |p: &Path, e: std::io::Error| GlobalConfigError::Io {
            path: p.display().to_string(),
            error: e.to_string(),
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| GlobalConfigError::Parse {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        fs::write(path, content).map_err(|e| io_err(path, e))
    }

    /// Effective component registry URL
    #[must_use]
    pub fn registry_url(&self) -> &str {
        self.registry
            .url
            .as_deref()
            .unwrap_or(crate::config::urls::COMPONENT_REGISTRY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_returns_default() {
        let temp = TempDir::new().unwrap();
        let config = GlobalConfig::load_from_path(&temp.path().join("config.toml")).unwrap();

        assert_eq!(config, GlobalConfig::default());
        assert_eq!(config.registry_url(), crate::config::urls::COMPONENT_REGISTRY);
    }

    #[test]
    fn test_custom_registry_url() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[registry]\nurl = \"http://localhost:9000\"\n").unwrap();

        let config = GlobalConfig::load_from_path(&path).unwrap();

        assert_eq!(config.registry_url(), "http://localhost:9000");
    }

    #[test]
    fn test_invalid_file_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "registry = [").unwrap();

        let result = GlobalConfig::load_from_path(&path);
        assert!(matches!(result, Err(GlobalConfigError::Parse { .. })));
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let config = GlobalConfig {
            registry: RegistryConfig {
                url: Some("http://mirror.local".to_string()),
            },
        };

        config.save_to_path(&path).unwrap();

        assert_eq!(GlobalConfig::load_from_path(&path).unwrap(), config);
    }
}
