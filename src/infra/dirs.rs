//! Platform-specific directory management
//!
//! Provides the user configuration directory. `UNITBUILD_CONFIG_DIR`
//! overrides the platform default.

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the config directory
pub const ENV_CONFIG_DIR: &str = "UNITBUILD_CONFIG_DIR";

/// Application name used in directory paths
const APP_NAME: &str = "unitbuild";

/// Platform-specific directory provider for unitbuild
#[derive(Debug, Clone)]
pub struct UnitbuildDirs {
    config_dir: PathBuf,
}

impl UnitbuildDirs {
    /// Create a new `UnitbuildDirs` instance
    ///
    /// Checks the environment first, then falls back to platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
        }
    }

    /// Get the config directory path
    ///
    /// - Linux: `$XDG_CONFIG_HOME/unitbuild` or `~/.config/unitbuild`
    /// - macOS: `~/Library/Application Support/unitbuild`
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Get the global config file path
    #[must_use]
    pub fn global_config_path(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    fn resolve_config_dir() -> PathBuf {
        if let Ok(path) = env::var(ENV_CONFIG_DIR) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                // Fallback to home directory
                dirs::home_dir()
                    .map(|h| h.join(".config").join(APP_NAME))
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
            })
    }
}

impl Default for UnitbuildDirs {
    fn default() -> Self {
        Self::new()
    }
}
