//! Build environment
//!
//! The resolved SDK root, target and project, plus every path derived from
//! them. One value is built per invocation and passed down explicitly.

use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::core::unit::NamespaceRoots;
use crate::infra::filesystem::resolve_path;

/// Environment variable names shared with hooks
pub const ENV_ROOT: &str = "UNITBUILD_ROOT";
pub const ENV_TARGET: &str = "UNITBUILD_TARGET";
pub const ENV_TARGET_PATH: &str = "UNITBUILD_TARGET_PATH";
pub const ENV_PROJECT_PATH: &str = "UNITBUILD_PROJECT_PATH";
pub const ENV_PROJECT: &str = "UNITBUILD_PROJECT";

/// Resolved locations for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildEnv {
    /// SDK root
    pub root: PathBuf,
    /// Target name
    pub target: String,
    /// Target configuration directory
    pub target_path: PathBuf,
    /// Project directory
    pub project_path: PathBuf,
}

impl BuildEnv {
    /// Create an environment, resolving every path
    pub fn new(root: &Path, target: &str, target_path: &Path, project_path: &Path) -> Self {
        Self {
            root: resolve_path(root),
            target: target.to_string(),
            target_path: resolve_path(target_path),
            project_path: resolve_path(project_path),
        }
    }

    /// Project name derived from the project directory
    pub fn project_name(&self) -> String {
        self.project_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    // Project side

    pub fn project_file(&self) -> PathBuf {
        self.project_path.join(defaults::PROJECT_FILE)
    }

    pub fn project_build_dir(&self) -> PathBuf {
        self.project_path.join(defaults::BUILD_DIR)
    }

    pub fn build_info_path(&self) -> PathBuf {
        self.project_build_dir().join(defaults::BUILD_INFO_FILE)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.project_build_dir().join(defaults::MANIFEST_FILE)
    }

    pub fn config_source_path(&self) -> PathBuf {
        self.project_build_dir().join(defaults::CONFIG_SOURCE_FILE)
    }

    /// Generated configuration header directory, added to every unit
    pub fn header_dir(&self) -> PathBuf {
        self.project_build_dir().join(defaults::HEADER_DIR)
    }

    pub fn header_path(&self) -> PathBuf {
        self.header_dir().join(defaults::HEADER_FILE)
    }

    pub fn project_components_dir(&self) -> PathBuf {
        self.project_path.join(defaults::COMPONENTS_DIR)
    }

    pub fn entry_point_dir(&self) -> PathBuf {
        self.project_path.join(defaults::ENTRY_POINT_NAME)
    }

    // SDK side

    pub fn root_build_dir(&self) -> PathBuf {
        self.root.join(defaults::BUILD_DIR)
    }

    pub fn drift_record_path(&self) -> PathBuf {
        self.root_build_dir().join(defaults::DRIFT_RECORD_FILE)
    }

    pub fn public_components_dir(&self) -> PathBuf {
        self.root.join(defaults::COMPONENTS_DIR)
    }

    pub fn root_fragment(&self) -> PathBuf {
        self.root.join(defaults::FRAGMENT_FILE)
    }

    pub fn boards_fragment(&self) -> PathBuf {
        self.root
            .join(defaults::BOARDS_DIR)
            .join(defaults::FRAGMENT_FILE)
    }

    /// Parent of every port directory
    pub fn port_root(&self) -> PathBuf {
        self.root.join(defaults::PORT_DIR)
    }

    /// Port unit directory of the current target
    pub fn port_dir(&self) -> PathBuf {
        self.port_root().join(&self.target)
    }

    pub fn plugin_dir(&self) -> PathBuf {
        self.root.join(defaults::PLUGINS_DIR).join(&self.target)
    }

    pub fn template_dir(&self) -> PathBuf {
        self.root.join(defaults::TEMPLATE_DIR)
    }

    pub fn target_description_path(&self) -> PathBuf {
        self.target_path.join(defaults::TARGET_DESCRIPTION_FILE)
    }

    /// Symbol files in lookup order: project values, project defaults,
    /// target defaults
    pub fn symbol_candidates(&self) -> Vec<PathBuf> {
        vec![
            self.project_path.join(defaults::SYMBOL_FILE),
            self.project_path.join(defaults::SYMBOL_DEFAULTS_FILE),
            self.target_path.join(defaults::SYMBOL_DEFAULTS_FILE),
        ]
    }

    /// Roots used to classify unit directories
    pub fn namespace_roots(&self) -> NamespaceRoots {
        NamespaceRoots::new(
            defaults::ENTRY_POINT_NAME,
            &self.port_root(),
            &self.public_components_dir(),
            &self.project_components_dir(),
        )
    }

    /// Variables exported to hook processes
    pub fn hook_env(&self) -> Vec<(String, String)> {
        vec![
            (ENV_ROOT.to_string(), self.root.display().to_string()),
            (ENV_TARGET.to_string(), self.target.clone()),
            (
                ENV_TARGET_PATH.to_string(),
                self.target_path.display().to_string(),
            ),
            (
                ENV_PROJECT_PATH.to_string(),
                self.project_path.display().to_string(),
            ),
            (ENV_PROJECT.to_string(), self.project_name()),
        ]
    }
}
