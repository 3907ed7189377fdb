//! Project configuration (`project.toml`)
//!
//! A directory is a project when it holds `project.toml`. String values may
//! reference environment variables with `${VAR}`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::defaults::PROJECT_FILE;
use crate::error::ProjectError;
use crate::infra::filesystem;

/// Parsed `project.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project settings
    #[serde(default)]
    pub project: ProjectSection,

    /// Configuration-source settings
    #[serde(default)]
    pub config: ConfigSection,
}

/// `[project]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSection {
    /// Project name, defaults to the directory name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Global compile flags
    #[serde(default)]
    pub compile_flags: Vec<String>,

    /// Extra unit directories, globs allowed
    #[serde(default)]
    pub user_dirs: Vec<String>,
}

/// `[config]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSection {
    /// Scan each unit directory's whole subtree for fragments instead of
    /// only its top-level one
    #[serde(default)]
    pub deep_scan: bool,
}

/// Substitute `${VAR}` references with environment values.
///
/// Unset variables become empty strings.
pub fn substitute_env_vars(input: &str) -> String {
    let Ok(re) = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}") else {
        return input.to_string();
    };

    re.replace_all(input, |caps: &regex::Captures<'_>| {
        std::env::var(&caps[1]).unwrap_or_default()
    })
    .into_owned()
}

fn substitute_in_value(value: &mut toml::Value) {
    match value {
        toml::Value::String(s) => *s = substitute_env_vars(s),
        toml::Value::Array(items) => items.iter_mut().for_each(substitute_in_value),
        toml::Value::Table(table) => table
            .iter_mut()
            .for_each(|(_, v)| substitute_in_value(v)),
        _ => {}
    }
}

impl ProjectConfig {
    /// Parse content, substituting environment variables in string values
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let mut value: toml::Value = toml::from_str(content)?;
        substitute_in_value(&mut value);
        Self::deserialize(value)
    }

    /// Load `project.toml` from a project directory
    pub fn load(project_dir: &Path) -> Result<Self, ProjectError> {
        let path = project_dir.join(PROJECT_FILE);
        if !path.is_file() {
            return Err(ProjectError::NotAProject {
                path: project_dir.to_path_buf(),
            });
        }

        let content = filesystem::read_file(&path)?;
        Self::from_toml(&content).map_err(|e| ProjectError::InvalidConfig {
            path,
            error: e.to_string(),
        })
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Effective project name
    pub fn name_or(&self, fallback: &str) -> String {
        self.project
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Whether `dir` is a project directory
pub fn is_project(dir: &Path) -> bool {
    dir.join(PROJECT_FILE).is_file()
}

/// Fail unless `dir` is a project directory
pub fn ensure_project(dir: &Path) -> Result<(), ProjectError> {
    if is_project(dir) {
        Ok(())
    } else {
        Err(ProjectError::NotAProject {
            path: dir.to_path_buf(),
        })
    }
}

/// Create a new project at `dest` by copying `template`.
///
/// The copied `project.toml` gets its name set to the destination's
/// directory name.
pub fn create_project(template: &Path, dest: &Path) -> Result<PathBuf, ProjectError> {
    if dest.exists() {
        return Err(ProjectError::AlreadyExists {
            path: dest.to_path_buf(),
        });
    }
    if !template.is_dir() {
        return Err(ProjectError::TemplateNotFound {
            path: template.to_path_buf(),
        });
    }

    filesystem::copy_dir_all(template, dest)?;

    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut config = if is_project(dest) {
        ProjectConfig::load(dest)?
    } else {
        ProjectConfig::default()
    };
    config.project.name = Some(name);

    let content = config.to_toml().map_err(|e| ProjectError::InvalidConfig {
        path: dest.join(PROJECT_FILE),
        error: e.to_string(),
    })?;
    filesystem::write_file(&dest.join(PROJECT_FILE), &content)?;

    tracing::info!("Created project at {}", dest.display());
    Ok(dest.to_path_buf())
}
