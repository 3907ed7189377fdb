//! Drift detection
//!
//! Tracks the target and project used by the previous run. When either one
//! changes, the project build directory is destroyed and recreated before
//! collection starts.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::env::BuildEnv;
use crate::error::DriftError;
use crate::infra::filesystem;

/// Persisted fingerprints of the previous run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftRecord {
    #[serde(default)]
    pub previous_target_path: Option<PathBuf>,
    #[serde(default)]
    pub previous_project_path: Option<PathBuf>,
}

/// What drift detection decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftOutcome {
    /// Both fingerprints match, the build directory was kept
    Unchanged,
    /// The build directory was recreated
    Cleaned {
        target_changed: bool,
        project_changed: bool,
    },
}

impl DriftRecord {
    /// Record describing the current environment
    pub fn current(env: &BuildEnv) -> Self {
        Self {
            previous_target_path: Some(env.target_path.clone()),
            previous_project_path: Some(env.project_path.clone()),
        }
    }

    /// Load the record. A missing file is an empty record; an unparsable one
    /// is treated as empty too, which forces a clean.
    pub fn load(path: &Path) -> Result<Self, DriftError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| DriftError::Read {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable drift record {}: {e}", path.display());
            Self::default()
        }))
    }

    /// Persist the record
    pub fn save(&self, path: &Path) -> Result<(), DriftError> {
        let write_err = |error: String| DriftError::Write {
            path: path.to_path_buf(),
            error,
        };
        let content = serde_json::to_string_pretty(self).map_err(|e| write_err(e.to_string()))?;
        filesystem::write_file(path, &content).map_err(|e| write_err(e.to_string()))
    }
}

/// Compare the environment against the previous run and clean on change
pub fn check_drift(env: &BuildEnv) -> Result<DriftOutcome, DriftError> {
    let record_path = env.drift_record_path();
    let previous = DriftRecord::load(&record_path)?;
    let current = DriftRecord::current(env);

    let target_changed = previous.previous_target_path != current.previous_target_path;
    let project_changed = previous.previous_project_path != current.previous_project_path;

    if !target_changed && !project_changed {
        tracing::debug!("target and project unchanged");
        return Ok(DriftOutcome::Unchanged);
    }

    if target_changed {
        tracing::debug!(
            "target changed: {:?} -> {}",
            previous.previous_target_path,
            env.target_path.display()
        );
    }
    if project_changed {
        tracing::debug!(
            "project changed: {:?} -> {}",
            previous.previous_project_path,
            env.project_path.display()
        );
    }

    filesystem::recreate_dir(&env.project_build_dir())?;
    current.save(&record_path)?;

    Ok(DriftOutcome::Cleaned {
        target_changed,
        project_changed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn env_for(base: &Path, target: &str, project: &str) -> BuildEnv {
        BuildEnv::new(
            &base.join("sdk"),
            target,
            &base.join("sdk/targets").join(target),
            &base.join(project),
        )
    }

    fn stale_output(env: &BuildEnv) -> PathBuf {
        let stale = env.project_build_dir().join("stale.o");
        std::fs::create_dir_all(env.project_build_dir()).unwrap();
        std::fs::write(&stale, "obj").unwrap();
        stale
    }

    #[test]
    fn test_first_run_cleans_and_records() {
        let temp = TempDir::new().unwrap();
        let env = env_for(temp.path(), "esp32", "app");
        let stale = stale_output(&env);

        let outcome = check_drift(&env).unwrap();

        assert_eq!(
            outcome,
            DriftOutcome::Cleaned {
                target_changed: true,
                project_changed: true
            }
        );
        assert!(!stale.exists());
        assert!(env.project_build_dir().is_dir());
        assert_eq!(
            DriftRecord::load(&env.drift_record_path()).unwrap(),
            DriftRecord::current(&env)
        );
    }

    #[test]
    fn test_unchanged_environment_keeps_output() {
        let temp = TempDir::new().unwrap();
        let env = env_for(temp.path(), "esp32", "app");
        check_drift(&env).unwrap();
        let kept = stale_output(&env);

        let outcome = check_drift(&env).unwrap();

        assert_eq!(outcome, DriftOutcome::Unchanged);
        assert!(kept.exists());
    }

    #[test]
    fn test_target_change_cleans() {
        let temp = TempDir::new().unwrap();
        check_drift(&env_for(temp.path(), "esp32", "app")).unwrap();

        let env = env_for(temp.path(), "bl602", "app");
        let stale = stale_output(&env);
        let outcome = check_drift(&env).unwrap();

        assert_eq!(
            outcome,
            DriftOutcome::Cleaned {
                target_changed: true,
                project_changed: false
            }
        );
        assert!(!stale.exists());
    }

    #[test]
    fn test_project_change_cleans_new_project_build_dir() {
        let temp = TempDir::new().unwrap();
        check_drift(&env_for(temp.path(), "esp32", "app")).unwrap();

        let env = env_for(temp.path(), "esp32", "other");
        let stale = stale_output(&env);
        let outcome = check_drift(&env).unwrap();

        assert_eq!(
            outcome,
            DriftOutcome::Cleaned {
                target_changed: false,
                project_changed: true
            }
        );
        assert!(!stale.exists());
    }

    #[test]
    fn test_corrupt_record_forces_clean() {
        let temp = TempDir::new().unwrap();
        let env = env_for(temp.path(), "esp32", "app");
        std::fs::create_dir_all(env.root_build_dir()).unwrap();
        std::fs::write(env.drift_record_path(), "{not json").unwrap();

        let outcome = check_drift(&env).unwrap();

        assert!(matches!(outcome, DriftOutcome::Cleaned { .. }));
    }
}
