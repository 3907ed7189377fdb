//! Clean logic
//!
//! Removes everything under the project build directory and leaves the
//! directory itself in place. The drift record is untouched, so the next
//! build does not clean again.

use crate::core::env::BuildEnv;
use crate::error::FilesystemError;

/// Result of a clean
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CleanResult {
    /// Whether there was a build directory to clean
    pub existed: bool,
}

/// Recreate the project build directory empty
pub fn clean_project(env: &BuildEnv) -> Result<CleanResult, FilesystemError> {
    let build_dir = env.project_build_dir();
    let existed = build_dir.exists();

    crate::infra::filesystem::recreate_dir(&build_dir)?;
    tracing::debug!("cleaned {}", build_dir.display());

    Ok(CleanResult { existed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn env(temp: &TempDir) -> BuildEnv {
        std::fs::create_dir_all(temp.path().join("app")).unwrap();
        BuildEnv::new(
            &temp.path().join("sdk"),
            "esp32",
            &temp.path().join("sdk/targets/esp32"),
            &temp.path().join("app"),
        )
    }

    #[test]
    fn test_clean_empties_build_dir() {
        let temp = TempDir::new().unwrap();
        let env = env(&temp);
        std::fs::create_dir_all(env.header_dir()).unwrap();
        std::fs::write(env.manifest_path(), "{}").unwrap();

        let result = clean_project(&env).unwrap();

        assert!(result.existed);
        assert!(env.project_build_dir().is_dir());
        assert!(!env.manifest_path().exists());
        assert!(!env.header_dir().exists());
    }

    #[test]
    fn test_clean_without_build_dir() {
        let temp = TempDir::new().unwrap();
        let env = env(&temp);

        let result = clean_project(&env).unwrap();

        assert!(!result.existed);
        assert!(env.project_build_dir().is_dir());
    }
}
