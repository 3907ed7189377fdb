//! Target description (`target.json`)

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::env::BuildEnv;
use crate::error::UnitbuildError;
use crate::infra::filesystem;

#[derive(Debug, Clone, Default, Deserialize)]
struct TargetDescription {
    #[serde(default)]
    sdks: SdkSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SdkSection {
    #[serde(default)]
    dir: Option<String>,
}

/// What `unitbuild target` reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetInfo {
    pub name: String,
    pub path: PathBuf,
    /// Vendor SDK directory, `<root>/sdks/<dir>`
    pub sdk_dir: Option<PathBuf>,
}

/// SDK directory named by a target description, if any
pub fn sdk_dir(description: &Path, root: &Path) -> Result<Option<PathBuf>, UnitbuildError> {
    if !description.is_file() {
        return Ok(None);
    }
    let content = filesystem::read_file(description)?;
    let parsed: TargetDescription =
        serde_json::from_str(&content).map_err(|e| UnitbuildError::Serialize {
            path: description.to_path_buf(),
            error: e.to_string(),
        })?;

    Ok(parsed
        .sdks
        .dir
        .filter(|d| !d.is_empty())
        .map(|d| root.join("sdks").join(d)))
}

/// Describe the environment's target
pub fn target_info(env: &BuildEnv) -> Result<TargetInfo, UnitbuildError> {
    Ok(TargetInfo {
        name: env.target.clone(),
        path: env.target_path.clone(),
        sdk_dir: sdk_dir(&env.target_description_path(), &env.root)?,
    })
}
