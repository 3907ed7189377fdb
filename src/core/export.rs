//! Export and update destination checks
//!
//! `export` writes a fresh vendor-SDK project through the target's hook;
//! `update` refreshes one written earlier. Both only validate here and leave
//! the actual writing to the hook.

use std::path::{Path, PathBuf};

use crate::error::ProjectError;
use crate::infra::filesystem::{is_within, resolve_path};

/// Which operation the destination is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    /// Destination must not exist yet
    Export,
    /// Destination must already exist
    Update,
}

/// Validate an export/update destination, returning it resolved
pub fn validate_destination(
    project: &Path,
    dest: &Path,
    mode: ExportMode,
) -> Result<PathBuf, ProjectError> {
    let invalid = |reason: &str| ProjectError::InvalidDestination {
        path: dest.to_path_buf(),
        reason: reason.to_string(),
    };

    match mode {
        ExportMode::Export => {
            if dest.exists() {
                return Err(invalid("already exists, use 'update' to refresh it"));
            }
            if is_within(project, dest) {
                return Err(invalid("must not be inside the project"));
            }
            if is_within(dest, project) {
                return Err(invalid("must not contain the project"));
            }
        }
        ExportMode::Update => {
            if !dest.is_dir() {
                return Err(invalid("does not exist, use 'export' to create it"));
            }
        }
    }

    Ok(resolve_path(dest))
}
