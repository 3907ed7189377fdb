//! Filesystem operations
//!
//! Handles file and directory operations.

use std::path::{Component, Path, PathBuf};

use crate::error::FilesystemError;

/// Create a directory and all parent directories
pub fn create_dir_all(path: &Path) -> Result<(), FilesystemError> {
    std::fs::create_dir_all(path).map_err(|e| FilesystemError::CreateDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Remove a directory and all its contents
pub fn remove_dir_all(path: &Path) -> Result<(), FilesystemError> {
    if path.exists() {
        std::fs::remove_dir_all(path).map_err(|e| FilesystemError::RemoveDir {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
    }
    Ok(())
}

/// Remove a directory wholesale and create it again empty
pub fn recreate_dir(path: &Path) -> Result<(), FilesystemError> {
    remove_dir_all(path)?;
    create_dir_all(path)
}

/// Write content to a file
pub fn write_file(path: &Path, content: &str) -> Result<(), FilesystemError> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    std::fs::write(path, content).map_err(|e| FilesystemError::WriteFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Write content to a sibling temp file, then rename it over `path`.
///
/// Readers never observe a partially written file.
pub fn write_file_atomic(path: &Path, content: &str) -> Result<(), FilesystemError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));

    write_file(&tmp, content)?;
    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        FilesystemError::WriteFile {
            path: path.to_path_buf(),
            error: e.to_string(),
        }
    })
}

/// Read content from a file
pub fn read_file(path: &Path) -> Result<String, FilesystemError> {
    std::fs::read_to_string(path).map_err(|e| FilesystemError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Recursively copy a directory tree
pub fn copy_dir_all(from: &Path, to: &Path) -> Result<(), FilesystemError> {
    let copy_err = |e: &dyn std::fmt::Display| FilesystemError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        error: e.to_string(),
    };

    for entry in walkdir::WalkDir::new(from) {
        let entry = entry.map_err(|e| copy_err(&e))?;
        let relative = entry.path().strip_prefix(from).map_err(|e| copy_err(&e))?;
        let dest = to.join(relative);

        if entry.file_type().is_dir() {
            create_dir_all(&dest)?;
        } else {
            if let Some(parent) = dest.parent() {
                create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &dest).map_err(|e| copy_err(&e))?;
        }
    }
    Ok(())
}

/// Make `path` absolute and canonical.
///
/// Existing paths are canonicalized through the filesystem (symlinks resolved).
/// Missing paths are normalized lexically, with the longest existing ancestor
/// canonicalized so both forms agree on prefixes.
pub fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    let normalized = normalize_lexically(&absolute);

    let mut existing = normalized.as_path();
    let mut tail = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name.to_os_string());
                existing = parent;
            }
            _ => return normalized,
        }
    }

    let mut resolved = existing
        .canonicalize()
        .unwrap_or_else(|_| existing.to_path_buf());
    for name in tail.iter().rev() {
        resolved.push(name);
    }
    resolved
}

/// Remove `.` and `..` components without touching the filesystem
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Check whether `child` is `parent` or lies below it
pub fn is_within(parent: &Path, child: &Path) -> bool {
    resolve_path(child).starts_with(resolve_path(parent))
}
