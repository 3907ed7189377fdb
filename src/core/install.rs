//! Component install and uninstall
//!
//! Components are zip archives served by the registry. Installing one
//! resolves its download descriptor, fetches the archive, verifies the
//! SHA256 and extracts it into `<components>/<name>`.

use std::path::{Path, PathBuf};

use crate::config::defaults::LATEST_VERSION;
use crate::error::InstallError;
use crate::infra::download::{extract_zip, DownloadManager, ProgressCallback};
use crate::infra::filesystem;
use crate::registry::RegistryClient;

/// A completed install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledComponent {
    pub name: String,
    pub version: String,
    pub path: PathBuf,
}

/// Check a requested version. `last` and full semver versions are accepted.
pub fn validate_version(version: &str) -> Result<(), InstallError> {
    if version == LATEST_VERSION {
        return Ok(());
    }
    semver::Version::parse(version)
        .map(|_| ())
        .map_err(|e| InstallError::InvalidVersion {
            version: version.to_string(),
            error: e.to_string(),
        })
}

/// Install a component into `components_dir`
pub async fn install_component(
    registry: &RegistryClient,
    downloads: &DownloadManager,
    components_dir: &Path,
    name: &str,
    version: Option<&str>,
    progress: Option<&ProgressCallback>,
) -> Result<InstalledComponent, InstallError> {
    let version = version.unwrap_or(LATEST_VERSION);
    let dest = components_dir.join(name);

    if dest.exists() {
        return Err(InstallError::AlreadyInstalled {
            name: name.to_string(),
            path: dest,
        });
    }
    validate_version(version)?;

    let descriptor = registry.download_info(name, version).await?;
    tracing::debug!("{name}:{version} -> {}", descriptor.url);

    let archive = downloads
        .download_verified(name, &descriptor.url, &descriptor.file_hash, progress)
        .await?;

    if let Err(e) = extract_zip(&archive.content, &dest) {
        // Leave no half-extracted component behind
        let _ = filesystem::remove_dir_all(&dest);
        return Err(e.into());
    }

    Ok(InstalledComponent {
        name: name.to_string(),
        version: version.to_string(),
        path: dest,
    })
}

/// Remove an installed component
pub fn uninstall_component(components_dir: &Path, name: &str) -> Result<PathBuf, InstallError> {
    let dest = components_dir.join(name);
    if !dest.is_dir() {
        return Err(InstallError::NotInstalled {
            name: name.to_string(),
            path: dest,
        });
    }
    filesystem::remove_dir_all(&dest)?;
    Ok(dest)
}
