//! CLI implementation for `unitbuild install` and `unitbuild uninstall`

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::cli::commands::search::registry_client;
use crate::cli::output;
use crate::cli::CommandContext;
use crate::config::defaults::COMPONENTS_DIR;
use crate::core::install::{install_component, uninstall_component};
use crate::core::project::ensure_project;
use crate::infra::download::{DownloadManager, ProgressCallback};

/// Components directory an install targets
fn components_dir(ctx: &CommandContext, global: bool) -> Result<PathBuf> {
    if global {
        return Ok(ctx.env.root()?.join(COMPONENTS_DIR));
    }
    ensure_project(&ctx.env.project)?;
    Ok(ctx.env.project.join(COMPONENTS_DIR))
}

/// Execute the install command
pub async fn install(
    ctx: &CommandContext,
    name: &str,
    version: Option<&str>,
    global: bool,
    registry: Option<String>,
) -> Result<()> {
    let dir = components_dir(ctx, global)?;
    let client = registry_client(registry)?;

    let bar = output::create_download_bar(0);
    let progress_bar = bar.clone();
    let progress: ProgressCallback = Box::new(move |done, total| {
        progress_bar.set_length(total);
        progress_bar.set_position(done);
    });

    let result = install_component(
        &client,
        &DownloadManager::new(),
        &dir,
        name,
        version,
        Some(&progress),
    )
    .await;
    bar.finish_and_clear();

    let installed = result.with_context(|| format!("Failed to install '{name}'"))?;
    output::success(&format!(
        "Installed {}:{} into {}",
        installed.name,
        installed.version,
        installed.path.display()
    ));
    Ok(())
}

/// Execute the uninstall command
pub fn uninstall(ctx: &CommandContext, name: &str, global: bool) -> Result<()> {
    let dir = components_dir(ctx, global)?;
    let removed = uninstall_component(&dir, name)?;
    output::success(&format!("Removed {}", removed.display()));
    Ok(())
}
