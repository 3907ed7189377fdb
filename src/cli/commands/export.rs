//! CLI implementation for `unitbuild export` and `unitbuild update`

use anyhow::Result;
use std::path::Path;

use crate::cli::commands::build::{collect_project, dispatch_hook};
use crate::cli::output;
use crate::cli::CommandContext;
use crate::core::export::{validate_destination, ExportMode};
use crate::core::hooks::HookName;
use crate::core::project::ensure_project;

/// Execute the export or update command
pub async fn execute(
    ctx: &CommandContext,
    dest: &Path,
    args: &[String],
    mode: ExportMode,
) -> Result<()> {
    let env = ctx.env.build_env()?;
    ensure_project(&env.project_path)?;
    let dest = validate_destination(&env.project_path, dest, mode)?;

    collect_project(&env)?;

    let hook = match mode {
        ExportMode::Export => HookName::Export,
        ExportMode::Update => HookName::Update,
    };
    let mut hook_args = vec![dest.display().to_string()];
    hook_args.extend_from_slice(args);
    dispatch_hook(ctx, &env, hook, &hook_args).await?;

    output::success(&format!("{hook} -> {}", dest.display()));
    Ok(())
}
