//! CLI implementation for `unitbuild flash`

use anyhow::Result;

use crate::cli::commands::build::dispatch_hook;
use crate::cli::CommandContext;
use crate::core::hooks::HookName;
use crate::core::project::ensure_project;

/// Execute the flash command
pub async fn execute(ctx: &CommandContext, args: &[String]) -> Result<()> {
    let env = ctx.env.build_env()?;
    ensure_project(&env.project_path)?;
    dispatch_hook(ctx, &env, HookName::Flash, args).await?;
    Ok(())
}
