//! CLI implementation for `unitbuild clean`

use anyhow::{Context, Result};

use crate::cli::commands::build::dispatch_hook;
use crate::cli::output;
use crate::cli::CommandContext;
use crate::core::clean::clean_project;
use crate::core::hooks::HookName;
use crate::core::project::ensure_project;

/// Execute the clean command
pub async fn execute(ctx: &CommandContext, args: &[String]) -> Result<()> {
    let env = ctx.env.build_env()?;
    ensure_project(&env.project_path)?;

    let result = clean_project(&env).with_context(|| "Failed to clean build output")?;
    if result.existed {
        output::success(&format!("Cleaned {}", env.project_build_dir().display()));
    } else {
        output::success("Nothing to clean");
    }

    dispatch_hook(ctx, &env, HookName::Clean, args).await?;
    Ok(())
}
