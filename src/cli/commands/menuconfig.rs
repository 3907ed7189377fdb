//! CLI implementation for `unitbuild menuconfig`

use anyhow::Result;

use crate::cli::commands::build::{collect_project, dispatch_hook};
use crate::cli::output::{self, status};
use crate::cli::CommandContext;
use crate::core::hooks::{HookName, HookOutcome};

/// Execute the menuconfig command
pub async fn execute(ctx: &CommandContext, args: &[String]) -> Result<()> {
    let env = ctx.env.build_env()?;
    let report = collect_project(&env)?;

    if dispatch_hook(ctx, &env, HookName::Menuconfig, args).await? == HookOutcome::Missing
        && !output::is_quiet()
    {
        eprintln!(
            "{} Target '{}' has no configuration editor; the source is at {}",
            status::WARNING,
            env.target,
            report.config_source_path.display()
        );
    }
    Ok(())
}
