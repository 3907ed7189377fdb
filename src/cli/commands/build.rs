//! CLI implementation for `unitbuild build`

use anyhow::{Context, Result};

use crate::cli::output;
use crate::cli::CommandContext;
use crate::core::env::BuildEnv;
use crate::core::hooks::{HookName, HookOutcome, PluginHooks};
use crate::core::pipeline::{run_pipeline, BuildReport};
use crate::core::project::ProjectConfig;

/// Load the project and run the collection pipeline
pub fn collect_project(env: &BuildEnv) -> Result<BuildReport> {
    let config = ProjectConfig::load(&env.project_path)?;

    let spinner = output::create_spinner("Collecting units...");
    let report = run_pipeline(env, &config);
    spinner.finish_and_clear();

    let report = report.with_context(|| {
        format!("Failed to collect project '{}'", env.project_path.display())
    })?;
    output::success(&format!(
        "Collected {} units into {}",
        report.manifest.unit_count(),
        report.manifest_path.display()
    ));
    Ok(report)
}

/// Dispatch a hook and report the outcome
pub async fn dispatch_hook(
    ctx: &CommandContext,
    env: &BuildEnv,
    hook: HookName,
    args: &[String],
) -> Result<HookOutcome> {
    let mut hooks = PluginHooks::new(env, ctx.hooks_enabled);
    if ctx.quiet {
        hooks = hooks.quiet();
    }

    let outcome = hooks.dispatch(hook, args).await?;
    if outcome == HookOutcome::Missing {
        tracing::debug!("target '{}' has no '{hook}' hook", env.target);
    }
    Ok(outcome)
}

/// Execute the build command
pub async fn execute(ctx: &CommandContext, args: &[String]) -> Result<()> {
    let env = ctx.env.build_env()?;
    collect_project(&env)?;
    dispatch_hook(ctx, &env, HookName::Build, args).await?;
    Ok(())
}
