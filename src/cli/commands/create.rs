//! CLI implementation for `unitbuild create`

use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::output;
use crate::cli::CommandContext;
use crate::config::defaults::TEMPLATE_DIR;
use crate::core::project::create_project;

/// Execute the create command
pub fn execute(ctx: &CommandContext, current_dir: &Path, name: &str) -> Result<()> {
    let template = ctx.env.root()?.join(TEMPLATE_DIR);
    let dest = current_dir.join(name);

    let created = create_project(&template, &dest)
        .with_context(|| format!("Failed to create project '{name}'"))?;

    output::success(&format!("Created project at {}", created.display()));
    Ok(())
}
