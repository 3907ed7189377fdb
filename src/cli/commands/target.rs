//! CLI implementation for `unitbuild target`

use anyhow::Result;

use crate::cli::CommandContext;
use crate::core::target::target_info;

/// Execute the target command
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let info = target_info(&ctx.env.build_env()?)?;

    println!("Target:      {}", info.name);
    println!("Target path: {}", info.path.display());
    match info.sdk_dir {
        Some(dir) => println!("SDK:         {}", dir.display()),
        None => println!("SDK:         (none)"),
    }
    Ok(())
}
