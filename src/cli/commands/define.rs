//! CLI implementation for `unitbuild define`

use anyhow::Result;

use crate::cli::CommandContext;
use crate::core::symbols::SymbolTable;

/// Execute the define command
pub fn execute(ctx: &CommandContext, name: &str) -> Result<()> {
    let env = ctx.env.build_env()?;
    let symbols = SymbolTable::load(&env.symbol_candidates())?;

    match symbols.get(name) {
        Some(value) => println!("{value}"),
        None => anyhow::bail!("Symbol '{name}' is not defined"),
    }
    Ok(())
}
