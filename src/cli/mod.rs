//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no business logic - that belongs in the [`crate::core`] module.

pub mod commands;
pub mod output;

use anyhow::{Context, Result};
use clap::{Args, Parser};
use std::path::PathBuf;

use crate::core::env::{BuildEnv, ENV_PROJECT_PATH, ENV_ROOT, ENV_TARGET, ENV_TARGET_PATH};
use commands::Commands;

/// unitbuild - Build-description collector for embedded C projects
///
/// Collects per-directory unit declarations into a build manifest and a
/// configuration source, then hands off to target plugins.
#[derive(Parser, Debug)]
#[command(name = "unitbuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Do not dispatch plugin hooks
    #[arg(long, global = true)]
    pub no_hooks: bool,

    #[command(flatten)]
    pub env: EnvArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Locations of the SDK, target and project
#[derive(Args, Debug, Clone)]
pub struct EnvArgs {
    /// SDK root directory
    #[arg(long, env = ENV_ROOT, global = true)]
    pub root: Option<PathBuf>,

    /// Target name
    #[arg(long, env = ENV_TARGET, global = true)]
    pub target: Option<String>,

    /// Target configuration directory
    #[arg(long, env = ENV_TARGET_PATH, global = true)]
    pub target_path: Option<PathBuf>,

    /// Project directory
    #[arg(long, env = ENV_PROJECT_PATH, default_value = ".", global = true)]
    pub project: PathBuf,
}

impl EnvArgs {
    /// SDK root, required by every SDK-aware command
    pub fn root(&self) -> Result<PathBuf> {
        self.root
            .clone()
            .with_context(|| format!("SDK root not set, pass --root or set {ENV_ROOT}"))
    }

    /// Full build environment
    pub fn build_env(&self) -> Result<BuildEnv> {
        let root = self.root()?;
        let target = self
            .target
            .as_deref()
            .with_context(|| format!("Target not set, pass --target or set {ENV_TARGET}"))?;
        let target_path = self.target_path.as_deref().with_context(|| {
            format!("Target path not set, pass --target-path or set {ENV_TARGET_PATH}")
        })?;

        Ok(BuildEnv::new(&root, target, target_path, &self.project))
    }
}

/// Settings every command sees
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub env: EnvArgs,
    pub hooks_enabled: bool,
    pub quiet: bool,
}

impl Cli {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let ctx = CommandContext {
            env: self.env,
            hooks_enabled: !self.no_hooks,
            quiet: self.quiet,
        };

        if let Some(cmd) = self.command {
            cmd.run(&ctx).await
        } else {
            use clap::CommandFactory;
            let mut cmd = Self::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_build_env_requires_target() {
        let cli = Cli::try_parse_from(["unitbuild", "--root", "/sdk", "target"]).unwrap();
        let env = EnvArgs {
            target: None,
            target_path: None,
            ..cli.env
        };

        assert!(env.build_env().is_err());
        assert_eq!(env.root().unwrap(), PathBuf::from("/sdk"));
    }

    #[test]
    fn test_pass_through_args() {
        let cli = Cli::try_parse_from(["unitbuild", "build", "--", "-j4", "VERBOSE=1"]).unwrap();

        match cli.command {
            Some(Commands::Build { args }) => assert_eq!(args, vec!["-j4", "VERBOSE=1"]),
            other => panic!("Expected build command, got: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["unitbuild", "clean", "--no-hooks", "-vv"]).unwrap();

        assert!(cli.no_hooks);
        assert_eq!(cli.verbose, 2);
    }
}
