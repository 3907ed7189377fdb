//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod build;
pub mod clean;
pub mod create;
pub mod define;
pub mod export;
pub mod flash;
pub mod install;
pub mod menuconfig;
pub mod search;
pub mod target;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use crate::cli::CommandContext;
use crate::core::export::ExportMode;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collect units, then run the target's build hook
    Build {
        /// Arguments passed to the hook
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },

    /// Empty the project build directory
    Clean {
        /// Arguments passed to the hook
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },

    /// Collect units, then run the target's configuration editor hook
    Menuconfig {
        /// Arguments passed to the hook
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },

    /// Run the target's flash hook
    Flash {
        /// Arguments passed to the hook
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },

    /// Create a new project from the SDK template
    Create {
        /// Project directory name
        name: String,
    },

    /// Export the project into a vendor-SDK project
    Export {
        /// Destination directory (must not exist)
        dest: PathBuf,

        /// Arguments passed to the hook
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },

    /// Refresh a previously exported vendor-SDK project
    Update {
        /// Destination directory (must exist)
        dest: PathBuf,

        /// Arguments passed to the hook
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },

    /// Install a component from the registry
    Install {
        /// Component name
        name: String,

        /// Component version (default: latest)
        #[arg(long)]
        version: Option<String>,

        /// Install into the SDK's global components
        #[arg(short, long)]
        global: bool,

        /// Use custom registry
        #[arg(long)]
        registry: Option<String>,
    },

    /// Remove an installed component
    Uninstall {
        /// Component name
        name: String,

        /// Remove from the SDK's global components
        #[arg(short, long)]
        global: bool,
    },

    /// Search the component registry
    Search {
        /// Search keyword
        keyword: String,

        /// Use custom registry
        #[arg(long)]
        registry: Option<String>,
    },

    /// Show the current target
    Target,

    /// Print the value of a configuration symbol
    Define {
        /// Symbol name, with or without the CONFIG_ prefix
        name: String,
    },
}

impl Commands {
    /// Execute the command
    pub async fn run(self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Build { args } => build::execute(ctx, &args).await,
            Self::Clean { args } => clean::execute(ctx, &args).await,
            Self::Menuconfig { args } => menuconfig::execute(ctx, &args).await,
            Self::Flash { args } => flash::execute(ctx, &args).await,
            Self::Create { name } => {
                let current_dir = std::env::current_dir()?;
                create::execute(ctx, &current_dir, &name)
            }
            Self::Export { dest, args } => {
                export::execute(ctx, &dest, &args, ExportMode::Export).await
            }
            Self::Update { dest, args } => {
                export::execute(ctx, &dest, &args, ExportMode::Update).await
            }
            Self::Install {
                name,
                version,
                global,
                registry,
            } => install::install(ctx, &name, version.as_deref(), global, registry).await,
            Self::Uninstall { name, global } => install::uninstall(ctx, &name, global),
            Self::Search { keyword, registry } => search::execute(&keyword, registry).await,
            Self::Target => target::execute(ctx),
            Self::Define { name } => define::execute(ctx, &name),
        }
    }
}
