//! unitbuild - Build-description collector for embedded C projects
//!
//! Walks an SDK and a project, evaluates each participating directory's
//! `unit.toml`, and produces a build manifest plus a configuration source
//! for the target's tooling.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Collection, manifest and configuration-tree logic
//! - [`registry`] - Component registry client
//! - [`infra`] - Infrastructure layer (network, filesystem, processes)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;
pub mod registry;
