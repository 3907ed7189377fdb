//! Core business logic module
//!
//! # Submodules
//!
//! - [`unit`] - Namespaces, units and directory classification
//! - [`declaration`] - Declaration file (`unit.toml`) parsing and conditions
//! - [`symbols`] - Configuration symbol lookup and header rendering
//! - [`env`] - Build environment and derived paths
//! - [`project`] - Project configuration (`project.toml`) and creation
//! - [`manifest`] - Build manifest and the declare-unit operation
//! - [`collect`] - Participation plan and collection driver
//! - [`drift`] - Drift detection
//! - [`config_tree`] - Configuration source assembly
//! - [`pipeline`] - The full collection pipeline
//! - [`clean`] - Clean build output
//! - [`hooks`] - Plugin hook dispatch
//! - [`export`] - Export/update destination checks
//! - [`install`] - Component install and uninstall
//! - [`target`] - Target description
//! - [`global_config`] - Global configuration management

pub mod clean;
pub mod collect;
pub mod config_tree;
pub mod declaration;
pub mod drift;
pub mod env;
pub mod export;
pub mod global_config;
pub mod hooks;
pub mod install;
pub mod manifest;
pub mod pipeline;
pub mod project;
pub mod symbols;
pub mod target;
pub mod unit;
