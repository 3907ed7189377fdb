//! Collection pipeline
//!
//! drift check -> symbols -> plan -> collect -> persist. Nothing is written
//! to the project build directory until collection succeeded, so a failing
//! run leaves the previous outputs (or none) in place.

use std::path::PathBuf;

use crate::core::collect::{collect, BuildInfo};
use crate::core::config_tree::write_config_source;
use crate::core::declaration::EvalScope;
use crate::core::drift::{check_drift, DriftOutcome};
use crate::core::env::BuildEnv;
use crate::core::manifest::Manifest;
use crate::core::project::ProjectConfig;
use crate::core::symbols::SymbolTable;
use crate::error::UnitbuildError;
use crate::infra::filesystem;

/// What a pipeline run produced
#[derive(Debug)]
pub struct BuildReport {
    pub drift: DriftOutcome,
    pub manifest: Manifest,
    pub manifest_path: PathBuf,
    pub config_source_path: PathBuf,
    pub header_path: PathBuf,
}

/// Run the collection pipeline for a project
pub fn run_pipeline(env: &BuildEnv, config: &ProjectConfig) -> Result<BuildReport, UnitbuildError> {
    let drift = check_drift(env)?;
    if let DriftOutcome::Cleaned {
        target_changed,
        project_changed,
    } = drift
    {
        tracing::info!(
            "build directory cleaned (target changed: {target_changed}, project changed: {project_changed})"
        );
    }

    let symbols = SymbolTable::load(&env.symbol_candidates())?;
    match symbols.source() {
        Some(path) => tracing::debug!("{} symbols from {}", symbols.len(), path.display()),
        None => tracing::debug!("no symbol file found"),
    }

    let plan = BuildInfo::plan(env, &config.project.user_dirs)?;
    let scope = EvalScope {
        target: &env.target,
        symbols: &symbols,
    };
    let manifest = Manifest::new(
        &config.name_or(&env.project_name()),
        &env.header_dir(),
        config.project.compile_flags.clone(),
    );
    let manifest = collect(&plan, &env.namespace_roots(), &scope, manifest)?;

    plan.save(&env.build_info_path())?;
    let config_source_path = write_config_source(env, config.config.deep_scan)?;

    let header_path = env.header_path();
    filesystem::write_file(&header_path, &symbols.render_header())?;

    let manifest_path = env.manifest_path();
    manifest.save(&manifest_path)?;
    tracing::info!("manifest written to {}", manifest_path.display());

    Ok(BuildReport {
        drift,
        manifest,
        manifest_path,
        config_source_path,
        header_path,
    })
}
