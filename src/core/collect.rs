//! Collection phase
//!
//! Decides which directories take part in a build, in which order, and
//! evaluates each one's declaration file exactly once.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::defaults::DECLARATION_FILE;
use crate::core::declaration::{Declaration, DeclarationFile, EvalScope};
use crate::core::env::BuildEnv;
use crate::core::manifest::{DeclarationContext, Manifest};
use crate::core::unit::{Namespace, NamespaceRoots};
use crate::error::{CollectError, UnitbuildError};
use crate::infra::filesystem::{self, resolve_path};
use crate::infra::glob::GlobPattern;

/// Participating unit directories per namespace, persisted as
/// `build_info.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    #[serde(default)]
    pub public_port: Vec<PathBuf>,
    #[serde(default)]
    pub public_components: Vec<PathBuf>,
    #[serde(default)]
    pub user_components: Vec<PathBuf>,
    #[serde(default)]
    pub user_dirs: Vec<PathBuf>,
    #[serde(default)]
    pub user_main: Vec<PathBuf>,
}

fn has_declaration(dir: &Path) -> bool {
    dir.join(DECLARATION_FILE).is_file()
}

/// Immediate subdirectories of `root` holding a declaration file, by name
fn participating_children(root: &Path) -> Result<Vec<PathBuf>, CollectError> {
    if !root.is_dir() {
        tracing::debug!("{} does not exist, skipping", root.display());
        return Ok(Vec::new());
    }

    let mut dirs = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| CollectError::Scan {
            path: root.to_path_buf(),
            error: e.to_string(),
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        if has_declaration(entry.path()) {
            dirs.push(resolve_path(entry.path()));
        } else {
            tracing::debug!("no {DECLARATION_FILE} in {}, skipping", entry.path().display());
        }
    }
    Ok(dirs)
}

impl BuildInfo {
    /// Directories of a namespace, in evaluation order
    pub fn dirs(&self, ns: Namespace) -> &[PathBuf] {
        match ns {
            Namespace::Port => &self.public_port,
            Namespace::PublicComponents => &self.public_components,
            Namespace::UserComponents => &self.user_components,
            Namespace::UserDirs => &self.user_dirs,
            Namespace::Main => &self.user_main,
        }
    }

    /// Every planned directory, in evaluation order
    pub fn iter(&self) -> impl Iterator<Item = (Namespace, &Path)> {
        Namespace::ALL
            .into_iter()
            .flat_map(move |ns| self.dirs(ns).iter().map(move |d| (ns, d.as_path())))
    }

    /// The entry-point directory
    pub fn entry_point(&self) -> Option<&Path> {
        self.user_main.first().map(PathBuf::as_path)
    }

    /// Build the participation plan.
    ///
    /// `user_dirs` entries are resolved against the project directory; glob
    /// patterns that match nothing contribute nothing.
    pub fn plan(env: &BuildEnv, user_dirs: &[String]) -> Result<Self, CollectError> {
        let mut info = Self::default();

        let port = env.port_dir();
        if has_declaration(&port) {
            info.public_port.push(resolve_path(&port));
        } else {
            tracing::debug!("no port unit for target '{}'", env.target);
        }

        info.public_components = participating_children(&env.public_components_dir())?;
        info.user_components = participating_children(&env.project_components_dir())?;

        let roots = env.namespace_roots();
        for pattern in user_dirs {
            let glob = GlobPattern::new(pattern).map_err(|source| CollectError::Script {
                path: env.project_file(),
                source,
            })?;
            for dir in glob.expand_dirs(&env.project_path) {
                if !has_declaration(&dir) {
                    tracing::debug!("no {DECLARATION_FILE} in {}, skipping", dir.display());
                    continue;
                }
                let ns = roots.classify(&dir);
                if ns != Namespace::UserDirs {
                    tracing::debug!("{} belongs to {ns}, skipping", dir.display());
                    continue;
                }
                if info.user_dirs.contains(&dir) {
                    tracing::debug!("{} already planned, skipping", dir.display());
                    continue;
                }
                info.user_dirs.push(dir);
            }
        }

        let main = env.entry_point_dir();
        if !has_declaration(&main) {
            return Err(CollectError::MissingEntryPoint {
                path: main.join(DECLARATION_FILE),
            });
        }
        info.user_main.push(resolve_path(&main));

        Ok(info)
    }

    /// Load a persisted plan
    pub fn load(path: &Path) -> Result<Self, UnitbuildError> {
        let content = filesystem::read_file(path)?;
        serde_json::from_str(&content).map_err(|e| UnitbuildError::Serialize {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Persist the plan
    pub fn save(&self, path: &Path) -> Result<(), UnitbuildError> {
        let content = serde_json::to_string_pretty(self).map_err(|e| UnitbuildError::Serialize {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        filesystem::write_file(path, &content)?;
        Ok(())
    }
}

/// Evaluate one unit's declaration file into `manifest`.
///
/// Declarations are staged on a copy and committed only when every call of
/// the file succeeded.
pub fn evaluate_unit(
    ctx: &DeclarationContext,
    scope: &EvalScope<'_>,
    manifest: &mut Manifest,
) -> Result<(), CollectError> {
    let path = ctx.declaration_path();
    tracing::info!("run script {}", path.display());

    let file = DeclarationFile::load(&path).map_err(|source| CollectError::Script {
        path: path.clone(),
        source,
    })?;

    let calls: Vec<&Declaration> = file.applicable(scope).collect();
    // one explicit `requires` in the entry point replaces the default for
    // every call of the file
    let explicit_requires =
        ctx.namespace == Namespace::Main && calls.iter().any(|d| d.requires.is_some());

    let mut staged = manifest.clone();
    for decl in calls {
        if explicit_requires && decl.requires.is_none() {
            let decl = Declaration {
                requires: Some(Vec::new()),
                ..decl.clone()
            };
            staged.declare(ctx, &decl)?;
        } else {
            staged.declare(ctx, decl)?;
        }
    }
    *manifest = staged;
    Ok(())
}

/// Evaluate every planned directory in namespace order
pub fn collect(
    plan: &BuildInfo,
    roots: &NamespaceRoots,
    scope: &EvalScope<'_>,
    mut manifest: Manifest,
) -> Result<Manifest, CollectError> {
    for (planned, dir) in plan.iter() {
        let ctx = DeclarationContext::new(dir, roots);
        if ctx.namespace != planned {
            tracing::debug!(
                "{} planned as {planned} but classified as {}",
                dir.display(),
                ctx.namespace
            );
        }
        evaluate_unit(&ctx, scope, &mut manifest)?;
    }

    tracing::info!("collected {} units", manifest.unit_count());
    Ok(manifest)
}
