//! Build manifest and the declare-unit operation
//!
//! The manifest is created empty for each collection run, filled only through
//! [`Manifest::declare`], and written once at the end of a successful run.

use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::config::defaults::DECLARATION_FILE;
use crate::core::declaration::{flatten_patterns, Declaration};
use crate::core::unit::{unit_name, Namespace, NamespaceRoots, Unit};
use crate::error::{CollectError, UnitbuildError};
use crate::infra::filesystem::{self, resolve_path};
use crate::infra::glob::GlobPattern;

/// Units of one namespace keyed by name
pub type UnitMap = BTreeMap<String, Unit>;

/// The unit whose declaration file is being evaluated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationContext {
    /// Canonical unit directory
    pub dir: PathBuf,
    /// Unit name
    pub name: String,
    /// Namespace the unit belongs to
    pub namespace: Namespace,
}

impl DeclarationContext {
    /// Build the context for a unit directory
    pub fn new(dir: &Path, roots: &NamespaceRoots) -> Self {
        Self {
            dir: resolve_path(dir),
            name: unit_name(dir),
            namespace: roots.classify(dir),
        }
    }

    /// Declaration file of this unit
    pub fn declaration_path(&self) -> PathBuf {
        self.dir.join(DECLARATION_FILE)
    }
}

/// The aggregate build manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Project name
    pub project_name: String,
    /// Generated configuration header directory
    pub config_path: PathBuf,
    /// Global compile flags
    #[serde(default)]
    pub compile_flags: Vec<String>,

    #[serde(default)]
    public_port: UnitMap,
    #[serde(default)]
    public_components: UnitMap,
    #[serde(default)]
    user_components: UnitMap,
    #[serde(default)]
    user_dirs: UnitMap,
    #[serde(default)]
    user_main: UnitMap,
}

impl Manifest {
    /// Create an empty manifest
    pub fn new(project_name: &str, config_path: &Path, compile_flags: Vec<String>) -> Self {
        Self {
            project_name: project_name.to_string(),
            config_path: resolve_path(config_path),
            compile_flags,
            ..Self::default()
        }
    }

    /// Units of a namespace
    pub fn namespace(&self, ns: Namespace) -> &UnitMap {
        match ns {
            Namespace::Port => &self.public_port,
            Namespace::PublicComponents => &self.public_components,
            Namespace::UserComponents => &self.user_components,
            Namespace::UserDirs => &self.user_dirs,
            Namespace::Main => &self.user_main,
        }
    }

    fn namespace_mut(&mut self, ns: Namespace) -> &mut UnitMap {
        match ns {
            Namespace::Port => &mut self.public_port,
            Namespace::PublicComponents => &mut self.public_components,
            Namespace::UserComponents => &mut self.user_components,
            Namespace::UserDirs => &mut self.user_dirs,
            Namespace::Main => &mut self.user_main,
        }
    }

    /// The entry-point unit, once declared
    pub fn entry_point(&self) -> Option<&Unit> {
        self.user_main.values().next()
    }

    /// The port unit, if any
    pub fn port(&self) -> Option<&Unit> {
        self.public_port.values().next()
    }

    /// Find a unit by name in any namespace
    pub fn find(&self, name: &str) -> Option<(Namespace, &Unit)> {
        Namespace::ALL
            .into_iter()
            .find_map(|ns| self.namespace(ns).get(name).map(|unit| (ns, unit)))
    }

    /// Total number of units
    pub fn unit_count(&self) -> usize {
        Namespace::ALL
            .into_iter()
            .map(|ns| self.namespace(ns).len())
            .sum()
    }

    /// Names of every unit outside `excluded`
    pub fn unit_names_except(&self, excluded: Namespace) -> BTreeSet<String> {
        Namespace::ALL
            .into_iter()
            .filter(|&ns| ns != excluded)
            .flat_map(|ns| self.namespace(ns).keys().cloned())
            .collect()
    }

    /// Fold one declare-unit call into the manifest.
    ///
    /// The unit is owned by the context directory. Cross-namespace name
    /// collisions and same-namespace duplicates are rejected before anything
    /// is changed.
    pub fn declare(
        &mut self,
        ctx: &DeclarationContext,
        decl: &Declaration,
    ) -> Result<(), CollectError> {
        self.check_ownership(ctx)?;

        let mut unit = Unit::new(ctx.dir.clone());

        for pattern in flatten_patterns(&decl.sources) {
            let glob = GlobPattern::new(&pattern).map_err(|source| CollectError::Script {
                path: ctx.declaration_path(),
                source,
            })?;
            let matched = glob.expand(&ctx.dir);
            if matched.is_empty() {
                tracing::debug!("'{pattern}' matched no files in {}", ctx.dir.display());
            }
            unit.sources.extend(matched);
        }

        unit.include_dirs.extend(
            decl.include_dirs
                .iter()
                .map(|dir| resolve_path(&ctx.dir.join(dir))),
        );
        unit.include_dirs.insert(self.config_path.clone());

        unit.requires = match (&decl.requires, ctx.namespace) {
            (Some(explicit), _) => explicit.iter().cloned().collect(),
            (None, Namespace::Main) => self.unit_names_except(Namespace::Main),
            (None, _) => BTreeSet::new(),
        };

        unit.compile_flags.extend(decl.compile_flags.iter().cloned());

        tracing::debug!(
            "declare {} '{}' ({} sources)",
            ctx.namespace,
            ctx.name,
            unit.sources.len()
        );

        match self.namespace_mut(ctx.namespace).entry(ctx.name.clone()) {
            Entry::Occupied(mut existing) => existing.get_mut().merge(unit),
            Entry::Vacant(slot) => {
                slot.insert(unit);
            }
        }
        Ok(())
    }

    fn check_ownership(&self, ctx: &DeclarationContext) -> Result<(), CollectError> {
        for ns in Namespace::ALL {
            let Some(existing) = self.namespace(ns).get(&ctx.name) else {
                continue;
            };

            if ns != ctx.namespace {
                return Err(CollectError::Collision {
                    name: ctx.name.clone(),
                    new_namespace: ctx.namespace,
                    new: ctx.dir.clone(),
                    existing_namespace: ns,
                    existing: existing.path.clone(),
                });
            }
            if existing.path != ctx.dir {
                return Err(CollectError::DuplicateUnit {
                    name: ctx.name.clone(),
                    namespace: ns,
                    existing: existing.path.clone(),
                    new: ctx.dir.clone(),
                });
            }
        }

        if ctx.namespace.is_singular() {
            if let Some(other) = self.namespace(ctx.namespace).values().next() {
                if other.path != ctx.dir {
                    return Err(CollectError::DuplicateUnit {
                        name: ctx.name.clone(),
                        namespace: ctx.namespace,
                        existing: other.path.clone(),
                        new: ctx.dir.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Load a persisted manifest
    pub fn load(path: &Path) -> Result<Self, UnitbuildError> {
        let content = filesystem::read_file(path)?;
        serde_json::from_str(&content).map_err(|e| UnitbuildError::Serialize {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Persist the manifest atomically
    pub fn save(&self, path: &Path) -> Result<(), UnitbuildError> {
        let content = serde_json::to_string_pretty(self).map_err(|e| UnitbuildError::Serialize {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        filesystem::write_file_atomic(path, &content)?;
        Ok(())
    }
}
