//! Units and namespaces
//!
//! A unit is one buildable directory. Every unit belongs to exactly one
//! namespace, decided purely from where its directory sits on disk.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::infra::filesystem::resolve_path;

/// The bucket a unit is collected into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Namespace {
    /// Hardware binding layer for the current target
    #[serde(rename = "public_port")]
    Port,
    /// Components shared by every project of the SDK
    #[serde(rename = "public_components")]
    PublicComponents,
    /// Components local to the project
    #[serde(rename = "user_components")]
    UserComponents,
    /// Extra directories registered in `project.toml`
    #[serde(rename = "user_dirs")]
    UserDirs,
    /// The program entry point
    #[serde(rename = "user_main")]
    Main,
}

impl Namespace {
    /// Every namespace, in collection order
    pub const ALL: [Namespace; 5] = [
        Namespace::Port,
        Namespace::PublicComponents,
        Namespace::UserComponents,
        Namespace::UserDirs,
        Namespace::Main,
    ];

    /// Namespaces grouped in the configuration source, in display order.
    /// The port fragment is emitted with the root fragments instead.
    pub const MENU_ORDER: [Namespace; 4] = [
        Namespace::PublicComponents,
        Namespace::Main,
        Namespace::UserComponents,
        Namespace::UserDirs,
    ];

    /// Key used in persisted files
    pub fn key(self) -> &'static str {
        match self {
            Namespace::Port => "public_port",
            Namespace::PublicComponents => "public_components",
            Namespace::UserComponents => "user_components",
            Namespace::UserDirs => "user_dirs",
            Namespace::Main => "user_main",
        }
    }

    /// Title of the outer menu in the configuration source
    pub fn menu_title(self) -> &'static str {
        match self {
            Namespace::Port => "port",
            Namespace::PublicComponents => "public components",
            Namespace::UserComponents => "user components",
            Namespace::UserDirs => "user dirs",
            Namespace::Main => "main",
        }
    }

    /// Whether the namespace holds at most one unit
    pub fn is_singular(self) -> bool {
        matches!(self, Namespace::Port | Namespace::Main)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One buildable entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Absolute, canonical unit directory
    pub path: PathBuf,
    /// Resolved source files
    #[serde(default)]
    pub sources: BTreeSet<PathBuf>,
    /// Resolved include directories
    #[serde(default)]
    pub include_dirs: BTreeSet<PathBuf>,
    /// Names of units this one depends on
    #[serde(default)]
    pub requires: BTreeSet<String>,
    /// Compiler flags
    #[serde(default)]
    pub compile_flags: BTreeSet<String>,
}

impl Unit {
    /// Create an empty unit rooted at `path`
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            sources: BTreeSet::new(),
            include_dirs: BTreeSet::new(),
            requires: BTreeSet::new(),
            compile_flags: BTreeSet::new(),
        }
    }

    /// Union every set-valued field of `other` into `self`
    pub fn merge(&mut self, other: Unit) {
        self.sources.extend(other.sources);
        self.include_dirs.extend(other.include_dirs);
        self.requires.extend(other.requires);
        self.compile_flags.extend(other.compile_flags);
    }
}

/// Directories that decide namespace membership
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceRoots {
    /// Reserved entry-point directory name
    pub entry_point_name: String,
    /// Parent of the port unit directory
    pub port_root: PathBuf,
    /// Parent of the global component directories
    pub public_root: PathBuf,
    /// Parent of the project component directories
    pub user_root: PathBuf,
}

impl NamespaceRoots {
    /// Create roots, resolving each path once
    pub fn new(
        entry_point_name: impl Into<String>,
        port_root: &Path,
        public_root: &Path,
        user_root: &Path,
    ) -> Self {
        Self {
            entry_point_name: entry_point_name.into(),
            port_root: resolve_path(port_root),
            public_root: resolve_path(public_root),
            user_root: resolve_path(user_root),
        }
    }

    /// Classify a unit directory.
    ///
    /// Checked in priority order: entry-point name, then parent equal to the
    /// port, global, or project component root. Anything else is a user dir.
    pub fn classify(&self, dir: &Path) -> Namespace {
        let dir = resolve_path(dir);

        if dir
            .file_name()
            .is_some_and(|name| name.to_string_lossy() == self.entry_point_name)
        {
            return Namespace::Main;
        }

        match dir.parent() {
            Some(parent) if parent == self.port_root => Namespace::Port,
            Some(parent) if parent == self.public_root => Namespace::PublicComponents,
            Some(parent) if parent == self.user_root => Namespace::UserComponents,
            _ => Namespace::UserDirs,
        }
    }
}

/// Unit name of a directory: its final path segment
pub fn unit_name(dir: &Path) -> String {
    resolve_path(dir)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
