//! Configuration-source assembly
//!
//! Builds the nested `menu "NAME" ... endmenu` source that the external
//! configuration editor loads. Two forms share one tree and one serializer:
//!
//! - flat: one outer menu per namespace, one inner menu per unit sourcing
//!   that unit's top-level fragment
//! - deep: every fragment below a directory, nested by path segment

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::defaults::FRAGMENT_FILE;
use crate::core::collect::BuildInfo;
use crate::core::env::BuildEnv;
use crate::core::unit::{unit_name, Namespace};
use crate::error::UnitbuildError;
use crate::infra::filesystem;

const INDENT: &str = "  ";

/// Index of a node in a [`ConfigTree`]
pub type NodeId = usize;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Node {
    /// Menu title; `None` only for an unlabeled root
    label: Option<String>,
    /// Fragment files sourced directly in this menu
    sources: Vec<PathBuf>,
    /// Child menus in insertion order
    children: Vec<NodeId>,
}

/// Arena-backed menu tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigTree {
    nodes: Vec<Node>,
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::new()
    }
}

enum Step {
    Enter(NodeId, usize),
    Exit(usize),
}

impl ConfigTree {
    /// Root node id
    pub const ROOT: NodeId = 0;

    /// Tree whose root emits its content without a surrounding menu
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    /// Tree whose root is itself a menu
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node {
                label: Some(label.into()),
                ..Node::default()
            }],
        }
    }

    /// Number of menus, counting a labeled root
    pub fn menu_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.label.is_some()).count()
    }

    /// Source a fragment directly under `node`
    pub fn add_source(&mut self, node: NodeId, path: PathBuf) {
        self.nodes[node].sources.push(path);
    }

    /// Append a new child menu
    pub fn add_menu(&mut self, parent: NodeId, label: impl Into<String>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            label: Some(label.into()),
            ..Node::default()
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Child menu with `label`, created on first use
    fn child(&mut self, parent: NodeId, label: &str) -> NodeId {
        let existing = self.nodes[parent]
            .children
            .iter()
            .copied()
            .find(|&c| self.nodes[c].label.as_deref() == Some(label));
        existing.unwrap_or_else(|| self.add_menu(parent, label))
    }

    /// Insert a fragment below `under`, one menu per directory segment
    pub fn insert_path<S: AsRef<str>>(&mut self, under: NodeId, segments: &[S], fragment: PathBuf) {
        let node = segments
            .iter()
            .fold(under, |node, segment| self.child(node, segment.as_ref()));
        self.add_source(node, fragment);
    }

    /// Add every fragment below `dir` under `under`, in sorted walk order.
    ///
    /// Returns the number of fragments found.
    pub fn scan_into(&mut self, under: NodeId, dir: &Path, fragment_name: &str) -> usize {
        let mut found = 0;

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under {}: {e}", dir.display());
                    continue;
                }
            };
            if !entry.file_type().is_file() || entry.file_name() != fragment_name {
                continue;
            }

            let Some(parent) = entry.path().parent() else {
                continue;
            };
            let Ok(relative) = parent.strip_prefix(dir) else {
                continue;
            };
            let segments: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();

            self.insert_path(under, &segments, filesystem::resolve_path(entry.path()));
            found += 1;
        }

        found
    }

    /// Deep scan of `root`, rendered under a menu named after `root`
    pub fn scan(root: &Path, fragment_name: &str) -> Self {
        let mut tree = Self::labeled(unit_name(root));
        tree.scan_into(Self::ROOT, root, fragment_name);
        tree
    }

    /// Serialize depth-first with an explicit stack.
    ///
    /// Every labeled node opens one `menu` and closes one `endmenu`; its own
    /// sources come before its child menus. A blank line follows each
    /// top-level `endmenu`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![Step::Enter(Self::ROOT, 0)];

        while let Some(step) = stack.pop() {
            match step {
                Step::Enter(id, depth) => {
                    let node = &self.nodes[id];
                    let inner = match &node.label {
                        Some(label) => {
                            push_line(&mut out, depth, &format!("menu \"{}\"", escape(label)));
                            stack.push(Step::Exit(depth));
                            depth + 1
                        }
                        None => depth,
                    };

                    for source in &node.sources {
                        push_line(
                            &mut out,
                            inner,
                            &format!("source \"{}\"", escape(&posix(source))),
                        );
                    }

                    for &child in node.children.iter().rev() {
                        stack.push(Step::Enter(child, inner));
                    }
                }
                Step::Exit(depth) => {
                    push_line(&mut out, depth, "endmenu");
                    if depth == 0 {
                        out.push('\n');
                    }
                }
            }
        }

        out
    }
}

fn push_line(out: &mut String, depth: usize, line: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(line);
    out.push('\n');
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn posix(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Assemble the configuration tree for a planned build.
///
/// Root, boards and (when present) port fragments come first, then the
/// `public components`, `main`, `user components` and `user dirs` groups.
pub fn assemble(env: &BuildEnv, plan: &BuildInfo, deep: bool) -> ConfigTree {
    let mut tree = ConfigTree::new();

    for fixed in [env.root_fragment(), env.boards_fragment()] {
        if !fixed.is_file() {
            tracing::warn!("Configuration fragment {} not found", fixed.display());
        }
        tree.add_source(ConfigTree::ROOT, fixed);
    }
    let port_fragment = env.port_dir().join(FRAGMENT_FILE);
    if port_fragment.is_file() {
        tree.add_source(ConfigTree::ROOT, port_fragment);
    }

    for ns in Namespace::MENU_ORDER {
        let dirs = plan.dirs(ns);
        if dirs.is_empty() {
            continue;
        }

        if ns == Namespace::Main {
            add_entry_point(&mut tree, &dirs[0], deep);
            continue;
        }

        let group = tree.add_menu(ConfigTree::ROOT, ns.menu_title());
        for dir in dirs {
            add_unit(&mut tree, group, dir, deep);
        }
    }

    tree
}

fn add_entry_point(tree: &mut ConfigTree, dir: &Path, deep: bool) {
    let fragment = dir.join(FRAGMENT_FILE);
    if deep {
        let mut scanned = ConfigTree::labeled(Namespace::Main.menu_title());
        if scanned.scan_into(ConfigTree::ROOT, dir, FRAGMENT_FILE) > 0 {
            tree.graft(ConfigTree::ROOT, &scanned);
        }
    } else if fragment.is_file() {
        let menu = tree.add_menu(ConfigTree::ROOT, Namespace::Main.menu_title());
        tree.add_source(menu, fragment);
    } else {
        tracing::debug!("entry point has no {FRAGMENT_FILE}");
    }
}

fn add_unit(tree: &mut ConfigTree, group: NodeId, dir: &Path, deep: bool) {
    let name = unit_name(dir);
    if deep {
        let mut scanned = ConfigTree::labeled(name.clone());
        if scanned.scan_into(ConfigTree::ROOT, dir, FRAGMENT_FILE) > 0 {
            tree.graft(group, &scanned);
            return;
        }
    } else {
        let fragment = dir.join(FRAGMENT_FILE);
        if fragment.is_file() {
            let menu = tree.add_menu(group, name);
            tree.add_source(menu, fragment);
            return;
        }
    }
    tracing::warn!("Unit '{name}' has no {FRAGMENT_FILE}, omitted from configuration");
}

impl ConfigTree {
    /// Copy `other` (including its root) as a child of `parent`
    fn graft(&mut self, parent: NodeId, other: &ConfigTree) {
        let offset = self.nodes.len();
        self.nodes.extend(other.nodes.iter().map(|node| Node {
            label: node.label.clone(),
            sources: node.sources.clone(),
            children: node.children.iter().map(|c| c + offset).collect(),
        }));
        self.nodes[parent].children.push(offset);
    }
}

/// Assemble from the persisted plan and write `config.in`
pub fn write_config_source(env: &BuildEnv, deep: bool) -> Result<PathBuf, UnitbuildError> {
    tracing::info!("scan config");
    let plan = BuildInfo::load(&env.build_info_path())?;
    let text = assemble(env, &plan, deep).render();

    let path = env.config_source_path();
    filesystem::write_file(&path, &text)?;
    tracing::info!("scan config done");
    Ok(path)
}
