//! Declaration files (`unit.toml`)
//!
//! A declaration file is plain data: a list of `[[declare]]` tables, each one
//! a declare-unit call. Tables may carry a `when` condition evaluated against
//! the current target and configuration symbols.

use serde::Deserialize;
use std::path::Path;

use crate::config::defaults::{DEFAULT_INCLUDE_DIR, DEFAULT_SOURCE_PATTERN};
use crate::core::symbols::SymbolTable;
use crate::error::DeclarationError;

/// A parsed `unit.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclarationFile {
    /// Declare-unit calls, in file order
    #[serde(default)]
    pub declare: Vec<Declaration>,
}

/// One declare-unit call
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Declaration {
    /// Condition gating this call
    #[serde(default)]
    pub when: Option<Condition>,

    /// Source glob patterns, possibly nested
    #[serde(default = "default_sources")]
    pub sources: Vec<Pattern>,

    /// Include directories relative to the unit
    #[serde(default = "default_include_dirs")]
    pub include_dirs: Vec<String>,

    /// Required unit names; `None` lets the entry point use its default
    #[serde(default)]
    pub requires: Option<Vec<String>>,

    /// Compiler flags
    #[serde(default)]
    pub compile_flags: Vec<String>,
}

fn default_sources() -> Vec<Pattern> {
    vec![Pattern::One(DEFAULT_SOURCE_PATTERN.to_string())]
}

fn default_include_dirs() -> Vec<String> {
    vec![DEFAULT_INCLUDE_DIR.to_string()]
}

/// A source pattern or an arbitrarily nested list of them
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Pattern {
    /// Single glob
    One(String),
    /// Nested list
    Many(Vec<Pattern>),
}

/// Flatten nested patterns depth-first, preserving order.
pub fn flatten_patterns(patterns: &[Pattern]) -> Vec<String> {
    let mut flat = Vec::new();
    let mut stack: Vec<std::slice::Iter<'_, Pattern>> = vec![patterns.iter()];

    while let Some(current) = stack.last_mut() {
        match current.next() {
            Some(Pattern::One(glob)) => flat.push(glob.clone()),
            Some(Pattern::Many(nested)) => stack.push(nested.iter()),
            None => {
                stack.pop();
            }
        }
    }

    flat
}

/// Condition under which a declaration applies
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Condition {
    /// Any-of match on the target name; empty matches every target
    #[serde(default)]
    pub target: Vec<String>,
    /// Symbols that must be enabled
    #[serde(default)]
    pub enabled: Vec<String>,
    /// Symbols that must be unset or `n`
    #[serde(default)]
    pub disabled: Vec<String>,
}

/// What a condition is evaluated against
#[derive(Debug, Clone, Copy)]
pub struct EvalScope<'a> {
    /// Current target name
    pub target: &'a str,
    /// Loaded configuration symbols
    pub symbols: &'a SymbolTable,
}

impl Condition {
    /// Whether the condition holds in `scope`
    pub fn holds(&self, scope: &EvalScope<'_>) -> bool {
        (self.target.is_empty() || self.target.iter().any(|t| t == scope.target))
            && self.enabled.iter().all(|s| scope.symbols.is_enabled(s))
            && !self.disabled.iter().any(|s| scope.symbols.is_enabled(s))
    }
}

impl Declaration {
    /// Whether this call applies in `scope`
    pub fn applies(&self, scope: &EvalScope<'_>) -> bool {
        self.when.as_ref().map_or(true, |c| c.holds(scope))
    }
}

impl DeclarationFile {
    /// Parse declaration file content
    pub fn parse(content: &str) -> Result<Self, DeclarationError> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a declaration file
    pub fn load(path: &Path) -> Result<Self, DeclarationError> {
        let content = std::fs::read_to_string(path).map_err(|e| DeclarationError::Io {
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Declarations whose condition holds in `scope`, in file order
    pub fn applicable<'a>(
        &'a self,
        scope: &'a EvalScope<'a>,
    ) -> impl Iterator<Item = &'a Declaration> + 'a {
        self.declare.iter().filter(move |d| d.applies(scope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_defaults() {
        let file = DeclarationFile::parse("[[declare]]\n").unwrap();

        assert_eq!(file.declare.len(), 1);
        let decl = &file.declare[0];
        assert_eq!(flatten_patterns(&decl.sources), vec!["*.c"]);
        assert_eq!(decl.include_dirs, vec!["."]);
        assert_eq!(decl.requires, None);
        assert!(decl.compile_flags.is_empty());
    }

    #[test]
    fn test_parse_empty_file_declares_nothing() {
        let file = DeclarationFile::parse("").unwrap();
        assert!(file.declare.is_empty());
    }

    #[test]
    fn test_parse_nested_sources() {
        let content = r#"
[[declare]]
sources = ["a.c", ["b/*.c", ["c/**/*.c"]], "d.c"]
requires = []
compile_flags = ["-Wall"]
"#;
        let file = DeclarationFile::parse(content).unwrap();
        let decl = &file.declare[0];

        assert_eq!(
            flatten_patterns(&decl.sources),
            vec!["a.c", "b/*.c", "c/**/*.c", "d.c"]
        );
        assert_eq!(decl.requires, Some(Vec::new()));
        assert_eq!(decl.compile_flags, vec!["-Wall"]);
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let result = DeclarationFile::parse("[[declare]]\nsrcs = [\"a.c\"]\n");
        assert!(matches!(result, Err(DeclarationError::Parse(_))));

        let result = DeclarationFile::parse("name = \"x\"\n");
        assert!(matches!(result, Err(DeclarationError::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        let result = DeclarationFile::parse("[[declare]]\nrequires = \"log\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = DeclarationFile::load(Path::new("/nonexistent/unit.toml"));
        assert!(matches!(result, Err(DeclarationError::Io { .. })));
    }

    #[test]
    fn test_condition_target_and_symbols() {
        let symbols = SymbolTable::parse("CONFIG_NET=y\n# CONFIG_LOW_POWER is not set\n");
        let scope = EvalScope {
            target: "esp32",
            symbols: &symbols,
        };

        let content = r#"
[[declare]]
sources = ["common.c"]

[[declare]]
when = { target = ["esp32", "bl602"] }
sources = ["esp.c"]

[[declare]]
when = { target = ["linux"] }
sources = ["linux.c"]

[[declare]]
when = { enabled = ["NET"], disabled = ["LOW_POWER", "UNSET"] }
sources = ["net.c"]

[[declare]]
when = { enabled = ["LOW_POWER"] }
sources = ["low_power.c"]
"#;
        let file = DeclarationFile::parse(content).unwrap();
        let applied: Vec<Vec<String>> = file
            .applicable(&scope)
            .map(|d| flatten_patterns(&d.sources))
            .collect();

        assert_eq!(
            applied,
            vec![
                vec!["common.c".to_string()],
                vec!["esp.c".to_string()],
                vec!["net.c".to_string()],
            ]
        );
    }

    fn pattern_strategy() -> impl Strategy<Value = Pattern> {
        let leaf = "[a-z]{1,6}\\.c".prop_map(Pattern::One);
        leaf.prop_recursive(4, 32, 4, |inner| {
            proptest::collection::vec(inner, 0..4).prop_map(Pattern::Many)
        })
    }

    fn flatten_recursive(patterns: &[Pattern], out: &mut Vec<String>) {
        for p in patterns {
            match p {
                Pattern::One(s) => out.push(s.clone()),
                Pattern::Many(nested) => flatten_recursive(nested, out),
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Flattening visits leaves in the same order as a recursive walk
        #[test]
        fn prop_flatten_preserves_leaf_order(
            patterns in proptest::collection::vec(pattern_strategy(), 0..6)
        ) {
            let mut expected = Vec::new();
            flatten_recursive(&patterns, &mut expected);
            prop_assert_eq!(flatten_patterns(&patterns), expected);
        }
    }
}
