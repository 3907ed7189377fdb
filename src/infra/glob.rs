//! Glob expansion
//!
//! Expands shell-style patterns (`*`, `?`, `[...]`, `**`) against a base
//! directory. Patterns are compiled to anchored regexes and matched against
//! `/`-separated paths produced by a directory walk.

use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use crate::error::DeclarationError;
use crate::infra::filesystem::resolve_path;

/// A compiled glob pattern
#[derive(Debug, Clone)]
pub struct GlobPattern {
    /// Leading segments without wildcards
    prefix: PathBuf,
    /// Matcher for the remainder, relative to `prefix`
    matcher: Option<Regex>,
    /// Deepest walk needed, `None` when `**` is present
    max_depth: Option<usize>,
}

fn has_wildcard(segment: &str) -> bool {
    segment.contains(['*', '?', '['])
}

impl GlobPattern {
    /// Compile a pattern
    pub fn new(pattern: &str) -> Result<Self, DeclarationError> {
        let normalized = pattern.replace('\\', "/");
        let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();

        let split_at = segments
            .iter()
            .position(|s| has_wildcard(s))
            .unwrap_or(segments.len());
        let (literal, wild) = segments.split_at(split_at);

        let mut prefix = if normalized.starts_with('/') {
            PathBuf::from("/")
        } else {
            PathBuf::new()
        };
        prefix.extend(literal);

        if wild.is_empty() {
            return Ok(Self {
                prefix,
                matcher: None,
                max_depth: Some(0),
            });
        }

        let max_depth = if wild.iter().any(|s| s.contains("**")) {
            None
        } else {
            Some(wild.len())
        };

        let regex = translate(&wild.join("/"));
        let matcher = Regex::new(&regex).map_err(|e| DeclarationError::InvalidPattern {
            pattern: pattern.to_string(),
            error: e.to_string(),
        })?;

        Ok(Self {
            prefix,
            matcher: Some(matcher),
            max_depth,
        })
    }

    /// Expand the pattern below `base`, returning canonical file paths in
    /// sorted order. A pattern matching nothing yields an empty list.
    pub fn expand(&self, base: &Path) -> Vec<PathBuf> {
        self.expand_kind(base, EntryKind::File)
    }

    /// Expand the pattern below `base`, matching directories only
    pub fn expand_dirs(&self, base: &Path) -> Vec<PathBuf> {
        self.expand_kind(base, EntryKind::Dir)
    }

    fn expand_kind(&self, base: &Path, kind: EntryKind) -> Vec<PathBuf> {
        let root = base.join(&self.prefix);

        let Some(matcher) = &self.matcher else {
            return if kind.accepts_path(&root) {
                vec![resolve_path(&root)]
            } else {
                Vec::new()
            };
        };

        if !root.is_dir() {
            return Vec::new();
        }

        let mut walker = WalkDir::new(&root).min_depth(1).sort_by_file_name();
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut matches: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| kind.accepts(entry.file_type()))
            .filter(|entry| {
                entry.path().strip_prefix(&root).is_ok_and(|relative| {
                    let relative = relative
                        .components()
                        .map(|c| c.as_os_str().to_string_lossy())
                        .collect::<Vec<_>>()
                        .join("/");
                    matcher.is_match(&relative)
                })
            })
            .map(|entry| resolve_path(entry.path()))
            .collect();

        matches.sort();
        matches.dedup();
        matches
    }
}

#[derive(Debug, Clone, Copy)]
enum EntryKind {
    File,
    Dir,
}

impl EntryKind {
    fn accepts(self, file_type: std::fs::FileType) -> bool {
        match self {
            EntryKind::File => file_type.is_file(),
            EntryKind::Dir => file_type.is_dir(),
        }
    }

    fn accepts_path(self, path: &Path) -> bool {
        match self {
            EntryKind::File => path.is_file(),
            EntryKind::Dir => path.is_dir(),
        }
    }
}

/// Translate a glob into an anchored regex
fn translate(glob: &str) -> String {
    let mut regex = String::from("^");
    let chars: Vec<char> = glob.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                if chars.get(i + 2) == Some(&'/') {
                    regex.push_str("(?:.*/)?");
                    i += 3;
                } else {
                    regex.push_str(".*");
                    i += 2;
                }
                continue;
            }
            '*' => regex.push_str("[^/]*"),
            '?' => regex.push_str("[^/]"),
            '[' => {
                if let Some((class, next)) = translate_class(&chars, i) {
                    regex.push_str(&class);
                    i = next;
                    continue;
                }
                regex.push_str("\\[");
            }
            c => regex.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }

    regex.push('$');
    regex
}

/// Translate the bracket expression opening at `chars[start]`.
///
/// Returns the regex class and the index past the closing `]`, or `None`
/// when the expression is unterminated. A `]` right after `[` or `[!` is a
/// literal member; `-` is a range only between two members.
fn translate_class(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut end = start + 1;
    let negated = chars.get(end) == Some(&'!');
    if negated {
        end += 1;
    }
    let body_start = end;
    if chars.get(end) == Some(&']') {
        end += 1;
    }
    while end < chars.len() && chars[end] != ']' {
        end += 1;
    }
    if end >= chars.len() {
        return None;
    }

    let body = &chars[body_start..end];
    let mut class = String::from(if negated { "[^" } else { "[" });
    let mut k = 0;
    while k < body.len() {
        if body.get(k + 1) == Some(&'-') && k + 2 < body.len() {
            push_class_member(&mut class, body[k]);
            class.push('-');
            push_class_member(&mut class, body[k + 2]);
            k += 3;
        } else {
            push_class_member(&mut class, body[k]);
            k += 1;
        }
    }
    class.push(']');
    Some((class, end + 1))
}

fn push_class_member(class: &mut String, c: char) {
    if matches!(c, '\\' | '[' | ']' | '&' | '~' | '-' | '^') {
        class.push('\\');
    }
    class.push(c);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(base: &Path, relative: &str) {
        let path = base.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    fn names(base: &Path, paths: &[PathBuf]) -> Vec<String> {
        let base = base.canonicalize().unwrap();
        paths
            .iter()
            .map(|p| {
                p.strip_prefix(&base)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_star_matches_single_level() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a.c");
        touch(temp.path(), "b.c");
        touch(temp.path(), "b.h");
        touch(temp.path(), "sub/c.c");

        let found = GlobPattern::new("*.c").unwrap().expand(temp.path());

        assert_eq!(names(temp.path(), &found), vec!["a.c", "b.c"]);
    }

    #[test]
    fn test_double_star_matches_any_depth() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "src/a.c");
        touch(temp.path(), "src/x/y/b.c");
        touch(temp.path(), "other/c.c");

        let found = GlobPattern::new("src/**/*.c").unwrap().expand(temp.path());

        assert_eq!(names(temp.path(), &found), vec!["src/a.c", "src/x/y/b.c"]);
    }

    #[test]
    fn test_question_mark_and_class() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "f1.c");
        touch(temp.path(), "f2.c");
        touch(temp.path(), "f3.c");
        touch(temp.path(), "fx.c");

        let q = GlobPattern::new("f?.c").unwrap().expand(temp.path());
        assert_eq!(q.len(), 4);

        let class = GlobPattern::new("f[12].c").unwrap().expand(temp.path());
        assert_eq!(names(temp.path(), &class), vec!["f1.c", "f2.c"]);

        let negated = GlobPattern::new("f[!12].c").unwrap().expand(temp.path());
        assert_eq!(names(temp.path(), &negated), vec!["f3.c", "fx.c"]);
    }

    #[test]
    fn test_literal_path() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "drivers/uart.c");

        let found = GlobPattern::new("drivers/uart.c").unwrap().expand(temp.path());
        assert_eq!(names(temp.path(), &found), vec!["drivers/uart.c"]);

        let missing = GlobPattern::new("drivers/spi.c").unwrap().expand(temp.path());
        assert!(missing.is_empty());
    }

    #[test]
    fn test_non_matching_pattern_is_empty() {
        let temp = TempDir::new().unwrap();
        let found = GlobPattern::new("nothing/*.c").unwrap().expand(temp.path());
        assert!(found.is_empty());
    }

    #[test]
    fn test_directories_are_not_matched() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("dir.c")).unwrap();
        touch(temp.path(), "file.c");

        let found = GlobPattern::new("*.c").unwrap().expand(temp.path());
        assert_eq!(names(temp.path(), &found), vec!["file.c"]);
    }

    #[test]
    fn test_parent_relative_prefix() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "common/shared.c");
        std::fs::create_dir_all(temp.path().join("unit")).unwrap();

        let found = GlobPattern::new("../common/*.c")
            .unwrap()
            .expand(&temp.path().join("unit"));
        assert_eq!(names(temp.path(), &found), vec!["common/shared.c"]);
    }

    #[test]
    fn test_expand_dirs_matches_directories_only() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("extra").join("drivers")).unwrap();
        std::fs::create_dir_all(temp.path().join("extra").join("sensors")).unwrap();
        touch(temp.path(), "extra/notes.txt");

        let found = GlobPattern::new("extra/*").unwrap().expand_dirs(temp.path());
        assert_eq!(
            names(temp.path(), &found),
            vec!["extra/drivers", "extra/sensors"]
        );

        let literal = GlobPattern::new("extra/drivers").unwrap().expand_dirs(temp.path());
        assert_eq!(names(temp.path(), &literal), vec!["extra/drivers"]);
    }

    #[test]
    fn test_class_members_are_literal() {
        assert_eq!(translate("[]x]"), "^[\\]x]$");
        assert_eq!(translate("[!]]"), "^[^\\]]$");
        assert_eq!(translate("[[]"), "^[\\[]$");
        assert_eq!(translate("[a&&b]"), "^[a\\&\\&b]$");
        assert_eq!(translate("[a-]"), "^[a\\-]$");
        assert_eq!(translate("[-a]"), "^[\\-a]$");
        assert_eq!(translate("[!-]"), "^[^\\-]$");
        assert_eq!(translate("[0-9a]"), "^[0-9a]$");
        assert_eq!(translate("[unterminated"), "^\\[unterminated$");

        let bracket = Regex::new(&translate("[]x]")).unwrap();
        assert!(bracket.is_match("]"));
        assert!(bracket.is_match("x"));
        assert!(!bracket.is_match("a"));

        let posix = Regex::new(&translate("[[:alpha:]]")).unwrap();
        assert!(posix.is_match("[]"));
        assert!(!posix.is_match("a"));

        let tilde = Regex::new(&translate("f[~&]")).unwrap();
        assert!(tilde.is_match("f~"));
        assert!(tilde.is_match("f&"));
    }

    #[test]
    fn test_translate_escapes_regex_characters() {
        assert_eq!(translate("a+b.c"), "^a\\+b\\.c$");
        assert_eq!(translate("**"), "^.*$");
    }
}
