//! Configuration symbol values
//!
//! Reads the `KEY=value` files written by the external configuration editor
//! and renders the generated configuration header.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::defaults::SYMBOL_PREFIX;
use crate::error::FilesystemError;
use crate::infra::filesystem;

const HEADER_GUARD: &str = "__UNITBUILD_CONFIG_H__";

/// Symbol values loaded from a configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    /// Raw values keyed by symbol name without the prefix
    values: BTreeMap<String, String>,
    /// File the values were read from
    source: Option<PathBuf>,
}

fn strip_prefix(name: &str) -> &str {
    name.strip_prefix(SYMBOL_PREFIX).unwrap_or(name)
}

impl SymbolTable {
    /// Parse configuration file content
    pub fn parse(content: &str) -> Self {
        let mut values = BTreeMap::new();

        for line in content.lines().map(str::trim) {
            if let Some(rest) = line.strip_prefix("# ") {
                if let Some(name) = rest.strip_suffix(" is not set") {
                    values.insert(strip_prefix(name.trim()).to_string(), "n".to_string());
                }
                continue;
            }
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((name, value)) = line.split_once('=') {
                values.insert(
                    strip_prefix(name.trim()).to_string(),
                    value.trim().to_string(),
                );
            }
        }

        Self {
            values,
            source: None,
        }
    }

    /// Load from the first existing file among `candidates`.
    ///
    /// Returns an empty table when none exists.
    pub fn load(candidates: &[PathBuf]) -> Result<Self, FilesystemError> {
        for path in candidates {
            if path.is_file() {
                tracing::debug!("load config: {}", path.display());
                let mut table = Self::parse(&filesystem::read_file(path)?);
                table.source = Some(path.clone());
                return Ok(table);
            }
        }
        tracing::debug!("no configuration file found, symbols are unset");
        Ok(Self::default())
    }

    /// File the table was loaded from
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Value of a symbol, with or without the `CONFIG_` prefix.
    /// String values are returned unquoted.
    pub fn get(&self, name: &str) -> Option<String> {
        self.values.get(strip_prefix(name)).map(|raw| unquote(raw))
    }

    /// Whether a symbol is set to anything other than `n`
    pub fn is_enabled(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_empty() && v != "n")
    }

    /// Number of symbols
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the table has no symbols
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Render the C configuration header.
    ///
    /// `y` becomes `1`, `m` defines `<NAME>_MODULE`, `n` is omitted, and
    /// other values are written verbatim.
    pub fn render_header(&self) -> String {
        let mut body = String::new();
        for (name, raw) in &self.values {
            match raw.as_str() {
                "n" => {}
                "y" => body.push_str(&format!("#define {SYMBOL_PREFIX}{name} 1\n")),
                "m" => body.push_str(&format!("#define {SYMBOL_PREFIX}{name}_MODULE 1\n")),
                value => body.push_str(&format!("#define {SYMBOL_PREFIX}{name} {value}\n")),
            }
        }

        format!("#ifndef {HEADER_GUARD}\n#define {HEADER_GUARD}\n\n{body}\n#endif // {HEADER_GUARD}\n")
    }
}

fn unquote(raw: &str) -> String {
    match raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(inner) => inner.replace("\\\"", "\"").replace("\\\\", "\\"),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "# Generated\n\
CONFIG_NET=y\n\
CONFIG_UART_BAUD=115200\n\
CONFIG_NAME=\"demo \\\"board\\\"\"\n\
# CONFIG_LOW_POWER is not set\n\
CONFIG_DRIVER=m\n";

    #[test]
    fn test_parse_strips_prefix_and_reads_values() {
        let table = SymbolTable::parse(SAMPLE);

        assert_eq!(table.get("NET").as_deref(), Some("y"));
        assert_eq!(table.get("CONFIG_NET").as_deref(), Some("y"));
        assert_eq!(table.get("UART_BAUD").as_deref(), Some("115200"));
        assert_eq!(table.get("NAME").as_deref(), Some("demo \"board\""));
        assert_eq!(table.get("MISSING"), None);
    }

    #[test]
    fn test_not_set_means_n() {
        let table = SymbolTable::parse(SAMPLE);

        assert_eq!(table.get("LOW_POWER").as_deref(), Some("n"));
        assert!(!table.is_enabled("LOW_POWER"));
        assert!(table.is_enabled("NET"));
        assert!(!table.is_enabled("MISSING"));
    }

    #[test]
    fn test_load_uses_first_existing_candidate() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("unitconfig");
        let defaults = temp.path().join("unitconfig.defaults");
        let target = temp.path().join("target.defaults");
        std::fs::write(&defaults, "CONFIG_A=y\n").unwrap();
        std::fs::write(&target, "CONFIG_A=n\nCONFIG_B=y\n").unwrap();

        let table = SymbolTable::load(&[missing, defaults.clone(), target]).unwrap();

        assert_eq!(table.source(), Some(defaults.as_path()));
        assert!(table.is_enabled("A"));
        assert_eq!(table.get("B"), None);
    }

    #[test]
    fn test_load_without_candidates_is_empty() {
        let temp = TempDir::new().unwrap();
        let table = SymbolTable::load(&[temp.path().join("nothing")]).unwrap();
        assert!(table.is_empty());
        assert!(table.source().is_none());
    }

    #[test]
    fn test_render_header() {
        let header = SymbolTable::parse(SAMPLE).render_header();

        assert!(header.starts_with("#ifndef __UNITBUILD_CONFIG_H__\n"));
        assert!(header.contains("#define CONFIG_NET 1\n"));
        assert!(header.contains("#define CONFIG_UART_BAUD 115200\n"));
        assert!(header.contains("#define CONFIG_DRIVER_MODULE 1\n"));
        assert!(!header.contains("LOW_POWER"));
        assert!(header.ends_with("#endif // __UNITBUILD_CONFIG_H__\n"));
    }
}
