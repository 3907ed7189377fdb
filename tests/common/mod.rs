//! Common test utilities and helpers
//!
//! `TestProject` lays out an SDK root and a project side by side in one
//! temporary directory:
//!
//! ```text
//! <tmp>/sdk/            SDK root (components/, boards/, port/, plugins/, templates/)
//! <tmp>/sdk/targets/t1  target configuration directory
//! <tmp>/app/            project
//! ```

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

use unitbuild::core::env::BuildEnv;

/// Target name used by fixtures
pub const TARGET: &str = "t1";

/// Minimal declaration
pub const EMPTY_DECLARATION: &str = "[[declare]]\n";

/// Test SDK and project
pub struct TestProject {
    /// Temporary directory holding both trees
    pub dir: TempDir,
    base: PathBuf,
}

impl TestProject {
    /// SDK with root fragments and an empty project (project.toml only)
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let base = dir
            .path()
            .canonicalize()
            .expect("Failed to resolve temp directory");
        let project = Self { dir, base };

        project.create_file("sdk/Kconfig", "mainmenu \"unitbuild\"\n");
        project.create_file("sdk/boards/Kconfig", "config BOARD\n    bool\n");
        project.create_dir("sdk/components");
        project.create_dir(&format!("sdk/targets/{TARGET}"));
        project.create_file("app/project.toml", "[project]\nname = \"app\"\n");
        project
    }

    /// Same as `new`, plus an empty entry point
    pub fn with_main() -> Self {
        let project = Self::new();
        project.unit("app/main", EMPTY_DECLARATION, &["main.c"]);
        project
    }

    /// Base directory holding `sdk/` and `app/`
    pub fn path(&self) -> PathBuf {
        self.base.clone()
    }

    pub fn root(&self) -> PathBuf {
        self.base.join("sdk")
    }

    pub fn target_path(&self) -> PathBuf {
        self.base.join("sdk/targets").join(TARGET)
    }

    pub fn project_path(&self) -> PathBuf {
        self.base.join("app")
    }

    /// Environment matching the fixture layout
    pub fn build_env(&self) -> BuildEnv {
        BuildEnv::new(
            &self.root(),
            TARGET,
            &self.target_path(),
            &self.project_path(),
        )
    }

    /// Create a file, relative to the base directory
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.base.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory, relative to the base directory
    pub fn create_dir(&self, name: &str) {
        std::fs::create_dir_all(self.base.join(name)).expect("Failed to create directory");
    }

    /// Create a unit directory with a declaration and empty source files
    pub fn unit(&self, dir: &str, declaration: &str, files: &[&str]) -> PathBuf {
        self.create_file(&format!("{dir}/unit.toml"), declaration);
        for file in files {
            self.create_file(&format!("{dir}/{file}"), "");
        }
        self.base.join(dir)
    }

    /// Check if a path exists, relative to the base directory
    pub fn file_exists(&self, name: &str) -> bool {
        self.base.join(name).exists()
    }

    /// Read a file, relative to the base directory
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.base.join(name)).expect("Failed to read file")
    }

    /// Install an executable hook script for the fixture target
    #[cfg(unix)]
    pub fn hook(&self, name: &str, body: &str) {
        use std::os::unix::fs::PermissionsExt;

        let rel = format!("sdk/plugins/{TARGET}/{name}");
        self.create_file(&rel, &format!("#!/bin/sh\n{body}\n"));
        std::fs::set_permissions(
            self.base.join(rel),
            std::fs::Permissions::from_mode(0o755),
        )
        .expect("Failed to make hook executable");
    }

    /// Command for the binary with the fixture environment
    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_unitbuild"));
        cmd.current_dir(self.project_path())
            .env("UNITBUILD_ROOT", self.root())
            .env("UNITBUILD_TARGET", TARGET)
            .env("UNITBUILD_TARGET_PATH", self.target_path())
            .env("UNITBUILD_PROJECT_PATH", self.project_path())
            .env("UNITBUILD_CONFIG_DIR", self.base.join("config"))
            .env_remove("RUST_LOG")
            .args(args);
        cmd
    }

    /// Run the binary with the fixture environment
    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .output()
            .expect("Failed to execute unitbuild")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a persisted JSON file
pub fn read_json(path: &Path) -> serde_json::Value {
    let content = std::fs::read_to_string(path).expect("Failed to read JSON file");
    serde_json::from_str(&content).expect("Invalid JSON")
}

/// Combined stdout and stderr of a run
pub fn combined(output: &Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}
