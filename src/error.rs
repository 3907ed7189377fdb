//! Error types for unitbuild
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

use crate::core::unit::Namespace;

/// Errors raised while collecting units into the build manifest
#[derive(Error, Debug)]
pub enum CollectError {
    /// The project has no `main/unit.toml`
    #[error("Missing entry point: '{path}' does not exist")]
    MissingEntryPoint { path: PathBuf },

    /// The same unit name was declared from two directories of one namespace
    #[error(
        "Duplicate unit '{name}' in {namespace}: declared from '{new}', already owned by '{existing}'"
    )]
    DuplicateUnit {
        name: String,
        namespace: Namespace,
        existing: PathBuf,
        new: PathBuf,
    },

    /// The same unit name exists in two different namespaces
    #[error(
        "Unit name collision for '{name}': '{new}' ({new_namespace}) conflicts with '{existing}' ({existing_namespace})"
    )]
    Collision {
        name: String,
        new_namespace: Namespace,
        new: PathBuf,
        existing_namespace: Namespace,
        existing: PathBuf,
    },

    /// A declaration file could not be evaluated
    #[error("Failed to evaluate '{path}': {source}")]
    Script {
        path: PathBuf,
        #[source]
        source: DeclarationError,
    },

    /// Directory scan failure
    #[error("Failed to scan '{path}': {error}")]
    Scan { path: PathBuf, error: String },
}

/// Errors raised while reading or expanding a declaration file
#[derive(Error, Debug)]
pub enum DeclarationError {
    /// File could not be read
    #[error("IO error: {error}")]
    Io { error: String },

    /// File is not a valid declaration
    #[error("Invalid declaration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A glob pattern could not be compiled
    #[error("Invalid glob pattern '{pattern}': {error}")]
    InvalidPattern { pattern: String, error: String },
}

/// Errors raised by drift detection
#[derive(Error, Debug)]
pub enum DriftError {
    /// Drift record exists but is unreadable
    #[error("Failed to read drift record '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// Drift record could not be written
    #[error("Failed to write drift record '{path}': {error}")]
    Write { path: PathBuf, error: String },

    /// Cleaning the stale build directory failed
    #[error(transparent)]
    Clean(#[from] FilesystemError),
}

/// Project-level errors
#[derive(Error, Debug)]
pub enum ProjectError {
    /// Directory is not a unitbuild project
    #[error("'{path}' is not a unitbuild project (no project.toml found)")]
    NotAProject { path: PathBuf },

    /// project.toml is malformed
    #[error("Failed to parse '{path}': {error}")]
    InvalidConfig { path: PathBuf, error: String },

    /// Project directory already exists
    #[error("Project already exists: {path}")]
    AlreadyExists { path: PathBuf },

    /// Template directory is missing
    #[error("Project template not found: {path}")]
    TemplateNotFound { path: PathBuf },

    /// Export/update destination is unusable
    #[error("Invalid destination '{path}': {reason}")]
    InvalidDestination { path: PathBuf, reason: String },

    /// Required environment setting missing
    #[error("Environment error: {message}")]
    Environment { message: String },

    /// Filesystem failure
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// Download errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Network error
    #[error("Network error downloading '{url}': {error}")]
    NetworkError { url: String, error: String },

    /// Checksum verification failed
    #[error("Checksum mismatch for '{name}': expected {expected}, got {actual}")]
    ChecksumMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// Archive could not be extracted
    #[error("Failed to extract archive into '{path}': {error}")]
    Extract { path: PathBuf, error: String },

    /// Max retries exceeded
    #[error("Download failed after {retries} retries: {url}")]
    MaxRetriesExceeded { url: String, retries: u32 },
}

/// Component registry errors
#[derive(Error, Debug)]
pub enum InstallError {
    /// Component not found in registry
    #[error("Component '{name}' not found in registry")]
    NotFound { name: String },

    /// Component already installed
    #[error("Component '{name}' already exists at '{path}'")]
    AlreadyInstalled { name: String, path: PathBuf },

    /// Component is not installed
    #[error("Component '{name}' is not installed at '{path}'")]
    NotInstalled { name: String, path: PathBuf },

    /// Invalid version string
    #[error("Invalid version '{version}': {error}")]
    InvalidVersion { version: String, error: String },

    /// Registry returned something unexpected
    #[error("Registry error: {error}")]
    Registry { error: String },

    /// Download failure
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Filesystem failure
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// External process errors
#[derive(Error, Debug)]
pub enum ProcessError {
    /// Process could not be spawned
    #[error("Failed to spawn '{command}': {error}")]
    Spawn { command: String, error: String },

    /// Waiting on the process failed
    #[error("Failed to wait for '{command}': {error}")]
    Wait { command: String, error: String },

    /// A hook exited unsuccessfully
    #[error("Hook '{hook}' failed with exit code {code}")]
    HookFailed { hook: String, code: i32 },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },

    /// Failed to copy a tree
    #[error("Failed to copy '{from}' to '{to}': {error}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        error: String,
    },
}

/// Top-level unitbuild error type
#[derive(Error, Debug)]
pub enum UnitbuildError {
    /// Collection error
    #[error("Collect error: {0}")]
    Collect(#[from] CollectError),

    /// Drift detection error
    #[error("Drift error: {0}")]
    Drift(#[from] DriftError),

    /// Project error
    #[error("Project error: {0}")]
    Project(#[from] ProjectError),

    /// Install error
    #[error("Install error: {0}")]
    Install(#[from] InstallError),

    /// Process error
    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// Persisted file could not be (de)serialized
    #[error("Failed to process '{path}': {error}")]
    Serialize { path: PathBuf, error: String },
}
