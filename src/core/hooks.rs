//! Plugin hook dispatch
//!
//! Each target may ship executables under `<root>/plugins/<target>/`, one per
//! hook name. A hook runs in the project directory with the `UNITBUILD_*`
//! variables exported.

use std::fmt;
use std::path::PathBuf;

use crate::core::env::BuildEnv;
use crate::error::ProcessError;
use crate::infra::process::{exec_command, CommandOutput, CommandSpec};

/// Extension points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookName {
    Build,
    Clean,
    Flash,
    Menuconfig,
    Export,
    Update,
}

impl HookName {
    /// Executable name of the hook
    pub fn as_str(self) -> &'static str {
        match self {
            HookName::Build => "build",
            HookName::Clean => "clean",
            HookName::Flash => "flash",
            HookName::Menuconfig => "menuconfig",
            HookName::Export => "export",
            HookName::Update => "update",
        }
    }
}

impl fmt::Display for HookName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// Dispatch disabled for this invocation
    Disabled,
    /// No executable registered for the hook
    Missing,
    /// The hook ran and exited successfully
    Ran(CommandOutput),
}

/// Hook dispatcher for one target
#[derive(Debug, Clone)]
pub struct PluginHooks {
    plugin_dir: PathBuf,
    project_path: PathBuf,
    env: Vec<(String, String)>,
    enabled: bool,
    echo: bool,
}

impl PluginHooks {
    /// Dispatcher for the environment's target
    pub fn new(env: &BuildEnv, enabled: bool) -> Self {
        Self {
            plugin_dir: env.plugin_dir(),
            project_path: env.project_path.clone(),
            env: env.hook_env(),
            enabled,
            echo: true,
        }
    }

    /// Capture hook output without echoing it
    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    /// Executable path for a hook
    pub fn hook_path(&self, hook: HookName) -> PathBuf {
        self.plugin_dir.join(hook.as_str())
    }

    /// Run a hook with pass-through arguments
    pub async fn dispatch(
        &self,
        hook: HookName,
        args: &[String],
    ) -> Result<HookOutcome, ProcessError> {
        if !self.enabled {
            tracing::debug!("hooks disabled, skipping '{hook}'");
            return Ok(HookOutcome::Disabled);
        }

        let program = self.hook_path(hook);
        if !program.is_file() {
            tracing::debug!("no '{hook}' hook at {}", program.display());
            return Ok(HookOutcome::Missing);
        }

        let spec = CommandSpec {
            program: &program,
            args,
            cwd: Some(&self.project_path),
            env: &self.env,
            echo: self.echo,
        };
        let output = exec_command(&spec).await?;

        if !output.success() {
            return Err(ProcessError::HookFailed {
                hook: hook.to_string(),
                code: output.code,
            });
        }
        Ok(HookOutcome::Ran(output))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::TempDir;

    fn install_hook(env: &BuildEnv, hook: HookName, body: &str) {
        let path = env.plugin_dir().join(hook.as_str());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn sample_env(base: &Path) -> BuildEnv {
        std::fs::create_dir_all(base.join("app")).unwrap();
        BuildEnv::new(
            &base.join("sdk"),
            "esp32",
            &base.join("sdk/targets/esp32"),
            &base.join("app"),
        )
    }

    #[tokio::test]
    async fn test_missing_hook_is_noop() {
        let temp = TempDir::new().unwrap();
        let hooks = PluginHooks::new(&sample_env(temp.path()), true).quiet();

        let outcome = hooks.dispatch(HookName::Flash, &[]).await.unwrap();

        assert_eq!(outcome, HookOutcome::Missing);
    }

    #[tokio::test]
    async fn test_disabled_hooks_do_not_run() {
        let temp = TempDir::new().unwrap();
        let env = sample_env(temp.path());
        install_hook(&env, HookName::Build, "exit 1");
        let hooks = PluginHooks::new(&env, false).quiet();

        let outcome = hooks.dispatch(HookName::Build, &[]).await.unwrap();

        assert_eq!(outcome, HookOutcome::Disabled);
    }

    #[tokio::test]
    async fn test_hook_receives_args_env_and_cwd() {
        let temp = TempDir::new().unwrap();
        let env = sample_env(temp.path());
        install_hook(
            &env,
            HookName::Build,
            "echo \"$1 $UNITBUILD_TARGET $UNITBUILD_PROJECT\"; pwd",
        );
        let hooks = PluginHooks::new(&env, true).quiet();

        let outcome = hooks
            .dispatch(HookName::Build, &["-j4".to_string()])
            .await
            .unwrap();

        let HookOutcome::Ran(output) = outcome else {
            panic!("Expected hook to run");
        };
        assert_eq!(output.stdout[0], "-j4 esp32 app");
        assert_eq!(
            Path::new(&output.stdout[1]).canonicalize().unwrap(),
            env.project_path
        );
    }

    #[tokio::test]
    async fn test_failing_hook_is_error() {
        let temp = TempDir::new().unwrap();
        let env = sample_env(temp.path());
        install_hook(&env, HookName::Clean, "echo boom 1>&2; exit 2");
        let hooks = PluginHooks::new(&env, true).quiet();

        let result = hooks.dispatch(HookName::Clean, &[]).await;

        match result {
            Err(ProcessError::HookFailed { hook, code }) => {
                assert_eq!(hook, "clean");
                assert_eq!(code, 2);
            }
            other => panic!("Expected HookFailed, got: {other:?}"),
        }
    }
}
