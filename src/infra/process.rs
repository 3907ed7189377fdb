//! External process execution
//!
//! Runs a command and streams its standard output and standard error
//! concurrently, one reader per stream, so neither pipe can fill up and
//! block the child.

use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

use crate::error::ProcessError;

/// Result of running an external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code (-1 when terminated by a signal)
    pub code: i32,
    /// Captured standard output lines
    pub stdout: Vec<String>,
    /// Captured standard error lines
    pub stderr: Vec<String>,
}

impl CommandOutput {
    /// Whether the command exited with status 0
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// A command to execute
#[derive(Debug, Clone)]
pub struct CommandSpec<'a> {
    /// Program to run
    pub program: &'a Path,
    /// Arguments
    pub args: &'a [String],
    /// Working directory
    pub cwd: Option<&'a Path>,
    /// Extra environment variables
    pub env: &'a [(String, String)],
    /// Echo each line as it arrives
    pub echo: bool,
}

impl<'a> CommandSpec<'a> {
    /// Create a spec with no extra environment and echo enabled
    pub fn new(program: &'a Path, args: &'a [String]) -> Self {
        Self {
            program,
            args,
            cwd: None,
            env: &[],
            echo: true,
        }
    }
}

async fn read_lines<R>(stream: Option<R>, echo: bool, to_stderr: bool) -> Vec<String>
where
    R: AsyncRead + Unpin,
{
    let Some(stream) = stream else {
        return Vec::new();
    };

    let mut collected = Vec::new();
    let mut lines = BufReader::new(stream).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim_end().to_string();
        if echo {
            if to_stderr {
                eprintln!("{line}");
            } else {
                println!("{line}");
            }
        }
        collected.push(line);
    }
    collected
}

/// Run a command to completion, capturing both output streams
pub async fn exec_command(spec: &CommandSpec<'_>) -> Result<CommandOutput, ProcessError> {
    let program = spec.program.display().to_string();
    tracing::info!("exec cmd {} {}", program, spec.args.join(" "));

    let mut command = Command::new(spec.program);
    command
        .args(spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(cwd) = spec.cwd {
        command.current_dir(cwd);
    }
    for (key, value) in spec.env {
        command.env(key, value);
    }

    let mut child = command.spawn().map_err(|e| ProcessError::Spawn {
        command: program.clone(),
        error: e.to_string(),
    })?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (stdout, stderr, status) = tokio::join!(
        read_lines(stdout, spec.echo, false),
        read_lines(stderr, spec.echo, true),
        child.wait()
    );

    let status = status.map_err(|e| ProcessError::Wait {
        command: program,
        error: e.to_string(),
    })?;

    Ok(CommandOutput {
        code: status.code().unwrap_or(-1),
        stdout,
        stderr,
    })
}
