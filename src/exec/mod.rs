//! Process execution seam.
//!
//! Invocation -> Runner::run -> ProcessOutput
//! Helpers: run_checked (non-zero exit = error), run_json (checked + decode), exit_code.
//!
//! `ProcessRunner` is the real implementation (tokio::process on an owned runtime,
//! optional timeout). Tests use `testing::ScriptedRunner` instead.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use anyhow::Context;

use crate::error::{OpsError, OpsResult};

/// One external process call: program, arguments and optional working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new<S: Into<String>>(program: impl Into<String>, args: impl IntoIterator<Item = S>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
        }
    }

    /// Run inside `dir` instead of the current directory.
    pub fn in_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&shell_words::join(self.argv()))
    }
}

/// Captured result of a finished process. `code` is `None` when killed by a signal.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
}

/// Runs invocations to completion. Blocking from the caller's point of view.
pub trait Runner {
    fn run(&self, inv: &Invocation) -> OpsResult<ProcessOutput>;
}

/// Real runner: spawns via `tokio::process`, stdout captured, stderr passed through.
pub struct ProcessRunner {
    rt: tokio::runtime::Runtime,
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new(timeout: Option<Duration>) -> anyhow::Result<Self> {
        let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
        Ok(Self { rt, timeout })
    }

    async fn run_async(&self, inv: &Invocation) -> OpsResult<ProcessOutput> {
        let mut cmd = tokio::process::Command::new(&inv.program);
        cmd.args(&inv.args)
            .stdout(Stdio::piped())
            // Keep the tool's own diagnostics visible to the user.
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = &inv.cwd {
            cmd.current_dir(dir);
        }

        let fut = cmd.output();
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| OpsError::Timeout {
                    program: inv.program.clone(),
                    limit,
                })?,
            None => fut.await,
        }
        .map_err(|source| OpsError::Spawn {
            program: inv.program.clone(),
            source,
        })?;

        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: output.stdout,
        })
    }
}

impl Runner for ProcessRunner {
    fn run(&self, inv: &Invocation) -> OpsResult<ProcessOutput> {
        crate::log_debug!("exec: {inv}");
        let out = self.rt.block_on(self.run_async(inv))?;
        crate::log_trace!("exit: {:?} ({} bytes stdout)", out.code, out.stdout.len());
        Ok(out)
    }
}

/// Run and require a zero exit code. Stdout of a failed run is discarded.
pub fn run_checked(runner: &dyn Runner, inv: &Invocation) -> OpsResult<ProcessOutput> {
    let out = runner.run(inv)?;
    match out.code {
        Some(0) => Ok(out),
        Some(code) => Err(OpsError::NonZeroExitCode(code)),
        None => Err(OpsError::Terminated {
            program: inv.program.clone(),
        }),
    }
}

/// Run, require success, and decode stdout as JSON.
pub fn run_json(runner: &dyn Runner, inv: &Invocation) -> OpsResult<serde_json::Value> {
    let out = run_checked(runner, inv)?;
    serde_json::from_slice(&out.stdout).map_err(|source| OpsError::Decode {
        command: inv.to_string(),
        source,
    })
}

/// Run and hand back the exit code itself (for commands that answer via their status).
pub fn exit_code(runner: &dyn Runner, inv: &Invocation) -> OpsResult<i32> {
    runner.run(inv)?.code.ok_or_else(|| OpsError::Terminated {
        program: inv.program.clone(),
    })
}

/* ---- Test support ---- */
