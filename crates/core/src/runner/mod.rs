//! Command runner capability.
//!
//! [`CommandRunner`] is the narrow seam between the deploy webhook and the
//! operating system. Production uses [`process::ProcessRunner`]; tests
//! substitute a fake that never touches a real process.

pub mod process;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

pub use process::ProcessRunner;

/// A fixed command invocation. Arguments are passed directly to the
/// program; nothing is interpreted by a shell.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory for the child process (uses current dir if `None`).
    pub working_directory: Option<PathBuf>,
    /// Additional environment variables set for the child process.
    pub env_vars: Vec<(String, String)>,
    /// Maximum wall-clock time before the process is killed.
    pub timeout: Duration,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_directory: None,
            env_vars: Vec::new(),
            timeout,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Output captured from a command, complete or partial.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` if the process never started or was killed by a signal.
    pub exit_code: Option<i32>,
    pub duration_ms: u64,
}

impl CommandOutput {
    /// Stdout and stderr joined for diagnostics, skipping empty streams.
    pub fn diagnostic(&self) -> String {
        let stdout = self.stdout.trim_end();
        let stderr = self.stderr.trim_end();
        match (stdout.is_empty(), stderr.is_empty()) {
            (true, true) => String::new(),
            (false, true) => stdout.to_string(),
            (true, false) => stderr.to_string(),
            (false, false) => format!("{stdout}\n{stderr}"),
        }
    }
}

/// Result of running a [`CommandSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The command exited with status 0.
    Success(CommandOutput),
    /// The command could not be started or exited non-zero.
    Failure {
        diagnostic: String,
        output: CommandOutput,
    },
    /// The command exceeded its timeout and was killed. `output` holds
    /// whatever was captured before the kill.
    TimedOut {
        timeout: Duration,
        output: CommandOutput,
    },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success(_))
    }

    pub fn output(&self) -> &CommandOutput {
        match self {
            RunOutcome::Success(output)
            | RunOutcome::Failure { output, .. }
            | RunOutcome::TimedOut { output, .. } => output,
        }
    }
}

/// Executes a [`CommandSpec`] and reports the outcome.
///
/// Implementations must honour `spec.timeout` and never panic; every failure
/// is expressed as a [`RunOutcome`] variant.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec) -> RunOutcome;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
