//! Deploy webhook domain logic.
//!
//! - [`secret::SharedSecret`] -- constant-time token verification.
//! - [`gate::DeployGate`] -- at most one deploy in flight, never queued.
//! - [`DeployScript`] -- builds the fixed [`CommandSpec`] for a deploy.
//! - [`run_deploy`] -- runs the spec with an outer time bound.

pub mod gate;
pub mod secret;

use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;
use crate::runner::{CommandOutput, CommandRunner, CommandSpec, RunOutcome};

/// Default deploy timeout (5 minutes).
pub const DEFAULT_DEPLOY_TIMEOUT: Duration = Duration::from_secs(300);

/// Extra time a runner gets past `spec.timeout` to kill its child and
/// collect output before [`run_deploy`] gives up on it.
pub const RUNNER_KILL_GRACE: Duration = Duration::from_secs(2);

/// Environment variable carrying the requested git ref into the script.
pub const DEPLOY_REF_ENV: &str = "DEPLOY_REF";

/// Maximum accepted length of a git ref in a deploy payload.
const MAX_REF_LEN: usize = 255;

/// Allowed git ref characters: alphanumeric, `/`, `-`, `_`, `.`.
/// Rejects `..` so a ref cannot walk the ref namespace, and any path
/// segment starting with `-` so a ref can never be read as a git option.
pub fn is_safe_ref(git_ref: &str) -> bool {
    !git_ref.is_empty()
        && git_ref.len() <= MAX_REF_LEN
        && !git_ref.contains("..")
        && !git_ref.split('/').any(|segment| segment.starts_with('-'))
        && git_ref
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.'))
}

/// The fixed deploy script and how to run it.
#[derive(Debug, Clone)]
pub struct DeployScript {
    /// Script executed with `bash`.
    pub path: PathBuf,
    pub working_directory: Option<PathBuf>,
    pub timeout: Duration,
}

impl DeployScript {
    /// Build the command for one deploy. The optional ref is exposed to the
    /// script as [`DEPLOY_REF_ENV`], never spliced into the command line.
    pub fn command(&self, git_ref: Option<&str>) -> Result<CommandSpec, CoreError> {
        let mut spec =
            CommandSpec::new("bash", self.timeout).arg(self.path.to_string_lossy().into_owned());

        if let Some(dir) = &self.working_directory {
            spec = spec.current_dir(dir);
        }
        if let Some(git_ref) = git_ref {
            if !is_safe_ref(git_ref) {
                return Err(CoreError::Validation(format!("Invalid git ref '{git_ref}'")));
            }
            spec = spec.env(DEPLOY_REF_ENV, git_ref);
        }
        Ok(spec)
    }
}

/// Run a deploy command, bounding the runner itself.
///
/// A well-behaved runner enforces `spec.timeout` and reports partial output.
/// If a runner overruns that by more than [`RUNNER_KILL_GRACE`] it is
/// abandoned and the deploy is reported as timed out with no output.
pub async fn run_deploy(runner: &dyn CommandRunner, spec: &CommandSpec) -> RunOutcome {
    match tokio::time::timeout(spec.timeout + RUNNER_KILL_GRACE, runner.run(spec)).await {
        Ok(outcome) => outcome,
        Err(_elapsed) => RunOutcome::TimedOut {
            timeout: spec.timeout,
            output: CommandOutput::default(),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
