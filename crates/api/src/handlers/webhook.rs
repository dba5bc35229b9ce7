//! Deploy webhook handler.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use cinelite_core::deploy::run_deploy;
use cinelite_core::runner::RunOutcome;
use serde::Deserialize;

use crate::error::DeployError;
use crate::middleware::deploy_token::RequireDeployToken;
use crate::response::DeployResponse;
use crate::state::DeployState;

/// Optional fields a CI system may post. Everything is optional and the
/// body may be empty or not JSON at all; only `ref` affects the deploy.
#[derive(Debug, Default, Deserialize)]
pub struct DeployPayload {
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    pub branch: Option<String>,
    pub commit: Option<String>,
}

impl DeployPayload {
    /// Parse leniently: anything that is not a JSON object yields the default.
    pub fn from_body(body: &[u8]) -> Self {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Self::default();
        }
        serde_json::from_slice(body).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Ignoring unparseable deploy payload");
            Self::default()
        })
    }

    fn requested_ref(&self) -> Option<&str> {
        self.git_ref
            .as_deref()
            .or(self.branch.as_deref())
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}

/// POST /webhook
///
/// Authenticate, take the deploy gate, run the deploy script and report its
/// output. A second request while a deploy runs gets 409 and is not queued.
pub async fn trigger_deploy(
    RequireDeployToken(caller): RequireDeployToken,
    State(state): State<DeployState>,
    body: Bytes,
) -> Result<Json<DeployResponse>, DeployError> {
    let payload = DeployPayload::from_body(&body);
    let git_ref = payload.requested_ref();

    let spec = state
        .deploy
        .script
        .command(git_ref)
        .map_err(|e| DeployError::InvalidPayload(e.to_string()))?;

    let _permit = state.gate.try_acquire().map_err(|e| {
        tracing::warn!(source = %caller, error = %e, "Deploy rejected: already in progress");
        DeployError::InProgress
    })?;

    tracing::info!(
        source = %caller,
        git_ref = git_ref.unwrap_or("<default>"),
        commit = payload.commit.as_deref().unwrap_or("<none>"),
        command = %spec,
        "Deploy started",
    );

    match run_deploy(state.runner.as_ref(), &spec).await {
        RunOutcome::Success(output) => {
            tracing::info!(
                source = %caller,
                duration_ms = output.duration_ms,
                "Deploy completed",
            );
            Ok(Json(DeployResponse::success(output)))
        }
        RunOutcome::Failure { diagnostic, output } => {
            let captured = output.diagnostic();
            tracing::error!(
                source = %caller,
                exit_code = ?output.exit_code,
                error = %diagnostic,
                output = %captured,
                "Deploy failed",
            );
            let diagnostic = if captured.is_empty() {
                diagnostic
            } else {
                format!("{diagnostic}\n{captured}")
            };
            Err(DeployError::Failed { diagnostic })
        }
        RunOutcome::TimedOut { timeout, output } => {
            let diagnostic = output.diagnostic();
            tracing::error!(
                source = %caller,
                timeout_secs = timeout.as_secs(),
                output = %diagnostic,
                "Deploy timed out",
            );
            Err(DeployError::TimedOut {
                secs: timeout.as_secs(),
                diagnostic,
            })
        }
    }
}
