//! Shared-secret extractor for the deploy webhook.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::client_addr::ClientAddr;
use crate::error::DeployError;
use crate::state::DeployState;

/// Header carrying the deploy shared secret.
pub const DEPLOY_TOKEN_HEADER: &str = "x-deploy-token";

/// Proof that the request carried the correct deploy token.
///
/// Runs before any body extractor, so a bad token is rejected with 401
/// regardless of what the body contains:
///
/// ```ignore
/// async fn trigger(RequireDeployToken(caller): RequireDeployToken, body: Bytes) {
///     tracing::info!(source = %caller, "authorized deploy");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireDeployToken(pub ClientAddr);

impl FromRequestParts<DeployState> for RequireDeployToken {
    type Rejection = DeployError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &DeployState,
    ) -> Result<Self, Self::Rejection> {
        let caller = ClientAddr::from_parts(parts);

        let token = parts
            .headers
            .get(DEPLOY_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());

        match token {
            Some(token) if state.deploy.secret.verify(token) => Ok(RequireDeployToken(caller)),
            Some(_) => {
                tracing::warn!(source = %caller, "Deploy rejected: invalid token");
                Err(DeployError::Unauthorized)
            }
            None => {
                tracing::warn!(source = %caller, "Deploy rejected: missing token");
                Err(DeployError::Unauthorized)
            }
        }
    }
}
