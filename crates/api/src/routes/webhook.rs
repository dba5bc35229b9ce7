//! Route definitions for the deploy hook app.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{health, webhook};
use crate::state::DeployState;

/// Deploy hook routes, mounted at the root.
///
/// ```text
/// POST /webhook        -> trigger_deploy (requires x-deploy-token)
/// GET  /health         -> hook_health
/// ```
pub fn router() -> Router<DeployState> {
    Router::new()
        .route("/webhook", post(webhook::trigger_deploy))
        .route("/health", get(health::hook_health))
}
