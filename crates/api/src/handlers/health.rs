//! Health check handlers for both apps.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Catalog API health payload.
#[derive(Debug, Serialize)]
pub struct ApiHealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// RFC 3339 UTC timestamp.
    pub timestamp: String,
    pub env: &'static str,
}

/// GET /api/health
pub async fn api_health(State(state): State<AppState>) -> Json<ApiHealthResponse> {
    Json(ApiHealthResponse {
        status: "OK",
        service: "CineLite API",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
        env: state.config.environment.as_str(),
    })
}

/// Minimal liveness payload for the deploy hook.
#[derive(Debug, Serialize)]
pub struct HookHealthResponse {
    pub status: &'static str,
    pub time: String,
}

/// GET /health (deploy hook app)
pub async fn hook_health() -> Json<HookHealthResponse> {
    Json(HookHealthResponse {
        status: "ok",
        time: Utc::now().to_rfc3339(),
    })
}
