use axum::routing::get;
use axum::Router;

use crate::handlers::health;
use crate::state::AppState;

/// ```text
/// GET /health          -> api_health
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health::api_health))
}
