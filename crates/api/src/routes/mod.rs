pub mod health;
pub mod movies;
pub mod webhook;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree for the catalog app.
///
/// ```text
/// /health                      service health
/// /movies                      list, filtered by genre, minScore, q
/// /movies/{id}                 single movie with showtimes
/// ```
///
/// Anything else under `/api` falls through to the router fallback.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(movies::router())
}
