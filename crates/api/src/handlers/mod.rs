pub mod health;
pub mod movies;
pub mod webhook;

use axum::extract::OriginalUri;

use crate::error::AppError;

/// Fallback for any request no route or static file matched.
pub async fn route_not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::RouteNotFound {
        path: uri.path().to_string(),
    }
}
