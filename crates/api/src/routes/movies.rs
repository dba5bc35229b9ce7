//! Route definitions for the movie catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::movies;
use crate::state::AppState;

/// Movie routes, merged under `/api`.
///
/// ```text
/// GET /movies          -> list_movies
/// GET /movies/{id}     -> get_movie
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/movies", get(movies::list_movies))
        .route("/movies/{id}", get(movies::get_movie))
}
