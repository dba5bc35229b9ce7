//! Handlers for the movie catalog.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use cinelite_core::catalog::MovieRecord;
use cinelite_core::types::MovieId;

use crate::error::{AppError, AppResult};
use crate::query::MovieQuery;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// GET /api/movies
///
/// List movies, optionally narrowed by `genre`, `minScore` and `q`.
/// An unparseable `minScore` is ignored (and logged) rather than rejected;
/// only a query string that cannot be decoded at all is a 400.
pub async fn list_movies(
    State(state): State<AppState>,
    params: Result<Query<MovieQuery>, QueryRejection>,
) -> AppResult<Json<ListResponse<MovieRecord>>> {
    let Query(params) = params?;
    let filter = params.to_filter();

    if let Some(raw) = filter.min_score_rejected() {
        tracing::warn!(min_score = %raw, "Ignoring non-numeric minScore");
    }

    let movies: Vec<MovieRecord> = filter.apply(&state.catalog).into_iter().cloned().collect();

    tracing::debug!(
        genre = ?filter.genre,
        min_score = ?filter.min_score,
        query = ?filter.query,
        count = movies.len(),
        "Listed movies",
    );

    Ok(Json(ListResponse::new(movies)))
}

/// GET /api/movies/{id}
///
/// Retrieve a single movie with its showtimes. Unknown and malformed ids
/// both produce the 404 not-found shape.
pub async fn get_movie(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<DataResponse<MovieRecord>>> {
    let id: MovieId = raw_id.trim().parse().map_err(|_| AppError::MalformedId {
        entity: "Movie",
        raw: raw_id.clone(),
    })?;

    let movie = state.catalog.detail(id)?;

    Ok(Json(DataResponse::new(movie)))
}
