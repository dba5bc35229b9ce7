use std::any::Any;

use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cinelite_core::error::CoreError;
use serde_json::json;

use crate::response::DeployResponse;

/// Application-level error type for catalog handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Renders as `{ "success": false, "message": ... }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `cinelite_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A path id that is not an integer. Reported like a missing entity.
    #[error("{entity} not found")]
    MalformedId { entity: &'static str, raw: String },

    /// No route or static file matched the request path.
    #[error("Route not found")]
    RouteNotFound { path: String },

    /// Query string that could not be deserialized.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A handler panicked. The detail is logged, never returned.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// `CatchPanicLayer` handler: render a caught panic as a sanitized 500.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    AppError::InternalError(detail).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, core.to_string()),
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            },

            // --- HTTP-specific errors ---
            AppError::MalformedId { .. } | AppError::RouteNotFound { .. } => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = match &self {
            AppError::RouteNotFound { path } => json!({
                "success": false,
                "message": message,
                "path": path,
            }),
            _ => json!({
                "success": false,
                "message": message,
            }),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Errors from the deploy webhook. Renders as `{ "ok": false, ... }`.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// Token header missing or wrong.
    #[error("Unauthorized")]
    Unauthorized,

    /// Payload present but unusable (e.g. an unsafe git ref).
    #[error("{0}")]
    InvalidPayload(String),

    /// Another deploy holds the gate.
    #[error("Deploy already in progress")]
    InProgress,

    /// The deploy command failed to start or exited non-zero.
    #[error("Deploy failed")]
    Failed { diagnostic: String },

    /// The deploy command was killed after exceeding its timeout.
    #[error("Deploy timed out after {secs}s")]
    TimedOut { secs: u64, diagnostic: String },
}

impl DeployError {
    pub fn status(&self) -> StatusCode {
        match self {
            DeployError::Unauthorized => StatusCode::UNAUTHORIZED,
            DeployError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            DeployError::InProgress => StatusCode::CONFLICT,
            DeployError::Failed { .. } | DeployError::TimedOut { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for DeployError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        let body = match self {
            DeployError::Failed { diagnostic } | DeployError::TimedOut { diagnostic, .. } => {
                DeployResponse::failure(message, diagnostic)
            }
            _ => DeployResponse::rejected(message),
        };
        (status, axum::Json(body)).into_response()
    }
}
