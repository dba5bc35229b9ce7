//! Shared response envelope types for API handlers.
//!
//! Catalog responses use a `{ "success": true, ... }` envelope; the deploy
//! webhook uses `{ "ok": bool, "message": ... }`. Use these types instead of
//! ad-hoc `serde_json::json!` so the shapes stay consistent.

use cinelite_core::runner::CommandOutput;
use serde::Serialize;

/// `{ "success": true, "count": n, "data": [...] }` for list endpoints.
#[derive(Debug, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T: Serialize> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// `{ "success": true, "data": T }` for single-item endpoints.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Deploy webhook response body.
#[derive(Debug, Serialize)]
pub struct DeployResponse {
    pub ok: bool,
    pub message: String,
    /// Captured stdout of a successful deploy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Captured stderr of a successful deploy (git and build tools log here).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    /// Diagnostic for a failed or timed-out deploy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeployResponse {
    pub fn success(output: CommandOutput) -> Self {
        Self {
            ok: true,
            message: "Deploy completed".into(),
            output: Some(output.stdout),
            stderr: Some(output.stderr),
            error: None,
        }
    }

    pub fn failure(message: String, error: String) -> Self {
        Self {
            ok: false,
            message,
            output: None,
            stderr: None,
            error: Some(error),
        }
    }

    pub fn rejected(message: String) -> Self {
        Self {
            ok: false,
            message,
            output: None,
            stderr: None,
            error: None,
        }
    }
}
