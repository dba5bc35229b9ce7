//! Status and body mapping for `AppError` and `DeployError`.

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;

use cinelite_api::error::{panic_response, AppError, DeployError};
use cinelite_core::error::CoreError;

async fn render(response: axum::response::Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn not_found_uses_entity_name() {
    let err = AppError::from(CoreError::NotFound {
        entity: "Movie",
        id: 7,
    });
    let (status, json) = render(err.into_response()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, serde_json::json!({"success": false, "message": "Movie not found"}));
}

#[tokio::test]
async fn caught_panics_are_sanitized() {
    let (status, json) = render(panic_response(Box::new("secret detail"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "An internal error occurred");

    let (status, json) = render(panic_response(Box::new(String::from("secret detail")))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!json["message"].as_str().unwrap().contains("secret"));
}

#[tokio::test]
async fn validation_is_bad_request() {
    let (status, json) =
        render(AppError::Core(CoreError::Validation("bad genre".into())).into_response()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "bad genre");
}

#[test]
fn deploy_error_statuses() {
    assert_eq!(DeployError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(DeployError::InvalidPayload("x".into()).status(), StatusCode::BAD_REQUEST);
    assert_eq!(DeployError::InProgress.status(), StatusCode::CONFLICT);
    assert_eq!(
        DeployError::TimedOut { secs: 5, diagnostic: String::new() }.status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn conflict_is_409() {
    let err: AppError = CoreError::Conflict("duplicate".into()).into();
    assert_matches!(err, AppError::Core(CoreError::Conflict(ref msg)) if msg == "duplicate");

    let (status, json) = render(err.into_response()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["message"], "duplicate");
}

#[tokio::test]
async fn deploy_failure_carries_error_field() {
    let err = DeployError::TimedOut {
        secs: 300,
        diagnostic: "partial build log".into(),
    };
    let (status, json) = render(err.into_response()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["ok"], false);
    assert_eq!(json["message"], "Deploy timed out after 300s");
    assert_eq!(json["error"], "partial build log");
}

#[tokio::test]
async fn rejections_have_no_error_field() {
    let (status, json) = render(DeployError::Unauthorized.into_response()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json, serde_json::json!({"ok": false, "message": "Unauthorized"}));
}
