//! Integration tests for the movie catalog endpoints and static fallback.

mod common;

use axum::http::StatusCode;
use common::{body_json, body_text, get};

fn ids(json: &serde_json::Value) -> Vec<i64> {
    json["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|m| m["id"].as_i64().expect("id"))
        .collect()
}

// ---------------------------------------------------------------------------
// GET /api/movies
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_returns_whole_catalog() {
    let response = get(common::build_test_app(), "/api/movies").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["count"], 5);
    assert_eq!(ids(&json), vec![101, 102, 103, 104, 105]);
    assert!(json["data"][0].get("showtimes").is_none());
}

#[tokio::test]
async fn genre_filter_is_case_insensitive() {
    let json = body_json(get(common::build_test_app(), "/api/movies?genre=drama").await).await;
    assert_eq!(ids(&json), vec![101]);
    assert_eq!(json["count"], 1);
}

#[tokio::test]
async fn min_score_filter() {
    let json = body_json(get(common::build_test_app(), "/api/movies?minScore=8").await).await;
    assert_eq!(ids(&json), vec![102, 104]);
}

#[tokio::test]
async fn non_numeric_min_score_is_ignored() {
    let response = get(common::build_test_app(), "/api/movies?minScore=abc").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["count"], 5);
}

#[tokio::test]
async fn filters_combine() {
    let json = body_json(
        get(
            common::build_test_app(),
            "/api/movies?genre=Sci-Fi&minScore=8",
        )
        .await,
    )
    .await;
    assert_eq!(ids(&json), vec![102]);
}

#[tokio::test]
async fn text_query_matches_title() {
    let json = body_json(get(common::build_test_app(), "/api/movies?q=ECHO").await).await;
    assert_eq!(ids(&json), vec![104]);
}

#[tokio::test]
async fn undecodable_query_is_bad_request() {
    let response = get(common::build_test_app(), "/api/movies?genre=Drama&genre=Family").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["message"].as_str().unwrap().contains("genre"));
}

#[tokio::test]
async fn unmatched_filter_returns_empty_list() {
    let json = body_json(get(common::build_test_app(), "/api/movies?genre=Horror").await).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["count"], 0);
    assert_eq!(json["data"], serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// GET /api/movies/{id}
// ---------------------------------------------------------------------------

#[tokio::test]
async fn detail_includes_showtimes() {
    let response = get(common::build_test_app(), "/api/movies/101").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["id"], 101);
    assert_eq!(
        json["data"]["showtimes"],
        serde_json::json!(["10:00", "13:30", "16:45", "20:00"])
    );
}

#[tokio::test]
async fn unknown_id_is_404() {
    let response = get(common::build_test_app(), "/api/movies/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Movie not found");
}

#[tokio::test]
async fn malformed_id_is_404() {
    let response = get(common::build_test_app(), "/api/movies/abc").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Movie not found");
}

// ---------------------------------------------------------------------------
// Fallbacks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_api_route_reports_path() {
    let response = get(common::build_test_app(), "/api/showtimes").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Route not found");
    assert_eq!(json["path"], "/api/showtimes");
}

#[tokio::test]
async fn static_index_is_served_at_root() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>CineLite</h1>").unwrap();

    let response = get(common::build_test_app_with_static(dir.path()), "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"), "got {content_type}");
    assert_eq!(body_text(response).await, "<h1>CineLite</h1>");
}

#[tokio::test]
async fn missing_static_file_is_json_404() {
    let dir = tempfile::tempdir().unwrap();

    let response = get(common::build_test_app_with_static(dir.path()), "/nope.js").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["path"], "/nope.js");
}

#[tokio::test]
async fn shipped_frontend_is_served_and_renders_posters() {
    let public = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../public");
    let app = common::build_test_app_with_static(&public);

    let response = get(app.clone(), "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("/main.js"));

    let response = get(app, "/main.js").await;
    assert_eq!(response.status(), StatusCode::OK);
    let script = body_text(response).await;
    assert!(script.contains("posterUrl"));
    assert!(script.contains("'/api/movies?'"));
}
