//! Shared application router builders.
//!
//! Both binaries and the integration tests (`tests/common/mod.rs`) build
//! their routers here so they run the exact same middleware stack.

use std::time::Duration;

use axum::handler::HandlerWithoutStateExt;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::error::panic_response;
use crate::handlers::route_not_found;
use crate::middleware::deploy_token::DEPLOY_TOKEN_HEADER;
use crate::routes;
use crate::state::{AppState, DeployState};

/// Slack on top of the deploy timeout before the HTTP layer gives up.
const DEPLOY_HTTP_SLACK: Duration = Duration::from_secs(30);

/// Build the catalog [`Router`]: `/api` routes, static files from
/// `config.static_dir`, and a JSON 404 for everything else.
///
/// The middleware stack is applied bottom-up:
///
/// 1. CORS
/// 2. Set request ID on incoming requests
/// 3. Structured request/response tracing
/// 4. Propagate request ID to response
/// 5. Request timeout
/// 6. Panic recovery (catch panics, return 500)
pub fn build_app_router(state: AppState) -> Router {
    let config = state.config.clone();

    let static_files = ServeDir::new(&config.static_dir)
        .call_fallback_on_method_not_allowed(true)
        .fallback(route_not_found.into_service());

    let router = Router::new()
        .nest("/api", routes::api_routes())
        .fallback_service(static_files)
        .with_state(state);

    with_middleware(router, &config, Duration::from_secs(config.request_timeout_secs))
}

/// Build the deploy hook [`Router`].
///
/// Same middleware as the catalog app, but the request timeout is derived
/// from the deploy timeout so the runner's own bound always fires first.
pub fn build_deploy_router(state: DeployState) -> Router {
    let server = state.server.clone();
    let timeout = state.deploy.script.timeout + DEPLOY_HTTP_SLACK;

    let router = routes::webhook::router()
        .fallback(route_not_found)
        .with_state(state);

    with_middleware(router, &server, timeout)
}

fn with_middleware(router: Router, config: &ServerConfig, timeout: Duration) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");

    router
        // Panic recovery: catch panics and return a sanitized 500.
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(build_cors_layer(config))
}

/// Build the CORS middleware layer from server configuration.
///
/// Origins are validated when the config is loaded; anything that still
/// fails to parse here is skipped with a warning.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %o, error = %e, "Skipping invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(DEPLOY_TOKEN_HEADER)])
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use std::net::IpAddr;
    use std::path::PathBuf;

    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::config::AppEnv;

    fn config() -> ServerConfig {
        ServerConfig {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
            environment: AppEnv::Test,
            cors_origins: vec!["http://localhost:3000".into()],
            request_timeout_secs: 30,
            shutdown_timeout_secs: 1,
            static_dir: PathBuf::from("public"),
        }
    }

    async fn panicking_handler() -> &'static str {
        panic!("catalog exploded");
    }

    #[tokio::test]
    async fn panics_become_sanitized_500() {
        let router = Router::new().route("/boom", get(panicking_handler));
        let app = with_middleware(router, &config(), Duration::from_secs(5));

        let request = Request::builder().uri("/boom").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().contains_key("x-request-id"));

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "An internal error occurred");
        assert!(!bytes.windows(8).any(|w| w == b"exploded"));
    }
}
