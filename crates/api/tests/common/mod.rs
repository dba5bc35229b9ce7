#![allow(dead_code)]

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use cinelite_api::config::{AppEnv, DeployConfig, ServerConfig};
use cinelite_api::middleware::deploy_token::DEPLOY_TOKEN_HEADER;
use cinelite_api::router::{build_app_router, build_deploy_router};
use cinelite_api::state::{AppState, DeployState};
use cinelite_core::catalog::Catalog;
use cinelite_core::runner::{
    CommandOutput, CommandRunner, CommandSpec, ProcessRunner, RunOutcome,
};

/// Origin allowed by [`test_config`].
pub const TEST_ORIGIN: &str = "http://localhost:3000";

/// Deploy token accepted by [`build_deploy_state`].
pub const TEST_TOKEN: &str = "test-deploy-token";

/// Build a test `ServerConfig` with safe defaults.
///
/// Static files are served from a directory that does not exist, so every
/// non-API path falls through to the JSON 404.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: IpAddr::from([127, 0, 0, 1]),
        port: 0,
        environment: AppEnv::Test,
        cors_origins: vec![TEST_ORIGIN.to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 1,
        static_dir: PathBuf::from("/nonexistent/cinelite-static"),
    }
}

/// Build the catalog app exactly as `main.rs` does, with the built-in catalog.
pub fn build_test_app() -> Router {
    build_app_router(AppState::new(test_config(), Catalog::builtin()))
}

/// Like [`build_test_app`] but serving static files from `dir`.
pub fn build_test_app_with_static(dir: &Path) -> Router {
    let config = ServerConfig {
        static_dir: dir.to_path_buf(),
        ..test_config()
    };
    build_app_router(AppState::new(config, Catalog::builtin()))
}

/// Deploy hook state with [`TEST_TOKEN`], a 1-second deploy timeout and the
/// given runner. Keep a clone to inspect or hold the deploy gate.
pub fn build_deploy_state(runner: Arc<dyn CommandRunner>) -> DeployState {
    DeployState::new(test_config(), deploy_config(None), runner)
}

/// Deploy hook state that runs `script` for real through [`ProcessRunner`].
pub fn build_process_deploy_state(script: &Path) -> DeployState {
    DeployState::new(
        test_config(),
        deploy_config(Some(script)),
        Arc::new(ProcessRunner),
    )
}

fn deploy_config(script: Option<&Path>) -> DeployConfig {
    let script = script.map(|p| p.to_string_lossy().into_owned());
    DeployConfig::from_lookup(
        |var| match var {
            "DEPLOY_TOKEN" => Some(TEST_TOKEN.to_string()),
            "DEPLOY_TIMEOUT_SECS" => Some("1".to_string()),
            "DEPLOY_SCRIPT" => script.clone(),
            _ => None,
        },
        AppEnv::Test,
    )
    .expect("test deploy config")
}

pub fn build_deploy_app(runner: Arc<dyn CommandRunner>) -> Router {
    build_deploy_router(build_deploy_state(runner))
}

// ---------------------------------------------------------------------------
// Runners
// ---------------------------------------------------------------------------

/// Returns a fixed outcome and counts calls.
pub struct StubRunner {
    outcome: RunOutcome,
    calls: AtomicUsize,
}

impl StubRunner {
    pub fn new(outcome: RunOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn succeeding(stdout: &str) -> Arc<Self> {
        Self::new(RunOutcome::Success(CommandOutput {
            stdout: stdout.to_string(),
            stderr: "Already up to date.\n".to_string(),
            exit_code: Some(0),
            duration_ms: 12,
        }))
    }

    /// Exit code 1 with `stderr` captured. Like [`ProcessRunner`], the
    /// diagnostic names only the exit status; the output travels separately.
    pub fn failing(stderr: &str) -> Arc<Self> {
        Self::new(RunOutcome::Failure {
            diagnostic: "`bash ./deploy.sh` exited with code 1".to_string(),
            output: CommandOutput {
                stderr: stderr.to_string(),
                exit_code: Some(1),
                ..Default::default()
            },
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandRunner for StubRunner {
    async fn run(&self, _spec: &CommandSpec) -> RunOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// Never completes; the deploy bound has to cut it off.
pub struct HangingRunner;

#[async_trait]
impl CommandRunner for HangingRunner {
    async fn run(&self, _spec: &CommandSpec) -> RunOutcome {
        std::future::pending().await
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST `/webhook` with an optional token and a raw body.
pub async fn post_webhook(app: Router, token: Option<&str>, body: &str) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/webhook")
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header(DEPLOY_TOKEN_HEADER, token);
    }
    app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
