//! Deploy webhook server: runs the deploy script on an authenticated POST.

use std::sync::Arc;

use cinelite_api::config::{DeployConfig, ServerConfig, DEPLOY_HOOK_DEFAULT_PORT};
use cinelite_api::router::build_deploy_router;
use cinelite_api::shutdown;
use cinelite_api::state::DeployState;
use cinelite_api::telemetry;
use cinelite_core::runner::ProcessRunner;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    telemetry::init_tracing("cinelite_api=debug,tower_http=info");

    // --- Configuration ---
    let server = match ServerConfig::from_env(DEPLOY_HOOK_DEFAULT_PORT) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid server configuration");
            std::process::exit(1);
        }
    };
    let deploy = match DeployConfig::from_env(server.environment) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid deploy configuration");
            std::process::exit(1);
        }
    };
    if deploy.using_placeholder {
        tracing::warn!("DEPLOY_TOKEN is unset or the placeholder; set a real secret before exposing this hook");
    }
    tracing::info!(
        host = %server.host,
        port = server.port,
        env = %server.environment,
        script = %deploy.script.path.display(),
        timeout_secs = deploy.script.timeout.as_secs(),
        "Loaded deploy hook configuration",
    );

    // --- Router ---
    let addr = server.socket_addr();
    let drain_timeout = server.shutdown_timeout();
    let app = build_deploy_router(DeployState::new(server, deploy, Arc::new(ProcessRunner)));

    // --- Start server ---
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind to address");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, "Deploy hook listening");

    if let Err(e) = shutdown::serve(listener, app, drain_timeout).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
