use cinelite_api::config::{ServerConfig, API_DEFAULT_PORT};
use cinelite_api::router::build_app_router;
use cinelite_api::shutdown;
use cinelite_api::state::AppState;
use cinelite_api::telemetry;
use cinelite_core::catalog::Catalog;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    telemetry::init_tracing("cinelite_api=debug,tower_http=debug");

    // --- Configuration ---
    let config = match ServerConfig::from_env(API_DEFAULT_PORT) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };
    tracing::info!(
        host = %config.host,
        port = config.port,
        env = %config.environment,
        static_dir = %config.static_dir.display(),
        "Loaded server configuration",
    );

    // --- Catalog ---
    let catalog = Catalog::builtin();
    tracing::info!(movies = catalog.len(), "Catalog loaded");

    // --- Router ---
    let addr = config.socket_addr();
    let drain_timeout = config.shutdown_timeout();
    let app = build_app_router(AppState::new(config, catalog));

    // --- Start server ---
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind to address");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, "CineLite API listening");

    if let Err(e) = shutdown::serve(listener, app, drain_timeout).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
