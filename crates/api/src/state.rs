use std::sync::Arc;

use cinelite_core::catalog::Catalog;
use cinelite_core::deploy::gate::DeployGate;
use cinelite_core::runner::CommandRunner;

use crate::config::{DeployConfig, ServerConfig};

/// Shared state for the catalog app, available via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Read-only catalog, loaded once at startup.
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(config: ServerConfig, catalog: Catalog) -> Self {
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
        }
    }
}

/// Shared state for the deploy webhook app.
#[derive(Clone)]
pub struct DeployState {
    pub server: Arc<ServerConfig>,
    pub deploy: Arc<DeployConfig>,
    /// Substitutable so tests never spawn real processes.
    pub runner: Arc<dyn CommandRunner>,
    /// Shared across requests; one deploy at a time.
    pub gate: DeployGate,
}

impl DeployState {
    pub fn new(server: ServerConfig, deploy: DeployConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            server: Arc::new(server),
            deploy: Arc::new(deploy),
            runner,
            gate: DeployGate::new(),
        }
    }
}
