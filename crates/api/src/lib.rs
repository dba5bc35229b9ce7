//! CineLite API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! middleware) so integration tests and both binary entrypoints --
//! `cinelite-api` and `cinelite-deploy-hook` -- share them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod shutdown;
pub mod state;
pub mod telemetry;
