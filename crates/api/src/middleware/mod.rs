//! Request extractors used as middleware.
//!
//! - [`client_addr::ClientAddr`] -- Best-effort source address for logging.
//! - [`deploy_token::RequireDeployToken`] -- Requires a valid `x-deploy-token`.

pub mod client_addr;
pub mod deploy_token;
