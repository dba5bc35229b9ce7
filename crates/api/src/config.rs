//! Server and deploy-hook configuration loaded from environment variables.
//!
//! Every loader has a `from_lookup` form taking a `Fn(&str) -> Option<String>`
//! so tests can supply variables without touching the process environment.
//! Blank values are treated as unset.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use cinelite_core::deploy::secret::{SharedSecret, PLACEHOLDER_TOKEN};
use cinelite_core::deploy::{DeployScript, DEFAULT_DEPLOY_TIMEOUT};

/// Default listen port for the catalog API.
pub const API_DEFAULT_PORT: u16 = 3000;

/// Default listen port for the deploy webhook app.
pub const DEPLOY_HOOK_DEFAULT_PORT: u16 = 9000;

/// Errors raised while loading configuration. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("DEPLOY_TOKEN must be set when APP_ENV={0}")]
    MissingSecret(AppEnv),

    #[error("DEPLOY_TOKEN is still the shipped placeholder; refusing to start with APP_ENV={0}")]
    PlaceholderSecret(AppEnv),
}

/// Deployment environment, from `APP_ENV` (falling back to `NODE_ENV`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnv {
    #[default]
    Development,
    Test,
    Production,
}

impl AppEnv {
    pub fn as_str(self) -> &'static str {
        match self {
            AppEnv::Development => "development",
            AppEnv::Test => "test",
            AppEnv::Production => "production",
        }
    }

    pub fn is_development(self) -> bool {
        self == AppEnv::Development
    }
}

impl fmt::Display for AppEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppEnv {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(AppEnv::Development),
            "test" => Ok(AppEnv::Test),
            "production" | "prod" => Ok(AppEnv::Production),
            other => Err(format!(
                "unknown environment '{other}' (expected development, test or production)"
            )),
        }
    }
}

/// Look up `var`, treating blank values as unset.
fn get(lookup: &impl Fn(&str) -> Option<String>, var: &str) -> Option<String> {
    lookup(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse `var` if set, otherwise return `default`.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match get(lookup, var) {
        Some(value) => match value.parse() {
            Ok(parsed) => Ok(parsed),
            Err(e) => Err(ConfigError::Invalid {
                var,
                reason: e.to_string(),
                value,
            }),
        },
        None => Ok(default),
    }
}

fn environment_from(lookup: &impl Fn(&str) -> Option<String>) -> Result<AppEnv, ConfigError> {
    match get(lookup, "APP_ENV") {
        Some(_) => parse_or(lookup, "APP_ENV", AppEnv::default()),
        None => parse_or(lookup, "NODE_ENV", AppEnv::default()),
    }
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// HTTP server configuration shared by both binaries.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: IpAddr,
    /// Bind port (default depends on the binary).
    pub port: u16,
    pub environment: AppEnv,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long graceful shutdown may drain before forcing exit (default: `10`).
    pub shutdown_timeout_secs: u64,
    /// Directory served for the frontend (default: `public`).
    pub static_dir: PathBuf,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `default_port`             |
    /// | `APP_ENV` / `NODE_ENV` | `development`              |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `10`                       |
    /// | `STATIC_DIR`           | `public`                   |
    pub fn from_env(default_port: u16) -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok(), default_port)
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        default_port: u16,
    ) -> Result<Self, ConfigError> {
        let host = parse_or(&lookup, "HOST", IpAddr::from([0, 0, 0, 0]))?;
        let port = parse_or(&lookup, "PORT", default_port)?;
        let environment = environment_from(&lookup)?;

        let raw_origins = get(&lookup, "CORS_ORIGINS")
            .unwrap_or_else(|| format!("http://localhost:{API_DEFAULT_PORT}"));
        let cors_origins: Vec<String> = raw_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if let Some(bad) = cors_origins
            .iter()
            .find(|o| HeaderValue::from_str(o).is_err())
        {
            return Err(ConfigError::Invalid {
                var: "CORS_ORIGINS",
                value: bad.clone(),
                reason: "not a valid header value".into(),
            });
        }

        let request_timeout_secs = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?;
        let shutdown_timeout_secs = parse_or(&lookup, "SHUTDOWN_TIMEOUT_SECS", 10)?;
        let static_dir = get(&lookup, "STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("public"));

        Ok(Self {
            host,
            port,
            environment,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            static_dir,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

// ---------------------------------------------------------------------------
// DeployConfig
// ---------------------------------------------------------------------------

/// Deploy webhook configuration.
#[derive(Debug)]
pub struct DeployConfig {
    /// Shared secret expected in `x-deploy-token`.
    pub secret: SharedSecret,
    /// Script, working directory and timeout for each deploy.
    pub script: DeployScript,
    /// `true` when running on the placeholder token (development only).
    pub using_placeholder: bool,
}

impl DeployConfig {
    /// Load deploy configuration from the process environment.
    ///
    /// | Env Var               | Required              | Default          |
    /// |-----------------------|-----------------------|------------------|
    /// | `DEPLOY_TOKEN`        | outside development   | placeholder      |
    /// | `DEPLOY_SCRIPT`       | no                    | `./deploy.sh`    |
    /// | `DEPLOY_WORKDIR`      | no                    | current dir      |
    /// | `DEPLOY_TIMEOUT_SECS` | no                    | `300`            |
    pub fn from_env(environment: AppEnv) -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok(), environment)
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        environment: AppEnv,
    ) -> Result<Self, ConfigError> {
        let token = match get(&lookup, "DEPLOY_TOKEN") {
            Some(token) => token,
            None if environment.is_development() => PLACEHOLDER_TOKEN.to_string(),
            None => return Err(ConfigError::MissingSecret(environment)),
        };
        let using_placeholder = token == PLACEHOLDER_TOKEN;
        if using_placeholder && !environment.is_development() {
            return Err(ConfigError::PlaceholderSecret(environment));
        }

        let secret = SharedSecret::new(&token).map_err(|e| ConfigError::Invalid {
            var: "DEPLOY_TOKEN",
            value: "[redacted]".into(),
            reason: e.to_string(),
        })?;

        let path = get(&lookup, "DEPLOY_SCRIPT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./deploy.sh"));
        let working_directory = get(&lookup, "DEPLOY_WORKDIR").map(PathBuf::from);
        let timeout_secs = parse_or(
            &lookup,
            "DEPLOY_TIMEOUT_SECS",
            DEFAULT_DEPLOY_TIMEOUT.as_secs(),
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "DEPLOY_TIMEOUT_SECS",
                value: "0".into(),
                reason: "must be positive".into(),
            });
        }

        Ok(Self {
            secret,
            script: DeployScript {
                path,
                working_directory,
                timeout: Duration::from_secs(timeout_secs),
            },
            using_placeholder,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
