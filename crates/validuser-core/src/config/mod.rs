//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod resilience;
pub mod session;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::auth::AuthConfig;
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::resilience::{CircuitBreakerConfig, RetryConfig};
pub use self::session::SessionConfig;

use crate::error::AppError;

/// Environment variables used by existing deployments, mapped to
/// their configuration keys. When set they take precedence over every other
/// source, `VALIDUSER__*` variables included.
const LEGACY_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_NAME", "database.name"),
    ("DB_USER", "database.user"),
    ("DB_PASS", "database.password"),
    ("RSA_FILE", "auth.public_key_path"),
];

/// Root application configuration.
///
/// Top-level deserialization target for the merged TOML configuration
/// files (default.toml + environment overlay) and environment variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Token verification settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Session liveness settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Retry policy for transient store failures.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Circuit breaker around connection acquisition.
    #[serde(default)]
    pub circuit_breaker: CircuitBreakerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default`, the `config/{env}` overlay and variables
    /// prefixed with `VALIDUSER__` (sections separated by `__`). The legacy
    /// `DB_*`/`RSA_FILE` variables are applied as overrides on top.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false));

        for (var, key) in LEGACY_ENV_OVERRIDES {
            builder = builder
                .set_override_option(*key, std::env::var(var).ok())
                .map_err(|e| AppError::configuration(format!("Invalid override {var}: {e}")))?;
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("VALIDUSER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Cross-section consistency checks.
    ///
    /// The request timeout must outlast the whole retry budget, otherwise a
    /// request is cut off before exhausted retries can be reported.
    pub fn validate(&self) -> Result<(), AppError> {
        let Some(timeout) = self.server.request_timeout() else {
            return Ok(());
        };

        let budget = self.retry.worst_case(self.database.acquire_timeout());
        if timeout <= budget {
            return Err(AppError::configuration(format!(
                "server.request_timeout_seconds ({}s) must exceed the retry budget of {:.1}s \
                 (retry.max_attempts x database.acquire_timeout_seconds + delays)",
                timeout.as_secs(),
                budget.as_secs_f64()
            )));
        }
        Ok(())
    }
}
