//! PostgreSQL connection pool management.

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::info;

use validuser_core::config::DatabaseConfig;
use validuser_core::error::AppError;

use crate::error::map_sqlx;

/// Wrapper around the sqlx PostgreSQL connection pool.
///
/// Built once at startup and shared by every request. Connections are
/// checked for liveness before being handed out, and acquisition gives up
/// after the configured timeout instead of queuing forever.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    /// The underlying sqlx connection pool.
    pool: PgPool,
}

impl DatabasePool {
    /// Create a pool from configuration without opening a connection yet.
    ///
    /// The service can start while the database is down; requests fail
    /// with transient errors and the health probe reports `DOWN` until it
    /// comes back.
    pub fn connect_lazy(config: &DatabaseConfig) -> Self {
        info!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            user = %config.user,
            max_connections = config.max_connections(),
            acquire_timeout_seconds = config.acquire_timeout_seconds,
            "Configuring PostgreSQL pool"
        );

        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.name)
            .username(&config.user)
            .password(&config.password)
            .application_name("validuser");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections())
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout())
            .idle_timeout(config.idle_timeout())
            .test_before_acquire(true)
            .connect_lazy_with(options);

        Self { pool }
    }

    /// Return a reference to the underlying sqlx pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database connectivity with a trivial round-trip.
    pub async fn health_check(&self) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| map_sqlx(e, "Health check failed"))
    }

    /// Close all connections in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}
