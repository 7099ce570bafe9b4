//! PostgreSQL-backed session store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use tracing::debug;

use validuser_core::config::SessionConfig;
use validuser_core::result::AppResult;
use validuser_entity::{SessionLookup, SessionOutcome};

use crate::breaker::CircuitBreaker;
use crate::connection::DatabasePool;
use crate::error::map_sqlx;
use crate::repositories::{DomainRepository, SessionRepository};

use super::ValidationStore;

/// Session store over the `dm` schema.
///
/// Each call holds exactly one pooled connection inside a transaction.
/// Early returns and errors drop the transaction, which rolls it back and
/// hands the connection back to the pool.
#[derive(Debug, Clone)]
pub struct PgValidationStore {
    /// Shared connection pool.
    pool: DatabasePool,
    /// Failure policy applied when opening a transaction.
    breaker: Arc<CircuitBreaker>,
    /// Sessions idle for longer than this are pruned.
    staleness_window: Duration,
}

impl PgValidationStore {
    /// Creates a store over the given pool.
    pub fn new(pool: DatabasePool, breaker: Arc<CircuitBreaker>, config: &SessionConfig) -> Self {
        Self {
            pool,
            breaker,
            staleness_window: config.staleness_window(),
        }
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        let pool = self.pool.pool().clone();
        self.breaker
            .call(|| async move {
                pool.begin()
                    .await
                    .map_err(|e| map_sqlx(e, "Failed to begin transaction"))
            })
            .await
    }
}

#[async_trait]
impl ValidationStore for PgValidationStore {
    async fn check_session(&self, lookup: &SessionLookup) -> AppResult<SessionOutcome> {
        let mut tx = self.begin().await?;

        let pruned = SessionRepository::prune_stale(&mut *tx, self.staleness_window).await?;
        if pruned > 0 {
            debug!(pruned, "Pruned stale sessions");
        }

        let refreshed =
            SessionRepository::touch(&mut *tx, lookup.user_id, &lookup.session_id).await?;

        if !refreshed {
            tx.commit()
                .await
                .map_err(|e| map_sqlx(e, "Failed to commit session prune"))?;
            return Ok(SessionOutcome::NotLive);
        }

        let domains = if lookup.include_domains {
            Some(DomainRepository::load_graph(&mut *tx, lookup.user_id).await?)
        } else {
            None
        };

        tx.commit()
            .await
            .map_err(|e| map_sqlx(e, "Failed to commit session refresh"))?;

        Ok(SessionOutcome::Live { domains })
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.pool.health_check().await
    }
}
