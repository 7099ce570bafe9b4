//! Bounded retry of transient store failures.

use async_trait::async_trait;
use tracing::warn;

use validuser_core::config::RetryConfig;
use validuser_core::error::{AppError, ErrorKind};
use validuser_core::result::AppResult;
use validuser_entity::{SessionLookup, SessionOutcome};

use super::ValidationStore;

/// Decorates a [`ValidationStore`], re-running `check_session` when it fails
/// with a transient error.
///
/// Every attempt is a complete unit of work on the inner store, so a retry
/// re-prunes and re-checks from scratch. Non-transient errors return
/// immediately. Health checks are passed through untouched.
#[derive(Debug, Clone)]
pub struct RetryingStore<S> {
    inner: S,
    config: RetryConfig,
}

impl<S: ValidationStore> RetryingStore<S> {
    /// Wraps `inner` with the given policy.
    pub fn new(inner: S, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: ValidationStore> ValidationStore for RetryingStore<S> {
    async fn check_session(&self, lookup: &SessionLookup) -> AppResult<SessionOutcome> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.inner.check_session(lookup).await {
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    warn!(
                        attempt,
                        max_attempts,
                        error = %e,
                        "Transient store failure, retrying"
                    );
                    tokio::time::sleep(self.config.delay()).await;
                    attempt += 1;
                }
                Err(e) if e.is_transient() => {
                    warn!(attempts = attempt, error = %e, "Store retries exhausted");
                    return Err(AppError::with_source(
                        ErrorKind::Database,
                        format!("Store unavailable after {attempt} attempts"),
                        e,
                    ));
                }
                other => return other,
            }
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
