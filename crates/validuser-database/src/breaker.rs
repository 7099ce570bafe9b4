//! Circuit breaker around store connection acquisition.
//!
//! State machine:
//! - `Closed`: calls pass through; consecutive transient failures are counted.
//! - `Open`: reached after `failure_threshold` consecutive transient failures.
//!   Calls fail immediately with a transient error until the cooldown ends.
//! - `HalfOpen`: after the cooldown exactly one trial call is let through.
//!   Success closes the circuit, a transient failure re-opens it.
//!
//! A trial call that is cancelled before it finishes (client disconnect,
//! request timeout) re-opens the circuit for another cooldown.
//!
//! Only transient failures count. A permanent error still proves the server
//! answered, so it resets the failure streak.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, warn};

use validuser_core::config::CircuitBreakerConfig;
use validuser_core::error::AppError;
use validuser_core::result::AppResult;

/// Observable breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Calls pass through.
    Closed,
    /// Calls are rejected until the cooldown elapses.
    Open,
    /// A single trial call is in flight.
    HalfOpen,
}

#[derive(Debug)]
enum Inner {
    Closed { failures: u32 },
    Open { until: Instant },
    HalfOpen,
}

/// Failure policy wrapping connection acquisition.
#[derive(Debug)]
pub struct CircuitBreaker {
    enabled: bool,
    failure_threshold: u32,
    cooldown: Duration,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    /// Creates a closed breaker from configuration.
    pub fn new(config: &CircuitBreakerConfig) -> Self {
        Self {
            enabled: config.enabled,
            failure_threshold: config.failure_threshold.max(1),
            cooldown: config.cooldown(),
            inner: Mutex::new(Inner::Closed { failures: 0 }),
        }
    }

    /// A breaker that never opens.
    pub fn disabled() -> Self {
        Self::new(&CircuitBreakerConfig {
            enabled: false,
            ..CircuitBreakerConfig::default()
        })
    }

    /// Current state, for logging and tests.
    pub fn state(&self) -> CircuitState {
        match *self.lock() {
            Inner::Closed { .. } => CircuitState::Closed,
            Inner::Open { .. } => CircuitState::Open,
            Inner::HalfOpen => CircuitState::HalfOpen,
        }
    }

    /// Runs `acquire` if the circuit allows it and records the outcome.
    pub async fn call<F, Fut, T>(&self, acquire: F) -> AppResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        if !self.enabled {
            return acquire().await;
        }

        let mut guard = TrialGuard {
            breaker: self,
            trial: self.admit()?,
        };
        let result = acquire().await;
        guard.trial = false;
        match &result {
            Err(e) if e.is_transient() => self.on_failure(),
            _ => self.on_success(),
        }
        result
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // State is a plain enum; a poisoned lock still holds a valid value.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Lets a call through or rejects it. Returns `true` for a half-open trial.
    fn admit(&self) -> AppResult<bool> {
        let now = Instant::now();
        let mut inner = self.lock();
        let next = match *inner {
            Inner::Closed { .. } => return Ok(false),
            Inner::Open { until } if now >= until => Inner::HalfOpen,
            Inner::Open { .. } | Inner::HalfOpen => {
                return Err(AppError::transient(
                    "Circuit open: store connection attempts suspended",
                ));
            }
        };
        info!("Circuit half-open, allowing trial connection");
        *inner = next;
        Ok(true)
    }

    fn on_abandoned(&self) {
        let mut inner = self.lock();
        if matches!(*inner, Inner::HalfOpen) {
            warn!("Trial connection cancelled, circuit re-opened");
            *inner = Inner::Open {
                until: Instant::now() + self.cooldown,
            };
        }
    }

    fn on_success(&self) {
        let mut inner = self.lock();
        if !matches!(*inner, Inner::Closed { failures: 0 }) {
            if matches!(*inner, Inner::HalfOpen) {
                info!("Circuit closed after successful trial connection");
            }
            *inner = Inner::Closed { failures: 0 };
        }
    }

    fn on_failure(&self) {
        let mut inner = self.lock();
        let next = match *inner {
            Inner::Closed { failures } if failures + 1 < self.failure_threshold => {
                Inner::Closed {
                    failures: failures + 1,
                }
            }
            Inner::Closed { failures } => {
                warn!(
                    failures = failures + 1,
                    cooldown_seconds = self.cooldown.as_secs(),
                    "Circuit opened after consecutive connection failures"
                );
                Inner::Open {
                    until: Instant::now() + self.cooldown,
                }
            }
            Inner::HalfOpen | Inner::Open { .. } => {
                warn!("Trial connection failed, circuit re-opened");
                Inner::Open {
                    until: Instant::now() + self.cooldown,
                }
            }
        };
        *inner = next;
    }
}

/// Re-opens the circuit if a half-open trial is dropped before its outcome
/// is recorded.
struct TrialGuard<'a> {
    breaker: &'a CircuitBreaker,
    trial: bool,
}

impl Drop for TrialGuard<'_> {
    fn drop(&mut self) {
        if self.trial {
            self.breaker.on_abandoned();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaker(threshold: u32) -> CircuitBreaker {
        CircuitBreaker::new(&CircuitBreakerConfig {
            enabled: true,
            failure_threshold: threshold,
            cooldown_seconds: 30,
        })
    }

    async fn fail(breaker: &CircuitBreaker) -> AppResult<()> {
        breaker
            .call(|| async { Err::<(), _>(AppError::transient("connection refused")) })
            .await
    }

    async fn succeed(breaker: &CircuitBreaker) -> AppResult<()> {
        breaker.call(|| async { Ok(()) }).await
    }

    #[tokio::test(start_paused = true)]
    async fn test_opens_after_threshold() {
        let breaker = breaker(2);
        assert!(fail(&breaker).await.is_err());
        assert_eq!(breaker.state(), CircuitState::Closed);
        assert!(fail(&breaker).await.is_err());
        assert_eq!(breaker.state(), CircuitState::Open);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_circuit_short_circuits() {
        let breaker = breaker(1);
        let _ = fail(&breaker).await;

        let mut invoked = false;
        let result = breaker
            .call(|| {
                invoked = true;
                async { Ok(()) }
            })
            .await;

        assert!(!invoked);
        assert!(result.unwrap_err().is_transient());
    }

    #[tokio::test(start_paused = true)]
    async fn test_half_open_trial_success_closes() {
        let breaker = breaker(1);
        let _ = fail(&breaker).await;

        tokio::time::advance(Duration::from_secs(31)).await;
        succeed(&breaker).await.unwrap();
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_half_open_trial_failure_reopens() {
        let breaker = breaker(1);
        let _ = fail(&breaker).await;

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(fail(&breaker).await.is_err());
        assert_eq!(breaker.state(), CircuitState::Open);
        assert!(succeed(&breaker).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_trial_reopens() {
        let breaker = breaker(1);
        let _ = fail(&breaker).await;
        tokio::time::advance(Duration::from_secs(31)).await;

        let trial = tokio::time::timeout(
            Duration::from_secs(1),
            breaker.call(|| std::future::pending::<AppResult<()>>()),
        )
        .await;
        assert!(trial.is_err());
        assert_eq!(breaker.state(), CircuitState::Open);

        tokio::time::advance(Duration::from_secs(31)).await;
        succeed(&breaker).await.unwrap();
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_closed_call_keeps_circuit_closed() {
        let breaker = breaker(1);
        let call = tokio::time::timeout(
            Duration::from_secs(1),
            breaker.call(|| std::future::pending::<AppResult<()>>()),
        )
        .await;
        assert!(call.is_err());
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_resets_failure_streak() {
        let breaker = breaker(2);
        let _ = fail(&breaker).await;
        succeed(&breaker).await.unwrap();
        let _ = fail(&breaker).await;
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_permanent_errors_do_not_open() {
        let breaker = breaker(1);
        let result = breaker
            .call(|| async { Err::<(), _>(AppError::database("relation does not exist")) })
            .await;
        assert!(result.is_err());
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_disabled_never_opens() {
        let breaker = CircuitBreaker::disabled();
        for _ in 0..10 {
            let _ = fail(&breaker).await;
        }
        succeed(&breaker).await.unwrap();
        assert_eq!(breaker.state(), CircuitState::Closed);
    }
}
