//! In-memory session store for tests and local development.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use validuser_core::config::SessionConfig;
use validuser_core::error::AppError;
use validuser_core::result::AppResult;
use validuser_entity::{
    DomainGraph, DomainId, DomainNode, SessionLookup, SessionOutcome, SessionRecord, UserId,
};

use super::ValidationStore;

/// Internal state for the memory-based store.
#[derive(Debug, Default)]
struct InnerState {
    /// Live session records.
    sessions: Vec<SessionRecord>,
    /// Home domain per user.
    home_domains: HashMap<UserId, DomainId>,
    /// All domain nodes, active or not.
    domains: Vec<DomainNode>,
    /// Number of upcoming calls that fail with a transient error.
    pending_failures: u32,
    /// Number of `check_session` calls received, failed ones included.
    calls: u64,
    /// Whether health checks report the store as down.
    unhealthy: bool,
    /// Simulated round-trip time of every `check_session` call.
    latency: Duration,
}

/// Session store held in process memory behind a Tokio mutex.
///
/// Mirrors the PostgreSQL semantics exactly (global prune, conditional
/// refresh, active-only domain graph) and can inject transient failures.
#[derive(Debug, Clone)]
pub struct MemoryValidationStore {
    /// Protected inner state.
    state: Arc<Mutex<InnerState>>,
    /// Sessions idle for longer than this are pruned.
    staleness_window: chrono::Duration,
}

impl MemoryValidationStore {
    /// Creates an empty store.
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_window(config.staleness_window())
    }

    /// Creates an empty store with an explicit staleness window.
    pub fn with_window(window: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(InnerState::default())),
            staleness_window: chrono::Duration::from_std(window)
                .unwrap_or_else(|_| chrono::Duration::hours(1)),
        }
    }

    /// Adds a session record, as the login service would.
    pub async fn insert_session(&self, record: SessionRecord) {
        self.state.lock().await.sessions.push(record);
    }

    /// Returns the record for a user and session id, if present.
    pub async fn find_session(&self, user_id: UserId, session_id: &str) -> Option<SessionRecord> {
        self.state
            .lock()
            .await
            .sessions
            .iter()
            .find(|s| s.matches(user_id, session_id))
            .cloned()
    }

    /// Number of stored session records.
    pub async fn session_count(&self) -> usize {
        self.state.lock().await.sessions.len()
    }

    /// Sets a user's home domain.
    pub async fn set_home_domain(&self, user_id: UserId, domain_id: DomainId) {
        self.state
            .lock()
            .await
            .home_domains
            .insert(user_id, domain_id);
    }

    /// Adds a domain node.
    pub async fn insert_domain(&self, node: DomainNode) {
        self.state.lock().await.domains.push(node);
    }

    /// Makes the next `count` calls fail with a transient error.
    pub async fn fail_next(&self, count: u32) {
        self.state.lock().await.pending_failures = count;
    }

    /// Makes health checks report the store as down or up.
    pub async fn set_unhealthy(&self, unhealthy: bool) {
        self.state.lock().await.unhealthy = unhealthy;
    }

    /// Makes every `check_session` call take `latency` before answering.
    pub async fn set_latency(&self, latency: Duration) {
        self.state.lock().await.latency = latency;
    }

    /// Number of `check_session` calls received so far.
    pub async fn call_count(&self) -> u64 {
        self.state.lock().await.calls
    }

    fn graph_for(state: &InnerState, user_id: UserId) -> DomainGraph {
        let home = state.home_domains.get(&user_id).copied();
        let nodes = match home {
            Some(_) => state
                .domains
                .iter()
                .filter(|node| node.is_active())
                .cloned()
                .collect(),
            None => Vec::new(),
        };
        DomainGraph { home, nodes }
    }
}

/// Refreshed timestamp that is strictly later than the previous one.
fn advance(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + chrono::Duration::microseconds(1)
    }
}

#[async_trait]
impl ValidationStore for MemoryValidationStore {
    async fn check_session(&self, lookup: &SessionLookup) -> AppResult<SessionOutcome> {
        let latency = self.state.lock().await.latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.state.lock().await;
        state.calls += 1;

        if state.pending_failures > 0 {
            state.pending_failures -= 1;
            return Err(AppError::transient("Injected connection failure"));
        }

        let now = Utc::now();
        let cutoff = now - self.staleness_window;
        let before = state.sessions.len();
        state.sessions.retain(|s| s.last_seen >= cutoff);
        let pruned = before - state.sessions.len();
        if pruned > 0 {
            debug!(pruned, "Pruned stale sessions");
        }

        let Some(record) = state
            .sessions
            .iter_mut()
            .find(|s| s.matches(lookup.user_id, &lookup.session_id))
        else {
            return Ok(SessionOutcome::NotLive);
        };
        record.last_seen = advance(record.last_seen, now);

        let domains = lookup
            .include_domains
            .then(|| Self::graph_for(&state, lookup.user_id));

        Ok(SessionOutcome::Live { domains })
    }

    async fn health_check(&self) -> AppResult<bool> {
        if self.state.lock().await.unhealthy {
            return Err(AppError::transient("Injected health check failure"));
        }
        Ok(true)
    }
}
