//! Request validation: token, session liveness, and domain closure.

use std::sync::Arc;

use tracing::debug;

use validuser_core::error::{AppError, AuthFailure};
use validuser_core::result::AppResult;
use validuser_database::ValidationStore;
use validuser_entity::{DomainId, SessionLookup, SessionOutcome, UserId};

use crate::hierarchy::resolve_closure;
use crate::token::TokenVerifier;

/// Outcome of a successful validation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ValidationResult {
    /// Always `true`; failures are reported as errors.
    pub authorized: bool,
    /// The validated user.
    pub user_id: UserId,
    /// Domain closure in ascending order; empty unless requested.
    pub domains: Vec<DomainId>,
}

/// Validates session tokens against the backing store.
///
/// Retry of transient store failures happens inside the store decorator,
/// so the orchestrator sees either a final answer or a terminal error.
#[derive(Clone)]
pub struct ValidationOrchestrator {
    /// Token signature verification.
    verifier: Arc<TokenVerifier>,
    /// Session and domain store.
    store: Arc<dyn ValidationStore>,
}

impl std::fmt::Debug for ValidationOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationOrchestrator")
            .field("verifier", &self.verifier)
            .finish_non_exhaustive()
    }
}

impl ValidationOrchestrator {
    /// Creates an orchestrator over the given verifier and store.
    pub fn new(verifier: Arc<TokenVerifier>, store: Arc<dyn ValidationStore>) -> Self {
        Self { verifier, store }
    }

    /// Validates a request.
    ///
    /// Flow:
    /// 1. Verify the token; the store is not touched on failure
    /// 2. Prune stale sessions, check this one, refresh it if live
    /// 3. Reject with `NotAuthorized` when the session is not live
    /// 4. Resolve the domain closure when `want_domains` is set
    pub async fn validate(&self, token: Option<&str>, want_domains: bool) -> AppResult<ValidationResult> {
        let identity = self.verifier.verify(token).inspect_err(|e| {
            debug!(reason = %e.kind, "Token verification failed");
        })?;

        let lookup = SessionLookup {
            user_id: identity.user_id,
            session_id: identity.session_id,
            include_domains: want_domains,
        };

        let domains: Vec<DomainId> = match self.store.check_session(&lookup).await? {
            SessionOutcome::NotLive => {
                debug!(user_id = lookup.user_id, "Session not live");
                return Err(AppError::unauthorized(AuthFailure::NotAuthorized));
            }
            SessionOutcome::Live { domains } => domains
                .map(|graph| resolve_closure(&graph).into_iter().collect())
                .unwrap_or_default(),
        };

        debug!(
            user_id = lookup.user_id,
            domain_count = domains.len(),
            "Session validated"
        );

        Ok(ValidationResult {
            authorized: true,
            user_id: lookup.user_id,
            domains,
        })
    }

    /// Whether the backing store answers a trivial query.
    pub async fn store_healthy(&self) -> bool {
        match self.store.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                debug!(error = %e, "Store health check failed");
                false
            }
        }
    }
}
