//! Session stores consumed by the validation orchestrator.
//!
//! Two backends are provided:
//! - [`PgValidationStore`] for the relational `dm` schema
//! - [`MemoryValidationStore`] for tests and local development
//!
//! [`RetryingStore`] decorates either one with bounded retries of
//! transient failures.

pub mod memory;
pub mod postgres;
pub mod retry;

use async_trait::async_trait;

use validuser_core::result::AppResult;
use validuser_entity::{SessionLookup, SessionOutcome};

pub use memory::MemoryValidationStore;
pub use postgres::PgValidationStore;
pub use retry::RetryingStore;

/// Backing store for session liveness and domain data.
///
/// Implementations must run [`check_session`](Self::check_session) as one
/// unit of work: prune every stale session, check the requested one, and
/// refresh it only if it survived the prune.
#[async_trait]
pub trait ValidationStore: Send + Sync + 'static {
    /// Prune, check liveness, refresh, and optionally load the domain graph.
    async fn check_session(&self, lookup: &SessionLookup) -> AppResult<SessionOutcome>;

    /// Cheap connectivity check for the health probe.
    async fn health_check(&self) -> AppResult<bool>;
}
