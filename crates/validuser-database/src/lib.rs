//! # validuser-database
//!
//! PostgreSQL connection management, the circuit breaker guarding
//! connection acquisition, repositories over the `dm` schema, and the
//! [`ValidationStore`] implementations used by the validation orchestrator.

pub mod breaker;
pub mod connection;
pub mod error;
pub mod repositories;
pub mod store;

pub use breaker::CircuitBreaker;
pub use connection::DatabasePool;
pub use store::{MemoryValidationStore, PgValidationStore, RetryingStore, ValidationStore};
