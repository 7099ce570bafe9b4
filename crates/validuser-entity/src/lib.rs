//! # validuser-entity
//!
//! Entity models read and written by the validuser gateway: persisted
//! session records, the domain forest, and the value types exchanged
//! between the store layer and the validation orchestrator.

pub mod domain;
pub mod session;

pub use domain::{DomainGraph, DomainNode, DomainStatus};
pub use session::{SessionLookup, SessionOutcome, SessionRecord};

/// Integer user identifier (`sub` claim, `dm_user.id`).
pub type UserId = i64;

/// Integer domain identifier (`dm_domain.id`).
pub type DomainId = i64;
