//! # validuser-auth
//!
//! Request validation for the validuser gateway.
//!
//! ## Modules
//!
//! - `token`: RS256 session token verification and claim extraction
//! - `hierarchy`: domain closure resolution over the active domain forest
//! - `orchestrator`: composes verification, session liveness, and domain
//!   resolution into the single validation operation

pub mod hierarchy;
pub mod orchestrator;
pub mod token;

pub use hierarchy::{DomainHierarchy, resolve_closure};
pub use orchestrator::{ValidationOrchestrator, ValidationResult};
pub use token::{SessionClaims, TokenVerifier, VerifiedToken};
