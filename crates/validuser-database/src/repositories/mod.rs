//! Repositories over the `dm` schema.
//!
//! Every query runs on a caller-supplied connection so that prune, check,
//! refresh and the domain reads share one transaction.

pub mod domain;
pub mod session;

pub use domain::DomainRepository;
pub use session::SessionRepository;
