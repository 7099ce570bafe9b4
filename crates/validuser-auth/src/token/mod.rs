//! Session token claims and signature verification.

pub mod claims;
pub mod verifier;

pub use claims::{SessionClaims, VerifiedToken};
pub use verifier::TokenVerifier;
