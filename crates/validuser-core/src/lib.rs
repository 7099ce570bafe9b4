//! # validuser-core
//!
//! Core crate for the validuser gateway. Contains configuration schemas
//! and the unified error system shared by every other crate.
//!
//! This crate has **no** internal dependencies on other validuser crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::{AppError, AuthFailure, ErrorKind};
pub use result::AppResult;
