//! # validuser-api
//!
//! HTTP API layer for validuser built on Axum.
//!
//! Exposes `GET /msapi/validateuser` and `GET /health`, with request
//! logging, tracing, DTOs, and error-to-status mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, shutdown_signal};
pub use error::ApiError;
pub use state::AppState;
