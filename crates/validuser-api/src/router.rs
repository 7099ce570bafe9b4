//! Route definitions for the validuser HTTP API.

use axum::{Router, middleware as axum_middleware, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the router with all routes and per-request middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/msapi/validateuser", get(handlers::validate::validate_user))
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}
