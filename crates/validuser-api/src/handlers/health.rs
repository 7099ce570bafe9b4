//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::HealthResponse;
use crate::state::AppState;

/// GET /health
///
/// Up when the backing store answers `SELECT 1`.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    if state.orchestrator.store_healthy().await {
        (StatusCode::OK, Json(HealthResponse::up()))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(HealthResponse::down()))
    }
}
