//! Session validation handler.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum_extra::extract::CookieJar;
use validator::Validate;

use validuser_core::error::AppError;

use crate::dto::{ValidateUserQuery, ValidateUserResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /msapi/validateuser
///
/// Reads the session token from the configured cookie. The query is
/// validated before anything else, so a bad `domains` flag never reaches
/// the store.
pub async fn validate_user(
    State(state): State<AppState>,
    jar: CookieJar,
    query: Result<Query<ValidateUserQuery>, QueryRejection>,
) -> Result<Json<ValidateUserResponse>, ApiError> {
    let Query(query) = query.map_err(|e| AppError::validation(e.body_text()))?;
    query
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let token = jar
        .get(&state.config.auth.token_cookie)
        .map(|cookie| cookie.value().to_string());

    let result = state
        .orchestrator
        .validate(token.as_deref(), query.wants_domains())
        .await?;

    Ok(Json(ValidateUserResponse {
        domains: result.domains,
    }))
}
