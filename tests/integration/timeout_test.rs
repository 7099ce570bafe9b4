//! Integration tests for request timeouts against a slow store.

mod helpers;

use std::time::Duration;

use chrono::Utc;
use http::StatusCode;
use validuser_core::config::AppConfig;

use helpers::{TestApp, token_for};

/// Per-attempt latency matching the default pool acquire timeout.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::test(start_paused = true)]
async fn test_default_config_reports_exhausted_retries_before_timeout() {
    let config = AppConfig::default();
    assert_eq!(config.database.acquire_timeout(), ACQUIRE_TIMEOUT);
    let app = TestApp::with_config(config);
    app.create_session(1, "s1", Utc::now()).await;
    app.store.set_latency(ACQUIRE_TIMEOUT).await;
    app.store.fail_next(3).await;

    let response = app
        .get("/msapi/validateuser", Some(&token_for(1, "s1")))
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "DATABASE_ERROR");
    assert_eq!(app.store.call_count().await, 3);
}

#[tokio::test(start_paused = true)]
async fn test_request_timeout_is_a_server_error() {
    let app = TestApp::with_config(AppConfig::default());
    app.create_session(1, "s1", Utc::now()).await;
    app.store.set_latency(Duration::from_secs(120)).await;

    let response = app
        .get("/msapi/validateuser", Some(&token_for(1, "s1")))
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
}
