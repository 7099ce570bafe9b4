//! Integration tests for `GET /health`.

mod helpers;

use http::StatusCode;
use serde_json::json;

use helpers::TestApp;

#[tokio::test]
async fn test_health_up() {
    let app = TestApp::new();

    let response = app.get("/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({ "status": "UP", "service_name": "ortelius-ms-validate-user" })
    );
}

#[tokio::test]
async fn test_health_down_when_store_unreachable() {
    let app = TestApp::new();
    app.store.set_unhealthy(true).await;

    let response = app.get("/health", None).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body, json!({ "status": "DOWN" }));
}

#[tokio::test]
async fn test_health_needs_no_token() {
    let app = TestApp::new();

    let response = app.get("/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.store.call_count().await, 0);
}
