//! Integration tests for `GET /msapi/validateuser`.

mod helpers;

use chrono::{Duration, Utc};
use http::StatusCode;
use serde_json::json;

use helpers::{TestApp, forged_token, token_for, token_with_claims};

#[tokio::test]
async fn test_live_session_without_domains() {
    let app = TestApp::new();
    app.create_session(1, "s1", Utc::now()).await;

    let response = app
        .get("/msapi/validateuser", Some(&token_for(1, "s1")))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "domains": [] }));
}

#[tokio::test]
async fn test_domains_flag_returns_closure() {
    let app = TestApp::new();
    app.create_session(1, "s1", Utc::now()).await;
    app.create_sample_domains(1, 2).await;
    let token = token_for(1, "s1");

    for flag in ["y", "Y"] {
        let response = app
            .get(&format!("/msapi/validateuser?domains={flag}"), Some(&token))
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, json!({ "domains": [1, 2, 3] }));
    }

    for flag in ["n", "N"] {
        let response = app
            .get(&format!("/msapi/validateuser?domains={flag}"), Some(&token))
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, json!({ "domains": [] }));
    }
}

#[tokio::test]
async fn test_user_without_home_domain_gets_empty_closure() {
    let app = TestApp::new();
    app.create_session(1, "s1", Utc::now()).await;

    let response = app
        .get("/msapi/validateuser?domains=y", Some(&token_for(1, "s1")))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "domains": [] }));
}

#[tokio::test]
async fn test_invalid_domains_flag_is_rejected_before_store() {
    let app = TestApp::new();
    app.create_session(1, "s1", Utc::now()).await;

    let response = app
        .get("/msapi/validateuser?domains=x", Some(&token_for(1, "s1")))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert_eq!(app.store.call_count().await, 0);
}

#[tokio::test]
async fn test_missing_cookie_is_unauthorized() {
    let app = TestApp::new();

    let response = app.get("/msapi/validateuser", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["detail"], "Authorization Failed");
    assert_eq!(app.store.call_count().await, 0);
}

#[tokio::test]
async fn test_forged_token_never_reaches_store() {
    let app = TestApp::new();
    app.create_session(1, "s1", Utc::now()).await;

    let response = app
        .get("/msapi/validateuser", Some(&forged_token(1, "s1")))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["detail"], "Invalid login token");
    assert_eq!(app.store.call_count().await, 0);
}

#[tokio::test]
async fn test_token_without_subject_is_unauthorized() {
    let app = TestApp::new();

    let token = token_with_claims(json!({ "jti": "s1" }));
    let response = app.get("/msapi/validateuser", Some(&token)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["detail"], "Invalid userid");
}

#[tokio::test]
async fn test_unknown_session_is_unauthorized_and_not_created() {
    let app = TestApp::new();

    let response = app
        .get("/msapi/validateuser", Some(&token_for(1, "s1")))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
    assert!(app.store.find_session(1, "s1").await.is_none());
}

#[tokio::test]
async fn test_stale_session_is_pruned_and_rejected() {
    let app = TestApp::new();
    app.create_session(1, "s1", Utc::now() - Duration::minutes(61))
        .await;

    let response = app
        .get("/msapi/validateuser", Some(&token_for(1, "s1")))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(app.store.find_session(1, "s1").await.is_none());
}

#[tokio::test]
async fn test_validation_sweeps_other_users_stale_sessions() {
    let app = TestApp::new();
    app.create_session(1, "s1", Utc::now()).await;
    app.create_session(2, "old", Utc::now() - Duration::hours(3))
        .await;

    let response = app
        .get("/msapi/validateuser", Some(&token_for(1, "s1")))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(app.store.find_session(2, "old").await.is_none());
}

#[tokio::test]
async fn test_successful_validation_refreshes_last_seen() {
    let app = TestApp::new();
    let seen = Utc::now() - Duration::minutes(30);
    app.create_session(1, "s1", seen).await;

    let response = app
        .get("/msapi/validateuser", Some(&token_for(1, "s1")))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let refreshed = app.store.find_session(1, "s1").await.unwrap();
    assert!(refreshed.last_seen > seen);
}

#[tokio::test]
async fn test_transient_failures_below_limit_are_invisible() {
    let app = TestApp::new();
    app.create_session(1, "s1", Utc::now()).await;
    app.store.fail_next(2).await;

    let response = app
        .get("/msapi/validateuser", Some(&token_for(1, "s1")))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.store.call_count().await, 3);
}

#[tokio::test]
async fn test_transient_failures_at_limit_are_server_errors() {
    let app = TestApp::new();
    app.create_session(1, "s1", Utc::now()).await;
    app.store.fail_next(3).await;

    let response = app
        .get("/msapi/validateuser", Some(&token_for(1, "s1")))
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "DATABASE_ERROR");
}
