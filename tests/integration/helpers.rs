//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use chrono::{DateTime, Utc};
use http::{Request, StatusCode};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::{Value, json};
use tower::ServiceExt;

use validuser_api::{AppState, build_app};
use validuser_auth::{TokenVerifier, ValidationOrchestrator};
use validuser_core::config::{AppConfig, RetryConfig};
use validuser_database::{MemoryValidationStore, RetryingStore};
use validuser_entity::{DomainId, DomainNode, SessionRecord, UserId};

const PUBLIC_KEY: &[u8] = include_bytes!("../fixtures/test_rsa.pub");
const PRIVATE_KEY: &[u8] = include_bytes!("../fixtures/test_rsa.pem");
const OTHER_PRIVATE_KEY: &[u8] = include_bytes!("../fixtures/other_rsa.pem");

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Backing store, for seeding and inspection
    pub store: MemoryValidationStore,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application over an empty in-memory store
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.retry = RetryConfig {
            max_attempts: 3,
            delay_ms: 5,
        };
        Self::with_config(config)
    }

    /// Create a test application with an explicit configuration
    pub fn with_config(config: AppConfig) -> Self {
        let store = MemoryValidationStore::new(&config.session);
        let retrying = RetryingStore::new(store.clone(), config.retry.clone());
        let verifier = TokenVerifier::from_pem(PUBLIC_KEY, config.auth.leeway_seconds)
            .expect("Failed to load test public key");
        let orchestrator = Arc::new(ValidationOrchestrator::new(
            Arc::new(verifier),
            Arc::new(retrying),
        ));

        let router = build_app(AppState::new(Arc::new(config.clone()), orchestrator));

        Self {
            router,
            store,
            config,
        }
    }

    /// Seed a session last seen at `last_seen`
    pub async fn create_session(&self, user_id: UserId, jti: &str, last_seen: DateTime<Utc>) {
        self.store
            .insert_session(SessionRecord::new(user_id, jti, last_seen))
            .await;
    }

    /// Seed the domain forest `{1 root, 2 -> 1, 3 -> 2, 4 -> 1}` and a home domain
    pub async fn create_sample_domains(&self, user_id: UserId, home: DomainId) {
        self.store.set_home_domain(user_id, home).await;
        for node in [
            DomainNode::active(1, None),
            DomainNode::active(2, Some(1)),
            DomainNode::active(3, Some(2)),
            DomainNode::active(4, Some(1)),
        ] {
            self.store.insert_domain(node).await;
        }
    }

    /// Make a GET request, optionally carrying a session cookie
    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        let mut req = Request::builder().method("GET").uri(path);

        if let Some(token) = token {
            req = req.header("Cookie", format!("token={token}"));
        }

        let req = req.body(Body::empty()).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Mint an RS256 token signed with the trusted test key
pub fn token_for(user_id: UserId, jti: &str) -> String {
    sign(PRIVATE_KEY, json!({ "sub": user_id, "jti": jti }))
}

/// Mint an RS256 token with arbitrary claims
pub fn token_with_claims(claims: Value) -> String {
    sign(PRIVATE_KEY, claims)
}

/// Mint a token signed with a key the server does not trust
pub fn forged_token(user_id: UserId, jti: &str) -> String {
    sign(OTHER_PRIVATE_KEY, json!({ "sub": user_id, "jti": jti }))
}

fn sign(key: &[u8], claims: Value) -> String {
    encode(
        &Header::new(Algorithm::RS256),
        &claims,
        &EncodingKey::from_rsa_pem(key).expect("Failed to load test private key"),
    )
    .expect("Failed to sign test token")
}

/// Parsed test response
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
