//! Response DTOs.

use serde::{Deserialize, Serialize};

/// Name reported by the health probe.
pub const SERVICE_NAME: &str = "ortelius-ms-validate-user";

/// Body of a successful `GET /msapi/validateuser`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidateUserResponse {
    /// Domain closure in ascending order; empty unless requested.
    pub domains: Vec<i64>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `UP` or `DOWN`.
    pub status: String,
    /// Present only when the service is up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
}

impl HealthResponse {
    /// The store answered.
    pub fn up() -> Self {
        Self {
            status: "UP".to_string(),
            service_name: Some(SERVICE_NAME.to_string()),
        }
    }

    /// The store did not answer.
    pub fn down() -> Self {
        Self {
            status: "DOWN".to_string(),
            service_name: None,
        }
    }
}
