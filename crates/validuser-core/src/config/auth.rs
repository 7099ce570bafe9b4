//! Token verification configuration.

use serde::{Deserialize, Serialize};

/// Session token verification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Path to the PEM-encoded RSA public key that signs session tokens.
    #[serde(default = "default_public_key_path")]
    pub public_key_path: String,
    /// Name of the cookie carrying the session token.
    #[serde(default = "default_token_cookie")]
    pub token_cookie: String,
    /// Clock-skew leeway applied to `exp`/`nbf`, in seconds.
    #[serde(default)]
    pub leeway_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            public_key_path: default_public_key_path(),
            token_cookie: default_token_cookie(),
            leeway_seconds: 0,
        }
    }
}

fn default_public_key_path() -> String {
    "ortelius_rsa.pub".to_string()
}

fn default_token_cookie() -> String {
    "token".to_string()
}
