//! RS256 session token verification.

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::{debug, info};

use validuser_core::config::AuthConfig;
use validuser_core::error::{AppError, AuthFailure, ErrorKind};
use validuser_core::result::AppResult;

use super::claims::{SessionClaims, VerifiedToken};

/// Verifies session tokens against the login service's RSA public key.
///
/// Only RS256 is accepted. `exp` is checked when the token carries one but is
/// not required.
#[derive(Clone)]
pub struct TokenVerifier {
    /// RSA public key for signature verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    /// Creates a verifier from a PEM-encoded RSA public key.
    pub fn from_pem(pem: &[u8], leeway_seconds: u64) -> AppResult<Self> {
        let decoding_key = DecodingKey::from_rsa_pem(pem).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                "Invalid RSA public key PEM",
                e,
            )
        })?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = leeway_seconds;
        validation.validate_exp = true;
        validation.required_spec_claims.clear();

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Reads the key file named in the auth configuration.
    pub fn from_config(config: &AuthConfig) -> AppResult<Self> {
        let pem = std::fs::read(&config.public_key_path).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Failed to read public key '{}'", config.public_key_path),
                e,
            )
        })?;
        let verifier = Self::from_pem(&pem, config.leeway_seconds)?;
        info!(path = %config.public_key_path, "Loaded token verification key");
        Ok(verifier)
    }

    /// Verifies a token and extracts the user and session ids.
    ///
    /// Checks, in order:
    /// 1. A non-empty token is present
    /// 2. Signature, algorithm, and expiry
    /// 3. `sub` is an integer and `jti` is present
    pub fn verify(&self, token: Option<&str>) -> AppResult<VerifiedToken> {
        let token = match token.map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => return Err(AppError::unauthorized(AuthFailure::MissingToken)),
        };

        let claims = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                match e.kind() {
                    JwtErrorKind::ExpiredSignature => debug!("Session token expired"),
                    JwtErrorKind::InvalidAlgorithm => debug!("Session token uses a rejected algorithm"),
                    _ => debug!(error = %e, "Session token rejected"),
                }
                AppError::unauthorized(AuthFailure::InvalidSignature)
            })?
            .claims;

        claims.into_verified()
    }
}
