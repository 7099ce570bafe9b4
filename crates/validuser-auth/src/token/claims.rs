//! Claims carried by session tokens issued by the login service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use validuser_core::error::{AppError, AuthFailure};
use validuser_core::result::AppResult;
use validuser_entity::UserId;

/// Raw claims payload of a session token.
///
/// Claims are kept loosely typed so that a token with a valid signature but
/// a missing or malformed claim is reported as such, not as a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the integer user id, as a JSON number or a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<Value>,
    /// Session id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<Value>,
    /// Expiration timestamp (seconds since epoch), if the issuer set one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Identity extracted from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    /// User id from `sub`.
    pub user_id: UserId,
    /// Session id from `jti`.
    pub session_id: String,
}

impl SessionClaims {
    /// Returns the user id from the subject claim.
    pub fn user_id(&self) -> AppResult<UserId> {
        let parsed = match &self.sub {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| AppError::unauthorized(AuthFailure::MissingClaim("sub")))
    }

    /// Returns the session id from the `jti` claim.
    pub fn session_id(&self) -> AppResult<String> {
        match &self.jti {
            Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            _ => Err(AppError::unauthorized(AuthFailure::MissingClaim("jti"))),
        }
    }

    /// Extracts both identifiers.
    pub fn into_verified(self) -> AppResult<VerifiedToken> {
        Ok(VerifiedToken {
            user_id: self.user_id()?,
            session_id: self.session_id()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn claims(value: Value) -> SessionClaims {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_sub_accepts_integer_and_numeric_string() {
        assert_eq!(claims(json!({"sub": 42})).user_id().unwrap(), 42);
        assert_eq!(claims(json!({"sub": "42"})).user_id().unwrap(), 42);
    }

    #[test]
    fn test_non_integer_sub_is_missing_claim() {
        for sub in [json!("alice"), json!(4.5), json!(null), json!([1])] {
            let err = claims(json!({ "sub": sub })).user_id().unwrap_err();
            assert_eq!(err.auth_failure(), Some(AuthFailure::MissingClaim("sub")));
        }
    }

    #[test]
    fn test_missing_jti() {
        let err = claims(json!({"sub": 1})).into_verified().unwrap_err();
        assert_eq!(err.auth_failure(), Some(AuthFailure::MissingClaim("jti")));

        let err = claims(json!({"sub": 1, "jti": ""})).session_id().unwrap_err();
        assert_eq!(err.auth_failure(), Some(AuthFailure::MissingClaim("jti")));
    }

    #[test]
    fn test_into_verified() {
        let verified = claims(json!({"sub": "7", "jti": "abc"}))
            .into_verified()
            .unwrap();
        assert_eq!(
            verified,
            VerifiedToken {
                user_id: 7,
                session_id: "abc".to_string()
            }
        );
    }
}
