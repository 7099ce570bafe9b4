//! Unified application error types for validuser.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the `?` operator. The [`ErrorKind`] decides both the
//! retry policy (only [`ErrorKind::Transient`] is retried) and the HTTP
//! status chosen by the API layer.

use std::fmt;
use thiserror::Error;

/// Why a request failed authorization.
///
/// Every variant surfaces to clients as the same 401 status; only a short
/// message is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum AuthFailure {
    /// No session token was supplied.
    MissingToken,
    /// The token signature, format, or validity window was rejected.
    InvalidSignature,
    /// The decoded token lacks a required claim (`sub` or `jti`).
    MissingClaim(&'static str),
    /// The session referenced by the token is not live.
    NotAuthorized,
}

impl AuthFailure {
    /// Short client-facing message for this failure.
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingToken | Self::NotAuthorized => "Authorization Failed",
            Self::InvalidSignature => "Invalid login token",
            Self::MissingClaim("sub") => "Invalid userid",
            Self::MissingClaim(_) => "Invalid login token",
        }
    }
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingToken => write!(f, "MISSING_TOKEN"),
            Self::InvalidSignature => write!(f, "INVALID_SIGNATURE"),
            Self::MissingClaim(claim) => write!(f, "MISSING_CLAIM({claim})"),
            Self::NotAuthorized => write!(f, "NOT_AUTHORIZED"),
        }
    }
}

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum ErrorKind {
    /// Authorization failed; never retried.
    Unauthorized(AuthFailure),
    /// Client input validation failed.
    Validation,
    /// The backing store could not be reached. Retryable.
    Transient,
    /// The backing store rejected a query, or retries were exhausted.
    Database,
    /// A configuration or key-material error occurred.
    Configuration,
    /// An internal server error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized(reason) => write!(f, "UNAUTHORIZED[{reason}]"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout validuser.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an authorization error carrying its short client message.
    pub fn unauthorized(reason: AuthFailure) -> Self {
        Self::new(ErrorKind::Unauthorized(reason), reason.message())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a transient (retryable) store error.
    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transient, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether the operation that produced this error may be retried.
    pub fn is_transient(&self) -> bool {
        self.kind == ErrorKind::Transient
    }

    /// The authorization failure reason, if this is an authorization error.
    pub fn auth_failure(&self) -> Option<AuthFailure> {
        match self.kind {
            ErrorKind::Unauthorized(reason) => Some(reason),
            _ => None,
        }
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
