//! Request DTOs with validation.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Query parameters of `GET /msapi/validateuser`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ValidateUserQuery {
    /// `y`/`Y` to include the domain closure, `n`/`N` or absent to skip it.
    #[validate(custom(function = "validate_domains_flag"))]
    pub domains: Option<String>,
}

impl ValidateUserQuery {
    /// Whether the caller asked for the domain closure.
    pub fn wants_domains(&self) -> bool {
        matches!(self.domains.as_deref(), Some("y" | "Y"))
    }
}

fn validate_domains_flag(value: &str) -> Result<(), ValidationError> {
    match value {
        "y" | "Y" | "n" | "N" => Ok(()),
        _ => Err(ValidationError::new("domains_flag")
            .with_message(Cow::Borrowed("domains must be one of y, Y, n, N"))),
    }
}
