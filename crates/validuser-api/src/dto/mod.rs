//! Request and response bodies.

pub mod request;
pub mod response;

pub use request::ValidateUserQuery;
pub use response::{HealthResponse, ValidateUserResponse};
