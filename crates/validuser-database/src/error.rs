//! Classification of sqlx failures into transient and permanent errors.

use validuser_core::error::{AppError, ErrorKind};

/// SQLSTATE codes that mean "the server went away", not "the query is wrong".
const TRANSIENT_SQLSTATES: &[&str] = &["57P01", "57P02", "57P03"];

/// Maps an sqlx error into an [`AppError`], tagging connectivity problems
/// as [`ErrorKind::Transient`] so the retry layer can pick them up.
pub fn map_sqlx(err: sqlx::Error, context: &str) -> AppError {
    let kind = if is_transient(&err) {
        ErrorKind::Transient
    } else {
        ErrorKind::Database
    };
    AppError::with_source(kind, format!("{context}: {err}"), err)
}

/// Whether the error is a connectivity failure worth retrying.
pub fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db) => db.code().is_some_and(|code| is_transient_sqlstate(&code)),
        _ => false,
    }
}

/// Class 08 (connection exception) plus the operator-intervention codes.
fn is_transient_sqlstate(code: &str) -> bool {
    code.starts_with("08") || TRANSIENT_SQLSTATES.contains(&code)
}
