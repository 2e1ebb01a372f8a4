//! HTTP handlers.

mod data;
mod entries;
mod registry;
mod system;

#[cfg(test)]
mod entries_test;
#[cfg(test)]
mod test_support;

use axum::{Json, http::StatusCode};
use serde::Serialize;

use crate::db::DbError;

pub use data::*;
pub use entries::*;
pub use registry::*;
pub use system::*;

/// Error response DTO
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

pub type HandlerError = (StatusCode, Json<ErrorResponse>);
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Count of removed rows, returned by every delete endpoint.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: u64,
}

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Map a storage error to its HTTP status.
pub(crate) fn db_error(e: DbError) -> HandlerError {
    let status = match e {
        DbError::Validation { .. } => StatusCode::BAD_REQUEST,
        DbError::StorageUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        DbError::Schema { .. } | DbError::Query { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, e.to_string())
}
