//! Database error types.
//!
//! Errors are backend agnostic: both the embedded and the networked store
//! report failures through the same variants. Absence is never an error here;
//! unknown drivers, missing rows and unknown ids resolve to empty results,
//! zero counts or `None`.

use miette::Diagnostic;
use thiserror::Error;

/// Database operation errors.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Storage unavailable: {message}")]
    #[diagnostic(
        code(driver_ledger::db::storage_unavailable),
        help("Check --db, LEDGER_DB_PATH or DATABASE_URL")
    )]
    StorageUnavailable { message: String },

    #[error("Schema error: {message}")]
    #[diagnostic(code(driver_ledger::db::schema))]
    Schema { message: String },

    #[error("Validation error: {message}")]
    #[diagnostic(code(driver_ledger::db::validation))]
    Validation { message: String },

    #[error("Query failed: {message}")]
    #[diagnostic(code(driver_ledger::db::query))]
    Query { message: String },
}

impl DbError {
    pub fn validation(message: impl Into<String>) -> Self {
        DbError::Validation {
            message: message.into(),
        }
    }

    /// True for failures of the store itself rather than of a single statement.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, DbError::StorageUnavailable { .. })
    }
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolClosed
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_) => DbError::StorageUnavailable {
                message: e.to_string(),
            },
            sqlx::Error::Migrate(e) => DbError::Schema {
                message: e.to_string(),
            },
            other => DbError::Query {
                message: other.to_string(),
            },
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
