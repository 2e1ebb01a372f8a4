//! Tests for database error types.

use crate::db::{DbError, DbResult};

#[test]
fn storage_unavailable_error_displays_correctly() {
    let err = DbError::StorageUnavailable {
        message: "unable to open database file".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Storage unavailable: unable to open database file"
    );
    assert!(err.is_unavailable());
}

#[test]
fn schema_error_displays_correctly() {
    let err = DbError::Schema {
        message: "missing unique index on entries(driver, month)".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Schema error: missing unique index on entries(driver, month)"
    );
}

#[test]
fn validation_error_displays_correctly() {
    let err = DbError::validation("driver must not be empty");
    assert_eq!(err.to_string(), "Validation error: driver must not be empty");
    assert!(!err.is_unavailable());
}

#[test]
fn query_error_displays_correctly() {
    let err = DbError::Query {
        message: "no such column: foo".to_string(),
    };
    assert_eq!(err.to_string(), "Query failed: no such column: foo");
}

#[test]
fn closed_pool_maps_to_storage_unavailable() {
    let err: DbError = sqlx::Error::PoolClosed.into();
    assert!(err.is_unavailable());
}

#[test]
fn row_not_found_maps_to_query_error() {
    let err: DbError = sqlx::Error::RowNotFound.into();
    assert!(matches!(err, DbError::Query { .. }));
}

#[test]
fn db_result_err_returns_error() {
    let result: DbResult<u64> = Err(DbError::validation("month is required"));
    assert!(result.is_err());
}
