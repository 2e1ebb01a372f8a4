//! Database abstraction layer.
//!
//! Trait-based data access that lets the embedded SQLite store and the
//! networked Postgres store be swapped without changing business logic.
//!
//! # Architecture
//!
//! - `error`: Storage-agnostic error types
//! - `models`: Domain entities (Entry, MonthlyTotal, Driver) and the `Month` key
//! - `repository`: Trait definitions each backend implements
//! - `entries`: `EntryRepository`, the backend-agnostic query and mutation API
//! - `storage`: Lifecycle of the shared connection pool
//! - `sqlite`, `postgres`: Backend implementations

mod entries;
mod error;
mod models;
mod repository;
mod storage;

pub mod postgres;
pub mod sqlite;

#[cfg(test)]
mod error_test;

pub use entries::EntryRepository;
pub use error::{DbError, DbResult};
pub use models::*;
pub use postgres::{PostgresDatabase, PostgresOptions};
pub use repository::*;
pub use sqlite::{SqliteDatabase, SqliteDriverRepository, SqliteEntryStore, SqliteOptions};
pub use storage::{Storage, StorageState};
