//! Postgres implementation of the database traits.
//!
//! This is the networked backend. Uniqueness of (driver, month) is enforced
//! by a unique index and upserts rely on `ON CONFLICT`, so concurrent writers
//! in different processes never produce duplicate rows.

mod connection;
mod driver;
mod entry;


pub use connection::{PostgresDatabase, PostgresOptions, default_ssl_mode};
pub use driver::PgDriverRepository;
pub use entry::PgEntryStore;
