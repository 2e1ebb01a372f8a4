//! SQLite implementation of the database traits.
//!
//! This is the embedded-file backend. The same file layout is used by the
//! bulk loader, so a database seeded by `ledger import` can be served by
//! `ledger-api` directly.

mod connection;
mod driver;
mod entry;
mod helpers;

#[cfg(test)]
mod driver_test;

pub use connection::{SqliteDatabase, SqliteOptions};
pub use driver::SqliteDriverRepository;
pub use entry::SqliteEntryStore;
