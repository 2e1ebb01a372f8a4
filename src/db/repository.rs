//! Storage traits for data access abstraction.
//!
//! Each backend implements these traits with its own SQL. Nothing above this
//! layer sees backend-specific query syntax, so swapping the embedded store
//! for the networked one needs no change in [`EntryRepository`] or the
//! HTTP/CLI layers.
//!
//! [`EntryRepository`]: crate::db::EntryRepository

use std::future::Future;

use crate::db::{
    DbResult,
    models::{Driver, DriverId, Entry, Measures, Month, NewEntry},
};

/// Backend primitives over the `entries` table.
///
/// Implementations issue exactly one statement per call and report every
/// failure; degrading reads to empty results is the repository's job.
pub trait EntryStore: Send + Sync {
    /// Distinct driver names, ascending.
    fn distinct_drivers(&self) -> impl Future<Output = DbResult<Vec<String>>> + Send;

    /// Every entry, ordered by month then driver.
    fn all(&self) -> impl Future<Output = DbResult<Vec<Entry>>> + Send;

    /// Entries of one driver, ordered by month.
    fn by_driver(&self, driver: &str) -> impl Future<Output = DbResult<Vec<Entry>>> + Send;

    /// Per-month sums over the given drivers, ordered by month.
    fn monthly_sums(
        &self,
        drivers: &[String],
    ) -> impl Future<Output = DbResult<Vec<(Month, Measures)>>> + Send;

    /// Insert, or replace the measures of the row with the same (driver, month),
    /// in a single atomic statement.
    fn upsert(&self, entry: &NewEntry) -> impl Future<Output = DbResult<Entry>> + Send;

    /// Delete one (driver, month) row. Returns the number of rows removed.
    fn delete(&self, driver: &str, month: Month) -> impl Future<Output = DbResult<u64>> + Send;

    /// Delete every row of a driver. Returns the number of rows removed.
    fn delete_driver(&self, driver: &str) -> impl Future<Output = DbResult<u64>> + Send;
}

/// Repository for the driver registry.
pub trait DriverRepository: Send + Sync {
    /// All registered drivers, ordered by name.
    fn list(&self) -> impl Future<Output = DbResult<Vec<Driver>>> + Send;

    /// Register a driver. The name is trimmed and must not be empty.
    fn create(&self, name: &str) -> impl Future<Output = DbResult<Driver>> + Send;

    /// Rename a driver. Returns `None` when the id is unknown.
    fn update(
        &self,
        id: DriverId,
        name: &str,
    ) -> impl Future<Output = DbResult<Option<Driver>>> + Send;

    /// Delete a driver. Returns the number of rows removed.
    fn delete(&self, id: DriverId) -> impl Future<Output = DbResult<u64>> + Send;

    /// Delete several drivers at once. An empty id list issues no query.
    fn delete_many(&self, ids: &[DriverId]) -> impl Future<Output = DbResult<u64>> + Send;
}

/// Combined database interface implemented by each backend.
pub trait Database: Send + Sync + Sized + 'static {
    /// Connection settings for this backend.
    type Options: Send + Sync;
    type Entries: EntryStore;
    type Drivers: DriverRepository;

    /// Open a connection pool. Fails with `StorageUnavailable`.
    fn connect(options: &Self::Options) -> impl Future<Output = DbResult<Self>> + Send;

    /// Create or upgrade the schema, then verify it. Safe on every start-up;
    /// never drops data.
    fn migrate(&self) -> impl Future<Output = DbResult<()>> + Send;

    /// Entry primitives bound to this database's pool.
    fn entry_store(&self) -> Self::Entries;

    /// Driver registry bound to this database's pool.
    fn drivers(&self) -> Self::Drivers;

    /// Close the pool. Later calls through any store fail as unavailable.
    fn close(&self) -> impl Future<Output = ()> + Send;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;

    /// True when running on a volatile fallback store.
    fn is_degraded(&self) -> bool {
        false
    }
}
