//! Backend-agnostic CRUD and aggregation over driver-month entries.
//!
//! Reads favour availability: a failing store yields an empty result and an
//! error log, because those results only feed display views. Writes favour
//! correctness and always propagate the failure.

use std::collections::BTreeSet;

use tracing::{debug, error, instrument};

use crate::db::{DbResult, Entry, EntryStore, Month, MonthlyTotal, NewEntry};

/// Typed query and mutation surface over any [`EntryStore`].
#[derive(Debug, Clone)]
pub struct EntryRepository<S> {
    store: S,
}

impl<S: EntryStore> EntryRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Distinct driver names, ascending. Empty when the store fails.
    #[instrument(skip(self))]
    pub async fn list_drivers(&self) -> Vec<String> {
        or_empty("list_drivers", self.store.distinct_drivers().await)
    }

    /// Every entry ordered by month, then driver. No pagination.
    #[instrument(skip(self))]
    pub async fn all_entries(&self) -> Vec<Entry> {
        or_empty("all_entries", self.store.all().await)
    }

    /// Entries for one driver ordered by month. Unknown drivers yield nothing.
    ///
    /// Driver names are trimmed here and in the deletes, matching upserts.
    #[instrument(skip(self))]
    pub async fn entries_by_driver(&self, driver: &str) -> Vec<Entry> {
        or_empty("entries_by_driver", self.store.by_driver(driver.trim()).await)
    }

    /// Per-month totals across `drivers`, labelled with the total sentinel.
    ///
    /// Sums are rounded to cents so every backend reports the same figures.
    /// Duplicate and blank names are ignored. An empty selection returns
    /// immediately without touching the store.
    #[instrument(skip(self))]
    pub async fn monthly_totals_for_drivers(&self, drivers: &[String]) -> Vec<MonthlyTotal> {
        let selected: Vec<String> = drivers
            .iter()
            .map(|d| d.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if selected.is_empty() {
            debug!("no drivers selected, skipping totals query");
            return Vec::new();
        }

        or_empty(
            "monthly_totals_for_drivers",
            self.store.monthly_sums(&selected).await,
        )
        .into_iter()
        .map(|(month, measures)| MonthlyTotal::new(month, measures.rounded()))
        .collect()
    }

    /// Insert or replace the entry for (driver, month).
    ///
    /// The id is kept on update and assigned on insert. The driver name is
    /// trimmed and measures are stored rounded to cents.
    #[instrument(skip(self, input), fields(driver = %input.driver, month = %input.month))]
    pub async fn upsert_entry(&self, input: NewEntry) -> DbResult<Entry> {
        input.validate()?;
        let input = NewEntry::new(input.driver, input.month, input.measures.rounded());
        let entry = self.store.upsert(&input).await?;
        debug!(id = entry.id, "entry stored");
        Ok(entry)
    }

    /// Delete the entry for (driver, month). Returns 0 when none existed.
    #[instrument(skip(self))]
    pub async fn delete_entry(&self, driver: &str, month: Month) -> DbResult<u64> {
        self.store.delete(driver.trim(), month).await
    }

    /// Delete every entry of `driver`. Returns 0 when none existed.
    #[instrument(skip(self))]
    pub async fn delete_driver(&self, driver: &str) -> DbResult<u64> {
        self.store.delete_driver(driver.trim()).await
    }
}

fn or_empty<T>(operation: &str, result: DbResult<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        error!(operation, error = %e, "read failed, returning empty result");
        Vec::new()
    })
}
