//! Sample dataset for demos and local development.

use tracing::info;

use crate::db::{DbResult, EntryRepository, EntryStore, Measures, Month, NewEntry};

const SAMPLE: [(&str, i32, u32, [f64; 6]); 8] = [
    ("KOPANIARZ", 2025, 6, [3128.87, 0.0, 3128.87, 4572.2, -1443.33, -1443.33]),
    ("KOPANIARZ", 2025, 7, [12491.26, 433.44, 12924.7, 16708.96, -3784.26, -5227.59]),
    ("KOPANIARZ", 2025, 8, [10260.04, 1245.95, 11505.99, 14308.86, -2802.87, -8030.46]),
    ("KRYVAK", 2024, 9, [23081.65, 775.52, 23857.17, 25317.67, -1460.5, -1128.07]),
    ("KRYVAK", 2024, 10, [11892.95, 1758.26, 13651.21, 12508.98, 1142.23, 787.95]),
    ("KRYVAK", 2024, 11, [10179.36, 1201.55, 11380.91, 10481.07, 899.84, 877.79]),
    ("KUBYSHKIN", 2024, 11, [10444.85, 752.59, 11197.44, 10395.66, 801.78, 801.78]),
    ("KUBYSHKIN", 2025, 1, [12215.29, 773.72, 12989.71, 12162.72, 826.99, 2520.69]),
];

/// The sample rows as new entries.
pub fn sample_entries() -> Vec<NewEntry> {
    SAMPLE
        .iter()
        .filter_map(|&(driver, year, month, values)| {
            Month::new(year, month)
                .map(|month| NewEntry::new(driver, month, Measures::from_array(values)))
        })
        .collect()
}

/// Upsert the sample dataset. Existing rows for the same keys are replaced,
/// anything else is left alone. Returns the number of rows written.
pub async fn seed<S: EntryStore>(repo: &EntryRepository<S>) -> DbResult<usize> {
    let entries = sample_entries();
    let count = entries.len();
    for entry in entries {
        repo.upsert_entry(entry).await?;
    }
    info!(rows = count, "seeded sample data");
    Ok(count)
}
