//! Bulk loader for ledger exports.
//!
//! Reads comma-delimited files with one header row and the columns
//! `driver, month, frachty, paliwo, razem, wynagr, wynik_mc, wynik_narast`.
//! Amounts may use the Polish decimal comma, in which case the field has to
//! be quoted. Each row is upserted on its own; a bad row is logged and
//! counted, never fatal for the batch.

mod decimal;
mod seed;


use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::db::{EntryRepository, EntryStore, Measures, NewEntry};

pub use decimal::{parse_decimal, parse_decimal_strict};
pub use seed::{sample_entries, seed};

/// Number of columns a data row must carry.
pub const COLUMN_COUNT: usize = 8;

/// Failures that stop a whole batch.
#[derive(Error, Diagnostic, Debug)]
pub enum ImportError {
    #[error("Cannot read {path}: {source}")]
    #[diagnostic(code(driver_ledger::import::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV: {0}")]
    #[diagnostic(code(driver_ledger::import::csv))]
    Csv(#[from] csv::Error),
}

/// Outcome of one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Rows upserted.
    pub imported: usize,
    /// Rows with too few columns.
    pub skipped: usize,
    /// Rows that could not be parsed or stored.
    pub failed: usize,
}

impl ImportReport {
    pub fn rows_seen(&self) -> usize {
        self.imported + self.skipped + self.failed
    }
}

/// Import every data row from `reader`.
pub async fn import_csv<S, R>(
    repo: &EntryRepository<S>,
    reader: R,
) -> Result<ImportReport, ImportError>
where
    S: EntryStore,
    R: Read,
{
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut report = ImportReport::default();

    for (index, result) in csv_reader.records().enumerate() {
        // Line 1 is the header.
        let line = index + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(line, error = %e, "unreadable row");
                report.failed += 1;
                continue;
            }
        };

        if record.len() < COLUMN_COUNT {
            warn!(line, columns = record.len(), "row has too few columns, skipping");
            report.skipped += 1;
            continue;
        }

        let entry = match entry_from_record(&record) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(line, error = %e, "invalid row");
                report.failed += 1;
                continue;
            }
        };

        match repo.upsert_entry(entry).await {
            Ok(_) => report.imported += 1,
            Err(e) => {
                warn!(line, error = %e, "failed to store row");
                report.failed += 1;
            }
        }
    }

    info!(
        imported = report.imported,
        skipped = report.skipped,
        failed = report.failed,
        "import finished"
    );
    Ok(report)
}

/// Import a file. A missing file is not an error: the run is skipped and an
/// empty report returned.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub async fn import_csv_path<S: EntryStore>(
    repo: &EntryRepository<S>,
    path: impl AsRef<Path>,
) -> Result<ImportReport, ImportError> {
    let path = path.as_ref();
    if !path.exists() {
        info!("CSV file not found, skipping import");
        return Ok(ImportReport::default());
    }

    let file = File::open(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    import_csv(repo, file).await
}

fn entry_from_record(record: &StringRecord) -> crate::db::DbResult<NewEntry> {
    let field = |i: usize| record.get(i).unwrap_or_default();

    let mut values = [0.0; 6];
    for (slot, i) in values.iter_mut().zip(2..COLUMN_COUNT) {
        *slot = parse_decimal(field(i));
    }

    NewEntry::parse(field(0), field(1), Measures::from_array(values))
}
