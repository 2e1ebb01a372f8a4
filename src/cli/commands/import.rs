use std::path::Path;

use crate::cli::error::CliResult;
use crate::cli::utils::is_json;
use crate::db::{Database, Storage};
use crate::import::{import_csv_path, seed};

/// Bulk import a CSV export
pub async fn import_file<D: Database>(
    storage: &Storage<D>,
    path: &Path,
    format: &str,
) -> CliResult<String> {
    let repo = storage.entries().await?;
    let report = import_csv_path(&repo, path).await?;

    if is_json(format) {
        return Ok(serde_json::to_string_pretty(&report)?);
    }
    if report.rows_seen() == 0 {
        return Ok(format!("Nothing imported from {}", path.display()));
    }
    Ok(format!(
        "Imported {} rows from {} ({} skipped, {} failed)",
        report.imported,
        path.display(),
        report.skipped,
        report.failed
    ))
}

/// Load the sample dataset
pub async fn seed_sample<D: Database>(storage: &Storage<D>) -> CliResult<String> {
    let repo = storage.entries().await?;
    let count = seed(&repo).await?;
    Ok(format!("Seeded {} rows", count))
}
