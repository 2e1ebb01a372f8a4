use tabled::{Table, Tabled};

use crate::cli::error::{CliError, CliResult};
use crate::cli::utils::{apply_table_style, is_json};
use crate::db::{Database, Driver, DriverId, DriverRepository, Storage};

#[derive(Tabled)]
struct DriverDisplay {
    #[tabled(rename = "ID")]
    id: DriverId,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Updated")]
    updated_at: String,
}

impl From<&Driver> for DriverDisplay {
    fn from(d: &Driver) -> Self {
        Self {
            id: d.id,
            name: d.name.clone(),
            updated_at: d.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

fn format_table(drivers: &[Driver]) -> String {
    if drivers.is_empty() {
        return "No drivers registered.".to_string();
    }

    let display: Vec<DriverDisplay> = drivers.iter().map(DriverDisplay::from).collect();
    let mut table = Table::new(display);
    apply_table_style(&mut table);
    table.to_string()
}

/// List registered drivers
pub async fn list<D: Database>(storage: &Storage<D>, format: &str) -> CliResult<String> {
    let drivers = storage.open().await?.drivers().list().await?;

    if is_json(format) {
        return Ok(serde_json::to_string_pretty(&drivers)?);
    }
    Ok(format_table(&drivers))
}

/// Register a driver
pub async fn add<D: Database>(storage: &Storage<D>, name: &str) -> CliResult<String> {
    let driver = storage.open().await?.drivers().create(name).await?;
    Ok(format!("Registered driver: {} ({})", driver.name, driver.id))
}

/// Rename a registered driver
pub async fn rename<D: Database>(
    storage: &Storage<D>,
    id: DriverId,
    name: &str,
) -> CliResult<String> {
    let driver = storage
        .open()
        .await?
        .drivers()
        .update(id, name)
        .await?
        .ok_or(CliError::DriverNotFound { id })?;
    Ok(format!("Renamed driver {} to {}", driver.id, driver.name))
}

/// Remove one or more registered drivers
pub async fn remove<D: Database>(storage: &Storage<D>, ids: &[DriverId]) -> CliResult<String> {
    let deleted = storage.open().await?.drivers().delete_many(ids).await?;
    Ok(format!("Removed {} drivers", deleted))
}
