use serde::Serialize;
use tabled::{Table, Tabled};

use crate::cli::error::CliResult;
use crate::cli::utils::{apply_table_style, format_amount, is_json};
use crate::db::{Database, DbError, DbResult, Entry, Measures, MonthlyTotal, NewEntry, Storage};
use crate::import::parse_decimal_strict;

#[derive(Tabled)]
struct EntryDisplay {
    #[tabled(rename = "Driver")]
    driver: String,
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Frachty")]
    frachty: String,
    #[tabled(rename = "Paliwo")]
    paliwo: String,
    #[tabled(rename = "Razem")]
    razem: String,
    #[tabled(rename = "Wynagr.")]
    wynagr: String,
    #[tabled(rename = "Wynik mc")]
    wynik_mc: String,
    #[tabled(rename = "Wynik narast.")]
    wynik_narast: String,
}

impl EntryDisplay {
    fn new(driver: &str, month: String, m: &Measures) -> Self {
        Self {
            driver: driver.to_string(),
            month,
            frachty: format_amount(m.frachty),
            paliwo: format_amount(m.paliwo),
            razem: format_amount(m.razem),
            wynagr: format_amount(m.wynagr),
            wynik_mc: format_amount(m.wynik_mc),
            wynik_narast: format_amount(m.wynik_narast),
        }
    }
}

impl From<&Entry> for EntryDisplay {
    fn from(e: &Entry) -> Self {
        Self::new(&e.driver, e.month.to_string(), &e.measures)
    }
}

impl From<&MonthlyTotal> for EntryDisplay {
    fn from(t: &MonthlyTotal) -> Self {
        Self::new(&t.driver, t.month.to_string(), &t.measures)
    }
}

/// Raw measure arguments, parsed as Polish decimals.
#[derive(Debug, Default, Clone)]
pub struct MeasureArgs {
    pub frachty: String,
    pub paliwo: String,
    pub razem: String,
    pub wynagr: String,
    pub wynik_mc: String,
    pub wynik_narast: String,
}

impl MeasureArgs {
    /// Blank amounts are zero; anything else has to parse.
    fn parse(&self) -> DbResult<Measures> {
        Ok(Measures {
            frachty: amount("frachty", &self.frachty)?,
            paliwo: amount("paliwo", &self.paliwo)?,
            razem: amount("razem", &self.razem)?,
            wynagr: amount("wynagr", &self.wynagr)?,
            wynik_mc: amount("wynik_mc", &self.wynik_mc)?,
            wynik_narast: amount("wynik_narast", &self.wynik_narast)?,
        })
    }
}

fn amount(field: &str, raw: &str) -> DbResult<f64> {
    if raw.trim().is_empty() {
        return Ok(0.0);
    }
    parse_decimal_strict(raw)
        .ok_or_else(|| DbError::validation(format!("invalid amount for {field}: '{raw}'")))
}

#[derive(Serialize)]
struct DeletedOutput {
    deleted: u64,
}

fn format_rows<T>(rows: &[T], empty: &str) -> String
where
    for<'a> EntryDisplay: From<&'a T>,
{
    if rows.is_empty() {
        return empty.to_string();
    }

    let display: Vec<EntryDisplay> = rows.iter().map(EntryDisplay::from).collect();
    let mut table = Table::new(display);
    apply_table_style(&mut table);
    table.to_string()
}

/// List distinct driver names that have entries
pub async fn list_drivers<D: Database>(storage: &Storage<D>, format: &str) -> CliResult<String> {
    let drivers = storage.entries().await?.list_drivers().await;

    if is_json(format) {
        return Ok(serde_json::to_string_pretty(&drivers)?);
    }
    if drivers.is_empty() {
        return Ok("No drivers found.".to_string());
    }
    Ok(drivers.join("\n"))
}

/// List entries, optionally for a single driver
pub async fn list_entries<D: Database>(
    storage: &Storage<D>,
    driver: Option<&str>,
    format: &str,
) -> CliResult<String> {
    let repo = storage.entries().await?;
    let entries = match driver {
        Some(d) => repo.entries_by_driver(d).await,
        None => repo.all_entries().await,
    };

    if is_json(format) {
        return Ok(serde_json::to_string_pretty(&entries)?);
    }
    Ok(format_rows(&entries, "No entries found."))
}

/// Monthly totals across the given drivers
pub async fn totals<D: Database>(
    storage: &Storage<D>,
    drivers: &[String],
    format: &str,
) -> CliResult<String> {
    let totals = storage
        .entries()
        .await?
        .monthly_totals_for_drivers(drivers)
        .await;

    if is_json(format) {
        return Ok(serde_json::to_string_pretty(&totals)?);
    }
    Ok(format_rows(&totals, "No totals for the selected drivers."))
}

/// Insert or replace one entry
pub async fn upsert<D: Database>(
    storage: &Storage<D>,
    driver: &str,
    month: &str,
    measures: &MeasureArgs,
    format: &str,
) -> CliResult<String> {
    let input = NewEntry::parse(driver, month, measures.parse()?)?;
    let entry = storage.entries().await?.upsert_entry(input).await?;

    if is_json(format) {
        return Ok(serde_json::to_string_pretty(&entry)?);
    }
    Ok(format!(
        "Stored entry {} for {} {}",
        entry.id, entry.driver, entry.month
    ))
}

/// Delete one month of a driver, or every entry of the driver
pub async fn delete<D: Database>(
    storage: &Storage<D>,
    driver: &str,
    month: Option<&str>,
    format: &str,
) -> CliResult<String> {
    let repo = storage.entries().await?;
    let deleted = match month {
        Some(m) => repo.delete_entry(driver, m.parse()?).await?,
        None => repo.delete_driver(driver).await?,
    };

    if is_json(format) {
        return Ok(serde_json::to_string_pretty(&DeletedOutput { deleted })?);
    }
    Ok(format!("Deleted {} entries for {}", deleted, driver))
}
