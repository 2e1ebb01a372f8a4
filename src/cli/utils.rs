//! Shared utilities for CLI commands

use tabled::{Table, settings::Style};

/// Apply consistent table styling
pub fn apply_table_style(table: &mut Table) {
    table.with(Style::rounded());
}

/// Render an amount with two decimals and a decimal comma, as the ledger
/// sheets show it.
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value).replace('.', ",")
}

/// True when the output format asks for JSON.
pub fn is_json(format: &str) -> bool {
    format.eq_ignore_ascii_case("json")
}
