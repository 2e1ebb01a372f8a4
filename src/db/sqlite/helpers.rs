//! Shared helper functions for SQLite repositories.

/// Comma separated `?` placeholders for an `IN (...)` list.
pub fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Select list shared by every entry query.
pub const ENTRY_COLUMNS: &str =
    "id, driver, month, frachty, paliwo, razem, wynagr, wynik_mc, wynik_narast";
