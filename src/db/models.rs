//! Domain models for the ledger database.
//!
//! These models are storage-agnostic. Both backends decode into them and the
//! HTTP and CLI layers serialize them as-is.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::db::{DbError, DbResult};

/// Driver label carried by computed monthly total rows.
pub const TOTAL_LABEL: &str = "TOTAL";

// =============================================================================
// Month
// =============================================================================

/// A calendar month, stored as the first day of that month.
///
/// Every constructor normalizes to day 1, so two values for the same
/// (year, month) always compare equal regardless of the day they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(NaiveDate);

impl Month {
    /// Month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Month(date.with_day(1).unwrap_or(date))
    }

    /// Build from a year and a 1-based month number.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Month)
    }

    /// First day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for Month {
    fn from(date: NaiveDate) -> Self {
        Month::from_date(date)
    }
}

impl From<NaiveDateTime> for Month {
    fn from(dt: NaiveDateTime) -> Self {
        Month::from_date(dt.date())
    }
}

impl FromStr for Month {
    type Err = DbError;

    /// Accepts `YYYY-MM`, `YYYY-MM-DD` and date-times with a `T` or space
    /// separator. Any day or time component is discarded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DbError::validation("month is required"));
        }

        let date_part = s.split(['T', ' ']).next().unwrap_or(s);

        if let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
            return Ok(Month::from_date(date));
        }
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{date_part}-01"), "%Y-%m-%d") {
            return Ok(Month(date));
        }

        Err(DbError::validation(format!(
            "invalid month '{s}' (expected YYYY-MM or YYYY-MM-DD)"
        )))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Measures
// =============================================================================

/// The six monthly figures tracked per driver.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Measures {
    /// Freight revenue.
    #[serde(default)]
    pub frachty: f64,
    /// Fuel cost.
    #[serde(default)]
    pub paliwo: f64,
    /// Sum of revenue categories.
    #[serde(default)]
    pub razem: f64,
    /// Driver compensation.
    #[serde(default)]
    pub wynagr: f64,
    /// Monthly result.
    #[serde(default)]
    pub wynik_mc: f64,
    /// Cumulative result, as supplied by the caller.
    #[serde(default)]
    pub wynik_narast: f64,
}

impl Measures {
    pub fn as_array(&self) -> [f64; 6] {
        [
            self.frachty,
            self.paliwo,
            self.razem,
            self.wynagr,
            self.wynik_mc,
            self.wynik_narast,
        ]
    }

    pub fn from_array(values: [f64; 6]) -> Self {
        let [frachty, paliwo, razem, wynagr, wynik_mc, wynik_narast] = values;
        Self {
            frachty,
            paliwo,
            razem,
            wynagr,
            wynik_mc,
            wynik_narast,
        }
    }

    /// Every measure rounded to two decimal places.
    pub fn rounded(&self) -> Self {
        Self::from_array(self.as_array().map(round_cents))
    }

    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|v| v.is_finite())
    }
}

/// Round a currency amount to cents.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// Entries
// =============================================================================

/// Storage-assigned entry identifier.
pub type EntryId = i64;

/// One driver-month record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub driver: String,
    pub month: Month,
    #[serde(flatten)]
    pub measures: Measures,
}

/// An entry before storage has assigned it an id. Input to upserts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    pub driver: String,
    pub month: Month,
    #[serde(flatten)]
    pub measures: Measures,
}

impl NewEntry {
    pub fn new(driver: impl Into<String>, month: Month, measures: Measures) -> Self {
        Self {
            driver: driver.into().trim().to_string(),
            month,
            measures,
        }
    }

    /// Build from loosely typed input, as received from forms and files.
    pub fn parse(driver: &str, month: &str, measures: Measures) -> DbResult<Self> {
        let entry = NewEntry::new(driver, month.parse()?, measures);
        entry.validate()?;
        Ok(entry)
    }

    /// Check the fields an upsert depends on.
    pub fn validate(&self) -> DbResult<()> {
        if self.driver.trim().is_empty() {
            return Err(DbError::validation("driver is required"));
        }
        if !self.measures.is_finite() {
            return Err(DbError::validation(format!(
                "measures for {} {} must be finite numbers",
                self.driver, self.month
            )));
        }
        Ok(())
    }
}

/// Per-month sum of measures across a set of drivers. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    /// Always [`TOTAL_LABEL`].
    pub driver: String,
    pub month: Month,
    #[serde(flatten)]
    pub measures: Measures,
}

impl MonthlyTotal {
    pub fn new(month: Month, measures: Measures) -> Self {
        Self {
            driver: TOTAL_LABEL.to_string(),
            month,
            measures,
        }
    }
}

// =============================================================================
// Driver registry
// =============================================================================

/// Registry identifier for a driver.
pub type DriverId = i64;

/// A named driver in the registry.
///
/// Registry names are not linked to [`Entry::driver`]; the two sets only
/// correlate by equal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Trim a registry name, rejecting blanks.
pub fn normalize_driver_name(name: &str) -> DbResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DbError::validation("name is required"));
    }
    Ok(trimmed.to_string())
}
