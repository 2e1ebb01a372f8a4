//! SQLite EntryStore implementation.

use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::helpers::{ENTRY_COLUMNS, placeholders};
use crate::db::{DbResult, Entry, EntryStore, Measures, Month, NewEntry};

/// SQLx-backed entry store.
#[derive(Debug, Clone)]
pub struct SqliteEntryStore {
    pub(crate) pool: SqlitePool,
}

fn measures_from_row(row: &SqliteRow) -> Result<Measures, sqlx::Error> {
    Ok(Measures {
        frachty: row.try_get("frachty")?,
        paliwo: row.try_get("paliwo")?,
        razem: row.try_get("razem")?,
        wynagr: row.try_get("wynagr")?,
        wynik_mc: row.try_get("wynik_mc")?,
        wynik_narast: row.try_get("wynik_narast")?,
    })
}

fn entry_from_row(row: &SqliteRow) -> Result<Entry, sqlx::Error> {
    let month: NaiveDate = row.try_get("month")?;
    Ok(Entry {
        id: row.try_get("id")?,
        driver: row.try_get("driver")?,
        month: Month::from_date(month),
        measures: measures_from_row(row)?,
    })
}

impl EntryStore for SqliteEntryStore {
    async fn distinct_drivers(&self) -> DbResult<Vec<String>> {
        let drivers = sqlx::query_scalar("SELECT DISTINCT driver FROM entries ORDER BY driver")
            .fetch_all(&self.pool)
            .await?;
        Ok(drivers)
    }

    async fn all(&self) -> DbResult<Vec<Entry>> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM entries ORDER BY month, driver");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(entry_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn by_driver(&self, driver: &str) -> DbResult<Vec<Entry>> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE driver = ? ORDER BY month");
        let rows = sqlx::query(&sql).bind(driver).fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(entry_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn monthly_sums(&self, drivers: &[String]) -> DbResult<Vec<(Month, Measures)>> {
        let sql = format!(
            "SELECT month, \
                 SUM(frachty) AS frachty, \
                 SUM(paliwo) AS paliwo, \
                 SUM(razem) AS razem, \
                 SUM(wynagr) AS wynagr, \
                 SUM(wynik_mc) AS wynik_mc, \
                 SUM(wynik_narast) AS wynik_narast \
             FROM entries \
             WHERE driver IN ({}) \
             GROUP BY month \
             ORDER BY month",
            placeholders(drivers.len())
        );

        let mut query = sqlx::query(&sql);
        for driver in drivers {
            query = query.bind(driver);
        }

        let rows = query.fetch_all(&self.pool).await?;
        let sums = rows
            .iter()
            .map(|row| -> Result<(Month, Measures), sqlx::Error> {
                let month: NaiveDate = row.try_get("month")?;
                Ok((Month::from_date(month), measures_from_row(row)?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sums)
    }

    async fn upsert(&self, entry: &NewEntry) -> DbResult<Entry> {
        let sql = format!(
            "INSERT INTO entries (driver, month, frachty, paliwo, razem, wynagr, wynik_mc, wynik_narast) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(driver, month) DO UPDATE SET \
                 frachty = excluded.frachty, \
                 paliwo = excluded.paliwo, \
                 razem = excluded.razem, \
                 wynagr = excluded.wynagr, \
                 wynik_mc = excluded.wynik_mc, \
                 wynik_narast = excluded.wynik_narast \
             RETURNING {ENTRY_COLUMNS}"
        );

        let m = &entry.measures;
        let row = sqlx::query(&sql)
            .bind(&entry.driver)
            .bind(entry.month.first_day())
            .bind(m.frachty)
            .bind(m.paliwo)
            .bind(m.razem)
            .bind(m.wynagr)
            .bind(m.wynik_mc)
            .bind(m.wynik_narast)
            .fetch_one(&self.pool)
            .await?;

        Ok(entry_from_row(&row)?)
    }

    async fn delete(&self, driver: &str, month: Month) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM entries WHERE driver = ? AND month = ?")
            .bind(driver)
            .bind(month.first_day())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_driver(&self, driver: &str) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM entries WHERE driver = ?")
            .bind(driver)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
