//! Postgres EntryStore implementation.
//!
//! Measures are `NUMERIC(14, 2)` in storage and `f64` in the domain. Every
//! statement converts explicitly: `CAST(... AS NUMERIC(14, 2))` on the way
//! in, `::float8` on the way out.

use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::db::{DbResult, Entry, EntryStore, Measures, Month, NewEntry};

const ENTRY_COLUMNS: &str = "id, driver, month, \
     frachty::float8 AS frachty, \
     paliwo::float8 AS paliwo, \
     razem::float8 AS razem, \
     wynagr::float8 AS wynagr, \
     wynik_mc::float8 AS wynik_mc, \
     wynik_narast::float8 AS wynik_narast";

/// SQLx-backed entry store.
#[derive(Debug, Clone)]
pub struct PgEntryStore {
    pub(crate) pool: PgPool,
}

fn measures_from_row(row: &PgRow) -> Result<Measures, sqlx::Error> {
    Ok(Measures {
        frachty: row.try_get("frachty")?,
        paliwo: row.try_get("paliwo")?,
        razem: row.try_get("razem")?,
        wynagr: row.try_get("wynagr")?,
        wynik_mc: row.try_get("wynik_mc")?,
        wynik_narast: row.try_get("wynik_narast")?,
    })
}

fn entry_from_row(row: &PgRow) -> Result<Entry, sqlx::Error> {
    let month: NaiveDate = row.try_get("month")?;
    Ok(Entry {
        id: row.try_get("id")?,
        driver: row.try_get("driver")?,
        month: Month::from_date(month),
        measures: measures_from_row(row)?,
    })
}

impl EntryStore for PgEntryStore {
    async fn distinct_drivers(&self) -> DbResult<Vec<String>> {
        // Byte-order collation keeps ordering identical to the embedded store.
        let drivers = sqlx::query_scalar(
            r#"SELECT driver FROM entries GROUP BY driver ORDER BY driver COLLATE "C""#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(drivers)
    }

    async fn all(&self) -> DbResult<Vec<Entry>> {
        let sql =
            format!(r#"SELECT {ENTRY_COLUMNS} FROM entries ORDER BY month, driver COLLATE "C""#);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(entry_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn by_driver(&self, driver: &str) -> DbResult<Vec<Entry>> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE driver = $1 ORDER BY month");
        let rows = sqlx::query(&sql).bind(driver).fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(entry_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn monthly_sums(&self, drivers: &[String]) -> DbResult<Vec<(Month, Measures)>> {
        let rows = sqlx::query(
            "SELECT month, \
                 SUM(frachty)::float8 AS frachty, \
                 SUM(paliwo)::float8 AS paliwo, \
                 SUM(razem)::float8 AS razem, \
                 SUM(wynagr)::float8 AS wynagr, \
                 SUM(wynik_mc)::float8 AS wynik_mc, \
                 SUM(wynik_narast)::float8 AS wynik_narast \
             FROM entries \
             WHERE driver = ANY($1) \
             GROUP BY month \
             ORDER BY month",
        )
        .bind(drivers)
        .fetch_all(&self.pool)
        .await?;

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
             VALUES ($1, $2, \
                 CAST($3 AS NUMERIC(14, 2)), \
                 CAST($4 AS NUMERIC(14, 2)), \
                 CAST($5 AS NUMERIC(14, 2)), \
                 CAST($6 AS NUMERIC(14, 2)), \
                 CAST($7 AS NUMERIC(14, 2)), \
                 CAST($8 AS NUMERIC(14, 2))) \
             ON CONFLICT (driver, month) DO UPDATE SET \
                 frachty = EXCLUDED.frachty, \
                 paliwo = EXCLUDED.paliwo, \
                 razem = EXCLUDED.razem, \
                 wynagr = EXCLUDED.wynagr, \
                 wynik_mc = EXCLUDED.wynik_mc, \
                 wynik_narast = EXCLUDED.wynik_narast \
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
        let result = sqlx::query("DELETE FROM entries WHERE driver = $1 AND month = $2")
            .bind(driver)
            .bind(month.first_day())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_driver(&self, driver: &str) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM entries WHERE driver = $1")
            .bind(driver)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
