//! Postgres DriverRepository implementation.
//!
//! `created_at` defaults to `NOW()` and `updated_at` is refreshed by the
//! `drivers_set_updated_at` trigger.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::db::{DbResult, Driver, DriverId, DriverRepository, normalize_driver_name};

/// SQLx-backed driver registry.
#[derive(Debug, Clone)]
pub struct PgDriverRepository {
    pub(crate) pool: PgPool,
}

fn driver_from_row(row: &PgRow) -> Result<Driver, sqlx::Error> {
    Ok(Driver {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl DriverRepository for PgDriverRepository {
    async fn list(&self) -> DbResult<Vec<Driver>> {
        let rows = sqlx::query(
            r#"SELECT id, name, created_at, updated_at FROM drivers ORDER BY name COLLATE "C", id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(driver_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn create(&self, name: &str) -> DbResult<Driver> {
        let name = normalize_driver_name(name)?;
        let row = sqlx::query(
            "INSERT INTO drivers (name) VALUES ($1) RETURNING id, name, created_at, updated_at",
        )
        .bind(&name)
        .fetch_one(&self.pool)
        .await?;
        Ok(driver_from_row(&row)?)
    }

    async fn update(&self, id: DriverId, name: &str) -> DbResult<Option<Driver>> {
        let name = normalize_driver_name(name)?;
        let row = sqlx::query(
            "UPDATE drivers SET name = $2 WHERE id = $1 RETURNING id, name, created_at, updated_at",
        )
        .bind(id)
        .bind(&name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(driver_from_row).transpose()?)
    }

    async fn delete(&self, id: DriverId) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM drivers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_many(&self, ids: &[DriverId]) -> DbResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM drivers WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
