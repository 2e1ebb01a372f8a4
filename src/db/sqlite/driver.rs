//! SQLite DriverRepository implementation.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::helpers::placeholders;
use crate::db::{DbResult, Driver, DriverId, DriverRepository, normalize_driver_name};

/// SQLx-backed driver registry.
#[derive(Debug, Clone)]
pub struct SqliteDriverRepository {
    pub(crate) pool: SqlitePool,
}

fn driver_from_row(row: &SqliteRow) -> Result<Driver, sqlx::Error> {
    Ok(Driver {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl DriverRepository for SqliteDriverRepository {
    async fn list(&self) -> DbResult<Vec<Driver>> {
        let rows = sqlx::query(
            "SELECT id, name, created_at, updated_at FROM drivers ORDER BY name ASC, id ASC",
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
        let now = Utc::now();

        let row = sqlx::query(
            "INSERT INTO drivers (name, created_at, updated_at) VALUES (?, ?, ?) \
             RETURNING id, name, created_at, updated_at",
        )
        .bind(&name)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(driver_from_row(&row)?)
    }

    async fn update(&self, id: DriverId, name: &str) -> DbResult<Option<Driver>> {
        let name = normalize_driver_name(name)?;

        let row = sqlx::query(
            "UPDATE drivers SET name = ?, updated_at = ? WHERE id = ? \
             RETURNING id, name, created_at, updated_at",
        )
        .bind(&name)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(driver_from_row).transpose()?)
    }

    async fn delete(&self, id: DriverId) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM drivers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_many(&self, ids: &[DriverId]) -> DbResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let sql = format!(
            "DELETE FROM drivers WHERE id IN ({})",
            placeholders(ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id);
        }

        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
