//! Postgres connection pool, retries and migrations.

use std::str::FromStr;
use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use tracing::{info, warn};

use super::{PgDriverRepository, PgEntryStore};
use crate::db::{Database, DbError, DbResult};

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for the networked backend.
#[derive(Debug, Clone)]
pub struct PostgresOptions {
    pub url: String,
    pub max_connections: u32,
    /// Connection attempts before giving up. At least one is always made.
    pub connect_retries: u32,
    /// Base delay between attempts; grows linearly with the attempt number.
    pub retry_delay: Duration,
}

impl PostgresOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            connect_retries: 3,
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// Postgres database implementation.
pub struct PostgresDatabase {
    pool: PgPool,
}

impl PostgresDatabase {
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn verify_schema(&self) -> DbResult<()> {
        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_schema = current_schema() AND table_name IN ('entries', 'drivers')",
        )
        .fetch_one(&self.pool)
        .await?;
        if tables != 2 {
            return Err(DbError::Schema {
                message: "expected tables 'entries' and 'drivers'".to_string(),
            });
        }

        let unique: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM pg_indexes \
             WHERE schemaname = current_schema() \
               AND tablename = 'entries' \
               AND indexname = 'ux_entries_driver_month'",
        )
        .fetch_one(&self.pool)
        .await?;
        if unique != 1 {
            return Err(DbError::Schema {
                message: "missing unique index on entries(driver, month)".to_string(),
            });
        }

        Ok(())
    }
}

/// TLS policy when the URL does not set `sslmode` itself: plain connections
/// to the local machine, encrypted (unverified) connections elsewhere.
pub fn default_ssl_mode(url: &str) -> Option<PgSslMode> {
    if url.contains("sslmode=") {
        return None;
    }
    match url_host(url) {
        Some(host) if is_local_host(host) => Some(PgSslMode::Disable),
        _ => Some(PgSslMode::Require),
    }
}

fn url_host(url: &str) -> Option<&str> {
    let rest = url.split_once("://")?.1;
    let authority = rest.split(['/', '?']).next().unwrap_or(rest);
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, h)| h);

    if let Some(bracketed) = host_port.strip_prefix('[') {
        return bracketed.split_once(']').map(|(h, _)| h);
    }
    host_port.split(':').next().filter(|h| !h.is_empty())
}

fn is_local_host(host: &str) -> bool {
    matches!(host, "localhost" | "127.0.0.1" | "::1")
}

impl Database for PostgresDatabase {
    type Options = PostgresOptions;
    type Entries = PgEntryStore;
    type Drivers = PgDriverRepository;

    async fn connect(options: &PostgresOptions) -> DbResult<Self> {
        let mut connect_options =
            PgConnectOptions::from_str(&options.url).map_err(|e| DbError::StorageUnavailable {
                message: format!("invalid DATABASE_URL: {}", e),
            })?;
        if let Some(mode) = default_ssl_mode(&options.url) {
            connect_options = connect_options.ssl_mode(mode);
        }

        let attempts = options.connect_retries.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match PgPoolOptions::new()
                .max_connections(options.max_connections)
                .acquire_timeout(ACQUIRE_TIMEOUT)
                .connect_with(connect_options.clone())
                .await
            {
                Ok(pool) => {
                    info!(attempt, "connected to postgres");
                    return Ok(Self { pool });
                }
                Err(e) => {
                    warn!(attempt, attempts, error = %e, "postgres connection failed");
                    last_error = e.to_string();
                    if attempt < attempts {
                        tokio::time::sleep(options.retry_delay * attempt).await;
                    }
                }
            }
        }

        Err(DbError::StorageUnavailable {
            message: format!(
                "cannot connect to postgres after {} attempt(s): {}",
                attempts, last_error
            ),
        })
    }

    async fn migrate(&self) -> DbResult<()> {
        sqlx::migrate!("data/sql/postgres")
            .run(&self.pool)
            .await
            .map_err(|e| DbError::Schema {
                message: e.to_string(),
            })?;
        self.verify_schema().await
    }

    fn entry_store(&self) -> PgEntryStore {
        PgEntryStore {
            pool: self.pool.clone(),
        }
    }

    fn drivers(&self) -> PgDriverRepository {
        PgDriverRepository {
            pool: self.pool.clone(),
        }
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_host_plain() {
        assert_eq!(
            url_host("postgres://user:pw@db.example.com:5432/ledger"),
            Some("db.example.com")
        );
    }

    #[test]
    fn test_url_host_without_credentials() {
        assert_eq!(url_host("postgresql://localhost/ledger"), Some("localhost"));
    }

    #[test]
    fn test_url_host_ipv6() {
        assert_eq!(url_host("postgres://u@[::1]:5432/ledger"), Some("::1"));
    }

    #[test]
    fn test_default_ssl_mode_local_disables_tls() {
        assert!(matches!(
            default_ssl_mode("postgres://u:p@127.0.0.1:5432/db"),
            Some(PgSslMode::Disable)
        ));
    }

    #[test]
    fn test_default_ssl_mode_remote_requires_tls() {
        assert!(matches!(
            default_ssl_mode("postgres://u:p@abc.supabase.co:5432/postgres"),
            Some(PgSslMode::Require)
        ));
    }

    #[test]
    fn test_default_ssl_mode_respects_url() {
        assert!(default_ssl_mode("postgres://u@remote/db?sslmode=verify-full").is_none());
    }
}
