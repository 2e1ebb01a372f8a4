//! SQLite database connection and migration management.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::{debug, warn};

use super::{SqliteDriverRepository, SqliteEntryStore};
use crate::db::{Database, DbError, DbResult};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the embedded store lives.
#[derive(Debug, Clone, Default)]
pub struct SqliteOptions {
    /// Database file. `None` opens a volatile in-memory database.
    pub path: Option<PathBuf>,
    /// Fall back to an in-memory database when the file cannot be opened.
    pub memory_fallback: bool,
    pub max_connections: Option<u32>,
}

impl SqliteOptions {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn with_memory_fallback(mut self, enabled: bool) -> Self {
        self.memory_fallback = enabled;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Location {
    File(PathBuf),
    Memory,
    /// In-memory stand-in for a file that could not be opened.
    Fallback { requested: PathBuf },
}

/// SQLite database implementation.
pub struct SqliteDatabase {
    pool: SqlitePool,
    location: Location,
}

impl SqliteDatabase {
    /// Open (creating if needed) a database file.
    pub async fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        Self::open_file(path.as_ref(), DEFAULT_MAX_CONNECTIONS).await
    }

    /// Create an in-memory database (useful for testing).
    pub async fn in_memory() -> DbResult<Self> {
        Ok(Self {
            pool: memory_pool().await?,
            location: Location::Memory,
        })
    }

    /// Underlying pool, for tests and ad hoc queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// File backing this database, if any.
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            Location::File(path) => Some(path),
            _ => None,
        }
    }

    /// File this database was asked to open, including a failed one that
    /// triggered the in-memory fallback.
    pub fn requested_path(&self) -> Option<&Path> {
        match &self.location {
            Location::File(path) | Location::Fallback { requested: path } => Some(path),
            Location::Memory => None,
        }
    }

    async fn open_file(path: &Path, max_connections: u32) -> DbResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| DbError::StorageUnavailable {
                message: format!("cannot create {}: {}", parent.display(), e),
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| DbError::StorageUnavailable {
                message: format!("cannot open {}: {}", path.display(), e),
            })?;

        debug!(path = %path.display(), "opened sqlite database");
        Ok(Self {
            pool,
            location: Location::File(path.to_path_buf()),
        })
    }

    async fn verify_schema(&self) -> DbResult<()> {
        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('entries', 'drivers')",
        )
        .fetch_one(&self.pool)
        .await?;
        if tables != 2 {
            return Err(DbError::Schema {
                message: "expected tables 'entries' and 'drivers'".to_string(),
            });
        }

        let unique: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master \
             WHERE type = 'index' AND tbl_name = 'entries' AND name = 'ux_entries_driver_month'",
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

/// A single long-lived connection: every new connection to `:memory:` would
/// be a separate, empty database.
async fn memory_pool() -> DbResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .map_err(|e| DbError::StorageUnavailable {
            message: format!("cannot open in-memory database: {}", e),
        })?;
    Ok(pool)
}

impl Database for SqliteDatabase {
    type Options = SqliteOptions;
    type Entries = SqliteEntryStore;
    type Drivers = SqliteDriverRepository;

    async fn connect(options: &SqliteOptions) -> DbResult<Self> {
        let Some(path) = &options.path else {
            return Self::in_memory().await;
        };
        let max_connections = options.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS);

        match Self::open_file(path, max_connections).await {
            Ok(db) => Ok(db),
            Err(e) if options.memory_fallback => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "cannot open database file, falling back to volatile in-memory storage"
                );
                Ok(Self {
                    pool: memory_pool().await?,
                    location: Location::Fallback {
                        requested: path.clone(),
                    },
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn migrate(&self) -> DbResult<()> {
        sqlx::migrate!("data/sql/sqlite")
            .run(&self.pool)
            .await
            .map_err(|e| DbError::Schema {
                message: e.to_string(),
            })?;
        self.verify_schema().await
    }

    fn entry_store(&self) -> SqliteEntryStore {
        SqliteEntryStore {
            pool: self.pool.clone(),
        }
    }

    fn drivers(&self) -> SqliteDriverRepository {
        SqliteDriverRepository {
            pool: self.pool.clone(),
        }
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }

    fn is_degraded(&self) -> bool {
        matches!(self.location, Location::Fallback { .. })
    }
}
