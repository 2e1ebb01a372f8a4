//! Storage backend selection.
//!
//! Precedence for every setting: CLI flag > environment variable > default.
//!
//! | setting | flag | env |
//! |---|---|---|
//! | networked store | `--database-url` | `DATABASE_URL` |
//! | embedded store file | `--db` | `LEDGER_DB_PATH` |
//! | in-memory fallback | `--memory-fallback` | `LEDGER_MEMORY_FALLBACK` |
//! | pool size | | `LEDGER_PG_MAX_CONNECTIONS` |
//! | connect attempts | | `LEDGER_PG_CONNECT_RETRIES` |

use std::env;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;
use tracing::warn;

use crate::db::{PostgresOptions, SqliteOptions};

pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const DB_PATH_ENV: &str = "LEDGER_DB_PATH";
pub const MEMORY_FALLBACK_ENV: &str = "LEDGER_MEMORY_FALLBACK";
pub const PG_MAX_CONNECTIONS_ENV: &str = "LEDGER_PG_MAX_CONNECTIONS";
pub const PG_CONNECT_RETRIES_ENV: &str = "LEDGER_PG_CONNECT_RETRIES";

/// Embedded store location when nothing else is configured.
pub const DEFAULT_DB_PATH: &str = ".data/transport.sqlite";

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Unsupported database URL scheme: {scheme}")]
    #[diagnostic(
        code(driver_ledger::config::unsupported_url),
        help("Use postgres://, postgresql:// or sqlite:<path>")
    )]
    UnsupportedUrl { scheme: String },
}

/// Resolved backend with its connection options.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    Sqlite(SqliteOptions),
    Postgres(PostgresOptions),
}

/// Storage settings gathered from flags and environment.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub database_url: Option<String>,
    pub db_path: PathBuf,
    pub memory_fallback: bool,
    pub pg_max_connections: Option<u32>,
    pub pg_connect_retries: Option<u32>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            memory_fallback: false,
            pg_max_connections: None,
            pg_connect_retries: None,
        }
    }
}

impl StorageConfig {
    /// Defaults overridden by whatever the environment sets.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: env_string(DATABASE_URL_ENV),
            db_path: env_string(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            memory_fallback: env_string(MEMORY_FALLBACK_ENV)
                .is_some_and(|v| parse_flag(&v)),
            pg_max_connections: env_number(PG_MAX_CONNECTIONS_ENV),
            pg_connect_retries: env_number(PG_CONNECT_RETRIES_ENV),
        }
    }

    pub fn with_database_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.database_url = Some(url);
        }
        self
    }

    pub fn with_db_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.db_path = path;
        }
        self
    }

    /// A set flag turns fallback on; an unset flag leaves the env value.
    pub fn with_memory_fallback(mut self, enabled: bool) -> Self {
        self.memory_fallback |= enabled;
        self
    }

    /// Pick the backend: a postgres URL selects the networked store, a
    /// `sqlite:` URL or no URL at all selects the embedded one.
    pub fn backend(&self) -> Result<BackendConfig, ConfigError> {
        let Some(url) = self.database_url.as_deref() else {
            return Ok(BackendConfig::Sqlite(
                self.sqlite_options(self.db_path.clone()),
            ));
        };

        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            let mut options = PostgresOptions::new(url);
            if let Some(max) = self.pg_max_connections {
                options.max_connections = max;
            }
            if let Some(retries) = self.pg_connect_retries {
                options.connect_retries = retries;
            }
            return Ok(BackendConfig::Postgres(options));
        }

        if let Some(rest) = url.strip_prefix("sqlite:") {
            let path = rest.strip_prefix("//").unwrap_or(rest);
            if path == ":memory:" {
                return Ok(BackendConfig::Sqlite(SqliteOptions::in_memory()));
            }
            return Ok(BackendConfig::Sqlite(
                self.sqlite_options(PathBuf::from(path)),
            ));
        }

        Err(ConfigError::UnsupportedUrl {
            scheme: url.split(':').next().unwrap_or_default().to_string(),
        })
    }

    fn sqlite_options(&self, path: PathBuf) -> SqliteOptions {
        SqliteOptions::file(path).with_memory_fallback(self.memory_fallback)
    }
}

/// `1`, `true`, `yes` and `on` (any case) enable a flag.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_number(key: &str) -> Option<u32> {
    let raw = env_string(key)?;
    match raw.trim().parse() {
        Ok(n) => Some(n),
        Err(e) => {
            warn!(key, value = %raw, error = %e, "ignoring invalid number");
            None
        }
    }
}
