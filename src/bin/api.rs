//! Ledger API server binary.
//!
//! This binary resolves the concrete storage backend and passes it to the
//! API server. The API layer remains agnostic of the storage backend.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;
use driver_ledger::api::{self, ApiError, Config};
use driver_ledger::config::{BackendConfig, ConfigError, StorageConfig};
use driver_ledger::db::{PostgresDatabase, SqliteDatabase, Storage};
use driver_ledger::telemetry::{SERVER_FILTER, init_tracing};
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Api(#[from] ApiError),
}

#[derive(Parser)]
#[command(name = "ledger-api")]
#[command(author, version, about = "Driver ledger API server", long_about = None)]
struct Cli {
    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Embedded database file (default: LEDGER_DB_PATH env or .data/transport.sqlite)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Networked database URL (default: DATABASE_URL env)
    #[arg(long)]
    database_url: Option<String>,

    /// Serve from a volatile in-memory store when the database file cannot be opened
    #[arg(long)]
    memory_fallback: bool,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    init_tracing(SERVER_FILTER);
    let cli = Cli::parse();

    let server = Config {
        host: cli.host,
        port: cli.port,
    };
    let storage = StorageConfig::from_env()
        .with_database_url(cli.database_url)
        .with_db_path(cli.db)
        .with_memory_fallback(cli.memory_fallback);

    serve(server, storage).await?;
    Ok(())
}

async fn serve(server: Config, storage: StorageConfig) -> Result<(), BinaryError> {
    match storage.backend()? {
        BackendConfig::Sqlite(options) => {
            api::run(server, Storage::<SqliteDatabase>::new(options)).await?
        }
        BackendConfig::Postgres(options) => {
            api::run(server, Storage::<PostgresDatabase>::new(options)).await?
        }
    }
    Ok(())
}
