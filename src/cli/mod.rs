//! Operator CLI working directly against the configured store.

mod commands;
pub mod error;
mod utils;


use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{BackendConfig, StorageConfig};
use crate::db::{Database, DriverId, PostgresDatabase, SqliteDatabase, Storage};
use commands::entries::MeasureArgs;
use error::CliResult;

#[derive(Parser)]
#[command(name = "ledger")]
#[command(author, version, about = "Driver ledger administration CLI", long_about = None)]
pub struct Cli {
    /// Embedded database file (default: LEDGER_DB_PATH env or .data/transport.sqlite)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Networked database URL (default: DATABASE_URL env)
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Use a volatile in-memory store when the database file cannot be opened
    #[arg(long, global = true)]
    pub memory_fallback: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Bulk import a CSV export (header row, 8 columns)
    Import {
        /// CSV file path
        path: PathBuf,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Load the sample dataset
    Seed,
    /// List drivers that have entries
    Drivers {
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// List entries
    Entries {
        /// Only entries of this driver
        #[arg(long)]
        driver: Option<String>,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Monthly totals across drivers
    Totals {
        /// Drivers to aggregate
        #[arg(required = true)]
        drivers: Vec<String>,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Insert or replace the entry for a driver and month
    Upsert {
        #[arg(long)]
        driver: String,
        /// Month (YYYY-MM or any date within it)
        #[arg(long)]
        month: String,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        frachty: String,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        paliwo: String,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        razem: String,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        wynagr: String,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        wynik_mc: String,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        wynik_narast: String,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Delete entries of a driver
    Delete {
        driver: String,
        /// Only this month
        #[arg(long)]
        month: Option<String>,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Driver registry administration
    Registry {
        #[command(subcommand)]
        command: RegistryCommands,
    },
}

#[derive(Subcommand)]
enum RegistryCommands {
    /// List registered drivers
    List {
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Register a driver
    Add { name: String },
    /// Rename a driver
    Rename { id: DriverId, name: String },
    /// Remove drivers by id
    Remove {
        #[arg(required = true)]
        ids: Vec<DriverId>,
    },
}

impl Cli {
    fn storage_config(&self) -> StorageConfig {
        StorageConfig::from_env()
            .with_database_url(self.database_url.clone())
            .with_db_path(self.db.clone())
            .with_memory_fallback(self.memory_fallback)
    }
}

pub async fn run() -> miette::Result<()> {
    crate::telemetry::init_tracing(crate::telemetry::CLI_FILTER);
    let cli = Cli::parse();

    let Some(command) = cli.command.as_ref() else {
        // Show help when no command provided
        let _ = Cli::parse_from(["ledger", "--help"]);
        return Ok(());
    };

    let output = match cli.storage_config().backend()? {
        BackendConfig::Sqlite(options) => {
            with_storage(Storage::<SqliteDatabase>::new(options), command).await?
        }
        BackendConfig::Postgres(options) => {
            with_storage(Storage::<PostgresDatabase>::new(options), command).await?
        }
    };

    println!("{}", output);
    Ok(())
}

async fn with_storage<D: Database>(storage: Storage<D>, command: &Commands) -> CliResult<String> {
    let result = execute(&storage, command).await;
    storage.close().await;
    result
}

async fn execute<D: Database>(storage: &Storage<D>, command: &Commands) -> CliResult<String> {
    match command {
        Commands::Import { path, format } => {
            commands::import::import_file(storage, path, format).await
        }
        Commands::Seed => commands::import::seed_sample(storage).await,
        Commands::Drivers { format } => commands::entries::list_drivers(storage, format).await,
        Commands::Entries { driver, format } => {
            commands::entries::list_entries(storage, driver.as_deref(), format).await
        }
        Commands::Totals { drivers, format } => {
            commands::entries::totals(storage, drivers, format).await
        }
        Commands::Upsert {
            driver,
            month,
            frachty,
            paliwo,
            razem,
            wynagr,
            wynik_mc,
            wynik_narast,
            format,
        } => {
            let measures = MeasureArgs {
                frachty: frachty.clone(),
                paliwo: paliwo.clone(),
                razem: razem.clone(),
                wynagr: wynagr.clone(),
                wynik_mc: wynik_mc.clone(),
                wynik_narast: wynik_narast.clone(),
            };
            commands::entries::upsert(storage, driver, month, &measures, format).await
        }
        Commands::Delete {
            driver,
            month,
            format,
        } => commands::entries::delete(storage, driver, month.as_deref(), format).await,
        Commands::Registry { command } => match command {
            RegistryCommands::List { format } => commands::registry::list(storage, format).await,
            RegistryCommands::Add { name } => commands::registry::add(storage, name).await,
            RegistryCommands::Rename { id, name } => {
                commands::registry::rename(storage, *id, name).await
            }
            RegistryCommands::Remove { ids } => commands::registry::remove(storage, ids).await,
        },
    }
}
