use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;
use crate::db::DbError;
use crate::import::ImportError;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(driver_ledger::cli::output))]
    Output(#[from] serde_json::Error),

    #[error("Driver {id} not found")]
    #[diagnostic(
        code(driver_ledger::cli::driver_not_found),
        help("List registered drivers with: ledger registry list")
    )]
    DriverNotFound { id: i64 },
}

pub type CliResult<T> = Result<T, CliError>;
