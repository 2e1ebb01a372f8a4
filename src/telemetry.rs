//! Tracing subscriber setup shared by the binaries.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter for the HTTP server.
pub const SERVER_FILTER: &str = "driver_ledger=info,tower_http=info";
/// Default filter for the CLI, which keeps stdout for command output.
pub const CLI_FILTER: &str = "driver_ledger=warn";

/// Install a fmt subscriber writing to stderr. `RUST_LOG` wins over
/// `default_filter`. Calling this more than once is harmless.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
