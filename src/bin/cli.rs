use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    driver_ledger::cli::run().await
}
