use clap::Parser;
use hurdat_processor::cli::{run, Cli};
use hurdat_processor::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
