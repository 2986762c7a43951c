use anyhow::Result;
use clap::Parser;
use tracing::info;

use stationery_app::app::AppContext;
use stationery_app::cli::Cli;
use stationery_app::config::Config;
use stationery_app::{commands, logging};

#[tokio::main]
async fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config_dir)?;

    logging::init_logging(&config.logging);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = ?config.storage.backend,
        "Starting stationery desk"
    );

    let ctx = AppContext::open(config).await?;
    commands::run(&ctx, cli.command, cli.json).await
}
