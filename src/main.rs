use clap::Parser;
use tracing_subscriber::EnvFilter;

use coffee_shop_api::cli::{self, Cli};
use coffee_shop_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, AUTH0_DOMAIN, etc. are picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = AppConfig::from_env();
    tracing::info!("Starting drinks API in {:?} mode", config.environment);

    cli::run(cli, config).await
}
