//! Pagewatch entry point.

use clap::Parser;
use pagewatch_cli::app;
use pagewatch_cli::cli::Cli;
use pagewatch_core::config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Secrets from the config directory first, then the working directory
    let env_path = config::env_file();
    if env_path.exists() {
        let _ = dotenvy::from_path(&env_path);
    }
    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!("running with debug logging");

    app::run(cli).await?;
    Ok(())
}
