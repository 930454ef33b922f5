//! Parley CLI entry point.

use clap::Parser;
use parley_cli::{AppConfig, LineDriver, Runtime, USAGE, spawn_server};
use parley_harness::SimServer;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

/// Parley line client
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(about = "Line-oriented client for the Parley chat protocol")]
#[command(version)]
struct Args {
    /// Display name to join with once connected
    ///
    /// If not provided, use `/name` and `/join`.
    #[arg(short, long)]
    name: Option<String>,

    /// Chat endpoint shown in the status line
    #[arg(short, long)]
    server: Option<String>,

    /// Do not reflect reactions back to their sender
    #[arg(long)]
    no_reaction_echo: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = args.server.map_or_else(AppConfig::default, AppConfig::with_server);
    tracing::info!(server = %config.server_addr, "starting session");

    let server = spawn_server(SimServer::new().with_reaction_echo(!args.no_reaction_echo));
    let mut driver = LineDriver::new(
        BufReader::new(tokio::io::stdin()),
        std::io::stdout(),
        server,
        config.emoji_palette.clone(),
    );
    if let Some(name) = args.name {
        driver = driver.with_auto_join(name);
    }

    tracing::debug!("{USAGE}");
    Ok(Runtime::new(driver, config).run().await?)
}
