use anyhow::Context;
use casino_church_simulator::{Api, Config, Simulator};
use clap::Parser;
use std::{path::PathBuf, sync::Arc};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides the configured port.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse args
    let args = Args::parse();

    // Load config
    let mut config = match &args.config {
        Some(path) => Config::load(path).context("failed to load config")?,
        None => Config::default(),
    };
    if let Some(port) = args.port {
        config.port = port;
    }
    let config = config.validate().context("invalid config")?;

    // Create logger
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    let simulator =
        Arc::new(Simulator::from_config(&config).context("failed to open progress storage")?);
    let api = Api::new(simulator);
    let app = api.router();

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(
        seed = config.seed,
        directory = ?config.directory,
        "Listening on {}",
        addr
    );
    axum::serve(listener, app)
        .await
        .context("axum server error")?;

    Ok(())
}
