//! Brisk service - appliance poller and schedule dispatch daemon.
//!
//! Run with: `cargo run -p brisk-service`

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use brisk_core::{SharedClient, SimClient};
use brisk_service::{Config, Daemon};
use brisk_store::JsonFileStore;

/// Brisk service - appliance poller and schedule dispatch daemon.
#[derive(Parser, Debug)]
#[command(name = "brisk-service")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Schedule file path (overrides config).
    #[arg(short, long)]
    schedule: Option<PathBuf>,

    /// Appliance nickname to keep polled (overrides config).
    #[arg(short, long)]
    device: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("brisk_service=info".parse()?)
                .add_directive("brisk_store=info".parse()?),
        )
        .init();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default().unwrap_or_default(),
    };

    // Override config with CLI args
    if let Some(path) = args.schedule {
        config.storage.path = path;
    }
    if let Some(device) = args.device {
        config.device.nickname = device;
    }
    config.validate()?;

    // Bring up the simulated vendor account and log in
    let mut builder = SimClient::builder();
    for nickname in &config.device.appliances {
        builder = builder.air_conditioner(nickname);
    }
    let client: SharedClient = Arc::new(builder.build());

    info!("Logging in to the appliance service");
    client.login().await?;

    // Open the schedule store
    let store = Arc::new(JsonFileStore::open(&config.storage.path)?);

    // Run until interrupted
    let daemon = Daemon::new(client, store, config);
    let tasks = daemon.start();

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    daemon.stop();
    for task in tasks {
        let _ = task.await;
    }

    Ok(())
}
