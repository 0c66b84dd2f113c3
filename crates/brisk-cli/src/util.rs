//! Shared plumbing for CLI commands.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::Mutex;

use brisk_core::{SharedClient, SimClient};
use brisk_service::{CommandExecutor, Config, StatusCache};
use brisk_store::JsonFileStore;
use brisk_types::{Appliance, CommandMap};

/// Load the configuration. An explicit path must parse; with no path the
/// default file is used, falling back to built-in defaults when absent.
pub fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load_default().unwrap_or_default(),
    };
    config.validate()?;
    Ok(config)
}

/// Resolve the appliance nickname: the CLI flag wins over the configured
/// default.
pub fn resolve_device(flag: Option<String>, config: &Config) -> String {
    flag.unwrap_or_else(|| config.device.nickname.clone())
}

/// Open the schedule store named by the configuration.
pub fn open_store(config: &Config) -> Result<JsonFileStore> {
    JsonFileStore::open(&config.storage.path).with_context(|| {
        format!(
            "Failed to open schedule file {}",
            config.storage.path.display()
        )
    })
}

/// A logged-in client plus the cache and executor, wired the same way the
/// daemon wires them, for one-shot commands.
pub struct Session {
    client: SharedClient,
    cache: Arc<Mutex<StatusCache>>,
    executor: CommandExecutor,
    device: String,
}

impl Session {
    /// Build the client from the configured appliances and log in.
    pub async fn open(config: &Config, device: String) -> Result<Self> {
        let mut builder = SimClient::builder();
        for nickname in &config.device.appliances {
            builder = builder.air_conditioner(nickname);
        }
        let client: SharedClient = Arc::new(builder.build());
        client
            .login()
            .await
            .context("Failed to log in to the appliance service")?;

        let cache = Arc::new(Mutex::new(StatusCache::new(device.as_str())));
        let executor = CommandExecutor::new(
            Arc::clone(&client),
            Arc::clone(&cache),
            Duration::from_millis(config.scheduler.settle_ms),
        );

        Ok(Self {
            client,
            cache,
            executor,
            device,
        })
    }

    /// Nickname of the target appliance.
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Fetch a fresh snapshot of the target appliance.
    pub async fn refresh(&self) -> Result<Appliance> {
        let mut cache = self.cache.lock().await;
        cache
            .refresh(self.client.as_ref())
            .await
            .with_context(|| format!("Failed to read status for {}", self.device))?;
        Ok(cache.appliance()?.clone())
    }

    /// Send a partial update to the target appliance and wait for the
    /// confirmation poll.
    pub async fn apply(&self, command: &CommandMap) -> Result<()> {
        self.executor
            .apply(&self.device, command)
            .await
            .with_context(|| format!("Failed to update {}", self.device))?;
        Ok(())
    }
}

/// Write output to file or stdout
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}
