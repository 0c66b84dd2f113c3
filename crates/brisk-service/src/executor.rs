//! Applies a partial command to a target appliance and confirms the effect.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use brisk_core::{Error, Result, SharedClient};
use brisk_types::CommandMap;

use crate::cache::StatusCache;

/// Sends partial state updates to an appliance.
///
/// One outbound state-changing request per call; failures are not retried
/// here. The dispatch policy of the caller decides what happens next.
pub struct CommandExecutor {
    client: SharedClient,
    cache: Arc<Mutex<StatusCache>>,
    settle: Duration,
}

impl CommandExecutor {
    /// Create an executor. `settle` is the pause between submitting a
    /// command and trusting the confirmation poll.
    pub fn new(client: SharedClient, cache: Arc<Mutex<StatusCache>>, settle: Duration) -> Self {
        Self {
            client,
            cache,
            settle,
        }
    }

    /// Apply `command` to the appliance nicknamed `device`.
    ///
    /// If `device` is not the currently selected appliance, the selection
    /// is switched for the duration of the call and restored afterwards,
    /// so a scheduled action for another device never steals the focus the
    /// poller and status views read. The cache lock is held across the
    /// whole switch-update-confirm-restore span; no other task can observe
    /// the temporary selection.
    pub async fn apply(&self, device: &str, command: &CommandMap) -> Result<()> {
        if command.is_empty() {
            // The schedule file is externally editable, so revalidate here.
            return Err(Error::EmptyCommand);
        }

        let mut cache = self.cache.lock().await;

        let saved = (cache.selected() != device).then(|| (*cache).clone());
        if saved.is_some() {
            cache.select(device);
        }

        let result = self.apply_selected(&mut cache, command).await;

        if let Some(prior) = saved {
            *cache = prior;
        }
        result
    }

    /// Update the appliance the cache currently selects. Expects the cache
    /// lock to be held by the caller.
    async fn apply_selected(&self, cache: &mut StatusCache, command: &CommandMap) -> Result<()> {
        // Resolve the puid, refreshing when there is no snapshot yet (a
        // switched selection always lands here).
        if cache.appliance().is_err() {
            cache.refresh(self.client.as_ref()).await?;
        }
        let puid = cache.appliance()?.puid.clone();

        debug!("Updating {} with {:?}", puid, command);
        self.client.update_appliance(&puid, command).await?;

        // Give the device time to apply the change before re-reading it.
        tokio::time::sleep(self.settle).await;

        if let Err(err) = cache.refresh(self.client.as_ref()).await {
            warn!("Confirmation poll after updating {} failed: {}", puid, err);
        }
        Ok(())
    }
}
