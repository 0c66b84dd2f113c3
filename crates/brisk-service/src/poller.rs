//! Background status poller.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use brisk_core::SharedClient;

use crate::cache::StatusCache;

/// Periodically refreshes the status cache for the selected appliance.
pub struct DevicePoller {
    client: SharedClient,
    cache: Arc<Mutex<StatusCache>>,
    interval: Duration,
}

impl DevicePoller {
    /// Create a poller refreshing `cache` every `interval`.
    pub fn new(client: SharedClient, cache: Arc<Mutex<StatusCache>>, interval: Duration) -> Self {
        Self {
            client,
            cache,
            interval,
        }
    }

    /// Poll until the stop signal flips to `true`.
    pub async fn run(self, mut stop: watch::Receiver<bool>) {
        {
            let cache = self.cache.lock().await;
            info!(
                "Starting poller for {} (interval: {:?})",
                cache.selected(),
                self.interval
            );
        }

        let mut ticker = interval(self.interval);
        let mut consecutive_failures = 0u32;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let mut cache = self.cache.lock().await;
                    match cache.refresh(self.client.as_ref()).await {
                        Ok(()) => {
                            consecutive_failures = 0;
                            debug!("Polled {}", cache.describe());
                        }
                        Err(e) => {
                            consecutive_failures += 1;
                            if consecutive_failures <= 3 {
                                warn!(
                                    "Failed to poll {}: {} (attempt {})",
                                    cache.selected(),
                                    e,
                                    consecutive_failures
                                );
                            } else if consecutive_failures == 4 {
                                error!(
                                    "Failed to poll {} after {} attempts, will continue trying silently",
                                    cache.selected(),
                                    consecutive_failures
                                );
                            }
                            // Keep trying - the device may come back online
                        }
                    }
                }
                _ = stop.changed() => {
                    if *stop.borrow() {
                        info!("Poller stopping");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brisk_core::{DeviceClient, SimClient};

    #[tokio::test(start_paused = true)]
    async fn test_poller_refreshes_on_interval_and_stops() {
        let sim = Arc::new(SimClient::builder().air_conditioner("AC1").build());
        sim.login().await.unwrap();

        let cache = Arc::new(Mutex::new(StatusCache::new("AC1")));
        let client: SharedClient = sim.clone();
        let poller = DevicePoller::new(client, Arc::clone(&cache), Duration::from_secs(5));

        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(poller.run(stop_rx));

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert!(sim.list_count() >= 2);
        assert!(cache.lock().await.appliance().is_ok());

        stop_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_survives_refresh_failures() {
        let sim = Arc::new(SimClient::builder().air_conditioner("AC1").build());
        sim.login().await.unwrap();
        sim.set_fail_network(true);

        let cache = Arc::new(Mutex::new(StatusCache::new("AC1")));
        let client: SharedClient = sim.clone();
        let poller = DevicePoller::new(client, Arc::clone(&cache), Duration::from_secs(5));

        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(poller.run(stop_rx));

        tokio::time::sleep(Duration::from_secs(30)).await;
        sim.set_fail_network(false);
        tokio::time::sleep(Duration::from_secs(6)).await;

        // Recovered after the outage.
        assert!(cache.lock().await.appliance().is_ok());

        stop_tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
