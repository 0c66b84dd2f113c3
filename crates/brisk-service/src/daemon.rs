//! Wiring for the long-running service.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use brisk_core::SharedClient;
use brisk_store::ScheduleStore;

use crate::cache::StatusCache;
use crate::config::Config;
use crate::executor::CommandExecutor;
use crate::poller::DevicePoller;
use crate::scheduler::Scheduler;

/// The poller and scheduler tasks plus their shared state.
pub struct Daemon {
    client: SharedClient,
    cache: Arc<Mutex<StatusCache>>,
    store: Arc<dyn ScheduleStore>,
    config: Config,
    stop_tx: watch::Sender<bool>,
    stop_rx: watch::Receiver<bool>,
}

impl Daemon {
    /// Create a daemon around an already logged-in client.
    pub fn new(client: SharedClient, store: Arc<dyn ScheduleStore>, config: Config) -> Self {
        let cache = Arc::new(Mutex::new(StatusCache::new(
            config.device.nickname.as_str(),
        )));
        let (stop_tx, stop_rx) = watch::channel(false);
        Self {
            client,
            cache,
            store,
            config,
            stop_tx,
            stop_rx,
        }
    }

    /// The status cache shared by the poller and the scheduler.
    pub fn cache(&self) -> Arc<Mutex<StatusCache>> {
        Arc::clone(&self.cache)
    }

    /// Spawn the poller and scheduler tasks and return their handles.
    pub fn start(&self) -> Vec<JoinHandle<()>> {
        let poller = DevicePoller::new(
            Arc::clone(&self.client),
            Arc::clone(&self.cache),
            Duration::from_secs(self.config.poller.interval_secs),
        );

        let executor = CommandExecutor::new(
            Arc::clone(&self.client),
            Arc::clone(&self.cache),
            Duration::from_millis(self.config.scheduler.settle_ms),
        );
        let scheduler = Scheduler::new(
            executor,
            Arc::clone(&self.store),
            self.config.scheduler.on_failure,
            Duration::from_secs(self.config.scheduler.tick_secs),
        );

        vec![
            tokio::spawn(poller.run(self.stop_rx.clone())),
            tokio::spawn(scheduler.run(self.stop_rx.clone())),
        ]
    }

    /// Signal both tasks to stop.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use time::OffsetDateTime;

    use brisk_core::{DeviceClient, SimClient};
    use brisk_store::MemoryStore;
    use brisk_types::{CommandMap, DisplayMap, ScheduledAction};

    #[tokio::test(start_paused = true)]
    async fn test_daemon_dispatches_due_actions_and_stops() {
        let sim = Arc::new(
            SimClient::builder()
                .air_conditioner("AC1")
                .air_conditioner("AC2")
                .build(),
        );
        sim.login().await.unwrap();

        let overdue = ScheduledAction::new(
            OffsetDateTime::now_utc() - time::Duration::seconds(1),
            "AC2",
            DisplayMap::from([("Power".to_string(), "ON".to_string())]),
            CommandMap::from([("t_power".to_string(), "1".to_string())]),
        );
        let store = Arc::new(MemoryStore::with_actions(vec![overdue]));

        let client: SharedClient = sim.clone();
        let daemon = Daemon::new(client, store.clone(), Config::default());
        let tasks = daemon.start();

        tokio::time::sleep(Duration::from_secs(3)).await;

        assert_eq!(sim.update_count().await, 1);
        assert!(store.load().await.unwrap().is_empty());
        assert_eq!(sim.appliance("AC2").await.unwrap().power_label(), "ON");

        // The poller kept the selected device fresh in the meantime.
        assert!(sim.list_count() >= 1);
        assert_eq!(daemon.cache().lock().await.selected(), "AC1");

        daemon.stop();
        for task in tasks {
            task.await.unwrap();
        }
    }
}
