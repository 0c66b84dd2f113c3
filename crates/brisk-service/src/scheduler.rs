//! Periodic dispatch of due scheduled actions.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::watch;
use tokio::time::interval;
use tracing::{error, info, warn};

use brisk_store::ScheduleStore;

use crate::executor::CommandExecutor;

/// What the scheduler does with an action whose dispatch failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchPolicy {
    /// Remove the action whether or not the update succeeded. Delivery is
    /// at-most-once; a failed command is logged and lost.
    #[default]
    Drop,
    /// Keep a failed action in the store so the next tick tries it again.
    /// A permanently failing action is retried every tick until it is
    /// removed by hand.
    Retry,
}

/// Checks the schedule on a fixed period and dispatches due actions.
///
/// Every tick reloads the store before evaluating, so entries added or
/// removed by another process are honored. Due actions are dispatched in
/// store order, each running to completion (including its confirmation
/// poll) before the next begins, and the store is saved once at the end
/// of any tick that changed it.
pub struct Scheduler {
    executor: CommandExecutor,
    store: Arc<dyn ScheduleStore>,
    policy: DispatchPolicy,
    period: Duration,
}

impl Scheduler {
    /// Create a scheduler dispatching through `executor`.
    pub fn new(
        executor: CommandExecutor,
        store: Arc<dyn ScheduleStore>,
        policy: DispatchPolicy,
        period: Duration,
    ) -> Self {
        Self {
            executor,
            store,
            policy,
            period,
        }
    }

    /// Run one due-action check. Returns the number of actions dispatched.
    ///
    /// An action is due when its `run_at` is at or before the time the
    /// tick started; dueness is decided once per tick, so an action coming
    /// due mid-tick waits for the next one. Corrupt store data is treated
    /// as an empty schedule. A dispatch failure never fails the tick; the
    /// [`DispatchPolicy`] decides whether the action is kept.
    pub async fn tick(&self) -> brisk_store::Result<usize> {
        let mut actions = self.store.load_or_empty().await?;
        let now = OffsetDateTime::now_utc();

        let mut index = 0;
        let mut dispatched = 0;
        let mut dirty = false;

        while index < actions.len() {
            if !actions[index].is_due(now) {
                index += 1;
                continue;
            }

            let device = actions[index].device.clone();
            let command = actions[index].command.clone();
            info!(
                "Dispatching scheduled action for {}: {}",
                device,
                actions[index].summary()
            );
            dispatched += 1;

            match self.executor.apply(&device, &command).await {
                Ok(()) => {
                    info!("Scheduled action for {} completed", device);
                    actions.remove(index);
                    dirty = true;
                }
                Err(err) if self.policy == DispatchPolicy::Retry => {
                    warn!(
                        "Scheduled action for {} failed, keeping for retry: {}",
                        device, err
                    );
                    index += 1;
                }
                Err(err) => {
                    warn!(
                        "Scheduled action for {} failed, dropping: {}",
                        device, err
                    );
                    actions.remove(index);
                    dirty = true;
                }
            }
        }

        if dirty {
            self.store.save(&actions).await?;
        }
        Ok(dispatched)
    }

    /// Tick until the stop signal flips to `true`.
    pub async fn run(self, mut stop: watch::Receiver<bool>) {
        info!(
            "Starting scheduler (tick: {:?}, on failure: {:?})",
            self.period, self.policy
        );

        let mut ticker = interval(self.period);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // A tick runs to completion before the next is awaited,
                    // so ticks never overlap.
                    if let Err(err) = self.tick().await {
                        error!("Scheduler tick failed: {err}");
                    }
                }
                _ = stop.changed() => {
                    if *stop.borrow() {
                        info!("Scheduler stopping");
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
    use std::sync::Arc;

    use tokio::sync::Mutex;

    use brisk_core::{DeviceClient, SharedClient, SimClient};
    use brisk_store::{JsonFileStore, MemoryStore};
    use brisk_types::{CommandMap, DisplayMap, ScheduledAction};

    use crate::cache::StatusCache;

    fn action_at(run_at: OffsetDateTime, device: &str, key: &str, value: &str) -> ScheduledAction {
        let command = CommandMap::from([(key.to_string(), value.to_string())]);
        ScheduledAction::new(run_at, device, DisplayMap::new(), command)
    }

    fn due(device: &str, key: &str, value: &str) -> ScheduledAction {
        action_at(
            OffsetDateTime::now_utc() - time::Duration::seconds(1),
            device,
            key,
            value,
        )
    }

    fn future(device: &str) -> ScheduledAction {
        action_at(
            OffsetDateTime::now_utc() + time::Duration::hours(1),
            device,
            "t_power",
            "1",
        )
    }

    async fn harness(
        store: Arc<dyn ScheduleStore>,
        policy: DispatchPolicy,
    ) -> (Arc<SimClient>, Scheduler) {
        let sim = Arc::new(
            SimClient::builder()
                .air_conditioner("AC1")
                .air_conditioner("AC2")
                .build(),
        );
        sim.login().await.unwrap();

        let cache = Arc::new(Mutex::new(StatusCache::new("AC1")));
        let client: SharedClient = sim.clone();
        let executor =
            CommandExecutor::new(client, cache, Duration::from_millis(1));
        let scheduler = Scheduler::new(executor, store, policy, Duration::from_secs(1));
        (sim, scheduler)
    }

    // --- Dispatch tests ---

    #[tokio::test]
    async fn test_due_action_dispatched_exactly_once_and_removed() {
        let store: Arc<dyn ScheduleStore> =
            Arc::new(MemoryStore::with_actions(vec![due("AC1", "t_power", "1")]));
        let (sim, scheduler) = harness(Arc::clone(&store), DispatchPolicy::Drop).await;
        let puid = sim.appliance("AC1").await.unwrap().puid;

        assert_eq!(scheduler.tick().await.unwrap(), 1);

        let calls = sim.update_calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, puid);
        assert_eq!(calls[0].1, CommandMap::from([("t_power".to_string(), "1".to_string())]));
        assert!(store.load().await.unwrap().is_empty());

        // A second tick has nothing left to do.
        assert_eq!(scheduler.tick().await.unwrap(), 0);
        assert_eq!(sim.update_count().await, 1);
    }

    #[tokio::test]
    async fn test_future_action_is_left_alone() {
        let store: Arc<dyn ScheduleStore> =
            Arc::new(MemoryStore::with_actions(vec![future("AC1")]));
        let (sim, scheduler) = harness(Arc::clone(&store), DispatchPolicy::Drop).await;

        assert_eq!(scheduler.tick().await.unwrap(), 0);
        assert_eq!(sim.update_count().await, 0);
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mixed_schedule_dispatches_only_due() {
        let store: Arc<dyn ScheduleStore> = Arc::new(MemoryStore::with_actions(vec![
            future("AC1"),
            due("AC1", "t_temp", "22"),
        ]));
        let (sim, scheduler) = harness(Arc::clone(&store), DispatchPolicy::Drop).await;

        assert_eq!(scheduler.tick().await.unwrap(), 1);
        assert_eq!(sim.update_count().await, 1);

        let remaining = store.load().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(remaining[0].run_at > OffsetDateTime::now_utc());
    }

    #[tokio::test]
    async fn test_due_actions_run_in_store_order() {
        let now = OffsetDateTime::now_utc();
        // The later run_at sits first in the store; store order still wins.
        let store: Arc<dyn ScheduleStore> = Arc::new(MemoryStore::with_actions(vec![
            action_at(now - time::Duration::seconds(1), "AC2", "t_power", "1"),
            action_at(now - time::Duration::seconds(30), "AC1", "t_power", "1"),
        ]));
        let (sim, scheduler) = harness(Arc::clone(&store), DispatchPolicy::Drop).await;
        let ac1 = sim.appliance("AC1").await.unwrap().puid;
        let ac2 = sim.appliance("AC2").await.unwrap().puid;

        assert_eq!(scheduler.tick().await.unwrap(), 2);

        let calls = sim.update_calls().await;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, ac2);
        assert_eq!(calls[1].0, ac1);
        assert!(store.load().await.unwrap().is_empty());
    }

    // --- Failure policy tests ---

    #[tokio::test]
    async fn test_failed_dispatch_removed_under_drop() {
        let store: Arc<dyn ScheduleStore> =
            Arc::new(MemoryStore::with_actions(vec![due("AC1", "t_power", "1")]));
        let (sim, scheduler) = harness(Arc::clone(&store), DispatchPolicy::Drop).await;
        sim.set_reject_updates(true);

        assert_eq!(scheduler.tick().await.unwrap(), 1);

        // The attempt was made, and the action is gone regardless.
        assert_eq!(sim.update_count().await, 1);
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_device_removed_under_drop() {
        let store: Arc<dyn ScheduleStore> =
            Arc::new(MemoryStore::with_actions(vec![due("AC9", "t_power", "1")]));
        let (sim, scheduler) = harness(Arc::clone(&store), DispatchPolicy::Drop).await;

        assert_eq!(scheduler.tick().await.unwrap(), 1);
        assert_eq!(sim.update_count().await, 0);
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_dispatch_kept_under_retry() {
        let store: Arc<dyn ScheduleStore> =
            Arc::new(MemoryStore::with_actions(vec![due("AC1", "t_power", "1")]));
        let (sim, scheduler) = harness(Arc::clone(&store), DispatchPolicy::Retry).await;
        sim.set_reject_updates(true);

        assert_eq!(scheduler.tick().await.unwrap(), 1);
        assert_eq!(store.load().await.unwrap().len(), 1);

        // Once the device accepts updates again, the retry drains the store.
        sim.set_reject_updates(false);
        assert_eq!(scheduler.tick().await.unwrap(), 1);
        assert_eq!(sim.update_count().await, 2);
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_retry_failure_does_not_block_later_actions() {
        let store: Arc<dyn ScheduleStore> = Arc::new(MemoryStore::with_actions(vec![
            due("AC9", "t_power", "1"),
            due("AC1", "t_temp", "22"),
        ]));
        let (sim, scheduler) = harness(Arc::clone(&store), DispatchPolicy::Retry).await;

        assert_eq!(scheduler.tick().await.unwrap(), 2);

        // AC1 was still dispatched; the unknown device stays queued.
        assert_eq!(sim.update_count().await, 1);
        let remaining = store.load().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].device, "AC9");
    }

    // --- Store interaction tests ---

    #[tokio::test]
    async fn test_tick_reloads_store_every_time() {
        let store: Arc<dyn ScheduleStore> = Arc::new(MemoryStore::new());
        let (sim, scheduler) = harness(Arc::clone(&store), DispatchPolicy::Drop).await;

        assert_eq!(scheduler.tick().await.unwrap(), 0);

        // An entry appended behind the scheduler's back is picked up.
        store.append(due("AC1", "t_power", "1")).await.unwrap();
        assert_eq!(scheduler.tick().await.unwrap(), 1);
        assert_eq!(sim.update_count().await, 1);
    }

    #[tokio::test]
    async fn test_corrupt_store_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.json");
        std::fs::write(&path, "{broken").unwrap();

        let store: Arc<dyn ScheduleStore> = Arc::new(JsonFileStore::open(&path).unwrap());
        let (sim, scheduler) = harness(Arc::clone(&store), DispatchPolicy::Drop).await;

        assert_eq!(scheduler.tick().await.unwrap(), 0);
        assert_eq!(sim.update_count().await, 0);
    }

    #[tokio::test]
    async fn test_file_store_round_trip_through_tick() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.json");

        let writer = JsonFileStore::open(&path).unwrap();
        writer.append(due("AC1", "t_power", "1")).await.unwrap();
        writer.append(future("AC2")).await.unwrap();

        let store: Arc<dyn ScheduleStore> = Arc::new(JsonFileStore::open(&path).unwrap());
        let (sim, scheduler) = harness(Arc::clone(&store), DispatchPolicy::Drop).await;

        assert_eq!(scheduler.tick().await.unwrap(), 1);
        assert_eq!(sim.update_count().await, 1);

        // The not-yet-due entry survived the save at the end of the tick.
        let remaining = writer.load().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].device, "AC2");
    }
}
