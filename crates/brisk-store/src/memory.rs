//! In-memory schedule storage for tests and ephemeral sessions.

use async_trait::async_trait;
use brisk_types::ScheduledAction;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::store::ScheduleStore;

/// A [`ScheduleStore`] holding the schedule in memory.
///
/// Nothing survives process exit. Useful in tests and for running the
/// scheduler without touching the filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    actions: Mutex<Vec<ScheduledAction>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with `actions`.
    pub fn with_actions(actions: Vec<ScheduledAction>) -> Self {
        Self {
            actions: Mutex::new(actions),
        }
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn load(&self) -> Result<Vec<ScheduledAction>> {
        Ok(self.actions.lock().await.clone())
    }

    async fn save(&self, actions: &[ScheduledAction]) -> Result<()> {
        *self.actions.lock().await = actions.to_vec();
        Ok(())
    }
}
