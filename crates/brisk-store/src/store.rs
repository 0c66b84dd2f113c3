//! Durable schedule storage.
//!
//! The schedule is persisted as a single JSON array of [`ScheduledAction`]
//! entries. Readers always see the full array; writers always replace it.
//! That makes every mutation a load-modify-save transaction, which is what
//! lets several processes (the daemon and the CLI) share one file with
//! nothing fancier than last-writer-wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use brisk_types::ScheduledAction;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Backend-agnostic schedule storage.
///
/// Implementations provide whole-array [`load`](ScheduleStore::load) and
/// [`save`](ScheduleStore::save); the mutation helpers are built on top of
/// those so every backend gets the same transactional semantics.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Load the full schedule from the backing medium.
    ///
    /// A missing backing file is not an error; it loads as an empty
    /// schedule. Malformed data returns [`Error::Corrupt`].
    async fn load(&self) -> Result<Vec<ScheduledAction>>;

    /// Replace the persisted schedule with `actions`.
    async fn save(&self, actions: &[ScheduledAction]) -> Result<()>;

    /// Load the schedule, treating corrupt data as an empty schedule.
    ///
    /// Corruption is logged and swallowed so a damaged file never wedges
    /// the scheduler; the next save rewrites it wholesale. Other errors
    /// (IO, permissions) still propagate.
    async fn load_or_empty(&self) -> Result<Vec<ScheduledAction>> {
        match self.load().await {
            Ok(actions) => Ok(actions),
            Err(err) if err.is_corrupt() => {
                warn!("Schedule data is corrupt, treating as empty: {err}");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    /// Append `action` to the schedule and persist.
    async fn append(&self, action: ScheduledAction) -> Result<()> {
        let mut actions = self.load_or_empty().await?;
        actions.push(action);
        self.save(&actions).await
    }

    /// Replace the entry at `index` and persist.
    async fn replace_at(&self, index: usize, action: ScheduledAction) -> Result<()> {
        let mut actions = self.load_or_empty().await?;
        let len = actions.len();
        match actions.get_mut(index) {
            Some(slot) => *slot = action,
            None => return Err(Error::IndexOutOfRange { index, len }),
        }
        self.save(&actions).await
    }

    /// Remove the entry at `index`, persist, and return the removed entry.
    async fn remove_at(&self, index: usize) -> Result<ScheduledAction> {
        let mut actions = self.load_or_empty().await?;
        if index >= actions.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: actions.len(),
            });
        }
        let removed = actions.remove(index);
        self.save(&actions).await?;
        Ok(removed)
    }
}

/// Schedule storage backed by a JSON file on disk.
///
/// # Example
///
/// ```no_run
/// use brisk_store::{JsonFileStore, ScheduleStore};
///
/// # async fn example() -> brisk_store::Result<()> {
/// let store = JsonFileStore::open("schedule.json")?;
/// let actions = store.load_or_empty().await?;
/// println!("{} scheduled action(s)", actions.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Open a store at the given path, creating parent directories as
    /// needed. The file itself is created lazily on first save.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        info!("Using schedule file at {}", path.display());

        Ok(Self { path })
    }

    /// Open a store at the platform default location.
    ///
    /// See [`crate::default_schedule_path`] for the path used.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_schedule_path())
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ScheduleStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<ScheduledAction>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&contents)?)
    }

    async fn save(&self, actions: &[ScheduledAction]) -> Result<()> {
        let json = serde_json::to_string_pretty(actions)?;

        // Write-then-rename so a crash mid-write never leaves a truncated
        // schedule behind.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json.as_bytes()).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(
            "Saved {} scheduled action(s) to {}",
            actions.len(),
            self.path.display()
        );
        Ok(())
    }
}
