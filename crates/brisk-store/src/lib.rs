//! Schedule persistence for deferred appliance commands.
//!
//! This crate stores the list of pending scheduled actions as a JSON array
//! on disk, so schedules survive daemon restarts and can be edited from a
//! separate process while the daemon is running.
//!
//! # Features
//!
//! - Whole-array load/save transactions (last writer wins)
//! - Append, replace, and remove by index
//! - Corrupt data recovers as an empty schedule
//! - In-memory backend for tests
//!
//! # Example
//!
//! ```no_run
//! use brisk_store::{JsonFileStore, ScheduleStore};
//!
//! # async fn example() -> brisk_store::Result<()> {
//! let store = JsonFileStore::open_default()?;
//! for (i, action) in store.load_or_empty().await?.iter().enumerate() {
//!     println!("{i}: {} at {}", action.device, action.run_at);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod memory;
mod store;

pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use store::{JsonFileStore, ScheduleStore};

/// Default schedule path following platform conventions.
///
/// - Linux: `~/.local/share/brisk/schedule.json`
/// - macOS: `~/Library/Application Support/brisk/schedule.json`
/// - Windows: `C:\Users\<user>\AppData\Local\brisk\schedule.json`
pub fn default_schedule_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("brisk")
        .join("schedule.json")
}
