//! Background poller and schedule dispatch daemon for brisk appliances.
//!
//! This crate provides the long-running half of brisk:
//! - Polls the selected appliance on a schedule and keeps a status cache
//! - Reloads the persisted schedule every tick and dispatches due actions
//! - Confirms every command with a follow-up poll after a settle delay
//! - Restores the device selection after dispatching to another appliance
//!
//! # Configuration
//!
//! The daemon reads configuration from `~/.config/brisk/config.toml`:
//!
//! ```toml
//! [device]
//! nickname = "AC1"
//! appliances = ["AC1", "AC2"]
//!
//! [poller]
//! interval_secs = 5
//!
//! [scheduler]
//! tick_secs = 1
//! settle_ms = 100
//! on_failure = "drop"   # or "retry"
//!
//! [storage]
//! path = "~/.local/share/brisk/schedule.json"
//! ```
//!
//! # Delivery semantics
//!
//! With the default `on_failure = "drop"` policy a due action is removed
//! from the store whether or not its device update succeeded: at-most-once
//! delivery. Switching to `"retry"` keeps failed actions queued, trading
//! that for possible repeated attempts against a device that is gone.

pub mod cache;
pub mod config;
pub mod daemon;
pub mod executor;
pub mod poller;
pub mod scheduler;

pub use cache::StatusCache;
pub use config::{
    Config, ConfigError, DeviceConfig, PollerConfig, SchedulerConfig, StorageConfig,
    ValidationError, default_config_path,
};
pub use daemon::Daemon;
pub use executor::CommandExecutor;
pub use poller::DevicePoller;
pub use scheduler::{DispatchPolicy, Scheduler};
