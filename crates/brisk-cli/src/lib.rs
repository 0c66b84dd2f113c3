//! Command-line interface for the brisk appliance scheduler.
//!
//! The `brisk` binary drives the same client, cache, and schedule store
//! the daemon uses, as one-shot operations: read the status, send an
//! immediate control, or manage the queue of deferred commands the daemon
//! dispatches.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `status` | Show the selected appliance's current state |
//! | `power` | Toggle power, or set it with `power on` / `power off` |
//! | `temp` | Step the target temperature with `up`/`down`, or set it |
//! | `mode` | Select an operating mode (powers the unit on) |
//! | `fan` | Advance the fan speed one step |
//! | `swing` | Toggle the vertical or horizontal louver |
//! | `schedule add` | Queue a command to run after a delay |
//! | `schedule list` | Show the queue with remaining minutes |
//! | `schedule edit` | Replace a queued command in place |
//! | `schedule remove` | Drop a queued command |
//!
//! # Output Formats
//!
//! `status` and `schedule list` honor `--format text` (default) and
//! `--format json`; `--output` redirects either to a file.
//!
//! # Configuration
//!
//! The CLI reads the service configuration (`~/.config/brisk/config.toml`
//! or `--config`) for the appliance list, the default device, and the
//! schedule file path, so the daemon and the CLI always agree on where the
//! queue lives.
//!
//! # Environment Variables
//!
//! - `BRISK_DEVICE`: Default appliance nickname (overridden by `--device`)
//!
//! # Examples
//!
//! Turn the configured appliance on:
//! ```bash
//! brisk power on
//! ```
//!
//! Queue a 26 degree setpoint on AC2 in two hours:
//! ```bash
//! brisk --device AC2 schedule add --in 120 --temp 26
//! ```
//!
//! Inspect the queue as JSON:
//! ```bash
//! brisk schedule list --format json
//! ```

pub mod cli;
pub mod commands;
pub mod util;

// Re-export core dependencies for convenience
pub use brisk_core;
pub use brisk_types;
