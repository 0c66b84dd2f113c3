//! Device client abstractions for Brisk climate appliance control.
//!
//! This crate provides the seam between the rest of the workspace and the
//! vendor's polling appliance API:
//!
//! - **[`DeviceClient`]**: the async trait every transport implements
//!   (login, list appliances, apply a partial update)
//! - **Error taxonomy**: auth, network, rejection and not-found failures
//!   with structured reasons
//! - **Command builders**: immediate controls (power toggle, temperature
//!   step, mode set, fan cycle, swing toggles) derived from cached status
//! - **[`SessionDefaults`]**: the defaulting engine that fills omitted
//!   scheduling fields from the values remembered this session
//! - **[`SimClient`]**: an in-memory client for tests and offline runs
//!
//! The real vendor transport is deliberately not part of this crate; it
//! implements [`DeviceClient`] elsewhere and plugs in unchanged.
//!
//! # Quick Start
//!
//! ```
//! use brisk_core::{DeviceClient, SimClient, commands};
//!
//! #[tokio::main]
//! async fn main() -> brisk_core::Result<()> {
//!     let client = SimClient::builder().air_conditioner("AC1").build();
//!     client.login().await?;
//!
//!     let units = client.list_appliances().await?;
//!     let command = commands::power_toggle(units[0].power());
//!     client.update_appliance(&units[0].puid, &command).await?;
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod error;
pub mod sim;
pub mod traits;

pub use commands::{
    DEFAULT_TARGET_TEMP, MAX_TARGET_TEMP, MIN_TARGET_TEMP, ScheduleFan, ScheduleRequest,
    SessionDefaults,
};
pub use error::{DeviceNotFoundReason, Error, Result};
pub use sim::{SimClient, SimClientBuilder};
pub use traits::DeviceClient;

/// Type alias for a shared client reference.
///
/// The client is consumed through a trait object so the poller, executor
/// and CLI can share one transport; cloning the `Arc` is the standard
/// pattern for handing it to a task.
pub type SharedClient = std::sync::Arc<dyn DeviceClient>;
