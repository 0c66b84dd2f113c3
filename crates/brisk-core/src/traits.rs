//! Trait abstractions for vendor appliance access.
//!
//! This module provides the [`DeviceClient`] trait that abstracts over
//! the real vendor transport and the in-memory [`crate::SimClient`].

use async_trait::async_trait;

use brisk_types::{Appliance, CommandMap};

use crate::error::Result;

/// Trait abstracting the vendor's polling appliance API.
///
/// The vendor exposes no push channel: state is observed by re-listing
/// appliances, and commands are partial key/value updates. Implement this
/// trait for any transport that can provide those three operations.
///
/// # Example
///
/// ```ignore
/// use brisk_core::{DeviceClient, Result};
///
/// async fn print_names<C: DeviceClient>(client: &C) -> Result<()> {
///     for appliance in client.list_appliances().await? {
///         println!("{}", appliance.nickname);
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait DeviceClient: Send + Sync {
    /// Authenticate with the vendor service.
    ///
    /// Must be called before the other operations.
    async fn login(&self) -> Result<()>;

    /// Fetch every appliance on the account with its current raw status.
    ///
    /// The returned order is the vendor's and is stable within a session.
    async fn list_appliances(&self) -> Result<Vec<Appliance>>;

    /// Apply a partial key/value update to the appliance with `puid`.
    ///
    /// Keys not present in `command` are left untouched on the device.
    async fn update_appliance(&self, puid: &str, command: &CommandMap) -> Result<()>;
}
