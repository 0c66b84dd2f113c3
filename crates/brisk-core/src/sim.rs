//! Simulated device client for testing and offline operation.
//!
//! This module provides an in-memory client that can be used for unit
//! testing and for running the binaries without vendor credentials.
//!
//! The [`SimClient`] implements the [`DeviceClient`] trait, allowing it to
//! be used interchangeably with a real transport in generic code.
//!
//! # Features
//!
//! - **Failure injection**: fail login, fail the network persistently or
//!   for the next N operations, or reject updates
//! - **Latency simulation**: add artificial delays to vendor round-trips
//! - **Call recording**: every `update_appliance` call is logged for
//!   dispatch assertions

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use brisk_types::{Appliance, ApplianceKind, CommandMap, StatusValue, keys};

use crate::error::{Error, Result};
use crate::traits::DeviceClient;

/// An in-memory vendor client for testing and offline runs.
///
/// Partial updates are applied to the client's own appliance table, so a
/// confirmatory poll observes the effect of a command the way it does
/// against the real service.
///
/// # Example
///
/// ```
/// use brisk_core::{DeviceClient, SimClient};
///
/// #[tokio::main]
/// async fn main() {
///     let client = SimClient::builder().air_conditioner("AC1").build();
///     client.login().await.unwrap();
///
///     let units = client.list_appliances().await.unwrap();
///     assert_eq!(units[0].nickname, "AC1");
/// }
/// ```
pub struct SimClient {
    appliances: RwLock<Vec<Appliance>>,
    /// Every `update_appliance` call, including failed ones.
    update_calls: RwLock<Vec<(String, CommandMap)>>,
    logged_in: AtomicBool,
    login_count: AtomicU32,
    list_count: AtomicU32,
    fail_login: AtomicBool,
    fail_network: AtomicBool,
    reject_updates: AtomicBool,
    /// Number of operations to fail before succeeding again.
    remaining_network_failures: AtomicU32,
    /// Simulated round-trip latency in milliseconds (0 = no delay).
    latency_ms: AtomicU64,
}

impl std::fmt::Debug for SimClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimClient")
            .field("logged_in", &self.logged_in.load(Ordering::Relaxed))
            .field("list_count", &self.list_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl SimClient {
    /// Create an empty client with no appliances.
    pub fn new() -> Self {
        Self::with_appliances(Vec::new())
    }

    /// Create a client seeded with the given appliances.
    pub fn with_appliances(appliances: Vec<Appliance>) -> Self {
        Self {
            appliances: RwLock::new(appliances),
            update_calls: RwLock::new(Vec::new()),
            logged_in: AtomicBool::new(false),
            login_count: AtomicU32::new(0),
            list_count: AtomicU32::new(0),
            fail_login: AtomicBool::new(false),
            fail_network: AtomicBool::new(false),
            reject_updates: AtomicBool::new(false),
            remaining_network_failures: AtomicU32::new(0),
            latency_ms: AtomicU64::new(0),
        }
    }

    /// Start building a client with seeded appliances and settings.
    pub fn builder() -> SimClientBuilder {
        SimClientBuilder::new()
    }

    async fn simulate_latency(&self) {
        let latency = self.latency_ms.load(Ordering::Relaxed);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
    }

    fn check_network(&self) -> Result<()> {
        // Transient failures drain first, then the persistent flag applies.
        if self.remaining_network_failures.load(Ordering::Relaxed) > 0 {
            self.remaining_network_failures.fetch_sub(1, Ordering::Relaxed);
            return Err(Error::network("connection reset"));
        }
        if self.fail_network.load(Ordering::Relaxed) {
            return Err(Error::network("vendor service unreachable"));
        }
        Ok(())
    }

    fn check_logged_in(&self) -> Result<()> {
        if self.logged_in.load(Ordering::Relaxed) {
            Ok(())
        } else {
            Err(Error::auth("not logged in"))
        }
    }

    // --- Test control methods ---

    /// Make login fail until cleared.
    pub fn set_fail_login(&self, fail: bool) {
        self.fail_login.store(fail, Ordering::Relaxed);
    }

    /// Make list and update fail with a network error until cleared.
    pub fn set_fail_network(&self, fail: bool) {
        self.fail_network.store(fail, Ordering::Relaxed);
    }

    /// Fail the next `count` list/update operations, then succeed.
    pub fn set_transient_network_failures(&self, count: u32) {
        self.remaining_network_failures.store(count, Ordering::Relaxed);
    }

    /// Make every update come back as rejected by the device.
    pub fn set_reject_updates(&self, reject: bool) {
        self.reject_updates.store(reject, Ordering::Relaxed);
    }

    /// Set the simulated round-trip latency.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// Overwrite one raw status field on the named appliance.
    pub async fn set_status(&self, nickname: &str, key: &str, value: impl Into<StatusValue>) {
        let mut appliances = self.appliances.write().await;
        if let Some(unit) = appliances.iter_mut().find(|a| a.nickname == nickname) {
            unit.status.insert(key.to_string(), value.into());
        }
    }

    /// Snapshot of the named appliance, if present.
    pub async fn appliance(&self, nickname: &str) -> Option<Appliance> {
        self.appliances
            .read()
            .await
            .iter()
            .find(|a| a.nickname == nickname)
            .cloned()
    }

    /// Every `update_appliance` call so far, in order, including failures.
    pub async fn update_calls(&self) -> Vec<(String, CommandMap)> {
        self.update_calls.read().await.clone()
    }

    /// Number of `update_appliance` calls so far.
    pub async fn update_count(&self) -> usize {
        self.update_calls.read().await.len()
    }

    /// Number of `list_appliances` calls so far.
    pub fn list_count(&self) -> u32 {
        self.list_count.load(Ordering::Relaxed)
    }

    /// Number of `login` calls so far.
    pub fn login_count(&self) -> u32 {
        self.login_count.load(Ordering::Relaxed)
    }
}

impl Default for SimClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceClient for SimClient {
    async fn login(&self) -> Result<()> {
        self.simulate_latency().await;
        self.login_count.fetch_add(1, Ordering::Relaxed);

        if self.fail_login.load(Ordering::Relaxed) {
            return Err(Error::auth("invalid credentials"));
        }
        self.logged_in.store(true, Ordering::Relaxed);
        Ok(())
    }

    async fn list_appliances(&self) -> Result<Vec<Appliance>> {
        self.simulate_latency().await;
        self.list_count.fetch_add(1, Ordering::Relaxed);

        self.check_network()?;
        self.check_logged_in()?;
        Ok(self.appliances.read().await.clone())
    }

    async fn update_appliance(&self, puid: &str, command: &CommandMap) -> Result<()> {
        self.simulate_latency().await;
        self.update_calls
            .write()
            .await
            .push((puid.to_string(), command.clone()));

        self.check_network()?;
        self.check_logged_in()?;

        if self.reject_updates.load(Ordering::Relaxed) {
            return Err(Error::rejected(puid, "device refused the update"));
        }

        let mut appliances = self.appliances.write().await;
        let unit = appliances
            .iter_mut()
            .find(|a| a.puid == puid)
            .ok_or_else(|| Error::rejected(puid, "unknown puid"))?;

        for (key, value) in command {
            unit.status
                .insert(key.clone(), StatusValue::Text(value.clone()));
        }
        Ok(())
    }
}

/// Builder for creating sim clients with seeded appliances.
#[derive(Debug, Default)]
pub struct SimClientBuilder {
    appliances: Vec<Appliance>,
    latency: Duration,
}

impl SimClientBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pre-built appliance.
    #[must_use]
    pub fn appliance(mut self, appliance: Appliance) -> Self {
        self.appliances.push(appliance);
        self
    }

    /// Add a split air conditioner with a typical idle status.
    #[must_use]
    pub fn air_conditioner(mut self, nickname: &str) -> Self {
        let puid = format!("sim-{:06X}", rand::random::<u32>() % 0xFF_FFFF);
        let mut unit = Appliance::new(puid, nickname, ApplianceKind::SplitAc);
        unit.status.insert(keys::POWER.to_string(), "0".into());
        unit.status.insert(keys::TARGET_TEMP.to_string(), "24".into());
        unit.status.insert(keys::INDOOR_TEMP.to_string(), "25".into());
        unit.status.insert(keys::WORK_MODE.to_string(), "1".into());
        unit.status.insert(keys::FAN_SPEED.to_string(), "1".into());
        unit.status
            .insert(keys::SWING_VERTICAL.to_string(), "0".into());
        unit.status
            .insert(keys::SWING_HORIZONTAL.to_string(), "0".into());
        self.appliances.push(unit);
        self
    }

    /// Set the simulated round-trip latency.
    #[must_use]
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Build the client.
    pub fn build(self) -> SimClient {
        let client = SimClient::with_appliances(self.appliances);
        client.set_latency(self.latency);
        client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_unit_client() -> SimClient {
        SimClient::builder()
            .air_conditioner("AC1")
            .air_conditioner("AC2")
            .build()
    }

    #[tokio::test]
    async fn test_list_requires_login() {
        let client = two_unit_client();
        let err = client.list_appliances().await.unwrap_err();
        assert!(matches!(err, Error::Auth(_)));

        client.login().await.unwrap();
        assert_eq!(client.list_appliances().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_login_failure_injection() {
        let client = two_unit_client();
        client.set_fail_login(true);
        assert!(matches!(
            client.login().await.unwrap_err(),
            Error::Auth(_)
        ));

        client.set_fail_login(false);
        client.login().await.unwrap();
        assert_eq!(client.login_count(), 2);
    }

    #[tokio::test]
    async fn test_list_preserves_seed_order() {
        let client = two_unit_client();
        client.login().await.unwrap();
        let units = client.list_appliances().await.unwrap();
        assert_eq!(units[0].nickname, "AC1");
        assert_eq!(units[1].nickname, "AC2");
    }

    #[tokio::test]
    async fn test_update_merges_into_status() {
        let client = two_unit_client();
        client.login().await.unwrap();

        let puid = client.appliance("AC1").await.unwrap().puid;
        let command = CommandMap::from([("t_power".to_string(), "1".to_string())]);
        client.update_appliance(&puid, &command).await.unwrap();

        let unit = client.appliance("AC1").await.unwrap();
        assert_eq!(unit.raw_text("t_power").unwrap(), "1");
        // Untouched keys survive.
        assert_eq!(unit.raw_text("t_temp").unwrap(), "24");
    }

    #[tokio::test]
    async fn test_update_unknown_puid_is_rejected() {
        let client = two_unit_client();
        client.login().await.unwrap();

        let command = CommandMap::from([("t_power".to_string(), "1".to_string())]);
        let err = client.update_appliance("nope", &command).await.unwrap_err();
        assert!(matches!(err, Error::Rejected { .. }));
    }

    #[tokio::test]
    async fn test_update_calls_are_recorded_even_on_rejection() {
        let client = two_unit_client();
        client.login().await.unwrap();
        client.set_reject_updates(true);

        let puid = client.appliance("AC1").await.unwrap().puid;
        let command = CommandMap::from([("t_temp".to_string(), "22".to_string())]);
        let err = client.update_appliance(&puid, &command).await.unwrap_err();
        assert!(matches!(err, Error::Rejected { .. }));

        let calls = client.update_calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, puid);
        assert_eq!(calls[0].1["t_temp"], "22");
    }

    #[tokio::test]
    async fn test_transient_network_failures_drain() {
        let client = two_unit_client();
        client.login().await.unwrap();
        client.set_transient_network_failures(2);

        assert!(client.list_appliances().await.is_err());
        assert!(client.list_appliances().await.is_err());
        assert!(client.list_appliances().await.is_ok());
    }

    #[tokio::test]
    async fn test_persistent_network_failure_until_cleared() {
        let client = two_unit_client();
        client.login().await.unwrap();

        client.set_fail_network(true);
        assert!(matches!(
            client.list_appliances().await.unwrap_err(),
            Error::Network(_)
        ));

        client.set_fail_network(false);
        assert!(client.list_appliances().await.is_ok());
    }

    #[tokio::test]
    async fn test_set_status_hook() {
        let client = two_unit_client();
        client.login().await.unwrap();
        client.set_status("AC2", "t_work_mode", "5").await;

        let unit = client.appliance("AC2").await.unwrap();
        assert_eq!(unit.mode_label(), "Heat");
    }
}
