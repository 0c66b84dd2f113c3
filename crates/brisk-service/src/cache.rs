//! Last-known appliance status for the selected device.

use brisk_core::{DeviceClient, DeviceNotFoundReason, Error, Result};
use brisk_types::Appliance;

/// Cache of the most recently polled status for the selected appliance.
///
/// The snapshot is replaced wholesale on every successful [`refresh`];
/// the device side never merges partially. The selected nickname is the
/// one piece of state shared between the poller and the command executor,
/// so the cache is kept behind a single `tokio::sync::Mutex` and a caller
/// that changes the selection for its own purposes must restore it before
/// releasing the lock.
///
/// [`refresh`]: StatusCache::refresh
#[derive(Debug, Clone)]
pub struct StatusCache {
    selected: String,
    appliance: Option<Appliance>,
}

impl StatusCache {
    /// Create a cache selecting `nickname`, with no snapshot yet.
    pub fn new(nickname: impl Into<String>) -> Self {
        Self {
            selected: nickname.into(),
            appliance: None,
        }
    }

    /// Nickname of the currently selected appliance.
    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// Change the selection. Selecting a different nickname drops the
    /// snapshot, since it belongs to the previous device.
    pub fn select(&mut self, nickname: impl Into<String>) {
        let nickname = nickname.into();
        if self.selected != nickname {
            self.selected = nickname;
            self.appliance = None;
        }
    }

    /// Re-query the appliance list and replace the snapshot with the entry
    /// matching the selected nickname. First match wins when nicknames
    /// collide.
    ///
    /// On a transport failure the stale snapshot is kept; when the account
    /// has no matching appliance the snapshot is cleared and subsequent
    /// reads fail with [`Error::DeviceNotFound`].
    pub async fn refresh(&mut self, client: &dyn DeviceClient) -> Result<()> {
        let appliances = client.list_appliances().await?;
        if appliances.is_empty() {
            self.appliance = None;
            return Err(Error::DeviceNotFound(DeviceNotFoundReason::NoAppliances));
        }

        match appliances.into_iter().find(|a| a.nickname == self.selected) {
            Some(unit) => {
                self.appliance = Some(unit);
                Ok(())
            }
            None => {
                self.appliance = None;
                Err(Error::device_not_found(self.selected.as_str()))
            }
        }
    }

    /// The cached snapshot for the selected appliance.
    pub fn appliance(&self) -> Result<&Appliance> {
        self.appliance
            .as_ref()
            .ok_or_else(|| Error::device_not_found(self.selected.as_str()))
    }

    /// One-line status summary for logs.
    pub fn describe(&self) -> String {
        match &self.appliance {
            Some(unit) => format!(
                "{}: Power {}, Mode {}, Fan {}, Set {}, Indoor {}",
                self.selected,
                unit.power_label(),
                unit.mode_label(),
                unit.fan_label(),
                unit.target_temp_label(),
                unit.indoor_temp_label(),
            ),
            None => format!("{}: no data", self.selected),
        }
    }
}
