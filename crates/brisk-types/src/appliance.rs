//! Appliance snapshot and typed status accessors.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{ApplianceKind, FanSpeed, PLACEHOLDER, PowerState, StatusValue, WorkMode, keys};

/// Raw key/value status map for an appliance.
pub type StatusMap = BTreeMap<String, StatusValue>;

/// Partial update sent to an appliance: raw keys to wire values.
pub type CommandMap = BTreeMap<String, String>;

/// Human-readable label/value pairs describing a command.
pub type DisplayMap = BTreeMap<String, String>;

/// Snapshot of a remote appliance: identity plus the last polled raw state.
///
/// The status map is replaced wholesale on each poll; there is no partial
/// merge from the device side. Typed accessors derive display-meaningful
/// values from the raw codes and return `None` for missing fields rather
/// than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appliance {
    /// Vendor-assigned unique id.
    pub puid: String,
    /// Operator-facing name used for selection.
    pub nickname: String,
    /// Kind derived from the vendor type code.
    pub kind: ApplianceKind,
    /// Last known raw state.
    pub status: StatusMap,
}

impl Appliance {
    pub fn new(
        puid: impl Into<String>,
        nickname: impl Into<String>,
        kind: ApplianceKind,
    ) -> Self {
        Self {
            puid: puid.into(),
            nickname: nickname.into(),
            kind,
            status: StatusMap::new(),
        }
    }

    /// Raw value for `key`, if present.
    pub fn raw(&self, key: &str) -> Option<&StatusValue> {
        self.status.get(key)
    }

    /// Raw value for `key` as text.
    pub fn raw_text(&self, key: &str) -> Option<Cow<'_, str>> {
        self.raw(key).map(StatusValue::as_text)
    }

    /// Power state, derived from `t_power`.
    pub fn power(&self) -> Option<PowerState> {
        self.raw(keys::POWER)
            .map(|v| PowerState::from_raw(&v.as_text()))
    }

    /// Operating mode, derived from `t_work_mode`. `None` covers both a
    /// missing field and a code outside the known table.
    pub fn work_mode(&self) -> Option<WorkMode> {
        self.raw(keys::WORK_MODE)
            .and_then(StatusValue::code)
            .and_then(|code| WorkMode::try_from(code).ok())
    }

    /// Raw fan code, preferring `t_fanspeedcv` and falling back to the
    /// older `t_fan_speed` key.
    pub fn fan_code(&self) -> Option<u8> {
        self.raw(keys::FAN_SPEED)
            .or_else(|| self.raw(keys::FAN_SPEED_LEGACY))
            .and_then(StatusValue::code)
    }

    /// Fan speed, derived from the raw fan code.
    pub fn fan_speed(&self) -> Option<FanSpeed> {
        self.fan_code().map(FanSpeed::from_code)
    }

    /// Target temperature from `t_temp`.
    pub fn target_temp(&self) -> Option<i32> {
        self.raw(keys::TARGET_TEMP).and_then(StatusValue::as_i32)
    }

    /// Indoor temperature from `f_temp_in`.
    pub fn indoor_temp(&self) -> Option<f64> {
        self.raw(keys::INDOOR_TEMP).and_then(StatusValue::as_f64)
    }

    /// Whether the switch stored under `key` is set ("1").
    pub fn switch_on(&self, key: &str) -> Option<bool> {
        self.raw_text(key).map(|v| v == "1")
    }

    /// Display string for power, `"--"` when unknown.
    pub fn power_label(&self) -> String {
        match self.power() {
            Some(power) => power.to_string(),
            None => PLACEHOLDER.to_string(),
        }
    }

    /// Display string for the operating mode, `"--"` when missing or
    /// unrecognized.
    pub fn mode_label(&self) -> String {
        match self.work_mode() {
            Some(mode) => mode.to_string(),
            None => PLACEHOLDER.to_string(),
        }
    }

    /// Display string for the fan speed. Unrecognized codes render as the
    /// raw digit; a missing field renders as `"--"`.
    pub fn fan_label(&self) -> String {
        match self.fan_speed() {
            Some(speed) => speed.to_string(),
            None => PLACEHOLDER.to_string(),
        }
    }

    /// Display string for the target temperature, `"--"` when missing.
    pub fn target_temp_label(&self) -> String {
        match self.target_temp() {
            Some(temp) => temp.to_string(),
            None => PLACEHOLDER.to_string(),
        }
    }

    /// Display string for the indoor temperature, `"--"` when missing.
    pub fn indoor_temp_label(&self) -> String {
        match self.raw_text(keys::INDOOR_TEMP) {
            Some(text) => text.into_owned(),
            None => PLACEHOLDER.to_string(),
        }
    }
}
