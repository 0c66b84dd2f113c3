//! Core data types for appliance state derivation.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Raw status and command keys used by the vendor protocol.
///
/// Status maps and partial updates share the same key space: a key read
/// from a poll is the same key written by a command.
pub mod keys {
    /// Power switch: `"1"` on, `"0"` off.
    pub const POWER: &str = "t_power";
    /// Target temperature in whole degrees.
    pub const TARGET_TEMP: &str = "t_temp";
    /// Indoor temperature reported by the unit (read-only).
    pub const INDOOR_TEMP: &str = "f_temp_in";
    /// Operating mode code.
    pub const WORK_MODE: &str = "t_work_mode";
    /// Fan speed code on current firmware.
    pub const FAN_SPEED: &str = "t_fanspeedcv";
    /// Fan speed code on older firmware.
    pub const FAN_SPEED_LEGACY: &str = "t_fan_speed";
    /// Vertical louver swing switch.
    pub const SWING_VERTICAL: &str = "t_up_down";
    /// Horizontal louver swing switch.
    pub const SWING_HORIZONTAL: &str = "t_swing_direction";
}

/// Placeholder rendered for missing or unrecognized status fields.
pub const PLACEHOLDER: &str = "--";

/// Power state derived from the raw switch value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    /// Derives power from the raw value: `"1"` is on, anything else is off.
    pub fn from_raw(raw: &str) -> Self {
        if raw == "1" {
            PowerState::On
        } else {
            PowerState::Off
        }
    }

    /// Wire value for this state.
    pub fn code(&self) -> &'static str {
        match self {
            PowerState::On => "1",
            PowerState::Off => "0",
        }
    }

    /// The opposite state.
    pub fn toggled(&self) -> Self {
        match self {
            PowerState::On => PowerState::Off,
            PowerState::Off => PowerState::On,
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, PowerState::On)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerState::On => write!(f, "ON"),
            PowerState::Off => write!(f, "OFF"),
        }
    }
}

/// Operating mode, mapped from the raw `t_work_mode` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum WorkMode {
    Auto = 1,
    Cool = 2,
    Dry = 3,
    Fan = 4,
    Heat = 5,
}

impl WorkMode {
    /// Wire code for this mode.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Parses a mode from its display name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "auto" => Some(WorkMode::Auto),
            "cool" => Some(WorkMode::Cool),
            "dry" => Some(WorkMode::Dry),
            "fan" => Some(WorkMode::Fan),
            "heat" => Some(WorkMode::Heat),
            _ => None,
        }
    }
}

impl TryFrom<u8> for WorkMode {
    type Error = ParseError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(WorkMode::Auto),
            2 => Ok(WorkMode::Cool),
            3 => Ok(WorkMode::Dry),
            4 => Ok(WorkMode::Fan),
            5 => Ok(WorkMode::Heat),
            other => Err(ParseError::UnknownWorkMode(other)),
        }
    }
}

impl fmt::Display for WorkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkMode::Auto => "Auto",
            WorkMode::Cool => "Cool",
            WorkMode::Dry => "Dry",
            WorkMode::Fan => "Fan",
            WorkMode::Heat => "Heat",
        };
        write!(f, "{}", name)
    }
}

/// Fan speed, mapped from the raw fan code.
///
/// Codes outside the enumerated 1..=5 table are preserved in `Other` so
/// they can be displayed as the raw digit rather than hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FanSpeed {
    Auto,
    Low,
    Medium,
    High,
    Turbo,
    Other(u8),
}

impl FanSpeed {
    /// Maps a raw fan code to a speed. Total: unknown codes become `Other`.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => FanSpeed::Auto,
            2 => FanSpeed::Low,
            3 => FanSpeed::Medium,
            4 => FanSpeed::High,
            5 => FanSpeed::Turbo,
            other => FanSpeed::Other(other),
        }
    }

    /// Wire code for this speed.
    pub fn code(&self) -> u8 {
        match self {
            FanSpeed::Auto => 1,
            FanSpeed::Low => 2,
            FanSpeed::Medium => 3,
            FanSpeed::High => 4,
            FanSpeed::Turbo => 5,
            FanSpeed::Other(code) => *code,
        }
    }

    /// The code after `code` in the cycling order: codes below 6 advance by
    /// one, 6 and above wrap back to 1.
    pub fn next_code(code: u8) -> u8 {
        if code >= 6 { 1 } else { code + 1 }
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FanSpeed::Auto => write!(f, "Auto"),
            FanSpeed::Low => write!(f, "Low"),
            FanSpeed::Medium => write!(f, "Med"),
            FanSpeed::High => write!(f, "High"),
            FanSpeed::Turbo => write!(f, "Turbo"),
            FanSpeed::Other(code) => write!(f, "{}", code),
        }
    }
}

/// Appliance kind, tagged from the vendor's numeric type code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplianceKind {
    SplitAc,
    WindowAc,
    PortableAc,
    Dehumidifier,
    /// Type code with no known mapping; the raw code is preserved.
    Other(String),
}

impl ApplianceKind {
    /// Maps the vendor type code to a kind.
    pub fn from_type_code(code: &str) -> Self {
        match code {
            "009" => ApplianceKind::SplitAc,
            "008" => ApplianceKind::WindowAc,
            "007" => ApplianceKind::PortableAc,
            "006" => ApplianceKind::Dehumidifier,
            other => ApplianceKind::Other(other.to_string()),
        }
    }

    pub fn is_air_conditioner(&self) -> bool {
        matches!(
            self,
            ApplianceKind::SplitAc | ApplianceKind::WindowAc | ApplianceKind::PortableAc
        )
    }
}

impl fmt::Display for ApplianceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplianceKind::SplitAc => write!(f, "Split AC"),
            ApplianceKind::WindowAc => write!(f, "Window AC"),
            ApplianceKind::PortableAc => write!(f, "Portable AC"),
            ApplianceKind::Dehumidifier => write!(f, "Dehumidifier"),
            ApplianceKind::Other(code) => write!(f, "Type {}", code),
        }
    }
}

/// A raw status value as returned by the vendor API.
///
/// The API mixes strings and numbers for the same keys across firmware
/// revisions, so both representations are accepted and normalized through
/// [`StatusValue::as_text`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusValue {
    Text(String),
    Number(f64),
}

impl StatusValue {
    /// Text view of the value. Whole numbers render without a fraction so
    /// `24` and `"24"` normalize to the same text.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            StatusValue::Text(s) => Cow::Borrowed(s.as_str()),
            StatusValue::Number(n) => {
                if n.fract() == 0.0 {
                    Cow::Owned(format!("{}", *n as i64))
                } else {
                    Cow::Owned(n.to_string())
                }
            }
        }
    }

    /// Numeric code view, for the enum derivation tables.
    pub fn code(&self) -> Option<u8> {
        self.as_text().parse().ok()
    }

    /// Signed integer view, for temperature fields.
    pub fn as_i32(&self) -> Option<i32> {
        self.as_text().parse().ok()
    }

    /// Float view, for sensor readings.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StatusValue::Number(n) => Some(*n),
            StatusValue::Text(s) => s.parse().ok(),
        }
    }
}

impl fmt::Display for StatusValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

impl From<&str> for StatusValue {
    fn from(value: &str) -> Self {
        StatusValue::Text(value.to_string())
    }
}

impl From<String> for StatusValue {
    fn from(value: String) -> Self {
        StatusValue::Text(value)
    }
}

impl From<i64> for StatusValue {
    fn from(value: i64) -> Self {
        StatusValue::Number(value as f64)
    }
}

impl From<f64> for StatusValue {
    fn from(value: f64) -> Self {
        StatusValue::Number(value)
    }
}
