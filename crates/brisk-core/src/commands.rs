//! Command construction for appliance control.
//!
//! Two kinds of commands are built here: immediate controls derived from
//! the current cached status (toggle, step, cycle), and scheduled commands
//! built through [`SessionDefaults`], which fills display fields the
//! operator omitted with the values remembered from earlier requests.

use std::fmt;

use brisk_types::{CommandMap, DisplayMap, FanSpeed, PowerState, WorkMode, keys};

use crate::error::{Error, Result};

/// Lowest target temperature the units accept.
pub const MIN_TARGET_TEMP: i32 = 16;
/// Highest target temperature the units accept.
pub const MAX_TARGET_TEMP: i32 = 30;
/// Starting point when the current target cannot be read.
pub const DEFAULT_TARGET_TEMP: i32 = 24;

/// Fan speeds offered when scheduling.
///
/// Scheduling exposes the three fixed speeds; Auto and Turbo are reachable
/// through the live cycle control only, matching the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleFan {
    Low,
    Medium,
    High,
}

impl ScheduleFan {
    /// Wire code sent for this speed.
    pub fn wire_code(&self) -> &'static str {
        match self {
            ScheduleFan::Low => "2",
            ScheduleFan::Medium => "4",
            ScheduleFan::High => "6",
        }
    }

    /// Parses a speed from its display name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "low" => Some(ScheduleFan::Low),
            "med" | "medium" => Some(ScheduleFan::Medium),
            "high" => Some(ScheduleFan::High),
            _ => None,
        }
    }
}

impl fmt::Display for ScheduleFan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleFan::Low => write!(f, "Low"),
            ScheduleFan::Medium => write!(f, "Med"),
            ScheduleFan::High => write!(f, "High"),
        }
    }
}

/// The operator's explicit inputs for one scheduling request.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleRequest {
    pub power: Option<PowerState>,
    pub temp: Option<i32>,
    pub fan: Option<ScheduleFan>,
}

impl ScheduleRequest {
    pub fn is_empty(&self) -> bool {
        self.power.is_none() && self.temp.is_none() && self.fan.is_none()
    }
}

/// Values remembered from earlier scheduling requests.
///
/// Owned by the scheduling session that creates it; a new session starts
/// with every field unset. Fields the operator omits fall back to these
/// for display only, so a chain of partial schedules reads like a running
/// state without re-sending settled fields.
#[derive(Debug, Clone, Default)]
pub struct SessionDefaults {
    power: Option<PowerState>,
    temp: Option<i32>,
    fan: Option<ScheduleFan>,
}

impl SessionDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the display and command maps for a scheduling request.
    ///
    /// Explicit fields are recorded as the new remembered values and
    /// included in both maps. Omitted fields fall back to the remembered
    /// value in the display map only; they are not re-sent to the device.
    /// A request with no explicit field is rejected with
    /// [`Error::EmptyCommand`] and leaves the remembered values untouched.
    pub fn build(&mut self, request: &ScheduleRequest) -> Result<(DisplayMap, CommandMap)> {
        if request.is_empty() {
            return Err(Error::EmptyCommand);
        }

        let mut display = DisplayMap::new();
        let mut command = CommandMap::new();

        if let Some(power) = request.power {
            self.power = Some(power);
            display.insert("Power".to_string(), power.to_string());
            command.insert(keys::POWER.to_string(), power.code().to_string());
        } else if let Some(power) = self.power {
            display.insert("Power".to_string(), power.to_string());
        }

        if let Some(temp) = request.temp {
            self.temp = Some(temp);
            display.insert("Temp".to_string(), temp.to_string());
            command.insert(keys::TARGET_TEMP.to_string(), temp.to_string());
        } else if let Some(temp) = self.temp {
            display.insert("Temp".to_string(), temp.to_string());
        }

        if let Some(fan) = request.fan {
            self.fan = Some(fan);
            display.insert("Fan".to_string(), fan.to_string());
            command.insert(keys::FAN_SPEED.to_string(), fan.wire_code().to_string());
        } else if let Some(fan) = self.fan {
            display.insert("Fan".to_string(), fan.to_string());
        }

        Ok((display, command))
    }

    /// The remembered power value, if any request has set one.
    pub fn power(&self) -> Option<PowerState> {
        self.power
    }

    /// The remembered temperature, if any request has set one.
    pub fn temp(&self) -> Option<i32> {
        self.temp
    }

    /// The remembered fan speed, if any request has set one.
    pub fn fan(&self) -> Option<ScheduleFan> {
        self.fan
    }
}

// --- Immediate controls ---

/// Command that flips the power state. An unknown current state powers on.
pub fn power_toggle(current: Option<PowerState>) -> CommandMap {
    let next = match current {
        Some(power) => power.toggled(),
        None => PowerState::On,
    };
    power_set(next)
}

/// Command that sets an explicit power state.
pub fn power_set(power: PowerState) -> CommandMap {
    CommandMap::from([(keys::POWER.to_string(), power.code().to_string())])
}

/// Command that steps the target temperature by `delta` degrees, clamped
/// to the supported range. An unreadable current target steps from 24.
pub fn temp_step(current: Option<i32>, delta: i32) -> CommandMap {
    temp_set(current.unwrap_or(DEFAULT_TARGET_TEMP) + delta)
}

/// Command that sets the target temperature, clamped to the supported range.
pub fn temp_set(target: i32) -> CommandMap {
    let target = target.clamp(MIN_TARGET_TEMP, MAX_TARGET_TEMP);
    CommandMap::from([(keys::TARGET_TEMP.to_string(), target.to_string())])
}

/// Command that selects an operating mode.
///
/// Mode changes also power the unit on, matching the panel behavior: a
/// mode key on a powered-off unit would otherwise be silently ignored.
pub fn mode_set(mode: WorkMode) -> CommandMap {
    CommandMap::from([
        (keys::WORK_MODE.to_string(), mode.code().to_string()),
        (keys::POWER.to_string(), PowerState::On.code().to_string()),
    ])
}

/// Command that advances the fan speed one step, wrapping at the top of
/// the range. A missing current code starts the cycle at 1.
pub fn fan_cycle(current_code: Option<u8>) -> CommandMap {
    let next = FanSpeed::next_code(current_code.unwrap_or(0));
    CommandMap::from([(keys::FAN_SPEED.to_string(), next.to_string())])
}

/// Command that toggles the vertical louver swing.
pub fn swing_vertical_toggle(current_on: Option<bool>) -> CommandMap {
    toggle_switch(keys::SWING_VERTICAL, current_on)
}

/// Command that toggles the horizontal louver swing.
pub fn swing_horizontal_toggle(current_on: Option<bool>) -> CommandMap {
    toggle_switch(keys::SWING_HORIZONTAL, current_on)
}

fn toggle_switch(key: &str, current_on: Option<bool>) -> CommandMap {
    let next = if current_on.unwrap_or(false) { "0" } else { "1" };
    CommandMap::from([(key.to_string(), next.to_string())])
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- SessionDefaults tests ---

    #[test]
    fn test_explicit_fields_go_to_display_and_command() {
        let mut defaults = SessionDefaults::new();
        let request = ScheduleRequest {
            power: Some(PowerState::On),
            temp: Some(22),
            fan: Some(ScheduleFan::Low),
        };

        let (display, command) = defaults.build(&request).unwrap();

        assert_eq!(display["Power"], "ON");
        assert_eq!(display["Temp"], "22");
        assert_eq!(display["Fan"], "Low");
        assert_eq!(command["t_power"], "1");
        assert_eq!(command["t_temp"], "22");
        assert_eq!(command["t_fanspeedcv"], "2");
        assert_eq!(command.len(), 3);
    }

    #[test]
    fn test_omitted_fields_fall_back_for_display_only() {
        let mut defaults = SessionDefaults::new();
        defaults
            .build(&ScheduleRequest {
                power: Some(PowerState::On),
                temp: Some(22),
                fan: Some(ScheduleFan::Low),
            })
            .unwrap();

        // Second request sets only a new temperature.
        let (display, command) = defaults
            .build(&ScheduleRequest {
                temp: Some(26),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(display["Power"], "ON");
        assert_eq!(display["Temp"], "26");
        assert_eq!(display["Fan"], "Low");
        assert_eq!(command["t_temp"], "26");
        assert_eq!(command.len(), 1, "settled fields must not be re-sent");
    }

    #[test]
    fn test_unset_fields_without_remembered_values_are_absent() {
        let mut defaults = SessionDefaults::new();
        let (display, command) = defaults
            .build(&ScheduleRequest {
                temp: Some(24),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(display.len(), 1);
        assert_eq!(command.len(), 1);
        assert!(!display.contains_key("Power"));
        assert!(!display.contains_key("Fan"));
    }

    #[test]
    fn test_empty_request_is_rejected() {
        let mut defaults = SessionDefaults::new();
        let err = defaults.build(&ScheduleRequest::default()).unwrap_err();
        assert!(matches!(err, Error::EmptyCommand));
    }

    #[test]
    fn test_empty_request_rejected_even_with_remembered_values() {
        // Remembered values are display fallbacks, not commands: an empty
        // request stays empty.
        let mut defaults = SessionDefaults::new();
        defaults
            .build(&ScheduleRequest {
                power: Some(PowerState::Off),
                ..Default::default()
            })
            .unwrap();

        let err = defaults.build(&ScheduleRequest::default()).unwrap_err();
        assert!(matches!(err, Error::EmptyCommand));
    }

    #[test]
    fn test_explicit_fields_update_remembered_values() {
        let mut defaults = SessionDefaults::new();
        defaults
            .build(&ScheduleRequest {
                temp: Some(20),
                ..Default::default()
            })
            .unwrap();
        defaults
            .build(&ScheduleRequest {
                temp: Some(27),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(defaults.temp(), Some(27));
        assert_eq!(defaults.power(), None);
    }

    // --- ScheduleFan tests ---

    #[test]
    fn test_schedule_fan_wire_codes() {
        assert_eq!(ScheduleFan::Low.wire_code(), "2");
        assert_eq!(ScheduleFan::Medium.wire_code(), "4");
        assert_eq!(ScheduleFan::High.wire_code(), "6");
    }

    #[test]
    fn test_schedule_fan_from_name() {
        assert_eq!(ScheduleFan::from_name("low"), Some(ScheduleFan::Low));
        assert_eq!(ScheduleFan::from_name("Medium"), Some(ScheduleFan::Medium));
        assert_eq!(ScheduleFan::from_name("turbo"), None);
    }

    // --- Immediate control tests ---

    #[test]
    fn test_power_toggle_flips_current_state() {
        assert_eq!(power_toggle(Some(PowerState::On))["t_power"], "0");
        assert_eq!(power_toggle(Some(PowerState::Off))["t_power"], "1");
    }

    #[test]
    fn test_power_toggle_unknown_state_powers_on() {
        assert_eq!(power_toggle(None)["t_power"], "1");
    }

    #[test]
    fn test_temp_step_clamps_to_range() {
        assert_eq!(temp_step(Some(30), 1)["t_temp"], "30");
        assert_eq!(temp_step(Some(16), -1)["t_temp"], "16");
        assert_eq!(temp_step(Some(24), 1)["t_temp"], "25");
        assert_eq!(temp_step(Some(24), -1)["t_temp"], "23");
    }

    #[test]
    fn test_temp_step_from_unreadable_current_starts_at_default() {
        assert_eq!(temp_step(None, 1)["t_temp"], "25");
        assert_eq!(temp_step(None, -1)["t_temp"], "23");
    }

    #[test]
    fn test_temp_set_clamps_out_of_range_requests() {
        assert_eq!(temp_set(35)["t_temp"], "30");
        assert_eq!(temp_set(10)["t_temp"], "16");
        assert_eq!(temp_set(21)["t_temp"], "21");
    }

    #[test]
    fn test_mode_set_also_powers_on() {
        let command = mode_set(WorkMode::Heat);
        assert_eq!(command["t_work_mode"], "5");
        assert_eq!(command["t_power"], "1");
        assert_eq!(command.len(), 2);
    }

    #[test]
    fn test_fan_cycle_advances_and_wraps() {
        assert_eq!(fan_cycle(Some(1))["t_fanspeedcv"], "2");
        assert_eq!(fan_cycle(Some(5))["t_fanspeedcv"], "6");
        assert_eq!(fan_cycle(Some(6))["t_fanspeedcv"], "1");
    }

    #[test]
    fn test_fan_cycle_missing_current_starts_at_one() {
        assert_eq!(fan_cycle(None)["t_fanspeedcv"], "1");
    }

    #[test]
    fn test_swing_toggles() {
        assert_eq!(swing_vertical_toggle(Some(true))["t_up_down"], "0");
        assert_eq!(swing_vertical_toggle(Some(false))["t_up_down"], "1");
        assert_eq!(swing_vertical_toggle(None)["t_up_down"], "1");
        assert_eq!(
            swing_horizontal_toggle(Some(true))["t_swing_direction"],
            "0"
        );
    }
}
