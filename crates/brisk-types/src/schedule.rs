//! The persisted scheduled-action record.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::appliance::{CommandMap, DisplayMap};

/// A queued partial-state update with an absolute trigger time.
///
/// The serialized form is one element of the persisted schedule file:
/// `time` is an RFC 3339 timestamp, `command_display` holds the
/// operator-facing labels, `command` the raw keys sent to the device.
/// `run_at` is fixed at creation ("now plus the requested delay") and is
/// never recomputed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledAction {
    #[serde(rename = "time", with = "time::serde::rfc3339")]
    pub run_at: OffsetDateTime,
    /// Target appliance nickname.
    pub device: String,
    #[serde(rename = "command_display")]
    pub display: DisplayMap,
    pub command: CommandMap,
}

impl ScheduledAction {
    pub fn new(
        run_at: OffsetDateTime,
        device: impl Into<String>,
        display: DisplayMap,
        command: CommandMap,
    ) -> Self {
        Self {
            run_at,
            device: device.into(),
            display,
            command,
        }
    }

    /// True once the trigger time has been reached (inclusive).
    pub fn is_due(&self, now: OffsetDateTime) -> bool {
        self.run_at <= now
    }

    /// Whole minutes until the trigger time, floored at zero for listings.
    pub fn minutes_until(&self, now: OffsetDateTime) -> i64 {
        (self.run_at - now).whole_minutes().max(0)
    }

    /// Short human description of the command, e.g. `Power: ON, Temp: 22`.
    pub fn summary(&self) -> String {
        self.display
            .iter()
            .map(|(label, value)| format!("{}: {}", label, value))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
