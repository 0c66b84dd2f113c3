//! Shared types for Brisk climate appliance control.
//!
//! This crate provides the data model used across the workspace: raw
//! vendor status values, the derivation tables that turn numeric codes
//! into power/mode/fan enums, the appliance snapshot with typed
//! accessors, and the persisted scheduled-action record.
//!
//! # Features
//!
//! - Fixed lookup tables for power, mode and fan derivation
//! - Tagged appliance kinds from vendor type codes
//! - `Appliance` snapshots with typed, non-failing status accessors
//! - `ScheduledAction` with an RFC 3339 `time` field matching the
//!   persisted schedule file
//!
//! # Example
//!
//! ```
//! use brisk_types::{Appliance, ApplianceKind, WorkMode, keys};
//!
//! let mut unit = Appliance::new("p-1", "AC1", ApplianceKind::SplitAc);
//! unit.status.insert(keys::WORK_MODE.to_string(), "5".into());
//! assert_eq!(unit.work_mode(), Some(WorkMode::Heat));
//! ```

pub mod appliance;
pub mod error;
pub mod schedule;
pub mod types;

pub use appliance::{Appliance, CommandMap, DisplayMap, StatusMap};
pub use error::{ParseError, ParseResult};
pub use schedule::ScheduledAction;
pub use types::{
    ApplianceKind, FanSpeed, PLACEHOLDER, PowerState, StatusValue, WorkMode, keys,
};


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use time::OffsetDateTime;

    prop_compose! {
        fn arb_action()(
            secs in 0i64..4_102_444_800,
            nanos in 0u32..1_000_000_000,
            device in "[A-Z]{2}[0-9]{1,2}",
            command in proptest::collection::btree_map("[a-z_]{1,12}", "[0-9]{1,3}", 1..4),
            display in proptest::collection::btree_map("[A-Z][a-z]{1,8}", "[A-Za-z0-9]{1,6}", 0..4),
        ) -> ScheduledAction {
            let run_at = OffsetDateTime::from_unix_timestamp(secs)
                .unwrap()
                .replace_nanosecond(nanos)
                .unwrap();
            ScheduledAction::new(run_at, device, display, command)
        }
    }

    proptest! {
        #[test]
        fn prop_scheduled_action_json_round_trip(action in arb_action()) {
            let json = serde_json::to_string(&action).unwrap();
            let back: ScheduledAction = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(back, action);
        }
    }
}
