//! Command implementations for the CLI.

mod control;
mod schedule;
mod status;

pub use control::{cmd_fan, cmd_mode, cmd_power, cmd_swing, cmd_temp};
pub use schedule::{cmd_schedule_add, cmd_schedule_edit, cmd_schedule_list, cmd_schedule_remove};
pub use status::cmd_status;
