//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use brisk_core::{MAX_TARGET_TEMP, MIN_TARGET_TEMP, ScheduleFan};
use brisk_types::{PowerState, WorkMode};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Louver swing axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SwingAxis {
    /// Up/down louver
    Vertical,
    /// Left/right louver
    Horizontal,
}

/// A requested temperature change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempChange {
    /// One degree warmer
    Up,
    /// One degree cooler
    Down,
    /// An explicit target
    Set(i32),
}

/// Command fields for scheduling; unset fields are left alone
#[derive(Debug, Clone, Default, Args)]
pub struct ScheduleFields {
    /// Power state to schedule (on or off)
    #[arg(long, value_parser = parse_power)]
    pub power: Option<PowerState>,

    /// Target temperature to schedule (16-30 degrees)
    #[arg(long, value_parser = parse_target_temp)]
    pub temp: Option<i32>,

    /// Fan speed to schedule (low, med, high)
    #[arg(long, value_parser = parse_schedule_fan)]
    pub fan: Option<ScheduleFan>,
}

impl ScheduleFields {
    pub fn is_empty(&self) -> bool {
        self.power.is_none() && self.temp.is_none() && self.fan.is_none()
    }
}

#[derive(Parser)]
#[command(name = "brisk")]
#[command(author, version, about = "CLI for the brisk appliance scheduler", long_about = None)]
pub struct Cli {
    /// Appliance nickname to operate on (defaults to the configured device)
    #[arg(short, long, global = true, env = "BRISK_DEVICE")]
    pub device: Option<String>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the current status of the appliance
    Status,

    /// Switch power on or off (toggles when no state is given)
    Power {
        /// Explicit power state (on or off); omit to toggle
        #[arg(value_parser = parse_power)]
        state: Option<PowerState>,
    },

    /// Change the target temperature
    Temp {
        /// "up", "down", or an explicit target in degrees (16-30)
        #[arg(value_parser = parse_temp_change)]
        change: TempChange,
    },

    /// Select an operating mode (also powers the unit on)
    Mode {
        /// Operating mode (auto, cool, dry, fan, heat)
        #[arg(value_parser = parse_work_mode)]
        mode: WorkMode,
    },

    /// Advance the fan speed one step
    Fan,

    /// Toggle louver swing
    Swing {
        /// Swing axis to toggle
        #[arg(value_enum)]
        axis: SwingAxis,
    },

    /// Manage the scheduled command queue
    Schedule {
        #[command(subcommand)]
        action: ScheduleAction,
    },
}

/// Schedule subcommands
#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Queue a command to run after a delay
    Add {
        /// Delay before the command runs, in minutes
        #[arg(long = "in", value_name = "MINUTES", value_parser = parse_delay_minutes)]
        minutes: i64,

        #[command(flatten)]
        fields: ScheduleFields,
    },

    /// List queued commands
    List,

    /// Replace a queued command in place
    Edit {
        /// Queue position as shown by `schedule list`
        index: usize,

        /// New delay in minutes, measured from now
        #[arg(long = "in", value_name = "MINUTES", value_parser = parse_delay_minutes)]
        minutes: Option<i64>,

        #[command(flatten)]
        fields: ScheduleFields,
    },

    /// Remove a queued command
    #[command(alias = "rm")]
    Remove {
        /// Queue position as shown by `schedule list`
        index: usize,
    },
}

/// Parse a power state with flexible input
fn parse_power(s: &str) -> Result<PowerState, String> {
    match s.to_ascii_lowercase().as_str() {
        "on" | "1" | "true" => Ok(PowerState::On),
        "off" | "0" | "false" => Ok(PowerState::Off),
        _ => Err(format!("Invalid power state '{}'. Use: on or off", s)),
    }
}

/// Parse a target temperature with range validation
fn parse_target_temp(s: &str) -> Result<i32, String> {
    let degrees: i32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid temperature", s))?;
    check_target_temp(degrees)
}

fn check_target_temp(degrees: i32) -> Result<i32, String> {
    if (MIN_TARGET_TEMP..=MAX_TARGET_TEMP).contains(&degrees) {
        Ok(degrees)
    } else {
        Err(format!(
            "Temperature {} out of range. Valid values: {}-{} degrees",
            degrees, MIN_TARGET_TEMP, MAX_TARGET_TEMP
        ))
    }
}

/// Parse a temperature change: a direction or an explicit target
fn parse_temp_change(s: &str) -> Result<TempChange, String> {
    match s.to_ascii_lowercase().as_str() {
        "up" => Ok(TempChange::Up),
        "down" => Ok(TempChange::Down),
        other => {
            let degrees: i32 = other
                .parse()
                .map_err(|_| format!("'{}' is not \"up\", \"down\", or a temperature", s))?;
            check_target_temp(degrees).map(TempChange::Set)
        }
    }
}

/// Parse an operating mode by name
fn parse_work_mode(s: &str) -> Result<WorkMode, String> {
    WorkMode::from_name(s).ok_or_else(|| {
        format!(
            "Invalid mode '{}'. Valid values: auto, cool, dry, fan, heat",
            s
        )
    })
}

/// Parse a schedulable fan speed by name
fn parse_schedule_fan(s: &str) -> Result<ScheduleFan, String> {
    ScheduleFan::from_name(s)
        .ok_or_else(|| format!("Invalid fan speed '{}'. Valid values: low, med, high", s))
}

/// Parse a non-negative scheduling delay
fn parse_delay_minutes(s: &str) -> Result<i64, String> {
    let minutes: i64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number of minutes", s))?;
    if minutes < 0 {
        Err(format!("Delay must not be negative, got {}", minutes))
    } else {
        Ok(minutes)
    }
}
