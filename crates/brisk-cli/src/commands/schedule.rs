//! Schedule management commands.
//!
//! These operate on the same schedule file the daemon dispatches from, so
//! every mutation goes through the store's load-modify-save helpers and a
//! queued entry edited here is picked up on the daemon's next tick.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use time::OffsetDateTime;

use brisk_core::{ScheduleRequest, SessionDefaults};
use brisk_service::Config;
use brisk_store::ScheduleStore;
use brisk_types::{ScheduledAction, keys};

use crate::cli::{OutputFormat, ScheduleFields};
use crate::util::{open_store, write_output};

pub async fn cmd_schedule_add(
    config: &Config,
    device: String,
    minutes: i64,
    fields: &ScheduleFields,
    quiet: bool,
) -> Result<()> {
    let request = ScheduleRequest {
        power: fields.power,
        temp: fields.temp,
        fan: fields.fan,
    };
    let mut defaults = SessionDefaults::new();
    let (display, command) = defaults
        .build(&request)
        .context("Pass at least one of --power, --temp or --fan")?;

    let run_at = OffsetDateTime::now_utc() + time::Duration::minutes(minutes);
    let action = ScheduledAction::new(run_at, device.clone(), display, command);
    let summary = action.summary();

    let store = open_store(config)?;
    store
        .append(action)
        .await
        .context("Failed to save the schedule")?;

    if !quiet {
        println!("Scheduled for {} in {} min: {}", device, minutes, summary);
    }
    Ok(())
}

pub async fn cmd_schedule_list(
    config: &Config,
    format: OutputFormat,
    output: Option<&PathBuf>,
) -> Result<()> {
    let store = open_store(config)?;
    let actions = store
        .load_or_empty()
        .await
        .context("Failed to read the schedule")?;

    let content = match format {
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&actions)?),
        OutputFormat::Text => format_schedule_text(&actions, OffsetDateTime::now_utc()),
    };

    write_output(output, &content)?;
    Ok(())
}

pub async fn cmd_schedule_edit(
    config: &Config,
    device: Option<String>,
    index: usize,
    minutes: Option<i64>,
    fields: &ScheduleFields,
    quiet: bool,
) -> Result<()> {
    if device.is_none() && minutes.is_none() && fields.is_empty() {
        bail!("Nothing to change. Pass --in, --power, --temp, --fan or --device.");
    }

    let store = open_store(config)?;
    let actions = store
        .load_or_empty()
        .await
        .context("Failed to read the schedule")?;
    let existing = actions
        .get(index)
        .ok_or(brisk_store::Error::IndexOutOfRange {
            index,
            len: actions.len(),
        })?;

    let mut action = existing.clone();
    if let Some(device) = device {
        action.device = device;
    }
    if let Some(minutes) = minutes {
        action.run_at = OffsetDateTime::now_utc() + time::Duration::minutes(minutes);
    }
    apply_fields(&mut action, fields);
    let summary = action.summary();

    store
        .replace_at(index, action)
        .await
        .context("Failed to save the schedule")?;

    if !quiet {
        println!("Replaced entry {}: {}", index, summary);
    }
    Ok(())
}

pub async fn cmd_schedule_remove(config: &Config, index: usize, quiet: bool) -> Result<()> {
    let store = open_store(config)?;
    let removed = store
        .remove_at(index)
        .await
        .context("Failed to update the schedule")?;

    if !quiet {
        println!(
            "Removed entry {}: {} ({})",
            index,
            removed.summary(),
            removed.device
        );
    }
    Ok(())
}

/// Overwrite the fields the operator named, leaving the rest of the entry
/// as stored.
fn apply_fields(action: &mut ScheduledAction, fields: &ScheduleFields) {
    if let Some(power) = fields.power {
        action.display.insert("Power".to_string(), power.to_string());
        action
            .command
            .insert(keys::POWER.to_string(), power.code().to_string());
    }
    if let Some(temp) = fields.temp {
        action.display.insert("Temp".to_string(), temp.to_string());
        action
            .command
            .insert(keys::TARGET_TEMP.to_string(), temp.to_string());
    }
    if let Some(fan) = fields.fan {
        action.display.insert("Fan".to_string(), fan.to_string());
        action
            .command
            .insert(keys::FAN_SPEED.to_string(), fan.wire_code().to_string());
    }
}

/// Format the queue as one row per entry
fn format_schedule_text(actions: &[ScheduledAction], now: OffsetDateTime) -> String {
    if actions.is_empty() {
        return "No scheduled commands.\n".to_string();
    }

    let mut out = String::new();
    for (index, action) in actions.iter().enumerate() {
        let when = if action.is_due(now) {
            "due now".to_string()
        } else {
            format!("in {} min", action.minutes_until(now))
        };
        out.push_str(&format!(
            "{:>3}  {:<11}  {:<6}  {}\n",
            index,
            when,
            action.device,
            action.summary()
        ));
    }
    out
}
