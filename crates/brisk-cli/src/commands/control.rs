//! Immediate control commands: power, temperature, mode, fan, and swing.
//!
//! Each command reads the current snapshot where the next value depends on
//! it, builds the partial update, and hands it to the executor. The
//! confirmation poll happens inside the executor; the printed message
//! reflects what was sent.

use anyhow::Result;

use brisk_core::commands::{
    fan_cycle, mode_set, power_set, power_toggle, swing_horizontal_toggle, swing_vertical_toggle,
    temp_set, temp_step,
};
use brisk_service::Config;
use brisk_types::{FanSpeed, PowerState, WorkMode, keys};

use crate::cli::{SwingAxis, TempChange};
use crate::util::Session;

pub async fn cmd_power(
    config: &Config,
    device: String,
    state: Option<PowerState>,
    quiet: bool,
) -> Result<()> {
    let session = Session::open(config, device).await?;

    let command = match state {
        Some(state) => power_set(state),
        None => {
            let appliance = session.refresh().await?;
            power_toggle(appliance.power())
        }
    };
    let next = PowerState::from_raw(&command[keys::POWER]);

    session.apply(&command).await?;
    if !quiet {
        println!("{} power set to {}", session.device(), next);
    }
    Ok(())
}

pub async fn cmd_temp(
    config: &Config,
    device: String,
    change: TempChange,
    quiet: bool,
) -> Result<()> {
    let session = Session::open(config, device).await?;

    let command = match change {
        TempChange::Set(degrees) => temp_set(degrees),
        TempChange::Up | TempChange::Down => {
            let delta = if change == TempChange::Up { 1 } else { -1 };
            let appliance = session.refresh().await?;
            temp_step(appliance.target_temp(), delta)
        }
    };
    let target = command[keys::TARGET_TEMP].clone();

    session.apply(&command).await?;
    if !quiet {
        println!("{} target temperature set to {}", session.device(), target);
    }
    Ok(())
}

pub async fn cmd_mode(config: &Config, device: String, mode: WorkMode, quiet: bool) -> Result<()> {
    let session = Session::open(config, device).await?;

    session.apply(&mode_set(mode)).await?;
    if !quiet {
        println!("{} mode set to {}", session.device(), mode);
    }
    Ok(())
}

pub async fn cmd_fan(config: &Config, device: String, quiet: bool) -> Result<()> {
    let session = Session::open(config, device).await?;

    let appliance = session.refresh().await?;
    let command = fan_cycle(appliance.fan_code());
    let label = command[keys::FAN_SPEED]
        .parse::<u8>()
        .map(FanSpeed::from_code)
        .map_or_else(|_| command[keys::FAN_SPEED].clone(), |speed| speed.to_string());

    session.apply(&command).await?;
    if !quiet {
        println!("{} fan speed set to {}", session.device(), label);
    }
    Ok(())
}

pub async fn cmd_swing(
    config: &Config,
    device: String,
    axis: SwingAxis,
    quiet: bool,
) -> Result<()> {
    let session = Session::open(config, device).await?;
    let appliance = session.refresh().await?;

    let (key, command) = match axis {
        SwingAxis::Vertical => (
            keys::SWING_VERTICAL,
            swing_vertical_toggle(appliance.switch_on(keys::SWING_VERTICAL)),
        ),
        SwingAxis::Horizontal => (
            keys::SWING_HORIZONTAL,
            swing_horizontal_toggle(appliance.switch_on(keys::SWING_HORIZONTAL)),
        ),
    };
    let turned_on = command[key] == "1";

    session.apply(&command).await?;
    if !quiet {
        println!(
            "{} {} swing {}",
            session.device(),
            axis_label(axis),
            if turned_on { "on" } else { "off" }
        );
    }
    Ok(())
}

fn axis_label(axis: SwingAxis) -> &'static str {
    match axis {
        SwingAxis::Vertical => "vertical",
        SwingAxis::Horizontal => "horizontal",
    }
}
