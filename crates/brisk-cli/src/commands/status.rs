//! Status command implementation.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use brisk_service::Config;
use brisk_types::Appliance;

use crate::cli::OutputFormat;
use crate::util::{Session, write_output};

pub async fn cmd_status(
    config: &Config,
    device: String,
    format: OutputFormat,
    output: Option<&PathBuf>,
) -> Result<()> {
    let session = Session::open(config, device).await?;
    let appliance = session.refresh().await?;

    let content = match format {
        OutputFormat::Json => format_status_json(&appliance)?,
        OutputFormat::Text => format_status_text(&appliance),
    };

    write_output(output, &content)?;
    Ok(())
}

/// Format status as an aligned label/value block
fn format_status_text(appliance: &Appliance) -> String {
    format!(
        "{} ({})\n  Power   {}\n  Mode    {}\n  Fan     {}\n  Target  {}\n  Indoor  {}\n",
        appliance.nickname,
        appliance.kind,
        appliance.power_label(),
        appliance.mode_label(),
        appliance.fan_label(),
        appliance.target_temp_label(),
        appliance.indoor_temp_label(),
    )
}

/// Format status as JSON output
fn format_status_json(appliance: &Appliance) -> Result<String> {
    #[derive(Serialize)]
    struct StatusJson<'a> {
        device: &'a str,
        kind: String,
        power: String,
        mode: String,
        fan: String,
        target_temp: Option<i32>,
        indoor_temp: Option<f64>,
    }

    let json = StatusJson {
        device: &appliance.nickname,
        kind: appliance.kind.to_string(),
        power: appliance.power_label(),
        mode: appliance.mode_label(),
        fan: appliance.fan_label(),
        target_temp: appliance.target_temp(),
        indoor_temp: appliance.indoor_temp(),
    };

    Ok(format!("{}\n", serde_json::to_string_pretty(&json)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use brisk_types::{ApplianceKind, keys};

    fn idle_unit() -> Appliance {
        let mut unit = Appliance::new("sim-000001", "AC1", ApplianceKind::SplitAc);
        unit.status.insert(keys::POWER.to_string(), "1".into());
        unit.status.insert(keys::WORK_MODE.to_string(), "5".into());
        unit.status.insert(keys::FAN_SPEED.to_string(), "2".into());
        unit.status.insert(keys::TARGET_TEMP.to_string(), "22".into());
        unit.status.insert(keys::INDOOR_TEMP.to_string(), "25".into());
        unit
    }

    #[test]
    fn test_text_output_shows_derived_labels() {
        let text = format_status_text(&idle_unit());

        assert!(text.starts_with("AC1 (Split AC)"));
        assert!(text.contains("Power   ON"));
        assert!(text.contains("Mode    Heat"));
        assert!(text.contains("Fan     Low"));
        assert!(text.contains("Target  22"));
        assert!(text.contains("Indoor  25"));
    }

    #[test]
    fn test_text_output_uses_placeholders_for_missing_fields() {
        let bare = Appliance::new("sim-000002", "AC2", ApplianceKind::SplitAc);
        let text = format_status_text(&bare);

        assert!(text.contains("Power   --"));
        assert!(text.contains("Mode    --"));
        assert!(text.contains("Fan     --"));
    }

    #[test]
    fn test_json_output_round_trips() {
        let json = format_status_json(&idle_unit()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["device"], "AC1");
        assert_eq!(parsed["power"], "ON");
        assert_eq!(parsed["mode"], "Heat");
        assert_eq!(parsed["target_temp"], 22);
        assert_eq!(parsed["indoor_temp"], 25.0);
    }
}
