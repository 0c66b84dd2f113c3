use clap::Parser;
use tracing_subscriber::EnvFilter;

use brisk_cli::cli::{Cli, Commands, ScheduleAction};
use brisk_cli::commands;
use brisk_cli::util;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Logs go to stderr so JSON output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = util::load_config(cli.config.as_ref())?;
    let device = util::resolve_device(cli.device.clone(), &config);

    match cli.command {
        Commands::Status => {
            commands::cmd_status(&config, device, cli.format, cli.output.as_ref()).await
        }
        Commands::Power { state } => commands::cmd_power(&config, device, state, cli.quiet).await,
        Commands::Temp { change } => commands::cmd_temp(&config, device, change, cli.quiet).await,
        Commands::Mode { mode } => commands::cmd_mode(&config, device, mode, cli.quiet).await,
        Commands::Fan => commands::cmd_fan(&config, device, cli.quiet).await,
        Commands::Swing { axis } => commands::cmd_swing(&config, device, axis, cli.quiet).await,
        Commands::Schedule { action } => match action {
            ScheduleAction::Add { minutes, fields } => {
                commands::cmd_schedule_add(&config, device, minutes, &fields, cli.quiet).await
            }
            ScheduleAction::List => {
                commands::cmd_schedule_list(&config, cli.format, cli.output.as_ref()).await
            }
            ScheduleAction::Edit {
                index,
                minutes,
                fields,
            } => {
                commands::cmd_schedule_edit(&config, cli.device, index, minutes, &fields, cli.quiet)
                    .await
            }
            ScheduleAction::Remove { index } => {
                commands::cmd_schedule_remove(&config, index, cli.quiet).await
            }
        },
    }
}
