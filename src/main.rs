// driveguard: Driver Safety Alert Toolkit
use clap::Parser;
use config::Config;
use std::path::Path;

mod alerts;
mod audio;
mod cli;
mod commands;
mod config;
mod monitor;
mod output;

use cli::args::{Cli, Commands};
use commands::audio::handle_test_audio_command;
use commands::categories::handle_categories_command;
use commands::config::handle_config_action;
use commands::monitor::handle_monitor_command;
use commands::trigger::{handle_emergency_command, handle_trigger_command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // Config subcommands manage the file themselves, including broken ones
        Some(Commands::Config { action }) => {
            handle_config_action(action, cli.config.as_deref(), cli.json);
        }
        command => {
            let config = match &cli.config {
                Some(path) => Config::load_from(Path::new(path)),
                None => Config::load(),
            };
            let config = match config {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error: Failed to load configuration: {e}");
                    std::process::exit(1);
                }
            };

            match command {
                Some(Commands::Trigger {
                    category,
                    confidence,
                    wait,
                    notify,
                }) => {
                    handle_trigger_command(
                        category,
                        confidence,
                        wait,
                        notify,
                        &config,
                        cli.no_audio,
                        cli.json,
                        cli.verbose,
                    )
                    .await?;
                }
                Some(Commands::Emergency { message, notify }) => {
                    handle_emergency_command(message, notify, &config, cli.no_audio, cli.json)
                        .await?;
                }
                Some(Commands::Categories { category }) => {
                    handle_categories_command(category, cli.json)?;
                }
                Some(Commands::TestAudio) => {
                    handle_test_audio_command(&config, cli.json).await?;
                }
                Some(Commands::Monitor {
                    demo,
                    refresh_rate_ms,
                }) => {
                    handle_monitor_command(demo, refresh_rate_ms, &config, cli.no_audio).await?;
                }
                Some(Commands::Config { .. }) => unreachable!("handled above"),
                None => {
                    // No subcommand defaults to the category overview
                    handle_categories_command(None, cli.json)?;
                }
            }
        }
    }

    Ok(())
}
