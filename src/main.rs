//! asg-sync configuration tool
//!
//! Loads the sync configuration, validates it and prints what the sync
//! driver would use.

use asg_sync::cli::{self, Cli, Command};
use asg_sync::config::Config;
use asg_sync::error::AppError;
use asg_sync::telemetry;
use clap::Parser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    telemetry::init(&cli.log_level);

    match cli.command.unwrap_or(Command::Check) {
        Command::Config { output } => write_template(output)?,
        Command::Check => {
            let config = load(&cli.config)?;
            tracing::info!(
                region = %config.region,
                sync_interval_seconds = config.sync_interval.as_secs(),
                upstreams = config.upstreams.len(),
                "Configuration {} is valid",
                cli.config
            );
        }
        Command::Params => {
            let config = load(&cli.config)?;
            print!("{}", cli::render_params(&config));
        }
        Command::Show { format } => {
            let config = load(&cli.config)?;
            print!("{}", cli::render_config(&config, format)?);
        }
    }

    Ok(())
}

fn load(path: &str) -> Result<Config, AppError> {
    Config::from_file(path).inspect_err(|e| {
        tracing::error!(error = %e, "Configuration rejected");
    })
}

fn write_template(output: Option<String>) -> Result<(), AppError> {
    let template = cli::generate_config_template();
    match output {
        Some(path) => {
            std::fs::write(&path, template).map_err(|source| AppError::OutputWrite {
                path: path.clone(),
                source,
            })?;
            tracing::info!("Wrote template configuration to {}", path);
        }
        None => print!("{}", template),
    }
    Ok(())
}
