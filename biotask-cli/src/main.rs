mod cli;
mod commands;

use std::process::ExitCode;

use biotask_core::AppConfig;
use clap::Parser;
use cli::Cli;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    debug!(command = ?cli.command, config = ?cli.config, "CLI arguments parsed");

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "Failed to load configuration");
            eprintln!("{}", err.user_message());
            return ExitCode::FAILURE;
        }
    };
    info!("Configuration loaded");

    match commands::dispatch(cli.command, config).await {
        Ok(output) => {
            if cli.json {
                match serde_json::to_string_pretty(&output.json) {
                    Ok(body) => println!("{body}"),
                    Err(_) => println!("{}", output.json),
                }
            } else {
                println!("{}", output.text);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "Command failed");
            eprintln!("{}", err.user_message());
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .with_writer(std::io::stderr)
            .init();
    });
}
