//! Main entry point for the `pothole` command-line client.
//!
//! Loads configuration, installs logging, restores the persisted session and
//! dispatches the requested command through the navigation gate.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use pothole_client::{telemetry, ClientConfig, ClientError};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ClientConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => return report(ClientError::from(err)),
    };
    telemetry::init(&config.log_level);

    match cli::run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            report(err)
        }
    }
}

fn report(err: ClientError) -> ExitCode {
    eprintln!("error: {err}");
    if err.is_unauthorized() {
        eprintln!("hint: the saved session may have expired, run `pothole logout` and log in again");
    }
    ExitCode::FAILURE
}
