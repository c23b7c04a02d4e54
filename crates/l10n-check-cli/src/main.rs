#![forbid(unsafe_code)]

mod cli;
mod command_check;
mod config;
mod error;
mod report;
mod source;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli::run() {
        Ok(status) => ExitCode::from(status.code()),
        Err(cli::CliAppError::Usage(usage)) => {
            eprintln!("{usage}");
            ExitCode::from(1)
        }
        Err(err) => {
            tracing::error!(error = %err, "check failed");
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}
