//! dnvm - a version manager for the .NET SDK

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use dnvm_cli::Cli;
use dnvm_cli::error_filter::should_suppress;
use dnvm_core::{ConsoleReporter, ToolError};

fn main() -> Result<ExitCode> {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    // Initialize logging
    let default_filter = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let reporter = ConsoleReporter;
    match dnvm_cli::run(&cli, &matches, &reporter) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => match err.downcast_ref::<ToolError>() {
            Some(tool_err) if should_suppress(tool_err, &reporter, cli.debug) => {
                Ok(ExitCode::FAILURE)
            }
            _ => Err(err),
        },
    }
}
