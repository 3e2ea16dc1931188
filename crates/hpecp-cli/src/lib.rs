//! # hpecp-cli
//!
//! Command-line front end for the HPE Container Platform.
//!
//! Arguments are parsed into typed commands, checked without the network
//! where possible, and dispatched to exactly one client operation. The
//! output is rendered in full before anything is printed; errors end up as
//! one line on stderr and exit code 1.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;

use std::path::PathBuf;

use hpecp::config::{ClientConfig, default_config_path};
use hpecp::Client;

pub use cli::{Cli, Commands, Output};
pub use error::CliError;

/// Runs a parsed command line and returns what to print on stdout.
///
/// # Errors
///
/// Returns the first argument, configuration, library or usage error.
pub async fn run(cli: &Cli) -> Result<String, CliError> {
    if let Some(output) = commands::preflight(&cli.command)? {
        return Ok(output);
    }

    let config = ClientConfig::from_file(config_path(cli), &cli.profile)?;
    let client = Client::connect(&config).await?;
    commands::execute(&client, &cli.command).await
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(default_config_path)
}
