//! `hpecp` binary entrypoint.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hpecp_cli::{Cli, CliError};

/// Environment variable holding the log filter, e.g. `LOG_LEVEL=debug`.
const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_LEVEL_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => return CliError::io("Failed to create async runtime", e).report(&mut io::stderr()),
    };

    match runtime.block_on(hpecp_cli::run(&cli)) {
        Ok(output) => {
            let mut stdout = io::stdout().lock();
            match stdout.write_all(output.as_bytes()).and_then(|()| stdout.flush()) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => CliError::io("Failed to write output", e).report(&mut io::stderr()),
            }
        }
        Err(e) => e.report(&mut io::stderr()),
    }
}
