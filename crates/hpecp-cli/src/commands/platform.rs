//! `hpecp config` and `hpecp install` command implementations.

use std::path::Path;

use hpecp::install::{InstallController, PemFile};
use hpecp::platform::PlatformConfigController;
use hpecp::{OutputFormat, Transport};

use crate::cli::{ConfigCommands, InstallCommands, RawGetArgs, RawOutput};
use crate::error::CliError;

/// Validated format of a settings `get`.
///
/// # Errors
///
/// Returns a usage error for a query with yaml output, or a validation
/// error for a query that doesn't compile.
pub fn raw_format(args: &RawGetArgs) -> Result<OutputFormat, CliError> {
    if args.output == RawOutput::Yaml && args.query.is_some() {
        return Err(CliError::usage(
            "output=yaml is not supported with the query parameter.",
        ));
    }
    Ok(OutputFormat::with_query(args.output.into(), args.query.as_deref())?)
}

/// Argument checks that need no session.
///
/// # Errors
///
/// See [`raw_format`].
pub fn preflight_config(command: &ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get(args) => raw_format(args).map(|_| ()),
    }
}

/// Argument checks that need no session.
///
/// # Errors
///
/// See [`raw_format`].
pub fn preflight_install(command: &InstallCommands) -> Result<(), CliError> {
    match command {
        InstallCommands::Get(args) => raw_format(args).map(|_| ()),
        InstallCommands::SetGatewaySsl { .. } => Ok(()),
    }
}

/// Executes a config subcommand.
///
/// # Errors
///
/// Returns the first library or usage error.
pub async fn execute_config<T: Transport>(
    config: PlatformConfigController<'_, T>,
    command: &ConfigCommands,
) -> Result<String, CliError> {
    match command {
        ConfigCommands::Get(args) => {
            let format = raw_format(args)?;
            Ok(format.render_value(&config.get().await?)?)
        }
    }
}

/// Executes an install subcommand.
///
/// # Errors
///
/// Returns the first library, usage or file error.
pub async fn execute_install<T: Transport>(
    install: InstallController<'_, T>,
    command: &InstallCommands,
) -> Result<String, CliError> {
    match command {
        InstallCommands::Get(args) => {
            let format = raw_format(args)?;
            Ok(format.render_value(&install.get().await?)?)
        }
        InstallCommands::SetGatewaySsl {
            cert_file,
            cert_content,
            cert_file_name,
            key_file,
            key_content,
            key_file_name,
        } => {
            let cert = pem_file(
                "cert",
                cert_file.as_deref(),
                cert_content.as_deref(),
                cert_file_name.as_deref(),
            )?;
            let key = pem_file(
                "key",
                key_file.as_deref(),
                key_content.as_deref(),
                key_file_name.as_deref(),
            )?;
            install.set_gateway_ssl(&cert, &key).await?;
            Ok(String::new())
        }
    }
}

/// A PEM given as a file, or as content plus the name to store it under.
/// A file is stored under the path it was read from.
fn pem_file(
    what: &str,
    file: Option<&Path>,
    content: Option<&str>,
    file_name: Option<&str>,
) -> Result<PemFile, CliError> {
    match (file, content, file_name) {
        (Some(path), None, None) => {
            let content = std::fs::read_to_string(path).map_err(|e| {
                CliError::io(format!("Could not open/read '{what}-file': {}", path.display()), e)
            })?;
            Ok(PemFile {
                content,
                file_name: path.display().to_string(),
            })
        }
        (None, Some(content), Some(file_name)) => Ok(PemFile {
            content: content.to_string(),
            file_name: file_name.to_string(),
        }),
        _ => Err(CliError::usage(format!(
            "('{what}-content' and '{what}-file-name') or '{what}-file' must be provided."
        ))),
    }
}
