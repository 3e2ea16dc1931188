//! `hpecp catalog` command implementation.

use hpecp::kinds::Catalog;
use hpecp::{Controller, Transport};

use super::resource;
use crate::cli::CatalogCommands;
use crate::error::CliError;

/// Executes a catalog subcommand.
///
/// # Errors
///
/// Returns the first library error.
pub async fn execute<T: Transport>(
    catalog: Controller<'_, Catalog, T>,
    command: &CatalogCommands,
) -> Result<String, CliError> {
    match command {
        CatalogCommands::Get { id, output } => resource::get(catalog, id, *output).await,
        CatalogCommands::List(args) => resource::list(catalog, args).await,
        CatalogCommands::Status(c) => resource::execute_status(catalog, c).await,
        CatalogCommands::Install { id } => {
            catalog.install(id).await?;
            Ok(String::new())
        }
        CatalogCommands::Refresh { id } => {
            catalog.refresh(id).await?;
            Ok(String::new())
        }
    }
}
