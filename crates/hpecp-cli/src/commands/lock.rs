//! `hpecp lock` command implementation.

use std::time::Duration;

use hpecp::Transport;
use hpecp::lock::LockController;

use super::{line, resource};
use crate::cli::LockCommands;
use crate::error::CliError;

/// Executes a lock subcommand.
///
/// # Errors
///
/// Returns the first library error, or a usage error when locks could not
/// be cleared in time.
pub async fn execute<T: Transport>(
    locks: LockController<'_, T>,
    command: &LockCommands,
) -> Result<String, CliError> {
    match command {
        LockCommands::List { output } => resource::render_raw(&locks.list().await?, output),
        LockCommands::Create { reason } => Ok(line(locks.create(reason).await?)),
        LockCommands::Delete { id } => {
            locks.delete(id).await?;
            Ok(String::new())
        }
        LockCommands::DeleteAll { timeout_secs } => {
            if locks.delete_all(Duration::from_secs(*timeout_secs)).await? {
                Ok(String::new())
            } else {
                Err(CliError::usage("Could not delete locks."))
            }
        }
    }
}
