//! `hpecp user` command implementation.

use hpecp::kinds::{User, UserSpec};
use hpecp::{Controller, Transport};

use super::{line, resource};
use crate::cli::UserCommands;
use crate::error::CliError;

/// Executes a user subcommand.
///
/// # Errors
///
/// Returns the first library error.
pub async fn execute<T: Transport>(
    users: Controller<'_, User, T>,
    command: &UserCommands,
) -> Result<String, CliError> {
    match command {
        UserCommands::Resource(c) => resource::execute(users, c).await,
        UserCommands::Create {
            name,
            password,
            description,
            is_external,
        } => {
            let spec = UserSpec {
                name: name.clone(),
                password: password.clone(),
                description: description.clone(),
                is_external: *is_external,
            };
            Ok(line(users.create_user(&spec).await?))
        }
    }
}
