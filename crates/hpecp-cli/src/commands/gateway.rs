//! `hpecp gateway` command implementation.

use hpecp::kinds::Gateway;
use hpecp::{Controller, Transport};

use super::{line, read_ssh_key, resource};
use crate::cli::GatewayCommands;
use crate::error::CliError;

/// Executes a gateway subcommand.
///
/// # Errors
///
/// Returns the first library or usage error.
pub async fn execute<T: Transport>(
    gateways: Controller<'_, Gateway, T>,
    command: &GatewayCommands,
) -> Result<String, CliError> {
    match command {
        GatewayCommands::Resource(c) => resource::execute(gateways, c).await,
        GatewayCommands::Status(c) => resource::execute_status(gateways, c).await,
        GatewayCommands::CreateWithSshKey {
            ip,
            proxy_node_hostname,
            key,
        } => {
            let ssh_key = read_ssh_key(key)?;
            let id = gateways
                .create_with_ssh_key(ip, proxy_node_hostname, &ssh_key, &[])
                .await?;
            Ok(line(id))
        }
    }
}
