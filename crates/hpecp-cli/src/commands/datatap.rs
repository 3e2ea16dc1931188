//! `hpecp datatap` command implementation.

use hpecp::kinds::{Datatap, HdfsKerberosSpec};
use hpecp::{Controller, Transport};

use super::{line, resource};
use crate::cli::DatatapCommands;
use crate::error::CliError;

/// Executes a DataTap subcommand.
///
/// # Errors
///
/// Returns the first library error.
pub async fn execute<T: Transport>(
    datataps: Controller<'_, Datatap, T>,
    command: &DatatapCommands,
) -> Result<String, CliError> {
    match command {
        DatatapCommands::Resource(c) => resource::execute(datataps, c).await,
        DatatapCommands::CreateHdfsWithKerberos {
            name,
            description,
            path_from_endpoint,
            kdc_data_host,
            kdc_data_port,
            realm,
            client_principal,
            browse_only,
            host,
            keytab,
            backup_host,
            endpoint_type,
            port,
            read_only,
        } => {
            let spec = HdfsKerberosSpec {
                name: name.clone(),
                description: description.clone(),
                path_from_endpoint: path_from_endpoint.clone(),
                kdc_data_host: kdc_data_host.clone(),
                kdc_data_port: kdc_data_port.clone(),
                realm: realm.clone(),
                client_principal: client_principal.clone(),
                browse_only: *browse_only,
                host: host.clone(),
                keytab: keytab.clone(),
                backup_host: backup_host.clone(),
                endpoint_type: endpoint_type.clone(),
                port: *port,
                read_only: *read_only,
            };
            Ok(line(datataps.create_hdfs_with_kerberos(&spec).await?))
        }
    }
}
