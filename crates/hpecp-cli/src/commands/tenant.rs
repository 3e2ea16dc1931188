//! `hpecp tenant` command implementation.

use hpecp::kinds::{Tenant, TenantSpec, User};
use hpecp::{Controller, OutputFormat, OutputMode, Transport};
use serde_json::Value;

use super::{line, resource};
use crate::cli::TenantCommands;
use crate::error::CliError;

/// Executes a tenant subcommand.
///
/// # Errors
///
/// Returns the first library error.
pub async fn execute<T: Transport>(
    tenants: Controller<'_, Tenant, T>,
    command: &TenantCommands,
) -> Result<String, CliError> {
    match command {
        TenantCommands::Resource(c) => resource::execute(tenants, c).await,
        TenantCommands::Status(c) => resource::execute_status(tenants, c).await,
        TenantCommands::Create {
            name,
            description,
            tenant_type,
            k8s_cluster_id,
        } => {
            let spec = TenantSpec {
                name: name.clone(),
                description: description.clone(),
                tenant_type: tenant_type.clone(),
                k8s_cluster_id: k8s_cluster_id.clone(),
            };
            Ok(line(tenants.create_tenant(&spec).await?))
        }
        TenantCommands::K8skubeconfig => {
            let config = tenants.k8skubeconfig().await?;
            Ok(line(config.trim_end_matches('\n')))
        }
        TenantCommands::Users { id, list } => {
            let (format, columns) = resource::list_format::<User>(list)?;
            let users = tenants.users(id).await?.with_columns(&columns)?;
            Ok(format.render(&users)?)
        }
        TenantCommands::AssignUserToRole {
            tenant_id,
            user_id,
            role_id,
        } => {
            tenants
                .assign_user_to_role(tenant_id, role_id, user_id)
                .await?;
            Ok(String::new())
        }
        TenantCommands::RevokeUserFromRole {
            tenant_id,
            user_id,
            role_id,
        } => {
            tenants
                .revoke_user_from_role(tenant_id, role_id, user_id)
                .await?;
            Ok(String::new())
        }
        TenantCommands::GetExternalUserGroups { tenant_id } => {
            let groups = tenants.get_external_user_groups(tenant_id).await?;
            Ok(OutputFormat::new(OutputMode::Yaml).render_value(&Value::Array(groups))?)
        }
        TenantCommands::AddExternalUserGroup {
            tenant_id,
            group,
            role_id,
        } => {
            tenants
                .add_external_user_group(tenant_id, group, role_id)
                .await?;
            Ok(String::new())
        }
        TenantCommands::DeleteExternalUserGroup { tenant_id, group } => {
            tenants
                .delete_external_user_group(tenant_id, group)
                .await?;
            Ok(String::new())
        }
    }
}
