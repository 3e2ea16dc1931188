//! CLI command implementations.
//!
//! Every executor returns the complete stdout text instead of writing as it
//! goes, so a failure never leaves partial output behind.
//!
//! - [`resource`] - verbs shared by every kind
//! - [`k8s_cluster`], [`k8s_worker`], [`epic_worker`], [`gateway`],
//!   [`catalog`], [`datatap`], [`tenant`], [`user`] - kind-specific verbs
//! - [`license`], [`lock`], [`platform`] - raw platform operations

pub mod catalog;
pub mod datatap;
pub mod epic_worker;
pub mod gateway;
pub mod k8s_cluster;
pub mod k8s_worker;
pub mod license;
pub mod lock;
pub mod platform;
pub mod resource;
pub mod tenant;
pub mod user;

use std::fmt;

use hpecp::kinds::{Catalog, Datatap, EpicWorker, Gateway, K8sCluster, K8sWorker, Role, Tenant, User};
use hpecp::{Client, Transport};

use crate::cli::{
    CatalogCommands, Commands, DatatapCommands, EpicWorkerCommands, GatewayCommands,
    K8sClusterCommands, K8sWorkerCommands, SshKeyArgs, TenantCommands, UserCommands,
};
use crate::error::CliError;

/// Checks everything that can be checked without the network and answers
/// commands that never need it.
///
/// # Errors
///
/// Returns the first invalid argument.
pub fn preflight(command: &Commands) -> Result<Option<String>, CliError> {
    match command {
        Commands::K8scluster { command } => match command {
            K8sClusterCommands::Resource(c) => resource::preflight::<K8sCluster>(c).map(|()| None),
            K8sClusterCommands::Status(c) => resource::preflight_status::<K8sCluster>(c),
            _ => Ok(None),
        },
        Commands::K8sworker { command } => match command {
            K8sWorkerCommands::Resource(c) => resource::preflight::<K8sWorker>(c).map(|()| None),
            K8sWorkerCommands::Status(c) => resource::preflight_status::<K8sWorker>(c),
            K8sWorkerCommands::CreateWithSshKey { disks, .. } => {
                k8s_worker::preflight_create(disks).map(|()| None)
            }
            K8sWorkerCommands::SetStorage { .. } => Ok(None),
        },
        Commands::Epicworker { command } => match command {
            EpicWorkerCommands::Resource(c) => resource::preflight::<EpicWorker>(c).map(|()| None),
            EpicWorkerCommands::Status(c) => resource::preflight_status::<EpicWorker>(c),
            EpicWorkerCommands::CreateWithSshKey { disks, .. } => {
                k8s_worker::preflight_create(disks).map(|()| None)
            }
            EpicWorkerCommands::SetStorage { .. } => Ok(None),
        },
        Commands::Catalog { command } => match command {
            CatalogCommands::List(args) => resource::list_format::<Catalog>(args).map(|_| None),
            CatalogCommands::Status(c) => resource::preflight_status::<Catalog>(c),
            _ => Ok(None),
        },
        Commands::Datatap { command } => match command {
            DatatapCommands::Resource(c) => resource::preflight::<Datatap>(c).map(|()| None),
            DatatapCommands::CreateHdfsWithKerberos { .. } => Ok(None),
        },
        Commands::Gateway { command } => match command {
            GatewayCommands::Resource(c) => resource::preflight::<Gateway>(c).map(|()| None),
            GatewayCommands::Status(c) => resource::preflight_status::<Gateway>(c),
            GatewayCommands::CreateWithSshKey { .. } => Ok(None),
        },
        Commands::Tenant { command } => match command {
            TenantCommands::Resource(c) => resource::preflight::<Tenant>(c).map(|()| None),
            TenantCommands::Status(c) => resource::preflight_status::<Tenant>(c),
            TenantCommands::Users { list, .. } => resource::list_format::<User>(list).map(|_| None),
            _ => Ok(None),
        },
        Commands::User { command } => match command {
            UserCommands::Resource(c) => resource::preflight::<User>(c).map(|()| None),
            UserCommands::Create { .. } => Ok(None),
        },
        Commands::Role { command } => resource::preflight::<Role>(command).map(|()| None),
        Commands::Config { command } => platform::preflight_config(command).map(|()| None),
        Commands::Install { command } => platform::preflight_install(command).map(|()| None),
        Commands::License { .. } | Commands::Lock { .. } => Ok(None),
    }
}

/// Runs one command against the client and returns what to print.
///
/// # Errors
///
/// Returns the first library or usage error.
pub async fn execute<T: Transport>(client: &Client<T>, command: &Commands) -> Result<String, CliError> {
    match command {
        Commands::K8scluster { command } => k8s_cluster::execute(client.k8s_cluster(), command).await,
        Commands::K8sworker { command } => k8s_worker::execute(client.k8s_worker(), command).await,
        Commands::Epicworker { command } => epic_worker::execute(client.epic_worker(), command).await,
        Commands::Gateway { command } => gateway::execute(client.gateway(), command).await,
        Commands::Catalog { command } => catalog::execute(client.catalog(), command).await,
        Commands::Datatap { command } => datatap::execute(client.datatap(), command).await,
        Commands::Tenant { command } => tenant::execute(client.tenant(), command).await,
        Commands::User { command } => user::execute(client.user(), command).await,
        Commands::Role { command } => resource::execute(client.role(), command).await,
        Commands::License { command } => license::execute(client.license(), command).await,
        Commands::Lock { command } => lock::execute(client.lock(), command).await,
        Commands::Config { command } => platform::execute_config(client.config(), command).await,
        Commands::Install { command } => platform::execute_install(client.install(), command).await,
    }
}

/// Key data from `--ssh-key` or the contents of `--ssh-key-file`.
fn read_ssh_key(args: &SshKeyArgs) -> Result<String, CliError> {
    match (&args.ssh_key, &args.ssh_key_file) {
        (Some(key), None) => Ok(key.clone()),
        (None, Some(path)) => std::fs::read_to_string(path).map_err(|e| {
            CliError::io(format!("Could not open/read ssh-key-file: {}", path.display()), e)
        }),
        _ => Err(CliError::usage("Either ssh_key or ssh_key_file must be provided")),
    }
}

/// `value` followed by a newline.
fn line(value: impl fmt::Display) -> String {
    format!("{value}\n")
}
