//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use hpecp::OutputMode;
use hpecp::config::{CONFIG_FILE_ENV, DEFAULT_PROFILE, PROFILE_ENV};

/// HPE Container Platform command-line client.
#[derive(Parser, Debug, Clone)]
#[command(name = "hpecp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Profile section of the config file.
    #[arg(long, global = true, env = PROFILE_ENV, default_value = DEFAULT_PROFILE)]
    pub profile: String,

    /// Config file, `~/.hpecp.conf` when unset.
    #[arg(long, global = true, env = CONFIG_FILE_ENV)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output modes accepted by `get` and `list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Output {
    /// Bordered grid with headers.
    Table,
    /// Tab-separated rows without headers.
    Text,
    /// Compact JSON.
    Json,
    /// Indented JSON.
    JsonPp,
    /// YAML.
    Yaml,
}

impl From<Output> for OutputMode {
    fn from(output: Output) -> Self {
        match output {
            Output::Table => Self::Table,
            Output::Text => Self::Text,
            Output::Json => Self::Json,
            Output::JsonPp => Self::JsonPretty,
            Output::Yaml => Self::Yaml,
        }
    }
}

/// Top-level subcommands, one per resource kind.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Kubernetes clusters.
    K8scluster {
        /// Cluster subcommand to execute.
        #[command(subcommand)]
        command: K8sClusterCommands,
    },

    /// Kubernetes worker hosts.
    K8sworker {
        /// Worker subcommand to execute.
        #[command(subcommand)]
        command: K8sWorkerCommands,
    },

    /// Gateway hosts.
    Gateway {
        /// Gateway subcommand to execute.
        #[command(subcommand)]
        command: GatewayCommands,
    },

    /// EPIC worker hosts.
    Epicworker {
        /// Worker subcommand to execute.
        #[command(subcommand)]
        command: EpicWorkerCommands,
    },

    /// Application catalog images.
    Catalog {
        /// Catalog subcommand to execute.
        #[command(subcommand)]
        command: CatalogCommands,
    },

    /// DataTaps.
    Datatap {
        /// DataTap subcommand to execute.
        #[command(subcommand)]
        command: DatatapCommands,
    },

    /// Tenants.
    Tenant {
        /// Tenant subcommand to execute.
        #[command(subcommand)]
        command: TenantCommands,
    },

    /// Users.
    User {
        /// User subcommand to execute.
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Roles.
    Role {
        /// Role subcommand to execute.
        #[command(subcommand)]
        command: ResourceCommands,
    },

    /// Licenses.
    License {
        /// License subcommand to execute.
        #[command(subcommand)]
        command: LicenseCommands,
    },

    /// Site locks.
    Lock {
        /// Lock subcommand to execute.
        #[command(subcommand)]
        command: LockCommands,
    },

    /// Platform settings.
    Config {
        /// Config subcommand to execute.
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Installer settings.
    Install {
        /// Install subcommand to execute.
        #[command(subcommand)]
        command: InstallCommands,
    },
}

/// Output modes of raw settings documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RawOutput {
    /// YAML.
    Yaml,
    /// Compact JSON.
    Json,
    /// Indented JSON.
    JsonPp,
    /// Plain text.
    Text,
}

impl From<RawOutput> for OutputMode {
    fn from(output: RawOutput) -> Self {
        match output {
            RawOutput::Yaml => Self::Yaml,
            RawOutput::Json => Self::Json,
            RawOutput::JsonPp => Self::JsonPretty,
            RawOutput::Text => Self::Text,
        }
    }
}

/// Arguments of a settings `get`.
#[derive(Args, Debug, Clone)]
pub struct RawGetArgs {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = RawOutput::Yaml)]
    pub output: RawOutput,

    /// JMESPath query; not supported with yaml output.
    #[arg(short, long)]
    pub query: Option<String>,
}

/// Verbs shared by every kind.
#[derive(Subcommand, Debug, Clone)]
pub enum ResourceCommands {
    /// Show one resource.
    Get {
        /// Resource id, e.g. `/api/v1/workers/1`.
        id: String,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = Output::Yaml)]
        output: Output,
    },

    /// List resources.
    List(ListArgs),

    /// Delete a resource.
    Delete {
        /// Resource id.
        id: String,

        /// Wait up to this many seconds for the deletion to finish (0 = don't wait).
        #[arg(long, default_value_t = 0)]
        wait_for_delete_sec: u64,
    },
}

/// Arguments of `list`.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Output::Table)]
    pub output: Output,

    /// `DEFAULT`, `WIDE` or a comma-separated column list.
    #[arg(short, long, default_value = "DEFAULT")]
    pub columns: String,

    /// JMESPath query; requires json, json-pp or text output.
    #[arg(short, long)]
    pub query: Option<String>,
}

/// Verbs of kinds that report a status.
#[derive(Subcommand, Debug, Clone)]
pub enum StatusCommands {
    /// Wait until the resource reports one of the given statuses.
    WaitForStatus {
        /// Resource id.
        id: String,

        /// Comma-separated statuses to wait for.
        #[arg(long)]
        status: String,

        /// Give up after this many seconds.
        #[arg(long, default_value_t = 60)]
        timeout_secs: u64,
    },

    /// Wait until the resource no longer exists.
    WaitForDelete {
        /// Resource id.
        id: String,

        /// Give up after this many seconds.
        #[arg(long, default_value_t = 1200)]
        timeout_secs: u64,
    },

    /// Print the valid statuses.
    Statuses,
}

/// SSH key given inline or as a file.
#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("key").required(true).args(["ssh_key", "ssh_key_file"])))]
pub struct SshKeyArgs {
    /// SSH private key data.
    #[arg(long)]
    pub ssh_key: Option<String>,

    /// Path to an SSH private key.
    #[arg(long)]
    pub ssh_key_file: Option<PathBuf>,
}

/// Kubernetes cluster subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum K8sClusterCommands {
    /// Shared resource verbs.
    #[command(flatten)]
    Resource(ResourceCommands),

    /// Status verbs.
    #[command(flatten)]
    Status(StatusCommands),

    /// Create a cluster and print its id.
    Create {
        /// Cluster name.
        #[arg(long)]
        name: String,

        /// Hosts as `node:role`, comma-separated, e.g.
        /// `/api/v2/worker/k8shost/1:master`.
        #[arg(long, value_delimiter = ',', required = true)]
        k8shosts_config: Vec<String>,

        /// Description.
        #[arg(long)]
        description: Option<String>,

        /// Kubernetes version.
        #[arg(long)]
        k8s_version: Option<String>,

        /// Pod network CIDR.
        #[arg(long, default_value = "10.192.0.0/12")]
        pod_network_range: String,

        /// Service network CIDR.
        #[arg(long, default_value = "10.96.0.0/12")]
        service_network_range: String,

        /// Pod DNS domain.
        #[arg(long, default_value = "cluster.local")]
        pod_dns_domain: String,

        /// Enable local persistent storage.
        #[arg(long)]
        persistent_storage_local: bool,

        /// Install the Nimble CSI plugin.
        #[arg(long)]
        persistent_storage_nimble_csi: bool,

        /// Addons, comma-separated.
        #[arg(long, value_delimiter = ',')]
        addons: Vec<String>,
    },

    /// Print the admin kubeconfig.
    AdminKubeConfig {
        /// Cluster id.
        id: String,
    },

    /// Print the dashboard URL.
    DashboardUrl {
        /// Cluster id.
        id: String,
    },

    /// Print the decoded dashboard token.
    DashboardToken {
        /// Cluster id.
        id: String,
    },

    /// Print the platform's Kubernetes manifest.
    K8smanifest,

    /// Print the supported Kubernetes versions.
    K8sSupportedVersions {
        /// `json` or `text`.
        #[arg(long, default_value = "json", value_parser = ["json", "text"])]
        output: String,

        /// Keep only this major version.
        #[arg(long)]
        major_filter: Option<u32>,

        /// Keep only this minor version.
        #[arg(long)]
        minor_filter: Option<u32>,

        /// Keep only this patch version.
        #[arg(long)]
        patch_filter: Option<u32>,
    },

    /// Print the addons installed on a cluster.
    GetInstalledAddons {
        /// Cluster id.
        id: String,
    },

    /// Print the addons available for a cluster or version.
    #[command(group(ArgGroup::new("target").required(true).args(["id", "k8s_version"])))]
    GetAvailableAddons {
        /// Cluster id.
        #[arg(long)]
        id: Option<String>,

        /// Kubernetes version.
        #[arg(long)]
        k8s_version: Option<String>,
    },

    /// Add addons to a cluster.
    AddAddons {
        /// Cluster id.
        #[arg(long)]
        id: String,

        /// Addons, comma-separated.
        #[arg(long, value_delimiter = ',', required = true)]
        addons: Vec<String>,

        /// Wait up to this many seconds for the cluster to be ready again.
        #[arg(long, default_value_t = 0)]
        wait_for_ready_sec: u64,
    },

    /// Upgrade a cluster's Kubernetes version.
    UpgradeCluster {
        /// Cluster id.
        #[arg(long)]
        id: String,

        /// Target Kubernetes version.
        #[arg(long)]
        k8s_upgrade_version: String,

        /// Percentage of workers upgraded at a time.
        #[arg(long, default_value_t = 20)]
        worker_upgrade_percent: u8,
    },

    /// Import an existing cluster and print its id.
    ImportGenericCluster {
        /// Cluster name.
        #[arg(long)]
        name: String,

        /// Description.
        #[arg(long, default_value = "")]
        description: String,

        /// Pod DNS domain.
        #[arg(long, default_value = "cluster.local")]
        pod_dns_domain: String,

        /// API server URL.
        #[arg(long)]
        server_url: String,

        /// Base64 CA certificate.
        #[arg(long)]
        ca: String,

        /// Bearer token.
        #[arg(long)]
        bearer_token: String,
    },
}

/// Kubernetes worker subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum K8sWorkerCommands {
    /// Shared resource verbs.
    #[command(flatten)]
    Resource(ResourceCommands),

    /// Status verbs.
    #[command(flatten)]
    Status(StatusCommands),

    /// Add a host using ssh-key access and print its id.
    CreateWithSshKey {
        /// Host ip address.
        #[arg(long)]
        ip: String,

        /// Key to install with.
        #[command(flatten)]
        key: SshKeyArgs,

        /// Disks to assign once the host is waiting for storage.
        #[command(flatten)]
        disks: CreateDisksArgs,
    },

    /// Assign disks on a host.
    SetStorage {
        /// Worker id.
        #[arg(long)]
        id: String,

        /// Ephemeral disks, comma-separated.
        #[arg(long, value_delimiter = ',', required = true)]
        ephemeral_disks: Vec<String>,

        /// Persistent disks, comma-separated.
        #[arg(long, value_delimiter = ',')]
        persistent_disks: Vec<String>,
    },
}

/// Disk assignment at create time.
#[derive(Args, Debug, Clone)]
pub struct CreateDisksArgs {
    /// Ephemeral disks, comma-separated. Requires `--wait-for-operation-secs`.
    #[arg(long, value_delimiter = ',')]
    pub ephemeral_disks: Vec<String>,

    /// Persistent disks, comma-separated.
    #[arg(long, value_delimiter = ',')]
    pub persistent_disks: Vec<String>,

    /// Wait up to this many seconds for each install step (0 = don't wait).
    #[arg(long, default_value_t = 0)]
    pub wait_for_operation_secs: u64,
}

/// EPIC worker subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum EpicWorkerCommands {
    /// Shared resource verbs.
    #[command(flatten)]
    Resource(ResourceCommands),

    /// Status verbs.
    #[command(flatten)]
    Status(StatusCommands),

    /// Add a worker using ssh-key access and print its id.
    CreateWithSshKey {
        /// Worker ip address.
        #[arg(long)]
        ip: String,

        /// Key to install with.
        #[command(flatten)]
        key: SshKeyArgs,

        /// Disks to assign once the worker is waiting for storage.
        #[command(flatten)]
        disks: CreateDisksArgs,
    },

    /// Assign container and HDFS disks on a worker.
    SetStorage {
        /// Worker id.
        #[arg(long)]
        id: String,

        /// Container disks, comma-separated.
        #[arg(long, value_delimiter = ',', required = true)]
        ephemeral_disks: Vec<String>,

        /// HDFS disks, comma-separated.
        #[arg(long, value_delimiter = ',')]
        persistent_disks: Vec<String>,
    },
}

/// Catalog subcommands. Catalog images can't be deleted.
#[derive(Subcommand, Debug, Clone)]
pub enum CatalogCommands {
    /// Show one image.
    Get {
        /// Image id, e.g. `/api/v1/catalog/29`.
        id: String,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = Output::Yaml)]
        output: Output,
    },

    /// List images.
    List(ListArgs),

    /// Status verbs.
    #[command(flatten)]
    Status(StatusCommands),

    /// Install an image.
    Install {
        /// Image id.
        id: String,
    },

    /// Refresh an image from its feed.
    Refresh {
        /// Image id.
        id: String,
    },
}

/// DataTap subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum DatatapCommands {
    /// Shared resource verbs.
    #[command(flatten)]
    Resource(ResourceCommands),

    /// Create a Kerberos-secured HDFS DataTap and print its id.
    CreateHdfsWithKerberos {
        /// DataTap name.
        #[arg(long)]
        name: String,

        /// Description.
        #[arg(long, default_value = "")]
        description: String,

        /// Sub-path of the endpoint to root the tap at.
        #[arg(long, default_value = "")]
        path_from_endpoint: String,

        /// KDC host.
        #[arg(long)]
        kdc_data_host: String,

        /// KDC port.
        #[arg(long, default_value = "")]
        kdc_data_port: String,

        /// Kerberos realm.
        #[arg(long)]
        realm: String,

        /// Client principal.
        #[arg(long)]
        client_principal: String,

        /// Only allow browsing.
        #[arg(long, action = clap::ArgAction::Set, required = true)]
        browse_only: bool,

        /// HDFS name node.
        #[arg(long)]
        host: String,

        /// Base64 keytab of the client principal.
        #[arg(long)]
        keytab: String,

        /// Standby name node.
        #[arg(long, default_value = "")]
        backup_host: String,

        /// Endpoint type.
        #[arg(long = "type", default_value = "hdfs")]
        endpoint_type: String,

        /// Name node port.
        #[arg(long, default_value_t = 8020)]
        port: u16,

        /// Mount read-only.
        #[arg(long, action = clap::ArgAction::Set, required = true)]
        read_only: bool,
    },
}

/// Gateway subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum GatewayCommands {
    /// Shared resource verbs.
    #[command(flatten)]
    Resource(ResourceCommands),

    /// Status verbs.
    #[command(flatten)]
    Status(StatusCommands),

    /// Add a gateway using ssh-key access and print its id.
    CreateWithSshKey {
        /// Gateway ip address.
        #[arg(long)]
        ip: String,

        /// Externally visible host name.
        #[arg(long)]
        proxy_node_hostname: String,

        /// Key to install with.
        #[command(flatten)]
        key: SshKeyArgs,
    },
}

/// Tenant subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum TenantCommands {
    /// Shared resource verbs.
    #[command(flatten)]
    Resource(ResourceCommands),

    /// Status verbs.
    #[command(flatten)]
    Status(StatusCommands),

    /// Create a tenant and print its id.
    Create {
        /// Tenant name.
        #[arg(long)]
        name: String,

        /// Description.
        #[arg(long)]
        description: Option<String>,

        /// Tenant type, e.g. `k8s`.
        #[arg(long)]
        tenant_type: Option<String>,

        /// Cluster the tenant lives on.
        #[arg(long)]
        k8s_cluster_id: String,
    },

    /// Print the kubeconfig of the current tenant session.
    K8skubeconfig,

    /// List the users of a tenant.
    Users {
        /// Tenant id.
        id: String,

        /// List options.
        #[command(flatten)]
        list: ListArgs,
    },

    /// Give a user a role in a tenant.
    AssignUserToRole {
        /// Tenant id.
        #[arg(long)]
        tenant_id: String,

        /// User id.
        #[arg(long)]
        user_id: String,

        /// Role id.
        #[arg(long)]
        role_id: String,
    },

    /// Remove a user's role in a tenant.
    RevokeUserFromRole {
        /// Tenant id.
        #[arg(long)]
        tenant_id: String,

        /// User id.
        #[arg(long)]
        user_id: String,

        /// Role id.
        #[arg(long)]
        role_id: String,
    },

    /// Print the external user groups of a tenant.
    GetExternalUserGroups {
        /// Tenant id.
        #[arg(long)]
        tenant_id: String,
    },

    /// Map an external group to a role.
    AddExternalUserGroup {
        /// Tenant id.
        #[arg(long)]
        tenant_id: String,

        /// Group distinguished name.
        #[arg(long)]
        group: String,

        /// Role id.
        #[arg(long)]
        role_id: String,
    },

    /// Remove an external group mapping.
    DeleteExternalUserGroup {
        /// Tenant id.
        #[arg(long)]
        tenant_id: String,

        /// Group distinguished name.
        #[arg(long)]
        group: String,
    },
}

/// User subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum UserCommands {
    /// Shared resource verbs.
    #[command(flatten)]
    Resource(ResourceCommands),

    /// Create a user and print its id.
    Create {
        /// Login name.
        #[arg(long)]
        name: String,

        /// Password, omitted for external users.
        #[arg(long)]
        password: Option<String>,

        /// Description.
        #[arg(long, default_value = "")]
        description: String,

        /// Authenticated by an external directory.
        #[arg(long)]
        is_external: bool,
    },
}

/// License subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum LicenseCommands {
    /// Print the platform id.
    PlatformId,

    /// Print the installed licenses.
    List {
        /// `yaml` or `json`.
        #[arg(short, long, default_value = "yaml", value_parser = ["yaml", "json"])]
        output: String,

        /// Print only the license keys, one per line.
        #[arg(long)]
        license_key_only: bool,
    },

    /// Register a license file already copied to the controller.
    Register {
        /// Path on the controller, e.g. `/srv/bluedata/license/LICENSE-1.txt`.
        server_filename: String,
    },

    /// Delete a license by key.
    Delete {
        /// License key.
        license_key: String,
    },

    /// Delete every license.
    DeleteAll,
}

/// Lock subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum LockCommands {
    /// Print the current locks.
    List {
        /// `yaml` or `json`.
        #[arg(short, long, default_value = "yaml", value_parser = ["yaml", "json"])]
        output: String,
    },

    /// Take a lock and print its id.
    Create {
        /// Why the site is locked.
        reason: String,
    },

    /// Release a lock.
    Delete {
        /// Lock id, e.g. `/api/v1/lock/3`.
        id: String,
    },

    /// Wait for internal locks to clear, then release every lock.
    DeleteAll {
        /// Give up after this many seconds.
        #[arg(long, default_value_t = 300)]
        timeout_secs: u64,
    },
}

/// Platform settings subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the platform settings.
    Get(RawGetArgs),
}

/// Installer subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum InstallCommands {
    /// Print the installer settings.
    Get(RawGetArgs),

    /// Install a TLS certificate and key on the gateways.
    #[command(group(ArgGroup::new("cert").required(true).args(["cert_file", "cert_content"])))]
    #[command(group(ArgGroup::new("key").required(true).args(["key_file", "key_content"])))]
    SetGatewaySsl {
        /// Certificate PEM file.
        #[arg(long, conflicts_with_all = ["cert_content", "cert_file_name"])]
        cert_file: Option<PathBuf>,

        /// Certificate PEM text.
        #[arg(long, requires = "cert_file_name")]
        cert_content: Option<String>,

        /// File name to store the certificate under.
        #[arg(long, requires = "cert_content")]
        cert_file_name: Option<String>,

        /// Key PEM file.
        #[arg(long, conflicts_with_all = ["key_content", "key_file_name"])]
        key_file: Option<PathBuf>,

        /// Key PEM text.
        #[arg(long, requires = "key_file_name")]
        key_content: Option<String>,

        /// File name to store the key under.
        #[arg(long, requires = "key_content")]
        key_file_name: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_parses_gateway_list() {
        let cli = Cli::parse_from(["hpecp", "gateway", "list", "--output", "json-pp", "--query", "[*].ip"]);
        match cli.command {
            Commands::Gateway {
                command: GatewayCommands::Resource(ResourceCommands::List(args)),
            } => {
                assert_eq!(args.output, Output::JsonPp);
                assert_eq!(args.columns, "DEFAULT");
                assert_eq!(args.query.as_deref(), Some("[*].ip"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_parses_wait_for_status_defaults() {
        let cli = Cli::parse_from([
            "hpecp",
            "k8scluster",
            "wait-for-status",
            "/api/v2/k8scluster/1",
            "--status",
            "ready,error",
        ]);
        match cli.command {
            Commands::K8scluster {
                command:
                    K8sClusterCommands::Status(StatusCommands::WaitForStatus {
                        id,
                        status,
                        timeout_secs,
                    }),
            } => {
                assert_eq!(id, "/api/v2/k8scluster/1");
                assert_eq!(status, "ready,error");
                assert_eq!(timeout_secs, 60);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["hpecp", "role", "list", "--profile", "tenant2", "--config", "/tmp/x.conf"]);
        assert_eq!(cli.profile, "tenant2");
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/x.conf")));
    }

    #[test]
    fn cli_get_defaults_to_yaml() {
        let cli = Cli::parse_from(["hpecp", "user", "get", "/api/v1/user/5"]);
        assert!(matches!(
            cli.command,
            Commands::User {
                command: UserCommands::Resource(ResourceCommands::Get { output: Output::Yaml, .. })
            }
        ));
    }

    #[test]
    fn cli_requires_exactly_one_ssh_key_source() {
        let both = Cli::try_parse_from([
            "hpecp",
            "gateway",
            "create-with-ssh-key",
            "--ip",
            "10.0.0.1",
            "--proxy-node-hostname",
            "gw",
            "--ssh-key",
            "KEY",
            "--ssh-key-file",
            "/tmp/key",
        ]);
        assert!(both.is_err());

        let none = Cli::try_parse_from([
            "hpecp",
            "gateway",
            "create-with-ssh-key",
            "--ip",
            "10.0.0.1",
            "--proxy-node-hostname",
            "gw",
        ]);
        assert!(none.is_err());
    }

    #[test]
    fn cli_splits_host_configs() {
        let cli = Cli::parse_from([
            "hpecp",
            "k8scluster",
            "create",
            "--name",
            "c1",
            "--k8shosts-config",
            "/api/v2/worker/k8shost/1:master,/api/v2/worker/k8shost/2:worker",
        ]);
        match cli.command {
            Commands::K8scluster {
                command: K8sClusterCommands::Create { k8shosts_config, .. },
            } => assert_eq!(k8shosts_config.len(), 2),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_catalog_has_no_delete() {
        assert!(Cli::try_parse_from(["hpecp", "catalog", "delete", "/api/v1/catalog/1"]).is_err());
        let cli = Cli::parse_from(["hpecp", "catalog", "install", "/api/v1/catalog/1"]);
        assert!(matches!(
            cli.command,
            Commands::Catalog {
                command: CatalogCommands::Install { .. }
            }
        ));
    }

    #[test]
    fn cli_datatap_takes_explicit_bools() {
        let cli = Cli::parse_from([
            "hpecp",
            "datatap",
            "create-hdfs-with-kerberos",
            "--name",
            "MyDataTap",
            "--kdc-data-host",
            "10.1.0.30",
            "--realm",
            "EXAMPLE.COM",
            "--client-principal",
            "hdfs-admin@EXAMPLE.COM",
            "--browse-only",
            "true",
            "--host",
            "10.1.0.31",
            "--keytab",
            "KEYTAB",
            "--read-only",
            "false",
        ]);
        match cli.command {
            Commands::Datatap {
                command:
                    DatatapCommands::CreateHdfsWithKerberos {
                        browse_only,
                        read_only,
                        endpoint_type,
                        port,
                        ..
                    },
            } => {
                assert!(browse_only);
                assert!(!read_only);
                assert_eq!(endpoint_type, "hdfs");
                assert_eq!(port, 8020);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_gateway_ssl_needs_content_with_name() {
        let half = Cli::try_parse_from([
            "hpecp",
            "install",
            "set-gateway-ssl",
            "--cert-content",
            "CERT",
            "--key-file",
            "/tmp/key.pem",
        ]);
        assert!(half.is_err());

        let mixed = Cli::try_parse_from([
            "hpecp",
            "install",
            "set-gateway-ssl",
            "--cert-file",
            "/tmp/cert.pem",
            "--cert-file-name",
            "cert.pem",
            "--key-file",
            "/tmp/key.pem",
        ]);
        assert!(mixed.is_err());
    }

    #[test]
    fn cli_config_get_defaults_to_yaml() {
        let cli = Cli::parse_from(["hpecp", "config", "get"]);
        match cli.command {
            Commands::Config {
                command: ConfigCommands::Get(args),
            } => {
                assert_eq!(args.output, RawOutput::Yaml);
                assert!(args.query.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn output_maps_to_render_mode() {
        assert_eq!(OutputMode::from(Output::JsonPp), OutputMode::JsonPretty);
        assert_eq!(OutputMode::from(Output::Text), OutputMode::Text);
    }
}
