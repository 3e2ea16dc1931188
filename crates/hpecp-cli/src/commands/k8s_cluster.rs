//! `hpecp k8scluster` command implementation.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hpecp::kinds::{AddonsFor, ClusterSpec, HostConfig, ImportGenericCluster, K8sCluster};
use hpecp::status::K8sClusterStatus;
use hpecp::{ApiError, Controller, OutputFormat, OutputMode, Transport};
use serde_json::json;

use super::{line, resource};
use crate::cli::K8sClusterCommands;
use crate::error::CliError;

/// Executes a cluster subcommand.
///
/// # Errors
///
/// Returns the first library or usage error.
pub async fn execute<T: Transport>(
    clusters: Controller<'_, K8sCluster, T>,
    command: &K8sClusterCommands,
) -> Result<String, CliError> {
    match command {
        K8sClusterCommands::Resource(c) => resource::execute(clusters, c).await,
        K8sClusterCommands::Status(c) => resource::execute_status(clusters, c).await,
        K8sClusterCommands::Create {
            name,
            k8shosts_config,
            description,
            k8s_version,
            pod_network_range,
            service_network_range,
            pod_dns_domain,
            persistent_storage_local,
            persistent_storage_nimble_csi,
            addons,
        } => {
            let hosts = k8shosts_config
                .iter()
                .map(|entry| entry.parse::<HostConfig>())
                .collect::<Result<Vec<_>, _>>()?;
            let spec = ClusterSpec {
                description: description.clone(),
                k8s_version: k8s_version.clone(),
                pod_network_range: pod_network_range.clone(),
                service_network_range: service_network_range.clone(),
                pod_dns_domain: pod_dns_domain.clone(),
                persistent_storage_local: *persistent_storage_local,
                persistent_storage_nimble_csi: *persistent_storage_nimble_csi,
                addons: addons.clone(),
                ..ClusterSpec::new(name.clone(), hosts)
            };
            Ok(line(clusters.create_cluster(&spec).await?))
        }
        K8sClusterCommands::AdminKubeConfig { id } => {
            let cluster = clusters.get(id).await?;
            Ok(text_block(cluster.admin_kube_config().unwrap_or_default()))
        }
        K8sClusterCommands::DashboardUrl { id } => {
            let cluster = clusters.get(id).await?;
            Ok(line(cluster.dashboard_endpoint_access().unwrap_or_default()))
        }
        K8sClusterCommands::DashboardToken { id } => {
            let cluster = clusters.get(id).await?;
            Ok(line(decode_token(cluster.dashboard_token().unwrap_or_default())?))
        }
        K8sClusterCommands::K8smanifest => {
            let manifest = clusters.k8smanifest().await?;
            Ok(OutputFormat::new(OutputMode::Yaml).render_value(&manifest)?)
        }
        K8sClusterCommands::K8sSupportedVersions {
            output,
            major_filter,
            minor_filter,
            patch_filter,
        } => {
            let versions: Vec<String> = clusters
                .k8s_supported_versions()
                .await?
                .into_iter()
                .filter(|v| version_matches(v, [*major_filter, *minor_filter, *patch_filter]))
                .collect();
            if output == "text" {
                Ok(line(versions.join(" ")))
            } else {
                Ok(line(json!(versions)))
            }
        }
        K8sClusterCommands::GetInstalledAddons { id } => {
            Ok(line(json!(clusters.get(id).await?.addons())))
        }
        K8sClusterCommands::GetAvailableAddons { id, k8s_version } => {
            let target = match (id, k8s_version) {
                (Some(id), None) => AddonsFor::Cluster(id),
                (None, Some(version)) => AddonsFor::Version(version),
                _ => {
                    return Err(CliError::usage(
                        "Either the id or the k8s_version parameter must be provided",
                    ));
                }
            };
            Ok(line(json!(clusters.get_available_addons(target).await?)))
        }
        K8sClusterCommands::AddAddons {
            id,
            addons,
            wait_for_ready_sec,
        } => {
            clusters.add_addons(id, addons).await?;
            if *wait_for_ready_sec > 0 {
                resource::wait_for_status(clusters, id, &[K8sClusterStatus::Ready], *wait_for_ready_sec)
                    .await?;
            }
            Ok(String::new())
        }
        K8sClusterCommands::UpgradeCluster {
            id,
            k8s_upgrade_version,
            worker_upgrade_percent,
        } => {
            clusters
                .upgrade_cluster(id, k8s_upgrade_version, *worker_upgrade_percent)
                .await?;
            Ok(String::new())
        }
        K8sClusterCommands::ImportGenericCluster {
            name,
            description,
            pod_dns_domain,
            server_url,
            ca,
            bearer_token,
        } => {
            let import = ImportGenericCluster {
                name: name.clone(),
                description: description.clone(),
                pod_dns_domain: pod_dns_domain.clone(),
                server_url: server_url.clone(),
                ca: ca.clone(),
                bearer_token: bearer_token.clone(),
            };
            Ok(line(clusters.import_generic_cluster(&import).await?))
        }
    }
}

/// Dashboard tokens are stored base64 encoded.
fn decode_token(token: &str) -> Result<String, CliError> {
    let bytes = STANDARD
        .decode(token.trim())
        .map_err(|e| ApiError::protocol(format!("dashboard token is not base64: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| CliError::from(ApiError::protocol(format!("dashboard token is not UTF-8: {e}"))))
}

/// Multi-line text with exactly one trailing newline.
fn text_block(text: &str) -> String {
    line(text.trim_end_matches('\n'))
}

/// `major.minor.patch` matched against optional filters; versions that
/// don't parse never match a filter.
fn version_matches(version: &str, filters: [Option<u32>; 3]) -> bool {
    let parts: Vec<Option<u32>> = version.split('.').map(|p| p.parse().ok()).collect();
    filters.iter().enumerate().all(|(i, filter)| {
        filter.is_none_or(|wanted| parts.get(i).copied().flatten() == Some(wanted))
    })
}
