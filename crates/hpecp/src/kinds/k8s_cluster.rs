//! Kubernetes clusters.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Value, json};

use crate::controller::Controller;
use crate::error::{ApiError, Result};
use crate::resource::{Field, Resource, ResourceKind, StatefulKind};
use crate::status::K8sClusterStatus;
use crate::transport::{Request, Transport};

static K8S_HOST_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/api/v2/worker/k8shost/[0-9]+$").unwrap_or_else(|_| unreachable!())
});

const MANIFEST_PATH: &str = "/api/v2/k8smanifest";

/// Kubernetes cluster kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct K8sCluster;

impl ResourceKind for K8sCluster {
    const NAME: &'static str = "k8s cluster";
    const BASE_PATH: &'static str = "/api/v2/k8scluster";
    const LIST_KEY: &'static str = "k8sclusters";
    const FIELDS: &'static [Field] = &[
        Field::path("id", &["_links", "self", "href"]),
        Field::path("name", &["label", "name"]),
        Field::path("description", &["label", "description"]),
        Field::path("k8s_version", &["k8s_version"]),
        Field::list("addons", &["addons"]),
        Field::path("created_by_user_id", &["created_by_user_id"]),
        Field::path("created_by_user_name", &["created_by_user_name"]),
        Field::path("created_time", &["created_time"]),
        Field::list("k8shosts_config", &["k8shosts_config"]),
        Field::path("admin_kube_config", &["admin_kube_config"]),
        Field::path("dashboard_token", &["dashboard_token"]),
        Field::path("api_endpoint_access", &["api_endpoint_access"]),
        Field::path("dashboard_endpoint_access", &["dashboard_endpoint_access"]),
        Field::nullable("cert_data", &["cert_data"]),
        Field::path("status", &["status"]),
        Field::path("status_message", &["status_message"]),
        Field::nullable("_links", &["_links"]),
    ];
    const DEFAULT_DISPLAY_FIELDS: &'static [&'static str] =
        &["id", "name", "description", "k8s_version", "status"];
}

impl StatefulKind for K8sCluster {
    type Status = K8sClusterStatus;
    const STATUS_PATH: &'static [&'static str] = &["status"];
}

/// Role of a host in a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRole {
    /// Control-plane node.
    Master,
    /// Worker node.
    Worker,
}

impl HostRole {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Worker => "worker",
        }
    }
}

impl FromStr for HostRole {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "master" => Ok(Self::Master),
            "worker" => Ok(Self::Worker),
            other => Err(ApiError::validation(format!(
                "'role' must be one of ['master', 'worker'], got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for HostRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A host and the role it plays in a cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    node: String,
    role: HostRole,
}

impl HostConfig {
    /// Creates a host config.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] unless `node` is a k8s host id.
    pub fn new(node: impl Into<String>, role: HostRole) -> Result<Self> {
        let node = node.into();
        if !K8S_HOST_ID.is_match(&node) {
            return Err(ApiError::validation(format!(
                "'node' must have format '/api/v2/worker/k8shost/[0-9]+', got '{node}'"
            )));
        }
        Ok(Self { node, role })
    }

    /// Host id.
    #[must_use]
    pub fn node(&self) -> &str {
        &self.node
    }

    /// Host role.
    #[must_use]
    pub const fn role(&self) -> HostRole {
        self.role
    }

    fn to_json(&self) -> Value {
        json!({ "node": self.node, "role": self.role.as_str() })
    }
}

impl FromStr for HostConfig {
    type Err = ApiError;

    /// Parses `node:role`, e.g. `/api/v2/worker/k8shost/1:master`.
    fn from_str(s: &str) -> Result<Self> {
        let (node, role) = s.rsplit_once(':').ok_or_else(|| {
            ApiError::validation(format!("host config must be 'node:role', got '{s}'"))
        })?;
        Self::new(node, role.parse()?)
    }
}

/// Parameters for creating a cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSpec {
    /// Cluster name, required.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Kubernetes version; the remote picks its latest when absent.
    pub k8s_version: Option<String>,
    /// Pod network CIDR.
    pub pod_network_range: String,
    /// Service network CIDR.
    pub service_network_range: String,
    /// Pod DNS domain.
    pub pod_dns_domain: String,
    /// Enable local host storage.
    pub persistent_storage_local: bool,
    /// Install the Nimble CSI plugin.
    pub persistent_storage_nimble_csi: bool,
    /// Hosts and their roles, at least one.
    pub k8shosts_config: Vec<HostConfig>,
    /// Addons to install.
    pub addons: Vec<String>,
}

impl ClusterSpec {
    /// A spec with the default network settings.
    #[must_use]
    pub fn new(name: impl Into<String>, k8shosts_config: Vec<HostConfig>) -> Self {
        Self {
            name: name.into(),
            description: None,
            k8s_version: None,
            pod_network_range: "10.192.0.0/12".to_string(),
            service_network_range: "10.96.0.0/12".to_string(),
            pod_dns_domain: "cluster.local".to_string(),
            persistent_storage_local: false,
            persistent_storage_nimble_csi: false,
            k8shosts_config,
            addons: Vec::new(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ApiError::validation("'name' must be provided and must be a string"));
        }
        if self.k8shosts_config.is_empty() {
            return Err(ApiError::validation("'k8shosts_config' must have at least one item"));
        }
        Ok(())
    }

    fn to_json(&self) -> Value {
        let mut label = json!({ "name": self.name });
        if let Some(description) = &self.description {
            label["description"] = json!(description);
        }

        let mut body = json!({
            "label": label,
            "pod_network_range": self.pod_network_range,
            "service_network_range": self.service_network_range,
            "pod_dns_domain": self.pod_dns_domain,
            "addons": self.addons,
            "persistent_storage": {
                "local": self.persistent_storage_local,
                "nimble_csi": self.persistent_storage_nimble_csi,
            },
            "k8shosts_config": self.k8shosts_config.iter().map(HostConfig::to_json).collect::<Vec<_>>(),
        });
        if let Some(version) = &self.k8s_version {
            body["k8s_version"] = json!(version);
        }
        body
    }
}

/// Parameters for importing an existing cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportGenericCluster {
    /// Cluster name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Pod DNS domain.
    pub pod_dns_domain: String,
    /// API server URL.
    pub server_url: String,
    /// API server CA certificate.
    pub ca: String,
    /// Service account token.
    pub bearer_token: String,
}

/// Where to look up available addons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddonsFor<'a> {
    /// The version an existing cluster runs.
    Cluster(&'a str),
    /// A Kubernetes version.
    Version(&'a str),
}

impl Resource<K8sCluster> {
    /// Kubernetes version.
    #[must_use]
    pub fn k8s_version(&self) -> Option<&str> {
        self.str_at(&["k8s_version"])
    }

    /// Installed addons.
    #[must_use]
    pub fn addons(&self) -> Vec<String> {
        string_list(self.json().get("addons"))
    }

    /// Admin kubeconfig; absent until provisioned.
    #[must_use]
    pub fn admin_kube_config(&self) -> Option<&str> {
        self.str_at(&["admin_kube_config"])
    }

    /// Dashboard URL; absent until provisioned.
    #[must_use]
    pub fn dashboard_endpoint_access(&self) -> Option<&str> {
        self.str_at(&["dashboard_endpoint_access"])
    }

    /// Base64-encoded dashboard token; absent until provisioned.
    #[must_use]
    pub fn dashboard_token(&self) -> Option<&str> {
        self.str_at(&["dashboard_token"])
    }
}

impl<T: Transport> Controller<'_, K8sCluster, T> {
    /// Creates a cluster and returns its id. Creation is asynchronous; use
    /// [`Controller::wait_for_status`] to follow it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for an incomplete spec.
    pub async fn create_cluster(&self, spec: &ClusterSpec) -> Result<String> {
        spec.validate()?;
        self.create(spec.to_json()).await
    }

    /// Fetches a cluster together with its setup log.
    ///
    /// # Errors
    ///
    /// Same as [`Controller::get`].
    pub async fn get_with_setup_log(&self, id: &str) -> Result<Resource<K8sCluster>> {
        self.get_with_params(id, &[("setup_log", "true")]).await
    }

    /// The platform's Kubernetes manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn k8smanifest(&self) -> Result<Value> {
        self.send(Request::get(MANIFEST_PATH).describe("k8s_cluster/k8smanifest"))
            .await?
            .json()
    }

    /// Kubernetes versions the platform can deploy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Protocol`] if the manifest has no
    /// `supported_versions`.
    pub async fn k8s_supported_versions(&self) -> Result<Vec<String>> {
        let manifest = self.k8smanifest().await?;
        let versions = manifest
            .get("supported_versions")
            .ok_or_else(|| ApiError::protocol("k8smanifest has no supported_versions"))?;
        Ok(string_list(Some(versions)))
    }

    /// Addons available for a cluster or a Kubernetes version.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] if the version is not in the manifest.
    pub async fn get_available_addons(&self, target: AddonsFor<'_>) -> Result<Vec<String>> {
        let version = match target {
            AddonsFor::Version(version) => version.to_string(),
            AddonsFor::Cluster(id) => self
                .get(id)
                .await?
                .k8s_version()
                .ok_or_else(|| ApiError::protocol(format!("{id} has no k8s_version")))?
                .to_string(),
        };

        let manifest = self.k8smanifest().await?;
        let addons = manifest
            .get("version_info")
            .and_then(|info| info.get(&version))
            .ok_or_else(|| {
                ApiError::validation(format!("k8s version '{version}' is not in the manifest"))
            })?
            .get("addons");
        Ok(string_list(addons))
    }

    /// Adds addons to a cluster, keeping those already installed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for an empty addon list.
    pub async fn add_addons(&self, id: &str, addons: &[String]) -> Result<()> {
        if addons.is_empty() {
            return Err(ApiError::validation(
                "'addons' parameter must be a list and have at least one entry",
            ));
        }

        let mut required = self.get(id).await?.addons();
        for addon in addons {
            if !required.contains(addon) {
                required.push(addon.clone());
            }
        }

        let body = json!({
            "change_spec": { "addons": required },
            "operation": "reconfigure",
            "reason": "",
        });
        self.send(Request::post(format!("{id}/change_task"), body).describe("k8s_cluster/add_addons"))
            .await?;
        Ok(())
    }

    /// Starts a Kubernetes upgrade.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a malformed id or a percentage
    /// over 100.
    pub async fn upgrade_cluster(
        &self,
        id: &str,
        k8s_upgrade_version: &str,
        worker_upgrade_percent: u8,
    ) -> Result<Value> {
        Self::validate_id(id)?;
        if worker_upgrade_percent > 100 {
            return Err(ApiError::validation("'worker_upgrade_percent' must be 0-100"));
        }

        let body = json!({
            "change_spec": {
                "k8s_upgrade": {
                    "worker_upgrade_percent": worker_upgrade_percent,
                    "k8s_upgrade_version": k8s_upgrade_version,
                }
            },
            "operation": "reconfigure",
            "reason": "Kubernetes upgrade",
        });
        self.send(
            Request::post(format!("{id}/change_task"), body).describe("k8s_cluster/upgrade_cluster"),
        )
        .await?
        .json()
    }

    /// Imports an existing cluster and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Protocol`] if the response has no `Location`.
    pub async fn import_generic_cluster(&self, import: &ImportGenericCluster) -> Result<String> {
        let body = json!({
            "label": { "name": import.name, "description": import.description },
            "pod_dns_domain": import.pod_dns_domain,
            "type": "generic",
            "sysadmin_data": {
                "server_url": import.server_url,
                "ca": import.ca,
                "bearer_token": import.bearer_token,
            },
        });
        self.create_at(&format!("{}/import", K8sCluster::BASE_PATH), body)
            .await
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}
