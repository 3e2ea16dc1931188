//! Kubernetes worker hosts.

use serde_json::{Value, json};

use super::{require_ip, ssh_key_credentials, trailing_number};
use crate::controller::Controller;
use crate::error::{ApiError, Result};
use crate::resource::{Field, Resource, ResourceKind, StatefulKind};
use crate::status::WorkerK8sStatus;
use crate::transport::{Request, Transport};

/// Kubernetes worker host kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct K8sWorker;

impl ResourceKind for K8sWorker {
    const NAME: &'static str = "k8s worker";
    const BASE_PATH: &'static str = "/api/v2/worker/k8shost";
    const LIST_KEY: &'static str = "k8shosts";
    const FIELDS: &'static [Field] = &[
        Field::path("id", &["_links", "self", "href"]),
        Field::path("status", &["status"]),
        Field::path("hostname", &["hostname"]),
        Field::path("ipaddr", &["ipaddr"]),
        Field::path("href", &["_links", "self", "href"]),
        Field::nullable("_links", &["_links"]),
        Field::computed("worker_id", trailing_number),
    ];
    const DEFAULT_DISPLAY_FIELDS: &'static [&'static str] =
        &["id", "status", "hostname", "ipaddr", "href"];
}

impl StatefulKind for K8sWorker {
    type Status = WorkerK8sStatus;
    const STATUS_PATH: &'static [&'static str] = &["status"];
}

impl Resource<K8sWorker> {
    /// Numeric worker id, the last segment of the id.
    #[must_use]
    pub fn worker_id(&self) -> Option<u64> {
        trailing_number(self.json()).as_u64()
    }

    /// Host name.
    #[must_use]
    pub fn hostname(&self) -> Option<&str> {
        self.str_at(&["hostname"])
    }
}

impl<T: Transport> Controller<'_, K8sWorker, T> {
    /// Adds a host using ssh-key access and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a blank ip or key.
    pub async fn create_with_ssh_key(
        &self,
        ip: &str,
        ssh_key_data: &str,
        tags: &[Value],
    ) -> Result<String> {
        require_ip(ip)?;
        let body = json!({
            "ipaddr": ip,
            "credentials": ssh_key_credentials(ssh_key_data)?,
            "tags": tags,
        });
        self.create_at(&format!("{}/", K8sWorker::BASE_PATH), body)
            .await
    }

    /// Assigns disks on a host.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a malformed id or no ephemeral
    /// disks.
    pub async fn set_storage(
        &self,
        worker_id: &str,
        ephemeral_disks: &[String],
        persistent_disks: &[String],
    ) -> Result<()> {
        Self::validate_id(worker_id)?;
        if ephemeral_disks.is_empty() {
            return Err(ApiError::validation(
                "'ephemeral_disks' must contain at least one disk",
            ));
        }

        let body = json!({
            "op_spec": {
                "ephemeral_disks": ephemeral_disks,
                "persistent_disks": persistent_disks,
            },
            "op": "storage",
        });
        self.send(Request::post(worker_id, body).describe("k8s_worker/set_storage"))
            .await?;
        Ok(())
    }
}
