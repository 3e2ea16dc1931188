//! EPIC worker hosts.
//!
//! These live under `/api/v1/workers` next to gateways and are selected by
//! `purpose == "worker"`.

use serde_json::{Value, json};

use super::{require_ip, ssh_key_credentials, trailing_number};
use crate::controller::Controller;
use crate::error::{ApiError, Result};
use crate::resource::{Field, ResourceKind, StatefulKind};
use crate::status::WorkerEpicStatus;
use crate::transport::{Request, Transport};

/// Storage changes go through the installer, not the worker record.
const INSTALL_ALTER_PATH: &str = "/api/v1/install/?install_alter";

/// EPIC worker host kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpicWorker;

impl ResourceKind for EpicWorker {
    const NAME: &'static str = "epic worker";
    const BASE_PATH: &'static str = "/api/v1/workers";
    const LIST_KEY: &'static str = "workers";
    const FIELDS: &'static [Field] = &[
        Field::path("id", &["_links", "self", "href"]),
        Field::path("state", &["state"]),
        Field::path("ip", &["ip"]),
        Field::path("hostname", &["hostname"]),
        Field::path("purpose", &["purpose"]),
        Field::path("href", &["_links", "self", "href"]),
        Field::nullable("_links", &["_links"]),
        Field::computed("worker_id", trailing_number),
    ];
    const DEFAULT_DISPLAY_FIELDS: &'static [&'static str] = &["id", "state", "ip", "purpose"];
    const DISCRIMINATOR: Option<(&'static str, &'static str)> = Some(("purpose", "worker"));
}

impl StatefulKind for EpicWorker {
    type Status = WorkerEpicStatus;
    const STATUS_PATH: &'static [&'static str] = &["state"];
}

impl<T: Transport> Controller<'_, EpicWorker, T> {
    /// Adds an EPIC worker using ssh-key access and returns its id.
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
            "ip": ip,
            "credentials": ssh_key_credentials(ssh_key_data)?,
            "purpose": "worker",
            "tags": tags,
        });
        self.create_at(&format!("{}/", EpicWorker::BASE_PATH), body)
            .await
    }

    /// Assigns container and HDFS disks on a worker.
    ///
    /// The worker is fetched first so a wrong id fails before the installer
    /// is touched.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for no ephemeral disks and
    /// [`ApiError::NotFound`] if the worker does not exist.
    pub async fn set_storage(
        &self,
        worker_id: &str,
        ephemeral_disks: &[String],
        persistent_disks: &[String],
    ) -> Result<()> {
        if ephemeral_disks.is_empty() {
            return Err(ApiError::validation(
                "'ephemeral_disks' must contain at least one disk",
            ));
        }
        self.get(worker_id).await?;

        let body = json!({
            "workers": [{
                "containerdisks": ephemeral_disks,
                "hdfsdisks": persistent_disks,
                "id": worker_id,
            }],
        });
        self.send(Request::put(INSTALL_ALTER_PATH, body).describe("epic_worker/set_storage"))
            .await?;
        Ok(())
    }
}
