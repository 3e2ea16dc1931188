//! Gateway hosts.
//!
//! Gateways share `/api/v1/workers` with other worker types and are told
//! apart by `purpose == "proxy"`.

use serde_json::{Value, json};

use super::{require_ip, ssh_key_credentials};
use crate::controller::Controller;
use crate::error::{ApiError, Result};
use crate::resource::{Field, ResourceKind, StatefulKind};
use crate::status::GatewayStatus;
use crate::transport::Transport;

/// Gateway host kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gateway;

impl ResourceKind for Gateway {
    const NAME: &'static str = "gateway";
    const BASE_PATH: &'static str = "/api/v1/workers";
    const LIST_KEY: &'static str = "workers";
    const FIELDS: &'static [Field] = &[
        Field::path("id", &["_links", "self", "href"]),
        Field::path("hacapable", &["hacapable"]),
        Field::nullable("propinfo", &["propinfo"]),
        Field::path("approved_worker_pubkey", &["approved_worker_pubkey"]),
        Field::path("schedule", &["schedule"]),
        Field::path("ip", &["ip"]),
        Field::path("proxy_nodes_hostname", &["proxy_nodes_hostname"]),
        Field::path("hostname", &["hostname"]),
        Field::path("state", &["state"]),
        Field::list("status_info", &["status_info"]),
        Field::path("purpose", &["purpose"]),
        Field::nullable("sysinfo", &["sysinfo"]),
        Field::list("tags", &["tags"]),
    ];
    const DEFAULT_DISPLAY_FIELDS: &'static [&'static str] = &[
        "id",
        "ip",
        "proxy_nodes_hostname",
        "hostname",
        "state",
        "status_info",
        "purpose",
        "tags",
    ];
    const DISCRIMINATOR: Option<(&'static str, &'static str)> = Some(("purpose", "proxy"));
}

impl StatefulKind for Gateway {
    type Status = GatewayStatus;
    const STATUS_PATH: &'static [&'static str] = &["state"];
}

impl<T: Transport> Controller<'_, Gateway, T> {
    /// Adds a gateway using ssh-key access and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a blank ip, hostname or key.
    pub async fn create_with_ssh_key(
        &self,
        ip: &str,
        proxy_node_hostname: &str,
        ssh_key_data: &str,
        tags: &[Value],
    ) -> Result<String> {
        require_ip(ip)?;
        if proxy_node_hostname.trim().is_empty() {
            return Err(ApiError::validation(
                "'proxy_node_hostname' must be provided and must be a string",
            ));
        }

        let body = json!({
            "ip": ip,
            "credentials": ssh_key_credentials(ssh_key_data)?,
            "tags": tags,
            "proxy_nodes_hostname": proxy_node_hostname,
            "purpose": "proxy",
        });
        self.create_at(&format!("{}/", Gateway::BASE_PATH), body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use std::time::Duration;

    fn worker(n: u32, purpose: &str, state: &str) -> Value {
        json!({
            "_links": {"self": {"href": format!("/api/v1/workers/{n}")}},
            "ip": format!("10.0.0.{n}"),
            "hostname": format!("host{n}"),
            "purpose": purpose,
            "state": state,
        })
    }

    #[tokio::test]
    async fn list_keeps_only_proxies() {
        let transport = ScriptedTransport::new();
        transport.push_json(&json!({"_embedded": {"workers": [
            worker(3, "proxy", "installed"),
            worker(1, "controller", "installed"),
            worker(2, "proxy", "installing"),
        ]}}));

        let list = Controller::<Gateway, _>::new(&transport).list().await.expect("list");
        assert_eq!(list.ids(), vec!["/api/v1/workers/2", "/api/v1/workers/3"]);
    }

    #[tokio::test]
    async fn get_of_non_proxy_worker_is_not_found() {
        let transport = ScriptedTransport::new();
        transport.push_json(&worker(1, "controller", "installed"));

        let err = Controller::<Gateway, _>::new(&transport)
            .get("/api/v1/workers/1")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "gateway not found with id: /api/v1/workers/1");
    }

    #[tokio::test]
    async fn delete_of_non_proxy_worker_never_issues_delete() {
        let transport = ScriptedTransport::new();
        transport.push_json(&worker(1, "controller", "installed"));

        let err = Controller::<Gateway, _>::new(&transport)
            .delete("/api/v1/workers/1")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(transport.paths(), vec!["get /api/v1/workers/1"]);
    }

    #[tokio::test]
    async fn create_payload_has_proxy_purpose() {
        let transport = ScriptedTransport::new();
        transport.push_created("/api/v1/workers/42");

        let id = Controller::<Gateway, _>::new(&transport)
            .create_with_ssh_key("127.0.0.1", "gw.example.com", "KEY", &[])
            .await
            .expect("create");
        assert_eq!(id, "/api/v1/workers/42");

        let request = &transport.requests()[0];
        assert_eq!(request.path, "/api/v1/workers/");
        let body = request.body.as_ref().expect("body");
        assert_eq!(body["purpose"], "proxy");
        assert_eq!(body["proxy_nodes_hostname"], "gw.example.com");
        assert_eq!(body["ip"], "127.0.0.1");
    }

    #[tokio::test(start_paused = true)]
    async fn wait_uses_state_field() {
        let transport = ScriptedTransport::new();
        transport
            .push_json(&worker(42, "proxy", "installing"))
            .push_json(&worker(42, "proxy", "installed"));

        let reached = Controller::<Gateway, _>::new(&transport)
            .wait_for_status("/api/v1/workers/42", &[GatewayStatus::Installed], Duration::from_secs(60))
            .await
            .expect("wait");
        assert!(reached);
    }
}
