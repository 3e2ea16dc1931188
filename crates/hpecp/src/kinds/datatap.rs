//! DataTap connectors.

use serde_json::{Value, json};

use crate::controller::Controller;
use crate::error::{ApiError, Result};
use crate::resource::{Field, ResourceKind};
use crate::transport::Transport;

/// DataTap kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Datatap;

impl ResourceKind for Datatap {
    const NAME: &'static str = "datatap";
    const BASE_PATH: &'static str = "/api/v1/dataconn";
    const LIST_KEY: &'static str = "data_connectors";
    const FIELDS: &'static [Field] = &[
        Field::path("id", &["_links", "self", "href"]),
        Field::path("name", &["_embedded", "label", "name"]),
        Field::path("description", &["_embedded", "label", "description"]),
        Field::path("type", &["_embedded", "endpoint", "type"]),
        Field::path("self_href", &["_links", "self", "href"]),
        Field::path("status", &["_embedded", "status"]),
    ];
    const DEFAULT_DISPLAY_FIELDS: &'static [&'static str] =
        &["id", "name", "description", "type", "self_href", "status"];
}

/// An HDFS DataTap secured with Kerberos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HdfsKerberosSpec {
    /// DataTap name, required.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Sub-path of the endpoint the tap is rooted at; empty for the root.
    pub path_from_endpoint: String,
    /// Key distribution center host.
    pub kdc_data_host: String,
    /// Empty uses the KDC default port.
    pub kdc_data_port: String,
    /// Kerberos realm.
    pub realm: String,
    /// Principal the platform authenticates as.
    pub client_principal: String,
    /// Only allow browsing, not reading file contents.
    pub browse_only: bool,
    /// HDFS name node.
    pub host: String,
    /// Base64 keytab of the client principal.
    pub keytab: String,
    /// Standby name node, may be empty.
    pub backup_host: String,
    /// Endpoint type, `hdfs` unless overridden.
    pub endpoint_type: String,
    /// Name node port.
    pub port: u16,
    /// Mount the tap read-only.
    pub read_only: bool,
}

impl Default for HdfsKerberosSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            path_from_endpoint: String::new(),
            kdc_data_host: String::new(),
            kdc_data_port: String::new(),
            realm: String::new(),
            client_principal: String::new(),
            browse_only: false,
            host: String::new(),
            keytab: String::new(),
            backup_host: String::new(),
            endpoint_type: "hdfs".to_string(),
            port: 8020,
            read_only: false,
        }
    }
}

impl HdfsKerberosSpec {
    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("name", &self.name),
            ("kdc_data_host", &self.kdc_data_host),
            ("realm", &self.realm),
            ("client_principal", &self.client_principal),
            ("host", &self.host),
            ("keytab", &self.keytab),
        ] {
            if value.trim().is_empty() {
                return Err(ApiError::validation(format!(
                    "'{key}' must be provided and must be a string"
                )));
            }
        }
        Ok(())
    }

    fn payload(&self) -> Value {
        let mut kdc = json!({ "host": self.kdc_data_host });
        if !self.kdc_data_port.is_empty() {
            kdc["port"] = json!(self.kdc_data_port);
        }
        let mut body = json!({
            "bdfs_root": {},
            "endpoint": {
                "kdc_data": [kdc],
                "realm": self.realm,
                "client_principal": self.client_principal,
                "browse_only": self.browse_only,
                "host": self.host,
                "keytab": self.keytab,
                "service_id": "hdfs",
                "backup_host": self.backup_host,
                "type": self.endpoint_type,
                "port": self.port.to_string(),
            },
            "flags": { "read_only": self.read_only },
            "label": { "name": self.name, "description": self.description },
        });
        if !self.path_from_endpoint.is_empty() {
            body["bdfs_root"]["path_from_endpoint"] = json!(self.path_from_endpoint);
        }
        body
    }
}

impl<T: Transport> Controller<'_, Datatap, T> {
    /// Creates a Kerberos-secured HDFS DataTap and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] when a required value is blank.
    pub async fn create_hdfs_with_kerberos(&self, spec: &HdfsKerberosSpec) -> Result<String> {
        spec.validate()?;
        self.create(spec.payload()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;

    fn spec() -> HdfsKerberosSpec {
        HdfsKerberosSpec {
            name: "MyDataTap".into(),
            description: "mydatatap".into(),
            kdc_data_host: "10.1.0.30".into(),
            kdc_data_port: "88".into(),
            realm: "EXAMPLE.COM".into(),
            client_principal: "hdfs-admin@EXAMPLE.COM".into(),
            browse_only: true,
            host: "10.1.0.31".into(),
            keytab: "BASE64KEYTAB".into(),
            ..HdfsKerberosSpec::default()
        }
    }

    #[tokio::test]
    async fn create_posts_nested_payload() {
        let transport = ScriptedTransport::new();
        transport.push_created("/api/v1/dataconn/11");

        let id = Controller::<Datatap, _>::new(&transport)
            .create_hdfs_with_kerberos(&HdfsKerberosSpec {
                path_from_endpoint: "/data".into(),
                ..spec()
            })
            .await
            .expect("create");
        assert_eq!(id, "/api/v1/dataconn/11");

        let request = &transport.requests()[0];
        assert_eq!(request.path, "/api/v1/dataconn");
        assert_eq!(request.description, "datatap/create");
        assert_eq!(
            request.body,
            Some(json!({
                "bdfs_root": {"path_from_endpoint": "/data"},
                "endpoint": {
                    "kdc_data": [{"host": "10.1.0.30", "port": "88"}],
                    "realm": "EXAMPLE.COM",
                    "client_principal": "hdfs-admin@EXAMPLE.COM",
                    "browse_only": true,
                    "host": "10.1.0.31",
                    "keytab": "BASE64KEYTAB",
                    "service_id": "hdfs",
                    "backup_host": "",
                    "type": "hdfs",
                    "port": "8020",
                },
                "flags": {"read_only": false},
                "label": {"name": "MyDataTap", "description": "mydatatap"},
            }))
        );
    }

    #[test]
    fn empty_optionals_are_left_out() {
        let body = HdfsKerberosSpec {
            kdc_data_port: String::new(),
            ..spec()
        }
        .payload();
        assert_eq!(body["bdfs_root"], json!({}));
        assert_eq!(body["endpoint"]["kdc_data"], json!([{"host": "10.1.0.30"}]));
    }

    #[tokio::test]
    async fn blank_realm_is_rejected() {
        let transport = ScriptedTransport::new();
        let err = Controller::<Datatap, _>::new(&transport)
            .create_hdfs_with_kerberos(&HdfsKerberosSpec {
                realm: " ".into(),
                ..spec()
            })
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("'realm'"));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn list_reads_embedded_labels() {
        let transport = ScriptedTransport::new();
        transport.push_json(&json!({"_embedded": {"data_connectors": [{
            "_links": {"self": {"href": "/api/v1/dataconn/1"}},
            "_embedded": {
                "label": {"name": "TenantStorage", "description": "tenant storage"},
                "endpoint": {"type": "hdfs"},
                "status": "ok",
            },
        }]}}));

        let list = Controller::<Datatap, _>::new(&transport).list().await.expect("list");
        let tap = list.get(0).expect("first");
        assert_eq!(tap.field("name").expect("name"), json!("TenantStorage"));
        assert_eq!(tap.field("type").expect("type"), json!("hdfs"));
        assert_eq!(tap.field("status").expect("status"), json!("ok"));
    }
}
