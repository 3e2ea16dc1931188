//! Installer settings of the control plane.

use serde_json::{Value, json};

use crate::error::{ApiError, Result};
use crate::transport::{Request, Response, Transport};

const INSTALL_PATH: &str = "/api/v1/install";
const INSTALL_RECONFIG_PATH: &str = "/api/v1/install/?install_reconfig";

/// A PEM document with the file name the platform stores it under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PemFile {
    /// PEM text.
    pub content: String,
    /// File name on the gateway.
    pub file_name: String,
}

impl PemFile {
    fn validate(&self, what: &str) -> Result<()> {
        if self.content.trim().is_empty() || self.file_name.trim().is_empty() {
            return Err(ApiError::validation(format!(
                "'{what}' content and file name must both be provided"
            )));
        }
        Ok(())
    }

    fn to_json(&self) -> Value {
        json!({ "content": self.content, "file_name": self.file_name })
    }
}

/// Installer operations.
#[derive(Debug)]
pub struct InstallController<'a, T: Transport> {
    transport: &'a T,
}

impl<T: Transport> Clone for InstallController<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Transport> Copy for InstallController<'_, T> {}

impl<'a, T: Transport> InstallController<'a, T> {
    /// Creates a controller over a transport.
    #[must_use]
    pub const fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    async fn send(&self, request: Request) -> Result<Response> {
        self.transport.request(request).await?.error_for_status()
    }

    /// The installer settings document.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get(&self) -> Result<Value> {
        self.send(Request::get(INSTALL_PATH).describe("install/get"))
            .await?
            .json()
    }

    /// Installs a TLS certificate and key on the gateways.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] if either file is blank.
    pub async fn set_gateway_ssl(&self, cert: &PemFile, key: &PemFile) -> Result<()> {
        cert.validate("cert")?;
        key.validate("key")?;
        let body = json!({
            "gateway_ssl_cert_info": {
                "cert_file": cert.to_json(),
                "key_file": key.to_json(),
            },
        });
        self.send(Request::put(INSTALL_RECONFIG_PATH, body).describe("install/set_gateway_ssl"))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;

    fn pem(content: &str, file_name: &str) -> PemFile {
        PemFile {
            content: content.into(),
            file_name: file_name.into(),
        }
    }

    #[tokio::test]
    async fn get_returns_raw_document() {
        let transport = ScriptedTransport::new();
        transport.push_json(&json!({"objects": {"gateway_ssl_cert_info": null}}));

        let install = InstallController::new(&transport).get().await.expect("install");
        assert!(install["objects"]["gateway_ssl_cert_info"].is_null());
        assert_eq!(transport.paths(), vec!["get /api/v1/install"]);
    }

    #[tokio::test]
    async fn gateway_ssl_is_a_reconfig() {
        let transport = ScriptedTransport::new();
        transport.push_status(204, "");

        InstallController::new(&transport)
            .set_gateway_ssl(&pem("-----BEGIN CERTIFICATE-----", "cert.pem"), &pem("-----BEGIN KEY-----", "key.pem"))
            .await
            .expect("ssl");

        let request = &transport.requests()[0];
        assert_eq!(transport.paths(), vec!["put /api/v1/install/?install_reconfig"]);
        assert_eq!(
            request.body,
            Some(json!({"gateway_ssl_cert_info": {
                "cert_file": {"content": "-----BEGIN CERTIFICATE-----", "file_name": "cert.pem"},
                "key_file": {"content": "-----BEGIN KEY-----", "file_name": "key.pem"},
            }}))
        );
    }

    #[tokio::test]
    async fn blank_key_name_is_rejected() {
        let transport = ScriptedTransport::new();
        let err = InstallController::new(&transport)
            .set_gateway_ssl(&pem("CERT", "cert.pem"), &pem("KEY", " "))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("'key'"));
        assert!(transport.requests().is_empty());
    }
}
