//! Platform licenses.
//!
//! Licenses are not listable resources in the usual sense, so these calls
//! return the raw JSON payloads.

use serde_json::{Value, json};

use crate::error::{ApiError, Result};
use crate::transport::{Request, Response, Transport};

const LICENSE_PATH: &str = "/api/v1/license";
const HPELICENSE_PATH: &str = "/api/v2/hpelicense";

/// License operations.
#[derive(Debug)]
pub struct LicenseController<'a, T: Transport> {
    transport: &'a T,
}

impl<T: Transport> Clone for LicenseController<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Transport> Copy for LicenseController<'_, T> {}

impl<'a, T: Transport> LicenseController<'a, T> {
    /// Creates a controller over a transport.
    #[must_use]
    pub const fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    async fn send(&self, request: Request) -> Result<Response> {
        self.transport.request(request).await?.error_for_status()
    }

    /// The platform id needed to request a license.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Protocol`] if the payload carries no `uuid`.
    pub async fn platform_id(&self) -> Result<String> {
        let body = self
            .send(Request::get(LICENSE_PATH).describe("license/get_platform_id"))
            .await?
            .json()?;
        body.get("uuid")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ApiError::protocol("license response has no 'uuid'"))
    }

    /// Installed licenses.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(&self) -> Result<Value> {
        self.send(Request::get(HPELICENSE_PATH).describe("license/get_license"))
            .await?
            .json()
    }

    /// Registers a license file already copied to the controller and
    /// returns the new license's location.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a blank file name.
    pub async fn register(&self, server_filename: &str) -> Result<String> {
        if server_filename.trim().is_empty() {
            return Err(ApiError::validation(
                "'server_filename' must be provided and must be a string",
            ));
        }
        self.send(
            Request::post(HPELICENSE_PATH, json!({ "hpelicense_file": server_filename }))
                .describe("license/register"),
        )
        .await?
        .location()
    }

    /// Deletes a license by its key. The key may contain spaces and quotes.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown key.
    pub async fn delete(&self, license_key: &str) -> Result<()> {
        let path = format!("{HPELICENSE_PATH}/{}/", urlencoding::encode(license_key));
        self.send(Request::delete(path).describe("license/delete"))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;

    #[tokio::test]
    async fn platform_id_reads_uuid() {
        let transport = ScriptedTransport::new();
        transport.push_json(&json!({"uuid": "7f3a-11"}));
        let id = LicenseController::new(&transport).platform_id().await.expect("id");
        assert_eq!(id, "7f3a-11");
        assert_eq!(transport.paths(), vec!["get /api/v1/license"]);
    }

    #[tokio::test]
    async fn platform_id_without_uuid_is_protocol_error() {
        let transport = ScriptedTransport::new();
        transport.push_json(&json!({}));
        let err = LicenseController::new(&transport).platform_id().await.unwrap_err();
        assert!(matches!(err, ApiError::Protocol(_)));
    }

    #[tokio::test]
    async fn register_posts_file_name() {
        let transport = ScriptedTransport::new();
        transport.push_created("/api/v2/hpelicense/1");
        let location = LicenseController::new(&transport)
            .register("/srv/bluedata/license/LICENSE-1.txt")
            .await
            .expect("register");
        assert_eq!(location, "/api/v2/hpelicense/1");
        assert_eq!(
            transport.requests()[0].body,
            Some(json!({"hpelicense_file": "/srv/bluedata/license/LICENSE-1.txt"}))
        );
    }

    #[tokio::test]
    async fn delete_encodes_key() {
        let transport = ScriptedTransport::new();
        transport.push_status(204, "");
        LicenseController::new(&transport)
            .delete("1234 5678 \"TEXT\"")
            .await
            .expect("delete");
        assert_eq!(
            transport.paths(),
            vec!["delete /api/v2/hpelicense/1234%205678%20%22TEXT%22/"]
        );
    }
}
