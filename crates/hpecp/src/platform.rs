//! Platform-wide settings.
//!
//! The settings document is a single free-form object, so these calls work
//! on raw JSON like the license calls do.

use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::transport::{Request, Response, Transport};

const CONFIG_PATH: &str = "/api/v1/config";
const AUTH_PATH: &str = "/api/v2/config/auth";

/// Platform settings operations.
#[derive(Debug)]
pub struct PlatformConfigController<'a, T: Transport> {
    transport: &'a T,
}

impl<T: Transport> Clone for PlatformConfigController<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Transport> Copy for PlatformConfigController<'_, T> {}

impl<'a, T: Transport> PlatformConfigController<'a, T> {
    /// Creates a controller over a transport.
    #[must_use]
    pub const fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    async fn send(&self, request: Request) -> Result<Response> {
        self.transport.request(request).await?.error_for_status()
    }

    /// The current platform settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get(&self) -> Result<Value> {
        self.send(Request::get(CONFIG_PATH).describe("config/get"))
            .await?
            .json()
    }

    /// Replaces the platform's user authentication settings, e.g. an
    /// `external_identity_server` block for LDAP or AD.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] if `data` is not an object.
    pub async fn auth(&self, data: &Value) -> Result<()> {
        if !data.is_object() {
            return Err(ApiError::validation("'data' must be a JSON object"));
        }
        self.send(Request::post(AUTH_PATH, data.clone()).describe("config/auth"))
            .await?;
        Ok(())
    }
}
