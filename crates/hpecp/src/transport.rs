//! HTTP transport for the control-plane REST API.
//!
//! The [`Transport`] trait is the only seam between the resource framework
//! and the network: it takes a [`Request`] and yields the completed
//! [`Response`], failing only when the request could not complete at all.
//! Status classification is done once, by [`Response::error_for_status`].
//!
//! # Example
//!
//! ```rust,no_run
//! use hpecp::config::{ClientConfig, default_config_path};
//! use hpecp::transport::{HttpTransport, Request, Transport};
//!
//! # async fn example() -> hpecp::Result<()> {
//! let config = ClientConfig::from_file(default_config_path(), "default")?;
//! let transport = HttpTransport::connect(&config).await?;
//! let response = transport.request(Request::get("/api/v1/license")).await?;
//! println!("{}", response.error_for_status()?.text());
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{ClientConfig, VerifySsl};
use crate::error::{ApiError, Result};

/// Default per-request timeout.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Header carrying the session token.
const SESSION_HEADER: &str = "X-BDS-SESSION";

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl Method {
    /// Lowercase method name, as used in log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Delete => Self::DELETE,
        }
    }
}

/// A request against the control plane, addressed by absolute API path.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// API path, e.g. `/api/v2/k8scluster/20`.
    pub path: String,
    /// Optional JSON body.
    pub body: Option<Value>,
    /// Short label used in log lines, e.g. `k8s_cluster/create`.
    pub description: String,
}

impl Request {
    fn new(method: Method, path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method,
            path: path.into(),
            body,
            description: String::new(),
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path, None)
    }

    /// Creates a POST request with a JSON body.
    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Post, path, Some(body))
    }

    /// Creates a PUT request with a JSON body.
    #[must_use]
    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Put, path, Some(body))
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path, None)
    }

    /// Sets the log description.
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A completed HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: u16,
    headers: BTreeMap<String, String>,
    text: String,
    method: Method,
    url: String,
}

impl Response {
    /// Creates a response. Header names are matched case-insensitively.
    #[must_use]
    pub fn new<I, K, V>(status: u16, headers: I, text: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            status,
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.into()))
                .collect(),
            text: text.into(),
            method: Method::Get,
            url: String::new(),
        }
    }

    /// Creates a 200 response carrying a JSON body.
    #[must_use]
    pub fn json_body(body: &Value) -> Self {
        Self::new(200, [("content-type", "application/json")], body.to_string())
    }

    /// Attaches the originating request, for error messages.
    #[must_use]
    pub fn for_request(mut self, method: Method, url: impl Into<String>) -> Self {
        self.method = method;
        self.url = url.into();
        self
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Returns a header value, ignoring name case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Raw body text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Decodes the body as JSON. An empty body decodes to `null`.
    pub fn json(&self) -> Result<Value> {
        if self.text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&self.text)?)
    }

    /// Returns the `Location` header, failing if the remote omitted it.
    pub fn location(&self) -> Result<String> {
        self.header("location")
            .map(ToString::to_string)
            .ok_or_else(|| {
                ApiError::protocol(format!(
                    "{} {} returned no location header",
                    self.method, self.url
                ))
            })
    }

    /// Converts 4xx/5xx responses into the matching [`ApiError`].
    pub fn error_for_status(self) -> Result<Self> {
        if (200..300).contains(&self.status) {
            return Ok(self);
        }

        let message = if self.text.trim().is_empty() {
            format!("{} {} returned {}", self.method, self.url, self.status)
        } else {
            self.text.trim().to_string()
        };
        let (method, url) = (self.method, self.url);

        Err(match self.status {
            404 => ApiError::NotFound { message, method, url },
            409 => ApiError::Conflict { message, method, url },
            403 => ApiError::Forbidden { message, method, url },
            status => ApiError::Api {
                status,
                message,
                method,
                url,
            },
        })
    }
}

/// Issues requests against the control plane.
///
/// Implementations return every completed response, whatever its status, and
/// fail only when the request could not complete.
pub trait Transport: Send + Sync {
    /// Sends a request and waits for the response.
    fn request(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;
}

/// reqwest-backed transport with a session token.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    session_id: Option<String>,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("has_session", &self.session_id.is_some())
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Creates a transport without a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the CA bundle cannot be read or the HTTP client
    /// cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(DEFAULT_REQUEST_TIMEOUT);

        match &config.verify_ssl {
            VerifySsl::Enabled => {}
            VerifySsl::Disabled => {
                if config.warn_ssl {
                    warn!(host = %config.api_host, "TLS certificate verification is disabled");
                }
                builder = builder.danger_accept_invalid_certs(true);
            }
            VerifySsl::CaBundle(path) => {
                let pem = std::fs::read(path).map_err(|e| {
                    ApiError::config(format!(
                        "could not read verify_ssl certificate '{}': {e}",
                        path.display()
                    ))
                })?;
                let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                    ApiError::config(format!(
                        "invalid verify_ssl certificate '{}': {e}",
                        path.display()
                    ))
                })?;
                builder = builder.add_root_certificate(cert);
            }
        }

        let client = builder
            .build()
            .map_err(|e| ApiError::config(format!("could not build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            session_id: None,
        })
    }

    /// Creates a transport and opens a session with the configured
    /// credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the controller is unreachable or rejects the
    /// credentials.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let mut transport = Self::new(config)?;
        transport
            .create_session(&config.username, &config.password)
            .await?;
        Ok(transport)
    }

    /// Logs in and stores the session token for subsequent requests.
    ///
    /// # Errors
    ///
    /// Returns an error if login fails or the response has no session
    /// location.
    pub async fn create_session(&mut self, username: &str, password: &str) -> Result<()> {
        debug!(username, "creating session");
        let login = Request::post(
            "/api/v1/login",
            serde_json::json!({ "name": username, "password": password }),
        )
        .describe("login");

        let response = self.send(&login).await?.error_for_status()?;
        self.session_id = Some(response.location()?);
        Ok(())
    }

    /// Base URL of the controller, e.g. `https://10.1.0.5:8080`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: &Request) -> Result<Response> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(
            description = %request.description,
            method = %request.method,
            url = %url,
            "REQ"
        );

        let mut builder = self
            .client
            .request(request.method.into(), &url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(session) = &self.session_id {
            builder = builder.header(SESSION_HEADER, session);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            debug!(url = %url, error = %e, "request did not complete");
            ApiError::Transport {
                detail: e.to_string(),
                url: url.clone(),
            }
        })?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let text = response.text().await.map_err(|e| ApiError::Transport {
            detail: e.to_string(),
            url: url.clone(),
        })?;

        debug!(
            description = %request.description,
            method = %request.method,
            url = %url,
            status,
            body = %text,
            "RES"
        );

        Ok(Response::new(status, headers, text).for_request(request.method, request.path.clone()))
    }
}

impl Transport for HttpTransport {
    async fn request(&self, request: Request) -> Result<Response> {
        self.send(&request).await
    }
}
