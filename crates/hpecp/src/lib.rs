//! Client SDK for the HPE Container Platform REST API.
//!
//! Every resource kind (clusters, worker hosts, gateways, catalog images,
//! DataTaps, tenants, users, roles) is served by one generic [`Controller`], parameterised by a
//! zero-sized [`ResourceKind`] descriptor. Kinds that go through
//! asynchronous state transitions also implement [`StatefulKind`], which
//! enables timeout-bounded status waits.
//!
//! # Waiting for a gateway
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use hpecp::config::{ClientConfig, default_config_path};
//! use hpecp::status::GatewayStatus;
//! use hpecp::Client;
//!
//! # async fn example() -> hpecp::Result<()> {
//! let config = ClientConfig::from_file(default_config_path(), "default")?;
//! let client = Client::connect(&config).await?;
//!
//! let gateway = client.gateway();
//! let id = gateway
//!     .create_with_ssh_key("10.1.0.9", "gw.example.com", "-----BEGIN...", &[])
//!     .await?;
//! let ready = gateway
//!     .wait_for_status(&id, &[GatewayStatus::Installed], Duration::from_secs(600))
//!     .await?;
//! assert!(ready);
//! # Ok(())
//! # }
//! ```
//!
//! # Rendering
//!
//! ```
//! use hpecp::kinds::Role;
//! use hpecp::list::ResourceList;
//! use hpecp::output::{OutputFormat, OutputMode};
//! use serde_json::json;
//!
//! let roles = ResourceList::<Role>::from_envelope(&json!({"_embedded": {"roles": [
//!     {"_links": {"self": {"href": "/api/v1/role/2"}}, "label": {"name": "Admin", "description": ""}}
//! ]}}))?;
//!
//! let format = OutputFormat::with_query(OutputMode::Json, Some("[*].label.name"))?;
//! assert_eq!(format.render(&roles)?, "[\"Admin\"]\n");
//! # Ok::<(), hpecp::ApiError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod install;
pub mod kinds;
pub mod license;
pub mod list;
pub mod lock;
pub mod output;
pub mod platform;
pub mod poll;
pub mod resource;
pub mod status;
pub mod transport;

#[cfg(test)]
mod testing;

pub use client::Client;
pub use config::ClientConfig;
pub use controller::Controller;
pub use error::{ApiError, Result};
pub use list::{ColumnSelection, ResourceList};
pub use output::{OutputFormat, OutputMode};
pub use resource::{Resource, ResourceKind, StatefulKind};
pub use status::StatusEnum;
pub use transport::{HttpTransport, Transport};
