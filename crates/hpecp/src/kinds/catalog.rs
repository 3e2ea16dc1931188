//! Application catalog images.

use serde_json::json;

use crate::controller::Controller;
use crate::error::Result;
use crate::resource::{Field, ResourceKind, StatefulKind};
use crate::status::CatalogStatus;
use crate::transport::{Request, Transport};

/// Catalog image kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Catalog;

impl ResourceKind for Catalog {
    const NAME: &'static str = "catalog";
    const BASE_PATH: &'static str = "/api/v1/catalog";
    const LIST_KEY: &'static str = "independent_catalog_entries";
    const FIELDS: &'static [Field] = &[
        Field::path("id", &["_links", "self", "href"]),
        Field::path("label_name", &["label", "name"]),
        Field::path("label_description", &["label", "description"]),
        Field::path("self_href", &["_links", "self", "href"]),
        Field::list("feed", &["_links", "feed"]),
        Field::path("distro_id", &["distro_id"]),
        Field::path("version", &["version"]),
        Field::nullable("timestamp", &["timestamp"]),
        Field::nullable("isdebug", &["isdebug"]),
        Field::list("osclass", &["osclass"]),
        Field::path("logo_checksum", &["logo", "checksum"]),
        Field::path("logo_url", &["logo", "url"]),
        Field::path("documentation_checksum", &["documentation", "checksum"]),
        Field::path("documentation_mimetype", &["documentation", "mimetype"]),
        Field::path("documentation_file", &["documentation", "file"]),
        Field::path("state", &["state"]),
        Field::path("state_info", &["state_info"]),
    ];
    const DEFAULT_DISPLAY_FIELDS: &'static [&'static str] = &[
        "id",
        "label_name",
        "distro_id",
        "version",
        "state",
        "state_info",
    ];
}

impl StatefulKind for Catalog {
    type Status = CatalogStatus;
    const STATUS_PATH: &'static [&'static str] = &["state"];
}

impl<T: Transport> Controller<'_, Catalog, T> {
    /// Starts installing a catalog image.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`](crate::ApiError::NotFound) if the
    /// image does not exist.
    pub async fn install(&self, catalog_id: &str) -> Result<()> {
        self.action(catalog_id, "install").await
    }

    /// Refreshes a catalog image from its feed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`](crate::ApiError::NotFound) if the
    /// image does not exist.
    pub async fn refresh(&self, catalog_id: &str) -> Result<()> {
        self.action(catalog_id, "refresh").await
    }

    async fn action(&self, catalog_id: &str, action: &str) -> Result<()> {
        self.get(catalog_id).await?;
        self.send(
            Request::post(catalog_id, json!({ "action": action }))
                .describe(format!("catalog/post/{action}")),
        )
        .await?;
        Ok(())
    }
}
