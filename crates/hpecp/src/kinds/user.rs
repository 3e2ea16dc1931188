//! Users.
//!
//! User records embed their attributes under `_embedded` when returned from
//! some endpoints, so every field checks there first.

use serde_json::json;

use crate::controller::Controller;
use crate::error::{ApiError, Result};
use crate::resource::{Field, ResourceKind};
use crate::transport::Transport;

/// User kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct User;

impl ResourceKind for User {
    const NAME: &'static str = "user";
    const BASE_PATH: &'static str = "/api/v1/user";
    const LIST_KEY: &'static str = "users";
    const FIELDS: &'static [Field] = &[
        Field::path("id", &["_links", "self", "href"]),
        Field::first_of("name", &[&["_embedded", "label", "name"], &["label", "name"]]),
        Field::first_of(
            "description",
            &[&["_embedded", "label", "description"], &["label", "description"]],
        ),
        Field::first_of(
            "is_group_added_user",
            &[&["_embedded", "is_group_added_user"], &["is_group_added_user"]],
        ),
        Field::first_of("is_external", &[&["_embedded", "is_external"], &["is_external"]]),
        Field::first_of(
            "is_service_account",
            &[&["_embedded", "is_service_account"], &["is_service_account"]],
        ),
        Field::first_of("default_tenant", &[&["_embedded", "default_tenant"], &["default_tenant"]]),
        Field::first_of("is_siteadmin", &[&["_embedded", "is_siteadmin"], &["is_siteadmin"]]),
    ];
    const DEFAULT_DISPLAY_FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "description",
        "is_group_added_user",
        "is_external",
        "is_service_account",
        "default_tenant",
        "is_siteadmin",
    ];
}

/// Parameters for creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSpec {
    /// Login name.
    pub name: String,
    /// Password; omitted for external users.
    pub password: Option<String>,
    /// Description.
    pub description: String,
    /// Authenticated by an external directory.
    pub is_external: bool,
}

impl<T: Transport> Controller<'_, User, T> {
    /// Creates a user and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a blank name and
    /// [`ApiError::Conflict`] if the user exists.
    pub async fn create_user(&self, spec: &UserSpec) -> Result<String> {
        if spec.name.trim().is_empty() {
            return Err(ApiError::validation("'name' must be provided and must be a string"));
        }

        let mut body = json!({
            "label": { "name": spec.name, "description": spec.description },
            "is_external": spec.is_external,
        });
        if let Some(password) = spec.password.as_deref().filter(|p| !p.is_empty()) {
            body["password"] = json!(password);
        }
        self.create(body).await
    }
}
