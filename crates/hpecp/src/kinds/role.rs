//! Roles.

use crate::resource::{Field, ResourceKind};

/// Role kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Role;

impl ResourceKind for Role {
    const NAME: &'static str = "role";
    const BASE_PATH: &'static str = "/api/v1/role";
    const LIST_KEY: &'static str = "roles";
    const FIELDS: &'static [Field] = &[
        Field::path("id", &["_links", "self", "href"]),
        Field::path("name", &["label", "name"]),
        Field::path("description", &["label", "description"]),
    ];
    const DEFAULT_DISPLAY_FIELDS: &'static [&'static str] = &["id", "name", "description"];
}
