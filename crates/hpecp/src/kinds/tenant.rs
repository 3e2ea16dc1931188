//! Tenants and their user/role assignments.

use serde_json::{Value, json};

use super::{K8sCluster, Role, User};
use crate::controller::Controller;
use crate::error::{ApiError, Result};
use crate::list::ResourceList;
use crate::resource::{Field, Resource, ResourceKind, StatefulKind};
use crate::status::TenantStatus;
use crate::transport::{Request, Transport};

const KUBECONFIG_PATH: &str = "/api/v2/k8skubeconfig/";

/// Tenant kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tenant;

impl ResourceKind for Tenant {
    const NAME: &'static str = "tenant";
    const BASE_PATH: &'static str = "/api/v1/tenant";
    const LIST_KEY: &'static str = "tenants";
    const FIELDS: &'static [Field] = &[
        Field::path("id", &["_links", "self", "href"]),
        Field::path("name", &["label", "name"]),
        Field::path("description", &["label", "description"]),
        Field::path("status", &["status"]),
        Field::path("tenant_type", &["tenant_type"]),
        Field::list("external_user_groups", &["external_user_groups"]),
    ];
    const DEFAULT_DISPLAY_FIELDS: &'static [&'static str] =
        &["id", "name", "description", "status", "tenant_type"];
}

impl StatefulKind for Tenant {
    type Status = TenantStatus;
    const STATUS_PATH: &'static [&'static str] = &["status"];
}

/// Parameters for creating a tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantSpec {
    /// Tenant name, required.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Tenant type, e.g. `k8s`.
    pub tenant_type: Option<String>,
    /// Cluster the tenant lives on.
    pub k8s_cluster_id: String,
}

impl TenantSpec {
    fn to_json(&self) -> Value {
        let mut label = json!({ "name": self.name });
        if let Some(description) = &self.description {
            label["description"] = json!(description);
        }
        json!({
            "label": label,
            "tenant_type": self.tenant_type,
            "member_key_available": "all_admins",
            "k8s_cluster": self.k8s_cluster_id,
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum RoleOperation {
    Assign,
    Revoke,
}

impl RoleOperation {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Assign => "assign",
            Self::Revoke => "revoke",
        }
    }
}

impl Resource<Tenant> {
    /// External user group mappings, `{"group": ..., "role": ...}` objects.
    #[must_use]
    pub fn external_user_groups(&self) -> Vec<Value> {
        self.json()
            .get("external_user_groups")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }
}

impl<T: Transport> Controller<'_, Tenant, T> {
    /// Creates a tenant and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a blank name or a malformed
    /// cluster id.
    pub async fn create_tenant(&self, spec: &TenantSpec) -> Result<String> {
        if spec.name.trim().is_empty() {
            return Err(ApiError::validation("'name' must be provided and must be a string"));
        }
        Controller::<K8sCluster, T>::validate_id(&spec.k8s_cluster_id)?;
        self.create(spec.to_json()).await
    }

    /// Kubeconfig for the session's tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is not tenant-scoped.
    pub async fn k8skubeconfig(&self) -> Result<String> {
        let response = self
            .send(Request::get(KUBECONFIG_PATH).describe("tenant/k8skubeconfig"))
            .await?;
        Ok(response.text().to_string())
    }

    /// Users assigned to a tenant.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a malformed id.
    pub async fn users(&self, tenant_id: &str) -> Result<ResourceList<User>> {
        Self::validate_id(tenant_id)?;
        let response = self
            .send(Request::get(format!("{tenant_id}?user")).describe("tenant/users"))
            .await?;
        ResourceList::from_envelope(&response.json()?)
    }

    /// Gives a user a role in a tenant.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the tenant, role or user is missing.
    pub async fn assign_user_to_role(&self, tenant_id: &str, role_id: &str, user_id: &str) -> Result<()> {
        self.change_user_role(RoleOperation::Assign, tenant_id, role_id, user_id)
            .await
    }

    /// Removes a user's role in a tenant.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the tenant, role or user is missing.
    pub async fn revoke_user_from_role(&self, tenant_id: &str, role_id: &str, user_id: &str) -> Result<()> {
        self.change_user_role(RoleOperation::Revoke, tenant_id, role_id, user_id)
            .await
    }

    async fn change_user_role(
        &self,
        operation: RoleOperation,
        tenant_id: &str,
        role_id: &str,
        user_id: &str,
    ) -> Result<()> {
        self.get(tenant_id).await?;
        Controller::<Role, T>::new(self.transport()).get(role_id).await?;
        Controller::<User, T>::new(self.transport()).get(user_id).await?;

        let body = json!({ "operation": operation.as_str(), "role": role_id, "user": user_id });
        self.send(
            Request::put(format!("{tenant_id}?user"), body)
                .describe(format!("tenant/{}_user_role", operation.as_str())),
        )
        .await?;
        Ok(())
    }

    /// External user groups mapped into a tenant.
    ///
    /// # Errors
    ///
    /// Same as [`Controller::get`].
    pub async fn get_external_user_groups(&self, tenant_id: &str) -> Result<Vec<Value>> {
        Ok(self.get(tenant_id).await?.external_user_groups())
    }

    /// Maps an external group to a role, replacing any existing mapping of
    /// that group.
    ///
    /// # Errors
    ///
    /// Same as [`Controller::get`].
    pub async fn add_external_user_group(&self, tenant_id: &str, group: &str, role_id: &str) -> Result<()> {
        let mut groups = self.get_external_user_groups(tenant_id).await?;
        groups.retain(|g| g.get("group").and_then(Value::as_str) != Some(group));
        groups.push(json!({ "group": group, "role": role_id }));
        self.put_external_user_groups(tenant_id, groups).await
    }

    /// Removes an external group mapping, matching the name case-insensitively.
    ///
    /// # Errors
    ///
    /// Same as [`Controller::get`].
    pub async fn delete_external_user_group(&self, tenant_id: &str, group: &str) -> Result<()> {
        let mut groups = self.get_external_user_groups(tenant_id).await?;
        groups.retain(|g| {
            !g.get("group")
                .and_then(Value::as_str)
                .is_some_and(|name| name.eq_ignore_ascii_case(group))
        });
        self.put_external_user_groups(tenant_id, groups).await
    }

    async fn put_external_user_groups(&self, tenant_id: &str, groups: Vec<Value>) -> Result<()> {
        let body = json!({ "external_user_groups": groups });
        self.send(
            Request::put(format!("{tenant_id}?external_user_groups"), body)
                .describe("tenant/external_user_groups"),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use crate::transport::Method;

    fn tenant(groups: Value) -> Value {
        json!({
            "_links": {"self": {"href": "/api/v1/tenant/5"}},
            "label": {"name": "t5", "description": ""},
            "status": "ready",
            "tenant_type": "k8s",
            "external_user_groups": groups,
        })
    }

    fn entity(path: &str) -> Value {
        json!({"_links": {"self": {"href": path}}, "label": {"name": "x", "description": ""}})
    }

    #[tokio::test]
    async fn create_tenant_payload() {
        let transport = ScriptedTransport::new();
        transport.push_created("/api/v1/tenant/5");

        let id = Controller::<Tenant, _>::new(&transport)
            .create_tenant(&TenantSpec {
                name: "t5".into(),
                description: None,
                tenant_type: Some("k8s".into()),
                k8s_cluster_id: "/api/v2/k8scluster/1".into(),
            })
            .await
            .expect("create");
        assert_eq!(id, "/api/v1/tenant/5");
        assert_eq!(
            transport.requests()[0].body,
            Some(json!({
                "label": {"name": "t5"},
                "tenant_type": "k8s",
                "member_key_available": "all_admins",
                "k8s_cluster": "/api/v2/k8scluster/1",
            }))
        );
    }

    #[tokio::test]
    async fn create_tenant_checks_cluster_id() {
        let transport = ScriptedTransport::new();
        let err = Controller::<Tenant, _>::new(&transport)
            .create_tenant(&TenantSpec {
                name: "t".into(),
                description: None,
                tenant_type: None,
                k8s_cluster_id: "cluster-1".into(),
            })
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn kubeconfig_is_raw_text() {
        let transport = ScriptedTransport::new();
        transport.push_status(200, "apiVersion: v1\nkind: Config\n");
        let config = Controller::<Tenant, _>::new(&transport)
            .k8skubeconfig()
            .await
            .expect("kubeconfig");
        assert!(config.starts_with("apiVersion: v1"));
    }

    #[tokio::test]
    async fn users_reads_user_envelope() {
        let transport = ScriptedTransport::new();
        transport.push_json(&json!({"_embedded": {"users": [
            {"_links": {"self": {"href": "/api/v1/user/9"}}, "_embedded": {"label": {"name": "alice"}}}
        ]}}));

        let users = Controller::<Tenant, _>::new(&transport)
            .users("/api/v1/tenant/5")
            .await
            .expect("users");
        assert_eq!(users.ids(), vec!["/api/v1/user/9"]);
        assert_eq!(transport.paths(), vec!["get /api/v1/tenant/5?user"]);
        assert_eq!(users.get(0).expect("user").field("name").expect("name"), json!("alice"));
    }

    #[tokio::test]
    async fn assign_verifies_all_three_then_puts() {
        let transport = ScriptedTransport::new();
        transport
            .push_json(&tenant(json!([])))
            .push_json(&entity("/api/v1/role/2"))
            .push_json(&entity("/api/v1/user/9"))
            .push_status(204, "");

        Controller::<Tenant, _>::new(&transport)
            .assign_user_to_role("/api/v1/tenant/5", "/api/v1/role/2", "/api/v1/user/9")
            .await
            .expect("assign");

        assert_eq!(
            transport.paths(),
            vec![
                "get /api/v1/tenant/5",
                "get /api/v1/role/2",
                "get /api/v1/user/9",
                "put /api/v1/tenant/5?user",
            ]
        );
        assert_eq!(
            transport.requests()[3].body,
            Some(json!({"operation": "assign", "role": "/api/v1/role/2", "user": "/api/v1/user/9"}))
        );
    }

    #[tokio::test]
    async fn revoke_stops_when_user_missing() {
        let transport = ScriptedTransport::new();
        transport
            .push_json(&tenant(json!([])))
            .push_json(&entity("/api/v1/role/2"))
            .push_status(404, "no such user");

        let err = Controller::<Tenant, _>::new(&transport)
            .revoke_user_from_role("/api/v1/tenant/5", "/api/v1/role/2", "/api/v1/user/9")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(transport.requests().iter().all(|r| r.method == Method::Get));
    }

    #[tokio::test]
    async fn add_external_group_replaces_existing_mapping() {
        let transport = ScriptedTransport::new();
        transport
            .push_json(&tenant(json!([
                {"group": "CN=ops", "role": "/api/v1/role/3"},
                {"group": "CN=dev", "role": "/api/v1/role/3"},
            ])))
            .push_status(204, "");

        Controller::<Tenant, _>::new(&transport)
            .add_external_user_group("/api/v1/tenant/5", "CN=ops", "/api/v1/role/2")
            .await
            .expect("add");

        let request = &transport.requests()[1];
        assert_eq!(request.path, "/api/v1/tenant/5?external_user_groups");
        assert_eq!(
            request.body,
            Some(json!({"external_user_groups": [
                {"group": "CN=dev", "role": "/api/v1/role/3"},
                {"group": "CN=ops", "role": "/api/v1/role/2"},
            ]}))
        );
    }

    #[tokio::test]
    async fn delete_external_group_ignores_case() {
        let transport = ScriptedTransport::new();
        transport
            .push_json(&tenant(json!([{"group": "CN=Ops", "role": "/api/v1/role/3"}])))
            .push_status(204, "");

        Controller::<Tenant, _>::new(&transport)
            .delete_external_user_group("/api/v1/tenant/5", "cn=ops")
            .await
            .expect("delete");
        assert_eq!(
            transport.requests()[1].body,
            Some(json!({"external_user_groups": []}))
        );
    }
}
