//! Generic resource controller.
//!
//! One implementation of get/list/delete/create and status waits serves
//! every [`ResourceKind`]. The controller holds no state beyond a borrowed
//! transport and the poll interval.

use std::fmt;
use std::marker::PhantomData;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, Result};
use crate::list::{ColumnSelection, ResourceList};
use crate::poll::{DEFAULT_POLL_INTERVAL, WaitPolicy, wait_until};
use crate::resource::{Resource, ResourceKind, StatefulKind};
use crate::status::StatusEnum;
use crate::transport::{Method, Request, Response, Transport};

/// CRUD and status waits for one resource kind.
pub struct Controller<'a, K: ResourceKind, T: Transport> {
    transport: &'a T,
    poll_interval: Duration,
    kind: PhantomData<fn() -> K>,
}

impl<K: ResourceKind, T: Transport> Clone for Controller<'_, K, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: ResourceKind, T: Transport> Copy for Controller<'_, K, T> {}

impl<K: ResourceKind, T: Transport> fmt::Debug for Controller<'_, K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("kind", &K::NAME)
            .field("base_path", &K::BASE_PATH)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl<'a, K: ResourceKind, T: Transport> Controller<'a, K, T> {
    /// Creates a controller over a transport.
    #[must_use]
    pub const fn new(transport: &'a T) -> Self {
        Self {
            transport,
            poll_interval: DEFAULT_POLL_INTERVAL,
            kind: PhantomData,
        }
    }

    /// Overrides the status-wait poll interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &'a T {
        self.transport
    }

    /// Checks that `id` addresses an entity under this kind's base path.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] otherwise.
    pub fn validate_id(id: &str) -> Result<()> {
        let valid = id
            .strip_prefix(K::BASE_PATH)
            .and_then(|rest| rest.strip_prefix('/'))
            .is_some_and(|rest| !rest.is_empty() && !rest.contains(['/', '?']));
        if valid {
            Ok(())
        } else {
            Err(ApiError::validation(format!(
                "'id' must be provided with the format: '{}/[0-9]+', got '{id}'",
                K::BASE_PATH
            )))
        }
    }

    /// Sends a request and classifies its status.
    pub(crate) async fn send(&self, request: Request) -> Result<Response> {
        self.transport.request(request).await?.error_for_status()
    }

    fn describe(operation: &str) -> String {
        format!("{}/{operation}", K::NAME.replace(' ', "_"))
    }

    /// Fetches one resource.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a malformed id and
    /// [`ApiError::NotFound`] if the entity is missing or of another kind.
    pub async fn get(&self, id: &str) -> Result<Resource<K>> {
        self.get_with_params(id, &[]).await
    }

    /// Fetches one resource with query parameters.
    ///
    /// # Errors
    ///
    /// Same as [`Controller::get`].
    pub async fn get_with_params(&self, id: &str, params: &[(&str, &str)]) -> Result<Resource<K>> {
        Self::validate_id(id)?;

        let path = with_query(id, params);
        let response = self
            .send(Request::get(path).describe(Self::describe("get")))
            .await?;
        let resource = Resource::<K>::from_json(response.json()?)?;

        if !K::matches(resource.json()) {
            debug!(kind = K::NAME, id, "entity exists but belongs to another kind");
            return Err(ApiError::not_found(
                format!("{} not found with id: {id}", K::NAME),
                Method::Get,
                id,
            ));
        }
        Ok(resource)
    }

    /// Fetches every resource of this kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope is malformed.
    pub async fn list(&self) -> Result<ResourceList<K>> {
        let response = self
            .send(Request::get(K::BASE_PATH).describe(Self::describe("list")))
            .await?;
        ResourceList::from_envelope(&response.json()?)
    }

    /// Fetches every resource with a column selection, validating the
    /// selection before the request is sent.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for unknown columns without touching
    /// the network.
    pub async fn list_with_columns(&self, columns: &ColumnSelection) -> Result<ResourceList<K>> {
        columns.resolve::<K>()?;
        self.list().await?.with_columns(columns)
    }

    /// Deletes a resource.
    ///
    /// Kinds with a discriminator are fetched first so an entity of another
    /// kind sharing the namespace is reported as not found and left alone.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the entity is missing or of another
    /// kind.
    pub async fn delete(&self, id: &str) -> Result<()> {
        Self::validate_id(id)?;
        if K::DISCRIMINATOR.is_some() {
            self.get(id).await?;
        }
        self.send(Request::delete(id).describe(Self::describe("delete")))
            .await?;
        Ok(())
    }

    /// Posts a new entity to the collection path and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Protocol`] if the response has no `Location`.
    pub async fn create(&self, body: Value) -> Result<String> {
        self.create_at(K::BASE_PATH, body).await
    }

    /// Posts a new entity to `path` and returns its id from the `Location`
    /// header.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Protocol`] if the response has no `Location`.
    pub async fn create_at(&self, path: &str, body: Value) -> Result<String> {
        let response = self
            .send(Request::post(path, body).describe(Self::describe("create")))
            .await?;
        response.location()
    }

    /// Waits until the entity no longer exists.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a malformed id, or the first
    /// check error other than not-found.
    pub async fn wait_for_delete(&self, id: &str, timeout: Duration) -> Result<bool> {
        Self::validate_id(id)?;
        let policy = WaitPolicy::new(timeout)
            .with_interval(self.poll_interval)
            .until_gone();
        let this = *self;
        wait_until(policy, move || async move {
            this.get(id).await?;
            Ok::<_, ApiError>(false)
        })
        .await
    }
}

impl<K: StatefulKind, T: Transport> Controller<'_, K, T> {
    /// Waits until the entity reports one of `statuses`.
    ///
    /// An empty `statuses` waits for the entity to disappear. Otherwise an
    /// entity that disappears mid-wait is a not-found error.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a malformed id or poll interval,
    /// or the first check error that is not an accepted not-found.
    pub async fn wait_for_status(
        &self,
        id: &str,
        statuses: &[K::Status],
        timeout: Duration,
    ) -> Result<bool> {
        Self::validate_id(id)?;
        if statuses.is_empty() {
            return self.wait_for_delete(id, timeout).await;
        }

        let wanted: Vec<&str> = statuses.iter().map(|s| s.as_str()).collect();
        let wanted = wanted.as_slice();
        let policy = WaitPolicy::new(timeout).with_interval(self.poll_interval);
        let this = *self;

        wait_until(policy, move || async move {
            let resource = this.get(id).await?;
            let current = resource.status_name();
            debug!(kind = K::NAME, id, status = current, wanted = ?wanted, "polled status");
            Ok::<_, ApiError>(current.is_some_and(|status| wanted.contains(&status)))
        })
        .await
    }
}

fn with_query(path: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect();
    format!("{path}?{}", query.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::tests::{Widget, widget};
    use crate::status::K8sClusterStatus;
    use crate::testing::ScriptedTransport;
    use serde_json::json;
    use tokio::time::Instant;

    type WidgetController<'a> = Controller<'a, Widget, ScriptedTransport>;

    #[test]
    fn id_validation() {
        assert!(WidgetController::validate_id("/api/v1/widget/3").is_ok());
        for bad in ["", "/api/v1/widget", "/api/v1/widget/", "/api/v1/other/3", "/api/v1/widget/3/x", "3"] {
            let err = WidgetController::validate_id(bad).unwrap_err();
            assert!(err.is_validation(), "{bad}");
        }
    }

    #[tokio::test]
    async fn get_wraps_payload() {
        let transport = ScriptedTransport::new();
        transport.push_json(&widget(3, "ready"));

        let resource = WidgetController::new(&transport)
            .get("/api/v1/widget/3")
            .await
            .expect("get");
        assert_eq!(resource.id(), "/api/v1/widget/3");
        assert_eq!(transport.paths(), vec!["get /api/v1/widget/3"]);
    }

    #[tokio::test]
    async fn get_with_params_appends_query() {
        let transport = ScriptedTransport::new();
        transport.push_json(&widget(3, "ready"));

        WidgetController::new(&transport)
            .get_with_params("/api/v1/widget/3", &[("exclude_live_info", "true")])
            .await
            .expect("get");
        assert_eq!(
            transport.paths(),
            vec!["get /api/v1/widget/3?exclude_live_info=true"]
        );
    }

    #[tokio::test]
    async fn invalid_id_never_reaches_transport() {
        let transport = ScriptedTransport::new();
        let err = WidgetController::new(&transport)
            .get("/api/v1/gizmo/3")
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn kind_mismatch_is_not_found() {
        let transport = ScriptedTransport::new();
        let mut other = widget(3, "ready");
        other["purpose"] = json!("k8s");
        transport.push_json(&other);

        let err = WidgetController::new(&transport)
            .get("/api/v1/widget/3")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "widget not found with id: /api/v1/widget/3");
    }

    #[tokio::test]
    async fn remote_404_is_not_found() {
        let transport = ScriptedTransport::new();
        transport.push_status(404, "missing");
        let err = WidgetController::new(&transport)
            .get("/api/v1/widget/3")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn list_filters_and_sorts() {
        let transport = ScriptedTransport::new();
        let mut other = widget(1, "ready");
        other["purpose"] = json!("k8s");
        transport.push_json(&json!({"_embedded": {"widgets": [widget(12, "ready"), other, widget(4, "error")]}}));

        let list = WidgetController::new(&transport).list().await.expect("list");
        assert_eq!(list.ids(), vec!["/api/v1/widget/4", "/api/v1/widget/12"]);
        assert_eq!(transport.paths(), vec!["get /api/v1/widget"]);
    }

    #[tokio::test]
    async fn bad_column_fails_before_network() {
        let transport = ScriptedTransport::new();
        let err = WidgetController::new(&transport)
            .list_with_columns(&ColumnSelection::parse("id,bogus"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown column 'bogus'.");
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn delete_checks_kind_first() {
        let transport = ScriptedTransport::new();
        let mut other = widget(3, "ready");
        other["purpose"] = json!("k8s");
        transport.push_json(&other);

        let err = WidgetController::new(&transport)
            .delete("/api/v1/widget/3")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(transport.paths(), vec!["get /api/v1/widget/3"]);
    }

    #[tokio::test]
    async fn delete_issues_delete_after_get() {
        let transport = ScriptedTransport::new();
        transport.push_json(&widget(3, "ready")).push_status(204, "");

        WidgetController::new(&transport)
            .delete("/api/v1/widget/3")
            .await
            .expect("delete");
        assert_eq!(
            transport.paths(),
            vec!["get /api/v1/widget/3", "delete /api/v1/widget/3"]
        );
    }

    #[tokio::test]
    async fn delete_surfaces_404() {
        let transport = ScriptedTransport::new();
        transport.push_json(&widget(3, "ready")).push_status(404, "gone");
        let err = WidgetController::new(&transport)
            .delete("/api/v1/widget/3")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn create_returns_location() {
        let transport = ScriptedTransport::new();
        transport.push_created("/api/v1/widget/9");

        let id = WidgetController::new(&transport)
            .create(json!({"label": {"name": "w9"}}))
            .await
            .expect("create");
        assert_eq!(id, "/api/v1/widget/9");
        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].body, Some(json!({"label": {"name": "w9"}})));
    }

    #[tokio::test]
    async fn create_without_location_is_protocol_error() {
        let transport = ScriptedTransport::new();
        transport.push_status(201, "");
        let err = WidgetController::new(&transport)
            .create(json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Protocol(_)));
    }

    #[tokio::test]
    async fn create_conflict_is_distinct() {
        let transport = ScriptedTransport::new();
        transport.push_status(409, "already exists");
        let err = WidgetController::new(&transport)
            .create(json!({}))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_status_reaches_state() {
        let transport = ScriptedTransport::new();
        transport
            .push_json(&widget(3, "creating"))
            .push_json(&widget(3, "creating"))
            .push_json(&widget(3, "ready"));
        let start = Instant::now();

        let reached = WidgetController::new(&transport)
            .wait_for_status("/api/v1/widget/3", &[K8sClusterStatus::Ready, K8sClusterStatus::Error], Duration::from_secs(60))
            .await
            .expect("wait");

        assert!(reached);
        assert_eq!(transport.requests().len(), 3);
        assert_eq!(start.elapsed(), 2 * DEFAULT_POLL_INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_status_times_out() {
        let transport = ScriptedTransport::new();
        for _ in 0..4 {
            transport.push_json(&widget(3, "creating"));
        }
        let start = Instant::now();

        let reached = WidgetController::new(&transport)
            .wait_for_status("/api/v1/widget/3", &[K8sClusterStatus::Ready], Duration::from_secs(30))
            .await
            .expect("wait");

        assert!(!reached);
        assert_eq!(start.elapsed(), Duration::from_secs(30));
        assert_eq!(transport.requests().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn resource_vanishing_mid_wait_is_an_error() {
        let transport = ScriptedTransport::new();
        transport.push_json(&widget(3, "creating")).push_status(404, "gone");

        let err = WidgetController::new(&transport)
            .wait_for_status("/api/v1/widget/3", &[K8sClusterStatus::Ready], Duration::from_secs(60))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_status_set_waits_for_deletion() {
        let transport = ScriptedTransport::new();
        transport
            .push_json(&widget(3, "deleting"))
            .push_json(&widget(3, "deleting"))
            .push_status(404, "gone");

        let reached = WidgetController::new(&transport)
            .wait_for_status("/api/v1/widget/3", &[], Duration::from_secs(60))
            .await
            .expect("wait");
        assert!(reached);
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_interval_is_configurable() {
        let transport = ScriptedTransport::new();
        transport
            .push_json(&widget(3, "creating"))
            .push_json(&widget(3, "ready"));
        let start = Instant::now();

        let reached = WidgetController::new(&transport)
            .with_poll_interval(Duration::from_millis(50))
            .wait_for_status("/api/v1/widget/3", &[K8sClusterStatus::Ready], Duration::from_secs(5))
            .await
            .expect("wait");
        assert!(reached);
        assert_eq!(start.elapsed(), Duration::from_millis(50));
    }

    #[tokio::test]
    async fn wait_rejects_bad_id_before_polling() {
        let transport = ScriptedTransport::new();
        let err = WidgetController::new(&transport)
            .wait_for_status("/nope/1", &[K8sClusterStatus::Ready], Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(transport.requests().is_empty());
    }
}
