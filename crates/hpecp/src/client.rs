//! Entry point bundling a transport with per-kind controllers.

use std::time::Duration;

use crate::config::ClientConfig;
use crate::controller::Controller;
use crate::error::Result;
use crate::install::InstallController;
use crate::kinds::{Catalog, Datatap, EpicWorker, Gateway, K8sCluster, K8sWorker, Role, Tenant, User};
use crate::license::LicenseController;
use crate::lock::LockController;
use crate::platform::PlatformConfigController;
use crate::poll::DEFAULT_POLL_INTERVAL;
use crate::resource::ResourceKind;
use crate::transport::{HttpTransport, Transport};

/// A logged-in client.
///
/// Controllers borrow the client's transport, so they are cheap to create
/// per call.
#[derive(Debug)]
pub struct Client<T: Transport = HttpTransport> {
    transport: T,
    poll_interval: Duration,
}

impl Client<HttpTransport> {
    /// Connects and logs in with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the controller is unreachable or rejects the
    /// credentials.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(HttpTransport::connect(config).await?))
    }
}

impl<T: Transport> Client<T> {
    /// Wraps an existing transport.
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Overrides the interval used by every status wait.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Controller for any kind.
    #[must_use]
    pub const fn controller<K: ResourceKind>(&self) -> Controller<'_, K, T> {
        Controller::new(&self.transport).with_poll_interval(self.poll_interval)
    }

    /// Kubernetes clusters.
    #[must_use]
    pub const fn k8s_cluster(&self) -> Controller<'_, K8sCluster, T> {
        self.controller()
    }

    /// Kubernetes worker hosts.
    #[must_use]
    pub const fn k8s_worker(&self) -> Controller<'_, K8sWorker, T> {
        self.controller()
    }

    /// Gateway hosts.
    #[must_use]
    pub const fn gateway(&self) -> Controller<'_, Gateway, T> {
        self.controller()
    }

    /// EPIC worker hosts.
    #[must_use]
    pub const fn epic_worker(&self) -> Controller<'_, EpicWorker, T> {
        self.controller()
    }

    /// Application catalog images.
    #[must_use]
    pub const fn catalog(&self) -> Controller<'_, Catalog, T> {
        self.controller()
    }

    /// DataTaps.
    #[must_use]
    pub const fn datatap(&self) -> Controller<'_, Datatap, T> {
        self.controller()
    }

    /// Tenants.
    #[must_use]
    pub const fn tenant(&self) -> Controller<'_, Tenant, T> {
        self.controller()
    }

    /// Users.
    #[must_use]
    pub const fn user(&self) -> Controller<'_, User, T> {
        self.controller()
    }

    /// Roles.
    #[must_use]
    pub const fn role(&self) -> Controller<'_, Role, T> {
        self.controller()
    }

    /// Licenses.
    #[must_use]
    pub const fn license(&self) -> LicenseController<'_, T> {
        LicenseController::new(&self.transport)
    }

    /// Platform settings.
    #[must_use]
    pub const fn config(&self) -> PlatformConfigController<'_, T> {
        PlatformConfigController::new(&self.transport)
    }

    /// Installer settings.
    #[must_use]
    pub const fn install(&self) -> InstallController<'_, T> {
        InstallController::new(&self.transport)
    }

    /// Site locks.
    #[must_use]
    pub const fn lock(&self) -> LockController<'_, T> {
        LockController::new(&self.transport).with_poll_interval(self.poll_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use serde_json::json;

    #[tokio::test]
    async fn controllers_share_the_transport() {
        let client = Client::new(ScriptedTransport::new());
        client
            .transport()
            .push_json(&json!({"_embedded": {"roles": []}}))
            .push_json(&json!({"uuid": "abc"}))
            .push_json(&json!({"_embedded": {"independent_catalog_entries": []}}))
            .push_json(&json!({"objects": {}}));

        assert!(client.role().list().await.expect("roles").is_empty());
        assert_eq!(client.license().platform_id().await.expect("uuid"), "abc");
        assert!(client.catalog().list().await.expect("catalog").is_empty());
        assert_eq!(client.install().get().await.expect("install"), json!({"objects": {}}));
        assert_eq!(
            client.transport().paths(),
            vec!["get /api/v1/role", "get /api/v1/license", "get /api/v1/catalog", "get /api/v1/install"]
        );
    }

    #[test]
    fn poll_interval_propagates() {
        let client = Client::new(ScriptedTransport::new()).with_poll_interval(Duration::from_secs(2));
        let debug = format!("{:?}", client.tenant());
        assert!(debug.contains("2s"), "{debug}");
    }
}
