//! Resource kind descriptors and their kind-specific operations.
//!
//! Each kind is a zero-sized type implementing
//! [`ResourceKind`](crate::resource::ResourceKind); kind-specific operations
//! are inherent methods on [`Controller`](crate::controller::Controller)
//! specialised to that kind.

mod catalog;
mod datatap;
mod epic_worker;
mod gateway;
mod k8s_cluster;
mod k8s_worker;
mod role;
mod tenant;
mod user;

pub use catalog::Catalog;
pub use datatap::{Datatap, HdfsKerberosSpec};
pub use epic_worker::EpicWorker;
pub use gateway::Gateway;
pub use k8s_cluster::{AddonsFor, ClusterSpec, HostConfig, HostRole, ImportGenericCluster, K8sCluster};
pub use k8s_worker::K8sWorker;
pub use role::Role;
pub use tenant::{Tenant, TenantSpec};
pub use user::{User, UserSpec};

use serde_json::{Value, json};

use crate::error::{ApiError, Result};

/// Host credentials for ssh-key based installation.
fn ssh_key_credentials(ssh_key_data: &str) -> Result<Value> {
    if ssh_key_data.trim().is_empty() {
        return Err(ApiError::validation(
            "'ssh_key_data' must be provided and must be a string",
        ));
    }
    Ok(json!({
        "type": "ssh_key_access",
        "ssh_key_data": ssh_key_data,
    }))
}

/// Rejects a blank ip address before it reaches the remote.
fn require_ip(ip: &str) -> Result<()> {
    if ip.trim().is_empty() {
        return Err(ApiError::validation("'ip' must be provided and must be a string"));
    }
    Ok(())
}

/// Numeric trailing segment of a record's self link.
fn trailing_number(record: &Value) -> Value {
    crate::resource::lookup(record, &["_links", "self", "href"])
        .and_then(Value::as_str)
        .and_then(|href| href.rsplit('/').next())
        .and_then(|n| n.parse::<u64>().ok())
        .map_or(Value::Null, Value::from)
}
