//! Closed sets of states reported by the control plane.
//!
//! Transitions are driven entirely by the remote; these types only name the
//! states a caller may wait for.

use std::fmt;
use std::str::FromStr;

use crate::error::{ApiError, Result};

/// A closed set of named states for one resource kind.
pub trait StatusEnum:
    Copy + Eq + fmt::Debug + fmt::Display + FromStr<Err = ApiError> + Send + Sync + 'static
{
    /// Type name used in error messages.
    const NAME: &'static str;

    /// Every member, in declaration order.
    const ALL: &'static [Self];

    /// Wire name of the state.
    fn as_str(self) -> &'static str;

    /// Looks up a state by wire name.
    fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == name)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|s| s.as_str()).collect();
                ApiError::validation(format!(
                    "'{name}' is not a valid {} value. Valid values are: {}",
                    Self::NAME,
                    valid.join(", ")
                ))
            })
    }

    /// Parses a comma-separated list. Blank input yields an empty list.
    fn parse_list(names: &str) -> Result<Vec<Self>> {
        names
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(Self::from_name)
            .collect()
    }
}

macro_rules! status_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                #[doc = concat!("`", $text, "`")]
                $variant,
            )+
        }

        impl $crate::status::StatusEnum for $name {
            const NAME: &'static str = stringify!($name);
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::status::StatusEnum::as_str(*self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::ApiError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                <Self as $crate::status::StatusEnum>::from_name(s)
            }
        }
    };
}

status_enum! {
    /// Kubernetes cluster states.
    K8sClusterStatus {
        Ready => "ready",
        Creating => "creating",
        Updating => "updating",
        Upgrading => "upgrading",
        Deleting => "deleting",
        Error => "error",
        Warning => "warning",
    }
}

status_enum! {
    /// Tenant states.
    TenantStatus {
        Ready => "ready",
        Creating => "creating",
        Updating => "updating",
        Upgrading => "upgrading",
        Deleting => "deleting",
        Error => "error",
        Warning => "warning",
    }
}

status_enum! {
    /// Kubernetes worker host states.
    WorkerK8sStatus {
        Bundle => "bundle",
        Installing => "installing",
        Installed => "installed",
        Ready => "ready",
        Unlicensed => "unlicensed",
        Configuring => "configuring",
        Configured => "configured",
        Error => "error",
        Sysinfo => "sysinfo",
        Unconfiguring => "unconfiguring",
        Deleting => "deleting",
        StoragePending => "storage_pending",
        StorageConfiguring => "storage_configuring",
        StorageError => "storage_error",
    }
}

status_enum! {
    /// Gateway host states.
    GatewayStatus {
        Bundle => "bundle",
        Installing => "installing",
        Installed => "installed",
        Ready => "ready",
        Unlicensed => "unlicensed",
        Configuring => "configuring",
        Configured => "configured",
        Error => "error",
        Sysinfo => "sysinfo",
        Unconfiguring => "unconfiguring",
        Deleting => "deleting",
        StoragePending => "storage_pending",
        StorageConfiguring => "storage_configuring",
        StorageError => "storage_error",
        DecommissionInProgress => "decommission_in_progress",
        DeleteInProgress => "delete_in_progress",
    }
}

status_enum! {
    /// EPIC worker host states.
    WorkerEpicStatus {
        Bundle => "bundle",
        Installing => "installing",
        Installed => "installed",
        Ready => "ready",
        Unlicensed => "unlicensed",
        Configuring => "configuring",
        Configured => "configured",
        Error => "error",
        Sysinfo => "sysinfo",
        Unconfiguring => "unconfiguring",
        Deleting => "deleting",
        StoragePending => "storage_pending",
        StorageConfiguring => "storage_configuring",
        StorageError => "storage_error",
    }
}

status_enum! {
    /// Catalog image states.
    CatalogStatus {
        Initialized => "initialized",
        Installing => "installing",
        Installed => "installed",
        Uninstalling => "uninstalling",
        Error => "error",
    }
}
