//! Site locks.
//!
//! Internal locks are held by the platform itself and clear on their own;
//! external locks are taken by administrators and must be deleted
//! explicitly.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Value, json};
use tracing::info;

use crate::error::{ApiError, Result};
use crate::poll::{DEFAULT_POLL_INTERVAL, WaitPolicy, wait_until};
use crate::resource::lookup;
use crate::transport::{Request, Response, Transport};

const LOCK_PATH: &str = "/api/v1/lock";

static LOCK_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/api/v1/lock/[0-9]+$").unwrap_or_else(|_| unreachable!()));

/// Lock operations.
#[derive(Debug)]
pub struct LockController<'a, T: Transport> {
    transport: &'a T,
    poll_interval: Duration,
}

impl<T: Transport> Clone for LockController<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Transport> Copy for LockController<'_, T> {}

impl<'a, T: Transport> LockController<'a, T> {
    /// Creates a controller over a transport.
    #[must_use]
    pub const fn new(transport: &'a T) -> Self {
        Self {
            transport,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Overrides the interval used by [`LockController::delete_all`].
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    async fn send(&self, request: Request) -> Result<Response> {
        self.transport.request(request).await?.error_for_status()
    }

    /// Current locks, split into `internal_locks` and `external_locks`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(&self) -> Result<Value> {
        self.send(Request::get(LOCK_PATH).describe("lock/get_locks"))
            .await?
            .json()
    }

    /// Takes an external lock and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or no location is returned.
    pub async fn create(&self, reason: &str) -> Result<String> {
        self.send(Request::post(LOCK_PATH, json!({ "reason": reason })).describe("lock/set_lock"))
            .await?
            .location()
    }

    /// Releases one lock.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a malformed id.
    pub async fn delete(&self, lock_id: &str) -> Result<()> {
        if !LOCK_ID.is_match(lock_id) {
            return Err(ApiError::validation(format!(
                "'lock_id' must have format '{LOCK_PATH}/[0-9]+', got '{lock_id}'"
            )));
        }
        self.send(Request::delete(lock_id).describe("lock/delete_lock"))
            .await?;
        Ok(())
    }

    /// Waits for internal locks to drain, then releases every external lock.
    ///
    /// Returns `false` if internal locks are still held after `timeout`, in
    /// which case nothing is deleted.
    ///
    /// # Errors
    ///
    /// Returns the first request error.
    pub async fn delete_all(&self, timeout: Duration) -> Result<bool> {
        let this = *self;
        let drained = wait_until(
            WaitPolicy::new(timeout).with_interval(self.poll_interval),
            move || async move {
                let locks = this.list().await?;
                Ok::<_, ApiError>(lock_ids(&locks, "internal_locks").is_empty())
            },
        )
        .await?;
        if !drained {
            return Ok(false);
        }

        let locks = self.list().await?;
        for lock_id in lock_ids(&locks, "external_locks") {
            info!(lock_id, "releasing external lock");
            self.delete(&lock_id).await?;
        }
        Ok(true)
    }
}

/// Self links of the locks under `_embedded.{key}`; absent means none.
fn lock_ids(locks: &Value, key: &str) -> Vec<String> {
    lookup(locks, &["_embedded", key])
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|lock| lookup(lock, &["_links", "self", "href"]))
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
