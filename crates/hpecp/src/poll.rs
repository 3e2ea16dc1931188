//! Timeout-bounded polling.
//!
//! [`wait_until`] is the one polling primitive shared by every status wait.
//! The clock starts when the call starts, so slow checks count against the
//! budget. Every sleep is a full interval and is followed by a check, so a
//! condition that holds before the timeout is always observed, and the call
//! gives up at the first check that ends at or past the timeout.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::trace;

use crate::error::{ApiError, Result};

/// Delay between successive checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Parameters of one wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Wall-clock budget measured from the start of the call.
    pub timeout: Duration,
    /// Delay between the end of one check and the start of the next.
    pub interval: Duration,
    /// Treat a not-found answer as success (waiting for deletion).
    pub not_found_is_success: bool,
}

impl WaitPolicy {
    /// A wait for a condition, with the default interval.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            interval: DEFAULT_POLL_INTERVAL,
            not_found_is_success: false,
        }
    }

    /// Sets the check interval.
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Makes a not-found answer count as success.
    #[must_use]
    pub const fn until_gone(mut self) -> Self {
        self.not_found_is_success = true;
        self
    }
}

/// Checks until the condition holds or the timeout elapses.
///
/// Returns `Ok(true)` as soon as `check` yields `true`, or yields a
/// not-found error while [`WaitPolicy::not_found_is_success`] is set.
/// Returns `Ok(false)` after the first failed check that finishes at or past
/// the timeout; with instant checks that is less than one interval late.
/// Any other error is returned immediately without retrying.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for a zero interval, otherwise the first
/// check error that is not an accepted not-found.
pub async fn wait_until<F, Fut>(policy: WaitPolicy, mut check: F) -> Result<bool>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    if policy.interval.is_zero() {
        return Err(ApiError::validation("poll interval must be greater than zero"));
    }

    let start = Instant::now();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        match check().await {
            Ok(true) => return Ok(true),
            Ok(false) => {}
            Err(e) if policy.not_found_is_success && e.is_not_found() => return Ok(true),
            Err(e) => return Err(e),
        }

        let elapsed = start.elapsed();
        trace!(
            attempt,
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            timeout_ms = u64::try_from(policy.timeout.as_millis()).unwrap_or(u64::MAX),
            "condition not met"
        );

        if elapsed >= policy.timeout {
            return Ok(false);
        }
        sleep(policy.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Method;
    use std::cell::Cell;

    const SECOND: Duration = Duration::from_secs(1);

    fn policy(timeout_secs: u64) -> WaitPolicy {
        WaitPolicy::new(Duration::from_secs(timeout_secs))
    }

    fn gone() -> ApiError {
        ApiError::not_found("not found", Method::Get, "/api/v1/workers/1")
    }

    #[tokio::test(start_paused = true)]
    async fn returns_true_in_the_interval_the_condition_holds() {
        let calls = Cell::new(0);
        let start = Instant::now();

        let reached = wait_until(policy(60), || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move { Ok(n == 3) }
        })
        .await
        .expect("wait");

        assert!(reached);
        assert_eq!(calls.get(), 3);
        assert_eq!(start.elapsed(), 20 * SECOND);
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_success_does_not_sleep() {
        let start = Instant::now();
        let reached = wait_until(policy(5), || async { Ok(true) }).await.expect("wait");
        assert!(reached);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_elapsed_within_one_interval() {
        for timeout in [0, 1, 9, 10, 25, 60] {
            let start = Instant::now();
            let reached = wait_until(policy(timeout), || async { Ok(false) })
                .await
                .expect("wait");
            let elapsed = start.elapsed();

            assert!(!reached);
            assert!(elapsed >= Duration::from_secs(timeout), "timeout {timeout}: {elapsed:?}");
            assert!(
                elapsed < Duration::from_secs(timeout) + DEFAULT_POLL_INTERVAL,
                "timeout {timeout}: {elapsed:?}"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn checks_are_never_closer_than_the_interval() {
        let stamps = std::cell::RefCell::new(Vec::new());
        let _ = wait_until(policy(45), || {
            stamps.borrow_mut().push(Instant::now());
            async { Ok(false) }
        })
        .await;

        let stamps = stamps.into_inner();
        assert_eq!(stamps.len(), 6);
        for pair in stamps.windows(2) {
            assert!(pair[1] - pair[0] >= DEFAULT_POLL_INTERVAL);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_checks_count_against_the_budget() {
        let start = Instant::now();
        let calls = Cell::new(0);
        let reached = wait_until(policy(15), || {
            calls.set(calls.get() + 1);
            async {
                sleep(7 * SECOND).await;
                Ok(false)
            }
        })
        .await
        .expect("wait");

        assert!(!reached);
        assert_eq!(calls.get(), 2);
        assert_eq!(start.elapsed(), 24 * SECOND);
    }

    #[tokio::test(start_paused = true)]
    async fn condition_met_in_the_last_partial_interval_is_seen() {
        let start = Instant::now();
        let reached = wait_until(policy(15), || {
            let now = start.elapsed();
            async move { Ok(now >= 12 * SECOND) }
        })
        .await
        .expect("wait");

        assert!(reached);
        assert_eq!(start.elapsed(), 20 * SECOND);
    }

    #[tokio::test(start_paused = true)]
    async fn deletion_in_the_last_partial_interval_is_seen() {
        let start = Instant::now();
        let reached = wait_until(policy(25).until_gone(), || {
            let now = start.elapsed();
            async move { if now >= 21 * SECOND { Err(gone()) } else { Ok(false) } }
        })
        .await
        .expect("wait");

        assert!(reached);
        assert_eq!(start.elapsed(), 30 * SECOND);
    }

    #[tokio::test(start_paused = true)]
    async fn not_found_is_success_only_when_waiting_for_deletion() {
        let calls = Cell::new(0);
        let reached = wait_until(policy(60).until_gone(), || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move { if n < 3 { Ok(false) } else { Err(gone()) } }
        })
        .await
        .expect("wait");
        assert!(reached);
        assert_eq!(calls.get(), 3);

        let err = wait_until(policy(60), || async { Err::<bool, _>(gone()) })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test(start_paused = true)]
    async fn other_errors_propagate_without_retry() {
        let calls = Cell::new(0);
        let err = wait_until(policy(60).until_gone(), || {
            calls.set(calls.get() + 1);
            async {
                Err::<bool, _>(ApiError::Transport {
                    detail: "reset".into(),
                    url: "/api/v1/workers/1".into(),
                })
            }
        })
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Transport { .. }));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_interval() {
        let start = Instant::now();
        let reached = wait_until(policy(3).with_interval(SECOND), || async { Ok(false) })
            .await
            .expect("wait");
        assert!(!reached);
        assert_eq!(start.elapsed(), 3 * SECOND);
    }

    #[tokio::test]
    async fn zero_interval_is_rejected() {
        let err = wait_until(policy(3).with_interval(Duration::ZERO), || async { Ok(false) })
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }
}
