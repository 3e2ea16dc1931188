//! CLI error types and the single point where errors become exit codes.

use std::io::Write;
use std::process::ExitCode;

use hpecp::ApiError;
use hpecp::error::DEBUG_HINT;
use thiserror::Error;
use tracing::debug;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error from the client library.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Arguments that parse but don't make sense together.
    #[error("{0}")]
    Usage(String),

    /// Local I/O failed.
    #[error("{context}: {source}")]
    Io {
        /// What was being done
        context: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A wait finished without reaching any of the requested states.
    #[error("Failed to reach state(s) {} in {timeout_secs}s", quoted_list(.states))]
    StatusNotReached {
        /// States that were waited for
        states: Vec<String>,
        /// Timeout that elapsed
        timeout_secs: u64,
    },

    /// A delete wait finished while the resource still existed.
    #[error("Failed to delete {id} in {timeout_secs}s")]
    DeleteNotConfirmed {
        /// Resource that was waited on
        id: String,
        /// Timeout that elapsed
        timeout_secs: u64,
    },
}

impl CliError {
    /// Creates a usage error.
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Wraps an I/O error with what was being attempted.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// The one line shown to the user.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Api(ApiError::Protocol(detail)) => {
                debug!(detail, "unexpected response");
                format!("Unknown error. {DEBUG_HINT}")
            }
            Self::Api(ApiError::Transport { detail, url }) => {
                debug!(detail, url, "request failed");
                self.to_string()
            }
            Self::Api(ApiError::Conflict { message, .. }) => {
                format!("Resource already exists: {message}")
            }
            other => other.to_string(),
        }
    }

    /// Writes the error as one line to `err` and returns the failure exit
    /// code.
    pub fn report<W: Write>(&self, err: &mut W) -> ExitCode {
        let line = self.message().replace('\n', " ");
        // Nothing useful can be done if stderr itself is gone.
        let _ = writeln!(err, "{line}");
        ExitCode::FAILURE
    }
}

/// `['a', 'b']`
fn quoted_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| format!("'{s}'")).collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpecp::transport::Method;

    #[test]
    fn status_not_reached_message() {
        let err = CliError::StatusNotReached {
            states: vec!["ready".into(), "error".into()],
            timeout_secs: 60,
        };
        assert_eq!(err.to_string(), "Failed to reach state(s) ['ready', 'error'] in 60s");
    }

    #[test]
    fn delete_timeout_names_the_resource() {
        let err = CliError::DeleteNotConfirmed {
            id: "/api/v2/k8scluster/4".into(),
            timeout_secs: 1200,
        };
        assert_eq!(err.message(), "Failed to delete /api/v2/k8scluster/4 in 1200s");
    }

    #[test]
    fn protocol_errors_print_debug_hint() {
        let err = CliError::from(ApiError::protocol("missing Location header"));
        assert_eq!(err.message(), format!("Unknown error. {DEBUG_HINT}"));
    }

    #[test]
    fn conflict_is_friendly() {
        let err = CliError::from(ApiError::Conflict {
            message: "user bob exists".into(),
            method: Method::Post,
            url: "/api/v1/user".into(),
        });
        assert_eq!(err.message(), "Resource already exists: user bob exists");
    }

    #[test]
    fn report_writes_exactly_one_line() {
        let err = CliError::from(ApiError::Api {
            status: 500,
            message: "internal\nerror".into(),
            method: Method::Get,
            url: "/api/v1/role".into(),
        });
        let mut stderr = Vec::new();
        let _ = err.report(&mut stderr);
        assert_eq!(String::from_utf8(stderr).expect("utf8"), "internal error\n");
    }

    #[test]
    fn validation_message_is_verbatim() {
        let err = CliError::from(ApiError::validation("Unknown column 'bogus'."));
        assert_eq!(err.message(), "Unknown column 'bogus'.");
    }
}
