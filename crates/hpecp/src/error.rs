//! Error types for the HPE Container Platform client.
//!
//! Every failure surfaced by the library falls into exactly one of these
//! categories, so callers (and the status-wait engine) can tell a bad
//! argument from a missing resource from a broken connection.

use thiserror::Error;

use crate::transport::Method;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Hint appended to failures whose detail only shows up in debug logs.
pub const DEBUG_HINT: &str = "set LOG_LEVEL=DEBUG to see more detail";

/// Errors that can occur while talking to the control plane.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A precondition was violated before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// The remote returned 404, or the entity is of a different kind.
    #[error("{message}")]
    NotFound {
        /// Remote message or a description of the mismatch
        message: String,
        /// HTTP method of the failed request
        method: Method,
        /// Request URL or resource id
        url: String,
    },

    /// The remote reports that the entity already exists.
    #[error("{message}")]
    Conflict {
        /// Remote message
        message: String,
        /// HTTP method of the failed request
        method: Method,
        /// Request URL
        url: String,
    },

    /// The session is not allowed to perform the request.
    #[error("{message}")]
    Forbidden {
        /// Remote message
        message: String,
        /// HTTP method of the failed request
        method: Method,
        /// Request URL
        url: String,
    },

    /// Any other non-2xx response.
    #[error("{message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Remote message body, verbatim
        message: String,
        /// HTTP method of the failed request
        method: Method,
        /// Request URL
        url: String,
    },

    /// The request could not complete at all.
    #[error("could not connect to controller - {DEBUG_HINT}")]
    Transport {
        /// Underlying client error
        detail: String,
        /// Request URL
        url: String,
    },

    /// The remote broke the wire contract (missing header, malformed payload).
    #[error("unexpected response: {0}")]
    Protocol(String),

    /// Configuration could not be loaded.
    #[error("{0}")]
    Config(String),
}

impl ApiError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a not-found error for a resource id.
    #[must_use]
    pub fn not_found(message: impl Into<String>, method: Method, url: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            method,
            url: url.into(),
        }
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns true for not-found failures, including kind mismatches.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true for failures detected before any network call.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true when the remote reported an existing entity.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Protocol(format!("invalid JSON: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_displays_remote_message() {
        let err = ApiError::not_found("gateway not found with id: /api/v1/workers/3", Method::Get, "/api/v1/workers/3");
        assert_eq!(err.to_string(), "gateway not found with id: /api/v1/workers/3");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn transport_error_carries_debug_hint() {
        let err = ApiError::Transport {
            detail: "connection refused".into(),
            url: "https://127.0.0.1:8080/api/v1/login".into(),
        };
        assert!(err.to_string().contains("LOG_LEVEL=DEBUG"));
        assert!(!err.to_string().contains("connection refused"));
    }

    #[test]
    fn json_error_becomes_protocol() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = ApiError::from(parse);
        assert!(matches!(err, ApiError::Protocol(_)));
    }

    #[test]
    fn conflict_is_distinct_from_api_failure() {
        let err = ApiError::Conflict {
            message: "exists".into(),
            method: Method::Post,
            url: "/api/v1/user".into(),
        };
        assert!(err.is_conflict());
        assert!(!err.is_not_found());
    }
}
