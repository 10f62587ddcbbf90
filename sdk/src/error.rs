//! Error types for the Vigil API client.
//!
//! # Design
//! Every failure class a caller can meaningfully react to gets its own
//! variant. `Http` carries the raw status code and the server-provided
//! message verbatim so "the resource does not exist" (404) stays
//! distinguishable from "the server blew up" (5xx). Success and failure are
//! mutually exclusive: no method returns both a value and an error, and a
//! single-entity fetch never returns neither.

use thiserror::Error;

/// Result alias used throughout the SDK.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`crate::Client`] methods and the conversion helpers.
#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced a response: connection refused, DNS
    /// failure, or a timeout before any byte arrived. Never retried by the
    /// client itself.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status. `message` is the server's
    /// envelope message when one decoded, otherwise the raw body text.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The response body was not valid JSON, or its envelope/payload shape
    /// did not match the expected type.
    #[error("decode error: {0}")]
    Decode(String),

    /// A numeric conversion input fell outside the representable range of
    /// the target type.
    #[error("value {value} out of range for {target} (bound {bound})")]
    Range {
        value: i128,
        target: &'static str,
        bound: i128,
    },

    /// The caller-supplied cancellation token fired before or during the
    /// call.
    #[error("request cancelled")]
    Cancelled,

    /// Bad client configuration: unparseable base URL, missing environment
    /// variables, or credentials that cannot form a valid header.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request payload could not be encoded to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl Error {
    /// True when the server reported 404 for the requested resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Http { status: 404, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_displays_status_and_message() {
        let err = Error::Http {
            status: 503,
            message: "maintenance window".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: maintenance window");
    }

    #[test]
    fn range_error_displays_value_and_bound() {
        let err = Error::Range {
            value: -3,
            target: "u64",
            bound: 0,
        };
        assert_eq!(err.to_string(), "value -3 out of range for u64 (bound 0)");
    }

    #[test]
    fn is_not_found_matches_only_404() {
        let not_found = Error::Http {
            status: 404,
            message: "server not found".to_string(),
        };
        let server_error = Error::Http {
            status: 500,
            message: "boom".to_string(),
        };
        assert!(not_found.is_not_found());
        assert!(!server_error.is_not_found());
        assert!(!Error::Cancelled.is_not_found());
    }
}
