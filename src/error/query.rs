use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Invalid Prometheus URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Failed to build Prometheus client: {source}")]
    BuildClient {
        #[source]
        source: reqwest::Error,
    },
    #[error("Query '{expression}' failed to reach Prometheus: {source}")]
    Transport {
        expression: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Query '{expression}' timed out: {source}")]
    Timeout {
        expression: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Query '{expression}' returned HTTP {status}.")]
    HttpStatus { expression: String, status: u16 },
    #[error("Query '{expression}' was rejected ({error_type}): {message}")]
    Api {
        expression: String,
        error_type: String,
        message: String,
    },
    #[error("Query '{expression}' returned a {found} result; expected a vector.")]
    ResultShape {
        expression: String,
        found: &'static str,
    },
    #[error("Query '{expression}' returned a malformed result: {reason}")]
    MalformedResult { expression: String, reason: String },
    #[error("Collection did not finish within {timeout:?}.")]
    DeadlineExceeded { timeout: Duration },
}

impl QueryError {
    /// Result came back but was not an instant vector.
    #[must_use]
    pub const fn is_shape_error(&self) -> bool {
        matches!(
            self,
            QueryError::ResultShape { .. } | QueryError::MalformedResult { .. }
        )
    }

    /// Network, HTTP, API-level or deadline failure of a query call.
    #[must_use]
    pub const fn is_transport_error(&self) -> bool {
        matches!(
            self,
            QueryError::Transport { .. }
                | QueryError::Timeout { .. }
                | QueryError::HttpStatus { .. }
                | QueryError::Api { .. }
                | QueryError::DeadlineExceeded { .. }
        )
    }

    /// Expression the failing call was made for, when there was one.
    #[must_use]
    pub fn expression(&self) -> Option<&str> {
        match self {
            QueryError::Transport { expression, .. }
            | QueryError::Timeout { expression, .. }
            | QueryError::HttpStatus { expression, .. }
            | QueryError::Api { expression, .. }
            | QueryError::ResultShape { expression, .. }
            | QueryError::MalformedResult { expression, .. } => Some(expression),
            QueryError::InvalidBaseUrl { .. }
            | QueryError::BuildClient { .. }
            | QueryError::DeadlineExceeded { .. } => None,
        }
    }
}
