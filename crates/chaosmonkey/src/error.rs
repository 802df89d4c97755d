//! Chaos Monkey client error types

use thiserror::Error;

/// Errors that can occur while talking to the Chaos Monkey API
#[derive(Debug, Error)]
pub enum ChaosMonkeyError {
    /// The HTTP exchange could not be completed (connection refused, DNS, ...)
    #[error("Network failure: {0}")]
    Network(String),

    /// The transport gave up waiting for a response
    #[error("Request timed out")]
    Timeout {
        /// Timeout configured on the default transport, if any
        timeout_secs: Option<u64>,
    },

    /// Non-200 status with a message reported by the server
    #[error("{message}")]
    Remote {
        /// HTTP status code
        status: u16,
        /// Message from the response body, verbatim
        message: String,
    },

    /// Non-200 status without a usable message
    #[error("HTTP error: {status_line}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Status line, e.g. `503 Service Unavailable`
        status_line: String,
    },

    /// 200 status but the body could not be decoded
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The request could not be built or encoded
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ChaosMonkeyError {
    /// HTTP status code, if a response was received
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } | Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if no response was received at all
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout { .. })
    }

    /// Returns true if the server explained the failure
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }
}
