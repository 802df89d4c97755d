//! Cloud facade error types

use thiserror::Error;

/// Errors that can occur during cloud provider operations
#[derive(Debug, Error)]
pub enum AwsError {
    /// Connection to the provider API failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The provider rejected or failed the request
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// The domain to delete is not in the domain listing
    #[error("SimpleDB domain {domain:?} does not exist")]
    DomainNotFound {
        /// Name of the missing domain
        domain: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_not_found_display() {
        let err = AwsError::DomainNotFound {
            domain: "chaos_events".to_string(),
        };
        assert_eq!(err.to_string(), r#"SimpleDB domain "chaos_events" does not exist"#);
    }

    #[test]
    fn test_error_display() {
        let err = AwsError::Timeout { timeout_secs: 10 };
        assert!(err.to_string().contains("10"));

        let err = AwsError::ConfigurationError("region must not be empty".to_string());
        assert!(err.to_string().contains("region"));
    }
}
