//! Cloud facade configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AwsError;

/// Configuration shared by all cloud provider calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AwsConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self { timeout_secs: 2 }
    }

    /// Request timeout as a [`Duration`]
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Build the context for a single call against `region`
    ///
    /// # Errors
    ///
    /// Returns [`AwsError::ConfigurationError`] if the region is blank.
    pub fn request_context(&self, region: &str) -> Result<RequestContext, AwsError> {
        let region = region.trim();
        if region.is_empty() {
            return Err(AwsError::ConfigurationError(
                "region must not be empty".to_string(),
            ));
        }

        Ok(RequestContext {
            region: region.to_string(),
            timeout: self.request_timeout(),
        })
    }
}

/// Region and timeout applied to one provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Provider region, e.g. `us-east-1`
    pub region: String,
    /// Request timeout
    pub timeout: Duration,
}
