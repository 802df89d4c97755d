//! Provider API ports
//!
//! The facade talks to the cloud provider only through these traits. An
//! adapter wraps the provider SDK (signing, retries, connection pooling) and
//! answers one page or one mutation per call.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::config::RequestContext;
use crate::error::AwsError;
use crate::models::GroupDescription;
use crate::pagination::Page;

/// Auto scaling API
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AutoScalingApi: Send + Sync {
    /// Describe one page of auto scaling groups
    async fn describe_auto_scaling_groups(
        &self,
        ctx: &RequestContext,
        next_token: Option<String>,
    ) -> Result<Page<GroupDescription>, AwsError>;
}

/// Key-value domain store API (SimpleDB)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DomainStoreApi: Send + Sync {
    /// List one page of domain names
    async fn list_domains(
        &self,
        ctx: &RequestContext,
        next_token: Option<String>,
    ) -> Result<Page<String>, AwsError>;

    /// Delete a domain
    async fn delete_domain(&self, ctx: &RequestContext, domain_name: &str) -> Result<(), AwsError>;
}
