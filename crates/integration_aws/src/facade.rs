//! Cloud facade
//!
//! Enumerates auto scaling groups and deletes SimpleDB domains on top of the
//! provider ports, walking every result page.

use std::pin::pin;
use std::sync::Arc;

use futures::TryStreamExt;
use tracing::{debug, info, instrument};

use crate::config::{AwsConfig, RequestContext};
use crate::error::AwsError;
use crate::models::AutoScalingGroup;
use crate::pagination::{collect_items, paginate};
use crate::ports::{AutoScalingApi, DomainStoreApi};

/// Entry point for cloud provider operations
#[derive(Clone)]
pub struct CloudFacade {
    config: AwsConfig,
    autoscaling: Arc<dyn AutoScalingApi>,
    domains: Arc<dyn DomainStoreApi>,
}

impl std::fmt::Debug for CloudFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudFacade")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CloudFacade {
    /// Create a facade over the given provider adapters
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(
        config: &AwsConfig,
        autoscaling: Arc<dyn AutoScalingApi>,
        domains: Arc<dyn DomainStoreApi>,
    ) -> Result<Self, AwsError> {
        config.validate().map_err(AwsError::ConfigurationError)?;
        Ok(Self {
            config: config.clone(),
            autoscaling,
            domains,
        })
    }

    /// List all auto scaling groups in `region`
    ///
    /// # Errors
    ///
    /// Returns an error if the region is blank or any page request fails.
    #[instrument(skip(self))]
    pub async fn auto_scaling_groups(
        &self,
        region: &str,
    ) -> Result<Vec<AutoScalingGroup>, AwsError> {
        let ctx = self.config.request_context(region)?;
        let api = Arc::clone(&self.autoscaling);

        let pages = paginate(move |token| {
            let api = Arc::clone(&api);
            let ctx = ctx.clone();
            async move { api.describe_auto_scaling_groups(&ctx, token).await }
        });

        let groups: Vec<AutoScalingGroup> = collect_items(pages)
            .await?
            .into_iter()
            .map(AutoScalingGroup::from)
            .collect();

        debug!(count = groups.len(), "Auto scaling groups listed");
        Ok(groups)
    }

    /// Delete the SimpleDB domain `domain_name` in `region`
    ///
    /// The domain listing is checked first; nothing is deleted if the domain
    /// is not found.
    ///
    /// # Errors
    ///
    /// Returns [`AwsError::DomainNotFound`] if the domain does not exist, or
    /// the provider error of a failed listing or deletion.
    #[instrument(skip(self))]
    pub async fn delete_domain(&self, domain_name: &str, region: &str) -> Result<(), AwsError> {
        let ctx = self.config.request_context(region)?;

        if !self.domain_exists(&ctx, domain_name).await? {
            return Err(AwsError::DomainNotFound {
                domain: domain_name.to_string(),
            });
        }

        self.domains.delete_domain(&ctx, domain_name).await?;
        info!(domain = %domain_name, region = %ctx.region, "SimpleDB domain deleted");
        Ok(())
    }

    async fn domain_exists(
        &self,
        ctx: &RequestContext,
        domain_name: &str,
    ) -> Result<bool, AwsError> {
        let api = Arc::clone(&self.domains);
        let page_ctx = ctx.clone();

        let mut pages = pin!(paginate(move |token| {
            let api = Arc::clone(&api);
            let ctx = page_ctx.clone();
            async move { api.list_domains(&ctx, token).await }
        }));

        while let Some(page) = pages.try_next().await? {
            if page.items.iter().any(|name| name == domain_name) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
