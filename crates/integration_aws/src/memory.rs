//! In-memory provider adapters
//!
//! Region-scoped stand-ins for the provider APIs, paging their contents with
//! a fixed page size. Used for local runs and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::config::RequestContext;
use crate::error::AwsError;
use crate::models::GroupDescription;
use crate::pagination::Page;
use crate::ports::{AutoScalingApi, DomainStoreApi};

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: usize = 50;

fn page_of<T: Clone>(
    items: &[T],
    token: Option<&str>,
    page_size: usize,
) -> Result<Page<T>, AwsError> {
    let start = match token {
        None => 0,
        Some(t) => t
            .parse::<usize>()
            .map_err(|_| AwsError::RequestFailed(format!("invalid next token: {t}")))?,
    };
    if start > items.len() {
        return Err(AwsError::RequestFailed(format!("invalid next token: {start}")));
    }

    let end = start.saturating_add(page_size.max(1)).min(items.len());
    let page_items = items[start..end].to_vec();
    if end < items.len() {
        Ok(Page::with_next(page_items, end.to_string()))
    } else {
        Ok(Page::last(page_items))
    }
}

/// In-memory auto scaling API
#[derive(Debug)]
pub struct InMemoryAutoScaling {
    page_size: usize,
    groups: RwLock<HashMap<String, Vec<GroupDescription>>>,
}

impl Default for InMemoryAutoScaling {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl InMemoryAutoScaling {
    /// Create an empty adapter returning `page_size` groups per page
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            groups: RwLock::new(HashMap::new()),
        }
    }

    /// Add a group to `region`
    pub fn insert(&self, region: &str, group: GroupDescription) {
        self.groups
            .write()
            .entry(region.to_string())
            .or_default()
            .push(group);
    }
}

#[async_trait]
impl AutoScalingApi for InMemoryAutoScaling {
    async fn describe_auto_scaling_groups(
        &self,
        ctx: &RequestContext,
        next_token: Option<String>,
    ) -> Result<Page<GroupDescription>, AwsError> {
        let groups = self.groups.read();
        let items = groups.get(&ctx.region).map_or(&[][..], Vec::as_slice);
        page_of(items, next_token.as_deref(), self.page_size)
    }
}

/// In-memory SimpleDB domain store
#[derive(Debug)]
pub struct InMemoryDomainStore {
    page_size: usize,
    domains: RwLock<HashMap<String, Vec<String>>>,
    deleted: RwLock<Vec<String>>,
}

impl Default for InMemoryDomainStore {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl InMemoryDomainStore {
    /// Create an empty store returning `page_size` names per page
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            domains: RwLock::new(HashMap::new()),
            deleted: RwLock::new(Vec::new()),
        }
    }

    /// Create a domain in `region`
    pub fn create_domain(&self, region: &str, domain_name: &str) {
        let mut domains = self.domains.write();
        let names = domains.entry(region.to_string()).or_default();
        if !names.iter().any(|n| n == domain_name) {
            names.push(domain_name.to_string());
        }
    }

    /// Domain names currently in `region`
    #[must_use]
    pub fn domains(&self, region: &str) -> Vec<String> {
        self.domains.read().get(region).cloned().unwrap_or_default()
    }

    /// Names of deleted domains, in deletion order
    #[must_use]
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.read().clone()
    }
}

#[async_trait]
impl DomainStoreApi for InMemoryDomainStore {
    async fn list_domains(
        &self,
        ctx: &RequestContext,
        next_token: Option<String>,
    ) -> Result<Page<String>, AwsError> {
        let domains = self.domains.read();
        let items = domains.get(&ctx.region).map_or(&[][..], Vec::as_slice);
        page_of(items, next_token.as_deref(), self.page_size)
    }

    async fn delete_domain(&self, ctx: &RequestContext, domain_name: &str) -> Result<(), AwsError> {
        if let Some(names) = self.domains.write().get_mut(&ctx.region) {
            names.retain(|n| n != domain_name);
        }
        self.deleted.write().push(domain_name.to_string());
        debug!(domain = %domain_name, region = %ctx.region, "Domain removed from memory store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn ctx(region: &str) -> RequestContext {
        RequestContext {
            region: region.to_string(),
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_page_of_splits_items() {
        let items = [1, 2, 3, 4, 5];
        let first = page_of(&items, None, 2).unwrap();
        assert_eq!(first, Page::with_next(vec![1, 2], "2"));
        let second = page_of(&items, Some("2"), 2).unwrap();
        assert_eq!(second, Page::with_next(vec![3, 4], "4"));
        let last = page_of(&items, Some("4"), 2).unwrap();
        assert_eq!(last, Page::last(vec![5]));
    }

    #[test]
    fn test_page_of_rejects_bad_tokens() {
        let items = [1, 2];
        assert!(page_of(&items, Some("abc"), 2).is_err());
        assert!(page_of(&items, Some("7"), 2).is_err());
    }

    #[test]
    fn test_page_of_zero_page_size() {
        let page = page_of(&[1, 2], None, 0).unwrap();
        assert_eq!(page, Page::with_next(vec![1], "1"));
    }

    #[tokio::test]
    async fn test_groups_are_region_scoped() {
        let api = InMemoryAutoScaling::default();
        api.insert("us-east-1", GroupDescription::default());

        let page = api
            .describe_auto_scaling_groups(&ctx("eu-west-1"), None)
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_token.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_listings_see_same_groups() {
        let api = std::sync::Arc::new(InMemoryAutoScaling::new(2));
        for _ in 0..5 {
            api.insert("us-east-1", GroupDescription::default());
        }

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let api = std::sync::Arc::clone(&api);
                tokio::spawn(async move {
                    api.describe_auto_scaling_groups(&ctx("us-east-1"), Some("2".to_string()))
                        .await
                })
            })
            .collect();

        for handle in handles {
            let page = handle.await.unwrap().unwrap();
            assert_eq!(page.items.len(), 2);
            assert_eq!(page.next_token.as_deref(), Some("4"));
        }
    }

    #[tokio::test]
    async fn test_delete_domain_records_deletion() {
        let store = InMemoryDomainStore::default();
        store.create_domain("us-east-1", "SIMIAN_ARMY");
        store.create_domain("us-east-1", "SIMIAN_ARMY");
        assert_eq!(store.domains("us-east-1"), vec!["SIMIAN_ARMY".to_string()]);

        store
            .delete_domain(&ctx("us-east-1"), "SIMIAN_ARMY")
            .await
            .unwrap();
        assert!(store.domains("us-east-1").is_empty());
        assert_eq!(store.deleted(), vec!["SIMIAN_ARMY".to_string()]);
    }
}
