//! Cloud provider facade for chaos tooling
//!
//! Lists AWS auto scaling groups and deletes SimpleDB domains (Chaos Monkey
//! keeps its event history in one).
//!
//! # Architecture
//!
//! [`CloudFacade`] owns the enumeration logic: it walks paged listings via
//! [`paginate`] and checks preconditions before mutating anything. The
//! provider itself sits behind the [`AutoScalingApi`] and [`DomainStoreApi`]
//! ports; [`InMemoryAutoScaling`] and [`InMemoryDomainStore`] implement them
//! without a provider.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use integration_aws::{AwsConfig, CloudFacade, InMemoryAutoScaling, InMemoryDomainStore};
//!
//! let facade = CloudFacade::new(
//!     &AwsConfig::default(),
//!     Arc::new(InMemoryAutoScaling::default()),
//!     Arc::new(InMemoryDomainStore::default()),
//! )?;
//! let groups = facade.auto_scaling_groups("us-east-1").await?;
//! ```

mod config;
mod error;
mod facade;
mod memory;
mod models;
mod pagination;
mod ports;

pub use config::{AwsConfig, RequestContext};
pub use error::AwsError;
pub use facade::CloudFacade;
pub use memory::{DEFAULT_PAGE_SIZE, InMemoryAutoScaling, InMemoryDomainStore};
pub use models::{
    AutoScalingGroup, GroupDescription, InstanceDescription, LIFECYCLE_STATE_IN_SERVICE,
};
pub use pagination::{Page, collect_items, paginate};
pub use ports::{AutoScalingApi, DomainStoreApi};
