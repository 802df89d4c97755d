//! Cloud resource models
//!
//! Raw shapes as returned by the provider listing calls, and the summarized
//! [`AutoScalingGroup`] handed to callers.

use serde::{Deserialize, Serialize};

/// Lifecycle state of an instance that is serving traffic
pub const LIFECYCLE_STATE_IN_SERVICE: &str = "InService";

/// Summary of an auto scaling group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoScalingGroup {
    /// Group name
    pub name: String,
    /// Number of instances in the `InService` lifecycle state
    pub instances_in_service: usize,
    /// Desired capacity
    pub desired_capacity: i64,
    /// Minimum size
    pub min_size: i64,
    /// Maximum size
    pub max_size: i64,
}

/// Auto scaling group as described by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GroupDescription {
    pub auto_scaling_group_name: Option<String>,
    pub instances: Vec<InstanceDescription>,
    pub desired_capacity: Option<i64>,
    pub min_size: Option<i64>,
    pub max_size: Option<i64>,
}

/// Instance member of a described group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct InstanceDescription {
    pub instance_id: Option<String>,
    pub lifecycle_state: Option<String>,
}

impl InstanceDescription {
    /// Whether the instance is in service
    #[must_use]
    pub fn is_in_service(&self) -> bool {
        self.lifecycle_state.as_deref() == Some(LIFECYCLE_STATE_IN_SERVICE)
    }
}

impl From<GroupDescription> for AutoScalingGroup {
    fn from(raw: GroupDescription) -> Self {
        Self {
            instances_in_service: raw.instances.iter().filter(|i| i.is_in_service()).count(),
            name: raw.auto_scaling_group_name.unwrap_or_default(),
            desired_capacity: raw.desired_capacity.unwrap_or_default(),
            min_size: raw.min_size.unwrap_or_default(),
            max_size: raw.max_size.unwrap_or_default(),
        }
    }
}
