//! Chaos event models
//!
//! Domain types ([`Event`], [`Strategy`]) and the JSON shapes exchanged with
//! the Chaos Monkey REST API.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Path of the chaos resource on the Chaos Monkey API server
pub const API_PATH: &str = "/simianarmy/api/v1/chaos";

/// Event type sent with every on-demand termination request
pub const EVENT_TYPE_CHAOS_TERMINATION: &str = "CHAOS_TERMINATION";

/// Group type identifying an auto scaling group target
pub const GROUP_TYPE_ASG: &str = "ASG";

/// Chaos strategy used to "break" an instance
///
/// Strategies are opaque tokens. The client never validates them; whether a
/// strategy is supported is decided by the server. The associated constants
/// cover the strategies shipped with vanilla Chaos Monkey, any other value can
/// be built with [`Strategy::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Strategy(Cow<'static, str>);

impl Strategy {
    /// Shut down the instance
    pub const SHUTDOWN_INSTANCE: Self = Self::from_static("ShutdownInstance");
    /// Block all network traffic using a security group
    pub const BLOCK_ALL_NETWORK_TRAFFIC: Self = Self::from_static("BlockAllNetworkTraffic");
    /// Detach all EBS volumes
    pub const DETACH_VOLUMES: Self = Self::from_static("DetachVolumes");
    /// Burn CPU cycles
    pub const BURN_CPU: Self = Self::from_static("BurnCpu");
    /// Saturate disk I/O
    pub const BURN_IO: Self = Self::from_static("BurnIo");
    /// Kill all Java processes
    pub const KILL_PROCESSES: Self = Self::from_static("KillProcesses");
    /// Null-route the 10.0.0.0/8 network
    pub const NULL_ROUTE: Self = Self::from_static("NullRoute");
    /// Make the EC2 API endpoints unreachable
    pub const FAIL_EC2: Self = Self::from_static("FailEc2");
    /// Block DNS resolution
    pub const FAIL_DNS: Self = Self::from_static("FailDns");
    /// Make the DynamoDB API endpoints unreachable
    pub const FAIL_DYNAMO_DB: Self = Self::from_static("FailDynamoDb");
    /// Make the S3 API endpoints unreachable
    pub const FAIL_S3: Self = Self::from_static("FailS3");
    /// Fill up the root disk
    pub const FILL_DISK: Self = Self::from_static("FillDisk");
    /// Corrupt a share of outgoing network packets
    pub const NETWORK_CORRUPTION: Self = Self::from_static("NetworkCorruption");
    /// Add latency to outgoing network packets
    pub const NETWORK_LATENCY: Self = Self::from_static("NetworkLatency");
    /// Drop a share of outgoing network packets
    pub const NETWORK_LOSS: Self = Self::from_static("NetworkLoss");

    /// Wrap an arbitrary strategy name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Strategies supported by vanilla Chaos Monkey
    #[must_use]
    pub fn known() -> &'static [Self] {
        &KNOWN_STRATEGIES
    }

    /// The strategy name as sent on the wire
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the strategy name is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

static KNOWN_STRATEGIES: [Strategy; 15] = [
    Strategy::SHUTDOWN_INSTANCE,
    Strategy::BLOCK_ALL_NETWORK_TRAFFIC,
    Strategy::DETACH_VOLUMES,
    Strategy::BURN_CPU,
    Strategy::BURN_IO,
    Strategy::KILL_PROCESSES,
    Strategy::NULL_ROUTE,
    Strategy::FAIL_EC2,
    Strategy::FAIL_DNS,
    Strategy::FAIL_DYNAMO_DB,
    Strategy::FAIL_S3,
    Strategy::FILL_DISK,
    Strategy::NETWORK_CORRUPTION,
    Strategy::NETWORK_LATENCY,
    Strategy::NETWORK_LOSS,
];

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Strategy {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Strategy {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Strategy {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl AsRef<str> for Strategy {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Termination of an instance by Chaos Monkey
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// ID of the instance that was terminated
    pub instance_id: String,
    /// Name of the auto scaling group containing the instance
    pub auto_scaling_group_name: String,
    /// Region of the instance and its group (empty if not reported)
    pub region: String,
    /// Chaos strategy used to terminate the instance
    pub strategy: Strategy,
    /// When the chaos event was triggered (whole seconds, UTC)
    pub triggered_at: DateTime<Utc>,
}

/// Request body for triggering a chaos event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChaosRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chaos_type: Option<Strategy>,
    pub event_type: String,
    pub group_name: String,
    pub group_type: String,
    /// Ignored by vanilla Chaos Monkey
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl ChaosRequest {
    /// Build an on-demand termination request against an auto scaling group
    #[must_use]
    pub fn termination(group: &str, strategy: &Strategy, region: Option<&str>) -> Self {
        Self {
            chaos_type: (!strategy.is_empty()).then(|| strategy.clone()),
            event_type: EVENT_TYPE_CHAOS_TERMINATION.to_string(),
            group_name: group.to_string(),
            group_type: GROUP_TYPE_ASG.to_string(),
            region: region.filter(|r| !r.is_empty()).map(str::to_string),
        }
    }
}

/// Chaos event as returned by the API
///
/// Error responses reuse this shape with only `message` set, so every field
/// falls back to its default when missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChaosResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chaos_type: Option<String>,
    pub event_id: String,
    /// Milliseconds since the Unix epoch
    pub event_time: i64,
    pub event_type: String,
    pub group_name: String,
    pub group_type: String,
    pub monkey_type: String,
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ChaosResponse {
    /// Convert the response into an [`Event`]
    ///
    /// `eventTime` is truncated to whole seconds.
    #[must_use]
    pub fn to_event(&self) -> Event {
        Event {
            instance_id: self.event_id.clone(),
            auto_scaling_group_name: self.group_name.clone(),
            region: self.region.clone(),
            strategy: Strategy::new(self.chaos_type.clone().unwrap_or_default()),
            triggered_at: millis_to_utc_seconds(self.event_time),
        }
    }

    /// The error message, if the server reported a non-empty one
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}

impl From<ChaosResponse> for Event {
    fn from(resp: ChaosResponse) -> Self {
        resp.to_event()
    }
}

/// Floor a millisecond timestamp to whole seconds as a UTC instant
///
/// Out-of-range values clamp to the representable bounds.
fn millis_to_utc_seconds(millis: i64) -> DateTime<Utc> {
    let secs = millis.div_euclid(1000);
    DateTime::from_timestamp(secs, 0).unwrap_or(if secs < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert_eq, proptest};

    fn sample_response() -> ChaosResponse {
        ChaosResponse {
            chaos_type: Some("BurnCpu".to_string()),
            event_id: "i-0123456789abcdef0".to_string(),
            event_time: 1_700_000_000_999,
            event_type: EVENT_TYPE_CHAOS_TERMINATION.to_string(),
            group_name: "my-asg".to_string(),
            group_type: GROUP_TYPE_ASG.to_string(),
            monkey_type: "CHAOS".to_string(),
            region: "eu-west-1".to_string(),
            message: None,
        }
    }

    #[test]
    fn test_to_event_copies_fields() {
        let event = sample_response().to_event();
        assert_eq!(event.instance_id, "i-0123456789abcdef0");
        assert_eq!(event.auto_scaling_group_name, "my-asg");
        assert_eq!(event.region, "eu-west-1");
        assert_eq!(event.strategy, Strategy::BURN_CPU);
    }

    #[test]
    fn test_to_event_truncates_millis() {
        let event = sample_response().to_event();
        assert_eq!(event.triggered_at.timestamp(), 1_700_000_000);
        assert_eq!(event.triggered_at.timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn test_to_event_zero_time_is_epoch() {
        let resp = ChaosResponse::default();
        assert_eq!(resp.to_event().triggered_at, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_to_event_clamps_out_of_range() {
        let resp = ChaosResponse {
            event_time: i64::MAX,
            ..Default::default()
        };
        assert_eq!(resp.to_event().triggered_at, DateTime::<Utc>::MAX_UTC);

        let resp = ChaosResponse {
            event_time: i64::MIN,
            ..Default::default()
        };
        assert_eq!(resp.to_event().triggered_at, DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_unknown_strategy_passes_through() {
        let resp = ChaosResponse {
            chaos_type: Some("MeltRack".to_string()),
            ..Default::default()
        };
        assert_eq!(resp.to_event().strategy.as_str(), "MeltRack");
    }

    #[test]
    fn test_response_decodes_with_missing_fields() {
        let resp: ChaosResponse = serde_json::from_str(r#"{"message":"boom"}"#).unwrap();
        assert_eq!(resp.error_message(), Some("boom"));
        assert!(resp.event_id.is_empty());
    }

    #[test]
    fn test_empty_message_is_not_an_error_message() {
        let resp: ChaosResponse = serde_json::from_str(r#"{"message":""}"#).unwrap();
        assert_eq!(resp.error_message(), None);
    }

    #[test]
    fn test_termination_request_json() {
        let req = ChaosRequest::termination("my-asg", &Strategy::SHUTDOWN_INSTANCE, None);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "chaosType": "ShutdownInstance",
                "eventType": "CHAOS_TERMINATION",
                "groupName": "my-asg",
                "groupType": "ASG",
            })
        );
    }

    #[test]
    fn test_termination_request_omits_empty_strategy_and_keeps_region() {
        let req = ChaosRequest::termination("g", &Strategy::new(""), Some("us-east-1"));
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("chaosType").is_none());
        assert_eq!(json["region"], "us-east-1");
    }

    #[test]
    fn test_strategy_display_and_parse() {
        assert_eq!(Strategy::FAIL_DYNAMO_DB.to_string(), "FailDynamoDb");
        let parsed: Strategy = "NetworkLoss".parse().unwrap();
        assert_eq!(parsed, Strategy::NETWORK_LOSS);
        assert_eq!(Strategy::known().len(), 15);
    }

    #[test]
    fn test_strategy_serde_is_transparent() {
        let json = serde_json::to_string(&Strategy::FILL_DISK).unwrap();
        assert_eq!(json, r#""FillDisk""#);
        let back: Strategy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Strategy::FILL_DISK);
    }

    proptest! {
        #[test]
        fn event_time_is_floored_to_seconds(
            millis in -8_000_000_000_000_i64..8_000_000_000_000_i64
        ) {
            let resp = ChaosResponse { event_time: millis, ..Default::default() };
            let at = resp.to_event().triggered_at;
            prop_assert_eq!(at.timestamp(), millis.div_euclid(1000));
            prop_assert_eq!(at.timestamp_subsec_nanos(), 0);
        }

        #[test]
        fn strategy_name_passes_through(name in "[A-Za-z]{1,24}") {
            let strategy: Strategy = name.parse().unwrap();
            prop_assert_eq!(strategy.as_str(), name.as_str());
            let json = serde_json::to_string(&strategy).unwrap();
            prop_assert_eq!(json, format!("\"{name}\""));
        }
    }
}
