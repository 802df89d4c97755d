//! Chaos Monkey client
//!
//! Client for the [Chaos Monkey](https://github.com/Netflix/SimianArmy) REST API.
//! It triggers on-demand chaos events, which make Chaos Monkey "break" an EC2
//! instance of an auto scaling group in a chosen way, and lists past events.
//!
//! # Architecture
//!
//! [`ChaosMonkeyClient`] defines the operations and is implemented by
//! [`HttpChaosMonkeyClient`]. Configuration is resolved once at construction:
//! explicit values from [`ChaosMonkeyConfig`], then `CHAOSMONKEY_ENDPOINT`,
//! `CHAOSMONKEY_USERNAME` and `CHAOSMONKEY_PASSWORD`, then built-in defaults.
//!
//! # Example
//!
//! ```rust,ignore
//! use chaosmonkey::{ChaosMonkeyClient, ChaosMonkeyConfig, HttpChaosMonkeyClient, Strategy};
//!
//! let client = HttpChaosMonkeyClient::new(&ChaosMonkeyConfig::with_endpoint(
//!     "http://example.com:8080",
//! ));
//! let event = client
//!     .trigger_event("ExampleAutoScalingGroup", &Strategy::SHUTDOWN_INSTANCE)
//!     .await?;
//! let history = client.events().await?;
//! ```
//!
//! Triggering requires an unleashed Chaos Monkey with on-demand termination
//! enabled (`simianarmy.chaos.leashed = false`,
//! `simianarmy.chaos.terminateOndemand.enabled = true`).

mod client;
mod config;
mod error;
mod models;

pub use client::{ChaosMonkeyClient, HttpChaosMonkeyClient};
pub use config::{
    ChaosMonkeyConfig, Credentials, DEFAULT_ENDPOINT, ENV_ENDPOINT, ENV_PASSWORD, ENV_USERNAME,
    EnvDefaults, ResolvedConfig,
};
pub use error::ChaosMonkeyError;
pub use models::{
    API_PATH, ChaosRequest, ChaosResponse, EVENT_TYPE_CHAOS_TERMINATION, Event, GROUP_TYPE_ASG,
    Strategy,
};
