//! Chaos Monkey REST client
//!
//! Triggers on-demand chaos events and lists past events through the
//! `/simianarmy/api/v1/chaos` resource. Every call is exactly one HTTP
//! exchange; failures are returned to the caller without retries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::USER_AGENT;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::{ChaosMonkeyConfig, ResolvedConfig};
use crate::error::ChaosMonkeyError;
use crate::models::{API_PATH, ChaosRequest, ChaosResponse, Event, Strategy};

/// Trait for Chaos Monkey API clients
#[async_trait]
pub trait ChaosMonkeyClient: Send + Sync {
    /// Trigger a chaos event against an instance of the given auto scaling group
    async fn trigger_event(
        &self,
        group: &str,
        strategy: &Strategy,
    ) -> Result<Event, ChaosMonkeyError>;

    /// List chaos events triggered at or after `since`
    ///
    /// `since` goes on the wire as exact UTC epoch milliseconds. It is not
    /// truncated to whole seconds first, so sub-second precision is kept.
    async fn events_since(&self, since: DateTime<Utc>) -> Result<Vec<Event>, ChaosMonkeyError>;

    /// List all chaos events
    async fn events(&self) -> Result<Vec<Event>, ChaosMonkeyError> {
        self.events_since(DateTime::UNIX_EPOCH).await
    }
}

/// HTTP client for the Chaos Monkey REST API
///
/// Holds only the resolved configuration, so clones are cheap and it can be
/// shared across tasks.
#[derive(Debug, Clone)]
pub struct HttpChaosMonkeyClient {
    config: ResolvedConfig,
}

impl HttpChaosMonkeyClient {
    /// Create a client, filling unset fields from the environment and defaults
    #[must_use]
    pub fn new(config: &ChaosMonkeyConfig) -> Self {
        Self::with_resolved(config.resolve())
    }

    /// Create a client from an already resolved configuration
    #[must_use]
    pub const fn with_resolved(config: ResolvedConfig) -> Self {
        Self { config }
    }

    /// Create a client configured purely from `CHAOSMONKEY_*` variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(&ChaosMonkeyConfig::default())
    }

    /// The resolved configuration
    #[must_use]
    pub const fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// URL of the chaos resource
    #[must_use]
    pub fn chaos_url(&self) -> String {
        format!("{}{API_PATH}", self.config.endpoint())
    }

    async fn list_events(&self, since_ms: i64) -> Result<Vec<Event>, ChaosMonkeyError> {
        let query = [("since", since_ms.to_string())];
        let responses: Option<Vec<ChaosResponse>> = self
            .send_request(Method::GET, &query, None)
            .await?;

        let events: Vec<Event> = responses
            .unwrap_or_default()
            .iter()
            .map(ChaosResponse::to_event)
            .collect();

        debug!(count = events.len(), since_ms, "Chaos events listed");
        Ok(events)
    }

    /// Build a request against the chaos resource
    ///
    /// Query pairs are percent-encoded by the transport.
    fn build_request(
        &self,
        method: Method,
        query: &[(&str, String)],
        body: Option<&ChaosRequest>,
    ) -> RequestBuilder {
        let mut request = self
            .config
            .http_client()
            .request(method, self.chaos_url())
            .header(USER_AGENT, self.config.user_agent());

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(creds) = self.config.credentials() {
            request = request.basic_auth(creds.username(), Some(creds.password()));
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        request
    }

    /// Perform one HTTP exchange and decode a 200 response as `T`
    async fn send_request<T: DeserializeOwned>(
        &self,
        method: Method,
        query: &[(&str, String)],
        body: Option<&ChaosRequest>,
    ) -> Result<T, ChaosMonkeyError> {
        debug!(%method, ?query, "Sending Chaos Monkey request");

        let response = self
            .build_request(method, query, body)
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(decode_error(response).await);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ChaosMonkeyError::Network(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(error = %e, "Malformed Chaos Monkey response");
            ChaosMonkeyError::MalformedResponse(e.to_string())
        })
    }

    fn map_send_error(&self, e: &reqwest::Error) -> ChaosMonkeyError {
        if e.is_timeout() {
            ChaosMonkeyError::Timeout {
                timeout_secs: self.config.timeout_secs(),
            }
        } else if e.is_builder() {
            ChaosMonkeyError::InvalidRequest(e.to_string())
        } else {
            ChaosMonkeyError::Network(e.to_string())
        }
    }
}

/// Classify a non-200 response
///
/// Uses the server's `message` if the body carries one, the status line
/// otherwise. The status line pairs the code with its canonical reason
/// phrase (`404 Not Found`); a custom phrase sent by the server is not
/// preserved.
async fn decode_error(response: Response) -> ChaosMonkeyError {
    let status = response.status();
    let message = response
        .bytes()
        .await
        .ok()
        .and_then(|bytes| serde_json::from_slice::<ChaosResponse>(&bytes).ok())
        .and_then(|resp| resp.error_message().map(str::to_string));

    match message {
        Some(message) => {
            debug!(status = status.as_u16(), %message, "Chaos Monkey reported an error");
            ChaosMonkeyError::Remote {
                status: status.as_u16(),
                message,
            }
        },
        None => {
            warn!(status = status.as_u16(), "Chaos Monkey request failed");
            ChaosMonkeyError::Http {
                status: status.as_u16(),
                status_line: status.to_string(),
            }
        },
    }
}

#[async_trait]
impl ChaosMonkeyClient for HttpChaosMonkeyClient {
    #[instrument(skip(self, strategy), fields(strategy = %strategy))]
    async fn trigger_event(
        &self,
        group: &str,
        strategy: &Strategy,
    ) -> Result<Event, ChaosMonkeyError> {
        let body = ChaosRequest::termination(group, strategy, self.config.region());

        let response: ChaosResponse = self.send_request(Method::POST, &[], Some(&body)).await?;
        let event = response.to_event();

        debug!(instance_id = %event.instance_id, "Chaos event triggered");
        Ok(event)
    }

    #[instrument(skip(self))]
    async fn events_since(&self, since: DateTime<Utc>) -> Result<Vec<Event>, ChaosMonkeyError> {
        self.list_events(since.timestamp_millis()).await
    }
}
