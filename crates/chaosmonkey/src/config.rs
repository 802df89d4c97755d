//! Chaos Monkey client configuration
//!
//! A [`ChaosMonkeyConfig`] holds whatever the caller knows. Resolving it fills
//! the gaps from `CHAOSMONKEY_*` environment variables and built-in defaults,
//! producing an immutable [`ResolvedConfig`].

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Environment variable holding the default API endpoint
pub const ENV_ENDPOINT: &str = "CHAOSMONKEY_ENDPOINT";

/// Environment variable holding the default Basic Auth username
pub const ENV_USERNAME: &str = "CHAOSMONKEY_USERNAME";

/// Environment variable holding the default Basic Auth password
pub const ENV_PASSWORD: &str = "CHAOSMONKEY_PASSWORD";

/// Endpoint used when neither the caller nor the environment provide one
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8080";

fn default_user_agent() -> String {
    format!("chaosmonkey-rs/{}", env!("CARGO_PKG_VERSION"))
}

/// Caller-supplied client configuration
///
/// Every field is optional; empty strings count as unset.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaosMonkeyConfig {
    /// Address and port of the Chaos Monkey API server
    pub endpoint: Option<String>,

    /// Region sent along with trigger requests (ignored by vanilla Chaos Monkey)
    pub region: Option<String>,

    /// Username for HTTP Basic Authentication
    pub username: Option<String>,

    /// Password for HTTP Basic Authentication
    #[serde(skip_serializing)]
    pub password: Option<SecretString>,

    /// Custom HTTP User-Agent
    pub user_agent: Option<String>,

    /// Request timeout applied when the default HTTP client is built
    pub timeout_secs: Option<u64>,

    /// Custom HTTP client; takes precedence over `timeout_secs`
    #[serde(skip)]
    pub http_client: Option<Client>,
}

impl std::fmt::Debug for ChaosMonkeyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChaosMonkeyConfig")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("user_agent", &self.user_agent)
            .field("timeout_secs", &self.timeout_secs)
            .field("http_client", &self.http_client.is_some())
            .finish()
    }
}

impl ChaosMonkeyConfig {
    /// Configuration pointing at the given endpoint
    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            ..Default::default()
        }
    }

    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            endpoint: Some(DEFAULT_ENDPOINT.to_string()),
            timeout_secs: Some(5),
            ..Default::default()
        }
    }

    /// Load a configuration file (TOML, YAML or JSON, by extension)
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not match the
    /// expected shape.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()?;
        settings.try_deserialize()
    }

    /// Resolve against the current process environment
    #[must_use]
    pub fn resolve(&self) -> ResolvedConfig {
        self.resolve_with(&EnvDefaults::from_env())
    }

    /// Resolve against explicitly supplied environment defaults
    ///
    /// For every field the first non-empty value wins: caller value, then
    /// environment, then the built-in default.
    #[must_use]
    pub fn resolve_with(&self, env: &EnvDefaults) -> ResolvedConfig {
        let endpoint = first_non_empty([self.endpoint.as_deref(), env.endpoint.as_deref()])
            .unwrap_or(DEFAULT_ENDPOINT);

        let username = first_non_empty([self.username.as_deref(), env.username.as_deref()]);
        let password = first_non_empty([
            self.password.as_ref().map(|p| p.expose_secret()),
            env.password.as_ref().map(|p| p.expose_secret()),
        ]);
        let credentials = match (username, password) {
            (Some(username), Some(password)) => Some(Credentials {
                username: username.to_string(),
                password: SecretString::from(password.to_string()),
            }),
            _ => None,
        };

        let user_agent = first_non_empty([self.user_agent.as_deref()])
            .map_or_else(default_user_agent, str::to_string);

        let http_client = self
            .http_client
            .clone()
            .unwrap_or_else(|| build_default_client(self.timeout_secs));

        let resolved = ResolvedConfig {
            endpoint: normalize_endpoint(endpoint),
            region: first_non_empty([self.region.as_deref()]).map(str::to_string),
            credentials,
            user_agent,
            timeout_secs: self.timeout_secs,
            http_client,
        };
        debug!(
            endpoint = %resolved.endpoint,
            auth = resolved.credentials.is_some(),
            "Resolved Chaos Monkey configuration"
        );
        resolved
    }
}

/// Defaults sourced from `CHAOSMONKEY_*` environment variables
#[derive(Clone, Default)]
pub struct EnvDefaults {
    /// Value of `CHAOSMONKEY_ENDPOINT`
    pub endpoint: Option<String>,
    /// Value of `CHAOSMONKEY_USERNAME`
    pub username: Option<String>,
    /// Value of `CHAOSMONKEY_PASSWORD`
    pub password: Option<SecretString>,
}

impl std::fmt::Debug for EnvDefaults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvDefaults")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl EnvDefaults {
    /// Read the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through an arbitrary lookup function
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            endpoint: get(ENV_ENDPOINT),
            username: get(ENV_USERNAME),
            password: get(ENV_PASSWORD).map(SecretString::from),
        }
    }
}

/// HTTP Basic Authentication credentials
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    /// Username
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Password
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Fully resolved client configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    endpoint: String,
    region: Option<String>,
    credentials: Option<Credentials>,
    user_agent: String,
    timeout_secs: Option<u64>,
    http_client: Client,
}

impl ResolvedConfig {
    /// API endpoint, always with an explicit scheme and no trailing slash
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Region sent with trigger requests
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Basic Auth credentials, present only if username and password are both set
    #[must_use]
    pub const fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// User-Agent header value
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Timeout of the default HTTP client, if one was configured
    #[must_use]
    pub const fn timeout_secs(&self) -> Option<u64> {
        self.timeout_secs
    }

    /// HTTP client used for every request
    #[must_use]
    pub const fn http_client(&self) -> &Client {
        &self.http_client
    }
}

fn first_non_empty<'a, const N: usize>(candidates: [Option<&'a str>; N]) -> Option<&'a str> {
    candidates.into_iter().flatten().find(|v| !v.is_empty())
}

/// Prefix `http://` unless the endpoint already carries an HTTP scheme
fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim_end_matches('/');
    if endpoint.starts_with("http") {
        endpoint.to_string()
    } else {
        format!("http://{endpoint}")
    }
}

fn build_default_client(timeout_secs: Option<u64>) -> Client {
    let mut builder = Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to build configured HTTP client, using defaults");
        Client::new()
    })
}
