//! Gateway configuration.

use serde::{Deserialize, Serialize};

/// Authentication configuration for the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatewayAuth {
    /// Basic username/password authentication.
    Basic {
        /// The username for basic auth.
        username: String,
        /// The password for basic auth.
        password: String,
    },
    /// Bearer token authentication.
    Bearer {
        /// The bearer token.
        token: String,
    },
    /// Base64 encoded `id:api_key` pair.
    ApiKey {
        /// The encoded API key.
        encoded: String,
    },
}

/// Configuration for [`SearchGateway`](crate::gateway::SearchGateway).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Engine node URLs (e.g., `["http://localhost:9200"]`).
    /// A single node uses a single-node pool, several nodes are used round-robin.
    #[serde(default = "default_hosts")]
    pub hosts: Vec<String>,

    /// How many times a request is re-sent after a transport failure (default: 2).
    #[serde(default = "default_retry")]
    pub retry: u32,

    /// Delay before the first retry in milliseconds (default: 100).
    #[serde(default = "default_retry_initial_delay_ms")]
    pub retry_initial_delay_ms: u64,

    /// Upper bound for the retry delay in milliseconds (default: 2000).
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,

    /// Request timeout in milliseconds (default: 30000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Optional authentication.
    #[serde(default)]
    pub auth: Option<GatewayAuth>,

    /// Whether to disable certificate validation (default: false).
    /// Only use for development/testing.
    #[serde(default)]
    pub disable_certificate_validation: bool,

    /// Primary shards for indices created without explicit settings (default: 1).
    #[serde(default = "default_shards")]
    pub default_number_of_shards: u32,

    /// Replicas for indices created without explicit settings (default: 0).
    #[serde(default)]
    pub default_number_of_replicas: u32,
}

fn default_hosts() -> Vec<String> {
    vec!["http://localhost:9200".to_string()]
}

fn default_retry() -> u32 {
    2
}

fn default_retry_initial_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_request_timeout_ms() -> u64 {
    30000
}

fn default_shards() -> u32 {
    1
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            hosts: default_hosts(),
            retry: default_retry(),
            retry_initial_delay_ms: default_retry_initial_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            auth: None,
            disable_certificate_validation: false,
            default_number_of_shards: default_shards(),
            default_number_of_replicas: 0,
        }
    }
}

impl GatewayConfig {
    /// Creates a configuration for the given hosts and retry count.
    pub fn new<I, S>(hosts: I, retry: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts.into_iter().map(Into::into).collect(),
            retry,
            ..Default::default()
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// - `ELASTICSEARCH_HOSTS` - comma separated node URLs
    /// - `ELASTICSEARCH_RETRY` - retry count
    /// - `ELASTICSEARCH_TIMEOUT_MS` - request timeout
    /// - `ELASTICSEARCH_USERNAME` / `ELASTICSEARCH_PASSWORD` - basic auth
    /// - `ELASTICSEARCH_API_KEY` - encoded API key (wins over basic auth)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let hosts = lookup("ELASTICSEARCH_HOSTS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|h| !h.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|h| !h.is_empty())
            .unwrap_or(defaults.hosts);

        let auth = match (
            lookup("ELASTICSEARCH_API_KEY"),
            lookup("ELASTICSEARCH_USERNAME"),
            lookup("ELASTICSEARCH_PASSWORD"),
        ) {
            (Some(encoded), _, _) => Some(GatewayAuth::ApiKey { encoded }),
            (None, Some(username), Some(password)) => {
                Some(GatewayAuth::Basic { username, password })
            }
            _ => None,
        };

        Self {
            hosts,
            retry: lookup("ELASTICSEARCH_RETRY")
                .and_then(|r| r.parse().ok())
                .unwrap_or(defaults.retry),
            request_timeout_ms: lookup("ELASTICSEARCH_TIMEOUT_MS")
                .and_then(|t| t.parse().ok())
                .unwrap_or(defaults.request_timeout_ms),
            auth,
            ..defaults
        }
    }
}
