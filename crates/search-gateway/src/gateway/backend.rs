//! Gateway construction and request plumbing.

use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;

use elasticsearch::Elasticsearch;
use elasticsearch::auth::Credentials;
use elasticsearch::cert::CertificateValidation;
use elasticsearch::http::Url;
use elasticsearch::http::response::Response;
use elasticsearch::http::transport::{
    MultiNodeConnectionPool, SingleNodeConnectionPool, TransportBuilder,
};
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::{GatewayAuth, GatewayConfig};
use crate::error::{GatewayError, GatewayResult};

/// Convenience gateway over the Elasticsearch client.
///
/// Each method issues one request (put-settings issues a fixed
/// close/put/open sequence) and returns the raw response, lightly
/// unwrapped. Construction does not connect; use [`ping`](Self::ping) to
/// check the cluster.
///
/// ```no_run
/// use search_gateway::{GatewayConfig, SearchGateway};
/// use search_gateway::request::SearchRequest;
/// use search_gateway::result::{ResultParams, build_result};
///
/// # async fn run() -> Result<(), search_gateway::Error> {
/// let gateway = SearchGateway::new(GatewayConfig::new(["http://localhost:9200"], 2))?;
///
/// let raw = gateway.search(&SearchRequest::new("orders").with_size(20)).await?;
/// let envelope = build_result(&raw, &ResultParams::new(0, 20))?;
/// # Ok(())
/// # }
/// ```
pub struct SearchGateway {
    /// The Elasticsearch client.
    client: Elasticsearch,
    /// Configuration.
    config: GatewayConfig,
}

impl Debug for SearchGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchGateway")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SearchGateway {
    /// Creates a new gateway with the given configuration.
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let client = Self::build_client(&config)?;
        debug!(hosts = ?config.hosts, retry = config.retry, "Search gateway created");
        Ok(Self { client, config })
    }

    /// Builds the Elasticsearch client from configuration.
    fn build_client(config: &GatewayConfig) -> GatewayResult<Elasticsearch> {
        let urls = config
            .hosts
            .iter()
            .map(|host| {
                host.parse::<Url>().map_err(|e| GatewayError::InvalidConfig {
                    message: format!("invalid host URL '{}': {}", host, e),
                })
            })
            .collect::<GatewayResult<Vec<Url>>>()?;

        let mut builder = match urls.len() {
            0 => {
                return Err(GatewayError::InvalidConfig {
                    message: "no hosts configured".to_string(),
                });
            }
            1 => TransportBuilder::new(SingleNodeConnectionPool::new(urls[0].clone())),
            _ => TransportBuilder::new(MultiNodeConnectionPool::round_robin(urls, None)),
        };

        builder = builder.timeout(Duration::from_millis(config.request_timeout_ms));

        if config.disable_certificate_validation {
            builder = builder.cert_validation(CertificateValidation::None);
        }

        if let Some(ref auth) = config.auth {
            builder = match auth {
                GatewayAuth::Basic { username, password } => {
                    builder.auth(Credentials::Basic(username.clone(), password.clone()))
                }
                GatewayAuth::Bearer { token } => builder.auth(Credentials::Bearer(token.clone())),
                GatewayAuth::ApiKey { encoded } => {
                    builder.auth(Credentials::EncodedApiKey(encoded.clone()))
                }
            };
        }

        let transport = builder.build().map_err(|e| GatewayError::InvalidConfig {
            message: format!("failed to build transport: {}", e),
        })?;

        Ok(Elasticsearch::new(transport))
    }

    /// Returns the Elasticsearch client.
    pub fn client(&self) -> &Elasticsearch {
        &self.client
    }

    /// Returns the gateway configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Sends a request, re-sending it after transport failures.
    ///
    /// `request` is called once per attempt. Only failures without an HTTP
    /// response are retried; error statuses are returned to the caller.
    pub(crate) async fn send<F, Fut>(
        &self,
        operation: &'static str,
        request: F,
    ) -> GatewayResult<Response>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<Response, elasticsearch::Error>>,
    {
        let max_delay = Duration::from_millis(self.config.retry_max_delay_ms);
        let mut delay = Duration::from_millis(self.config.retry_initial_delay_ms).min(max_delay);
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;

            match request().await {
                Ok(response) => {
                    if attempts > 1 {
                        debug!(operation, attempts, "Request succeeded after retries");
                    }
                    return Ok(response);
                }
                Err(source) => {
                    if attempts > self.config.retry {
                        return Err(GatewayError::Transport { operation, source });
                    }

                    warn!(
                        operation,
                        attempt = attempts,
                        max_retries = self.config.retry,
                        delay_ms = delay.as_millis(),
                        error = %source,
                        "Request failed, retrying"
                    );

                    sleep(delay).await;
                    delay = next_delay(delay, max_delay);
                }
            }
        }
    }
}

/// Doubles a retry delay, capped at `max_delay`.
fn next_delay(delay: Duration, max_delay: Duration) -> Duration {
    delay.saturating_mul(2).min(max_delay)
}

/// Passes success responses through; turns anything else into an error.
pub(crate) async fn expect_success(
    operation: &'static str,
    response: Response,
) -> GatewayResult<Response> {
    let status = response.status_code();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::Response {
        operation,
        status: status.as_u16(),
        body,
    })
}

/// Decodes a response body as JSON.
pub(crate) async fn json_body(operation: &'static str, response: Response) -> GatewayResult<Value> {
    response
        .json::<Value>()
        .await
        .map_err(|e| GatewayError::Decode {
            operation,
            message: e.to_string(),
        })
}

/// Decodes the JSON body of a response that must be successful.
pub(crate) async fn success_json(
    operation: &'static str,
    response: Response,
) -> GatewayResult<Value> {
    json_body(operation, expect_success(operation, response).await?).await
}
