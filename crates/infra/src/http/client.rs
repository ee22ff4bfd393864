use std::time::Duration;

use kube_eventbridge_domain::constants::{DEFAULT_MAX_ATTEMPTS, DEFAULT_REQUEST_TIMEOUT_SECS};
use kube_eventbridge_domain::{BridgeError, SinkConfig};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};

use crate::errors::InfraError;

/// Outbound HTTP client with bounded retries and exponential backoff.
///
/// Server errors and throttling responses are retried until the attempt budget
/// is spent; the last response is then handed back to the caller unchanged.
/// Connection failures and timeouts are retried the same way and surface as
/// `BridgeError::Network` once exhausted.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Client configured from the sink's transport settings.
    ///
    /// With `auto_retry` disabled every request is attempted exactly once.
    pub fn from_config(config: &SinkConfig) -> Result<Self, BridgeError> {
        let attempts = if config.auto_retry { config.max_attempts } else { 1 };
        Self::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .max_attempts(attempts)
            .build()
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the request, retrying transient failures.
    ///
    /// The body must be buffered so the request can be cloned per attempt.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, BridgeError> {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let request = builder
                .try_clone()
                .ok_or_else(|| BridgeError::Internal("request body is not replayable".into()))?
                .build()
                .map_err(|err| BridgeError::from(InfraError::from(err)))?;

            let method = request.method().clone();
            let url = request.url().clone();
            debug!(attempt, %method, %url, "sending HTTP request");

            let last_attempt = attempt >= attempts;
            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, %method, %url, %status, "received HTTP response");

                    if !last_attempt && is_retryable_status(status) {
                        warn!(attempt, %url, %status, "transient HTTP status, retrying");
                        self.sleep_with_backoff(attempt).await;
                        continue;
                    }

                    return Ok(response);
                }
                Err(err) => {
                    if !last_attempt && is_retryable_error(&err) {
                        warn!(attempt, %url, error = %err, "HTTP request failed, retrying");
                        self.sleep_with_backoff(attempt).await;
                        continue;
                    }

                    return Err(InfraError::from(err).into());
                }
            }
        }
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8) as u32;
        self.base_backoff.saturating_mul(1u32 << shift)
    }

    async fn sleep_with_backoff(&self, retry_number: usize) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: String,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff: Duration::from_millis(200),
            user_agent: concat!("kube-eventbridge/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    pub fn build(self) -> Result<HttpClient, BridgeError> {
        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .no_proxy()
            .build()
            .map_err(|err| BridgeError::Client(format!("failed to build HTTP client: {err}")))?;

        Ok(HttpClient { client, max_attempts: self.max_attempts, base_backoff: self.base_backoff })
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    if err.is_timeout() || err.is_request() {
        return true;
    }
    #[cfg(not(target_arch = "wasm32"))]
    if err.is_connect() {
        return true;
    }
    false
}
