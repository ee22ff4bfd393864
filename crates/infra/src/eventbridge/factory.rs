//! `ClientFactory` backed by the HTTP transport

use std::sync::Arc;

use kube_eventbridge_core::{ClientFactory, EventBusClient};
use kube_eventbridge_domain::{BridgeError, Credential, Result, SinkConfig};
use tracing::debug;
use url::Url;

use super::client::HttpEventBusClient;
use crate::http::HttpClient;

/// Builds [`HttpEventBusClient`]s sharing one connection pool.
#[derive(Clone)]
pub struct HttpClientFactory {
    http: HttpClient,
    endpoint_override: Option<Url>,
}

impl HttpClientFactory {
    pub fn new(http: HttpClient) -> Self {
        Self { http, endpoint_override: None }
    }

    /// Factory using the transport settings in `config`.
    ///
    /// # Errors
    /// Returns `BridgeError::Client` if the HTTP client cannot be built.
    pub fn from_config(config: &SinkConfig) -> Result<Self> {
        Ok(Self::new(HttpClient::from_config(config)?))
    }

    /// Send every request to `base` instead of `https://{endpoint}`.
    #[must_use]
    pub fn with_endpoint_override(mut self, base: Url) -> Self {
        self.endpoint_override = Some(base);
        self
    }

    fn base_url(&self, endpoint: &str) -> Result<Url> {
        match &self.endpoint_override {
            Some(base) => Ok(base.clone()),
            None => Url::parse(&format!("https://{endpoint}"))
                .map_err(|err| BridgeError::Client(format!("invalid endpoint {endpoint}: {err}"))),
        }
    }
}

impl ClientFactory for HttpClientFactory {
    fn create(&self, endpoint: &str, credential: &Credential) -> Result<Arc<dyn EventBusClient>> {
        let base = self.base_url(endpoint)?;
        let client = HttpEventBusClient::new(self.http.clone(), &base, credential)?;
        debug!(url = %client.url(), access_key_id = credential.access_key_id(), "built event bus client");
        Ok(Arc::new(client))
    }
}
