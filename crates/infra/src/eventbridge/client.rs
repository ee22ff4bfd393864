//! HTTP transport for the PutEvents API

use async_trait::async_trait;
use kube_eventbridge_core::EventBusClient;
use kube_eventbridge_domain::{BridgeError, CloudEvent, Credential, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use tracing::{debug, instrument};
use url::Url;

use crate::errors::{status_error, InfraError};
use crate::http::HttpClient;

pub(crate) const PUT_EVENTS_PATH: &str = "/openapi/putEvents";
pub(crate) const BATCH_CONTENT_TYPE: &str = "application/cloudevents-batch+json; charset=utf-8";
pub(crate) const API_VERSION_HEADER: &str = "x-eventbridge-version";
pub(crate) const API_VERSION: &str = "2020-04-01";
pub(crate) const ACCESS_KEY_HEADER: &str = "x-acs-accesskey-id";
pub(crate) const SECURITY_TOKEN_HEADER: &str = "x-acs-security-token";

/// Event bus client bound to one endpoint and one credential.
pub struct HttpEventBusClient {
    http: HttpClient,
    url: Url,
    headers: HeaderMap,
}

impl HttpEventBusClient {
    /// Bind a client to the PutEvents URL under `base`.
    ///
    /// # Errors
    /// Returns `BridgeError::Client` if the URL cannot be formed or the
    /// credential contains characters that are not valid in a header.
    pub fn new(http: HttpClient, base: &Url, credential: &Credential) -> Result<Self> {
        let url = base
            .join(PUT_EVENTS_PATH)
            .map_err(|err| BridgeError::Client(format!("invalid endpoint {base}: {err}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(BATCH_CONTENT_TYPE));
        headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));
        headers.insert(ACCESS_KEY_HEADER, header_value(credential.access_key_id())?);
        if !credential.security_token().is_empty() {
            headers.insert(SECURITY_TOKEN_HEADER, header_value(credential.security_token())?);
        }

        Ok(Self { http, url, headers })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl EventBusClient for HttpEventBusClient {
    #[instrument(skip(self, events), fields(url = %self.url, events = events.len()))]
    async fn put_events(&self, events: &[CloudEvent]) -> Result<()> {
        if events.is_empty() {
            return Ok(());
        }

        let body = serde_json::to_vec(events)
            .map_err(|err| BridgeError::Dispatch(format!("failed to encode events: {err}")))?;

        let request =
            self.http.request(Method::POST, self.url.clone()).headers(self.headers.clone()).body(body);
        let response = self.http.send(request).await?;
        let status = response.status();

        if status.is_success() {
            debug!(%status, "events accepted");
            return Ok(());
        }

        let detail = response.text().await.map_err(|err| BridgeError::from(InfraError::from(err)))?;
        debug!(%status, body = %detail, "events rejected");
        Err(status_error(status))
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| BridgeError::Client("credential is not a valid header value".to_string()))
}
