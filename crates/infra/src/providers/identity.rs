//! Region and account resolution

use async_trait::async_trait;
use kube_eventbridge_core::IdentityResolver;
use kube_eventbridge_domain::{BridgeError, Result};
use reqwest::Method;
use tracing::{debug, instrument};

use crate::errors::InfraError;
use crate::http::HttpClient;

/// Instance metadata service reachable from every ECS node.
pub const DEFAULT_METADATA_ENDPOINT: &str = "http://100.100.100.200/latest/meta-data";

const REGION_KEY: &str = "region-id";
const ACCOUNT_KEY: &str = "owner-account-id";

/// Reads region and account from the instance metadata service.
///
/// Either value can be pinned with an override, in which case it is returned
/// without a lookup.
#[derive(Clone)]
pub struct MetadataIdentityResolver {
    http: HttpClient,
    base: String,
    region: Option<String>,
    account_id: Option<String>,
}

impl MetadataIdentityResolver {
    pub fn new(http: HttpClient, base: impl Into<String>) -> Self {
        Self { http, base: base.into(), region: None, account_id: None }
    }

    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    #[must_use]
    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    #[instrument(skip(self), fields(base = %self.base))]
    async fn lookup(&self, key: &str) -> Result<String> {
        let url = format!("{}/{key}", self.base.trim_end_matches('/'));
        let response = self.http.send(self.http.request(Method::GET, &url)).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BridgeError::Network(format!("metadata lookup of {key} returned HTTP {status}")));
        }

        let value = response.text().await.map_err(|err| BridgeError::from(InfraError::from(err)))?;
        let value = value.trim();
        if value.is_empty() {
            return Err(BridgeError::Network(format!("metadata lookup of {key} returned nothing")));
        }

        debug!(key, value, "resolved metadata");
        Ok(value.to_string())
    }
}

#[async_trait]
impl IdentityResolver for MetadataIdentityResolver {
    async fn region(&self) -> Result<String> {
        match &self.region {
            Some(region) => Ok(region.clone()),
            None => self.lookup(REGION_KEY).await,
        }
    }

    async fn account_id(&self) -> Result<String> {
        match &self.account_id {
            Some(account_id) => Ok(account_id.clone()),
            None => self.lookup(ACCOUNT_KEY).await,
        }
    }
}

/// Fixed region and account.
#[derive(Debug, Clone)]
pub struct StaticIdentityResolver {
    region: String,
    account_id: String,
}

impl StaticIdentityResolver {
    pub fn new(region: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self { region: region.into(), account_id: account_id.into() }
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentityResolver {
    async fn region(&self) -> Result<String> {
        Ok(self.region.clone())
    }

    async fn account_id(&self) -> Result<String> {
        Ok(self.account_id.clone())
    }
}
