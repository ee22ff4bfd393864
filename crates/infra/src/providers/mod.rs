//! Identity and credential providers

mod credentials;
mod identity;

use std::sync::Arc;

use kube_eventbridge_core::{CredentialProvider, IdentityResolver};
use kube_eventbridge_domain::{Result, SinkConfig};

pub use credentials::{FileCredentialProvider, StaticCredentialProvider, DEFAULT_TOKEN_PATH};
pub use identity::{MetadataIdentityResolver, StaticIdentityResolver, DEFAULT_METADATA_ENDPOINT};

use crate::http::HttpClient;

/// Resolver for the configured identity.
///
/// With both region and account pinned no metadata lookups happen; otherwise
/// the metadata service fills in whatever is missing.
pub fn identity_resolver_from_config(
    config: &SinkConfig,
    http: HttpClient,
) -> Arc<dyn IdentityResolver> {
    if let (Some(region), Some(account_id)) = (&config.region, &config.account_id) {
        return Arc::new(StaticIdentityResolver::new(region, account_id));
    }

    let base = config.metadata_endpoint.as_deref().unwrap_or(DEFAULT_METADATA_ENDPOINT);
    let mut resolver = MetadataIdentityResolver::new(http, base);
    if let Some(region) = &config.region {
        resolver = resolver.with_region(region);
    }
    if let Some(account_id) = &config.account_id {
        resolver = resolver.with_account_id(account_id);
    }
    Arc::new(resolver)
}

/// Credential provider for the configured source.
///
/// Keys in the environment take precedence over the token file.
///
/// # Errors
/// Returns `BridgeError::Credential` if environment keys are incomplete.
pub fn credential_provider_from_config(config: &SinkConfig) -> Result<Arc<dyn CredentialProvider>> {
    if let Some(provider) = StaticCredentialProvider::from_env()? {
        return Ok(Arc::new(provider));
    }

    let provider = config
        .credentials_path
        .as_ref()
        .map_or_else(FileCredentialProvider::default, FileCredentialProvider::new);
    Ok(Arc::new(provider))
}
