//! Sink assembly from configuration

use std::sync::Arc;

use kube_eventbridge_core::{EventBridgeSink, SinkPorts};
use kube_eventbridge_domain::{Result, SinkConfig};

use crate::eventbridge::HttpClientFactory;
use crate::http::HttpClient;
use crate::providers::{credential_provider_from_config, identity_resolver_from_config};

/// Build a sink wired to the real metadata service, token file and bus.
///
/// # Errors
/// Fails if the configuration is invalid, the identity cannot be resolved or
/// an HTTP client cannot be built. Credentials are not fetched until the
/// first export.
pub async fn connect(config: &SinkConfig) -> Result<EventBridgeSink> {
    connect_with_factory(config, HttpClientFactory::from_config(config)?).await
}

/// Like [`connect`] with a caller-supplied transport factory.
///
/// # Errors
/// See [`connect`].
pub async fn connect_with_factory(
    config: &SinkConfig,
    factory: HttpClientFactory,
) -> Result<EventBridgeSink> {
    config.validate()?;

    let http = HttpClient::from_config(config)?;
    let ports = SinkPorts::new(
        identity_resolver_from_config(config, http),
        credential_provider_from_config(config)?,
        Arc::new(factory),
    );

    EventBridgeSink::new(config, ports).await
}
