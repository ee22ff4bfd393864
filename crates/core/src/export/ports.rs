//! Port interfaces for the export pipeline

use std::sync::Arc;

use async_trait::async_trait;
use kube_eventbridge_domain::{CloudEvent, Credential, EventBatch, Result};

/// Transport handle bound to one credential and one endpoint.
#[async_trait]
pub trait EventBusClient: Send + Sync {
    /// Publish one chunk of envelopes. Implementations apply their own retry
    /// policy; an empty chunk must be accepted as a no-op.
    async fn put_events(&self, events: &[CloudEvent]) -> Result<()>;
}

/// Builds transport clients for a credential.
pub trait ClientFactory: Send + Sync {
    /// Create a client for `endpoint` authenticated with `credential`.
    fn create(&self, endpoint: &str, credential: &Credential) -> Result<Arc<dyn EventBusClient>>;
}

/// Source of temporary access credentials.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Fetch a fresh credential.
    async fn fetch(&self) -> Result<Credential>;
}

/// Resolves the region and owning account of the node the sink runs on.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn region(&self) -> Result<String>;

    async fn account_id(&self) -> Result<String>;
}

/// Destination for event batches produced by the collector.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Stable sink name.
    fn name(&self) -> &str;

    /// Export a batch. Returns only once every event has been attempted and
    /// never fails; delivery problems are logged.
    async fn export_events(&self, batch: &EventBatch);

    /// Release resources held by the sink.
    async fn stop(&self);
}
