//! EventBridge sink
//!
//! Wires identity resolution, translation, client lifecycle and batch export
//! behind the collector-facing [`EventSink`] contract.

use std::sync::Arc;

use async_trait::async_trait;
use kube_eventbridge_domain::constants::SINK_NAME;
use kube_eventbridge_domain::{ClusterEvent, EventBatch, Result, SinkConfig, SinkIdentity};
use tracing::{info, instrument};

use super::client_manager::ClientManager;
use super::exporter::{BatchExporter, ExportSummary};
use super::ports::{ClientFactory, CredentialProvider, EventSink, IdentityResolver};
use crate::translate::{EventTranslator, PluralizingResolver, ResourceResolver};

/// External capabilities the sink is built from.
#[derive(Clone)]
pub struct SinkPorts {
    pub identity: Arc<dyn IdentityResolver>,
    pub credentials: Arc<dyn CredentialProvider>,
    pub clients: Arc<dyn ClientFactory>,
    pub resources: Arc<dyn ResourceResolver>,
}

impl SinkPorts {
    /// Ports with the pluralizing kind → resource guess.
    pub fn new(
        identity: Arc<dyn IdentityResolver>,
        credentials: Arc<dyn CredentialProvider>,
        clients: Arc<dyn ClientFactory>,
    ) -> Self {
        Self { identity, credentials, clients, resources: Arc::new(PluralizingResolver) }
    }

    #[must_use]
    pub fn with_resource_resolver(mut self, resources: Arc<dyn ResourceResolver>) -> Self {
        self.resources = resources;
        self
    }
}

/// Sink forwarding cluster events to EventBridge.
pub struct EventBridgeSink {
    identity: Arc<SinkIdentity>,
    clients: Arc<ClientManager>,
    exporter: BatchExporter,
}

impl EventBridgeSink {
    /// Validate the configuration, resolve region and account, and assemble
    /// the pipeline. No credential is fetched until the first export.
    ///
    /// # Errors
    /// Returns `BridgeError::Configuration` when the cluster id is missing,
    /// and propagates identity resolution failures. No sink is created in
    /// either case.
    #[instrument(skip_all, fields(cluster_id = %config.cluster_id))]
    pub async fn new(config: &SinkConfig, ports: SinkPorts) -> Result<Self> {
        config.validate()?;

        let region = ports.identity.region().await?;
        let account_id = ports.identity.account_id().await?;
        let identity = Arc::new(SinkIdentity::new(&config.cluster_id, region, account_id)?);

        let clients =
            Arc::new(ClientManager::new(&identity, ports.credentials, ports.clients));
        let translator = EventTranslator::with_resource_resolver(
            Arc::clone(&identity),
            &config.bus_name,
            ports.resources,
        );

        info!(
            region = identity.region(),
            account_id = identity.account_id(),
            endpoint = clients.endpoint(),
            bus_name = %config.bus_name,
            "EventBridge sink created"
        );

        Ok(Self {
            identity,
            exporter: BatchExporter::new(translator, Arc::clone(&clients)),
            clients,
        })
    }

    pub fn identity(&self) -> &SinkIdentity {
        &self.identity
    }

    pub fn clients(&self) -> &Arc<ClientManager> {
        &self.clients
    }

    /// Export any cluster event type, returning the outcome counters.
    pub async fn export<E: ClusterEvent>(&self, events: &[E]) -> ExportSummary {
        self.exporter.export(events).await
    }
}

#[async_trait]
impl EventSink for EventBridgeSink {
    fn name(&self) -> &str {
        SINK_NAME
    }

    async fn export_events(&self, batch: &EventBatch) {
        if batch.events.is_empty() {
            return;
        }
        self.export(&batch.events).await;
    }

    async fn stop(&self) {
        // no background task; only the cached client is released
        self.clients.invalidate().await;
    }
}
