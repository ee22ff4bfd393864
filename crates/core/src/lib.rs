//! # Kube EventBridge Core
//!
//! Export pipeline logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - Credential freshness policy
//! - Event → CloudEvent translation and subject naming
//! - Client lifecycle management
//! - The batch exporter and the sink that wires it together
//! - Port interfaces (traits) for credentials, identity and transport
//!
//! ## Architecture Principles
//! - Only depends on `kube-eventbridge-domain`
//! - No HTTP or filesystem code
//! - All external dependencies via traits
//! - Failures below `export` are logged, never returned

pub mod credentials;
pub mod export;
pub mod translate;

// Re-export specific items to avoid ambiguity
pub use credentials::FreshnessPolicy;
pub use export::ports::{
    ClientFactory, CredentialProvider, EventBusClient, EventSink, IdentityResolver,
};
pub use export::{BatchExporter, ClientManager, EventBridgeSink, ExportSummary, SinkPorts};
pub use translate::{
    api_version_segment, EventTranslator, MappingResolver, PluralizingResolver, ResourceResolver,
};
