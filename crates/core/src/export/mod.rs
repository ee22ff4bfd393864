//! Export pipeline
//!
//! This module provides the batch exporter, the client lifecycle manager and
//! the sink assembling them, along with the ports they depend on.

pub mod client_manager;
pub mod exporter;
pub mod ports;
pub mod sink;

pub use client_manager::ClientManager;
pub use exporter::{BatchExporter, ExportSummary};
pub use ports::{ClientFactory, CredentialProvider, EventBusClient, EventSink, IdentityResolver};
pub use sink::{EventBridgeSink, SinkPorts};
