//! # Kube EventBridge Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The retrying HTTP client and error conversions
//! - The PutEvents transport and its client factory
//! - Metadata identity and token file credential providers
//! - Configuration loading (sink URI, environment, files)
//! - Tracing setup and sink assembly
//!
//! ## Architecture
//! - Implements traits defined in `kube-eventbridge-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod bootstrap;
pub mod config;
pub mod errors;
pub mod eventbridge;
pub mod http;
pub mod observability;
pub mod providers;

// Re-export commonly used items
pub use bootstrap::{connect, connect_with_factory};
pub use errors::InfraError;
pub use eventbridge::{HttpClientFactory, HttpEventBusClient};
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::{init_tracing, LogFormat};
pub use providers::{
    credential_provider_from_config, identity_resolver_from_config, FileCredentialProvider,
    MetadataIdentityResolver, StaticCredentialProvider, StaticIdentityResolver,
};
