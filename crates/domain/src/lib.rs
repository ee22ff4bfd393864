//! # Kube EventBridge Domain
//!
//! Domain types and models for forwarding Kubernetes events to EventBridge.
//!
//! This crate contains:
//! - Kubernetes event and object reference types
//! - The CloudEvents envelope dispatched to the bus
//! - Credential and sink identity records
//! - Domain error types and Result definitions
//! - Sink configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other workspace crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
