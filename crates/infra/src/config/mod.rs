//! Configuration loading
//!
//! Builds a validated [`SinkConfig`](kube_eventbridge_domain::SinkConfig)
//! from the sink URI, environment variables or files.

pub mod loader;

// Re-export commonly used items
pub use loader::{from_uri, load, load_from_env, load_from_file, probe_config_paths};
