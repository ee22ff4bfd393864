//! Sink configuration structures

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BUS_NAME, DEFAULT_MAX_ATTEMPTS, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::errors::{BridgeError, Result};

/// Configuration for the EventBridge sink
///
/// Only `cluster_id` is required. Region and account id are normally resolved
/// from the instance metadata service; setting both here bypasses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Kubernetes cluster id used in every event subject
    #[serde(default)]
    pub cluster_id: String,

    /// Destination bus name carried in the envelope extensions
    #[serde(default = "default_bus_name")]
    pub bus_name: String,

    /// Region override (skips metadata lookup when set with `account_id`)
    #[serde(default)]
    pub region: Option<String>,

    /// Account id override
    #[serde(default)]
    pub account_id: Option<String>,

    /// Path to a JSON token file holding temporary access keys
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,

    /// Base URL of the instance metadata service
    #[serde(default)]
    pub metadata_endpoint: Option<String>,

    /// Per-request timeout for outbound HTTP calls
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Total attempts per dispatch when auto-retry is enabled
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Whether the transport retries transient failures
    #[serde(default = "default_auto_retry")]
    pub auto_retry: bool,
}

impl SinkConfig {
    /// Minimal configuration for the given cluster.
    pub fn new(cluster_id: impl Into<String>) -> Self {
        Self {
            cluster_id: cluster_id.into(),
            bus_name: default_bus_name(),
            region: None,
            account_id: None,
            credentials_path: None,
            metadata_endpoint: None,
            request_timeout_secs: default_request_timeout_secs(),
            max_attempts: default_max_attempts(),
            auto_retry: default_auto_retry(),
        }
    }

    /// Check the fields the sink cannot start without.
    ///
    /// # Errors
    /// Returns `BridgeError::Configuration` if the cluster id or bus name is
    /// blank.
    pub fn validate(&self) -> Result<()> {
        if self.cluster_id.trim().is_empty() {
            return Err(BridgeError::Configuration(
                "please provide kubernetes cluster id for EventBridge".to_string(),
            ));
        }
        if self.bus_name.trim().is_empty() {
            return Err(BridgeError::Configuration("bus name must not be empty".to_string()));
        }
        Ok(())
    }
}

fn default_bus_name() -> String {
    DEFAULT_BUS_NAME.to_string()
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

const fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}

const fn default_auto_retry() -> bool {
    true
}
