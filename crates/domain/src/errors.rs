//! Error types used throughout the exporter

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the EventBridge sink
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Dispatch error: {0}")]
    Dispatch(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BridgeError {
    /// Stable label suitable for structured log fields.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Translation(_) => "translation",
            Self::Credential(_) => "credential",
            Self::Client(_) => "client",
            Self::Dispatch(_) => "dispatch",
            Self::Network(_) => "network",
            Self::Auth(_) => "auth",
            Self::Internal(_) => "internal",
        }
    }
}

/// Failure to turn a single cluster event into an envelope.
///
/// Isolated to the event that produced it; the exporter drops that event and
/// carries on with the rest of the chunk.
#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("failed to serialize event payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<TranslationError> for BridgeError {
    fn from(err: TranslationError) -> Self {
        Self::Translation(err.to_string())
    }
}

/// Result type alias for sink operations
pub type Result<T> = std::result::Result<T, BridgeError>;
