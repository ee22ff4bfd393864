//! Client lifecycle management
//!
//! Owns the single live transport client and the credential it was built
//! with. The pair is created lazily on first use and swapped wholesale when
//! the credential stops being fresh. Read-validate-replace runs under one
//! async mutex, so concurrent callers never build two clients for the same
//! refresh.

use std::sync::Arc;

use kube_eventbridge_domain::{Credential, Result, SinkIdentity};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use super::ports::{ClientFactory, CredentialProvider, EventBusClient};
use crate::credentials::FreshnessPolicy;

struct ClientState {
    client: Arc<dyn EventBusClient>,
    credential: Credential,
}

/// Lazily constructed, credential-aware transport client.
pub struct ClientManager {
    endpoint: String,
    credentials: Arc<dyn CredentialProvider>,
    factory: Arc<dyn ClientFactory>,
    freshness: FreshnessPolicy,
    state: Mutex<Option<ClientState>>,
}

impl ClientManager {
    /// Create a manager for the identity's endpoint. No client is built until
    /// the first [`get_client`](Self::get_client).
    pub fn new(
        identity: &SinkIdentity,
        credentials: Arc<dyn CredentialProvider>,
        factory: Arc<dyn ClientFactory>,
    ) -> Self {
        Self::with_freshness(identity, credentials, factory, FreshnessPolicy::default())
    }

    pub fn with_freshness(
        identity: &SinkIdentity,
        credentials: Arc<dyn CredentialProvider>,
        factory: Arc<dyn ClientFactory>,
        freshness: FreshnessPolicy,
    ) -> Self {
        Self {
            endpoint: identity.endpoint(),
            credentials,
            factory,
            freshness,
            state: Mutex::new(None),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Return the cached client, rebuilding it if missing or stale.
    ///
    /// # Errors
    /// Propagates credential fetch and client construction failures. The
    /// previously cached client, if any, is left in place on error.
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn get_client(&self) -> Result<Arc<dyn EventBusClient>> {
        let mut state = self.state.lock().await;

        if let Some(current) = state.as_ref() {
            if self.freshness.is_valid(&current.credential) {
                return Ok(Arc::clone(&current.client));
            }
            debug!("cached credential is stale, rebuilding client");
        }

        let credential = self.credentials.fetch().await?;
        let client = self.factory.create(&self.endpoint, &credential)?;

        info!(
            access_key_id = credential.access_key_id(),
            expiration = credential.expiration(),
            "created EventBridge client"
        );

        *state = Some(ClientState { client: Arc::clone(&client), credential });
        Ok(client)
    }

    /// Drop the cached client; the next call rebuilds it.
    pub async fn invalidate(&self) {
        if self.state.lock().await.take().is_some() {
            debug!("dropped cached EventBridge client");
        }
    }

    /// Whether a client is currently cached.
    pub async fn has_client(&self) -> bool {
        self.state.lock().await.is_some()
    }
}
