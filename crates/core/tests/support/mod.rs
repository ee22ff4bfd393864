//! Shared test helpers for `kube-eventbridge-core` integration tests.
//!
//! In-memory mocks for every export port so pipeline tests can assert on
//! what was dispatched without any network I/O.

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, SecondsFormat, Utc};
use kube_eventbridge_core::{ClientFactory, CredentialProvider, EventBusClient, IdentityResolver};
use kube_eventbridge_domain::{
    BridgeError, CloudEvent, ClusterEvent, Credential, KubeEvent, ObjectReference,
    Result as DomainResult, SinkIdentity,
};
use serde::{Serialize, Serializer};

// ============================================================================
// Fixtures
// ============================================================================

pub fn identity() -> SinkIdentity {
    SinkIdentity::new("c1234", "cn-hangzhou", "1888").expect("identity")
}

/// Credential expiring `minutes` from now.
pub fn credential_expiring_in(access_key_id: &str, minutes: i64) -> Credential {
    let expiry = (Utc::now() + Duration::minutes(minutes)).to_rfc3339_opts(SecondsFormat::Secs, true);
    Credential::new(access_key_id, "secret", "token", expiry)
}

/// `count` pod events named `pod-0`, `pod-1`, ...
pub fn pod_events(count: usize) -> Vec<KubeEvent> {
    (0..count).map(|i| KubeEvent::new("v1", "Pod", "default", format!("pod-{i}"))).collect()
}

/// Object name encoded in an envelope subject (its last path segment).
pub fn subject_name(event: &CloudEvent) -> String {
    event.subject().rsplit('/').next().unwrap_or_default().to_string()
}

/// Event whose serialization can be made to fail.
pub enum TestEvent {
    Valid(KubeEvent),
    Unserializable(String),
}

impl Serialize for TestEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Valid(event) => event.serialize(serializer),
            Self::Unserializable(name) => {
                Err(serde::ser::Error::custom(format!("{name} cannot be encoded")))
            }
        }
    }
}

impl ClusterEvent for TestEvent {
    fn object_reference(&self) -> ObjectReference {
        match self {
            Self::Valid(event) => event.object_reference(),
            Self::Unserializable(name) => ObjectReference {
                api_version: "v1".into(),
                kind: "Pod".into(),
                namespace: "default".into(),
                name: name.clone(),
            },
        }
    }
}

// ============================================================================
// Transport
// ============================================================================

/// Records every chunk handed to any client it backs.
#[derive(Default)]
pub struct DispatchRecorder {
    chunks: Mutex<Vec<Vec<CloudEvent>>>,
    failing_calls: Mutex<HashSet<usize>>,
    calls: AtomicUsize,
}

impl DispatchRecorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make the `call`-th dispatch (0-based) fail.
    pub fn fail_call(&self, call: usize) {
        self.failing_calls.lock().unwrap().insert(call);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Chunks the transport accepted.
    pub fn chunks(&self) -> Vec<Vec<CloudEvent>> {
        self.chunks.lock().unwrap().clone()
    }

    fn record(&self, events: &[CloudEvent]) -> DomainResult<()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_calls.lock().unwrap().contains(&call) {
            return Err(BridgeError::Dispatch(format!("call {call} rejected")));
        }
        self.chunks.lock().unwrap().push(events.to_vec());
        Ok(())
    }
}

pub struct RecordingClient {
    pub access_key_id: String,
    recorder: Arc<DispatchRecorder>,
}

#[async_trait]
impl EventBusClient for RecordingClient {
    async fn put_events(&self, events: &[CloudEvent]) -> DomainResult<()> {
        self.recorder.record(events)
    }
}

/// Factory producing recording clients; can be told to fail construction.
pub struct MockClientFactory {
    recorder: Arc<DispatchRecorder>,
    created: Mutex<Vec<(String, String)>>,
    fail: Mutex<bool>,
}

impl MockClientFactory {
    pub fn new(recorder: Arc<DispatchRecorder>) -> Arc<Self> {
        Arc::new(Self { recorder, created: Mutex::new(Vec::new()), fail: Mutex::new(false) })
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    /// `(endpoint, access key id)` of every client built so far.
    pub fn created(&self) -> Vec<(String, String)> {
        self.created.lock().unwrap().clone()
    }
}

impl ClientFactory for MockClientFactory {
    fn create(
        &self,
        endpoint: &str,
        credential: &Credential,
    ) -> DomainResult<Arc<dyn EventBusClient>> {
        if *self.fail.lock().unwrap() {
            return Err(BridgeError::Client("client construction failed".into()));
        }
        self.created
            .lock()
            .unwrap()
            .push((endpoint.to_string(), credential.access_key_id().to_string()));
        Ok(Arc::new(RecordingClient {
            access_key_id: credential.access_key_id().to_string(),
            recorder: Arc::clone(&self.recorder),
        }))
    }
}

// ============================================================================
// Credentials & identity
// ============================================================================

/// Hands out scripted credential results in order.
#[derive(Default)]
pub struct ScriptedCredentialProvider {
    script: Mutex<VecDeque<DomainResult<Credential>>>,
    fetches: AtomicUsize,
}

impl ScriptedCredentialProvider {
    pub fn new(script: Vec<DomainResult<Credential>>) -> Arc<Self> {
        Arc::new(Self { script: Mutex::new(script.into()), fetches: AtomicUsize::new(0) })
    }

    pub fn push(&self, result: DomainResult<Credential>) {
        self.script.lock().unwrap().push_back(result);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialProvider for ScriptedCredentialProvider {
    async fn fetch(&self) -> DomainResult<Credential> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BridgeError::Credential("no credential available".into())))
    }
}

/// Identity resolver returning fixed values, or failing.
pub struct FixedIdentityResolver {
    pub region: DomainResult<String>,
    pub account_id: DomainResult<String>,
}

impl FixedIdentityResolver {
    pub fn new(region: &str, account_id: &str) -> Arc<Self> {
        Arc::new(Self { region: Ok(region.to_string()), account_id: Ok(account_id.to_string()) })
    }

    pub fn failing_region() -> Arc<Self> {
        Arc::new(Self {
            region: Err(BridgeError::Network("metadata service unreachable".into())),
            account_id: Ok("1888".to_string()),
        })
    }
}

#[async_trait]
impl IdentityResolver for FixedIdentityResolver {
    async fn region(&self) -> DomainResult<String> {
        self.region.clone()
    }

    async fn account_id(&self) -> DomainResult<String> {
        self.account_id.clone()
    }
}

// ============================================================================
// Log capture
// ============================================================================

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Route events on the current thread here until the guard drops.
    ///
    /// Only sound with the current-thread runtime `#[tokio::test]` uses by
    /// default, since the default subscriber is thread-local.
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let logs = Self::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("log buffer")).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
