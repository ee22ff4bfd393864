//! Kubernetes event records and object references

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// API group and version parsed from an `apiVersion` string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupVersion {
    pub group: String,
    pub version: String,
}

impl GroupVersion {
    /// Parse `"v1"`, `"apps/v1"` or `""`.
    ///
    /// Returns `None` when the string has more than one `/`, matching the
    /// apimachinery parser.
    #[must_use]
    pub fn parse(api_version: &str) -> Option<Self> {
        if api_version.is_empty() || api_version == "/" {
            return Some(Self::default());
        }

        match api_version.split_once('/') {
            None => Some(Self { group: String::new(), version: api_version.to_string() }),
            Some((_, rest)) if rest.contains('/') => None,
            Some((group, version)) => {
                Some(Self { group: group.to_string(), version: version.to_string() })
            }
        }
    }
}

/// Group, version and kind of a Kubernetes object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

/// Reference to the object an event is about; the input to subject naming.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectReference {
    #[serde(rename = "apiVersion", default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub name: String,
}

impl ObjectReference {
    /// Group/version/kind of the reference. An unparsable `apiVersion` yields
    /// an empty group and version rather than an error.
    #[must_use]
    pub fn group_version_kind(&self) -> GroupVersionKind {
        let gv = GroupVersion::parse(&self.api_version).unwrap_or_default();
        GroupVersionKind { group: gv.group, version: gv.version, kind: self.kind.clone() }
    }
}

/// An event the sink can export.
///
/// The whole value is serialized as the envelope payload; the object
/// reference drives the envelope subject.
pub trait ClusterEvent: Serialize + Send + Sync {
    /// Reference used to address this event on the bus.
    fn object_reference(&self) -> ObjectReference;
}

/// Object metadata carried by a Kubernetes event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Keys serialized from the typed fields of `KubeEvent`.
const RESERVED_KEYS: [&str; 3] = ["apiVersion", "kind", "metadata"];

/// A Kubernetes `core/v1` event as handed over by the collector.
///
/// Only the fields used for addressing are typed; everything else is kept
/// verbatim so the exported payload matches what the API server returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KubeEvent {
    #[serde(rename = "apiVersion", default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub metadata: EventMetadata,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl KubeEvent {
    /// Create an event with the addressing fields set and an empty payload.
    pub fn new(
        api_version: impl Into<String>,
        kind: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            metadata: EventMetadata {
                name: name.into(),
                namespace: namespace.into(),
                extra: Map::new(),
            },
            payload: Map::new(),
        }
    }

    /// Attach a top-level payload field (`reason`, `message`, ...).
    ///
    /// `apiVersion`, `kind` and `metadata` are typed fields; passing one of
    /// them here is ignored so the serialized event never repeats a key.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if !RESERVED_KEYS.contains(&key.as_str()) {
            self.payload.insert(key, value);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }
}

impl ClusterEvent for KubeEvent {
    fn object_reference(&self) -> ObjectReference {
        ObjectReference {
            api_version: self.api_version.clone(),
            kind: self.kind.clone(),
            namespace: self.metadata.namespace.clone(),
            name: self.metadata.name.clone(),
        }
    }
}

/// A batch of events delivered by the collector in one export cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventBatch {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub events: Vec<KubeEvent>,
}

impl EventBatch {
    pub fn new(events: Vec<KubeEvent>) -> Self {
        Self { timestamp: chrono::Utc::now(), events }
    }
}
