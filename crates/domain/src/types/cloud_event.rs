//! CloudEvents envelope dispatched to the bus

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;
use uuid::Uuid;

use crate::constants::{
    BUS_NAME_EXTENSION, CLOUD_EVENTS_SPEC_VERSION, EVENT_CONTENT_TYPE, EVENT_SOURCE, EVENT_TYPE,
};

/// A CloudEvents 1.0 envelope for one cluster event.
///
/// Immutable once built. Extension attributes are flattened to the top level
/// of the structured JSON form, as the CloudEvents JSON format requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloudEvent {
    id: String,
    source: String,
    specversion: String,
    #[serde(rename = "type")]
    event_type: String,
    subject: String,
    time: String,
    datacontenttype: String,
    #[serde(serialize_with = "serialize_json_bytes")]
    data: Vec<u8>,
    #[serde(flatten)]
    extensions: BTreeMap<String, String>,
}

impl CloudEvent {
    /// Build an envelope from its variable parts; source, type, content type
    /// and spec version are fixed.
    pub fn new(
        id: Uuid,
        time: DateTime<Utc>,
        subject: impl Into<String>,
        data: Vec<u8>,
        bus_name: &str,
    ) -> Self {
        let mut extensions = BTreeMap::new();
        extensions.insert(BUS_NAME_EXTENSION.to_string(), bus_name.to_string());

        Self {
            id: id.to_string(),
            source: EVENT_SOURCE.to_string(),
            specversion: CLOUD_EVENTS_SPEC_VERSION.to_string(),
            event_type: EVENT_TYPE.to_string(),
            subject: subject.into(),
            time: time.to_rfc3339_opts(SecondsFormat::Secs, true),
            datacontenttype: EVENT_CONTENT_TYPE.to_string(),
            data,
            extensions,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn specversion(&self) -> &str {
        &self.specversion
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Dispatch time, RFC3339 with second precision.
    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn datacontenttype(&self) -> &str {
        &self.datacontenttype
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Destination bus name routed through the extension map.
    pub fn bus_name(&self) -> Option<&str> {
        self.extensions.get(BUS_NAME_EXTENSION).map(String::as_str)
    }
}

// JSON payloads are embedded as-is rather than base64 encoded.
fn serialize_json_bytes<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let raw: &RawValue = serde_json::from_slice(bytes).map_err(S::Error::custom)?;
    raw.serialize(serializer)
}
