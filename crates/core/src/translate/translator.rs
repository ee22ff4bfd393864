//! Cluster event → CloudEvent translator

use std::sync::Arc;

use chrono::Utc;
use kube_eventbridge_domain::{ClusterEvent, CloudEvent, SinkIdentity, TranslationError};
use uuid::Uuid;

use super::resource::{PluralizingResolver, ResourceResolver};
use super::subject::event_subject;

/// Builds one envelope per event.
///
/// Id and time are assigned at translation, so two translations of the same
/// event differ in those fields only.
#[derive(Clone)]
pub struct EventTranslator {
    identity: Arc<SinkIdentity>,
    bus_name: String,
    resources: Arc<dyn ResourceResolver>,
}

impl EventTranslator {
    /// Translator using the pluralizing kind → resource guess.
    pub fn new(identity: Arc<SinkIdentity>, bus_name: impl Into<String>) -> Self {
        Self::with_resource_resolver(identity, bus_name, Arc::new(PluralizingResolver))
    }

    pub fn with_resource_resolver(
        identity: Arc<SinkIdentity>,
        bus_name: impl Into<String>,
        resources: Arc<dyn ResourceResolver>,
    ) -> Self {
        Self { identity, bus_name: bus_name.into(), resources }
    }

    /// Subject the event will be published under.
    pub fn subject<E: ClusterEvent>(&self, event: &E) -> String {
        let reference = event.object_reference();
        let resource = self.resources.guess_resource(&reference.group_version_kind());
        event_subject(&self.identity, &reference, &resource)
    }

    /// Translate a single event.
    ///
    /// # Errors
    /// Returns `TranslationError::Serialization` if the event cannot be
    /// serialized to JSON.
    pub fn translate<E: ClusterEvent>(&self, event: &E) -> Result<CloudEvent, TranslationError> {
        let subject = self.subject(event);
        let data = serde_json::to_vec(event)?;

        Ok(CloudEvent::new(Uuid::new_v4(), Utc::now(), subject, data, &self.bus_name))
    }
}
