//! Domain types and models

pub mod cloud_event;
pub mod credential;
pub mod event;

pub use cloud_event::CloudEvent;
pub use credential::{Credential, SinkIdentity};
pub use event::{
    ClusterEvent, EventBatch, EventMetadata, GroupVersion, GroupVersionKind, KubeEvent,
    ObjectReference,
};
