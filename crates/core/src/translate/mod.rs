//! Event → CloudEvent translation
//!
//! This module turns cluster events into envelopes and owns the subject
//! naming scheme bus consumers route on.

pub mod resource;
pub mod subject;
pub mod translator;

pub use resource::{MappingResolver, PluralizingResolver, ResourceResolver};
pub use subject::{api_version_segment, event_subject};
pub use translator::EventTranslator;
