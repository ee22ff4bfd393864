//! Subject naming
//!
//! Subjects mirror an object's selfLink under a cluster-scoped prefix:
//!
//! ```text
//! acs:cs:{region}:{account}:{clusterId}/apis/{apiVersion}/namespaces/{namespace}/{resource}/{name}
//! ```

use std::borrow::Cow;

use kube_eventbridge_domain::constants::VERSION_UNKNOWN_SUFFIX;
use kube_eventbridge_domain::{ObjectReference, SinkIdentity};

/// The `apiVersion` segment of a subject.
///
/// Core versions (`v1`) and full group/version pairs (`apps/v1`) pass through.
/// A dotted value without `/` is a bare group name, so `/versionUnknown` is
/// appended to keep it distinguishable from a group/version pair.
pub fn api_version_segment(api_version: &str) -> Cow<'_, str> {
    if api_version.contains('.') && !api_version.contains('/') {
        Cow::Owned(format!("{api_version}{VERSION_UNKNOWN_SUFFIX}"))
    } else {
        Cow::Borrowed(api_version)
    }
}

/// Full subject for an object reference.
pub fn event_subject(identity: &SinkIdentity, reference: &ObjectReference, resource: &str) -> String {
    format!(
        "{}/apis/{}/namespaces/{}/{}/{}",
        identity.subject_prefix(),
        api_version_segment(&reference.api_version),
        reference.namespace,
        resource,
        reference.name
    )
}
