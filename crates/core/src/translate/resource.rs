//! Kind → resource name resolution
//!
//! Subjects address objects by their REST resource name (`pods`,
//! `deployments`), while events only carry the kind. Resolution is a
//! best-effort capability: it never fails, an unknown kind yields a guess and
//! an empty kind yields an empty segment.

use std::collections::HashMap;

use kube_eventbridge_domain::GroupVersionKind;

/// Maps a group/version/kind to its resource name.
pub trait ResourceResolver: Send + Sync {
    /// Lowercase, typically plural, resource name for `gvk`.
    fn guess_resource(&self, gvk: &GroupVersionKind) -> String;
}

// Kinds whose lowercase form is already plural.
const UNPLURALIZED_SUFFIXES: &[&str] = &["endpoints"];

/// The apimachinery "unsafe guess": lowercase the kind and pluralize it with
/// English suffix rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct PluralizingResolver;

impl ResourceResolver for PluralizingResolver {
    fn guess_resource(&self, gvk: &GroupVersionKind) -> String {
        if gvk.kind.is_empty() {
            return String::new();
        }

        let singular = gvk.kind.to_lowercase();

        if UNPLURALIZED_SUFFIXES.iter().any(|suffix| singular.ends_with(suffix)) {
            return singular;
        }

        if singular.ends_with('s') {
            return format!("{singular}es");
        }

        if let Some(stem) = singular.strip_suffix('y') {
            return format!("{stem}ies");
        }

        format!("{singular}s")
    }
}

/// Explicit kind → resource table with the pluralizing guess as fallback.
///
/// Keys are matched case-insensitively on the kind.
#[derive(Debug, Clone, Default)]
pub struct MappingResolver {
    resources: HashMap<String, String>,
    fallback: PluralizingResolver,
}

impl MappingResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the resource name for a kind.
    #[must_use]
    pub fn with_mapping(mut self, kind: &str, resource: impl Into<String>) -> Self {
        self.resources.insert(kind.to_lowercase(), resource.into());
        self
    }
}

impl ResourceResolver for MappingResolver {
    fn guess_resource(&self, gvk: &GroupVersionKind) -> String {
        self.resources
            .get(&gvk.kind.to_lowercase())
            .cloned()
            .unwrap_or_else(|| self.fallback.guess_resource(gvk))
    }
}
