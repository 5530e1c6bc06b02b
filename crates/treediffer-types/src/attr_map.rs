//! Attribute aliasing between tree schemas.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::node::{lookup_path, Node};

/// Maps canonical attribute names to the field path a tree actually uses.
///
/// An old tree may call a field `license_id` while the new tree stores the
/// same value under `license.license_id`. Names with no entry resolve to
/// themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttrMap(BTreeMap<String, String>);

impl AttrMap {
    /// Create an empty (identity) map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an alias.
    pub fn insert(&mut self, canonical: impl Into<String>, source: impl Into<String>) {
        self.0.insert(canonical.into(), source.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, canonical: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(canonical, source);
        self
    }

    /// Source field path for `canonical`.
    pub fn resolve<'a>(&'a self, canonical: &'a str) -> &'a str {
        self.0.get(canonical).map(String::as_str).unwrap_or(canonical)
    }

    /// The explicit alias for `canonical`, if any.
    pub fn alias(&self, canonical: &str) -> Option<&str> {
        self.0.get(canonical).map(String::as_str)
    }

    /// Value of the canonical attribute on `node`, if present.
    pub fn get<'n>(&self, node: &'n Node, canonical: &str) -> Option<&'n Value> {
        lookup_path(node, self.resolve(canonical))
    }

    /// All canonical names with an explicit alias.
    pub fn canonical_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// The set of mapped-to source paths.
    pub fn source_paths(&self) -> BTreeSet<&str> {
        self.0.values().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttrMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unmapped_names_resolve_to_themselves() {
        let map = AttrMap::new().with("license_id", "license.license_id");
        assert_eq!(map.resolve("title"), "title");
        assert_eq!(map.resolve("license_id"), "license.license_id");
    }

    #[test]
    fn get_follows_nested_alias() {
        let map = AttrMap::new().with("license_id", "license.license_id");
        let node = json!({"license": {"license_id": "CC BY-SA"}});
        let node = node.as_object().unwrap();
        assert_eq!(map.get(node, "license_id"), Some(&json!("CC BY-SA")));
        assert_eq!(map.get(node, "title"), None);
    }

    #[test]
    fn source_paths_collects_values() {
        let map: AttrMap = [("node_id", "id"), ("license_id", "license_name")]
            .into_iter()
            .collect();
        let paths = map.source_paths();
        assert!(paths.contains("id"));
        assert!(paths.contains("license_name"));
        assert!(!paths.contains("node_id"));
    }
}
