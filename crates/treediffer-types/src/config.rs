use serde::{Deserialize, Serialize};

use crate::attr_map::AttrMap;

/// Default key of the ordered sub-item list (exercise questions).
pub const DEFAULT_SUBITEMS_KEY: &str = "assessment_items";

/// Configuration for one tree diff.
///
/// Built once (from defaults, a [`Preset`](crate::Preset), or a TOML file),
/// then passed by reference through every diff call. Nothing mutates it while
/// a diff runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Attributes to compare. `None` means every attribute found on either
    /// node plus every canonical name in the maps.
    pub attrs: Option<Vec<String>>,
    /// Attribute paths never diffed. `files.<field>` and
    /// `<subitems_key>.<field>` exclude fields inside file and sub-item records.
    pub exclude_attrs: Vec<String>,
    /// Attribute holding the ordered sub-item list, if the schema has one.
    /// An empty string in serialized form means "none".
    #[serde(with = "empty_as_none")]
    pub subitems_key: Option<String>,
    /// Attributes compared as unordered sets.
    pub setlike_attrs: Vec<String>,
    /// Aliases for the old tree.
    pub map_a: AttrMap,
    /// Aliases for the new tree.
    pub map_b: AttrMap,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            attrs: None,
            exclude_attrs: Vec::new(),
            subitems_key: Some(DEFAULT_SUBITEMS_KEY.to_string()),
            setlike_attrs: vec!["tags".to_string()],
            map_a: AttrMap::new(),
            map_b: AttrMap::new(),
        }
    }
}

impl DiffConfig {
    /// Returns `true` if `attr` is on the exclusion list.
    pub fn is_excluded(&self, attr: &str) -> bool {
        self.exclude_attrs.iter().any(|a| a == attr)
    }

    /// Returns `true` if `attr` is compared as an unordered set.
    pub fn is_setlike(&self, attr: &str) -> bool {
        self.setlike_attrs.iter().any(|a| a == attr)
    }

    /// Returns `true` if `attr` is the sub-item list key.
    pub fn is_subitems_key(&self, attr: &str) -> bool {
        self.subitems_key.as_deref() == Some(attr)
    }

    /// Excluded fields inside records nested under `prefix`
    /// (e.g. `files` yields `checksum` for `files.checksum`).
    pub fn nested_exclusions(&self, prefix: &str) -> Vec<&str> {
        self.exclude_attrs
            .iter()
            .filter_map(|a| a.strip_prefix(prefix)?.strip_prefix('.'))
            .collect()
    }
}

/// TOML has no null, so a missing sub-item key is written as `""`.
mod empty_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let value = Option::<String>::deserialize(d)?;
        Ok(value.filter(|s| !s.is_empty()))
    }
}
