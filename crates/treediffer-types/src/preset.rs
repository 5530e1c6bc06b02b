//! Named configuration bundles for known tree schemas.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::attr_map::AttrMap;
use crate::config::DiffConfig;
use crate::error::TypeError;

/// Node attributes editable in Studio.
pub const STUDIO_NODE_ATTRIBUTES: &[&str] = &[
    "title",
    "description",
    "license_id",
    "license_description",
    "language_id",
    "copyright_holder",
    "extra_fields",
    "author",
    "aggregator",
    "provider",
    "role_visibility",
    "kind_id",
    "content_id",
];

/// A named bundle of mapping and exclusion settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Trees produced by the ricecooker channel builder (questions as
    /// sub-items, attributes compared under their own names).
    Ricecooker,
    /// Kolibri channel databases exported as JSON (`id` node ids, no
    /// sub-item list, assessment item ids compared as a set).
    Kolibri,
    /// Studio trees: only the editable node attributes are compared.
    Studio,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Ricecooker, Preset::Kolibri, Preset::Studio];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Ricecooker => "ricecooker",
            Preset::Kolibri => "kolibri",
            Preset::Studio => "studio",
        }
    }

    /// The preset applied on top of [`DiffConfig::default`].
    pub fn config(self) -> DiffConfig {
        self.apply(DiffConfig::default())
    }

    /// Override the fields of `config` this preset defines; all other fields
    /// are left as given.
    pub fn apply(self, mut config: DiffConfig) -> DiffConfig {
        match self {
            Preset::Ricecooker => {
                // Ricecooker serializes license fields flat on the wire.
                config.subitems_key = Some("questions".to_string());
                config.map_a = AttrMap::new();
                config.map_b = AttrMap::new();
            }
            Preset::Kolibri => {
                let map: AttrMap = [
                    ("node_id", "id"),
                    ("license_id", "license_name"),
                    ("copyright_holder", "license_owner"),
                ]
                .into_iter()
                .collect();
                config.subitems_key = None;
                // Assessment items are ordered, but kolibri only exposes their ids.
                config.setlike_attrs = vec!["tags".into(), "assessment_item_ids".into()];
                config.map_a = map.clone();
                config.map_b = map;
            }
            Preset::Studio => {
                config.attrs = Some(STUDIO_NODE_ATTRIBUTES.iter().map(|a| a.to_string()).collect());
                config.subitems_key = Some("assessment_items".to_string());
                config.setlike_attrs = vec!["tags".into()];
            }
        }
        config
    }
}

impl FromStr for Preset {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| TypeError::UnknownPreset(s.to_string()))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_and_unknown_presets() {
        assert_eq!("kolibri".parse::<Preset>(), Ok(Preset::Kolibri));
        assert_eq!("Studio".parse::<Preset>(), Ok(Preset::Studio));
        assert_eq!(
            "sushibar".parse::<Preset>(),
            Err(TypeError::UnknownPreset("sushibar".into()))
        );
    }

    #[test]
    fn kolibri_maps_node_id_and_drops_subitems() {
        let config = Preset::Kolibri.config();
        assert_eq!(config.map_a.resolve("node_id"), "id");
        assert_eq!(config.map_b.resolve("copyright_holder"), "license_owner");
        assert_eq!(config.subitems_key, None);
        assert!(config.is_setlike("assessment_item_ids"));
    }

    #[test]
    fn apply_keeps_fields_the_preset_does_not_define() {
        let base = DiffConfig {
            exclude_attrs: vec!["modified".into()],
            map_a: AttrMap::new().with("title", "name"),
            ..Default::default()
        };
        let config = Preset::Ricecooker.apply(base);
        assert_eq!(config.exclude_attrs, vec!["modified"]);
        assert_eq!(config.subitems_key.as_deref(), Some("questions"));
        assert_eq!(config.map_a, AttrMap::new());
        assert_eq!(config.map_b.resolve("license_id"), "license_id");
    }

    #[test]
    fn studio_limits_compared_attributes() {
        let attrs = Preset::Studio.config().attrs.unwrap();
        assert!(attrs.iter().any(|a| a == "title"));
        assert!(!attrs.iter().any(|a| a == "node_id"));
    }
}
