//! Attribute-level diff of two node records.
//!
//! Plain attributes are compared by exact equality. Three kinds of attribute
//! get special handling:
//!
//! - set-like attributes (tags) ignore element order
//! - `files` is compared as an unordered collection of file records
//! - the sub-item list (assessment items) is delegated to [`diff_subitems`]

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use tracing::debug;

use treediffer_types::{value_kind, DiffConfig, Node, TypeError, CHILDREN_KEY, FILES_KEY};

use crate::error::DiffResult;
use crate::record::{AttributeDiff, Attributes};
use crate::subitems::diff_subitems;
use crate::warning::DiffWarning;

/// The result of comparing the attributes of two nodes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributesDiff {
    /// Attributes present only on the new node.
    pub added: Vec<String>,
    /// Attributes present only on the old node.
    pub deleted: Vec<String>,
    /// Attributes present on both with different values.
    pub modified: Vec<String>,
    /// Every compared attribute, changed or not.
    pub attributes: Attributes,
    pub warnings: Vec<DiffWarning>,
}

impl AttributesDiff {
    /// Returns `true` if any attribute was added, deleted, or modified.
    pub fn has_changes(&self) -> bool {
        !(self.added.is_empty() && self.deleted.is_empty() && self.modified.is_empty())
    }

    /// Only the attributes that changed.
    pub fn changed_attributes(&self) -> Attributes {
        self.added
            .iter()
            .chain(&self.deleted)
            .chain(&self.modified)
            .filter_map(|name| Some((name.clone(), self.attributes.get(name)?.clone())))
            .collect()
    }

    fn record_added(&mut self, attr: &str, value: &Value) {
        self.attributes
            .insert(attr.to_string(), AttributeDiff::current(value.clone()));
        self.added.push(attr.to_string());
    }

    fn record_deleted(&mut self, attr: &str, old_value: &Value) {
        self.attributes
            .insert(attr.to_string(), AttributeDiff::previous(old_value.clone()));
        self.deleted.push(attr.to_string());
    }

    fn record_unchanged(&mut self, attr: &str, value: &Value) {
        self.attributes
            .insert(attr.to_string(), AttributeDiff::current(value.clone()));
    }

    fn record_modified(&mut self, attr: &str, diff: AttributeDiff) {
        self.attributes.insert(attr.to_string(), diff);
        self.modified.push(attr.to_string());
    }
}

/// Element-level diff of two file lists.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilesDiff {
    pub added: Vec<Value>,
    pub deleted: Vec<Value>,
}

impl FilesDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty()
    }
}

/// The attribute names to compare when none are configured: every canonical
/// name in either map, plus every key on either node that is not itself the
/// target of an alias. Mapping keys prefixed `root.` only configure root
/// identity and are never compared.
fn all_attributes(a: &Node, b: &Node, config: &DiffConfig) -> Vec<String> {
    let mut attrs: BTreeSet<String> = config
        .map_a
        .canonical_names()
        .chain(config.map_b.canonical_names())
        .filter(|name| !name.starts_with("root."))
        .map(str::to_string)
        .collect();
    let sources_a = config.map_a.source_paths();
    let sources_b = config.map_b.source_paths();
    attrs.extend(
        a.keys()
            .filter(|k| !sources_a.contains(k.as_str()))
            .cloned(),
    );
    attrs.extend(
        b.keys()
            .filter(|k| !sources_b.contains(k.as_str()))
            .cloned(),
    );
    attrs.into_iter().collect()
}

fn as_list<'v>(attr: &str, value: &'v Value) -> Result<&'v [Value], TypeError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| TypeError::UnexpectedType {
            context: attr.to_string(),
            expected: "array",
            actual: value_kind(value),
        })
}

/// Set key for a set-like element: strings by content, anything else by
/// its JSON text.
fn set_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Elements of a set-like value keyed for comparison. A scalar counts as a
/// one-element set.
fn as_set(value: &Value) -> BTreeMap<String, &Value> {
    match value {
        Value::Array(items) => items.iter().map(|v| (set_key(v), v)).collect(),
        other => BTreeMap::from([(set_key(other), other)]),
    }
}

/// Compare the attributes of `a` (old) and `b` (new).
///
/// Attributes missing on both sides are reported as warnings and skipped.
/// Fails only if the sub-item lists are malformed.
pub fn diff_attributes(a: &Node, b: &Node, config: &DiffConfig) -> DiffResult<AttributesDiff> {
    let mut diff = AttributesDiff::default();

    let attrs = match &config.attrs {
        Some(attrs) => attrs.clone(),
        None => all_attributes(a, b, config),
    };

    // Plain attributes
    for attr in &attrs {
        if config.is_excluded(attr)
            || config.is_setlike(attr)
            || config.is_subitems_key(attr)
            || attr == FILES_KEY
            || attr == CHILDREN_KEY
        {
            continue;
        }
        match (config.map_a.get(a, attr), config.map_b.get(b, attr)) {
            (None, None) => DiffWarning::MissingAttribute { attr: attr.clone() }
                .record(&mut diff.warnings),
            (None, Some(vb)) => diff.record_added(attr, vb),
            (Some(va), None) => diff.record_deleted(attr, va),
            (Some(va), Some(vb)) if va == vb => diff.record_unchanged(attr, vb),
            (Some(va), Some(vb)) => {
                diff.record_modified(attr, AttributeDiff::changed(va.clone(), vb.clone()))
            }
        }
    }

    // Set-like attributes
    for attr in &config.setlike_attrs {
        if config.is_excluded(attr) {
            continue;
        }
        match (config.map_a.get(a, attr), config.map_b.get(b, attr)) {
            (None, None) => debug!(attr = %attr, "set-like attribute absent on both nodes"),
            (None, Some(vb)) => diff.record_added(attr, vb),
            (Some(va), None) => diff.record_deleted(attr, va),
            (Some(va), Some(vb)) => {
                let set_a = as_set(va);
                let set_b = as_set(vb);
                let added: Vec<Value> = set_b
                    .iter()
                    .filter(|(k, _)| !set_a.contains_key(*k))
                    .map(|(_, v)| (*v).clone())
                    .collect();
                let deleted: Vec<Value> = set_a
                    .iter()
                    .filter(|(k, _)| !set_b.contains_key(*k))
                    .map(|(_, v)| (*v).clone())
                    .collect();
                if added.is_empty() && deleted.is_empty() {
                    diff.record_unchanged(attr, vb);
                } else {
                    diff.record_modified(
                        attr,
                        AttributeDiff {
                            added: Some(added),
                            deleted: Some(deleted),
                            ..AttributeDiff::changed(va.clone(), vb.clone())
                        },
                    );
                }
            }
        }
    }

    // Files
    if !config.is_excluded(FILES_KEY) {
        match (config.map_a.get(a, FILES_KEY), config.map_b.get(b, FILES_KEY)) {
            (None, None) => {}
            (None, Some(vb)) => diff.record_added(FILES_KEY, vb),
            (Some(va), None) => diff.record_deleted(FILES_KEY, va),
            (Some(va), Some(vb)) => {
                let exclude = config.nested_exclusions(FILES_KEY);
                let files = diff_files(as_list(FILES_KEY, va)?, as_list(FILES_KEY, vb)?, &exclude);
                if files.is_empty() {
                    diff.record_unchanged(FILES_KEY, vb);
                } else {
                    diff.record_modified(
                        FILES_KEY,
                        AttributeDiff {
                            added: Some(files.added),
                            deleted: Some(files.deleted),
                            ..AttributeDiff::changed(va.clone(), vb.clone())
                        },
                    );
                }
            }
        }
    }

    // Sub-items
    if let Some(key) = config.subitems_key.as_deref().filter(|k| !config.is_excluded(k)) {
        match (config.map_a.get(a, key), config.map_b.get(b, key)) {
            (None, None) => {}
            (None, Some(vb)) => diff.record_added(key, vb),
            (Some(va), None) => diff.record_deleted(key, va),
            (Some(va), Some(vb)) => {
                let items = diff_subitems(as_list(key, va)?, as_list(key, vb)?, config)?;
                if items.is_empty() {
                    diff.record_unchanged(key, vb);
                } else {
                    diff.record_modified(
                        key,
                        AttributeDiff {
                            added: Some(items.added),
                            deleted: Some(items.deleted),
                            moved: Some(items.moved),
                            modified: Some(items.modified),
                            ..AttributeDiff::changed(va.clone(), vb.clone())
                        },
                    );
                }
            }
        }
    }

    Ok(diff)
}

/// Remove `exclude` fields from a file record.
fn clean_file(file: &Value, exclude: &[&str]) -> Value {
    let mut file = file.clone();
    if let Some(map) = file.as_object_mut() {
        for field in exclude {
            map.remove(*field);
        }
    }
    file
}

/// Compare two file lists as unordered collections of whole records.
///
/// `exclude` names fields stripped from every record before comparing; the
/// returned records are the stripped ones.
pub fn diff_files(list_a: &[Value], list_b: &[Value], exclude: &[&str]) -> FilesDiff {
    let clean_a: Vec<Value> = list_a.iter().map(|f| clean_file(f, exclude)).collect();
    let clean_b: Vec<Value> = list_b.iter().map(|f| clean_file(f, exclude)).collect();

    let deleted = clean_a
        .iter()
        .filter(|f| !clean_b.contains(f))
        .cloned()
        .collect();
    let added = clean_b
        .iter()
        .filter(|f| !clean_a.contains(f))
        .cloned()
        .collect();
    FilesDiff { added, deleted }
}
