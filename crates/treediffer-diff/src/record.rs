//! Diff records: the plain-data output of every diff stage.
//!
//! All records serialize to JSON with the field names downstream renderers
//! expect (`node_id`, `old_parent_id`, `sort_order_change`, ...). Records own
//! their data; nothing aliases the input trees.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Per-attribute comparison result.
///
/// `value` is the new value and is present unless the attribute was deleted.
/// `old_value` is present whenever the attribute existed before and changed.
/// The list fields carry element-level detail for set-like, file, and
/// sub-item attributes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeDiff {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moved: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<Vec<Value>>,
}

impl AttributeDiff {
    /// An attribute with only a current value (unchanged or added).
    pub fn current(value: Value) -> Self {
        Self {
            value: Some(value),
            ..Default::default()
        }
    }

    /// An attribute with only a previous value (deleted).
    pub fn previous(old_value: Value) -> Self {
        Self {
            old_value: Some(old_value),
            ..Default::default()
        }
    }

    /// An attribute present on both sides with different values.
    pub fn changed(old_value: Value, value: Value) -> Self {
        Self {
            value: Some(value),
            old_value: Some(old_value),
            ..Default::default()
        }
    }
}

/// Attribute name to comparison result, sorted by name.
pub type Attributes = BTreeMap<String, AttributeDiff>;

/// A node present in both trees whose attributes changed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModifiedNode {
    pub node_id: String,
    pub parent_id: Option<String>,
    pub content_id: Option<String>,
    /// Only the attributes that were added, deleted, or modified.
    pub attributes: Attributes,
}

/// A node that appears in the new tree at a position it did not have before.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AddedNode {
    pub node_id: String,
    pub parent_id: Option<String>,
    pub sort_order: f64,
    pub content_id: Option<String>,
    /// Every attribute of the node except `children`, as `{value}`.
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AddedNode>,
}

/// A node that no longer appears at its old position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeletedNode {
    pub old_node_id: String,
    pub old_parent_id: Option<String>,
    pub old_sort_order: f64,
    pub content_id: Option<String>,
    /// Every attribute of the node except `children`, as `{old_value}`.
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DeletedNode>,
}

/// A deleted/added pair sharing a content id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovedNode {
    pub node_id: String,
    pub parent_id: Option<String>,
    pub sort_order: f64,
    pub content_id: Option<String>,
    pub attributes: Attributes,
    pub old_node_id: String,
    pub old_parent_id: Option<String>,
    pub old_sort_order: f64,
    /// `true` when only the position among the same siblings changed.
    pub sort_order_change: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MovedNode>,
}

impl MovedNode {
    /// Build the move record for a paired deletion and addition.
    pub fn from_pair(deleted: &DeletedNode, added: &AddedNode) -> Self {
        let sort_order_change =
            deleted.old_parent_id == added.parent_id && deleted.old_node_id == added.node_id;
        Self {
            node_id: added.node_id.clone(),
            parent_id: added.parent_id.clone(),
            sort_order: added.sort_order,
            content_id: added.content_id.clone(),
            attributes: added.attributes.clone(),
            old_node_id: deleted.old_node_id.clone(),
            old_parent_id: deleted.old_parent_id.clone(),
            old_sort_order: deleted.old_sort_order,
            sort_order_change,
            children: Vec::new(),
        }
    }
}

/// A record that can be nested under another record of the same kind.
///
/// The id and parent id are the ones meaningful for the record's reference
/// tree: old ids for deletions, new ids for additions and moves.
pub trait DiffEntry: Sized {
    fn entry_id(&self) -> &str;
    fn entry_parent_id(&self) -> Option<&str>;
    fn children(&self) -> &[Self];
    fn children_mut(&mut self) -> &mut Vec<Self>;

    /// This record plus all nested records.
    fn count(&self) -> usize {
        1 + self.children().iter().map(DiffEntry::count).sum::<usize>()
    }
}

impl DiffEntry for AddedNode {
    fn entry_id(&self) -> &str {
        &self.node_id
    }
    fn entry_parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }
    fn children(&self) -> &[Self] {
        &self.children
    }
    fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }
}

impl DiffEntry for DeletedNode {
    fn entry_id(&self) -> &str {
        &self.old_node_id
    }
    fn entry_parent_id(&self) -> Option<&str> {
        self.old_parent_id.as_deref()
    }
    fn children(&self) -> &[Self] {
        &self.children
    }
    fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }
}

impl DiffEntry for MovedNode {
    fn entry_id(&self) -> &str {
        &self.node_id
    }
    fn entry_parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }
    fn children(&self) -> &[Self] {
        &self.children
    }
    fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }
}
