//! Recursive diff of a node pair and of their children lists.
//!
//! Children are matched twice. Structural presence requires the same node id
//! at the same sort order, so a reordered child shows up as a deletion plus an
//! addition that move detection later pairs up. Recursion only requires the
//! same node id, so changes inside a reordered child are still found.

use std::borrow::Cow;

use serde_json::Value;
use tracing::debug;

use treediffer_types::{
    child_nodes, contains, find_by, optional_id, required_id, sort_order, AttrMap, DiffConfig,
    Node, Record,
};

use crate::attributes::diff_attributes;
use crate::error::DiffResult;
use crate::flatten::{flatten_added, flatten_deleted};
use crate::record::{AddedNode, DeletedNode, ModifiedNode};
use crate::warning::DiffWarning;

/// Flat deleted/added/modified records found below (and at) a node pair.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubtreeDiff {
    pub nodes_deleted: Vec<DeletedNode>,
    pub nodes_added: Vec<AddedNode>,
    pub nodes_modified: Vec<ModifiedNode>,
    pub warnings: Vec<DiffWarning>,
}

impl SubtreeDiff {
    /// Returns `true` if no node was deleted, added, or modified.
    pub fn is_empty(&self) -> bool {
        self.nodes_deleted.is_empty() && self.nodes_added.is_empty() && self.nodes_modified.is_empty()
    }

    fn merge(&mut self, other: SubtreeDiff) {
        self.nodes_deleted.extend(other.nodes_deleted);
        self.nodes_added.extend(other.nodes_added);
        self.nodes_modified.extend(other.nodes_modified);
        self.warnings.extend(other.warnings);
    }
}

/// Field holding the node id. Roots may use their own key (`root.node_id`,
/// e.g. a channel id) and otherwise fall back to the regular mapping.
fn node_id_key(map: &AttrMap, root: bool) -> &str {
    root.then(|| map.alias("root.node_id"))
        .flatten()
        .unwrap_or_else(|| map.resolve("node_id"))
}

fn content_id_key(map: &AttrMap, root: bool) -> &str {
    root.then(|| map.alias("root.content_id"))
        .flatten()
        .unwrap_or_else(|| map.resolve("content_id"))
}

/// Compare node `a` (old tree) with node `b` (new tree) and everything below.
///
/// Emits one modified record for the pair if any attribute changed. Children
/// are compared only when both nodes carry a children list; a node that is a
/// leaf on one side is compared by attributes alone.
pub fn diff_subtree(
    parent_a: Option<&str>,
    a: &Node,
    parent_b: Option<&str>,
    b: &Node,
    root: bool,
    config: &DiffConfig,
) -> DiffResult<SubtreeDiff> {
    let node_id_a = required_id(a, node_id_key(&config.map_a, root))?;
    let node_id_b = required_id(b, node_id_key(&config.map_b, root))?;
    let content_id_b = optional_id(b, content_id_key(&config.map_b, root))?;

    let mut diff = SubtreeDiff::default();

    let mut attrs = diff_attributes(a, b, config)?;
    diff.warnings.append(&mut attrs.warnings);
    if attrs.has_changes() {
        diff.nodes_modified.push(ModifiedNode {
            node_id: node_id_b.clone(),
            parent_id: parent_b.map(str::to_string),
            content_id: content_id_b,
            attributes: attrs.changed_attributes(),
        });
    }

    if let (Some(children_a), Some(children_b)) = (child_nodes(a)?, child_nodes(b)?) {
        let children = diff_children(&node_id_a, &children_a, &node_id_b, &children_b, config)?;
        diff.merge(children);
    } else {
        debug!(node_id = %node_id_b, parent_id = ?parent_a, "children not compared");
    }

    Ok(diff)
}

/// A child with its identity resolved.
struct ChildItem<'a> {
    node_id: String,
    sort_order: f64,
    node: &'a Node,
}

impl Record for ChildItem<'_> {
    fn field(&self, key: &str) -> Option<Cow<'_, Value>> {
        match key {
            "node_id" => Some(Cow::Owned(Value::from(self.node_id.as_str()))),
            "sort_order" => Some(Cow::Owned(Value::from(self.sort_order))),
            _ => None,
        }
    }
}

fn prepare<'a>(children: &[&'a Node], map: &AttrMap) -> DiffResult<Vec<ChildItem<'a>>> {
    let id_key = map.resolve("node_id");
    let order_key = map.resolve("sort_order");
    children
        .iter()
        .enumerate()
        .map(|(i, &node)| {
            Ok(ChildItem {
                node_id: required_id(node, id_key)?,
                sort_order: sort_order(node, order_key, i)?,
                node,
            })
        })
        .collect()
}

/// Compare the children of `parent_a` (old tree) with those of `parent_b`
/// (new tree).
///
/// Children without a counterpart of the same id and sort order are flattened
/// into deletions or additions together with all their descendants. Children
/// with a counterpart of the same id are diffed recursively, wherever they sit.
pub fn diff_children(
    parent_a: &str,
    children_a: &[&Node],
    parent_b: &str,
    children_b: &[&Node],
    config: &DiffConfig,
) -> DiffResult<SubtreeDiff> {
    let items_a = prepare(children_a, &config.map_a)?;
    let items_b = prepare(children_b, &config.map_b)?;
    let by_position: &[&str] = &["node_id", "sort_order"];

    let mut diff = SubtreeDiff::default();

    for item in &items_a {
        if !contains(&items_b, item, by_position)? {
            diff.nodes_deleted.extend(flatten_deleted(
                Some(parent_a),
                item.sort_order,
                item.node,
                &config.map_a,
            )?);
        }
    }

    for item in &items_b {
        if !contains(&items_a, item, by_position)? {
            diff.nodes_added.extend(flatten_added(
                Some(parent_b),
                item.sort_order,
                item.node,
                &config.map_b,
            )?);
        }
    }

    for item_a in &items_a {
        if let Some(item_b) = find_by(&items_b, item_a, &["node_id"])? {
            let common = diff_subtree(
                Some(parent_a),
                item_a.node,
                Some(parent_b),
                item_b.node,
                false,
                config,
            )?;
            diff.merge(common);
        }
    }

    Ok(diff)
}
