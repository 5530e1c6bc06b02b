//! Flattening of a subtree into one diff record per node.

use std::fmt;
use std::str::FromStr;

use treediffer_types::{child_nodes, optional_id, required_id, sort_order, AttrMap, Node, CHILDREN_KEY};

use crate::error::{DiffError, DiffResult};
use crate::record::{AddedNode, AttributeDiff, Attributes, DeletedNode};

/// Which side of the diff a flattened subtree belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlattenKind {
    Added,
    Deleted,
}

impl FromStr for FlattenKind {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "added" => Ok(FlattenKind::Added),
            "deleted" => Ok(FlattenKind::Deleted),
            other => Err(DiffError::InvalidFlattenKind(other.to_string())),
        }
    }
}

impl fmt::Display for FlattenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlattenKind::Added => f.write_str("added"),
            FlattenKind::Deleted => f.write_str("deleted"),
        }
    }
}

/// Flattened records of either kind.
#[derive(Clone, Debug, PartialEq)]
pub enum Flattened {
    Added(Vec<AddedNode>),
    Deleted(Vec<DeletedNode>),
}

impl Flattened {
    pub fn len(&self) -> usize {
        match self {
            Flattened::Added(nodes) => nodes.len(),
            Flattened::Deleted(nodes) => nodes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One visited node, before it is shaped into a kind-specific record.
struct FlatEntry {
    node_id: String,
    parent_id: Option<String>,
    sort_order: f64,
    content_id: Option<String>,
    node: Node,
}

/// Pre-order walk of `subtree`. Reads only; every entry owns a copy of its
/// node without the `children` list.
fn walk(
    parent_id: Option<&str>,
    order: f64,
    subtree: &Node,
    map: &AttrMap,
    out: &mut Vec<FlatEntry>,
) -> DiffResult<()> {
    let node_id = required_id(subtree, map.resolve("node_id"))?;
    let content_id = optional_id(subtree, map.resolve("content_id"))?;
    let mut node = subtree.clone();
    node.remove(CHILDREN_KEY);
    out.push(FlatEntry {
        node_id: node_id.clone(),
        parent_id: parent_id.map(str::to_string),
        sort_order: order,
        content_id,
        node,
    });

    let sort_order_key = map.resolve("sort_order");
    for (i, child) in child_nodes(subtree)?.into_iter().flatten().enumerate() {
        let child_order = sort_order(child, sort_order_key, i)?;
        walk(Some(node_id.as_str()), child_order, child, map, out)?;
    }
    Ok(())
}

/// Flatten `subtree` into added records, self first, then descendants in
/// depth-first pre-order. Each record carries all of its node's attributes
/// (except `children`) as `{value}`.
pub fn flatten_added(
    parent_id: Option<&str>,
    sort_order: f64,
    subtree: &Node,
    map: &AttrMap,
) -> DiffResult<Vec<AddedNode>> {
    let mut entries = Vec::new();
    walk(parent_id, sort_order, subtree, map, &mut entries)?;
    Ok(entries
        .into_iter()
        .map(|e| AddedNode {
            node_id: e.node_id,
            parent_id: e.parent_id,
            sort_order: e.sort_order,
            content_id: e.content_id,
            attributes: wrap(e.node, AttributeDiff::current),
            children: Vec::new(),
        })
        .collect())
}

/// Flatten `subtree` into deleted records, attributes wrapped as
/// `{old_value}`.
pub fn flatten_deleted(
    parent_id: Option<&str>,
    sort_order: f64,
    subtree: &Node,
    map: &AttrMap,
) -> DiffResult<Vec<DeletedNode>> {
    let mut entries = Vec::new();
    walk(parent_id, sort_order, subtree, map, &mut entries)?;
    Ok(entries
        .into_iter()
        .map(|e| DeletedNode {
            old_node_id: e.node_id,
            old_parent_id: e.parent_id,
            old_sort_order: e.sort_order,
            content_id: e.content_id,
            attributes: wrap(e.node, AttributeDiff::previous),
            children: Vec::new(),
        })
        .collect())
}

/// Flatten `subtree` as `kind`.
pub fn flatten_subtree(
    parent_id: Option<&str>,
    sort_order: f64,
    subtree: &Node,
    kind: FlattenKind,
    map: &AttrMap,
) -> DiffResult<Flattened> {
    Ok(match kind {
        FlattenKind::Added => Flattened::Added(flatten_added(parent_id, sort_order, subtree, map)?),
        FlattenKind::Deleted => {
            Flattened::Deleted(flatten_deleted(parent_id, sort_order, subtree, map)?)
        }
    })
}

fn wrap(node: Node, f: fn(serde_json::Value) -> AttributeDiff) -> Attributes {
    node.into_iter().map(|(k, v)| (k, f(v))).collect()
}
