//! Depth-first navigation of nested nodes.
//!
//! These helpers are lenient: entries of a `children` list that are not
//! objects are skipped rather than reported. The diff engine validates
//! structure separately.

use std::collections::HashMap;

use crate::node::{lookup_path, id_string, Node, CHILDREN_KEY};

/// Child objects of `node` in list order.
pub fn children(node: &Node) -> impl Iterator<Item = &Node> {
    node.get(CHILDREN_KEY)
        .and_then(|c| c.as_array())
        .into_iter()
        .flatten()
        .filter_map(|c| c.as_object())
}

fn id_at(node: &Node, key: &str) -> Option<String> {
    lookup_path(node, key).and_then(id_string)
}

/// `node` and all its descendants in depth-first pre-order.
fn preorder(node: &Node) -> Vec<&Node> {
    let mut out = Vec::new();
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        out.push(current);
        let kids: Vec<&Node> = children(current).collect();
        stack.extend(kids.into_iter().rev());
    }
    out
}

/// First node (pre-order, `tree` included) whose `key` field equals `value`.
pub fn tree_find_by<'a>(tree: &'a Node, key: &str, value: &str) -> Option<&'a Node> {
    preorder(tree)
        .into_iter()
        .find(|n| id_at(n, key).as_deref() == Some(value))
}

/// Every node (pre-order, `tree` included) whose `key` field equals `value`.
pub fn tree_find_all_by<'a>(tree: &'a Node, key: &str, value: &str) -> Vec<&'a Node> {
    preorder(tree)
        .into_iter()
        .filter(|n| id_at(n, key).as_deref() == Some(value))
        .collect()
}

/// Flatten `node` and its descendants into pre-order, optionally without
/// `node` itself.
pub fn descendants(node: &Node, include_self: bool) -> Vec<&Node> {
    let mut all = preorder(node);
    if !include_self {
        all.remove(0);
    }
    all
}

/// Index every node in `tree` by its `key` field. Nodes without the field
/// are left out; duplicate ids keep all nodes in pre-order.
pub fn index_by<'a>(tree: &'a Node, key: &str) -> HashMap<String, Vec<&'a Node>> {
    let mut index: HashMap<String, Vec<&'a Node>> = HashMap::new();
    for node in preorder(tree) {
        if let Some(id) = id_at(node, key) {
            index.entry(id).or_default().push(node);
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn tree() -> Value {
        json!({
            "node_id": "root",
            "children": [
                {"node_id": "a", "children": [
                    {"node_id": "a1"},
                    {"node_id": "a2", "children": [{"node_id": "a21"}]},
                ]},
                {"node_id": "b"},
                {"node_id": "a1", "title": "duplicate"},
            ]
        })
    }

    fn ids(nodes: &[&Node]) -> Vec<String> {
        nodes.iter().map(|n| id_at(n, "node_id").unwrap()).collect()
    }

    #[test]
    fn descendants_are_preorder() {
        let tree = tree();
        let root = tree.as_object().unwrap();
        assert_eq!(
            ids(&descendants(root, false)),
            vec!["a", "a1", "a2", "a21", "b", "a1"]
        );
        assert_eq!(descendants(root, true).len(), 7);
    }

    #[test]
    fn find_by_returns_first_match() {
        let tree = tree();
        let root = tree.as_object().unwrap();
        let found = tree_find_by(root, "node_id", "a1").unwrap();
        assert!(found.get("title").is_none());
        assert_eq!(tree_find_all_by(root, "node_id", "a1").len(), 2);
        assert!(tree_find_by(root, "node_id", "zz").is_none());
    }

    #[test]
    fn index_groups_duplicates() {
        let tree = tree();
        let root = tree.as_object().unwrap();
        let index = index_by(root, "node_id");
        assert_eq!(index["a1"].len(), 2);
        assert_eq!(index["a21"].len(), 1);
        assert_eq!(index.len(), 6);
    }
}
