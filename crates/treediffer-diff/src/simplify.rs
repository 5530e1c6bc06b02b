//! Removal of moved nodes from the added and deleted lists.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::record::DiffEntry;
use crate::tree_diff::TreeDiff;

/// Collapse repeated ids to one record at the first position holding the last
/// value.
fn dedup_by_id<E: DiffEntry>(records: Vec<E>) -> Vec<E> {
    let mut position: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<E> = Vec::with_capacity(records.len());
    for record in records {
        match position.get(record.entry_id()) {
            Some(&i) => unique[i] = record,
            None => {
                position.insert(record.entry_id().to_string(), unique.len());
                unique.push(record);
            }
        }
    }
    unique
}

/// Drop every deleted record whose old id is the old side of a move and every
/// added record whose id is the new side of a move. A node reached twice (by
/// position and by id) is listed once. Modified and moved records pass
/// through unchanged, so a moved node keeps its attribute diff.
pub fn simplify_diff(raw: TreeDiff) -> TreeDiff {
    let TreeDiff {
        nodes_deleted,
        nodes_added,
        nodes_modified,
        nodes_moved,
        warnings,
    } = raw;

    let old_ids: HashSet<&str> = nodes_moved.iter().map(|m| m.old_node_id.as_str()).collect();
    let new_ids: HashSet<&str> = nodes_moved.iter().map(|m| m.node_id.as_str()).collect();

    let before = (nodes_deleted.len(), nodes_added.len());
    let nodes_deleted: Vec<_> = dedup_by_id(nodes_deleted)
        .into_iter()
        .filter(|nd| !old_ids.contains(nd.old_node_id.as_str()))
        .collect();
    let nodes_added: Vec<_> = dedup_by_id(nodes_added)
        .into_iter()
        .filter(|na| !new_ids.contains(na.node_id.as_str()))
        .collect();
    debug!(
        deleted_removed = before.0 - nodes_deleted.len(),
        added_removed = before.1 - nodes_added.len(),
        "simplified diff"
    );

    TreeDiff {
        nodes_deleted,
        nodes_added,
        nodes_modified,
        nodes_moved,
        warnings,
    }
}
