//! Nesting of flat diff lists into the smallest covering subtrees.
//!
//! A record absorbs its descendants (per the reference tree) when every one
//! of them is in the same list. Nesting is decided on ids first and the nested
//! records are assembled afterwards, so the result does not depend on the
//! order in which candidates are visited.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use treediffer_types::{descendants, id_string, index_by, lookup_path, DiffConfig, Node};

use crate::record::DiffEntry;
use crate::tree_diff::TreeDiff;
use crate::warning::DiffWarning;

/// Restructure one list of same-kind records against `tree`, whose nodes are
/// identified by their `by` field.
///
/// Records keep their relative order. A record whose full descendant set is
/// present gets those descendants nested under their own parents,
/// recursively; all others stay at the top level. Repeated ids collapse to
/// one record at the first position holding the last value.
pub fn restructure_list<E: DiffEntry>(
    entries: Vec<E>,
    tree: &Node,
    by: &str,
    warnings: &mut Vec<DiffWarning>,
) -> Vec<E> {
    let mut order: Vec<String> = Vec::new();
    let mut records: HashMap<String, E> = HashMap::new();
    for entry in entries {
        let id = entry.entry_id().to_string();
        if records.insert(id.clone(), entry).is_none() {
            order.push(id);
        }
    }

    let index = index_by(tree, by);
    let mut nested: HashSet<String> = HashSet::new();
    let mut children_of: HashMap<String, Vec<String>> = HashMap::new();

    for id in &order {
        if nested.contains(id) {
            continue;
        }
        let tree_node = match index.get(id).map(Vec::as_slice) {
            Some([node]) => *node,
            matches => {
                let found = matches.unwrap_or_default();
                DiffWarning::AmbiguousLookup {
                    node_id: id.clone(),
                    matches: found.len(),
                }
                .record(warnings);
                match found.first() {
                    Some(node) => *node,
                    None => continue,
                }
            }
        };

        let below: Vec<Option<String>> = descendants(tree_node, false)
            .into_iter()
            .map(|node| lookup_path(node, by).and_then(id_string))
            .collect();
        let complete = !below.is_empty()
            && below
                .iter()
                .all(|d| d.as_ref().is_some_and(|d| records.contains_key(d)));
        if !complete {
            continue;
        }

        for descendant in below.into_iter().flatten() {
            if nested.contains(&descendant) {
                debug!(node_id = %descendant, "already restructured");
                continue;
            }
            let parent = records
                .get(&descendant)
                .and_then(|r| r.entry_parent_id())
                .filter(|p| *p != descendant && records.contains_key(*p))
                .map(str::to_string);
            match parent {
                Some(parent) => {
                    children_of.entry(parent).or_default().push(descendant.clone());
                    nested.insert(descendant);
                }
                None => DiffWarning::MissingDiffParent {
                    parent_id: records
                        .get(&descendant)
                        .and_then(|r| r.entry_parent_id())
                        .map(str::to_string),
                    node_id: descendant,
                }
                .record(warnings),
            }
        }
    }

    let mut result: Vec<E> = order
        .iter()
        .filter(|id| !nested.contains(*id))
        .filter_map(|id| assemble(id, &mut records, &mut children_of))
        .collect();

    // Only reachable when parent links loop; keep those records visible.
    for id in &order {
        if let Some(record) = assemble(id, &mut records, &mut children_of) {
            debug!(node_id = %id, "unattached record kept at top level");
            result.push(record);
        }
    }
    result
}

fn assemble<E: DiffEntry>(
    id: &str,
    records: &mut HashMap<String, E>,
    children_of: &mut HashMap<String, Vec<String>>,
) -> Option<E> {
    let mut record = records.remove(id)?;
    for child in children_of.remove(id).unwrap_or_default() {
        if let Some(child) = assemble(&child, records, children_of) {
            record.children_mut().push(child);
        }
    }
    Some(record)
}

/// Nest the deleted list against the old tree and the added and moved lists
/// against the new tree. Modified records are left as they are.
pub fn restructure_diff(diff: TreeDiff, tree_a: &Node, tree_b: &Node, config: &DiffConfig) -> TreeDiff {
    let by_a = config.map_a.resolve("node_id");
    let by_b = config.map_b.resolve("node_id");
    let mut warnings = diff.warnings;

    let nodes_deleted = restructure_list(diff.nodes_deleted, tree_a, by_a, &mut warnings);
    let nodes_added = restructure_list(diff.nodes_added, tree_b, by_b, &mut warnings);
    let nodes_moved = restructure_list(diff.nodes_moved, tree_b, by_b, &mut warnings);
    debug!(
        deleted = nodes_deleted.len(),
        added = nodes_added.len(),
        moved = nodes_moved.len(),
        "restructured diff"
    );

    TreeDiff {
        nodes_deleted,
        nodes_added,
        nodes_modified: diff.nodes_modified,
        nodes_moved,
        warnings,
    }
}
