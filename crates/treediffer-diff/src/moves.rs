//! Move detection: pairing deleted and added records that share content.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::record::{AddedNode, DeletedNode, DiffEntry, MovedNode};
use crate::warning::DiffWarning;

/// Moves found in a pair of flat deleted/added lists.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MoveDetection {
    pub nodes_moved: Vec<MovedNode>,
    pub warnings: Vec<DiffWarning>,
}

/// One record per id, kept at the position of its first occurrence with the
/// value of its last.
fn unique_by_id<E: DiffEntry>(records: &[E]) -> Vec<&E> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut unique: Vec<&E> = Vec::new();
    for record in records {
        match position.get(record.entry_id()) {
            Some(&i) => unique[i] = record,
            None => {
                position.insert(record.entry_id(), unique.len());
                unique.push(record);
            }
        }
    }
    unique
}

/// Pair every deleted record with every added record carrying the same
/// content id.
///
/// Each new node id is moved at most once: the first pairing (in deleted
/// order, then added order) wins and later ones are reported as
/// [`DiffWarning::DuplicateMove`]. Records without a content id never pair.
pub fn detect_moves(nodes_deleted: &[DeletedNode], nodes_added: &[AddedNode]) -> MoveDetection {
    let deleted = unique_by_id(nodes_deleted);
    let added = unique_by_id(nodes_added);

    let mut added_by_content: HashMap<&str, Vec<&AddedNode>> = HashMap::new();
    for &na in &added {
        if let Some(content_id) = na.content_id.as_deref() {
            added_by_content.entry(content_id).or_default().push(na);
        }
    }

    let mut detection = MoveDetection::default();
    let mut moved_ids: HashSet<&str> = HashSet::new();
    for &nd in &deleted {
        let Some(content_id) = nd.content_id.as_deref() else {
            continue;
        };
        for &na in added_by_content.get(content_id).into_iter().flatten() {
            if moved_ids.insert(na.node_id.as_str()) {
                detection.nodes_moved.push(MovedNode::from_pair(nd, na));
            } else {
                DiffWarning::DuplicateMove {
                    content_id: content_id.to_string(),
                    old_node_id: nd.old_node_id.clone(),
                    node_id: na.node_id.clone(),
                }
                .record(&mut detection.warnings);
            }
        }
    }

    debug!(
        deleted = deleted.len(),
        added = added.len(),
        moved = detection.nodes_moved.len(),
        "move detection done"
    );
    detection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Attributes;

    fn deleted(id: &str, parent: &str, order: f64, content: Option<&str>) -> DeletedNode {
        DeletedNode {
            old_node_id: id.into(),
            old_parent_id: Some(parent.into()),
            old_sort_order: order,
            content_id: content.map(str::to_string),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    fn added(id: &str, parent: &str, order: f64, content: Option<&str>) -> AddedNode {
        AddedNode {
            node_id: id.into(),
            parent_id: Some(parent.into()),
            sort_order: order,
            content_id: content.map(str::to_string),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    #[test]
    fn reorder_is_a_sort_order_change() {
        let d = vec![deleted("n2", "p", 2.0, Some("c2")), deleted("n3", "p", 3.0, Some("c3"))];
        let a = vec![added("n3", "p", 2.0, Some("c3")), added("n2", "p", 3.0, Some("c2"))];
        let moves = detect_moves(&d, &a);

        assert_eq!(moves.nodes_moved.len(), 2);
        assert!(moves.nodes_moved.iter().all(|m| m.sort_order_change));
        let n2 = &moves.nodes_moved[0];
        assert_eq!(n2.node_id, "n2");
        assert_eq!(n2.old_sort_order, 2.0);
        assert_eq!(n2.sort_order, 3.0);
        assert!(moves.warnings.is_empty());
    }

    #[test]
    fn reparenting_is_a_real_move() {
        let d = vec![deleted("n1", "p1", 1.0, Some("c1"))];
        let a = vec![added("n1", "p2", 4.0, Some("c1"))];
        let moves = detect_moves(&d, &a);
        assert_eq!(moves.nodes_moved.len(), 1);
        let m = &moves.nodes_moved[0];
        assert!(!m.sort_order_change);
        assert_eq!(m.old_parent_id.as_deref(), Some("p1"));
        assert_eq!(m.parent_id.as_deref(), Some("p2"));
    }

    #[test]
    fn renamed_node_in_place_is_a_real_move() {
        let d = vec![deleted("old", "p", 1.0, Some("c"))];
        let a = vec![added("new", "p", 1.0, Some("c"))];
        let moves = detect_moves(&d, &a);
        assert_eq!(moves.nodes_moved[0].old_node_id, "old");
        assert_eq!(moves.nodes_moved[0].node_id, "new");
        assert!(!moves.nodes_moved[0].sort_order_change);
    }

    #[test]
    fn duplicate_content_keeps_first_pairing() {
        let d = vec![deleted("a", "p", 1.0, Some("c")), deleted("b", "p", 2.0, Some("c"))];
        let a = vec![added("x", "q", 1.0, Some("c"))];
        let moves = detect_moves(&d, &a);

        assert_eq!(moves.nodes_moved.len(), 1);
        assert_eq!(moves.nodes_moved[0].old_node_id, "a");
        assert_eq!(
            moves.warnings,
            vec![DiffWarning::DuplicateMove {
                content_id: "c".into(),
                old_node_id: "b".into(),
                node_id: "x".into(),
            }]
        );
    }

    #[test]
    fn one_deleted_node_may_pair_with_several_added() {
        let d = vec![deleted("a", "p", 1.0, Some("c"))];
        let a = vec![added("x", "q", 1.0, Some("c")), added("y", "r", 1.0, Some("c"))];
        let moves = detect_moves(&d, &a);
        let ids: Vec<&str> = moves.nodes_moved.iter().map(|m| m.node_id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y"]);
    }

    #[test]
    fn missing_content_ids_never_pair() {
        let d = vec![deleted("a", "p", 1.0, None)];
        let a = vec![added("a", "q", 1.0, None)];
        assert!(detect_moves(&d, &a).nodes_moved.is_empty());
    }

    #[test]
    fn repeated_records_are_paired_once() {
        let d = vec![deleted("a", "p", 1.0, Some("c")), deleted("a", "p", 5.0, Some("c"))];
        let a = vec![added("a", "q", 1.0, Some("c"))];
        let moves = detect_moves(&d, &a);
        assert_eq!(moves.nodes_moved.len(), 1);
        assert_eq!(moves.nodes_moved[0].old_sort_order, 5.0);
        assert!(moves.warnings.is_empty());
    }
}
