//! Non-fatal conditions reported alongside a diff.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Something the differ skipped or resolved by a fixed rule.
///
/// Every warning is also logged at `warn` level when it is recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiffWarning {
    /// A requested attribute exists on neither node under the current maps.
    MissingAttribute { attr: String },
    /// A second deleted node shares a content id with an added node that is
    /// already paired; the extra pairing is discarded.
    DuplicateMove {
        content_id: String,
        old_node_id: String,
        node_id: String,
    },
    /// Restructuring found zero or several tree nodes for an id.
    AmbiguousLookup { node_id: String, matches: usize },
    /// A nestable record names a parent that is not in the same list.
    MissingDiffParent {
        node_id: String,
        parent_id: Option<String>,
    },
}

impl DiffWarning {
    /// Log the warning and append it to `sink`.
    pub(crate) fn record(self, sink: &mut Vec<DiffWarning>) {
        tracing::warn!("{self}");
        sink.push(self);
    }
}

impl fmt::Display for DiffWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffWarning::MissingAttribute { attr } => {
                write!(f, "requested diff for missing attr {attr}")
            }
            DiffWarning::DuplicateMove {
                content_id,
                old_node_id,
                node_id,
            } => write!(
                f,
                "a node move with content_id={content_id} to {node_id} already exists; \
                 ignoring move from {old_node_id}"
            ),
            DiffWarning::AmbiguousLookup { node_id, matches } => {
                write!(f, "restructure lookup for node {node_id} found {matches} tree nodes")
            }
            DiffWarning::MissingDiffParent { node_id, parent_id } => write!(
                f,
                "parent {} of node {node_id} is not in the diff list",
                parent_id.as_deref().unwrap_or("<none>")
            ),
        }
    }
}
