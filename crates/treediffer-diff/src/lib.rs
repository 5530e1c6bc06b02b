//! Diff engine for treediffer.
//!
//! Compares an old and a new version of a content tree and classifies every
//! node as added, deleted, moved, or attribute-modified. The flat result can be
//! simplified (moves removed from added/deleted) and restructured into nested
//! subtrees for compact display.
//!
//! # Key Types
//!
//! - [`treediff`] / [`TreeDiffOptions`] / [`DiffFormat`] -- The full pipeline
//! - [`TreeDiff`] -- Deleted, added, modified, and moved node records plus warnings
//! - [`AttributesDiff`] / [`AttributeDiff`] -- Per-attribute comparison of two nodes
//! - [`SubtreeDiff`] -- Flat result of the recursive subtree and children diff
//! - [`DiffEntry`] -- Records that can be nested by the restructurer
//! - [`DiffWarning`] -- Non-fatal conditions surfaced alongside a result

pub mod attributes;
pub mod error;
pub mod flatten;
pub mod moves;
pub mod record;
pub mod restructure;
pub mod simplify;
pub mod subitems;
pub mod subtree;
pub mod tree_diff;
pub mod warning;

#[cfg(test)]
mod fixtures;

pub use attributes::{diff_attributes, diff_files, AttributesDiff, FilesDiff};
pub use error::{DiffError, DiffResult};
pub use flatten::{flatten_added, flatten_deleted, flatten_subtree, FlattenKind, Flattened};
pub use moves::{detect_moves, MoveDetection};
pub use record::{
    AddedNode, AttributeDiff, Attributes, DeletedNode, DiffEntry, ModifiedNode, MovedNode,
};
pub use restructure::{restructure_diff, restructure_list};
pub use simplify::simplify_diff;
pub use subitems::{diff_subitems, SubitemsDiff};
pub use subtree::{diff_children, diff_subtree, SubtreeDiff};
pub use tree_diff::{treediff, DiffFormat, TreeDiff, TreeDiffOptions};
pub use warning::DiffWarning;
