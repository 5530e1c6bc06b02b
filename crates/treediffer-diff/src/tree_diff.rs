//! The `treediff` pipeline: subtree diff, move detection, simplification, and
//! restructuring.
//!
//! Each [`DiffFormat`] is a strict prefix of the pipeline. Pure-reorder moves
//! are filtered out last, unless [`TreeDiffOptions::sort_order_changes`] is
//! set. In the restructured format only top-level moves are filtered, so the
//! descendants nested under a moved subtree stay with it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use treediffer_types::{AttrMap, DiffConfig, Node, Preset};

use crate::error::{DiffError, DiffResult};
use crate::moves::detect_moves;
use crate::record::{AddedNode, DeletedNode, DiffEntry, ModifiedNode, MovedNode};
use crate::restructure::restructure_diff;
use crate::simplify::simplify_diff;
use crate::subtree::diff_subtree;
use crate::warning::DiffWarning;

/// How far the pipeline runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffFormat {
    /// Flat lists with moves detected; moved nodes also appear as added and
    /// deleted.
    Raw,
    /// Moved nodes removed from the added and deleted lists.
    #[default]
    Simplified,
    /// Simplified, then nested into complete subtrees.
    Restructured,
}

impl DiffFormat {
    pub const ALL: [DiffFormat; 3] = [
        DiffFormat::Raw,
        DiffFormat::Simplified,
        DiffFormat::Restructured,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DiffFormat::Raw => "raw",
            DiffFormat::Simplified => "simplified",
            DiffFormat::Restructured => "restructured",
        }
    }
}

impl FromStr for DiffFormat {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiffFormat::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| DiffError::InvalidFormat(s.to_string()))
    }
}

impl fmt::Display for DiffFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything that controls one [`treediff`] call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeDiffOptions {
    pub config: DiffConfig,
    pub format: DiffFormat,
    /// Keep moves that only changed position among the same siblings.
    pub sort_order_changes: bool,
}

impl TreeDiffOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `preset` on top of the current configuration.
    pub fn preset(mut self, preset: Preset) -> Self {
        self.config = preset.apply(self.config);
        self
    }

    pub fn format(mut self, format: DiffFormat) -> Self {
        self.format = format;
        self
    }

    pub fn sort_order_changes(mut self, keep: bool) -> Self {
        self.sort_order_changes = keep;
        self
    }

    pub fn attrs<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.attrs = Some(attrs.into_iter().map(Into::into).collect());
        self
    }

    pub fn exclude_attrs<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.exclude_attrs = attrs.into_iter().map(Into::into).collect();
        self
    }

    pub fn map_a(mut self, map: AttrMap) -> Self {
        self.config.map_a = map;
        self
    }

    pub fn map_b(mut self, map: AttrMap) -> Self {
        self.config.map_b = map;
        self
    }

    pub fn subitems_key(mut self, key: Option<&str>) -> Self {
        self.config.subitems_key = key.map(str::to_string);
        self
    }

    pub fn setlike_attrs<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.setlike_attrs = attrs.into_iter().map(Into::into).collect();
        self
    }
}

/// The result of comparing two trees.
///
/// Lists are flat for the raw and simplified formats and nested for the
/// restructured format. Serializes to plain JSON with no cycles.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeDiff {
    pub nodes_deleted: Vec<DeletedNode>,
    pub nodes_added: Vec<AddedNode>,
    pub nodes_modified: Vec<ModifiedNode>,
    pub nodes_moved: Vec<MovedNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<DiffWarning>,
}

impl TreeDiff {
    /// Returns `true` if no node was deleted, added, modified, or moved.
    pub fn is_empty(&self) -> bool {
        self.nodes_deleted.is_empty()
            && self.nodes_added.is_empty()
            && self.nodes_modified.is_empty()
            && self.nodes_moved.is_empty()
    }

    /// Deleted nodes, nested ones included.
    pub fn deleted_count(&self) -> usize {
        total(&self.nodes_deleted)
    }

    /// Added nodes, nested ones included.
    pub fn added_count(&self) -> usize {
        total(&self.nodes_added)
    }

    /// Moved nodes, nested ones included.
    pub fn moved_count(&self) -> usize {
        total(&self.nodes_moved)
    }

    pub fn modified_count(&self) -> usize {
        self.nodes_modified.len()
    }
}

fn total<E: DiffEntry>(entries: &[E]) -> usize {
    entries.iter().map(DiffEntry::count).sum()
}

/// Compute the diff between `tree_a` (old) and `tree_b` (new).
pub fn treediff(tree_a: &Node, tree_b: &Node, options: &TreeDiffOptions) -> DiffResult<TreeDiff> {
    let config = &options.config;

    let subtree = diff_subtree(None, tree_a, None, tree_b, true, config)?;
    debug!(
        deleted = subtree.nodes_deleted.len(),
        added = subtree.nodes_added.len(),
        modified = subtree.nodes_modified.len(),
        "subtree diff done"
    );

    let moves = detect_moves(&subtree.nodes_deleted, &subtree.nodes_added);
    let mut warnings = subtree.warnings;
    warnings.extend(moves.warnings);

    let mut diff = TreeDiff {
        nodes_deleted: subtree.nodes_deleted,
        nodes_added: subtree.nodes_added,
        nodes_modified: subtree.nodes_modified,
        nodes_moved: moves.nodes_moved,
        warnings,
    };

    if options.format != DiffFormat::Raw {
        diff = simplify_diff(diff);
    }

    // Once nested, only top-level moves are filtered.
    if options.format == DiffFormat::Restructured {
        diff = restructure_diff(diff, tree_a, tree_b, config);
    }

    if !options.sort_order_changes {
        let before = diff.nodes_moved.len();
        diff.nodes_moved.retain(|m| !m.sort_order_change);
        debug!(
            filtered = before - diff.nodes_moved.len(),
            "dropped sort-order-only moves"
        );
    }

    debug!(
        format = %options.format,
        deleted = diff.deleted_count(),
        added = diff.added_count(),
        modified = diff.modified_count(),
        moved = diff.moved_count(),
        warnings = diff.warnings.len(),
        "tree diff done"
    );
    Ok(diff)
}
