//! Foundation types for treediffer.
//!
//! This crate provides the node model, identifier handling, attribute-mapping
//! configuration, and lookup helpers shared by the diff engine and the CLI.
//! Trees are plain JSON objects; nothing here owns or mutates them.
//!
//! # Key Types
//!
//! - [`Node`] -- A content node: a JSON object with an optional `children` list
//! - [`AttrMap`] -- Canonical attribute name to source field path
//! - [`DiffConfig`] -- Immutable per-diff configuration (maps, exclusions, special keys)
//! - [`Preset`] -- Named configuration bundles for known tree schemas
//! - [`Record`] -- Field access used by the lookup helpers

pub mod attr_map;
pub mod config;
pub mod error;
pub mod lookup;
pub mod navigation;
pub mod node;
pub mod preset;

pub use attr_map::AttrMap;
pub use config::DiffConfig;
pub use error::TypeError;
pub use lookup::{contains, find_all_by, find_by, list_to_map, Record};
pub use navigation::{descendants, index_by, tree_find_all_by, tree_find_by};
pub use node::{
    child_nodes, id_string, lookup_path, optional_id, required_id, sort_order, value_kind, Node,
    CHILDREN_KEY, FILES_KEY,
};
pub use preset::Preset;
