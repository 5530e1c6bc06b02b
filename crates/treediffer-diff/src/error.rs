//! Error types for the diff crate.

use treediffer_types::TypeError;

/// Errors that abort a diff.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiffError {
    /// A node, identifier, or sort order could not be read.
    #[error("invalid node data: {0}")]
    Node(#[from] TypeError),

    /// A flatten kind other than `added` or `deleted` was requested.
    #[error("unexpected flatten kind '{0}': expected 'added' or 'deleted'")]
    InvalidFlattenKind(String),

    /// A diff format name was not recognised.
    #[error("unknown diff format '{0}': expected raw, simplified, or restructured")]
    InvalidFormat(String),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
