use thiserror::Error;

/// Errors produced while reading nodes and configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("missing identifier field '{key}'")]
    MissingIdentifier { key: String },

    #[error("invalid identifier in field '{key}': expected string or number, got {actual}")]
    InvalidIdentifier { key: String, actual: &'static str },

    #[error("invalid sort order in field '{key}': expected number, got {actual}")]
    InvalidSortOrder { key: String, actual: &'static str },

    #[error("expected {expected} for {context}, got {actual}")]
    UnexpectedType {
        context: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("match keys must name at least one field")]
    InvalidMatchKey,

    #[error("unknown preset: {0}")]
    UnknownPreset(String),
}
