//! Error types for document parsing and path handling.

use thiserror::Error;

/// Errors raised while parsing a mapping document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DocumentError {
    /// The document is not valid JSON or does not match the document shape.
    #[error("invalid JSON mapping document: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is not valid YAML or does not match the document shape.
    #[error("invalid YAML mapping document: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors raised while parsing or following a dotted field path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PathError {
    /// The path string is empty.
    #[error("field path is empty")]
    Empty,

    /// The path contains an empty segment (`a..b`, `.a`, `a.`).
    #[error("field path `{path}` contains an empty segment")]
    EmptySegment { path: String },

    /// A write tried to descend through a value that is neither a map nor a
    /// sequence, or used a non-numeric segment on a sequence.
    #[error("cannot write `{path}`: no container can hold `{segment}`")]
    NotAContainer { path: String, segment: String },

    /// A write addressed a sequence element past its end.
    #[error("cannot write `{path}`: index {index} is out of range for a sequence of length {len}")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },
}
