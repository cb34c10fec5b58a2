//! Error taxonomy for mapping runs.
//!
//! Configuration errors are always fatal. Violations either abort the run
//! (fail-fast) or are collected and reported together (aggregate).

use std::path::PathBuf;

use fieldmap_model::{DocumentError, PathError};
use serde::Serialize;
use thiserror::Error;

/// The mapping document or its environment is structurally invalid.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The document has no `mapping` block.
    #[error("mapping key is missing.")]
    MissingMapping,

    /// `function.name` does not match any registered capability.
    #[error("unknown capability `{name}`")]
    UnknownCapability { name: String },

    /// A dependency names a node that is not declared in the document.
    #[error("node `{node}` depends on unknown node `{dependency}`")]
    UnknownDependency { node: String, dependency: String },

    /// A processed node has no `to` path.
    #[error("node `{node}` has no `to` path")]
    MissingTarget { node: String },

    /// A path used by a node is malformed, or the output cannot hold it.
    #[error("invalid path in node `{node}`: {source}")]
    Path {
        node: String,
        #[source]
        source: PathError,
    },

    /// A file could not be parsed.
    #[error("invalid document {path}: {source}")]
    InvalidFile {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },

    /// A file could not be read.
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension does not name a supported format.
    #[error("unsupported document format: {path} (expected .json, .yaml or .yml)")]
    UnsupportedFormat { path: PathBuf },
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn path(node: impl Into<String>, source: PathError) -> Self {
        Self::Path {
            node: node.into(),
            source,
        }
    }
}

/// A validation failure on one node.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// A `required` node resolved to nothing.
    #[error("Field {field} required.")]
    RequiredField { node: String, field: String },

    /// Every dependency produced output but the node resolved to nothing.
    #[error("Field {field} required if dependencies true.")]
    DependencyField { node: String, field: String },
}

/// Failure reported by a capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CapabilityError {
    message: String,
}

impl CapabilityError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The capability was called with the wrong number of arguments.
    pub fn arity(expected: usize, actual: usize) -> Self {
        Self::new(format!("expected {expected} argument(s), got {actual}"))
    }
}

/// Errors returned by a mapping run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransformError {
    /// Fatal configuration problem.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// First violation under fail-fast.
    #[error(transparent)]
    Violation(#[from] Violation),

    /// Every violation of the run, in detection order, under aggregate mode.
    ///
    /// Displays as a JSON array of messages.
    #[error("{}", render_messages(.0))]
    Aggregated(Vec<Violation>),

    /// A capability rejected its arguments.
    #[error("capability `{name}` failed: {source}")]
    Capability {
        name: String,
        #[source]
        source: CapabilityError,
    },
}

impl TransformError {
    /// Violation messages carried by this error, in detection order.
    ///
    /// Empty for configuration and capability errors.
    pub fn messages(&self) -> Vec<String> {
        self.violations().iter().map(ToString::to_string).collect()
    }

    /// Violations carried by this error.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Violation(violation) => std::slice::from_ref(violation),
            Self::Aggregated(violations) => violations,
            Self::Config(_) | Self::Capability { .. } => &[],
        }
    }

    /// True for errors caused by the document rather than the input data.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

fn render_messages(violations: &[Violation]) -> String {
    let messages: Vec<String> = violations.iter().map(ToString::to_string).collect();
    serde_json::to_string(&messages).unwrap_or_default()
}

/// Result alias for mapping runs.
pub type Result<T> = std::result::Result<T, TransformError>;
