//! Transformer contract.
//!
//! A concrete transformer supplies the capabilities its documents may call and
//! the document it runs. The mapping algorithm itself is provided.

use std::path::{Path, PathBuf};

use fieldmap_model::MappingDocument;
use serde_json::Value;
use tracing::info_span;

use crate::capability::CapabilityRegistry;
use crate::engine::{execute_mapping, execute_mapping_with_policy};
use crate::error::{ConfigError, Result};
use crate::loader;
use crate::report::ErrorPolicy;

/// A configured transformation from one nested structure to another.
pub trait Transformer {
    /// Capabilities reachable through `function.name`.
    fn capabilities(&self) -> &CapabilityRegistry;

    /// Produce the mapping document to run.
    fn document(&self) -> std::result::Result<MappingDocument, ConfigError>;

    /// Load the document and run it over `input`.
    fn transform(&self, input: &Value) -> Result<Value> {
        let document = self.document()?;
        self.transform_from_mapping(&document, input)
    }

    /// Run an explicit document over `input`.
    fn transform_from_mapping(&self, document: &MappingDocument, input: &Value) -> Result<Value> {
        execute_mapping(document, input, self.capabilities())
    }
}

/// Transformer reading its document from a JSON or YAML file on every run.
#[derive(Debug)]
pub struct FileTransformer {
    path: PathBuf,
    capabilities: CapabilityRegistry,
    policy: Option<ErrorPolicy>,
}

impl FileTransformer {
    pub fn new(path: impl Into<PathBuf>, capabilities: CapabilityRegistry) -> Self {
        Self {
            path: path.into(),
            capabilities,
            policy: None,
        }
    }

    /// Override the policy selected by the document parameters.
    #[must_use]
    pub fn with_policy(mut self, policy: Option<ErrorPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Transformer for FileTransformer {
    fn capabilities(&self) -> &CapabilityRegistry {
        &self.capabilities
    }

    fn document(&self) -> std::result::Result<MappingDocument, ConfigError> {
        loader::load_document(&self.path)
    }

    fn transform_from_mapping(&self, document: &MappingDocument, input: &Value) -> Result<Value> {
        let span = info_span!("transform", document = %self.path.display());
        let _guard = span.enter();
        match self.policy {
            Some(policy) => {
                execute_mapping_with_policy(document, input, &self.capabilities, policy)
            }
            None => execute_mapping(document, input, &self.capabilities),
        }
    }
}

#[cfg(test)]
mod tests {
    use fieldmap_model::{MappingDocument, Node};
    use indexmap::IndexMap;
    use serde_json::json;

    use super::*;

    struct Inline {
        document: MappingDocument,
        capabilities: CapabilityRegistry,
    }

    impl Transformer for Inline {
        fn capabilities(&self) -> &CapabilityRegistry {
            &self.capabilities
        }

        fn document(&self) -> std::result::Result<MappingDocument, ConfigError> {
            Ok(self.document.clone())
        }
    }

    #[test]
    fn provided_transform_runs_document() {
        let mut mapping = IndexMap::new();
        mapping.insert("node".to_string(), Node::call("bar", "getString", ["foo"]));
        let transformer = Inline {
            document: MappingDocument::new(mapping),
            capabilities: CapabilityRegistry::new().with("getString", |args: &[Value]| {
                Ok(args.first().cloned().unwrap_or(Value::Null))
            }),
        };
        let out = transformer.transform(&json!({ "foo": "baz" })).unwrap();
        assert_eq!(out, json!({ "bar": "baz" }));
    }

    #[test]
    fn file_transformer_surfaces_load_errors() {
        let transformer =
            FileTransformer::new("/no/such/mapping.json", CapabilityRegistry::new());
        let err = transformer.transform(&json!({})).unwrap_err();
        assert!(err.is_config());
        assert_eq!(transformer.path(), Path::new("/no/such/mapping.json"));
    }
}
