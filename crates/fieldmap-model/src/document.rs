//! Mapping document types.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::DocumentError;

/// Keys that make a `default` block a nested node instead of a literal value.
const NODE_KEYS: [&str; 3] = ["function", "from", "default"];

/// A complete mapping document consumed by one transformation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingDocument {
    /// Run options.
    #[serde(default)]
    pub parameters: Parameters,

    /// Nodes keyed by name, in declaration order.
    ///
    /// Kept optional so that a missing block surfaces as a configuration
    /// error at run time rather than as a parse error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<IndexMap<String, Node>>,
}

impl MappingDocument {
    /// Create a document from an ordered set of nodes.
    pub fn new(mapping: IndexMap<String, Node>) -> Self {
        Self {
            parameters: Parameters::default(),
            mapping: Some(mapping),
        }
    }

    /// Parse a document from an in-memory nested value.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Parse a document from JSON text.
    pub fn from_json_str(raw: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Parse a document from YAML text.
    pub fn from_yaml_str(raw: &str) -> Result<Self, DocumentError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Iterate nodes in declaration order. Empty when `mapping` is missing.
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.mapping
            .iter()
            .flat_map(|mapping| mapping.iter().map(|(name, node)| (name.as_str(), node)))
    }

    /// Look up a node by name.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.mapping.as_ref()?.get(name)
    }

    /// Declaration index of a node.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.mapping.as_ref()?.get_index_of(name)
    }

    /// Number of declared nodes.
    pub fn len(&self) -> usize {
        self.mapping.as_ref().map_or(0, IndexMap::len)
    }

    /// True if no nodes are declared.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Document-level options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    /// Collect every violation and fail once at the end instead of failing
    /// on the first one.
    #[serde(default)]
    pub show_all_errors: bool,
}

/// One declarative rule producing one output field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Dotted path read from the input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    /// Dotted path written in the output. Nested default nodes leave it unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,

    /// Capability call computing the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<FunctionCall>,

    /// Fallback used when the primary resolution is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,

    /// Fail when the resolved value is absent.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,

    /// Gate deciding whether the node is processed at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,

    /// Names of earlier nodes whose output makes this node mandatory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
}

impl Node {
    /// A plain copy from one path to another.
    pub fn copy(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
            ..Self::default()
        }
    }

    /// A capability call written to `to`.
    pub fn call(
        to: impl Into<String>,
        name: impl Into<String>,
        params: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            to: Some(to.into()),
            function: Some(FunctionCall::new(name, params)),
            ..Self::default()
        }
    }

    /// Set the default.
    #[must_use]
    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Mark the node as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Gate the node on the existence of one or more input paths.
    #[must_use]
    pub fn with_condition(mut self, exists: Exists) -> Self {
        self.condition = Some(Condition {
            exists: Some(exists),
        });
        self
    }

    /// Declare dependencies on other nodes.
    #[must_use]
    pub fn with_dependencies(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.dependencies = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Name used in violation messages: the source path, or the node name
    /// when the node has no source path.
    pub fn label<'a>(&'a self, name: &'a str) -> &'a str {
        self.from.as_deref().unwrap_or(name)
    }
}

/// Named capability call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Capability name registered by the concrete transformer.
    pub name: String,

    /// Dotted input paths resolved into positional arguments.
    #[serde(default)]
    pub params: Vec<String>,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, params: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }
}

/// Processing gate for a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Input paths that must all be present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exists: Option<Exists>,
}

/// One path or a list of paths that must all resolve to a present value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Exists {
    One(String),
    All(Vec<String>),
}

impl Exists {
    /// Uniform view over the required paths.
    pub fn paths(&self) -> &[String] {
        match self {
            Self::One(path) => std::slice::from_ref(path),
            Self::All(paths) => paths,
        }
    }
}

/// Fallback for a node whose primary resolution is absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    /// A nested node resolved with the same rules against the same input.
    Node(Box<Node>),
    /// A value used verbatim.
    Literal(Value),
}

impl DefaultValue {
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    pub fn node(node: Node) -> Self {
        Self::Node(Box::new(node))
    }
}

/// True if a raw `default` block should be read as a nested node.
pub fn is_node_shaped(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| NODE_KEYS.iter().any(|key| map.contains_key(*key)))
}

impl<'de> Deserialize<'de> for DefaultValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        if is_node_shaped(&raw) {
            let node = Node::deserialize(raw).map_err(serde::de::Error::custom)?;
            Ok(Self::Node(Box::new(node)))
        } else {
            Ok(Self::Literal(raw))
        }
    }
}
