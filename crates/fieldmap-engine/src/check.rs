//! Static document checks.
//!
//! These checks look at a document and a capability set without any input
//! data, so authors can catch configuration errors before a run hits them.
//! They do not change how [`execute_mapping`](crate::execute_mapping) behaves.

use std::fmt;

use fieldmap_model::{DefaultValue, FieldPath, MappingDocument, Node};
use serde::Serialize;

use crate::capability::CapabilityRegistry;

/// Category of a document issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingMapping,
    MissingTarget,
    InvalidPath,
    UnknownCapability,
    UnknownDependency,
    ForwardDependency,
}

impl IssueKind {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::MissingMapping => "missing_mapping",
            Self::MissingTarget => "missing_target",
            Self::InvalidPath => "invalid_path",
            Self::UnknownCapability => "unknown_capability",
            Self::UnknownDependency => "unknown_dependency",
            Self::ForwardDependency => "forward_dependency",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One problem found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentIssue {
    /// Node the issue belongs to. `None` for document-level issues.
    pub node: Option<String>,
    pub kind: IssueKind,
    pub message: String,
}

/// Check `document` against `capabilities`.
///
/// Issues are returned in declaration order.
pub fn check_document(
    document: &MappingDocument,
    capabilities: &CapabilityRegistry,
) -> Vec<DocumentIssue> {
    let Some(mapping) = &document.mapping else {
        return vec![DocumentIssue {
            node: None,
            kind: IssueKind::MissingMapping,
            message: "mapping key is missing.".to_string(),
        }];
    };

    let mut checker = Checker {
        capabilities,
        issues: Vec::new(),
    };
    for (index, (name, node)) in mapping.iter().enumerate() {
        match node.to.as_deref() {
            Some(to) => checker.path(name, "to", to),
            None => checker.push(
                name,
                IssueKind::MissingTarget,
                "node has no `to` path".to_string(),
            ),
        }
        if let Some(exists) = node.condition.as_ref().and_then(|c| c.exists.as_ref()) {
            for path in exists.paths() {
                checker.path(name, "condition.exists", path);
            }
        }
        checker.sources(name, node);

        for dependency in node.dependencies.iter().flatten() {
            match document.position(dependency) {
                None => checker.push(
                    name,
                    IssueKind::UnknownDependency,
                    format!("depends on unknown node `{dependency}`"),
                ),
                Some(position) if position >= index => checker.push(
                    name,
                    IssueKind::ForwardDependency,
                    format!("depends on `{dependency}`, which is declared at or after it"),
                ),
                Some(_) => {}
            }
        }
    }
    checker.issues
}

struct Checker<'a> {
    capabilities: &'a CapabilityRegistry,
    issues: Vec<DocumentIssue>,
}

impl Checker<'_> {
    fn push(&mut self, node: &str, kind: IssueKind, message: String) {
        self.issues.push(DocumentIssue {
            node: Some(node.to_string()),
            kind,
            message,
        });
    }

    fn path(&mut self, node: &str, field: &str, raw: &str) {
        if let Err(err) = FieldPath::parse(raw) {
            self.push(node, IssueKind::InvalidPath, format!("{field}: {err}"));
        }
    }

    /// Check `from`, `function` and nested defaults.
    fn sources(&mut self, name: &str, node: &Node) {
        if let Some(from) = &node.from {
            self.path(name, "from", from);
        }
        if let Some(function) = &node.function {
            if !self.capabilities.contains(&function.name) {
                self.push(
                    name,
                    IssueKind::UnknownCapability,
                    format!("unknown capability `{}`", function.name),
                );
            }
            for param in &function.params {
                self.path(name, "function.params", param);
            }
        }
        if let Some(DefaultValue::Node(fallback)) = &node.default {
            self.sources(name, fallback);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn kinds(issues: &[DocumentIssue]) -> Vec<IssueKind> {
        issues.iter().map(|issue| issue.kind).collect()
    }

    #[test]
    fn clean_document_has_no_issues() {
        let doc = MappingDocument::from_value(json!({
            "mapping": {
                "a": { "from": "x", "to": "y" },
                "b": { "to": "z", "function": { "name": "upper", "params": ["x"] }, "dependencies": ["a"] }
            }
        }))
        .unwrap();
        let registry = CapabilityRegistry::new().with("upper", |args: &[serde_json::Value]| {
            Ok(args[0].clone())
        });
        assert!(check_document(&doc, &registry).is_empty());
    }

    #[test]
    fn reports_missing_mapping() {
        let doc = MappingDocument::default();
        let issues = check_document(&doc, &CapabilityRegistry::new());
        assert_eq!(kinds(&issues), [IssueKind::MissingMapping]);
        assert_eq!(issues[0].node, None);
    }

    #[test]
    fn reports_every_problem_in_order() {
        let doc = MappingDocument::from_value(json!({
            "mapping": {
                "first": { "from": "a..b", "dependencies": ["second", "ghost"] },
                "second": {
                    "to": "out",
                    "default": { "function": { "name": "nope", "params": [] } }
                }
            }
        }))
        .unwrap();
        let issues = check_document(&doc, &CapabilityRegistry::new());
        assert_eq!(
            kinds(&issues),
            [
                IssueKind::MissingTarget,
                IssueKind::InvalidPath,
                IssueKind::ForwardDependency,
                IssueKind::UnknownDependency,
                IssueKind::UnknownCapability,
            ]
        );
        assert_eq!(issues[4].node.as_deref(), Some("second"));
    }
}
