//! Declarative field-mapping engine.
//!
//! Given an input structure and a [`MappingDocument`], the engine builds an
//! output structure by resolving each destination field from a source path, a
//! named capability, or a default.
//!
//! # Overview
//!
//! - **Path access**: dotted paths (`a.b.c`) read and write nested values
//! - **Conditions**: `condition.exists` gates whether a node is processed
//! - **Resolution**: `function` > `from` > `default`, defaults may be nested nodes
//! - **Validation**: `required` and `dependencies` raise violations
//! - **Reporting**: fail on the first violation, or collect them all
//!
//! # Example
//!
//! ```
//! use fieldmap_engine::{CapabilityRegistry, execute_mapping};
//! use fieldmap_model::MappingDocument;
//! use serde_json::json;
//!
//! let document = MappingDocument::from_value(json!({
//!     "mapping": {
//!         "node": { "from": "foo1.foo2", "to": "bar1.bar2.bar3" }
//!     }
//! }))
//! .unwrap();
//!
//! let output = execute_mapping(
//!     &document,
//!     &json!({ "foo1": { "foo2": "foo" } }),
//!     &CapabilityRegistry::new(),
//! )
//! .unwrap();
//! assert_eq!(output, json!({ "bar1": { "bar2": { "bar3": "foo" } } }));
//! ```

#![deny(unsafe_code)]

pub mod accessor;
pub mod capability;
pub mod check;
pub mod condition;
mod engine;
mod error;
pub mod loader;
mod report;
pub mod resolver;
mod transformer;

// Core types
pub use capability::{Capability, CapabilityRegistry};
pub use report::{ErrorPolicy, ViolationCollector};
pub use transformer::{FileTransformer, Transformer};

// Errors
pub use error::{CapabilityError, ConfigError, Result, TransformError, Violation};

// Execution
pub use engine::{
    MappingReport, NodeOutcome, NodeReport, execute_mapping, execute_mapping_report,
    execute_mapping_with_policy,
};

// Static checks
pub use check::{DocumentIssue, IssueKind, check_document};

pub use fieldmap_model::{self as model, MappingDocument};
