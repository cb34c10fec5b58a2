//! Mapping document model for the fieldmap engine.
//!
//! A mapping document is a declarative description of how to build an output
//! structure from an input structure. It is usually authored as YAML or JSON:
//!
//! ```yaml
//! parameters:
//!   show_all_errors: true
//! mapping:
//!   name:
//!     from: customer.name
//!     to: client.full_name
//!     required: true
//!   country:
//!     from: customer.address.country
//!     to: client.country
//!     default: FR
//! ```
//!
//! This crate only describes documents. Resolution lives in `fieldmap-engine`.

#![deny(unsafe_code)]

pub mod document;
pub mod error;
pub mod path;

pub use document::{
    Condition, DefaultValue, Exists, FunctionCall, MappingDocument, Node, Parameters,
};
pub use error::{DocumentError, PathError};
pub use path::FieldPath;
