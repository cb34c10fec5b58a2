//! Named capabilities callable from `function` nodes.
//!
//! A concrete transformer registers its capabilities by name up front. Looking
//! up a name that was never registered is a configuration error, not a panic.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::error::{self, CapabilityError, ConfigError, TransformError};

/// A capability: positional arguments in, one value out.
///
/// Returning `Value::Null` means "no value", which lets a node fall back to
/// its default.
pub type Capability = dyn Fn(&[Value]) -> Result<Value, CapabilityError> + Send + Sync + 'static;

/// Registry mapping capability names to callables.
#[derive(Default)]
pub struct CapabilityRegistry {
    entries: BTreeMap<String, Box<Capability>>,
}

impl CapabilityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capability, replacing any previous one with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, capability: F) -> &mut Self
    where
        F: Fn(&[Value]) -> Result<Value, CapabilityError> + Send + Sync + 'static,
    {
        self.entries.insert(name.into(), Box::new(capability));
        self
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with<F>(mut self, name: impl Into<String>, capability: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, CapabilityError> + Send + Sync + 'static,
    {
        self.register(name, capability);
        self
    }

    /// Look up a capability.
    pub fn get(&self, name: &str) -> Option<&Capability> {
        self.entries.get(name).map(Box::as_ref)
    }

    /// Call the capability registered as `name`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownCapability`] when nothing is registered under
    /// `name`, [`TransformError::Capability`] when the capability fails.
    pub fn invoke(&self, name: &str, args: &[Value]) -> error::Result<Value> {
        let capability = self.get(name).ok_or_else(|| ConfigError::UnknownCapability {
            name: name.to_string(),
        })?;
        capability(args).map_err(|source| TransformError::Capability {
            name: name.to_string(),
            source,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("names", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
