//! Mapping driver.
//!
//! Nodes are processed in declaration order. For each node:
//! 1. Skip it when its condition does not hold
//! 2. Resolve its value
//! 3. Check `required`, or else `dependencies`, recording violations
//! 4. Write the value at `to` when present. `to` is only required here
//!
//! Dependencies are checked against the output built so far, so only nodes
//! declared before the dependent one can satisfy it.

use fieldmap_model::{FieldPath, MappingDocument, Node};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, debug_span, info, info_span, trace, warn};

use crate::accessor;
use crate::capability::CapabilityRegistry;
use crate::condition;
use crate::error::{ConfigError, Result, TransformError, Violation};
use crate::report::{ErrorPolicy, ViolationCollector};
use crate::resolver;

/// What happened to one node during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeOutcome {
    /// A value was written at `to`.
    Written,
    /// The condition did not hold.
    Skipped,
    /// The node resolved to nothing and nothing was written.
    Absent,
    /// The node resolved to nothing and raised a violation.
    Violated,
}

/// Per-node record of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeReport {
    pub name: String,
    pub outcome: NodeOutcome,
}

/// Output of a run together with per-node outcomes.
///
/// Under [`ErrorPolicy::Aggregate`] the report is returned even when nodes
/// failed validation; `violations` then lists them in detection order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingReport {
    pub output: Value,
    pub nodes: Vec<NodeReport>,
    pub violations: Vec<Violation>,
}

impl MappingReport {
    pub fn count(&self, outcome: &NodeOutcome) -> usize {
        self.nodes.iter().filter(|n| &n.outcome == outcome).count()
    }

    /// The mapped output, or every violation of the run.
    pub fn into_output(self) -> Result<Value> {
        if self.violations.is_empty() {
            Ok(self.output)
        } else {
            Err(TransformError::Aggregated(self.violations))
        }
    }
}

/// Run `document` over `input` with the policy selected by the document.
pub fn execute_mapping(
    document: &MappingDocument,
    input: &Value,
    capabilities: &CapabilityRegistry,
) -> Result<Value> {
    let policy = ErrorPolicy::from_parameters(&document.parameters);
    execute_mapping_with_policy(document, input, capabilities, policy)
}

/// Run `document` over `input` with an explicit policy.
pub fn execute_mapping_with_policy(
    document: &MappingDocument,
    input: &Value,
    capabilities: &CapabilityRegistry,
    policy: ErrorPolicy,
) -> Result<Value> {
    execute_mapping_report(document, input, capabilities, policy)?.into_output()
}

/// Run `document` over `input` and keep per-node outcomes.
///
/// Under fail-fast the first violation is returned as an error. Under
/// aggregate the report comes back with its violations; use
/// [`MappingReport::into_output`] to turn them into an error.
pub fn execute_mapping_report(
    document: &MappingDocument,
    input: &Value,
    capabilities: &CapabilityRegistry,
    policy: ErrorPolicy,
) -> Result<MappingReport> {
    let mapping = document.mapping.as_ref().ok_or(ConfigError::MissingMapping)?;

    let span = info_span!("mapping", nodes = mapping.len(), policy = %policy);
    let _guard = span.enter();

    let run = Run {
        mapping,
        input,
        capabilities,
    };
    let mut output = Value::Object(Map::new());
    let mut collector = ViolationCollector::new(policy);
    let mut nodes = Vec::with_capacity(mapping.len());

    for (index, (name, node)) in document.nodes().enumerate() {
        let outcome = run.process(index, name, node, &mut output, &mut collector)?;
        nodes.push(NodeReport {
            name: name.to_string(),
            outcome,
        });
    }

    let violations = collector.into_violations();
    if !violations.is_empty() {
        warn!(violations = violations.len(), "mapping finished with violations");
    }

    let report = MappingReport {
        output,
        nodes,
        violations,
    };
    info!(
        written = report.count(&NodeOutcome::Written),
        skipped = report.count(&NodeOutcome::Skipped),
        absent = report.count(&NodeOutcome::Absent),
        violated = report.count(&NodeOutcome::Violated),
        "mapping complete"
    );
    Ok(report)
}

/// Inputs shared by every node of one run.
struct Run<'a> {
    mapping: &'a IndexMap<String, Node>,
    input: &'a Value,
    capabilities: &'a CapabilityRegistry,
}

impl Run<'_> {
    fn process(
        &self,
        index: usize,
        name: &str,
        node: &Node,
        output: &mut Value,
        collector: &mut ViolationCollector,
    ) -> Result<NodeOutcome> {
        let span = debug_span!("node", name);
        let _guard = span.enter();

        let eligible = condition::is_eligible(node, self.input)
            .map_err(|source| ConfigError::path(name, source))?;
        if !eligible {
            debug!(node = name, "condition not met, skipping");
            return Ok(NodeOutcome::Skipped);
        }

        let Some(value) = resolver::resolve(name, node, self.input, self.capabilities)? else {
            if let Some(violation) = self.violation(index, name, node, output)? {
                warn!(node = name, "{violation}");
                collector.record(violation)?;
                return Ok(NodeOutcome::Violated);
            }
            debug!(node = name, "no value resolved");
            return Ok(NodeOutcome::Absent);
        };

        if let Some(dependencies) = &node.dependencies {
            // unknown names are reported even when the node has a value
            self.dependencies_satisfied(index, name, dependencies, output)?;
        }

        let target = target_path(name, node)?;
        trace!(node = name, to = %target, value = %value, "writing value");
        accessor::write(output, &target, value)
            .map_err(|source| ConfigError::path(name, source))?;
        debug!(node = name, to = %target, "written");
        Ok(NodeOutcome::Written)
    }

    /// Violation raised by a node that resolved to nothing, if any.
    fn violation(
        &self,
        index: usize,
        name: &str,
        node: &Node,
        output: &Value,
    ) -> Result<Option<Violation>> {
        let field = node.label(name).to_string();
        if node.required {
            return Ok(Some(Violation::RequiredField {
                node: name.to_string(),
                field,
            }));
        }
        let Some(dependencies) = &node.dependencies else {
            return Ok(None);
        };
        if self.dependencies_satisfied(index, name, dependencies, output)? {
            return Ok(Some(Violation::DependencyField {
                node: name.to_string(),
                field,
            }));
        }
        Ok(None)
    }

    /// True when every dependency was declared earlier and already wrote a
    /// present value at its own `to` path.
    fn dependencies_satisfied(
        &self,
        index: usize,
        name: &str,
        dependencies: &[String],
        output: &Value,
    ) -> Result<bool> {
        let mut satisfied = true;
        for dependency in dependencies {
            let Some((position, _, other)) = self.mapping.get_full(dependency.as_str()) else {
                return Err(ConfigError::UnknownDependency {
                    node: name.to_string(),
                    dependency: dependency.clone(),
                }
                .into());
            };
            if position >= index {
                debug!(node = name, dependency = %dependency, "dependency declared later, treated as unmet");
                satisfied = false;
                continue;
            }
            let Some(to) = other.to.as_deref() else {
                satisfied = false;
                continue;
            };
            let path = FieldPath::parse(to).map_err(|source| ConfigError::path(dependency, source))?;
            if accessor::read(output, &path).is_none() {
                satisfied = false;
            }
        }
        Ok(satisfied)
    }
}

fn target_path(name: &str, node: &Node) -> Result<FieldPath> {
    let raw = node.to.as_deref().ok_or_else(|| ConfigError::MissingTarget {
        node: name.to_string(),
    })?;
    Ok(FieldPath::parse(raw).map_err(|source| ConfigError::path(name, source))?)
}
