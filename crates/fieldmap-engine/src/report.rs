//! Violation reporting policy.

use std::fmt;

use fieldmap_model::Parameters;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TransformError, Violation};

/// How violations are surfaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Abort on the first violation.
    #[default]
    FailFast,
    /// Keep going, then fail once with every violation.
    Aggregate,
}

impl ErrorPolicy {
    /// Policy selected by `parameters.show_all_errors`.
    #[must_use]
    pub fn from_parameters(parameters: &Parameters) -> Self {
        if parameters.show_all_errors {
            Self::Aggregate
        } else {
            Self::FailFast
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::FailFast => "fail_fast",
            Self::Aggregate => "aggregate",
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Applies an [`ErrorPolicy`] to the violations of one run.
#[derive(Debug)]
pub struct ViolationCollector {
    policy: ErrorPolicy,
    violations: Vec<Violation>,
}

impl ViolationCollector {
    pub fn new(policy: ErrorPolicy) -> Self {
        Self {
            policy,
            violations: Vec::new(),
        }
    }

    /// Record a violation: fails immediately under fail-fast, buffers otherwise.
    pub fn record(&mut self, violation: Violation) -> Result<()> {
        match self.policy {
            ErrorPolicy::FailFast => Err(TransformError::Violation(violation)),
            ErrorPolicy::Aggregate => {
                self.violations.push(violation);
                Ok(())
            }
        }
    }

    /// Violations buffered so far.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Close the run and hand back what was buffered.
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(field: &str) -> Violation {
        Violation::RequiredField {
            node: field.to_string(),
            field: field.to_string(),
        }
    }

    #[test]
    fn policy_from_parameters() {
        assert_eq!(
            ErrorPolicy::from_parameters(&Parameters::default()),
            ErrorPolicy::FailFast
        );
        assert_eq!(
            ErrorPolicy::from_parameters(&Parameters {
                show_all_errors: true
            }),
            ErrorPolicy::Aggregate
        );
    }

    #[test]
    fn fail_fast_returns_first_violation() {
        let mut collector = ViolationCollector::new(ErrorPolicy::FailFast);
        let err = collector.record(required("foo")).unwrap_err();
        assert_eq!(err.to_string(), "Field foo required.");
        assert!(collector.violations().is_empty());
        assert!(collector.into_violations().is_empty());
    }

    #[test]
    fn aggregate_buffers_in_order() {
        let mut collector = ViolationCollector::new(ErrorPolicy::Aggregate);
        collector.record(required("foo")).unwrap();
        collector.record(required("bar")).unwrap();
        assert_eq!(collector.violations().len(), 2);
        let messages: Vec<String> = collector
            .into_violations()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(messages, ["Field foo required.", "Field bar required."]);
    }
}
