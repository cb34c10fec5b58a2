//! Node value resolution.
//!
//! Precedence, highest first:
//! 1. `function`: call the named capability with values read from the input
//! 2. `from`: read the input path
//! 3. `default`: when the above is absent, either a literal value or a nested
//!    node resolved with these same rules

use fieldmap_model::{DefaultValue, FieldPath, FunctionCall, Node};
use serde_json::Value;
use tracing::{trace, warn};

use crate::accessor;
use crate::capability::CapabilityRegistry;
use crate::error::{ConfigError, Result};

/// Resolve the value of `node` against `input`.
///
/// `name` is the top-level node being processed and is only used for error
/// context. Capability arguments always come from `input`, never from the
/// output built so far.
pub fn resolve(
    name: &str,
    node: &Node,
    input: &Value,
    capabilities: &CapabilityRegistry,
) -> Result<Option<Value>> {
    let primary = if let Some(function) = &node.function {
        call_capability(name, function, input, capabilities)?
    } else if let Some(from) = &node.from {
        read_input(name, input, from)?.cloned()
    } else {
        None
    };

    if primary.is_some() {
        return Ok(primary);
    }

    match &node.default {
        Some(DefaultValue::Node(fallback)) => {
            trace!(node = name, "resolving computed default");
            resolve(name, fallback, input, capabilities)
        }
        Some(DefaultValue::Literal(value)) if !value.is_null() => Ok(Some(value.clone())),
        _ => Ok(None),
    }
}

fn call_capability(
    name: &str,
    function: &FunctionCall,
    input: &Value,
    capabilities: &CapabilityRegistry,
) -> Result<Option<Value>> {
    let mut args = Vec::with_capacity(function.params.len());
    for param in &function.params {
        args.push(read_input(name, input, param)?.cloned().unwrap_or(Value::Null));
    }

    trace!(node = name, capability = %function.name, argc = args.len(), "invoking capability");
    let value = capabilities
        .invoke(&function.name, &args)
        .inspect_err(|err| warn!(node = name, capability = %function.name, "{err}"))?;
    Ok((!value.is_null()).then_some(value))
}

fn read_input<'a>(name: &str, input: &'a Value, raw: &str) -> Result<Option<&'a Value>> {
    let path = FieldPath::parse(raw).map_err(|source| ConfigError::path(name, source))?;
    Ok(accessor::read(input, &path))
}

#[cfg(test)]
mod tests {
    use fieldmap_model::FunctionCall;
    use serde_json::json;

    use super::*;
    use crate::error::{CapabilityError, TransformError};

    fn registry() -> CapabilityRegistry {
        CapabilityRegistry::new()
            .with("getString", |args: &[Value]| {
                Ok(args.first().cloned().unwrap_or(Value::Null))
            })
            .with("concat", |args: &[Value]| {
                let parts: Vec<&str> = args.iter().filter_map(Value::as_str).collect();
                Ok(json!(parts.join(" ")))
            })
            .with("nothing", |_: &[Value]| Ok(Value::Null))
            .with("strict", |args: &[Value]| {
                if args.len() == 2 {
                    Ok(json!(true))
                } else {
                    Err(CapabilityError::arity(2, args.len()))
                }
            })
    }

    #[test]
    fn reads_from_path() {
        let node = Node::copy("foo1.foo2", "bar");
        let input = json!({ "foo1": { "foo2": "foo" } });
        assert_eq!(
            resolve("node", &node, &input, &registry()).unwrap(),
            Some(json!("foo"))
        );
    }

    #[test]
    fn function_receives_positional_arguments() {
        let node = Node::call("out", "concat", ["first", "person.last"]);
        let input = json!({ "first": "Ada", "person": { "last": "Lovelace" } });
        assert_eq!(
            resolve("node", &node, &input, &registry()).unwrap(),
            Some(json!("Ada Lovelace"))
        );
    }

    #[test]
    fn missing_arguments_are_passed_as_null() {
        let node = Node::call("out", "strict", ["present", "absent"]);
        let input = json!({ "present": 1 });
        assert_eq!(
            resolve("node", &node, &input, &registry()).unwrap(),
            Some(json!(true))
        );
    }

    #[test]
    fn function_takes_precedence_over_from() {
        let mut node = Node::call("out", "getString", ["b"]);
        node.from = Some("a".to_string());
        let input = json!({ "a": "from", "b": "function" });
        assert_eq!(
            resolve("node", &node, &input, &registry()).unwrap(),
            Some(json!("function"))
        );
    }

    #[test]
    fn null_function_result_falls_back_to_default() {
        let mut node = Node::call("out", "nothing", Vec::<String>::new())
            .with_default(DefaultValue::literal("fallback"));
        node.from = Some("a".to_string());
        let input = json!({ "a": "ignored" });
        assert_eq!(
            resolve("node", &node, &input, &registry()).unwrap(),
            Some(json!("fallback"))
        );
    }

    #[test]
    fn literal_default_only_when_absent() {
        let node = Node::copy("foo", "bar").with_default(DefaultValue::literal("default"));
        assert_eq!(
            resolve("node", &node, &json!({}), &registry()).unwrap(),
            Some(json!("default"))
        );
        assert_eq!(
            resolve("node", &node, &json!({ "foo": "value" }), &registry()).unwrap(),
            Some(json!("value"))
        );
        assert_eq!(
            resolve("node", &node, &json!({ "foo": false }), &registry()).unwrap(),
            Some(json!(false))
        );
    }

    #[test]
    fn null_literal_default_stays_absent() {
        let node = Node::copy("foo", "bar").with_default(DefaultValue::Literal(Value::Null));
        assert_eq!(resolve("node", &node, &json!({}), &registry()).unwrap(), None);
    }

    #[test]
    fn chained_defaults() {
        let last_resort = Node::default().with_default(DefaultValue::literal("unknown"));
        let second = Node {
            from: Some("alias".to_string()),
            ..Node::default()
        }
        .with_default(DefaultValue::node(last_resort));
        let node = Node::copy("name", "out").with_default(DefaultValue::node(second));

        let registry = registry();
        assert_eq!(
            resolve("node", &node, &json!({ "alias": "al" }), &registry).unwrap(),
            Some(json!("al"))
        );
        assert_eq!(
            resolve("node", &node, &json!({}), &registry).unwrap(),
            Some(json!("unknown"))
        );
    }

    #[test]
    fn computed_default() {
        let fallback = Node {
            function: Some(FunctionCall::new("getString", ["foo"])),
            ..Node::default()
        };
        let node = Node {
            to: Some("bar".to_string()),
            ..Node::default()
        }
        .with_default(DefaultValue::node(fallback));
        let input = json!({ "foo": "I am a string" });
        assert_eq!(
            resolve("node", &node, &input, &registry()).unwrap(),
            Some(json!("I am a string"))
        );
    }

    #[test]
    fn node_without_source_is_absent() {
        let node = Node {
            to: Some("bar".to_string()),
            ..Node::default()
        };
        assert_eq!(resolve("node", &node, &json!({}), &registry()).unwrap(), None);
    }

    #[test]
    fn unknown_capability_is_a_config_error() {
        let node = Node::call("out", "doesNotExist", ["foo"]);
        let err = resolve("node", &node, &json!({}), &registry()).unwrap_err();
        assert!(matches!(
            err,
            TransformError::Config(ConfigError::UnknownCapability { ref name }) if name == "doesNotExist"
        ));
    }

    #[test]
    fn capability_failure_is_fatal() {
        let node = Node::call("out", "strict", ["only"]);
        let err = resolve("total", &node, &json!({}), &registry()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "capability `strict` failed: expected 2 argument(s), got 1"
        );
    }

    #[test]
    fn malformed_source_path() {
        let node = Node::copy("a..b", "out");
        let err = resolve("broken", &node, &json!({}), &registry()).unwrap_err();
        assert!(matches!(
            err,
            TransformError::Config(ConfigError::Path { ref node, .. }) if node == "broken"
        ));
    }
}
