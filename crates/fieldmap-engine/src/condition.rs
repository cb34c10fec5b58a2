//! Node eligibility.

use fieldmap_model::{Node, PathError};
use serde_json::Value;

use crate::accessor;

/// Decide whether `node` is processed for this input.
///
/// Every `condition.exists` path must resolve to a present value. A node
/// without a condition, or with an empty list, is always eligible.
pub fn is_eligible(node: &Node, input: &Value) -> Result<bool, PathError> {
    let Some(exists) = node
        .condition
        .as_ref()
        .and_then(|condition| condition.exists.as_ref())
    else {
        return Ok(true);
    };

    for raw in exists.paths() {
        if accessor::read_str(input, raw)?.is_none() {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use fieldmap_model::{Condition, Exists};
    use serde_json::json;

    use super::*;

    fn gated(exists: Exists) -> Node {
        Node::copy("foo1.foo2", "bar1.bar2.bar3").with_condition(exists)
    }

    #[test]
    fn no_condition_is_eligible() {
        let node = Node::copy("a", "b");
        assert_eq!(is_eligible(&node, &json!({})), Ok(true));
    }

    #[test]
    fn empty_condition_is_eligible() {
        let mut node = Node::copy("a", "b");
        node.condition = Some(Condition::default());
        assert_eq!(is_eligible(&node, &json!({})), Ok(true));
        let all = gated(Exists::All(Vec::new()));
        assert_eq!(is_eligible(&all, &json!({})), Ok(true));
    }

    #[test]
    fn single_path() {
        let node = gated(Exists::One("baz".to_string()));
        assert_eq!(is_eligible(&node, &json!({ "baz": "hello" })), Ok(true));
        assert_eq!(is_eligible(&node, &json!({ "foo": "hello" })), Ok(false));
        assert_eq!(is_eligible(&node, &json!({ "baz": null })), Ok(false));
    }

    #[test]
    fn every_listed_path_must_exist() {
        let node = gated(Exists::All(vec!["baz".to_string(), "boz".to_string()]));
        assert_eq!(
            is_eligible(&node, &json!({ "baz": "hello", "boz": "bye" })),
            Ok(true)
        );
        assert_eq!(is_eligible(&node, &json!({ "baz": "hello" })), Ok(false));
        assert_eq!(is_eligible(&node, &json!({ "boz": "bye" })), Ok(false));
    }

    #[test]
    fn nested_condition_path() {
        let node = gated(Exists::One("meta.flags.active".to_string()));
        let input = json!({ "meta": { "flags": { "active": false } } });
        assert_eq!(is_eligible(&node, &input), Ok(true));
    }

    #[test]
    fn malformed_condition_path() {
        let node = gated(Exists::One("a..b".to_string()));
        assert!(is_eligible(&node, &json!({})).is_err());
    }
}
