//! Built-in capabilities available to documents run from the command line.
//!
//! String capabilities return `null` for non-string input instead of failing,
//! so a document can fall back to its default. Wrong argument counts are
//! errors.

use fieldmap_engine::{CapabilityError, CapabilityRegistry};
use serde_json::{Number, Value};

type CapabilityFn = fn(&[Value]) -> Result<Value, CapabilityError>;

/// A built-in capability with its documentation.
pub struct Builtin {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
    pub call: CapabilityFn,
}

/// Every built-in capability, in listing order.
pub const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "identity",
        usage: "identity(value)",
        description: "Return the argument unchanged",
        call: identity,
    },
    Builtin {
        name: "upper",
        usage: "upper(text)",
        description: "Uppercase a string",
        call: upper,
    },
    Builtin {
        name: "lower",
        usage: "lower(text)",
        description: "Lowercase a string",
        call: lower,
    },
    Builtin {
        name: "trim",
        usage: "trim(text)",
        description: "Strip leading and trailing whitespace; empty results are absent",
        call: trim,
    },
    Builtin {
        name: "concat",
        usage: "concat(value, ...)",
        description: "Concatenate present scalar arguments",
        call: concat,
    },
    Builtin {
        name: "join",
        usage: "join(separator, value, ...)",
        description: "Join present scalar arguments with a separator",
        call: join,
    },
    Builtin {
        name: "coalesce",
        usage: "coalesce(value, ...)",
        description: "First present argument",
        call: coalesce,
    },
    Builtin {
        name: "to_string",
        usage: "to_string(value)",
        description: "Render a scalar as a string",
        call: to_string,
    },
    Builtin {
        name: "to_number",
        usage: "to_number(value)",
        description: "Parse a number, accepting thousands separators",
        call: to_number,
    },
    Builtin {
        name: "to_bool",
        usage: "to_bool(value)",
        description: "Interpret yes/no, true/false, 1/0 as a boolean",
        call: to_bool,
    },
    Builtin {
        name: "split",
        usage: "split(text, separator)",
        description: "Split a string into a list of trimmed parts",
        call: split,
    },
    Builtin {
        name: "first",
        usage: "first(list)",
        description: "First element of a list",
        call: first,
    },
    Builtin {
        name: "count",
        usage: "count(list_or_map)",
        description: "Number of elements in a list or map",
        call: count,
    },
];

/// Registry holding every built-in capability.
pub fn builtin_capabilities() -> CapabilityRegistry {
    let mut registry = CapabilityRegistry::new();
    for builtin in BUILTINS {
        registry.register(builtin.name, builtin.call);
    }
    registry
}

fn single(args: &[Value]) -> Result<&Value, CapabilityError> {
    match args {
        [value] => Ok(value),
        _ => Err(CapabilityError::arity(1, args.len())),
    }
}

fn map_str(args: &[Value], f: impl Fn(&str) -> String) -> Result<Value, CapabilityError> {
    Ok(single(args)?
        .as_str()
        .map_or(Value::Null, |text| Value::String(f(text))))
}

/// Scalar rendered as text; containers and null are absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn identity(args: &[Value]) -> Result<Value, CapabilityError> {
    single(args).cloned()
}

fn upper(args: &[Value]) -> Result<Value, CapabilityError> {
    map_str(args, str::to_uppercase)
}

fn lower(args: &[Value]) -> Result<Value, CapabilityError> {
    map_str(args, str::to_lowercase)
}

fn trim(args: &[Value]) -> Result<Value, CapabilityError> {
    let trimmed = single(args)?.as_str().map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::String(trimmed.to_string()))
    }
}

fn concat(args: &[Value]) -> Result<Value, CapabilityError> {
    let parts: Vec<String> = args.iter().filter_map(scalar_text).collect();
    if parts.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::String(parts.concat()))
    }
}

fn join(args: &[Value]) -> Result<Value, CapabilityError> {
    let Some((separator, rest)) = args.split_first() else {
        return Err(CapabilityError::new("expected a separator argument"));
    };
    let Some(separator) = separator.as_str() else {
        return Err(CapabilityError::new("separator must be a string"));
    };
    let parts: Vec<String> = rest.iter().filter_map(scalar_text).collect();
    if parts.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::String(parts.join(separator)))
    }
}

fn coalesce(args: &[Value]) -> Result<Value, CapabilityError> {
    Ok(args
        .iter()
        .find(|value| !value.is_null())
        .cloned()
        .unwrap_or(Value::Null))
}

fn to_string(args: &[Value]) -> Result<Value, CapabilityError> {
    Ok(scalar_text(single(args)?).map_or(Value::Null, Value::String))
}

fn to_number(args: &[Value]) -> Result<Value, CapabilityError> {
    let value = single(args)?;
    Ok(match value {
        Value::Number(_) => value.clone(),
        Value::String(text) => parse_number(text).unwrap_or(Value::Null),
        _ => Value::Null,
    })
}

/// Parse numeric text, ignoring surrounding whitespace and thousands
/// separators. Integers stay integers.
fn parse_number(text: &str) -> Option<Value> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | ' ' | '\u{a0}'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    if let Ok(integer) = cleaned.parse::<i64>() {
        return Some(Value::from(integer));
    }
    let float: f64 = cleaned.parse().ok()?;
    Number::from_f64(float).map(Value::Number)
}

fn to_bool(args: &[Value]) -> Result<Value, CapabilityError> {
    let value = single(args)?;
    let flag = match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_f64().map(|n| n != 0.0),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" | "on" => Some(true),
            "false" | "no" | "n" | "0" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    };
    Ok(flag.map_or(Value::Null, Value::Bool))
}

fn split(args: &[Value]) -> Result<Value, CapabilityError> {
    let [text, separator] = args else {
        return Err(CapabilityError::arity(2, args.len()));
    };
    let (Some(text), Some(separator)) = (text.as_str(), separator.as_str()) else {
        return Ok(Value::Null);
    };
    if separator.is_empty() {
        return Err(CapabilityError::new("separator must not be empty"));
    }
    Ok(Value::Array(
        text.split(separator)
            .map(|part| Value::String(part.trim().to_string()))
            .collect(),
    ))
}

fn first(args: &[Value]) -> Result<Value, CapabilityError> {
    Ok(single(args)?
        .as_array()
        .and_then(|items| items.first())
        .cloned()
        .unwrap_or(Value::Null))
}

fn count(args: &[Value]) -> Result<Value, CapabilityError> {
    Ok(match single(args)? {
        Value::Array(items) => Value::from(items.len()),
        Value::Object(map) => Value::from(map.len()),
        _ => Value::Null,
    })
}
