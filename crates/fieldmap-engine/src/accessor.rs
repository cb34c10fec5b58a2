//! Dotted-path reads and writes over nested values.
//!
//! Reads never fail: a missing key, an index past the end of a sequence, a
//! scalar in the middle of the path, or an explicit `null` all read as absent.
//! Writes create missing intermediate maps as they descend.

use std::cmp::Ordering;

use fieldmap_model::path::segment_index;
use fieldmap_model::{FieldPath, PathError};
use serde_json::{Map, Value};

/// Read the value at `path`, treating `null` as absent.
pub fn read<'a>(data: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    let mut current = data;
    for segment in path.segments() {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment_index(segment)?)?,
            _ => return None,
        };
    }
    (!current.is_null()).then_some(current)
}

/// Parse `path` and read it.
pub fn read_str<'a>(data: &'a Value, path: &str) -> Result<Option<&'a Value>, PathError> {
    Ok(read(data, &FieldPath::parse(path)?))
}

/// Write `value` at `path`, creating intermediate maps.
///
/// An existing value at the leaf is replaced. Sequences accept an existing
/// index or the index one past the end (append).
pub fn write(data: &mut Value, path: &FieldPath, value: Value) -> Result<(), PathError> {
    let Some((leaf, parents)) = path.segments().split_last() else {
        return Err(PathError::Empty);
    };

    let mut current = data;
    for segment in parents {
        current = child_mut(current, segment, path)?;
    }
    set_child(current, leaf, value, path)
}

fn child_mut<'a>(
    container: &'a mut Value,
    segment: &str,
    path: &FieldPath,
) -> Result<&'a mut Value, PathError> {
    if container.is_null() {
        *container = Value::Object(Map::new());
    }
    match container {
        Value::Object(map) => Ok(map
            .entry(segment)
            .or_insert_with(|| Value::Object(Map::new()))),
        Value::Array(items) => {
            let index = segment_index(segment).ok_or_else(|| not_a_container(path, segment))?;
            let len = items.len();
            if index == len {
                items.push(Value::Object(Map::new()));
            }
            items.get_mut(index).ok_or_else(|| PathError::IndexOutOfRange {
                path: path.to_string(),
                index,
                len,
            })
        }
        _ => Err(not_a_container(path, segment)),
    }
}

fn set_child(
    container: &mut Value,
    leaf: &str,
    value: Value,
    path: &FieldPath,
) -> Result<(), PathError> {
    if container.is_null() {
        *container = Value::Object(Map::new());
    }
    match container {
        Value::Object(map) => {
            map.insert(leaf.to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            let index = segment_index(leaf).ok_or_else(|| not_a_container(path, leaf))?;
            let len = items.len();
            match index.cmp(&len) {
                Ordering::Less => items[index] = value,
                Ordering::Equal => items.push(value),
                Ordering::Greater => {
                    return Err(PathError::IndexOutOfRange {
                        path: path.to_string(),
                        index,
                        len,
                    });
                }
            }
            Ok(())
        }
        _ => Err(not_a_container(path, leaf)),
    }
}

fn not_a_container(path: &FieldPath, segment: &str) -> PathError {
    PathError::NotAContainer {
        path: path.to_string(),
        segment: segment.to_string(),
    }
}
