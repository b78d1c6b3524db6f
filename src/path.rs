//! Key-path access into a JSON document.
//!
//! Reads never create anything. Writes create missing intermediate containers
//! on the way down and refuse to reinterpret an existing container of the
//! wrong kind: a string key against a sequence, an index against a mapping, or
//! any key against a scalar is a [`PathTypeConflict`](XrayfigError::PathTypeConflict).

use serde_json::{Map, Value};

use crate::error::XrayfigError;
use crate::types::{Key, KeyPath};

/// Walk `path` and return the value it points at.
pub fn get<'a>(doc: &'a Value, path: &KeyPath) -> Result<&'a Value, XrayfigError> {
    let mut current = doc;
    for (depth, key) in path.keys().iter().enumerate() {
        let next = match (key, current) {
            (Key::Name(name), Value::Object(map)) => map.get(name),
            (Key::Index(idx), Value::Array(arr)) => arr.get(*idx),
            (key, other) => return Err(conflict(path, depth, key, other)),
        };
        current = next.ok_or_else(|| XrayfigError::PathNotFound {
            path: path.prefix(depth + 1).to_string(),
        })?;
    }
    Ok(current)
}

/// Like [`get`], but a missing location is `None` instead of an error.
/// Type conflicts are still reported.
pub fn lookup<'a>(doc: &'a Value, path: &KeyPath) -> Result<Option<&'a Value>, XrayfigError> {
    match get(doc, path) {
        Ok(v) => Ok(Some(v)),
        Err(XrayfigError::PathNotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Copy-on-write set: returns a copy of `doc` with `value` written at `path`.
///
/// `doc` itself is never touched, so on error the caller still holds the
/// unmodified original.
pub fn set(doc: &Value, path: &KeyPath, value: Value) -> Result<Value, XrayfigError> {
    let mut copy = doc.clone();
    set_in(&mut copy, path, value)?;
    Ok(copy)
}

/// Write `value` at `path` inside `doc`, creating intermediate containers.
///
/// A missing (or `null`) intermediate becomes a sequence when the following
/// key is an index and a mapping otherwise. Sequences shorter than an index
/// are padded with empty mappings up to it, and the slot at the index itself
/// follows the same rule. Callers that need all-or-nothing behavior
/// must operate on a copy, as [`set`] does.
pub fn set_in(doc: &mut Value, path: &KeyPath, value: Value) -> Result<(), XrayfigError> {
    let keys = path.keys();
    let Some((leaf, parents)) = keys.split_last() else {
        *doc = value;
        return Ok(());
    };

    let mut current = doc;
    for (depth, key) in parents.iter().enumerate() {
        let next_key = &keys[depth + 1];
        current = descend(current, path, depth, key, next_key)?;
    }

    let depth = keys.len() - 1;
    if current.is_null() {
        *current = empty_for(leaf);
    }
    match (leaf, current) {
        (Key::Name(name), Value::Object(map)) => {
            map.insert(name.clone(), value);
        }
        (Key::Index(idx), Value::Array(arr)) => {
            pad(arr, *idx);
            if arr.len() == *idx {
                arr.push(value);
            } else {
                arr[*idx] = value;
            }
        }
        (key, other) => return Err(conflict(path, depth, key, other)),
    }
    Ok(())
}

fn descend<'a>(
    current: &'a mut Value,
    path: &KeyPath,
    depth: usize,
    key: &Key,
    next_key: &Key,
) -> Result<&'a mut Value, XrayfigError> {
    if current.is_null() {
        *current = empty_for(key);
    }
    let slot = match (key, current) {
        (Key::Name(name), Value::Object(map)) => {
            map.entry(name.clone()).or_insert_with(|| empty_for(next_key))
        }
        (Key::Index(idx), Value::Array(arr)) => {
            pad(arr, *idx);
            if arr.len() == *idx {
                arr.push(empty_for(next_key));
            }
            &mut arr[*idx]
        }
        (key, other) => return Err(conflict(path, depth, key, other)),
    };
    if slot.is_null() {
        *slot = empty_for(next_key);
    }
    Ok(slot)
}

/// Empty container suited to receive `key`.
fn empty_for(key: &Key) -> Value {
    match key {
        Key::Name(_) => Value::Object(Map::new()),
        Key::Index(_) => Value::Array(Vec::new()),
    }
}

/// Fill the gap before `idx` with empty mappings.
fn pad(arr: &mut Vec<Value>, idx: usize) {
    while arr.len() < idx {
        arr.push(Value::Object(Map::new()));
    }
}

fn conflict(path: &KeyPath, depth: usize, key: &Key, found: &Value) -> XrayfigError {
    let expected = match key {
        Key::Name(_) => "mapping",
        Key::Index(_) => "sequence",
    };
    XrayfigError::PathTypeConflict {
        path: path.prefix(depth).to_string(),
        expected,
        found: kind_name(found),
    }
}

/// Human-readable name of a JSON value's type.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
