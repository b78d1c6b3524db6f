//! Conversion of edited input into the JSON value a field declares.

use serde_json::Value;

use crate::error::XrayfigError;
use crate::types::{FieldKind, RawValue};

/// String spellings accepted as `true` for boolean fields (case-insensitive).
/// `/` is the legacy encoding of an enabled padding toggle.
const TRUTHY: &[&str] = &["true", "1", "yes", "/", "on"];

/// Coerce `raw` into a value of `kind` for the field labelled `field`.
///
/// Booleans and strings never fail. Integers are parsed base-10 after
/// trimming; anything else is a [`XrayfigError::Coercion`].
pub fn coerce(field: &str, raw: &RawValue, kind: FieldKind) -> Result<Value, XrayfigError> {
    match kind {
        FieldKind::Boolean => Ok(Value::Bool(truthy(raw))),
        FieldKind::Integer => {
            let text = match raw {
                RawValue::Text(s) => s.trim(),
                RawValue::Toggle(b) => {
                    return Err(XrayfigError::Coercion {
                        field: field.to_string(),
                        input: b.to_string(),
                    });
                }
            };
            text.parse::<i64>()
                .map(Value::from)
                .or_else(|_| text.parse::<u64>().map(Value::from))
                .map_err(|_| XrayfigError::Coercion {
                    field: field.to_string(),
                    input: text.to_string(),
                })
        }
        FieldKind::String => Ok(Value::String(match raw {
            RawValue::Text(s) => s.trim().to_string(),
            RawValue::Toggle(b) => b.to_string(),
        })),
    }
}

fn truthy(raw: &RawValue) -> bool {
    match raw {
        RawValue::Toggle(b) => *b,
        RawValue::Text(s) => {
            let s = s.trim();
            TRUTHY.iter().any(|t| s.eq_ignore_ascii_case(t))
        }
    }
}

/// Kind suggested by a loaded value's runtime type.
pub fn infer_kind(value: &Value) -> FieldKind {
    match value {
        Value::Bool(_) => FieldKind::Boolean,
        Value::Number(n) if n.is_i64() || n.is_u64() => FieldKind::Integer,
        _ => FieldKind::String,
    }
}

/// The value to write for a field holding `value`.
///
/// A value that already has the field's kind is kept as it is, so numbers
/// the document wrote as `443.0` stay numbers. Anything else (uncoerced
/// edits, legacy strings in forced boolean fields) goes through [`coerce`].
pub fn settle(field: &str, value: &Value, kind: FieldKind) -> Result<Value, XrayfigError> {
    if infer_kind(value) == kind {
        return Ok(value.clone());
    }
    coerce(field, &raw_of(value), kind)
}

/// Turn a stored scalar back into raw input, so pending values can be
/// coerced again at commit time.
pub fn raw_of(value: &Value) -> RawValue {
    match value {
        Value::Bool(b) => RawValue::Toggle(*b),
        Value::String(s) => RawValue::Text(s.clone()),
        Value::Null => RawValue::Text(String::new()),
        other => RawValue::Text(other.to_string()),
    }
}
