//! Field value shapes and the merge rules applied per shape.

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::equivalence::equivalent_text;

// ---------------------------------------------------------------------------
// Shape
// ---------------------------------------------------------------------------

/// Runtime shape of a supplier field value.
///
/// Merge dispatch is driven by the shape of the value already stored in the
/// canonical record; the incoming value is coerced to text where a comparison
/// needs it.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// List-like value. Items are kept in first-seen order.
    Sequence(Vec<Value>),
    Text(String),
    /// Nested mapping. Replaced wholesale on any difference, never deep-merged.
    Nested(Map<String, Value>),
    /// Number, bool or null.
    Scalar(Value),
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Array(items) => FieldValue::Sequence(items),
            Value::String(s) => FieldValue::Text(s),
            Value::Object(map) => FieldValue::Nested(map),
            scalar => FieldValue::Scalar(scalar),
        }
    }
}

impl From<FieldValue> for Value {
    fn from(v: FieldValue) -> Self {
        match v {
            FieldValue::Sequence(items) => Value::Array(items),
            FieldValue::Text(s) => Value::String(s),
            FieldValue::Nested(map) => Value::Object(map),
            FieldValue::Scalar(scalar) => scalar,
        }
    }
}

/// Text form of a value for equivalence checks.
///
/// Strings are used raw; everything else is its compact JSON text.
pub fn value_text(v: &Value) -> Cow<'_, str> {
    match v {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Combine the stored value of a field with an incoming value for the same field.
///
/// - Sequence: append each incoming item unless an equivalent item is already
///   present. A non-sequence incoming value counts as a single item.
/// - Text: keep the existing text when equivalent, otherwise append the
///   incoming text after a single space.
/// - Nested / Scalar: take the incoming value when it differs.
///
/// Never fails; mismatched shapes are absorbed.
pub fn merge(existing: Value, incoming: Value) -> Value {
    match FieldValue::from(existing) {
        FieldValue::Sequence(items) => Value::Array(merge_sequence(items, incoming)),
        FieldValue::Text(text) => Value::String(merge_text(text, &incoming)),
        FieldValue::Nested(map) => replace_if_different(Value::Object(map), incoming),
        FieldValue::Scalar(scalar) => replace_if_different(scalar, incoming),
    }
}

fn merge_sequence(mut items: Vec<Value>, incoming: Value) -> Vec<Value> {
    let incoming = match incoming {
        Value::Array(list) => list,
        single => vec![single],
    };

    for candidate in incoming {
        let duplicate = {
            let text = value_text(&candidate);
            items
                .iter()
                .any(|item| equivalent_text(&value_text(item), &text))
        };
        if !duplicate {
            items.push(candidate);
        }
    }
    items
}

fn merge_text(existing: String, incoming: &Value) -> String {
    let incoming = value_text(incoming);
    if equivalent_text(&existing, &incoming) {
        existing
    } else {
        format!("{existing} {incoming}")
    }
}

fn replace_if_different(existing: Value, incoming: Value) -> Value {
    if existing == incoming {
        existing
    } else {
        incoming
    }
}
