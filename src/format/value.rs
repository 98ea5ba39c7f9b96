//! Polymorphic claim/qualifier/reference value rendering.
//!
//! Values arrive as untyped JSON. [`ValueShape::classify`] decides which rendering
//! rule applies, in a fixed priority order, and [`stringify`] renders it. Unknown
//! object shapes always have the key-sorted fallback, so rendering never fails.

use serde_json::{Map, Value};

/// The recognised shapes of a value, in dispatch order.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueShape<'a> {
    Absent,
    /// `{"values": [{"value": ...}, ...]}`
    Sequence(&'a [Value]),
    /// `{"value": ...}`
    Wrapped(&'a Value),
    /// `{"string": ...}`
    Text(&'a Value),
    /// `{"QID": ..., "label": ...}` or `{"PID": ..., "label": ...}`
    EntityRef { id: &'a str, label: Option<&'a str> },
    /// `{"amount": ..., "unit": ...}`
    Quantity { amount: &'a Value, unit: Option<&'a str> },
    Mapping(&'a Map<String, Value>),
    Scalar(&'a Value),
    List(&'a [Value]),
}

impl<'a> ValueShape<'a> {
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Null => ValueShape::Absent,
            Value::Object(map) => classify_object(map),
            Value::Array(items) => ValueShape::List(items),
            scalar => ValueShape::Scalar(scalar),
        }
    }
}

fn classify_object(map: &Map<String, Value>) -> ValueShape<'_> {
    if let Some(Value::Array(items)) = map.get("values") {
        return ValueShape::Sequence(items);
    }
    if let Some(inner) = map.get("value") {
        return ValueShape::Wrapped(inner);
    }
    if let Some(inner) = map.get("string") {
        return ValueShape::Text(inner);
    }
    for key in ["QID", "PID"] {
        if let Some(id) = non_blank_str(map.get(key)) {
            return ValueShape::EntityRef {
                id,
                label: non_blank_str(map.get("label")),
            };
        }
    }
    if let Some(amount) = map.get("amount") {
        return ValueShape::Quantity {
            amount,
            unit: non_blank_str(map.get("unit")),
        };
    }
    ValueShape::Mapping(map)
}

fn non_blank_str(value: Option<&Value>) -> Option<&str> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
        _ => None,
    }
}

/// Render any value as a single string.
pub fn stringify(value: &Value) -> String {
    match ValueShape::classify(value) {
        ValueShape::Absent => String::new(),
        ValueShape::Sequence(items) => items
            .iter()
            .map(|item| stringify(item.get("value").unwrap_or(&Value::Null)))
            .collect::<Vec<_>>()
            .join(", "),
        ValueShape::Wrapped(inner) | ValueShape::Text(inner) => stringify(inner),
        ValueShape::EntityRef { id, label } => match label {
            Some(label) => format!("{} ({})", label, id),
            None => id.to_string(),
        },
        ValueShape::Quantity { amount, unit } => {
            let mut text = stringify(amount);
            if let Some(unit) = unit {
                text.push(' ');
                text.push_str(unit);
            }
            text.trim().to_string()
        }
        ValueShape::Mapping(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            keys.into_iter()
                .map(|key| format!("{}={}", key, stringify(&map[key])))
                .collect::<Vec<_>>()
                .join(", ")
        }
        ValueShape::Scalar(Value::String(s)) => s.clone(),
        ValueShape::Scalar(other) => other.to_string(),
        ValueShape::List(items) => items.iter().map(stringify).collect::<Vec<_>>().join(", "),
    }
}
