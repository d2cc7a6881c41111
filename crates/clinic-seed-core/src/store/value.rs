//! Conversion between plain JSON and the hosted store's typed value encoding.
//!
//! The REST API wraps every value in a single-key object naming its type
//! (`{"stringValue": "x"}`, `{"integerValue": "42"}`, ...). Integers travel as
//! strings; maps and arrays nest further wrapped values.

use serde_json::{json, Map, Number, Value};

use super::{Fields, StoreError, StoreResult};

/// Wrap a JSON value in its typed encoding.
pub fn encode(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({ "integerValue": i.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64().unwrap_or(0.0) })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Encode a document body as the `fields` object of a REST document.
pub fn encode_fields(fields: &Fields) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(key, value)| (key.clone(), encode(value)))
            .collect(),
    )
}

/// Unwrap a typed value back to plain JSON.
///
/// Timestamps, references and bytes decode to their string forms.
pub fn decode(value: &Value) -> StoreResult<Value> {
    let map = value
        .as_object()
        .ok_or_else(|| StoreError::Decode(format!("typed value must be an object: {}", value)))?;
    let (kind, inner) = map
        .iter()
        .next()
        .ok_or_else(|| StoreError::Decode("empty typed value".into()))?;

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| type_mismatch(kind, inner)),
        "integerValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                Value::Number(n) => n.as_i64(),
                _ => None,
            };
            parsed
                .map(|i| Value::Number(i.into()))
                .ok_or_else(|| type_mismatch(kind, inner))
        }
        "doubleValue" => inner
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| type_mismatch(kind, inner)),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| type_mismatch(kind, inner)),
        "geoPointValue" => Ok(inner.clone()),
        "arrayValue" => {
            let values = match inner.get("values") {
                Some(Value::Array(values)) => values
                    .iter()
                    .map(decode)
                    .collect::<StoreResult<Vec<_>>>()?,
                Some(other) => return Err(type_mismatch(kind, other)),
                None => Vec::new(),
            };
            Ok(Value::Array(values))
        }
        "mapValue" => Ok(Value::Object(decode_fields(
            inner.get("fields").unwrap_or(&Value::Null),
        )?)),
        other => Err(StoreError::Decode(format!("unknown value type: {}", other))),
    }
}

/// Decode the `fields` object of a REST document. A missing object is empty.
pub fn decode_fields(fields: &Value) -> StoreResult<Fields> {
    match fields {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| Ok((key.clone(), decode(value)?)))
            .collect(),
        other => Err(StoreError::Decode(format!(
            "document fields must be an object: {}",
            other
        ))),
    }
}

fn type_mismatch(kind: &str, inner: &Value) -> StoreError {
    StoreError::Decode(format!("{} holds unexpected payload {}", kind, inner))
}
