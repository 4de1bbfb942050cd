/// Conversions between records, raw form text and request payloads

use crate::records::{Entity, FieldKind, FieldValues};
use serde_json::{Map, Value};

/// Separator used when a list field is shown as text
pub const LIST_SEPARATOR: &str = ", ";

/// Split delimited text into trimmed, non-empty items, keeping order
///
/// Items may be separated by commas or newlines: `"a, b, c"` -> `["a", "b", "c"]`.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Form values pre-populated from a record; list fields are joined into text
pub fn populate<E: Entity>(record: &E) -> FieldValues {
    let json = serde_json::to_value(record).unwrap_or(Value::Null);
    E::fields()
        .iter()
        .map(|field| {
            let text = match json.get(field.name) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Array(items)) => items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(LIST_SEPARATOR),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            (field.name.to_string(), text)
        })
        .collect()
}

/// Request payload: descriptor fields, list splits and the resolved image
///
/// Only declared fields are sent; the identifier travels in the path.
pub fn assemble_payload<E: Entity>(values: &FieldValues, image: &str) -> Map<String, Value> {
    let mut payload = Map::new();
    for field in E::fields() {
        let raw = values.get(field.name).map(String::as_str).unwrap_or("");
        let value = match field.kind {
            FieldKind::Text => Value::String(raw.trim().to_string()),
            FieldKind::List => Value::Array(split_list(raw).into_iter().map(Value::String).collect()),
        };
        payload.insert(field.name.to_string(), value);
    }
    payload.insert("image".to_string(), Value::String(image.trim().to_string()));
    payload
}

/// The record the backend should hold after the payload is applied
///
/// Fields the form does not edit (identifier, slug) are taken from `baseline`.
pub fn apply_payload<E: Entity>(baseline: Option<&E>, payload: &Map<String, Value>) -> Result<E, serde_json::Error> {
    let mut merged = match baseline.map(serde_json::to_value).transpose()? {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    for (key, value) in payload {
        merged.insert(key.clone(), value.clone());
    }
    serde_json::from_value(Value::Object(merged))
}
