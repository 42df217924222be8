//! Conversions between wire payloads and engine types
//!
//! The UI posts form values, so ids may arrive as numeric strings and
//! attribute values as any JSON scalar.

use super::types::ModificationPayload;
use rulecraft_core::{Literal, LogicalOperator};
use rulecraft_runtime::{Bindings, NodeModification};
use serde::de::{Deserializer, Error as _};
use serde::Deserialize;
use std::collections::HashMap;

/// Default name of a combined rule
pub(super) const DEFAULT_COMBINED_RULE_NAME: &str = "combined_rule";

#[derive(Deserialize)]
#[serde(untagged)]
enum IdInput {
    Number(u64),
    Text(String),
}

impl IdInput {
    fn into_id(self) -> Result<u32, String> {
        let value = match self {
            IdInput::Number(n) => n,
            IdInput::Text(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| format!("invalid id '{}'", s))?,
        };
        u32::try_from(value).map_err(|_| format!("id {} is out of range", value))
    }
}

/// Accept an id as a JSON number or a numeric string
pub(super) fn deserialize_id<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    IdInput::deserialize(deserializer)?
        .into_id()
        .map_err(D::Error::custom)
}

/// Accept a list of ids, each a JSON number or a numeric string
pub(super) fn deserialize_ids<'de, D>(deserializer: D) -> Result<Vec<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<IdInput>::deserialize(deserializer)?
        .into_iter()
        .map(|id| id.into_id().map_err(D::Error::custom))
        .collect()
}

/// Parse a path segment as a rule id
pub(super) fn parse_path_id(raw: &str) -> Result<u32, String> {
    IdInput::Text(raw.to_string()).into_id()
}

/// Convert JSON attribute values to textual bindings.
///
/// `null` leaves the attribute unbound; arrays and objects are rejected.
pub(super) fn bindings_from_json(
    attributes: HashMap<String, serde_json::Value>,
) -> Result<Bindings, String> {
    let mut bindings = Bindings::with_capacity(attributes.len());
    for (name, value) in attributes {
        let text = match value {
            serde_json::Value::Null => continue,
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                return Err(format!("value for attribute '{}' must be a scalar", name));
            }
        };
        bindings.insert(name, text);
    }
    Ok(bindings)
}

/// Parse the combine operator, defaulting to `AND`
pub(super) fn parse_operator(raw: Option<&str>) -> Result<LogicalOperator, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(LogicalOperator::And),
        Some(op) => op
            .parse()
            .map_err(|_| format!("operator must be AND or OR, got '{}'", op)),
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}

fn literal_from_json(value: serde_json::Value) -> Result<Option<Literal>, String> {
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) if s.trim().is_empty() => Ok(None),
        serde_json::Value::String(s) => Ok(Some(Literal::from_text(&s))),
        serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Ok(Some(Literal::Integer(i))),
            (None, Some(f)) => Ok(Some(Literal::Float(f))),
            (None, None) => Err(format!("new_value {} is not representable", n)),
        },
        other => Err(format!("new_value must be a number or a string, got {}", other)),
    }
}

/// Build a [`NodeModification`] from the request payload
pub(super) fn modification_from_payload(
    payload: ModificationPayload,
) -> Result<NodeModification, String> {
    let new_value = match payload.new_value {
        Some(value) => literal_from_json(value)?,
        None => None,
    };

    Ok(NodeModification {
        node_id: payload.node_id,
        new_operator: non_empty(payload.new_operator),
        new_attribute: non_empty(payload.new_attribute),
        new_comparison: non_empty(payload.new_comparison),
        new_value,
    })
}
