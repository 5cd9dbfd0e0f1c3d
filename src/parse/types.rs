//! Wire types for the serialized process definition and the editor's
//! connection payload.
//!
//! These are deliberately loose: every structural field is optional so that a
//! malformed node or edge surfaces as a diagnostic during validation instead of
//! failing the whole document. Typed per-kind parameters live in `model::node`.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// =============================================================================
// TOP-LEVEL PROCESS DEFINITION
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessDefinition {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
    #[serde(default)]
    pub elements: Vec<ElementRecord>,
}

/// A component as serialized for simulation (`{id, type, params}`) or as held
/// by the editor canvas (`{id, type, data}`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeRecord {
    #[serde(default, deserialize_with = "string_like", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "string_like",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(default, alias = "data")]
    pub params: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    #[serde(default, deserialize_with = "string_like", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, alias = "source", deserialize_with = "string_like")]
    pub from: Option<String>,
    #[serde(default, alias = "target", deserialize_with = "string_like")]
    pub to: Option<String>,
    #[serde(default, deserialize_with = "string_like")]
    pub source_handle: Option<String>,
    #[serde(default, deserialize_with = "string_like")]
    pub target_handle: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementRecord {
    #[serde(default, deserialize_with = "string_like", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "string_like")]
    pub element_type: Option<String>,
    /// Attribute name → data type.
    #[serde(default)]
    pub params: Option<BTreeMap<String, AttributeType>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Number,
    #[serde(alias = "boolean")]
    Bool,
    #[serde(other)]
    Unknown,
}

// =============================================================================
// EDITOR CONNECTION PAYLOAD
// =============================================================================

/// The parameters the canvas hands over when the user drops a new edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequest {
    #[serde(default, deserialize_with = "string_like")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "string_like")]
    pub target: Option<String>,
    #[serde(default, deserialize_with = "string_like")]
    pub source_handle: Option<String>,
    #[serde(default, deserialize_with = "string_like")]
    pub target_handle: Option<String>,
}

impl ConnectionRequest {
    pub fn between(source: &str, target: &str) -> Self {
        ConnectionRequest {
            source: Some(source.to_string()),
            target: Some(target.to_string()),
            source_handle: None,
            target_handle: None,
        }
    }

    pub fn with_handles(mut self, source_handle: Option<&str>, target_handle: Option<&str>) -> Self {
        self.source_handle = source_handle.map(str::to_string);
        self.target_handle = target_handle.map(str::to_string);
        self
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Accept identifiers written as strings or numbers; anything else reads as absent.
pub(crate) fn string_like<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_string))
}

pub(crate) fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
