//! Typed process nodes, lowered from the loose wire records.
//! SYNC NOTE: Field names mirror what the editor's node forms write into
//! `data` (`elemento`, `onDemand`, `entradas`, `salidas`, `entradasDef`,
//! `salidasDef`, `handles`).

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use thiserror::Error;

use super::kind::{Endpoint, NodeKind, UnknownKind};
use super::ports::{PortLayout, Ports, Role};
use crate::parse::types::{NodeRecord, string_like, value_to_string};

/// Parameter keys that hold a node's declared element reference, in lookup order.
pub const ELEMENT_KEYS: [&str; 8] = [
    "elemento",
    "element",
    "element_id",
    "elemento_id",
    "elementId",
    "selectedElement",
    "assignedElement",
    "elementoSeleccionado",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    #[error("Node has no id")]
    MissingId,
    #[error("Node {id} has no type")]
    MissingKind { id: String },
    #[error("Node {id}: {source}")]
    UnknownKind {
        id: String,
        #[source]
        source: UnknownKind,
    },
    #[error("Node {id} (type={kind}) parameters must be an object")]
    ParamsNotObject { id: String, kind: NodeKind },
    #[error("Node {id} (type={kind}) has invalid parameters: {message}")]
    InvalidParams {
        id: String,
        kind: NodeKind,
        message: String,
    },
}

impl NodeError {
    pub fn node_id(&self) -> Option<&str> {
        match self {
            NodeError::MissingId => None,
            NodeError::MissingKind { id }
            | NodeError::UnknownKind { id, .. }
            | NodeError::ParamsNotObject { id, .. }
            | NodeError::InvalidParams { id, .. } => Some(id),
        }
    }
}

// =============================================================================
// NODE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub spec: NodeSpec,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeSpec {
    Generator(Generator),
    Queue(Queue),
    Transporter(Transporter),
    Transformer(Transformer),
    Output(Output),
    Selector(Selector),
}

impl Node {
    pub fn from_record(record: &NodeRecord) -> Result<Node, NodeError> {
        let id = record.id.clone().ok_or(NodeError::MissingId)?;
        let kind_name = record
            .kind
            .as_deref()
            .ok_or_else(|| NodeError::MissingKind { id: id.clone() })?;
        let kind = kind_name
            .parse::<NodeKind>()
            .map_err(|source| NodeError::UnknownKind {
                id: id.clone(),
                source,
            })?;

        let empty = Map::new();
        let params = match &record.params {
            Value::Object(map) => map,
            Value::Null => &empty,
            _ => return Err(NodeError::ParamsNotObject { id, kind }),
        };

        let spec = NodeSpec::from_params(kind, params).map_err(|e| NodeError::InvalidParams {
            id: id.clone(),
            kind,
            message: e.to_string(),
        })?;

        Ok(Node { id, spec })
    }

    pub fn kind(&self) -> NodeKind {
        match &self.spec {
            NodeSpec::Generator(_) => NodeKind::Generator,
            NodeSpec::Queue(_) => NodeKind::Queue,
            NodeSpec::Transporter(_) => NodeKind::Transporter,
            NodeSpec::Transformer(_) => NodeKind::Transformer,
            NodeSpec::Output(_) => NodeKind::Output,
            NodeSpec::Selector(_) => NodeKind::Selector,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        match &self.spec {
            NodeSpec::Generator(g) if g.on_demand => Endpoint::OnDemandGenerator,
            NodeSpec::Generator(_) => Endpoint::TimedGenerator,
            NodeSpec::Queue(_) => Endpoint::Queue,
            NodeSpec::Transporter(_) => Endpoint::Transporter,
            NodeSpec::Transformer(_) => Endpoint::Transformer,
            NodeSpec::Output(_) => Endpoint::Output,
            NodeSpec::Selector(_) => Endpoint::Selector,
        }
    }

    /// The scalar element type. Transformers have none; see `Transformer::handles`.
    pub fn element(&self) -> Option<&str> {
        match &self.spec {
            NodeSpec::Generator(g) => g.element.as_deref(),
            NodeSpec::Queue(q) => q.element.as_deref(),
            NodeSpec::Transporter(t) => t.element.as_deref(),
            NodeSpec::Output(o) => o.element.as_deref(),
            NodeSpec::Selector(s) => s.element.as_deref(),
            NodeSpec::Transformer(_) => None,
        }
    }

    pub fn as_transformer(&self) -> Option<&Transformer> {
        match &self.spec {
            NodeSpec::Transformer(t) => Some(t),
            _ => None,
        }
    }

    pub fn ports(&self) -> PortLayout {
        match &self.spec {
            NodeSpec::Generator(_) => PortLayout::single(None, Some("out")),
            NodeSpec::Transporter(_) => PortLayout::single(Some("in"), Some("out")),
            NodeSpec::Queue(q) => PortLayout::indexed(q.inputs, q.outputs),
            NodeSpec::Selector(s) => PortLayout::indexed(s.inputs, s.outputs),
            NodeSpec::Output(o) => PortLayout::indexed(o.inputs, 0),
            NodeSpec::Transformer(t) => PortLayout {
                inputs: Ports::Named(t.inputs.clone()),
                outputs: Ports::Named(t.outputs.clone()),
            },
        }
    }
}

impl NodeSpec {
    fn from_params(kind: NodeKind, params: &Map<String, Value>) -> Result<NodeSpec, serde_json::Error> {
        let object = Value::Object(params.clone());
        let element = declared_element(params);

        let spec = match kind {
            NodeKind::Generator => NodeSpec::Generator(Generator {
                element,
                ..serde_json::from_value::<Generator>(object)?
            }),
            NodeKind::Queue => NodeSpec::Queue(Queue {
                element,
                ..serde_json::from_value::<Queue>(object)?
            }),
            NodeKind::Transporter => NodeSpec::Transporter(Transporter { element }),
            NodeKind::Output => NodeSpec::Output(Output {
                element,
                ..serde_json::from_value::<Output>(object)?
            }),
            NodeKind::Selector => NodeSpec::Selector(Selector {
                element,
                ..serde_json::from_value::<Selector>(object)?
            }),
            NodeKind::Transformer => {
                let raw: TransformerParams = serde_json::from_value(object)?;
                NodeSpec::Transformer(raw.into())
            }
        };
        Ok(spec)
    }
}

/// First non-blank value among the well-known element keys.
pub fn declared_element(params: &Map<String, Value>) -> Option<String> {
    ELEMENT_KEYS
        .iter()
        .filter_map(|key| params.get(*key))
        .filter_map(value_to_string)
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

// =============================================================================
// PER-KIND PARAMETERS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Generator {
    #[serde(skip)]
    pub element: Option<String>,
    /// Emits only when pulled; a missing flag means a timed generator.
    #[serde(default, deserialize_with = "flag")]
    pub on_demand: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Queue {
    #[serde(skip)]
    pub element: Option<String>,
    #[serde(rename = "entradas", default = "one", deserialize_with = "port_count")]
    pub inputs: usize,
    #[serde(rename = "salidas", default = "one", deserialize_with = "port_count")]
    pub outputs: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transporter {
    pub element: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Output {
    #[serde(skip)]
    pub element: Option<String>,
    #[serde(rename = "entradas", default = "one", deserialize_with = "port_count")]
    pub inputs: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Selector {
    #[serde(skip)]
    pub element: Option<String>,
    #[serde(rename = "entradas", default = "one", deserialize_with = "port_count")]
    pub inputs: usize,
    #[serde(rename = "salidas", default = "one", deserialize_with = "port_count")]
    pub outputs: usize,
}

/// A transformer's ports are named after the element they carry, so each
/// handle maps to its own element type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transformer {
    pub handles: BTreeMap<String, String>,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

impl Transformer {
    /// The element mapped to `handle`, provided the handle sits on the `role` side.
    pub fn handle_element(&self, role: Role, handle: Option<&str>) -> Option<&str> {
        let handle = handle?;
        let side = match role {
            Role::Source => &self.outputs,
            Role::Target => &self.inputs,
        };
        if !side.iter().any(|h| h == handle) {
            return None;
        }
        self.handles.get(handle).map(String::as_str)
    }
}

#[derive(Debug, Default, Deserialize)]
struct TransformerParams {
    #[serde(default)]
    handles: Option<BTreeMap<String, Option<String>>>,
    #[serde(rename = "entradasDef", default)]
    recipe_inputs: Option<Vec<RecipeItem>>,
    #[serde(rename = "salidasDef", default)]
    recipe_outputs: Option<Vec<RecipeItem>>,
}

#[derive(Debug, Default, Deserialize)]
struct RecipeItem {
    #[serde(rename = "elemento", default, deserialize_with = "string_like")]
    element: Option<String>,
}

impl From<TransformerParams> for Transformer {
    fn from(raw: TransformerParams) -> Self {
        let inputs = unique_elements(raw.recipe_inputs.unwrap_or_default());
        let outputs = unique_elements(raw.recipe_outputs.unwrap_or_default());

        let mut handles: BTreeMap<String, String> = inputs
            .iter()
            .chain(outputs.iter())
            .map(|e| (e.clone(), e.clone()))
            .collect();

        let mut inputs = inputs;
        let mut outputs = outputs;
        // Explicit entries win over recipe-derived ones and count on both sides.
        for (handle, element) in raw.handles.unwrap_or_default() {
            let Some(element) = element else { continue };
            if !inputs.contains(&handle) {
                inputs.push(handle.clone());
            }
            if !outputs.contains(&handle) {
                outputs.push(handle.clone());
            }
            handles.insert(handle, element);
        }

        Transformer {
            handles,
            inputs,
            outputs,
        }
    }
}

fn unique_elements(items: Vec<RecipeItem>) -> Vec<String> {
    let mut seen = Vec::new();
    for element in items.into_iter().filter_map(|item| item.element) {
        if !element.is_empty() && !seen.contains(&element) {
            seen.push(element);
        }
    }
    seen
}

// =============================================================================
// HELPERS
// =============================================================================

fn one() -> usize {
    1
}

/// Port counts arrive as numbers or numeric strings from the node forms.
/// Blank reads as the form default of one port; an explicit zero leaves that
/// side without ports, as the canvas renders it.
fn port_count<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match &value {
        None | Some(Value::Null) => Ok(1),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid port count {}", n))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(1),
        Some(Value::String(s)) => s
            .trim()
            .parse::<usize>()
            .map_err(|_| serde::de::Error::custom(format!("invalid port count '{}'", s))),
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid port count {}",
            other
        ))),
    }
}

/// Truthiness as the canvas reads it: `null`, `false`, `0` and `""` are
/// false, anything else is true.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    })
}
