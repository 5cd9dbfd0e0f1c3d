//! Parse phase: JSON → wire types + graph construction.

pub mod graph;
pub mod types;

pub use graph::ProcessGraph;
pub use types::*;

use crate::error::Diagnostic;

/// Deserialize a process definition JSON string.
pub fn parse(json: &str) -> Result<ProcessDefinition, Vec<Diagnostic>> {
    serde_json::from_str::<ProcessDefinition>(json).map_err(|e| {
        vec![Diagnostic::parse(
            "P001",
            format!("Failed to parse process definition JSON: {}", e),
        )]
    })
}

/// Deserialize a single node in its editor (`{id, type, data}`) or process
/// definition (`{id, type, params}`) shape.
pub fn parse_node(json: &str) -> Result<NodeRecord, Diagnostic> {
    serde_json::from_str::<NodeRecord>(json)
        .map_err(|e| Diagnostic::parse("P001", format!("Failed to parse node JSON: {}", e)))
}

/// Deserialize the editor's connection payload.
pub fn parse_connection(json: &str) -> Result<ConnectionRequest, Diagnostic> {
    serde_json::from_str::<ConnectionRequest>(json).map_err(|e| {
        Diagnostic::parse("P001", format!("Failed to parse connection JSON: {}", e))
    })
}
