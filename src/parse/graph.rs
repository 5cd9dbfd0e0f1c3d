//! petgraph-based directed graph over a process definition.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use super::types::ProcessDefinition;
use crate::model::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeLabel {
    /// Position of the edge in `ProcessDefinition::edges`.
    pub position: usize,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
}

/// An edge endpoint that names no node of the definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingEndpoint {
    pub position: usize,
    pub role: Role,
    /// `None` when the edge does not name the endpoint at all.
    pub node_id: Option<String>,
}

pub struct ProcessGraph {
    pub graph: DiGraph<String, EdgeLabel>,
    pub node_indices: HashMap<String, NodeIndex>,
    pub dangling: Vec<DanglingEndpoint>,
}

impl ProcessGraph {
    /// Index every identified node and every edge whose endpoints both
    /// resolve. Unresolvable endpoints are collected rather than rejected.
    pub fn build(definition: &ProcessDefinition) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();
        let mut dangling = Vec::new();

        for id in definition.nodes.iter().filter_map(|n| n.id.as_ref()) {
            if !node_indices.contains_key(id) {
                let idx = graph.add_node(id.clone());
                node_indices.insert(id.clone(), idx);
            }
        }

        for (position, edge) in definition.edges.iter().enumerate() {
            let mut resolve = |id: &Option<String>, role: Role| {
                let idx = id.as_ref().and_then(|id| node_indices.get(id)).copied();
                if idx.is_none() {
                    dangling.push(DanglingEndpoint {
                        position,
                        role,
                        node_id: id.clone(),
                    });
                }
                idx
            };
            let source = resolve(&edge.from, Role::Source);
            let target = resolve(&edge.to, Role::Target);

            if let (Some(s), Some(t)) = (source, target) {
                graph.add_edge(
                    s,
                    t,
                    EdgeLabel {
                        position,
                        source_handle: edge.source_handle.clone(),
                        target_handle: edge.target_handle.clone(),
                    },
                );
            }
        }

        ProcessGraph {
            graph,
            node_indices,
            dangling,
        }
    }

    /// Resolved edges as `(source id, target id, label)`, in definition order.
    pub fn edges(&self) -> Vec<(&str, &str, &EdgeLabel)> {
        let mut edges: Vec<_> = self
            .graph
            .edge_references()
            .map(|e| {
                (
                    self.graph[e.source()].as_str(),
                    self.graph[e.target()].as_str(),
                    e.weight(),
                )
            })
            .collect();
        edges.sort_by_key(|(_, _, label)| label.position);
        edges
    }
}
