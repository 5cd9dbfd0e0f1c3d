//! Whole-graph admission checks (G000–G006), run once before a process
//! definition is handed to the simulation engine.
//!
//! Every check runs and every failure is collected, so the caller can show a
//! complete diagnostic instead of the first problem only.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::connection::{Link, validate_link};
use crate::error::{Diagnostic, ErrorKind};
use crate::model::{ElementCatalog, Node, NodeKind, Role};
use crate::parse::graph::ProcessGraph;
use crate::parse::types::ProcessDefinition;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidateOptions {
    /// Kinds that need not declare an element. Transformers are always exempt.
    #[serde(alias = "allowedWithoutElement")]
    pub exempt_kinds: BTreeSet<NodeKind>,
    /// Require every edge handle to name a port of its node.
    pub check_ports: bool,
    /// Re-run the pairwise rules over every existing edge.
    pub recheck_connections: bool,
}

impl ValidateOptions {
    pub fn exempt(mut self, kind: NodeKind) -> Self {
        self.exempt_kinds.insert(kind);
        self
    }

    pub fn with_port_checks(mut self) -> Self {
        self.check_ports = true;
        self
    }

    pub fn with_connection_recheck(mut self) -> Self {
        self.recheck_connections = true;
        self
    }

    pub fn is_exempt(&self, kind: NodeKind) -> bool {
        kind == NodeKind::Transformer || self.exempt_kinds.contains(&kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<Diagnostic>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<Diagnostic>) -> Self {
        ValidationReport {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn errors_of(&self, kind: ErrorKind) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter().filter(move |e| e.kind == kind)
    }
}

/// Validate a complete process definition. Never fails: malformed input
/// becomes additional error records.
pub fn validate_process_definition(
    definition: &ProcessDefinition,
    options: &ValidateOptions,
) -> ValidationReport {
    let catalog = ElementCatalog::from_records(&definition.elements);
    let graph = ProcessGraph::build(definition);
    let mut errors = Vec::new();

    let nodes = g000_lower_nodes(definition, &mut errors);
    g001_elements_assigned(&nodes, options, &mut errors);
    g002_elements_in_catalog(&nodes, &catalog, options, &mut errors);
    g003_edges_reference_existing_nodes(&graph, &mut errors);

    let by_id: HashMap<&str, &Node> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    if options.check_ports {
        g005_handles_name_ports(&graph, &by_id, &mut errors);
    }
    if options.recheck_connections {
        g006_connections_admissible(&graph, &by_id, &mut errors);
    }

    debug!(
        nodes = definition.nodes.len(),
        edges = definition.edges.len(),
        elements = catalog.len(),
        errors = errors.len(),
        "validated process definition"
    );

    ValidationReport::from_errors(errors)
}

// ---------------------------------------------------------------------------
// G000 / G004: every node lowers to a typed node with a unique id
// ---------------------------------------------------------------------------

fn g000_lower_nodes(definition: &ProcessDefinition, errors: &mut Vec<Diagnostic>) -> Vec<Node> {
    let mut seen = HashSet::new();
    let mut nodes = Vec::new();

    for record in &definition.nodes {
        let node = match Node::from_record(record) {
            Ok(node) => node,
            Err(e) => {
                let mut diagnostic =
                    Diagnostic::definition("G000", ErrorKind::Malformed, e.to_string());
                diagnostic.node_id = e.node_id().map(str::to_string);
                diagnostic.node_type = record.kind.clone();
                errors.push(diagnostic);
                continue;
            }
        };

        if !seen.insert(node.id.clone()) {
            errors.push(
                Diagnostic::definition(
                    "G004",
                    ErrorKind::DuplicateNode,
                    format!("Node {} is declared more than once", node.id),
                )
                .at_node(&node.id, node.kind().as_str()),
            );
            continue;
        }
        nodes.push(node);
    }

    nodes
}

// ---------------------------------------------------------------------------
// G001: every non-exempt node declares an element
// ---------------------------------------------------------------------------

fn g001_elements_assigned(nodes: &[Node], options: &ValidateOptions, errors: &mut Vec<Diagnostic>) {
    for node in nodes.iter().filter(|n| !options.is_exempt(n.kind())) {
        if node.element().is_none() {
            errors.push(
                Diagnostic::definition(
                    "G001",
                    ErrorKind::MissingAssignment,
                    format!(
                        "Node {} (type={}) has no element assigned (expected params.elemento)",
                        node.id,
                        node.kind()
                    ),
                )
                .at_node(&node.id, node.kind().as_str()),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// G002: declared elements exist in the catalog
// ---------------------------------------------------------------------------

fn g002_elements_in_catalog(
    nodes: &[Node],
    catalog: &ElementCatalog,
    options: &ValidateOptions,
    errors: &mut Vec<Diagnostic>,
) {
    for node in nodes.iter().filter(|n| !options.is_exempt(n.kind())) {
        // A node without a declaration was already reported by G001.
        let Some(element) = node.element() else {
            continue;
        };
        if !catalog.contains(element) {
            errors.push(
                Diagnostic::definition(
                    "G002",
                    ErrorKind::UnknownReference,
                    format!(
                        "Node {} (type={}) references element(s) not in the catalog: {}",
                        node.id,
                        node.kind(),
                        element
                    ),
                )
                .at_node(&node.id, node.kind().as_str())
                .with_missing(vec![element.to_string()]),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// G003: edges reference existing nodes
// ---------------------------------------------------------------------------

fn g003_edges_reference_existing_nodes(graph: &ProcessGraph, errors: &mut Vec<Diagnostic>) {
    for endpoint in &graph.dangling {
        let message = match &endpoint.node_id {
            Some(id) => format!("Edge[{}] {} invalid: {}", endpoint.position, endpoint.role, id),
            None => format!("Edge[{}] has no {}", endpoint.position, endpoint.role),
        };
        errors.push(Diagnostic::definition("G003", ErrorKind::DanglingEdge, message));
    }
}

// ---------------------------------------------------------------------------
// G005: edge handles name ports of their nodes
// ---------------------------------------------------------------------------

fn g005_handles_name_ports(
    graph: &ProcessGraph,
    nodes: &HashMap<&str, &Node>,
    errors: &mut Vec<Diagnostic>,
) {
    for (from, to, label) in graph.edges() {
        let endpoints = [
            (from, Role::Source, label.source_handle.as_deref()),
            (to, Role::Target, label.target_handle.as_deref()),
        ];
        for (node_id, role, handle) in endpoints {
            let Some(node) = nodes.get(node_id) else {
                continue;
            };
            if node.ports().has_handle(role, handle) {
                continue;
            }
            let message = match handle {
                Some(h) => format!(
                    "Edge[{}] {} handle \"{}\" is not a port of node {}",
                    label.position, role, h, node_id
                ),
                None => format!(
                    "Edge[{}] needs a {} handle: node {} has several ports on that side",
                    label.position, role, node_id
                ),
            };
            errors.push(
                Diagnostic::definition("G005", ErrorKind::PortOutOfRange, message)
                    .at_node(node_id, node.kind().as_str()),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// G006: existing edges still satisfy the pairwise rules
// ---------------------------------------------------------------------------

fn g006_connections_admissible(
    graph: &ProcessGraph,
    nodes: &HashMap<&str, &Node>,
    errors: &mut Vec<Diagnostic>,
) {
    for (from, to, label) in graph.edges() {
        let (Some(source), Some(target)) = (nodes.get(from), nodes.get(to)) else {
            continue;
        };
        let link = Link::new(source, target)
            .handles(label.source_handle.as_deref(), label.target_handle.as_deref());
        if let Err(rejection) = validate_link(&link) {
            errors.push(
                Diagnostic::definition(
                    "G006",
                    ErrorKind::InvalidConnection,
                    format!("Edge[{}] {} -> {}: {}", label.position, from, to, rejection),
                )
                .at_node(from, source.kind().as_str()),
            );
        }
    }
}
