//! Integration tests for the Parse phase: process definition JSON, editor
//! node records, connection payloads and the graph index.
//! SYNC NOTE: Update fixtures here when the editor changes the shape it
//! submits to the simulation run endpoint.

use flowgate::parse::{self, AttributeType, ProcessGraph};

#[test]
fn parse_assembly_line() {
    let json = include_str!("fixtures/assembly_line.json");
    let definition = parse::parse(json).expect("Should parse successfully");
    assert_eq!(definition.nodes.len(), 6);
    assert_eq!(definition.edges.len(), 5);
    assert_eq!(definition.elements.len(), 2);

    let frame = &definition.elements[1];
    assert_eq!(frame.element_type.as_deref(), Some("frame"));
    let params = frame.params.as_ref().expect("frame declares attributes");
    assert_eq!(params.get("painted"), Some(&AttributeType::Bool));
    assert_eq!(params.get("model"), Some(&AttributeType::String));
}

#[test]
fn parse_invalid_json_returns_error() {
    let errors = parse::parse("{ not json").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, "P001");
    assert!(errors[0].message.starts_with("Failed to parse process definition JSON"));
}

#[test]
fn parse_accepts_editor_edge_shape() {
    let definition = parse::parse(
        r#"{
            "nodes": [{"id": 1, "type": "queue"}, {"id": "2", "type": "output"}],
            "edges": [{"id": "e1", "source": 1, "target": "2", "sourceHandle": "out-0"}]
        }"#,
    )
    .expect("Should parse");
    let edge = &definition.edges[0];
    assert_eq!(edge.from.as_deref(), Some("1"));
    assert_eq!(edge.to.as_deref(), Some("2"));
    assert_eq!(edge.source_handle.as_deref(), Some("out-0"));
    assert_eq!(edge.target_handle, None);
    assert_eq!(definition.nodes[0].id.as_deref(), Some("1"));
}

#[test]
fn parse_node_and_connection_payloads() {
    let node = parse::parse_node(r#"{"id": "q1", "type": "queue", "data": {"elemento": "part"}}"#)
        .expect("Should parse node");
    assert_eq!(node.kind.as_deref(), Some("queue"));
    assert_eq!(node.params["elemento"], "part");

    let request = parse::parse_connection(
        r#"{"source": "g1", "target": "q1", "sourceHandle": "out", "targetHandle": "in-0"}"#,
    )
    .expect("Should parse connection");
    assert_eq!(request.source.as_deref(), Some("g1"));
    assert_eq!(request.target_handle.as_deref(), Some("in-0"));

    assert!(parse::parse_node(r#""queue""#).is_err());
}

#[test]
fn graph_indexes_resolved_edges() {
    let definition = parse::parse(include_str!("fixtures/assembly_line.json")).expect("Should parse");
    let graph = ProcessGraph::build(&definition);

    assert!(graph.dangling.is_empty());

    let edges = graph.edges();
    assert_eq!(edges.len(), 5);
    let (from, to, label) = edges[1];
    assert_eq!((from, to), ("queue-bolts", "press"));
    assert_eq!(label.position, 1);
    assert_eq!(label.source_handle.as_deref(), Some("out-1"));
    assert_eq!(label.target_handle.as_deref(), Some("bolt"));
}
