//! Pairwise connection rules, run each time the editor tries to create an edge.
//!
//! The chain is fixed and fail-fast: the first rule that objects decides the
//! single reason reported back. Each rule is owned by one node kind and only
//! looks at the edge when its kind is one of the two endpoints. Callers
//! guarantee that the candidate is not a self-loop and does not reuse an
//! occupied single-cardinality port; neither is re-checked here.

use crate::error::Rejection;
use crate::model::kind::join;
use crate::model::{Node, NodeKind, NodeSpec, Role, element_matches, resolve_element_type};
use crate::parse::types::{ConnectionRequest, NodeRecord};

/// A candidate edge between two lowered nodes.
#[derive(Debug, Clone, Copy)]
pub struct Link<'a> {
    pub source: &'a Node,
    pub target: &'a Node,
    pub source_handle: Option<&'a str>,
    pub target_handle: Option<&'a str>,
}

impl<'a> Link<'a> {
    pub fn new(source: &'a Node, target: &'a Node) -> Self {
        Link {
            source,
            target,
            source_handle: None,
            target_handle: None,
        }
    }

    pub fn handles(mut self, source_handle: Option<&'a str>, target_handle: Option<&'a str>) -> Self {
        self.source_handle = source_handle;
        self.target_handle = target_handle;
        self
    }
}

type Rule = fn(&Link<'_>) -> Result<(), Rejection>;

const RULES: [Rule; 6] = [
    queue_rule,
    generator_rule,
    transporter_rule,
    selector_rule,
    output_rule,
    transformer_rule,
];

/// Check a candidate edge between two nodes, using the handles of `request`.
pub fn validate_connection(
    source: &Node,
    target: &Node,
    request: &ConnectionRequest,
) -> Result<(), Rejection> {
    validate_link(
        &Link::new(source, target)
            .handles(request.source_handle.as_deref(), request.target_handle.as_deref()),
    )
}

/// Same as [`validate_connection`] for nodes still in their editor shape.
pub fn validate_editor_connection(
    source: &NodeRecord,
    target: &NodeRecord,
    request: &ConnectionRequest,
) -> Result<(), Rejection> {
    let source = Node::from_record(source).map_err(|e| Rejection::malformed(e.to_string()))?;
    let target = Node::from_record(target).map_err(|e| Rejection::malformed(e.to_string()))?;
    validate_connection(&source, &target, request)
}

pub fn validate_link(link: &Link<'_>) -> Result<(), Rejection> {
    for rule in RULES {
        rule(link)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Rules, in chain order
// ---------------------------------------------------------------------------

fn queue_rule(link: &Link<'_>) -> Result<(), Rejection> {
    outgoing_partners(link, NodeKind::Queue)?;
    incoming_partners(link, NodeKind::Queue)?;

    if link.source.kind() == NodeKind::Queue {
        let expected = link.source.element();
        let found = target_element(link);
        if !element_matches(expected, link.target, Role::Target, link.target_handle) {
            return Err(Rejection::type_mismatch(format!(
                "The queue only connects to elements of type {}, but the target handles {}.",
                shown(expected),
                shown(found)
            )));
        }
    }

    if link.target.kind() == NodeKind::Queue {
        let expected = link.target.element();
        let found = source_element(link);
        if !element_matches(expected, link.source, Role::Source, link.source_handle) {
            return Err(Rejection::type_mismatch(format!(
                "The queue only receives elements of type {}, but the source produces {}.",
                shown(expected),
                shown(found)
            )));
        }
    }

    Ok(())
}

fn generator_rule(link: &Link<'_>) -> Result<(), Rejection> {
    if link.target.kind() == NodeKind::Generator {
        return Err(Rejection::kind_mismatch(format!(
            "A generator cannot receive connections. The source is \"{}\".",
            link.source.kind()
        )));
    }

    let NodeSpec::Generator(generator) = &link.source.spec else {
        return Ok(());
    };
    outgoing_partners(link, NodeKind::Generator)?;

    // An unset generator type places no constraint on its partner.
    if let Some(expected) = generator.element.as_deref() {
        if !element_matches(Some(expected), link.target, Role::Target, link.target_handle) {
            return Err(Rejection::type_mismatch(format!(
                "The generator produces \"{}\" but the target handles {}.",
                expected,
                shown(target_element(link))
            )));
        }
    }

    Ok(())
}

fn transporter_rule(link: &Link<'_>) -> Result<(), Rejection> {
    incoming_partners(link, NodeKind::Transporter)?;

    if link.source.kind() == NodeKind::Transporter {
        outgoing_partners(link, NodeKind::Transporter)?;
        let expected = link.source.element();
        if !element_matches(expected, link.target, Role::Target, link.target_handle) {
            return Err(Rejection::type_mismatch(format!(
                "The transporter only carries elements of type {}, but the target handles {}.",
                shown(expected),
                shown(target_element(link))
            )));
        }
    }

    if link.target.kind() == NodeKind::Transporter {
        let expected = link.target.element();
        if !element_matches(expected, link.source, Role::Source, link.source_handle) {
            return Err(Rejection::type_mismatch(format!(
                "The transporter only carries elements of type {}, but the source produces {}.",
                shown(expected),
                shown(source_element(link))
            )));
        }
    }

    Ok(())
}

fn selector_rule(link: &Link<'_>) -> Result<(), Rejection> {
    incoming_partners(link, NodeKind::Selector)?;
    outgoing_partners(link, NodeKind::Selector)
}

fn output_rule(link: &Link<'_>) -> Result<(), Rejection> {
    if link.source.kind() == NodeKind::Output {
        return Err(Rejection::kind_mismatch(format!(
            "An output has no outgoing ports. The target is \"{}\".",
            link.target.kind()
        )));
    }

    if link.target.kind() == NodeKind::Output {
        incoming_partners(link, NodeKind::Output)?;
        let expected = link.target.element();
        if !element_matches(expected, link.source, Role::Source, link.source_handle) {
            return Err(Rejection::type_mismatch(format!(
                "The output only receives elements of type {}, but the source produces {}.",
                shown(expected),
                shown(source_element(link))
            )));
        }
    }

    Ok(())
}

fn transformer_rule(link: &Link<'_>) -> Result<(), Rejection> {
    if let NodeSpec::Transformer(transformer) = &link.target.spec {
        incoming_partners(link, NodeKind::Transformer)?;
        // Only a mapped handle constrains the partner.
        if let Some(expected) = transformer.handle_element(Role::Target, link.target_handle) {
            if !element_matches(Some(expected), link.source, Role::Source, link.source_handle) {
                return Err(Rejection::type_mismatch(format!(
                    "The transformer ({}) expects \"{}\" and cannot connect with {}.",
                    link.target_handle.unwrap_or_default(),
                    expected,
                    shown(source_element(link))
                )));
            }
        }
    }

    if let NodeSpec::Transformer(transformer) = &link.source.spec {
        outgoing_partners(link, NodeKind::Transformer)?;
        if let Some(expected) = transformer.handle_element(Role::Source, link.source_handle) {
            if !element_matches(Some(expected), link.target, Role::Target, link.target_handle) {
                return Err(Rejection::type_mismatch(format!(
                    "The transformer ({}) produces \"{}\" and cannot connect with {}.",
                    link.source_handle.unwrap_or_default(),
                    expected,
                    shown(target_element(link))
                )));
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Shared checks
// ---------------------------------------------------------------------------

/// When `owner` is the source, the target's kind must be in its partner table.
fn outgoing_partners(link: &Link<'_>, owner: NodeKind) -> Result<(), Rejection> {
    if link.source.kind() != owner {
        return Ok(());
    }
    let endpoint = link.source.endpoint();
    let target = link.target.kind();
    if endpoint.may_feed(target) {
        return Ok(());
    }
    Err(Rejection::kind_mismatch(format!(
        "{} can only connect to: {}. The target is \"{}\".",
        capitalized(&endpoint.to_string()),
        join(endpoint.allowed_targets()),
        target
    )))
}

/// When `owner` is the target, the source's endpoint must be in its partner table.
fn incoming_partners(link: &Link<'_>, owner: NodeKind) -> Result<(), Rejection> {
    if link.target.kind() != owner {
        return Ok(());
    }
    let source = link.source.endpoint();
    if owner.accepts(source) {
        return Ok(());
    }
    Err(Rejection::kind_mismatch(format!(
        "{} can only receive connections from: {}. The source is \"{}\".",
        capitalized(owner.as_str()),
        join(owner.allowed_sources()),
        source
    )))
}

fn source_element<'a>(link: &Link<'a>) -> Option<&'a str> {
    resolve_element_type(link.source, Role::Source, link.source_handle)
}

fn target_element<'a>(link: &Link<'a>) -> Option<&'a str> {
    resolve_element_type(link.target, Role::Target, link.target_handle)
}

fn shown(element: Option<&str>) -> String {
    match element {
        Some(e) => format!("\"{}\"", e),
        None => "no element".to_string(),
    }
}

fn capitalized(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn node(id: &str, kind: &str, params: serde_json::Value) -> Node {
        let record: NodeRecord =
            serde_json::from_value(json!({ "id": id, "type": kind, "params": params })).unwrap();
        Node::from_record(&record).unwrap()
    }

    #[test]
    fn timed_generator_feeds_matching_queue() {
        let g = node("g1", "generator", json!({ "elemento": "part", "onDemand": false }));
        let q = node("q1", "queue", json!({ "elemento": "part" }));
        assert_eq!(validate_link(&Link::new(&g, &q)), Ok(()));
    }

    #[test]
    fn queue_rejects_queue_as_kind_mismatch() {
        let a = node("a", "queue", json!({ "elemento": "part" }));
        let b = node("b", "queue", json!({ "elemento": "part" }));
        let err = validate_link(&Link::new(&a, &b)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::KindMismatch);
        assert_eq!(
            err.reason,
            "Queue can only connect to: transformer, transporter, selector. The target is \"queue\"."
        );
    }

    #[test]
    fn queue_reports_element_mismatch_first() {
        let q = node("q", "queue", json!({ "elemento": "part" }));
        let t = node("t", "transporter", json!({ "elemento": "widget" }));
        let err = validate_link(&Link::new(&q, &t)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert!(err.reason.starts_with("The queue only connects"), "{}", err.reason);
    }

    #[test]
    fn unset_generator_type_is_unconstrained() {
        let g = node("g", "generator", json!({ "onDemand": true }));
        let s = node("s", "selector", json!({ "elemento": "part" }));
        assert_eq!(validate_link(&Link::new(&g, &s)), Ok(()));
    }

    #[test]
    fn on_demand_generator_cannot_reach_queue() {
        let g = node("g", "generator", json!({ "onDemand": true, "elemento": "part" }));
        let q = node("q", "queue", json!({ "elemento": "part" }));
        let err = validate_link(&Link::new(&g, &q)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::KindMismatch);
    }

    #[test]
    fn transformer_checks_mapped_handles_only() {
        let q = node("q", "queue", json!({ "elemento": "bolt" }));
        let t = node(
            "t",
            "transformer",
            json!({ "entradasDef": [{ "elemento": "bolt" }, { "elemento": "nut" }] }),
        );
        assert_eq!(validate_link(&Link::new(&q, &t).handles(Some("out-0"), Some("bolt"))), Ok(()));
        let err = validate_link(&Link::new(&q, &t).handles(Some("out-0"), Some("nut"))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert_eq!(validate_link(&Link::new(&q, &t).handles(Some("out-0"), Some("washer"))), Ok(()));
    }

    #[test]
    fn transformer_output_must_match_target() {
        let t = node("t", "transformer", json!({ "salidasDef": [{ "elemento": "frame" }] }));
        let o = node("o", "output", json!({ "elemento": "scrap" }));
        let err = validate_link(&Link::new(&t, &o).handles(Some("frame"), Some("in-0"))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert!(err.reason.starts_with("The output only receives"), "{}", err.reason);
    }

    #[test]
    fn edges_into_generators_and_out_of_outputs_are_refused() {
        let o = node("o", "output", json!({}));
        let g = node("g", "generator", json!({}));
        let err = validate_link(&Link::new(&o, &g)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::KindMismatch);
        assert_eq!(err.reason, "A generator cannot receive connections. The source is \"output\".");
    }

    #[test]
    fn malformed_editor_node_is_rejected() {
        let source: NodeRecord = serde_json::from_value(json!({ "id": "x", "type": "conveyor" })).unwrap();
        let target: NodeRecord = serde_json::from_value(json!({ "id": "q", "type": "queue" })).unwrap();
        let err = validate_editor_connection(&source, &target, &ConnectionRequest::between("x", "q"))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Malformed);
        assert_eq!(err.code(), "C003");
    }
}
