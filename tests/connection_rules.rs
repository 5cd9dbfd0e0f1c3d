mod helpers;

use flowgate::error::ErrorKind;
use flowgate::model::{Endpoint, NodeKind};
use flowgate::parse::{ConnectionRequest, NodeRecord};
use flowgate::validate::{Link, validate_connection, validate_editor_connection, validate_link};
use helpers::{ALL_ENDPOINTS, documented_pair, handles_for, node, typed};
use serde_json::json;

// =============================================================================
// Partner tables
// =============================================================================

#[test]
fn every_kind_pair_follows_the_partner_tables() {
    for source_endpoint in ALL_ENDPOINTS {
        for target_endpoint in ALL_ENDPOINTS {
            let source = typed(source_endpoint, Some("part"));
            let target = typed(target_endpoint, Some("part"));
            let (sh, th) = handles_for(&source, &target);
            let verdict = validate_link(&Link::new(&source, &target).handles(sh, th));

            if documented_pair(source_endpoint, target_endpoint.kind()) {
                assert_eq!(verdict, Ok(()), "{:?} -> {:?}", source_endpoint, target_endpoint);
            } else {
                let rejection = verdict.expect_err(&format!(
                    "{:?} -> {:?} should be refused",
                    source_endpoint, target_endpoint
                ));
                assert_eq!(
                    rejection.kind,
                    ErrorKind::KindMismatch,
                    "{:?} -> {:?}: {}",
                    source_endpoint,
                    target_endpoint,
                    rejection.reason
                );
            }
        }
    }
}

#[test]
fn admitted_pairs_are_exactly_the_documented_list() {
    let mut admitted = Vec::new();
    for source_endpoint in ALL_ENDPOINTS {
        for target_endpoint in ALL_ENDPOINTS {
            let source = typed(source_endpoint, Some("part"));
            let target = typed(target_endpoint, Some("part"));
            let (sh, th) = handles_for(&source, &target);
            if validate_link(&Link::new(&source, &target).handles(sh, th)).is_ok() {
                admitted.push((source_endpoint.to_string(), target_endpoint.to_string()));
            }
        }
    }

    let expected: Vec<(String, String)> = [
        ("generator (not onDemand)", "queue"),
        ("generator (not onDemand)", "output"),
        ("generator (onDemand)", "transporter"),
        ("generator (onDemand)", "transformer"),
        ("generator (onDemand)", "selector"),
        ("queue", "transporter"),
        ("queue", "transformer"),
        ("queue", "selector"),
        ("transporter", "queue"),
        ("transporter", "output"),
        ("transformer", "queue"),
        ("transformer", "output"),
        ("selector", "transporter"),
        ("selector", "transformer"),
    ]
    .into_iter()
    .map(|(s, t)| (s.to_string(), t.to_string()))
    .collect();

    assert_eq!(admitted, expected);
}

#[test]
fn nothing_feeds_a_generator_and_outputs_feed_nothing() {
    for endpoint in ALL_ENDPOINTS {
        let other = typed(endpoint, None);
        let generator = typed(Endpoint::TimedGenerator, None);
        let output = typed(Endpoint::Output, None);

        let into_generator = validate_link(&Link::new(&other, &generator)).unwrap_err();
        assert_eq!(into_generator.kind, ErrorKind::KindMismatch);

        let out_of_output = validate_link(&Link::new(&output, &other)).unwrap_err();
        assert_eq!(out_of_output.kind, ErrorKind::KindMismatch);
    }
}

// =============================================================================
// Element types
// =============================================================================

#[test]
fn admitted_pairs_require_equal_element_types() {
    for source_endpoint in ALL_ENDPOINTS {
        for target_endpoint in ALL_ENDPOINTS {
            if !documented_pair(source_endpoint, target_endpoint.kind()) {
                continue;
            }
            let source = typed(source_endpoint, Some("part"));
            let target = typed(target_endpoint, Some("widget"));
            let (sh, th) = handles_for(&source, &target);
            let rejection = validate_link(&Link::new(&source, &target).handles(sh, th))
                .expect_err("mismatched element types should be refused");
            assert_eq!(
                rejection.kind,
                ErrorKind::TypeMismatch,
                "{:?} -> {:?}: {}",
                source_endpoint,
                target_endpoint,
                rejection.reason
            );
        }
    }
}

#[test]
fn unmapped_transformer_handles_accept_any_partner_type() {
    let transformer = typed(Endpoint::Transformer, None);
    for endpoint in ALL_ENDPOINTS {
        let partner = typed(endpoint, Some("anything"));
        if documented_pair(endpoint, NodeKind::Transformer) {
            let link = Link::new(&partner, &transformer).handles(None, Some("in"));
            assert_eq!(validate_link(&link), Ok(()), "{:?} -> transformer", endpoint);
        }
        if documented_pair(Endpoint::Transformer, endpoint.kind()) {
            let link = Link::new(&transformer, &partner).handles(Some("out"), None);
            assert_eq!(validate_link(&link), Ok(()), "transformer -> {:?}", endpoint);
        }
    }
}

#[test]
fn transformer_recipe_names_its_ports() {
    let queue = node("q1", "queue", json!({ "elemento": "bolt", "salidas": 2 }));
    let press = node(
        "press",
        "transformer",
        json!({
            "entradasDef": [{ "elemento": "bolt" }, { "elemento": "nut" }],
            "salidasDef": [{ "elemento": "frame" }]
        }),
    );
    let frames = node("q2", "queue", json!({ "elemento": "frame" }));

    let into_bolt = ConnectionRequest::between("q1", "press").with_handles(Some("out-1"), Some("bolt"));
    assert_eq!(validate_connection(&queue, &press, &into_bolt), Ok(()));

    let into_nut = ConnectionRequest::between("q1", "press").with_handles(Some("out-1"), Some("nut"));
    let rejection = validate_connection(&queue, &press, &into_nut).unwrap_err();
    assert_eq!(rejection.kind, ErrorKind::TypeMismatch);
    assert_eq!(rejection.code(), "C002");

    let out_of_frame = ConnectionRequest::between("press", "q2").with_handles(Some("frame"), Some("in-0"));
    assert_eq!(validate_connection(&press, &frames, &out_of_frame), Ok(()));

    // An input-only handle is unmapped on the output side and constrains nothing.
    let out_of_bolt = ConnectionRequest::between("press", "q2").with_handles(Some("bolt"), Some("in-0"));
    assert_eq!(validate_connection(&press, &frames, &out_of_bolt), Ok(()));
}

// =============================================================================
// Call contract
// =============================================================================

#[test]
fn verdicts_are_repeatable() {
    let queue = typed(Endpoint::Queue, Some("part"));
    let output = typed(Endpoint::Output, Some("part"));
    let belt = typed(Endpoint::Transporter, Some("part"));

    let refused = Link::new(&queue, &output);
    assert_eq!(validate_link(&refused), validate_link(&refused));

    let admitted = Link::new(&queue, &belt);
    assert_eq!(validate_link(&admitted), Ok(()));
    assert_eq!(validate_link(&admitted), Ok(()));
}

#[test]
fn reports_one_reason_naming_the_partner() {
    let queue = typed(Endpoint::Queue, Some("part"));
    let output = typed(Endpoint::Output, Some("part"));
    let rejection = validate_link(&Link::new(&queue, &output)).unwrap_err();
    assert_eq!(
        rejection.reason,
        "Queue can only connect to: transformer, transporter, selector. The target is \"output\"."
    );
    assert_eq!(rejection.to_string(), rejection.reason);
    assert_eq!(rejection.code(), "C001");
}

#[test]
fn editor_nodes_are_lowered_before_checking() {
    let generator: NodeRecord = serde_json::from_value(json!({
        "id": "g1", "type": "generator", "data": { "elemento": "part", "onDemand": false }
    }))
    .unwrap();
    let queue: NodeRecord = serde_json::from_value(json!({
        "id": "q1", "type": "queue", "data": { "elemento": "part" }
    }))
    .unwrap();
    let request = ConnectionRequest::between("g1", "q1");
    assert_eq!(validate_editor_connection(&generator, &queue, &request), Ok(()));

    let untyped: NodeRecord = serde_json::from_value(json!({ "id": "x1" })).unwrap();
    let rejection = validate_editor_connection(&untyped, &queue, &request).unwrap_err();
    assert_eq!(rejection.kind, ErrorKind::Malformed);
    assert_eq!(rejection.code(), "C003");
}
