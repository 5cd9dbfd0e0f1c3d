use flowgate::model::{Endpoint, Node, NodeKind};
use flowgate::parse::NodeRecord;
use serde_json::{Value, json};

// =============================================================================
// Node builders
// =============================================================================

pub fn node(id: &str, kind: &str, params: Value) -> Node {
    let record: NodeRecord =
        serde_json::from_value(json!({ "id": id, "type": kind, "params": params }))
            .expect("node record should deserialize");
    Node::from_record(&record).expect("node should lower")
}

/// A node of the given endpoint carrying `element`. Transformers map the
/// element onto handles named `in` and `out`.
pub fn typed(endpoint: Endpoint, element: Option<&str>) -> Node {
    let id = format!("{:?}", endpoint).to_lowercase();
    match endpoint {
        Endpoint::Transformer => {
            let handles = match element {
                Some(e) => json!({ "in": e, "out": e }),
                None => json!({}),
            };
            node(&id, "transformer", json!({ "handles": handles }))
        }
        Endpoint::TimedGenerator => node(&id, "generator", json!({ "elemento": element, "onDemand": false })),
        Endpoint::OnDemandGenerator => node(&id, "generator", json!({ "elemento": element, "onDemand": true })),
        other => node(&id, other.kind().as_str(), json!({ "elemento": element })),
    }
}

pub const ALL_ENDPOINTS: [Endpoint; 7] = [
    Endpoint::TimedGenerator,
    Endpoint::OnDemandGenerator,
    Endpoint::Queue,
    Endpoint::Transporter,
    Endpoint::Transformer,
    Endpoint::Output,
    Endpoint::Selector,
];

/// The documented partner tables, written out independently of the crate's own.
pub fn documented_pair(source: Endpoint, target: NodeKind) -> bool {
    use Endpoint as E;
    use NodeKind as K;
    matches!(
        (source, target),
        (E::Queue, K::Transformer | K::Transporter | K::Selector)
            | (E::OnDemandGenerator, K::Selector | K::Transformer | K::Transporter)
            | (E::TimedGenerator, K::Queue | K::Output)
            | (E::Transporter, K::Output | K::Queue)
            | (E::Transformer, K::Output | K::Queue)
            | (E::Selector, K::Transformer | K::Transporter)
    )
}

/// Handles to use for a link, so transformer endpoints go through their mapped ports.
pub fn handles_for(source: &Node, target: &Node) -> (Option<&'static str>, Option<&'static str>) {
    let source_handle = (source.kind() == NodeKind::Transformer).then_some("out");
    let target_handle = (target.kind() == NodeKind::Transformer).then_some("in");
    (source_handle, target_handle)
}
