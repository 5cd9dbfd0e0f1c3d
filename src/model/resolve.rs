//! Element type resolution across single-typed and per-handle-typed nodes.

use super::node::{Node, NodeSpec};
use super::ports::Role;

/// The element type `node` carries on the port named by `handle`.
///
/// Transformers are the only multi-typed kind: their type is looked up per
/// handle on the `role` side and is `None` when the handle is unmapped. Every
/// other kind has a single scalar type and ignores both role and handle.
pub fn resolve_element_type<'a>(node: &'a Node, role: Role, handle: Option<&str>) -> Option<&'a str> {
    match &node.spec {
        NodeSpec::Transformer(t) => t.handle_element(role, handle),
        _ => node.element(),
    }
}

/// Whether `partner`, seen through `handle`, carries the `expected` type.
///
/// An unmapped transformer handle is unconstrained and matches anything.
/// Otherwise the resolved types must be equal, two absent types included.
pub fn element_matches(expected: Option<&str>, partner: &Node, role: Role, handle: Option<&str>) -> bool {
    if let Some(t) = partner.as_transformer() {
        if t.handle_element(role, handle).is_none() {
            return true;
        }
    }
    expected == resolve_element_type(partner, role, handle)
}
