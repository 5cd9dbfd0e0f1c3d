//! Node kinds and the directional partner tables.
//! SYNC NOTE: The tables here are the single source for which edges the rule
//! chain in `validate/connection.rs` admits.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Generator,
    Queue,
    Transporter,
    Transformer,
    Output,
    Selector,
}

impl NodeKind {
    pub const ALL: [NodeKind; 6] = [
        NodeKind::Generator,
        NodeKind::Queue,
        NodeKind::Transporter,
        NodeKind::Transformer,
        NodeKind::Output,
        NodeKind::Selector,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Generator => "generator",
            NodeKind::Queue => "queue",
            NodeKind::Transporter => "transporter",
            NodeKind::Transformer => "transformer",
            NodeKind::Output => "output",
            NodeKind::Selector => "selector",
        }
    }

    /// Outputs are sinks: they expose no source port.
    pub fn can_be_source(self) -> bool {
        !matches!(self, NodeKind::Output)
    }

    /// Generators are roots: they expose no target port.
    pub fn can_be_target(self) -> bool {
        !matches!(self, NodeKind::Generator)
    }

    /// Endpoints this kind accepts on its input side.
    pub fn allowed_sources(self) -> &'static [Endpoint] {
        match self {
            NodeKind::Queue => &[
                Endpoint::Transporter,
                Endpoint::Transformer,
                Endpoint::TimedGenerator,
            ],
            NodeKind::Transporter => &[
                Endpoint::Queue,
                Endpoint::Selector,
                Endpoint::OnDemandGenerator,
            ],
            NodeKind::Transformer => &[
                Endpoint::Queue,
                Endpoint::Selector,
                Endpoint::OnDemandGenerator,
            ],
            NodeKind::Output => &[
                Endpoint::Transformer,
                Endpoint::Transporter,
                Endpoint::TimedGenerator,
            ],
            NodeKind::Selector => &[
                Endpoint::Queue,
                Endpoint::Selector,
                Endpoint::OnDemandGenerator,
            ],
            NodeKind::Generator => &[],
        }
    }

    pub fn accepts(self, source: Endpoint) -> bool {
        self.allowed_sources().contains(&source)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown node type '{0}'")]
pub struct UnknownKind(pub String);

impl FromStr for NodeKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // The canvas stores kinds as typed by the palette, sometimes capitalized.
        NodeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// A node kind as it participates in an edge. Generators split by mode
/// because on-demand and timed generators have disjoint partner sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    TimedGenerator,
    OnDemandGenerator,
    Queue,
    Transporter,
    Transformer,
    Output,
    Selector,
}

impl Endpoint {
    pub fn kind(self) -> NodeKind {
        match self {
            Endpoint::TimedGenerator | Endpoint::OnDemandGenerator => NodeKind::Generator,
            Endpoint::Queue => NodeKind::Queue,
            Endpoint::Transporter => NodeKind::Transporter,
            Endpoint::Transformer => NodeKind::Transformer,
            Endpoint::Output => NodeKind::Output,
            Endpoint::Selector => NodeKind::Selector,
        }
    }

    /// Kinds this endpoint may feed on its output side.
    pub fn allowed_targets(self) -> &'static [NodeKind] {
        match self {
            Endpoint::Queue => &[NodeKind::Transformer, NodeKind::Transporter, NodeKind::Selector],
            Endpoint::OnDemandGenerator => {
                &[NodeKind::Selector, NodeKind::Transformer, NodeKind::Transporter]
            }
            Endpoint::TimedGenerator => &[NodeKind::Queue, NodeKind::Output],
            Endpoint::Transporter => &[NodeKind::Output, NodeKind::Queue],
            Endpoint::Transformer => &[NodeKind::Output, NodeKind::Queue],
            Endpoint::Selector => &[NodeKind::Transformer, NodeKind::Transporter],
            Endpoint::Output => &[],
        }
    }

    pub fn may_feed(self, target: NodeKind) -> bool {
        self.allowed_targets().contains(&target)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::TimedGenerator => f.write_str("generator (not onDemand)"),
            Endpoint::OnDemandGenerator => f.write_str("generator (onDemand)"),
            other => f.write_str(other.kind().as_str()),
        }
    }
}

/// Comma-separated list for rejection messages.
pub(crate) fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
