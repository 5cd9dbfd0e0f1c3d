//! Static knowledge about process nodes: kinds, partner tables, ports,
//! the element catalog and element type resolution.

pub mod catalog;
pub mod kind;
pub mod node;
pub mod ports;
pub mod resolve;

pub use catalog::ElementCatalog;
pub use kind::{Endpoint, NodeKind, UnknownKind};
pub use node::{Node, NodeError, NodeSpec};
pub use ports::{PortLayout, Ports, Role};
pub use resolve::{element_matches, resolve_element_type};
