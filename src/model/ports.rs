//! Per-node port layout: which handle ids a node exposes on each side.

/// Which side of an edge a node (or one of its handles) sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Source,
    Target,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Source => write!(f, "source"),
            Role::Target => write!(f, "target"),
        }
    }
}

/// The ports on one side of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ports {
    /// `{prefix}-0` up to `{prefix}-{count - 1}`. Never materialized, since
    /// counts come straight from the document.
    Indexed { prefix: &'static str, count: usize },
    Named(Vec<String>),
}

impl Ports {
    pub fn len(&self) -> usize {
        match self {
            Ports::Indexed { count, .. } => *count,
            Ports::Named(names) => names.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, handle: &str) -> bool {
        match self {
            Ports::Indexed { prefix, count } => handle
                .strip_prefix(*prefix)
                .and_then(|rest| rest.strip_prefix('-'))
                .and_then(canonical_index)
                .is_some_and(|i| i < *count),
            Ports::Named(names) => names.iter().any(|name| name == handle),
        }
    }
}

/// Only the spelling the canvas writes: no sign, no leading zeros.
fn canonical_index(digits: &str) -> Option<usize> {
    if !digits.bytes().all(|b| b.is_ascii_digit()) || (digits.len() > 1 && digits.starts_with('0')) {
        return None;
    }
    digits.parse().ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortLayout {
    pub inputs: Ports,
    pub outputs: Ports,
}

impl PortLayout {
    /// At most one fixed-name port per side, e.g. `in` / `out`.
    pub fn single(input: Option<&str>, output: Option<&str>) -> Self {
        PortLayout {
            inputs: Ports::Named(input.into_iter().map(str::to_string).collect()),
            outputs: Ports::Named(output.into_iter().map(str::to_string).collect()),
        }
    }

    /// `in-0..in-{inputs}` and `out-0..out-{outputs}`.
    pub fn indexed(inputs: usize, outputs: usize) -> Self {
        PortLayout {
            inputs: Ports::Indexed {
                prefix: "in",
                count: inputs,
            },
            outputs: Ports::Indexed {
                prefix: "out",
                count: outputs,
            },
        }
    }

    pub fn handles(&self, role: Role) -> &Ports {
        match role {
            Role::Source => &self.outputs,
            Role::Target => &self.inputs,
        }
    }

    /// Whether `handle` names a port on the given side. An absent handle
    /// stands for the implicit port and is only unambiguous when the side has
    /// exactly one port.
    pub fn has_handle(&self, role: Role, handle: Option<&str>) -> bool {
        let ports = self.handles(role);
        match handle {
            Some(h) => ports.contains(h),
            None => ports.len() == 1,
        }
    }
}
