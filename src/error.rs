//! Diagnostic record shared by both validators, plus the pairwise rejection type.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Parse,
    Connection,
    Definition,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Parse => write!(f, "Parse"),
            Stage::Connection => write!(f, "Connection"),
            Stage::Definition => write!(f, "Definition"),
        }
    }
}

/// What went wrong, independent of where it was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Parse,
    Malformed,
    KindMismatch,
    TypeMismatch,
    MissingAssignment,
    UnknownReference,
    DanglingEdge,
    DuplicateNode,
    PortOutOfRange,
    InvalidConnection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub code: String,
    #[serde(skip)]
    pub stage: Stage,
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    pub message: String,
    /// Element references that are absent from the catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<Vec<String>>,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.node_id {
            Some(id) => write!(
                f,
                "[{}:{}] {} (node '{}')",
                self.stage, self.code, self.message, id
            ),
            None => write!(f, "[{}:{}] {}", self.stage, self.code, self.message),
        }
    }
}

impl std::error::Error for Diagnostic {}

impl Diagnostic {
    pub fn parse(code: &str, message: impl Into<String>) -> Self {
        Diagnostic {
            code: code.into(),
            stage: Stage::Parse,
            kind: ErrorKind::Parse,
            node_id: None,
            node_type: None,
            message: message.into(),
            missing: None,
        }
    }

    pub fn definition(code: &str, kind: ErrorKind, message: impl Into<String>) -> Self {
        Diagnostic {
            code: code.into(),
            stage: Stage::Definition,
            kind,
            node_id: None,
            node_type: None,
            message: message.into(),
            missing: None,
        }
    }

    pub fn connection(rejection: Rejection) -> Self {
        Diagnostic {
            code: rejection.code().into(),
            stage: Stage::Connection,
            kind: rejection.kind,
            node_id: None,
            node_type: None,
            message: rejection.reason,
            missing: None,
        }
    }

    pub fn at_node(mut self, node_id: impl Into<String>, node_type: impl Into<String>) -> Self {
        self.node_id = Some(node_id.into());
        self.node_type = Some(node_type.into());
        self
    }

    pub fn with_missing(mut self, missing: Vec<String>) -> Self {
        self.missing = Some(missing);
        self
    }
}

/// Why a candidate edge was refused. Only one reason is ever reported per call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct Rejection {
    pub kind: ErrorKind,
    pub reason: String,
}

impl Rejection {
    pub fn kind_mismatch(reason: impl Into<String>) -> Self {
        Rejection {
            kind: ErrorKind::KindMismatch,
            reason: reason.into(),
        }
    }

    pub fn type_mismatch(reason: impl Into<String>) -> Self {
        Rejection {
            kind: ErrorKind::TypeMismatch,
            reason: reason.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Rejection {
            kind: ErrorKind::Malformed,
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self.kind {
            ErrorKind::KindMismatch => "C001",
            ErrorKind::TypeMismatch => "C002",
            _ => "C003",
        }
    }
}
