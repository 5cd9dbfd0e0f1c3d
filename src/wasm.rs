//! WASM entry points for the browser editor.

use wasm_bindgen::prelude::*;

use crate::error::{Diagnostic, ErrorKind};
use crate::validate::{self, ValidateOptions};

/// Check a candidate edge. `source_json` / `target_json` are editor nodes
/// (`{id, type, data}`), `request_json` the canvas connection payload.
/// Returns `{accepted: true}` or `{accepted: false, kind, reason}`.
#[wasm_bindgen]
pub fn validate_connection(source_json: &str, target_json: &str, request_json: &str) -> JsValue {
    let result = validate_connection_inner(source_json, target_json, request_json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn validate_connection_inner(source_json: &str, target_json: &str, request_json: &str) -> VerdictDto {
    let parsed = crate::parse::parse_node(source_json).and_then(|source| {
        let target = crate::parse::parse_node(target_json)?;
        let request = crate::parse::parse_connection(request_json)?;
        Ok((source, target, request))
    });
    let (source, target, request) = match parsed {
        Ok(parts) => parts,
        Err(e) => return VerdictDto::rejected("parse", e.message),
    };

    match validate::validate_editor_connection(&source, &target, &request) {
        Ok(()) => VerdictDto::accepted(),
        Err(rejection) => VerdictDto::rejected(kind_name(rejection.kind), rejection.reason),
    }
}

/// Validate a serialized process definition before submitting it to the
/// simulation run endpoint. `options_json` may be empty.
/// Returns `{valid, errors: [...]}`.
#[wasm_bindgen]
pub fn validate_process_definition(json: &str, options_json: &str) -> JsValue {
    let result = validate_process_definition_inner(json, options_json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn validate_process_definition_inner(json: &str, options_json: &str) -> validate::ValidationReport {
    let options = if options_json.trim().is_empty() {
        ValidateOptions::default()
    } else {
        match serde_json::from_str::<ValidateOptions>(options_json) {
            Ok(options) => options,
            Err(e) => {
                return validate::ValidationReport {
                    valid: false,
                    errors: vec![Diagnostic::parse(
                        "P001",
                        format!("Failed to parse validation options JSON: {}", e),
                    )],
                };
            }
        }
    };
    validate::validate_json(json, &options)
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Serialize, PartialEq, Eq)]
struct VerdictDto {
    accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl VerdictDto {
    fn accepted() -> Self {
        VerdictDto {
            accepted: true,
            kind: None,
            reason: None,
        }
    }

    fn rejected(kind: &str, reason: String) -> Self {
        VerdictDto {
            accepted: false,
            kind: Some(kind.to_string()),
            reason: Some(reason),
        }
    }
}

fn kind_name(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::KindMismatch => "kindMismatch",
        ErrorKind::TypeMismatch => "typeMismatch",
        _ => "malformed",
    }
}
