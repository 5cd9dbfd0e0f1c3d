//! Admission checks over process graphs.
//!
//! `connection` is the interactive per-edge gate; `definition` is the
//! pre-run gate over a whole process definition.

pub mod connection;
pub mod definition;

pub use connection::{Link, validate_connection, validate_editor_connection, validate_link};
pub use definition::{ValidateOptions, ValidationReport, validate_process_definition};

use crate::parse;

/// Parse a process definition JSON string and validate it in one step.
/// A document that is not valid JSON yields a single `P001` diagnostic.
pub fn validate_json(json: &str, options: &ValidateOptions) -> ValidationReport {
    match parse::parse(json) {
        Ok(definition) => validate_process_definition(&definition, options),
        Err(errors) => ValidationReport {
            valid: false,
            errors,
        },
    }
}
