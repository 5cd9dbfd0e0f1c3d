//! Topology admission rules for discrete-event process graphs.
//!
//! Two gates share one model: [`validate::validate_connection`] decides
//! whether the editor may create a single edge, and
//! [`validate::validate_process_definition`] decides whether a whole process
//! definition may be submitted to simulation.

pub mod error;
pub mod model;
pub mod parse;
pub mod validate;
pub mod wasm;
