//! Parse phase: JSON text → `serde_json::Value`.
//!
//! Structural validation only runs on syntactically valid text. A syntax
//! error is reported as a diagnostic and ends the pass.

use serde_json::Value;

use crate::report::Diagnostic;

/// Deserialize the source text, preserving key order.
pub fn parse(source: &str) -> Result<Value, Vec<Diagnostic>> {
    serde_json::from_str::<Value>(source).map_err(|e| vec![Diagnostic::syntax(&e, source)])
}
