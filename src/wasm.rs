//! WASM entry points for browser use.

use wasm_bindgen::prelude::*;

use crate::report::{self, Diagnostic};

/// Lint a state machine definition.
/// Returns a JSON array of diagnostic objects.
#[wasm_bindgen]
pub fn lint_state_machine(json: &str) -> JsValue {
    let diagnostics: Vec<Diagnostic> = report::lint(json);
    serde_wasm_bindgen::to_value(&diagnostics).unwrap_or(JsValue::NULL)
}
