//! Structural validation phase.
//!
//! Builds the grammar for the whole document (root, every state, every
//! Parallel branch) and evaluates it, returning every violation in the
//! grammar's field-evaluation order.

pub mod engine;
pub mod violation;

use serde_json::Value;
use tracing::debug;

use crate::path::Path;
use crate::schema::document::document_schema;

pub use engine::Validator;
pub use violation::{Format, ValueType, Violation, ViolationKind};

/// Validate a parsed state machine document. Returns all violations found.
pub fn validate_document(document: &Value) -> Vec<Violation> {
    let schema = document_schema(document);
    let mut validator = Validator::new();
    validator.check_object(document, &schema, &Path::root());

    let violations = validator.into_violations();
    debug!(violations = violations.len(), "structural validation finished");
    violations
}
