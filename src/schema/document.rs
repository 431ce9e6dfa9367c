//! Document-level schemas: the root state machine and Parallel branches.
//!
//! Both own a `States` map that forms a name scope. `StartAt` and every
//! transition inside the map resolve against that scope only.

use serde_json::Value;

use super::state::state_schema;
use super::{Field, MAX_COUNTER, ObjectSchema, Rule};

/// State names declared in `document.States`, in document order. A missing
/// or malformed `States` yields an empty scope.
pub fn state_names(document: &Value) -> Vec<String> {
    document
        .get("States")
        .and_then(Value::as_object)
        .map(|states| states.keys().cloned().collect())
        .unwrap_or_default()
}

/// Schema for the root state machine.
pub fn document_schema(document: &Value) -> ObjectSchema {
    let names = state_names(document);
    ObjectSchema::new()
        .field(Field::required("StartAt", Rule::one_of(names.iter().cloned())))
        .field(Field::optional("Comment", Rule::string()))
        .field(Field::optional("Version", Rule::string()))
        .field(Field::optional(
            "TimeoutSeconds",
            Rule::integer(Some(1.0), Some(MAX_COUNTER)),
        ))
        .field(Field::required("States", states_rule(document, &names)))
}

/// Schema for one Parallel branch: a nested document with its own scope.
pub fn branch_schema(branch: &Value) -> ObjectSchema {
    let names = state_names(branch);
    ObjectSchema::new()
        .field(Field::required("StartAt", Rule::one_of(names.iter().cloned())))
        .field(Field::optional("Comment", Rule::string()))
        .field(Field::required("States", states_rule(branch, &names)))
}

fn states_rule(document: &Value, names: &[String]) -> Rule {
    let mut schema = ObjectSchema::new();
    if let Some(states) = document.get("States").and_then(Value::as_object) {
        for (name, state) in states {
            schema = schema.field(Field::required(
                name.clone(),
                Rule::Object(state_schema(state, names)),
            ));
        }
    }
    Rule::Object(schema)
}
