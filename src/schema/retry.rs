//! Retrier and Catcher entries attached to Task and Parallel states.

use super::{Field, MAX_COUNTER, ObjectSchema, Rule};

/// `ErrorEquals`: a non-empty list of non-empty error names.
fn error_equals() -> Field {
    Field::required("ErrorEquals", Rule::array(Rule::string(), 1))
}

pub fn retrier_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field(error_equals())
        .field(Field::optional(
            "IntervalSeconds",
            Rule::integer(Some(1.0), None),
        ))
        .field(Field::optional(
            "MaxAttempts",
            Rule::integer(Some(0.0), Some(MAX_COUNTER)),
        ))
        .field(Field::optional("BackoffRate", Rule::number(Some(1.0), None)))
}

/// `Next` must name a state in the same `States` map as the owning state.
pub fn catcher_schema(siblings: &[String]) -> ObjectSchema {
    ObjectSchema::new()
        .field(error_equals())
        .field(Field::required("Next", Rule::one_of(siblings.iter().cloned())))
        .field(Field::optional("ResultPath", Rule::string()))
}
