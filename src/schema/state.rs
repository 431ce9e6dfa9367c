//! Per-state field constraints, keyed on the state's `Type`.

use std::fmt;

use serde_json::Value;

use super::choice;
use super::document;
use super::retry;
use super::{Field, Invariant, MAX_COUNTER, ObjectSchema, Presence, Rule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    Pass,
    Succeed,
    Fail,
    Task,
    Choice,
    Wait,
    Parallel,
}

impl StateKind {
    pub const ALL: [StateKind; 7] = [
        StateKind::Pass,
        StateKind::Succeed,
        StateKind::Fail,
        StateKind::Task,
        StateKind::Choice,
        StateKind::Wait,
        StateKind::Parallel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StateKind::Pass => "Pass",
            StateKind::Succeed => "Succeed",
            StateKind::Fail => "Fail",
            StateKind::Task => "Task",
            StateKind::Choice => "Choice",
            StateKind::Wait => "Wait",
            StateKind::Parallel => "Parallel",
        }
    }

    pub fn from_type(type_name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == type_name)
    }

    /// Kinds that may carry an `End` flag.
    pub fn declares_end(self) -> bool {
        matches!(
            self,
            StateKind::Pass | StateKind::Task | StateKind::Wait | StateKind::Parallel
        )
    }

    /// Kinds that accept `Retry` and `Catch`.
    pub fn handles_errors(self) -> bool {
        matches!(self, StateKind::Task | StateKind::Parallel)
    }

    /// A state is terminal when its kind always ends execution or it is
    /// flagged `End`.
    pub fn is_terminal(self, end: bool) -> bool {
        matches!(self, StateKind::Succeed | StateKind::Fail) || end
    }

    /// Whether a state of this kind must name its successor in `Next`.
    pub fn requires_next(self, end: bool) -> bool {
        !self.is_terminal(end) && self != StateKind::Choice
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const WAIT_FIELDS: [&str; 4] = ["Seconds", "SecondsPath", "Timestamp", "TimestampPath"];

/// Build the constraint set for one state value.
///
/// `siblings` are the names in the `States` map the state belongs to; every
/// transition the state declares must name one of them. A state whose `Type`
/// is missing or unknown is checked against every field some kind declares.
pub fn state_schema(state: &Value, siblings: &[String]) -> ObjectSchema {
    let kind = state
        .get("Type")
        .and_then(Value::as_str)
        .and_then(StateKind::from_type);
    let branches = state.get("Branches");
    let Some(kind) = kind else {
        return untyped_schema(siblings, branches);
    };

    // Any `End` other than `false` ends the state; a non-boolean value is
    // reported by the `End` rule alone.
    let end = state.get("End").is_some_and(|v| v != &Value::Bool(false));
    kind_schema(kind, end, siblings, branches)
}

fn type_field() -> Field {
    Field::required("Type", Rule::one_of(StateKind::ALL.map(StateKind::as_str)))
}

/// Union of the fields of every kind, first declaration wins. Only `Type`
/// stays required; presence rules that depend on the kind are dropped.
fn untyped_schema(siblings: &[String], branches: Option<&Value>) -> ObjectSchema {
    let mut schema = ObjectSchema::new();
    for kind in StateKind::ALL {
        for field in kind_schema(kind, false, siblings, branches).fields {
            if field.presence == Presence::Forbidden || schema.declares(&field.name) {
                continue;
            }
            let presence = if field.name == "Type" {
                Presence::Required
            } else {
                Presence::Optional
            };
            schema = schema.field(Field { presence, ..field });
        }
    }
    schema
}

/// The field set admitted by `kind`. `branches` is only consulted for
/// Parallel states, where each branch gets its own document schema.
pub fn kind_schema(
    kind: StateKind,
    end: bool,
    siblings: &[String],
    branches: Option<&Value>,
) -> ObjectSchema {
    use StateKind::*;

    let mut schema = ObjectSchema::new()
        .field(type_field())
        .field(Field::optional("Comment", Rule::string()));

    if kind.declares_end() {
        schema = schema.field(Field::optional("End", Rule::Boolean));
    }

    schema = schema.field(if kind.requires_next(end) {
        Field::required("Next", Rule::one_of(siblings.iter().cloned()))
    } else {
        Field::forbidden("Next")
    });

    for name in ["InputPath", "ResultPath", "OutputPath"] {
        schema = schema.field(match kind {
            Fail => Field::forbidden(name),
            _ => Field::optional(name, Rule::string()),
        });
    }

    for name in ["Cause", "Error"] {
        schema = schema.field(match kind {
            Fail => Field::optional(name, Rule::string()),
            _ => Field::forbidden(name),
        });
    }

    schema = schema.field(match kind {
        Pass => Field::optional("Result", Rule::Any),
        _ => Field::forbidden("Result"),
    });

    if kind.handles_errors() {
        schema = schema
            .field(Field::optional(
                "Retry",
                Rule::array(Rule::Object(retry::retrier_schema()), 0),
            ))
            .field(Field::optional(
                "Catch",
                Rule::array(Rule::Object(retry::catcher_schema(siblings)), 0),
            ));
    } else {
        schema = schema
            .field(Field::forbidden("Retry"))
            .field(Field::forbidden("Catch"));
    }

    if kind == Task {
        let seconds = || Rule::integer(Some(1.0), Some(MAX_COUNTER));
        schema = schema
            .field(Field::required("Resource", Rule::uri()))
            .field(Field::optional("HeartbeatSeconds", seconds()))
            .field(Field::optional("TimeoutSeconds", seconds()));
    } else {
        schema = schema
            .field(Field::forbidden("Resource"))
            .field(Field::forbidden("HeartbeatSeconds"))
            .field(Field::forbidden("TimeoutSeconds"));
    }

    if kind == Choice {
        schema = schema
            .field(Field::required(
                "Choices",
                Rule::array(Rule::Object(choice::rule_schema(Some(siblings))), 1),
            ))
            .field(Field::optional(
                "Default",
                Rule::one_of(siblings.iter().cloned()),
            ));
    } else {
        schema = schema
            .field(Field::forbidden("Choices"))
            .field(Field::forbidden("Default"));
    }

    if kind == Wait {
        schema = schema
            .field(Field::optional("Seconds", Rule::number(Some(1.0), None)))
            .field(Field::optional("SecondsPath", Rule::string()))
            .field(Field::optional("Timestamp", Rule::Timestamp))
            .field(Field::optional("TimestampPath", Rule::string()));
        for key in WAIT_FIELDS {
            schema = schema.invariant(Invariant::MutuallyExclusive {
                key,
                peers: wait_peers(key),
            });
        }
        schema = schema.invariant(Invariant::AtLeastOneOf(WAIT_FIELDS.to_vec()));
    } else {
        for name in WAIT_FIELDS {
            schema = schema.field(Field::forbidden(name));
        }
    }

    schema.field(if kind == Parallel {
        Field::required("Branches", branches_rule(branches))
    } else {
        Field::forbidden("Branches")
    })
}

/// Peers checked for each wait field, in reporting order. `SecondsPath` is
/// the first peer of every field except itself.
fn wait_peers(key: &str) -> Vec<&'static str> {
    match key {
        "Seconds" => vec!["SecondsPath", "Timestamp", "TimestampPath"],
        "SecondsPath" => vec!["Seconds", "Timestamp", "TimestampPath"],
        "Timestamp" => vec!["SecondsPath", "Seconds", "TimestampPath"],
        _ => vec!["SecondsPath", "Seconds", "Timestamp"],
    }
}

/// One document schema per branch, matched by position.
fn branches_rule(branches: Option<&Value>) -> Rule {
    let items = branches
        .and_then(Value::as_array)
        .map(|branches| {
            branches
                .iter()
                .map(|branch| Rule::Object(document::branch_schema(branch)))
                .collect()
        })
        .unwrap_or_default();
    Rule::Ordered {
        items,
        min_items: 1,
    }
}
