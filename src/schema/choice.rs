//! Choice rules: the recursive boolean grammar used by `Choices`.
//!
//! A rule is either a combinator (`And`, `Or`, `Not`) over nested rules or a
//! comparison of `Variable` against exactly one typed comparator. Nested
//! rules are [`Rule::ChoiceRule`] placeholders, so building a schema is
//! finite no matter how deep the document nests.

use super::{Field, Invariant, ObjectSchema, Rule};

pub const COMBINATORS: [&str; 3] = ["And", "Or", "Not"];

pub const COMPARATORS: [&str; 16] = [
    "StringEquals",
    "StringLessThan",
    "StringGreaterThan",
    "StringLessThanEquals",
    "StringGreaterThanEquals",
    "NumericEquals",
    "NumericLessThan",
    "NumericGreaterThan",
    "NumericLessThanEquals",
    "NumericGreaterThanEquals",
    "BooleanEquals",
    "TimestampEquals",
    "TimestampLessThan",
    "TimestampGreaterThan",
    "TimestampLessThanEquals",
    "TimestampGreaterThanEquals",
];

/// Value rule for a comparator, chosen by its operand family.
pub fn comparator_rule(name: &str) -> Rule {
    if name.starts_with("Numeric") {
        Rule::number(None, None)
    } else if name.starts_with("Boolean") {
        Rule::Boolean
    } else if name.starts_with("Timestamp") {
        Rule::Timestamp
    } else {
        Rule::string()
    }
}

/// Schema for one choice rule.
///
/// `next` is `Some(siblings)` for the top-level entries of a `Choices` array,
/// which must transition to a sibling state, and `None` for rules nested in
/// a combinator, which may not carry `Next` at all.
pub fn rule_schema(next: Option<&[String]>) -> ObjectSchema {
    let mut schema = ObjectSchema::new()
        .field(Field::optional("And", Rule::array(Rule::ChoiceRule, 1)))
        .field(Field::optional("Or", Rule::array(Rule::ChoiceRule, 1)))
        .field(Field::optional("Not", Rule::ChoiceRule))
        .field(Field::optional("Variable", Rule::string()));

    for name in COMPARATORS {
        schema = schema.field(Field::optional(name, comparator_rule(name)));
    }

    if let Some(siblings) = next {
        schema = schema.field(Field::required(
            "Next",
            Rule::one_of(siblings.iter().cloned()),
        ));
    }

    // A comparison leaf needs exactly one comparator whatever combinators it
    // also carries; a combinator node needs exactly one operator overall.
    schema
        .invariant(Invariant::MutuallyExclusive {
            key: "Variable",
            peers: COMBINATORS.to_vec(),
        })
        .invariant(Invariant::Keyed {
            key: "Variable",
            present: Box::new(Invariant::ExactlyOneOf(COMPARATORS.to_vec())),
            absent: Box::new(Invariant::ExactlyOneOf(
                COMPARATORS.iter().chain(COMBINATORS.iter()).copied().collect(),
            )),
        })
}
