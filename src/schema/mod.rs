//! Constraint vocabulary for the state machine grammar.
//!
//! A schema is plain data: an ordered list of fields with their presence and
//! value rules, plus named object-level invariants. Schemas are built per
//! node from the document being checked (see [`state::state_schema`]) and
//! evaluated by [`crate::validate`]. The only self-referencing piece of the
//! grammar, nested choice rules, is expressed as [`Rule::ChoiceRule`] and
//! expanded on demand.

pub mod choice;
pub mod document;
pub mod retry;
pub mod state;

use std::borrow::Cow;

/// Upper bound shared by every seconds/attempts counter in the grammar.
pub const MAX_COUNTER: f64 = 99_999_998.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Optional,
    Required,
    Forbidden,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: Cow<'static, str>,
    pub presence: Presence,
    pub rule: Rule,
}

impl Field {
    pub fn optional(name: impl Into<Cow<'static, str>>, rule: Rule) -> Self {
        Field {
            name: name.into(),
            presence: Presence::Optional,
            rule,
        }
    }

    pub fn required(name: impl Into<Cow<'static, str>>, rule: Rule) -> Self {
        Field {
            name: name.into(),
            presence: Presence::Required,
            rule,
        }
    }

    pub fn forbidden(name: impl Into<Cow<'static, str>>) -> Self {
        Field {
            name: name.into(),
            presence: Presence::Forbidden,
            rule: Rule::Any,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Rule {
    Any,
    String(StringRule),
    Number(NumberRule),
    Boolean,
    /// Milliseconds as a number, a numeric string, or an RFC 3339 string.
    Timestamp,
    Array(ArrayRule),
    /// Positionally matched items, one rule per index.
    Ordered { items: Vec<Rule>, min_items: usize },
    Object(ObjectSchema),
    /// A choice rule nested inside `And`/`Or`/`Not`.
    ChoiceRule,
}

impl Rule {
    pub fn string() -> Self {
        Rule::String(StringRule::default())
    }

    pub fn uri() -> Self {
        Rule::String(StringRule {
            format: StringFormat::Uri,
            ..StringRule::default()
        })
    }

    /// A string restricted to `allowed`. The list may be empty, in which case
    /// nothing matches.
    pub fn one_of<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::String(StringRule {
            one_of: Some(allowed.into_iter().map(Into::into).collect()),
            ..StringRule::default()
        })
    }

    pub fn number(min: Option<f64>, max: Option<f64>) -> Self {
        Rule::Number(NumberRule {
            integer: false,
            min,
            max,
        })
    }

    pub fn integer(min: Option<f64>, max: Option<f64>) -> Self {
        Rule::Number(NumberRule {
            integer: true,
            min,
            max,
        })
    }

    pub fn array(items: Rule, min_items: usize) -> Self {
        Rule::Array(ArrayRule {
            items: Some(Box::new(items)),
            min_items,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StringFormat {
    #[default]
    Plain,
    Uri,
}

#[derive(Debug, Clone, Default)]
pub struct StringRule {
    pub one_of: Option<Vec<String>>,
    pub format: StringFormat,
}

#[derive(Debug, Clone)]
pub struct NumberRule {
    pub integer: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ArrayRule {
    pub items: Option<Box<Rule>>,
    pub min_items: usize,
}

/// Object-level predicates over which keys are present.
#[derive(Debug, Clone)]
pub enum Invariant {
    /// When `key` is present none of `peers` may be. Only the first present
    /// peer is reported.
    MutuallyExclusive {
        key: &'static str,
        peers: Vec<&'static str>,
    },
    /// Exactly one of the keys must be present.
    ExactlyOneOf(Vec<&'static str>),
    /// At least one of the keys must be present.
    AtLeastOneOf(Vec<&'static str>),
    /// Checks `present` when `key` is in the object and `absent` otherwise.
    Keyed {
        key: &'static str,
        present: Box<Invariant>,
        absent: Box<Invariant>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    pub fields: Vec<Field>,
    pub invariants: Vec<Invariant>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn invariant(mut self, invariant: Invariant) -> Self {
        self.invariants.push(invariant);
        self
    }

    pub fn declares(&self, key: &str) -> bool {
        self.fields.iter().any(|f| f.name == key)
    }

    pub fn get(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == key)
    }
}
