use std::fmt;

use crate::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueType::String => "a string",
            ValueType::Number => "a number",
            ValueType::Integer => "an integer",
            ValueType::Boolean => "a boolean",
            ValueType::Array => "an array",
            ValueType::Object => "an object",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Uri,
    Timestamp,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViolationKind {
    Required,
    NotAllowed,
    InvalidType(ValueType),
    Empty,
    BelowMinimum(f64),
    AboveMaximum(f64),
    NotOneOf(Vec<String>),
    InvalidFormat(Format),
    TooFewItems(usize),
    /// A key present together with a peer it excludes.
    Conflict { peer: String },
    /// More than one key of an exactly-one-of set is present.
    ExclusivePeers(Vec<String>),
    /// None of a required peer set is present.
    MissingPeers(Vec<String>),
}

impl ViolationKind {
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::Required => "V001",
            ViolationKind::NotAllowed => "V002",
            ViolationKind::InvalidType(_) => "V003",
            ViolationKind::Empty => "V004",
            ViolationKind::BelowMinimum(_) | ViolationKind::AboveMaximum(_) => "V005",
            ViolationKind::NotOneOf(_) => "V006",
            ViolationKind::InvalidFormat(_) => "V007",
            ViolationKind::TooFewItems(_) => "V008",
            ViolationKind::Conflict { .. } => "V009",
            ViolationKind::ExclusivePeers(_) => "V010",
            ViolationKind::MissingPeers(_) => "V011",
        }
    }

    /// Render the message for a value labelled `label`. Peer-set violations
    /// concern the whole object and always use the label `value`.
    pub fn message(&self, label: &str) -> String {
        match self {
            ViolationKind::Required => format!("\"{}\" is required", label),
            ViolationKind::NotAllowed => format!("\"{}\" is not allowed", label),
            ViolationKind::InvalidType(t) => format!("\"{}\" must be {}", label, t),
            ViolationKind::Empty => format!("\"{}\" is not allowed to be empty", label),
            ViolationKind::BelowMinimum(min) => {
                format!("\"{}\" must be larger than or equal to {}", label, min)
            }
            ViolationKind::AboveMaximum(max) => {
                format!("\"{}\" must be less than or equal to {}", label, max)
            }
            ViolationKind::NotOneOf(allowed) => {
                format!("\"{}\" must be one of [{}]", label, allowed.join(", "))
            }
            ViolationKind::InvalidFormat(Format::Uri) => {
                format!("\"{}\" must be a valid uri", label)
            }
            ViolationKind::InvalidFormat(Format::Timestamp) => format!(
                "\"{}\" must be a valid timestamp or number of milliseconds",
                label
            ),
            ViolationKind::TooFewItems(n) => {
                format!("\"{}\" must contain at least {} items", label, n)
            }
            ViolationKind::Conflict { peer } => {
                format!("\"{}\" conflict with forbidden peer \"{}\"", label, peer)
            }
            ViolationKind::ExclusivePeers(present) => format!(
                "\"value\" contains a conflict between exclusive peers [{}]",
                present.join(", ")
            ),
            ViolationKind::MissingPeers(peers) => format!(
                "\"value\" must contain at least one of [{}]",
                peers.join(", ")
            ),
        }
    }
}

/// One structural violation, addressed by its path from the document root.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub path: Path,
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    pub fn new(path: Path, kind: ViolationKind) -> Self {
        let message = kind.message(&path.label());
        Violation {
            path,
            kind,
            message,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "[{}] {}", self.code(), self.message)
        } else {
            write!(f, "[{}] {} (at '{}')", self.code(), self.message, self.path)
        }
    }
}
