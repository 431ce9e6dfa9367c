//! Error types for failures inside the linting machinery itself.
//!
//! Structural violations are not errors: they are collected as
//! [`crate::validate::Violation`] values and reported together.

use thiserror::Error;

/// A failure while mapping a structural path back onto source text.
///
/// "Path does not exist" is not represented here; the resolver handles it by
/// climbing to an ancestor path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    #[error("unexpected end of input at byte {offset} while locating '{path}'")]
    UnexpectedEof { offset: usize, path: String },

    #[error("unexpected character '{found}' at byte {offset} while locating '{path}'")]
    UnexpectedChar {
        found: char,
        offset: usize,
        path: String,
    },

    #[error("invalid string literal at byte {offset}: {reason}")]
    InvalidString { offset: usize, reason: String },
}
