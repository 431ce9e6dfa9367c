pub mod error;
pub mod locate;
pub mod parse;
pub mod path;
pub mod report;
pub mod schema;
pub mod validate;
pub mod wasm;

pub use report::{Diagnostic, DiagnosticKind, Severity, lint};
