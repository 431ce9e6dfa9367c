//! Diagnostics: the single output format of a lint pass.
//!
//! `lint` runs the whole pipeline (parse → validate → locate) and always
//! returns a batch of diagnostics; it never fails.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::LocateError;
use crate::locate::{self, Location, SourceMapper};
use crate::validate::{self, Violation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// Malformed JSON; validation did not run.
    Syntax,
    /// A grammar or reference violation.
    Structural,
    /// A failure of the linter itself.
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub code: String,
    pub message: String,
    /// Source fragment the diagnostic points at.
    pub source: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
    /// Structural path of the offending value, for structural diagnostics.
    pub path: Option<String>,
}

impl Diagnostic {
    pub fn syntax(error: &serde_json::Error, source: &str) -> Self {
        let line = error.line().max(1);
        let column = error.column().max(1);
        let full = error.to_string();
        let suffix = format!(" at line {} column {}", error.line(), error.column());
        let message = full.strip_suffix(&suffix).unwrap_or(&full).to_string();

        Diagnostic {
            kind: DiagnosticKind::Syntax,
            severity: Severity::Error,
            code: "S001".into(),
            message,
            source: SourceMapper::new(source).line_text(line).to_string(),
            line: Some(line),
            column: Some(column),
            path: None,
        }
    }

    pub fn structural(violation: &Violation, location: Location) -> Self {
        Diagnostic {
            kind: DiagnosticKind::Structural,
            severity: Severity::Error,
            code: violation.code().into(),
            message: violation.message.clone(),
            source: location.source,
            line: Some(location.line),
            column: Some(location.column),
            path: Some(violation.path.to_string()),
        }
    }

    pub fn internal(error: &LocateError) -> Self {
        Diagnostic {
            kind: DiagnosticKind::Internal,
            severity: Severity::Warning,
            code: "I001".into(),
            message: error.to_string(),
            source: String::new(),
            line: None,
            column: None,
            path: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(
                f,
                "{}:{}: {}[{}] {}",
                line, column, self.severity, self.code, self.message
            ),
            _ => write!(f, "{}[{}] {}", self.severity, self.code, self.message),
        }
    }
}

/// Lint one document.
///
/// Returns syntax diagnostics when the text is not valid JSON, otherwise one
/// structural diagnostic per violation, in evaluation order. If mapping a
/// violation back to the source fails, the batch is replaced by a single
/// internal diagnostic describing the failure.
pub fn lint(source: &str) -> Vec<Diagnostic> {
    let document = match crate::parse::parse(source) {
        Ok(document) => document,
        Err(errors) => {
            debug!(errors = errors.len(), "syntax check failed, skipping validation");
            return errors;
        }
    };

    let violations = validate::validate_document(&document);
    match locate_violations(source, &violations) {
        Ok(diagnostics) => diagnostics,
        Err(e) => {
            warn!(error = %e, "failed to locate violations in source");
            vec![Diagnostic::internal(&e)]
        }
    }
}

/// Resolve each violation's path against `source`.
pub fn locate_violations(
    source: &str,
    violations: &[Violation],
) -> Result<Vec<Diagnostic>, LocateError> {
    violations
        .iter()
        .map(|violation| {
            let location = locate::resolve(source, &violation.path)?;
            Ok(Diagnostic::structural(violation, location))
        })
        .collect()
}
