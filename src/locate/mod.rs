//! Path resolution: structural path → line/column in the original source.

pub mod scanner;
pub mod source_map;

use serde::Serialize;
use tracing::trace;

use crate::error::LocateError;
use crate::path::Path;

pub use scanner::Scanner;
pub use source_map::SourceMapper;

/// A resolved position in source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// 1-based line.
    pub line: usize,
    /// 1-based column, in characters.
    pub column: usize,
    /// The matched text fragment.
    pub source: String,
}

impl Location {
    fn document_start(source: &str) -> Self {
        Location {
            line: 1,
            column: 1,
            source: source.to_string(),
        }
    }
}

/// Resolve `path` against `source`.
///
/// Paths that do not exist literally in the text (required fields that are
/// missing, constraints reported against a synthetic aggregate) climb to the
/// nearest ancestor that does. The empty path resolves to `1:1`. Any failure
/// other than a missing path is returned as an error.
pub fn resolve(source: &str, path: &Path) -> Result<Location, LocateError> {
    let mut current = path.clone();

    loop {
        if current.is_root() {
            return Ok(Location::document_start(source));
        }

        match Scanner::new(source).find(&current)? {
            Some(span) => {
                let (line, column) = SourceMapper::new(source).position(span.start);
                return Ok(Location {
                    line,
                    column,
                    source: source.get(span).unwrap_or_default().to_string(),
                });
            }
            None => {
                trace!(path = %current, "path not present in source, trying parent");
                current.pop();
            }
        }
    }
}
