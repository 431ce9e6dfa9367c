//! Byte offset to line/column conversion.

/// Maps byte offsets in a source text to 1-based line/column positions.
///
/// Columns count characters, not bytes.
pub struct SourceMapper<'a> {
    source: &'a str,
}

impl<'a> SourceMapper<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Convert a byte offset to `(line, column)`. Offsets past the end map to
    /// the position just after the last character.
    pub fn position(&self, offset: usize) -> (usize, usize) {
        let mut line = 1;
        let mut col = 1;

        for (i, ch) in self.source.char_indices() {
            if i >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }

        (line, col)
    }

    /// The full text of the given 1-based line, without its terminator.
    pub fn line_text(&self, line: usize) -> &'a str {
        self.source
            .lines()
            .nth(line.saturating_sub(1))
            .unwrap_or_default()
    }
}
