//! A position-tracking walk over JSON text.
//!
//! The scanner never builds a value tree. It descends along a [`Path`],
//! skipping siblings, and reports the byte span of the addressed member or
//! element. Object members resolve to the opening quote of their key; array
//! elements resolve to their first character. Duplicate keys resolve to the
//! first occurrence.

use std::ops::Range;

use crate::error::LocateError;
use crate::path::{Path, PathSegment};

pub struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    path: String,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            path: String::new(),
        }
    }

    /// Find the span addressed by `path`.
    ///
    /// Returns `Ok(None)` when the path does not exist in the text (a missing
    /// key, an index past the end, or a step that does not match the shape of
    /// the value). Malformed text is an error.
    pub fn find(mut self, path: &Path) -> Result<Option<Range<usize>>, LocateError> {
        self.path = path.to_string();
        self.skip_ws();
        let mut start = self.pos;

        for segment in path.segments() {
            let found = match (segment, self.peek()) {
                (PathSegment::Key(key), Some(b'{')) => self.seek_member(key)?,
                (PathSegment::Index(index), Some(b'[')) => self.seek_element(*index)?,
                _ => None,
            };
            match found {
                Some(at) => start = at,
                None => return Ok(None),
            }
        }

        self.skip_value()?;
        Ok(Some(start..self.pos))
    }

    /// Positioned on `{`. On success the cursor rests on the member's value
    /// and the key's offset is returned.
    fn seek_member(&mut self, wanted: &str) -> Result<Option<usize>, LocateError> {
        self.expect(b'{')?;
        self.skip_ws();
        if self.peek() == Some(b'}') {
            return Ok(None);
        }

        loop {
            let key_start = self.pos;
            let key = self.read_string()?;
            self.skip_ws();
            self.expect(b':')?;
            self.skip_ws();
            if key == wanted {
                return Ok(Some(key_start));
            }
            self.skip_value()?;
            self.skip_ws();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    self.skip_ws();
                }
                Some(b'}') => return Ok(None),
                _ => return Err(self.unexpected()),
            }
        }
    }

    /// Positioned on `[`. On success the cursor rests on the element.
    fn seek_element(&mut self, wanted: usize) -> Result<Option<usize>, LocateError> {
        self.expect(b'[')?;
        self.skip_ws();
        if self.peek() == Some(b']') {
            return Ok(None);
        }

        let mut index = 0;
        loop {
            if index == wanted {
                return Ok(Some(self.pos));
            }
            self.skip_value()?;
            self.skip_ws();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    self.skip_ws();
                    index += 1;
                }
                Some(b']') => return Ok(None),
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn skip_value(&mut self) -> Result<(), LocateError> {
        match self.peek() {
            Some(b'{') => self.skip_container(b'{', b'}', true),
            Some(b'[') => self.skip_container(b'[', b']', false),
            Some(b'"') => self.skip_string(),
            Some(_) => self.skip_scalar(),
            None => Err(self.eof()),
        }
    }

    fn skip_container(&mut self, open: u8, close: u8, keyed: bool) -> Result<(), LocateError> {
        self.expect(open)?;
        self.skip_ws();
        if self.peek() == Some(close) {
            self.pos += 1;
            return Ok(());
        }

        loop {
            if keyed {
                self.skip_string()?;
                self.skip_ws();
                self.expect(b':')?;
                self.skip_ws();
            }
            self.skip_value()?;
            self.skip_ws();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    self.skip_ws();
                }
                Some(c) if c == close => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(_) => return Err(self.unexpected()),
                None => return Err(self.eof()),
            }
        }
    }

    /// Numbers, `true`, `false` and `null`: everything up to the next
    /// structural character or whitespace.
    fn skip_scalar(&mut self) -> Result<(), LocateError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if matches!(b, b',' | b'}' | b']' | b':') || b.is_ascii_whitespace() {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.unexpected());
        }
        Ok(())
    }

    fn skip_string(&mut self) -> Result<(), LocateError> {
        self.expect(b'"')?;
        while let Some(b) = self.peek() {
            self.pos += 1;
            match b {
                b'\\' => self.pos += 1,
                b'"' => return Ok(()),
                _ => {}
            }
        }
        Err(self.eof())
    }

    fn read_string(&mut self) -> Result<String, LocateError> {
        let start = self.pos;
        self.skip_string()?;
        let literal = self.source.get(start..self.pos).unwrap_or_default();
        serde_json::from_str::<String>(literal).map_err(|e| LocateError::InvalidString {
            offset: start,
            reason: e.to_string(),
        })
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, wanted: u8) -> Result<(), LocateError> {
        match self.peek() {
            Some(b) if b == wanted => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => Err(self.unexpected()),
            None => Err(self.eof()),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn unexpected(&self) -> LocateError {
        match self.source.get(self.pos..).and_then(|rest| rest.chars().next()) {
            Some(found) => LocateError::UnexpectedChar {
                found,
                offset: self.pos,
                path: self.path.clone(),
            },
            None => self.eof(),
        }
    }

    fn eof(&self) -> LocateError {
        LocateError::UnexpectedEof {
            offset: self.pos.min(self.bytes.len()),
            path: self.path.clone(),
        }
    }
}
