use crate::{TextRange, TextSize};
use std::num::NonZeroU32;

/// A 1-based line or column number, per §3: "1-based lines and columns".
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OneIndexed(NonZeroU32);

impl OneIndexed {
    pub const MIN: Self = Self(NonZeroU32::MIN);

    pub const fn new(value: usize) -> Option<Self> {
        if value > u32::MAX as usize {
            return None;
        }
        match NonZeroU32::new(value as u32) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Builds a `OneIndexed` from a zero-based count (adds one).
    pub const fn from_zero_indexed(value: u32) -> Self {
        Self(NonZeroU32::new(value.saturating_add(1)).unwrap())
    }

    pub const fn to_zero_indexed(self) -> usize {
        self.0.get() as usize - 1
    }

    pub const fn get(self) -> usize {
        self.0.get() as usize
    }
}

impl std::fmt::Display for OneIndexed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Byte offsets of the start of every line in a source file, so that any
/// [`TextSize`] can be converted to a `(line, column)` pair without
/// rescanning the text. Built once per file and reused by the parser,
/// the diagnostics layer, and `try_get_token_by_position`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
}

impl LineIndex {
    pub fn from_source_text(text: &str) -> Self {
        let mut line_starts = Vec::with_capacity(text.len() / 88);
        line_starts.push(TextSize::new(0));

        let bytes = text.as_bytes();
        let mut offset = 0u32;
        let mut iter = bytes.iter().enumerate().peekable();
        while let Some((i, byte)) = iter.next() {
            let i = i as u32;
            match byte {
                b'\n' => {
                    offset = i + 1;
                    line_starts.push(TextSize::new(offset));
                }
                b'\r' => {
                    if bytes.get(i as usize + 1) == Some(&b'\n') {
                        iter.next();
                        offset = i + 2;
                    } else {
                        offset = i + 1;
                    }
                    line_starts.push(TextSize::new(offset));
                }
                _ => {}
            }
        }
        let _ = offset;

        Self { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Zero-based index of the line containing `offset`.
    pub fn line_index(&self, offset: TextSize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        }
    }

    pub fn line_start(&self, line: usize) -> Option<TextSize> {
        self.line_starts.get(line).copied()
    }

    pub fn line_range(&self, line: usize, text_len: TextSize) -> Option<TextRange> {
        let start = self.line_start(line)?;
        let end = self.line_start(line + 1).unwrap_or(text_len);
        Some(TextRange::new(start, end))
    }

    /// Converts a byte offset to a 1-based `(line, column)` pair. Column is
    /// a UTF-8 byte count relative to the containing line's start; callers
    /// needing character or UTF-16 columns re-derive from the source text
    /// via [`Self::line_range`].
    pub fn source_location(&self, offset: TextSize) -> (OneIndexed, OneIndexed) {
        let line = self.line_index(offset);
        let line_start = self.line_starts[line];
        let column = offset - line_start;
        (
            OneIndexed::from_zero_indexed(line as u32),
            OneIndexed::from_zero_indexed(column.into()),
        )
    }
}

/// A `(line, column)` entry as produced by [`LineIndex::source_location`],
/// kept distinct from the tuple form so call sites read clearly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineIndexEntry {
    pub line: OneIndexed,
    pub column: OneIndexed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line() {
        let index = LineIndex::from_source_text("var x = 1");
        assert_eq!(index.line_count(), 1);
    }

    #[test]
    fn multi_line_lf() {
        let text = "extends Node\n\nvar counter = 10\n";
        let index = LineIndex::from_source_text(text);
        assert_eq!(index.line_count(), 4);
        let (line, column) = index.source_location(TextSize::new(14));
        assert_eq!(line, OneIndexed::new(2).unwrap());
        assert_eq!(column, OneIndexed::new(1).unwrap());
    }

    #[test]
    fn crlf_counts_as_one_line_break() {
        let text = "var a = 1\r\nvar b = 2\r\n";
        let index = LineIndex::from_source_text(text);
        assert_eq!(index.line_count(), 3);
    }
}
