//! Source text identity and byte-offset-to-`(line, column)` conversion.
//!
//! A [`SourceFile`] owns the original text plus a [`LineIndex`] built once
//! at load time. Everything downstream (the parser, the semantic model,
//! diagnostics) borrows through it rather than re-scanning the text.

use gdlint_text_size::{LineIndex, OneIndexed, TextRange, TextSize};
use std::fmt;
use std::sync::Arc;

/// A `(line, column)` pair, 1-based per §3.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: OneIndexed,
    pub column: OneIndexed,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A fully-spanned source position pair, used by diagnostics and
/// `try_get_token_by_position`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceSpan {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

#[derive(Clone)]
struct SourceFileInner {
    name: String,
    text: String,
    index: LineIndex,
}

/// A loaded script, identified by its canonical project-relative path
/// (`name`). Cheap to clone: the backing text and index are `Arc`-shared,
/// matching the "per-file mutation confined to a single worker" rule of
/// §5 while still letting diagnostics and messages hold their own handle.
#[derive(Clone)]
pub struct SourceFile {
    inner: Arc<SourceFileInner>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let index = LineIndex::from_source_text(&text);
        Self {
            inner: Arc::new(SourceFileInner {
                name: name.into(),
                text,
                index,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn text(&self) -> &str {
        &self.inner.text
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.inner.index
    }

    pub fn source_location(&self, offset: TextSize) -> SourceLocation {
        let (line, column) = self.inner.index.source_location(offset);
        SourceLocation { line, column }
    }

    pub fn source_span(&self, range: TextRange) -> SourceSpan {
        SourceSpan {
            start: self.source_location(range.start()),
            end: self.source_location(range.end()),
        }
    }

    pub fn slice(&self, range: TextRange) -> &str {
        &self.inner.text[range]
    }

    /// Byte range covering the full file, handy for root-node spans.
    pub fn full_range(&self) -> TextRange {
        TextRange::new(TextSize::new(0), TextSize::try_from(self.inner.text.len()).unwrap())
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile").field("name", &self.name()).finish()
    }
}

impl PartialEq for SourceFile {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name() && Arc::ptr_eq(&self.inner, &other.inner)
    }
}
impl Eq for SourceFile {}

/// Converts byte offsets to [`SourceLocation`]s against a borrowed text
/// without constructing a full [`SourceFile`] — used by the parser while a
/// file is still being built.
pub struct SourceLocator<'a> {
    text: &'a str,
    index: LineIndex,
}

impl<'a> SourceLocator<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            index: LineIndex::from_source_text(text),
        }
    }

    pub fn locate(&self, offset: TextSize) -> SourceLocation {
        let (line, column) = self.index.source_location(offset);
        SourceLocation { line, column }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_offsets() {
        let file = SourceFile::new("res://player.gd", "extends Node\n\nvar hp = 10\n");
        let loc = file.source_location(TextSize::new(14));
        assert_eq!(loc.line.get(), 3);
        assert_eq!(loc.column.get(), 1);
    }
}
