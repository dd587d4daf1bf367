//! The diagnostic model shared by every rule in `gdlint_linter` (§4.8, §7).

use gdlint_source::{SourceFile, SourceSpan};
use gdlint_text_size::{Ranged, TextRange};
use std::cmp::Ordering;
use std::fmt;

mod edit;

pub use edit::{Edit, Fix};

/// Category codes, per §4.8. Each rule id is `<prefix><number>`, e.g.
/// `GDL2001` for a scope diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// 1xxx — invalid tokens, missing brackets, unexpected tokens.
    Syntax,
    /// 2xxx — undefined/duplicate/shadowing.
    Scope,
    /// 3xxx — mismatch, invalid operand, nullable access.
    Types,
    /// 4xxx — arity, method-not-found on typed receiver.
    Calls,
    /// 5xxx — break/continue outside loop, return outside function.
    ControlFlow,
    /// 6xxx — mixed tabs/spaces, inconsistent step.
    Indentation,
    /// 7xxx — unknown method on typed receiver, ambiguous.
    DuckTyping,
    /// 8xxx — abstractness.
    Abstractness,
    /// L-series — naming, unused, best practice, complexity limits.
    Style,
    /// F-series — whitespace, blank lines, wrapping, type-hint insertion.
    Formatting,
}

impl Category {
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Syntax => "GDL1",
            Self::Scope => "GDL2",
            Self::Types => "GDL3",
            Self::Calls => "GDL4",
            Self::ControlFlow => "GDL5",
            Self::Indentation => "GDL6",
            Self::DuckTyping => "GDL7",
            Self::Abstractness => "GDL8",
            Self::Style => "GDL-L",
            Self::Formatting => "GDL-F",
        }
    }
}

/// Default severity for a rule; overridable per rule id through
/// `gdlint_linter::settings::Settings`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, is_macro::Is)]
pub enum Severity {
    Error,
    Warning,
    Hint,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Hint => "hint",
            Self::Info => "info",
        };
        f.write_str(s)
    }
}

/// A single diagnostic, independent of which rule produced it.
///
/// `range` is the primary offending span; `secondary_ranges` carries
/// related locations (e.g. the earlier declaration in a duplicate-symbol
/// diagnostic).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: String,
    pub category: Category,
    pub severity: Severity,
    pub message: String,
    pub range: TextRange,
    pub secondary_ranges: Vec<TextRange>,
    pub fix: Option<Fix>,
}

impl Diagnostic {
    pub fn new(
        code: impl Into<String>,
        category: Category,
        severity: Severity,
        message: impl Into<String>,
        range: TextRange,
    ) -> Self {
        Self {
            code: code.into(),
            category,
            severity,
            message: message.into(),
            range,
            secondary_ranges: Vec::new(),
            fix: None,
        }
    }

    #[must_use]
    pub fn with_secondary_range(mut self, range: TextRange) -> Self {
        self.secondary_ranges.push(range);
        self
    }

    #[must_use]
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Renders the §7 default format: `<severity> <code>: <message> (<line>:<column>)`.
    pub fn display<'a>(&'a self, file: &'a SourceFile) -> impl fmt::Display + 'a {
        DisplayDefault { diagnostic: self, file }
    }

    /// Renders the §7 detailed format, which adds the end position.
    pub fn display_detailed<'a>(&'a self, file: &'a SourceFile) -> impl fmt::Display + 'a {
        DisplayDetailed { diagnostic: self, file }
    }

    pub fn span(&self, file: &SourceFile) -> SourceSpan {
        file.source_span(self.range)
    }
}

impl Ranged for Diagnostic {
    fn range(&self) -> TextRange {
        self.range
    }
}

struct DisplayDefault<'a> {
    diagnostic: &'a Diagnostic,
    file: &'a SourceFile,
}

impl fmt::Display for DisplayDefault<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.file.source_location(self.diagnostic.range.start());
        write!(
            f,
            "{} {}: {} ({}:{})",
            self.diagnostic.severity, self.diagnostic.code, self.diagnostic.message, start.line, start.column
        )
    }
}

struct DisplayDetailed<'a> {
    diagnostic: &'a Diagnostic,
    file: &'a SourceFile,
}

impl fmt::Display for DisplayDetailed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let span = self.diagnostic.span(self.file);
        write!(
            f,
            "{} {}: {} ({}:{}-{}:{})",
            self.diagnostic.severity,
            self.diagnostic.code,
            self.diagnostic.message,
            span.start.line,
            span.start.column,
            span.end.line,
            span.end.column,
        )
    }
}

/// Orders diagnostics in ascending source position, then by registration
/// order for ties at the same position (§5: "their order is their
/// registration order (stable)" — callers sort with a stable sort and this
/// `Ord` only breaks position ties, never registration order itself).
impl PartialOrd for Diagnostic {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Diagnostic {
    fn cmp(&self, other: &Self) -> Ordering {
        self.range.start().cmp(&other.range.start())
    }
}

/// A collected, filterable result of running the rule engine over a file.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticResult {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, other: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(other);
    }

    /// Stable sort by source position; diagnostics emitted at the same
    /// position keep their relative registration order (§5).
    pub fn sort_by_position(&mut self) {
        self.diagnostics.sort_by_key(|d| d.range.start());
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn filter_by_severity(&self, min: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.severity <= min)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity.is_error()).count()
    }
}

impl FromIterator<Diagnostic> for DiagnosticResult {
    fn from_iter<T: IntoIterator<Item = Diagnostic>>(iter: T) -> Self {
        Self {
            diagnostics: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdlint_text_size::TextSize;

    #[test]
    fn default_display_format() {
        let file = SourceFile::new("res://a.gd", "var x\nvar y = x\n");
        let diagnostic = Diagnostic::new(
            "GDL2001",
            Category::Scope,
            Severity::Warning,
            "undefined name `x`",
            TextRange::at(TextSize::new(14), TextSize::new(1)),
        );
        let rendered = diagnostic.display(&file).to_string();
        assert_eq!(rendered, "warning GDL2001: undefined name `x` (2:9)");
    }
}
