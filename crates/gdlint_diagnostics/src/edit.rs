use gdlint_text_size::{Ranged, TextRange, TextSize};

/// A single text replacement, insertion, or deletion.
///
/// Mirrors the corpus's `Edit`: a `Fix` is a list of non-overlapping edits
/// that, applied together, implement a rule's suggested correction. Edits
/// are data only — applying them is a refactoring concern kept out of THE
/// CORE (§1); downstream tooling applies `Strict`-confidence fixes per §9.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edit {
    range: TextRange,
    content: Option<String>,
}

impl Edit {
    pub fn replacement(content: impl Into<String>, range: TextRange) -> Self {
        Self {
            range,
            content: Some(content.into()),
        }
    }

    pub fn deletion(range: TextRange) -> Self {
        Self { range, content: None }
    }

    pub fn insertion(content: impl Into<String>, at: TextSize) -> Self {
        Self {
            range: TextRange::empty(at),
            content: Some(content.into()),
        }
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn is_deletion(&self) -> bool {
        self.content.is_none()
    }
}

impl Ranged for Edit {
    fn range(&self) -> TextRange {
        self.range
    }
}

/// Confidence a downstream tool should have in applying a fix
/// automatically, reusing the three-level scale from §4.7/§9 so the same
/// vocabulary governs both reference resolution and refactoring safety.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum FixConfidence {
    Strict,
    Potential,
    NameMatch,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fix {
    edits: Vec<Edit>,
    confidence: FixConfidence,
}

impl Fix {
    pub fn new(edits: Vec<Edit>, confidence: FixConfidence) -> Self {
        debug_assert!(!edits.is_empty(), "a fix must contain at least one edit");
        Self { edits, confidence }
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn confidence(&self) -> FixConfidence {
        self.confidence
    }

    pub fn is_safe(&self) -> bool {
        self.confidence == FixConfidence::Strict
    }
}
