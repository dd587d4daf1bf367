use crate::NodeId;
use crate::SyntaxKind;
use gdlint_text_size::TextRange;

/// A leaf in the CST (§3 "Token").
///
/// `text` is the token's exact original byte sequence — I1 depends on this
/// never being normalized, not even for whitespace or mixed tabs/spaces
/// (§4.1 "Indentation": "the parser does not normalize them").
#[derive(Debug, Clone)]
pub struct TokenData {
    pub(crate) kind: SyntaxKind,
    pub(crate) text: Box<str>,
    pub(crate) range: TextRange,
    pub(crate) parent: Option<NodeId>,
    /// Set for a string token that continues across a line via `\` or a
    /// triple-quoted literal; records how many further physical lines this
    /// token's `text` already includes.
    pub(crate) continuation_lines: u32,
}

impl TokenData {
    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_multiline(&self) -> bool {
        self.continuation_lines > 0
    }
}

/// Stable, copyable handle to a token stored in a [`crate::Tree`]'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenId(pub(crate) u32);

impl TokenId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
