use crate::token::TokenId;
use crate::SyntaxKind;
use smallvec::SmallVec;

/// A child of a node's [`Form`]: either a token or another node, in the
/// exact order they appeared in source (§3 "Form").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Token(TokenId),
    Node(NodeId),
}

impl Element {
    pub fn as_token(self) -> Option<TokenId> {
        match self {
            Self::Token(id) => Some(id),
            Self::Node(_) => None,
        }
    }

    pub fn as_node(self) -> Option<NodeId> {
        match self {
            Self::Node(id) => Some(id),
            Self::Token(_) => None,
        }
    }
}

/// The ordered, mixed sequence of a node's children: the single source of
/// truth for both `to_text` and named accessors (§3 I3, §4.2).
pub type Form = SmallVec<[Element; 4]>;

#[derive(Debug, Clone)]
pub struct NodeData {
    pub(crate) kind: SyntaxKind,
    pub(crate) form: Form,
    pub(crate) parent: Option<NodeId>,
}

impl NodeData {
    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    pub fn form(&self) -> &[Element] {
        &self.form
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Stable, copyable handle to a node stored in a [`crate::Tree`]'s arena.
///
/// Per §9 "Cyclic and back references": parent links are indices into the
/// same arena rather than owned pointers, so a subtree can be dropped or
/// reclaimed without any reference-counting dance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Round-trips a raw arena index, for callers (cross-file symbol
    /// indices, serialization) that need to key a table by node identity
    /// without holding a borrow of the owning [`crate::Tree`].
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn into_raw(self) -> u32 {
        self.0
    }
}
