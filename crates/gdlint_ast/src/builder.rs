use crate::node::{Element, Form, NodeData, NodeId};
use crate::token::{TokenData, TokenId};
use crate::tree::Tree;
use crate::SyntaxKind;
use gdlint_text_size::TextRange;

struct Frame {
    kind: SyntaxKind,
    form: Form,
}

/// Incrementally assembles a [`Tree`] as the parser's resolver stack
/// (§4.1) produces tokens and completes frames.
///
/// Mirrors a rowan `GreenNodeBuilder`: `start_node`/`finish_node` bracket a
/// CST node, `token` appends a leaf to whichever frame is currently open.
/// Parent links are back-filled once in [`Self::finish`] rather than
/// threaded through every push, since the parent of a node isn't known
/// until the node above it also completes.
pub struct TreeBuilder {
    nodes: Vec<NodeData>,
    tokens: Vec<TokenData>,
    stack: Vec<Frame>,
    root: Option<NodeId>,
}

/// A saved position within the currently open frame's form, taken before
/// parsing an expression whose shape (plain operand, or left operand of a
/// binary/postfix operator) isn't known until after the fact.
/// [`TreeBuilder::start_node_at`] retroactively wraps everything pushed
/// since the checkpoint into a new node — the same trick `rowan`'s
/// `GreenNodeBuilder::checkpoint` uses to build left-associative
/// expressions without lookahead.
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint(usize);

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            tokens: Vec::new(),
            stack: Vec::new(),
            root: None,
        }
    }

    pub fn start_node(&mut self, kind: SyntaxKind) {
        self.stack.push(Frame { kind, form: Form::new() });
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.stack.last().map_or(0, |frame| frame.form.len()))
    }

    /// Opens a new frame containing everything the top frame accumulated
    /// since `checkpoint`, moving those elements out of the enclosing
    /// frame and into the new one.
    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        let Checkpoint(at) = checkpoint;
        let tail: Form = match self.stack.last_mut() {
            Some(frame) => frame.form.drain(at..).collect(),
            None => Form::new(),
        };
        self.stack.push(Frame { kind, form: tail });
    }

    pub fn token(&mut self, kind: SyntaxKind, text: impl Into<Box<str>>, range: TextRange) -> TokenId {
        self.token_with_continuation(kind, text, range, 0)
    }

    pub fn token_with_continuation(
        &mut self,
        kind: SyntaxKind,
        text: impl Into<Box<str>>,
        range: TextRange,
        continuation_lines: u32,
    ) -> TokenId {
        let id = TokenId(self.tokens.len() as u32);
        self.tokens.push(TokenData {
            kind,
            text: text.into(),
            range,
            parent: None,
            continuation_lines,
        });
        if let Some(frame) = self.stack.last_mut() {
            frame.form.push(Element::Token(id));
        }
        id
    }

    /// Wraps the given byte range in an [`SyntaxKind::INVALID_TOKEN`]
    /// leaf, preserving it verbatim (§4.1 error recovery, I2).
    pub fn invalid_token(&mut self, text: impl Into<Box<str>>, range: TextRange) -> TokenId {
        self.token(SyntaxKind::INVALID_TOKEN, text, range)
    }

    /// Finishes the innermost open frame, appending it as a child of
    /// whichever frame is now on top (or setting it as the tree root if
    /// the stack becomes empty).
    pub fn finish_node(&mut self) -> NodeId {
        let frame = self.stack.pop().expect("finish_node without matching start_node");
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind: frame.kind,
            form: frame.form,
            parent: None,
        });
        match self.stack.last_mut() {
            Some(parent_frame) => parent_frame.form.push(Element::Node(id)),
            None => self.root = Some(id),
        }
        id
    }

    /// Number of frames currently open — used by the parser to enforce
    /// `max_depth` (§6 parsing limits, §5 "Stack discipline").
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn finish(mut self) -> (Tree, NodeId) {
        assert!(self.stack.is_empty(), "unbalanced start_node/finish_node pairs");
        let root = self.root.expect("finish called before any node was completed");
        assign_parents(&mut self.nodes, &mut self.tokens, root);
        let tree = Tree::from_parts(self.nodes, self.tokens, root);
        (tree, root)
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn assign_parents(nodes: &mut [NodeData], tokens: &mut [TokenData], id: NodeId) {
    let form = nodes[id.index()].form.clone();
    for element in form {
        match element {
            Element::Token(token_id) => tokens[token_id.index()].parent = Some(id),
            Element::Node(node_id) => {
                nodes[node_id.index()].parent = Some(id);
                assign_parents(nodes, tokens, node_id);
            }
        }
    }
}
