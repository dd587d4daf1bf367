use crate::node::{Element, Form, NodeData, NodeId};
use crate::token::{TokenData, TokenId};
use crate::visitor::Visitor;
use crate::SyntaxKind;
use gdlint_text_size::TextRange;

/// The arena backing an entire CST. Every [`NodeId`]/[`TokenId`] is an
/// index into this one structure, so traversal, mutation, and cloning all
/// stay allocation-cheap (§9 "arena-allocated tokens with stable indices").
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<NodeData>,
    tokens: Vec<TokenData>,
    root: NodeId,
}

impl Tree {
    pub(crate) fn from_parts(nodes: Vec<NodeData>, tokens: Vec<TokenData>, root: NodeId) -> Self {
        Self { nodes, tokens, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    pub fn token(&self, id: TokenId) -> &TokenData {
        &self.tokens[id.index()]
    }

    pub fn form_of(&self, id: NodeId) -> &[Element] {
        self.node(id).form()
    }

    /// `to_text(node)` — exact source substring, per I1. Implemented by
    /// walking the form in order and concatenating leaf text; this is the
    /// only place node text is materialized, so mutation through the form
    /// primitives automatically keeps it correct.
    pub fn to_text(&self, element: Element) -> String {
        let mut out = String::new();
        self.write_text(element, &mut out);
        out
    }

    fn write_text(&self, element: Element, out: &mut String) {
        match element {
            Element::Token(id) => out.push_str(self.token(id).text()),
            Element::Node(id) => {
                for &child in self.form_of(id) {
                    self.write_text(child, out);
                }
            }
        }
    }

    /// Positions are derived, never cached on the node itself (§3): a
    /// node's range is the span from its first leaf token's start to its
    /// last leaf token's end.
    pub fn range_of(&self, element: Element) -> TextRange {
        match element {
            Element::Token(id) => self.token(id).range(),
            Element::Node(id) => {
                let form = self.form_of(id);
                let first = form.first().expect("a node's form is never empty");
                let last = form.last().unwrap();
                TextRange::new(self.range_of(*first).start(), self.range_of(*last).end())
            }
        }
    }

    pub fn parent_of_node(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent()
    }

    pub fn parent_of_token(&self, id: TokenId) -> Option<NodeId> {
        self.token(id).parent()
    }

    /// `try_get_token_by_position` (§4.2): the deepest token whose span
    /// contains `offset`. A zero-width tie between two adjacent tokens
    /// resolves to the later one, except a position exactly at a token's
    /// end resolves to that token (handled by trying the inclusive-end
    /// token after scanning fails to find a containing one).
    pub fn try_get_token_by_position(&self, offset: gdlint_text_size::TextSize) -> Option<TokenId> {
        self.find_token(self.root, offset)
    }

    fn find_token(&self, node: NodeId, offset: gdlint_text_size::TextSize) -> Option<TokenId> {
        let form = self.form_of(node);
        for (i, &child) in form.iter().enumerate() {
            let range = self.range_of(child);
            let is_last = i + 1 == form.len();
            let contains = if is_last {
                range.contains_inclusive(offset)
            } else {
                range.contains(offset)
            };
            if !contains {
                continue;
            }
            return match child {
                Element::Token(id) => Some(id),
                Element::Node(id) => self.find_token(id, offset),
            };
        }
        None
    }

    /// `insert_before` — the only sanctioned way to add a child ahead of
    /// `anchor` in `parent`'s form (§4.2).
    pub fn insert_before(&mut self, parent: NodeId, anchor: Element, child: Element) {
        self.reparent(child, parent);
        let form = &mut self.nodes[parent.index()].form;
        let position = form.iter().position(|&e| e == anchor).unwrap_or(form.len());
        form.insert(position, child);
    }

    pub fn insert_after(&mut self, parent: NodeId, anchor: Element, child: Element) {
        self.reparent(child, parent);
        let form = &mut self.nodes[parent.index()].form;
        let position = form.iter().position(|&e| e == anchor).map_or(form.len(), |p| p + 1);
        form.insert(position, child);
    }

    pub fn remove(&mut self, parent: NodeId, child: Element) {
        let form = &mut self.nodes[parent.index()].form;
        form.retain(|&e| e != child);
    }

    fn reparent(&mut self, element: Element, parent: NodeId) {
        match element {
            Element::Token(id) => self.tokens[id.index()].parent = Some(parent),
            Element::Node(id) => self.nodes[id.index()].parent = Some(parent),
        }
    }

    /// Depth-first traversal; trivial tokens are not dispatched to the
    /// visitor (§4.2) — iterate `form_of` directly for those.
    pub fn walk_in(&self, id: NodeId, visitor: &mut dyn Visitor) {
        if !visitor.enter(self, id) {
            return;
        }
        for &child in self.form_of(id) {
            if let Element::Node(child_id) = child {
                self.walk_in(child_id, visitor);
            }
        }
        visitor.leave(self, id);
    }

    pub fn kind_of(&self, element: Element) -> SyntaxKind {
        match element {
            Element::Token(id) => self.token(id).kind(),
            Element::Node(id) => self.node(id).kind(),
        }
    }

    /// Children of `id` filtered to a single node kind, in form order —
    /// the building block behind most typed accessors in [`crate::cst`].
    pub fn child_nodes_of_kind(&self, id: NodeId, kind: SyntaxKind) -> impl Iterator<Item = NodeId> + '_ {
        self.form_of(id).iter().filter_map(move |&e| match e {
            Element::Node(n) if self.node(n).kind() == kind => Some(n),
            _ => None,
        })
    }

    pub fn first_child_node_of_kind(&self, id: NodeId, kind: SyntaxKind) -> Option<NodeId> {
        self.child_nodes_of_kind(id, kind).next()
    }

    pub fn first_child_token_of_kind(&self, id: NodeId, kind: SyntaxKind) -> Option<TokenId> {
        self.form_of(id).iter().find_map(|&e| match e {
            Element::Token(t) if self.token(t).kind() == kind => Some(t),
            _ => None,
        })
    }

    /// Produces an independent subtree with no shared identity (§4.2
    /// "Cloning"): all descendant ids are renumbered into a fresh arena.
    pub fn clone_subtree(&self, id: NodeId) -> Tree {
        let mut nodes = Vec::new();
        let mut tokens = Vec::new();
        let new_root = self.clone_node_into(id, None, &mut nodes, &mut tokens);
        Tree::from_parts(nodes, tokens, new_root)
    }

    fn clone_node_into(
        &self,
        id: NodeId,
        parent: Option<NodeId>,
        nodes: &mut Vec<NodeData>,
        tokens: &mut Vec<TokenData>,
    ) -> NodeId {
        let index = nodes.len() as u32;
        let new_id = NodeId(index);
        nodes.push(NodeData {
            kind: self.node(id).kind(),
            form: Form::new(),
            parent,
        });

        let mut form = Form::new();
        for &child in self.form_of(id) {
            let new_child = match child {
                Element::Token(token_id) => {
                    let data = self.token(token_id);
                    let token_index = tokens.len() as u32;
                    tokens.push(TokenData {
                        kind: data.kind(),
                        text: data.text().into(),
                        range: data.range(),
                        parent: Some(new_id),
                        continuation_lines: data.continuation_lines,
                    });
                    Element::Token(TokenId(token_index))
                }
                Element::Node(node_id) => {
                    Element::Node(self.clone_node_into(node_id, Some(new_id), nodes, tokens))
                }
            };
            form.push(new_child);
        }
        nodes[index as usize].form = form;
        new_id
    }

    pub fn nodes_len(&self) -> usize {
        self.nodes.len()
    }

    pub fn tokens_len(&self) -> usize {
        self.tokens.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TreeBuilder;

    fn tiny_tree() -> (Tree, NodeId) {
        let mut builder = TreeBuilder::new();
        builder.start_node(SyntaxKind::SOURCE_FILE);
        builder.start_node(SyntaxKind::VAR_DECL_STMT);
        builder.token(SyntaxKind::VAR_KW, "var", gdlint_text_size::TextRange::at(0u32.into(), 3u32.into()));
        builder.token(SyntaxKind::WHITESPACE, " ", gdlint_text_size::TextRange::at(3u32.into(), 1u32.into()));
        builder.token(SyntaxKind::IDENT, "x", gdlint_text_size::TextRange::at(4u32.into(), 1u32.into()));
        builder.finish_node();
        builder.finish_node();
        let (tree, root) = builder.finish();
        (tree, root)
    }

    #[test]
    fn to_text_round_trips() {
        let (tree, root) = tiny_tree();
        assert_eq!(tree.to_text(Element::Node(root)), "var x");
    }

    #[test]
    fn range_of_node_spans_its_tokens() {
        let (tree, root) = tiny_tree();
        let range = tree.range_of(Element::Node(root));
        assert_eq!(range.start(), 0u32.into());
        assert_eq!(range.end(), 5u32.into());
    }

    #[test]
    fn try_get_token_by_position_tie_resolves_to_later_token() {
        let (tree, _root) = tiny_tree();
        // Offset 3 sits on the boundary between `var` (0..3) and the
        // following whitespace (3..4); the later token wins.
        let at_3 = tree.try_get_token_by_position(3u32.into()).unwrap();
        assert_eq!(tree.token(at_3).text(), " ");
    }

    #[test]
    fn try_get_token_by_position_end_of_tree_resolves_to_last_token() {
        let (tree, _root) = tiny_tree();
        let at_end = tree.try_get_token_by_position(5u32.into()).unwrap();
        assert_eq!(tree.token(at_end).text(), "x");
    }

    #[test]
    fn clone_subtree_has_independent_identity() {
        let (tree, root) = tiny_tree();
        let clone = tree.clone_subtree(root);
        assert_eq!(tree.to_text(Element::Node(root)), clone.to_text(Element::Node(clone.root())));
        assert_eq!(clone.nodes_len(), tree.nodes_len());
    }
}
