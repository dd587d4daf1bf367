//! Traversal helpers shared by more than one rule, kept here rather than
//! duplicated per rule module.

use gdlint_ast::{Element, NodeId, SyntaxKind, Tree};
use gdlint_semantic::{ScopeId, SemanticModel};

/// Every token of `kind` in the subtree rooted at `root`, in source order.
pub fn tokens_of_kind(tree: &Tree, root: NodeId, kind: SyntaxKind) -> Vec<gdlint_ast::TokenId> {
    let mut out = Vec::new();
    collect(tree, Element::Node(root), kind, &mut out);
    out
}

fn collect(tree: &Tree, element: Element, kind: SyntaxKind, out: &mut Vec<gdlint_ast::TokenId>) {
    match element {
        Element::Token(id) => {
            if tree.token(id).kind() == kind {
                out.push(id);
            }
        }
        Element::Node(id) => {
            for &child in tree.form_of(id) {
                collect(tree, child, kind, out);
            }
        }
    }
}

/// Walks up from `node` to the nearest ancestor (inclusive) that
/// `model.scope_of` has an entry for — `scope_of` is only populated for
/// scope-introducing nodes, so references need this climb rather than a
/// direct lookup.
pub fn enclosing_scope_of(tree: &Tree, model: &SemanticModel<'_>, mut node: NodeId) -> Option<ScopeId> {
    loop {
        if let Some(scope) = model.scope_of(node) {
            return Some(scope);
        }
        node = tree.parent_of_node(node)?;
    }
}

/// Every node of a given node kind in the subtree rooted at `root`,
/// in source order.
pub fn nodes_of_kind(tree: &Tree, root: NodeId, kind: SyntaxKind) -> Vec<NodeId> {
    let mut out = Vec::new();
    collect_nodes(tree, root, kind, &mut out);
    out
}

fn collect_nodes(tree: &Tree, node: NodeId, kind: SyntaxKind, out: &mut Vec<NodeId>) {
    if tree.node(node).kind() == kind {
        out.push(node);
    }
    for &child in tree.form_of(node) {
        if let Element::Node(id) = child {
            collect_nodes(tree, id, kind, out);
        }
    }
}

/// True if some strict ancestor of `node` has one of `kinds`, stopping
/// the climb at the first ancestor matching any of `boundaries` (so a
/// `break` inside a nested lambda does not see past it to an outer loop
/// it cannot actually target).
pub fn has_ancestor_before_boundary(
    tree: &Tree,
    mut node: NodeId,
    kinds: &[SyntaxKind],
    boundaries: &[SyntaxKind],
) -> bool {
    while let Some(parent) = tree.parent_of_node(node) {
        let kind = tree.node(parent).kind();
        if kinds.contains(&kind) {
            return true;
        }
        if boundaries.contains(&kind) {
            return false;
        }
        node = parent;
    }
    false
}
