use crate::{NodeId, Tree};

/// Depth-first visitor over node kinds (§4.2 `walk_in`).
///
/// Only node-kind hooks exist; trivial tokens (whitespace, commas,
/// individual punctuation) are never dispatched — a visitor interested in
/// them iterates `form_of` directly. `enter` returning `false` skips the
/// subtree (and the matching `leave` call).
pub trait Visitor {
    fn enter(&mut self, tree: &Tree, node: NodeId) -> bool {
        let _ = (tree, node);
        true
    }

    fn leave(&mut self, tree: &Tree, node: NodeId) {
        let _ = (tree, node);
    }
}

/// Adapter that runs a closure on every entered node, for ad-hoc
/// traversals that don't warrant a dedicated `Visitor` impl.
pub struct ForEach<F>(pub F)
where
    F: FnMut(&Tree, NodeId);

impl<F> Visitor for ForEach<F>
where
    F: FnMut(&Tree, NodeId),
{
    fn enter(&mut self, tree: &Tree, node: NodeId) -> bool {
        (self.0)(tree, node);
        true
    }
}
