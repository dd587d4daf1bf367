//! Scope tree and symbol table (§3 "Scope tree", "Symbol", §4.3).

use crate::types::SemanticType;
use gdlint_ast::NodeId;
use gdlint_text_size::TextSize;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub(crate) u32);

/// The kinds of CST region that introduce a scope (§3 "Scope tree").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// The implicit outermost scope: autoloads and engine globals. Has no
    /// declaring CST node.
    Global,
    Class,
    InnerClass,
    Method,
    Lambda,
    For,
    While,
    Branch,
    MatchCase,
}

impl ScopeKind {
    /// Whether references inside this scope must respect declaration order
    /// (§4.3 S2) rather than being visible throughout regardless of
    /// textual position (§4.3 S3, class/global scopes only).
    pub fn is_position_sensitive(self) -> bool {
        !matches!(self, Self::Global | Self::Class | Self::InnerClass)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Class,
    Method,
    Variable,
    Constant,
    Parameter,
    Signal,
    Enum,
    EnumValue,
    Iterator,
    MatchBinding,
}

/// A uniquely-identified declaration: `(name, declaring-scope)` per §3
/// "Symbol" — two variables named `x` in different scopes are two
/// distinct [`Symbol`]s even though they share a name.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: Box<str>,
    pub kind: SymbolKind,
    pub scope: ScopeId,
    pub declared_type: Option<SemanticType>,
    pub inferred_type: Option<SemanticType>,
    /// Defining CST position, used to resolve §4.3 S2 ordering.
    pub node: NodeId,
    pub declared_at: TextSize,
}

impl Symbol {
    pub fn is_untyped(&self) -> bool {
        self.declared_type.is_none()
    }
}

struct ScopeData {
    kind: ScopeKind,
    parent: Option<ScopeId>,
    node: Option<NodeId>,
    children: Vec<ScopeId>,
    /// Name → the symbols declared directly in this scope with that name,
    /// in declaration order (supporting §4.3 S2's "nearest declaration
    /// visible at that position" when a name is redeclared, e.g. a loop
    /// variable shadowed in a nested branch of the same block is a
    /// *different* scope, but a same-scope re-`var` is still just one
    /// entry per the duplicate-declaration diagnostic in 4.3).
    names: FxHashMap<Box<str>, Vec<SymbolId>>,
}

/// The whole-file (or whole-project, once merged by the orchestrator)
/// scope tree plus its flat symbol arena (§3 "Scope tree", §4.3).
pub struct ScopeTree {
    scopes: Vec<ScopeData>,
    symbols: Vec<Symbol>,
    root: ScopeId,
}

/// A same-scope, same-name redeclaration observed by the collector
/// (§4.3: "Duplicate class-level declarations with identical name produce
/// a scope diagnostic"). The rule engine (L8, `gdlint_linter`) turns this
/// into a `GDL2xxx` diagnostic; the semantic layer only records the fact.
#[derive(Debug, Clone, Copy)]
pub struct DuplicateDeclaration {
    pub first: SymbolId,
    pub second: SymbolId,
}

impl ScopeTree {
    pub fn new() -> Self {
        let root = ScopeData {
            kind: ScopeKind::Global,
            parent: None,
            node: None,
            children: Vec::new(),
            names: FxHashMap::default(),
        };
        Self {
            scopes: vec![root],
            symbols: Vec::new(),
            root: ScopeId(0),
        }
    }

    pub fn root(&self) -> ScopeId {
        self.root
    }

    pub fn push_scope(&mut self, kind: ScopeKind, parent: ScopeId, node: NodeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(ScopeData {
            kind,
            parent: Some(parent),
            node: Some(node),
            children: Vec::new(),
            names: FxHashMap::default(),
        });
        self.scopes[parent.0 as usize].children.push(id);
        id
    }

    pub fn kind_of(&self, scope: ScopeId) -> ScopeKind {
        self.scopes[scope.0 as usize].kind
    }

    pub fn parent_of(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope.0 as usize].parent
    }

    pub fn node_of(&self, scope: ScopeId) -> Option<NodeId> {
        self.scopes[scope.0 as usize].node
    }

    pub fn children_of(&self, scope: ScopeId) -> &[ScopeId] {
        &self.scopes[scope.0 as usize].children
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.0 as usize]
    }

    pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols.iter().enumerate().map(|(i, s)| (SymbolId(i as u32), s))
    }

    /// Declares `name` in `scope`. Always succeeds (a redeclaration is
    /// still recorded, shadowing the previous entry for future lookups at
    /// a later position, per §4.3's "later declarations at the same name
    /// resolve nearest") — callers that care about the duplicate collect
    /// the returned [`DuplicateDeclaration`] for diagnostics.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: impl Into<Box<str>>,
        kind: SymbolKind,
        node: NodeId,
        declared_at: TextSize,
        declared_type: Option<SemanticType>,
    ) -> (SymbolId, Option<DuplicateDeclaration>) {
        let name = name.into();
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol {
            name: name.clone(),
            kind,
            scope,
            declared_type,
            inferred_type: None,
            node,
            declared_at,
        });

        let entries = self.scopes[scope.0 as usize].names.entry(name).or_default();
        let duplicate = entries.last().map(|&first| DuplicateDeclaration { first, second: id });
        entries.push(id);
        (id, duplicate)
    }

    /// Direct lookup ignoring position, used for class/global scopes where
    /// forward reference is unconditional (§4.3 S3).
    fn lookup_in_scope(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        self.scopes[scope.0 as usize].names.get(name).and_then(|v| v.last().copied())
    }

    /// Position-aware lookup for a scope where declaration order matters
    /// (§4.3 S2): the nearest declaration whose position precedes (or is
    /// at) `position`.
    fn lookup_in_scope_at(&self, scope: ScopeId, name: &str, position: TextSize) -> Option<SymbolId> {
        self.scopes[scope.0 as usize]
            .names
            .get(name)
            .into_iter()
            .flatten()
            .rev()
            .find(|&&id| self.symbol(id).declared_at <= position)
            .copied()
    }

    /// Resolves `name` referenced at `position` starting in `scope`,
    /// walking outward to the enclosing class and then to global (§3
    /// "Scope tree": "Lookup walks outward to the enclosing class and
    /// then to global").
    pub fn resolve(&self, scope: ScopeId, name: &str, position: TextSize) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(s) = current {
            let kind = self.kind_of(s);
            let found = if kind.is_position_sensitive() {
                self.lookup_in_scope_at(s, name, position)
            } else {
                self.lookup_in_scope(s, name)
            };
            if found.is_some() {
                return found;
            }
            current = self.parent_of(s);
        }
        None
    }

    /// Project-wide symbol query by name (§4.9 `find_symbols`), scanning
    /// every scope in this file's tree.
    pub fn find_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = SymbolId> + 'a {
        self.symbols().filter(move |(_, s)| &*s.name == name).map(|(id, _)| id)
    }

    /// S1: is `scope` `ancestor`, or a descendant of it?
    pub fn is_same_or_descendant(&self, scope: ScopeId, ancestor: ScopeId) -> bool {
        let mut current = Some(scope);
        while let Some(s) = current {
            if s == ancestor {
                return true;
            }
            current = self.parent_of(s);
        }
        false
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdlint_ast::NodeId;

    fn node(i: u32) -> NodeId {
        // Scope bookkeeping only needs a stable, distinct identifier per
        // declaration site here; real NodeIds from a parsed tree are
        // exercised by the collector's own tests.
        NodeId::from_raw(i)
    }

    #[test]
    fn sibling_scopes_do_not_see_each_others_symbols() {
        let mut tree = ScopeTree::new();
        let class_scope = tree.push_scope(ScopeKind::Class, tree.root(), node(0));
        let method_a = tree.push_scope(ScopeKind::Method, class_scope, node(1));
        let method_b = tree.push_scope(ScopeKind::Method, class_scope, node(2));

        tree.declare(method_a, "counter", SymbolKind::Variable, node(3), TextSize::new(10), None);
        tree.declare(method_b, "counter", SymbolKind::Variable, node(4), TextSize::new(20), None);

        let matches: Vec<_> = tree.find_by_name("counter").collect();
        assert_eq!(matches.len(), 2);
        assert_ne!(tree.symbol(matches[0]).scope, tree.symbol(matches[1]).scope);
        assert!(!tree.is_same_or_descendant(method_a, method_b));
    }

    #[test]
    fn class_level_symbol_is_visible_before_its_declaration() {
        let mut tree = ScopeTree::new();
        let class_scope = tree.push_scope(ScopeKind::Class, tree.root(), node(0));
        let (v_sym, _) = tree.declare(
            class_scope,
            "v",
            SymbolKind::Variable,
            node(1),
            TextSize::new(100),
            None,
        );
        // A reference at position 0, earlier than the declaration, still
        // resolves because class scope is not position-sensitive (S3).
        let resolved = tree.resolve(class_scope, "v", TextSize::new(0));
        assert_eq!(resolved, Some(v_sym));
    }

    #[test]
    fn local_scope_hides_declarations_after_the_reference() {
        let mut tree = ScopeTree::new();
        let class_scope = tree.push_scope(ScopeKind::Class, tree.root(), node(0));
        let method_scope = tree.push_scope(ScopeKind::Method, class_scope, node(1));
        tree.declare(method_scope, "x", SymbolKind::Variable, node(2), TextSize::new(50), None);

        assert_eq!(tree.resolve(method_scope, "x", TextSize::new(10)), None);
        assert!(tree.resolve(method_scope, "x", TextSize::new(60)).is_some());
    }
}
