//! The declaration collector (§4.3).
//!
//! Two passes over each class body: the first registers every class-level
//! symbol so later references can forward-reference them (§4.3 S3); the
//! second descends into method/property/lambda bodies building nested
//! scopes in declaration order (§4.3 S1/S2).

use crate::scope::{DuplicateDeclaration, ScopeId, ScopeKind, ScopeTree, SymbolKind};
use crate::types::SemanticType;
use gdlint_ast::cst::{
    Block, ClassDecl, ConstDecl, CstNode, EnumDecl, ForStmt, FuncDecl, IfStmt, InnerClassDecl, LambdaExpr, MatchStmt,
    Param, ParamList, PropertyDecl, SignalDecl, SourceFileNode, Stmt, VarDecl, WhileStmt,
};
use gdlint_ast::{NodeId, Tree};

pub struct Collector<'t> {
    tree: &'t Tree,
    scopes: ScopeTree,
    duplicates: Vec<DuplicateDeclaration>,
}

impl<'t> Collector<'t> {
    pub fn new(tree: &'t Tree) -> Self {
        Self {
            tree,
            scopes: ScopeTree::new(),
            duplicates: Vec::new(),
        }
    }

    #[tracing::instrument(skip_all)]
    pub fn collect(mut self) -> (ScopeTree, Vec<DuplicateDeclaration>) {
        if let Some(source_file) = SourceFileNode::cast(self.tree, self.tree.root()) {
            if let Some(class) = source_file.class() {
                self.collect_class_decl(class);
            }
        }
        (self.scopes, self.duplicates)
    }

    fn declare(
        &mut self,
        scope: ScopeId,
        name: &str,
        kind: SymbolKind,
        node: NodeId,
        declared_type: Option<SemanticType>,
    ) {
        let at = self.tree.range_of(gdlint_ast::Element::Node(node)).start();
        let (_, duplicate) = self.scopes.declare(scope, name, kind, node, at, declared_type);
        if let Some(duplicate) = duplicate {
            self.duplicates.push(duplicate);
        }
    }

    fn collect_class_decl(&mut self, class: ClassDecl<'t>) {
        let scope = self.scopes.push_scope(ScopeKind::Class, self.scopes.root(), class.node_id());
        self.collect_class_body(
            scope,
            class.functions(),
            class.variables(),
            class.constants(),
            class.properties(),
            class.signals(),
            class.enums(),
            class.inner_classes(),
        );
    }

    fn collect_inner_class_decl(&mut self, inner: InnerClassDecl<'t>, outer: ScopeId) {
        if let Some(name) = inner.name() {
            self.declare(outer, name, SymbolKind::Class, inner.node_id(), None);
        }
        let scope = self.scopes.push_scope(ScopeKind::InnerClass, outer, inner.node_id());
        self.collect_class_body(
            scope,
            inner.functions(),
            inner.variables(),
            inner.constants(),
            inner.properties(),
            inner.signals(),
            inner.enums(),
            inner.inner_classes(),
        );
    }

    /// First pass (register everything) then second pass (descend into
    /// bodies), shared between the top-level class and every inner class
    /// (§4.3: "Inner classes are recursed into at registration time").
    #[allow(clippy::too_many_arguments)]
    fn collect_class_body(
        &mut self,
        scope: ScopeId,
        functions: impl Iterator<Item = FuncDecl<'t>>,
        variables: impl Iterator<Item = VarDecl<'t>>,
        constants: impl Iterator<Item = ConstDecl<'t>>,
        properties: impl Iterator<Item = PropertyDecl<'t>>,
        signals: impl Iterator<Item = SignalDecl<'t>>,
        enums: impl Iterator<Item = EnumDecl<'t>>,
        inner_classes: impl Iterator<Item = InnerClassDecl<'t>>,
    ) {
        let functions: Vec<_> = functions.collect();
        let variables: Vec<_> = variables.collect();
        let constants: Vec<_> = constants.collect();
        let properties: Vec<_> = properties.collect();
        let signals: Vec<_> = signals.collect();
        let enums: Vec<_> = enums.collect();
        let inner_classes: Vec<_> = inner_classes.collect();

        // Pass 1: register class-level symbols, forward-reference safe.
        for func in &functions {
            if let Some(name) = func.name() {
                self.declare(scope, name, SymbolKind::Method, func.node_id(), None);
            }
        }
        for var in &variables {
            let declared_type = var.declared_type().map(|t| type_node_to_semantic(t));
            if let Some(name) = var.name() {
                self.declare(scope, name, SymbolKind::Variable, var.node_id(), declared_type);
            }
        }
        for constant in &constants {
            let declared_type = constant.declared_type().map(|t| type_node_to_semantic(t));
            if let Some(name) = constant.name() {
                self.declare(scope, name, SymbolKind::Constant, constant.node_id(), declared_type);
            }
        }
        for property in &properties {
            let declared_type = property.declared_type().map(|t| type_node_to_semantic(t));
            if let Some(name) = property.name() {
                self.declare(scope, name, SymbolKind::Variable, property.node_id(), declared_type);
            }
        }
        for signal in &signals {
            if let Some(name) = signal.name() {
                self.declare(scope, name, SymbolKind::Signal, signal.node_id(), None);
            }
        }
        for enum_decl in &enums {
            if let Some(name) = enum_decl.name() {
                self.declare(scope, name, SymbolKind::Enum, enum_decl.node_id(), None);
            }
            // Enum values are visible at class scope in GDScript, same as
            // the enum's own name.
            for value in enum_decl.values() {
                if let Some(name) = value.name() {
                    self.declare(scope, name, SymbolKind::EnumValue, value.node_id(), Some(SemanticType::concrete("int")));
                }
            }
        }
        for inner in &inner_classes {
            if let Some(name) = inner.name() {
                self.declare(scope, name, SymbolKind::Class, inner.node_id(), None);
            }
        }

        // Pass 2: descend into bodies.
        for func in &functions {
            self.collect_function(*func, scope);
        }
        for property in &properties {
            if let Some(getter) = property.getter() {
                if let Some(body) = getter.body() {
                    let getter_scope = self.scopes.push_scope(ScopeKind::Method, scope, getter.node_id());
                    self.collect_block(body, getter_scope);
                }
            }
            if let Some(setter) = property.setter() {
                let setter_scope = self.scopes.push_scope(ScopeKind::Method, scope, setter.node_id());
                if let Some(param) = setter.param() {
                    self.declare_param(param, setter_scope);
                }
                if let Some(body) = setter.body() {
                    self.collect_block(body, setter_scope);
                }
            }
        }
        // Inner classes were already registered above; recurse into each
        // one's own two-pass collection so its members stay isolated from
        // the outer scope (§4.3 S1).
        for inner in inner_classes {
            self.collect_inner_class_decl(inner, scope);
        }
    }

    fn collect_function(&mut self, func: FuncDecl<'t>, outer: ScopeId) {
        let method_scope = self.scopes.push_scope(ScopeKind::Method, outer, func.node_id());
        if let Some(params) = func.params() {
            self.declare_param_list(params, method_scope);
        }
        if let Some(body) = func.body() {
            self.collect_block(body, method_scope);
        }
    }

    fn declare_param_list(&mut self, params: ParamList<'t>, scope: ScopeId) {
        for param in params.params() {
            self.declare_param(param, scope);
        }
    }

    fn declare_param(&mut self, param: Param<'t>, scope: ScopeId) {
        let declared_type = param.declared_type().map(type_node_to_semantic);
        if let Some(name) = param.name() {
            self.declare(scope, name, SymbolKind::Parameter, param.node_id(), declared_type);
        }
    }

    fn collect_block(&mut self, block: Block<'t>, scope: ScopeId) {
        for stmt in block.statements() {
            self.collect_stmt(stmt, scope);
        }
    }

    fn collect_stmt(&mut self, stmt: Stmt<'t>, scope: ScopeId) {
        match stmt {
            Stmt::VarDeclStmt(v) => {
                if let Some(var) = v.var() {
                    let declared_type = var.declared_type().map(type_node_to_semantic);
                    if let Some(name) = var.name() {
                        self.declare(scope, name, SymbolKind::Variable, var.node_id(), declared_type);
                    }
                }
                self.scan_lambdas(stmt.node_id(), scope);
            }
            Stmt::If(if_stmt) => self.collect_if(if_stmt, scope),
            Stmt::For(for_stmt) => self.collect_for(for_stmt, scope),
            Stmt::While(while_stmt) => self.collect_while(while_stmt, scope),
            Stmt::Match(match_stmt) => self.collect_match(match_stmt, scope),
            Stmt::Return(_)
            | Stmt::Break(..)
            | Stmt::Continue(..)
            | Stmt::Pass(..)
            | Stmt::Assert(_)
            | Stmt::Expr(_)
            | Stmt::Await(_) => {
                self.scan_lambdas(stmt.node_id(), scope);
            }
        }
    }

    fn collect_if(&mut self, if_stmt: IfStmt<'t>, outer: ScopeId) {
        if let Some(cond) = if_stmt.condition() {
            self.scan_lambdas(cond.node_id(), outer);
        }
        for elif in if_stmt.elif_clauses() {
            if let Some(cond) = elif.condition() {
                self.scan_lambdas(cond.node_id(), outer);
            }
        }
        if let Some(then_block) = if_stmt.then_block() {
            let branch = self.scopes.push_scope(ScopeKind::Branch, outer, then_block.node_id());
            self.collect_block(then_block, branch);
        }
        for elif in if_stmt.elif_clauses() {
            if let Some(block) = elif.block() {
                let branch = self.scopes.push_scope(ScopeKind::Branch, outer, block.node_id());
                self.collect_block(block, branch);
            }
        }
        if let Some(else_clause) = if_stmt.else_clause() {
            if let Some(block) = else_clause.block() {
                let branch = self.scopes.push_scope(ScopeKind::Branch, outer, block.node_id());
                self.collect_block(block, branch);
            }
        }
    }

    fn collect_for(&mut self, for_stmt: ForStmt<'t>, outer: ScopeId) {
        if let Some(iterable) = for_stmt.iterable() {
            self.scan_lambdas(iterable.node_id(), outer);
        }
        let scope = self.scopes.push_scope(ScopeKind::For, outer, for_stmt.node_id());
        if let Some(name) = for_stmt.iterator_name() {
            self.declare(scope, name, SymbolKind::Iterator, for_stmt.node_id(), None);
        }
        if let Some(body) = for_stmt.body() {
            self.collect_block(body, scope);
        }
    }

    fn collect_while(&mut self, while_stmt: WhileStmt<'t>, outer: ScopeId) {
        if let Some(cond) = while_stmt.condition() {
            self.scan_lambdas(cond.node_id(), outer);
        }
        let scope = self.scopes.push_scope(ScopeKind::While, outer, while_stmt.node_id());
        if let Some(body) = while_stmt.body() {
            self.collect_block(body, scope);
        }
    }

    fn collect_match(&mut self, match_stmt: MatchStmt<'t>, outer: ScopeId) {
        if let Some(subject) = match_stmt.subject() {
            self.scan_lambdas(subject.node_id(), outer);
        }
        for case in match_stmt.cases() {
            let scope = self.scopes.push_scope(ScopeKind::MatchCase, outer, case.node_id());
            for binding in case.bindings() {
                if let Some(name) = binding.name() {
                    self.declare(scope, name, SymbolKind::MatchBinding, binding.node_id(), None);
                }
            }
            if let Some(body) = case.body() {
                self.collect_block(body, scope);
            }
        }
    }

    /// Lambdas can appear nested inside any expression; a full typed-AST
    /// walk isn't needed for *scope* registration since lambdas only
    /// introduce a scope for their own body/params, so a shallow tree walk
    /// over the containing node suffices to find them.
    fn scan_lambdas(&mut self, node: NodeId, scope: ScopeId) {
        let mut finder = LambdaFinder { found: Vec::new() };
        self.tree.walk_in(node, &mut finder);
        for lambda_id in finder.found {
            let Some(lambda) = LambdaExpr::cast(self.tree, lambda_id) else {
                continue;
            };
            let lambda_scope = self.scopes.push_scope(ScopeKind::Lambda, scope, lambda.node_id());
            if let Some(params) = lambda.params() {
                self.declare_param_list(params, lambda_scope);
            }
            if let Some(body) = lambda.body() {
                self.collect_block(body, lambda_scope);
            }
        }
    }
}

struct LambdaFinder {
    found: Vec<NodeId>,
}

impl gdlint_ast::Visitor for LambdaFinder {
    fn enter(&mut self, tree: &Tree, node: NodeId) -> bool {
        if tree.node(node).kind() == gdlint_ast::SyntaxKind::LAMBDA_EXPR {
            self.found.push(node);
            // A lambda nested inside this one is registered when its own
            // body is collected below, not by this shallow scan.
            return false;
        }
        true
    }
}

fn type_node_to_semantic(type_node: gdlint_ast::cst::TypeNode<'_>) -> SemanticType {
    use gdlint_ast::cst::TypeNode;
    match type_node {
        TypeNode::Simple(simple) => match simple.name() {
            Some(name) => SemanticType::concrete(name),
            None => SemanticType::Variant,
        },
        TypeNode::Generic(generic) => match generic.base_name() {
            Some(name) => SemanticType::concrete(name),
            None => SemanticType::Variant,
        },
        TypeNode::Inferred(_) => SemanticType::Variant,
    }
}

/// Convenience entry point mirroring [`gdlint_parser::parse`]'s shape.
pub fn collect(tree: &Tree) -> (ScopeTree, Vec<DuplicateDeclaration>) {
    Collector::new(tree).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::ScopeKind;

    fn scopes_for(src: &str) -> (ScopeTree, Vec<DuplicateDeclaration>) {
        let tree = gdlint_parser::parse(src).unwrap();
        collect(&tree)
    }

    #[test]
    fn class_and_method_scopes_each_keep_their_own_counter_symbol() {
        let src = "extends Node\n\nvar counter = 10\n\nfunc method_a():\n    var counter = 0\n    print(counter)\n";
        let (scopes, duplicates) = scopes_for(src);
        assert!(duplicates.is_empty());
        let matches: Vec<_> = scopes.find_by_name("counter").collect();
        assert_eq!(matches.len(), 2);
        let kinds: Vec<_> = matches.iter().map(|&id| scopes.kind_of(scopes.symbol(id).scope)).collect();
        assert!(kinds.contains(&ScopeKind::Class));
        assert!(kinds.contains(&ScopeKind::Method));
    }

    #[test]
    fn forward_reference_to_class_level_variable_resolves() {
        let src = "extends Node\n\nfunc f():\n    return v\n\nvar v = 1\n";
        let (scopes, _) = scopes_for(src);
        let method_scope = scopes
            .children_of(scopes.children_of(scopes.root())[0])
            .first()
            .copied()
            .unwrap();
        let resolved = scopes.resolve(method_scope, "v", gdlint_text_size::TextSize::new(0));
        assert!(resolved.is_some());
    }

    #[test]
    fn duplicate_class_level_declaration_is_recorded() {
        let src = "extends Node\n\nvar x = 1\nvar x = 2\n";
        let (_, duplicates) = scopes_for(src);
        assert_eq!(duplicates.len(), 1);
    }

    #[test]
    fn for_loop_iterator_is_scoped_to_the_loop() {
        let src = "extends Node\n\nfunc f():\n    for i in range(3):\n        print(i)\n    print(i)\n";
        let (scopes, _) = scopes_for(src);
        let matches: Vec<_> = scopes.find_by_name("i").collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(scopes.kind_of(scopes.symbol(matches[0]).scope), ScopeKind::For);
    }

    #[test]
    fn generic_declared_type_is_recorded_not_dropped() {
        let src = "extends Node\n\nvar items: Array[int] = []\n";
        let (scopes, _) = scopes_for(src);
        let matches: Vec<_> = scopes.find_by_name("items").collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(scopes.symbol(matches[0]).declared_type, Some(SemanticType::concrete("Array")));
    }

    #[test]
    fn inferred_declared_type_resolves_to_variant() {
        let src = "extends Node\n\nvar items := []\n";
        let (scopes, _) = scopes_for(src);
        let matches: Vec<_> = scopes.find_by_name("items").collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(scopes.symbol(matches[0]).declared_type, Some(SemanticType::Variant));
    }
}
