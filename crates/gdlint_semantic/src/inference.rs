//! The type inference engine (§4.4), driven by the scope tree the
//! collector built. Inference is a single forward pass per function body;
//! flow-sensitive narrowing (§4.5) is threaded through as an owned
//! [`NarrowingContext`] that forks at every branch and is dropped at the
//! branch's end, never mutating a parent's copy.

use crate::narrowing::NarrowingContext;
use crate::profile::{ContainerUsageProfile, VariableUsageProfile};
use crate::provider::{ProjectContextProvider, RuntimeTypeProvider};
use crate::scope::{ScopeId, ScopeTree, SymbolId};
use crate::types::{Confidence, DuckType, OperatorKind, SemanticType, Typed, TypeName};
use gdlint_ast::cst::{
    Block, ClassDecl, CstNode, Expr, ForStmt, FuncDecl, IfStmt, InnerClassDecl, LambdaExpr, MatchStmt, SourceFileNode,
    Stmt, TypeNode, WhileStmt,
};
use gdlint_ast::{NodeId, SyntaxKind, Tree};
use gdlint_text_size::TextSize;
use rustc_hash::FxHashMap;

pub struct Inferencer<'t> {
    tree: &'t Tree,
    scopes: &'t ScopeTree,
    provider: &'t dyn RuntimeTypeProvider,
    project: &'t dyn ProjectContextProvider,
    node_scope: FxHashMap<NodeId, ScopeId>,
    expr_types: FxHashMap<NodeId, Typed>,
    container_profiles: FxHashMap<SymbolId, ContainerUsageProfile>,
    variable_profiles: FxHashMap<SymbolId, VariableUsageProfile>,
    duck_constraints: FxHashMap<SymbolId, DuckType>,
}

impl<'t> Inferencer<'t> {
    pub fn new(
        tree: &'t Tree,
        scopes: &'t ScopeTree,
        provider: &'t dyn RuntimeTypeProvider,
        project: &'t dyn ProjectContextProvider,
    ) -> Self {
        Self {
            tree,
            scopes,
            provider,
            project,
            node_scope: build_node_scope_map(scopes),
            expr_types: FxHashMap::default(),
            container_profiles: FxHashMap::default(),
            variable_profiles: FxHashMap::default(),
            duck_constraints: FxHashMap::default(),
        }
    }

    /// Consumes the inferencer, returning every map the rule engine needs
    /// (§4.8 "Rules consume the annotated tree and the semantic model"):
    /// per-expression types, container/variable usage profiles, accumulated
    /// duck-typing constraints, and the node-to-declaring-scope index built
    /// once from the scope tree so callers never have to rebuild it.
    #[allow(clippy::type_complexity)]
    pub fn into_parts(
        self,
    ) -> (
        FxHashMap<NodeId, Typed>,
        FxHashMap<SymbolId, ContainerUsageProfile>,
        FxHashMap<SymbolId, VariableUsageProfile>,
        FxHashMap<SymbolId, DuckType>,
        FxHashMap<NodeId, ScopeId>,
    ) {
        (
            self.expr_types,
            self.container_profiles,
            self.variable_profiles,
            self.duck_constraints,
            self.node_scope,
        )
    }

    pub fn run(&mut self) {
        let Some(source_file) = SourceFileNode::cast(self.tree, self.tree.root()) else {
            return;
        };
        let Some(class) = source_file.class() else {
            return;
        };
        self.infer_class_decl(class);
    }

    fn infer_class_decl(&mut self, class: ClassDecl<'t>) {
        let Some(&scope) = self.node_scope.get(&class.node_id()) else {
            return;
        };
        for var in class.variables() {
            if let Some(init) = var.initializer() {
                self.infer_expr(init, scope, &NarrowingContext::empty());
            }
        }
        for constant in class.constants() {
            if let Some(init) = constant.initializer() {
                self.infer_expr(init, scope, &NarrowingContext::empty());
            }
        }
        for property in class.properties() {
            self.infer_property_bodies(property);
        }
        for func in class.functions() {
            self.infer_func(func);
        }
        for inner in class.inner_classes() {
            self.infer_inner_class(inner);
        }
    }

    fn infer_inner_class(&mut self, inner: InnerClassDecl<'t>) {
        let Some(&scope) = self.node_scope.get(&inner.node_id()) else {
            return;
        };
        for var in inner.variables() {
            if let Some(init) = var.initializer() {
                self.infer_expr(init, scope, &NarrowingContext::empty());
            }
        }
        for constant in inner.constants() {
            if let Some(init) = constant.initializer() {
                self.infer_expr(init, scope, &NarrowingContext::empty());
            }
        }
        for property in inner.properties() {
            self.infer_property_bodies(property);
        }
        for func in inner.functions() {
            self.infer_func(func);
        }
        for nested in inner.inner_classes() {
            self.infer_inner_class(nested);
        }
    }

    fn infer_property_bodies(&mut self, property: gdlint_ast::cst::PropertyDecl<'t>) {
        if let Some(getter) = property.getter() {
            if let Some(&scope) = self.node_scope.get(&getter.node_id()) {
                if let Some(body) = getter.body() {
                    self.infer_block(body, scope, &NarrowingContext::empty());
                }
            }
        }
        if let Some(setter) = property.setter() {
            if let Some(&scope) = self.node_scope.get(&setter.node_id()) {
                if let Some(body) = setter.body() {
                    self.infer_block(body, scope, &NarrowingContext::empty());
                }
            }
        }
    }

    fn infer_func(&mut self, func: FuncDecl<'t>) {
        let Some(&scope) = self.node_scope.get(&func.node_id()) else {
            return;
        };
        if let Some(body) = func.body() {
            self.infer_block(body, scope, &NarrowingContext::empty());
        }
    }

    fn infer_lambda(&mut self, lambda: LambdaExpr<'t>) {
        let Some(&scope) = self.node_scope.get(&lambda.node_id()) else {
            return;
        };
        if let Some(body) = lambda.body() {
            self.infer_block(body, scope, &NarrowingContext::empty());
        }
    }

    /// Runs inference through `block` starting from a clone of `ctx`,
    /// returning the narrowing context the block ends with — its own
    /// `if`/`assert` statements can refine it — so a caller merging
    /// branch exits (§4.5 "Merge on join") has something to merge.
    fn infer_block(&mut self, block: Block<'t>, scope: ScopeId, ctx: &NarrowingContext) -> NarrowingContext {
        let mut ctx = ctx.clone();
        for stmt in block.statements() {
            self.infer_stmt(stmt, scope, &mut ctx);
        }
        ctx
    }

    fn infer_stmt(&mut self, stmt: Stmt<'t>, scope: ScopeId, ctx: &mut NarrowingContext) {
        match stmt {
            Stmt::VarDeclStmt(v) => {
                if let Some(var) = v.var() {
                    if let Some(init) = var.initializer() {
                        let typed = self.infer_expr(init, scope, ctx);
                        if var.declared_type().is_none() {
                            if let Some(name) = var.name() {
                                if let Some(sym) = self.symbol_in_scope(scope, name) {
                                    self.variable_profiles
                                        .entry(sym)
                                        .or_default()
                                        .observe(typed.ty, typed.confidence);
                                }
                            }
                        }
                    }
                }
            }
            Stmt::If(if_stmt) => self.infer_if(if_stmt, scope, ctx),
            Stmt::For(for_stmt) => self.infer_for(for_stmt, scope, ctx),
            Stmt::While(while_stmt) => self.infer_while(while_stmt, scope, ctx),
            Stmt::Match(match_stmt) => self.infer_match(match_stmt, scope, ctx),
            Stmt::Return(r) => {
                if let Some(value) = r.value() {
                    self.infer_expr(value, scope, ctx);
                }
            }
            Stmt::Assert(a) => {
                if let Some(cond) = a.condition() {
                    self.infer_expr(cond, scope, ctx);
                    // §4.5 "assert(cond) applies true-branch narrowing for
                    // statements that follow in the same scope" — an
                    // assert that doesn't hold aborts, so only the true
                    // branch's narrowing can ever be observed afterwards.
                    let (narrow_true, _) = self.narrow_condition(cond, ctx);
                    *ctx = NarrowingContext::intersect(ctx, &narrow_true);
                }
            }
            Stmt::Expr(e) => {
                if let Some(expr) = e.expr() {
                    self.infer_expr(expr, scope, ctx);
                }
            }
            Stmt::Await(a) => {
                if let Some(expr) = a.expr() {
                    self.infer_expr(expr, scope, ctx);
                }
            }
            Stmt::Break(..) | Stmt::Continue(..) | Stmt::Pass(..) => {}
        }
    }

    fn infer_if(&mut self, if_stmt: IfStmt<'t>, scope: ScopeId, ctx: &mut NarrowingContext) {
        let mut running_false = ctx.clone();
        // Every branch's exit context, collected so the narrowing that
        // survives past the whole `if`/`elif`/`else` is what every taken
        // path agrees on (§4.5 "Merge on join"), not just whatever the
        // last-inferred branch happened to leave behind.
        let mut branch_ends = Vec::new();

        if let Some(cond) = if_stmt.condition() {
            self.infer_expr(cond, scope, &running_false);
            let (narrow_true, narrow_false) = self.narrow_condition(cond, &running_false);
            if let Some(then_block) = if_stmt.then_block() {
                if let Some(&then_scope) = self.node_scope.get(&then_block.node_id()) {
                    let ctx_then = NarrowingContext::intersect(&running_false, &narrow_true);
                    branch_ends.push(self.infer_block(then_block, then_scope, &ctx_then));
                }
            }
            running_false = NarrowingContext::intersect(&running_false, &narrow_false);
        }

        for elif in if_stmt.elif_clauses() {
            let Some(cond) = elif.condition() else { continue };
            self.infer_expr(cond, scope, &running_false);
            let (narrow_true, narrow_false) = self.narrow_condition(cond, &running_false);
            if let Some(block) = elif.block() {
                if let Some(&elif_scope) = self.node_scope.get(&block.node_id()) {
                    let ctx_elif = NarrowingContext::intersect(&running_false, &narrow_true);
                    branch_ends.push(self.infer_block(block, elif_scope, &ctx_elif));
                }
            }
            running_false = NarrowingContext::intersect(&running_false, &narrow_false);
        }

        let has_else = if_stmt.else_clause().is_some();
        if let Some(else_clause) = if_stmt.else_clause() {
            if let Some(block) = else_clause.block() {
                if let Some(&else_scope) = self.node_scope.get(&block.node_id()) {
                    branch_ends.push(self.infer_block(block, else_scope, &running_false));
                }
            }
        }
        if !has_else {
            // No `else` means control can fall through having taken none
            // of the branches; that path's narrowing — every condition's
            // false arm — joins the merge too.
            branch_ends.push(running_false);
        }

        if !branch_ends.is_empty() {
            *ctx = NarrowingContext::merge_branches(&branch_ends);
        }
    }

    fn infer_for(&mut self, for_stmt: ForStmt<'t>, scope: ScopeId, ctx: &NarrowingContext) {
        let iterable_ty = for_stmt.iterable().map(|iterable| self.infer_expr(iterable, scope, ctx));
        let Some(&for_scope) = self.node_scope.get(&for_stmt.node_id()) else {
            return;
        };
        if let (Some(name), Some(typed)) = (for_stmt.iterator_name(), &iterable_ty) {
            if let Some(sym) = self.symbol_in_scope(for_scope, name) {
                let element_ty = match &typed.ty {
                    SemanticType::Concrete(type_name) => self
                        .provider
                        .iterator_element_type(type_name)
                        .map(SemanticType::concrete)
                        .unwrap_or(SemanticType::Variant),
                    _ => SemanticType::Variant,
                };
                self.variable_profiles.entry(sym).or_default().observe(element_ty, Confidence::Potential);
            }
        }
        if let Some(body) = for_stmt.body() {
            self.infer_block(body, for_scope, ctx);
        }
    }

    fn infer_while(&mut self, while_stmt: WhileStmt<'t>, scope: ScopeId, ctx: &NarrowingContext) {
        let Some(&while_scope) = self.node_scope.get(&while_stmt.node_id()) else {
            return;
        };
        let body_ctx = if let Some(cond) = while_stmt.condition() {
            self.infer_expr(cond, scope, ctx);
            let (narrow_true, _) = self.narrow_condition(cond, ctx);
            NarrowingContext::intersect(ctx, &narrow_true)
        } else {
            ctx.clone()
        };
        if let Some(body) = while_stmt.body() {
            self.infer_block(body, while_scope, &body_ctx);
        }
    }

    fn infer_match(&mut self, match_stmt: MatchStmt<'t>, scope: ScopeId, ctx: &NarrowingContext) {
        let subject_ty = match_stmt.subject().map(|subject| self.infer_expr(subject, scope, ctx));
        for case in match_stmt.cases() {
            let Some(&case_scope) = self.node_scope.get(&case.node_id()) else {
                continue;
            };
            for binding in case.bindings() {
                let (Some(name), Some(typed)) = (binding.name(), &subject_ty) else {
                    continue;
                };
                if let Some(sym) = self.symbol_in_scope(case_scope, name) {
                    self.variable_profiles
                        .entry(sym)
                        .or_default()
                        .observe(typed.ty.clone(), Confidence::Potential);
                }
            }
            if let Some(body) = case.body() {
                self.infer_block(body, case_scope, ctx);
            }
        }
    }

    fn infer_expr(&mut self, expr: Expr<'t>, scope: ScopeId, ctx: &NarrowingContext) -> Typed {
        let typed = self.infer_expr_inner(expr, scope, ctx);
        self.expr_types.insert(expr.node_id(), typed.clone());
        typed
    }

    #[allow(clippy::too_many_lines)]
    fn infer_expr_inner(&mut self, expr: Expr<'t>, scope: ScopeId, ctx: &NarrowingContext) -> Typed {
        match expr {
            Expr::Literal(lit) => match lit.token_kind().and_then(literal_kind_to_type) {
                Some(ty) => Typed::strict(ty),
                None => Typed::variant(),
            },
            Expr::Ident(ident) => {
                let Some(name) = ident.name() else { return Typed::variant() };
                self.infer_ident(name, scope, ctx, ident.range().start())
            }
            Expr::Paren(p) => p
                .inner()
                .map(|inner| self.infer_expr(inner, scope, ctx))
                .unwrap_or_else(Typed::variant),
            Expr::Unary(u) => {
                let operand = u.operand().map(|o| self.infer_expr(o, scope, ctx));
                match u.operator() {
                    Some(SyntaxKind::NOT_KW | SyntaxKind::BANG) => Typed::strict(SemanticType::concrete("bool")),
                    _ => operand.unwrap_or_else(Typed::variant),
                }
            }
            Expr::Binary(b) => self.infer_binary(b, scope, ctx),
            Expr::Call(call) => self.infer_call(call, scope, ctx),
            Expr::Member(member) => self.infer_member(member, scope, ctx),
            Expr::Index(index) => self.infer_index(index, scope, ctx),
            Expr::Array(array) => {
                for element in array.elements() {
                    self.infer_expr(element, scope, ctx);
                }
                Typed::strict(SemanticType::concrete("Array"))
            }
            Expr::Dict(dict) => {
                for entry in dict.entries() {
                    if let Some(key) = entry.key() {
                        self.infer_expr(key, scope, ctx);
                    }
                    if let Some(value) = entry.value() {
                        self.infer_expr(value, scope, ctx);
                    }
                }
                Typed::strict(SemanticType::concrete("Dictionary"))
            }
            Expr::Lambda(lambda) => {
                self.infer_lambda(lambda);
                Typed::strict(SemanticType::concrete("Callable"))
            }
            Expr::If(if_expr) => {
                let [a, c, b] = if_expr.parts();
                if let Some(cond) = c {
                    self.infer_expr(cond, scope, ctx);
                }
                let a_ty = a.map(|e| self.infer_expr(e, scope, ctx));
                let b_ty = b.map(|e| self.infer_expr(e, scope, ctx));
                match (a_ty, b_ty) {
                    (Some(a), Some(b)) => {
                        Typed::combine(&a, &b, SemanticType::union_of([a.ty.clone(), b.ty.clone()]))
                    }
                    (Some(t), None) | (None, Some(t)) => t,
                    (None, None) => Typed::variant(),
                }
            }
            Expr::GetNode(get_node) => match self.project.scene_node_type(&get_node.path()) {
                Some(ty) => Typed::potential(SemanticType::concrete(ty)),
                None => Typed::name_match(SemanticType::Variant),
            },
            Expr::UniqueNode(unique) => {
                let Some(name) = unique.name() else { return Typed::variant() };
                match self.project.scene_node_type(name) {
                    Some(ty) => Typed::potential(SemanticType::concrete(ty)),
                    None => Typed::name_match(SemanticType::Variant),
                }
            }
            Expr::Is(is_expr) => {
                if let Some(operand) = is_expr.operand() {
                    self.infer_expr(operand, scope, ctx);
                }
                Typed::strict(SemanticType::concrete("bool"))
            }
            Expr::As(as_expr) => {
                if let Some(operand) = as_expr.operand() {
                    self.infer_expr(operand, scope, ctx);
                }
                match as_expr.type_name().and_then(|t| type_node_name(t)) {
                    Some(name) => Typed::strict(SemanticType::concrete(name)),
                    None => Typed::variant(),
                }
            }
            Expr::In(in_expr) => {
                if let Some(needle) = in_expr.needle() {
                    self.infer_expr(needle, scope, ctx);
                }
                if let Some(haystack) = in_expr.haystack() {
                    self.infer_expr(haystack, scope, ctx);
                }
                Typed::strict(SemanticType::concrete("bool"))
            }
        }
    }

    fn infer_ident(&mut self, name: &str, scope: ScopeId, ctx: &NarrowingContext, position: TextSize) -> Typed {
        if let Some(narrowing) = ctx.get(name) {
            if let Some(concrete) = &narrowing.concrete {
                return Typed::strict(concrete.clone());
            }
            if let Some(duck) = &narrowing.duck {
                return Typed::potential(SemanticType::Duck(Box::new(duck.clone())));
            }
        }
        let Some(sym_id) = self.scopes.resolve(scope, name, position) else {
            // §4.4 "if not found, consult global provider; if still not
            // found, Variant with NameMatch". A project-wide `class_name`
            // is as authoritative as a declared type (DESIGN.md Open
            // Question #3), so both this and an engine global-class/
            // autoload hit resolve at Strict confidence.
            if let Some(type_name) = self.project.user_class(name).or_else(|| self.provider.global_class(name)) {
                return Typed::strict(SemanticType::concrete(type_name));
            }
            return Typed::name_match(SemanticType::Variant);
        };
        let symbol = self.scopes.symbol(sym_id);
        if let Some(declared) = &symbol.declared_type {
            return Typed::strict(declared.clone());
        }
        if let Some(profile) = self.variable_profiles.get(&sym_id) {
            if let Some(reconstructed) = profile.reconstruct() {
                return Typed::potential(reconstructed);
            }
        }
        if let Some(duck) = self.duck_constraints.get(&sym_id) {
            if !duck.is_empty() {
                return Typed::potential(SemanticType::Duck(Box::new(duck.clone())));
            }
        }
        Typed::name_match(SemanticType::Variant)
    }

    fn infer_binary(&mut self, b: gdlint_ast::cst::BinaryExpr<'t>, scope: ScopeId, ctx: &NarrowingContext) -> Typed {
        let Some(operator) = b.operator() else { return Typed::variant() };

        if is_assignment_operator(operator) {
            let rhs_typed = b.rhs().map(|r| self.infer_expr(r, scope, ctx)).unwrap_or_else(Typed::variant);
            match b.lhs() {
                Some(Expr::Ident(ident)) => {
                    if let Some(name) = ident.name() {
                        if let Some(sym) = self.scopes.resolve(scope, name, ident.range().start()) {
                            if self.scopes.symbol(sym).declared_type.is_none() {
                                self.variable_profiles
                                    .entry(sym)
                                    .or_default()
                                    .observe(rhs_typed.ty.clone(), rhs_typed.confidence);
                            }
                        }
                    }
                }
                Some(Expr::Index(idx)) => {
                    self.infer_expr(Expr::Index(idx), scope, ctx);
                    if let Some(Expr::Ident(ident)) = idx.receiver() {
                        if let Some(name) = ident.name() {
                            if let Some(sym) = self.scopes.resolve(scope, name, ident.range().start()) {
                                if self.scopes.symbol(sym).declared_type.is_none() {
                                    self.container_profiles
                                        .entry(sym)
                                        .or_default()
                                        .observe_element(rhs_typed.ty.clone(), rhs_typed.confidence);
                                }
                            }
                        }
                    }
                }
                Some(other) => {
                    self.infer_expr(other, scope, ctx);
                }
                None => {}
            }
            return rhs_typed;
        }

        let lhs_typed = b.lhs().map(|l| self.infer_expr(l, scope, ctx));
        let rhs_typed = b.rhs().map(|r| self.infer_expr(r, scope, ctx));

        if matches!(operator, SyntaxKind::AND_KW | SyntaxKind::AMP_AMP | SyntaxKind::OR_KW | SyntaxKind::PIPE_PIPE) {
            return Typed::strict(SemanticType::concrete("bool"));
        }
        if matches!(
            operator,
            SyntaxKind::EQ_EQ | SyntaxKind::NOT_EQ | SyntaxKind::LT | SyntaxKind::GT | SyntaxKind::LT_EQ | SyntaxKind::GT_EQ
        ) {
            return Typed::strict(SemanticType::concrete("bool"));
        }

        let Some(op_kind) = operator_kind(operator) else {
            return Typed::variant();
        };
        match (lhs_typed, rhs_typed) {
            (Some(lhs), Some(rhs)) => {
                let (SemanticType::Concrete(l), SemanticType::Concrete(r)) = (&lhs.ty, &rhs.ty) else {
                    return Typed::name_match(SemanticType::Variant);
                };
                match self.provider.resolve_operator(l, op_kind, r) {
                    Some(result) => Typed::combine(&lhs, &rhs, SemanticType::concrete(result)),
                    None => Typed::name_match(SemanticType::Variant),
                }
            }
            _ => Typed::variant(),
        }
    }

    fn infer_call(&mut self, call: gdlint_ast::cst::CallExpr<'t>, scope: ScopeId, ctx: &NarrowingContext) -> Typed {
        let arg_types: Vec<SemanticType> = call
            .args()
            .into_iter()
            .flat_map(|args| args.args())
            .map(|a| self.infer_expr(a, scope, ctx).ty)
            .collect();

        match call.callee() {
            Some(Expr::Member(member)) => {
                let Some(method_name) = member.member_name() else {
                    return Typed::variant();
                };
                let Some(receiver) = member.receiver() else {
                    return Typed::variant();
                };
                let receiver_typed = self.infer_expr(receiver, scope, ctx);
                self.record_container_append(receiver, method_name, &arg_types, scope);
                self.member_call_result(&receiver_typed, method_name, &arg_types, receiver, scope)
            }
            Some(Expr::Ident(ident)) => {
                let Some(name) = ident.name() else { return Typed::variant() };
                match self.provider.global_function(name) {
                    Some(info) => match info.return_type {
                        Some(ty) => Typed::potential(SemanticType::concrete(ty)),
                        None => Typed::name_match(SemanticType::Variant),
                    },
                    None => Typed::name_match(SemanticType::Variant),
                }
            }
            Some(other) => {
                self.infer_expr(other, scope, ctx);
                Typed::variant()
            }
            None => Typed::variant(),
        }
    }

    /// Wraps a member/function's declared return type `Nullable` when the
    /// provider reports that type as nullable (§3 "Nullable(inner)"), so a
    /// chained `.get_parent().get_parent()` carries the nullability through
    /// without each rule re-consulting the provider itself.
    fn returned_type(&self, return_type: Option<&str>) -> SemanticType {
        match return_type {
            Some(ty) if self.provider.is_nullable(ty) => SemanticType::nullable(SemanticType::concrete(ty)),
            Some(ty) => SemanticType::concrete(ty),
            None => SemanticType::Variant,
        }
    }

    fn member_call_result(
        &mut self,
        receiver_typed: &Typed,
        method_name: &str,
        arg_types: &[SemanticType],
        receiver_expr: Expr<'t>,
        scope: ScopeId,
    ) -> Typed {
        match &receiver_typed.ty {
            SemanticType::Concrete(type_name) => match self.provider.member(type_name, method_name) {
                Some(member) => Typed::new(
                    self.returned_type(member.return_type.as_deref()),
                    receiver_typed.confidence,
                ),
                None => Typed::potential(SemanticType::Variant),
            },
            SemanticType::Union(u) => {
                let results: Vec<_> = u
                    .members
                    .iter()
                    .filter_map(|m| self.provider.member(m, method_name))
                    .filter_map(|m| m.return_type)
                    .map(SemanticType::concrete)
                    .collect();
                Typed::potential(SemanticType::union_of(results))
            }
            _ => {
                self.record_duck_method(receiver_expr, method_name, arg_types, scope);
                Typed::name_match(SemanticType::Variant)
            }
        }
    }

    fn infer_member(&mut self, member: gdlint_ast::cst::MemberExpr<'t>, scope: ScopeId, ctx: &NarrowingContext) -> Typed {
        let Some(method_name) = member.member_name() else {
            return Typed::variant();
        };
        let Some(receiver) = member.receiver() else {
            return Typed::variant();
        };
        let receiver_typed = self.infer_expr(receiver, scope, ctx);
        match &receiver_typed.ty {
            SemanticType::Concrete(type_name) => match self.provider.member(type_name, method_name) {
                Some(info) => Typed::new(
                    self.returned_type(info.return_type.as_deref()),
                    receiver_typed.confidence,
                ),
                None => Typed::potential(SemanticType::Variant),
            },
            _ => {
                if let Expr::Ident(ident) = receiver {
                    if let Some(name) = ident.name() {
                        if let Some(sym) = self.scopes.resolve(scope, name, ident.range().start()) {
                            self.duck_constraints.entry(sym).or_default().require_property(method_name);
                        }
                    }
                }
                Typed::name_match(SemanticType::Variant)
            }
        }
    }

    /// Records an element-type observation for `container.append(x)` and
    /// friends so an untyped local array's element type can be
    /// reconstructed from its call sites (§4.4 "Container element
    /// reconstruction").
    fn record_container_append(&mut self, receiver: Expr<'t>, method_name: &str, arg_types: &[SemanticType], scope: ScopeId) {
        if !matches!(method_name, "append" | "push_back" | "push_front" | "insert") {
            return;
        }
        let Some(element_ty) = arg_types.last() else { return };
        let Expr::Ident(ident) = receiver else { return };
        let Some(name) = ident.name() else { return };
        let Some(sym) = self.scopes.resolve(scope, name, ident.range().start()) else { return };
        if self.scopes.symbol(sym).declared_type.is_none() {
            self.container_profiles.entry(sym).or_default().observe_element(element_ty.clone(), Confidence::Potential);
        }
    }

    fn record_duck_method(&mut self, receiver_expr: Expr<'t>, method_name: &str, arg_types: &[SemanticType], scope: ScopeId) {
        if let Expr::Ident(ident) = receiver_expr {
            if let Some(name) = ident.name() {
                if let Some(sym) = self.scopes.resolve(scope, name, ident.range().start()) {
                    self.duck_constraints
                        .entry(sym)
                        .or_default()
                        .require_method(method_name, arg_types.to_vec());
                }
            }
        }
    }

    fn infer_index(&mut self, index: gdlint_ast::cst::IndexExpr<'t>, scope: ScopeId, ctx: &NarrowingContext) -> Typed {
        let receiver_typed = index.receiver().map(|r| self.infer_expr(r, scope, ctx));
        let index_typed = index.index().map(|i| self.infer_expr(i, scope, ctx));

        let Some(receiver_typed) = receiver_typed else {
            return Typed::variant();
        };
        match &receiver_typed.ty {
            SemanticType::Concrete(type_name) if self.provider.is_packed_array(type_name) => self
                .provider
                .packed_array_element_type(type_name)
                .map(|t| Typed::strict(SemanticType::concrete(t)))
                .unwrap_or_else(Typed::variant),
            SemanticType::Concrete(type_name) if self.provider.is_container(type_name) => {
                // An untyped `Dictionary` indexed with a string-literal key
                // is name-match confidence (§4.4): the key identifies a
                // specific entry the engine cannot type statically.
                match &index_typed {
                    Some(Typed { ty: SemanticType::Concrete(k), .. }) if &**k == "String" => {
                        Typed::name_match(SemanticType::Variant)
                    }
                    _ => self
                        .provider
                        .indexer_result_type(type_name)
                        .map(|t| Typed::potential(SemanticType::concrete(t)))
                        .unwrap_or_else(|| Typed::potential(SemanticType::Variant)),
                }
            }
            _ => Typed::name_match(SemanticType::Variant),
        }
    }

    /// Extracts the narrowing a condition implies for its true and false
    /// branches (§4.5). Only conditions shaped as `x is T`, `x in C`,
    /// `x.has_method/has_signal/has(S)`, `not <cond>`, and boolean
    /// combinations of these recognize a variable to narrow; anything else
    /// leaves both branches at the incoming context unchanged.
    fn narrow_condition(&self, expr: Expr<'t>, ctx: &NarrowingContext) -> (NarrowingContext, NarrowingContext) {
        match expr {
            Expr::Is(is_expr) => {
                let (Some(Expr::Ident(ident)), Some(type_node)) = (is_expr.operand(), is_expr.type_name()) else {
                    return (ctx.clone(), ctx.clone());
                };
                let (Some(name), Some(type_name)) = (ident.name(), type_node_name(type_node)) else {
                    return (ctx.clone(), ctx.clone());
                };
                // §8 "Union intersection": when `x`'s pre-branch type is a
                // `Union`, `is X` keeps only the members assignable to `X`
                // rather than replacing the whole type with `X`.
                let true_ty = match self.expr_types.get(&ident.node_id()).map(|typed| &typed.ty) {
                    Some(SemanticType::Union(union)) => {
                        let members: Vec<TypeName> = union.members.iter().cloned().collect();
                        let kept = NarrowingContext::intersect_union_with_is(&members, &type_name, |src, dst| {
                            self.provider.is_assignable_to(src, dst)
                        });
                        SemanticType::union_of(kept.into_iter().map(SemanticType::Concrete))
                    }
                    _ => SemanticType::concrete(type_name.clone()),
                };
                let mut t = ctx.clone();
                t.narrow_is_true(name, true_ty);
                let mut f = ctx.clone();
                f.narrow_is_false(name, SemanticType::concrete(type_name));
                (t, f)
            }
            Expr::In(in_expr) => {
                let (Some(Expr::Ident(ident)), Some(haystack)) = (in_expr.needle(), in_expr.haystack()) else {
                    return (ctx.clone(), ctx.clone());
                };
                let Some(name) = ident.name() else {
                    return (ctx.clone(), ctx.clone());
                };
                let haystack_ty = haystack.node_id();
                let element_ty = self
                    .expr_types
                    .get(&haystack_ty)
                    .and_then(|typed| match &typed.ty {
                        SemanticType::Concrete(tn) => self.provider.iterator_element_type(tn),
                        _ => None,
                    })
                    .map(SemanticType::concrete)
                    .unwrap_or(SemanticType::Variant);
                let mut t = ctx.clone();
                t.narrow_in(name, element_ty);
                (t, ctx.clone())
            }
            Expr::Unary(u) if matches!(u.operator(), Some(SyntaxKind::NOT_KW | SyntaxKind::BANG)) => {
                match u.operand() {
                    Some(operand) => {
                        let (t, f) = self.narrow_condition(operand, ctx);
                        (f, t)
                    }
                    None => (ctx.clone(), ctx.clone()),
                }
            }
            Expr::Call(call) => self.narrow_has_call(call, ctx),
            Expr::Binary(b) => self.narrow_binary(b, ctx),
            Expr::Paren(p) => match p.inner() {
                Some(inner) => self.narrow_condition(inner, ctx),
                None => (ctx.clone(), ctx.clone()),
            },
            _ => (ctx.clone(), ctx.clone()),
        }
    }

    fn narrow_has_call(&self, call: gdlint_ast::cst::CallExpr<'t>, ctx: &NarrowingContext) -> (NarrowingContext, NarrowingContext) {
        let Some(Expr::Member(member)) = call.callee() else {
            return (ctx.clone(), ctx.clone());
        };
        let Some(method) = member.member_name() else {
            return (ctx.clone(), ctx.clone());
        };
        if !matches!(method, "has_method" | "has_signal" | "has") {
            return (ctx.clone(), ctx.clone());
        }
        let (Some(Expr::Ident(ident)), Some(args)) = (member.receiver(), call.args()) else {
            return (ctx.clone(), ctx.clone());
        };
        let Some(name) = ident.name() else {
            return (ctx.clone(), ctx.clone());
        };
        let Some(Expr::Literal(lit)) = args.args().next() else {
            return (ctx.clone(), ctx.clone());
        };
        let target = self.tree.to_text(gdlint_ast::Element::Node(lit.node_id()));
        let target = target.trim_matches(|c| c == '"' || c == '\'');

        let mut t = ctx.clone();
        match method {
            "has_method" => t.narrow_has_method(name, target),
            "has_signal" => t.narrow_has_signal(name, target),
            _ => t.narrow_has_property(name, target),
        }
        (t, ctx.clone())
    }

    fn narrow_binary(&self, b: gdlint_ast::cst::BinaryExpr<'t>, ctx: &NarrowingContext) -> (NarrowingContext, NarrowingContext) {
        let (Some(operator), Some(lhs), Some(rhs)) = (b.operator(), b.lhs(), b.rhs()) else {
            return (ctx.clone(), ctx.clone());
        };
        match operator {
            SyntaxKind::AND_KW | SyntaxKind::AMP_AMP => {
                let (lt, lf) = self.narrow_condition(lhs, ctx);
                let (rt, rf) = self.narrow_condition(rhs, ctx);
                (NarrowingContext::intersect(&lt, &rt), NarrowingContext::union(&lf, &rf))
            }
            SyntaxKind::OR_KW | SyntaxKind::PIPE_PIPE => {
                let (lt, lf) = self.narrow_condition(lhs, ctx);
                let (rt, rf) = self.narrow_condition(rhs, ctx);
                (NarrowingContext::union(&lt, &rt), NarrowingContext::intersect(&lf, &rf))
            }
            // §4.5 "x == null / x != null", "x == L where L is a literal",
            // and "typeof(x) == TYPE_K" — `narrow_equality` computes the
            // pair for `==`; `!=` is the same check with the branches
            // swapped.
            SyntaxKind::EQ_EQ | SyntaxKind::NOT_EQ => {
                let (eq_true, eq_false) = self.narrow_equality(lhs, rhs, ctx);
                if operator == SyntaxKind::EQ_EQ {
                    (eq_true, eq_false)
                } else {
                    (eq_false, eq_true)
                }
            }
            _ => (ctx.clone(), ctx.clone()),
        }
    }

    /// The narrowing pair for `lhs == rhs`, checked against both operand
    /// orders since GDScript allows either side to carry the variable
    /// (§4.5). Returns `(ctx, ctx)` unchanged when neither side matches a
    /// recognized shape.
    fn narrow_equality(&self, lhs: Expr<'t>, rhs: Expr<'t>, ctx: &NarrowingContext) -> (NarrowingContext, NarrowingContext) {
        if let Some(name) = as_null_check(lhs, rhs).or_else(|| as_null_check(rhs, lhs)) {
            let mut not_null = ctx.clone();
            not_null.narrow_not_null(name);
            return (ctx.clone(), not_null);
        }
        if let Some((name, ty)) = as_typeof_check(lhs, rhs).or_else(|| as_typeof_check(rhs, lhs)) {
            let mut t = ctx.clone();
            t.narrow_is_true(name, ty);
            return (t, ctx.clone());
        }
        if let Some((name, ty)) = as_literal_check(lhs, rhs).or_else(|| as_literal_check(rhs, lhs)) {
            let mut t = ctx.clone();
            t.narrow_is_true(name, ty);
            t.narrow_not_null(name);
            return (t, ctx.clone());
        }
        (ctx.clone(), ctx.clone())
    }

    /// A symbol declared directly in `scope` (not an ancestor), used for
    /// loop iterators and match bindings whose declaring scope is known
    /// exactly rather than found through name resolution.
    fn symbol_in_scope(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        self.scopes.symbols().find(|(_, s)| s.scope == scope && &*s.name == name).map(|(id, _)| id)
    }
}

fn build_node_scope_map(scopes: &ScopeTree) -> FxHashMap<NodeId, ScopeId> {
    let mut map = FxHashMap::default();
    let mut stack = vec![scopes.root()];
    while let Some(scope) = stack.pop() {
        if let Some(node) = scopes.node_of(scope) {
            map.insert(node, scope);
        }
        stack.extend(scopes.children_of(scope).iter().copied());
    }
    map
}

fn is_assignment_operator(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::EQ
            | SyntaxKind::PLUS_EQ
            | SyntaxKind::MINUS_EQ
            | SyntaxKind::STAR_EQ
            | SyntaxKind::SLASH_EQ
            | SyntaxKind::PERCENT_EQ
            | SyntaxKind::AMP_EQ
            | SyntaxKind::PIPE_EQ
            | SyntaxKind::CARET_EQ
            | SyntaxKind::SHL_EQ
            | SyntaxKind::SHR_EQ
    )
}

fn operator_kind(kind: SyntaxKind) -> Option<OperatorKind> {
    Some(match kind {
        SyntaxKind::PLUS => OperatorKind::Add,
        SyntaxKind::MINUS => OperatorKind::Sub,
        SyntaxKind::STAR => OperatorKind::Mul,
        SyntaxKind::STAR_STAR => OperatorKind::Pow,
        SyntaxKind::SLASH => OperatorKind::Div,
        SyntaxKind::PERCENT => OperatorKind::Mod,
        SyntaxKind::AMP => OperatorKind::BitAnd,
        SyntaxKind::PIPE => OperatorKind::BitOr,
        SyntaxKind::CARET => OperatorKind::BitXor,
        SyntaxKind::SHL => OperatorKind::Shl,
        SyntaxKind::SHR => OperatorKind::Shr,
        _ => return None,
    })
}

/// The concrete type a literal token denotes (§4.4 "Integer/float/string/
/// bool/null literal"). Shared by literal inference and the `x == L`
/// equality narrowing (§4.5).
fn literal_kind_to_type(kind: SyntaxKind) -> Option<SemanticType> {
    Some(match kind {
        SyntaxKind::INT_LITERAL => SemanticType::concrete("int"),
        SyntaxKind::FLOAT_LITERAL => SemanticType::concrete("float"),
        SyntaxKind::STRING_LITERAL => SemanticType::concrete("String"),
        SyntaxKind::STRING_NAME_LITERAL => SemanticType::concrete("StringName"),
        SyntaxKind::BOOL_LITERAL => SemanticType::concrete("bool"),
        SyntaxKind::NULL_LITERAL => SemanticType::null(),
        SyntaxKind::NODE_PATH_LITERAL => SemanticType::concrete("NodePath"),
        _ => return None,
    })
}

/// Maps a global `TYPE_*` constant name to the concrete type it denotes,
/// mirroring the engine's `Variant.Type` enum (§4.5 "typeof(x) == TYPE_K
/// narrows to the corresponding concrete type per provider's TYPE
/// constants").
fn godot_type_constant(name: &str) -> Option<&'static str> {
    Some(match name {
        "TYPE_NIL" => "null",
        "TYPE_BOOL" => "bool",
        "TYPE_INT" => "int",
        "TYPE_FLOAT" => "float",
        "TYPE_STRING" => "String",
        "TYPE_VECTOR2" => "Vector2",
        "TYPE_VECTOR2I" => "Vector2i",
        "TYPE_RECT2" => "Rect2",
        "TYPE_RECT2I" => "Rect2i",
        "TYPE_VECTOR3" => "Vector3",
        "TYPE_VECTOR3I" => "Vector3i",
        "TYPE_TRANSFORM2D" => "Transform2D",
        "TYPE_VECTOR4" => "Vector4",
        "TYPE_VECTOR4I" => "Vector4i",
        "TYPE_PLANE" => "Plane",
        "TYPE_QUATERNION" => "Quaternion",
        "TYPE_AABB" => "AABB",
        "TYPE_BASIS" => "Basis",
        "TYPE_TRANSFORM3D" => "Transform3D",
        "TYPE_PROJECTION" => "Projection",
        "TYPE_COLOR" => "Color",
        "TYPE_STRING_NAME" => "StringName",
        "TYPE_NODE_PATH" => "NodePath",
        "TYPE_RID" => "RID",
        "TYPE_OBJECT" => "Object",
        "TYPE_CALLABLE" => "Callable",
        "TYPE_SIGNAL" => "Signal",
        "TYPE_DICTIONARY" => "Dictionary",
        "TYPE_ARRAY" => "Array",
        "TYPE_PACKED_BYTE_ARRAY" => "PackedByteArray",
        "TYPE_PACKED_INT32_ARRAY" => "PackedInt32Array",
        "TYPE_PACKED_INT64_ARRAY" => "PackedInt64Array",
        "TYPE_PACKED_FLOAT32_ARRAY" => "PackedFloat32Array",
        "TYPE_PACKED_FLOAT64_ARRAY" => "PackedFloat64Array",
        "TYPE_PACKED_STRING_ARRAY" => "PackedStringArray",
        "TYPE_PACKED_VECTOR2_ARRAY" => "PackedVector2Array",
        "TYPE_PACKED_VECTOR3_ARRAY" => "PackedVector3Array",
        "TYPE_PACKED_COLOR_ARRAY" => "PackedColorArray",
        _ => return None,
    })
}

/// `x == null` / `null == x` (§4.5): the identifier side, if the other
/// side is the `null` literal.
fn as_null_check<'t>(var_side: Expr<'t>, other_side: Expr<'t>) -> Option<&'t str> {
    let Expr::Ident(ident) = var_side else { return None };
    let Expr::Literal(lit) = other_side else { return None };
    if lit.token_kind() != Some(SyntaxKind::NULL_LITERAL) {
        return None;
    }
    ident.name()
}

/// `x == L` for a non-null literal `L` (§4.5): `x`'s concrete type
/// becomes `L`'s literal type and `x` is known not-null.
fn as_literal_check<'t>(var_side: Expr<'t>, other_side: Expr<'t>) -> Option<(&'t str, SemanticType)> {
    let Expr::Ident(ident) = var_side else { return None };
    let Expr::Literal(lit) = other_side else { return None };
    let kind = lit.token_kind()?;
    if kind == SyntaxKind::NULL_LITERAL {
        return None;
    }
    let ty = literal_kind_to_type(kind)?;
    Some((ident.name()?, ty))
}

/// `typeof(x) == TYPE_K` (§4.5): narrows `x` to the concrete type the
/// provider's `TYPE_*` constant denotes.
fn as_typeof_check<'t>(call_side: Expr<'t>, const_side: Expr<'t>) -> Option<(&'t str, SemanticType)> {
    let Expr::Call(call) = call_side else { return None };
    let Expr::Ident(constant) = const_side else { return None };
    let Some(Expr::Ident(callee)) = call.callee() else { return None };
    if callee.name()? != "typeof" {
        return None;
    }
    let mut args = call.args()?.args();
    let Some(Expr::Ident(operand)) = args.next() else { return None };
    if args.next().is_some() {
        return None;
    }
    let concrete = godot_type_constant(constant.name()?)?;
    Some((operand.name()?, SemanticType::concrete(concrete)))
}

fn type_node_name(type_node: TypeNode<'_>) -> Option<Box<str>> {
    match type_node {
        TypeNode::Simple(simple) => simple.name().map(Into::into),
        TypeNode::Generic(generic) => generic.base_name().map(Into::into),
        TypeNode::Inferred(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::collect;
    use crate::provider::{NullProjectContext, NullTypeProvider};

    fn run_on(src: &str) -> (gdlint_ast::Tree, ScopeTree) {
        let tree = gdlint_parser::parse(src).unwrap();
        let (scopes, _) = collect(&tree);
        (tree, scopes)
    }

    #[test]
    fn arithmetic_of_two_ints_resolves_to_int() {
        let (tree, scopes) = run_on("extends Node\n\nfunc f():\n    var x = 1 + 2\n");
        let provider = NullTypeProvider;
        let project = NullProjectContext;
        let mut inferencer = Inferencer::new(&tree, &scopes, &provider, &project);
        inferencer.run();
        let (expr_types, _, _, _, _) = inferencer.into_parts();
        let has_int = expr_types.values().any(|t| t.ty == SemanticType::concrete("int"));
        assert!(has_int);
    }

    #[test]
    fn untyped_assignment_is_reconstructed_from_observed_type() {
        let (tree, scopes) = run_on("extends Node\n\nfunc f():\n    var x\n    x = \"hi\"\n");
        let provider = NullTypeProvider;
        let project = NullProjectContext;
        let mut inferencer = Inferencer::new(&tree, &scopes, &provider, &project);
        inferencer.run();
        let (_, _, variable_profiles, _, _) = inferencer.into_parts();
        let reconstructed = variable_profiles.values().find_map(|p| p.reconstruct());
        assert_eq!(reconstructed, Some(SemanticType::concrete("String")));
    }

    #[test]
    fn is_narrows_inside_the_then_branch() {
        let src = "extends Node\n\nfunc f(x):\n    if x is Node2D:\n        var y = x\n";
        let (tree, scopes) = run_on(src);
        let provider = NullTypeProvider;
        let project = NullProjectContext;
        let mut inferencer = Inferencer::new(&tree, &scopes, &provider, &project);
        inferencer.run();
        let (expr_types, _, _, _, _) = inferencer.into_parts();
        let narrowed = expr_types.values().any(|t| t.ty == SemanticType::concrete("Node2D") && t.confidence == Confidence::Strict);
        assert!(narrowed);
    }

    #[test]
    fn assert_narrows_statements_that_follow_it() {
        let src = "extends Node\n\nfunc f(x):\n    assert(x is Node2D)\n    var y = x\n";
        let (tree, scopes) = run_on(src);
        let provider = NullTypeProvider;
        let project = NullProjectContext;
        let mut inferencer = Inferencer::new(&tree, &scopes, &provider, &project);
        inferencer.run();
        let (expr_types, _, _, _, _) = inferencer.into_parts();
        let narrowed = expr_types.values().any(|t| t.ty == SemanticType::concrete("Node2D") && t.confidence == Confidence::Strict);
        assert!(narrowed);
    }

    #[test]
    fn narrowing_agreed_by_every_arm_survives_past_the_if() {
        let src = "extends Node\n\nfunc f(x):\n    if x is Node2D:\n        var a = 1\n    else:\n        var b = 2\n    var y = x\n";
        let (tree, scopes) = run_on(src);
        let provider = NullTypeProvider;
        let project = NullProjectContext;
        let mut inferencer = Inferencer::new(&tree, &scopes, &provider, &project);
        inferencer.run();
        let (expr_types, _, _, _, _) = inferencer.into_parts();
        // Neither branch narrows `x` to the same thing (the `else` arm
        // never touches it), so the merge must drop the narrowing rather
        // than leak the `then` branch's `Node2D` past the statement.
        let leaked = expr_types.values().any(|t| t.ty == SemanticType::concrete("Node2D") && t.confidence == Confidence::Strict);
        assert!(!leaked);
    }

    #[test]
    fn equality_with_a_literal_narrows_the_then_branch() {
        let src = "extends Node\n\nfunc f(x):\n    if x == 5:\n        var y = x\n";
        let (tree, scopes) = run_on(src);
        let provider = NullTypeProvider;
        let project = NullProjectContext;
        let mut inferencer = Inferencer::new(&tree, &scopes, &provider, &project);
        inferencer.run();
        let (expr_types, _, _, _, _) = inferencer.into_parts();
        let narrowed = expr_types.values().any(|t| t.ty == SemanticType::concrete("int") && t.confidence == Confidence::Strict);
        assert!(narrowed);
    }

    #[test]
    fn typeof_equality_narrows_the_then_branch() {
        let src = "extends Node\n\nfunc f(x):\n    if typeof(x) == TYPE_STRING:\n        var y = x\n";
        let (tree, scopes) = run_on(src);
        let provider = NullTypeProvider;
        let project = NullProjectContext;
        let mut inferencer = Inferencer::new(&tree, &scopes, &provider, &project);
        inferencer.run();
        let (expr_types, _, _, _, _) = inferencer.into_parts();
        let narrowed = expr_types.values().any(|t| t.ty == SemanticType::concrete("String") && t.confidence == Confidence::Strict);
        assert!(narrowed);
    }

    /// §4.5 "x == null / x != null → controls the not-null flag": the
    /// false branch of `x == null` (equivalently, the true branch of
    /// `x != null`) must carry `not_null`.
    #[test]
    fn null_equality_sets_the_not_null_flag_on_the_non_null_branch() {
        let src = "extends Node\n\nfunc f(x):\n    if x == null:\n        pass\n";
        let (tree, scopes) = run_on(src);
        let provider = NullTypeProvider;
        let project = NullProjectContext;
        let inferencer = Inferencer::new(&tree, &scopes, &provider, &project);

        let source_file = SourceFileNode::cast(&tree, tree.root()).unwrap();
        let func = source_file.class().unwrap().functions().next().unwrap();
        let Some(Stmt::If(if_stmt)) = func.body().unwrap().statements().next() else {
            panic!("expected an if statement");
        };
        let cond = if_stmt.condition().unwrap();

        let (is_null_branch, not_null_branch) = inferencer.narrow_condition(cond, &NarrowingContext::empty());
        assert!(!is_null_branch.get("x").is_some_and(|n| n.not_null));
        assert!(not_null_branch.get("x").unwrap().not_null);
    }

    #[test]
    fn is_narrowing_intersects_a_pre_branch_union_instead_of_replacing_it() {
        let src = "extends Node\n\nfunc f(x):\n    if x is int:\n        pass\n";
        let (tree, scopes) = run_on(src);
        let provider = NullTypeProvider;
        let project = NullProjectContext;
        let mut inferencer = Inferencer::new(&tree, &scopes, &provider, &project);

        let source_file = SourceFileNode::cast(&tree, tree.root()).unwrap();
        let func = source_file.class().unwrap().functions().next().unwrap();
        let Some(Stmt::If(if_stmt)) = func.body().unwrap().statements().next() else {
            panic!("expected an if statement");
        };
        let cond = if_stmt.condition().unwrap();
        let Expr::Is(is_expr) = cond else { panic!("expected an `is` expression") };
        let operand = is_expr.operand().unwrap();
        // Seed `x`'s pre-branch type as `Union(int, String)` the way a
        // variable-usage profile observed across two prior assignments
        // would, without re-deriving that machinery here.
        inferencer.expr_types.insert(
            operand.node_id(),
            Typed::potential(SemanticType::union_of([SemanticType::concrete("int"), SemanticType::concrete("String")])),
        );

        let (true_ctx, _) = inferencer.narrow_condition(cond, &NarrowingContext::empty());
        assert_eq!(true_ctx.get("x").unwrap().concrete, Some(SemanticType::concrete("int")));
    }
}
