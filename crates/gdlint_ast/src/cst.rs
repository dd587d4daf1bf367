//! Typed accessors over the untyped form (§3, §4.2 "Polymorphism").
//!
//! The conversion from an untyped [`NodeId`] to a typed wrapper is zero-cost
//! at runtime (a `NodeId` plus a borrow of the owning [`Tree`]); accessors
//! project into fixed form positions rather than caching anything, so they
//! stay correct across `insert_before`/`insert_after`/`remove` (§4.2
//! "Mutation goes through form primitives only; accessors remain
//! consistent because they project, they do not cache").

use crate::node::Element;
use crate::token::TokenId;
use crate::{NodeId, SyntaxKind, Tree};

/// Implemented by every typed CST wrapper (§4.2 "Polymorphism": form
/// access, parent reference, source span derivation, visitor acceptance,
/// cloning are common to all node kinds; variants differ only in which
/// named children they expose).
pub trait CstNode<'t>: Sized {
    const KIND: SyntaxKind;

    fn wrap(tree: &'t Tree, id: NodeId) -> Self;

    fn node_id(&self) -> NodeId;

    fn tree(&self) -> &'t Tree;

    fn cast(tree: &'t Tree, id: NodeId) -> Option<Self> {
        (tree.node(id).kind() == Self::KIND).then(|| Self::wrap(tree, id))
    }

    fn to_text(&self) -> String {
        self.tree().to_text(Element::Node(self.node_id()))
    }

    fn range(&self) -> gdlint_text_size::TextRange {
        self.tree().range_of(Element::Node(self.node_id()))
    }
}

macro_rules! cst_node {
    ($name:ident, $kind:expr) => {
        #[derive(Clone, Copy)]
        pub struct $name<'t> {
            tree: &'t Tree,
            id: NodeId,
        }

        impl<'t> CstNode<'t> for $name<'t> {
            const KIND: SyntaxKind = $kind;

            fn wrap(tree: &'t Tree, id: NodeId) -> Self {
                Self { tree, id }
            }

            fn node_id(&self) -> NodeId {
                self.id
            }

            fn tree(&self) -> &'t Tree {
                self.tree
            }
        }
    };
}

fn child<'t, T: CstNode<'t>>(tree: &'t Tree, parent: NodeId) -> Option<T> {
    tree.first_child_node_of_kind(parent, T::KIND).map(|id| T::wrap(tree, id))
}

fn children<'t, T: CstNode<'t>>(tree: &'t Tree, parent: NodeId) -> impl Iterator<Item = T> + 't {
    tree.child_nodes_of_kind(parent, T::KIND).map(move |id| T::wrap(tree, id))
}

fn ident_text<'t>(tree: &'t Tree, parent: NodeId) -> Option<&'t str> {
    tree.first_child_token_of_kind(parent, SyntaxKind::IDENT)
        .map(|id| tree.token(id).text())
}

// ── Root ─────────────────────────────────────────────────────────────

cst_node!(SourceFileNode, SyntaxKind::SOURCE_FILE);

impl<'t> SourceFileNode<'t> {
    pub fn class(self) -> Option<ClassDecl<'t>> {
        child(self.tree, self.id)
    }
}

// ── Declarations ─────────────────────────────────────────────────────

cst_node!(ClassDecl, SyntaxKind::CLASS_DECL);

impl<'t> ClassDecl<'t> {
    pub fn extends_clause(self) -> Option<ExtendsClause<'t>> {
        child(self.tree, self.id)
    }

    pub fn class_name_clause(self) -> Option<ClassNameClause<'t>> {
        child(self.tree, self.id)
    }

    pub fn functions(self) -> impl Iterator<Item = FuncDecl<'t>> + 't {
        children(self.tree, self.id)
    }

    pub fn variables(self) -> impl Iterator<Item = VarDecl<'t>> + 't {
        children(self.tree, self.id)
    }

    pub fn constants(self) -> impl Iterator<Item = ConstDecl<'t>> + 't {
        children(self.tree, self.id)
    }

    pub fn properties(self) -> impl Iterator<Item = PropertyDecl<'t>> + 't {
        children(self.tree, self.id)
    }

    pub fn signals(self) -> impl Iterator<Item = SignalDecl<'t>> + 't {
        children(self.tree, self.id)
    }

    pub fn enums(self) -> impl Iterator<Item = EnumDecl<'t>> + 't {
        children(self.tree, self.id)
    }

    pub fn inner_classes(self) -> impl Iterator<Item = InnerClassDecl<'t>> + 't {
        children(self.tree, self.id)
    }
}

cst_node!(ExtendsClause, SyntaxKind::EXTENDS_CLAUSE);

impl<'t> ExtendsClause<'t> {
    pub fn base_name(self) -> Option<&'t str> {
        ident_text(self.tree, self.id)
    }
}

cst_node!(ClassNameClause, SyntaxKind::CLASS_NAME_CLAUSE);

impl<'t> ClassNameClause<'t> {
    pub fn name(self) -> Option<&'t str> {
        ident_text(self.tree, self.id)
    }
}

cst_node!(InnerClassDecl, SyntaxKind::INNER_CLASS_DECL);

impl<'t> InnerClassDecl<'t> {
    pub fn name(self) -> Option<&'t str> {
        ident_text(self.tree, self.id)
    }

    pub fn functions(self) -> impl Iterator<Item = FuncDecl<'t>> + 't {
        children(self.tree, self.id)
    }

    pub fn variables(self) -> impl Iterator<Item = VarDecl<'t>> + 't {
        children(self.tree, self.id)
    }

    pub fn constants(self) -> impl Iterator<Item = ConstDecl<'t>> + 't {
        children(self.tree, self.id)
    }

    pub fn properties(self) -> impl Iterator<Item = PropertyDecl<'t>> + 't {
        children(self.tree, self.id)
    }

    pub fn signals(self) -> impl Iterator<Item = SignalDecl<'t>> + 't {
        children(self.tree, self.id)
    }

    pub fn enums(self) -> impl Iterator<Item = EnumDecl<'t>> + 't {
        children(self.tree, self.id)
    }

    pub fn inner_classes(self) -> impl Iterator<Item = InnerClassDecl<'t>> + 't {
        children(self.tree, self.id)
    }
}

cst_node!(FuncDecl, SyntaxKind::FUNC_DECL);

impl<'t> FuncDecl<'t> {
    pub fn name(self) -> Option<&'t str> {
        ident_text(self.tree, self.id)
    }

    pub fn params(self) -> Option<ParamList<'t>> {
        child(self.tree, self.id)
    }

    pub fn return_type(self) -> Option<TypeNode<'t>> {
        type_child(self.tree, self.id)
    }

    pub fn body(self) -> Option<Block<'t>> {
        child(self.tree, self.id)
    }

    pub fn is_static(self) -> bool {
        self.tree.first_child_token_of_kind(self.id, SyntaxKind::STATIC_KW).is_some()
    }
}

cst_node!(ParamList, SyntaxKind::PARAM_LIST);

impl<'t> ParamList<'t> {
    pub fn params(self) -> impl Iterator<Item = Param<'t>> + 't {
        children(self.tree, self.id)
    }
}

cst_node!(Param, SyntaxKind::PARAM);

impl<'t> Param<'t> {
    pub fn name(self) -> Option<&'t str> {
        ident_text(self.tree, self.id)
    }

    pub fn declared_type(self) -> Option<TypeNode<'t>> {
        type_child(self.tree, self.id)
    }

    pub fn default_value(self) -> Option<Expr<'t>> {
        expr_child(self.tree, self.id)
    }
}

cst_node!(VarDecl, SyntaxKind::VAR_DECL);

impl<'t> VarDecl<'t> {
    pub fn name(self) -> Option<&'t str> {
        ident_text(self.tree, self.id)
    }

    pub fn declared_type(self) -> Option<TypeNode<'t>> {
        type_child(self.tree, self.id)
    }

    pub fn initializer(self) -> Option<Expr<'t>> {
        expr_child(self.tree, self.id)
    }

    pub fn is_onready(self) -> bool {
        self.tree.first_child_token_of_kind(self.id, SyntaxKind::ONREADY_KW).is_some()
    }
}

cst_node!(ConstDecl, SyntaxKind::CONST_DECL);

impl<'t> ConstDecl<'t> {
    pub fn name(self) -> Option<&'t str> {
        ident_text(self.tree, self.id)
    }

    pub fn declared_type(self) -> Option<TypeNode<'t>> {
        type_child(self.tree, self.id)
    }

    pub fn initializer(self) -> Option<Expr<'t>> {
        expr_child(self.tree, self.id)
    }
}

cst_node!(PropertyDecl, SyntaxKind::PROPERTY_DECL);

impl<'t> PropertyDecl<'t> {
    pub fn name(self) -> Option<&'t str> {
        ident_text(self.tree, self.id)
    }

    pub fn declared_type(self) -> Option<TypeNode<'t>> {
        type_child(self.tree, self.id)
    }

    pub fn getter(self) -> Option<PropertyGetBody<'t>> {
        child(self.tree, self.id)
    }

    pub fn setter(self) -> Option<PropertySetBody<'t>> {
        child(self.tree, self.id)
    }
}

cst_node!(PropertyGetBody, SyntaxKind::PROPERTY_GET_BODY);
cst_node!(PropertySetBody, SyntaxKind::PROPERTY_SET_BODY);

impl<'t> PropertyGetBody<'t> {
    pub fn body(self) -> Option<Block<'t>> {
        child(self.tree, self.id)
    }
}

impl<'t> PropertySetBody<'t> {
    pub fn body(self) -> Option<Block<'t>> {
        child(self.tree, self.id)
    }

    pub fn param(self) -> Option<Param<'t>> {
        child(self.tree, self.id)
    }
}

cst_node!(SignalDecl, SyntaxKind::SIGNAL_DECL);

impl<'t> SignalDecl<'t> {
    pub fn name(self) -> Option<&'t str> {
        ident_text(self.tree, self.id)
    }

    pub fn params(self) -> Option<ParamList<'t>> {
        child(self.tree, self.id)
    }
}

cst_node!(EnumDecl, SyntaxKind::ENUM_DECL);

impl<'t> EnumDecl<'t> {
    pub fn name(self) -> Option<&'t str> {
        ident_text(self.tree, self.id)
    }

    pub fn values(self) -> impl Iterator<Item = EnumValue<'t>> + 't {
        children(self.tree, self.id)
    }
}

cst_node!(EnumValue, SyntaxKind::ENUM_VALUE);

impl<'t> EnumValue<'t> {
    pub fn name(self) -> Option<&'t str> {
        ident_text(self.tree, self.id)
    }

    pub fn explicit_value(self) -> Option<Expr<'t>> {
        expr_child(self.tree, self.id)
    }
}

// ── Type nodes ───────────────────────────────────────────────────────

#[derive(Clone, Copy)]
pub enum TypeNode<'t> {
    Simple(TypeSimple<'t>),
    Generic(TypeGeneric<'t>),
    Inferred(TypeInferred<'t>),
}

impl<'t> CstNode<'t> for TypeNode<'t> {
    const KIND: SyntaxKind = SyntaxKind::TYPE_SIMPLE; // overridden below

    fn wrap(tree: &'t Tree, id: NodeId) -> Self {
        match tree.node(id).kind() {
            SyntaxKind::TYPE_GENERIC => Self::Generic(TypeGeneric::wrap(tree, id)),
            SyntaxKind::TYPE_INFERRED => Self::Inferred(TypeInferred::wrap(tree, id)),
            _ => Self::Simple(TypeSimple::wrap(tree, id)),
        }
    }

    fn node_id(&self) -> NodeId {
        match self {
            Self::Simple(n) => n.node_id(),
            Self::Generic(n) => n.node_id(),
            Self::Inferred(n) => n.node_id(),
        }
    }

    fn tree(&self) -> &'t Tree {
        match self {
            Self::Simple(n) => n.tree(),
            Self::Generic(n) => n.tree(),
            Self::Inferred(n) => n.tree(),
        }
    }

    fn cast(tree: &'t Tree, id: NodeId) -> Option<Self> {
        matches!(
            tree.node(id).kind(),
            SyntaxKind::TYPE_SIMPLE | SyntaxKind::TYPE_GENERIC | SyntaxKind::TYPE_INFERRED
        )
        .then(|| Self::wrap(tree, id))
    }
}

fn type_child<'t>(tree: &'t Tree, parent: NodeId) -> Option<TypeNode<'t>> {
    tree.form_of(parent).iter().find_map(|&e| match e {
        Element::Node(id) => TypeNode::cast(tree, id),
        Element::Token(_) => None,
    })
}

cst_node!(TypeSimple, SyntaxKind::TYPE_SIMPLE);

impl<'t> TypeSimple<'t> {
    pub fn name(self) -> Option<&'t str> {
        ident_text(self.tree, self.id)
    }
}

cst_node!(TypeGeneric, SyntaxKind::TYPE_GENERIC);

impl<'t> TypeGeneric<'t> {
    pub fn base_name(self) -> Option<&'t str> {
        ident_text(self.tree, self.id)
    }

    pub fn arguments(self) -> impl Iterator<Item = TypeNode<'t>> + 't {
        self.tree
            .form_of(self.id)
            .iter()
            .filter_map(move |&e| match e {
                Element::Node(id) => TypeNode::cast(self.tree, id),
                Element::Token(_) => None,
            })
    }
}

cst_node!(TypeInferred, SyntaxKind::TYPE_INFERRED);

// Override the `child` helper for the polymorphic `TypeNode` since it is
// not a single `SyntaxKind`.
impl<'t> FuncDecl<'t> {}

// ── Statements & blocks ──────────────────────────────────────────────

cst_node!(Block, SyntaxKind::BLOCK);

impl<'t> Block<'t> {
    pub fn statements(self) -> impl Iterator<Item = Stmt<'t>> + 't {
        self.tree
            .form_of(self.id)
            .iter()
            .filter_map(move |&e| match e {
                Element::Node(id) => Stmt::cast(self.tree, id),
                Element::Token(_) => None,
            })
    }
}

#[derive(Clone, Copy)]
pub enum Stmt<'t> {
    If(IfStmt<'t>),
    For(ForStmt<'t>),
    While(WhileStmt<'t>),
    Match(MatchStmt<'t>),
    Return(ReturnStmt<'t>),
    Break(NodeId, &'t Tree),
    Continue(NodeId, &'t Tree),
    Pass(NodeId, &'t Tree),
    Assert(AssertStmt<'t>),
    Expr(ExprStmt<'t>),
    VarDeclStmt(VarDeclStmt<'t>),
    Await(AwaitStmt<'t>),
}

impl<'t> Stmt<'t> {
    pub fn cast(tree: &'t Tree, id: NodeId) -> Option<Self> {
        Some(match tree.node(id).kind() {
            SyntaxKind::IF_STMT => Self::If(IfStmt::wrap(tree, id)),
            SyntaxKind::FOR_STMT => Self::For(ForStmt::wrap(tree, id)),
            SyntaxKind::WHILE_STMT => Self::While(WhileStmt::wrap(tree, id)),
            SyntaxKind::MATCH_STMT => Self::Match(MatchStmt::wrap(tree, id)),
            SyntaxKind::RETURN_STMT => Self::Return(ReturnStmt::wrap(tree, id)),
            SyntaxKind::BREAK_STMT => Self::Break(id, tree),
            SyntaxKind::CONTINUE_STMT => Self::Continue(id, tree),
            SyntaxKind::PASS_STMT => Self::Pass(id, tree),
            SyntaxKind::ASSERT_STMT => Self::Assert(AssertStmt::wrap(tree, id)),
            SyntaxKind::EXPR_STMT => Self::Expr(ExprStmt::wrap(tree, id)),
            SyntaxKind::VAR_DECL_STMT => Self::VarDeclStmt(VarDeclStmt::wrap(tree, id)),
            SyntaxKind::AWAIT_STMT => Self::Await(AwaitStmt::wrap(tree, id)),
            _ => return None,
        })
    }

    pub fn node_id(self) -> NodeId {
        match self {
            Self::If(n) => n.node_id(),
            Self::For(n) => n.node_id(),
            Self::While(n) => n.node_id(),
            Self::Match(n) => n.node_id(),
            Self::Return(n) => n.node_id(),
            Self::Break(id, _) | Self::Continue(id, _) | Self::Pass(id, _) => id,
            Self::Assert(n) => n.node_id(),
            Self::Expr(n) => n.node_id(),
            Self::VarDeclStmt(n) => n.node_id(),
            Self::Await(n) => n.node_id(),
        }
    }
}

cst_node!(IfStmt, SyntaxKind::IF_STMT);

impl<'t> IfStmt<'t> {
    pub fn condition(self) -> Option<Expr<'t>> {
        expr_child(self.tree, self.id)
    }

    pub fn then_block(self) -> Option<Block<'t>> {
        child(self.tree, self.id)
    }

    pub fn elif_clauses(self) -> impl Iterator<Item = ElifClause<'t>> + 't {
        children(self.tree, self.id)
    }

    pub fn else_clause(self) -> Option<ElseClause<'t>> {
        child(self.tree, self.id)
    }
}

cst_node!(ElifClause, SyntaxKind::ELIF_CLAUSE);

impl<'t> ElifClause<'t> {
    pub fn condition(self) -> Option<Expr<'t>> {
        expr_child(self.tree, self.id)
    }

    pub fn block(self) -> Option<Block<'t>> {
        child(self.tree, self.id)
    }
}

cst_node!(ElseClause, SyntaxKind::ELSE_CLAUSE);

impl<'t> ElseClause<'t> {
    pub fn block(self) -> Option<Block<'t>> {
        child(self.tree, self.id)
    }
}

cst_node!(ForStmt, SyntaxKind::FOR_STMT);

impl<'t> ForStmt<'t> {
    pub fn iterator_name(self) -> Option<&'t str> {
        ident_text(self.tree, self.id)
    }

    pub fn iterable(self) -> Option<Expr<'t>> {
        expr_child(self.tree, self.id)
    }

    pub fn body(self) -> Option<Block<'t>> {
        child(self.tree, self.id)
    }
}

cst_node!(WhileStmt, SyntaxKind::WHILE_STMT);

impl<'t> WhileStmt<'t> {
    pub fn condition(self) -> Option<Expr<'t>> {
        expr_child(self.tree, self.id)
    }

    pub fn body(self) -> Option<Block<'t>> {
        child(self.tree, self.id)
    }
}

cst_node!(MatchStmt, SyntaxKind::MATCH_STMT);

impl<'t> MatchStmt<'t> {
    pub fn subject(self) -> Option<Expr<'t>> {
        expr_child(self.tree, self.id)
    }

    pub fn cases(self) -> impl Iterator<Item = MatchCase<'t>> + 't {
        children(self.tree, self.id)
    }
}

cst_node!(MatchCase, SyntaxKind::MATCH_CASE);

impl<'t> MatchCase<'t> {
    pub fn bindings(self) -> impl Iterator<Item = MatchBinding<'t>> + 't {
        children(self.tree, self.id)
    }

    pub fn body(self) -> Option<Block<'t>> {
        child(self.tree, self.id)
    }
}

cst_node!(MatchBinding, SyntaxKind::MATCH_BINDING);

impl<'t> MatchBinding<'t> {
    pub fn name(self) -> Option<&'t str> {
        ident_text(self.tree, self.id)
    }

    pub fn pattern(self) -> Option<Expr<'t>> {
        expr_child(self.tree, self.id)
    }
}

cst_node!(ReturnStmt, SyntaxKind::RETURN_STMT);

impl<'t> ReturnStmt<'t> {
    pub fn value(self) -> Option<Expr<'t>> {
        expr_child(self.tree, self.id)
    }
}

cst_node!(AssertStmt, SyntaxKind::ASSERT_STMT);

impl<'t> AssertStmt<'t> {
    pub fn condition(self) -> Option<Expr<'t>> {
        expr_child(self.tree, self.id)
    }
}

cst_node!(ExprStmt, SyntaxKind::EXPR_STMT);

impl<'t> ExprStmt<'t> {
    pub fn expr(self) -> Option<Expr<'t>> {
        expr_child(self.tree, self.id)
    }
}

cst_node!(VarDeclStmt, SyntaxKind::VAR_DECL_STMT);

impl<'t> VarDeclStmt<'t> {
    pub fn var(self) -> Option<VarDecl<'t>> {
        child(self.tree, self.id)
    }
}

cst_node!(AwaitStmt, SyntaxKind::AWAIT_STMT);

impl<'t> AwaitStmt<'t> {
    pub fn expr(self) -> Option<Expr<'t>> {
        expr_child(self.tree, self.id)
    }
}

// ── Expressions ──────────────────────────────────────────────────────

#[derive(Clone, Copy)]
pub enum Expr<'t> {
    Ident(IdentExpr<'t>),
    Literal(LiteralExpr<'t>),
    Unary(UnaryExpr<'t>),
    Binary(BinaryExpr<'t>),
    Call(CallExpr<'t>),
    Member(MemberExpr<'t>),
    Index(IndexExpr<'t>),
    Array(ArrayExpr<'t>),
    Dict(DictExpr<'t>),
    Lambda(LambdaExpr<'t>),
    If(IfExpr<'t>),
    GetNode(GetNodeExpr<'t>),
    UniqueNode(UniqueNodeExpr<'t>),
    Is(IsExpr<'t>),
    As(AsExpr<'t>),
    In(InExpr<'t>),
    Paren(ParenExpr<'t>),
}

fn expr_child<'t>(tree: &'t Tree, parent: NodeId) -> Option<Expr<'t>> {
    tree.form_of(parent).iter().find_map(|&e| match e {
        Element::Node(id) => Expr::cast(tree, id),
        Element::Token(_) => None,
    })
}

impl<'t> Expr<'t> {
    pub fn cast(tree: &'t Tree, id: NodeId) -> Option<Self> {
        Some(match tree.node(id).kind() {
            SyntaxKind::IDENT_EXPR => Self::Ident(IdentExpr::wrap(tree, id)),
            SyntaxKind::LITERAL_EXPR => Self::Literal(LiteralExpr::wrap(tree, id)),
            SyntaxKind::UNARY_EXPR => Self::Unary(UnaryExpr::wrap(tree, id)),
            SyntaxKind::BINARY_EXPR => Self::Binary(BinaryExpr::wrap(tree, id)),
            SyntaxKind::CALL_EXPR => Self::Call(CallExpr::wrap(tree, id)),
            SyntaxKind::MEMBER_EXPR => Self::Member(MemberExpr::wrap(tree, id)),
            SyntaxKind::INDEX_EXPR => Self::Index(IndexExpr::wrap(tree, id)),
            SyntaxKind::ARRAY_EXPR => Self::Array(ArrayExpr::wrap(tree, id)),
            SyntaxKind::DICT_EXPR => Self::Dict(DictExpr::wrap(tree, id)),
            SyntaxKind::LAMBDA_EXPR => Self::Lambda(LambdaExpr::wrap(tree, id)),
            SyntaxKind::IF_EXPR => Self::If(IfExpr::wrap(tree, id)),
            SyntaxKind::GET_NODE_EXPR => Self::GetNode(GetNodeExpr::wrap(tree, id)),
            SyntaxKind::UNIQUE_NODE_EXPR => Self::UniqueNode(UniqueNodeExpr::wrap(tree, id)),
            SyntaxKind::IS_EXPR => Self::Is(IsExpr::wrap(tree, id)),
            SyntaxKind::AS_EXPR => Self::As(AsExpr::wrap(tree, id)),
            SyntaxKind::IN_EXPR => Self::In(InExpr::wrap(tree, id)),
            SyntaxKind::PAREN_EXPR => Self::Paren(ParenExpr::wrap(tree, id)),
            _ => return None,
        })
    }

    pub fn node_id(self) -> NodeId {
        match self {
            Self::Ident(n) => n.node_id(),
            Self::Literal(n) => n.node_id(),
            Self::Unary(n) => n.node_id(),
            Self::Binary(n) => n.node_id(),
            Self::Call(n) => n.node_id(),
            Self::Member(n) => n.node_id(),
            Self::Index(n) => n.node_id(),
            Self::Array(n) => n.node_id(),
            Self::Dict(n) => n.node_id(),
            Self::Lambda(n) => n.node_id(),
            Self::If(n) => n.node_id(),
            Self::GetNode(n) => n.node_id(),
            Self::UniqueNode(n) => n.node_id(),
            Self::Is(n) => n.node_id(),
            Self::As(n) => n.node_id(),
            Self::In(n) => n.node_id(),
            Self::Paren(n) => n.node_id(),
        }
    }

    pub fn tree(self, tree: &'t Tree) -> &'t Tree {
        let _ = self;
        tree
    }
}

cst_node!(IdentExpr, SyntaxKind::IDENT_EXPR);

impl<'t> IdentExpr<'t> {
    pub fn name(self) -> Option<&'t str> {
        ident_text(self.tree, self.id)
    }
}

cst_node!(LiteralExpr, SyntaxKind::LITERAL_EXPR);

impl<'t> LiteralExpr<'t> {
    /// The single literal token this node wraps (int/float/string/bool/null).
    pub fn token(self) -> Option<TokenId> {
        self.tree.form_of(self.id).iter().find_map(|&e| e.as_token())
    }

    pub fn token_kind(self) -> Option<SyntaxKind> {
        self.token().map(|t| self.tree.token(t).kind())
    }
}

cst_node!(UnaryExpr, SyntaxKind::UNARY_EXPR);

impl<'t> UnaryExpr<'t> {
    pub fn operand(self) -> Option<Expr<'t>> {
        expr_child(self.tree, self.id)
    }

    pub fn operator(self) -> Option<SyntaxKind> {
        self.tree
            .form_of(self.id)
            .iter()
            .find_map(|&e| e.as_token().map(|t| self.tree.token(t).kind()))
    }
}

cst_node!(BinaryExpr, SyntaxKind::BINARY_EXPR);

impl<'t> BinaryExpr<'t> {
    pub fn lhs(self) -> Option<Expr<'t>> {
        self.tree.form_of(self.id).iter().find_map(|&e| match e {
            Element::Node(id) => Expr::cast(self.tree, id),
            Element::Token(_) => None,
        })
    }

    pub fn rhs(self) -> Option<Expr<'t>> {
        self.tree.form_of(self.id).iter().rev().find_map(|&e| match e {
            Element::Node(id) => Expr::cast(self.tree, id),
            Element::Token(_) => None,
        })
    }

    pub fn operator(self) -> Option<SyntaxKind> {
        self.tree
            .form_of(self.id)
            .iter()
            .find_map(|&e| e.as_token().map(|t| self.tree.token(t).kind()))
    }
}

cst_node!(CallExpr, SyntaxKind::CALL_EXPR);

impl<'t> CallExpr<'t> {
    pub fn callee(self) -> Option<Expr<'t>> {
        expr_child(self.tree, self.id)
    }

    pub fn args(self) -> Option<ArgList<'t>> {
        child(self.tree, self.id)
    }
}

cst_node!(ArgList, SyntaxKind::ARG_LIST);

impl<'t> ArgList<'t> {
    pub fn args(self) -> impl Iterator<Item = Expr<'t>> + 't {
        self.tree
            .form_of(self.id)
            .iter()
            .filter_map(move |&e| match e {
                Element::Node(id) => Expr::cast(self.tree, id),
                Element::Token(_) => None,
            })
    }
}

cst_node!(MemberExpr, SyntaxKind::MEMBER_EXPR);

impl<'t> MemberExpr<'t> {
    pub fn receiver(self) -> Option<Expr<'t>> {
        expr_child(self.tree, self.id)
    }

    pub fn member_name(self) -> Option<&'t str> {
        ident_text(self.tree, self.id)
    }
}

cst_node!(IndexExpr, SyntaxKind::INDEX_EXPR);

impl<'t> IndexExpr<'t> {
    pub fn receiver(self) -> Option<Expr<'t>> {
        self.tree.form_of(self.id).iter().find_map(|&e| match e {
            Element::Node(id) => Expr::cast(self.tree, id),
            Element::Token(_) => None,
        })
    }

    pub fn index(self) -> Option<Expr<'t>> {
        self.tree.form_of(self.id).iter().rev().find_map(|&e| match e {
            Element::Node(id) => Expr::cast(self.tree, id),
            Element::Token(_) => None,
        })
    }
}

cst_node!(ArrayExpr, SyntaxKind::ARRAY_EXPR);

impl<'t> ArrayExpr<'t> {
    pub fn elements(self) -> impl Iterator<Item = Expr<'t>> + 't {
        self.tree
            .form_of(self.id)
            .iter()
            .filter_map(move |&e| match e {
                Element::Node(id) => Expr::cast(self.tree, id),
                Element::Token(_) => None,
            })
    }
}

cst_node!(DictExpr, SyntaxKind::DICT_EXPR);

impl<'t> DictExpr<'t> {
    pub fn entries(self) -> impl Iterator<Item = DictEntry<'t>> + 't {
        children(self.tree, self.id)
    }
}

cst_node!(DictEntry, SyntaxKind::DICT_ENTRY);

impl<'t> DictEntry<'t> {
    pub fn key(self) -> Option<Expr<'t>> {
        self.tree.form_of(self.id).iter().find_map(|&e| match e {
            Element::Node(id) => Expr::cast(self.tree, id),
            Element::Token(_) => None,
        })
    }

    pub fn value(self) -> Option<Expr<'t>> {
        self.tree.form_of(self.id).iter().rev().find_map(|&e| match e {
            Element::Node(id) => Expr::cast(self.tree, id),
            Element::Token(_) => None,
        })
    }
}

cst_node!(LambdaExpr, SyntaxKind::LAMBDA_EXPR);

impl<'t> LambdaExpr<'t> {
    pub fn params(self) -> Option<ParamList<'t>> {
        child(self.tree, self.id)
    }

    pub fn body(self) -> Option<Block<'t>> {
        child(self.tree, self.id)
    }
}

cst_node!(IfExpr, SyntaxKind::IF_EXPR);

impl<'t> IfExpr<'t> {
    /// `a if c else b` — returns `(a, c, b)` in source order.
    pub fn parts(self) -> [Option<Expr<'t>>; 3] {
        let mut exprs = self.tree.form_of(self.id).iter().filter_map(|&e| match e {
            Element::Node(id) => Expr::cast(self.tree, id),
            Element::Token(_) => None,
        });
        [exprs.next(), exprs.next(), exprs.next()]
    }
}

cst_node!(GetNodeExpr, SyntaxKind::GET_NODE_EXPR);

impl<'t> GetNodeExpr<'t> {
    pub fn path(self) -> String {
        self.tree.to_text(Element::Node(self.id))
    }
}

cst_node!(UniqueNodeExpr, SyntaxKind::UNIQUE_NODE_EXPR);

impl<'t> UniqueNodeExpr<'t> {
    pub fn name(self) -> Option<&'t str> {
        ident_text(self.tree, self.id)
    }
}

cst_node!(IsExpr, SyntaxKind::IS_EXPR);

impl<'t> IsExpr<'t> {
    pub fn operand(self) -> Option<Expr<'t>> {
        expr_child(self.tree, self.id)
    }

    pub fn type_name(self) -> Option<TypeNode<'t>> {
        type_child(self.tree, self.id)
    }
}

cst_node!(AsExpr, SyntaxKind::AS_EXPR);

impl<'t> AsExpr<'t> {
    pub fn operand(self) -> Option<Expr<'t>> {
        expr_child(self.tree, self.id)
    }

    pub fn type_name(self) -> Option<TypeNode<'t>> {
        type_child(self.tree, self.id)
    }
}

cst_node!(InExpr, SyntaxKind::IN_EXPR);

impl<'t> InExpr<'t> {
    pub fn needle(self) -> Option<Expr<'t>> {
        self.tree.form_of(self.id).iter().find_map(|&e| match e {
            Element::Node(id) => Expr::cast(self.tree, id),
            Element::Token(_) => None,
        })
    }

    pub fn haystack(self) -> Option<Expr<'t>> {
        self.tree.form_of(self.id).iter().rev().find_map(|&e| match e {
            Element::Node(id) => Expr::cast(self.tree, id),
            Element::Token(_) => None,
        })
    }
}

cst_node!(ParenExpr, SyntaxKind::PAREN_EXPR);

impl<'t> ParenExpr<'t> {
    pub fn inner(self) -> Option<Expr<'t>> {
        expr_child(self.tree, self.id)
    }
}
