//! Every kind of syntax element in the GDScript CST (§3 "Token" and
//! "Concrete node taxonomy").
//!
//! Token kinds (leaves) and node kinds (interior, form-bearing) share one
//! flat enum, rowan-style: a `SyntaxKind` tells a visitor or a matcher
//! whether it is looking at a leaf or a composite without a second type to
//! keep in sync.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // ── Sentinels ──────────────────────────────────────────────────
    TOMBSTONE,
    /// Wraps a byte sequence no resolver could accept (§4.1 error recovery).
    INVALID_TOKEN,
    EOF,

    // ── Trivia ─────────────────────────────────────────────────────
    WHITESPACE,
    NEWLINE,
    COMMENT,
    INDENT,
    DEDENT,

    // ── Literals & names ───────────────────────────────────────────
    IDENT,
    INT_LITERAL,
    FLOAT_LITERAL,
    STRING_LITERAL,
    STRING_NAME_LITERAL,
    BOOL_LITERAL,
    NULL_LITERAL,
    NODE_PATH_LITERAL,

    // ── Keywords ───────────────────────────────────────────────────
    EXTENDS_KW,
    CLASS_NAME_KW,
    CLASS_KW,
    VAR_KW,
    CONST_KW,
    FUNC_KW,
    STATIC_KW,
    SIGNAL_KW,
    ENUM_KW,
    IF_KW,
    ELIF_KW,
    ELSE_KW,
    FOR_KW,
    WHILE_KW,
    MATCH_KW,
    RETURN_KW,
    BREAK_KW,
    CONTINUE_KW,
    PASS_KW,
    ASSERT_KW,
    AWAIT_KW,
    YIELD_KW,
    IS_KW,
    AS_KW,
    IN_KW,
    NOT_KW,
    AND_KW,
    OR_KW,
    SELF_KW,
    SUPER_KW,
    PRELOAD_KW,
    SETGET_KW,
    ONREADY_KW,
    TOOL_KW,
    REMOTE_KW,
    MASTER_KW,
    PUPPET_KW,
    VOID_KW,

    // ── Punctuation ────────────────────────────────────────────────
    L_PAREN,
    R_PAREN,
    L_BRACKET,
    R_BRACKET,
    L_BRACE,
    R_BRACE,
    COMMA,
    COLON,
    SEMICOLON,
    DOT,
    ARROW,
    DOLLAR,
    PERCENT_SIGN,
    AT,

    // ── Operators ──────────────────────────────────────────────────
    PLUS,
    MINUS,
    STAR,
    STAR_STAR,
    SLASH,
    PERCENT,
    AMP,
    PIPE,
    CARET,
    TILDE,
    SHL,
    SHR,
    EQ,
    PLUS_EQ,
    MINUS_EQ,
    STAR_EQ,
    SLASH_EQ,
    PERCENT_EQ,
    AMP_EQ,
    PIPE_EQ,
    CARET_EQ,
    SHL_EQ,
    SHR_EQ,
    EQ_EQ,
    NOT_EQ,
    LT,
    GT,
    LT_EQ,
    GT_EQ,
    AMP_AMP,
    PIPE_PIPE,
    BANG,

    // ── Attributes / annotations ───────────────────────────────────
    ANNOTATION,

    // ── Type nodes ─────────────────────────────────────────────────
    TYPE_SIMPLE,
    TYPE_GENERIC,
    TYPE_INFERRED,

    // ── Declarations ───────────────────────────────────────────────
    SOURCE_FILE,
    CLASS_DECL,
    EXTENDS_CLAUSE,
    CLASS_NAME_CLAUSE,
    INNER_CLASS_DECL,
    FUNC_DECL,
    PARAM_LIST,
    PARAM,
    VAR_DECL,
    CONST_DECL,
    PROPERTY_DECL,
    PROPERTY_GET_BODY,
    PROPERTY_SET_BODY,
    SIGNAL_DECL,
    ENUM_DECL,
    ENUM_VALUE,
    ANNOTATION_LIST,

    // ── Statements ─────────────────────────────────────────────────
    BLOCK,
    IF_STMT,
    ELIF_CLAUSE,
    ELSE_CLAUSE,
    FOR_STMT,
    WHILE_STMT,
    MATCH_STMT,
    MATCH_CASE,
    MATCH_BINDING,
    RETURN_STMT,
    BREAK_STMT,
    CONTINUE_STMT,
    PASS_STMT,
    ASSERT_STMT,
    EXPR_STMT,
    VAR_DECL_STMT,
    AWAIT_STMT,

    // ── Expressions ────────────────────────────────────────────────
    IDENT_EXPR,
    LITERAL_EXPR,
    UNARY_EXPR,
    BINARY_EXPR,
    CALL_EXPR,
    ARG_LIST,
    MEMBER_EXPR,
    INDEX_EXPR,
    ARRAY_EXPR,
    DICT_EXPR,
    DICT_ENTRY,
    LAMBDA_EXPR,
    IF_EXPR,
    GET_NODE_EXPR,
    UNIQUE_NODE_EXPR,
    IS_EXPR,
    AS_EXPR,
    IN_EXPR,
    PAREN_EXPR,

    /// Sentinel: always the last variant, used to size kind tables.
    __LAST,
}

impl SyntaxKind {
    pub const fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE | Self::NEWLINE | Self::COMMENT | Self::INDENT | Self::DEDENT
        )
    }

    /// Whether this kind labels a leaf (as opposed to a form-bearing node).
    /// Node kinds are listed explicitly so additions to either side of the
    /// enum cannot silently flip this classification.
    pub const fn is_token(self) -> bool {
        !matches!(
            self,
            Self::ANNOTATION
                | Self::ANNOTATION_LIST
                | Self::TYPE_SIMPLE
                | Self::TYPE_GENERIC
                | Self::TYPE_INFERRED
                | Self::SOURCE_FILE
                | Self::CLASS_DECL
                | Self::EXTENDS_CLAUSE
                | Self::CLASS_NAME_CLAUSE
                | Self::INNER_CLASS_DECL
                | Self::FUNC_DECL
                | Self::PARAM_LIST
                | Self::PARAM
                | Self::VAR_DECL
                | Self::CONST_DECL
                | Self::PROPERTY_DECL
                | Self::PROPERTY_GET_BODY
                | Self::PROPERTY_SET_BODY
                | Self::SIGNAL_DECL
                | Self::ENUM_DECL
                | Self::ENUM_VALUE
                | Self::BLOCK
                | Self::IF_STMT
                | Self::ELIF_CLAUSE
                | Self::ELSE_CLAUSE
                | Self::FOR_STMT
                | Self::WHILE_STMT
                | Self::MATCH_STMT
                | Self::MATCH_CASE
                | Self::MATCH_BINDING
                | Self::RETURN_STMT
                | Self::BREAK_STMT
                | Self::CONTINUE_STMT
                | Self::PASS_STMT
                | Self::ASSERT_STMT
                | Self::EXPR_STMT
                | Self::VAR_DECL_STMT
                | Self::AWAIT_STMT
                | Self::IDENT_EXPR
                | Self::LITERAL_EXPR
                | Self::UNARY_EXPR
                | Self::BINARY_EXPR
                | Self::CALL_EXPR
                | Self::ARG_LIST
                | Self::MEMBER_EXPR
                | Self::INDEX_EXPR
                | Self::ARRAY_EXPR
                | Self::DICT_EXPR
                | Self::DICT_ENTRY
                | Self::LAMBDA_EXPR
                | Self::IF_EXPR
                | Self::GET_NODE_EXPR
                | Self::UNIQUE_NODE_EXPR
                | Self::IS_EXPR
                | Self::AS_EXPR
                | Self::IN_EXPR
                | Self::PAREN_EXPR
        )
    }

    pub const fn is_node(self) -> bool {
        !self.is_token()
    }

    pub const fn is_keyword(self) -> bool {
        (self as u16) >= (Self::EXTENDS_KW as u16) && (self as u16) <= (Self::VOID_KW as u16)
    }
}
