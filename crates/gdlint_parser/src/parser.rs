use crate::error::ParseError;
use crate::lexer::{LexedToken, Lexer};
use gdlint_ast::{SyntaxKind, Tree, TreeBuilder};
use gdlint_text_size::TextSize;

/// Default recursion bound (§5 "Stack discipline": "bounded by
/// configuration (default ~200 frames)").
pub const DEFAULT_MAX_DEPTH: usize = 200;

/// Drives [`TreeBuilder`] from a materialized token array.
///
/// The lexer itself is a genuine one-pass iterator over characters (§4.1);
/// the parser re-reads that output through an indexable array rather than
/// pulling one token at a time, because precedence climbing and the
/// property/getter-setter lookahead below need to peek past trivia without
/// losing their place — the same tradeoff `rust-analyzer`'s `parser` crate
/// makes over its own lexer.
pub struct Parser<'a> {
    pub(crate) tokens: Vec<LexedToken<'a>>,
    pub(crate) pos: usize,
    pub(crate) builder: TreeBuilder,
    pub(crate) max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, max_depth: usize) -> Self {
        Self {
            tokens: Lexer::new(source).collect(),
            pos: 0,
            builder: TreeBuilder::new(),
            max_depth,
        }
    }

    /// Checked recursion-depth guard (§4.1 "Must not allocate
    /// pathologically"; §7 "nested-depth exceeded").
    pub(crate) fn enter(&self) -> Result<(), ParseError> {
        if self.builder.depth() >= self.max_depth {
            let at = self.tokens.get(self.pos).map_or_else(
                || self.tokens.last().map_or(TextSize::new(0), |t| t.range.end()),
                |t| t.range.start(),
            );
            return Err(ParseError::NestingTooDeep { max_depth: self.max_depth, at });
        }
        Ok(())
    }

    /// Consumes and attaches every `WHITESPACE`/`COMMENT` token starting at
    /// the cursor to whichever frame is currently open (§4.1 point 5:
    /// "Comments are attached as children of the currently open frame at
    /// the point they appear").
    pub(crate) fn skip_trivia(&mut self) {
        while let Some(tok) = self.tokens.get(self.pos) {
            if matches!(tok.kind, SyntaxKind::WHITESPACE | SyntaxKind::COMMENT) {
                self.builder.token(tok.kind, tok.text, tok.range);
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// The next structurally significant kind: `WHITESPACE`/`COMMENT` are
    /// transparently consumed first. `NEWLINE`/`INDENT`/`DEDENT` remain
    /// visible — resolvers consume them explicitly.
    pub(crate) fn peek(&mut self) -> SyntaxKind {
        self.skip_trivia();
        self.tokens.get(self.pos).map_or(SyntaxKind::EOF, |t| t.kind)
    }

    /// Peek one significant token further, without consuming the current
    /// one (used by the `var`/`static`/property lookaheads).
    pub(crate) fn peek2(&mut self) -> SyntaxKind {
        self.skip_trivia();
        let mut i = self.pos + 1;
        while let Some(tok) = self.tokens.get(i) {
            if matches!(tok.kind, SyntaxKind::WHITESPACE | SyntaxKind::COMMENT) {
                i += 1;
            } else {
                return tok.kind;
            }
        }
        SyntaxKind::EOF
    }

    pub(crate) fn current_text(&mut self) -> &'a str {
        self.skip_trivia();
        self.tokens.get(self.pos).map_or("", |t| t.text)
    }

    /// Consumes the current significant token and appends it to the
    /// currently open frame, whatever its kind.
    pub(crate) fn bump(&mut self) {
        self.skip_trivia();
        if let Some(tok) = self.tokens.get(self.pos) {
            self.builder.token(tok.kind, tok.text, tok.range);
            self.pos += 1;
        }
    }

    /// Consumes the current significant token if it matches `kind`,
    /// returning whether it did.
    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.peek() == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consumes the current token if it matches, else records an
    /// invalid-token wrapper of zero width so the expected-token error is
    /// visible without ever desynchronizing the cursor (§4.1 "Error
    /// recovery").
    pub(crate) fn expect(&mut self, kind: SyntaxKind) {
        if !self.eat(kind) {
            self.recover_one();
        }
    }

    /// Consumes exactly one token (or nothing, at EOF) wrapped as
    /// `INVALID_TOKEN` — the universal fallback when no resolver can
    /// accept the current input (§4.1 "Error recovery").
    pub(crate) fn recover_one(&mut self) {
        self.skip_trivia();
        if let Some(tok) = self.tokens.get(self.pos) {
            if tok.kind == SyntaxKind::EOF {
                return;
            }
            self.builder.invalid_token(tok.text, tok.range);
            self.pos += 1;
        }
    }

    pub fn finish(self) -> Tree {
        let (tree, _root) = self.builder.finish();
        tree
    }
}
