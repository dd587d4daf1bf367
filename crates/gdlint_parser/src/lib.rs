//! One-pass lexer plus recursive-descent resolver stack (§4.1) turning
//! GDScript source text into a [`gdlint_ast::Tree`].
//!
//! The public entry point is [`parse`]; everything else is wired together
//! under [`resolvers`] by grammar area (class members, statements,
//! expressions, type nodes) rather than one monolithic function.

pub mod error;
pub mod lexer;
pub mod parser;
pub mod resolvers;

pub use error::ParseError;
pub use lexer::{LexedToken, Lexer};
pub use parser::{Parser, DEFAULT_MAX_DEPTH};

use gdlint_ast::Tree;

/// Parses a complete GDScript source file into a full-fidelity [`Tree`]
/// (§4.1 contract). Returns `Err` only for [`ParseError::NestingTooDeep`];
/// every other malformed input is absorbed into `INVALID_TOKEN` leaves so
/// I1/I2 still hold.
#[tracing::instrument(skip_all, fields(len = source.len()))]
pub fn parse(source: &str) -> Result<Tree, ParseError> {
    parse_with_max_depth(source, DEFAULT_MAX_DEPTH)
}

pub fn parse_with_max_depth(source: &str, max_depth: usize) -> Result<Tree, ParseError> {
    let mut parser = Parser::new(source, max_depth);
    resolvers::class_member::parse_source_file(&mut parser)?;
    tracing::debug!("parse complete");
    Ok(parser.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdlint_ast::node::Element;

    #[test]
    fn round_trip_with_comments_and_blank_lines() {
        let source = "extends Node2D # base\n\n# a comment\nvar x = 1\n\n\nfunc f():\n    pass # trailing\n";
        let tree = parse(source).unwrap();
        assert_eq!(tree.to_text(Element::Node(tree.root())), source);
    }

    #[test]
    fn nesting_too_deep_is_reported_not_panicked() {
        let mut source = String::new();
        for _ in 0..50 {
            source.push_str("((");
        }
        source.push('1');
        for _ in 0..50 {
            source.push_str("))");
        }
        let full = format!("var x = {source}\n");
        let err = parse_with_max_depth(&full, 8).unwrap_err();
        assert!(matches!(err, ParseError::NestingTooDeep { max_depth: 8, .. }));
    }

    #[test]
    fn unexpected_token_becomes_invalid_token_not_an_error() {
        let source = "var x = @@@\n";
        let tree = parse(source).unwrap();
        assert_eq!(tree.to_text(Element::Node(tree.root())), source);
    }
}
