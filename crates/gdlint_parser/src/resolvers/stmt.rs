//! Statement and block resolvers (§4.1 indentation-aware frame; §3
//! "statements" taxonomy).
//!
//! Every `parse_*_stmt` here assumes its leading keyword is still the
//! current token; every block-introducing construct (`if`, `for`,
//! `while`, `func`, a lambda, a `match` case) consumes its own `:` and
//! hands off to [`parse_block`], which owns the single-line-vs-indented
//! decision.

use crate::error::ParseError;
use crate::parser::Parser;
use crate::resolvers::expr::parse_expr;
use gdlint_ast::SyntaxKind;

/// `:` has already been consumed by the caller. GDScript allows both
/// `if c:\n    body` and the single-line `if c: body`.
pub fn parse_block(p: &mut Parser) -> Result<(), ParseError> {
    p.enter()?;
    p.builder.start_node(SyntaxKind::BLOCK);
    if p.peek() == SyntaxKind::NEWLINE {
        p.bump();
        p.expect(SyntaxKind::INDENT);
        while !matches!(p.peek(), SyntaxKind::DEDENT | SyntaxKind::EOF) {
            parse_stmt(p)?;
        }
        p.expect(SyntaxKind::DEDENT);
    } else {
        parse_stmt(p)?;
    }
    p.builder.finish_node();
    Ok(())
}

pub fn parse_stmt(p: &mut Parser) -> Result<(), ParseError> {
    p.enter()?;
    while p.peek() == SyntaxKind::NEWLINE {
        p.bump();
    }
    match p.peek() {
        SyntaxKind::IF_KW => parse_if_stmt(p)?,
        SyntaxKind::FOR_KW => parse_for_stmt(p)?,
        SyntaxKind::WHILE_KW => parse_while_stmt(p)?,
        SyntaxKind::MATCH_KW => parse_match_stmt(p)?,
        SyntaxKind::RETURN_KW => {
            p.builder.start_node(SyntaxKind::RETURN_STMT);
            p.bump();
            if !matches!(p.peek(), SyntaxKind::NEWLINE | SyntaxKind::DEDENT | SyntaxKind::EOF) {
                parse_expr(p)?;
            }
            p.builder.finish_node();
        }
        SyntaxKind::BREAK_KW => {
            p.builder.start_node(SyntaxKind::BREAK_STMT);
            p.bump();
            p.builder.finish_node();
        }
        SyntaxKind::CONTINUE_KW => {
            p.builder.start_node(SyntaxKind::CONTINUE_STMT);
            p.bump();
            p.builder.finish_node();
        }
        SyntaxKind::PASS_KW => {
            p.builder.start_node(SyntaxKind::PASS_STMT);
            p.bump();
            p.builder.finish_node();
        }
        SyntaxKind::ASSERT_KW => {
            p.builder.start_node(SyntaxKind::ASSERT_STMT);
            p.bump();
            if p.eat(SyntaxKind::L_PAREN) {
                parse_expr(p)?;
                if p.eat(SyntaxKind::COMMA) {
                    parse_expr(p)?;
                }
                p.expect(SyntaxKind::R_PAREN);
            } else {
                parse_expr(p)?;
            }
            p.builder.finish_node();
        }
        SyntaxKind::AWAIT_KW => {
            p.builder.start_node(SyntaxKind::AWAIT_STMT);
            p.bump();
            parse_expr(p)?;
            p.builder.finish_node();
        }
        SyntaxKind::VAR_KW => {
            p.builder.start_node(SyntaxKind::VAR_DECL_STMT);
            crate::resolvers::class_member::parse_var_decl(p)?;
            p.builder.finish_node();
        }
        SyntaxKind::DEDENT | SyntaxKind::EOF => {}
        _ => {
            p.builder.start_node(SyntaxKind::EXPR_STMT);
            parse_expr(p)?;
            p.builder.finish_node();
        }
    }
    while p.peek() == SyntaxKind::NEWLINE {
        p.bump();
    }
    Ok(())
}

fn parse_if_stmt(p: &mut Parser) -> Result<(), ParseError> {
    p.builder.start_node(SyntaxKind::IF_STMT);
    p.bump(); // 'if'
    parse_expr(p)?;
    p.expect(SyntaxKind::COLON);
    parse_block(p)?;
    while p.peek() == SyntaxKind::ELIF_KW {
        p.builder.start_node(SyntaxKind::ELIF_CLAUSE);
        p.bump();
        parse_expr(p)?;
        p.expect(SyntaxKind::COLON);
        parse_block(p)?;
        p.builder.finish_node();
    }
    if p.peek() == SyntaxKind::ELSE_KW {
        p.builder.start_node(SyntaxKind::ELSE_CLAUSE);
        p.bump();
        p.expect(SyntaxKind::COLON);
        parse_block(p)?;
        p.builder.finish_node();
    }
    p.builder.finish_node();
    Ok(())
}

fn parse_for_stmt(p: &mut Parser) -> Result<(), ParseError> {
    p.builder.start_node(SyntaxKind::FOR_STMT);
    p.bump(); // 'for'
    p.expect(SyntaxKind::IDENT);
    p.expect(SyntaxKind::IN_KW);
    parse_expr(p)?;
    p.expect(SyntaxKind::COLON);
    parse_block(p)?;
    p.builder.finish_node();
    Ok(())
}

fn parse_while_stmt(p: &mut Parser) -> Result<(), ParseError> {
    p.builder.start_node(SyntaxKind::WHILE_STMT);
    p.bump(); // 'while'
    parse_expr(p)?;
    p.expect(SyntaxKind::COLON);
    parse_block(p)?;
    p.builder.finish_node();
    Ok(())
}

fn parse_match_stmt(p: &mut Parser) -> Result<(), ParseError> {
    p.builder.start_node(SyntaxKind::MATCH_STMT);
    p.bump(); // 'match'
    parse_expr(p)?;
    p.expect(SyntaxKind::COLON);
    p.expect(SyntaxKind::NEWLINE);
    p.expect(SyntaxKind::INDENT);
    while !matches!(p.peek(), SyntaxKind::DEDENT | SyntaxKind::EOF) {
        parse_match_case(p)?;
    }
    p.expect(SyntaxKind::DEDENT);
    p.builder.finish_node();
    Ok(())
}

fn parse_match_case(p: &mut Parser) -> Result<(), ParseError> {
    p.enter()?;
    p.builder.start_node(SyntaxKind::MATCH_CASE);
    parse_match_binding(p)?;
    while p.eat(SyntaxKind::COMMA) {
        parse_match_binding(p)?;
    }
    p.expect(SyntaxKind::COLON);
    parse_block(p)?;
    p.builder.finish_node();
    Ok(())
}

fn parse_match_binding(p: &mut Parser) -> Result<(), ParseError> {
    p.builder.start_node(SyntaxKind::MATCH_BINDING);
    if p.peek() == SyntaxKind::VAR_KW {
        p.bump();
        p.expect(SyntaxKind::IDENT);
    } else {
        parse_expr(p)?;
    }
    p.builder.finish_node();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Parser, DEFAULT_MAX_DEPTH};
    use gdlint_ast::node::Element;

    fn parse_block_source(body: &str) -> String {
        let source = format!("if true:\n{body}");
        let mut p = Parser::new(&source, DEFAULT_MAX_DEPTH);
        p.builder.start_node(SyntaxKind::BLOCK);
        parse_stmt(&mut p).unwrap();
        p.builder.finish_node();
        let tree = p.finish();
        tree.to_text(Element::Node(tree.root()))
    }

    #[test]
    fn if_elif_else_round_trips() {
        let source = "if a:\n    pass\nelif b:\n    pass\nelse:\n    pass\n";
        let mut p = Parser::new(source, DEFAULT_MAX_DEPTH);
        parse_stmt(&mut p).unwrap();
        let tree = p.finish();
        assert_eq!(tree.to_text(Element::Node(tree.root())), source);
    }

    #[test]
    fn single_line_if_round_trips() {
        let source = "if a: return 1\n";
        let mut p = Parser::new(source, DEFAULT_MAX_DEPTH);
        parse_stmt(&mut p).unwrap();
        let tree = p.finish();
        assert_eq!(tree.to_text(Element::Node(tree.root())), source);
    }

    #[test]
    fn match_with_var_binding_round_trips() {
        let _ = parse_block_source; // silence unused helper when not exercised elsewhere
        let source = "match x:\n    1:\n        pass\n    var y:\n        pass\n";
        let mut p = Parser::new(source, DEFAULT_MAX_DEPTH);
        parse_stmt(&mut p).unwrap();
        let tree = p.finish();
        assert_eq!(tree.to_text(Element::Node(tree.root())), source);
    }
}
