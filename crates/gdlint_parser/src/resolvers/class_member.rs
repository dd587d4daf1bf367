//! Class-body resolvers: the top-level driver plus every declaration kind
//! a class body or inner-class body can contain (§3 "concrete node
//! taxonomy").

use crate::error::ParseError;
use crate::parser::Parser;
use crate::resolvers::expr::parse_expr;
use crate::resolvers::type_node::parse_type;
use gdlint_ast::SyntaxKind;

pub fn parse_source_file(p: &mut Parser) -> Result<(), ParseError> {
    p.builder.start_node(SyntaxKind::SOURCE_FILE);
    p.builder.start_node(SyntaxKind::CLASS_DECL);
    loop {
        skip_blank_lines(p);
        match p.peek() {
            SyntaxKind::EOF => break,
            SyntaxKind::AT => parse_annotation(p)?,
            SyntaxKind::EXTENDS_KW => parse_extends_clause(p)?,
            SyntaxKind::CLASS_NAME_KW => parse_class_name_clause(p)?,
            SyntaxKind::CLASS_KW => parse_inner_class_decl(p)?,
            SyntaxKind::SIGNAL_KW => parse_signal_decl(p)?,
            SyntaxKind::ENUM_KW => parse_enum_decl(p)?,
            SyntaxKind::CONST_KW => parse_const_decl(p)?,
            SyntaxKind::VAR_KW | SyntaxKind::ONREADY_KW => parse_var_or_property_decl(p)?,
            SyntaxKind::STATIC_KW if p.peek2() == SyntaxKind::FUNC_KW => parse_func_decl(p)?,
            SyntaxKind::FUNC_KW => parse_func_decl(p)?,
            SyntaxKind::TOOL_KW => {
                p.bump();
            }
            _ => p.recover_one(),
        }
    }
    p.builder.finish_node(); // CLASS_DECL
    p.expect(SyntaxKind::EOF);
    p.builder.finish_node(); // SOURCE_FILE
    Ok(())
}

fn skip_blank_lines(p: &mut Parser) {
    while p.peek() == SyntaxKind::NEWLINE {
        p.bump();
    }
}

fn parse_annotation(p: &mut Parser) -> Result<(), ParseError> {
    p.enter()?;
    p.builder.start_node(SyntaxKind::ANNOTATION);
    p.bump(); // '@'
    p.expect(SyntaxKind::IDENT);
    if p.peek() == SyntaxKind::L_PAREN {
        p.bump();
        while p.peek() != SyntaxKind::R_PAREN && p.peek() != SyntaxKind::EOF {
            parse_expr(p)?;
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        p.expect(SyntaxKind::R_PAREN);
    }
    p.builder.finish_node();
    while p.peek() == SyntaxKind::NEWLINE {
        p.bump();
    }
    Ok(())
}

fn parse_extends_clause(p: &mut Parser) -> Result<(), ParseError> {
    p.builder.start_node(SyntaxKind::EXTENDS_CLAUSE);
    p.bump(); // 'extends'
    p.expect(SyntaxKind::IDENT);
    while p.eat(SyntaxKind::DOT) {
        p.expect(SyntaxKind::IDENT);
    }
    p.builder.finish_node();
    while p.peek() == SyntaxKind::NEWLINE {
        p.bump();
    }
    Ok(())
}

fn parse_class_name_clause(p: &mut Parser) -> Result<(), ParseError> {
    p.builder.start_node(SyntaxKind::CLASS_NAME_CLAUSE);
    p.bump(); // 'class_name'
    p.expect(SyntaxKind::IDENT);
    p.builder.finish_node();
    while p.peek() == SyntaxKind::NEWLINE {
        p.bump();
    }
    Ok(())
}

fn parse_inner_class_decl(p: &mut Parser) -> Result<(), ParseError> {
    p.enter()?;
    p.builder.start_node(SyntaxKind::INNER_CLASS_DECL);
    p.bump(); // 'class'
    p.expect(SyntaxKind::IDENT);
    if p.eat(SyntaxKind::EXTENDS_KW) {
        p.expect(SyntaxKind::IDENT);
    }
    p.expect(SyntaxKind::COLON);
    p.expect(SyntaxKind::NEWLINE);
    p.expect(SyntaxKind::INDENT);
    while !matches!(p.peek(), SyntaxKind::DEDENT | SyntaxKind::EOF) {
        skip_blank_lines(p);
        match p.peek() {
            SyntaxKind::DEDENT | SyntaxKind::EOF => break,
            SyntaxKind::CLASS_KW => parse_inner_class_decl(p)?,
            SyntaxKind::SIGNAL_KW => parse_signal_decl(p)?,
            SyntaxKind::ENUM_KW => parse_enum_decl(p)?,
            SyntaxKind::CONST_KW => parse_const_decl(p)?,
            SyntaxKind::VAR_KW | SyntaxKind::ONREADY_KW => parse_var_or_property_decl(p)?,
            SyntaxKind::STATIC_KW if p.peek2() == SyntaxKind::FUNC_KW => parse_func_decl(p)?,
            SyntaxKind::FUNC_KW => parse_func_decl(p)?,
            _ => p.recover_one(),
        }
    }
    p.expect(SyntaxKind::DEDENT);
    p.builder.finish_node();
    while p.peek() == SyntaxKind::NEWLINE {
        p.bump();
    }
    Ok(())
}

fn parse_signal_decl(p: &mut Parser) -> Result<(), ParseError> {
    p.builder.start_node(SyntaxKind::SIGNAL_DECL);
    p.bump(); // 'signal'
    p.expect(SyntaxKind::IDENT);
    if p.peek() == SyntaxKind::L_PAREN {
        parse_param_list(p)?;
    }
    p.builder.finish_node();
    while p.peek() == SyntaxKind::NEWLINE {
        p.bump();
    }
    Ok(())
}

fn parse_enum_decl(p: &mut Parser) -> Result<(), ParseError> {
    p.builder.start_node(SyntaxKind::ENUM_DECL);
    p.bump(); // 'enum'
    if p.peek() == SyntaxKind::IDENT {
        p.bump();
    }
    p.expect(SyntaxKind::L_BRACE);
    while p.peek() != SyntaxKind::R_BRACE && p.peek() != SyntaxKind::EOF {
        p.builder.start_node(SyntaxKind::ENUM_VALUE);
        p.expect(SyntaxKind::IDENT);
        if p.eat(SyntaxKind::EQ) {
            parse_expr(p)?;
        }
        p.builder.finish_node();
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_BRACE);
    p.builder.finish_node();
    while p.peek() == SyntaxKind::NEWLINE {
        p.bump();
    }
    Ok(())
}

fn parse_const_decl(p: &mut Parser) -> Result<(), ParseError> {
    p.builder.start_node(SyntaxKind::CONST_DECL);
    p.bump(); // 'const'
    p.expect(SyntaxKind::IDENT);
    if p.eat(SyntaxKind::COLON) {
        parse_type(p)?;
    }
    p.expect(SyntaxKind::EQ);
    parse_expr(p)?;
    p.builder.finish_node();
    while p.peek() == SyntaxKind::NEWLINE {
        p.bump();
    }
    Ok(())
}

/// `var name[: type][= init]`, optionally followed by an inline
/// getter/setter block (`PropertyDecl` instead of plain `VarDecl`).
fn parse_var_or_property_decl(p: &mut Parser) -> Result<(), ParseError> {
    let checkpoint = p.builder.checkpoint();
    let onready = p.peek() == SyntaxKind::ONREADY_KW;
    if onready {
        p.bump();
    }
    p.bump(); // 'var'
    p.expect(SyntaxKind::IDENT);
    if p.eat(SyntaxKind::COLON) {
        if p.peek() == SyntaxKind::EQ {
            // `:=` style inferred-type declarations lex as COLON then EQ.
        } else {
            parse_type(p)?;
        }
    }
    if p.eat(SyntaxKind::EQ) {
        parse_expr(p)?;
    }

    if p.peek() == SyntaxKind::COLON && matches!(p.peek2(), SyntaxKind::NEWLINE) {
        p.builder.start_node_at(checkpoint, SyntaxKind::PROPERTY_DECL);
        p.bump(); // ':'
        p.expect(SyntaxKind::NEWLINE);
        p.expect(SyntaxKind::INDENT);
        while !matches!(p.peek(), SyntaxKind::DEDENT | SyntaxKind::EOF) {
            parse_property_accessor(p)?;
        }
        p.expect(SyntaxKind::DEDENT);
        p.builder.finish_node();
    } else {
        p.builder.start_node_at(checkpoint, SyntaxKind::VAR_DECL);
        p.builder.finish_node();
        let _ = onready;
    }
    while p.peek() == SyntaxKind::NEWLINE {
        p.bump();
    }
    Ok(())
}

fn parse_property_accessor(p: &mut Parser) -> Result<(), ParseError> {
    let is_getter = p.current_text() == "get";
    if is_getter {
        p.builder.start_node(SyntaxKind::PROPERTY_GET_BODY);
        p.bump();
        p.expect(SyntaxKind::COLON);
        crate::resolvers::stmt::parse_block(p)?;
        p.builder.finish_node();
    } else {
        p.builder.start_node(SyntaxKind::PROPERTY_SET_BODY);
        p.bump(); // 'set'
        if p.eat(SyntaxKind::L_PAREN) {
            p.builder.start_node(SyntaxKind::PARAM);
            p.expect(SyntaxKind::IDENT);
            p.builder.finish_node();
            p.expect(SyntaxKind::R_PAREN);
        }
        p.expect(SyntaxKind::COLON);
        crate::resolvers::stmt::parse_block(p)?;
        p.builder.finish_node();
    }
    while p.peek() == SyntaxKind::NEWLINE {
        p.bump();
    }
    Ok(())
}

pub fn parse_var_decl(p: &mut Parser) -> Result<(), ParseError> {
    p.builder.start_node(SyntaxKind::VAR_DECL);
    p.bump(); // 'var'
    p.expect(SyntaxKind::IDENT);
    if p.eat(SyntaxKind::COLON) && p.peek() != SyntaxKind::EQ {
        parse_type(p)?;
    }
    if p.eat(SyntaxKind::EQ) {
        parse_expr(p)?;
    }
    p.builder.finish_node();
    Ok(())
}

fn parse_func_decl(p: &mut Parser) -> Result<(), ParseError> {
    p.enter()?;
    p.builder.start_node(SyntaxKind::FUNC_DECL);
    if p.peek() == SyntaxKind::STATIC_KW {
        p.bump();
    }
    p.bump(); // 'func'
    p.expect(SyntaxKind::IDENT);
    parse_param_list(p)?;
    if p.eat(SyntaxKind::ARROW) {
        parse_type(p)?;
    }
    p.expect(SyntaxKind::COLON);
    crate::resolvers::stmt::parse_block(p)?;
    p.builder.finish_node();
    while p.peek() == SyntaxKind::NEWLINE {
        p.bump();
    }
    Ok(())
}

pub fn parse_param_list(p: &mut Parser) -> Result<(), ParseError> {
    p.builder.start_node(SyntaxKind::PARAM_LIST);
    p.expect(SyntaxKind::L_PAREN);
    while p.peek() != SyntaxKind::R_PAREN && p.peek() != SyntaxKind::EOF {
        p.builder.start_node(SyntaxKind::PARAM);
        p.expect(SyntaxKind::IDENT);
        if p.eat(SyntaxKind::COLON) && p.peek() != SyntaxKind::EQ {
            parse_type(p)?;
        }
        if p.eat(SyntaxKind::EQ) {
            parse_expr(p)?;
        }
        p.builder.finish_node();
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_PAREN);
    p.builder.finish_node();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Parser, DEFAULT_MAX_DEPTH};
    use gdlint_ast::node::Element;

    #[test]
    fn class_with_var_and_func_round_trips() {
        let source = "extends Node\n\nvar counter = 10\n\nfunc method_a():\n    var counter = 0\n    print(counter)\n";
        let mut p = Parser::new(source, DEFAULT_MAX_DEPTH);
        parse_source_file(&mut p).unwrap();
        let tree = p.finish();
        assert_eq!(tree.to_text(Element::Node(tree.root())), source);
    }

    #[test]
    fn property_with_getter_and_setter_round_trips() {
        let source = "var health: int = 100:\n    get:\n        return health\n    set(value):\n        health = value\n";
        let mut p = Parser::new(source, DEFAULT_MAX_DEPTH);
        parse_source_file(&mut p).unwrap();
        let tree = p.finish();
        assert_eq!(tree.to_text(Element::Node(tree.root())), source);
    }

    #[test]
    fn signal_with_params_round_trips() {
        let source = "signal health_changed(old_value, new_value)\n";
        let mut p = Parser::new(source, DEFAULT_MAX_DEPTH);
        parse_source_file(&mut p).unwrap();
        let tree = p.finish();
        assert_eq!(tree.to_text(Element::Node(tree.root())), source);
    }

    #[test]
    fn inner_class_round_trips() {
        let source = "class Inner:\n    var x = 1\n\n    func f():\n        pass\n";
        let mut p = Parser::new(source, DEFAULT_MAX_DEPTH);
        parse_source_file(&mut p).unwrap();
        let tree = p.finish();
        assert_eq!(tree.to_text(Element::Node(tree.root())), source);
    }
}
