//! Expression resolver: precedence-climbing over the ladder in §4.1
//! ("unary → exponent → multiplicative → additive → shift → bitwise →
//! comparison → is/as/in → logical-not → logical-and → logical-or →
//! ternary → assignment"), tightest first. Each level function parses the
//! next-tighter level, then folds in zero or more operators at its own
//! level using a [`gdlint_ast::Checkpoint`] to retroactively wrap the
//! left operand.

use crate::error::ParseError;
use crate::parser::Parser;
use crate::resolvers::type_node::parse_type;
use gdlint_ast::SyntaxKind;

pub fn parse_expr(p: &mut Parser) -> Result<(), ParseError> {
    p.enter()?;
    parse_assignment(p)
}

fn parse_assignment(p: &mut Parser) -> Result<(), ParseError> {
    let checkpoint = p.builder.checkpoint();
    parse_ternary(p)?;
    const ASSIGN_OPS: &[SyntaxKind] = &[
        SyntaxKind::EQ,
        SyntaxKind::PLUS_EQ,
        SyntaxKind::MINUS_EQ,
        SyntaxKind::STAR_EQ,
        SyntaxKind::SLASH_EQ,
        SyntaxKind::PERCENT_EQ,
        SyntaxKind::AMP_EQ,
        SyntaxKind::PIPE_EQ,
        SyntaxKind::CARET_EQ,
        SyntaxKind::SHL_EQ,
        SyntaxKind::SHR_EQ,
    ];
    if ASSIGN_OPS.contains(&p.peek()) {
        p.builder.start_node_at(checkpoint, SyntaxKind::BINARY_EXPR);
        p.bump();
        parse_assignment(p)?; // right-associative
        p.builder.finish_node();
    }
    Ok(())
}

fn parse_ternary(p: &mut Parser) -> Result<(), ParseError> {
    let checkpoint = p.builder.checkpoint();
    parse_or(p)?;
    if p.peek() == SyntaxKind::IF_KW {
        p.builder.start_node_at(checkpoint, SyntaxKind::IF_EXPR);
        p.bump();
        parse_or(p)?;
        p.expect(SyntaxKind::ELSE_KW);
        parse_ternary(p)?;
        p.builder.finish_node();
    }
    Ok(())
}

fn parse_or(p: &mut Parser) -> Result<(), ParseError> {
    let checkpoint = p.builder.checkpoint();
    parse_and(p)?;
    while matches!(p.peek(), SyntaxKind::OR_KW | SyntaxKind::PIPE_PIPE) {
        p.builder.start_node_at(checkpoint, SyntaxKind::BINARY_EXPR);
        p.bump();
        parse_and(p)?;
        p.builder.finish_node();
    }
    Ok(())
}

fn parse_and(p: &mut Parser) -> Result<(), ParseError> {
    let checkpoint = p.builder.checkpoint();
    parse_not(p)?;
    while matches!(p.peek(), SyntaxKind::AND_KW | SyntaxKind::AMP_AMP) {
        p.builder.start_node_at(checkpoint, SyntaxKind::BINARY_EXPR);
        p.bump();
        parse_not(p)?;
        p.builder.finish_node();
    }
    Ok(())
}

fn parse_not(p: &mut Parser) -> Result<(), ParseError> {
    if p.peek() == SyntaxKind::NOT_KW {
        p.enter()?;
        p.builder.start_node(SyntaxKind::UNARY_EXPR);
        p.bump();
        parse_not(p)?;
        p.builder.finish_node();
        return Ok(());
    }
    parse_is_as_in(p)
}

fn parse_is_as_in(p: &mut Parser) -> Result<(), ParseError> {
    let checkpoint = p.builder.checkpoint();
    parse_comparison(p)?;
    loop {
        match p.peek() {
            SyntaxKind::IS_KW => {
                p.builder.start_node_at(checkpoint, SyntaxKind::IS_EXPR);
                p.bump();
                parse_type(p)?;
                p.builder.finish_node();
            }
            SyntaxKind::AS_KW => {
                p.builder.start_node_at(checkpoint, SyntaxKind::AS_EXPR);
                p.bump();
                parse_type(p)?;
                p.builder.finish_node();
            }
            SyntaxKind::IN_KW => {
                p.builder.start_node_at(checkpoint, SyntaxKind::IN_EXPR);
                p.bump();
                parse_comparison(p)?;
                p.builder.finish_node();
            }
            _ => break,
        }
    }
    Ok(())
}

fn parse_comparison(p: &mut Parser) -> Result<(), ParseError> {
    let checkpoint = p.builder.checkpoint();
    parse_bitwise(p)?;
    const OPS: &[SyntaxKind] = &[
        SyntaxKind::EQ_EQ,
        SyntaxKind::NOT_EQ,
        SyntaxKind::LT,
        SyntaxKind::GT,
        SyntaxKind::LT_EQ,
        SyntaxKind::GT_EQ,
    ];
    while OPS.contains(&p.peek()) {
        p.builder.start_node_at(checkpoint, SyntaxKind::BINARY_EXPR);
        p.bump();
        parse_bitwise(p)?;
        p.builder.finish_node();
    }
    Ok(())
}

fn parse_bitwise(p: &mut Parser) -> Result<(), ParseError> {
    let checkpoint = p.builder.checkpoint();
    parse_shift(p)?;
    while matches!(p.peek(), SyntaxKind::AMP | SyntaxKind::PIPE | SyntaxKind::CARET) {
        p.builder.start_node_at(checkpoint, SyntaxKind::BINARY_EXPR);
        p.bump();
        parse_shift(p)?;
        p.builder.finish_node();
    }
    Ok(())
}

fn parse_shift(p: &mut Parser) -> Result<(), ParseError> {
    let checkpoint = p.builder.checkpoint();
    parse_additive(p)?;
    while matches!(p.peek(), SyntaxKind::SHL | SyntaxKind::SHR) {
        p.builder.start_node_at(checkpoint, SyntaxKind::BINARY_EXPR);
        p.bump();
        parse_additive(p)?;
        p.builder.finish_node();
    }
    Ok(())
}

fn parse_additive(p: &mut Parser) -> Result<(), ParseError> {
    let checkpoint = p.builder.checkpoint();
    parse_multiplicative(p)?;
    while matches!(p.peek(), SyntaxKind::PLUS | SyntaxKind::MINUS) {
        p.builder.start_node_at(checkpoint, SyntaxKind::BINARY_EXPR);
        p.bump();
        parse_multiplicative(p)?;
        p.builder.finish_node();
    }
    Ok(())
}

fn parse_multiplicative(p: &mut Parser) -> Result<(), ParseError> {
    let checkpoint = p.builder.checkpoint();
    parse_exponent(p)?;
    while matches!(p.peek(), SyntaxKind::STAR | SyntaxKind::SLASH | SyntaxKind::PERCENT) {
        p.builder.start_node_at(checkpoint, SyntaxKind::BINARY_EXPR);
        p.bump();
        parse_exponent(p)?;
        p.builder.finish_node();
    }
    Ok(())
}

fn parse_exponent(p: &mut Parser) -> Result<(), ParseError> {
    let checkpoint = p.builder.checkpoint();
    parse_unary(p)?;
    if p.peek() == SyntaxKind::STAR_STAR {
        p.builder.start_node_at(checkpoint, SyntaxKind::BINARY_EXPR);
        p.bump();
        parse_exponent(p)?; // right-associative
        p.builder.finish_node();
    }
    Ok(())
}

fn parse_unary(p: &mut Parser) -> Result<(), ParseError> {
    if matches!(
        p.peek(),
        SyntaxKind::PLUS | SyntaxKind::MINUS | SyntaxKind::TILDE | SyntaxKind::BANG
    ) {
        p.enter()?;
        p.builder.start_node(SyntaxKind::UNARY_EXPR);
        p.bump();
        parse_unary(p)?;
        p.builder.finish_node();
        return Ok(());
    }
    parse_postfix(p)
}

fn parse_postfix(p: &mut Parser) -> Result<(), ParseError> {
    let checkpoint = p.builder.checkpoint();
    parse_primary(p)?;
    loop {
        match p.peek() {
            SyntaxKind::DOT => {
                p.builder.start_node_at(checkpoint, SyntaxKind::MEMBER_EXPR);
                p.bump();
                p.expect(SyntaxKind::IDENT);
                p.builder.finish_node();
            }
            SyntaxKind::L_PAREN => {
                p.builder.start_node_at(checkpoint, SyntaxKind::CALL_EXPR);
                parse_arg_list(p)?;
                p.builder.finish_node();
            }
            SyntaxKind::L_BRACKET => {
                p.builder.start_node_at(checkpoint, SyntaxKind::INDEX_EXPR);
                p.bump();
                parse_expr(p)?;
                p.expect(SyntaxKind::R_BRACKET);
                p.builder.finish_node();
            }
            _ => break,
        }
    }
    Ok(())
}

fn parse_arg_list(p: &mut Parser) -> Result<(), ParseError> {
    p.enter()?;
    p.builder.start_node(SyntaxKind::ARG_LIST);
    p.bump(); // '('
    while p.peek() != SyntaxKind::R_PAREN && p.peek() != SyntaxKind::EOF {
        parse_expr(p)?;
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_PAREN);
    p.builder.finish_node();
    Ok(())
}

fn parse_primary(p: &mut Parser) -> Result<(), ParseError> {
    p.enter()?;
    match p.peek() {
        SyntaxKind::INT_LITERAL
        | SyntaxKind::FLOAT_LITERAL
        | SyntaxKind::STRING_LITERAL
        | SyntaxKind::STRING_NAME_LITERAL
        | SyntaxKind::NODE_PATH_LITERAL
        | SyntaxKind::BOOL_LITERAL
        | SyntaxKind::NULL_LITERAL => {
            p.builder.start_node(SyntaxKind::LITERAL_EXPR);
            p.bump();
            p.builder.finish_node();
        }
        SyntaxKind::IDENT | SyntaxKind::SELF_KW | SyntaxKind::SUPER_KW | SyntaxKind::PRELOAD_KW => {
            p.builder.start_node(SyntaxKind::IDENT_EXPR);
            p.bump();
            p.builder.finish_node();
        }
        SyntaxKind::L_PAREN => {
            p.builder.start_node(SyntaxKind::PAREN_EXPR);
            p.bump();
            parse_expr(p)?;
            p.expect(SyntaxKind::R_PAREN);
            p.builder.finish_node();
        }
        SyntaxKind::L_BRACKET => parse_array(p)?,
        SyntaxKind::L_BRACE => parse_dict(p)?,
        SyntaxKind::DOLLAR => parse_get_node(p)?,
        SyntaxKind::PERCENT_SIGN => {
            p.builder.start_node(SyntaxKind::UNIQUE_NODE_EXPR);
            p.bump();
            p.expect(SyntaxKind::IDENT);
            p.builder.finish_node();
        }
        SyntaxKind::FUNC_KW => parse_lambda(p)?,
        _ => p.recover_one(),
    }
    Ok(())
}

fn parse_array(p: &mut Parser) -> Result<(), ParseError> {
    p.enter()?;
    p.builder.start_node(SyntaxKind::ARRAY_EXPR);
    p.bump(); // '['
    while p.peek() != SyntaxKind::R_BRACKET && p.peek() != SyntaxKind::EOF {
        parse_expr(p)?;
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_BRACKET);
    p.builder.finish_node();
    Ok(())
}

fn parse_dict(p: &mut Parser) -> Result<(), ParseError> {
    p.enter()?;
    p.builder.start_node(SyntaxKind::DICT_EXPR);
    p.bump(); // '{'
    while p.peek() != SyntaxKind::R_BRACE && p.peek() != SyntaxKind::EOF {
        p.builder.start_node(SyntaxKind::DICT_ENTRY);
        parse_expr(p)?;
        p.expect(SyntaxKind::COLON);
        parse_expr(p)?;
        p.builder.finish_node();
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_BRACE);
    p.builder.finish_node();
    Ok(())
}

/// `$Path/To/Node` or `$"Path"` — an unquoted path is just a run of
/// `IDENT`/`DOT`/`SLASH` tokens, so no dedicated lexer support is needed.
fn parse_get_node(p: &mut Parser) -> Result<(), ParseError> {
    p.enter()?;
    p.builder.start_node(SyntaxKind::GET_NODE_EXPR);
    p.bump(); // '$'
    if p.peek() == SyntaxKind::STRING_LITERAL {
        p.bump();
    } else {
        while matches!(p.peek(), SyntaxKind::IDENT | SyntaxKind::SLASH | SyntaxKind::DOT) {
            p.bump();
        }
    }
    p.builder.finish_node();
    Ok(())
}

fn parse_lambda(p: &mut Parser) -> Result<(), ParseError> {
    p.enter()?;
    p.builder.start_node(SyntaxKind::LAMBDA_EXPR);
    p.bump(); // 'func'
    if p.peek() == SyntaxKind::IDENT {
        p.bump(); // optional name
    }
    crate::resolvers::class_member::parse_param_list(p)?;
    if p.eat(SyntaxKind::ARROW) {
        parse_type(p)?;
    }
    p.expect(SyntaxKind::COLON);
    crate::resolvers::stmt::parse_block(p)?;
    p.builder.finish_node();
    Ok(())
}
