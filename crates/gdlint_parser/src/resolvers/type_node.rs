use crate::error::ParseError;
use crate::parser::Parser;
use gdlint_ast::SyntaxKind;

/// `TYPE_SIMPLE` (`int`, `Node`), `TYPE_GENERIC` (`Array[int]`,
/// `Dictionary[String, int]`), or `TYPE_INFERRED` (bare `:=`, represented
/// as an empty type node the inference engine fills in).
pub fn parse_type(p: &mut Parser) -> Result<(), ParseError> {
    p.enter()?;
    if p.peek() == SyntaxKind::VOID_KW {
        p.builder.start_node(SyntaxKind::TYPE_SIMPLE);
        p.bump();
        p.builder.finish_node();
        return Ok(());
    }
    if p.peek() != SyntaxKind::IDENT {
        p.builder.start_node(SyntaxKind::TYPE_INFERRED);
        p.builder.finish_node();
        return Ok(());
    }
    let checkpoint = p.builder.checkpoint();
    p.bump();
    if p.peek() == SyntaxKind::L_BRACKET {
        p.builder.start_node_at(checkpoint, SyntaxKind::TYPE_GENERIC);
        p.bump();
        parse_type(p)?;
        while p.eat(SyntaxKind::COMMA) {
            parse_type(p)?;
        }
        p.expect(SyntaxKind::R_BRACKET);
        p.builder.finish_node();
    } else {
        p.builder.start_node_at(checkpoint, SyntaxKind::TYPE_SIMPLE);
        p.builder.finish_node();
    }
    Ok(())
}
