//! 1xxx — Syntax (§4.8): invalid tokens, missing brackets, unexpected
//! tokens. The parser never hard-fails on these (§4.1 error recovery); it
//! absorbs them into `INVALID_TOKEN` leaves for this rule to surface.

use super::util::tokens_of_kind;
use crate::rule::{Rule, RuleContext};
use gdlint_ast::SyntaxKind;
use gdlint_diagnostics::{Category, Diagnostic, Severity};

pub struct InvalidTokenRule;

impl Rule for InvalidTokenRule {
    fn name(&self) -> &'static str {
        "invalid-token"
    }

    fn category(&self) -> Category {
        Category::Syntax
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut gdlint_diagnostics::DiagnosticResult) {
        for token_id in tokens_of_kind(ctx.tree, ctx.tree.root(), SyntaxKind::INVALID_TOKEN) {
            let token = ctx.tree.token(token_id);
            out.push(Diagnostic::new(
                "GDL1001",
                Category::Syntax,
                Severity::Error,
                format!("unexpected token `{}`", token.text()),
                token.range(),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use gdlint_diagnostics::DiagnosticResult;
    use gdlint_semantic::provider::{NullProjectContext, NullTypeProvider};
    use gdlint_semantic::SemanticModel;
    use gdlint_source::SourceFile;

    #[test]
    fn flags_an_invalid_token() {
        let source = "extends Node\n\nvar x = `oops`\n";
        let file = SourceFile::new("res://a.gd", source);
        let tree = gdlint_parser::parse(source).unwrap();
        let model = SemanticModel::analyze(&tree, &NullTypeProvider, &NullProjectContext);
        let settings = Settings::default();
        let ctx = RuleContext {
            file: &file,
            tree: &tree,
            model: &model,
            settings: &settings,
            provider: &NullTypeProvider,
        };
        let mut out = DiagnosticResult::new();
        InvalidTokenRule.check(&ctx, &mut out);
        assert!(out.iter().any(|d| d.code == "GDL1001"));
    }

    #[test]
    fn clean_source_has_no_syntax_diagnostics() {
        let source = "extends Node\n\nvar x = 1\n";
        let file = SourceFile::new("res://a.gd", source);
        let tree = gdlint_parser::parse(source).unwrap();
        let model = SemanticModel::analyze(&tree, &NullTypeProvider, &NullProjectContext);
        let settings = Settings::default();
        let ctx = RuleContext {
            file: &file,
            tree: &tree,
            model: &model,
            settings: &settings,
            provider: &NullTypeProvider,
        };
        let mut out = DiagnosticResult::new();
        InvalidTokenRule.check(&ctx, &mut out);
        assert!(out.is_empty());
    }
}
