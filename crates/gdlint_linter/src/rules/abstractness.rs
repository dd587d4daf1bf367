//! 8xxx — Abstractness (§4.8): declared but unimplemented members.

use super::util::nodes_of_kind;
use crate::rule::{Rule, RuleContext};
use gdlint_ast::{CstNode, FuncDecl, Stmt, SyntaxKind};
use gdlint_diagnostics::{Category, Diagnostic, DiagnosticResult, Severity};

/// Flags a function whose body holds nothing but `pass` (or nothing at
/// all) — the shape of a method stubbed out for a subclass to override
/// rather than one that does anything itself. `_init`/virtual callbacks
/// with a single `pass` are the common, intentional case this exists to
/// surface at `Hint` rather than call out as a defect.
pub struct EmptyFunctionBodyRule;

impl Rule for EmptyFunctionBodyRule {
    fn name(&self) -> &'static str {
        "empty-function-body"
    }

    fn category(&self) -> Category {
        Category::Abstractness
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut DiagnosticResult) {
        for node in nodes_of_kind(ctx.tree, ctx.tree.root(), SyntaxKind::FUNC_DECL) {
            let Some(func) = FuncDecl::cast(ctx.tree, node) else { continue };
            let Some(body) = func.body() else { continue };
            let is_empty = body.statements().all(|s| matches!(s, Stmt::Pass(..)));
            if !is_empty {
                continue;
            }
            let name = func.name().unwrap_or("<anonymous>");
            out.push(Diagnostic::new(
                "GDL8001",
                Category::Abstractness,
                Severity::Hint,
                format!("`{name}` has an empty body"),
                func.range(),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use gdlint_semantic::provider::{NullProjectContext, NullTypeProvider};
    use gdlint_semantic::SemanticModel;
    use gdlint_source::SourceFile;

    fn check(source: &str) -> DiagnosticResult {
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
        EmptyFunctionBodyRule.check(&ctx, &mut out);
        out
    }

    #[test]
    fn pass_only_body_is_flagged() {
        let out = check("extends Node\n\nfunc _ready():\n\tpass\n");
        assert_eq!(out.len(), 1);
        assert_eq!(out.iter().next().unwrap().code, "GDL8001");
    }

    #[test]
    fn body_with_real_work_is_silent() {
        let out = check("extends Node\n\nfunc _ready():\n\tprint(\"hi\")\n");
        assert!(out.is_empty());
    }

    #[test]
    fn multiple_pass_statements_still_count_as_empty() {
        let out = check("extends Node\n\nfunc f():\n\tpass\n\tpass\n");
        assert_eq!(out.len(), 1);
    }
}
