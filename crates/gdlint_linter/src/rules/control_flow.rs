//! 5xxx — Control flow (§4.8): `break`/`continue` outside a loop,
//! `return` outside a function.

use super::util::{has_ancestor_before_boundary, nodes_of_kind};
use crate::rule::{Rule, RuleContext};
use gdlint_ast::{CstNode, Element, SyntaxKind};
use gdlint_diagnostics::{Category, Diagnostic, DiagnosticResult, Severity};

const LOOP_KINDS: &[SyntaxKind] = &[SyntaxKind::FOR_STMT, SyntaxKind::WHILE_STMT];
const LOOP_BOUNDARIES: &[SyntaxKind] = &[SyntaxKind::FUNC_DECL, SyntaxKind::LAMBDA_EXPR];
const FUNCTION_BOUNDARIES: &[SyntaxKind] = &[SyntaxKind::FUNC_DECL, SyntaxKind::LAMBDA_EXPR];

/// Flags a `break`/`continue` with no enclosing `for`/`while`, crossing
/// neither a nested function nor a lambda to find one (§4.6: loop
/// control only ever targets the innermost loop reachable without
/// crossing a function boundary).
pub struct LoopControlOutsideLoopRule;

impl Rule for LoopControlOutsideLoopRule {
    fn name(&self) -> &'static str {
        "loop-control-outside-loop"
    }

    fn category(&self) -> Category {
        Category::ControlFlow
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut DiagnosticResult) {
        for kind in [SyntaxKind::BREAK_STMT, SyntaxKind::CONTINUE_STMT] {
            for node in nodes_of_kind(ctx.tree, ctx.tree.root(), kind) {
                if has_ancestor_before_boundary(ctx.tree, node, LOOP_KINDS, LOOP_BOUNDARIES) {
                    continue;
                }
                let keyword = if kind == SyntaxKind::BREAK_STMT { "break" } else { "continue" };
                out.push(Diagnostic::new(
                    "GDL5001",
                    Category::ControlFlow,
                    Severity::Error,
                    format!("`{keyword}` outside a loop"),
                    ctx.tree.range_of(Element::Node(node)),
                ));
            }
        }
    }
}

/// Flags a top-level `return` that is not inside any `func` (GDScript
/// allows bare top-level statements for autoload-style scripts, but a
/// `return` among them has nothing to return from).
pub struct ReturnOutsideFunctionRule;

impl Rule for ReturnOutsideFunctionRule {
    fn name(&self) -> &'static str {
        "return-outside-function"
    }

    fn category(&self) -> Category {
        Category::ControlFlow
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut DiagnosticResult) {
        for node in nodes_of_kind(ctx.tree, ctx.tree.root(), SyntaxKind::RETURN_STMT) {
            if has_ancestor_before_boundary(ctx.tree, node, FUNCTION_BOUNDARIES, &[]) {
                continue;
            }
            out.push(Diagnostic::new(
                "GDL5002",
                Category::ControlFlow,
                Severity::Error,
                "`return` outside a function",
                ctx.tree.range_of(Element::Node(node)),
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

    fn check_with(rule: &dyn Rule, source: &str) -> DiagnosticResult {
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
        rule.check(&ctx, &mut out);
        out
    }

    #[test]
    fn break_inside_for_is_fine() {
        let out = check_with(
            &LoopControlOutsideLoopRule,
            "extends Node\n\nfunc f():\n\tfor i in 3:\n\t\tbreak\n",
        );
        assert!(out.is_empty());
    }

    #[test]
    fn break_outside_any_loop_is_flagged() {
        let out = check_with(&LoopControlOutsideLoopRule, "extends Node\n\nfunc f():\n\tbreak\n");
        assert_eq!(out.len(), 1);
        assert_eq!(out.iter().next().unwrap().code, "GDL5001");
    }

    #[test]
    fn break_inside_lambda_inside_loop_is_flagged() {
        let source = "extends Node\n\nfunc f():\n\tfor i in 3:\n\t\tvar g = func(): break\n";
        let out = check_with(&LoopControlOutsideLoopRule, source);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn return_inside_function_is_fine() {
        let out = check_with(&ReturnOutsideFunctionRule, "extends Node\n\nfunc f():\n\treturn 1\n");
        assert!(out.is_empty());
    }
}
