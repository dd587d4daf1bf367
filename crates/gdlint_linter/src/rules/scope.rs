//! 2xxx — Scope (§4.8): undefined/duplicate/shadowing.

use super::util::enclosing_scope_of;
use crate::rule::{Rule, RuleContext};
use gdlint_ast::{CstNode, SyntaxKind};
use gdlint_diagnostics::{Category, Diagnostic, DiagnosticResult, Severity};

pub struct DuplicateDeclarationRule;

impl Rule for DuplicateDeclarationRule {
    fn name(&self) -> &'static str {
        "duplicate-declaration"
    }

    fn category(&self) -> Category {
        Category::Scope
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut DiagnosticResult) {
        for dup in ctx.model.duplicate_declarations() {
            let first = ctx.model.scopes().symbol(dup.first);
            let second = ctx.model.scopes().symbol(dup.second);
            let range = ctx.tree.range_of(gdlint_ast::Element::Node(second.node));
            let first_range = ctx.tree.range_of(gdlint_ast::Element::Node(first.node));
            out.push(
                Diagnostic::new(
                    "GDL2001",
                    Category::Scope,
                    Severity::Error,
                    format!("`{}` is already declared in this scope", second.name),
                    range,
                )
                .with_secondary_range(first_range),
            );
        }
    }
}

/// Flags every identifier reference that fails to resolve against the
/// scope tree, the enclosing class, and global — a bare name the
/// inferencer could only fall back to `Variant`/`NameMatch` for (§4.7:
/// "None — the name exists nowhere known; yields an unresolved
/// diagnostic"). `self`/`super` are never flagged; they are resolved
/// structurally, not through the symbol table.
pub struct UnresolvedIdentifierRule;

impl Rule for UnresolvedIdentifierRule {
    fn name(&self) -> &'static str {
        "unresolved-identifier"
    }

    fn category(&self) -> Category {
        Category::Scope
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut DiagnosticResult) {
        for ident_node in super::util::nodes_of_kind(ctx.tree, ctx.tree.root(), SyntaxKind::IDENT_EXPR) {
            let Some(ident) = gdlint_ast::IdentExpr::cast(ctx.tree, ident_node) else {
                continue;
            };
            let Some(name) = ident.name() else { continue };
            if matches!(name, "self" | "super") {
                continue;
            }
            let Some(scope) = enclosing_scope_of(ctx.tree, ctx.model, ident_node) else {
                continue;
            };
            let position = ctx.tree.range_of(gdlint_ast::Element::Node(ident_node)).start();
            if ctx.model.scopes().resolve(scope, name, position).is_some() {
                continue;
            }
            out.push(Diagnostic::new(
                "GDL2002",
                Category::Scope,
                Severity::Warning,
                format!("undefined name `{name}`"),
                ident.range(),
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
    fn flags_redeclared_class_member() {
        let out = check_with(
            &DuplicateDeclarationRule,
            "extends Node\n\nvar counter = 0\nvar counter = 1\n",
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out.iter().next().unwrap().code, "GDL2001");
    }

    #[test]
    fn forward_reference_to_class_member_is_not_undefined() {
        let out = check_with(
            &UnresolvedIdentifierRule,
            "extends Node\n\nfunc f():\n\treturn v\n\nvar v = 10\n",
        );
        assert!(out.iter().all(|d| d.code != "GDL2002"));
    }

    #[test]
    fn flags_a_genuinely_undefined_name() {
        let out = check_with(&UnresolvedIdentifierRule, "extends Node\n\nfunc f():\n\treturn nope\n");
        assert!(out.iter().any(|d| d.code == "GDL2002"));
    }

    #[test]
    fn local_variable_before_its_declaration_is_undefined() {
        let out = check_with(
            &UnresolvedIdentifierRule,
            "extends Node\n\nfunc f():\n\tprint(x)\n\tvar x = 1\n",
        );
        assert!(out.iter().any(|d| d.code == "GDL2002"));
    }
}
