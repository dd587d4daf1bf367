//! L-series — Style (§4.8): naming, unused, best practice.

use super::util::{enclosing_scope_of, nodes_of_kind};
use crate::rule::{Rule, RuleContext};
use crate::settings::NamingCase;
use gdlint_ast::{
    ClassNameClause, ConstDecl, CstNode, Element, EnumDecl, EnumValue, FuncDecl, IdentExpr, InnerClassDecl,
    SignalDecl, SyntaxKind, VarDecl,
};
use gdlint_diagnostics::{Category, Diagnostic, DiagnosticResult, Severity};
use gdlint_semantic::SymbolKind;
use rustc_hash::FxHashSet;

fn check_case(name: &str, case: NamingCase, kind: &str, range: gdlint_text_size::TextRange, out: &mut DiagnosticResult) {
    if case.matches(name) {
        return;
    }
    out.push(Diagnostic::new(
        "GDL-L001",
        Category::Style,
        Severity::Warning,
        format!("{kind} `{name}` should be {}", case.describe()),
        range,
    ));
}

/// Checks every declaration kind `Settings::naming` has a case policy for
/// against that policy, one diagnostic per offending name. Parameters have
/// no policy of their own (§6 only lists variable/constant/function/
/// signal/class/enum/enum-value) and are left unchecked.
pub struct NamingConventionRule;

impl Rule for NamingConventionRule {
    fn name(&self) -> &'static str {
        "naming-convention"
    }

    fn category(&self) -> Category {
        Category::Style
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut DiagnosticResult) {
        let naming = &ctx.settings.naming;

        for node in nodes_of_kind(ctx.tree, ctx.tree.root(), SyntaxKind::VAR_DECL) {
            let Some(decl) = VarDecl::cast(ctx.tree, node) else { continue };
            let Some(name) = decl.name() else { continue };
            check_case(name, naming.variable, "variable", decl.range(), out);
        }
        for node in nodes_of_kind(ctx.tree, ctx.tree.root(), SyntaxKind::CONST_DECL) {
            let Some(decl) = ConstDecl::cast(ctx.tree, node) else { continue };
            let Some(name) = decl.name() else { continue };
            check_case(name, naming.constant, "constant", decl.range(), out);
        }
        for node in nodes_of_kind(ctx.tree, ctx.tree.root(), SyntaxKind::FUNC_DECL) {
            let Some(decl) = FuncDecl::cast(ctx.tree, node) else { continue };
            let Some(name) = decl.name() else { continue };
            check_case(name, naming.function, "function", decl.range(), out);
        }
        for node in nodes_of_kind(ctx.tree, ctx.tree.root(), SyntaxKind::SIGNAL_DECL) {
            let Some(decl) = SignalDecl::cast(ctx.tree, node) else { continue };
            let Some(name) = decl.name() else { continue };
            check_case(name, naming.signal, "signal", decl.range(), out);
        }
        for node in nodes_of_kind(ctx.tree, ctx.tree.root(), SyntaxKind::CLASS_NAME_CLAUSE) {
            let Some(decl) = ClassNameClause::cast(ctx.tree, node) else { continue };
            let Some(name) = decl.name() else { continue };
            check_case(name, naming.class, "class", decl.range(), out);
        }
        for node in nodes_of_kind(ctx.tree, ctx.tree.root(), SyntaxKind::INNER_CLASS_DECL) {
            let Some(decl) = InnerClassDecl::cast(ctx.tree, node) else { continue };
            let Some(name) = decl.name() else { continue };
            check_case(name, naming.class, "class", decl.range(), out);
        }
        for node in nodes_of_kind(ctx.tree, ctx.tree.root(), SyntaxKind::ENUM_DECL) {
            let Some(decl) = EnumDecl::cast(ctx.tree, node) else { continue };
            let Some(name) = decl.name() else { continue };
            check_case(name, naming.enum_name, "enum", decl.range(), out);
            for value in decl.values() {
                let Some(value_name) = value.name() else { continue };
                check_case(value_name, naming.enum_value, "enum value", value.range(), out);
            }
        }
    }
}

/// Flags a local variable (inside a method/lambda/loop/branch scope, not
/// a class member) whose name is never referenced anywhere else in the
/// file — neither read nor written to again after its declaration. A
/// class-level member is never flagged, since another script may use it
/// through `extends`/autoload without this file ever referencing it back.
pub struct UnusedVariableRule;

impl Rule for UnusedVariableRule {
    fn name(&self) -> &'static str {
        "unused-variable"
    }

    fn category(&self) -> Category {
        Category::Style
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut DiagnosticResult) {
        let mut referenced = FxHashSet::default();
        for node in nodes_of_kind(ctx.tree, ctx.tree.root(), SyntaxKind::IDENT_EXPR) {
            let Some(ident) = IdentExpr::cast(ctx.tree, node) else { continue };
            let Some(name) = ident.name() else { continue };
            let Some(scope) = enclosing_scope_of(ctx.tree, ctx.model, node) else { continue };
            let position = ctx.tree.range_of(Element::Node(node)).start();
            if let Some(symbol) = ctx.model.scopes().resolve(scope, name, position) {
                referenced.insert(symbol);
            }
        }

        for (id, symbol) in ctx.model.scopes().symbols() {
            if symbol.kind != SymbolKind::Variable {
                continue;
            }
            if !ctx.model.scopes().kind_of(symbol.scope).is_position_sensitive() {
                continue;
            }
            if referenced.contains(&id) {
                continue;
            }
            out.push(Diagnostic::new(
                "GDL-L002",
                Category::Style,
                Severity::Warning,
                format!("`{}` is never used", symbol.name),
                ctx.tree.range_of(Element::Node(symbol.node)),
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
    fn pascal_case_variable_is_flagged() {
        let out = check_with(&NamingConventionRule, "extends Node\n\nvar PlayerSpeed = 1\n");
        assert!(out.iter().any(|d| d.code == "GDL-L001"));
    }

    #[test]
    fn snake_case_variable_is_silent() {
        let out = check_with(&NamingConventionRule, "extends Node\n\nvar player_speed = 1\n");
        assert!(out.iter().all(|d| d.code != "GDL-L001"));
    }

    #[test]
    fn snake_case_constant_is_flagged_because_constants_want_screaming_snake() {
        let out = check_with(&NamingConventionRule, "extends Node\n\nconst max_speed = 10\n");
        assert!(out.iter().any(|d| d.code == "GDL-L001"));
    }

    #[test]
    fn function_named_in_pascal_case_is_flagged() {
        let out = check_with(&NamingConventionRule, "extends Node\n\nfunc DoThing():\n\tpass\n");
        assert!(out.iter().any(|d| d.code == "GDL-L001"));
    }

    #[test]
    fn unused_local_variable_is_flagged() {
        let out = check_with(&UnusedVariableRule, "extends Node\n\nfunc f():\n\tvar unused = 1\n\tpass\n");
        assert!(out.iter().any(|d| d.code == "GDL-L002"));
    }

    #[test]
    fn variable_referenced_later_is_not_flagged() {
        let out = check_with(
            &UnusedVariableRule,
            "extends Node\n\nfunc f():\n\tvar count = 1\n\treturn count\n",
        );
        assert!(out.iter().all(|d| d.code != "GDL-L002"));
    }

    #[test]
    fn class_level_member_is_never_flagged_as_unused() {
        let out = check_with(&UnusedVariableRule, "extends Node\n\nvar never_read = 1\n");
        assert!(out.iter().all(|d| d.code != "GDL-L002"));
    }
}
