//! 4xxx — Calls (§4.8): arity, method-not-found on typed receiver.

use crate::rule::{Rule, RuleContext};
use gdlint_ast::{CallExpr, CstNode, Expr, SyntaxKind};
use gdlint_diagnostics::{Category, Diagnostic, DiagnosticResult, Severity};
use gdlint_semantic::{Confidence, SemanticType};

/// Flags a call whose argument count falls outside the provider-reported
/// parameter shape of a method resolved at `Strict` confidence on a
/// concretely-typed receiver (§4.7: only a Strict resolution is reliable
/// enough to diagnose arity against). Duck-typed/Variant receivers are
/// left to GDL7xxx instead.
pub struct UnknownArityRule;

impl Rule for UnknownArityRule {
    fn name(&self) -> &'static str {
        "call-arity-mismatch"
    }

    fn category(&self) -> Category {
        Category::Calls
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut DiagnosticResult) {
        for node in super::util::nodes_of_kind(ctx.tree, ctx.tree.root(), SyntaxKind::CALL_EXPR) {
            let Some(call) = CallExpr::cast(ctx.tree, node) else { continue };
            let Some(Expr::Member(member)) = call.callee() else { continue };
            let Some(method_name) = member.member_name() else { continue };
            let Some(receiver) = member.receiver() else { continue };
            let Some(typed) = ctx.model.type_of(receiver.node_id()) else { continue };
            if typed.confidence != Confidence::Strict {
                continue;
            }
            let SemanticType::Concrete(type_name) = &typed.ty else { continue };
            let Some(info) = ctx.provider.member(type_name, method_name) else { continue };

            let required = info.parameters.iter().filter(|p| !p.has_default).count();
            let total = info.parameters.len();
            let arg_count = call.args().map(|a| a.args().count()).unwrap_or(0);
            if arg_count < required || arg_count > total {
                out.push(Diagnostic::new(
                    "GDL4001",
                    Category::Calls,
                    Severity::Error,
                    format!(
                        "`{method_name}` takes {} argument(s){}, got {arg_count}",
                        required,
                        if total > required { format!(" (up to {total})") } else { String::new() }
                    ),
                    call.range(),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use gdlint_diagnostics::DiagnosticResult;
    use gdlint_semantic::provider::{
        MemberInfo, NullProjectContext, ParameterInfo, RuntimeTypeProvider, TypeInfo,
    };
    use gdlint_semantic::types::OperatorKind;
    use gdlint_semantic::{SemanticModel, TypeName};
    use gdlint_source::SourceFile;

    /// Reports `Node` as known with a one-required-argument `rename`
    /// method, enough to exercise arity checking end to end.
    struct FakeProvider;

    impl RuntimeTypeProvider for FakeProvider {
        fn is_known_type(&self, name: &str) -> bool {
            name == "Node"
        }
        fn type_info(&self, _name: &str) -> Option<TypeInfo> {
            None
        }
        fn base_type(&self, _name: &str) -> Option<TypeName> {
            None
        }
        fn is_assignable_to(&self, src: &str, dst: &str) -> bool {
            src == dst
        }
        fn member(&self, ty: &str, name: &str) -> Option<MemberInfo> {
            (ty == "Node" && name == "rename").then(|| MemberInfo {
                name: "rename".into(),
                parameters: vec![ParameterInfo {
                    name: "new_name".into(),
                    declared_type: Some("String".into()),
                    has_default: false,
                }],
                return_type: None,
            })
        }
        fn global_function(&self, _name: &str) -> Option<MemberInfo> {
            None
        }
        fn global_class(&self, _name: &str) -> Option<TypeName> {
            None
        }
        fn is_builtin(&self, name: &str) -> bool {
            self.is_known_type(name)
        }
        fn is_numeric(&self, _name: &str) -> bool {
            false
        }
        fn is_string(&self, _name: &str) -> bool {
            false
        }
        fn is_vector(&self, _name: &str) -> bool {
            false
        }
        fn is_iterable(&self, _name: &str) -> bool {
            false
        }
        fn is_indexable(&self, _name: &str) -> bool {
            false
        }
        fn is_nullable(&self, _name: &str) -> bool {
            false
        }
        fn is_container(&self, _name: &str) -> bool {
            false
        }
        fn is_packed_array(&self, _name: &str) -> bool {
            false
        }
        fn iterator_element_type(&self, _name: &str) -> Option<TypeName> {
            None
        }
        fn indexer_result_type(&self, _name: &str) -> Option<TypeName> {
            None
        }
        fn packed_array_element_type(&self, _name: &str) -> Option<TypeName> {
            None
        }
        fn resolve_operator(&self, _left: &str, _op: OperatorKind, _right: &str) -> Option<TypeName> {
            None
        }
    }

    fn check(source: &str) -> DiagnosticResult {
        let file = SourceFile::new("res://a.gd", source);
        let tree = gdlint_parser::parse(source).unwrap();
        let provider = FakeProvider;
        let model = SemanticModel::analyze(&tree, &provider, &NullProjectContext);
        let settings = Settings::default();
        let ctx = RuleContext {
            file: &file,
            tree: &tree,
            model: &model,
            settings: &settings,
            provider: &provider,
        };
        let mut out = DiagnosticResult::new();
        UnknownArityRule.check(&ctx, &mut out);
        out
    }

    #[test]
    fn flags_missing_required_argument() {
        let out = check("extends Node\n\nfunc f():\n\tvar n: Node = self\n\tn.rename()\n");
        assert!(out.iter().any(|d| d.code == "GDL4001"));
    }

    #[test]
    fn correct_arity_is_silent() {
        let out = check("extends Node\n\nfunc f():\n\tvar n: Node = self\n\tn.rename(\"x\")\n");
        assert!(out.is_empty());
    }

    #[test]
    fn untyped_receiver_is_not_checked() {
        let out = check("extends Node\n\nfunc f(n):\n\tn.rename()\n");
        assert!(out.is_empty());
    }
}
