//! 7xxx — Duck typing (§4.8): unknown method on typed receiver.

use crate::rule::{Rule, RuleContext};
use gdlint_ast::{CallExpr, CstNode, Expr, SyntaxKind};
use gdlint_diagnostics::{Category, Diagnostic, DiagnosticResult, Severity};
use gdlint_semantic::{Confidence, SemanticType};

/// Flags `receiver.method(...)` where `receiver` resolved to a known
/// concrete type at `Strict` confidence, yet the runtime-type provider
/// has no member of that name at all (as opposed to calls.rs's
/// `call-arity-mismatch`, which only fires once the member is known to
/// exist). A `Duck`/`Union`/`Variant` receiver is never flagged here —
/// that is exactly the shape this category exists to tolerate (§3
/// "DuckType").
pub struct UnknownMethodOnTypedReceiverRule;

impl Rule for UnknownMethodOnTypedReceiverRule {
    fn name(&self) -> &'static str {
        "unknown-method-on-typed-receiver"
    }

    fn category(&self) -> Category {
        Category::DuckTyping
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
            if !ctx.provider.is_known_type(type_name) {
                continue;
            }
            if ctx.provider.member(type_name, method_name).is_some() {
                continue;
            }
            out.push(Diagnostic::new(
                "GDL7001",
                Category::DuckTyping,
                Severity::Error,
                format!("`{type_name}` has no method `{method_name}`"),
                call.range(),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use gdlint_semantic::provider::{
        MemberInfo, NullProjectContext, ParameterInfo, RuntimeTypeProvider, TypeInfo,
    };
    use gdlint_semantic::types::OperatorKind;
    use gdlint_semantic::{SemanticModel, TypeName};
    use gdlint_source::SourceFile;

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
            (ty == "Node" && name == "get_parent").then(|| MemberInfo {
                name: "get_parent".into(),
                parameters: Vec::<ParameterInfo>::new(),
                return_type: Some("Node".into()),
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
        UnknownMethodOnTypedReceiverRule.check(&ctx, &mut out);
        out
    }

    #[test]
    fn flags_a_genuinely_unknown_method() {
        let out = check("extends Node\n\nfunc f():\n\tvar n: Node = self\n\tn.frobnicate()\n");
        assert!(out.iter().any(|d| d.code == "GDL7001"));
    }

    #[test]
    fn known_method_is_silent() {
        let out = check("extends Node\n\nfunc f():\n\tvar n: Node = self\n\tn.get_parent()\n");
        assert!(out.is_empty());
    }

    #[test]
    fn untyped_receiver_is_not_checked() {
        let out = check("extends Node\n\nfunc f(n):\n\tn.frobnicate()\n");
        assert!(out.is_empty());
    }
}
