//! The built-in rule catalogue (§4.8), one or two rules per category —
//! enough to exercise the framework end to end, not an exhaustive style
//! guide (§1).

pub mod abstractness;
pub mod calls;
pub mod control_flow;
pub mod duck_typing;
pub mod formatting;
pub mod indentation;
pub mod scope;
pub mod style;
pub mod syntax;
pub mod types;
mod util;

use crate::rule::Rule;

/// Every built-in rule, in the fixed registration order the engine uses
/// to break same-position ties (§5).
pub fn all() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(syntax::InvalidTokenRule),
        Box::new(scope::DuplicateDeclarationRule),
        Box::new(scope::UnresolvedIdentifierRule),
        Box::new(types::NullableAccessRule),
        Box::new(calls::UnknownArityRule),
        Box::new(control_flow::LoopControlOutsideLoopRule),
        Box::new(control_flow::ReturnOutsideFunctionRule),
        Box::new(indentation::MixedIndentationRule),
        Box::new(duck_typing::UnknownMethodOnTypedReceiverRule),
        Box::new(abstractness::EmptyFunctionBodyRule),
        Box::new(style::NamingConventionRule),
        Box::new(style::UnusedVariableRule),
        Box::new(formatting::TrailingWhitespaceRule),
    ]
}
