//! The [`Rule`] trait and [`RuleContext`] every rule runs against (§4.8).
//!
//! Each rule gets a read-only view of the file plus its analyzed semantics
//! and pushes diagnostics into a shared sink, rather than returning its own
//! result type the engine has to merge.

use crate::settings::Settings;
use gdlint_ast::Tree;
use gdlint_diagnostics::{Category, DiagnosticResult};
use gdlint_semantic::provider::RuntimeTypeProvider;
use gdlint_semantic::SemanticModel;
use gdlint_source::SourceFile;

/// Everything a rule needs, bundled so [`crate::engine::RuleEngine`] can
/// hand it out without every rule threading four separate parameters.
pub struct RuleContext<'a> {
    pub file: &'a SourceFile,
    pub tree: &'a Tree,
    pub model: &'a SemanticModel<'a>,
    pub settings: &'a Settings,
    /// The same provider the semantic model was built against, so a rule
    /// can ask for parameter/member shape the model doesn't itself retain
    /// (§4.9 "rules consume the annotated tree and the semantic model",
    /// the provider being the third leg of what inference consulted).
    pub provider: &'a dyn RuntimeTypeProvider,
}

/// One diagnostic-producing check (§4.8). `name` and `category` identify
/// it for settings overrides and suppression matching; `check` does the
/// actual analysis, appending to `out`.
///
/// Implementations hold no state between calls — the same `&dyn Rule` runs
/// against every file in a project (§5 "a rule instance is reused, never
/// file-scoped").
pub trait Rule: Send + Sync {
    /// Stable rule name used by settings and suppression pragmas
    /// (`duplicate-declaration`, not `GDL2001`).
    fn name(&self) -> &'static str;

    fn category(&self) -> Category;

    fn check(&self, ctx: &RuleContext<'_>, out: &mut DiagnosticResult);
}
