//! Runs a registered rule set over one file's tree and semantic model,
//! then filters the result through settings and suppression pragmas
//! (§4.8, §5). Builds the per-file context once, runs every applicable
//! check against it, then post-processes the combined output rather than
//! letting each check own its own pass over the source text.

use crate::rule::{Rule, RuleContext};
use crate::settings::Settings;
use crate::suppression::SuppressionIndex;
use gdlint_ast::Tree;
use gdlint_diagnostics::DiagnosticResult;
use gdlint_semantic::provider::RuntimeTypeProvider;
use gdlint_semantic::SemanticModel;
use gdlint_source::{SourceFile, SourceLocator};
use rustc_hash::FxHashMap;

/// An ordered, reusable rule set (§5: "a rule instance is reused, never
/// file-scoped"). Construct once per process, run against every file.
pub struct RuleEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleEngine {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// The full built-in catalogue (§4.8 categories), in registration
    /// order — diagnostics at the same position keep this order (§5).
    pub fn with_default_rules() -> Self {
        Self::new(crate::rules::all())
    }

    #[tracing::instrument(skip_all, fields(file = file.name()))]
    pub fn run(
        &self,
        file: &SourceFile,
        tree: &Tree,
        model: &SemanticModel<'_>,
        settings: &Settings,
        provider: &dyn RuntimeTypeProvider,
    ) -> DiagnosticResult {
        let ctx = RuleContext {
            file,
            tree,
            model,
            settings,
            provider,
        };

        let mut raw = DiagnosticResult::new();
        // Which rule produced each code, recorded as each rule runs rather
        // than guessed back from the category prefix afterwards — two
        // rules can share a category, and a prefix can't tell them apart.
        let mut code_to_rule: FxHashMap<String, &'static str> = FxHashMap::default();
        for rule in &self.rules {
            if !settings.rules.is_enabled(rule.name(), rule.name()) {
                continue;
            }
            let before = raw.len();
            rule.check(&ctx, &mut raw);
            for d in raw.iter().skip(before) {
                code_to_rule.entry(d.code.clone()).or_insert_with(|| rule.name());
            }
            tracing::trace!(rule = rule.name(), produced = raw.len() - before, "rule ran");
        }

        let locator = SourceLocator::new(file.text());
        let suppression = SuppressionIndex::build(tree, &locator);
        let mut result: DiagnosticResult = raw
            .into_vec()
            .into_iter()
            .filter_map(|mut d| {
                let name = code_to_rule.get(&d.code).copied().unwrap_or("");
                if !settings.rules.is_enabled(&d.code, name) {
                    return None;
                }
                if let Some(severity) = settings.rules.severity_for(&d.code, name) {
                    d.severity = severity;
                }
                let line = file.source_location(d.range.start()).line;
                (!suppression.is_suppressed(&d.code, name, line)).then_some(d)
            })
            .collect();
        result.sort_by_position();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdlint_semantic::provider::{NullProjectContext, NullTypeProvider};

    #[test]
    fn engine_runs_default_rules_without_panicking() {
        let source = "extends Node\n\nvar x = 1\n\nfunc f():\n\tvar y = x\n\treturn y\n";
        let file = SourceFile::new("res://a.gd", source);
        let tree = gdlint_parser::parse(source).unwrap();
        let model = SemanticModel::analyze(&tree, &NullTypeProvider, &NullProjectContext);
        let settings = Settings::default();
        let engine = RuleEngine::with_default_rules();
        let result = engine.run(&file, &tree, &model, &settings, &NullTypeProvider);
        // Just exercising the pipeline end to end; specific diagnostics are
        // covered by each rule's own tests.
        let _ = result.len();
    }

    #[test]
    fn disabling_a_rule_removes_its_diagnostics() {
        let source = "extends Node\n\nvar player_speed = 1\nvar player_speed = 2\n";
        let file = SourceFile::new("res://a.gd", source);
        let tree = gdlint_parser::parse(source).unwrap();
        let model = SemanticModel::analyze(&tree, &NullTypeProvider, &NullProjectContext);
        let mut settings = Settings::default();
        settings.rules.disable("duplicate-declaration");
        let engine = RuleEngine::with_default_rules();
        let result = engine.run(&file, &tree, &model, &settings, &NullTypeProvider);
        assert!(result.iter().all(|d| d.code != "GDL2001"));
    }

    /// `duplicate-declaration` and `unresolved-identifier` share
    /// `Category::Scope`; disabling the second-registered one of the pair
    /// by name must not silently disable the first instead.
    #[test]
    fn disabling_the_second_rule_in_a_shared_category_only_removes_its_own_diagnostics() {
        let source = "extends Node\n\nvar player_speed = 1\nvar player_speed = 2\n\nfunc f():\n\treturn nope\n";
        let file = SourceFile::new("res://a.gd", source);
        let tree = gdlint_parser::parse(source).unwrap();
        let model = SemanticModel::analyze(&tree, &NullTypeProvider, &NullProjectContext);
        let mut settings = Settings::default();
        settings.rules.disable("unresolved-identifier");
        let engine = RuleEngine::with_default_rules();
        let result = engine.run(&file, &tree, &model, &settings, &NullTypeProvider);
        assert!(result.iter().any(|d| d.code == "GDL2001"));
        assert!(result.iter().all(|d| d.code != "GDL2002"));
    }
}
