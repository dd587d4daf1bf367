//! 6xxx — Indentation (§4.8): mixed tabs and spaces within one line's
//! leading whitespace. Operates directly on source lines rather than the
//! tree: indentation is a textual property the CST's zero-width `INDENT`
//! markers deliberately don't retain.

use crate::rule::{Rule, RuleContext};
use gdlint_diagnostics::{Category, Diagnostic, DiagnosticResult, Severity};
use gdlint_text_size::{TextRange, TextSize};

pub struct MixedIndentationRule;

impl Rule for MixedIndentationRule {
    fn name(&self) -> &'static str {
        "mixed-indentation"
    }

    fn category(&self) -> Category {
        Category::Indentation
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut DiagnosticResult) {
        let text = ctx.file.text();
        let mut offset = 0u32;
        for line in text.split_inclusive('\n') {
            let stripped = line.strip_suffix('\n').unwrap_or(line);
            let stripped = stripped.strip_suffix('\r').unwrap_or(stripped);
            let leading_len = stripped.len() - stripped.trim_start_matches([' ', '\t']).len();
            let leading = &stripped[..leading_len];
            let has_space_before_tab = leading
                .char_indices()
                .skip_while(|&(_, c)| c == ' ')
                .any(|(_, c)| c == ' ');
            let has_both = leading.contains(' ') && leading.contains('\t');
            if has_both && has_space_before_tab {
                let start = TextSize::new(offset);
                let end = TextSize::new(offset + leading_len as u32);
                out.push(Diagnostic::new(
                    "GDL6001",
                    Category::Indentation,
                    Severity::Warning,
                    "mixed tabs and spaces in indentation",
                    TextRange::new(start, end),
                ));
            }
            offset += line.len() as u32;
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
        MixedIndentationRule.check(&ctx, &mut out);
        out
    }

    #[test]
    fn pure_tab_indentation_is_silent() {
        let out = check("extends Node\n\nfunc f():\n\tpass\n");
        assert!(out.is_empty());
    }

    #[test]
    fn space_then_tab_is_flagged() {
        let out = check("extends Node\n\nfunc f():\n \tpass\n");
        assert_eq!(out.len(), 1);
        assert_eq!(out.iter().next().unwrap().code, "GDL6001");
    }

    #[test]
    fn tab_then_space_alone_is_not_flagged() {
        // A tab-indented block whose continuation line nudges one extra
        // space in for alignment is common and not a real mix hazard.
        let out = check("extends Node\n\nfunc f():\n\t pass\n");
        assert!(out.is_empty());
    }
}
