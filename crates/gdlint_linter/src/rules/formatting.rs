//! F-series — Formatting (§4.8): whitespace, blank lines, wrapping,
//! type-hint insertion. Like `indentation.rs`, this operates on source
//! lines directly rather than the tree — trailing whitespace is stripped
//! by the lexer before a token is ever produced, so the CST has nothing
//! left to inspect it on.

use crate::rule::{Rule, RuleContext};
use gdlint_diagnostics::{Category, Diagnostic, DiagnosticResult, Severity};
use gdlint_text_size::{TextRange, TextSize};

pub struct TrailingWhitespaceRule;

impl Rule for TrailingWhitespaceRule {
    fn name(&self) -> &'static str {
        "trailing-whitespace"
    }

    fn category(&self) -> Category {
        Category::Formatting
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut DiagnosticResult) {
        let text = ctx.file.text();
        let mut offset = 0u32;
        for line in text.split_inclusive('\n') {
            let stripped = line.strip_suffix('\n').unwrap_or(line);
            let stripped = stripped.strip_suffix('\r').unwrap_or(stripped);
            let trimmed_len = stripped.trim_end_matches([' ', '\t']).len();
            if trimmed_len < stripped.len() {
                let start = TextSize::new(offset + trimmed_len as u32);
                let end = TextSize::new(offset + stripped.len() as u32);
                out.push(Diagnostic::new(
                    "GDL-F001",
                    Category::Formatting,
                    Severity::Warning,
                    "trailing whitespace",
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
        TrailingWhitespaceRule.check(&ctx, &mut out);
        out
    }

    #[test]
    fn clean_lines_are_silent() {
        let out = check("extends Node\n\nfunc f():\n\tpass\n");
        assert!(out.is_empty());
    }

    #[test]
    fn trailing_spaces_are_flagged() {
        let out = check("extends Node \n\nfunc f():\n\tpass\n");
        assert_eq!(out.len(), 1);
        assert_eq!(out.iter().next().unwrap().code, "GDL-F001");
    }

    #[test]
    fn trailing_tab_before_crlf_is_flagged() {
        let out = check("extends Node\r\n\r\nfunc f():\r\n\tpass\t\r\n");
        assert_eq!(out.len(), 1);
    }
}
