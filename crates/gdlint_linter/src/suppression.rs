//! Suppression pragmas (§6): `# gdlint:ignore=<code>[,<code>...]` suppresses
//! matching diagnostics on the line it's attached to; `# gdlint:disable=...`
//! / `# gdlint:enable=...` toggle a block of lines. Matches against both a
//! diagnostic's numeric code (`GDL2001`) and its rule name
//! (`duplicate-declaration`).
//!
//! Built once per file by scanning every `COMMENT` token in the tree, then
//! consulted per diagnostic: collect all the directives up front, filter
//! after the fact, rather than threading suppression state through each
//! rule's own traversal.

use gdlint_ast::{Element, Tree};
use gdlint_text_size::{OneIndexed, TextSize};
use rustc_hash::FxHashMap;

const IGNORE_PREFIX: &str = "gdlint:ignore=";
const DISABLE_PREFIX: &str = "gdlint:disable=";
const ENABLE_PREFIX: &str = "gdlint:enable=";
const DISABLE_ALL: &str = "gdlint:disable";
const ENABLE_ALL: &str = "gdlint:enable";

#[derive(Debug, Clone)]
enum Directive {
    /// Suppresses every diagnostic on its line.
    IgnoreAll,
    /// Suppresses only the listed codes/names on its line.
    IgnoreSome(Vec<String>),
}

#[derive(Debug, Clone)]
enum BlockDirective {
    DisableAll,
    DisableSome(Vec<String>),
    EnableAll,
    EnableSome(Vec<String>),
}

/// Per-file index of suppression pragmas, built once and reused across
/// every rule's output (§6).
#[derive(Debug, Clone, Default)]
pub struct SuppressionIndex {
    /// `# gdlint:ignore=...` directives, by the 1-based line they apply to.
    line_directives: FxHashMap<u32, Directive>,
    /// `# gdlint:disable`/`enable` directives, in source order by line.
    block_directives: Vec<(u32, BlockDirective)>,
}

impl SuppressionIndex {
    /// Scans every comment token in `tree` for a recognized pragma.
    pub fn build(tree: &Tree, locator: &gdlint_source::SourceLocator<'_>) -> Self {
        let mut index = Self::default();
        let mut comments = Vec::new();
        collect_comments(tree, Element::Node(tree.root()), &mut comments);
        for token_id in comments {
            let token = tree.token(token_id);
            let line = locator.locate(token.range().start()).line;
            let text = token.text().trim_start_matches('#').trim();
            if let Some(directive) = parse_line_directive(text) {
                index.line_directives.insert(line.get(), directive);
            } else if let Some(directive) = parse_block_directive(text) {
                index.block_directives.push((line.get(), directive));
            }
        }
        index
    }

    /// Whether a diagnostic with the given `code`/`name` at `line` is
    /// suppressed by either a line-scoped `ignore` or an active
    /// `disable`/`enable` block.
    pub fn is_suppressed(&self, code: &str, name: &str, line: OneIndexed) -> bool {
        let line = line.get();
        if let Some(directive) = self.line_directives.get(&line) {
            let matched = match directive {
                Directive::IgnoreAll => true,
                Directive::IgnoreSome(codes) => matches_any(codes, code, name),
            };
            if matched {
                return true;
            }
        }
        self.disabled_at(line, code, name)
    }

    /// Replays every block directive up to and including `line`, returning
    /// whether `code`/`name` is disabled at that point. Block state is
    /// recomputed per query rather than precomputed per line: files rarely
    /// carry more than a handful of disable/enable pairs, so a linear scan
    /// here stays cheap without a per-line materialized table.
    fn disabled_at(&self, line: u32, code: &str, name: &str) -> bool {
        let mut disable_all = false;
        let mut disabled: rustc_hash::FxHashSet<String> = rustc_hash::FxHashSet::default();
        for (directive_line, directive) in &self.block_directives {
            if *directive_line > line {
                break;
            }
            match directive {
                BlockDirective::DisableAll => disable_all = true,
                BlockDirective::EnableAll => {
                    disable_all = false;
                    disabled.clear();
                }
                BlockDirective::DisableSome(codes) => disabled.extend(codes.iter().cloned()),
                BlockDirective::EnableSome(codes) => {
                    for c in codes {
                        disabled.remove(c);
                    }
                }
            }
        }
        disable_all || matches_any(&disabled.into_iter().collect::<Vec<_>>(), code, name)
    }
}

fn matches_any(ids: &[String], code: &str, name: &str) -> bool {
    ids.iter().any(|id| id.eq_ignore_ascii_case(code) || id.eq_ignore_ascii_case(name))
}

fn parse_line_directive(text: &str) -> Option<Directive> {
    if let Some(rest) = text.strip_prefix(IGNORE_PREFIX) {
        return Some(Directive::IgnoreSome(split_ids(rest)));
    }
    if text == "gdlint:ignore" {
        return Some(Directive::IgnoreAll);
    }
    None
}

fn parse_block_directive(text: &str) -> Option<BlockDirective> {
    if let Some(rest) = text.strip_prefix(DISABLE_PREFIX) {
        return Some(BlockDirective::DisableSome(split_ids(rest)));
    }
    if let Some(rest) = text.strip_prefix(ENABLE_PREFIX) {
        return Some(BlockDirective::EnableSome(split_ids(rest)));
    }
    if text == DISABLE_ALL {
        return Some(BlockDirective::DisableAll);
    }
    if text == ENABLE_ALL {
        return Some(BlockDirective::EnableAll);
    }
    None
}

fn split_ids(rest: &str) -> Vec<String> {
    rest.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned).collect()
}

fn collect_comments(tree: &Tree, element: Element, out: &mut Vec<gdlint_ast::TokenId>) {
    match element {
        Element::Token(id) => {
            if tree.token(id).kind() == gdlint_ast::SyntaxKind::COMMENT {
                out.push(id);
            }
        }
        Element::Node(id) => {
            for &child in tree.form_of(id) {
                collect_comments(tree, child, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdlint_source::SourceLocator;

    fn build_index(source: &str) -> SuppressionIndex {
        let tree = gdlint_parser::parse(source).unwrap();
        let locator = SourceLocator::new(source);
        SuppressionIndex::build(&tree, &locator)
    }

    #[test]
    fn ignore_suppresses_only_its_line() {
        let index = build_index("var x = 1 # gdlint:ignore=GDL2001\nvar y = 2\n");
        let one = OneIndexed::from_zero_indexed(0);
        let two = OneIndexed::from_zero_indexed(1);
        assert!(index.is_suppressed("GDL2001", "undefined-name", one));
        assert!(!index.is_suppressed("GDL2001", "undefined-name", two));
    }

    #[test]
    fn ignore_matches_by_name_too() {
        let index = build_index("var x = 1 # gdlint:ignore=undefined-name\n");
        let one = OneIndexed::from_zero_indexed(0);
        assert!(index.is_suppressed("GDL2001", "undefined-name", one));
    }

    #[test]
    fn disable_enable_block_toggles_across_lines() {
        let source = "# gdlint:disable=GDL6001\nvar a = 1\nvar b = 2\n# gdlint:enable=GDL6001\nvar c = 3\n";
        let index = build_index(source);
        let line2 = OneIndexed::from_zero_indexed(1);
        let line5 = OneIndexed::from_zero_indexed(4);
        assert!(index.is_suppressed("GDL6001", "mixed-indentation", line2));
        assert!(!index.is_suppressed("GDL6001", "mixed-indentation", line5));
    }

    #[test]
    fn bare_disable_suppresses_everything() {
        let source = "# gdlint:disable\nvar a = 1\n";
        let index = build_index(source);
        let line2 = OneIndexed::from_zero_indexed(1);
        assert!(index.is_suppressed("GDL9999", "anything", line2));
    }
}
