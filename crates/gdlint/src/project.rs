//! §4.9 "Project Orchestrator": the multi-file session. Sequences per-file
//! parsing and analysis, builds the cross-file symbol index, and exposes
//! the whole project as a queryable model.

use crate::cancellation::CancellationToken;
use crate::error::ProjectError;
use crate::fs::FileSystem;
use crate::index::ProjectIndex;
use crate::script::LoadedScript;
use gdlint_ast::cst::{CallExpr, ClassDecl, CstNode, Expr, FuncDecl, SourceFileNode, TypeNode};
use gdlint_ast::{Element, NodeId, SyntaxKind, Tree};
use gdlint_diagnostics::{Category, Diagnostic, Severity};
use gdlint_linter::{RuleEngine, Settings};
use gdlint_parser::ParseError;
use gdlint_semantic::provider::RuntimeTypeProvider;
use gdlint_semantic::types::SemanticType;
use gdlint_semantic::SemanticModel;
use gdlint_source::SourceFile;
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

/// Per-script outcome of one `analyze_all` pass (§4.9, §7).
pub enum FileAnalysis<'p> {
    /// The file parsed and was fully analyzed.
    Analyzed {
        model: SemanticModel<'p>,
        diagnostics: Vec<Diagnostic>,
    },
    /// The file hit the parser's fatal nesting-too-deep condition (§7):
    /// "that file is recorded with an empty/partial tree and a
    /// parser-fatal diagnostic; analysis of other files is unaffected."
    ParserFatal(Diagnostic),
    /// The batch containing this file was never reached because
    /// cancellation fired at an earlier batch boundary (§5).
    Skipped,
}

impl FileAnalysis<'_> {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::Analyzed { diagnostics, .. } => diagnostics,
            Self::ParserFatal(d) => std::slice::from_ref(d),
            Self::Skipped => &[],
        }
    }

    pub fn model(&self) -> Option<&SemanticModel<'_>> {
        match self {
            Self::Analyzed { model, .. } => Some(model),
            Self::ParserFatal(_) | Self::Skipped => None,
        }
    }
}

/// A loaded multi-file session (§4.9): every script ingested via
/// [`Project::load_scripts`], addressable by its canonical resource path.
#[derive(Default)]
pub struct Project {
    scripts: Vec<LoadedScript>,
    by_path: FxHashMap<Box<str>, usize>,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    /// §4.9 `load_scripts(sources)`: ingest and parse every file. A
    /// duplicate resource path is the one load-time condition that is a
    /// hard error (§7 "orchestrator I/O failures are `Result::Err`") since
    /// it signals caller misuse rather than malformed GDScript.
    pub fn load_scripts(
        &mut self,
        sources: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Result<(), ProjectError> {
        for (path, text) in sources {
            self.load_one(path.into(), text.into())?;
        }
        Ok(())
    }

    /// Convenience wrapper around [`FileSystem::get_files`] for hosts that
    /// want the orchestrator to do its own directory walk (§6).
    pub fn load_from_fs(
        &mut self,
        fs: &dyn FileSystem,
        dir: &str,
        pattern: &str,
        recursive: bool,
    ) -> Result<(), ProjectError> {
        let paths = fs
            .get_files(dir, pattern, recursive)
            .map_err(|source| ProjectError::Io { path: dir.to_string(), source })?;
        for path in paths {
            let text = fs
                .read_all_text(&path)
                .map_err(|source| ProjectError::Io { path: path.clone(), source })?;
            self.load_one(path, text)?;
        }
        Ok(())
    }

    fn load_one(&mut self, path: String, text: String) -> Result<(), ProjectError> {
        if self.by_path.contains_key(path.as_str()) {
            return Err(ProjectError::DuplicateResourcePath(path));
        }
        let file = SourceFile::new(path.clone(), text);
        let parsed = gdlint_parser::parse(file.text());
        self.by_path.insert(path.into_boxed_str(), self.scripts.len());
        self.scripts.push(LoadedScript { file, parsed });
        Ok(())
    }

    pub fn scripts(&self) -> impl Iterator<Item = &LoadedScript> {
        self.scripts.iter()
    }

    pub fn script_count(&self) -> usize {
        self.scripts.len()
    }

    /// Scans every loaded script's `class_name` clause into a
    /// [`ProjectIndex`], ahead of any per-file inference, so inference can
    /// resolve references to classes declared in *other* files (§4.9
    /// "map user-defined class names to their declaring scripts").
    #[tracing::instrument(skip_all)]
    pub fn build_index(&self) -> ProjectIndex {
        let mut index = ProjectIndex::new();
        for script in &self.scripts {
            let Some(tree) = script.tree() else { continue };
            let Some(source_file) = SourceFileNode::cast(tree, tree.root()) else { continue };
            let Some(class) = source_file.class() else { continue };
            if let Some(name) = class.class_name_clause().and_then(|c| c.name()) {
                index.register_class(name, script.file().name());
            }
        }
        index
    }

    /// §4.9 `analyze_all(providers)`: builds the project-wide index, then
    /// analyzes every file's semantics and runs the default rule catalogue
    /// over it, per §5's parallel-fan-out-with-join-barrier model.
    #[tracing::instrument(skip_all, fields(files = self.scripts.len()))]
    pub fn analyze_all<'p>(
        &'p self,
        provider: &(dyn RuntimeTypeProvider + Sync),
        index: &ProjectIndex,
        settings: &Settings,
        cancellation: &CancellationToken,
    ) -> AnalyzedProject<'p> {
        let engine = RuleEngine::with_default_rules();
        let batch_size = settings.parallelism.cancellation_batch_size.max(1);
        let mut analyses: Vec<FileAnalysis<'p>> = Vec::with_capacity(self.scripts.len());

        let mut start = 0;
        'batches: while start < self.scripts.len() {
            if cancellation.is_cancelled() {
                break 'batches;
            }
            let end = (start + batch_size).min(self.scripts.len());
            let batch = &self.scripts[start..end];

            let results: Vec<FileAnalysis<'p>> = if settings.parallelism.enabled {
                batch
                    .par_iter()
                    .map(|script| analyze_one(script, provider, index, &engine, settings))
                    .collect()
            } else {
                batch
                    .iter()
                    .map(|script| analyze_one(script, provider, index, &engine, settings))
                    .collect()
            };
            analyses.extend(results);
            start = end;
        }
        while analyses.len() < self.scripts.len() {
            analyses.push(FileAnalysis::Skipped);
        }

        for (path, diagnostic) in self.cyclic_inheritance_diagnostics() {
            if let Some(&idx) = self.by_path.get(path) {
                if let FileAnalysis::Analyzed { diagnostics, .. } = &mut analyses[idx] {
                    diagnostics.push(diagnostic);
                    diagnostics.sort_by_key(|d| d.range.start());
                }
            }
        }

        AnalyzedProject { project: self, analyses }
    }

    /// §4.9 / §7 `SemanticError::CyclicInheritance`: a chain of `extends`
    /// clauses between user-declared classes that loops back on itself.
    /// A single file's own analysis never sees this — it only knows its
    /// own base name, never whether that base is itself a project class
    /// whose chain leads back here — so it's checked once per
    /// [`Self::analyze_all`] pass across every loaded script.
    fn cyclic_inheritance_diagnostics(&self) -> Vec<(&str, Diagnostic)> {
        let mut base_of: FxHashMap<&str, (&str, &str, gdlint_text_size::TextRange)> = FxHashMap::default();
        for script in &self.scripts {
            let Some(tree) = script.tree() else { continue };
            let Some(source_file) = SourceFileNode::cast(tree, tree.root()) else { continue };
            let Some(class) = source_file.class() else { continue };
            let Some(name) = class.class_name_clause().and_then(|c| c.name()) else { continue };
            let Some(extends) = class.extends_clause() else { continue };
            let Some(base) = extends.base_name() else { continue };
            base_of.insert(name, (script.file().name(), base, extends.range()));
        }

        let mut out = Vec::new();
        let mut cleared: FxHashSet<&str> = FxHashSet::default();
        for &start in base_of.keys() {
            if cleared.contains(start) {
                continue;
            }
            let mut chain = Vec::new();
            let mut current = start;
            let cycle_start = loop {
                if let Some(pos) = chain.iter().position(|&name| name == current) {
                    break Some(pos);
                }
                let Some(&(_, base, _)) = base_of.get(current) else { break None };
                chain.push(current);
                current = base;
            };
            if let Some(pos) = cycle_start {
                for &name in &chain[pos..] {
                    let (path, _, range) = base_of[name];
                    out.push((path, cyclic_inheritance_diagnostic(name, range)));
                }
            }
            cleared.extend(chain);
        }
        out
    }
}

fn cyclic_inheritance_diagnostic(class_name: &str, range: gdlint_text_size::TextRange) -> Diagnostic {
    Diagnostic::new(
        "GDL2003",
        Category::Scope,
        Severity::Error,
        format!("class `{class_name}` inherits from itself through a cycle of `extends` clauses"),
        range,
    )
}

fn analyze_one<'p>(
    script: &'p LoadedScript,
    provider: &(dyn RuntimeTypeProvider + Sync),
    index: &ProjectIndex,
    engine: &RuleEngine,
    settings: &Settings,
) -> FileAnalysis<'p> {
    let Some(tree) = script.tree() else {
        let err = script.parse_error().expect("no tree implies a parse error");
        return FileAnalysis::ParserFatal(parser_fatal_diagnostic(err));
    };
    let model = SemanticModel::analyze(tree, provider, index);
    let diagnostics = engine.run(script.file(), tree, &model, settings, provider).into_vec();
    FileAnalysis::Analyzed { model, diagnostics }
}

fn parser_fatal_diagnostic(err: &ParseError) -> Diagnostic {
    let (message, range) = match err {
        ParseError::NestingTooDeep { max_depth, at } => (
            format!("parsing aborted: nesting exceeded the configured maximum of {max_depth} frames"),
            gdlint_text_size::TextRange::empty(*at),
        ),
    };
    Diagnostic::new("GDL1000", Category::Syntax, Severity::Error, message, range)
}

/// A project-wide symbol reference returned by [`AnalyzedProject::find_symbols`]:
/// which script a matching symbol lives in, alongside its id within that
/// script's scope tree.
pub struct ProjectSymbolRef<'p> {
    pub script_path: &'p str,
    pub symbol: gdlint_semantic::SymbolId,
}

/// `(declared type, union of call-site-observed argument types)` for one
/// parameter (§4.9 `get_parameter_type_diff`).
#[derive(Debug, Clone)]
pub struct ParameterTypeDiff {
    pub declared: Option<SemanticType>,
    pub observed: SemanticType,
}

/// The result of [`Project::analyze_all`]: every script's [`FileAnalysis`],
/// addressable by resource path, plus project-wide queries that need more
/// than one file's semantic model at once.
pub struct AnalyzedProject<'p> {
    project: &'p Project,
    analyses: Vec<FileAnalysis<'p>>,
}

impl<'p> AnalyzedProject<'p> {
    /// §4.9 `script_by_resource_path(path)`.
    pub fn script_by_resource_path(&self, path: &str) -> Option<(&'p LoadedScript, &FileAnalysis<'p>)> {
        let &idx = self.project.by_path.get(path)?;
        Some((&self.project.scripts[idx], &self.analyses[idx]))
    }

    pub fn analyses(&self) -> impl Iterator<Item = (&'p LoadedScript, &FileAnalysis<'p>)> {
        self.project.scripts.iter().zip(self.analyses.iter())
    }

    /// §4.9 `find_symbols(name)`: a project-wide symbol query, scanning
    /// every analyzed file's scope tree.
    pub fn find_symbols(&self, name: &str) -> Vec<ProjectSymbolRef<'p>> {
        let mut out = Vec::new();
        for (script, analysis) in self.analyses() {
            let Some(model) = analysis.model() else { continue };
            for symbol in model.scopes().find_by_name(name) {
                out.push(ProjectSymbolRef {
                    script_path: script.file().name(),
                    symbol,
                });
            }
        }
        out
    }

    /// Diagnostics across every analyzed file, ordered by canonical path
    /// (§5: "Across files, ordering is by canonical path unless the caller
    /// requests otherwise"). Within a file, diagnostics are already in
    /// source order (`RuleEngine::run` sorts before returning).
    pub fn diagnostics_by_path(&self) -> Vec<(&'p str, &Diagnostic)> {
        let mut paths: Vec<_> = self.analyses().collect();
        paths.sort_by_key(|(script, _)| script.file().name());
        paths
            .into_iter()
            .flat_map(|(script, analysis)| analysis.diagnostics().iter().map(move |d| (script.file().name(), d)))
            .collect()
    }

    /// §4.9 `get_parameter_type_diff(class, method, param)`: compares a
    /// method parameter's declared type against the union of argument
    /// types observed at every call site across the whole project (used
    /// by style rules flagging a declared type that no caller actually
    /// passes).
    pub fn get_parameter_type_diff(&self, class: &str, method: &str, param: &str) -> Option<ParameterTypeDiff> {
        let index = self.project.build_index();
        let declaring_path = index.declaring_script(class)?.to_string();
        let (owning_script, _) = self.script_by_resource_path(&declaring_path)?;
        let owning_tree = owning_script.tree()?;

        let (func, param_index) = find_method_param(owning_tree, method, param)?;
        let declared = func
            .params()?
            .params()
            .nth(param_index)
            .and_then(|p| p.declared_type())
            .map(type_node_to_semantic);

        let mut observed = Vec::new();
        for (_, analysis) in self.analyses() {
            let Some(model) = analysis.model() else { continue };
            // Calls can originate from any script, not just the one that
            // declares `class`, so walk every analyzed file's own tree
            // rather than reusing `owning_tree`.
            let tree = model.tree();
            for call_node in call_sites_for(tree, method) {
                let Some(call) = CallExpr::cast(tree, call_node) else { continue };
                let Some(args) = call.args() else { continue };
                let Some(arg) = args.args().nth(param_index) else { continue };
                if let Some(typed) = model.type_of(arg.node_id()) {
                    observed.push(typed.ty.clone());
                }
            }
        }

        Some(ParameterTypeDiff {
            declared,
            observed: SemanticType::union_of(observed),
        })
    }
}

fn type_node_to_semantic(type_node: TypeNode<'_>) -> SemanticType {
    match type_node {
        TypeNode::Simple(simple) => simple.name().map_or(SemanticType::Variant, SemanticType::concrete),
        TypeNode::Generic(generic) => generic.base_name().map_or(SemanticType::Variant, SemanticType::concrete),
        TypeNode::Inferred(_) => SemanticType::Variant,
    }
}

/// Finds a top-level method by name in `tree` and the 0-based index of one
/// of its parameters by name.
fn find_method_param<'t>(tree: &'t Tree, method: &str, param: &str) -> Option<(FuncDecl<'t>, usize)> {
    let source_file = SourceFileNode::cast(tree, tree.root())?;
    let class = source_file.class()?;
    let func = find_func_in_class(class, method)?;
    let index = func.params()?.params().position(|p| p.name() == Some(param))?;
    Some((func, index))
}

fn find_func_in_class<'t>(class: ClassDecl<'t>, method: &str) -> Option<FuncDecl<'t>> {
    class
        .functions()
        .find(|f| f.name() == Some(method))
        .or_else(|| class.inner_classes().find_map(|inner| inner.functions().find(|f| f.name() == Some(method))))
}

/// Every `CALL_EXPR` node in `tree` whose callee is a member access named
/// `method` (`receiver.method(...)`) — the only call shape
/// `get_parameter_type_diff` cares about, since a bare `method(...)` call
/// can only target the enclosing class itself.
fn call_sites_for(tree: &Tree, method: &str) -> Vec<NodeId> {
    let mut out = Vec::new();
    collect_calls(tree, tree.root(), method, &mut out);
    out
}

fn collect_calls(tree: &Tree, node: NodeId, method: &str, out: &mut Vec<NodeId>) {
    if tree.node(node).kind() == SyntaxKind::CALL_EXPR {
        if let Some(call) = CallExpr::cast(tree, node) {
            let matches = matches!(call.callee(), Some(Expr::Member(m)) if m.member_name() == Some(method));
            if matches {
                out.push(node);
            }
        }
    }
    for &child in tree.form_of(node) {
        if let Element::Node(id) = child {
            collect_calls(tree, id, method, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdlint_semantic::provider::NullTypeProvider;

    fn settings_sequential() -> Settings {
        let mut settings = Settings::default();
        settings.parallelism.enabled = false;
        settings
    }

    #[test]
    fn loads_and_analyzes_multiple_files() {
        let mut project = Project::new();
        project
            .load_scripts(vec![
                ("res://a.gd", "extends Node\n\nvar x = 1\n"),
                ("res://b.gd", "extends Node\n\nvar y = 2\n"),
            ])
            .unwrap();
        let index = project.build_index();
        let settings = settings_sequential();
        let analyzed = project.analyze_all(&NullTypeProvider, &index, &settings, &CancellationToken::new());
        assert_eq!(analyzed.analyses().count(), 2);
        assert!(analyzed.script_by_resource_path("res://a.gd").is_some());
        assert!(analyzed.script_by_resource_path("res://missing.gd").is_none());
    }

    #[test]
    fn duplicate_resource_path_is_rejected() {
        let mut project = Project::new();
        project.load_scripts(vec![("res://a.gd", "extends Node\n")]).unwrap();
        let err = project.load_scripts(vec![("res://a.gd", "extends Node\n")]).unwrap_err();
        assert!(matches!(err, ProjectError::DuplicateResourcePath(p) if p == "res://a.gd"));
    }

    #[test]
    fn find_symbols_reports_matches_across_files() {
        let mut project = Project::new();
        project
            .load_scripts(vec![
                ("res://a.gd", "extends Node\n\nfunc f():\n\tvar counter = 0\n"),
                ("res://b.gd", "extends Node\n\nfunc g():\n\tvar counter = 1\n"),
            ])
            .unwrap();
        let index = project.build_index();
        let settings = settings_sequential();
        let analyzed = project.analyze_all(&NullTypeProvider, &index, &settings, &CancellationToken::new());
        let matches = analyzed.find_symbols("counter");
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn build_index_registers_class_name_declarations() {
        let mut project = Project::new();
        project
            .load_scripts(vec![("res://player.gd", "class_name Player\nextends Node\n")])
            .unwrap();
        let index = project.build_index();
        assert_eq!(index.declaring_script("Player"), Some("res://player.gd"));
    }

    #[test]
    fn cancellation_before_any_batch_skips_every_file() {
        let mut project = Project::new();
        project.load_scripts(vec![("res://a.gd", "extends Node\n")]).unwrap();
        let index = project.build_index();
        let settings = settings_sequential();
        let token = CancellationToken::new();
        token.cancel();
        let analyzed = project.analyze_all(&NullTypeProvider, &index, &settings, &token);
        assert!(matches!(analyzed.analyses().next().unwrap().1, FileAnalysis::Skipped));
    }

    #[test]
    fn parameter_type_diff_unions_observed_call_site_argument_types() {
        let mut project = Project::new();
        project
            .load_scripts(vec![(
                "res://player.gd",
                "class_name Player\nextends Node\n\nfunc take_damage(amount: int):\n\tpass\n",
            )])
            .unwrap();
        project
            .load_scripts(vec![(
                "res://enemy.gd",
                "extends Node\n\nfunc attack(p):\n\tp.take_damage(1)\n\tp.take_damage(2.5)\n",
            )])
            .unwrap();
        let index = project.build_index();
        let settings = settings_sequential();
        let analyzed = project.analyze_all(&NullTypeProvider, &index, &settings, &CancellationToken::new());
        let diff = analyzed.get_parameter_type_diff("Player", "take_damage", "amount").unwrap();
        assert_eq!(diff.declared, Some(SemanticType::concrete("int")));
    }

    #[test]
    fn cyclic_inheritance_across_files_is_flagged_on_both_classes() {
        let mut project = Project::new();
        project
            .load_scripts(vec![
                ("res://a.gd", "class_name A\nextends B\n"),
                ("res://b.gd", "class_name B\nextends A\n"),
            ])
            .unwrap();
        let index = project.build_index();
        let settings = settings_sequential();
        let analyzed = project.analyze_all(&NullTypeProvider, &index, &settings, &CancellationToken::new());
        let diagnostics = analyzed.diagnostics_by_path();
        assert!(diagnostics.iter().any(|(path, d)| *path == "res://a.gd" && d.code == "GDL2003"));
        assert!(diagnostics.iter().any(|(path, d)| *path == "res://b.gd" && d.code == "GDL2003"));
    }

    #[test]
    fn ordinary_inheritance_chain_is_not_flagged() {
        let mut project = Project::new();
        project
            .load_scripts(vec![
                ("res://a.gd", "class_name A\nextends Node\n"),
                ("res://b.gd", "class_name B\nextends A\n"),
            ])
            .unwrap();
        let index = project.build_index();
        let settings = settings_sequential();
        let analyzed = project.analyze_all(&NullTypeProvider, &index, &settings, &CancellationToken::new());
        assert!(analyzed.diagnostics_by_path().iter().all(|(_, d)| d.code != "GDL2003"));
    }
}
