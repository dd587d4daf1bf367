//! A single ingested script (§4.9 `load_scripts`): its source identity
//! plus whatever the parser produced for it.
//!
//! Parsing is the only per-file step in the whole pipeline that can fail
//! (§7 "Parser-internal fatal: nested-depth exceeded"); everything after
//! it — collection, inference, rules — works off whatever tree resulted
//! and never throws (§7 "Rules never throw on bad input; they detect and
//! report").

use gdlint_ast::Tree;
use gdlint_parser::ParseError;
use gdlint_source::SourceFile;

pub struct LoadedScript {
    pub(crate) file: SourceFile,
    pub(crate) parsed: Result<Tree, ParseError>,
}

impl LoadedScript {
    pub fn file(&self) -> &SourceFile {
        &self.file
    }

    /// The parsed tree, or `None` if this file hit the parser's fatal
    /// nesting-too-deep condition (§7).
    pub fn tree(&self) -> Option<&Tree> {
        self.parsed.as_ref().ok()
    }

    pub fn parse_error(&self) -> Option<&ParseError> {
        self.parsed.as_ref().err()
    }
}
