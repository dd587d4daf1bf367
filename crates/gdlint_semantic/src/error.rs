//! Semantic-layer error taxonomy (§7).
//!
//! Nearly everything the semantic engine finds wrong with a program is a
//! diagnostic-to-be (duplicate declarations, unresolved names) surfaced as
//! plain data on [`crate::model::SemanticModel`] for the rule engine to
//! turn into a `Diagnostic` — not an `Err`. The one condition that is a
//! hard `Result::Err` here is project-wide, not per-expression: an
//! inheritance cycle discovered while building the cross-file class graph
//! (§4.9 `analyze_all`).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SemanticError {
    #[error("cyclic inheritance involving `{class}`")]
    CyclicInheritance { class: Box<str> },
}
