//! The project orchestrator (§4.9, L9): the public facade over everything
//! below it. Sequences per-file parsing (`gdlint_parser`) and analysis
//! (`gdlint_semantic`, `gdlint_linter`) across a multi-file session,
//! builds the cross-file symbol index, and answers project-wide queries.
//!
//! A single file can be analyzed without this crate at all — construct a
//! [`gdlint_semantic::SemanticModel`] directly against a
//! [`gdlint_semantic::provider::NullProjectContext`]. This crate only
//! matters once a second file enters the picture.

pub mod cancellation;
pub mod error;
pub mod fs;
pub mod index;
pub mod project;
mod script;

pub use cancellation::CancellationToken;
pub use error::ProjectError;
pub use fs::{FileSystem, StdFileSystem};
pub use index::ProjectIndex;
pub use project::{AnalyzedProject, FileAnalysis, ParameterTypeDiff, Project, ProjectSymbolRef};
pub use script::LoadedScript;
