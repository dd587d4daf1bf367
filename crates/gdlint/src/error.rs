//! §7 "Error handling design": `ProjectError` covers only orchestrator-level
//! I/O and identity failures. Everything a single file's analysis can go
//! wrong in is a diagnostic or a [`gdlint_parser::ParseError`] recorded
//! against that file — it never stops the batch (§7 "the orchestrator must
//! continue analyzing remaining files").

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("I/O error loading `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("duplicate resource path `{0}`")]
    DuplicateResourcePath(String),
}
