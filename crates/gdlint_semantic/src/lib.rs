//! Scope tree, semantic type system, flow-sensitive inference, and duck
//! typing (§4): the layer between the parser and the rule engine.
//!
//! [`model::SemanticModel`] is the facade the rest of the workspace should
//! reach for; the other modules are its building blocks, public so the
//! orchestrator can compose its own [`provider::RuntimeTypeProvider`] and
//! [`provider::ProjectContextProvider`] implementations.

pub mod collector;
pub mod duck;
pub mod error;
pub mod inference;
pub mod model;
pub mod narrowing;
pub mod profile;
pub mod provider;
pub mod scope;
pub mod types;

pub use error::SemanticError;
pub use model::SemanticModel;
pub use scope::{DuplicateDeclaration, ScopeId, ScopeKind, ScopeTree, Symbol, SymbolId, SymbolKind};
pub use types::{Confidence, DuckType, SemanticType, Typed, TypeName};
