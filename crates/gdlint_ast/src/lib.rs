//! The CST/token layer (§3, §4.2): arena-backed tree, builder, visitor,
//! and typed accessors over it.
//!
//! This crate has no notion of grammar — it only knows how to hold a
//! [`Tree`] together and let something else (`gdlint_parser`) decide what
//! goes where. Keeping the two separate mirrors how `rowan`/`apollo-parser`
//! split a green-tree crate from the parser that drives it.

pub mod builder;
pub mod cst;
pub mod node;
pub mod syntax_kind;
pub mod token;
pub mod tree;
pub mod visitor;

pub use builder::{Checkpoint, TreeBuilder};
pub use cst::*;
pub use node::{Element, Form, NodeData, NodeId};
pub use syntax_kind::SyntaxKind;
pub use token::{TokenData, TokenId};
pub use tree::Tree;
pub use visitor::{ForEach, Visitor};
