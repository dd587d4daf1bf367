//! The rule framework and catalogues (§4.8, L7/L8): a visitor-style [`Rule`]
//! trait, a [`SuppressionIndex`] implementing the pragma wire contract of
//! §6, an [`engine::RuleEngine`] that runs a registered rule set over one
//! file's [`gdlint_semantic::SemanticModel`], and [`settings::Settings`]
//! modeling every configuration key of §6.
//!
//! Individual rules are a representative catalogue, one or two per §4.8
//! category, demonstrating the framework end to end rather than an
//! exhaustive GDScript style guide (§1: "Rule authorship and the
//! lint/format catalogues are in scope as a framework; individual rules
//! are out of scope beyond their categorization").

pub mod engine;
pub mod naming;
pub mod rule;
pub mod rules;
pub mod settings;
pub mod suppression;

pub use engine::RuleEngine;
pub use rule::{Rule, RuleContext};
pub use settings::Settings;
pub use suppression::SuppressionIndex;
