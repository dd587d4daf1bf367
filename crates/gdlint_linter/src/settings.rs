//! Recognized configuration keys (§6 "Configuration options").
//!
//! `Settings` is a plain in-memory value, `serde`-(de)serializable with a
//! full `Default` so a caller can construct or merge one without ever
//! touching a config *file* — loading one is out of scope (§1).

use gdlint_diagnostics::Severity;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// `{style: tabs|spaces, size: int}` (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentationStyle {
    Tabs,
    Spaces,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndentationSettings {
    pub style: IndentationStyle,
    pub size: u32,
}

impl Default for IndentationSettings {
    fn default() -> Self {
        Self {
            style: IndentationStyle::Tabs,
            size: 4,
        }
    }
}

/// `{LF, CRLF, Platform}` (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineEnding {
    Lf,
    Crlf,
    Platform,
}

impl Default for LineEnding {
    fn default() -> Self {
        Self::Lf
    }
}

/// `{snake|pascal|camel|screaming_snake|any}` (§6), one per symbol kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingCase {
    Snake,
    Pascal,
    Camel,
    ScreamingSnake,
    Any,
}

impl NamingCase {
    pub fn matches(self, name: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Snake => crate::naming::is_snake_case(name),
            Self::Pascal => crate::naming::is_pascal_case(name),
            Self::Camel => crate::naming::is_camel_case(name),
            Self::ScreamingSnake => crate::naming::is_screaming_snake_case(name),
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Any => "any case",
            Self::Snake => "snake_case",
            Self::Pascal => "PascalCase",
            Self::Camel => "camelCase",
            Self::ScreamingSnake => "SCREAMING_SNAKE_CASE",
        }
    }
}

/// Naming-case policy per declaration kind (§6 "Naming cases per symbol
/// kind"). Defaults follow GDScript's own style guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingSettings {
    pub variable: NamingCase,
    pub constant: NamingCase,
    pub function: NamingCase,
    pub signal: NamingCase,
    pub class: NamingCase,
    pub enum_name: NamingCase,
    pub enum_value: NamingCase,
}

impl Default for NamingSettings {
    fn default() -> Self {
        Self {
            variable: NamingCase::Snake,
            constant: NamingCase::ScreamingSnake,
            function: NamingCase::Snake,
            signal: NamingCase::Snake,
            class: NamingCase::Pascal,
            enum_name: NamingCase::Pascal,
            enum_value: NamingCase::ScreamingSnake,
        }
    }
}

/// Per-rule enable/disable and severity override, keyed by either a rule
/// code (`"GDL2001"`) or a rule name (`"duplicate-declaration"`) — the
/// same dual lookup the suppression pragma accepts (§6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSettings {
    disabled: FxHashMap<String, bool>,
    severity: FxHashMap<String, Severity>,
}

impl RuleSettings {
    pub fn disable(&mut self, id: impl Into<String>) {
        self.disabled.insert(normalize(&id.into()), true);
    }

    pub fn enable(&mut self, id: impl Into<String>) {
        self.disabled.insert(normalize(&id.into()), false);
    }

    pub fn set_severity(&mut self, id: impl Into<String>, severity: Severity) {
        self.severity.insert(normalize(&id.into()), severity);
    }

    pub fn is_enabled(&self, code: &str, name: &str) -> bool {
        !*self.disabled.get(&normalize(code)).or_else(|| self.disabled.get(&normalize(name))).unwrap_or(&false)
    }

    pub fn severity_for(&self, code: &str, name: &str) -> Option<Severity> {
        self.severity.get(&normalize(code)).or_else(|| self.severity.get(&normalize(name))).copied()
    }
}

fn normalize(id: &str) -> String {
    id.to_ascii_lowercase()
}

/// `{max_depth: int}` (§6 "Parsing limits").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsingLimits {
    pub max_depth: usize,
}

impl Default for ParsingLimits {
    fn default() -> Self {
        Self {
            max_depth: gdlint_parser_default_max_depth(),
        }
    }
}

/// Mirrors `gdlint_parser::DEFAULT_MAX_DEPTH` without adding a dependency
/// edge from the rule framework back onto the parser crate.
const fn gdlint_parser_default_max_depth() -> usize {
    200
}

/// `{enabled: bool, degree: int | auto}` (§6 "Parallelism").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Degree {
    Auto,
    Fixed(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelismSettings {
    pub enabled: bool,
    pub degree: Degree,
    /// §5 "Cancellation ... checked at batch boundaries (default batch: 10
    /// files)." Lives alongside `degree` since both only matter to the
    /// project orchestrator's multi-file fan-out, never to single-file
    /// analysis.
    pub cancellation_batch_size: usize,
}

impl Default for ParallelismSettings {
    fn default() -> Self {
        Self {
            cancellation_batch_size: 10,
            enabled: true,
            degree: Degree::Auto,
        }
    }
}

/// Every recognized configuration key of §6, gathered into one
/// `serde`-(de)serializable value with a full `Default`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub indentation: IndentationSettings,
    pub line_ending: LineEnding,
    pub naming: NamingSettings,
    pub rules: RuleSettings,
    pub parsing: ParsingLimits,
    pub parallelism: ParallelismSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_round_trip_through_json() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.naming.variable, NamingCase::Snake);
    }

    #[test]
    fn rule_settings_disable_by_either_code_or_name() {
        let mut rules = RuleSettings::default();
        rules.disable("GDL2001");
        assert!(!rules.is_enabled("GDL2001", "duplicate-declaration"));
        assert!(rules.is_enabled("GDL2002", "unresolved-identifier"));

        let mut rules = RuleSettings::default();
        rules.disable("duplicate-declaration");
        assert!(!rules.is_enabled("GDL2001", "duplicate-declaration"));
    }

    #[test]
    fn severity_override_wins_over_default() {
        let mut rules = RuleSettings::default();
        rules.set_severity("GDL6001", Severity::Error);
        assert_eq!(rules.severity_for("GDL6001", "mixed-indentation"), Some(Severity::Error));
    }
}
