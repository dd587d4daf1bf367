//! The semantic type system (§3 "Semantic type", §4.4, §4.6).
//!
//! A [`SemanticType`] is always paired with a [`Confidence`] wherever it is
//! attached to an expression, symbol, or reference — the three-level model
//! is load-bearing throughout the engine, not a decoration on the result.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A type name as it appears in source or in the runtime-type provider's
/// catalogue (`"int"`, `"Node2D"`, a user class name, ...).
pub type TypeName = Box<str>;

/// §3 "Every semantic type carries a confidence": Strict > Potential >
/// NameMatch. Declared in ascending order so `Ord::min` composes two
/// confidences correctly (§4.4 "Confidence composition").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Confidence {
    NameMatch,
    Potential,
    Strict,
}

impl Confidence {
    #[must_use]
    pub fn compose(self, other: Self) -> Self {
        self.min(other)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Strict => "strict",
            Self::Potential => "potential",
            Self::NameMatch => "name-match",
        };
        f.write_str(s)
    }
}

/// A set of candidate concrete types with an optional common-base hint
/// (§3 "Union", GLOSSARY "Union type": "its effective type is the hint
/// when present, otherwise Variant").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct UnionType {
    pub members: BTreeSet<TypeName>,
    pub common_base: Option<TypeName>,
}

impl UnionType {
    pub fn of(members: impl IntoIterator<Item = TypeName>) -> Self {
        Self {
            members: members.into_iter().collect(),
            common_base: None,
        }
    }

    pub fn with_common_base(mut self, base: TypeName) -> Self {
        self.common_base = Some(base);
        self
    }

    /// The effective type per the GLOSSARY definition of union type.
    pub fn effective(&self) -> SemanticType {
        match &self.common_base {
            Some(base) => SemanticType::Concrete(base.clone()),
            None if self.members.len() == 1 => {
                SemanticType::Concrete(self.members.iter().next().unwrap().clone())
            }
            None => SemanticType::Variant,
        }
    }
}

/// A binary operator recognized by [`crate::provider::RuntimeTypeProvider::resolve_operator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Shl,
    Shr,
    BitAnd,
    BitOr,
    BitXor,
}

/// A structural constraint recorded for a symbol whose concrete type is
/// unknown (§3 "DuckType", §4.6).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DuckType {
    /// Method name → observed argument types at each call site, used for
    /// the duck-type resolver's assignability check (§4.6).
    pub required_methods: BTreeMap<TypeName, Vec<SemanticType>>,
    pub required_properties: BTreeSet<TypeName>,
    pub required_signals: BTreeSet<TypeName>,
    pub required_operators: Vec<(OperatorKind, SemanticType)>,
    pub excluded_types: BTreeSet<TypeName>,
    pub possible_types: BTreeSet<TypeName>,
}

impl DuckType {
    pub fn require_method(&mut self, name: impl Into<TypeName>, args: Vec<SemanticType>) {
        self.required_methods.entry(name.into()).or_insert(args);
    }

    pub fn require_property(&mut self, name: impl Into<TypeName>) {
        self.required_properties.insert(name.into());
    }

    pub fn require_signal(&mut self, name: impl Into<TypeName>) {
        self.required_signals.insert(name.into());
    }

    pub fn exclude(&mut self, type_name: impl Into<TypeName>) {
        self.excluded_types.insert(type_name.into());
    }

    pub fn is_empty(&self) -> bool {
        self.required_methods.is_empty()
            && self.required_properties.is_empty()
            && self.required_signals.is_empty()
            && self.required_operators.is_empty()
    }

    /// Intersects two duck types the way a branch merge does for
    /// required-method sets (§4.5 "Merge on join": "branches' required-
    /// method sets are intersected; possible-type sets are unioned").
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let mut out = Self::default();
        for (name, args) in &self.required_methods {
            if other.required_methods.contains_key(name) {
                out.required_methods.insert(name.clone(), args.clone());
            }
        }
        out.required_properties = self
            .required_properties
            .intersection(&other.required_properties)
            .cloned()
            .collect();
        out.required_signals = self
            .required_signals
            .intersection(&other.required_signals)
            .cloned()
            .collect();
        out.possible_types = self.possible_types.union(&other.possible_types).cloned().collect();
        out
    }
}

/// One of the five semantic type shapes (§3).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SemanticType {
    Concrete(TypeName),
    Union(UnionType),
    Duck(Box<DuckType>),
    Nullable(Box<SemanticType>),
    Variant,
}

impl SemanticType {
    pub fn concrete(name: impl Into<TypeName>) -> Self {
        Self::Concrete(name.into())
    }

    pub fn null() -> Self {
        Self::Concrete("null".into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Concrete(n) if &**n == "null")
    }

    pub fn is_variant(&self) -> bool {
        matches!(self, Self::Variant)
    }

    pub fn is_duck(&self) -> bool {
        matches!(self, Self::Duck(_))
    }

    /// §3 "Nullable(inner) — inner type union-ed with null".
    pub fn nullable(inner: Self) -> Self {
        if inner.is_null() {
            return inner;
        }
        Self::Nullable(Box::new(inner))
    }

    /// Builds the union of a set of element/branch types, collapsing to a
    /// single concrete type when every member is identical (§4.4 "Ternary
    /// ... if identical, collapse").
    pub fn union_of(types: impl IntoIterator<Item = Self>) -> Self {
        let mut members: BTreeSet<TypeName> = BTreeSet::new();
        let mut saw_non_concrete = None;
        for ty in types {
            match ty {
                Self::Concrete(name) => {
                    members.insert(name);
                }
                Self::Union(u) => {
                    members.extend(u.members);
                }
                other => saw_non_concrete = Some(other),
            }
        }
        if let Some(other) = saw_non_concrete {
            return other;
        }
        match members.len() {
            0 => Self::Variant,
            1 => Self::Concrete(members.into_iter().next().unwrap()),
            _ => Self::Union(UnionType {
                members,
                common_base: None,
            }),
        }
    }

    /// Member name display for a type, used in diagnostics and tests.
    pub fn display_name(&self) -> String {
        match self {
            Self::Concrete(n) => n.to_string(),
            Self::Union(u) => {
                let mut names: Vec<_> = u.members.iter().map(|n| n.to_string()).collect();
                names.sort();
                format!("Union[{}]", names.join(", "))
            }
            Self::Duck(_) => "<duck>".to_string(),
            Self::Nullable(inner) => format!("{}?", inner.display_name()),
            Self::Variant => "Variant".to_string(),
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// A type paired with the confidence it was derived at (§3).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Typed {
    pub ty: SemanticType,
    pub confidence: Confidence,
}

impl Typed {
    pub fn new(ty: SemanticType, confidence: Confidence) -> Self {
        Self { ty, confidence }
    }

    pub fn strict(ty: SemanticType) -> Self {
        Self::new(ty, Confidence::Strict)
    }

    pub fn potential(ty: SemanticType) -> Self {
        Self::new(ty, Confidence::Potential)
    }

    pub fn name_match(ty: SemanticType) -> Self {
        Self::new(ty, Confidence::NameMatch)
    }

    pub fn variant() -> Self {
        Self::new(SemanticType::Variant, Confidence::NameMatch)
    }

    /// Combines two results per §4.4 "Confidence composition": the result
    /// type from `combine` at the minimum of the two input confidences.
    #[must_use]
    pub fn combine(a: &Typed, b: &Typed, ty: SemanticType) -> Typed {
        Typed::new(ty, a.confidence.compose(b.confidence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_composition_takes_the_minimum() {
        assert_eq!(Confidence::Strict.compose(Confidence::Potential), Confidence::Potential);
        assert_eq!(Confidence::NameMatch.compose(Confidence::Strict), Confidence::NameMatch);
    }

    #[test]
    fn union_collapses_identical_members() {
        let ty = SemanticType::union_of([SemanticType::concrete("int"), SemanticType::concrete("int")]);
        assert_eq!(ty, SemanticType::concrete("int"));
    }

    #[test]
    fn union_of_distinct_members_stays_a_union() {
        let ty = SemanticType::union_of([SemanticType::concrete("int"), SemanticType::concrete("String")]);
        assert!(matches!(ty, SemanticType::Union(_)));
    }

    #[test]
    fn nullable_of_null_collapses_to_null() {
        assert_eq!(SemanticType::nullable(SemanticType::null()), SemanticType::null());
    }
}
