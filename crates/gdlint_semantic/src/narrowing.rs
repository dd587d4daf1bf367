//! Flow-sensitive narrowing (§4.5).
//!
//! A [`NarrowingContext`] is a per-branch refinement of a symbol's
//! effective type. Contexts form a tree mirroring the CST: entering a
//! branch creates a child via [`NarrowingContext::child`]; leaving it
//! drops the child and the caller resumes the parent.

use crate::types::{DuckType, SemanticType};
use rustc_hash::FxHashMap;

/// One variable's narrowed state within a context (§4.5 "a narrowing
/// context is a mapping from variable-name to a narrowed DuckType-or-
/// concrete and a not-null flag").
#[derive(Debug, Clone, Default)]
pub struct Narrowing {
    pub concrete: Option<SemanticType>,
    pub excluded: Vec<SemanticType>,
    pub duck: Option<DuckType>,
    pub not_null: bool,
}

impl Narrowing {
    fn merge_and(mut self, other: &Self) -> Self {
        if self.concrete.is_none() {
            self.concrete = other.concrete.clone();
        }
        self.excluded.extend(other.excluded.iter().cloned());
        self.duck = match (self.duck.take(), other.duck.clone()) {
            (Some(a), Some(b)) => {
                let mut merged = a;
                for (name, args) in b.required_methods {
                    merged.require_method(name, args);
                }
                for p in b.required_properties {
                    merged.required_properties.insert(p);
                }
                for s in b.required_signals {
                    merged.required_signals.insert(s);
                }
                Some(merged)
            }
            (a, b) => a.or(b),
        };
        self.not_null = self.not_null || other.not_null;
        self
    }
}

/// A per-branch refinement scope (§4.5 "Contexts").
#[derive(Debug, Clone)]
pub struct NarrowingContext {
    entries: FxHashMap<Box<str>, Narrowing>,
}

impl NarrowingContext {
    pub fn empty() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Narrowing> {
        self.entries.get(name)
    }

    pub fn entry(&mut self, name: &str) -> &mut Narrowing {
        self.entries.entry(Box::from(name)).or_default()
    }

    /// A child context that starts as a copy of `self` (§4.5: "entering a
    /// branch creates a child context"); mutations to the child never
    /// affect the parent.
    pub fn child(&self) -> Self {
        self.clone()
    }

    /// `x is T` in the true branch: `x` is concretely `T` (§4.5).
    pub fn narrow_is_true(&mut self, var: &str, ty: SemanticType) {
        self.entry(var).concrete = Some(ty);
    }

    /// `x is T` in the false branch: `T` is excluded (§4.5).
    pub fn narrow_is_false(&mut self, var: &str, ty: SemanticType) {
        self.entry(var).excluded.push(ty);
    }

    pub fn narrow_not_null(&mut self, var: &str) {
        self.entry(var).not_null = true;
    }

    /// `x.has_method(S)` / `has_signal(S)` / `has(S)` in the true branch
    /// (§4.5).
    pub fn narrow_has_method(&mut self, var: &str, method: &str) {
        self.entry(var).duck.get_or_insert_with(DuckType::default).require_method(method, Vec::new());
    }

    pub fn narrow_has_signal(&mut self, var: &str, signal: &str) {
        self.entry(var).duck.get_or_insert_with(DuckType::default).require_signal(signal);
    }

    pub fn narrow_has_property(&mut self, var: &str, property: &str) {
        self.entry(var).duck.get_or_insert_with(DuckType::default).require_property(property);
    }

    /// `x in C`: `x` gets `C`'s element type in the true branch (§4.5).
    pub fn narrow_in(&mut self, var: &str, element_ty: SemanticType) {
        self.entry(var).concrete = Some(element_ty);
    }

    /// `A and B`: the true branch intersects both operands' narrowings
    /// (§4.5 "true branch intersects both").
    #[must_use]
    pub fn intersect(a: &Self, b: &Self) -> Self {
        let mut out = a.clone();
        for (name, narrowing) in &b.entries {
            let merged = out
                .entries
                .get(name.as_ref())
                .cloned()
                .map(|existing| existing.merge_and(narrowing))
                .unwrap_or_else(|| narrowing.clone());
            out.entries.insert(name.clone(), merged);
        }
        out
    }

    /// `A or B`: the true branch unions (least information in common); we
    /// conservatively keep only entries both sides agree narrow the same
    /// way, matching §4.5's "false branch is computed from the union of
    /// negations (De Morgan)" spirit for the dual case.
    #[must_use]
    pub fn union(a: &Self, b: &Self) -> Self {
        let mut out = Self::empty();
        for (name, a_narrowing) in &a.entries {
            if let Some(b_narrowing) = b.entries.get(name.as_ref()) {
                if a_narrowing.concrete == b_narrowing.concrete {
                    out.entries.insert(name.clone(), a_narrowing.clone());
                }
            }
        }
        out
    }

    /// Merge at the join point after `if`/`elif`/`else` (§4.5 "Merge on
    /// join"): narrowings absent from any branch are dropped; duck-typed
    /// required-method sets are intersected; possible-type sets union.
    #[must_use]
    pub fn merge_branches(branches: &[Self]) -> Self {
        let Some(first) = branches.first() else {
            return Self::empty();
        };
        let mut result = Self::empty();
        'names: for name in first.entries.keys() {
            let mut merged: Option<Narrowing> = None;
            for branch in branches {
                let Some(entry) = branch.entries.get(name) else {
                    continue 'names;
                };
                merged = Some(match merged {
                    None => entry.clone(),
                    Some(acc) => Narrowing {
                        concrete: (acc.concrete == entry.concrete).then(|| acc.concrete.clone()).flatten(),
                        excluded: acc.excluded.iter().filter(|t| entry.excluded.contains(t)).cloned().collect(),
                        duck: match (acc.duck, entry.duck.clone()) {
                            (Some(a), Some(b)) => Some(a.intersect(&b)),
                            _ => None,
                        },
                        not_null: acc.not_null && entry.not_null,
                    },
                });
            }
            if let Some(merged) = merged {
                result.entries.insert(name.clone(), merged);
            }
        }
        result
    }

    /// Intersects a pre-branch `Union` type with a narrowing assertion
    /// `is X` (§4.5 "Intersection with union"): keeps only members
    /// assignable to `X`.
    pub fn intersect_union_with_is(
        union_members: &[Box<str>],
        target: &str,
        is_assignable_to: impl Fn(&str, &str) -> bool,
    ) -> Vec<Box<str>> {
        union_members
            .iter()
            .filter(|m| is_assignable_to(m, target))
            .cloned()
            .collect()
    }
}

impl Default for NarrowingContext {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrowing_is_true_then_excluded_in_false_branch() {
        let mut true_ctx = NarrowingContext::empty();
        true_ctx.narrow_is_true("x", SemanticType::concrete("int"));
        assert_eq!(true_ctx.get("x").unwrap().concrete, Some(SemanticType::concrete("int")));

        let mut false_ctx = NarrowingContext::empty();
        false_ctx.narrow_is_false("x", SemanticType::concrete("int"));
        assert!(false_ctx.get("x").unwrap().excluded.contains(&SemanticType::concrete("int")));
    }

    #[test]
    fn union_intersection_with_is_keeps_only_assignable_member() {
        let members: Vec<Box<str>> = vec!["A".into(), "B".into()];
        let is_assignable = |src: &str, dst: &str| src == "A" && dst == "X";
        let kept = NarrowingContext::intersect_union_with_is(&members, "X", is_assignable);
        assert_eq!(kept, vec![Box::<str>::from("A")]);
    }

    #[test]
    fn merge_drops_narrowing_missing_from_one_branch() {
        let mut a = NarrowingContext::empty();
        a.narrow_is_true("x", SemanticType::concrete("int"));
        let b = NarrowingContext::empty();
        let merged = NarrowingContext::merge_branches(&[a, b]);
        assert!(merged.get("x").is_none());
    }
}
