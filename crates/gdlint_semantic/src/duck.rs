//! Duck-type candidate resolution (§4.6).

use crate::provider::RuntimeTypeProvider;
use crate::types::DuckType;

/// A project-visible class catalogue entry the resolver checks candidates
/// against: a concrete type name plus a closure-free view onto its
/// members, supplied by whatever holds the full member list (the
/// orchestrator's project symbol index, or a provider's known classes).
pub trait CandidateCatalogue {
    fn candidate_names(&self) -> Vec<Box<str>>;
}

/// §4.6 "For an untyped symbol with recorded structural constraints,
/// enumerate concrete types satisfying all constraints."
pub struct DuckTypeResolver<'p> {
    provider: &'p dyn RuntimeTypeProvider,
}

impl<'p> DuckTypeResolver<'p> {
    pub fn new(provider: &'p dyn RuntimeTypeProvider) -> Self {
        Self { provider }
    }

    /// Enumerates candidates from `catalogue` satisfying every required
    /// method (with an argument-type compatibility check), property,
    /// signal, and operator recorded on `duck` (§4.6 contract).
    pub fn resolve(&self, duck: &DuckType, catalogue: &dyn CandidateCatalogue) -> Vec<Box<str>> {
        let base_members: std::collections::HashSet<&str> = self.provider.base_object_members().iter().copied().collect();

        catalogue
            .candidate_names()
            .into_iter()
            .filter(|candidate| self.satisfies(candidate, duck, &base_members))
            .collect()
    }

    fn satisfies(&self, candidate: &str, duck: &DuckType, base_members: &std::collections::HashSet<&str>) -> bool {
        if duck.excluded_types.iter().any(|t| &**t == candidate) {
            return false;
        }

        for (method, args) in &duck.required_methods {
            if base_members.contains(method.as_ref()) {
                continue;
            }
            let Some(member) = self.provider.member(candidate, method) else {
                return false;
            };
            if !self.arguments_compatible(&member, args) {
                return false;
            }
        }

        for property in &duck.required_properties {
            if base_members.contains(property.as_ref()) {
                continue;
            }
            if self.provider.member(candidate, property).is_none() {
                return false;
            }
        }

        for signal in &duck.required_signals {
            if self.provider.member(candidate, signal).is_none() {
                return false;
            }
        }

        for (op, operand) in &duck.required_operators {
            let operand_name = operand.display_name();
            if self.provider.resolve_operator(candidate, *op, &operand_name).is_none() {
                return false;
            }
        }

        true
    }

    fn arguments_compatible(&self, member: &crate::provider::MemberInfo, observed: &[crate::types::SemanticType]) -> bool {
        if observed.len() > member.parameters.len() {
            return false;
        }
        for (param, observed_ty) in member.parameters.iter().zip(observed) {
            let Some(declared) = &param.declared_type else {
                continue;
            };
            let observed_name = observed_ty.display_name();
            if !self.provider.is_assignable_to(&observed_name, declared) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MemberInfo, NullTypeProvider, ParameterInfo, TypeInfo};

    struct FakeProvider;
    impl RuntimeTypeProvider for FakeProvider {
        fn is_known_type(&self, _name: &str) -> bool {
            true
        }
        fn type_info(&self, _name: &str) -> Option<TypeInfo> {
            Some(TypeInfo::default())
        }
        fn base_type(&self, _name: &str) -> Option<crate::types::TypeName> {
            None
        }
        fn is_assignable_to(&self, _src: &str, _dst: &str) -> bool {
            true
        }
        fn member(&self, ty: &str, name: &str) -> Option<MemberInfo> {
            match (ty, name) {
                ("Monster", "attack") => Some(MemberInfo {
                    name: "attack".into(),
                    parameters: vec![],
                    return_type: None,
                }),
                ("Monster", "health") => Some(MemberInfo {
                    name: "health".into(),
                    parameters: vec![],
                    return_type: Some("int".into()),
                }),
                ("Npc", "attack") => Some(MemberInfo {
                    name: "attack".into(),
                    parameters: vec![],
                    return_type: None,
                }),
                _ => None,
            }
        }
        fn global_function(&self, _name: &str) -> Option<MemberInfo> {
            None
        }
        fn global_class(&self, _name: &str) -> Option<crate::types::TypeName> {
            None
        }
        fn is_builtin(&self, _name: &str) -> bool {
            false
        }
        fn is_numeric(&self, _name: &str) -> bool {
            false
        }
        fn is_string(&self, _name: &str) -> bool {
            false
        }
        fn is_vector(&self, _name: &str) -> bool {
            false
        }
        fn is_iterable(&self, _name: &str) -> bool {
            false
        }
        fn is_indexable(&self, _name: &str) -> bool {
            false
        }
        fn is_nullable(&self, _name: &str) -> bool {
            true
        }
        fn is_container(&self, _name: &str) -> bool {
            false
        }
        fn is_packed_array(&self, _name: &str) -> bool {
            false
        }
        fn iterator_element_type(&self, _name: &str) -> Option<crate::types::TypeName> {
            None
        }
        fn indexer_result_type(&self, _name: &str) -> Option<crate::types::TypeName> {
            None
        }
        fn packed_array_element_type(&self, _name: &str) -> Option<crate::types::TypeName> {
            None
        }
        fn resolve_operator(
            &self,
            _left: &str,
            _op: crate::types::OperatorKind,
            _right: &str,
        ) -> Option<crate::types::TypeName> {
            None
        }
    }

    struct FixedCatalogue(Vec<&'static str>);
    impl CandidateCatalogue for FixedCatalogue {
        fn candidate_names(&self) -> Vec<Box<str>> {
            self.0.iter().map(|s| Box::from(*s)).collect()
        }
    }

    #[test]
    fn candidate_needing_attack_and_health_excludes_partial_match() {
        let provider = FakeProvider;
        let mut duck = DuckType::default();
        duck.require_method("attack", vec![]);
        duck.require_property("health");

        let resolver = DuckTypeResolver::new(&provider);
        let candidates = resolver.resolve(&duck, &FixedCatalogue(vec!["Monster", "Npc"]));
        assert_eq!(candidates, vec![Box::<str>::from("Monster")]);
    }

    #[test]
    fn base_object_members_never_discriminate() {
        let provider = NullTypeProvider;
        let mut duck = DuckType::default();
        duck.require_method("has_method", vec![]);
        let resolver = DuckTypeResolver::new(&provider);
        // `has_method` is a base-object member; stripped before checking,
        // so candidates are not penalized for Godot not reporting it as
        // user-visible.
        let candidates = resolver.resolve(&duck, &FixedCatalogue(vec!["Anything"]));
        assert_eq!(candidates, vec![Box::<str>::from("Anything")]);
    }
}
