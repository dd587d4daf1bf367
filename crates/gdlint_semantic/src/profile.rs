//! Usage-profile reconstruction for untyped locals (§3 "Container usage
//! profile", "Variable usage profile", §4.4 "Container element
//! reconstruction").

use crate::types::{Confidence, SemanticType};

/// One observed write to a container-typed local: an `append`/`push`
/// argument, an `insert`/index-assign value, or (for dictionaries) a key.
#[derive(Debug, Clone)]
struct Observation {
    ty: SemanticType,
    confidence: Confidence,
}

/// §3 "Container usage profile": per untyped local container variable,
/// observed element-type and dictionary-key-type assignments.
#[derive(Debug, Clone, Default)]
pub struct ContainerUsageProfile {
    element_observations: Vec<Observation>,
    key_observations: Vec<Observation>,
}

impl ContainerUsageProfile {
    pub fn observe_element(&mut self, ty: SemanticType, confidence: Confidence) {
        self.element_observations.push(Observation { ty, confidence });
    }

    pub fn observe_key(&mut self, ty: SemanticType, confidence: Confidence) {
        self.key_observations.push(Observation { ty, confidence });
    }

    /// The union of every observed element assignment (§4.4).
    pub fn reconstruct_element_type(&self) -> Option<SemanticType> {
        reconstruct(&self.element_observations)
    }

    pub fn reconstruct_key_type(&self) -> Option<SemanticType> {
        reconstruct(&self.key_observations)
    }

    pub fn is_empty(&self) -> bool {
        self.element_observations.is_empty() && self.key_observations.is_empty()
    }
}

/// §3 "Variable usage profile": for untyped variables, all assignment
/// observations, unioned to form the effective type.
#[derive(Debug, Clone, Default)]
pub struct VariableUsageProfile {
    assignments: Vec<Observation>,
}

impl VariableUsageProfile {
    pub fn observe(&mut self, ty: SemanticType, confidence: Confidence) {
        self.assignments.push(Observation { ty, confidence });
    }

    pub fn reconstruct(&self) -> Option<SemanticType> {
        reconstruct(&self.assignments)
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

fn reconstruct(observations: &[Observation]) -> Option<SemanticType> {
    if observations.is_empty() {
        return None;
    }
    Some(SemanticType::union_of(observations.iter().map(|o| o.ty.clone())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconstructs_int_from_repeated_append_observations() {
        let mut profile = ContainerUsageProfile::default();
        profile.observe_element(SemanticType::concrete("int"), Confidence::Strict);
        profile.observe_element(SemanticType::concrete("int"), Confidence::Strict);
        assert_eq!(profile.reconstruct_element_type(), Some(SemanticType::concrete("int")));
    }

    #[test]
    fn mixed_observations_union() {
        let mut profile = VariableUsageProfile::default();
        profile.observe(SemanticType::concrete("int"), Confidence::Strict);
        profile.observe(SemanticType::concrete("String"), Confidence::Strict);
        let reconstructed = profile.reconstruct().unwrap();
        assert!(matches!(reconstructed, SemanticType::Union(_)));
    }
}
