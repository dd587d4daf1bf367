//! The runtime-type-provider abstraction (§6 "Runtime-type provider").
//!
//! The semantic engine never hard-codes engine type knowledge: every
//! question about a built-in/engine type goes through this trait, so the
//! inference engine in [`crate::inference`] can run against a
//! [`NullTypeProvider`] in tests and against a real engine-backed
//! implementation supplied by the host application.

use crate::types::{OperatorKind, SemanticType, TypeName};
use std::sync::RwLock;

/// A method, property, or signal's shape as reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    pub name: TypeName,
    pub parameters: Vec<ParameterInfo>,
    pub return_type: Option<TypeName>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    pub name: TypeName,
    pub declared_type: Option<TypeName>,
    pub has_default: bool,
}

/// Inheritance and category metadata for one known type (§6 `type_info`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeInfo {
    pub base_type: Option<TypeName>,
    pub is_builtin: bool,
}

/// §6 "Runtime-type provider": the external collaborator supplying
/// built-in/engine type knowledge. A null implementation returning minimal
/// defaults must be accepted (see [`NullTypeProvider`]), and a caching
/// wrapper must be composable around any provider (see
/// [`CachingTypeProvider`]).
pub trait RuntimeTypeProvider: Send + Sync {
    fn is_known_type(&self, name: &str) -> bool;
    fn type_info(&self, name: &str) -> Option<TypeInfo>;
    fn base_type(&self, name: &str) -> Option<TypeName>;
    fn is_assignable_to(&self, src: &str, dst: &str) -> bool;

    fn member(&self, ty: &str, name: &str) -> Option<MemberInfo>;
    fn global_function(&self, name: &str) -> Option<MemberInfo>;
    fn global_class(&self, name: &str) -> Option<TypeName>;
    fn is_builtin(&self, name: &str) -> bool;

    fn is_numeric(&self, name: &str) -> bool;
    fn is_string(&self, name: &str) -> bool;
    fn is_vector(&self, name: &str) -> bool;
    fn is_iterable(&self, name: &str) -> bool;
    fn is_indexable(&self, name: &str) -> bool;
    fn is_nullable(&self, name: &str) -> bool;
    fn is_container(&self, name: &str) -> bool;
    fn is_packed_array(&self, name: &str) -> bool;

    fn iterator_element_type(&self, name: &str) -> Option<TypeName>;
    fn indexer_result_type(&self, name: &str) -> Option<TypeName>;
    fn packed_array_element_type(&self, name: &str) -> Option<TypeName>;

    fn resolve_operator(&self, left: &str, op: OperatorKind, right: &str) -> Option<TypeName>;

    /// Provider-declared base-object members stripped before duck-type
    /// resolution so they carry no discriminating information (§4.6).
    fn base_object_members(&self) -> &[&str] {
        &["has_method", "call", "call_deferred", "get_class", "connect", "is_connected", "get", "set"]
    }
}

/// §6 "A null implementation returning minimal defaults must be
/// accepted." Knows only GDScript's built-in arithmetic/container
/// primitives; everything else reports unknown. Used as the default
/// provider for tests and for file-only analysis without an engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTypeProvider;

const NUMERIC: &[&str] = &["int", "float"];
const CONTAINERS: &[&str] = &["Array", "Dictionary"];
const PACKED_ARRAYS: &[&str] = &[
    "PackedByteArray",
    "PackedInt32Array",
    "PackedInt64Array",
    "PackedFloat32Array",
    "PackedFloat64Array",
    "PackedStringArray",
    "PackedVector2Array",
    "PackedVector3Array",
    "PackedColorArray",
];

impl RuntimeTypeProvider for NullTypeProvider {
    fn is_known_type(&self, name: &str) -> bool {
        matches!(name, "int" | "float" | "String" | "bool" | "Array" | "Dictionary" | "Variant" | "null")
            || PACKED_ARRAYS.contains(&name)
    }

    fn type_info(&self, name: &str) -> Option<TypeInfo> {
        self.is_known_type(name).then(|| TypeInfo {
            base_type: None,
            is_builtin: true,
        })
    }

    fn base_type(&self, _name: &str) -> Option<TypeName> {
        None
    }

    fn is_assignable_to(&self, src: &str, dst: &str) -> bool {
        src == dst || dst == "Variant" || (self.is_numeric(src) && self.is_numeric(dst) && dst == "float")
    }

    fn member(&self, _ty: &str, _name: &str) -> Option<MemberInfo> {
        None
    }

    fn global_function(&self, _name: &str) -> Option<MemberInfo> {
        None
    }

    fn global_class(&self, _name: &str) -> Option<TypeName> {
        None
    }

    fn is_builtin(&self, name: &str) -> bool {
        self.is_known_type(name)
    }

    fn is_numeric(&self, name: &str) -> bool {
        NUMERIC.contains(&name)
    }

    fn is_string(&self, name: &str) -> bool {
        name == "String" || name == "StringName"
    }

    fn is_vector(&self, name: &str) -> bool {
        matches!(name, "Vector2" | "Vector2i" | "Vector3" | "Vector3i" | "Vector4" | "Vector4i")
    }

    fn is_iterable(&self, name: &str) -> bool {
        self.is_container(name) || self.is_packed_array(name) || name == "String" || name == "range"
    }

    fn is_indexable(&self, name: &str) -> bool {
        self.is_iterable(name)
    }

    fn is_nullable(&self, name: &str) -> bool {
        !self.is_numeric(name) && !matches!(name, "bool" | "String")
    }

    fn is_container(&self, name: &str) -> bool {
        CONTAINERS.contains(&name)
    }

    fn is_packed_array(&self, name: &str) -> bool {
        PACKED_ARRAYS.contains(&name)
    }

    fn iterator_element_type(&self, name: &str) -> Option<TypeName> {
        self.packed_array_element_type(name).or_else(|| (name == "String").then(|| "String".into()))
    }

    fn indexer_result_type(&self, name: &str) -> Option<TypeName> {
        self.packed_array_element_type(name)
    }

    fn packed_array_element_type(&self, name: &str) -> Option<TypeName> {
        Some(match name {
            "PackedByteArray" | "PackedInt32Array" | "PackedInt64Array" => "int".into(),
            "PackedFloat32Array" | "PackedFloat64Array" => "float".into(),
            "PackedStringArray" => "String".into(),
            "PackedVector2Array" => "Vector2".into(),
            "PackedVector3Array" => "Vector3".into(),
            "PackedColorArray" => "Color".into(),
            _ => return None,
        })
    }

    fn resolve_operator(&self, left: &str, op: OperatorKind, right: &str) -> Option<TypeName> {
        use OperatorKind::{Add, BitAnd, BitOr, BitXor, Div, Mod, Mul, Pow, Shl, Shr, Sub};
        if self.is_string(left) && self.is_string(right) && matches!(op, Add) {
            return Some("String".into());
        }
        if self.is_numeric(left) && self.is_numeric(right) {
            return Some(match (left, right, op) {
                (_, _, Div) => "float".into(),
                (_, _, Shl | Shr | BitAnd | BitOr | BitXor) => "int".into(),
                ("float", _, _) | (_, "float", _) => "float".into(),
                (_, _, Pow) => "float".into(),
                (_, _, Mod | Add | Sub | Mul) => "int".into(),
            });
        }
        None
    }
}

/// §6 "a caching wrapper must be composable around any provider" / §5
/// "may be wrapped by a caching provider that is internally synchronized".
///
/// Only the lookups whose results are stable for the lifetime of a
/// session (member/type-info queries) are cached; category predicates are
/// cheap string matches on the inner provider and are not worth a lock.
pub struct CachingTypeProvider<P: RuntimeTypeProvider> {
    inner: P,
    member_cache: RwLock<rustc_hash::FxHashMap<(TypeName, TypeName), Option<MemberInfo>>>,
    type_info_cache: RwLock<rustc_hash::FxHashMap<TypeName, Option<TypeInfo>>>,
}

impl<P: RuntimeTypeProvider> CachingTypeProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            member_cache: RwLock::new(rustc_hash::FxHashMap::default()),
            type_info_cache: RwLock::new(rustc_hash::FxHashMap::default()),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: RuntimeTypeProvider> RuntimeTypeProvider for CachingTypeProvider<P> {
    fn is_known_type(&self, name: &str) -> bool {
        self.inner.is_known_type(name)
    }

    fn type_info(&self, name: &str) -> Option<TypeInfo> {
        if let Some(hit) = self.type_info_cache.read().unwrap().get(name) {
            return hit.clone();
        }
        let computed = self.inner.type_info(name);
        self.type_info_cache
            .write()
            .unwrap()
            .insert(TypeName::from(name), computed.clone());
        computed
    }

    fn base_type(&self, name: &str) -> Option<TypeName> {
        self.inner.base_type(name)
    }

    fn is_assignable_to(&self, src: &str, dst: &str) -> bool {
        self.inner.is_assignable_to(src, dst)
    }

    fn member(&self, ty: &str, name: &str) -> Option<MemberInfo> {
        let key = (TypeName::from(ty), TypeName::from(name));
        if let Some(hit) = self.member_cache.read().unwrap().get(&key) {
            return hit.clone();
        }
        let computed = self.inner.member(ty, name);
        self.member_cache.write().unwrap().insert(key, computed.clone());
        computed
    }

    fn global_function(&self, name: &str) -> Option<MemberInfo> {
        self.inner.global_function(name)
    }

    fn global_class(&self, name: &str) -> Option<TypeName> {
        self.inner.global_class(name)
    }

    fn is_builtin(&self, name: &str) -> bool {
        self.inner.is_builtin(name)
    }

    fn is_numeric(&self, name: &str) -> bool {
        self.inner.is_numeric(name)
    }

    fn is_string(&self, name: &str) -> bool {
        self.inner.is_string(name)
    }

    fn is_vector(&self, name: &str) -> bool {
        self.inner.is_vector(name)
    }

    fn is_iterable(&self, name: &str) -> bool {
        self.inner.is_iterable(name)
    }

    fn is_indexable(&self, name: &str) -> bool {
        self.inner.is_indexable(name)
    }

    fn is_nullable(&self, name: &str) -> bool {
        self.inner.is_nullable(name)
    }

    fn is_container(&self, name: &str) -> bool {
        self.inner.is_container(name)
    }

    fn is_packed_array(&self, name: &str) -> bool {
        self.inner.is_packed_array(name)
    }

    fn iterator_element_type(&self, name: &str) -> Option<TypeName> {
        self.inner.iterator_element_type(name)
    }

    fn indexer_result_type(&self, name: &str) -> Option<TypeName> {
        self.inner.indexer_result_type(name)
    }

    fn packed_array_element_type(&self, name: &str) -> Option<TypeName> {
        self.inner.packed_array_element_type(name)
    }

    fn resolve_operator(&self, left: &str, op: OperatorKind, right: &str) -> Option<TypeName> {
        self.inner.resolve_operator(left, op, right)
    }

    fn base_object_members(&self) -> &[&str] {
        self.inner.base_object_members()
    }
}

/// A type that can supply cross-file symbol lookups and scene/autoload
/// context (§6 "Scene/project context providers"). The project
/// orchestrator composes implementations of this with a
/// [`RuntimeTypeProvider`] so per-file inference resolves identifiers
/// that only the project as a whole knows about.
pub trait ProjectContextProvider: Send + Sync {
    /// A node-type map keyed by a `.tscn`-derived node path, supplied by
    /// an external scene parser (§6 — `.tscn` parsing itself is out of
    /// scope, only its output is consumed here).
    fn scene_node_type(&self, node_path: &str) -> Option<TypeName>;

    /// Autoload singleton name → its script's class name.
    fn autoload_class(&self, name: &str) -> Option<TypeName>;

    /// A user-defined class name declared by another script in the
    /// project, if any.
    fn user_class(&self, name: &str) -> Option<TypeName>;
}

/// A `ProjectContextProvider` with nothing registered, for single-file
/// analysis.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProjectContext;

impl ProjectContextProvider for NullProjectContext {
    fn scene_node_type(&self, _node_path: &str) -> Option<TypeName> {
        None
    }

    fn autoload_class(&self, _name: &str) -> Option<TypeName> {
        None
    }

    fn user_class(&self, _name: &str) -> Option<TypeName> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_provider_promotes_int_and_float() {
        let provider = NullTypeProvider;
        assert_eq!(
            provider.resolve_operator("int", OperatorKind::Add, "float"),
            Some("float".into())
        );
        assert_eq!(
            provider.resolve_operator("int", OperatorKind::Add, "int"),
            Some("int".into())
        );
    }

    #[test]
    fn caching_provider_reuses_underlying_result() {
        let provider = CachingTypeProvider::new(NullTypeProvider);
        assert_eq!(provider.type_info("int"), provider.inner().type_info("int"));
        assert!(provider.type_info("int").is_some());
    }
}
