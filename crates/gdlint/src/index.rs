//! §4.9 "build the project-wide symbol index: map user-defined class names
//! to their declaring scripts" plus the optional scene/autoload maps §6
//! describes as external collaborators.
//!
//! Write-once per analysis pass (§5: "The project-wide symbol index is
//! write-once per analysis pass; reads after the pass require no
//! locking."): [`crate::Project::analyze_all`] builds one before running
//! any per-file inference, then only ever reads it.

use gdlint_semantic::provider::ProjectContextProvider;
use gdlint_semantic::types::TypeName;
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub struct ProjectIndex {
    /// `class_name` → declaring script's resource path.
    classes: FxHashMap<Box<str>, Box<str>>,
    /// Autoload singleton name → its script's class name (§6).
    autoloads: FxHashMap<Box<str>, TypeName>,
    /// `.tscn`-derived node path → node type, supplied by an external
    /// scene parser (§6 — parsing the `.tscn` itself is out of scope).
    scene_nodes: FxHashMap<Box<str>, TypeName>,
}

impl ProjectIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_class(&mut self, class_name: impl Into<Box<str>>, script_path: impl Into<Box<str>>) {
        self.classes.insert(class_name.into(), script_path.into());
    }

    pub fn register_autoload(&mut self, name: impl Into<Box<str>>, class_name: impl Into<TypeName>) {
        self.autoloads.insert(name.into(), class_name.into());
    }

    pub fn register_scene_node(&mut self, node_path: impl Into<Box<str>>, node_type: impl Into<TypeName>) {
        self.scene_nodes.insert(node_path.into(), node_type.into());
    }

    /// The script that declared `class_name` via a `class_name` clause, if
    /// any script in the project did (the inverse of `user_class`, used by
    /// [`crate::Project::script_by_resource_path`]'s callers to jump from a
    /// resolved class back to its file).
    pub fn declaring_script(&self, class_name: &str) -> Option<&str> {
        self.classes.get(class_name).map(std::convert::AsRef::as_ref)
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(std::convert::AsRef::as_ref)
    }
}

impl ProjectContextProvider for ProjectIndex {
    fn scene_node_type(&self, node_path: &str) -> Option<TypeName> {
        self.scene_nodes.get(node_path).cloned()
    }

    fn autoload_class(&self, name: &str) -> Option<TypeName> {
        self.autoloads.get(name).cloned()
    }

    fn user_class(&self, name: &str) -> Option<TypeName> {
        self.classes.contains_key(name).then(|| TypeName::from(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_class_reports_only_registered_names() {
        let mut index = ProjectIndex::new();
        index.register_class("Player", "res://player.gd");
        assert_eq!(index.user_class("Player"), Some(TypeName::from("Player")));
        assert_eq!(index.user_class("Enemy"), None);
        assert_eq!(index.declaring_script("Player"), Some("res://player.gd"));
    }

    #[test]
    fn autoload_and_scene_lookups_are_independent_of_class_lookups() {
        let mut index = ProjectIndex::new();
        index.register_autoload("GameState", TypeName::from("GameStateScript"));
        index.register_scene_node("/root/Main/Player", TypeName::from("Player"));
        assert_eq!(index.autoload_class("GameState"), Some(TypeName::from("GameStateScript")));
        assert_eq!(index.scene_node_type("/root/Main/Player"), Some(TypeName::from("Player")));
        assert_eq!(index.user_class("GameState"), None);
    }
}
