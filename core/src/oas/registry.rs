#![deny(missing_docs)]

//! # Schema Registry
//!
//! Ordered mapping from type name to schema: the single source of truth for which
//! named types exist. Keys are unique; synthesized entries never shadow declared ones.

use crate::error::{AppError, AppResult};
use crate::oas::schemas::Schema;
use indexmap::IndexMap;

/// The named-type symbol table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaRegistry {
    entries: IndexMap<String, Schema>,
}

impl From<IndexMap<String, Schema>> for SchemaRegistry {
    fn from(entries: IndexMap<String, Schema>) -> Self {
        Self { entries }
    }
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no types.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Looks up a schema.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.entries.get(name)
    }

    /// Registers `schema` under `name`. Fails if the name is taken.
    pub fn insert(&mut self, name: impl Into<String>, schema: Schema) -> AppResult<()> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(AppError::General(format!(
                "Schema '{}' is already registered",
                name
            )));
        }
        self.entries.insert(name, schema);
        Ok(())
    }

    /// Registers `schema` under `name`, or `name2`, `name3`, … when taken.
    /// Returns the name actually used.
    pub fn insert_unique(
        &mut self,
        name: &str,
        schema: Schema,
        max_attempts: usize,
    ) -> AppResult<String> {
        let chosen = self.free_name(name, max_attempts)?;
        self.entries.insert(chosen.clone(), schema);
        Ok(chosen)
    }

    /// First of `name`, `name2`, `name3`, … that is not registered.
    fn free_name(&self, name: &str, max_attempts: usize) -> AppResult<String> {
        if !self.entries.contains_key(name) {
            return Ok(name.to_string());
        }
        (2..)
            .take(max_attempts)
            .map(|n| format!("{name}{n}"))
            .find(|candidate| !self.entries.contains_key(candidate))
            .ok_or_else(|| AppError::NameExhausted {
                scope: "schema registry".to_string(),
                name: name.to_string(),
                attempts: max_attempts,
            })
    }

    /// Replaces the schema of an existing entry, keeping its position.
    pub fn replace(&mut self, name: &str, schema: Schema) -> Option<Schema> {
        self.entries
            .get_mut(name)
            .map(|slot| std::mem::replace(slot, schema))
    }

    /// Keeps only entries for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &Schema) -> bool) {
        self.entries.retain(|name, schema| keep(name, schema));
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.entries.iter().map(|(name, schema)| (name.as_str(), schema))
    }

    /// Names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Names in lexical order.
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut registry = SchemaRegistry::new();
        registry.insert("Pet", Schema::default()).unwrap();
        assert!(registry.insert("Pet", Schema::default()).is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_insert_unique_suffixes() {
        let mut registry = SchemaRegistry::new();
        registry.insert("WidgetResponse", Schema::default()).unwrap();

        let second = registry
            .insert_unique("WidgetResponse", Schema::default(), 10)
            .unwrap();
        let third = registry
            .insert_unique("WidgetResponse", Schema::default(), 10)
            .unwrap();
        assert_eq!(second, "WidgetResponse2");
        assert_eq!(third, "WidgetResponse3");
    }

    #[test]
    fn test_free_name_exhaustion() {
        let mut registry = SchemaRegistry::new();
        registry.insert("A", Schema::default()).unwrap();
        registry.insert("A2", Schema::default()).unwrap();
        assert!(matches!(
            registry.free_name("A", 1),
            Err(AppError::NameExhausted { attempts: 1, .. })
        ));
    }

    #[test]
    fn test_retain_keeps_order() {
        let mut registry = SchemaRegistry::new();
        for name in ["C", "A", "B"] {
            registry.insert(name, Schema::default()).unwrap();
        }
        registry.retain(|name, _| name != "A");
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["C", "B"]);
        assert_eq!(registry.sorted_names(), vec!["B", "C"]);
    }

    #[test]
    fn test_replace_in_place() {
        let mut registry = SchemaRegistry::new();
        registry.insert("A", Schema::default()).unwrap();
        registry.insert("B", Schema::default()).unwrap();
        registry.replace("A", Schema::primitive("string", None));

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(registry.get("A").and_then(Schema::type_name), Some("string"));
        assert!(registry.replace("Missing", Schema::default()).is_none());
    }
}
