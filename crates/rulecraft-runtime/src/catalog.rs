//! Attribute catalog
//!
//! Registry of attribute names and their declared types. Entries are never
//! updated or removed; ids are assigned from a counter that survives
//! restarts through the snapshot.

use crate::error::{EngineError, Result};
use rulecraft_core::{Attribute, AttributeId, DataType};
use rulecraft_parser::is_identifier;
use std::collections::HashMap;

/// Attributes registered on first start when the catalog is empty
pub const DEFAULT_ATTRIBUTES: [(&str, DataType); 4] = [
    ("age", DataType::Int),
    ("department", DataType::String),
    ("salary", DataType::Float),
    ("experience", DataType::Int),
];

/// Attribute catalog
#[derive(Debug, Clone)]
pub struct AttributeCatalog {
    attributes: Vec<Attribute>,
    by_name: HashMap<String, usize>,
    next_id: AttributeId,
}

impl Default for AttributeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeCatalog {
    pub fn new() -> Self {
        Self {
            attributes: Vec::new(),
            by_name: HashMap::new(),
            next_id: 1,
        }
    }

    /// Rebuild a catalog from persisted entries
    pub fn from_parts(attributes: Vec<Attribute>, next_id: AttributeId) -> Self {
        let by_name = attributes
            .iter()
            .enumerate()
            .map(|(i, a)| (a.attribute_name.clone(), i))
            .collect();
        Self {
            attributes,
            by_name,
            next_id,
        }
    }

    /// Register a new attribute.
    ///
    /// Names must be usable in rule text and not already registered;
    /// duplicates are rejected rather than updated.
    pub fn add(&mut self, name: &str, data_type: DataType) -> Result<AttributeId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::Validation(
                "Attribute name must not be empty".to_string(),
            ));
        }
        if !is_identifier(name) {
            return Err(EngineError::Validation(format!(
                "Attribute name '{}' is not a valid identifier",
                name
            )));
        }
        if self.by_name.contains_key(name) {
            return Err(EngineError::Validation(format!(
                "Attribute '{}' already exists",
                name
            )));
        }

        let id = self.next_id;
        self.next_id += 1;
        self.by_name.insert(name.to_string(), self.attributes.len());
        self.attributes.push(Attribute::new(id, name, data_type));
        Ok(id)
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.by_name.get(name).map(|&i| &self.attributes[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Declared type of `name`, if registered
    pub fn data_type(&self, name: &str) -> Option<DataType> {
        self.get(name).map(|a| a.data_type)
    }

    /// All attributes in registration order
    pub fn list(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn next_id(&self) -> AttributeId {
        self.next_id
    }

    /// Fail with a validation error naming the first attribute in `names`
    /// that is not registered
    pub fn require_all<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Result<()> {
        for name in names {
            if !self.contains(name) {
                return Err(EngineError::Validation(format!(
                    "Attribute '{}' is not registered",
                    name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_assigns_sequential_ids() {
        let mut catalog = AttributeCatalog::new();
        assert_eq!(catalog.add("age", DataType::Int).unwrap(), 1);
        assert_eq!(catalog.add("salary", DataType::Float).unwrap(), 2);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.data_type("salary"), Some(DataType::Float));
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let mut catalog = AttributeCatalog::new();
        for (name, data_type) in DEFAULT_ATTRIBUTES {
            catalog.add(name, data_type).unwrap();
        }
        let names: Vec<&str> = catalog
            .list()
            .iter()
            .map(|a| a.attribute_name.as_str())
            .collect();
        assert_eq!(names, vec!["age", "department", "salary", "experience"]);
    }

    #[test]
    fn test_duplicate_is_rejected() {
        let mut catalog = AttributeCatalog::new();
        catalog.add("age", DataType::Int).unwrap();
        let err = catalog.add("age", DataType::Float).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(catalog.data_type("age"), Some(DataType::Int));
        assert_eq!(catalog.next_id(), 2);
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        let mut catalog = AttributeCatalog::new();
        for name in ["", "   ", "first name", "1abc", "AND", "a>b"] {
            assert!(
                matches!(catalog.add(name, DataType::String), Err(EngineError::Validation(_))),
                "expected rejection for {:?}",
                name
            );
        }
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_name_is_trimmed() {
        let mut catalog = AttributeCatalog::new();
        catalog.add("  tenure ", DataType::Int).unwrap();
        assert!(catalog.contains("tenure"));
    }

    #[test]
    fn test_from_parts_keeps_counter() {
        let catalog = AttributeCatalog::from_parts(vec![Attribute::new(5, "age", DataType::Int)], 9);
        assert_eq!(catalog.get("age").map(|a| a.id), Some(5));
        assert_eq!(catalog.next_id(), 9);
    }

    #[test]
    fn test_require_all() {
        let mut catalog = AttributeCatalog::new();
        catalog.add("age", DataType::Int).unwrap();
        assert!(catalog.require_all(["age"]).is_ok());
        let err = catalog.require_all(["age", "height"]).unwrap_err();
        assert!(err.to_string().contains("height"));
    }
}
