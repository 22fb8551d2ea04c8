//! PDF dictionary implementation

use std::collections::btree_map;
use std::collections::BTreeMap;

use super::Object;

/// PDF dictionary object
///
/// Keys are stored without the leading slash and iterate in sorted order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: BTreeMap<String, Object>,
}

impl Dictionary {
    /// Create new dictionary
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Get value by key
    pub fn get(&self, key: &str) -> Option<&Object> {
        self.entries.get(key)
    }

    /// Get integer value
    pub fn get_integer(&self, key: &str) -> Option<i64> {
        match self.get(key) {
            Some(Object::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    /// Get string value
    pub fn get_string(&self, key: &str) -> Option<&[u8]> {
        match self.get(key) {
            Some(Object::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Get name value
    pub fn get_name(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(Object::Name(n)) => Some(n),
            _ => None,
        }
    }

    /// Whether `/Type` names `type_name`
    pub fn has_type(&self, type_name: &str) -> bool {
        self.get_name("Type") == Some(type_name)
    }

    /// Set value
    pub fn set(&mut self, key: &str, value: Object) {
        self.entries.insert(key.to_string(), value);
    }

    /// Remove value
    pub fn remove(&mut self, key: &str) -> Option<Object> {
        self.entries.remove(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries
    pub fn iter(&self) -> btree_map::Iter<'_, String, Object> {
        self.entries.iter()
    }

    /// Iterate over entries with mutable values
    pub fn iter_mut(&mut self) -> btree_map::IterMut<'_, String, Object> {
        self.entries.iter_mut()
    }
}
