//! Key-Value Store
//!
//! In-memory, process-lifetime state owned by the controller. Values are
//! arbitrary JSON; keys are unique; no validation of either.

use std::collections::HashMap;

use serde_json::Value;

/// The store
#[derive(Clone, Debug, Default)]
pub struct DataStore {
    entries: HashMap<String, Value>,
}

impl DataStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a value (cloned)
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    /// Insert or replace a value, returning the previous one
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Check for a key
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of all entries as a JSON object
    #[must_use]
    pub fn snapshot(&self) -> serde_json::Map<String, Value> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
