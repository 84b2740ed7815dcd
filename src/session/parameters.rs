use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

/// Named query parameters, kept in insertion order.
///
/// Cloning yields another handle to the same mapping: a session and its copies observe each
/// other's changes.
#[derive(Debug, Clone, Default)]
pub struct QueryParameters {
    inner: Arc<Mutex<Vec<(String, Value)>>>,
}

impl QueryParameters {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<(String, Value)>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets `name` to `value`, keeping the original position of an existing entry.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        let name = name.into();
        let mut entries = self.entries();
        match entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.entries()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        let mut entries = self.entries();
        let index = entries.iter().position(|(n, _)| n == name)?;
        Some(entries.remove(index).1)
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Copies the current entries in order.
    pub fn snapshot(&self) -> Vec<(String, Value)> {
        self.entries().clone()
    }

    /// Returns true when both handles point at the same mapping.
    pub fn shares_with(&self, other: &QueryParameters) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
