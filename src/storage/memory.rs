//! In-memory backend.

use super::{KeyValueStore, StorageError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Process-local key-value store.
///
/// Cloning the `Arc` that wraps it is how tests simulate "reloading the page":
/// a second system started on the same store sees everything the first wrote.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{load_typed, save_typed};

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.get("cart").await.unwrap().is_none());

        store.set("cart", "[]").await.unwrap();
        assert_eq!(store.get("cart").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(store.len(), 1);

        store.remove("cart").await.unwrap();
        store.remove("cart").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_typed_helpers_mask_corrupt_values() {
        let store = MemoryStore::new();
        save_typed(&store, "numbers", &vec![1, 2, 3]).await.unwrap();
        let numbers: Option<Vec<u32>> = load_typed(&store, "numbers").await.unwrap();
        assert_eq!(numbers, Some(vec![1, 2, 3]));

        store.set("numbers", "{not json").await.unwrap();
        let numbers: Option<Vec<u32>> = load_typed(&store, "numbers").await.unwrap();
        assert!(numbers.is_none());
    }
}
