//! In-memory [`Store`]. Nothing survives the process.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::Store;
use crate::error::StorageError;

/// Mutex-guarded map of documents.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.docs.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True if no key is held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Store for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let docs = self.docs.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(docs.get(key).cloned())
    }

    fn save(&self, key: &str, contents: &str) -> Result<(), StorageError> {
        let mut docs = self.docs.lock().unwrap_or_else(PoisonError::into_inner);
        docs.insert(key.to_string(), contents.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut docs = self.docs.lock().unwrap_or_else(PoisonError::into_inner);
        docs.remove(key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
