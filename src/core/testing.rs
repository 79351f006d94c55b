//! Store doubles shared by the unit tests.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::StorageError;
use crate::storage::{MemoryStore, Store};

fn unavailable(key: &str) -> StorageError {
    StorageError::Io {
        key: key.to_string(),
        source: io::Error::new(io::ErrorKind::Other, "storage unavailable"),
    }
}

/// Every operation fails.
pub(crate) struct BrokenStore;

impl Store for BrokenStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Err(unavailable(key))
    }

    fn save(&self, key: &str, _contents: &str) -> Result<(), StorageError> {
        Err(unavailable(key))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Err(unavailable(key))
    }
}

/// [`MemoryStore`] whose operations can be made to fail one at a time.
#[derive(Default)]
pub(crate) struct FlakyStore {
    pub(crate) inner: MemoryStore,
    pub(crate) fail_load: AtomicBool,
    pub(crate) fail_save: AtomicBool,
    pub(crate) fail_remove: AtomicBool,
}

impl FlakyStore {
    /// Stops injecting failures.
    pub(crate) fn heal(&self) {
        self.fail_load.store(false, Ordering::SeqCst);
        self.fail_save.store(false, Ordering::SeqCst);
        self.fail_remove.store(false, Ordering::SeqCst);
    }
}

impl Store for FlakyStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(unavailable(key));
        }
        self.inner.load(key)
    }

    fn save(&self, key: &str, contents: &str) -> Result<(), StorageError> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(unavailable(key));
        }
        self.inner.save(key, contents)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(unavailable(key));
        }
        self.inner.remove(key)
    }
}
