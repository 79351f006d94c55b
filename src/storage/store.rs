//! # Storage trait.
//!
//! [`Store`] is the persistence seam of the pipeline. Calls are synchronous and
//! made while the owning channel's lock is held, so implementations only need
//! to be internally consistent per key, not across keys.

use crate::error::StorageError;

/// Key/value persistence for channel documents.
///
/// ### Implementation requirements
/// - `save` must replace the previous document atomically: after a crash the
///   key holds either the old or the new document, never a mix.
/// - `load` of a key that was never saved (or was removed) returns `Ok(None)`.
/// - `remove` of a missing key is not an error.
pub trait Store: Send + Sync + 'static {
    /// Reads the document stored under `key`.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the document stored under `key`.
    fn save(&self, key: &str, contents: &str) -> Result<(), StorageError>;

    /// Deletes the entry for `key`.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Returns the store name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
