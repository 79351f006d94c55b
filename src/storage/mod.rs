//! # Durable storage behind the channel queues.
//!
//! A [`Store`] is a tiny key/value seam: one key per channel, holding the
//! whole ordered list of pending payloads as a single document. Queues always
//! read-modify-write the full document, so a store only has to make a single
//! `save` atomic to keep previously persisted entries intact.
//!
//! ## Implementations
//! - [`FileStore`]: one JSON file per key, written via temp file + rename.
//! - [`MemoryStore`]: mutex-guarded map, non-durable (tests, ephemeral use).
//!
//! ## Document format
//! ```text
//! pending_events_notifications  ──►  ["{\"pkg\":\"mail\"}", "{\"pkg\":\"chat\"}"]
//! ```
//! A JSON array of strings, oldest first. Other elements are read back as
//! their JSON text (`1` → `"1"`, `null` → `"null"`); a document that is not a
//! JSON array is reported as corrupt.

mod file;
mod memory;
mod store;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::Store;

use crate::error::StorageError;

/// Prefix of the storage key of every channel.
pub const KEY_PREFIX: &str = "pending_events_";

/// Returns the storage key holding the pending records of `channel`.
///
/// ```
/// assert_eq!(eventspool::storage::key_for("audio_features"), "pending_events_audio_features");
/// ```
pub fn key_for(channel: &str) -> String {
    format!("{KEY_PREFIX}{channel}")
}

/// Encodes an ordered list of payloads into a stored document.
pub(crate) fn encode_entries<'a, I>(key: &str, entries: I) -> Result<String, StorageError>
where
    I: IntoIterator<Item = &'a str>,
{
    let list: Vec<&str> = entries.into_iter().collect();
    serde_json::to_string(&list).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })
}

/// Decodes a stored document; elements that are not strings become their JSON text.
pub(crate) fn decode_entries(key: &str, doc: &str) -> Result<Vec<String>, StorageError> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(doc).map_err(|source| StorageError::Corrupt {
            key: key.to_string(),
            source,
        })?;
    Ok(values
        .into_iter()
        .map(|v| match v {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payloads_that_look_like_json_stay_opaque() {
        let doc = encode_entries("k", [r#"{"a":1}"#, "plain"]).unwrap();
        let back = decode_entries("k", &doc).unwrap();
        assert_eq!(back, vec![r#"{"a":1}"#.to_string(), "plain".to_string()]);
    }

    #[test]
    fn non_string_elements_read_as_json_text() {
        let back = decode_entries("k", r#"["a", 1, true, null, {"b":2}, "c"]"#).unwrap();
        assert_eq!(back, vec!["a", "1", "true", "null", r#"{"b":2}"#, "c"]);
    }

    #[test]
    fn garbage_is_reported_as_corrupt() {
        let err = decode_entries("k", "not json").unwrap_err();
        assert_eq!(err.as_label(), "storage_corrupt");
        assert_eq!(err.key(), "k");

        let err = decode_entries("k", r#"{"a":"b"}"#).unwrap_err();
        assert_eq!(err.as_label(), "storage_corrupt");
    }
}
