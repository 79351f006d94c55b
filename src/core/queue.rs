//! # Bounded persistent queue - one per channel.
//!
//! [`ChannelQueue`] keeps the pending records of a single channel in a
//! [`Store`] under `pending_events_<channel>`, capped at a fixed capacity.
//!
//! ## Operations
//! ```text
//! append(payload):
//!   load ─► push ─► evict oldest while len > capacity ─► save (or remove if empty)
//!
//! drain_all():
//!   load ─► remove key ─► return loaded entries (oldest first)
//! ```
//!
//! ## Rules
//! - Both operations take `&mut self`; the owning channel holds the queue
//!   behind its mutex, which is what serializes concurrent producers.
//! - Nothing is returned to producers: storage failures become diagnostics.
//! - Corrupt stored state reads as an empty queue; the next append rewrites it.
//! - An unreadable store (I/O error) is left untouched: the append is skipped
//!   rather than overwriting entries that may become readable again.
//! - `drain_all` returns records only once the key is cleared, so a batch is
//!   never handed out twice.

use std::sync::Arc;

use crate::config::Capacity;
use crate::error::StorageError;
use crate::events::{Bus, Event, EventKind};
use crate::storage::{decode_entries, encode_entries, key_for, Store};

/// Durable, capacity-bounded FIFO for one channel.
pub(crate) struct ChannelQueue {
    channel: Arc<str>,
    key: String,
    capacity: Capacity,
    store: Arc<dyn Store>,
    bus: Bus,
}

impl ChannelQueue {
    pub(crate) fn new(channel: Arc<str>, capacity: Capacity, store: Arc<dyn Store>, bus: Bus) -> Self {
        let key = key_for(&channel);
        Self {
            channel,
            key,
            capacity,
            store,
            bus,
        }
    }

    pub(crate) fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Appends one payload, evicting the oldest entries beyond capacity.
    pub(crate) fn append(&mut self, payload: &str) {
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(e) => {
                self.report(EventKind::PersistFailed, &e);
                return;
            }
        };

        entries.push(payload.to_string());

        let cap = self.capacity.get();
        if entries.len() > cap {
            let overflow = entries.len() - cap;
            entries.drain(..overflow);
            self.bus.publish(
                Event::new(EventKind::RecordsEvicted)
                    .with_channel(Arc::clone(&self.channel))
                    .with_count(overflow),
            );
        }

        if let Err(e) = self.write_entries(&entries) {
            self.report(EventKind::PersistFailed, &e);
        }
    }

    /// Takes every stored entry (oldest first) and clears the stored state.
    pub(crate) fn drain_all(&mut self) -> Vec<String> {
        let entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(e) => {
                self.report(EventKind::PersistFailed, &e);
                return Vec::new();
            }
        };

        if let Err(e) = self.clear() {
            self.report(EventKind::PersistFailed, &e);
            return Vec::new();
        }

        self.bus.publish(
            Event::new(EventKind::Drained)
                .with_channel(Arc::clone(&self.channel))
                .with_count(entries.len()),
        );
        entries
    }

    /// Number of entries currently stored (0 when unreadable).
    pub(crate) fn len(&self) -> usize {
        self.read_entries().map(|e| e.len()).unwrap_or(0)
    }

    fn read_entries(&self) -> Result<Vec<String>, StorageError> {
        let Some(doc) = self.store.load(&self.key)? else {
            return Ok(Vec::new());
        };
        match decode_entries(&self.key, &doc) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                self.report(EventKind::StateCorrupt, &e);
                Ok(Vec::new())
            }
        }
    }

    fn write_entries(&self, entries: &[String]) -> Result<(), StorageError> {
        if entries.is_empty() {
            return self.store.remove(&self.key);
        }
        let doc = encode_entries(&self.key, entries.iter().map(String::as_str))?;
        self.store.save(&self.key, &doc)
    }

    /// Removes the key; falls back to saving an empty list.
    fn clear(&self) -> Result<(), StorageError> {
        match self.store.remove(&self.key) {
            Ok(()) => Ok(()),
            Err(remove_err) => {
                tracing::debug!(
                    channel = %self.channel,
                    error = %remove_err,
                    "remove failed, overwriting with empty list"
                );
                self.store.save(&self.key, "[]")
            }
        }
    }

    fn report(&self, kind: EventKind, err: &StorageError) {
        self.bus.publish(
            Event::new(kind)
                .with_channel(Arc::clone(&self.channel))
                .with_reason(err.to_string()),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::core::testing::{BrokenStore, FlakyStore};
    use crate::storage::MemoryStore;

    fn queue(cap: i64, store: Arc<dyn Store>) -> (ChannelQueue, Bus) {
        let bus = Bus::new(64);
        let q = ChannelQueue::new(
            Arc::from("notifications"),
            Capacity::new("test", cap).unwrap(),
            store,
            bus.clone(),
        );
        (q, bus)
    }

    #[test]
    fn keeps_everything_under_capacity() {
        let (mut q, _bus) = queue(5, Arc::new(MemoryStore::new()));
        for p in ["a", "b", "c"] {
            q.append(p);
        }
        assert_eq!(q.len(), 3);
        assert_eq!(q.drain_all(), vec!["a", "b", "c"]);
    }

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let (mut q, bus) = queue(3, Arc::new(MemoryStore::new()));
        let mut rx = bus.subscribe();
        for p in ["a", "b", "c", "d"] {
            q.append(p);
        }
        assert_eq!(q.drain_all(), vec!["b", "c", "d"]);
        assert!(q.drain_all().is_empty());

        let evicted = std::iter::from_fn(|| rx.try_recv().ok())
            .find(|ev| ev.kind == EventKind::RecordsEvicted)
            .expect("eviction reported");
        assert_eq!(evicted.count, Some(1));
    }

    #[test]
    fn zero_capacity_retains_nothing() {
        let store = Arc::new(MemoryStore::new());
        let (mut q, _bus) = queue(0, store.clone());
        q.append("a");
        q.append("b");
        assert_eq!(q.len(), 0);
        assert!(store.is_empty());
        assert!(q.drain_all().is_empty());
    }

    #[test]
    fn drain_removes_the_key() {
        let store = Arc::new(MemoryStore::new());
        let (mut q, _bus) = queue(10, store.clone());
        q.append("a");
        assert_eq!(store.len(), 1);
        q.drain_all();
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_state_reads_as_empty_and_is_repaired() {
        let store = Arc::new(MemoryStore::new());
        store.save("pending_events_notifications", "{oops").unwrap();
        let (mut q, bus) = queue(10, store.clone());
        let mut rx = bus.subscribe();

        assert_eq!(q.len(), 0);
        let ev = rx.try_recv().unwrap();
        assert_eq!(ev.kind, EventKind::StateCorrupt);

        q.append("fresh");
        assert_eq!(
            store.load("pending_events_notifications").unwrap().as_deref(),
            Some(r#"["fresh"]"#)
        );
        assert_eq!(q.drain_all(), vec!["fresh"]);
    }

    #[test]
    fn broken_store_is_swallowed() {
        let (mut q, bus) = queue(10, Arc::new(BrokenStore));
        let mut rx = bus.subscribe();

        q.append("a");
        assert!(q.drain_all().is_empty());

        let kinds: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|ev| ev.kind)
            .collect();
        assert_eq!(kinds, vec![EventKind::PersistFailed, EventKind::PersistFailed]);
    }

    #[test]
    fn failed_remove_falls_back_to_empty_list() {
        let store = Arc::new(FlakyStore::default());
        store.fail_remove.store(true, Ordering::SeqCst);
        let (mut q, _bus) = queue(10, store.clone());
        q.append("a");
        q.append("b");

        assert_eq!(q.drain_all(), vec!["a", "b"]);
        assert!(q.drain_all().is_empty());
        assert_eq!(store.inner.load("pending_events_notifications").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn failed_save_keeps_previous_entries() {
        let store = Arc::new(FlakyStore::default());
        let (mut q, bus) = queue(10, store.clone());
        let mut rx = bus.subscribe();
        q.append("a");
        q.append("b");

        store.fail_save.store(true, Ordering::SeqCst);
        q.append("c");
        let ev = rx.try_recv().unwrap();
        assert_eq!(ev.kind, EventKind::PersistFailed);
        assert_eq!(
            store.inner.load("pending_events_notifications").unwrap().as_deref(),
            Some(r#"["a","b"]"#)
        );

        store.heal();
        assert_eq!(q.drain_all(), vec!["a", "b"]);
    }

    #[test]
    fn unreadable_store_is_not_overwritten_by_append() {
        let store = Arc::new(FlakyStore::default());
        let (mut q, bus) = queue(10, store.clone());
        let mut rx = bus.subscribe();
        q.append("a");

        store.fail_load.store(true, Ordering::SeqCst);
        q.append("b");
        let ev = rx.try_recv().unwrap();
        assert_eq!(ev.kind, EventKind::PersistFailed);
        assert_eq!(
            store.inner.load("pending_events_notifications").unwrap().as_deref(),
            Some(r#"["a"]"#)
        );

        store.heal();
        assert_eq!(q.drain_all(), vec!["a"]);
    }

    #[test]
    fn uncleared_drain_returns_nothing_then_retained_records_once() {
        let store = Arc::new(FlakyStore::default());
        let (mut q, _bus) = queue(10, store.clone());
        q.append("a");
        q.append("b");

        store.fail_remove.store(true, Ordering::SeqCst);
        store.fail_save.store(true, Ordering::SeqCst);
        assert!(q.drain_all().is_empty());

        store.heal();
        assert_eq!(q.drain_all(), vec!["a", "b"]);
        assert!(q.drain_all().is_empty());
    }
}
