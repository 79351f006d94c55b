//! # Channel registry - per-channel queue and sink slot.
//!
//! Registry maps channel ids to [`Channel`]s, creating them lazily on first
//! use. Every channel owns one mutex guarding both its [`ChannelQueue`] and its
//! sink slot, which makes it the single synchronization point between producer
//! threads and the consumer.
//!
//! ## Architecture
//! ```text
//! Registry
//!   └─ RwLock<HashMap<id, Arc<Channel>>>
//!         └─ Channel
//!              └─ Mutex<ChannelState>
//!                    ├─ queue: ChannelQueue        (append / drain_all)
//!                    └─ sink:  Option<Weak<dyn Sink>>
//! ```
//!
//! ## Rules
//! - Unknown ids are accepted; the map only grows.
//! - `append` persists, then reads the sink slot and enqueues the delivery
//!   while still holding the channel lock. A sink that was replaced or cleared
//!   before that read never receives the record.
//! - Sink changes never touch the queue.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};

use crate::config::Capacity;
use crate::core::dispatcher::{Delivery, Dispatcher};
use crate::core::queue::ChannelQueue;
use crate::events::{Bus, Event, EventKind};
use crate::record::EventRecord;
use crate::sinks::{Sink, SinkRef};
use crate::storage::Store;

struct ChannelState {
    queue: ChannelQueue,
    sink: Option<(Weak<dyn Sink>, &'static str)>,
}

/// One logical stream: its queue and its live sink slot.
pub(crate) struct Channel {
    id: Arc<str>,
    state: Mutex<ChannelState>,
    bus: Bus,
}

impl Channel {
    fn lock(&self) -> MutexGuard<'_, ChannelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persists the record, then hands it to the active sink (if any).
    pub(crate) fn append(&self, record: &EventRecord, dispatcher: &Dispatcher) {
        let mut st = self.lock();
        st.queue.append(record.payload());

        if let Some((sink, sink_name)) = &st.sink {
            dispatcher.dispatch(Delivery {
                record: record.clone(),
                sink: Weak::clone(sink),
                sink_name: *sink_name,
            });
        }
    }

    pub(crate) fn drain(&self) -> Vec<String> {
        self.lock().queue.drain_all()
    }

    pub(crate) fn pending(&self) -> usize {
        self.lock().queue.len()
    }

    pub(crate) fn capacity(&self) -> Capacity {
        self.lock().queue.capacity()
    }

    /// Replaces the active sink; `None` detaches.
    pub(crate) fn set_sink(&self, sink: Option<&SinkRef>) {
        let mut st = self.lock();
        let previous = st.sink.take();
        st.sink = sink.map(|s| (Arc::downgrade(s), s.name()));
        drop(st);

        if let Some((_, name)) = previous {
            self.bus.publish(
                Event::new(EventKind::SinkDetached)
                    .with_channel(Arc::clone(&self.id))
                    .with_sink(name),
            );
        }
        if let Some(s) = sink {
            self.bus.publish(
                Event::new(EventKind::SinkAttached)
                    .with_channel(Arc::clone(&self.id))
                    .with_sink(s.name()),
            );
        }
    }

    /// Detaches only if `sink` is still the active one.
    pub(crate) fn clear_sink_if(&self, sink: &SinkRef) -> bool {
        let mut st = self.lock();
        let current = match &st.sink {
            Some((weak, _)) => weak,
            None => return false,
        };
        if !Weak::ptr_eq(current, &Arc::downgrade(sink)) {
            return false;
        }
        st.sink = None;
        drop(st);

        self.bus.publish(
            Event::new(EventKind::SinkDetached)
                .with_channel(Arc::clone(&self.id))
                .with_sink(sink.name()),
        );
        true
    }

    /// True if a sink is attached and its consumer still holds it.
    pub(crate) fn has_sink(&self) -> bool {
        self.lock()
            .sink
            .as_ref()
            .is_some_and(|(weak, _)| weak.strong_count() > 0)
    }
}

/// Lazily populated map of channels sharing one store.
pub(crate) struct Registry {
    channels: RwLock<HashMap<Arc<str>, Arc<Channel>>>,
    default_capacity: Capacity,
    capacities: HashMap<String, Capacity>,
    store: Arc<dyn Store>,
    bus: Bus,
}

impl Registry {
    pub(crate) fn new(
        store: Arc<dyn Store>,
        default_capacity: Capacity,
        capacities: HashMap<String, Capacity>,
        bus: Bus,
    ) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            default_capacity,
            capacities,
            store,
            bus,
        }
    }

    /// Returns the channel for `id`, creating it on first use.
    pub(crate) fn get_or_create(&self, id: &str) -> Arc<Channel> {
        if let Some(ch) = self.get(id) {
            return ch;
        }

        let mut channels = self.channels.write().unwrap_or_else(PoisonError::into_inner);
        let ch = channels
            .entry(Arc::from(id))
            .or_insert_with_key(|key| Arc::new(self.new_channel(Arc::clone(key))));
        Arc::clone(ch)
    }

    /// Returns the channel for `id` if it has been used before.
    pub(crate) fn get(&self, id: &str) -> Option<Arc<Channel>> {
        let channels = self.channels.read().unwrap_or_else(PoisonError::into_inner);
        channels.get(id).cloned()
    }

    /// Returns sorted list of known channel ids.
    pub(crate) fn list(&self) -> Vec<String> {
        let channels = self.channels.read().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<String> = channels.keys().map(|k| k.to_string()).collect();
        ids.sort_unstable();
        ids
    }

    fn new_channel(&self, id: Arc<str>) -> Channel {
        let capacity = self
            .capacities
            .get(&*id)
            .copied()
            .unwrap_or(self.default_capacity);
        tracing::trace!(channel = %id, capacity = capacity.get(), "channel created");

        Channel {
            id: Arc::clone(&id),
            state: Mutex::new(ChannelState {
                queue: ChannelQueue::new(id, capacity, Arc::clone(&self.store), self.bus.clone()),
                sink: None,
            }),
            bus: self.bus.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::ChannelSink;
    use crate::storage::MemoryStore;

    fn registry() -> Registry {
        let mut caps = HashMap::new();
        caps.insert("small".to_string(), Capacity::new("small", 1).unwrap());
        Registry::new(
            Arc::new(MemoryStore::new()),
            Capacity::new("max_events", 200).unwrap(),
            caps,
            Bus::new(16),
        )
    }

    #[test]
    fn channels_are_created_once() {
        let reg = registry();
        let a = reg.get_or_create("a");
        let b = reg.get_or_create("a");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(reg.get("missing").is_none());

        reg.get_or_create("c");
        assert_eq!(reg.list(), vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn capacity_overrides_apply_per_channel() {
        let reg = registry();
        assert_eq!(reg.get_or_create("small").capacity().get(), 1);
        assert_eq!(reg.get_or_create("other").capacity().get(), 200);
    }

    #[test]
    fn sink_slot_replace_and_conditional_clear() {
        let reg = registry();
        let ch = reg.get_or_create("a");
        let (s1, _rx1) = ChannelSink::new("s1");
        let (s2, _rx2) = ChannelSink::new("s2");
        let s1: SinkRef = s1;
        let s2: SinkRef = s2;

        assert!(!ch.has_sink());
        ch.set_sink(Some(&s1));
        assert!(ch.has_sink());

        ch.set_sink(Some(&s2));
        assert!(!ch.clear_sink_if(&s1));
        assert!(ch.has_sink());
        assert!(ch.clear_sink_if(&s2));
        assert!(!ch.has_sink());

        ch.set_sink(None);
        assert!(!ch.has_sink());
    }

    #[test]
    fn dropped_sink_counts_as_absent() {
        let reg = registry();
        let ch = reg.get_or_create("a");
        let (s, _rx) = ChannelSink::new("s");
        let s: SinkRef = s;
        ch.set_sink(Some(&s));
        drop(s);
        assert!(!ch.has_sink());
    }
}
