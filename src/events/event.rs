//! # Diagnostic events emitted by the pipeline.
//!
//! The [`EventKind`] enum classifies what happened, in three groups:
//! - **Persistence**: evictions, failed writes, corrupt stored state, drains
//! - **Delivery**: sink failures, panics, dropped deliveries
//! - **Registration**: sink attach/detach
//!
//! Each [`Event`] carries a global sequence number (`seq`) that increases
//! monotonically, a wall-clock timestamp and optional metadata.
//!
//! ## Example
//! ```rust
//! use eventspool::events::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::RecordsEvicted)
//!     .with_channel("notifications")
//!     .with_count(1);
//!
//! assert_eq!(ev.kind, EventKind::RecordsEvicted);
//! assert_eq!(ev.channel.as_deref(), Some("notifications"));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use tracing::Level;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of pipeline diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Persistence ===
    /// Oldest records were dropped to honor the channel capacity.
    ///
    /// Sets `channel`, `count` (records dropped).
    RecordsEvicted,

    /// A durable write or remove failed; the operation was skipped.
    ///
    /// Sets `channel`, `reason`.
    PersistFailed,

    /// Stored state could not be read or parsed and was treated as empty.
    ///
    /// Sets `channel`, `reason`.
    StateCorrupt,

    /// A channel was drained.
    ///
    /// Sets `channel`, `count` (records returned).
    Drained,

    // === Delivery ===
    /// A sink returned an error for a record.
    ///
    /// Sets `channel`, `sink`, `reason`.
    DeliveryFailed,

    /// A sink panicked while handling a record.
    ///
    /// Sets `channel`, `sink`, `reason` (panic message).
    DeliveryPanicked,

    /// A live delivery was not queued (dispatcher full or stopped).
    ///
    /// Sets `channel`, `reason` (`"full"` or `"closed"`).
    DeliveryDropped,

    // === Registration ===
    /// A sink became the active listener of a channel.
    ///
    /// Sets `channel`, `sink`.
    SinkAttached,

    /// A channel lost its active listener.
    ///
    /// Sets `channel`, `sink` (when one was attached).
    SinkDetached,
}

impl EventKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(self) -> &'static str {
        match self {
            EventKind::RecordsEvicted => "records_evicted",
            EventKind::PersistFailed => "persist_failed",
            EventKind::StateCorrupt => "state_corrupt",
            EventKind::Drained => "drained",
            EventKind::DeliveryFailed => "delivery_failed",
            EventKind::DeliveryPanicked => "delivery_panicked",
            EventKind::DeliveryDropped => "delivery_dropped",
            EventKind::SinkAttached => "sink_attached",
            EventKind::SinkDetached => "sink_detached",
        }
    }

    /// Log level used when the event is published.
    pub fn level(self) -> Level {
        match self {
            EventKind::PersistFailed
            | EventKind::StateCorrupt
            | EventKind::DeliveryPanicked
            | EventKind::DeliveryDropped => Level::WARN,
            EventKind::DeliveryFailed
            | EventKind::RecordsEvicted
            | EventKind::SinkAttached
            | EventKind::SinkDetached => Level::DEBUG,
            EventKind::Drained => Level::TRACE,
        }
    }
}

/// Pipeline diagnostic with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Channel the event refers to.
    pub channel: Option<Arc<str>>,
    /// Name of the sink involved, if any.
    pub sink: Option<&'static str>,
    /// Human-readable reason (error text, panic message, drop cause).
    pub reason: Option<Arc<str>>,
    /// Number of records involved (evicted, drained).
    pub count: Option<usize>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            channel: None,
            sink: None,
            reason: None,
            count: None,
        }
    }

    /// Attaches a channel id.
    #[inline]
    pub fn with_channel(mut self, channel: impl Into<Arc<str>>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Attaches a sink name.
    #[inline]
    pub fn with_sink(mut self, sink: &'static str) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a record count.
    #[inline]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Writes the event to `tracing` at the level of its kind.
    pub(crate) fn log(&self) {
        let kind = self.kind.as_label();
        let channel = self.channel.as_deref().unwrap_or("-");
        let sink = self.sink.unwrap_or("-");
        let reason = self.reason.as_deref().unwrap_or("");
        match self.kind.level() {
            Level::WARN => tracing::warn!(
                seq = self.seq, kind, channel, sink, count = ?self.count, reason,
                "eventspool"
            ),
            Level::DEBUG => tracing::debug!(
                seq = self.seq, kind, channel, sink, count = ?self.count, reason,
                "eventspool"
            ),
            _ => tracing::trace!(
                seq = self.seq, kind, channel, sink, count = ?self.count, reason,
                "eventspool"
            ),
        }
    }
}
