//! # Event records.
//!
//! An [`EventRecord`] is one already-serialized unit of telemetry bound to a
//! channel. The pipeline never inspects the payload.
//!
//! Records are cheap to clone (`Arc<str>` inside), so the same record can be
//! persisted and handed to the dispatcher without copying the payload.
//!
//! ## Example
//! ```rust
//! use eventspool::EventRecord;
//!
//! let rec = EventRecord::new("notifications", r#"{"pkg":"mail"}"#);
//! assert_eq!(rec.channel(), "notifications");
//! assert_eq!(rec.payload(), r#"{"pkg":"mail"}"#);
//! ```

use std::fmt;
use std::sync::Arc;

/// Immutable, opaque telemetry record.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EventRecord {
    channel: Arc<str>,
    payload: Arc<str>,
}

impl EventRecord {
    /// Creates a record for `channel` carrying an already-encoded payload.
    pub fn new(channel: impl Into<Arc<str>>, payload: impl Into<Arc<str>>) -> Self {
        Self {
            channel: channel.into(),
            payload: payload.into(),
        }
    }

    /// Channel the record belongs to.
    #[inline]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Opaque payload as handed to the pipeline.
    #[inline]
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub(crate) fn channel_arc(&self) -> Arc<str> {
        Arc::clone(&self.channel)
    }
}

impl fmt::Debug for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRecord")
            .field("channel", &self.channel)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}
