//! # Pipeline: the facade producers and consumers use.
//!
//! The [`Pipeline`] owns the channel registry, the storage behind it, the
//! dispatcher worker and the diagnostics bus.
//!
//! ## Key responsibilities
//! - persist every emitted record synchronously (bounded per channel)
//! - forward freshly emitted records to the channel's live sink, asynchronously
//! - hand the backlog to the consumer on `drain`
//! - keep storage and delivery failures away from producers
//!
//! ## High-level architecture
//! ```text
//! Producers (any thread):
//!   emit(channel, payload)
//!       └─► Registry.get_or_create(channel) ─► Channel lock
//!              ├─► ChannelQueue.append(payload)   (read → push → evict → save)
//!              └─► sink attached? ─► Dispatcher.dispatch(Delivery)   (try_send)
//!
//! Consumer:
//!   attach_sink / detach_sink ─► Channel lock ─► swap Weak<dyn Sink>
//!   drain(channel)            ─► Channel lock ─► ChannelQueue.drain_all()
//!
//! Dispatcher worker (one tokio task):
//!   queue ─► sink.upgrade() ─► sink.deliver(&record)   (errors/panics → Bus)
//! ```
//!
//! ## State per channel
//! ```text
//! Empty ⇄ Has-records            (append / drain)
//! Sink-absent ⇄ Sink-present     (attach / detach), independent of the above
//! ```
//!
//! ## Example
//! ```rust
//! use eventspool::{ChannelSink, Config, Pipeline, SinkRef};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = Pipeline::builder(Config::default())
//!         .with_channels(eventspool::channels::WELL_KNOWN)
//!         .build()?;
//!
//!     let (sink, mut rx) = ChannelSink::new("ui");
//!     let sink: SinkRef = sink;
//!     pipeline.attach_sink("audio_features", &sink);
//!
//!     pipeline.emit("audio_features", r#"{"rms":0.2}"#);
//!     let live = rx.recv().await.expect("delivered");
//!     assert_eq!(live.payload(), r#"{"rms":0.2}"#);
//!
//!     assert_eq!(pipeline.drain("audio_features"), vec![r#"{"rms":0.2}"#]);
//!     pipeline.shutdown().await;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use tokio::sync::broadcast;

use super::{builder::PipelineBuilder, dispatcher::Dispatcher, registry::Registry};
use crate::config::Config;
use crate::events::{Bus, Event};
use crate::record::EventRecord;
use crate::sinks::SinkRef;

/// Channel-keyed bounded persistent queue with best-effort live delivery.
///
/// Shared by `Arc` between producers and the consumer-facing adapter. Every
/// method except [`shutdown`](Self::shutdown) is synchronous and may be called
/// from any thread.
pub struct Pipeline {
    cfg: Config,
    bus: Bus,
    registry: Registry,
    dispatcher: Dispatcher,
}

impl Pipeline {
    /// Returns a builder for a pipeline with the given configuration.
    pub fn builder(cfg: Config) -> PipelineBuilder {
        PipelineBuilder::new(cfg)
    }

    pub(super) fn new_internal(cfg: Config, bus: Bus, registry: Registry, dispatcher: Dispatcher) -> Self {
        Self {
            cfg,
            bus,
            registry,
            dispatcher,
        }
    }

    /// Persists `payload` on `channel`, then forwards it to the live sink (if any).
    ///
    /// Never blocks on delivery and never fails: storage problems are published
    /// as diagnostics. Unknown channel ids are created on the fly.
    pub fn emit(&self, channel: &str, payload: impl Into<Arc<str>>) {
        self.emit_record(EventRecord::new(channel, payload));
    }

    /// Same as [`emit`](Self::emit) for an already built record.
    pub fn emit_record(&self, record: EventRecord) {
        let channel = self.registry.get_or_create(record.channel());
        channel.append(&record, &self.dispatcher);
    }

    /// Makes `sink` the live listener of `channel`, replacing any previous one.
    ///
    /// Only a weak reference is kept; dropping the last `Arc` detaches implicitly.
    /// Records persisted before the call are not replayed; use [`drain`](Self::drain).
    pub fn attach_sink(&self, channel: &str, sink: &SinkRef) {
        self.registry.get_or_create(channel).set_sink(Some(sink));
    }

    /// Removes the live listener of `channel`. Idempotent.
    pub fn detach_sink(&self, channel: &str) {
        if let Some(ch) = self.registry.get(channel) {
            ch.set_sink(None);
        }
    }

    /// Removes `sink` from `channel` only if it is still the active listener.
    ///
    /// Returns `true` if it was detached. Lets a disconnecting consumer clean up
    /// without clobbering a listener that replaced it in the meantime.
    pub fn detach_sink_if(&self, channel: &str, sink: &SinkRef) -> bool {
        self.registry
            .get(channel)
            .is_some_and(|ch| ch.clear_sink_if(sink))
    }

    /// True if `channel` has a live listener whose consumer is still alive.
    pub fn has_sink(&self, channel: &str) -> bool {
        self.registry.get(channel).is_some_and(|ch| ch.has_sink())
    }

    /// Returns and clears every record persisted on `channel`, oldest first.
    ///
    /// Does not touch the sink registration. A channel whose stored state is
    /// unreadable drains as empty.
    pub fn drain(&self, channel: &str) -> Vec<String> {
        self.registry.get_or_create(channel).drain()
    }

    /// Number of records currently persisted on `channel`.
    pub fn pending(&self, channel: &str) -> usize {
        self.registry.get_or_create(channel).pending()
    }

    /// Capacity in effect for `channel`.
    pub fn capacity(&self, channel: &str) -> usize {
        self.registry.get_or_create(channel).capacity().get()
    }

    /// Sorted ids of every channel this instance has seen.
    pub fn channels(&self) -> Vec<String> {
        self.registry.list()
    }

    /// Subscribes to pipeline diagnostics (evictions, swallowed failures, sink changes).
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Configuration the pipeline was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Stops live delivery: queued deliveries are flushed, later ones dropped.
    ///
    /// Persistence keeps working after shutdown.
    pub async fn shutdown(&self) {
        self.dispatcher.shutdown().await;
    }
}
