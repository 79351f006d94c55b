//! # eventspool
//!
//! **Eventspool** is a channel-keyed, bounded, persistent event queue with
//! best-effort live delivery.
//!
//! Producers (OS callbacks, sensors, collectors) emit already-serialized
//! records onto named channels from any thread. Every record is persisted
//! first, so nothing is lost while no consumer is listening; if a consumer has
//! attached a live sink, the record is also forwarded to it asynchronously.
//! A consumer that connects later drains the backlog.
//!
//! ## Architecture
//! ```text
//!   ┌────────────┐   ┌────────────┐   ┌────────────┐
//!   │ producer 1 │   │ producer 2 │   │ producer N │      (any thread)
//!   └─────┬──────┘   └─────┬──────┘   └─────┬──────┘
//!         │ emit(channel, payload)          │
//!         ▼                ▼                ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Pipeline                                                     │
//! │  Registry: channel id ─► Channel (one mutex each)            │
//! │               ├─ ChannelQueue ─► Store (pending_events_<id>) │
//! │               └─ sink slot: Weak<dyn Sink>                   │
//! └───────┬─────────────────────────────────┬────────────────────┘
//!         │ sink attached?                  │ failures, evictions,
//!         ▼ try_send                        ▼ sink changes
//! ┌──────────────────┐               ┌───────────────────────────┐
//! │ Dispatcher       │               │ Bus (broadcast<Event>)    │
//! │ (1 tokio worker) │               │ + tracing at kind's level │
//! └────────┬─────────┘               └───────────────────────────┘
//!          ▼
//!   Sink::deliver(&EventRecord)      (consumer side)
//!
//! Consumer: attach_sink / detach_sink / drain(channel) ─► Vec<String>
//! ```
//!
//! ## Guarantees
//! - A persisted record is returned by exactly one `drain`, unless it was
//!   evicted by capacity first.
//! - Each channel keeps at most its capacity (default 200) of the most recent
//!   records; the oldest are evicted.
//! - Emission never blocks on a sink and never fails: storage and delivery
//!   problems surface as [`Event`]s on [`Pipeline::subscribe`] and in `tracing`.
//! - Live delivery is at-most-once and in emission order per channel.
//!
//! ## Features
//! | Area             | Description                                            | Key types / traits                        |
//! |------------------|--------------------------------------------------------|-------------------------------------------|
//! | **Facade**       | Emit, drain, attach/detach live listeners.             | [`Pipeline`], [`PipelineBuilder`]         |
//! | **Sinks**        | Live delivery targets.                                 | [`Sink`], [`ChannelSink`], [`SinkFn`]     |
//! | **Storage**      | Durable per-channel documents.                         | [`Store`], [`FileStore`], [`MemoryStore`] |
//! | **Diagnostics**  | Observable swallowed failures and evictions.           | [`Event`], [`EventKind`]                  |
//! | **Errors**       | Typed construction, storage and delivery errors.       | [`ConfigError`], [`StorageError`], [`DeliveryError`] |
//! | **Configuration**| Capacities of queues and internal channels.            | [`Config`]                                |
//!
//! ## Example
//! ```rust
//! use eventspool::{channels, Config, Pipeline};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = Pipeline::builder(Config::default())
//!         .with_channels(channels::WELL_KNOWN)
//!         .build()?;
//!
//!     // No consumer yet: records are kept.
//!     pipeline.emit(channels::NOTIFICATIONS, r#"{"pkg":"mail","title":"hi"}"#);
//!     pipeline.emit(channels::NOTIFICATIONS, r#"{"pkg":"chat","title":"yo"}"#);
//!
//!     // Consumer connects and catches up.
//!     let backlog = pipeline.drain(channels::NOTIFICATIONS);
//!     assert_eq!(backlog.len(), 2);
//!     assert!(pipeline.drain(channels::NOTIFICATIONS).is_empty());
//!
//!     pipeline.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod channels;
pub mod config;
pub mod error;
pub mod events;
pub mod sinks;
pub mod storage;

mod core;
mod record;

// ---- Public re-exports ----

pub use config::Config;
pub use crate::core::{Pipeline, PipelineBuilder};
pub use error::{ConfigError, DeliveryError, StorageError};
pub use events::{Event, EventKind};
pub use record::EventRecord;
pub use sinks::{ChannelSink, Sink, SinkFn, SinkRef};
pub use storage::{FileStore, MemoryStore, Store};
