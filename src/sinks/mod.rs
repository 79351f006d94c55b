//! # Live delivery targets.
//!
//! This module provides the [`Sink`] trait and two ready-made implementations
//! for consumers that want records pushed to them as they are emitted.
//!
//! ## Architecture
//! ```text
//! Pipeline::emit ──► persist ──► Dispatcher queue ──► worker ──► Sink::deliver(&EventRecord)
//!                                                                   │
//!                                                         ┌─────────┴─────────┐
//!                                                         ▼                   ▼
//!                                                    ChannelSink            SinkFn
//!                                               (mpsc to a consumer)   (closure-backed)
//! ```
//!
//! ## Ownership
//! The pipeline keeps only a `Weak` reference to an attached sink. The
//! consumer owns the `Arc`; dropping it is equivalent to a disconnect.

mod channel;
mod sink;
mod sink_fn;

pub use channel::ChannelSink;
pub use sink::{Sink, SinkRef};
pub use sink_fn::SinkFn;
