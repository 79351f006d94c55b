//! Pipeline diagnostics: types and broadcast bus.
//!
//! Failures inside the pipeline are never returned to producers. Instead they
//! are logged through `tracing` and published on the [`Bus`] as [`Event`]s, so
//! embedding code (and tests) can observe what was swallowed.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] diagnostic classification and metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: channel queues (eviction, persistence), the registry
//!   (sink changes), the dispatcher (delivery outcome).
//! - **Consumers**: whoever calls [`Pipeline::subscribe`](crate::Pipeline::subscribe).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
