//! # Function-backed sink (`SinkFn`)
//!
//! [`SinkFn`] wraps a closure `F: Fn(EventRecord) -> Fut`, producing a fresh
//! future per delivery. Shared state, if any, goes into an `Arc` captured by
//! the closure.
//!
//! ## Example
//! ```rust
//! use eventspool::{DeliveryError, EventRecord, SinkFn, SinkRef};
//!
//! let s: SinkRef = SinkFn::arc("logger", |rec: EventRecord| async move {
//!     println!("{}", rec.payload());
//!     Ok::<_, DeliveryError>(())
//! });
//!
//! assert_eq!(s.name(), "logger");
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use super::Sink;
use crate::error::DeliveryError;
use crate::record::EventRecord;

/// Closure-backed sink implementation.
#[derive(Debug)]
pub struct SinkFn<F> {
    name: &'static str,
    f: F,
}

impl<F> SinkFn<F> {
    /// Creates a new function-backed sink.
    ///
    /// Prefer [`SinkFn::arc`] when you immediately need a [`SinkRef`](super::SinkRef).
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }

    /// Creates the sink and returns it as a shared handle.
    pub fn arc(name: &'static str, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Sink for SinkFn<F>
where
    F: Fn(EventRecord) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), DeliveryError>> + Send + 'static,
{
    async fn deliver(&self, record: &EventRecord) -> Result<(), DeliveryError> {
        (self.f)(record.clone()).await
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
