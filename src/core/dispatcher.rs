//! # Dispatcher: single-worker live delivery.
//!
//! [`Dispatcher`] hands freshly persisted records to their channel's sink
//! **without** making the producer wait for the sink.
//!
//! ## Architecture
//! ```text
//! Channel::append (under channel lock)
//!     │ try_send(Delivery)
//!     ▼
//! [bounded mpsc queue] ──► worker task ──► sink.upgrade()?.deliver(&record)
//!                                 ├─ Err(e)  → DeliveryFailed
//!                                 └─ panic   → DeliveryPanicked
//! ```
//!
//! ## Rules
//! - **One worker**: sink callbacks are serialized for the whole pipeline.
//! - **Per-channel FIFO**: deliveries are enqueued under the channel lock, so
//!   a channel's records reach its sink in emission order.
//! - **Non-blocking**: `dispatch()` uses `try_send`; a full or closed queue
//!   drops the delivery (the record is already persisted) and publishes
//!   `DeliveryDropped`.
//! - **Weak sinks**: a sink whose consumer dropped every `Arc` is skipped.
//! - **Panic isolation**: `catch_unwind` keeps the worker alive.

use std::sync::{Mutex, PoisonError, Weak};

use futures::FutureExt;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event, EventKind};
use crate::record::EventRecord;
use crate::sinks::Sink;

/// One pending live delivery.
pub(crate) struct Delivery {
    pub(crate) record: EventRecord,
    pub(crate) sink: Weak<dyn Sink>,
    pub(crate) sink_name: &'static str,
}

/// Bounded delivery queue drained by a single worker task.
pub(crate) struct Dispatcher {
    tx: mpsc::Sender<Delivery>,
    token: CancellationToken,
    worker: Mutex<Option<JoinHandle<()>>>,
    bus: Bus,
}

impl Dispatcher {
    /// Creates the queue and spawns the worker on `handle`.
    ///
    /// `capacity` is clamped to a minimum of 1.
    pub(crate) fn spawn(handle: &Handle, capacity: usize, bus: Bus) -> Self {
        let (tx, rx) = mpsc::channel::<Delivery>(capacity.max(1));
        let token = CancellationToken::new();
        let worker = handle.spawn(run_worker(rx, token.clone(), bus.clone()));

        Self {
            tx,
            token,
            worker: Mutex::new(Some(worker)),
            bus,
        }
    }

    /// Queues a delivery without waiting.
    pub(crate) fn dispatch(&self, delivery: Delivery) {
        let (reason, d) = match self.tx.try_send(delivery) {
            Ok(()) => return,
            Err(mpsc::error::TrySendError::Full(d)) => ("full", d),
            Err(mpsc::error::TrySendError::Closed(d)) => ("closed", d),
        };
        self.bus.publish(
            Event::new(EventKind::DeliveryDropped)
                .with_channel(d.record.channel_arc())
                .with_sink(d.sink_name)
                .with_reason(reason),
        );
    }

    /// Stops accepting deliveries, flushes the queued ones and joins the worker.
    ///
    /// Idempotent; later calls return immediately.
    pub(crate) async fn shutdown(&self) {
        self.token.cancel();
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(h) = worker {
            if let Err(e) = h.await {
                tracing::warn!(error = %e, "dispatcher worker ended abnormally");
            }
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn run_worker(mut rx: mpsc::Receiver<Delivery>, token: CancellationToken, bus: Bus) {
    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            msg = rx.recv() => match msg {
                Some(d) => deliver(d, &bus).await,
                None => return,
            },
        }
    }

    rx.close();
    while let Some(d) = rx.recv().await {
        deliver(d, &bus).await;
    }
    tracing::trace!("dispatcher worker stopped");
}

async fn deliver(d: Delivery, bus: &Bus) {
    let Some(sink) = d.sink.upgrade() else {
        tracing::trace!(channel = d.record.channel(), sink = d.sink_name, "sink gone, skipping");
        return;
    };

    let fut = sink.deliver(&d.record);
    match std::panic::AssertUnwindSafe(fut).catch_unwind().await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => bus.publish(
            Event::new(EventKind::DeliveryFailed)
                .with_channel(d.record.channel_arc())
                .with_sink(d.sink_name)
                .with_reason(e.to_string()),
        ),
        Err(panic_err) => {
            let info = if let Some(msg) = panic_err.downcast_ref::<&'static str>() {
                (*msg).to_string()
            } else if let Some(msg) = panic_err.downcast_ref::<String>() {
                msg.clone()
            } else {
                "unknown panic".to_string()
            };
            bus.publish(
                Event::new(EventKind::DeliveryPanicked)
                    .with_channel(d.record.channel_arc())
                    .with_sink(d.sink_name)
                    .with_reason(info),
            );
        }
    }
}
