//! # ChannelSink: forward records into an mpsc receiver
//!
//! Bridges the pipeline to an async consumer: every delivered record is sent
//! into an unbounded [`tokio::sync::mpsc`] channel. Dropping the receiver makes
//! further deliveries fail with [`DeliveryError::Closed`].

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::Sink;
use crate::error::DeliveryError;
use crate::record::EventRecord;

/// Sink that forwards into an unbounded mpsc channel.
#[derive(Debug)]
pub struct ChannelSink {
    name: &'static str,
    tx: mpsc::UnboundedSender<EventRecord>,
}

impl ChannelSink {
    /// Creates the sink and the receiving half the consumer reads from.
    #[must_use]
    pub fn new(name: &'static str) -> (Arc<Self>, mpsc::UnboundedReceiver<EventRecord>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { name, tx }), rx)
    }

    /// True once the receiving half has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[async_trait]
impl Sink for ChannelSink {
    async fn deliver(&self, record: &EventRecord) -> Result<(), DeliveryError> {
        self.tx
            .send(record.clone())
            .map_err(|_| DeliveryError::Closed)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn forwards_until_receiver_dropped() {
        let (sink, mut rx) = ChannelSink::new("test");
        let rec = EventRecord::new("a", "x");

        sink.deliver(&rec).await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), rec);

        drop(rx);
        assert!(sink.is_closed());
        let err = sink.deliver(&rec).await.unwrap_err();
        assert!(matches!(err, DeliveryError::Closed));
    }
}
