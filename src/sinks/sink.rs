//! # Sink trait.
//!
//! Provides [`Sink`], the extension point for live listeners.
//!
//! ## Rules
//! - `deliver` runs on the single dispatcher worker, never in the producer's context.
//! - Deliveries are serialized across all channels; a slow sink delays every channel.
//! - Errors and panics are caught, published as diagnostics and otherwise ignored.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use eventspool::{DeliveryError, EventRecord, Sink};
//!
//! struct Printer;
//!
//! #[async_trait]
//! impl Sink for Printer {
//!     async fn deliver(&self, record: &EventRecord) -> Result<(), DeliveryError> {
//!         println!("{}: {}", record.channel(), record.payload());
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &'static str { "printer" }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DeliveryError;
use crate::record::EventRecord;

/// Shared handle to a sink, as held by the consumer.
pub type SinkRef = Arc<dyn Sink>;

/// Live delivery target for one channel.
///
/// ### Implementation requirements
/// - Avoid blocking the executor; the worker is shared by all channels.
/// - Return [`DeliveryError::Closed`] once the listener is gone.
#[async_trait]
pub trait Sink: Send + Sync + 'static {
    /// Hands one freshly emitted record to the listener.
    ///
    /// Called from the dispatcher worker. Records of one channel arrive in
    /// emission order while the same sink stays attached.
    async fn deliver(&self, record: &EventRecord) -> Result<(), DeliveryError>;

    /// Returns the sink name used in logs and diagnostics.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
