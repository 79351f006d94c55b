//! Error types used by the pipeline, its storage layer and its sinks.
//!
//! This module defines three enums, one per failure domain:
//!
//! - [`ConfigError`]: invalid configuration, fatal at build time.
//! - [`StorageError`]: durable read/write failures; swallowed by the queue.
//! - [`DeliveryError`]: live sink failures; swallowed by the dispatcher.
//!
//! Only [`ConfigError`] is ever returned to callers of the pipeline facade.
//! The other two surface through [`Event`](crate::events::Event)s and logs.
//! All types provide `as_label` for logs/metrics.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// # Errors produced while building a pipeline.
///
/// These indicate programming errors (bad capacities, malformed channel
/// vocabulary) rather than runtime conditions.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A capacity was configured below zero.
    #[error("capacity for {scope} must not be negative (got {value})")]
    NegativeCapacity {
        /// What the capacity applies to (`"max_events"` or a channel id).
        scope: String,
        /// The rejected value.
        value: i64,
    },

    /// A declared channel id is not usable.
    #[error("invalid channel id {channel:?}: {reason}")]
    InvalidChannel {
        /// The rejected id.
        channel: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The same channel id was declared more than once.
    #[error("channel {channel:?} declared more than once")]
    DuplicateChannel {
        /// The duplicated id.
        channel: String,
    },

    /// The pipeline was built outside a Tokio runtime.
    #[error("pipeline must be built inside a Tokio runtime")]
    NoRuntime,

    /// The storage directory could not be prepared.
    #[error("cannot initialize storage at {path:?}: {source}")]
    StorageInit {
        /// Directory that failed to initialize.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventspool::ConfigError;
    ///
    /// let err = ConfigError::NegativeCapacity { scope: "max_events".into(), value: -1 };
    /// assert_eq!(err.as_label(), "config_negative_capacity");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::NegativeCapacity { .. } => "config_negative_capacity",
            ConfigError::InvalidChannel { .. } => "config_invalid_channel",
            ConfigError::DuplicateChannel { .. } => "config_duplicate_channel",
            ConfigError::NoRuntime => "config_no_runtime",
            ConfigError::StorageInit { .. } => "config_storage_init",
        }
    }
}

/// # Errors produced by a [`Store`](crate::storage::Store).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading, writing or removing the entry failed.
    #[error("storage i/o failed for key {key:?}: {source}")]
    Io {
        /// Storage key involved.
        key: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The stored document could not be parsed.
    #[error("stored state for key {key:?} is corrupt: {source}")]
    Corrupt {
        /// Storage key involved.
        key: String,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory list could not be encoded.
    #[error("cannot encode state for key {key:?}: {source}")]
    Encode {
        /// Storage key involved.
        key: String,
        /// Encoder error.
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            StorageError::Io { .. } => "storage_io",
            StorageError::Corrupt { .. } => "storage_corrupt",
            StorageError::Encode { .. } => "storage_encode",
        }
    }

    /// Storage key the error refers to.
    pub fn key(&self) -> &str {
        match self {
            StorageError::Io { key, .. }
            | StorageError::Corrupt { key, .. }
            | StorageError::Encode { key, .. } => key,
        }
    }
}

/// # Errors produced by a [`Sink`](crate::sinks::Sink) during delivery.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// The listener behind the sink is gone.
    #[error("sink closed")]
    Closed,

    /// The listener rejected or failed to process the record.
    #[error("delivery failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },
}

impl DeliveryError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventspool::DeliveryError;
    ///
    /// assert_eq!(DeliveryError::Closed.as_label(), "delivery_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DeliveryError::Closed => "delivery_closed",
            DeliveryError::Fail { .. } => "delivery_failed",
        }
    }
}
