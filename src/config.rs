//! # Pipeline configuration.
//!
//! Provides [`Config`], the centralized settings for a [`Pipeline`](crate::Pipeline).
//!
//! ## Sentinel values
//! - `max_events = 0` → retention disabled (every append is evicted at once)
//! - `max_events < 0` → rejected by [`Config::validate`]
//! - `dispatch_capacity = 0`, `bus_capacity = 0` → clamped to 1

use crate::error::ConfigError;

/// Default number of records retained per channel.
pub const DEFAULT_MAX_EVENTS: i64 = 200;

/// Global configuration for a pipeline instance.
///
/// ## Field semantics
/// - `max_events`: default per-channel retention (most recent N survive)
/// - `dispatch_capacity`: bound of the live-delivery queue shared by all channels
/// - `bus_capacity`: ring size of the diagnostics bus
///
/// All fields are public; [`Config::validate`] runs at build time.
#[derive(Clone, Debug)]
pub struct Config {
    /// Default capacity of every channel queue.
    ///
    /// Signed so that values read from external sources can be checked
    /// instead of silently wrapping. Negative values are invalid.
    pub max_events: i64,

    /// Capacity of the dispatcher queue.
    ///
    /// When the queue is full, the live delivery is dropped (the record stays
    /// persisted) and `DeliveryDropped` is published.
    pub dispatch_capacity: usize,

    /// Capacity of the diagnostics broadcast bus.
    ///
    /// Slow receivers observe `Lagged` and skip older diagnostics.
    pub bus_capacity: usize,
}

impl Config {
    /// Checks the configuration for programming errors.
    ///
    /// # Errors
    /// Returns [`ConfigError::NegativeCapacity`] when `max_events < 0`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Capacity::new("max_events", self.max_events).map(|_| ())
    }

    /// Returns the dispatcher capacity clamped to a minimum of 1.
    #[inline]
    pub fn dispatch_capacity_clamped(&self) -> usize {
        self.dispatch_capacity.max(1)
    }

    /// Returns the bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `max_events = 200`
    /// - `dispatch_capacity = 1024`
    /// - `bus_capacity = 256`
    fn default() -> Self {
        Self {
            max_events: DEFAULT_MAX_EVENTS,
            dispatch_capacity: 1024,
            bus_capacity: 256,
        }
    }
}

/// Validated, non-negative channel capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capacity(usize);

impl Capacity {
    /// Validates a raw capacity value.
    ///
    /// `scope` names what the capacity applies to and ends up in the error.
    ///
    /// # Errors
    /// Returns [`ConfigError::NegativeCapacity`] for negative values.
    ///
    /// # Example
    /// ```
    /// use eventspool::config::Capacity;
    ///
    /// assert_eq!(Capacity::new("max_events", 3).unwrap().get(), 3);
    /// assert!(Capacity::new("max_events", -1).is_err());
    /// ```
    pub fn new(scope: &str, value: i64) -> Result<Self, ConfigError> {
        usize::try_from(value)
            .map(Self)
            .map_err(|_| ConfigError::NegativeCapacity {
                scope: scope.to_string(),
                value,
            })
    }

    /// Returns the capacity as a count of records.
    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}
