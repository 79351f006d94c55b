//! Well-known channel identifiers shared by collectors and the consumer.
//!
//! The pipeline accepts any id; these constants only fix the spelling of the
//! vocabulary the bundled collectors use.

/// Posted/removed notification events.
pub const NOTIFICATIONS: &str = "notifications";

/// Accessibility (window/content change) events.
pub const ACCESSIBILITY: &str = "accessibility";

/// Periodic audio feature frames.
pub const AUDIO_FEATURES: &str = "audio_features";

/// All well-known channels, in declaration order.
pub const WELL_KNOWN: [&str; 3] = [NOTIFICATIONS, ACCESSIBILITY, AUDIO_FEATURES];
