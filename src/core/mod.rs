//! Pipeline core: queues, registry, dispatcher and the facade.
//!
//! The only public API from this module is [`Pipeline`] and its
//! [`PipelineBuilder`].
//!
//! Internal modules:
//! - [`queue`]: bounded persistent FIFO for one channel;
//! - [`registry`]: channel map, per-channel lock, sink slot;
//! - [`dispatcher`]: single worker delivering to live sinks;
//! - [`pipeline`]: the facade producers and consumers call.

mod builder;
mod dispatcher;
mod pipeline;
mod queue;
mod registry;

#[cfg(test)]
mod testing;

pub use builder::PipelineBuilder;
pub use pipeline::Pipeline;
