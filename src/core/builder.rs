use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use tokio::runtime::Handle;

use super::{dispatcher::Dispatcher, pipeline::Pipeline, registry::Registry};
use crate::{
    config::{Capacity, Config},
    error::ConfigError,
    events::Bus,
    storage::{FileStore, MemoryStore, Store},
};

/// Builder for constructing a [`Pipeline`] with optional storage and channel settings.
pub struct PipelineBuilder {
    cfg: Config,
    store: Option<Arc<dyn Store>>,
    storage_dir: Option<PathBuf>,
    channels: Vec<String>,
    capacities: Vec<(String, i64)>,
}

impl PipelineBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            store: None,
            storage_dir: None,
            channels: Vec::new(),
            capacities: Vec::new(),
        }
    }

    /// Persists channel queues through a caller-supplied store.
    ///
    /// Takes precedence over [`with_storage_dir`](Self::with_storage_dir).
    pub fn with_store(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    /// Persists channel queues as JSON files under `dir` (created if missing).
    ///
    /// Without a store or a directory, queues live in memory only.
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = Some(dir.into());
        self
    }

    /// Declares the channel vocabulary; each id is validated and pre-created.
    ///
    /// Ids outside this list are still accepted at runtime.
    pub fn with_channels<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.channels.extend(channels.into_iter().map(Into::into));
        self
    }

    /// Overrides the capacity of one channel.
    ///
    /// Negative values and repeated overrides of the same channel are
    /// rejected by [`build`](Self::build).
    pub fn with_channel_capacity(mut self, channel: impl Into<String>, max_events: i64) -> Self {
        self.capacities.push((channel.into(), max_events));
        self
    }

    /// Builds the pipeline.
    ///
    /// This consumes the builder and initializes all components:
    /// - diagnostics bus
    /// - storage (file, custom or in-memory)
    /// - registry, with declared channels pre-created
    /// - dispatcher worker (spawned on the current Tokio runtime)
    ///
    /// # Errors
    /// - [`ConfigError::NegativeCapacity`] for a negative default or per-channel capacity
    /// - [`ConfigError::InvalidChannel`] / [`ConfigError::DuplicateChannel`] for a bad vocabulary
    ///   or a channel whose capacity is overridden twice
    /// - [`ConfigError::NoRuntime`] when called outside a Tokio runtime
    /// - [`ConfigError::StorageInit`] when the storage directory cannot be created
    pub fn build(self) -> Result<Arc<Pipeline>, ConfigError> {
        self.cfg.validate()?;
        let default_capacity = Capacity::new("max_events", self.cfg.max_events)?;

        let mut capacities = HashMap::with_capacity(self.capacities.len());
        for (channel, value) in self.capacities {
            validate_channel_id(&channel)?;
            let cap = Capacity::new(&channel, value)?;
            if capacities.contains_key(&channel) {
                return Err(ConfigError::DuplicateChannel { channel });
            }
            capacities.insert(channel, cap);
        }

        let mut seen = HashSet::with_capacity(self.channels.len());
        for channel in &self.channels {
            validate_channel_id(channel)?;
            if !seen.insert(channel.as_str()) {
                return Err(ConfigError::DuplicateChannel {
                    channel: channel.clone(),
                });
            }
        }

        let handle = Handle::try_current().map_err(|_| ConfigError::NoRuntime)?;

        let store: Arc<dyn Store> = match (self.store, self.storage_dir) {
            (Some(store), _) => store,
            (None, Some(dir)) => match FileStore::open(&dir) {
                Ok(store) => Arc::new(store),
                Err(source) => return Err(ConfigError::StorageInit { path: dir, source }),
            },
            (None, None) => Arc::new(MemoryStore::new()),
        };
        tracing::debug!(
            store = store.name(),
            max_events = default_capacity.get(),
            "building pipeline"
        );

        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let registry = Registry::new(store, default_capacity, capacities, bus.clone());
        for channel in &self.channels {
            registry.get_or_create(channel);
        }
        let dispatcher = Dispatcher::spawn(&handle, self.cfg.dispatch_capacity_clamped(), bus.clone());

        Ok(Arc::new(Pipeline::new_internal(
            self.cfg, bus, registry, dispatcher,
        )))
    }
}

fn validate_channel_id(channel: &str) -> Result<(), ConfigError> {
    let reason = if channel.is_empty() {
        "empty"
    } else if channel.trim() != channel {
        "leading or trailing whitespace"
    } else if channel.chars().any(char::is_control) {
        "control character"
    } else {
        return Ok(());
    };
    Err(ConfigError::InvalidChannel {
        channel: channel.to_string(),
        reason,
    })
}
