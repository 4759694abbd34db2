//! Builder for constructing query managers.

use crate::builder::config::{ManagerConfig, OverlapPolicy};
use crate::builder::error::BuildError;
use crate::coordinator::Coordinator;
use crate::manager::QueryManager;
use crate::options::{self, HydrateOptions, QueryOptions};
use crate::transport::Transport;
use serde_json::Value;
use tokio::runtime::Handle;
use tracing::{debug, warn};

/// Builder for constructing query managers with a fluent API.
///
/// Unless the initial options are paused, [`build`](Self::build) issues one
/// request right away on the current Tokio runtime.
pub struct QueryManagerBuilder<T: Transport> {
    transport: Option<T>,
    options: QueryOptions,
    config: ManagerConfig,
}

impl<T: Transport> QueryManagerBuilder<T> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            transport: None,
            options: QueryOptions::new(),
            config: ManagerConfig::default(),
        }
    }

    /// Set the transport (required).
    pub fn transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the initial options.
    pub fn options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    /// Add one initial primary query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options = self.options.param(key, value);
        self
    }

    /// Request a hydration fetch after every primary fetch.
    pub fn hydrate(mut self, hydrate: HydrateOptions) -> Self {
        self.options = self.options.hydrate(hydrate);
        self
    }

    /// Suppress the initial automatic request.
    pub fn pause(mut self, pause: bool) -> Self {
        self.options = self.options.pause(pause);
        self
    }

    pub fn overlap(mut self, policy: OverlapPolicy) -> Self {
        self.config.overlap = policy;
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.config.history_limit = limit;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the manager.
    ///
    /// When the initial request is due, it is admitted before this returns:
    /// the manager is already Loading and only the transport call runs in
    /// the background.
    ///
    /// Returns an error if the transport is missing, the initial options are
    /// invalid, or an initial request is due and no Tokio runtime is running.
    pub fn build(self) -> Result<QueryManager<T>, BuildError> {
        let transport = self.transport.ok_or(BuildError::MissingTransport)?;
        options::check(&self.options)?;

        let runtime = if self.options.is_paused() {
            None
        } else {
            Some(Handle::try_current().map_err(|_| BuildError::NoRuntime)?)
        };

        let coordinator = Coordinator::new(transport, self.options, self.config);
        if let Some(runtime) = runtime {
            debug!(manager_id = %coordinator.id(), "issuing initial request");
            if let Err(err) = coordinator.spawn_initial(&runtime) {
                warn!(manager_id = %coordinator.id(), error = %err, "initial request did not start");
            }
        }

        Ok(QueryManager::from_coordinator(coordinator))
    }
}

impl<T: Transport> Default for QueryManagerBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
