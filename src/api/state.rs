//! Application state for the Budget Engine API.

use std::sync::Arc;

use crate::config::{ConfigLoader, EngineConfig};

/// Shared application state.
///
/// Holds the engine configuration loaded at startup; every request computes
/// against the same constants and chart of accounts.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Creates a state around an already built configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self::new(ConfigLoader::from_config(config))
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }
}
