//! Shared state for the payroll API.

use std::sync::Arc;

use crate::config::{ConfigLoader, PayrollConfig};

/// Shared calculation state.
///
/// Holds the loaded configuration behind an `Arc` so it can be cloned
/// cheaply into batch workers.
#[derive(Debug, Clone)]
pub struct PayrollState {
    config: Arc<PayrollConfig>,
}

impl PayrollState {
    /// Creates state from a configuration loader.
    pub fn new(loader: ConfigLoader) -> Self {
        Self::from_config(loader.into_config())
    }

    /// Creates state from an already-built configuration.
    pub fn from_config(config: PayrollConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }
}
