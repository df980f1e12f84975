//! Shared state for the payroll engine API.

use std::sync::Arc;

use crate::config::{ConfigLoader, PayrollConfig};

/// The organisation defaults every handler falls back to.
#[derive(Debug, Clone)]
pub struct AppState {
    default_config: Arc<PayrollConfig>,
}

impl AppState {
    /// Takes ownership of the loaded defaults.
    pub fn new(loader: ConfigLoader) -> Self {
        Self::from_config(loader.config().clone())
    }

    /// Builds state around an in-memory configuration.
    pub fn from_config(config: PayrollConfig) -> Self {
        Self {
            default_config: Arc::new(config),
        }
    }

    /// Returns the server's default configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.default_config
    }

    /// Picks the configuration for one request: the inline one when supplied,
    /// otherwise the server default.
    pub fn effective_config<'a>(&'a self, inline: Option<&'a PayrollConfig>) -> &'a PayrollConfig {
        inline.unwrap_or(&self.default_config)
    }
}
