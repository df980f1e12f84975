//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading an organisation's
//! payroll configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::PayrollConfig;

/// The file read from a configuration directory.
pub const PAYROLL_CONFIG_FILE: &str = "payroll.yaml";

/// Loads and provides access to payroll configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// └── payroll.yaml   # Break rules, NI bands, holiday ratio, fallback rate
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Fallback rate: {}", loader.config().fallback_hourly_rate);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns `ConfigNotFound` when `payroll.yaml` is missing and
    /// `ConfigParseError` when it is not a valid [`PayrollConfig`].
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let config_path = path.as_ref().join(PAYROLL_CONFIG_FILE);
        let path_str = config_path.display().to_string();

        let content = fs::read_to_string(&config_path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let config = Self::parse(&content).map_err(|message| EngineError::ConfigParseError {
            path: path_str,
            message,
        })?;

        Ok(Self { config })
    }

    fn parse(content: &str) -> Result<PayrollConfig, String> {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Returns the underlying payroll configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }
}
