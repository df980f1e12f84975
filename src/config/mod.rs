//! Configuration loading and management for the payroll engine.
//!
//! Each organisation has one [`PayrollConfig`]: break mode and rules, National
//! Insurance bands, the holiday-accrual ratio and a fallback hourly rate. The
//! configuration is always passed explicitly into calculations.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/default").unwrap();
//! println!("Break mode: {:?}", loader.config().break_calculation_mode);
//! ```

mod loader;
mod types;

pub use loader::{ConfigLoader, PAYROLL_CONFIG_FILE};
pub use types::{BreakCalculationMode, BreakRule, NationalInsuranceConfig, NiBand, PayrollConfig};
