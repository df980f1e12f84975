//! Error types for the payroll engine.
//!
//! Only conditions that reject a request are errors. Configuration gaps inside a
//! calculation (missing rates, malformed break rules) degrade to safe defaults and
//! are reported as warnings on the result instead.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::InvalidPeriod {
///     input: "2026-13".to_string(),
///     message: "month must be between 01 and 12".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Invalid period '2026-13': month must be between 01 and 12"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A period parameter (month or week) was missing or unparsable.
    #[error("Invalid period '{input}': {message}")]
    InvalidPeriod {
        /// The raw value supplied by the caller.
        input: String,
        /// What was wrong with it.
        message: String,
    },

    /// The caller has no role that may view payroll figures.
    #[error("Access denied for role '{role}'")]
    AccessDenied {
        /// The role the caller presented (empty when none was given).
        role: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
