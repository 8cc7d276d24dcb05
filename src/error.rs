//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can abort a payroll calculation or prevent
//! the engine from loading its configuration.
//!
//! Degenerate-but-recoverable inputs (bad attendance, negative amounts) are
//! not errors: they are reported as [`AuditWarning`](crate::models::AuditWarning)s
//! alongside the result.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::InvalidSalaryInput {
///     field: "basic_salary".to_string(),
///     message: "must be greater than zero".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Invalid salary input 'basic_salary': must be greater than zero"
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

    /// Configuration parsed but its values are inconsistent.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// A description of the inconsistency.
        message: String,
    },

    /// A salary input was missing, non-numeric, or out of range.
    #[error("Invalid salary input '{field}': {message}")]
    InvalidSalaryInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// Attendance data could not be constructed.
    #[error("Invalid attendance '{field}': {message}")]
    InvalidAttendance {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidSalaryInput`].
    pub fn invalid_salary(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSalaryInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
