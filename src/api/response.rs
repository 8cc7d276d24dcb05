//! Error payloads for the payroll API.
//!
//! Every [`EngineError`] maps to a stable machine-readable code so callers
//! can branch on `code` without parsing messages.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl From<EngineError> for ApiError {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::InvalidSalaryInput { field, message } => ApiError::with_details(
                "VALIDATION_ERROR",
                format!("Invalid salary input '{}': {}", field, message),
                field,
            ),
            EngineError::InvalidAttendance { field, message } => ApiError::with_details(
                "INVALID_ATTENDANCE",
                format!("Invalid attendance '{}': {}", field, message),
                field,
            ),
            EngineError::ConfigNotFound { path } => ApiError::with_details(
                "CONFIG_ERROR",
                "Configuration error",
                format!("Configuration file not found: {}", path),
            ),
            EngineError::ConfigParseError { path, message } => ApiError::with_details(
                "CONFIG_ERROR",
                "Configuration parse error",
                format!("Failed to parse {}: {}", path, message),
            ),
            EngineError::InvalidConfig { message } => {
                ApiError::with_details("CONFIG_ERROR", "Invalid configuration", message)
            }
            EngineError::CalculationError { message } => {
                ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message)
            }
        }
    }
}
