//! Error types for control operations.

use thiserror::Error;

/// Result type for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur when configuring control blocks.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control constructor.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Non-finite numeric input.
    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}

impl From<hp_core::CoreError> for ControlError {
    fn from(e: hp_core::CoreError) -> Self {
        match e {
            hp_core::CoreError::NonFinite { what, value } => ControlError::NonFinite { what, value },
        }
    }
}
