//! Error types for control law construction.

use thiserror::Error;

pub type ControlResult<T> = Result<T, ControlError>;

/// Rejected controller parameters.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A gain or set value is NaN or infinite.
    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}

impl From<lf_core::LfError> for ControlError {
    fn from(e: lf_core::LfError) -> Self {
        match e {
            lf_core::LfError::NonFinite { what, value } => ControlError::NonFinite { what, value },
            lf_core::LfError::InvalidArg { what } => ControlError::InvalidArg { what },
        }
    }
}
