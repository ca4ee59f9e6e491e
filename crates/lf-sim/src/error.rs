//! Simulation errors.

use thiserror::Error;

/// Errors encountered while setting up or running a simulation.
///
/// Every variant is raised before the first step; a run either produces a
/// complete trajectory or none at all.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid parameter: {what}")]
    InvalidParameter { what: &'static str },

    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<lf_core::LfError> for SimError {
    fn from(e: lf_core::LfError) -> Self {
        match e {
            lf_core::LfError::NonFinite { what, value } => SimError::NonFinite { what, value },
            lf_core::LfError::InvalidArg { what } => SimError::InvalidParameter { what },
        }
    }
}

impl From<lf_controls::ControlError> for SimError {
    fn from(e: lf_controls::ControlError) -> Self {
        match e {
            lf_controls::ControlError::NonFinite { what, value } => {
                SimError::NonFinite { what, value }
            }
            lf_controls::ControlError::InvalidArg { what } => SimError::InvalidParameter { what },
        }
    }
}
