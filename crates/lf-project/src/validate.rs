//! Scenario validation.
//!
//! Simulation parameters are checked by the simulators themselves so a file
//! that validates here is guaranteed to run.

use crate::schema::{LATEST_VERSION, Scenario, ScenarioKind};
use lf_expr::{ExprError, Target, default_grid};
use lf_sim::SimError;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Invalid value: {field} ({reason})")]
    InvalidValue { field: String, reason: String },

    #[error("Invalid simulation parameters: {0}")]
    Sim(#[from] SimError),

    #[error("Invalid target function: {0}")]
    Target(#[from] ExprError),
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version == 0 || scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    if scenario.name.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "name".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    match &scenario.kind {
        ScenarioKind::Tank(config) => config.validate()?,
        ScenarioKind::Pid(config) => config.validate()?,
        ScenarioKind::Guess { target, .. } => {
            // A target undefined on the grid would fail every guess.
            let target = Target::parse(target)?;
            target.expr.try_eval_grid(&default_grid())?;
        }
    }

    Ok(())
}
