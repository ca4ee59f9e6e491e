//! Executing a validated scenario.

use crate::ProjectResult;
use crate::schema::{Scenario, ScenarioKind};
use crate::validate::{ValidationError, validate_scenario};
use lf_expr::{ExprError, GuessOutcome, Target, default_grid, evaluate_guess};
use lf_sim::{PidRun, TankRun, Trajectory, simulate_pid, simulate_tank};
use tracing::info;

/// One graded guess. Bad input is recorded rather than aborting the run.
#[derive(Debug, Clone)]
pub struct GuessReport {
    pub input: String,
    pub result: Result<GuessOutcome, ExprError>,
}

#[derive(Debug, Clone)]
pub enum ScenarioOutcome {
    Tank(TankRun),
    Pid(PidRun),
    Guess {
        target: String,
        reports: Vec<GuessReport>,
    },
}

impl ScenarioOutcome {
    /// Recorded trajectory, if the scenario was a simulation.
    pub fn trajectory(&self) -> Option<&Trajectory> {
        match self {
            ScenarioOutcome::Tank(run) => Some(&run.trajectory),
            ScenarioOutcome::Pid(run) => Some(&run.trajectory),
            ScenarioOutcome::Guess { .. } => None,
        }
    }
}

pub fn run_scenario(scenario: &Scenario) -> ProjectResult<ScenarioOutcome> {
    validate_scenario(scenario)?;
    info!(name = %scenario.name, kind = scenario.kind.label(), "running scenario");

    let outcome = match &scenario.kind {
        ScenarioKind::Tank(config) => ScenarioOutcome::Tank(simulate_tank(config)?),
        ScenarioKind::Pid(config) => ScenarioOutcome::Pid(simulate_pid(config)?),
        ScenarioKind::Guess { target, guesses } => {
            let parsed = Target::parse(target).map_err(ValidationError::from)?;
            let xs = default_grid();
            let reports = guesses
                .iter()
                .map(|input| GuessReport {
                    input: input.clone(),
                    result: evaluate_guess(&parsed.expr, input, &xs),
                })
                .collect();
            ScenarioOutcome::Guess {
                target: parsed.source,
                reports,
            }
        }
    };
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lf_expr::Verdict;
    use lf_sim::TankConfig;

    #[test]
    fn tank_scenario_produces_trajectory() {
        let s = Scenario::new("tank", ScenarioKind::Tank(TankConfig::default()));
        let outcome = run_scenario(&s).unwrap();
        assert_eq!(outcome.trajectory().map(Trajectory::len), Some(500));
    }

    #[test]
    fn guess_scenario_grades_each_guess() {
        let s = Scenario::new(
            "guess",
            ScenarioKind::Guess {
                target: "x^2 - 3".to_string(),
                guesses: vec!["x".into(), "x**2 - 3".into(), "x +".into()],
            },
        );
        let ScenarioOutcome::Guess { target, reports } = run_scenario(&s).unwrap() else {
            panic!("expected guess outcome");
        };
        assert_eq!(target, "x^2 - 3");
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].result.as_ref().unwrap().verdict, Verdict::Far);
        assert_eq!(reports[1].result.as_ref().unwrap().verdict, Verdict::Found);
        assert!(reports[2].result.is_err());
    }
}
