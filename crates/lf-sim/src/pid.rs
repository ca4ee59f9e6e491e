//! PID loop around a first-order lag plant.
//!
//! Each step `i` of a fixed-step grid:
//! 1. `e = sp - y[i-1]`, `I += e*dt`, `D = (e - e_prev)/dt`
//! 2. `u = kp*e + ki*I + kd*D`
//! 3. integrate `tau*dy/dt = -y + K*u` over the step with `u` held
//!
//! The plant output is never clamped and may overshoot or go negative.

use crate::error::{SimError, SimResult};
use crate::integrator::{ForwardEuler, RK4, advance};
use crate::metrics::ResponseMetrics;
use crate::plant::FirstOrderPlant;
use crate::trajectory::{Trajectory, TrajectorySample};
use lf_controls::{PidController, PidState};
use lf_core::TimeGrid;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How the plant is advanced across one controller step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PlantSolver {
    /// Closed-form solution of the linear ODE.
    #[default]
    Exact,
    /// Classical RK4 with equal sub-steps.
    Rk4 { substeps: usize },
    /// Forward Euler with equal sub-steps.
    Euler { substeps: usize },
}

impl PlantSolver {
    pub const DEFAULT_SUBSTEPS: usize = 10;

    pub fn rk4() -> Self {
        Self::Rk4 {
            substeps: Self::DEFAULT_SUBSTEPS,
        }
    }

    pub fn euler() -> Self {
        Self::Euler {
            substeps: Self::DEFAULT_SUBSTEPS,
        }
    }

    fn substeps(&self) -> Option<usize> {
        match *self {
            Self::Exact => None,
            Self::Rk4 { substeps } | Self::Euler { substeps } => Some(substeps),
        }
    }
}

/// PID scenario parameters.
///
/// Defaults reproduce the classroom demo: `kp = 2`, unit setpoint, 50 s at
/// `dt = 0.1`, plant gain 1 and time constant 5 s starting from rest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidConfig {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub setpoint: f64,
    /// Grid runs from 0 up to, not including, `duration`.
    pub duration: f64,
    /// Controller sample period, independent of `duration`.
    pub dt: f64,
    pub plant_gain: f64,
    pub time_constant: f64,
    pub initial_output: f64,
    pub plant_solver: PlantSolver,
}

impl Default for PidConfig {
    fn default() -> Self {
        Self {
            kp: 2.0,
            ki: 0.0,
            kd: 0.0,
            setpoint: 1.0,
            duration: 50.0,
            dt: 0.1,
            plant_gain: 1.0,
            time_constant: 5.0,
            initial_output: 0.0,
            plant_solver: PlantSolver::Exact,
        }
    }
}

impl PidConfig {
    /// Check every parameter and build the time grid for the run.
    pub fn time_grid(&self) -> SimResult<TimeGrid> {
        for (value, what) in [
            (self.setpoint, "setpoint"),
            (self.duration, "duration"),
            (self.dt, "dt"),
            (self.plant_gain, "plant_gain"),
            (self.time_constant, "time_constant"),
            (self.initial_output, "initial_output"),
        ] {
            if !value.is_finite() {
                return Err(SimError::NonFinite { what, value });
            }
        }

        PidController::new(self.kp, self.ki, self.kd)?;
        FirstOrderPlant::new(self.plant_gain, self.time_constant)?;

        if self.plant_solver.substeps() == Some(0) {
            return Err(SimError::InvalidParameter {
                what: "plant solver needs at least one sub-step",
            });
        }

        Ok(TimeGrid::arange(self.duration, self.dt)?)
    }

    pub fn validate(&self) -> SimResult<()> {
        self.time_grid().map(|_| ())
    }
}

/// Result of a PID run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PidRun {
    /// Plant output over time. `control` is the PID output.
    pub trajectory: Trajectory,
    /// Integral accumulator after each sample (zero at sample 0).
    pub integral: Vec<f64>,
    pub setpoint: f64,
}

impl PidRun {
    /// Step-response metrics against a `±band_fraction` band around setpoint.
    pub fn metrics(&self, band_fraction: f64) -> Option<ResponseMetrics> {
        ResponseMetrics::from_trajectory(&self.trajectory, self.setpoint, band_fraction)
    }
}

/// Run the PID loop.
///
/// # Errors
///
/// [`SimError::InvalidParameter`] or [`SimError::NonFinite`] when the
/// configuration is rejected; nothing is simulated in that case.
pub fn simulate_pid(config: &PidConfig) -> SimResult<PidRun> {
    let grid = config.time_grid()?;
    let controller = PidController::new(config.kp, config.ki, config.kd)?;
    let mut plant = FirstOrderPlant::new(config.plant_gain, config.time_constant)?;
    let dt = grid.dt();
    let sp = config.setpoint;

    debug!(
        kp = config.kp,
        ki = config.ki,
        kd = config.kd,
        samples = grid.len(),
        solver = ?config.plant_solver,
        "starting PID run"
    );

    let mut trajectory = Trajectory::with_capacity(grid.len());
    let mut integral = Vec::with_capacity(grid.len());

    let mut y = config.initial_output;
    let mut state = PidState::default();
    trajectory.push(TrajectorySample {
        time: 0.0,
        state: y,
        control: 0.0,
        error: sp - y,
    });
    integral.push(state.integral);

    for window in grid.times().windows(2) {
        let (t_prev, t) = (window[0], window[1]);
        let (next_state, u) = controller.update(&state, y, sp, dt);
        plant.set_input(u);

        y = match config.plant_solver {
            PlantSolver::Exact => plant.exact_step(y, dt),
            PlantSolver::Rk4 { substeps } => advance(&RK4, &mut plant, t_prev, &y, dt, substeps)?,
            PlantSolver::Euler { substeps } => {
                advance(&ForwardEuler, &mut plant, t_prev, &y, dt, substeps)?
            }
        };
        state = next_state;

        trajectory.push(TrajectorySample {
            time: t,
            state: y,
            control: u,
            error: state.previous_error,
        });
        integral.push(state.integral);
    }

    debug!(final_output = y, integral = state.integral, "PID run finished");

    Ok(PidRun {
        trajectory,
        integral,
        setpoint: sp,
    })
}
