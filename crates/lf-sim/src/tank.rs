//! Tank level regulated by a proportional controller.
//!
//! Network: pump --(q_in)--> tank --(q_out)--> drain
//!
//! Each step:
//! 1. `error = setpoint - h[i-1]`
//! 2. `q_in = max(kp * error, 0)` if `kp > 0`, else the manual inflow
//! 3. `h[i] = h[i-1] + (q_in - q_out) * dt / A` (explicit Euler)
//! 4. If `h[i] < 0` the level is clamped to zero and the run is marked emptied

use crate::error::{SimError, SimResult};
use crate::integrator::{ForwardEuler, Integrator};
use crate::plant::TankPlant;
use crate::trajectory::{Trajectory, TrajectorySample};
use lf_controls::ProportionalController;
use lf_core::TimeGrid;
use lf_core::units::{self, Length, Volume};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How strictly tank parameters are checked before a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TankValidation {
    /// Reject negative `kp`, `manual_inflow`, `outflow` and `initial_height`.
    #[default]
    Strict,
    /// Accept any finite value, as the classroom sliders did.
    Permissive,
}

/// Tank scenario parameters.
///
/// Defaults reproduce the classroom demo: 1 m setpoint, 1 m² tank, 500 samples
/// over 50 minutes, `kp = 0.2`, 0.2 m³/min manual inflow, 0.1 m³/min drain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TankConfig {
    /// Simulated time span (time units, minutes in the demos).
    pub duration: f64,
    /// Number of samples including both end points.
    pub sample_count: usize,
    /// Target level (m).
    pub setpoint: f64,
    /// Horizontal cross-section of the tank (m²).
    pub surface_area: f64,
    /// Proportional gain. Zero or below selects manual inflow.
    pub kp: f64,
    /// Inflow used when the controller is in manual mode.
    pub manual_inflow: f64,
    /// Constant drain flow.
    pub outflow: f64,
    /// Level at t = 0 (m).
    pub initial_height: f64,
    /// Clamp the level at zero and record emptying. Disabling it reproduces
    /// the unclamped variant of the demo.
    pub clamp_level: bool,
    pub validation: TankValidation,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            duration: 50.0,
            sample_count: 500,
            setpoint: 1.0,
            surface_area: 1.0,
            kp: 0.2,
            manual_inflow: 0.2,
            outflow: 0.1,
            initial_height: 0.0,
            clamp_level: true,
            validation: TankValidation::Strict,
        }
    }
}

impl TankConfig {
    /// Check every parameter and build the time grid for the run.
    pub fn time_grid(&self) -> SimResult<TimeGrid> {
        for (value, what) in [
            (self.duration, "duration"),
            (self.setpoint, "setpoint"),
            (self.surface_area, "surface_area"),
            (self.kp, "kp"),
            (self.manual_inflow, "manual_inflow"),
            (self.outflow, "outflow"),
            (self.initial_height, "initial_height"),
        ] {
            if !value.is_finite() {
                return Err(SimError::NonFinite { what, value });
            }
        }

        if self.surface_area <= 0.0 {
            return Err(SimError::InvalidParameter {
                what: "surface_area must be positive",
            });
        }

        if self.validation == TankValidation::Strict {
            if self.kp < 0.0 {
                return Err(SimError::InvalidParameter {
                    what: "kp must be non-negative",
                });
            }
            if self.manual_inflow < 0.0 {
                return Err(SimError::InvalidParameter {
                    what: "manual_inflow must be non-negative",
                });
            }
            if self.outflow < 0.0 {
                return Err(SimError::InvalidParameter {
                    what: "outflow must be non-negative",
                });
            }
            if self.initial_height < 0.0 {
                return Err(SimError::InvalidParameter {
                    what: "initial_height must be non-negative",
                });
            }
        }

        Ok(TimeGrid::linspace(self.duration, self.sample_count)?)
    }

    pub fn validate(&self) -> SimResult<()> {
        self.time_grid().map(|_| ())
    }
}

/// Result of a tank run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TankRun {
    /// Level over time. `control` is the inflow, `error` the level error.
    pub trajectory: Trajectory,
    /// True if the level clamp fired at least once.
    pub emptied: bool,
    /// Index of the first sample where the clamp fired.
    pub emptied_at: Option<usize>,
    surface_area: f64,
}

impl TankRun {
    /// Whether the tank had emptied by sample `index`.
    ///
    /// Once true it stays true for every later index.
    pub fn emptied_by(&self, index: usize) -> bool {
        self.emptied_at.is_some_and(|first| index >= first)
    }

    pub fn final_height(&self) -> Length {
        units::m(self.trajectory.last().map_or(0.0, |s| s.state))
    }

    pub fn final_volume(&self) -> Volume {
        units::tank_volume(self.final_height(), units::m2(self.surface_area))
    }
}

/// Run the proportional tank-level loop.
///
/// # Errors
///
/// [`SimError::InvalidParameter`] or [`SimError::NonFinite`] when the
/// configuration is rejected; nothing is simulated in that case.
pub fn simulate_tank(config: &TankConfig) -> SimResult<TankRun> {
    let grid = config.time_grid()?;
    let controller = ProportionalController::new(config.kp, config.manual_inflow)?;
    let mut plant = TankPlant::new(config.surface_area, config.outflow)?;
    let dt = grid.dt();
    let sp = config.setpoint;

    debug!(
        mode = ?controller.mode(),
        samples = grid.len(),
        dt,
        "starting tank run"
    );

    let mut trajectory = Trajectory::with_capacity(grid.len());
    let mut level = config.initial_height;
    trajectory.push(TrajectorySample {
        time: 0.0,
        state: level,
        control: 0.0,
        error: sp - level,
    });

    let mut emptied_at = None;
    for (i, window) in grid.times().windows(2).enumerate() {
        let (t_prev, t) = (window[0], window[1]);
        let error = sp - level;
        let inflow = controller.update(level, sp);
        plant.set_inflow(inflow)?;

        let mut next = ForwardEuler.step(&mut plant, t_prev, &level, dt)?;
        if config.clamp_level && next < 0.0 {
            next = 0.0;
            if emptied_at.is_none() {
                warn!(time = t, "tank emptied, level clamped to zero");
                emptied_at = Some(i + 1);
            }
        }
        level = next;

        trajectory.push(TrajectorySample {
            time: t,
            state: level,
            control: inflow,
            error,
        });
    }

    debug!(final_level = level, emptied = emptied_at.is_some(), "tank run finished");

    Ok(TankRun {
        trajectory,
        emptied: emptied_at.is_some(),
        emptied_at,
        surface_area: config.surface_area,
    })
}
