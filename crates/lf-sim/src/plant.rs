//! Plant models driven by a held (zero-order hold) input.

use crate::error::{SimError, SimResult};
use crate::model::TransientModel;
use lf_core::{ensure_finite, ensure_positive};

/// First-order lag: `tau * dy/dt = -y + gain * u`.
///
/// The input `u` is held constant between calls to [`FirstOrderPlant::set_input`].
#[derive(Clone, Debug, PartialEq)]
pub struct FirstOrderPlant {
    gain: f64,
    time_constant: f64,
    input: f64,
}

impl FirstOrderPlant {
    /// # Errors
    ///
    /// `time_constant` must be positive and `gain` finite.
    pub fn new(gain: f64, time_constant: f64) -> SimResult<Self> {
        ensure_finite(gain, "plant_gain")?;
        ensure_positive(time_constant, "time_constant must be positive")?;
        Ok(Self {
            gain,
            time_constant,
            input: 0.0,
        })
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn time_constant(&self) -> f64 {
        self.time_constant
    }

    pub fn input(&self) -> f64 {
        self.input
    }

    pub fn set_input(&mut self, u: f64) {
        self.input = u;
    }

    /// Output the plant settles to under the current input.
    pub fn steady_state(&self) -> f64 {
        self.gain * self.input
    }

    /// Analytic solution over `dt` with the current input held.
    pub fn exact_step(&self, y: f64, dt: f64) -> f64 {
        let y_ss = self.steady_state();
        y_ss + (y - y_ss) * (-dt / self.time_constant).exp()
    }
}

impl TransientModel for FirstOrderPlant {
    type State = f64;

    fn rhs(&mut self, _t: f64, y: &f64) -> SimResult<f64> {
        Ok((-y + self.gain * self.input) / self.time_constant)
    }

    fn add(&self, a: &f64, b: &f64) -> f64 {
        a + b
    }

    fn scale(&self, a: &f64, factor: f64) -> f64 {
        a * factor
    }
}

/// Open tank with vertical walls: `A * dh/dt = q_in - q_out`.
#[derive(Clone, Debug, PartialEq)]
pub struct TankPlant {
    surface_area: f64,
    inflow: f64,
    outflow: f64,
}

impl TankPlant {
    /// # Errors
    ///
    /// `surface_area` must be positive and `outflow` finite.
    pub fn new(surface_area: f64, outflow: f64) -> SimResult<Self> {
        ensure_positive(surface_area, "surface_area must be positive")?;
        ensure_finite(outflow, "outflow")?;
        Ok(Self {
            surface_area,
            inflow: 0.0,
            outflow,
        })
    }

    pub fn surface_area(&self) -> f64 {
        self.surface_area
    }

    pub fn outflow(&self) -> f64 {
        self.outflow
    }

    pub fn inflow(&self) -> f64 {
        self.inflow
    }

    pub fn set_inflow(&mut self, inflow: f64) -> SimResult<()> {
        if !inflow.is_finite() {
            return Err(SimError::NonFinite {
                what: "inflow",
                value: inflow,
            });
        }
        self.inflow = inflow;
        Ok(())
    }
}

impl TransientModel for TankPlant {
    type State = f64;

    fn rhs(&mut self, _t: f64, _h: &f64) -> SimResult<f64> {
        Ok((self.inflow - self.outflow) / self.surface_area)
    }

    fn add(&self, a: &f64, b: &f64) -> f64 {
        a + b
    }

    fn scale(&self, a: &f64, factor: f64) -> f64 {
        a * factor
    }
}
