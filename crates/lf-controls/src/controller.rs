//! Controller implementations.
//!
//! Provides the two control laws used by the demos:
//! - **P (Proportional)** with an output floor and a manual fallback
//! - **PID (Proportional-Integral-Derivative)** without filtering or clamping
//!
//! Error convention everywhere: `e = sp - pv` (positive error means the process
//! variable is below setpoint).

use crate::error::{ControlError, ControlResult};
use lf_core::{ensure_finite, ensure_non_negative};
use serde::{Deserialize, Serialize};

/// Which branch of [`ProportionalController`] is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMode {
    /// Closed loop: output follows `kp * error`.
    Proportional,
    /// Open loop: output is the fixed manual value.
    Manual,
}

/// Proportional controller with a manual fallback.
///
/// When `kp > 0` the output is `max(kp * error, output_floor)`. Otherwise the
/// controller is in manual mode and always returns `manual_output`, whatever
/// the error. The mode is decided from `kp` alone, so a zero gain is never
/// blended with the manual value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProportionalController {
    /// Proportional gain.
    pub kp: f64,
    /// Output used in manual mode.
    pub manual_output: f64,
    /// Lowest output the closed loop may command.
    pub output_floor: f64,
}

impl ProportionalController {
    /// Create a proportional controller with a floor of zero.
    ///
    /// Values are only required to be finite; sign policy belongs to the caller.
    pub fn new(kp: f64, manual_output: f64) -> ControlResult<Self> {
        ensure_finite(kp, "kp")?;
        ensure_finite(manual_output, "manual_output")?;
        Ok(Self {
            kp,
            manual_output,
            output_floor: 0.0,
        })
    }

    /// Override the output floor.
    pub fn with_output_floor(mut self, floor: f64) -> ControlResult<Self> {
        self.output_floor = ensure_finite(floor, "output_floor")?;
        Ok(self)
    }

    pub fn mode(&self) -> ControlMode {
        if self.kp > 0.0 {
            ControlMode::Proportional
        } else {
            ControlMode::Manual
        }
    }

    /// Output for the measured value `pv` against setpoint `sp`.
    pub fn update(&self, pv: f64, sp: f64) -> f64 {
        match self.mode() {
            ControlMode::Proportional => (self.kp * (sp - pv)).max(self.output_floor),
            ControlMode::Manual => self.manual_output,
        }
    }
}

/// Textbook PID law in discrete time.
///
/// Control law: `u = kp*e + ki*I + kd*(e - e_prev)/dt` with `I += e*dt`
/// accumulated before the output is formed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PidController {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain (1/s).
    pub ki: f64,
    /// Derivative gain (s).
    pub kd: f64,
}

impl PidController {
    /// Create a new PID controller.
    ///
    /// # Arguments
    ///
    /// * `kp` - Proportional gain
    /// * `ki` - Integral gain
    /// * `kd` - Derivative gain
    ///
    /// # Errors
    ///
    /// All gains must be finite and non-negative.
    pub fn new(kp: f64, ki: f64, kd: f64) -> ControlResult<Self> {
        ensure_non_negative(kp, "kp must be non-negative")?;
        ensure_non_negative(ki, "ki must be non-negative")?;
        ensure_non_negative(kd, "kd must be non-negative")?;
        Ok(Self { kp, ki, kd })
    }

    /// Compute controller output.
    ///
    /// # Arguments
    ///
    /// * `state` - Controller state (integral and previous error)
    /// * `pv` - Process variable (measured value)
    /// * `sp` - Setpoint (desired value)
    /// * `dt` - Time since last update (seconds)
    ///
    /// # Returns
    ///
    /// Updated state and output value. The new state's `previous_error` is the
    /// error used for this update.
    pub fn update(&self, state: &PidState, pv: f64, sp: f64, dt: f64) -> (PidState, f64) {
        let error = sp - pv;
        let integral = state.integral + error * dt;
        let derivative = (error - state.previous_error) / dt;

        let output = self.kp * error + self.ki * integral + self.kd * derivative;

        let new_state = PidState {
            integral,
            previous_error: error,
        };

        (new_state, output)
    }

    /// True when every gain is zero, so the output is always zero.
    pub fn is_passive(&self) -> bool {
        self.kp == 0.0 && self.ki == 0.0 && self.kd == 0.0
    }
}

impl TryFrom<(f64, f64, f64)> for PidController {
    type Error = ControlError;

    fn try_from((kp, ki, kd): (f64, f64, f64)) -> ControlResult<Self> {
        Self::new(kp, ki, kd)
    }
}

/// PID controller state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidState {
    /// Running sum of `error * dt`.
    pub integral: f64,
    /// Error seen by the previous update (0 before the first one).
    pub previous_error: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proportional_mode_selection() {
        let p = ProportionalController::new(0.2, 0.5).unwrap();
        assert_eq!(p.mode(), ControlMode::Proportional);

        let manual = ProportionalController::new(0.0, 0.5).unwrap();
        assert_eq!(manual.mode(), ControlMode::Manual);

        // Negative gain is not closed loop either.
        let negative = ProportionalController::new(-1.0, 0.5).unwrap();
        assert_eq!(negative.mode(), ControlMode::Manual);
    }

    #[test]
    fn proportional_output_is_floored() {
        let p = ProportionalController::new(2.0, 0.0).unwrap();
        // Below setpoint: positive output
        assert!((p.update(0.25, 1.0) - 1.5).abs() < 1e-12);
        // Above setpoint: would be negative, floored at zero
        assert_eq!(p.update(1.5, 1.0), 0.0);
    }

    #[test]
    fn proportional_custom_floor() {
        let p = ProportionalController::new(1.0, 0.0)
            .unwrap()
            .with_output_floor(-0.1)
            .unwrap();
        assert_eq!(p.update(3.0, 1.0), -0.1);
    }

    #[test]
    fn manual_mode_ignores_error() {
        let p = ProportionalController::new(0.0, 0.3).unwrap();
        assert_eq!(p.update(0.0, 1.0), 0.3);
        assert_eq!(p.update(5.0, 1.0), 0.3);
    }

    #[test]
    fn proportional_rejects_non_finite() {
        assert!(matches!(
            ProportionalController::new(f64::NAN, 0.0),
            Err(ControlError::NonFinite { .. })
        ));
        assert!(ProportionalController::new(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn pid_controller_creation() {
        let pid = PidController::new(2.0, 0.5, 0.1).unwrap();
        assert_eq!(pid.kp, 2.0);
        assert_eq!(pid.ki, 0.5);
        assert_eq!(pid.kd, 0.1);
        assert!(!pid.is_passive());
        assert!(PidController::new(0.0, 0.0, 0.0).unwrap().is_passive());
    }

    #[test]
    fn pid_first_update_matches_hand_calculation() {
        let pid = PidController::new(2.0, 0.5, 0.1).unwrap();
        let (state, output) = pid.update(&PidState::default(), 0.0, 1.0, 0.1);

        // e = 1, I = 0.1, D = (1 - 0) / 0.1 = 10
        assert!((state.integral - 0.1).abs() < 1e-12);
        assert_eq!(state.previous_error, 1.0);
        let expected = 2.0 * 1.0 + 0.5 * 0.1 + 0.1 * 10.0;
        assert!((output - expected).abs() < 1e-12);
    }

    #[test]
    fn pid_integral_accumulates() {
        let pid = PidController::new(0.0, 1.0, 0.0).unwrap();
        let mut state = PidState::default();

        for _ in 0..10 {
            let (new_state, _) = pid.update(&state, 0.0, 1.0, 0.1);
            state = new_state;
        }

        assert!((state.integral - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pid_derivative_vanishes_for_constant_error() {
        let pid = PidController::new(0.0, 0.0, 1.0).unwrap();
        let state = PidState {
            integral: 0.0,
            previous_error: 0.5,
        };
        let (_, output) = pid.update(&state, 0.5, 1.0, 0.1);
        assert_eq!(output, 0.0);
    }

    #[test]
    fn invalid_controller_params() {
        assert!(PidController::new(-1.0, 0.0, 0.0).is_err());
        assert!(PidController::new(1.0, -0.1, 0.0).is_err());
        assert!(PidController::new(1.0, 0.0, -0.5).is_err());
        assert!(PidController::new(f64::NAN, 0.0, 0.0).is_err());
        assert!(PidController::try_from((1.0, 0.5, 0.0)).is_ok());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn proportional_output_never_below_floor(
            kp in 0.0_f64..10.0,
            pv in -5.0_f64..5.0,
            sp in -5.0_f64..5.0,
        ) {
            let p = ProportionalController::new(kp, 0.0).unwrap();
            prop_assert!(p.update(pv, sp) >= 0.0);
        }

        #[test]
        fn passive_pid_outputs_zero(
            pv in -5.0_f64..5.0,
            integral in -5.0_f64..5.0,
            previous_error in -5.0_f64..5.0,
        ) {
            let pid = PidController::new(0.0, 0.0, 0.0).unwrap();
            let state = PidState { integral, previous_error };
            let (_, output) = pid.update(&state, pv, 1.0, 0.1);
            prop_assert_eq!(output, 0.0);
        }
    }
}
