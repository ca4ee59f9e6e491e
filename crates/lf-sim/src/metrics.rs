//! Step-response metrics.
//!
//! The demos draw reference lines at `setpoint * (1 ± 5%)`; these helpers turn
//! the same band into numbers: peak, overshoot, settling time and final error.

use crate::trajectory::Trajectory;
use serde::{Deserialize, Serialize};

/// Half-width of the reference band as a fraction of setpoint.
pub const DEFAULT_BAND_FRACTION: f64 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetrics {
    /// Lower and upper edge of the band.
    pub band: (f64, f64),
    /// Largest state reached.
    pub peak: f64,
    /// `(peak - setpoint) / |setpoint|`, zero if the state never exceeds setpoint.
    pub overshoot: f64,
    /// Time from which every later sample stays inside the band.
    pub settling_time: Option<f64>,
    /// `setpoint - final state`.
    pub steady_state_error: f64,
}

impl ResponseMetrics {
    /// Compute metrics; `None` for an empty trajectory.
    pub fn from_trajectory(
        trajectory: &Trajectory,
        setpoint: f64,
        band_fraction: f64,
    ) -> Option<Self> {
        let last = trajectory.last()?;
        let peak = trajectory.peak()?;

        let half_width = (setpoint * band_fraction).abs();
        let band = (setpoint - half_width, setpoint + half_width);
        let in_band = |v: f64| v >= band.0 && v <= band.1;

        let overshoot = if peak > setpoint && setpoint != 0.0 {
            (peak - setpoint) / setpoint.abs()
        } else {
            0.0
        };

        // Walk back from the end while samples stay in band.
        let samples = trajectory.samples();
        let settling_time = if in_band(last.state) {
            let first_settled = samples
                .iter()
                .rposition(|s| !in_band(s.state))
                .map_or(0, |i| i + 1);
            Some(samples[first_settled].time)
        } else {
            None
        };

        Some(Self {
            band,
            peak,
            overshoot,
            settling_time,
            steady_state_error: setpoint - last.state,
        })
    }

    pub fn is_settled(&self) -> bool {
        self.settling_time.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::TrajectorySample;

    fn trajectory(states: &[f64]) -> Trajectory {
        let mut traj = Trajectory::default();
        for (i, &state) in states.iter().enumerate() {
            traj.push(TrajectorySample {
                time: i as f64,
                state,
                control: 0.0,
                error: 1.0 - state,
            });
        }
        traj
    }

    #[test]
    fn settles_after_overshoot() {
        let traj = trajectory(&[0.0, 0.6, 1.2, 1.04, 0.97, 1.0]);
        let m = ResponseMetrics::from_trajectory(&traj, 1.0, DEFAULT_BAND_FRACTION).unwrap();

        assert!((m.band.0 - 0.95).abs() < 1e-12);
        assert!((m.band.1 - 1.05).abs() < 1e-12);
        assert_eq!(m.peak, 1.2);
        assert!((m.overshoot - 0.2).abs() < 1e-12);
        assert_eq!(m.settling_time, Some(3.0));
        assert_eq!(m.steady_state_error, 0.0);
        assert!(m.is_settled());
    }

    #[test]
    fn never_settles_when_final_sample_out_of_band() {
        let traj = trajectory(&[0.0, 0.3, 0.6]);
        let m = ResponseMetrics::from_trajectory(&traj, 1.0, DEFAULT_BAND_FRACTION).unwrap();
        assert_eq!(m.settling_time, None);
        assert_eq!(m.overshoot, 0.0);
        assert!((m.steady_state_error - 0.4).abs() < 1e-12);
    }

    #[test]
    fn in_band_from_start_settles_at_zero() {
        let traj = trajectory(&[1.0, 1.01, 0.99]);
        let m = ResponseMetrics::from_trajectory(&traj, 1.0, DEFAULT_BAND_FRACTION).unwrap();
        assert_eq!(m.settling_time, Some(0.0));
    }

    #[test]
    fn empty_trajectory_has_no_metrics() {
        assert!(ResponseMetrics::from_trajectory(&Trajectory::default(), 1.0, 0.05).is_none());
    }
}
