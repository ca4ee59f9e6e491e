//! Fixed-step simulation time grids.
//!
//! Two constructions are supported:
//! - [`TimeGrid::linspace`]: a fixed number of samples spanning `[0, duration]`
//!   inclusive (the tank demos).
//! - [`TimeGrid::arange`]: a fixed step from 0 up to, but excluding, `duration`
//!   (the PID demo).
//!
//! A grid is built once per run and never mutated afterwards. Neither
//! constructor allocates more than [`MAX_SAMPLES`] points.

use crate::error::{LfError, LfResult};
use crate::numeric::{Real, ensure_finite, ensure_positive};

/// Relative slack used when deciding whether `duration / dt` is a whole number.
const WHOLE_STEPS_REL_TOL: Real = 1e-9;

/// Largest grid any run may allocate.
pub const MAX_SAMPLES: usize = 10_000_000;

/// Ordered, evenly spaced simulation timestamps starting at zero.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeGrid {
    times: Vec<Real>,
    dt: Real,
}

impl TimeGrid {
    /// `sample_count` points evenly spaced from 0 to `duration` inclusive.
    ///
    /// The step is `duration / (sample_count - 1)`.
    pub fn linspace(duration: Real, sample_count: usize) -> LfResult<Self> {
        ensure_positive(duration, "duration must be positive")?;
        if sample_count < 2 {
            return Err(LfError::InvalidArg {
                what: "sample_count must be at least 2",
            });
        }
        if sample_count > MAX_SAMPLES {
            return Err(LfError::InvalidArg {
                what: "sample_count exceeds the grid limit",
            });
        }

        let last = (sample_count - 1) as Real;
        let dt = duration / last;
        let mut times: Vec<Real> = (0..sample_count).map(|i| i as Real * dt).collect();
        // Pin the end point so rounding never leaves it short of `duration`.
        times[sample_count - 1] = duration;

        Ok(Self { times, dt })
    }

    /// Points `0, dt, 2*dt, ...` strictly below `duration`.
    ///
    /// When `duration` is a whole multiple of `dt` (within floating point
    /// slack) the grid holds exactly `duration / dt` points.
    pub fn arange(duration: Real, dt: Real) -> LfResult<Self> {
        ensure_positive(duration, "duration must be positive")?;
        ensure_positive(dt, "dt must be positive")?;

        let count = step_count(duration, dt)?;
        let times = (0..count).map(|i| i as Real * dt).collect();

        Ok(Self { times, dt })
    }

    pub fn dt(&self) -> Real {
        self.dt
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[Real] {
        &self.times
    }

    /// Timestamp of sample `index`, if it exists.
    pub fn time(&self, index: usize) -> Option<Real> {
        self.times.get(index).copied()
    }

    /// Last timestamp of the grid.
    pub fn end(&self) -> Real {
        self.times.last().copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = Real> + '_ {
        self.times.iter().copied()
    }
}

fn step_count(duration: Real, dt: Real) -> LfResult<usize> {
    let ratio = ensure_finite(duration / dt, "duration / dt")?;
    let rounded = ratio.round();
    let count = if (ratio - rounded).abs() <= WHOLE_STEPS_REL_TOL * rounded.max(1.0) {
        rounded
    } else {
        ratio.ceil()
    };
    if count > MAX_SAMPLES as Real {
        return Err(LfError::InvalidArg {
            what: "duration / dt exceeds the grid limit",
        });
    }
    Ok(count as usize)
}
