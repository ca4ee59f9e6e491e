//! Recorded simulation output.

use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// One instant of a run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    /// Simulation time.
    pub time: f64,
    /// Plant state (tank level or plant output).
    pub state: f64,
    /// Control input applied over the step that ended at this sample.
    pub control: f64,
    /// `setpoint - state` of the previous sample, i.e. the error the
    /// controller acted on. Sample 0 holds the initial error.
    pub error: f64,
}

/// Ordered time series of samples for a single run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    samples: Vec<TrajectorySample>,
}

impl Trajectory {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, sample: TrajectorySample) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    pub fn get(&self, index: usize) -> Option<&TrajectorySample> {
        self.samples.get(index)
    }

    pub fn first(&self) -> Option<&TrajectorySample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&TrajectorySample> {
        self.samples.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrajectorySample> {
        self.samples.iter()
    }

    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.time).collect()
    }

    pub fn states(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.state).collect()
    }

    pub fn controls(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.control).collect()
    }

    pub fn errors(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.error).collect()
    }

    /// Largest state value, `None` for an empty trajectory.
    pub fn peak(&self) -> Option<f64> {
        self.samples.iter().map(|s| s.state).reduce(f64::max)
    }

    /// Write `time,state,control,error` rows with a header line.
    pub fn write_csv<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "time,state,control,error")?;
        for s in &self.samples {
            writeln!(out, "{},{},{},{}", s.time, s.state, s.control, s.error)?;
        }
        out.flush()
    }

    /// CSV as an owned string.
    pub fn to_csv(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_csv(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a TrajectorySample;
    type IntoIter = std::slice::Iter<'a, TrajectorySample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time: f64, state: f64) -> TrajectorySample {
        TrajectorySample {
            time,
            state,
            control: 0.5,
            error: 1.0 - state,
        }
    }

    #[test]
    fn columns_follow_push_order() {
        let mut traj = Trajectory::with_capacity(3);
        traj.push(sample(0.0, 0.0));
        traj.push(sample(0.5, 0.25));
        traj.push(sample(1.0, 0.75));

        assert_eq!(traj.len(), 3);
        assert_eq!(traj.times(), vec![0.0, 0.5, 1.0]);
        assert_eq!(traj.states(), vec![0.0, 0.25, 0.75]);
        assert_eq!(traj.controls(), vec![0.5; 3]);
        assert_eq!(traj.errors(), vec![1.0, 0.75, 0.25]);
        assert_eq!(traj.peak(), Some(0.75));
        assert_eq!(traj.last().map(|s| s.time), Some(1.0));
    }

    #[test]
    fn csv_has_header_and_rows() {
        let mut traj = Trajectory::default();
        traj.push(sample(0.0, 0.0));
        traj.push(sample(1.0, 0.5));

        let csv = traj.to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "time,state,control,error");
        assert_eq!(lines[1], "0,0,0.5,1");
        assert_eq!(lines[2], "1,0.5,0.5,0.5");
    }

    #[test]
    fn empty_trajectory_has_no_peak() {
        let traj = Trajectory::default();
        assert!(traj.is_empty());
        assert_eq!(traj.peak(), None);
    }
}
