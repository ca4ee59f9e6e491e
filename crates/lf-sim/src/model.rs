//! Continuous-time plants the integrators can advance.

use crate::error::SimResult;

/// A plant written as `dx/dt = f(t, x)`.
///
/// The integrators only need the derivative plus enough vector-space
/// arithmetic on `State` to form weighted sums of stages. Inputs held between
/// samples (a valve position, a controller output) are fields on the
/// implementor and are updated through its own setters before each step.
pub trait TransientModel {
    type State: Clone;

    /// Derivative of the state at time `t`.
    fn rhs(&mut self, t: f64, x: &Self::State) -> SimResult<Self::State>;

    /// `a + b`
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// `factor * a`
    fn scale(&self, a: &Self::State, factor: f64) -> Self::State;
}
