//! Fixed-step time integrators.

use crate::error::{SimError, SimResult};
use crate::model::TransientModel;

/// One fixed step of an explicit scheme.
pub trait Integrator {
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State>;
}

/// Classical fourth-order Runge-Kutta.
#[derive(Clone, Copy, Debug, Default)]
pub struct RK4;

impl Integrator for RK4 {
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State> {
        let half = 0.5 * dt;

        let k1 = model.rhs(t, x)?;
        let x2 = offset(model, x, &k1, half);
        let k2 = model.rhs(t + half, &x2)?;
        let x3 = offset(model, x, &k2, half);
        let k3 = model.rhs(t + half, &x3)?;
        let x4 = offset(model, x, &k3, dt);
        let k4 = model.rhs(t + dt, &x4)?;

        // Stage weights 1, 2, 2, 1 over dt / 6.
        let ends = model.add(&k1, &k4);
        let middle = model.scale(&model.add(&k2, &k3), 2.0);
        let slope = model.add(&ends, &middle);
        Ok(offset(model, x, &slope, dt / 6.0))
    }
}

/// Explicit Euler: `x + dt * f(t, x)`, one derivative evaluation per step.
#[derive(Clone, Copy, Debug, Default)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State> {
        let slope = model.rhs(t, x)?;
        Ok(offset(model, x, &slope, dt))
    }
}

/// `x + h * k`
fn offset<M: TransientModel>(model: &M, x: &M::State, k: &M::State, h: f64) -> M::State {
    model.add(x, &model.scale(k, h))
}

/// Integrate from `t` over `span` using `substeps` equal steps.
pub fn advance<I: Integrator, M: TransientModel>(
    integrator: &I,
    model: &mut M,
    t: f64,
    x: &M::State,
    span: f64,
    substeps: usize,
) -> SimResult<M::State> {
    if substeps == 0 {
        return Err(SimError::InvalidParameter {
            what: "substeps must be at least 1",
        });
    }

    let h = span / substeps as f64;
    let mut state = x.clone();
    for k in 0..substeps {
        state = integrator.step(model, t + k as f64 * h, &state, h)?;
    }
    Ok(state)
}
