//! Fixed-step simulations for the levelflow demos.
//!
//! Provides:
//! - Proportional tank-level loop with manual fallback and level clamp
//! - PID loop around a first-order lag plant
//! - `TransientModel` trait with forward Euler and RK4 integrators
//! - Trajectory recording, CSV export, and step-response metrics

pub mod error;
pub mod integrator;
pub mod metrics;
pub mod model;
pub mod pid;
pub mod plant;
pub mod tank;
pub mod trajectory;

// Re-exports for public API
pub use error::{SimError, SimResult};
pub use integrator::{ForwardEuler, Integrator, RK4, advance};
pub use metrics::{DEFAULT_BAND_FRACTION, ResponseMetrics};
pub use model::TransientModel;
pub use pid::{PidConfig, PidRun, PlantSolver, simulate_pid};
pub use plant::{FirstOrderPlant, TankPlant};
pub use tank::{TankConfig, TankRun, TankValidation, simulate_tank};
pub use trajectory::{Trajectory, TrajectorySample};
