//! Control laws for the levelflow demos.
//!
//! Two discrete-time controllers are provided:
//! - [`ProportionalController`]: proportional action on the level error with a
//!   floor on the output (a pump cannot run backwards) and a manual open-loop
//!   fallback used when the gain is zero.
//! - [`PidController`]: textbook parallel PID with a rectangular integral and a
//!   backward-difference derivative, no filtering and no output limits.
//!
//! Controllers are stateless configuration; the evolving state is passed in
//! and returned explicitly so a run can be replayed bit for bit.

pub mod controller;
pub mod error;

pub use controller::{ControlMode, PidController, PidState, ProportionalController};
pub use error::{ControlError, ControlResult};
