//! lf-core: shared foundation for levelflow.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - grid (fixed-step simulation time grids)
//! - units (uom SI types + constructors)
//! - error (shared error types)

pub mod error;
pub mod grid;
pub mod numeric;
pub mod units;

pub use error::{LfError, LfResult};
pub use grid::{MAX_SAMPLES, TimeGrid};
pub use numeric::*;
