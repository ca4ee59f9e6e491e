use crate::LfError;

/// Scalar type for levels, flows, gains and time.
pub type Real = f64;

/// Mixed absolute/relative tolerance used in comparisons.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Tolerances {
    pub const fn new(abs: Real, rel: Real) -> Self {
        Self { abs, rel }
    }

    /// Same bound for both parts.
    pub const fn uniform(tol: Real) -> Self {
        Self::new(tol, tol)
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self::new(1e-12, 1e-9)
    }
}

/// `|a - b|` within `tol.abs`, or within `tol.rel` of the larger magnitude.
pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    diff <= tol.abs || diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(value: Real, what: &'static str) -> Result<Real, LfError> {
    if !value.is_finite() {
        return Err(LfError::NonFinite { what, value });
    }
    Ok(value)
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(value: Real, what: &'static str) -> Result<Real, LfError> {
    match ensure_finite(value, what)? {
        v if v > 0.0 => Ok(v),
        _ => Err(LfError::InvalidArg { what }),
    }
}

/// Finite and not below zero.
pub fn ensure_non_negative(value: Real, what: &'static str) -> Result<Real, LfError> {
    match ensure_finite(value, what)? {
        v if v >= 0.0 => Ok(v),
        _ => Err(LfError::InvalidArg { what }),
    }
}
