//! Comparing a guess against the hidden function.

use crate::ast::Expr;
use crate::error::{ExprError, ExprResult};
use crate::parse::parse;
use lf_core::Real;
use serde::{Deserialize, Serialize};

/// Interval the curves are compared on.
pub const DEFAULT_X_RANGE: (Real, Real) = (-10.0, 10.0);
pub const DEFAULT_GRID_POINTS: usize = 500;

/// Evenly spaced points over [`DEFAULT_X_RANGE`], end points included.
pub fn default_grid() -> Vec<Real> {
    linspace(DEFAULT_X_RANGE.0, DEFAULT_X_RANGE.1, DEFAULT_GRID_POINTS)
}

fn linspace(start: Real, stop: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as Real;
            let mut xs: Vec<Real> = (0..n).map(|i| start + i as Real * step).collect();
            xs[n - 1] = stop;
            xs
        }
    }
}

/// Mean absolute difference between two curves on `xs`.
///
/// # Errors
///
/// [`ExprError::Evaluation`] if either curve is undefined somewhere on the
/// grid, [`ExprError::InvalidArg`] for an empty grid.
pub fn score(target: &Expr, guess: &Expr, xs: &[Real]) -> ExprResult<Real> {
    if xs.is_empty() {
        return Err(ExprError::InvalidArg {
            what: "grid must not be empty",
        });
    }
    let yt = target.try_eval_grid(xs)?;
    let yg = guess.try_eval_grid(xs)?;
    Ok(mean_abs_diff(&yt, &yg))
}

fn mean_abs_diff(a: &[Real], b: &[Real]) -> Real {
    let total: Real = a.iter().zip(b).map(|(p, q)| (p - q).abs()).sum();
    total / a.len() as Real
}

/// How close a guess is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Score below 0.1.
    Found,
    /// Score below 1.
    Close,
    Far,
}

impl Verdict {
    pub const FOUND_BELOW: Real = 0.1;
    pub const CLOSE_BELOW: Real = 1.0;

    pub fn from_score(score: Real) -> Self {
        if score < Self::FOUND_BELOW {
            Verdict::Found
        } else if score < Self::CLOSE_BELOW {
            Verdict::Close
        } else {
            Verdict::Far
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Verdict::Found => "Well done, you found the hidden function!",
            Verdict::Close => "Not bad! You are getting close.",
            Verdict::Far => "Too far off. Try again.",
        }
    }
}

/// Everything needed to draw and grade one guess.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuessOutcome {
    pub guess: Expr,
    pub xs: Vec<Real>,
    pub target_values: Vec<Real>,
    pub guess_values: Vec<Real>,
    pub score: Real,
    pub verdict: Verdict,
}

/// Parse `input`, evaluate both curves on `xs` and grade the guess.
pub fn evaluate_guess(target: &Expr, input: &str, xs: &[Real]) -> ExprResult<GuessOutcome> {
    let guess = parse(input)?;
    let score = score(target, &guess, xs)?;
    Ok(GuessOutcome {
        xs: xs.to_vec(),
        target_values: target.eval_grid(xs),
        guess_values: guess.eval_grid(xs),
        guess,
        score,
        verdict: Verdict::from_score(score),
    })
}
