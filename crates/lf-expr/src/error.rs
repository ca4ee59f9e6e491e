//! Error types for expression parsing and evaluation.

use thiserror::Error;

pub type ExprResult<T> = Result<T, ExprError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExprError {
    /// The input is not a valid expression. `pos` is a byte offset into it.
    #[error("Parse error at position {pos}: {what}")]
    Parse { pos: usize, what: String },

    /// The expression has no finite value at some grid point.
    #[error("Evaluation error at x = {x}: {what}")]
    Evaluation { x: f64, what: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

impl ExprError {
    pub(crate) fn parse(pos: usize, what: impl Into<String>) -> Self {
        ExprError::Parse {
            pos,
            what: what.into(),
        }
    }
}
