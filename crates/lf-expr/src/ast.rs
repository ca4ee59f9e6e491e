//! Expression tree and evaluation.

use crate::error::{ExprError, ExprResult};
use lf_core::Real;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Allow-listed functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Func {
    Sin,
    Cos,
    Exp,
    Ln,
    Sqrt,
    Abs,
}

impl Func {
    /// Look up a function by (lowercase) name. `log` is the natural log.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sin" => Func::Sin,
            "cos" => Func::Cos,
            "exp" => Func::Exp,
            "ln" | "log" => Func::Ln,
            "sqrt" => Func::Sqrt,
            "abs" => Func::Abs,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Exp => "exp",
            Func::Ln => "ln",
            Func::Sqrt => "sqrt",
            Func::Abs => "abs",
        }
    }

    pub fn apply(self, v: Real) -> Real {
        match self {
            Func::Sin => v.sin(),
            Func::Cos => v.cos(),
            Func::Exp => v.exp(),
            Func::Ln => v.ln(),
            Func::Sqrt => v.sqrt(),
            Func::Abs => v.abs(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
        }
    }

    fn apply(self, a: Real, b: Real) -> Real {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
            BinaryOp::Pow => a.powf(b),
        }
    }
}

/// Parsed expression in the single variable `x`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Num(Real),
    X,
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        func: Func,
        arg: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn call(func: Func, arg: Expr) -> Self {
        Expr::Call {
            func,
            arg: Box::new(arg),
        }
    }

    /// Value at `x`. Domain errors come back as NaN or infinity.
    pub fn eval(&self, x: Real) -> Real {
        match self {
            Expr::Num(v) => *v,
            Expr::X => x,
            Expr::Neg(inner) => -inner.eval(x),
            Expr::Binary { op, lhs, rhs } => op.apply(lhs.eval(x), rhs.eval(x)),
            Expr::Call { func, arg } => func.apply(arg.eval(x)),
        }
    }

    /// Evaluate at every grid point.
    pub fn eval_grid(&self, xs: &[Real]) -> Vec<Real> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }

    /// Evaluate at every grid point, failing on the first non-finite value.
    pub fn try_eval_grid(&self, xs: &[Real]) -> ExprResult<Vec<Real>> {
        xs.iter()
            .map(|&x| {
                let y = self.eval(x);
                if y.is_finite() {
                    Ok(y)
                } else {
                    Err(ExprError::Evaluation {
                        x,
                        what: format!("'{self}' is undefined ({y})"),
                    })
                }
            })
            .collect()
    }

    /// True if the expression does not depend on `x`.
    pub fn is_constant(&self) -> bool {
        match self {
            Expr::Num(_) => true,
            Expr::X => false,
            Expr::Neg(inner) => inner.is_constant(),
            Expr::Binary { lhs, rhs, .. } => lhs.is_constant() && rhs.is_constant(),
            Expr::Call { arg, .. } => arg.is_constant(),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Num(v) => write!(f, "{v}"),
            Expr::X => write!(f, "x"),
            Expr::Neg(inner) => write!(f, "-({inner})"),
            Expr::Binary { op, lhs, rhs } => write!(f, "({lhs} {} {rhs})", op.symbol()),
            Expr::Call { func, arg } => write!(f, "{}({arg})", func.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x_squared_minus_3() -> Expr {
        Expr::binary(
            BinaryOp::Sub,
            Expr::binary(BinaryOp::Pow, Expr::X, Expr::Num(2.0)),
            Expr::Num(3.0),
        )
    }

    #[test]
    fn evaluates_polynomial() {
        let e = x_squared_minus_3();
        assert_eq!(e.eval(2.0), 1.0);
        assert_eq!(e.eval_grid(&[-1.0, 0.0, 3.0]), vec![-2.0, -3.0, 6.0]);
    }

    #[test]
    fn functions_apply() {
        let e = Expr::call(Func::Abs, Expr::Neg(Box::new(Expr::X)));
        assert_eq!(e.eval(4.0), 4.0);
        assert_eq!(Func::from_name("log"), Some(Func::Ln));
        assert_eq!(Func::from_name("system"), None);
    }

    #[test]
    fn try_eval_grid_reports_domain_error() {
        let e = Expr::call(Func::Ln, Expr::X);
        let err = e.try_eval_grid(&[1.0, -1.0]).unwrap_err();
        match err {
            ExprError::Evaluation { x, what } => {
                assert_eq!(x, -1.0);
                assert!(what.contains("ln(x)"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn division_by_zero_is_not_finite() {
        let e = Expr::binary(BinaryOp::Div, Expr::Num(1.0), Expr::X);
        assert!(e.try_eval_grid(&[0.0]).is_err());
    }

    #[test]
    fn display_is_fully_parenthesised() {
        assert_eq!(x_squared_minus_3().to_string(), "((x ^ 2) - 3)");
    }

    #[test]
    fn constant_detection() {
        assert!(Expr::call(Func::Sin, Expr::Num(1.0)).is_constant());
        assert!(!x_squared_minus_3().is_constant());
    }
}
