//! Guess-the-function game: a small, sandboxed math expression language.
//!
//! Input is free text in one variable `x` using `+ - * / ^` (or `**`),
//! parentheses, the constants `pi` and `e`, and an allow-list of functions:
//! `sin`, `cos`, `exp`, `ln`/`log`, `sqrt`, `abs`. Anything else is a parse
//! error. Expressions are parsed into a tree and evaluated node by node; no
//! host-language code is ever executed.
//!
//! ```
//! use lf_expr::{parse, score, Verdict, default_grid};
//!
//! let target = parse("x^2 - 3").unwrap();
//! let guess = parse("x**2 - 3").unwrap();
//! let xs = default_grid();
//! let s = score(&target, &guess, &xs).unwrap();
//! assert_eq!(Verdict::from_score(s), Verdict::Found);
//! ```

pub mod ast;
pub mod error;
pub mod lex;
pub mod parse;
pub mod score;
pub mod session;

pub use ast::{BinaryOp, Expr, Func};
pub use error::{ExprError, ExprResult};
pub use parse::parse;
pub use score::{
    DEFAULT_GRID_POINTS, DEFAULT_X_RANGE, GuessOutcome, Verdict, default_grid, evaluate_guess, score,
};
pub use session::{GuessSession, Target, TargetCatalog};
