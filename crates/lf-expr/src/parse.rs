//! Recursive-descent parser.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('^' unary)?
//! primary := NUMBER | 'x' | 'pi' | 'e' | FUNC '(' expr ')' | '(' expr ')'
//! ```
//!
//! Power is right associative and binds tighter than unary minus, so `-x^2`
//! is `-(x^2)` and `2^-1` is accepted.

use crate::ast::{BinaryOp, Expr, Func};
use crate::error::{ExprError, ExprResult};
use crate::lex::{Token, TokenKind, tokenize};
use std::f64::consts;

/// Deepest expression tree accepted. Every parenthesis, unary operator and
/// chained binary operand counts one level, so evaluation never recurses
/// deeper than this.
const MAX_DEPTH: usize = 256;

/// Parse free text into an expression tree.
pub fn parse(input: &str) -> ExprResult<Expr> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ExprError::parse(0, "empty expression"));
    }

    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
        end: input.len(),
    };
    let expr = parser.expr()?;
    if let Some(tok) = parser.peek() {
        return Err(ExprError::parse(tok.pos, "unexpected trailing input"));
    }
    Ok(expr)
}

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    depth: usize,
    /// Byte length of the input, reported for errors at end of input.
    end: usize,
}

impl<'t> Parser<'t> {
    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'t Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek().is_some_and(|t| &t.kind == kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn here(&self) -> usize {
        self.peek().map_or(self.end, |t| t.pos)
    }

    fn descend(&mut self) -> ExprResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExprError::parse(self.here(), "expression nested too deeply"));
        }
        Ok(())
    }

    fn expr(&mut self) -> ExprResult<Expr> {
        let mut lhs = self.term()?;
        let mut folded = 0;
        loop {
            let op = if self.eat(&TokenKind::Plus) {
                BinaryOp::Add
            } else if self.eat(&TokenKind::Minus) {
                BinaryOp::Sub
            } else {
                self.depth -= folded;
                return Ok(lhs);
            };
            // Left-leaning chains deepen the tree by one per operand.
            self.descend()?;
            folded += 1;
            let rhs = self.term()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn term(&mut self) -> ExprResult<Expr> {
        let mut lhs = self.unary()?;
        let mut folded = 0;
        loop {
            let op = if self.eat(&TokenKind::Star) {
                BinaryOp::Mul
            } else if self.eat(&TokenKind::Slash) {
                BinaryOp::Div
            } else {
                self.depth -= folded;
                return Ok(lhs);
            };
            self.descend()?;
            folded += 1;
            let rhs = self.unary()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn unary(&mut self) -> ExprResult<Expr> {
        self.descend()?;
        let expr = if self.eat(&TokenKind::Minus) {
            Expr::Neg(Box::new(self.unary()?))
        } else if self.eat(&TokenKind::Plus) {
            self.unary()?
        } else {
            self.power()?
        };
        self.depth -= 1;
        Ok(expr)
    }

    fn power(&mut self) -> ExprResult<Expr> {
        let base = self.primary()?;
        if self.eat(&TokenKind::Caret) {
            let exponent = self.unary()?;
            return Ok(Expr::binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> ExprResult<Expr> {
        let pos = self.here();
        let Some(tok) = self.next() else {
            return Err(ExprError::parse(pos, "unexpected end of expression"));
        };

        match &tok.kind {
            TokenKind::Number(v) => Ok(Expr::Num(*v)),
            TokenKind::LParen => {
                let inner = self.expr()?;
                self.expect_rparen(pos)?;
                Ok(inner)
            }
            TokenKind::Ident(name) => self.ident(name, pos),
            other => Err(ExprError::parse(pos, format!("unexpected {}", describe(other)))),
        }
    }

    fn ident(&mut self, name: &str, pos: usize) -> ExprResult<Expr> {
        match name {
            "x" => return Ok(Expr::X),
            "pi" => return Ok(Expr::Num(consts::PI)),
            "e" => return Ok(Expr::Num(consts::E)),
            _ => {}
        }

        let Some(func) = Func::from_name(name) else {
            return Err(ExprError::parse(pos, format!("unknown name '{name}'")));
        };
        let open = self.here();
        if !self.eat(&TokenKind::LParen) {
            return Err(ExprError::parse(
                open,
                format!("expected '(' after '{}'", func.name()),
            ));
        }
        let arg = self.expr()?;
        self.expect_rparen(open)?;
        Ok(Expr::call(func, arg))
    }

    fn expect_rparen(&mut self, open: usize) -> ExprResult<()> {
        if self.eat(&TokenKind::RParen) {
            Ok(())
        } else {
            Err(ExprError::parse(
                self.here(),
                format!("missing ')' for '(' at position {open}"),
            ))
        }
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Number(v) => format!("number {v}"),
        TokenKind::Ident(name) => format!("name '{name}'"),
        TokenKind::Plus => "'+'".into(),
        TokenKind::Minus => "'-'".into(),
        TokenKind::Star => "'*'".into(),
        TokenKind::Slash => "'/'".into(),
        TokenKind::Caret => "'^'".into(),
        TokenKind::LParen => "'('".into(),
        TokenKind::RParen => "')'".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(input: &str, x: f64) -> f64 {
        parse(input).unwrap().eval(x)
    }

    #[test]
    fn precedence() {
        assert_eq!(eval("1 + 2 * 3", 0.0), 7.0);
        assert_eq!(eval("(1 + 2) * 3", 0.0), 9.0);
        assert_eq!(eval("8 / 4 / 2", 0.0), 1.0);
        assert_eq!(eval("10 - 4 - 3", 0.0), 3.0);
    }

    #[test]
    fn power_is_right_associative_and_tighter_than_negation() {
        assert_eq!(eval("2^3^2", 0.0), 512.0);
        assert_eq!(eval("-x^2", 3.0), -9.0);
        assert_eq!(eval("2^-1", 0.0), 0.5);
        assert_eq!(eval("x**2 - 3", 2.0), 1.0);
    }

    #[test]
    fn functions_and_constants() {
        assert!((eval("sin(pi/2)", 0.0) - 1.0).abs() < 1e-15);
        assert!((eval("ln(e)", 0.0) - 1.0).abs() < 1e-15);
        assert_eq!(eval("sqrt(abs(x))", -16.0), 4.0);
        assert_eq!(eval("exp(0) + cos(0)", 0.0), 2.0);
    }

    #[test]
    fn unary_plus_and_double_minus() {
        assert_eq!(eval("+x", 2.0), 2.0);
        assert_eq!(eval("--x", 2.0), 2.0);
    }

    #[test]
    fn display_reparses_to_same_tree() {
        let e = parse("-x^2 + 3*sin(x)/2").unwrap();
        assert_eq!(parse(&e.to_string()).unwrap(), e);
    }

    #[test]
    fn rejects_names_outside_allow_list() {
        let err = parse("__import__(x)").unwrap_err();
        assert!(matches!(err, ExprError::Parse { pos: 0, .. }));
        assert!(parse("y + 1").is_err());
        assert!(parse("tan(x)").is_err());
    }

    #[test]
    fn reports_structural_errors() {
        assert_eq!(
            parse("").unwrap_err(),
            ExprError::Parse {
                pos: 0,
                what: "empty expression".into()
            }
        );
        assert!(matches!(parse("(x + 1").unwrap_err(), ExprError::Parse { pos: 6, .. }));
        assert!(matches!(parse("x +").unwrap_err(), ExprError::Parse { pos: 3, .. }));
        assert!(matches!(parse("x x").unwrap_err(), ExprError::Parse { pos: 2, .. }));
        assert!(parse("sin x").is_err());
        assert!(parse("2 * * 3").is_err());
        assert!(parse(")").is_err());
    }

    #[test]
    fn rejects_pathological_nesting() {
        let deep = format!("{}x{}", "(".repeat(1000), ")".repeat(1000));
        assert!(parse(&deep).is_err());
        let shallow = format!("{}x{}", "(".repeat(10), ")".repeat(10));
        assert!(parse(&shallow).is_ok());
    }

    #[test]
    fn rejects_long_flat_chains() {
        let sum = format!("{}x", "x+".repeat(100_000));
        let err = parse(&sum).unwrap_err();
        assert!(matches!(err, ExprError::Parse { ref what, .. } if what.contains("too deeply")));

        let product = format!("{}x", "x*".repeat(100_000));
        assert!(parse(&product).is_err());
        let mixed = format!("{}x", "x*x-".repeat(50_000));
        assert!(parse(&mixed).is_err());
    }

    #[test]
    fn ordinary_polynomials_fit_within_limit() {
        let poly = (0..40)
            .map(|k| format!("{k}*x^{k}"))
            .collect::<Vec<_>>()
            .join(" + ");
        let e = parse(&poly).unwrap();
        assert!(e.try_eval_grid(&[0.5]).is_ok());

        let chain = format!("{}x", "x+".repeat(200));
        assert_eq!(eval(&chain, 1.0), 201.0);
    }
}
