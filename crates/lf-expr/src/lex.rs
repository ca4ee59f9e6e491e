//! Tokenizer for the expression language.

use crate::error::{ExprError, ExprResult};
use lf_core::Real;

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Number(Real),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    /// `^` or `**`
    Caret,
    LParen,
    RParen,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub pos: usize,
}

/// Split `input` into tokens. Whitespace is skipped.
pub fn tokenize(input: &str) -> ExprResult<Vec<Token>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;

        let kind = match c {
            b' ' | b'\t' | b'\n' | b'\r' => {
                i += 1;
                continue;
            }
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' if bytes.get(i + 1) == Some(&b'*') => {
                i += 1;
                TokenKind::Caret
            }
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'^' => TokenKind::Caret,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'0'..=b'9' | b'.' => {
                i = scan_number(bytes, i);
                let text = &input[start..i];
                let value = text
                    .parse::<Real>()
                    .map_err(|_| ExprError::parse(start, format!("invalid number '{text}'")))?;
                tokens.push(Token {
                    kind: TokenKind::Number(value),
                    pos: start,
                });
                continue;
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                tokens.push(Token {
                    kind: TokenKind::Ident(input[start..i].to_ascii_lowercase()),
                    pos: start,
                });
                continue;
            }
            _ => {
                let ch = input[start..].chars().next().unwrap_or('?');
                return Err(ExprError::parse(start, format!("unexpected character '{ch}'")));
            }
        };

        tokens.push(Token { kind, pos: start });
        i += 1;
    }

    Ok(tokens)
}

/// Digits, an optional fraction and an optional exponent.
fn scan_number(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
        i += 1;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn operators_and_power_spellings() {
        assert_eq!(
            kinds("x**2 ^ 3"),
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::Caret,
                TokenKind::Number(2.0),
                TokenKind::Caret,
                TokenKind::Number(3.0),
            ]
        );
    }

    #[test]
    fn numbers_with_exponent() {
        assert_eq!(kinds("1.5e-3"), vec![TokenKind::Number(1.5e-3)]);
        assert_eq!(kinds(".25"), vec![TokenKind::Number(0.25)]);
    }

    #[test]
    fn e_after_number_without_digits_is_identifier() {
        // "2e" is the number 2 followed by the constant e
        assert_eq!(
            kinds("2e"),
            vec![TokenKind::Number(2.0), TokenKind::Ident("e".into())]
        );
    }

    #[test]
    fn identifiers_are_lowercased() {
        assert_eq!(kinds("SIN"), vec![TokenKind::Ident("sin".into())]);
    }

    #[test]
    fn positions_are_byte_offsets() {
        let tokens = tokenize("  x + 10").unwrap();
        let positions: Vec<usize> = tokens.iter().map(|t| t.pos).collect();
        assert_eq!(positions, vec![2, 4, 6]);
    }

    #[test]
    fn rejects_unknown_characters() {
        let err = tokenize("x; import os").unwrap_err();
        assert_eq!(
            err,
            ExprError::Parse {
                pos: 1,
                what: "unexpected character ';'".into()
            }
        );
        assert!(tokenize("1..2").is_err());
    }
}
