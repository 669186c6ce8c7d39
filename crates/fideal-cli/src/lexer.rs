//! Lexer for the hypothesis command language.
//!
//! A single scan serves both command words (`hyp`, `sub h1 x2 ...`) and
//! expression text (`x1 + f(2 x1)`): whitespace and `*` are skipped
//! entirely (juxtaposition already means multiplication), everything else
//! is lowercased before matching.

use crate::error::ParseError;
use crate::token::{Span, SpannedToken, Token};

pub fn lex(line: &str) -> Result<Vec<SpannedToken>, ParseError> {
    let lower = line.to_lowercase();
    let bytes = lower.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i] as char;
        match c {
            ' ' | '\t' | '\r' | '\n' | '*' => {
                i += 1;
            }
            '+' => {
                out.push(tok(Token::Plus, i, i + 1));
                i += 1;
            }
            '-' => {
                out.push(tok(Token::Minus, i, i + 1));
                i += 1;
            }
            '/' => {
                out.push(tok(Token::Slash, i, i + 1));
                i += 1;
            }
            '(' => {
                out.push(tok(Token::LParen, i, i + 1));
                i += 1;
            }
            ')' => {
                out.push(tok(Token::RParen, i, i + 1));
                i += 1;
            }
            '=' => {
                out.push(tok(Token::Equal, i, i + 1));
                i += 1;
            }
            '0'..='9' => {
                let start = i;
                while i < bytes.len() && (bytes[i] as char).is_ascii_digit() {
                    i += 1;
                }
                let n: i64 = lower[start..i]
                    .parse()
                    .map_err(|_| ParseError::new("integer literal too large", Span::new(start, i)))?;
                out.push(tok(Token::Int(n), start, i));
            }
            'x' | 'h' if i + 1 < bytes.len() && (bytes[i + 1] as char).is_ascii_digit() => {
                let start = i;
                let is_var = c == 'x';
                i += 1;
                let digit_start = i;
                while i < bytes.len() && (bytes[i] as char).is_ascii_digit() {
                    i += 1;
                }
                let idx: u32 = lower[digit_start..i]
                    .parse()
                    .map_err(|_| ParseError::new("index too large", Span::new(start, i)))?;
                let token = if is_var { Token::Var(idx) } else { Token::HypRef(idx) };
                out.push(tok(token, start, i));
            }
            'f' if !next_is_ident_char(bytes, i + 1) => {
                out.push(tok(Token::Fun, i, i + 1));
                i += 1;
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < bytes.len() && is_ident_char(bytes[i] as char) {
                    i += 1;
                }
                out.push(tok(Token::Ident(lower[start..i].to_string()), start, i));
            }
            other => {
                return Err(ParseError::new(
                    format!("unexpected character '{}'", other),
                    Span::new(i, i + 1),
                ));
            }
        }
    }
    let eof_pos = bytes.len();
    out.push(tok(Token::Eof, eof_pos, eof_pos));
    Ok(out)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn next_is_ident_char(bytes: &[u8], i: usize) -> bool {
    i < bytes.len() && is_ident_char(bytes[i] as char)
}

fn tok(token: Token, start: usize, end: usize) -> SpannedToken {
    SpannedToken {
        token,
        span: Span::new(start, end),
    }
}
