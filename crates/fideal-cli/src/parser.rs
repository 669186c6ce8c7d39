//! Recursive-descent parser for the hypothesis command language: both the
//! command words (`hyp`/`sub`/`app`/`end`) and the polynomial-expression
//! grammar they embed.

use crate::error::ParseError;
use crate::lexer;
use crate::token::{SpannedToken, Token};
use fideal_core::{Arena, PolyRef, Q};

/// A parsed, not-yet-executed command line.
#[derive(Debug, Clone)]
pub enum Command {
    /// `hyp expr [= expr ...]`: the raw list of parsed sides.
    Hyp(Vec<PolyRef>),
    /// `sub h<i> x<k> <expr>`.
    Sub { hyp_index: u32, var: u32, expr: PolyRef },
    /// `app h<i> <expr>`.
    App { hyp_index: u32, expr: PolyRef },
    /// `end` / `e`.
    End,
}

pub fn parse_command(arena: &mut Arena, line: &str) -> Result<Command, ParseError> {
    let toks = lexer::lex(line)?;
    let mut pos = 0usize;
    let head = match &toks[pos].token {
        Token::Ident(s) => s.clone(),
        _ => return Err(ParseError::new("expected a command", toks[pos].span)),
    };
    pos += 1;

    match head.as_str() {
        "hyp" | "h" => {
            let mut sides = vec![parse_expr(arena, &toks, &mut pos)?];
            while matches!(toks[pos].token, Token::Equal) {
                pos += 1;
                sides.push(parse_expr(arena, &toks, &mut pos)?);
            }
            expect_eof(&toks, pos)?;
            Ok(Command::Hyp(sides))
        }
        "sub" | "s" => {
            let hyp_index = expect_hyp_ref(&toks, &mut pos)?;
            let var = expect_var(&toks, &mut pos)?;
            let expr = parse_expr(arena, &toks, &mut pos)?;
            expect_eof(&toks, pos)?;
            Ok(Command::Sub { hyp_index, var, expr })
        }
        "app" | "a" => {
            let hyp_index = expect_hyp_ref(&toks, &mut pos)?;
            let expr = parse_expr(arena, &toks, &mut pos)?;
            expect_eof(&toks, pos)?;
            Ok(Command::App { hyp_index, expr })
        }
        "end" | "e" => {
            expect_eof(&toks, pos)?;
            Ok(Command::End)
        }
        other => Err(ParseError::new(
            format!("unknown command '{}'", other),
            toks[0].span,
        )),
    }
}

fn expect_hyp_ref(toks: &[SpannedToken], pos: &mut usize) -> Result<u32, ParseError> {
    match toks[*pos].token {
        Token::HypRef(i) => {
            *pos += 1;
            Ok(i)
        }
        _ => Err(ParseError::new("expected a hypothesis reference like h1", toks[*pos].span)),
    }
}

fn expect_var(toks: &[SpannedToken], pos: &mut usize) -> Result<u32, ParseError> {
    match toks[*pos].token {
        Token::Var(i) => {
            *pos += 1;
            Ok(i)
        }
        _ => Err(ParseError::new("expected a variable reference like x1", toks[*pos].span)),
    }
}

fn expect_eof(toks: &[SpannedToken], pos: usize) -> Result<(), ParseError> {
    match toks[pos].token {
        Token::Eof => Ok(()),
        _ => Err(ParseError::new("unexpected trailing input", toks[pos].span)),
    }
}

/// `expr := term (('+' | '-') term)*` with an optional leading sign on the
/// first term. Stops at the first token that cannot start or continue a
/// term (`=`, `)`, end of line).
fn parse_expr(arena: &mut Arena, toks: &[SpannedToken], pos: &mut usize) -> Result<PolyRef, ParseError> {
    let mut result = arena.zero_p();
    let mut first = true;
    loop {
        let sign: i64 = match toks[*pos].token {
            Token::Plus => {
                *pos += 1;
                1
            }
            Token::Minus => {
                *pos += 1;
                -1
            }
            _ if first => 1,
            _ => break,
        };
        first = false;
        let term = parse_term(arena, toks, pos, sign)?;
        result = fideal_core::algebra::add(arena, result, term);
        if !matches!(toks[*pos].token, Token::Plus | Token::Minus) {
            break;
        }
    }
    Ok(result)
}

/// `term := coefficient? factor*`, scaled by `sign`.
fn parse_term(
    arena: &mut Arena,
    toks: &[SpannedToken],
    pos: &mut usize,
    sign: i64,
) -> Result<PolyRef, ParseError> {
    let coeff = parse_coefficient(toks, pos)?;
    let mut product = arena.one_p();
    while starts_factor(&toks[*pos].token) {
        let factor = parse_factor(arena, toks, pos)?;
        product = fideal_core::algebra::mul(arena, product, factor);
    }
    let c = if sign < 0 { -coeff } else { coeff };
    Ok(fideal_core::algebra::scale(arena, &c, product))
}

fn starts_factor(t: &Token) -> bool {
    matches!(t, Token::Var(_) | Token::Fun | Token::LParen)
}

/// Optional integer or `a/b` rational; defaults to 1 when no digits are
/// present (the "empty coefficient string means +1" rule).
fn parse_coefficient(toks: &[SpannedToken], pos: &mut usize) -> Result<Q, ParseError> {
    match toks[*pos].token {
        Token::Int(n) => {
            *pos += 1;
            if matches!(toks[*pos].token, Token::Slash) {
                *pos += 1;
                match toks[*pos].token {
                    Token::Int(d) => {
                        *pos += 1;
                        Ok(Q::from((n, d)))
                    }
                    _ => Err(ParseError::new("expected denominator after '/'", toks[*pos].span)),
                }
            } else {
                Ok(Q::from(n))
            }
        }
        _ => Ok(Q::one()),
    }
}

fn parse_factor(arena: &mut Arena, toks: &[SpannedToken], pos: &mut usize) -> Result<PolyRef, ParseError> {
    match toks[*pos].token {
        Token::Var(i) => {
            *pos += 1;
            let node = arena.node_var(i);
            let m = arena.mononode(vec![(node, 1)]);
            Ok(arena.polynode(vec![(m, Q::one())]))
        }
        Token::Fun => {
            *pos += 1;
            expect_lparen(toks, pos)?;
            let inner = parse_expr(arena, toks, pos)?;
            expect_rparen(toks, pos)?;
            let node = arena.node_fun(inner);
            let m = arena.mononode(vec![(node, 1)]);
            Ok(arena.polynode(vec![(m, Q::one())]))
        }
        Token::LParen => {
            *pos += 1;
            let inner = parse_expr(arena, toks, pos)?;
            expect_rparen(toks, pos)?;
            Ok(inner)
        }
        _ => Err(ParseError::new("expected x<i>, f(...), or (...)", toks[*pos].span)),
    }
}

fn expect_lparen(toks: &[SpannedToken], pos: &mut usize) -> Result<(), ParseError> {
    match toks[*pos].token {
        Token::LParen => {
            *pos += 1;
            Ok(())
        }
        _ => Err(ParseError::new("expected '(' after f", toks[*pos].span)),
    }
}

fn expect_rparen(toks: &[SpannedToken], pos: &mut usize) -> Result<(), ParseError> {
    match toks[*pos].token {
        Token::RParen => {
            *pos += 1;
            Ok(())
        }
        _ => Err(ParseError::new("expected ')'", toks[*pos].span)),
    }
}
