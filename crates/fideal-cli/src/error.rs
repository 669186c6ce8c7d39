//! Error types for the hypothesis command language parser.
//!
//! Provides [`ParseError`] with caret-style error rendering. These are
//! always recoverable -- the offending line is discarded, the error is
//! rendered to the error stream, and processing continues.

use crate::token::Span;
use std::fmt;

#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    /// Render with a caret pointing to the error location, e.g.:
    /// ```text
    /// Error: unexpected token
    ///   sub h7 x1 0
    ///       ^
    /// ```
    pub fn render(&self, source: &str) -> String {
        let spaces = " ".repeat(self.span.start + 2);
        format!(" Error: {}\n  {}\n{}^", self.message, source, spaces)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " Error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}
