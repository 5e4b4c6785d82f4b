//! Parse error types.

use std::fmt;

use crate::source::SourceLocation;
use crate::token::{Token, TokenType};

/// Parser error codes. Independent of the lexer's error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserErrorCode {
    /// A required token kind was not found at the cursor.
    UnexpectedToken,
}

/// A single parse error. The parser accumulates these across
/// synchronization points and surfaces the whole ordered list at the top
/// level, never just the first.
#[derive(Debug, Clone)]
pub struct ParserError {
    /// The offending token's location.
    pub location: SourceLocation,
    /// What went wrong.
    pub code: ParserErrorCode,
    /// The token kind that was actually at the cursor.
    pub found: TokenType,
    /// The token kind that was required there, when known.
    pub expected: Option<TokenType>,
}

impl ParserError {
    /// Create an "unexpected token" error for the token at the cursor.
    pub fn unexpected_token(token: &Token, expected: Option<TokenType>) -> Self {
        Self {
            location: token.location.clone(),
            code: ParserErrorCode::UnexpectedToken,
            found: token.kind,
            expected,
        }
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:?} (\"{}\")",
            self.location,
            self.code,
            self.location.lexeme()
        )?;
        if let Some(expected) = self.expected {
            write!(f, ", expected {expected:?}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParserError {}
