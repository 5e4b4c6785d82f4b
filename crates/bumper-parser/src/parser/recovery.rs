//! Error recovery for the parser.
//!
//! A failed grammar rule does not unwind the stack with a panic; it
//! returns the [`Synchronize`] marker up the call chain until a designated
//! recovery point observes it and resynchronizes the token cursor. This
//! bounds error cascades to one reported error per statement-ish unit.

use super::Parser;
use crate::token::TokenType;

/// Marker signalling "this rule failed, recover at the nearest recovery
/// point". The error itself has already been recorded by then.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Synchronize;

/// Result of a single grammar rule.
pub type ParseResult<T> = Result<T, Synchronize>;

/// Whether reporting an error also aborts the current grammar rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reporting {
    /// Record the error and unwind to the nearest recovery point.
    Abort,
    /// Record the error only; the caller decides whether to resynchronize.
    Record,
}

/// Discard tokens up to and including the next `;`, or to the end of
/// input, so parsing can resume with the next top-level construct.
pub fn synchronize(parser: &mut Parser) {
    while !parser.is_end_of_input() && !parser.current_is(TokenType::Semicolon) {
        parser.advance();
    }
    if parser.current_is(TokenType::Semicolon) {
        parser.advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::source::SourceBuffer;

    fn parser(source: &str) -> Parser {
        let buffer = SourceBuffer::new("test.bs", source);
        Parser::new(tokenize(&buffer).unwrap())
    }

    #[test]
    fn synchronize_consumes_through_the_next_semicolon() {
        let mut parser = parser("a b ; function\n");
        synchronize(&mut parser);
        assert!(parser.current_is(TokenType::Function));
    }

    #[test]
    fn synchronize_stops_at_end_of_input() {
        let mut parser = parser("a b c\n");
        synchronize(&mut parser);
        assert!(parser.is_end_of_input());
    }
}
