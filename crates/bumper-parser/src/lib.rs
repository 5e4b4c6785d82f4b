//! Front end of the Bumper compiler.
//!
//! Turns raw UTF-8 source text into a validated token stream and then into
//! an abstract syntax tree:
//!
//! ```text
//! SourceBuffer -> Lexer -> Vec<Token> -> Parser -> Program
//! ```
//!
//! The lexer fails fast, since an undecodable byte invalidates every subsequent
//! offset, so at most one lexer error is reported. The parser instead
//! recovers at statement boundaries and accumulates errors, so every
//! independently-recoverable mistake in a file is reported in one pass.
//!
//! ```
//! use bumper_parser::{parse, tokenize, SourceBuffer};
//!
//! let buffer = SourceBuffer::new("demo.bs", "import std::io;\n");
//! let tokens = tokenize(&buffer).unwrap();
//! let program = parse(tokens).unwrap();
//! assert_eq!(program.imports.len(), 1);
//! ```

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod token;

pub use lexer::{tokenize, IdentifierPolicy, Lexer, LexerError, LexerErrorCode};
pub use parser::{parse, Parser, ParserError, ParserErrorCode};
pub use source::{SourceBuffer, SourceLocation, Span};
pub use token::{Token, TokenType};
