//! Lexer for the Bumper programming language.
//!
//! A hand-written single-pass scanner over the raw source bytes. Each
//! iteration tries a fixed list of rules in priority order and takes the
//! first that matches: whitespace, comments (line comments and nestable
//! block comments), a priority-ordered punctuation table, character and
//! integer literals, and finally identifiers with keyword lookup.
//!
//! The lexer fails fast: a scanning failure invalidates every subsequent
//! byte offset, so at most one error is produced and scanning stops.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use thiserror::Error;
use unicode_xid::UnicodeXID;

use crate::source::{SourceBuffer, SourceLocation, Span};
use crate::token::{Token, TokenType};

/// Fixed punctuation table, checked top to bottom; the first prefix match
/// wins. Longer lexemes come before shorter ones sharing a prefix
/// (`!=` before `!`, `->` before `-`, `::` before `:`).
const PUNCTUATION: &[(&str, TokenType)] = &[
    ("->", TokenType::Arrow),
    ("~>", TokenType::TildeArrow),
    ("!=", TokenType::ExclamationMarkEquals),
    ("::", TokenType::DoubleColon),
    (">=", TokenType::GreaterOrEquals),
    ("<=", TokenType::LessOrEquals),
    ("==", TokenType::EqualsEquals),
    ("-", TokenType::Minus),
    (":", TokenType::Colon),
    (",", TokenType::Comma),
    (";", TokenType::Semicolon),
    ("+", TokenType::Plus),
    ("*", TokenType::Asterisk),
    ("/", TokenType::ForwardSlash),
    ("(", TokenType::LeftParenthesis),
    (")", TokenType::RightParenthesis),
    ("{", TokenType::LeftCurlyBracket),
    ("}", TokenType::RightCurlyBracket),
    ("[", TokenType::LeftSquareBracket),
    ("]", TokenType::RightSquareBracket),
    ("=", TokenType::Equals),
    (".", TokenType::Dot),
    ("!", TokenType::ExclamationMark),
    (">", TokenType::GreaterThan),
    ("<", TokenType::LessThan),
    ("@", TokenType::At),
];

/// Reserved words, matched case-sensitively against a whole identifier.
const KEYWORDS: &[(&str, TokenType)] = &[
    ("dump_registers", TokenType::DumpRegisters),
    ("function", TokenType::Function),
    ("mod", TokenType::Mod),
    ("let", TokenType::Let),
    ("true", TokenType::BoolLiteral),
    ("false", TokenType::BoolLiteral),
    ("bsm", TokenType::InlineAssembly),
    ("import", TokenType::Import),
    ("namespace", TokenType::Namespace),
    ("and", TokenType::And),
    ("or", TokenType::Or),
    ("not", TokenType::Not),
    ("xor", TokenType::Xor),
    ("if", TokenType::If),
    ("else", TokenType::Else),
    ("loop", TokenType::Loop),
    ("break", TokenType::Break),
    ("continue", TokenType::Continue),
    ("while", TokenType::While),
    ("do", TokenType::Do),
    ("for", TokenType::For),
    ("mutable", TokenType::Mutable),
    ("const", TokenType::Const),
    ("return", TokenType::Return),
    ("label", TokenType::Label),
    ("goto", TokenType::Goto),
    ("nothing", TokenType::NothingLiteral),
    ("Function", TokenType::CapitalizedFunction),
    ("export", TokenType::Export),
    ("type_size", TokenType::TypeSize),
    ("value_size", TokenType::ValueSize),
    ("type", TokenType::Type),
    ("struct", TokenType::Struct),
    ("restricted", TokenType::Restricted),
];

static KEYWORD_TABLE: Lazy<FxHashMap<&'static str, TokenType>> =
    Lazy::new(|| KEYWORDS.iter().copied().collect());

/// What counts as an identifier beyond the Unicode `XID` classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentifierPolicy {
    /// `XID_Start`/`XID_Continue`, plus any non-ASCII codepoint.
    #[default]
    XidOrNonAscii,
    /// Strict `XID_Start`/`XID_Continue` only.
    XidOnly,
}

/// Lexer error codes. Independent of the parser's error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexerErrorCode {
    /// An undecodable byte sequence, or no lexing rule matched.
    InvalidInput,
    /// The input buffer violated the trailing-newline precondition.
    MissingNewlineAtEndOfSourceCode,
    /// A nested block comment was still open at end of input.
    UnterminatedComment,
}

/// A fatal lexer error. At most one is produced per `tokenize` call.
#[derive(Debug, Clone, Error)]
#[error("{}: {:?} (\"{}\")", .location, .code, .location.lexeme_lossy())]
pub struct LexerError {
    /// Where scanning failed. For `UnterminatedComment` this is the
    /// opening `/*`, not the end of input.
    pub location: SourceLocation,
    /// What went wrong.
    pub code: LexerErrorCode,
}

/// Tokenize `buffer` with the default identifier policy.
pub fn tokenize(buffer: &SourceBuffer) -> Result<Vec<Token>, LexerError> {
    Lexer::new(buffer.clone()).tokenize()
}

/// Scanner state: the shared buffer plus a byte cursor.
pub struct Lexer {
    buffer: SourceBuffer,
    index: usize,
    policy: IdentifierPolicy,
    tokens: Vec<Token>,
}

impl Lexer {
    /// Create a lexer with the default [`IdentifierPolicy`].
    pub fn new(buffer: SourceBuffer) -> Self {
        Self::with_identifier_policy(buffer, IdentifierPolicy::default())
    }

    /// Create a lexer with an explicit identifier policy.
    pub fn with_identifier_policy(buffer: SourceBuffer, policy: IdentifierPolicy) -> Self {
        Self {
            buffer,
            index: 0,
            policy,
            tokens: Vec::new(),
        }
    }

    /// Scan the whole buffer into a token sequence ending in `EndOfFile`.
    ///
    /// The buffer must be non-empty and end with a newline; that sentinel
    /// byte gives the `EndOfFile` token (and every "ran out of input"
    /// diagnostic) a valid one-byte span.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexerError> {
        if self.buffer.bytes().last() != Some(&b'\n') {
            let end = self.buffer.len();
            let span = Span::new(end.saturating_sub(1), end);
            return Err(LexerError {
                location: SourceLocation::new(self.buffer.clone(), span),
                code: LexerErrorCode::MissingNewlineAtEndOfSourceCode,
            });
        }

        while !self.is_end_of_input() {
            let Some(codepoint) = first_codepoint(self.remaining()) else {
                return Err(self.error_at(LexerErrorCode::InvalidInput, 1));
            };

            if matches!(self.current(), b' ' | b'\t' | b'\r' | b'\n') {
                self.advance(1);
                continue;
            }

            if self.remaining().starts_with(b"//") {
                while !self.is_end_of_input() && self.current() != b'\n' {
                    self.advance(1);
                }
                continue;
            }

            // Nestable block comments. This must run before the punctuation
            // table, where a lone `/` would match first.
            if self.remaining().starts_with(b"/*") {
                let opening = self.location(2);
                self.advance(2);
                let mut nesting_level = 1usize;
                while !self.is_end_of_input() {
                    if self.remaining().starts_with(b"/*") {
                        self.advance(2);
                        nesting_level += 1;
                        continue;
                    }
                    if self.remaining().starts_with(b"*/") {
                        self.advance(2);
                        nesting_level -= 1;
                        if nesting_level == 0 {
                            break;
                        }
                        continue;
                    }
                    self.advance(1);
                }
                if nesting_level != 0 {
                    return Err(LexerError {
                        location: opening,
                        code: LexerErrorCode::UnterminatedComment,
                    });
                }
                continue;
            }

            if let Some(&(lexeme, kind)) = PUNCTUATION
                .iter()
                .find(|(lexeme, _)| self.remaining().starts_with(lexeme.as_bytes()))
            {
                self.push_token(kind, lexeme.len());
                continue;
            }

            if let Some(length) = scan_char_literal(self.remaining()) {
                self.push_token(TokenType::CharLiteral, length);
                continue;
            }

            if let Some(length) = scan_integer_literal(self.remaining()) {
                self.push_token(TokenType::U32Literal, length);
                continue;
            }

            if let Some(length) = scan_identifier(self.remaining(), self.policy) {
                let text = std::str::from_utf8(&self.buffer.bytes()[self.index..self.index + length])
                    .expect("identifier bytes are valid UTF-8");
                let kind = KEYWORD_TABLE
                    .get(text)
                    .copied()
                    .unwrap_or(TokenType::Identifier);
                self.push_token(kind, length);
                continue;
            }

            return Err(self.error_at(LexerErrorCode::InvalidInput, codepoint.len_utf8()));
        }

        // EndOfFile spans the final byte, the guaranteed trailing newline.
        let end = self.buffer.len();
        let location = SourceLocation::new(self.buffer.clone(), Span::new(end - 1, end));
        self.tokens.push(Token::new(location, TokenType::EndOfFile));

        Ok(self.tokens)
    }

    fn remaining(&self) -> &[u8] {
        &self.buffer.bytes()[self.index..]
    }

    fn current(&self) -> u8 {
        self.buffer.bytes()[self.index]
    }

    fn is_end_of_input(&self) -> bool {
        self.index >= self.buffer.len()
    }

    fn advance(&mut self, amount: usize) {
        self.index += amount;
    }

    fn location(&self, length: usize) -> SourceLocation {
        let end = (self.index + length).min(self.buffer.len());
        SourceLocation::new(self.buffer.clone(), Span::new(self.index, end))
    }

    fn push_token(&mut self, kind: TokenType, length: usize) {
        let location = self.location(length);
        self.tokens.push(Token::new(location, kind));
        self.advance(length);
    }

    fn error_at(&self, code: LexerErrorCode, length: usize) -> LexerError {
        LexerError {
            location: self.location(length),
            code,
        }
    }
}

/// Decode the first UTF-8 codepoint of `bytes`, if a valid one exists.
fn first_codepoint(bytes: &[u8]) -> Option<char> {
    let take = bytes.len().min(4);
    for length in 1..=take {
        if let Ok(text) = std::str::from_utf8(&bytes[..length]) {
            return text.chars().next();
        }
    }
    None
}

/// A character literal: a quote, one escaped or literal printable ASCII
/// character, and a closing quote. Returns the matched byte length.
/// No value decoding happens here.
fn scan_char_literal(bytes: &[u8]) -> Option<usize> {
    if bytes.first() != Some(&b'\'') {
        return None;
    }
    match bytes.get(1)? {
        b'\\' => {
            match bytes.get(2)? {
                b'\'' | b'\\' | b'n' | b't' | b'v' | b'f' | b'r' | b'0' => {}
                _ => return None,
            }
            (bytes.get(3)? == &b'\'').then_some(4)
        }
        byte if (b' '..=b'~').contains(byte) && *byte != b'\\' => {
            (bytes.get(2)? == &b'\'').then_some(3)
        }
        _ => None,
    }
}

fn is_octal_digit(byte: u8) -> bool {
    (b'0'..=b'7').contains(&byte)
}

fn is_hex_digit(byte: u8) -> bool {
    byte.is_ascii_hexdigit()
}

fn is_binary_digit(byte: u8) -> bool {
    byte == b'0' || byte == b'1'
}

fn is_decimal_digit(byte: u8) -> bool {
    byte.is_ascii_digit()
}

/// One or more digit groups, each optionally followed by a single `_`
/// separator. A trailing `_` is part of the lexeme.
fn digit_run(bytes: &[u8], is_digit: fn(u8) -> bool) -> usize {
    let mut index = 0;
    loop {
        let digits_start = index;
        while bytes.get(index).is_some_and(|&byte| is_digit(byte)) {
            index += 1;
        }
        if index == digits_start {
            break;
        }
        if bytes.get(index) == Some(&b'_') {
            index += 1;
        } else {
            break;
        }
    }
    index
}

/// An integer literal: `0o` octal, `0x` hex, `0b` binary (tried in that
/// order), or a decimal digit run. Returns the matched byte length; the
/// value is reparsed later, not here.
fn scan_integer_literal(bytes: &[u8]) -> Option<usize> {
    let prefixed: [(&[u8], fn(u8) -> bool); 3] = [
        (b"0o", is_octal_digit),
        (b"0x", is_hex_digit),
        (b"0b", is_binary_digit),
    ];
    for (prefix, is_digit) in prefixed {
        if bytes.starts_with(prefix) {
            let run = digit_run(&bytes[prefix.len()..], is_digit);
            if run > 0 {
                return Some(prefix.len() + run);
            }
        }
    }
    match digit_run(bytes, is_decimal_digit) {
        0 => None,
        run => Some(run),
    }
}

fn is_identifier_start(codepoint: char, policy: IdentifierPolicy) -> bool {
    codepoint.is_xid_start()
        || (policy == IdentifierPolicy::XidOrNonAscii && !codepoint.is_ascii())
}

fn is_identifier_continue(codepoint: char, policy: IdentifierPolicy) -> bool {
    codepoint.is_xid_continue()
        || (policy == IdentifierPolicy::XidOrNonAscii && !codepoint.is_ascii())
}

/// An identifier per the configured policy. Returns the matched byte
/// length; keyword lookup is the caller's job.
fn scan_identifier(bytes: &[u8], policy: IdentifierPolicy) -> Option<usize> {
    let first = first_codepoint(bytes)?;
    if !is_identifier_start(first, policy) {
        return None;
    }
    let mut length = first.len_utf8();
    while let Some(next) = first_codepoint(&bytes[length..]) {
        if !is_identifier_continue(next, policy) {
            break;
        }
        length += next.len_utf8();
    }
    Some(length)
}
