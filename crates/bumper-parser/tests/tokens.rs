//! Lexer tests for the Bumper front end.

use bumper_parser::{
    tokenize, IdentifierPolicy, Lexer, LexerErrorCode, SourceBuffer, Token, TokenType,
};

fn buffer(source: &str) -> SourceBuffer {
    SourceBuffer::new("test.bs", source)
}

fn lex(source: &str) -> Vec<Token> {
    tokenize(&buffer(source)).expect("lexing should succeed")
}

fn kinds(source: &str) -> Vec<TokenType> {
    lex(source).iter().map(|token| token.kind).collect()
}

fn lexemes(source: &str) -> Vec<String> {
    lex(source)
        .iter()
        .map(|token| token.lexeme().to_owned())
        .collect()
}

fn lex_error(source: &str) -> bumper_parser::LexerError {
    tokenize(&buffer(source)).expect_err("lexing should fail")
}

// Keywords

#[test]
fn keywords_declarations() {
    assert_eq!(
        kinds("function let mutable const mod namespace export restricted\n"),
        vec![
            TokenType::Function,
            TokenType::Let,
            TokenType::Mutable,
            TokenType::Const,
            TokenType::Mod,
            TokenType::Namespace,
            TokenType::Export,
            TokenType::Restricted,
            TokenType::EndOfFile,
        ]
    );
}

#[test]
fn keywords_control_flow() {
    assert_eq!(
        kinds("if else loop break continue while do for return label goto\n"),
        vec![
            TokenType::If,
            TokenType::Else,
            TokenType::Loop,
            TokenType::Break,
            TokenType::Continue,
            TokenType::While,
            TokenType::Do,
            TokenType::For,
            TokenType::Return,
            TokenType::Label,
            TokenType::Goto,
            TokenType::EndOfFile,
        ]
    );
}

#[test]
fn keywords_operators() {
    assert_eq!(
        kinds("and or not xor\n"),
        vec![
            TokenType::And,
            TokenType::Or,
            TokenType::Not,
            TokenType::Xor,
            TokenType::EndOfFile,
        ]
    );
}

#[test]
fn keywords_types_and_intrinsics() {
    assert_eq!(
        kinds("type struct import type_size value_size dump_registers bsm\n"),
        vec![
            TokenType::Type,
            TokenType::Struct,
            TokenType::Import,
            TokenType::TypeSize,
            TokenType::ValueSize,
            TokenType::DumpRegisters,
            TokenType::InlineAssembly,
            TokenType::EndOfFile,
        ]
    );
}

#[test]
fn keyword_literals() {
    assert_eq!(
        kinds("true false nothing\n"),
        vec![
            TokenType::BoolLiteral,
            TokenType::BoolLiteral,
            TokenType::NothingLiteral,
            TokenType::EndOfFile,
        ]
    );
}

#[test]
fn capitalized_function_is_its_own_keyword() {
    assert_eq!(
        kinds("Function function\n"),
        vec![
            TokenType::CapitalizedFunction,
            TokenType::Function,
            TokenType::EndOfFile,
        ]
    );
}

#[test]
fn keyword_matching_is_exact_text() {
    // A trailing character turns a keyword into an identifier; there is no
    // re-derivation later.
    assert_eq!(
        kinds("function1 functioN\n"),
        vec![
            TokenType::Identifier,
            TokenType::Identifier,
            TokenType::EndOfFile,
        ]
    );
}

// Punctuation

#[test]
fn two_character_punctuation() {
    assert_eq!(
        kinds("-> ~> != :: >= <= ==\n"),
        vec![
            TokenType::Arrow,
            TokenType::TildeArrow,
            TokenType::ExclamationMarkEquals,
            TokenType::DoubleColon,
            TokenType::GreaterOrEquals,
            TokenType::LessOrEquals,
            TokenType::EqualsEquals,
            TokenType::EndOfFile,
        ]
    );
}

#[test]
fn single_character_punctuation() {
    assert_eq!(
        kinds("- : , ; + * / ( ) { } [ ] = . ! > < @\n"),
        vec![
            TokenType::Minus,
            TokenType::Colon,
            TokenType::Comma,
            TokenType::Semicolon,
            TokenType::Plus,
            TokenType::Asterisk,
            TokenType::ForwardSlash,
            TokenType::LeftParenthesis,
            TokenType::RightParenthesis,
            TokenType::LeftCurlyBracket,
            TokenType::RightCurlyBracket,
            TokenType::LeftSquareBracket,
            TokenType::RightSquareBracket,
            TokenType::Equals,
            TokenType::Dot,
            TokenType::ExclamationMark,
            TokenType::GreaterThan,
            TokenType::LessThan,
            TokenType::At,
            TokenType::EndOfFile,
        ]
    );
}

#[test]
fn longest_match_wins_over_shorter_prefix() {
    // "!=" is one token, never "!" followed by "=".
    assert_eq!(
        kinds("!=\n"),
        vec![TokenType::ExclamationMarkEquals, TokenType::EndOfFile]
    );
    assert_eq!(
        kinds("!==\n"),
        vec![
            TokenType::ExclamationMarkEquals,
            TokenType::Equals,
            TokenType::EndOfFile,
        ]
    );
    assert_eq!(
        kinds(":::\n"),
        vec![TokenType::DoubleColon, TokenType::Colon, TokenType::EndOfFile]
    );
    assert_eq!(
        kinds("->-\n"),
        vec![TokenType::Arrow, TokenType::Minus, TokenType::EndOfFile]
    );
}

#[test]
fn lone_comment_closer_is_ordinary_punctuation() {
    // An un-nested "*/" is not a comment and not an error.
    assert_eq!(
        kinds("*/\n"),
        vec![
            TokenType::Asterisk,
            TokenType::ForwardSlash,
            TokenType::EndOfFile,
        ]
    );
}

// Comments

#[test]
fn line_comments_are_elided() {
    assert_eq!(kinds("// just a comment\n"), vec![TokenType::EndOfFile]);
    assert_eq!(
        kinds("let // trailing\nx\n"),
        vec![TokenType::Let, TokenType::Identifier, TokenType::EndOfFile]
    );
}

#[test]
fn block_comments_nest() {
    assert_eq!(kinds("/* a /* b */ c */\n"), vec![TokenType::EndOfFile]);
}

#[test]
fn unterminated_block_comment_is_anchored_at_the_opening() {
    // The inner comment closes; the outer one does not. The error points
    // at the outer "/*", not at the end of input.
    let error = lex_error("/* a /* b */\n");
    assert_eq!(error.code, LexerErrorCode::UnterminatedComment);
    assert_eq!(error.location.line_number(), 1);
    assert_eq!(error.location.column_number(), 1);
    assert_eq!(error.location.lexeme(), "/*");
}

// Character literals

#[test]
fn char_literals() {
    assert_eq!(
        kinds("'a' ' ' '~'\n"),
        vec![
            TokenType::CharLiteral,
            TokenType::CharLiteral,
            TokenType::CharLiteral,
            TokenType::EndOfFile,
        ]
    );
    assert_eq!(
        lexemes("'\\n' '\\'' '\\\\'\n"),
        vec!["'\\n'", "'\\''", "'\\\\'", "\n"]
    );
}

#[test]
fn empty_char_literal_is_invalid_input() {
    let error = lex_error("''\n");
    assert_eq!(error.code, LexerErrorCode::InvalidInput);
}

#[test]
fn unknown_escape_is_invalid_input() {
    let error = lex_error("'\\q'\n");
    assert_eq!(error.code, LexerErrorCode::InvalidInput);
}

// Integer literals

#[test]
fn integer_literals() {
    assert_eq!(
        kinds("0 123 0x1F 0o17 0b1010 1_000_000\n"),
        vec![
            TokenType::U32Literal,
            TokenType::U32Literal,
            TokenType::U32Literal,
            TokenType::U32Literal,
            TokenType::U32Literal,
            TokenType::U32Literal,
            TokenType::EndOfFile,
        ]
    );
}

#[test]
fn bare_radix_prefix_falls_back_to_decimal_zero() {
    // "0x" with no hex digit after it: the "0" lexes as a decimal literal
    // and "x" as an identifier.
    assert_eq!(
        lexemes("0x\n"),
        vec!["0", "x", "\n"]
    );
    assert_eq!(
        kinds("0x\n"),
        vec![
            TokenType::U32Literal,
            TokenType::Identifier,
            TokenType::EndOfFile,
        ]
    );
}

#[test]
fn trailing_digit_separator_is_part_of_the_lexeme() {
    assert_eq!(lexemes("123_\n"), vec!["123_", "\n"]);
}

// Identifiers

#[test]
fn identifiers_and_keyword_lookup() {
    let tokens = lex("main value_1 функция\n");
    assert_eq!(
        tokens.iter().map(|token| token.kind).collect::<Vec<_>>(),
        vec![
            TokenType::Identifier,
            TokenType::Identifier,
            TokenType::Identifier,
            TokenType::EndOfFile,
        ]
    );
    assert_eq!(tokens[2].lexeme(), "функция");
}

#[test]
fn leading_underscore_is_not_an_identifier() {
    // XID_Start does not include '_'.
    let error = lex_error("_main\n");
    assert_eq!(error.code, LexerErrorCode::InvalidInput);
}

#[test]
fn identifier_policy_controls_the_non_ascii_fallback() {
    // An emoji is not XID but is non-ASCII: accepted by the default
    // policy, rejected by the strict one.
    let accepted = Lexer::with_identifier_policy(buffer("🚗\n"), IdentifierPolicy::XidOrNonAscii)
        .tokenize()
        .expect("default policy accepts non-ASCII");
    assert_eq!(accepted[0].kind, TokenType::Identifier);

    let rejected =
        Lexer::with_identifier_policy(buffer("🚗\n"), IdentifierPolicy::XidOnly).tokenize();
    assert_eq!(
        rejected.expect_err("strict policy rejects non-ASCII").code,
        LexerErrorCode::InvalidInput
    );
}

// Preconditions and end of file

#[test]
fn missing_trailing_newline_is_reported() {
    let error = lex_error("function");
    assert_eq!(error.code, LexerErrorCode::MissingNewlineAtEndOfSourceCode);
}

#[test]
fn empty_buffer_is_missing_its_newline() {
    let error = lex_error("");
    assert_eq!(error.code, LexerErrorCode::MissingNewlineAtEndOfSourceCode);
}

#[test]
fn end_of_file_spans_the_final_byte() {
    let source = "let x\n";
    let tokens = lex(source);
    let eof = tokens.last().unwrap();
    assert_eq!(eof.kind, TokenType::EndOfFile);
    assert_eq!(eof.location.span().range(), source.len() - 1..source.len());
    assert_eq!(eof.lexeme(), "\n");
    let eof_count = tokens
        .iter()
        .filter(|token| token.kind == TokenType::EndOfFile)
        .count();
    assert_eq!(eof_count, 1);
}

#[test]
fn invalid_utf8_is_reported_at_the_offending_byte() {
    let error = tokenize(&SourceBuffer::new("test.bs", vec![b'a', b' ', 0xFF, b'\n']))
        .expect_err("invalid UTF-8 should fail");
    assert_eq!(error.code, LexerErrorCode::InvalidInput);
    assert_eq!(error.location.span().start, 2);
}

// Source location accounting

#[test]
fn spans_are_lossless() {
    // Concatenating every lexeme plus the discarded gaps reconstructs the
    // source exactly.
    let source = "function main() { // comment\n/* block */ }\n";
    let tokens = lex(source);
    let mut rebuilt = String::new();
    let mut previous_end = 0;
    for token in &tokens {
        let span = token.location.span();
        assert!(span.start >= previous_end, "token spans must not overlap");
        rebuilt.push_str(&source[previous_end..span.start]);
        rebuilt.push_str(token.lexeme());
        previous_end = span.end;
    }
    rebuilt.push_str(&source[previous_end..]);
    assert_eq!(rebuilt, source);
}

#[test]
fn columns_count_display_width_not_bytes() {
    // "你好" is 6 bytes and 2 codepoints but 4 terminal columns wide, so
    // the following token starts at column 6 (4 + 1 space + 1).
    let tokens = lex("你好 function\n");
    assert_eq!(tokens[0].kind, TokenType::Identifier);
    assert_eq!(tokens[0].location.column_number(), 1);
    assert_eq!(tokens[1].kind, TokenType::Function);
    assert_eq!(tokens[1].location.column_number(), 6);
}

#[test]
fn line_numbers_follow_newlines() {
    let tokens = lex("let\n\nx\n");
    assert_eq!(tokens[0].location.line_number(), 1);
    assert_eq!(tokens[1].location.line_number(), 3);
}
