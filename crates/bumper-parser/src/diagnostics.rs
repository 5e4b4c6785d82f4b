//! Rendering of lexer and parser errors as terminal diagnostics.
//!
//! The error types themselves carry the `filename:line:column`/kind/lexeme
//! contract; this module maps them onto `codespan-reporting` diagnostics
//! so callers get source snippets and carets for free.

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFile;
use codespan_reporting::term;
use termcolor::WriteColor;

use crate::lexer::{LexerError, LexerErrorCode};
use crate::parser::ParserError;
use crate::source::SourceBuffer;

/// Map a lexer error to a renderable diagnostic.
pub fn lexer_error_diagnostic(error: &LexerError) -> Diagnostic<()> {
    let message = match error.code {
        LexerErrorCode::InvalidInput => "invalid input",
        LexerErrorCode::MissingNewlineAtEndOfSourceCode => {
            "source code does not end with a newline"
        }
        LexerErrorCode::UnterminatedComment => "unterminated multi-line comment",
    };
    Diagnostic::error()
        .with_code(format!("{:?}", error.code))
        .with_message(message)
        .with_labels(vec![Label::primary((), error.location.span().range())])
}

/// Map a parse error to a renderable diagnostic.
pub fn parser_error_diagnostic(error: &ParserError) -> Diagnostic<()> {
    let message = match error.expected {
        Some(expected) => format!(
            "unexpected token {:?}, expected {:?}",
            error.found, expected
        ),
        None => format!("unexpected token {:?}", error.found),
    };
    let mut label = Label::primary((), error.location.span().range());
    if let Some(expected) = error.expected {
        label = label.with_message(format!("expected {expected:?}"));
    }
    Diagnostic::error()
        .with_code(format!("{:?}", error.code))
        .with_message(message)
        .with_labels(vec![label])
}

/// Emit diagnostics against the buffer they point into.
///
/// The source is decoded lossily for display, because lexer errors can point at
/// bytes that are not valid UTF-8.
pub fn emit_diagnostics(
    writer: &mut dyn WriteColor,
    buffer: &SourceBuffer,
    diagnostics: &[Diagnostic<()>],
) -> Result<(), codespan_reporting::files::Error> {
    let file = SimpleFile::new(
        buffer.filename().to_owned(),
        String::from_utf8_lossy(buffer.bytes()).into_owned(),
    );
    let config = term::Config::default();
    for diagnostic in diagnostics {
        term::emit(writer, &config, &file, diagnostic)?;
    }
    Ok(())
}
