//! Source buffer and location model.
//!
//! The entire front end shares one immutable source buffer. Tokens, AST
//! nodes, and diagnostics hold a cheap handle to it plus a byte span;
//! line and column numbers are derived lazily from the span instead of
//! being stored per token.

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use unicode_width::UnicodeWidthChar;

#[derive(Debug)]
struct BufferInner {
    filename: String,
    bytes: Vec<u8>,
}

/// Shared immutable handle to a single source file's raw bytes.
///
/// Cloning is cheap (reference counted). The bytes are not required to be
/// valid UTF-8 at construction time; the lexer validates them
/// codepoint-by-codepoint and reports the first undecodable offset.
#[derive(Debug, Clone)]
pub struct SourceBuffer {
    inner: Arc<BufferInner>,
}

impl SourceBuffer {
    /// Create a new buffer from a diagnostic filename and raw source bytes.
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            inner: Arc::new(BufferInner {
                filename: filename.into(),
                bytes: bytes.into(),
            }),
        }
    }

    /// The filename used in diagnostics. Never re-opened by the front end.
    pub fn filename(&self) -> &str {
        &self.inner.filename
    }

    /// The raw source bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.inner.bytes
    }

    /// Length of the source in bytes.
    pub fn len(&self) -> usize {
        self.inner.bytes.len()
    }

    /// Whether the buffer contains no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.inner.bytes.is_empty()
    }
}

/// A contiguous byte range within a [`SourceBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl Span {
    /// Create a span from byte offsets. `start <= end` must hold.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers zero bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The span as a `Range<usize>`, e.g. for slicing or diagnostic labels.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// A lexeme's position: a span plus the buffer it points into.
///
/// Line and column numbers are recomputed on each call by scanning from the
/// start of the buffer. Diagnostics are produced at low frequency, so no
/// line-start cache is kept.
#[derive(Debug, Clone)]
pub struct SourceLocation {
    buffer: SourceBuffer,
    span: Span,
}

impl SourceLocation {
    /// Create a location. The span must lie within the buffer.
    pub fn new(buffer: SourceBuffer, span: Span) -> Self {
        debug_assert!(span.end <= buffer.len());
        Self { buffer, span }
    }

    /// The buffer this location points into.
    pub fn buffer(&self) -> &SourceBuffer {
        &self.buffer
    }

    /// The filename of the underlying buffer.
    pub fn filename(&self) -> &str {
        self.buffer.filename()
    }

    /// The byte span of the lexeme.
    pub fn span(&self) -> Span {
        self.span
    }

    /// The exact source substring the span covers.
    ///
    /// Spans produced by the lexer always cover valid UTF-8; anything else
    /// is an internal error.
    pub fn lexeme(&self) -> &str {
        std::str::from_utf8(&self.buffer.bytes()[self.span.range()])
            .expect("token spans cover valid UTF-8")
    }

    /// Like [`lexeme`](Self::lexeme), but replaces undecodable bytes.
    ///
    /// Error locations (notably `InvalidInput`) may point at bytes that are
    /// not valid UTF-8.
    pub fn lexeme_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.buffer.bytes()[self.span.range()])
    }

    /// 1-based line number: one plus the count of `\n` bytes strictly
    /// before the span start.
    pub fn line_number(&self) -> usize {
        let before = &self.buffer.bytes()[..self.span.start];
        before.iter().filter(|&&byte| byte == b'\n').count() + 1
    }

    /// 1-based column number in terminal columns.
    ///
    /// Counts the display width (0, 1, or 2 columns per codepoint) of
    /// everything on the span's line before the span start. Not a byte
    /// count and not a codepoint count. The prefix was already validated
    /// by the lexer, so a decoding failure here is an internal error.
    pub fn column_number(&self) -> usize {
        let bytes = self.buffer.bytes();
        let before = &bytes[..self.span.start];
        let line_start = before
            .iter()
            .rposition(|&byte| byte == b'\n')
            .map(|index| index + 1)
            .unwrap_or(0);
        let prefix = std::str::from_utf8(&bytes[line_start..self.span.start])
            .expect("text before a token span is valid UTF-8");
        prefix
            .chars()
            .map(|c| c.width().unwrap_or(0))
            .sum::<usize>()
            + 1
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.filename(),
            self.line_number(),
            self.column_number()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(source: &str, start: usize, end: usize) -> SourceLocation {
        SourceLocation::new(SourceBuffer::new("test.bs", source), Span::new(start, end))
    }

    #[test]
    fn lexeme_slices_the_span() {
        let location = location("let x = 1;\n", 4, 5);
        assert_eq!(location.lexeme(), "x");
    }

    #[test]
    fn line_number_counts_preceding_newlines() {
        let source = "let x = 1;\nlet y = 2;\n";
        let location = location(source, source.find('y').unwrap(), source.find('y').unwrap() + 1);
        assert_eq!(location.line_number(), 2);
        assert_eq!(location.column_number(), 5);
    }

    #[test]
    fn column_number_uses_display_width() {
        // '你' is 3 bytes and 1 codepoint but occupies 2 columns.
        let source = "ab你cd\n";
        let offset = source.find('d').unwrap();
        let location = location(source, offset, offset + 1);
        assert_eq!(location.column_number(), 6);
    }

    #[test]
    fn first_column_is_one() {
        let location = location("x\n", 0, 1);
        assert_eq!(location.line_number(), 1);
        assert_eq!(location.column_number(), 1);
    }

    #[test]
    fn display_is_filename_line_column() {
        let location = location("x\n", 0, 1);
        assert_eq!(location.to_string(), "test.bs:1:1");
    }
}
