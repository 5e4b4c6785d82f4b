//! Recursive-descent parser for the Bumper programming language.
//!
//! Consumes the token sequence produced by the lexer and builds the AST
//! with one-token lookahead. Errors inside a grammar rule are recorded and
//! unwound (as an explicit [`recovery::Synchronize`] result, not a panic)
//! to the nearest recovery point, which discards tokens up to the next
//! statement terminator and resumes, so one mistake does not hide the
//! rest of the file.

pub mod error;
mod recovery;

pub use error::{ParserError, ParserErrorCode};

use recovery::{synchronize, ParseResult, Reporting, Synchronize};

use crate::ast::{
    Block, Definition, FunctionDefinition, ImportStatement, Name, Parameter, ParameterList,
    Program, ReturnType, Statement, TypeParameterList,
};
use crate::token::{Token, TokenType};

/// Parse a complete token sequence into a [`Program`].
///
/// On failure the full ordered error list is returned, covering every
/// independently-recoverable mistake in one pass.
pub fn parse(tokens: Vec<Token>) -> Result<Program, Vec<ParserError>> {
    Parser::new(tokens).parse()
}

/// Parser state: the token sequence, a cursor, and the accumulated errors.
pub struct Parser {
    tokens: Vec<Token>,
    index: usize,
    errors: Vec<ParserError>,
}

fn is_definition_keyword(kind: TokenType) -> bool {
    matches!(
        kind,
        TokenType::Function | TokenType::Type | TokenType::Struct | TokenType::Import
    )
}

impl Parser {
    /// Create a parser. `tokens` must come from a successful `tokenize`
    /// call: non-empty and terminated by a single `EndOfFile` token.
    pub fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(
            matches!(tokens.last().map(|token| token.kind), Some(TokenType::EndOfFile)),
            "token sequence must end with EndOfFile"
        );
        Self {
            tokens,
            index: 0,
            errors: Vec::new(),
        }
    }

    /// Parse the whole token sequence.
    pub fn parse(mut self) -> Result<Program, Vec<ParserError>> {
        let program = self.program();
        if self.errors.is_empty() {
            Ok(program)
        } else {
            Err(self.errors)
        }
    }

    // ------------------------------------------------------------------
    // Grammar rules
    // ------------------------------------------------------------------

    fn program(&mut self) -> Program {
        let imports = self.import_statements();
        let definitions = self.definitions();

        // Anything left over after all imports and definitions is an error
        // in its own right, not silently ignored.
        if !self.is_end_of_input() {
            let error = ParserError::unexpected_token(self.current(), None);
            let _ = self.report(error, Reporting::Record);
        }

        Program {
            imports,
            definitions,
        }
    }

    /// Recovery point: a failed import synchronizes to the next `;` and
    /// the loop carries on with the following import.
    fn import_statements(&mut self) -> Vec<ImportStatement> {
        let mut imports = Vec::new();
        while let Some(import_token) = self.try_consume(TokenType::Import) {
            match self.import_statement(import_token) {
                Ok(import) => imports.push(import),
                Err(Synchronize) => synchronize(self),
            }
        }
        imports
    }

    fn import_statement(&mut self, import_token: Token) -> ParseResult<ImportStatement> {
        let module_name = self.name()?;
        let semicolon_token = self.consume(TokenType::Semicolon)?;
        Ok(ImportStatement {
            import_token,
            module_name,
            semicolon_token,
        })
    }

    /// Recovery point: each top-level definition attempt catches the
    /// unwind and synchronizes before trying the next one.
    fn definitions(&mut self) -> Vec<Definition> {
        let mut definitions = Vec::new();
        while !self.is_end_of_input() {
            let export_token = self.try_consume(TokenType::Export);
            match self.definition(export_token) {
                Ok(Some(definition)) => definitions.push(definition),
                Ok(None) => {}
                Err(Synchronize) => synchronize(self),
            }
        }
        definitions
    }

    fn definition(&mut self, export_token: Option<Token>) -> ParseResult<Option<Definition>> {
        match self.current().kind {
            TokenType::Function => Ok(Some(Definition::Function(self.function(export_token)?))),
            _ => {
                // Not a recognized definition keyword: record the error
                // here and resynchronize ourselves instead of unwinding.
                let error = ParserError::unexpected_token(self.current(), None);
                self.report(error, Reporting::Record)?;
                synchronize(self);
                Ok(None)
            }
        }
    }

    fn function(&mut self, export_token: Option<Token>) -> ParseResult<FunctionDefinition> {
        let function_keyword = self.consume(TokenType::Function)?;
        let identifier = self.consume(TokenType::Identifier)?;
        let type_parameters = self.type_parameter_list()?;
        let parameters = self.parameter_list()?;
        let return_type = self.return_type()?;
        let body = self.block()?;
        Ok(FunctionDefinition {
            export_token,
            function_keyword,
            identifier,
            type_parameters,
            parameters,
            return_type,
            body,
        })
    }

    fn type_parameter_list(&mut self) -> ParseResult<Option<TypeParameterList>> {
        let list = self.try_parse_list(
            TokenType::LeftCurlyBracket,
            TokenType::RightCurlyBracket,
            |parser| parser.consume(TokenType::Identifier),
        )?;
        Ok(list.map(
            |(left_curly_bracket, identifiers, right_curly_bracket)| TypeParameterList {
                left_curly_bracket,
                identifiers,
                right_curly_bracket,
            },
        ))
    }

    fn parameter_list(&mut self) -> ParseResult<ParameterList> {
        let (left_parenthesis, parameters, right_parenthesis) = self.parse_list(
            TokenType::LeftParenthesis,
            TokenType::RightParenthesis,
            Self::parameter,
        )?;
        Ok(ParameterList {
            left_parenthesis,
            parameters,
            right_parenthesis,
        })
    }

    fn parameter(&mut self) -> ParseResult<Parameter> {
        let identifier = self.consume(TokenType::Identifier)?;
        self.consume(TokenType::Colon)?;
        let type_name = self.name()?;
        Ok(Parameter {
            identifier,
            type_name,
        })
    }

    fn return_type(&mut self) -> ParseResult<Option<ReturnType>> {
        let Some(tilde_arrow) = self.try_consume(TokenType::TildeArrow) else {
            return Ok(None);
        };
        let type_name = self.name()?;
        Ok(Some(ReturnType {
            tilde_arrow,
            type_name,
        }))
    }

    fn name(&mut self) -> ParseResult<Name> {
        let mut tokens = vec![self.consume(TokenType::Identifier)?];
        while let Some(double_colon_token) = self.try_consume(TokenType::DoubleColon) {
            tokens.push(double_colon_token);
            tokens.push(self.consume(TokenType::Identifier)?);
        }
        Ok(Name { tokens })
    }

    fn block(&mut self) -> ParseResult<Block> {
        let left_curly_bracket = self.consume(TokenType::LeftCurlyBracket)?;
        let statements = self.statements()?;
        let right_curly_bracket = self.consume(TokenType::RightCurlyBracket)?;
        Ok(Block {
            left_curly_bracket,
            statements,
            right_curly_bracket,
        })
    }

    fn statements(&mut self) -> ParseResult<Vec<Statement>> {
        let mut statements = Vec::new();
        while !self.is_end_of_input() && !self.current_is(TokenType::RightCurlyBracket) {
            if let Some(statement) = self.statement()? {
                statements.push(statement);
            }
        }
        Ok(statements)
    }

    fn statement(&mut self) -> ParseResult<Option<Statement>> {
        let export_token = self.try_consume(TokenType::Export);
        let is_definition = export_token.is_some() || is_definition_keyword(self.current().kind);
        if is_definition {
            return Ok(self.definition(export_token)?.map(Statement::Definition));
        }
        let error = ParserError::unexpected_token(self.current(), None);
        self.report(error, Reporting::Abort)?;
        Ok(None)
    }

    // ------------------------------------------------------------------
    // List combinators
    // ------------------------------------------------------------------

    /// Parse `open element (, element)* ,? close` if `open` is present.
    ///
    /// Returns `Ok(None)` without consuming anything when `open` is absent;
    /// the construct is optional, not an error.
    fn try_parse_list<T>(
        &mut self,
        open: TokenType,
        close: TokenType,
        mut element_parser: impl FnMut(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<Option<(Token, Vec<T>, Token)>> {
        let Some(open_token) = self.try_consume(open) else {
            return Ok(None);
        };
        let mut elements = Vec::new();
        while !self.is_end_of_input() && !self.current_is(close) {
            elements.push(element_parser(self)?);
            if self.try_consume(TokenType::Comma).is_none() {
                break;
            }
        }
        let close_token = self.consume(close)?;
        Ok(Some((open_token, elements, close_token)))
    }

    /// Like [`try_parse_list`](Self::try_parse_list), but a missing `open`
    /// token is a hard error.
    fn parse_list<T>(
        &mut self,
        open: TokenType,
        close: TokenType,
        element_parser: impl FnMut(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<(Token, Vec<T>, Token)> {
        match self.try_parse_list(open, close, element_parser)? {
            Some(list) => Ok(list),
            None => {
                // Re-run the consume to take the regular "expected token"
                // failure path.
                self.consume(open)?;
                unreachable!("try_parse_list left the opening token unconsumed")
            }
        }
    }

    // ------------------------------------------------------------------
    // Token management
    // ------------------------------------------------------------------

    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.index]
    }

    pub(crate) fn current_is(&self, kind: TokenType) -> bool {
        self.current().kind == kind
    }

    pub(crate) fn is_end_of_input(&self) -> bool {
        self.current().kind == TokenType::EndOfFile
    }

    /// Advance the cursor by one token. The cursor never moves past the
    /// terminating `EndOfFile` token.
    pub(crate) fn advance(&mut self) {
        if self.index < self.tokens.len() - 1 {
            self.index += 1;
        }
    }

    fn advance_token(&mut self) -> Token {
        let token = self.current().clone();
        self.advance();
        token
    }

    /// Consume the current token if it has the given kind.
    fn try_consume(&mut self, kind: TokenType) -> Option<Token> {
        if self.current_is(kind) {
            Some(self.advance_token())
        } else {
            None
        }
    }

    /// Consume the current token, reporting and unwinding on a mismatch.
    fn consume(&mut self, kind: TokenType) -> ParseResult<Token> {
        if !self.current_is(kind) {
            let error = ParserError::unexpected_token(self.current(), Some(kind));
            self.report(error, Reporting::Abort)?;
        }
        Ok(self.advance_token())
    }

    // ------------------------------------------------------------------
    // Error handling
    // ------------------------------------------------------------------

    /// Record a parse error. With [`Reporting::Abort`] the current rule is
    /// unwound to the nearest recovery point; with [`Reporting::Record`]
    /// the caller decides how to proceed.
    fn report(&mut self, error: ParserError, reporting: Reporting) -> ParseResult<()> {
        self.errors.push(error);
        match reporting {
            Reporting::Abort => Err(Synchronize),
            Reporting::Record => Ok(()),
        }
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
    fn parser_starts_at_the_first_token() {
        let parser = parser("function main\n");
        assert!(parser.current_is(TokenType::Function));
    }

    #[test]
    fn advance_clamps_at_end_of_file() {
        let mut parser = parser("let\n");
        parser.advance();
        assert!(parser.is_end_of_input());
        parser.advance();
        assert!(parser.is_end_of_input());
    }

    #[test]
    fn try_consume_only_takes_matching_tokens() {
        let mut parser = parser("import x;\n");
        assert!(parser.try_consume(TokenType::Semicolon).is_none());
        let import_token = parser.try_consume(TokenType::Import).unwrap();
        assert_eq!(import_token.lexeme(), "import");
        assert!(parser.current_is(TokenType::Identifier));
    }

    #[test]
    fn consume_mismatch_records_an_error_and_unwinds() {
        let mut parser = parser("import\n");
        let result = parser.consume(TokenType::Identifier);
        assert!(matches!(result, Err(Synchronize)));
        assert_eq!(parser.errors.len(), 1);
        assert_eq!(parser.errors[0].found, TokenType::Import);
        assert_eq!(parser.errors[0].expected, Some(TokenType::Identifier));
    }

    #[test]
    fn report_record_mode_does_not_unwind() {
        let mut parser = parser("let\n");
        let error = ParserError::unexpected_token(parser.current(), None);
        assert_eq!(parser.report(error, Reporting::Record), Ok(()));
        assert_eq!(parser.errors.len(), 1);
    }
}
