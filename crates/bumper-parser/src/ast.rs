//! AST nodes produced by the parser.
//!
//! Nodes are constructed once and never mutated; they own their children
//! and share only the source buffer (through their tokens). Polymorphic
//! node categories are closed enums: new grammar productions are added as
//! new variants, with the compiler enforcing exhaustive matches at every
//! use site.
//!
//! Every node implements [`Display`](std::fmt::Display), producing a
//! canonical re-serialization that parses back without error.

use std::fmt;

use crate::token::Token;

/// A whole source file: imports first, then top-level definitions.
#[derive(Debug, Clone)]
pub struct Program {
    /// Import statements, in source order.
    pub imports: Vec<ImportStatement>,
    /// Top-level definitions, in source order.
    pub definitions: Vec<Definition>,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for import in &self.imports {
            writeln!(f, "{import}")?;
        }
        if !self.imports.is_empty() {
            writeln!(f)?;
        }
        for definition in &self.definitions {
            writeln!(f, "{definition}")?;
        }
        if !self.definitions.is_empty() {
            writeln!(f)?;
        }
        Ok(())
    }
}

/// `import a::b::c;`
#[derive(Debug, Clone)]
pub struct ImportStatement {
    /// The `import` keyword.
    pub import_token: Token,
    /// The possibly-qualified module name.
    pub module_name: Name,
    /// The terminating `;`.
    pub semicolon_token: Token,
}

impl fmt::Display for ImportStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "import {};", self.module_name)
    }
}

/// A possibly-qualified name: identifiers separated by `::`.
///
/// Invariant: the token sequence is non-empty and starts and ends with an
/// identifier, with separators only in between.
#[derive(Debug, Clone)]
pub struct Name {
    /// Alternating identifier and `::` tokens.
    pub tokens: Vec<Token>,
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "{}", token.lexeme())?;
        }
        Ok(())
    }
}

/// A top-level definition.
///
/// `type` and `struct` are reserved as definition keywords but not yet
/// modeled; they become further variants here.
#[derive(Debug, Clone)]
pub enum Definition {
    /// A function definition.
    Function(FunctionDefinition),
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Definition::Function(function) => write!(f, "{function}"),
        }
    }
}

/// `export? function name{T, U}?(parameters) ~> Type? { ... }`
#[derive(Debug, Clone)]
pub struct FunctionDefinition {
    /// The `export` keyword, if present.
    pub export_token: Option<Token>,
    /// The `function` keyword.
    pub function_keyword: Token,
    /// The function's name.
    pub identifier: Token,
    /// Optional `{T, U}` type parameter list.
    pub type_parameters: Option<TypeParameterList>,
    /// The parenthesized parameter list. Always present.
    pub parameters: ParameterList,
    /// Optional `~> Type` return type.
    pub return_type: Option<ReturnType>,
    /// The function body.
    pub body: Block,
}

impl fmt::Display for FunctionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.export_token.is_some() {
            write!(f, "export ")?;
        }
        write!(f, "function {}", self.identifier.lexeme())?;
        if let Some(type_parameters) = &self.type_parameters {
            write!(f, "{type_parameters}")?;
        }
        write!(f, "{}", self.parameters)?;
        if let Some(return_type) = &self.return_type {
            write!(f, " {return_type}")?;
        }
        write!(f, " {}", self.body)
    }
}

/// `{T, U}`: type parameter identifiers in curly brackets.
#[derive(Debug, Clone)]
pub struct TypeParameterList {
    /// The opening `{`.
    pub left_curly_bracket: Token,
    /// The type parameter identifiers.
    pub identifiers: Vec<Token>,
    /// The closing `}`.
    pub right_curly_bracket: Token,
}

impl fmt::Display for TypeParameterList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (index, identifier) in self.identifiers.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", identifier.lexeme())?;
        }
        write!(f, "}}")
    }
}

/// `(value: T, other: std::Box)`: the parenthesized parameter list.
#[derive(Debug, Clone)]
pub struct ParameterList {
    /// The opening `(`.
    pub left_parenthesis: Token,
    /// The parameters, in source order.
    pub parameters: Vec<Parameter>,
    /// The closing `)`.
    pub right_parenthesis: Token,
}

impl fmt::Display for ParameterList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (index, parameter) in self.parameters.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{parameter}")?;
        }
        write!(f, ")")
    }
}

/// One `name: Type` parameter.
#[derive(Debug, Clone)]
pub struct Parameter {
    /// The parameter name.
    pub identifier: Token,
    /// The parameter's type name.
    pub type_name: Name,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.identifier.lexeme(), self.type_name)
    }
}

/// `~> Type`: a function's declared return type.
#[derive(Debug, Clone)]
pub struct ReturnType {
    /// The `~>` token.
    pub tilde_arrow: Token,
    /// The return type's name.
    pub type_name: Name,
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "~> {}", self.type_name)
    }
}

/// A statement inside a block.
///
/// Only definitions are modeled so far; expression and control-flow
/// statements become further variants.
#[derive(Debug, Clone)]
pub enum Statement {
    /// A nested definition.
    Definition(Definition),
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Definition(definition) => write!(f, "{definition}"),
        }
    }
}

/// An expression.
///
/// Only blocks are modeled so far.
#[derive(Debug, Clone)]
pub enum Expression {
    /// A braced block.
    Block(Block),
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Block(block) => write!(f, "{block}"),
        }
    }
}

/// `{ ... }`: a braced sequence of statements.
#[derive(Debug, Clone)]
pub struct Block {
    /// The opening `{`.
    pub left_curly_bracket: Token,
    /// The statements, in source order.
    pub statements: Vec<Statement>,
    /// The closing `}`.
    pub right_curly_bracket: Token,
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.statements.is_empty() {
            return write!(f, "{{ }}");
        }
        writeln!(f, "{{")?;
        for statement in &self.statements {
            writeln!(f, "{statement}")?;
        }
        write!(f, "}}")
    }
}
