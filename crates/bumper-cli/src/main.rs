//! `bumperc`: command-line front end for the Bumper compiler.
//!
//! Loads one source file, tokenizes and parses it, and prints either the
//! program's canonical re-serialization or every collected diagnostic.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use bumper_parser::diagnostics::{
    emit_diagnostics, lexer_error_diagnostic, parser_error_diagnostic,
};
use bumper_parser::{parse, tokenize, SourceBuffer, Token};
use clap::Parser;
use termcolor::{ColorChoice, StandardStream};

#[derive(Parser)]
#[command(name = "bumperc")]
#[command(about = "Bumper language front end", long_about = None)]
#[command(version)]
struct Cli {
    /// Source file to compile
    file: PathBuf,

    /// Print the token stream before parsing
    #[arg(long)]
    tokens: bool,

    /// Print the token stream as JSON
    #[arg(long)]
    tokens_json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(exit_code) => exit_code,
        Err(error) => {
            eprintln!("bumperc: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let buffer = read_source(&cli.file)?;
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);

    let tokens = match tokenize(&buffer) {
        Ok(tokens) => tokens,
        Err(error) => {
            emit_diagnostics(&mut stderr, &buffer, &[lexer_error_diagnostic(&error)])?;
            return Ok(ExitCode::FAILURE);
        }
    };

    if cli.tokens {
        print_tokens(&tokens);
    }
    if cli.tokens_json {
        print_tokens_json(&tokens)?;
    }

    match parse(tokens) {
        Ok(program) => {
            print!("{program}");
            Ok(ExitCode::SUCCESS)
        }
        Err(errors) => {
            let diagnostics: Vec<_> = errors.iter().map(parser_error_diagnostic).collect();
            emit_diagnostics(&mut stderr, &buffer, &diagnostics)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Read a source file, guaranteeing the buffer ends with a trailing
/// newline. The lexer relies on that sentinel byte.
fn read_source(path: &Path) -> Result<SourceBuffer> {
    let mut bytes =
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if bytes.last() != Some(&b'\n') {
        bytes.push(b'\n');
    }
    Ok(SourceBuffer::new(path.display().to_string(), bytes))
}

fn print_tokens(tokens: &[Token]) {
    for token in tokens {
        eprintln!(
            "{}:{}:{}: {:?} (\"{}\")",
            token.location.filename(),
            token.location.line_number(),
            token.location.column_number(),
            token.kind,
            token.lexeme().escape_default(),
        );
    }
}

fn print_tokens_json(tokens: &[Token]) -> Result<()> {
    let values: Vec<serde_json::Value> = tokens
        .iter()
        .map(|token| {
            serde_json::json!({
                "kind": format!("{:?}", token.kind),
                "lexeme": token.lexeme(),
                "line": token.location.line_number(),
                "column": token.location.column_number(),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}
