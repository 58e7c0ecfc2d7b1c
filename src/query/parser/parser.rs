// SQL Parser Implementation
//
// This module implements the statement-level driver of the recursive descent
// parser: it dispatches on the leading keyword of each statement and turns a
// whole source unit into a list of AST statements.

use std::path::Path;
use std::sync::Arc;

use log::{debug, trace};

use super::ast::Statement;
use super::components::*;
use crate::common::types::{DEFAULT_FILE, DEFAULT_LINE};
use crate::common::{Error, Location, Result};
use crate::query::parser::lexer::TokenType;

/// Parse a single statement at the current token
pub fn parse_statement(parser: &mut Parser) -> Result<Statement> {
    let keyword = match parser.current_keyword() {
        Some(keyword) => keyword,
        None => return parser.expected("statement"),
    };
    trace!("Parsing statement at {}: {}", parser.location(), keyword);

    match keyword.as_str() {
        "select" => Ok(Statement::Select(parse_select(parser)?)),
        "insert" => parse_insert(parser),
        "update" => parse_update(parser),
        "delete" => parse_delete(parser),
        "create" => parse_create(parser),
        "alter" => parse_alter(parser),
        "drop" => parse_drop(parser),
        "if" => parse_if(parser),
        "begin" => parse_begin(parser),
        "start" => parse_start(parser),
        "commit" | "rollback" => parse_commit_or_rollback(parser),
        "declare" => parse_declare(parser),
        "exec" | "execute" => parse_execute(parser),
        "raiserror" => parse_raiserror(parser),
        "print" => parse_print(parser),
        "set" => parse_set(parser),
        "pragma" => parse_pragma(parser),
        "use" => parse_use(parser),
        "checkpoint" => parse_checkpoint(parser),
        "lock" => parse_lock(parser),
        "unlock" => parse_unlock(parser),
        _ => parser.expected("statement"),
    }
}

/// Parse every statement up to end of input.
///
/// Statements may be separated by `;`, by the T-SQL batch word `GO`, or by
/// nothing at all. Empty statements are skipped.
pub fn parse_statements(parser: &mut Parser) -> Result<Vec<Statement>> {
    let mut statements = Vec::new();
    loop {
        while parser.consume_token(&TokenType::SEMICOLON)? || parser.consume_keyword("go")? {}
        if parser.current_token_is(&TokenType::EOF) {
            break;
        }
        let location = parser.location();
        let statement = parse_statement(parser)?;
        debug!("Parsed {} at {}", statement.kind(), location);
        statements.push(statement);
    }
    Ok(statements)
}

/// Parse in-memory SQL text, reporting errors against `<input>`
pub fn parse(text: &str) -> Result<Vec<Statement>> {
    parse_with_location(text, DEFAULT_FILE, DEFAULT_LINE)
}

/// Parse SQL text whose first line is `line` of `file`
pub fn parse_with_location(text: &str, file: impl Into<Arc<str>>, line: usize) -> Result<Vec<Statement>> {
    let mut parser = Parser::with_location(text, file, line)?;
    parse_statements(&mut parser)
}

/// Read a source file as UTF-8 text
pub fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        Error::new(
            Location::new(path.display().to_string(), DEFAULT_LINE),
            format!("cannot read file: {}", e),
        )
    })
}

/// Read and parse a file. Diagnostics name the path.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Statement>> {
    let path = path.as_ref();
    let text = read_source(path)?;
    parse_with_location(&text, path.display().to_string(), DEFAULT_LINE)
}
