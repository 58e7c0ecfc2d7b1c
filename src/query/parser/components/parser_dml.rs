// DML Statement Parser Implementation
//
// This module implements parsing for SQL DML (Data Manipulation Language) statements:
// INSERT, UPDATE, and DELETE

use crate::common::Result;
use crate::query::parser::ast::*;
use crate::query::parser::lexer::TokenType;

use super::parser_core::Parser;
use super::parser_expressions::{parse_expression, parse_expression_list};
use super::parser_select::parse_select;

/// Parse an INSERT statement
pub fn parse_insert(parser: &mut Parser) -> Result<Statement> {
    parser.expect_keyword("insert")?;

    // INSERT OR REPLACE / INSERT IGNORE
    if parser.consume_keyword("or")? {
        parser.parse_identifier()?;
    }
    parser.consume_keyword("ignore")?;
    parser.consume_keyword("into")?;

    let table = parser.parse_qualified_name()?;

    let columns = if parser.current_token_is(&TokenType::LeftParen) {
        parser.parse_identifier_list()?
    } else {
        Vec::new()
    };

    let source = if parser.consume_keyword("values")? {
        let mut rows = Vec::new();
        loop {
            parser.expect_token(TokenType::LeftParen)?;
            let row = if parser.current_token_is(&TokenType::RightParen) {
                Vec::new()
            } else {
                parse_expression_list(parser)?
            };
            parser.expect_token(TokenType::RightParen)?;
            rows.push(row);
            if !parser.consume_token(&TokenType::COMMA)? {
                break;
            }
        }
        InsertSource::Values(rows)
    } else if parser.current_is_keyword("select") {
        InsertSource::Query(Box::new(parse_select(parser)?))
    } else {
        return parser.expected("VALUES or SELECT");
    };

    Ok(Statement::Insert { table, columns, source })
}

/// Parse an UPDATE statement
pub fn parse_update(parser: &mut Parser) -> Result<Statement> {
    parser.expect_keyword("update")?;
    let table = parser.parse_qualified_name()?;
    parser.expect_keyword("set")?;

    let mut assignments = Vec::new();
    loop {
        let column = parser.parse_qualified_name()?;
        parser.expect_token(TokenType::EQUALS)?;
        let value = parse_expression(parser)?;
        assignments.push(Assignment { column, value });
        if !parser.consume_token(&TokenType::COMMA)? {
            break;
        }
    }

    let where_clause = if parser.consume_keyword("where")? {
        Some(parse_expression(parser)?)
    } else {
        None
    };

    Ok(Statement::Update {
        table,
        assignments,
        where_clause,
    })
}

/// Parse a DELETE statement
pub fn parse_delete(parser: &mut Parser) -> Result<Statement> {
    parser.expect_keyword("delete")?;
    parser.consume_keyword("from")?;
    let table = parser.parse_qualified_name()?;

    let where_clause = if parser.consume_keyword("where")? {
        Some(parse_expression(parser)?)
    } else {
        None
    };

    Ok(Statement::Delete { table, where_clause })
}
