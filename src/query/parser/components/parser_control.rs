// Control and Session Statement Parser Implementation
//
// This module implements parsing for procedural and session statements:
// IF/ELSE, BEGIN ... END blocks, transactions, DECLARE, EXEC, RAISERROR,
// PRINT, SET, PRAGMA, USE, CHECKPOINT and table locks.

use crate::common::Result;
use crate::query::parser::ast::*;
use crate::query::parser::lexer::TokenType;
use crate::query::parser::parser::parse_statement;

use super::parser_core::{Parser, STATEMENT_KEYWORDS};
use super::parser_ddl::parse_data_type;
use super::parser_expressions::{parse_expression, parse_expression_list};

/// True where an open-ended list of operands must stop
fn at_boundary(parser: &Parser) -> bool {
    if parser.at_statement_end() {
        return true;
    }
    match parser.current_keyword() {
        Some(word) => matches!(word.as_str(), "go" | "else" | "end") || STATEMENT_KEYWORDS.contains(word.as_str()),
        None => false,
    }
}

/// Parse `IF condition [THEN] statement [ELSE statement]`
pub fn parse_if(parser: &mut Parser) -> Result<Statement> {
    parser.expect_keyword("if")?;
    let condition = parse_expression(parser)?;
    parser.consume_keyword("then")?;
    let then_branch = Box::new(parse_statement(parser)?);

    // T-SQL allows the branch to be terminated before ELSE
    if parser.current_token_is(&TokenType::SEMICOLON) && parser.peek_is_keyword("else")? {
        parser.next_token()?;
    }
    let else_branch = if parser.consume_keyword("else")? {
        Some(Box::new(parse_statement(parser)?))
    } else {
        None
    };

    Ok(Statement::If {
        condition,
        then_branch,
        else_branch,
    })
}

/// Parse BEGIN: a transaction start or a `BEGIN ... END` block
pub fn parse_begin(parser: &mut Parser) -> Result<Statement> {
    parser.expect_keyword("begin")?;

    if parser.consume_any_keyword(&["transaction", "tran", "work"])?.is_some() {
        // Optional T-SQL transaction name
        if parser.at_identifier() && !at_boundary(parser) {
            parser.parse_identifier()?;
        }
        return Ok(Statement::Start);
    }
    if parser.consume_any_keyword(&["deferred", "immediate", "exclusive"])?.is_some() {
        parser.consume_keyword("transaction")?;
        return Ok(Statement::Start);
    }
    if parser.at_statement_end() {
        return Ok(Statement::Start);
    }

    let mut statements = Vec::new();
    loop {
        while parser.consume_token(&TokenType::SEMICOLON)? {}
        if parser.consume_keyword("end")? {
            break;
        }
        if parser.current_token_is(&TokenType::EOF) {
            return parser.expected("END");
        }
        statements.push(parse_statement(parser)?);
    }
    Ok(Statement::Block(statements))
}

/// Parse `START TRANSACTION|TRAN`
pub fn parse_start(parser: &mut Parser) -> Result<Statement> {
    parser.expect_keyword("start")?;
    match parser.consume_any_keyword(&["transaction", "tran", "work"])? {
        Some(_) => Ok(Statement::Start),
        None => parser.expected("TRANSACTION"),
    }
}

/// Parse `COMMIT` or `ROLLBACK` with an optional TRANSACTION word
pub fn parse_commit_or_rollback(parser: &mut Parser) -> Result<Statement> {
    let statement = match parser.consume_any_keyword(&["commit", "rollback"])?.as_deref() {
        Some("commit") => Statement::Commit,
        Some(_) => Statement::Rollback,
        None => return parser.expected("COMMIT or ROLLBACK"),
    };
    parser.consume_any_keyword(&["transaction", "tran", "work"])?;
    Ok(statement)
}

/// Parse `DECLARE @name [AS] type [= value] {, ...}`
pub fn parse_declare(parser: &mut Parser) -> Result<Statement> {
    parser.expect_keyword("declare")?;
    let mut declarations = Vec::new();
    loop {
        let name = parser.parse_identifier()?;
        parser.consume_keyword("as")?;
        let data_type = parse_data_type(parser)?;
        let default = if parser.consume_token(&TokenType::EQUALS)? {
            Some(parse_expression(parser)?)
        } else {
            None
        };
        declarations.push(VariableDeclaration {
            name,
            data_type,
            default,
        });
        if !parser.consume_token(&TokenType::COMMA)? {
            break;
        }
    }
    Ok(Statement::Declare(declarations))
}

/// Take `@name =` if the current tokens spell it
fn parse_variable_target(parser: &mut Parser) -> Result<Option<String>> {
    let name = match &parser.current_token.token_type {
        TokenType::IDENTIFIER(word) if word.starts_with('@') => word.clone(),
        _ => return Ok(None),
    };
    if parser.peek_token()?.token_type != TokenType::EQUALS {
        return Ok(None);
    }
    parser.next_token()?;
    parser.next_token()?;
    Ok(Some(name))
}

/// Parse `EXEC[UTE] [@ret =] procedure [[@p =] value [OUTPUT] {, ...}]`
/// or `EXEC (expression)`
pub fn parse_execute(parser: &mut Parser) -> Result<Statement> {
    if parser.consume_any_keyword(&["exec", "execute"])?.is_none() {
        return parser.expected("EXEC");
    }

    if parser.consume_token(&TokenType::LeftParen)? {
        let value = parse_expression(parser)?;
        parser.expect_token(TokenType::RightParen)?;
        return Ok(Statement::ExecuteProcedure {
            return_variable: None,
            procedure: None,
            arguments: vec![ProcedureArgument {
                name: None,
                value,
                output: false,
            }],
        });
    }

    let return_variable = parse_variable_target(parser)?;
    let procedure = parser.parse_qualified_name()?;

    let mut arguments = Vec::new();
    if !at_boundary(parser) {
        loop {
            let name = parse_variable_target(parser)?;
            let value = parse_expression(parser)?;
            let output = parser.consume_any_keyword(&["output", "out"])?.is_some();
            arguments.push(ProcedureArgument { name, value, output });
            if !parser.consume_token(&TokenType::COMMA)? {
                break;
            }
        }
    }

    Ok(Statement::ExecuteProcedure {
        return_variable,
        procedure: Some(procedure),
        arguments,
    })
}

/// Parse `RAISERROR (args) [WITH option {, option}]`
pub fn parse_raiserror(parser: &mut Parser) -> Result<Statement> {
    parser.expect_keyword("raiserror")?;
    parser.expect_token(TokenType::LeftParen)?;
    let arguments = parse_expression_list(parser)?;
    parser.expect_token(TokenType::RightParen)?;

    let mut options = Vec::new();
    if parser.consume_keyword("with")? {
        loop {
            options.push(parser.parse_identifier()?);
            if !parser.consume_token(&TokenType::COMMA)? {
                break;
            }
        }
    }
    Ok(Statement::Raiserror { arguments, options })
}

/// Parse `PRINT expression`
pub fn parse_print(parser: &mut Parser) -> Result<Statement> {
    parser.expect_keyword("print")?;
    Ok(Statement::Print(parse_expression(parser)?))
}

/// Parse SET: `SET IDENTITY_INSERT table ON|OFF` or
/// `SET [GLOBAL|SESSION|LOCAL] name [=|TO] value {, value}`
pub fn parse_set(parser: &mut Parser) -> Result<Statement> {
    parser.expect_keyword("set")?;

    if parser.consume_keyword("identity_insert")? {
        let table = parser.parse_qualified_name()?;
        return match parser.consume_any_keyword(&["on", "off"])?.as_deref() {
            Some(state) => Ok(Statement::SetIdentityInsert {
                table,
                enabled: state == "on",
            }),
            None => parser.expected("ON or OFF"),
        };
    }

    parser.consume_any_keyword(&["global", "session", "local"])?;
    let name = parser.parse_qualified_name()?.to_string();
    if !parser.consume_token(&TokenType::EQUALS)? {
        parser.consume_keyword("to")?;
    }

    let mut values = Vec::new();
    if !at_boundary(parser) {
        loop {
            values.push(parse_expression(parser)?);
            if !parser.consume_token(&TokenType::COMMA)? {
                break;
            }
        }
    }
    // SET NAMES charset COLLATE collation
    if parser.consume_keyword("collate")? {
        parser.parse_identifier()?;
    }

    Ok(Statement::SetGlobal { name, values })
}

/// Parse `PRAGMA name [= value | (value)]`
pub fn parse_pragma(parser: &mut Parser) -> Result<Statement> {
    parser.expect_keyword("pragma")?;
    let name = parser.parse_qualified_name()?;
    let value = if parser.consume_token(&TokenType::EQUALS)? {
        Some(parse_expression(parser)?)
    } else if parser.consume_token(&TokenType::LeftParen)? {
        let value = parse_expression(parser)?;
        parser.expect_token(TokenType::RightParen)?;
        Some(value)
    } else {
        None
    };
    Ok(Statement::Pragma { name, value })
}

/// Parse `USE database`
pub fn parse_use(parser: &mut Parser) -> Result<Statement> {
    parser.expect_keyword("use")?;
    Ok(Statement::Use(parser.parse_qualified_name()?))
}

/// Parse `CHECKPOINT`
pub fn parse_checkpoint(parser: &mut Parser) -> Result<Statement> {
    parser.expect_keyword("checkpoint")?;
    Ok(Statement::Checkpoint)
}

/// Parse `LOCK TABLES name [READ|WRITE] {, ...}`
pub fn parse_lock(parser: &mut Parser) -> Result<Statement> {
    parser.expect_keyword("lock")?;
    if parser.consume_any_keyword(&["tables", "table"])?.is_none() {
        return parser.expected("TABLES");
    }
    let mut tables = Vec::new();
    loop {
        tables.push(parser.parse_qualified_name()?);
        while parser
            .consume_any_keyword(&["read", "write", "local", "low_priority"])?
            .is_some()
        {}
        if !parser.consume_token(&TokenType::COMMA)? {
            break;
        }
    }
    Ok(Statement::LockTables(tables))
}

/// Parse `UNLOCK TABLES`
pub fn parse_unlock(parser: &mut Parser) -> Result<Statement> {
    parser.expect_keyword("unlock")?;
    if parser.consume_any_keyword(&["tables", "table"])?.is_none() {
        return parser.expected("TABLES");
    }
    Ok(Statement::UnlockTables)
}
