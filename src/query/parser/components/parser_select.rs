// SELECT Statement Parser Implementation
//
// This module implements parsing for SQL SELECT statements: the leading
// modifiers, the select list and a loop over the trailing clauses.

use crate::common::Result;
use crate::query::parser::ast::*;
use crate::query::parser::lexer::TokenType;

use super::parser_core::{Parser, RESERVED_WORDS, STATEMENT_KEYWORDS};
use super::parser_expressions::{parse_expression, parse_expression_list, parse_primary};

/// Parse a SELECT statement starting at the SELECT keyword
pub fn parse_select(parser: &mut Parser) -> Result<SelectStatement> {
    parser.expect_keyword("select")?;
    let mut select = SelectStatement::default();

    // Modifiers come before the select list so they are not read as columns
    loop {
        if parser.consume_keyword("all")? {
            select.quantifier = Some(SelectQuantifier::All);
        } else if parser.consume_keyword("distinct")? {
            select.quantifier = Some(SelectQuantifier::Distinct);
        } else if parser.consume_keyword("top")? {
            select.top = Some(parse_top(parser)?);
        } else {
            break;
        }
    }

    select.columns = parse_select_columns(parser)?;
    parse_clauses(parser, &mut select)?;
    Ok(select)
}

/// Parse `n [PERCENT] [WITH TIES]` after TOP
fn parse_top(parser: &mut Parser) -> Result<Top> {
    let count = parse_primary(parser)?;
    let percent = parser.consume_keyword("percent")?;
    let with_ties = if parser.current_is_keyword("with") && parser.peek_is_keyword("ties")? {
        parser.next_token()?;
        parser.next_token()?;
        true
    } else {
        false
    };
    Ok(Top {
        count,
        percent,
        with_ties,
    })
}

/// Parse the comma-separated select list
fn parse_select_columns(parser: &mut Parser) -> Result<Vec<SelectColumn>> {
    let mut columns = Vec::new();
    loop {
        if parser.consume_token(&TokenType::MULTIPLY)? {
            columns.push(SelectColumn::Wildcard);
        } else {
            let expr = parse_expression(parser)?;
            let alias = parse_alias(parser)?;
            columns.push(SelectColumn::Expression { expr, alias });
        }
        if !parser.consume_token(&TokenType::COMMA)? {
            return Ok(columns);
        }
    }
}

/// Parse `AS name` or an implicit alias
pub fn parse_alias(parser: &mut Parser) -> Result<Option<String>> {
    if parser.consume_keyword("as")? {
        return parser.parse_identifier().map(Some);
    }
    let implicit = match &parser.current_token.token_type {
        TokenType::QuotedIdentifier(_) => true,
        TokenType::IDENTIFIER(word) => !RESERVED_WORDS.contains(word.to_lowercase().as_str()),
        _ => false,
    };
    if implicit {
        parser.parse_identifier().map(Some)
    } else {
        Ok(None)
    }
}

/// Consume trailing clauses until a token that cannot start one
fn parse_clauses(parser: &mut Parser, select: &mut SelectStatement) -> Result<()> {
    while let Some(keyword) = parser.current_keyword() {
        match keyword.as_str() {
            "from" => {
                parser.next_token()?;
                select.from.push(parse_table_reference(parser)?);
                while parser.consume_token(&TokenType::COMMA)? {
                    select.from.push(parse_table_reference(parser)?);
                }
            }
            "join" | "inner" | "left" | "right" | "full" | "cross" => {
                let join = parse_join_clause(parser)?;
                select.joins.push(join);
            }
            "where" => {
                parser.next_token()?;
                select.where_clause = Some(parse_expression(parser)?);
            }
            "group" => {
                parser.next_token()?;
                parser.expect_keyword("by")?;
                select.group_by = parse_expression_list(parser)?;
            }
            "having" => {
                parser.next_token()?;
                select.having = Some(parse_expression(parser)?);
            }
            "order" => {
                parser.next_token()?;
                parser.expect_keyword("by")?;
                select.order_by = parse_order_by_items(parser)?;
            }
            "window" => {
                parser.next_token()?;
                select.windows.push(parse_window_definition(parser)?);
                while parser.consume_token(&TokenType::COMMA)? {
                    select.windows.push(parse_window_definition(parser)?);
                }
            }
            "limit" => {
                parser.next_token()?;
                select.limit = Some(parse_limit(parser)?);
            }
            // Control-flow delimiters and the next statement end the query
            "else" | "end" | "go" => break,
            word if STATEMENT_KEYWORDS.contains(word) => break,
            _ => return parser.expected("clause"),
        }
    }
    Ok(())
}

/// Parse a table name or parenthesized subquery with an optional alias
fn parse_table_reference(parser: &mut Parser) -> Result<TableReference> {
    let source = if parser.consume_token(&TokenType::LeftParen)? {
        let query = parse_select(parser)?;
        parser.expect_token(TokenType::RightParen)?;
        TableSource::Subquery(Box::new(query))
    } else {
        TableSource::Named(parser.parse_qualified_name()?)
    };
    let alias = parse_alias(parser)?;

    // Table hints such as WITH (NOLOCK)
    if parser.current_is_keyword("with") && parser.peek_token()?.token_type == TokenType::LeftParen {
        parser.next_token()?;
        parser.skip_parenthesized()?;
    }

    Ok(TableReference { source, alias })
}

/// Parse `[INNER|LEFT|RIGHT|FULL [OUTER]|CROSS] JOIN table [ON expr | USING (cols)]`
fn parse_join_clause(parser: &mut Parser) -> Result<JoinClause> {
    let join_type = match parser.consume_any_keyword(&["inner", "left", "right", "full", "cross"])?.as_deref() {
        Some("left") => JoinType::Left,
        Some("right") => JoinType::Right,
        Some("full") => JoinType::Full,
        Some("cross") => JoinType::Cross,
        _ => JoinType::Inner,
    };
    parser.consume_keyword("outer")?;
    parser.expect_keyword("join")?;

    let table = parse_table_reference(parser)?;
    let condition = if parser.consume_keyword("on")? {
        Some(parse_expression(parser)?)
    } else {
        if parser.consume_keyword("using")? {
            parser.parse_identifier_list()?;
        }
        None
    };

    Ok(JoinClause {
        join_type,
        table,
        condition,
    })
}

/// Parse `expr [ASC|DESC] [NULLS FIRST|LAST] {, ...}`
pub fn parse_order_by_items(parser: &mut Parser) -> Result<Vec<OrderByItem>> {
    let mut items = Vec::new();
    loop {
        let expr = parse_expression(parser)?;
        let descending = matches!(
            parser.consume_any_keyword(&["asc", "desc"])?.as_deref(),
            Some("desc")
        );
        if parser.consume_keyword("nulls")? {
            parser.consume_any_keyword(&["first", "last"])?;
        }
        items.push(OrderByItem { expr, descending });
        if !parser.consume_token(&TokenType::COMMA)? {
            return Ok(items);
        }
    }
}

/// Parse `name AS ([PARTITION BY exprs] [ORDER BY items])`
fn parse_window_definition(parser: &mut Parser) -> Result<WindowDefinition> {
    let name = parser.parse_identifier()?;
    parser.expect_keyword("as")?;
    parser.expect_token(TokenType::LeftParen)?;

    let mut partition_by = Vec::new();
    if parser.consume_keyword("partition")? {
        parser.expect_keyword("by")?;
        partition_by = parse_expression_list(parser)?;
    }
    let mut order_by = Vec::new();
    if parser.consume_keyword("order")? {
        parser.expect_keyword("by")?;
        order_by = parse_order_by_items(parser)?;
    }
    parser.expect_token(TokenType::RightParen)?;

    Ok(WindowDefinition {
        name,
        partition_by,
        order_by,
    })
}

/// Parse `count [OFFSET n]` or MySQL `offset, count`
fn parse_limit(parser: &mut Parser) -> Result<Limit> {
    let first = parse_expression(parser)?;
    if parser.consume_token(&TokenType::COMMA)? {
        let count = parse_expression(parser)?;
        return Ok(Limit {
            count,
            offset: Some(first),
        });
    }
    let offset = if parser.consume_keyword("offset")? {
        Some(parse_expression(parser)?)
    } else {
        None
    };
    Ok(Limit { count: first, offset })
}
