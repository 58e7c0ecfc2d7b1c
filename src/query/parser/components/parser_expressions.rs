// Expression Parser Implementation
//
// This module implements expression parsing for SQL. Logical operators are
// handled by one function per level (OR, AND, NOT, comparison); arithmetic
// operators are parsed by precedence climbing over a token table.

use crate::common::Result;
use crate::query::parser::ast::*;
use crate::query::parser::lexer::TokenType;

use super::parser_core::Parser;
use super::parser_ddl::parse_data_type;
use super::parser_select::parse_select;

/// Get the binding strength of an arithmetic operator token (0 = not one)
pub fn get_operator_precedence(token_type: &TokenType) -> u8 {
    match token_type {
        TokenType::MULTIPLY | TokenType::DIVIDE | TokenType::MODULO => 2,
        TokenType::PLUS
        | TokenType::MINUS
        | TokenType::CONCAT
        | TokenType::AMPERSAND
        | TokenType::CARET => 1,
        _ => 0,
    }
}

/// Convert an arithmetic operator token to its operator
pub fn token_to_operator(token_type: &TokenType) -> Option<BinaryOperator> {
    match token_type {
        TokenType::MULTIPLY => Some(BinaryOperator::Multiply),
        TokenType::DIVIDE => Some(BinaryOperator::Divide),
        TokenType::MODULO => Some(BinaryOperator::Modulo),
        TokenType::PLUS => Some(BinaryOperator::Add),
        TokenType::MINUS => Some(BinaryOperator::Subtract),
        TokenType::CONCAT => Some(BinaryOperator::Concat),
        TokenType::AMPERSAND => Some(BinaryOperator::BitAnd),
        TokenType::CARET => Some(BinaryOperator::BitXor),
        _ => None,
    }
}

/// Convert a comparison token to its operator
fn comparison_operator(token_type: &TokenType) -> Option<BinaryOperator> {
    match token_type {
        TokenType::EQUALS => Some(BinaryOperator::Equals),
        TokenType::NotEqual => Some(BinaryOperator::NotEquals),
        TokenType::LessThan => Some(BinaryOperator::LessThan),
        TokenType::GreaterThan => Some(BinaryOperator::GreaterThan),
        TokenType::LessEqual => Some(BinaryOperator::LessEquals),
        TokenType::GreaterEqual => Some(BinaryOperator::GreaterEquals),
        _ => None,
    }
}

fn binary(op: BinaryOperator, left: Expression, right: Expression) -> Expression {
    let location = left.location.clone();
    Expression::new(
        ExpressionKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        location,
    )
}

/// Parse one full expression
pub fn parse_expression(parser: &mut Parser) -> Result<Expression> {
    parse_or(parser)
}

fn parse_or(parser: &mut Parser) -> Result<Expression> {
    let mut left = parse_and(parser)?;
    while parser.consume_keyword("or")? {
        let right = parse_and(parser)?;
        left = binary(BinaryOperator::Or, left, right);
    }
    Ok(left)
}

fn parse_and(parser: &mut Parser) -> Result<Expression> {
    let mut left = parse_not(parser)?;
    while parser.consume_keyword("and")? {
        let right = parse_not(parser)?;
        left = binary(BinaryOperator::And, left, right);
    }
    Ok(left)
}

fn parse_not(parser: &mut Parser) -> Result<Expression> {
    if parser.current_is_keyword("not") {
        let location = parser.location();
        parser.next_token()?;
        let operand = parse_not(parser)?;
        return Ok(Expression::new(
            ExpressionKind::Unary {
                op: UnaryOperator::Not,
                operand: Box::new(operand),
            },
            location,
        ));
    }
    parse_comparison(parser)
}

/// Comparison level: at most one comparison, LIKE, IN, BETWEEN or IS NULL
fn parse_comparison(parser: &mut Parser) -> Result<Expression> {
    let left = parse_arithmetic(parser, 1)?;

    if let Some(op) = comparison_operator(&parser.current_token.token_type) {
        parser.next_token()?;
        let right = parse_arithmetic(parser, 1)?;
        return Ok(binary(op, left, right));
    }

    let negated = parser.current_is_keyword("not")
        && matches!(
            parser.peek_token()?.keyword().as_deref(),
            Some("like" | "in" | "between")
        );
    if negated {
        parser.next_token()?;
    }

    let location = left.location.clone();
    match parser.current_keyword().as_deref() {
        Some("like") => {
            parser.next_token()?;
            let right = parse_arithmetic(parser, 1)?;
            let op = if negated { BinaryOperator::NotLike } else { BinaryOperator::Like };
            Ok(binary(op, left, right))
        }
        Some("in") => {
            parser.next_token()?;
            let candidates = parse_in_candidates(parser)?;
            Ok(Expression::new(
                ExpressionKind::InList {
                    negated,
                    operand: Box::new(left),
                    candidates,
                },
                location,
            ))
        }
        Some("between") => {
            parser.next_token()?;
            let second = parse_arithmetic(parser, 1)?;
            parser.expect_keyword("and")?;
            let third = parse_arithmetic(parser, 1)?;
            let op = if negated { TernaryOperator::NotBetween } else { TernaryOperator::Between };
            Ok(Expression::new(
                ExpressionKind::Ternary {
                    op,
                    first: Box::new(left),
                    second: Box::new(second),
                    third: Box::new(third),
                },
                location,
            ))
        }
        Some("is") => {
            parser.next_token()?;
            let op = if parser.consume_keyword("not")? {
                UnaryOperator::IsNotNull
            } else {
                UnaryOperator::IsNull
            };
            parser.expect_keyword("null")?;
            Ok(Expression::new(
                ExpressionKind::Unary {
                    op,
                    operand: Box::new(left),
                },
                location,
            ))
        }
        _ => Ok(left),
    }
}

/// Parse `( expr {, expr} )` or `( select ... )` after IN
fn parse_in_candidates(parser: &mut Parser) -> Result<Vec<Expression>> {
    parser.expect_token(TokenType::LeftParen)?;
    let candidates = if parser.current_is_keyword("select") {
        let location = parser.location();
        let query = parse_select(parser)?;
        vec![Expression::new(ExpressionKind::Subquery(Box::new(query)), location)]
    } else {
        parse_expression_list(parser)?
    };
    parser.expect_token(TokenType::RightParen)?;
    Ok(candidates)
}

/// Parse a comma-separated list of one or more expressions
pub fn parse_expression_list(parser: &mut Parser) -> Result<Vec<Expression>> {
    let mut expressions = vec![parse_expression(parser)?];
    while parser.consume_token(&TokenType::COMMA)? {
        expressions.push(parse_expression(parser)?);
    }
    Ok(expressions)
}

/// Precedence climbing over the arithmetic and bitwise operators
fn parse_arithmetic(parser: &mut Parser, min_precedence: u8) -> Result<Expression> {
    let mut left = parse_unary(parser)?;

    loop {
        let precedence = get_operator_precedence(&parser.current_token.token_type);
        if precedence == 0 || precedence < min_precedence {
            break;
        }
        let op = match token_to_operator(&parser.current_token.token_type) {
            Some(op) => op,
            None => break,
        };
        parser.next_token()?;
        let right = parse_arithmetic(parser, precedence + 1)?;
        left = binary(op, left, right);
    }

    Ok(left)
}

fn parse_unary(parser: &mut Parser) -> Result<Expression> {
    let op = match parser.current_token.token_type {
        TokenType::TILDE => UnaryOperator::BitNot,
        TokenType::MINUS => UnaryOperator::Negate,
        _ => return parse_postfix(parser),
    };
    let location = parser.location();
    parser.next_token()?;
    let operand = parse_unary(parser)?;
    Ok(Expression::new(
        ExpressionKind::Unary {
            op,
            operand: Box::new(operand),
        },
        location,
    ))
}

/// Calls `f(...)` and Postgres casts `expr::type`
fn parse_postfix(parser: &mut Parser) -> Result<Expression> {
    // A parenthesized name is a value, never a callee
    let parenthesized = parser.current_token_is(&TokenType::LeftParen);
    let mut expr = parse_primary(parser)?;

    loop {
        if parser.current_token_is(&TokenType::LeftParen) {
            let function = match expr.kind {
                ExpressionKind::QualifiedName { name, star: false } if !parenthesized => name,
                _ => return Err(parser.error("call of non-function")),
            };
            let arguments = parse_call_arguments(parser)?;
            expr = Expression::new(ExpressionKind::Call { function, arguments }, expr.location);
        } else if parser.consume_token(&TokenType::DoubleColon)? {
            let data_type = parse_data_type(parser)?;
            let location = expr.location.clone();
            expr = Expression::new(
                ExpressionKind::Cast {
                    operand: Box::new(expr),
                    data_type,
                },
                location,
            );
        } else {
            return Ok(expr);
        }
    }
}

/// Parse `( [* | [DISTINCT] expr {, expr}] )`
fn parse_call_arguments(parser: &mut Parser) -> Result<Vec<Expression>> {
    parser.expect_token(TokenType::LeftParen)?;
    let mut arguments = Vec::new();
    if parser.current_token_is(&TokenType::MULTIPLY) {
        let location = parser.location();
        parser.next_token()?;
        arguments.push(Expression::new(
            ExpressionKind::QualifiedName {
                name: QualifiedName::default(),
                star: true,
            },
            location,
        ));
    } else if !parser.current_token_is(&TokenType::RightParen) {
        parser.consume_keyword("distinct")?;
        arguments = parse_expression_list(parser)?;
    }
    parser.expect_token(TokenType::RightParen)?;
    Ok(arguments)
}

/// Parse a literal, name, parenthesized expression, subquery or EXISTS
pub fn parse_primary(parser: &mut Parser) -> Result<Expression> {
    let location = parser.location();
    let kind = match &parser.current_token.token_type {
        TokenType::NUMBER(number) => {
            let number = number.clone();
            parser.next_token()?;
            ExpressionKind::Number(number)
        }
        TokenType::STRING(text) => {
            let text = text.clone();
            parser.next_token()?;
            ExpressionKind::StringLiteral(text)
        }
        TokenType::LeftParen => {
            parser.next_token()?;
            if parser.current_is_keyword("select") {
                let query = parse_select(parser)?;
                parser.expect_token(TokenType::RightParen)?;
                ExpressionKind::Subquery(Box::new(query))
            } else {
                let expr = parse_expression(parser)?;
                parser.expect_token(TokenType::RightParen)?;
                return Ok(expr);
            }
        }
        TokenType::QuotedIdentifier(_) => return parse_name(parser),
        TokenType::IDENTIFIER(word) => {
            let word = word.clone();
            let lower = word.to_lowercase();
            if lower == "null" {
                parser.next_token()?;
                ExpressionKind::Null
            } else if lower == "exists" {
                parser.next_token()?;
                parser.expect_token(TokenType::LeftParen)?;
                let query = parse_select(parser)?;
                parser.expect_token(TokenType::RightParen)?;
                ExpressionKind::Exists(Box::new(query))
            } else if lower == "cast" && parser.peek_token()?.token_type == TokenType::LeftParen {
                parser.next_token()?;
                parser.expect_token(TokenType::LeftParen)?;
                let operand = parse_expression(parser)?;
                parser.expect_keyword("as")?;
                let data_type = parse_data_type(parser)?;
                parser.expect_token(TokenType::RightParen)?;
                ExpressionKind::Cast {
                    operand: Box::new(operand),
                    data_type,
                }
            } else if word.starts_with('@') || word.starts_with('$') {
                parser.next_token()?;
                ExpressionKind::ParameterRef(word)
            } else {
                return parse_name(parser);
            }
        }
        _ => return parser.expected("expression"),
    };
    Ok(Expression::new(kind, location))
}

/// Parse a possibly qualified name, allowing a trailing `.*`
fn parse_name(parser: &mut Parser) -> Result<Expression> {
    let location = parser.location();
    let mut names = vec![parser.parse_identifier()?];
    let mut star = false;
    while parser.consume_token(&TokenType::DOT)? {
        if parser.consume_token(&TokenType::MULTIPLY)? {
            star = true;
            break;
        }
        if parser.current_token_is(&TokenType::DOT) {
            names.push(String::new());
        } else {
            names.push(parser.parse_identifier()?);
        }
    }
    Ok(Expression::new(
        ExpressionKind::QualifiedName {
            name: QualifiedName::new(names),
            star,
        },
        location,
    ))
}
