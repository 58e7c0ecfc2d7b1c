use anyhow::Result;

use polysql::catalog::Schema;
use polysql::query::parser::{Lexer, TokenType};

fn assert_empty(sql: &str) -> Result<()> {
    assert!(polysql::parse(sql)?.is_empty(), "{:?} should hold no statements", sql);
    assert!(Schema::from_sql(sql)?.is_empty(), "{:?} should hold no tables", sql);
    Ok(())
}

#[test]
fn test_blank_and_comment_only_input() -> Result<()> {
    assert_empty("")?;
    assert_empty("\t\n")?;
    assert_empty("--")?;
    assert_empty("/**/")?;
    assert_empty("-- line\n/* block\n spanning lines */\n")?;
    Ok(())
}

#[test]
fn test_unterminated_block_comment_reports_line() {
    let err = polysql::parse("/*/").unwrap_err();
    assert_eq!(err.line(), 1);

    let err = polysql::parse("\n\n/*/").unwrap_err();
    assert_eq!(err.line(), 3);

    let err = polysql::parse_with_location("\n\n/*/", "offset.sql", 5).unwrap_err();
    assert_eq!(err.line(), 7);
    assert!(err.to_string().starts_with("offset.sql:7: "), "{}", err);
}

#[test]
fn test_stray_characters() {
    assert!(polysql::parse("!").is_err());
    assert!(polysql::parse("|").is_err());
    assert!(polysql::parse("select 1 | 2").is_err());
}

#[test]
fn test_bang_comparisons() -> Result<()> {
    for sql in ["!=", "!<", "!>"] {
        let tokens = Lexer::new(sql).tokenize()?;
        assert_eq!(tokens.len(), 2, "{} should lex as one operator", sql);
    }
    assert!(polysql::parse("select 1 where a != b and c !< d and e !> f").is_ok());
    Ok(())
}

#[test]
fn test_unterminated_quotes() {
    for sql in ["'abc", "\"abc", "`abc", "[abc"] {
        let err = polysql::parse(sql).unwrap_err();
        assert_eq!(err.line(), 1, "{}", sql);
    }
}

#[test]
fn test_quoted_forms() -> Result<()> {
    let tokens = Lexer::new("'it''s' [a]]b] \"x\"\"y\" `q` N'wide'").tokenize()?;
    let types: Vec<TokenType> = tokens.into_iter().map(|t| t.token_type).collect();
    assert_eq!(
        types,
        vec![
            TokenType::STRING("it's".to_string()),
            TokenType::QuotedIdentifier("a]b".to_string()),
            TokenType::QuotedIdentifier("x\"y".to_string()),
            TokenType::QuotedIdentifier("q".to_string()),
            TokenType::STRING("wide".to_string()),
            TokenType::EOF,
        ]
    );
    Ok(())
}

#[test]
fn test_line_numbers_follow_newlines() -> Result<()> {
    let tokens = Lexer::with_location("a\n/* x\ny */ b\r\nc", "lines.sql", 10).tokenize()?;
    let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
    assert_eq!(lines, vec![10, 12, 13, 13]);
    Ok(())
}
