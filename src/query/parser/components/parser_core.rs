// Core Parser Implementation
//
// This module implements the token cursor shared by every grammar
// component: one current token, one token of lookahead, and the helpers
// for keywords, punctuation, identifiers and diagnostics.

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::common::types::{DEFAULT_FILE, DEFAULT_LINE};
use crate::common::{Error, Location, Result};
use crate::query::parser::ast::QualifiedName;
use crate::query::parser::lexer::{Lexer, Token, TokenType};

/// Words that begin a statement. Raw option lists stop at one of these
/// when it starts a new line.
pub static STATEMENT_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "alter", "begin", "checkpoint", "commit", "create", "declare", "delete", "drop", "exec",
        "execute", "go", "if", "insert", "lock", "pragma", "print", "raiserror", "rollback",
        "select", "set", "start", "unlock", "update", "use",
    ]
    .into_iter()
    .collect()
});

/// Words that can never be an implicit alias
pub static RESERVED_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    let mut words: HashSet<&'static str> = [
        "all", "and", "as", "between", "by", "cross", "distinct", "else", "end", "except",
        "exists", "from", "full", "group", "having", "in", "inner", "intersect", "is", "join",
        "left", "like", "limit", "not", "null", "offset", "on", "or", "order", "outer", "right",
        "union", "using", "values", "when", "where", "window", "with",
    ]
    .into_iter()
    .collect();
    words.extend(STATEMENT_KEYWORDS.iter());
    words
});

/// SQL Parser cursor over the lexer's token stream
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    pub current_token: Token,
    peeked: Option<Token>,
    /// Line of the most recently consumed token
    previous_line: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser from a SQL string
    pub fn new(input: &'a str) -> Result<Self> {
        Self::with_location(input, DEFAULT_FILE, DEFAULT_LINE)
    }

    /// Create a parser whose diagnostics name `file` and count lines from `line`
    pub fn with_location(input: &'a str, file: impl Into<Arc<str>>, line: usize) -> Result<Self> {
        let mut lexer = Lexer::with_location(input, file, line);
        let current_token = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current_token,
            peeked: None,
            previous_line: line,
        })
    }

    /// Advance to the next token, returning the one just consumed
    pub fn next_token(&mut self) -> Result<Token> {
        let next = match self.peeked.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        let consumed = std::mem::replace(&mut self.current_token, next);
        self.previous_line = consumed.line;
        Ok(consumed)
    }

    /// Peek at the token after the current one without consuming anything
    pub fn peek_token(&mut self) -> Result<&Token> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        Ok(self.peeked.insert(token))
    }

    /// True when the token after the current one is the word `keyword`
    pub fn peek_is_keyword(&mut self, keyword: &str) -> Result<bool> {
        Ok(self.peek_token()?.is_keyword(keyword))
    }

    /// Location of the current token
    pub fn location(&self) -> Location {
        self.lexer.location(self.current_token.line)
    }

    pub fn error(&self, message: impl Into<String>) -> Error {
        Error::new(self.location(), message)
    }

    /// Fail with "expected {what}, found {current token}"
    pub fn expected<T>(&self, what: &str) -> Result<T> {
        Err(self.error(format!(
            "expected {}, found {}",
            what,
            self.current_token.token_type.describe()
        )))
    }

    /// Check if the current token is of the given kind. Payloads are ignored.
    pub fn current_token_is(&self, token_type: &TokenType) -> bool {
        std::mem::discriminant(&self.current_token.token_type) == std::mem::discriminant(token_type)
    }

    pub fn current_is_keyword(&self, keyword: &str) -> bool {
        self.current_token.is_keyword(keyword)
    }

    /// Lowercase text of the current token if it is an unquoted word
    pub fn current_keyword(&self) -> Option<String> {
        self.current_token.keyword()
    }

    /// True at `;` or end of input
    pub fn at_statement_end(&self) -> bool {
        matches!(self.current_token.token_type, TokenType::SEMICOLON | TokenType::EOF)
    }

    /// True when the current token is a statement keyword that begins a
    /// line after the last consumed token
    pub fn at_new_statement(&self) -> bool {
        self.current_token.line != self.previous_line
            && self
                .current_keyword()
                .is_some_and(|word| STATEMENT_KEYWORDS.contains(word.as_str()))
    }

    /// Consume the current token if it is the word `keyword`
    pub fn consume_keyword(&mut self, keyword: &str) -> Result<bool> {
        if self.current_is_keyword(keyword) {
            self.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consume the first of `keywords` that matches the current token
    pub fn consume_any_keyword(&mut self, keywords: &[&str]) -> Result<Option<String>> {
        match self.current_keyword() {
            Some(word) if keywords.contains(&word.as_str()) => {
                self.next_token()?;
                Ok(Some(word))
            }
            _ => Ok(None),
        }
    }

    /// Consume the word `keyword` or fail with "expected KEYWORD"
    pub fn expect_keyword(&mut self, keyword: &str) -> Result<()> {
        if self.consume_keyword(keyword)? {
            Ok(())
        } else {
            self.expected(&keyword.to_uppercase())
        }
    }

    /// Consume the current token if it is of the given kind
    pub fn consume_token(&mut self, token_type: &TokenType) -> Result<bool> {
        if self.current_token_is(token_type) {
            self.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consume a token of the given kind or fail
    pub fn expect_token(&mut self, expected: TokenType) -> Result<Token> {
        if self.current_token_is(&expected) {
            self.next_token()
        } else {
            self.expected(&expected.describe())
        }
    }

    /// Parse an identifier: an unquoted word or any quoted name
    pub fn parse_identifier(&mut self) -> Result<String> {
        match &self.current_token.token_type {
            TokenType::IDENTIFIER(name) | TokenType::QuotedIdentifier(name) => {
                let identifier = name.clone();
                self.next_token()?;
                Ok(identifier)
            }
            _ => self.expected("identifier"),
        }
    }

    /// True if the current token can start an identifier
    pub fn at_identifier(&self) -> bool {
        matches!(
            self.current_token.token_type,
            TokenType::IDENTIFIER(_) | TokenType::QuotedIdentifier(_)
        )
    }

    /// Parse a dot-separated name. `a..b` yields an empty middle part.
    pub fn parse_qualified_name(&mut self) -> Result<QualifiedName> {
        let mut names = vec![self.parse_identifier()?];
        while self.consume_token(&TokenType::DOT)? {
            if self.current_token_is(&TokenType::DOT) {
                names.push(String::new());
            } else {
                names.push(self.parse_identifier()?);
            }
        }
        Ok(QualifiedName::new(names))
    }

    /// Parse `( name {, name} )`
    pub fn parse_identifier_list(&mut self) -> Result<Vec<String>> {
        self.expect_token(TokenType::LeftParen)?;
        let mut names = vec![self.parse_identifier()?];
        while self.consume_token(&TokenType::COMMA)? {
            names.push(self.parse_identifier()?);
        }
        self.expect_token(TokenType::RightParen)?;
        Ok(names)
    }

    /// Parse an integer literal, optionally negative
    pub fn parse_integer(&mut self) -> Result<i64> {
        let negative = self.consume_token(&TokenType::MINUS)?;
        let value = match &self.current_token.token_type {
            TokenType::NUMBER(text) => text.parse::<i64>().ok(),
            _ => None,
        };
        match value {
            Some(value) => {
                self.next_token()?;
                Ok(if negative { -value } else { value })
            }
            None => self.expected("integer"),
        }
    }

    /// Skip a balanced parenthesized group starting at the current `(`.
    /// Returns the text of the tokens inside, separated by spaces.
    pub fn skip_parenthesized(&mut self) -> Result<String> {
        self.expect_token(TokenType::LeftParen)?;
        let mut depth = 1;
        let mut text = Vec::new();
        loop {
            match self.current_token.token_type {
                TokenType::EOF => return self.expected("')'"),
                TokenType::LeftParen => depth += 1,
                TokenType::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        self.next_token()?;
                        return Ok(text.join(" "));
                    }
                }
                _ => {}
            }
            text.push(self.next_token()?.to_string());
        }
    }

    /// Collect trailing option text up to the end of a statement.
    ///
    /// Stops at `;`, end of input, a batch or block delimiter, or a
    /// statement keyword that begins a new line outside parentheses. Each
    /// comma at depth zero starts a new option.
    pub fn collect_options(&mut self) -> Result<Vec<String>> {
        let mut options = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut depth = 0usize;
        loop {
            if self.current_token.token_type == TokenType::EOF {
                break;
            }
            if depth == 0 {
                if self.at_statement_end() {
                    break;
                }
                let delimiter = self
                    .current_keyword()
                    .is_some_and(|word| matches!(word.as_str(), "go" | "else" | "end"));
                if delimiter || self.at_new_statement() {
                    break;
                }
                if self.current_token_is(&TokenType::COMMA) {
                    self.next_token()?;
                    if !current.is_empty() {
                        options.push(current.join(" "));
                        current.clear();
                    }
                    continue;
                }
            }
            match self.current_token.token_type {
                TokenType::LeftParen => depth += 1,
                TokenType::RightParen => depth = depth.saturating_sub(1),
                _ => {}
            }
            current.push(self.next_token()?.to_string());
        }
        if !current.is_empty() {
            options.push(current.join(" "));
        }
        Ok(options)
    }
}
