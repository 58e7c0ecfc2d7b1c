// SQL Lexer Implementation
//
// This module implements a pull-based lexer for the union of the T-SQL,
// MySQL, PostgreSQL and SQLite lexical conventions. Keywords are not
// recognised here: every word is an IDENTIFIER and the parser compares
// words case-insensitively.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;
use std::sync::Arc;

use crate::common::types::{DEFAULT_FILE, DEFAULT_LINE};
use crate::common::{Error, Location, Result};

/// SQL Token types
#[derive(Debug, PartialEq, Clone)]
pub enum TokenType {
    // Words and literals
    IDENTIFIER(String),
    QuotedIdentifier(String),
    STRING(String),
    NUMBER(String),

    // Operators
    EQUALS,         // =
    LessThan,       // <
    GreaterThan,    // >
    LessEqual,      // <=, !>
    GreaterEqual,   // >=, !<
    NotEqual,       // <>, !=
    PLUS,           // +
    MINUS,          // -
    MULTIPLY,       // *
    DIVIDE,         // /
    MODULO,         // %
    CONCAT,         // ||
    AMPERSAND,      // &
    CARET,          // ^
    TILDE,          // ~
    DoubleColon,    // ::

    // Punctuation
    SEMICOLON,      // ;
    COMMA,          // ,
    LeftParen,      // (
    RightParen,     // )
    DOT,            // .

    // Special
    EOF,
}

impl TokenType {
    /// Human readable form used in "expected X, found Y" diagnostics
    pub fn describe(&self) -> String {
        match self {
            TokenType::EOF => "end of input".to_string(),
            other => format!("'{}'", other),
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::IDENTIFIER(word) => write!(f, "{}", word),
            TokenType::QuotedIdentifier(name) => write!(f, "\"{}\"", name.replace('"', "\"\"")),
            TokenType::STRING(text) => write!(f, "'{}'", text.replace('\'', "''")),
            TokenType::NUMBER(number) => write!(f, "{}", number),
            TokenType::EQUALS => write!(f, "="),
            TokenType::LessThan => write!(f, "<"),
            TokenType::GreaterThan => write!(f, ">"),
            TokenType::LessEqual => write!(f, "<="),
            TokenType::GreaterEqual => write!(f, ">="),
            TokenType::NotEqual => write!(f, "<>"),
            TokenType::PLUS => write!(f, "+"),
            TokenType::MINUS => write!(f, "-"),
            TokenType::MULTIPLY => write!(f, "*"),
            TokenType::DIVIDE => write!(f, "/"),
            TokenType::MODULO => write!(f, "%"),
            TokenType::CONCAT => write!(f, "||"),
            TokenType::AMPERSAND => write!(f, "&"),
            TokenType::CARET => write!(f, "^"),
            TokenType::TILDE => write!(f, "~"),
            TokenType::DoubleColon => write!(f, "::"),
            TokenType::SEMICOLON => write!(f, ";"),
            TokenType::COMMA => write!(f, ","),
            TokenType::LeftParen => write!(f, "("),
            TokenType::RightParen => write!(f, ")"),
            TokenType::DOT => write!(f, "."),
            TokenType::EOF => write!(f, ""),
        }
    }
}

/// A Token represents a lexical unit of the source text
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub line: usize,
}

impl Token {
    /// True when the token is the unquoted word `keyword` (ignoring case)
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(&self.token_type, TokenType::IDENTIFIER(word) if word.eq_ignore_ascii_case(keyword))
    }

    /// Lowercase text of an unquoted word, if the token is one
    pub fn keyword(&self) -> Option<String> {
        match &self.token_type {
            TokenType::IDENTIFIER(word) => Some(word.to_ascii_lowercase()),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.token_type)
    }
}

/// SQL Lexer producing one token at a time
pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
    file: Arc<str>,
    line: usize,
    ch: Option<char>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer with the default file tag and starting line
    pub fn new(input: &'a str) -> Self {
        Self::with_location(input, DEFAULT_FILE, DEFAULT_LINE)
    }

    /// Create a lexer whose diagnostics name `file` and count lines from `line`
    pub fn with_location(input: &'a str, file: impl Into<Arc<str>>, line: usize) -> Self {
        let mut lexer = Lexer {
            input: input.chars().peekable(),
            file: file.into(),
            line,
            ch: None,
        };
        lexer.read_char();
        lexer
    }

    /// Location of the given line in this source unit
    pub fn location(&self, line: usize) -> Location {
        Location::new(self.file.clone(), line)
    }

    /// Lex the remaining input, including the final EOF token
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.token_type == TokenType::EOF;
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }

    /// Read the next character from the input
    fn read_char(&mut self) -> Option<char> {
        self.ch = self.input.next();
        if self.ch == Some('\n') {
            self.line += 1;
        }
        self.ch
    }

    /// Peek at the character after the current one
    fn peek_char(&mut self) -> Option<char> {
        self.input.peek().copied()
    }

    /// Consume the current character if it is `expected`
    fn follow(&mut self, expected: char) -> bool {
        if self.ch == Some(expected) {
            self.read_char();
            true
        } else {
            false
        }
    }

    fn error_at(&self, line: usize, message: impl Into<String>) -> Error {
        Error::new(self.location(line), message)
    }

    /// Skip whitespace characters, including a byte-order mark
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.ch {
            if ch.is_whitespace() || ch == '\u{feff}' {
                self.read_char();
            } else {
                break;
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.ch {
            if ch == '\n' {
                break;
            }
            self.read_char();
        }
    }

    /// Skip a non-nesting `/* ... */` comment. Errors report the opening line.
    fn skip_block_comment(&mut self) -> Result<()> {
        let opened = self.line;
        self.read_char();
        self.read_char();
        loop {
            let next = self.peek_char();
            match self.ch {
                None => return Err(self.error_at(opened, "unterminated comment")),
                Some('*') if next == Some('/') => {
                    self.read_char();
                    self.read_char();
                    return Ok(());
                }
                Some(_) => {
                    self.read_char();
                }
            }
        }
    }

    /// Read a delimited string or identifier starting at the opening delimiter.
    ///
    /// A doubled closing delimiter stands for itself. With `backslash_escapes`,
    /// `\` followed by the delimiter or by another `\` also stands for that
    /// character; any other backslash is kept as is.
    fn read_quoted(&mut self, close: char, backslash_escapes: bool, what: &str) -> Result<String> {
        let opened = self.line;
        let mut text = String::new();
        self.read_char();
        loop {
            let next = self.peek_char();
            match self.ch {
                None => return Err(self.error_at(opened, format!("unterminated {}", what))),
                Some('\\') if backslash_escapes && (next == Some(close) || next == Some('\\')) => {
                    self.read_char();
                    if let Some(escaped) = self.ch {
                        text.push(escaped);
                    }
                    self.read_char();
                }
                Some(c) if c == close => {
                    self.read_char();
                    if self.follow(close) {
                        text.push(close);
                    } else {
                        return Ok(text);
                    }
                }
                Some(c) => {
                    text.push(c);
                    self.read_char();
                }
            }
        }
    }

    /// Read a word (identifier or keyword)
    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(ch) = self.ch {
            if is_word_char(ch) {
                word.push(ch);
                self.read_char();
            } else {
                break;
            }
        }
        word
    }

    /// Read a numeric literal. The text is not validated.
    fn read_number(&mut self) -> String {
        let mut number = String::new();
        while let Some(ch) = self.ch {
            if is_word_char(ch) || ch == '.' {
                number.push(ch);
                self.read_char();
            } else {
                break;
            }
        }
        number
    }

    /// Classify an operator or punctuation character that was just consumed
    fn read_operator(&mut self, ch: char, line: usize) -> Result<TokenType> {
        let token_type = match ch {
            ';' => TokenType::SEMICOLON,
            ',' => TokenType::COMMA,
            '(' => TokenType::LeftParen,
            ')' => TokenType::RightParen,
            '.' => TokenType::DOT,
            '+' => TokenType::PLUS,
            '-' => TokenType::MINUS,
            '*' => TokenType::MULTIPLY,
            '/' => TokenType::DIVIDE,
            '%' => TokenType::MODULO,
            '=' => TokenType::EQUALS,
            '&' => TokenType::AMPERSAND,
            '^' => TokenType::CARET,
            '~' => TokenType::TILDE,
            '<' => {
                if self.follow('=') {
                    TokenType::LessEqual
                } else if self.follow('>') {
                    TokenType::NotEqual
                } else {
                    TokenType::LessThan
                }
            }
            '>' => {
                if self.follow('=') {
                    TokenType::GreaterEqual
                } else {
                    TokenType::GreaterThan
                }
            }
            '!' => {
                if self.follow('=') {
                    TokenType::NotEqual
                } else if self.follow('<') {
                    TokenType::GreaterEqual
                } else if self.follow('>') {
                    TokenType::LessEqual
                } else {
                    return Err(self.error_at(line, "stray character '!'"));
                }
            }
            '|' if self.follow('|') => TokenType::CONCAT,
            ':' if self.follow(':') => TokenType::DoubleColon,
            other => return Err(self.error_at(line, format!("stray character '{}'", other))),
        };
        Ok(token_type)
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<Token> {
        loop {
            self.skip_whitespace();
            match (self.ch, self.peek_char()) {
                (Some('-'), Some('-')) => self.skip_line_comment(),
                (Some('/'), Some('*')) => self.skip_block_comment()?,
                _ => break,
            }
        }

        let line = self.line;
        let ch = match self.ch {
            Some(ch) => ch,
            None => {
                return Ok(Token {
                    token_type: TokenType::EOF,
                    line,
                })
            }
        };

        let token_type = match ch {
            '\'' => TokenType::STRING(self.read_quoted('\'', true, "string literal")?),
            '"' => TokenType::QuotedIdentifier(self.read_quoted('"', true, "quoted identifier")?),
            '`' => TokenType::QuotedIdentifier(self.read_quoted('`', true, "quoted identifier")?),
            '[' => TokenType::QuotedIdentifier(self.read_quoted(']', false, "quoted identifier")?),
            c if c.is_ascii_digit() => TokenType::NUMBER(self.read_number()),
            c if is_word_char(c) => {
                let word = self.read_word();
                // N'..', B'..', X'..' and E'..' prefixed string literals
                if self.ch == Some('\'') && is_string_prefix(&word) {
                    TokenType::STRING(self.read_quoted('\'', true, "string literal")?)
                } else {
                    TokenType::IDENTIFIER(word)
                }
            }
            _ => {
                self.read_char();
                self.read_operator(ch, line)?
            }
        };

        Ok(Token { token_type, line })
    }
}

fn is_string_prefix(word: &str) -> bool {
    matches!(word, "N" | "n" | "B" | "b" | "X" | "x" | "E" | "e")
}

/// Check if a character may appear in a word or numeric literal
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '@' | '#' | '$')
}
