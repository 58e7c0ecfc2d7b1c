// SQL Parser Module
//
// This module is responsible for parsing SQL source text in the T-SQL,
// MySQL, PostgreSQL and SQLite dialects and converting it into an abstract
// syntax tree (AST) representation.

pub mod ast;
pub mod components;
pub mod lexer;
pub mod parser;

// Export key types
pub use self::ast::{Expression, Statement};
pub use self::components::Parser;
pub use self::lexer::{Lexer, Token, TokenType};
pub use self::parser::{parse, parse_file, parse_with_location};
