// Polysql Query Module
//
// This module contains the SQL front end: lexer, parser and AST.

pub mod parser;

// Export key public interfaces
pub use parser::{parse, parse_file, Parser, Statement};
