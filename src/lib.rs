// Polysql: permissive multi-dialect SQL schema parser

pub mod catalog;
pub mod common;
pub mod query;

// Re-export key items for convenient access
pub use catalog::{Schema, Table};
pub use common::{Error, Location, Result};
pub use query::parser::{parse, parse_file, parse_with_location, Expression, Parser, Statement};
