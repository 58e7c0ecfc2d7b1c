#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use tempfile::NamedTempFile;

use polysql::catalog::Schema;
use polysql::query::parser::ast::{Expression, SelectColumn};
use polysql::Statement;

// Path of a fixture script under tests/data
pub fn data_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("data").join(relative)
}

// Parse a fixture file into a fresh, resolved schema
pub fn load_schema(relative: &str) -> Result<Schema> {
    let mut schema = Schema::new();
    schema.parse_file(data_path(relative))?;
    schema.resolve()?;
    Ok(schema)
}

// Write SQL text to a temporary .sql file
pub fn write_temp_sql(text: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".sql").tempfile()?;
    file.write_all(text.as_bytes())?;
    file.flush()?;
    Ok(file)
}

// Parse text that must contain exactly one statement
pub fn parse_one(sql: &str) -> Result<Statement> {
    let mut statements = polysql::parse(sql)?;
    match statements.len() {
        1 => Ok(statements.remove(0)),
        n => Err(anyhow!("expected one statement, got {}", n)),
    }
}

// Parse `SELECT <expr>` and return the expression
pub fn select_expression(expr: &str) -> Result<Expression> {
    match parse_one(&format!("SELECT {}", expr))? {
        Statement::Select(mut select) => match select.columns.remove(0) {
            SelectColumn::Expression { expr, .. } => Ok(expr),
            SelectColumn::Wildcard => Err(anyhow!("expected an expression, got *")),
        },
        other => Err(anyhow!("expected SELECT, got {:?}", other)),
    }
}

// Parse a one-column table and return the column's DEFAULT expression
pub fn column_default(expr: &str) -> Result<Expression> {
    let schema = Schema::from_sql(&format!("CREATE TABLE defaults (x int DEFAULT {})", expr))?;
    let table = schema.tables().next().ok_or_else(|| anyhow!("no table parsed"))?;
    table.columns()[0]
        .default
        .clone()
        .ok_or_else(|| anyhow!("column has no default"))
}
