// Schema Management Module
//
// This module defines the DataType value and the Schema registry that
// accumulates tables from parsed statements.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use linked_hash_map::LinkedHashMap;
use log::debug;
use serde::Serialize;

use super::table::Table;
use crate::common::types::DEFAULT_LINE;
use crate::common::{Error, Location, Result};
use crate::query::parser::ast::{QualifiedName, Statement};
use crate::query::parser::parser::{parse_with_location, read_source};

/// Declared size of a type: a length or `(max)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TypeSize {
    Length(u64),
    Max,
}

impl fmt::Display for TypeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSize::Length(length) => write!(f, "{}", length),
            TypeSize::Max => write!(f, "max"),
        }
    }
}

/// A column or cast type as written: name, optional size and scale, and
/// the value list of ENUM/SET types. Type names are not interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataType {
    pub name: QualifiedName,
    pub size: Option<TypeSize>,
    pub scale: Option<u32>,
    pub values: Vec<String>,
}

impl DataType {
    pub fn new(name: QualifiedName) -> Self {
        DataType {
            name,
            ..Default::default()
        }
    }

    pub fn with_size(mut self, size: TypeSize, scale: Option<u32>) -> Self {
        self.size = Some(size);
        self.scale = scale;
        self
    }

    /// Lowercase unqualified type name
    pub fn base_name(&self) -> String {
        self.name.last().to_lowercase()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.values.is_empty() {
            let values: Vec<String> = self.values.iter().map(|v| format!("'{}'", v.replace('\'', "''"))).collect();
            return write!(f, "({})", values.join(", "));
        }
        match (self.size, self.scale) {
            (Some(size), Some(scale)) => write!(f, "({}, {})", size, scale),
            (Some(size), None) => write!(f, "({})", size),
            _ => Ok(()),
        }
    }
}

/// Registry of tables keyed by lowercase qualified name, in creation order
#[derive(Debug, Clone, Default, Serialize)]
pub struct Schema {
    tables: LinkedHashMap<String, Table>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Schema {
            tables: LinkedHashMap::new(),
        }
    }

    /// Parse a whole source unit into a new schema and resolve its references
    pub fn from_sql(text: &str) -> Result<Self> {
        let mut schema = Schema::new();
        schema.parse_str(text)?;
        schema.resolve()?;
        Ok(schema)
    }

    /// Register a new table. Fails if the name is already taken.
    pub fn create_table(&mut self, table: Table) -> Result<()> {
        let key = table.key();
        if self.tables.contains_key(&key) {
            return Err(Error::new(
                table.location().clone(),
                format!("duplicate table name '{}'", table.name()),
            ));
        }
        debug!("Registering table {}", table.name());
        self.tables.insert(key, table);
        Ok(())
    }

    /// Find the registry key for a name.
    ///
    /// Matching ignores case. A name that is not registered verbatim binds
    /// to the only table sharing its last component, if there is exactly one.
    pub fn lookup_key(&self, name: &QualifiedName) -> Option<String> {
        let key = name.key();
        if self.tables.contains_key(&key) {
            return Some(key);
        }
        let last = name.last().to_lowercase();
        let mut candidates = self
            .tables
            .iter()
            .filter(|(_, table)| table.name().last().to_lowercase() == last)
            .map(|(key, _)| key);
        match (candidates.next(), candidates.next()) {
            (Some(found), None) => Some(found.clone()),
            _ => None,
        }
    }

    pub fn find_table(&self, name: &QualifiedName) -> Option<&Table> {
        self.lookup_key(name).and_then(|key| self.tables.get(&key))
    }

    /// Get a table, failing with a not-found diagnostic at `location`
    pub fn get_table(&self, name: &QualifiedName, location: &Location) -> Result<&Table> {
        self.find_table(name)
            .ok_or_else(|| Error::new(location.clone(), format!("table '{}' not found", name)))
    }

    pub fn get_table_mut(&mut self, name: &QualifiedName, location: &Location) -> Result<&mut Table> {
        match self.lookup_key(name) {
            Some(key) => self
                .tables
                .get_mut(&key)
                .ok_or_else(|| Error::new(location.clone(), format!("table '{}' not found", name))),
            None => Err(Error::new(location.clone(), format!("table '{}' not found", name))),
        }
    }

    /// Table by registry key
    pub fn table(&self, key: &str) -> Option<&Table> {
        self.tables.get(key)
    }

    /// Tables in creation order
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub(crate) fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.tables.iter_mut().map(|(_, table)| table)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Apply the schema effect of one statement.
    ///
    /// CREATE TABLE registers, ALTER TABLE ... ADD and CREATE INDEX merge
    /// into an existing table, IF and BEGIN ... END are descended into.
    /// Every other statement leaves the registry unchanged.
    pub fn apply(&mut self, statement: &Statement) -> Result<()> {
        match statement {
            Statement::CreateTable(table) => self.create_table(table.clone()),
            Statement::AlterTableAdd {
                table,
                elements,
                location,
                ..
            } => self.alter_table_add(table, elements, location),
            Statement::CreateIndex { table, index } => self.add_index(table, index.clone()),
            Statement::If {
                then_branch,
                else_branch,
                ..
            } => {
                self.apply(then_branch)?;
                if let Some(else_branch) = else_branch {
                    self.apply(else_branch)?;
                }
                Ok(())
            }
            Statement::Block(statements) => {
                for statement in statements {
                    self.apply(statement)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Parse one source unit and merge its tables.
    ///
    /// Either every statement is applied or, on the first error, the schema
    /// is left exactly as it was. Forward references are not bound here;
    /// call [`Schema::resolve`] once all units are parsed.
    pub fn parse_source(&mut self, text: &str, file: impl Into<Arc<str>>, line: usize) -> Result<Vec<Statement>> {
        let statements = parse_with_location(text, file, line)?;
        let mut staged = self.clone();
        for statement in &statements {
            staged.apply(statement)?;
        }
        debug!(
            "Applied {} statements, schema now holds {} tables",
            statements.len(),
            staged.len()
        );
        *self = staged;
        Ok(statements)
    }

    /// Parse in-memory text with the default file tag
    pub fn parse_str(&mut self, text: &str) -> Result<Vec<Statement>> {
        self.parse_source(text, crate::common::types::DEFAULT_FILE, DEFAULT_LINE)
    }

    /// Read and parse a file; diagnostics name the path
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<Vec<Statement>> {
        let path = path.as_ref();
        let text = read_source(path)?;
        self.parse_source(&text, path.display().to_string(), DEFAULT_LINE)
    }
}
