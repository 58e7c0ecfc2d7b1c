//! Table Management Module
//!
//! This module defines the Table type assembled from CREATE TABLE and
//! extended by ALTER TABLE ... ADD.

use std::collections::HashMap;

use log::debug;
use serde::Serialize;

use super::column::Column;
use super::constraint::{Check, DefaultConstraint, ForeignKey, Index, Key, TableElement};
use crate::common::{Error, Location, Result};
use crate::query::parser::ast::QualifiedName;

/// Represents a table definition
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    name: QualifiedName,
    /// Columns in declaration order
    columns: Vec<Column>,
    /// Lowercase column name to position
    #[serde(skip)]
    column_map: HashMap<String, usize>,
    primary_key: Option<Key>,
    unique_keys: Vec<Key>,
    foreign_keys: Vec<ForeignKey>,
    checks: Vec<Check>,
    indexes: Vec<Index>,
    #[serde(skip)]
    location: Location,
}

impl Table {
    /// Create an empty table
    pub fn new(name: QualifiedName, location: Location) -> Self {
        Table {
            name,
            columns: Vec::new(),
            column_map: HashMap::new(),
            primary_key: None,
            unique_keys: Vec::new(),
            foreign_keys: Vec::new(),
            checks: Vec::new(),
            indexes: Vec::new(),
            location,
        }
    }

    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    /// Registry key of this table
    pub fn key(&self) -> String {
        self.name.key()
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn primary_key(&self) -> Option<&Key> {
        self.primary_key.as_ref()
    }

    pub fn unique_keys(&self) -> &[Key] {
        &self.unique_keys
    }

    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    /// Get a column by name, ignoring case
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|i| &self.columns[i])
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_map.contains_key(&name.to_lowercase())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_map.get(&name.to_lowercase()).copied()
    }

    /// Columns of the primary key, in key order
    pub fn primary_key_columns(&self) -> Vec<&Column> {
        match &self.primary_key {
            Some(key) => key
                .columns
                .iter()
                .filter_map(|c| c.resolved().or_else(|| self.column_index(&c.name)))
                .map(|i| &self.columns[i])
                .collect(),
            None => Vec::new(),
        }
    }

    /// Add one table element, dispatching on its kind
    pub fn add_element(&mut self, element: TableElement) -> Result<()> {
        match element {
            TableElement::Column(column) => self.add_column(column),
            TableElement::Key(key) => self.add_key(key),
            TableElement::ForeignKey(foreign_key) => {
                self.foreign_keys.push(foreign_key);
                Ok(())
            }
            TableElement::Check(check) => {
                self.checks.push(check);
                Ok(())
            }
            TableElement::Index(index) => {
                self.add_index(index);
                Ok(())
            }
            TableElement::Default(default) => self.set_default(default),
        }
    }

    /// Append a column. Column names are unique regardless of case.
    pub fn add_column(&mut self, column: Column) -> Result<()> {
        let key = column.name.to_lowercase();
        if self.column_map.contains_key(&key) {
            return Err(Error::new(
                column.location.clone(),
                format!("duplicate column name '{}' in table '{}'", column.name, self.name),
            ));
        }
        self.column_map.insert(key, self.columns.len());
        self.columns.push(column);
        Ok(())
    }

    /// Add a primary or unique key. A table has at most one primary key.
    pub fn add_key(&mut self, key: Key) -> Result<()> {
        if !key.primary {
            self.unique_keys.push(key);
            return Ok(());
        }
        if self.primary_key.is_some() {
            return Err(Error::new(
                key.location.clone(),
                format!("duplicate primary key on table '{}'", self.name),
            ));
        }
        self.primary_key = Some(key);
        Ok(())
    }

    pub fn add_index(&mut self, index: Index) {
        debug!(
            "Attaching index {} to table {}",
            index.name.as_deref().unwrap_or("<unnamed>"),
            self.name
        );
        self.indexes.push(index);
    }

    /// Apply `DEFAULT expr FOR column` to an existing column
    pub fn set_default(&mut self, default: DefaultConstraint) -> Result<()> {
        match self.column_index(&default.column) {
            Some(i) => {
                self.columns[i].default = Some(default.expression);
                Ok(())
            }
            None => Err(Error::new(
                default.location,
                format!("column '{}' not found in table '{}'", default.column, self.name),
            )),
        }
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub(crate) fn primary_key_mut(&mut self) -> Option<&mut Key> {
        self.primary_key.as_mut()
    }

    pub(crate) fn unique_keys_mut(&mut self) -> &mut [Key] {
        &mut self.unique_keys
    }

    pub(crate) fn foreign_keys_mut(&mut self) -> &mut [ForeignKey] {
        &mut self.foreign_keys
    }

    pub(crate) fn indexes_mut(&mut self) -> &mut [Index] {
        &mut self.indexes
    }

    /// Get a string representation of the table definition
    pub fn schema_string(&self) -> String {
        let mut clauses: Vec<String> = self.columns.iter().map(Column::definition_string).collect();
        if let Some(key) = &self.primary_key {
            clauses.push(key.to_string());
        }
        clauses.extend(self.unique_keys.iter().map(|k| k.to_string()));
        clauses.extend(self.foreign_keys.iter().map(|fk| fk.to_string()));
        clauses.extend(self.checks.iter().map(|c| c.to_string()));

        let mut schema = format!("CREATE TABLE {} (\n", self.name);
        schema.push_str(
            &clauses
                .iter()
                .map(|clause| format!("  {}", clause))
                .collect::<Vec<_>>()
                .join(",\n"),
        );
        schema.push_str("\n);");

        for index in &self.indexes {
            let columns: Vec<&str> = index.columns.iter().map(|c| c.name.as_str()).collect();
            schema.push_str(&format!(
                "\nCREATE {}INDEX {} ON {} ({});",
                if index.unique { "UNIQUE " } else { "" },
                index.name.as_deref().unwrap_or("unnamed"),
                self.name,
                columns.join(", ")
            ));
        }
        schema
    }
}
