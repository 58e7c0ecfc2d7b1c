// Constraint Module
//
// Keys, foreign keys, checks, indexes and the name references they hold.
// References are created holding only a name and are bound to a column
// position or a registry key by the resolution pass.

use std::fmt;

use serde::Serialize;

use super::column::Column;
use crate::common::Location;
use crate::query::parser::ast::{Expression, QualifiedName};

/// A reference to a column of the owning table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnRef {
    pub name: String,
    pub descending: bool,
    /// Position in the owning table's column list once resolved
    column: Option<usize>,
}

impl ColumnRef {
    pub fn new(name: impl Into<String>) -> Self {
        ColumnRef {
            name: name.into(),
            descending: false,
            column: None,
        }
    }

    pub fn resolved(&self) -> Option<usize> {
        self.column
    }

    /// Bind to a column position. An already bound reference keeps its target.
    pub(crate) fn bind(&mut self, index: usize) {
        if self.column.is_none() {
            self.column = Some(index);
        }
    }
}

/// A reference to another table of the schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRef {
    pub name: QualifiedName,
    /// Registry key of the referenced table once resolved
    table: Option<String>,
}

impl TableRef {
    pub fn new(name: QualifiedName) -> Self {
        TableRef { name, table: None }
    }

    pub fn resolved(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub(crate) fn bind(&mut self, key: String) {
        if self.table.is_none() {
            self.table = Some(key);
        }
    }
}

/// PRIMARY KEY or UNIQUE constraint
#[derive(Debug, Clone, Serialize)]
pub struct Key {
    pub name: Option<String>,
    pub primary: bool,
    /// CLUSTERED / NONCLUSTERED when given
    pub clustered: Option<bool>,
    pub columns: Vec<ColumnRef>,
    #[serde(skip)]
    pub location: Location,
}

impl Key {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "CONSTRAINT {} ", name)?;
        }
        write!(f, "{} ({})", if self.primary { "PRIMARY KEY" } else { "UNIQUE" }, self.column_names().join(", "))
    }
}

/// ON DELETE / ON UPDATE behavior
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ReferentialAction {
    #[default]
    NoAction,
    Cascade,
    SetNull,
    SetDefault,
}

impl fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ForeignKey {
    pub name: Option<String>,
    pub columns: Vec<ColumnRef>,
    pub table: TableRef,
    /// Empty when the referenced table's primary key is implied
    pub referenced_columns: Vec<String>,
    pub on_delete: ReferentialAction,
    pub on_update: ReferentialAction,
    pub not_for_replication: bool,
    #[serde(skip)]
    pub location: Location,
}

impl fmt::Display for ForeignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "CONSTRAINT {} ", name)?;
        }
        let columns: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        write!(f, "FOREIGN KEY ({}) REFERENCES {}", columns.join(", "), self.table.name)?;
        if !self.referenced_columns.is_empty() {
            write!(f, " ({})", self.referenced_columns.join(", "))?;
        }
        if self.on_delete != ReferentialAction::NoAction {
            write!(f, " ON DELETE {}", self.on_delete)?;
        }
        if self.on_update != ReferentialAction::NoAction {
            write!(f, " ON UPDATE {}", self.on_update)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Check {
    pub name: Option<String>,
    pub expression: Expression,
    pub not_for_replication: bool,
    #[serde(skip)]
    pub location: Location,
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "CONSTRAINT {} ", name)?;
        }
        write!(f, "CHECK ({})", self.expression)
    }
}

/// Secondary index from CREATE INDEX or a MySQL KEY/INDEX clause
#[derive(Debug, Clone, Serialize)]
pub struct Index {
    pub name: Option<String>,
    pub unique: bool,
    pub clustered: Option<bool>,
    pub columns: Vec<ColumnRef>,
    #[serde(skip)]
    pub location: Location,
}

/// T-SQL `[CONSTRAINT n] DEFAULT expr FOR column` from ALTER TABLE ... ADD
#[derive(Debug, Clone, Serialize)]
pub struct DefaultConstraint {
    pub name: Option<String>,
    pub expression: Expression,
    pub column: String,
    #[serde(skip)]
    pub location: Location,
}

/// One clause of a table definition or of ALTER TABLE ... ADD
#[derive(Debug, Clone, Serialize)]
pub enum TableElement {
    Column(Column),
    Key(Key),
    ForeignKey(ForeignKey),
    Check(Check),
    Index(Index),
    Default(DefaultConstraint),
}
