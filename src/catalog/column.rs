// Column Management Module
//
// This module defines the Column type produced by column definitions in
// CREATE TABLE and ALTER TABLE ... ADD.

use serde::Serialize;

use super::schema::DataType;
use crate::common::Location;
use crate::query::parser::ast::Expression;

/// Seed and step of an identity column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub seed: i64,
    pub increment: i64,
}

impl Default for Identity {
    fn default() -> Self {
        Identity { seed: 1, increment: 1 }
    }
}

/// Represents a column in a table definition
#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    /// NULL unless declared NOT NULL
    pub nullable: bool,
    pub default: Option<Expression>,
    /// Expression of a computed (generated) column
    pub computed: Option<Expression>,
    /// MySQL AUTO_INCREMENT / SQLite AUTOINCREMENT
    pub auto_increment: bool,
    /// T-SQL IDENTITY or Postgres GENERATED ... AS IDENTITY
    pub identity: Option<Identity>,
    /// Set by resolution for members of the table's primary key
    pub primary_key: bool,
    pub not_for_replication: bool,
    pub sparse: bool,
    pub filestream: bool,
    pub rowguidcol: bool,
    pub unsigned: bool,
    pub zerofill: bool,
    pub charset: Option<String>,
    pub collation: Option<String>,
    pub comment: Option<String>,
    /// MySQL `ON UPDATE expr`
    pub on_update: Option<Expression>,
    #[serde(skip)]
    pub location: Location,
}

impl Column {
    /// Create a nullable column with no attributes
    pub fn new(name: impl Into<String>, data_type: DataType, location: Location) -> Self {
        Column {
            name: name.into(),
            data_type,
            nullable: true,
            default: None,
            computed: None,
            auto_increment: false,
            identity: None,
            primary_key: false,
            not_for_replication: false,
            sparse: false,
            filestream: false,
            rowguidcol: false,
            unsigned: false,
            zerofill: false,
            charset: None,
            collation: None,
            comment: None,
            on_update: None,
            location,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column definition as it appears inside CREATE TABLE
    pub fn definition_string(&self) -> String {
        let mut definition = self.name.clone();
        if let Some(computed) = &self.computed {
            definition.push_str(&format!(" AS ({})", computed));
            return definition;
        }
        definition.push_str(&format!(" {}", self.data_type));
        if self.unsigned {
            definition.push_str(" UNSIGNED");
        }
        if let Some(collation) = &self.collation {
            definition.push_str(&format!(" COLLATE {}", collation));
        }
        if !self.nullable {
            definition.push_str(" NOT NULL");
        }
        if let Some(identity) = &self.identity {
            definition.push_str(&format!(" IDENTITY({},{})", identity.seed, identity.increment));
        }
        if self.auto_increment {
            definition.push_str(" AUTO_INCREMENT");
        }
        if let Some(default) = &self.default {
            definition.push_str(&format!(" DEFAULT {}", default));
        }
        definition
    }
}
