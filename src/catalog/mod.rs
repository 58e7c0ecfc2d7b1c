//! Catalog Management Module
//!
//! This module holds the schema model built from parsed statements: tables,
//! columns, keys, foreign keys, checks and indexes, the name-keyed Schema
//! registry, ALTER TABLE merging and the reference resolution pass.

pub mod alter_table;
pub mod column;
pub mod constraint;
pub mod resolution;
pub mod schema;
pub mod table;

// Re-export key types
pub use self::column::{Column, Identity};
pub use self::constraint::{
    Check, ColumnRef, DefaultConstraint, ForeignKey, Index, Key, ReferentialAction, TableElement, TableRef,
};
pub use self::schema::{DataType, Schema, TypeSize};
pub use self::table::Table;
