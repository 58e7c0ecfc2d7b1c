// SQL Parser Components
//
// This module contains the separate components of the SQL parser.
// Each component handles a specific aspect of SQL parsing.

// Core parser component
pub mod parser_core;
pub mod parser_expressions;
pub mod parser_select;
pub mod parser_ddl;
pub mod parser_dml;
pub mod parser_control;

// Re-export frequently used items
pub use parser_core::Parser;
pub use parser_expressions::parse_expression;
pub use parser_select::parse_select;
pub use parser_ddl::{parse_alter, parse_create, parse_data_type, parse_drop};
pub use parser_dml::{parse_delete, parse_insert, parse_update};
pub use parser_control::{
    parse_begin, parse_checkpoint, parse_commit_or_rollback, parse_declare, parse_execute, parse_if, parse_lock,
    parse_pragma, parse_print, parse_raiserror, parse_set, parse_start, parse_unlock, parse_use,
};
