// ALTER TABLE Module
//
// Registry operations that merge ALTER TABLE ... ADD and CREATE INDEX into
// tables that already exist.

use log::debug;

use super::constraint::{Index, TableElement};
use super::schema::Schema;
use crate::common::{Location, Result};
use crate::query::parser::ast::QualifiedName;

impl Schema {
    /// Merge the elements of `ALTER TABLE name ADD ...` into a registered table.
    ///
    /// The table is updated only if every element is accepted; a duplicate
    /// column name leaves it unchanged.
    pub fn alter_table_add(&mut self, table_name: &QualifiedName, elements: &[TableElement], location: &Location) -> Result<()> {
        let table = self.get_table_mut(table_name, location)?;
        let mut staged = table.clone();
        for element in elements {
            staged.add_element(element.clone())?;
        }
        debug!("Added {} elements to table {}", elements.len(), staged.name());
        *table = staged;
        Ok(())
    }

    /// Attach a CREATE INDEX result to its table
    pub fn add_index(&mut self, table_name: &QualifiedName, index: Index) -> Result<()> {
        let location = index.location.clone();
        let table = self.get_table_mut(table_name, &location)?;
        table.add_index(index);
        Ok(())
    }
}
