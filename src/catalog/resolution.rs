// Reference Resolution
//
// Finalize pass run after every source unit has been parsed: binds each
// ColumnRef to a column position of its own table and each foreign key's
// TableRef to a registry key, so a foreign key may name a table declared
// later in the same unit or in a later file.

use std::collections::HashMap;

use log::debug;

use super::constraint::ColumnRef;
use super::schema::Schema;
use super::table::Table;
use crate::common::{Error, Location, Result};

impl Schema {
    /// Bind all unresolved references.
    ///
    /// Fails with a not-found diagnostic at the owning constraint when a
    /// referenced table or column does not exist. On failure the schema is
    /// left unchanged. References bound by an earlier call are kept.
    pub fn resolve(&mut self) -> Result<()> {
        let columns: HashMap<String, Vec<String>> = self
            .tables()
            .map(|table| {
                let names = table.columns().iter().map(|c| c.name.to_lowercase()).collect();
                (table.key(), names)
            })
            .collect();

        // Foreign key targets are looked up before any table is borrowed mutably
        let mut targets: HashMap<(String, usize), String> = HashMap::new();
        for table in self.tables() {
            for (i, foreign_key) in table.foreign_keys().iter().enumerate() {
                if foreign_key.table.resolved().is_some() {
                    continue;
                }
                let target = self.lookup_key(&foreign_key.table.name).ok_or_else(|| {
                    Error::new(
                        foreign_key.location.clone(),
                        format!("table '{}' not found", foreign_key.table.name),
                    )
                })?;
                let target_columns = columns.get(&target).map(Vec::as_slice).unwrap_or(&[]);
                for name in &foreign_key.referenced_columns {
                    if !target_columns.contains(&name.to_lowercase()) {
                        return Err(Error::new(
                            foreign_key.location.clone(),
                            format!("column '{}' not found in table '{}'", name, foreign_key.table.name),
                        ));
                    }
                }
                targets.insert((table.key(), i), target);
            }
        }

        let mut staged = self.clone();
        for table in staged.tables_mut() {
            bind_columns(table)?;

            let table_key = table.key();
            for (i, foreign_key) in table.foreign_keys_mut().iter_mut().enumerate() {
                if let Some(target) = targets.remove(&(table_key.clone(), i)) {
                    foreign_key.table.bind(target);
                }
            }

            let primary: Vec<usize> = table
                .primary_key()
                .map(|key| key.columns.iter().filter_map(ColumnRef::resolved).collect())
                .unwrap_or_default();
            for i in primary {
                table.columns_mut()[i].primary_key = true;
            }
        }

        debug!("Resolved references across {} tables", staged.len());
        *self = staged;
        Ok(())
    }
}

/// Bind key, foreign key and index columns to positions in `table`
fn bind_columns(table: &mut Table) -> Result<()> {
    let positions: HashMap<String, usize> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(i, c)| (c.name.to_lowercase(), i))
        .collect();
    let table_name = table.name().to_string();

    let bind = |refs: &mut [ColumnRef], location: &Location| -> Result<()> {
        for column in refs.iter_mut().filter(|c| c.resolved().is_none()) {
            match positions.get(&column.name.to_lowercase()) {
                Some(&i) => column.bind(i),
                None => {
                    return Err(Error::new(
                        location.clone(),
                        format!("column '{}' not found in table '{}'", column.name, table_name),
                    ));
                }
            }
        }
        Ok(())
    };

    if let Some(key) = table.primary_key_mut() {
        bind(&mut key.columns, &key.location)?;
    }
    for key in table.unique_keys_mut() {
        bind(&mut key.columns, &key.location)?;
    }
    for foreign_key in table.foreign_keys_mut() {
        bind(&mut foreign_key.columns, &foreign_key.location)?;
    }
    for index in table.indexes_mut() {
        bind(&mut index.columns, &index.location)?;
    }
    Ok(())
}
