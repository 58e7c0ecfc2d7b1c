// tests/integration/sql_alter_table_tests.rs

use anyhow::Result;

use polysql::catalog::{Schema, Table};
use polysql::query::parser::ast::{QualifiedName, Statement};

#[path = "../common/mod.rs"]
mod common;

// Helper: a schema holding one two-column table
fn setup_schema() -> Result<Schema> {
    let mut schema = Schema::new();
    schema.parse_str("CREATE TABLE dbo.accounts (id int NOT NULL, owner varchar(50));")?;
    Ok(schema)
}

fn accounts(schema: &Schema) -> &Table {
    schema.find_table(&QualifiedName::from("dbo.accounts")).expect("accounts table")
}

fn column_names(table: &Table) -> Vec<&str> {
    table.columns().iter().map(|c| c.name()).collect()
}

#[test]
fn test_add_single_column() -> Result<()> {
    let mut schema = setup_schema()?;
    schema.parse_str("ALTER TABLE dbo.accounts ADD balance decimal(12, 2) NOT NULL DEFAULT 0")?;

    let table = accounts(&schema);
    assert_eq!(column_names(table), vec!["id", "owner", "balance"]);
    let balance = table.get_column("balance").expect("balance");
    assert!(!balance.nullable);
    assert_eq!(balance.data_type.to_string(), "decimal(12, 2)");
    Ok(())
}

#[test]
fn test_add_several_columns() -> Result<()> {
    let mut schema = setup_schema()?;
    // MySQL repeats ADD, T-SQL and Postgres may not
    schema.parse_str("ALTER TABLE accounts ADD COLUMN opened date, ADD COLUMN closed date;")?;
    schema.parse_str("ALTER TABLE accounts ADD region char(2), tier int")?;
    schema.parse_str("ALTER TABLE accounts ADD (note text)")?;

    assert_eq!(
        column_names(accounts(&schema)),
        vec!["id", "owner", "opened", "closed", "region", "tier", "note"]
    );
    Ok(())
}

#[test]
fn test_add_statements_on_consecutive_lines() -> Result<()> {
    let mut schema = setup_schema()?;
    schema.parse_str(
        "ALTER TABLE accounts ADD region char(2) NOT NULL\n\
         ALTER TABLE accounts ADD tier int\n\
         PRINT 'altered'",
    )?;
    assert_eq!(column_names(accounts(&schema)), vec!["id", "owner", "region", "tier"]);
    Ok(())
}

#[test]
fn test_add_constraints() -> Result<()> {
    let mut schema = setup_schema()?;
    schema.parse_str(
        "CREATE TABLE owners (name varchar(50) PRIMARY KEY);\n\
         ALTER TABLE accounts ADD CONSTRAINT pk_accounts PRIMARY KEY (id);\n\
         ALTER TABLE accounts WITH NOCHECK ADD CONSTRAINT fk_owner FOREIGN KEY (owner) REFERENCES owners (name);\n\
         ALTER TABLE accounts ADD CONSTRAINT ck_id CHECK (id > 0), CONSTRAINT uq_owner UNIQUE (owner);\n\
         ALTER TABLE accounts ADD CONSTRAINT df_owner DEFAULT ('nobody') FOR owner;",
    )?;
    schema.resolve()?;

    let table = accounts(&schema);
    assert_eq!(table.primary_key().map(|k| k.name.clone()), Some(Some("pk_accounts".to_string())));
    assert_eq!(table.foreign_keys()[0].table.resolved(), Some("owners"));
    assert_eq!(table.checks()[0].expression.to_string(), "id > 0");
    assert_eq!(table.unique_keys().len(), 1);
    assert_eq!(
        table.get_column("owner").and_then(|c| c.default.clone()).map(|d| d.to_string()).as_deref(),
        Some("'nobody'")
    );
    assert!(table.columns()[0].primary_key);
    Ok(())
}

#[test]
fn test_alter_statement_shape() -> Result<()> {
    let statement = common::parse_one("ALTER TABLE [dbo].[t] WITH CHECK ADD CONSTRAINT [fk] FOREIGN KEY ([a]) REFERENCES [u] ([id])")?;
    if let Statement::AlterTableAdd { table, check, elements, .. } = statement {
        assert_eq!(table.to_string(), "dbo.t");
        assert_eq!(check, Some(true));
        assert_eq!(elements.len(), 1);
    } else {
        panic!("Expected ALTER TABLE ... ADD");
    }
    Ok(())
}

#[test]
fn test_add_duplicate_column_fails_atomically() -> Result<()> {
    let mut schema = setup_schema()?;
    let err = schema
        .parse_str("ALTER TABLE accounts ADD extra int;\nALTER TABLE accounts ADD OWNER text;")
        .unwrap_err();
    assert_eq!(err.line(), 2);
    assert_eq!(err.message, "duplicate column name 'OWNER' in table 'dbo.accounts'");
    assert_eq!(column_names(accounts(&schema)), vec!["id", "owner"]);
    Ok(())
}

#[test]
fn test_second_primary_key_fails() -> Result<()> {
    let mut schema = Schema::new();
    schema.parse_str("create table t (id int primary key, code int);")?;
    let err = schema.parse_str("alter table t add primary key (code);").unwrap_err();
    assert!(err.message.contains("duplicate primary key"), "{}", err);
    Ok(())
}

#[test]
fn test_alter_unknown_table() {
    let mut schema = Schema::new();
    let err = schema.parse_str("\n\nALTER TABLE ghosts ADD x int").unwrap_err();
    assert_eq!(err.to_string(), "<input>:3: table 'ghosts' not found");
}

#[test]
fn test_default_for_unknown_column() -> Result<()> {
    let mut schema = setup_schema()?;
    let err = schema
        .parse_str("ALTER TABLE accounts ADD CONSTRAINT df DEFAULT 0 FOR missing")
        .unwrap_err();
    assert_eq!(err.message, "column 'missing' not found in table 'dbo.accounts'");
    Ok(())
}

#[test]
fn test_alter_resolves_by_unqualified_name() -> Result<()> {
    let mut schema = setup_schema()?;
    schema.parse_str("ALTER TABLE [Accounts] ADD [Flag] bit")?;
    assert!(accounts(&schema).has_column("flag"));
    Ok(())
}
