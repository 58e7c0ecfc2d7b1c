use anyhow::Result;

use polysql::catalog::{ReferentialAction, Schema};
use polysql::query::parser::ast::QualifiedName;

#[path = "../common/mod.rs"]
mod common;

use common::{data_path, load_schema, write_temp_sql};

fn table_names(schema: &Schema) -> Vec<String> {
    schema.tables().map(|t| t.name().to_string()).collect()
}

#[test]
fn test_library_schema() -> Result<()> {
    let schema = load_schema("library.sql")?;
    assert_eq!(table_names(&schema), vec!["authors", "books"]);

    let books = schema.find_table(&QualifiedName::from("books")).expect("books");
    assert_eq!(books.columns().len(), 6);
    assert_eq!(books.primary_key().map(|k| k.column_names()), Some(vec!["id"]));
    assert_eq!(books.unique_keys()[0].column_names(), vec!["isbn"]);
    assert_eq!(books.checks().len(), 1);
    assert_eq!(books.get_column("price").and_then(|c| c.default.clone()).map(|d| d.to_string()).as_deref(), Some("0.00"));

    let foreign_key = &books.foreign_keys()[0];
    assert_eq!(foreign_key.name.as_deref(), Some("fk_books_authors"));
    assert_eq!(foreign_key.on_delete, ReferentialAction::Cascade);
    assert_eq!(foreign_key.table.resolved(), Some("authors"));
    assert_eq!(foreign_key.columns[0].resolved(), Some(1));
    Ok(())
}

#[test]
fn test_forward_references_resolve() -> Result<()> {
    let schema = load_schema("forward_reference.sql")?;
    assert_eq!(schema.len(), 4);
    assert_eq!(table_names(&schema), vec!["order_lines", "orders", "products", "customers"]);

    let lines = schema.find_table(&QualifiedName::from("order_lines")).expect("order_lines");
    let targets: Vec<Option<&str>> = lines.foreign_keys().iter().map(|fk| fk.table.resolved()).collect();
    assert_eq!(targets, vec![Some("orders"), Some("products")]);

    let key_columns: Vec<&str> = lines.primary_key_columns().iter().map(|c| c.name()).collect();
    assert_eq!(key_columns, vec!["order_id", "product_id"]);
    assert!(lines.columns()[0].primary_key);
    assert!(!lines.columns()[2].primary_key);

    let orders = schema.find_table(&QualifiedName::from("ORDERS")).expect("orders");
    assert_eq!(orders.foreign_keys()[0].table.resolved(), Some("customers"));
    Ok(())
}

#[test]
fn test_northwind_schema() -> Result<()> {
    let schema = load_schema("northwind.sql")?;
    assert_eq!(schema.len(), 13);

    let details = schema.find_table(&QualifiedName::from("dbo.Order Details")).expect("order details");
    assert_eq!(details.key(), "dbo.order details");
    assert_eq!(details.foreign_keys().len(), 2);
    assert_eq!(details.checks().len(), 1);
    assert_eq!(details.indexes().len(), 1);
    assert_eq!(
        details.get_column("Quantity").and_then(|c| c.default.clone()).map(|d| d.to_string()).as_deref(),
        Some("1")
    );

    let employees = schema.find_table(&QualifiedName::from("Employees")).expect("employees");
    let self_reference = &employees.foreign_keys()[0];
    assert_eq!(self_reference.table.resolved(), Some("dbo.employees"));

    let categories = schema.find_table(&QualifiedName::from("dbo.Categories")).expect("categories");
    assert_eq!(categories.indexes()[0].clustered, Some(false));
    assert_eq!(categories.columns()[0].identity.map(|i| (i.seed, i.increment)), Some((1, 1)));
    Ok(())
}

#[test]
fn test_dialect_samples() -> Result<()> {
    for dialect in ["mssql", "mysql", "postgres", "sqlite"] {
        for (name, tables) in [("cities", 2), ("movies", 2), ("quotes", 1)] {
            let relative = format!("{}/{}.sql", dialect, name);
            let schema = load_schema(&relative)?;
            assert_eq!(schema.len(), tables, "{}", relative);
        }
    }
    Ok(())
}

#[test]
fn test_sqlite_forward_reference_and_typeless_column() -> Result<()> {
    let schema = load_schema("sqlite/movies.sql")?;
    assert_eq!(table_names(&schema), vec!["movies", "directors"]);

    let movies = schema.find_table(&QualifiedName::from("movies")).expect("movies");
    assert_eq!(movies.foreign_keys()[0].on_delete, ReferentialAction::SetNull);
    assert_eq!(movies.foreign_keys()[0].table.resolved(), Some("directors"));
    assert!(movies.indexes()[0].unique);

    let directors = schema.find_table(&QualifiedName::from("directors")).expect("directors");
    let born = directors.get_column("born").expect("born");
    assert_eq!(born.data_type.name.to_string(), "");
    Ok(())
}

#[test]
fn test_mysql_alter_adds_column_and_index() -> Result<()> {
    let schema = load_schema("mysql/quotes.sql")?;
    let quotes = schema.find_table(&QualifiedName::from("quotes")).expect("quotes");
    let names: Vec<&str> = quotes.columns().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["id", "author", "body", "created_at", "source"]);
    assert!(quotes.columns()[0].auto_increment);
    assert_eq!(quotes.indexes()[0].name.as_deref(), Some("idx_author"));
    Ok(())
}

#[test]
fn test_files_accumulate_into_one_schema() -> Result<()> {
    let mut schema = Schema::new();
    let first = write_temp_sql("create table a (id int primary key, b_id int references b (id));")?;
    let second = write_temp_sql("create table b (id int primary key);")?;

    schema.parse_file(first.path())?;
    assert!(schema.resolve().is_err());
    assert_eq!(schema.len(), 1);

    schema.parse_file(second.path())?;
    schema.resolve()?;
    let a = schema.find_table(&QualifiedName::from("a")).expect("a");
    assert_eq!(a.foreign_keys()[0].table.resolved(), Some("b"));
    Ok(())
}

#[test]
fn test_failed_file_leaves_schema_unchanged() -> Result<()> {
    let mut schema = Schema::new();
    schema.parse_file(data_path("library.sql"))?;

    let broken = write_temp_sql("create table extra (id int);\ncreate table authors (id int);")?;
    let err = schema.parse_file(broken.path()).unwrap_err();
    assert_eq!(err.line(), 2);
    assert!(err.message.contains("duplicate table name"), "{}", err);
    assert_eq!(table_names(&schema), vec!["authors", "books"]);
    Ok(())
}

#[test]
fn test_tables_inside_control_flow_are_registered() -> Result<()> {
    let schema = Schema::from_sql(
        "IF NOT EXISTS (SELECT 1 FROM sys.tables WHERE name = 'a')\n\
         BEGIN\n\
           CREATE TABLE a (id int)\n\
         END\n\
         ELSE\n\
           CREATE TABLE b (id int)",
    )?;
    assert_eq!(schema.len(), 2);
    Ok(())
}

#[test]
fn test_tables_on_consecutive_lines_without_separators() -> Result<()> {
    let schema = Schema::from_sql("CREATE TABLE a (id int)\nCREATE TABLE b (id int)")?;
    assert_eq!(table_names(&schema), vec!["a", "b"]);

    let schema = Schema::from_sql(
        "create table t (x int)\n\
         create index ix_t on t (x)\n\
         insert into t (x) values (1)",
    )?;
    assert_eq!(schema.len(), 1);
    let t = schema.find_table(&QualifiedName::from("t")).expect("t");
    assert_eq!(t.indexes()[0].name.as_deref(), Some("ix_t"));
    Ok(())
}

#[test]
fn test_missing_referenced_column() {
    let err = Schema::from_sql(
        "create table a (id int primary key);\n\
         create table b (a_id int, foreign key (a_id) references a (nope));",
    )
    .unwrap_err();
    assert_eq!(err.line(), 2);
    assert_eq!(err.message, "column 'nope' not found in table 'a'");
}

#[test]
fn test_schema_serializes_to_json() -> Result<()> {
    let schema = load_schema("library.sql")?;
    let value = serde_json::to_value(&schema)?;
    let authors = &value["tables"]["authors"];
    assert_eq!(authors["name"][0], "authors");
    assert_eq!(authors["columns"][1]["name"], "name");
    assert_eq!(authors["columns"][1]["nullable"], false);
    Ok(())
}
