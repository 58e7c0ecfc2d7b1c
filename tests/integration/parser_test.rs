use anyhow::Result;

use polysql::query::parser::ast::{
    ConstraintSelection, InsertSource, JoinType, SelectColumn, Statement, TableSource,
};

#[path = "../common/mod.rs"]
mod common;

use common::{data_path, parse_one};

fn kinds(sql: &str) -> Result<Vec<&'static str>> {
    Ok(polysql::parse(sql)?.iter().map(Statement::kind).collect())
}

#[test]
fn test_select_with_joins_and_clauses() -> Result<()> {
    let sql = "SELECT DISTINCT c.name, count(*) AS orders \
               FROM customers c \
               INNER JOIN orders o ON o.customer_id = c.id \
               LEFT JOIN (SELECT id FROM regions) r ON r.id = c.region_id \
               WHERE c.active = 1 AND o.total > 100 \
               GROUP BY c.name HAVING count(*) > 2 \
               ORDER BY orders DESC, c.name";

    if let Statement::Select(select) = parse_one(sql)? {
        assert_eq!(select.columns.len(), 2);
        assert_eq!(select.from.len(), 1);
        assert_eq!(select.joins.len(), 2);
        assert_eq!(select.joins[0].join_type, JoinType::Inner);
        assert!(matches!(select.joins[1].table.source, TableSource::Subquery(_)));
        assert_eq!(select.where_clause.map(|w| w.to_string()).as_deref(), Some("(c.active = 1) AND (o.total > 100)"));
        assert_eq!(select.group_by.len(), 1);
        assert!(select.having.is_some());
        assert_eq!(select.order_by.len(), 2);
        assert!(select.order_by[0].descending);
        assert!(!select.order_by[1].descending);
    } else {
        panic!("Expected SELECT statement");
    }
    Ok(())
}

#[test]
fn test_select_qualified_wildcard() -> Result<()> {
    if let Statement::Select(select) = parse_one("SELECT t.*, [dbo].[t].[x] FROM [dbo].[t] t WITH (NOLOCK)")? {
        let SelectColumn::Expression { expr, .. } = &select.columns[0] else {
            panic!("Expected expression column");
        };
        assert_eq!(expr.to_string(), "t.*");
        let SelectColumn::Expression { expr, .. } = &select.columns[1] else {
            panic!("Expected expression column");
        };
        assert_eq!(expr.to_string(), "dbo.t.x");
    } else {
        panic!("Expected SELECT statement");
    }
    Ok(())
}

#[test]
fn test_mysql_limit_offset_form() -> Result<()> {
    if let Statement::Select(select) = parse_one("select * from t limit 20, 10")? {
        let limit = select.limit.expect("limit");
        assert_eq!(limit.count.to_string(), "10");
        assert_eq!(limit.offset.map(|o| o.to_string()).as_deref(), Some("20"));
    } else {
        panic!("Expected SELECT statement");
    }
    Ok(())
}

#[test]
fn test_dml_statements() -> Result<()> {
    let sql = "INSERT OR REPLACE INTO t (a, b) VALUES (1, 'x');\n\
               INSERT INTO t VALUES ();\n\
               UPDATE t SET a = a + 1 WHERE b IS NULL;\n\
               DELETE FROM t WHERE a IN (SELECT a FROM u)";
    let statements = polysql::parse(sql)?;
    assert_eq!(statements.len(), 4);

    if let Statement::Insert { source: InsertSource::Values(rows), .. } = &statements[1] {
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_empty());
    } else {
        panic!("Expected INSERT ... VALUES ()");
    }
    assert_eq!(statements[2].kind(), "UPDATE");
    assert_eq!(statements[3].kind(), "DELETE");
    Ok(())
}

#[test]
fn test_tsql_batch() -> Result<()> {
    let sql = "USE [Shop]\n\
               GO\n\
               SET ANSI_NULLS ON\n\
               GO\n\
               IF EXISTS (SELECT * FROM sys.objects WHERE name = 'x') DROP TABLE [dbo].[x]\n\
               GO\n\
               DECLARE @n int = 5, @s nvarchar(max)\n\
               EXEC sp_rename @objname = 'a', @newname = 'b'\n\
               PRINT 'done'\n\
               RAISERROR ('failed %d', 16, 1, @n) WITH NOWAIT\n\
               CHECKPOINT";
    assert_eq!(
        kinds(sql)?,
        vec!["USE", "SET", "IF", "DECLARE", "EXECUTE", "PRINT", "RAISERROR", "CHECKPOINT"]
    );
    Ok(())
}

#[test]
fn test_if_else_blocks() -> Result<()> {
    let sql = "IF @x > 1\n\
               BEGIN\n\
                 CREATE TABLE a (id int)\n\
                 PRINT 'created'\n\
               END\n\
               ELSE\n\
               BEGIN\n\
                 CREATE TABLE b (id int)\n\
               END";
    if let Statement::If { then_branch, else_branch, .. } = parse_one(sql)? {
        let Statement::Block(statements) = *then_branch else {
            panic!("Expected BEGIN ... END");
        };
        assert_eq!(statements.len(), 2);
        assert!(matches!(else_branch.as_deref(), Some(Statement::Block(_))));
    } else {
        panic!("Expected IF statement");
    }
    Ok(())
}

#[test]
fn test_statements_after_ddl_on_next_line() -> Result<()> {
    assert_eq!(
        kinds("CREATE TABLE a (id int)\nINSERT INTO a (id) VALUES (1)")?,
        vec!["CREATE TABLE", "INSERT"]
    );
    assert_eq!(
        kinds("CREATE TABLE a (id int) ENGINE=InnoDB\nCREATE INDEX ix ON a (id)\nSELECT id FROM a")?,
        vec!["CREATE TABLE", "CREATE INDEX", "SELECT"]
    );
    assert_eq!(
        kinds("CREATE DATABASE shop\nUSE shop\nALTER DATABASE shop SET RECOVERY SIMPLE\nGO")?,
        vec!["CREATE DATABASE", "USE", "ALTER DATABASE"]
    );
    Ok(())
}

#[test]
fn test_transactions_and_locks() -> Result<()> {
    let sql = "BEGIN TRANSACTION; COMMIT; START TRANSACTION; ROLLBACK;\n\
               LOCK TABLES a WRITE, b READ LOCAL; UNLOCK TABLES;\n\
               BEGIN; COMMIT";
    assert_eq!(
        kinds(sql)?,
        vec!["START TRANSACTION", "COMMIT", "START TRANSACTION", "ROLLBACK", "LOCK TABLES", "UNLOCK TABLES", "START TRANSACTION", "COMMIT"]
    );
    Ok(())
}

#[test]
fn test_mysql_session_statements() -> Result<()> {
    let sql = "SET NAMES utf8mb4;\n\
               SET @OLD_FOREIGN_KEY_CHECKS=@@FOREIGN_KEY_CHECKS, FOREIGN_KEY_CHECKS=0;\n\
               SET search_path = public, pg_catalog;\n\
               PRAGMA foreign_keys = ON;\n\
               SET client_encoding TO 'UTF8';";
    let statements = polysql::parse(sql)?;
    assert_eq!(statements.len(), 5);
    assert_eq!(statements[3].kind(), "PRAGMA");
    Ok(())
}

#[test]
fn test_alter_table_forms() -> Result<()> {
    let statements = polysql::parse(
        "ALTER TABLE [dbo].[t] WITH CHECK CHECK CONSTRAINT [fk_a];\n\
         ALTER TABLE t NOCHECK CONSTRAINT ALL;\n\
         ALTER TABLE ONLY public.t OWNER TO admin;\n\
         ALTER DATABASE shop SET RECOVERY SIMPLE",
    )?;
    if let Statement::AlterTableCheckConstraints { check, constraints, .. } = &statements[0] {
        assert!(*check);
        assert_eq!(constraints, &ConstraintSelection::Named(vec!["fk_a".to_string()]));
    } else {
        panic!("Expected CHECK CONSTRAINT");
    }
    if let Statement::AlterTableCheckConstraints { check, constraints, .. } = &statements[1] {
        assert!(!*check);
        assert_eq!(constraints, &ConstraintSelection::All);
    } else {
        panic!("Expected NOCHECK CONSTRAINT");
    }
    if let Statement::AlterTableOwner { owner, .. } = &statements[2] {
        assert_eq!(owner, "admin");
    } else {
        panic!("Expected OWNER TO");
    }
    assert_eq!(statements[3].kind(), "ALTER DATABASE");
    Ok(())
}

#[test]
fn test_create_view_and_index() -> Result<()> {
    let statements = polysql::parse(
        "CREATE OR REPLACE VIEW active_users (id, name) AS SELECT id, name FROM users WHERE active = 1;\n\
         CREATE UNIQUE NONCLUSTERED INDEX ix_name ON dbo.users (name DESC) INCLUDE (id) WITH (FILLFACTOR = 80);\n\
         CREATE INDEX IF NOT EXISTS ix_partial ON users USING btree (created_at) WHERE active = 1",
    )?;
    if let Statement::View { name, columns, query } = &statements[0] {
        assert_eq!(name.to_string(), "active_users");
        assert_eq!(columns.len(), 2);
        assert!(query.where_clause.is_some());
    } else {
        panic!("Expected CREATE VIEW");
    }
    if let Statement::CreateIndex { table, index } = &statements[1] {
        assert_eq!(table.to_string(), "dbo.users");
        assert!(index.unique);
        assert_eq!(index.clustered, Some(false));
        assert!(index.columns[0].descending);
    } else {
        panic!("Expected CREATE INDEX");
    }
    assert_eq!(statements[2].kind(), "CREATE INDEX");
    Ok(())
}

#[test]
fn test_drop_statements() -> Result<()> {
    let statements = polysql::parse(
        "DROP TABLE IF EXISTS a, b CASCADE; DROP VIEW v; DROP PROCEDURE dbo.p; DROP DATABASE IF EXISTS shop",
    )?;
    let kinds: Vec<&str> = statements.iter().map(Statement::kind).collect();
    assert_eq!(kinds, vec!["DROP TABLE", "DROP VIEW", "DROP PROCEDURE", "DROP DATABASE"]);
    if let Statement::DropTable(drop) = &statements[0] {
        assert!(drop.if_exists);
        assert_eq!(drop.names.len(), 2);
    } else {
        panic!("Expected DROP TABLE");
    }
    Ok(())
}

#[test]
fn test_error_reports_file_and_line() -> Result<()> {
    let file = common::write_temp_sql("create table t (\n  id int,\n  name varchar(10) bogus\n);")?;
    let err = polysql::parse_file(file.path()).unwrap_err();
    assert_eq!(err.line(), 3);
    assert_eq!(&*err.location.file, file.path().display().to_string().as_str());
    assert!(err.message.starts_with("expected"), "{}", err);
    Ok(())
}

#[test]
fn test_every_fixture_parses() -> Result<()> {
    for relative in [
        "library.sql",
        "forward_reference.sql",
        "northwind.sql",
        "mssql/cities.sql",
        "mssql/movies.sql",
        "mssql/quotes.sql",
        "mysql/cities.sql",
        "mysql/movies.sql",
        "mysql/quotes.sql",
        "postgres/cities.sql",
        "postgres/movies.sql",
        "postgres/quotes.sql",
        "sqlite/cities.sql",
        "sqlite/movies.sql",
        "sqlite/quotes.sql",
    ] {
        let statements = polysql::parse_file(data_path(relative))?;
        assert!(!statements.is_empty(), "{} parsed to nothing", relative);
    }
    Ok(())
}
