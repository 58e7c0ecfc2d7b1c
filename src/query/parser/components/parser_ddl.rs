// DDL Statement Parser Implementation
//
// This module implements parsing for SQL DDL (Data Definition Language)
// statements: CREATE TABLE/INDEX/VIEW/DATABASE, ALTER TABLE/DATABASE and
// DROP, together with the table elements they are built from.

use log::debug;

use crate::catalog::{
    Check, Column, ColumnRef, DataType, DefaultConstraint, ForeignKey, Identity, Index, Key, ReferentialAction, Table,
    TableElement, TableRef, TypeSize,
};
use crate::common::{Location, Result};
use crate::query::parser::ast::*;
use crate::query::parser::lexer::TokenType;

use super::parser_core::Parser;
use super::parser_expressions::parse_expression;
use super::parser_select::parse_select;

/// Parse a CREATE statement
pub fn parse_create(parser: &mut Parser) -> Result<Statement> {
    let location = parser.location();
    parser.expect_keyword("create")?;
    if parser.consume_keyword("or")? {
        parser.expect_keyword("replace")?;
    }
    parser.consume_any_keyword(&["temporary", "temp"])?;

    match parser.current_keyword().as_deref() {
        Some("table") => parse_create_table(parser, location),
        Some("unique" | "clustered" | "nonclustered" | "index") => parse_create_index(parser, location),
        Some("view") => parse_create_view(parser),
        Some("database") => parse_create_database(parser),
        _ => parser.expected("TABLE, INDEX, VIEW or DATABASE"),
    }
}

/// Consume `IF NOT EXISTS`
fn parse_if_not_exists(parser: &mut Parser) -> Result<bool> {
    if parser.consume_keyword("if")? {
        parser.expect_keyword("not")?;
        parser.expect_keyword("exists")?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Consume `IF EXISTS`
fn parse_if_exists(parser: &mut Parser) -> Result<bool> {
    if parser.consume_keyword("if")? {
        parser.expect_keyword("exists")?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Parse a CREATE TABLE statement
fn parse_create_table(parser: &mut Parser, location: Location) -> Result<Statement> {
    parser.expect_keyword("table")?;
    parse_if_not_exists(parser)?;
    let name = parser.parse_qualified_name()?;
    let mut table = Table::new(name, location);

    parser.expect_token(TokenType::LeftParen)?;
    loop {
        for element in parse_table_element(parser)? {
            table.add_element(element)?;
        }
        if !parser.consume_token(&TokenType::COMMA)? {
            break;
        }
    }
    parser.expect_token(TokenType::RightParen)?;

    // ENGINE=..., ON [PRIMARY], WITHOUT ROWID, WITH (...) and the like
    let options = parser.collect_options()?;
    if !options.is_empty() {
        debug!("Skipping options of table {}: {:?}", table.name(), options);
    }

    Ok(Statement::CreateTable(table))
}

/// Parse one clause of a table definition.
///
/// A column definition yields the column followed by the keys, checks and
/// foreign keys declared inline on it.
pub fn parse_table_element(parser: &mut Parser) -> Result<Vec<TableElement>> {
    let location = parser.location();
    let name = if parser.consume_keyword("constraint")? {
        Some(parser.parse_identifier()?)
    } else {
        None
    };

    let element = match parser.current_keyword().as_deref() {
        Some("primary" | "unique") => TableElement::Key(parse_key(parser, name, location)?),
        Some("foreign") => TableElement::ForeignKey(parse_foreign_key(parser, name, location)?),
        Some("check") => TableElement::Check(parse_check(parser, name, location)?),
        Some("default") => TableElement::Default(parse_default_constraint(parser, name, location)?),
        Some("key" | "index" | "fulltext" | "spatial") if name.is_none() => {
            TableElement::Index(parse_index_clause(parser, location)?)
        }
        _ if name.is_some() => return parser.expected("constraint"),
        _ => return parse_column_definition(parser),
    };
    Ok(vec![element])
}

/// Consume CLUSTERED / NONCLUSTERED
fn parse_clustered(parser: &mut Parser) -> Result<Option<bool>> {
    Ok(parser
        .consume_any_keyword(&["clustered", "nonclustered"])?
        .map(|word| word == "clustered"))
}

/// Parse `( name [(length)] [ASC|DESC] {, ...} )`
fn parse_key_columns(parser: &mut Parser) -> Result<Vec<ColumnRef>> {
    parser.expect_token(TokenType::LeftParen)?;
    let mut columns = Vec::new();
    loop {
        let mut column = ColumnRef::new(parser.parse_identifier()?);
        // MySQL prefix length
        if parser.current_token_is(&TokenType::LeftParen) {
            parser.skip_parenthesized()?;
        }
        column.descending = parser.consume_any_keyword(&["asc", "desc"])?.as_deref() == Some("desc");
        // SQLite: PRIMARY KEY (id AUTOINCREMENT)
        parser.consume_keyword("autoincrement")?;
        columns.push(column);
        if !parser.consume_token(&TokenType::COMMA)? {
            break;
        }
    }
    parser.expect_token(TokenType::RightParen)?;
    Ok(columns)
}

/// Skip storage and conflict options that may follow a key or index
fn skip_key_options(parser: &mut Parser) -> Result<()> {
    loop {
        let keyword = match parser.current_keyword() {
            Some(keyword) => keyword,
            None => return Ok(()),
        };
        let next = parser.peek_token()?.clone();
        match keyword.as_str() {
            "with" if next.token_type == TokenType::LeftParen => {
                parser.next_token()?;
                parser.skip_parenthesized()?;
            }
            "on" if next.is_keyword("conflict") => {
                parser.next_token()?;
                parser.next_token()?;
                parser.parse_identifier()?;
            }
            // Filegroup: ON [PRIMARY]
            "on" if !next.is_keyword("delete") && !next.is_keyword("update") => {
                parser.next_token()?;
                parser.parse_identifier()?;
            }
            "using" => {
                parser.next_token()?;
                if parser.consume_keyword("index")? {
                    parser.expect_keyword("tablespace")?;
                }
                parser.parse_identifier()?;
            }
            "comment" if matches!(next.token_type, TokenType::STRING(_)) => {
                parser.next_token()?;
                parser.next_token()?;
            }
            "not" if next.is_keyword("deferrable") => {
                parser.next_token()?;
                parser.next_token()?;
            }
            "deferrable" => {
                parser.next_token()?;
            }
            "initially" => {
                parser.next_token()?;
                parser.parse_identifier()?;
            }
            _ => return Ok(()),
        }
    }
}

/// Parse `PRIMARY KEY ...` or `UNIQUE [KEY|INDEX] ...` at table level
fn parse_key(parser: &mut Parser, name: Option<String>, location: Location) -> Result<Key> {
    let primary = if parser.consume_keyword("primary")? {
        parser.expect_keyword("key")?;
        true
    } else {
        parser.expect_keyword("unique")?;
        parser.consume_any_keyword(&["key", "index"])?;
        false
    };
    let clustered = parse_clustered(parser)?;

    // MySQL index name
    let mut name = name;
    if parser.at_identifier() && !parser.current_is_keyword("using") {
        let index_name = parser.parse_identifier()?;
        name.get_or_insert(index_name);
    }
    if parser.consume_keyword("using")? {
        parser.parse_identifier()?;
    }

    let columns = parse_key_columns(parser)?;
    skip_key_options(parser)?;

    Ok(Key {
        name,
        primary,
        clustered,
        columns,
        location,
    })
}

/// Parse MySQL `KEY|INDEX|FULLTEXT|SPATIAL [name] (cols)`
fn parse_index_clause(parser: &mut Parser, location: Location) -> Result<Index> {
    parser.consume_any_keyword(&["fulltext", "spatial"])?;
    parser.consume_any_keyword(&["key", "index"])?;
    let name = if parser.at_identifier() && !parser.current_is_keyword("using") {
        Some(parser.parse_identifier()?)
    } else {
        None
    };
    if parser.consume_keyword("using")? {
        parser.parse_identifier()?;
    }
    let columns = parse_key_columns(parser)?;
    skip_key_options(parser)?;

    Ok(Index {
        name,
        unique: false,
        clustered: None,
        columns,
        location,
    })
}

/// Parse `FOREIGN KEY [name] (cols) REFERENCES ...`
fn parse_foreign_key(parser: &mut Parser, name: Option<String>, location: Location) -> Result<ForeignKey> {
    parser.expect_keyword("foreign")?;
    parser.expect_keyword("key")?;
    let mut name = name;
    if parser.at_identifier() {
        let index_name = parser.parse_identifier()?;
        name.get_or_insert(index_name);
    }
    let columns = parser
        .parse_identifier_list()?
        .into_iter()
        .map(ColumnRef::new)
        .collect();
    parse_references(parser, name, columns, location)
}

/// Parse `REFERENCES table [(cols)]` and the referential options after it
fn parse_references(
    parser: &mut Parser,
    name: Option<String>,
    columns: Vec<ColumnRef>,
    location: Location,
) -> Result<ForeignKey> {
    parser.expect_keyword("references")?;
    let table = TableRef::new(parser.parse_qualified_name()?);
    let referenced_columns = if parser.current_token_is(&TokenType::LeftParen) {
        parser.parse_identifier_list()?
    } else {
        Vec::new()
    };

    let mut foreign_key = ForeignKey {
        name,
        columns,
        table,
        referenced_columns,
        on_delete: ReferentialAction::NoAction,
        on_update: ReferentialAction::NoAction,
        not_for_replication: false,
        location,
    };

    loop {
        let next = parser.peek_token()?.clone();
        match parser.current_keyword().as_deref() {
            Some("on") if next.is_keyword("delete") => {
                parser.next_token()?;
                parser.next_token()?;
                foreign_key.on_delete = parse_referential_action(parser)?;
            }
            Some("on") if next.is_keyword("update") => {
                parser.next_token()?;
                parser.next_token()?;
                foreign_key.on_update = parse_referential_action(parser)?;
            }
            Some("match") => {
                parser.next_token()?;
                parser.parse_identifier()?;
            }
            Some("not") if next.is_keyword("for") => {
                parser.next_token()?;
                parser.next_token()?;
                parser.expect_keyword("replication")?;
                foreign_key.not_for_replication = true;
            }
            Some("not") if next.is_keyword("deferrable") => {
                parser.next_token()?;
                parser.next_token()?;
            }
            Some("deferrable") => {
                parser.next_token()?;
            }
            Some("initially") => {
                parser.next_token()?;
                parser.parse_identifier()?;
            }
            _ => return Ok(foreign_key),
        }
    }
}

fn parse_referential_action(parser: &mut Parser) -> Result<ReferentialAction> {
    match parser.current_keyword().as_deref() {
        Some("cascade") => {
            parser.next_token()?;
            Ok(ReferentialAction::Cascade)
        }
        Some("restrict") => {
            parser.next_token()?;
            Ok(ReferentialAction::NoAction)
        }
        Some("no") => {
            parser.next_token()?;
            parser.expect_keyword("action")?;
            Ok(ReferentialAction::NoAction)
        }
        Some("set") => {
            parser.next_token()?;
            if parser.consume_keyword("null")? {
                Ok(ReferentialAction::SetNull)
            } else if parser.consume_keyword("default")? {
                Ok(ReferentialAction::SetDefault)
            } else {
                parser.expected("NULL or DEFAULT")
            }
        }
        _ => parser.expected("referential action"),
    }
}

/// Parse `NOT FOR REPLICATION` if present
fn parse_not_for_replication(parser: &mut Parser) -> Result<bool> {
    if parser.current_is_keyword("not") && parser.peek_is_keyword("for")? {
        parser.next_token()?;
        parser.next_token()?;
        parser.expect_keyword("replication")?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Parse `CHECK [NOT FOR REPLICATION] expr`
fn parse_check(parser: &mut Parser, name: Option<String>, location: Location) -> Result<Check> {
    parser.expect_keyword("check")?;
    let not_for_replication = parse_not_for_replication(parser)?;
    let expression = parse_expression(parser)?;
    Ok(Check {
        name,
        expression,
        not_for_replication,
        location,
    })
}

/// Parse `DEFAULT expr FOR column`
fn parse_default_constraint(parser: &mut Parser, name: Option<String>, location: Location) -> Result<DefaultConstraint> {
    parser.expect_keyword("default")?;
    let expression = parse_expression(parser)?;
    parser.expect_keyword("for")?;
    let column = parser.parse_identifier()?;
    Ok(DefaultConstraint {
        name,
        expression,
        column,
        location,
    })
}

/// Words that start a column constraint rather than a type name
const COLUMN_CONSTRAINT_WORDS: &[&str] = &[
    "not", "null", "primary", "unique", "check", "references", "default", "constraint", "collate",
    "identity", "auto_increment", "autoincrement", "generated",
];

/// True when a column name is followed directly by the end of the
/// element or by one of its constraints
fn at_typeless_column_end(parser: &Parser) -> bool {
    if matches!(
        parser.current_token.token_type,
        TokenType::COMMA | TokenType::RightParen | TokenType::SEMICOLON | TokenType::EOF
    ) {
        return true;
    }
    parser
        .current_keyword()
        .is_some_and(|word| COLUMN_CONSTRAINT_WORDS.contains(&word.as_str()))
        || parser.at_new_statement()
}

/// Parse a column definition and its inline constraints
fn parse_column_definition(parser: &mut Parser) -> Result<Vec<TableElement>> {
    let location = parser.location();
    let name = parser.parse_identifier()?;

    let mut column = if parser.current_is_keyword("as") {
        // T-SQL computed column
        parser.next_token()?;
        let mut column = Column::new(name, DataType::default(), location);
        column.computed = Some(parse_expression(parser)?);
        column
    } else if at_typeless_column_end(parser) {
        // SQLite allows columns without a type
        Column::new(name, DataType::default(), location)
    } else {
        let data_type = parse_data_type(parser)?;
        Column::new(name, data_type, location)
    };

    let mut elements = Vec::new();
    let mut constraint_name: Option<String> = None;

    loop {
        let constraint_location = parser.location();
        let keyword = match parser.current_keyword() {
            Some(keyword) => keyword,
            None => break,
        };
        if parser.at_new_statement() || matches!(keyword.as_str(), "go" | "else" | "end") {
            break;
        }
        match keyword.as_str() {
            "constraint" => {
                parser.next_token()?;
                constraint_name = Some(parser.parse_identifier()?);
                continue;
            }
            "null" => {
                parser.next_token()?;
                column.nullable = true;
            }
            "not" => {
                parser.next_token()?;
                if parser.consume_keyword("null")? {
                    column.nullable = false;
                } else if parser.consume_keyword("for")? {
                    parser.expect_keyword("replication")?;
                    column.not_for_replication = true;
                } else {
                    return parser.expected("NULL or FOR REPLICATION");
                }
            }
            "primary" => {
                parser.next_token()?;
                parser.expect_keyword("key")?;
                let mut key_column = ColumnRef::new(column.name.clone());
                key_column.descending = parser.consume_any_keyword(&["asc", "desc"])?.as_deref() == Some("desc");
                let clustered = parse_clustered(parser)?;
                skip_key_options(parser)?;
                elements.push(TableElement::Key(Key {
                    name: constraint_name.take(),
                    primary: true,
                    clustered,
                    columns: vec![key_column],
                    location: constraint_location,
                }));
            }
            "unique" => {
                parser.next_token()?;
                parser.consume_keyword("key")?;
                let clustered = parse_clustered(parser)?;
                skip_key_options(parser)?;
                elements.push(TableElement::Key(Key {
                    name: constraint_name.take(),
                    primary: false,
                    clustered,
                    columns: vec![ColumnRef::new(column.name.clone())],
                    location: constraint_location,
                }));
            }
            "check" => {
                let check = parse_check(parser, constraint_name.take(), constraint_location)?;
                elements.push(TableElement::Check(check));
            }
            "references" => {
                let columns = vec![ColumnRef::new(column.name.clone())];
                let foreign_key = parse_references(parser, constraint_name.take(), columns, constraint_location)?;
                elements.push(TableElement::ForeignKey(foreign_key));
            }
            "default" => {
                parser.next_token()?;
                column.default = Some(parse_expression(parser)?);
                constraint_name = None;
            }
            "identity" => {
                parser.next_token()?;
                column.identity = Some(parse_identity(parser)?);
            }
            "auto_increment" | "autoincrement" => {
                parser.next_token()?;
                column.auto_increment = true;
            }
            "generated" => {
                parser.next_token()?;
                if !parser.consume_keyword("always")? {
                    parser.expect_keyword("by")?;
                    parser.expect_keyword("default")?;
                }
                parser.expect_keyword("as")?;
                if parser.consume_keyword("identity")? {
                    if parser.current_token_is(&TokenType::LeftParen) {
                        parser.skip_parenthesized()?;
                    }
                    column.identity = Some(Identity::default());
                } else {
                    column.computed = Some(parse_expression(parser)?);
                }
            }
            "as" => {
                parser.next_token()?;
                column.computed = Some(parse_expression(parser)?);
            }
            "persisted" | "stored" | "virtual" | "signed" => {
                parser.next_token()?;
            }
            "filestream" => {
                parser.next_token()?;
                column.filestream = true;
            }
            "sparse" => {
                parser.next_token()?;
                column.sparse = true;
            }
            "rowguidcol" => {
                parser.next_token()?;
                column.rowguidcol = true;
            }
            "unsigned" => {
                parser.next_token()?;
                column.unsigned = true;
            }
            "zerofill" => {
                parser.next_token()?;
                column.zerofill = true;
            }
            "collate" => {
                parser.next_token()?;
                column.collation = Some(parser.parse_qualified_name()?.to_string());
            }
            "character" => {
                parser.next_token()?;
                parser.expect_keyword("set")?;
                column.charset = Some(parser.parse_identifier()?);
            }
            "charset" => {
                parser.next_token()?;
                column.charset = Some(parser.parse_identifier()?);
            }
            "comment" => {
                parser.next_token()?;
                match &parser.current_token.token_type {
                    TokenType::STRING(text) => {
                        column.comment = Some(text.clone());
                        parser.next_token()?;
                    }
                    _ => return parser.expected("comment string"),
                }
            }
            "on" => {
                parser.next_token()?;
                parser.expect_keyword("update")?;
                column.on_update = Some(parse_expression(parser)?);
            }
            // MySQL column placement in ALTER TABLE ... ADD
            "first" => {
                parser.next_token()?;
            }
            "after" => {
                parser.next_token()?;
                parser.parse_identifier()?;
            }
            _ => return parser.expected("constraint"),
        }
    }

    if constraint_name.is_some() {
        return parser.expected("constraint");
    }

    let mut result = vec![TableElement::Column(column)];
    result.extend(elements);
    Ok(result)
}

/// Parse `[(seed, increment)]` after IDENTITY
fn parse_identity(parser: &mut Parser) -> Result<Identity> {
    if !parser.consume_token(&TokenType::LeftParen)? {
        return Ok(Identity::default());
    }
    let seed = parser.parse_integer()?;
    parser.expect_token(TokenType::COMMA)?;
    let increment = parser.parse_integer()?;
    parser.expect_token(TokenType::RightParen)?;
    Ok(Identity { seed, increment })
}

/// Consume one word from `words`, returning it as written
fn take_word(parser: &mut Parser, words: &[&str]) -> Result<Option<String>> {
    match parser.current_keyword() {
        Some(keyword) if words.contains(&keyword.as_str()) => parser.parse_identifier().map(Some),
        _ => Ok(None),
    }
}

/// Parse a data type: name, multi-word forms, `(size[, scale])`, `(max)`
/// and the value list of ENUM/SET
pub fn parse_data_type(parser: &mut Parser) -> Result<DataType> {
    let mut name = parser.parse_qualified_name()?;

    if name.names.len() == 1 {
        let mut words = vec![name.names[0].clone()];
        match words[0].to_lowercase().as_str() {
            "double" => words.extend(take_word(parser, &["precision"])?),
            "national" => {
                words.extend(take_word(parser, &["character", "char"])?);
                words.extend(take_word(parser, &["varying"])?);
            }
            "character" | "char" | "nchar" | "bit" => words.extend(take_word(parser, &["varying"])?),
            "long" => words.extend(take_word(parser, &["varchar", "varbinary", "raw"])?),
            _ => {}
        }
        name = QualifiedName::single(words.join(" "));
    }

    let mut data_type = DataType::new(name);

    if parser.consume_token(&TokenType::LeftParen)? {
        let is_enumeration = matches!(data_type.base_name().as_str(), "enum" | "set");
        if is_enumeration && matches!(parser.current_token.token_type, TokenType::STRING(_)) {
            loop {
                match &parser.current_token.token_type {
                    TokenType::STRING(value) => {
                        data_type.values.push(value.clone());
                        parser.next_token()?;
                    }
                    _ => return parser.expected("string"),
                }
                if !parser.consume_token(&TokenType::COMMA)? {
                    break;
                }
            }
        } else {
            data_type.size = Some(parse_type_size(parser)?);
            if parser.consume_token(&TokenType::COMMA)? {
                data_type.scale = Some(parse_scale(parser)?);
            }
        }
        parser.expect_token(TokenType::RightParen)?;
    }

    // timestamp(p) WITH|WITHOUT TIME ZONE
    if matches!(data_type.base_name().as_str(), "timestamp" | "time")
        && (parser.current_is_keyword("with") || parser.current_is_keyword("without"))
        && parser.peek_is_keyword("time")?
    {
        let modifier = parser.parse_identifier()?;
        parser.next_token()?;
        parser.expect_keyword("zone")?;
        data_type.name = QualifiedName::single(format!("{} {} time zone", data_type.name, modifier.to_lowercase()));
    }

    Ok(data_type)
}

fn parse_type_size(parser: &mut Parser) -> Result<TypeSize> {
    if parser.consume_keyword("max")? {
        return Ok(TypeSize::Max);
    }
    let size = match &parser.current_token.token_type {
        TokenType::NUMBER(text) => text.parse::<u64>().ok(),
        _ => None,
    };
    match size {
        Some(size) => {
            parser.next_token()?;
            Ok(TypeSize::Length(size))
        }
        None => parser.expected("size"),
    }
}

fn parse_scale(parser: &mut Parser) -> Result<u32> {
    let scale = match &parser.current_token.token_type {
        TokenType::NUMBER(text) => text.parse::<u32>().ok(),
        _ => None,
    };
    match scale {
        Some(scale) => {
            parser.next_token()?;
            Ok(scale)
        }
        None => parser.expected("scale"),
    }
}

/// Parse `CREATE [UNIQUE] [CLUSTERED|NONCLUSTERED] INDEX ...`
fn parse_create_index(parser: &mut Parser, location: Location) -> Result<Statement> {
    let unique = parser.consume_keyword("unique")?;
    let clustered = parse_clustered(parser)?;
    parser.expect_keyword("index")?;
    parser.consume_keyword("concurrently")?;
    parse_if_not_exists(parser)?;

    let name = if parser.current_is_keyword("on") {
        None
    } else {
        Some(parser.parse_qualified_name()?.to_string())
    };
    parser.expect_keyword("on")?;
    parser.consume_keyword("only")?;
    let table = parser.parse_qualified_name()?;
    if parser.consume_keyword("using")? {
        parser.parse_identifier()?;
    }
    let columns = parse_key_columns(parser)?;

    if parser.consume_keyword("include")? {
        parser.parse_identifier_list()?;
    }
    // Partial index predicate
    if parser.consume_keyword("where")? {
        parse_expression(parser)?;
    }
    let options = parser.collect_options()?;
    if !options.is_empty() {
        debug!("Skipping options of index on {}: {:?}", table, options);
    }

    Ok(Statement::CreateIndex {
        table,
        index: Index {
            name,
            unique,
            clustered,
            columns,
            location,
        },
    })
}

/// Parse `CREATE VIEW name [(cols)] [WITH options] AS select`
fn parse_create_view(parser: &mut Parser) -> Result<Statement> {
    parser.expect_keyword("view")?;
    parse_if_not_exists(parser)?;
    let name = parser.parse_qualified_name()?;
    let columns = if parser.current_token_is(&TokenType::LeftParen) {
        parser.parse_identifier_list()?
    } else {
        Vec::new()
    };
    // T-SQL view attributes such as SCHEMABINDING
    if parser.consume_keyword("with")? {
        parser.parse_identifier()?;
        while parser.consume_token(&TokenType::COMMA)? {
            parser.parse_identifier()?;
        }
    }
    parser.expect_keyword("as")?;
    let query = parse_select(parser)?;
    Ok(Statement::View { name, columns, query })
}

/// Parse `CREATE DATABASE [IF NOT EXISTS] name [options]`
fn parse_create_database(parser: &mut Parser) -> Result<Statement> {
    parser.expect_keyword("database")?;
    let if_not_exists = parse_if_not_exists(parser)?;
    let name = parser.parse_qualified_name()?;
    let options = parser.collect_options()?;
    debug!("Database {} options: {:?}", name, options);
    Ok(Statement::CreateDatabase {
        name,
        if_not_exists,
        options,
    })
}

/// Parse an ALTER statement
pub fn parse_alter(parser: &mut Parser) -> Result<Statement> {
    let location = parser.location();
    parser.expect_keyword("alter")?;

    if parser.consume_keyword("database")? {
        let database = parser.parse_qualified_name()?;
        parser.consume_keyword("set")?;
        let options = parser.collect_options()?;
        debug!("Database {} options: {:?}", database, options);
        return Ok(Statement::AlterDatabaseSet { database, options });
    }

    parser.expect_keyword("table")?;
    parser.consume_keyword("only")?;
    parse_if_exists(parser)?;
    parser.consume_keyword("only")?;
    let table = parser.parse_qualified_name()?;

    // T-SQL WITH CHECK | WITH NOCHECK
    let check = if parser.consume_keyword("with")? {
        match parser.consume_any_keyword(&["check", "nocheck"])? {
            Some(word) => Some(word == "check"),
            None => return parser.expected("CHECK or NOCHECK"),
        }
    } else {
        None
    };

    match parser.current_keyword().as_deref() {
        Some("add") => {
            let elements = parse_alter_add(parser)?;
            Ok(Statement::AlterTableAdd {
                table,
                check,
                elements,
                location,
            })
        }
        Some(word @ ("check" | "nocheck")) => {
            let check = word == "check";
            parser.next_token()?;
            parser.expect_keyword("constraint")?;
            let constraints = if parser.consume_keyword("all")? {
                ConstraintSelection::All
            } else {
                let mut names = vec![parser.parse_identifier()?];
                while parser.consume_token(&TokenType::COMMA)? {
                    names.push(parser.parse_identifier()?);
                }
                ConstraintSelection::Named(names)
            };
            Ok(Statement::AlterTableCheckConstraints {
                table,
                check,
                constraints,
            })
        }
        Some("owner") => {
            parser.next_token()?;
            parser.expect_keyword("to")?;
            let owner = parser.parse_identifier()?;
            Ok(Statement::AlterTableOwner { table, owner })
        }
        _ => parser.expected("ADD, CHECK, NOCHECK or OWNER TO"),
    }
}

/// Parse `ADD [COLUMN] element {, [ADD] [COLUMN] element}` or `ADD (elements)`
fn parse_alter_add(parser: &mut Parser) -> Result<Vec<TableElement>> {
    parser.expect_keyword("add")?;
    let mut elements = Vec::new();

    if parser.consume_token(&TokenType::LeftParen)? {
        loop {
            elements.extend(parse_table_element(parser)?);
            if !parser.consume_token(&TokenType::COMMA)? {
                break;
            }
        }
        parser.expect_token(TokenType::RightParen)?;
        return Ok(elements);
    }

    loop {
        parser.consume_keyword("column")?;
        parse_if_not_exists(parser)?;
        elements.extend(parse_table_element(parser)?);
        if !parser.consume_token(&TokenType::COMMA)? {
            return Ok(elements);
        }
        parser.consume_keyword("add")?;
    }
}

/// Parse `DROP TABLE|VIEW|PROC|PROCEDURE|DATABASE [IF EXISTS] names`
pub fn parse_drop(parser: &mut Parser) -> Result<Statement> {
    parser.expect_keyword("drop")?;
    let kind = match parser.consume_any_keyword(&["table", "view", "proc", "procedure", "database"])? {
        Some(kind) => kind,
        None => return parser.expected("TABLE, VIEW, PROCEDURE or DATABASE"),
    };
    let if_exists = parse_if_exists(parser)?;
    let mut names = vec![parser.parse_qualified_name()?];
    while parser.consume_token(&TokenType::COMMA)? {
        names.push(parser.parse_qualified_name()?);
    }
    parser.consume_any_keyword(&["cascade", "restrict"])?;

    let drop = DropStatement { if_exists, names };
    Ok(match kind.as_str() {
        "table" => Statement::DropTable(drop),
        "view" => Statement::DropView(drop),
        "database" => Statement::DropDatabase(drop),
        _ => Statement::DropProcedure(drop),
    })
}
