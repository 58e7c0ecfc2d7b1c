// Abstract Syntax Tree (AST) for SQL
//
// This module defines the data structures produced by the statement and
// expression parsers. Schema objects (tables, columns, keys) live in the
// catalog module and are embedded in the statements that declare them.

use std::fmt;

use serde::Serialize;

use crate::catalog::{DataType, Index, Table, TableElement};
use crate::common::Location;

/// A dot-separated name such as `dbo.users.id`.
///
/// Parts keep the spelling of the source text. An empty part stands for
/// an omitted qualifier (`db..table`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct QualifiedName {
    pub names: Vec<String>,
}

impl QualifiedName {
    pub fn new(names: Vec<String>) -> Self {
        QualifiedName { names }
    }

    pub fn single(name: impl Into<String>) -> Self {
        QualifiedName {
            names: vec![name.into()],
        }
    }

    /// Case-insensitive registry key: the lowercase parts joined by `.`
    pub fn key(&self) -> String {
        self.names
            .iter()
            .map(|part| part.to_lowercase())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// The unqualified (last) part of the name
    pub fn last(&self) -> &str {
        self.names.last().map(String::as_str).unwrap_or("")
    }
}

impl From<&str> for QualifiedName {
    fn from(name: &str) -> Self {
        QualifiedName {
            names: name.split('.').map(str::to_string).collect(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names.join("."))
    }
}

/// Unary operators, prefix and postfix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOperator {
    BitNot,
    Negate,
    Not,
    IsNull,
    IsNotNull,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOperator {
    Multiply,
    Divide,
    Modulo,
    Add,
    Subtract,
    Concat,
    BitAnd,
    BitXor,
    Equals,
    NotEquals,
    LessThan,
    GreaterThan,
    LessEquals,
    GreaterEquals,
    Like,
    NotLike,
    And,
    Or,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Concat => "||",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::BitXor => "^",
            BinaryOperator::Equals => "=",
            BinaryOperator::NotEquals => "<>",
            BinaryOperator::LessThan => "<",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::LessEquals => "<=",
            BinaryOperator::GreaterEquals => ">=",
            BinaryOperator::Like => "LIKE",
            BinaryOperator::NotLike => "NOT LIKE",
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
        }
    }
}

/// Three-operand operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TernaryOperator {
    Between,
    NotBetween,
}

/// An expression node. Equality compares structure only, never location.
#[derive(Debug, Clone, Serialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    #[serde(skip)]
    pub location: Location,
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

/// The closed set of expression forms
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExpressionKind {
    Number(String),
    StringLiteral(String),
    Null,
    ParameterRef(String),
    QualifiedName {
        name: QualifiedName,
        star: bool,
    },
    Call {
        function: QualifiedName,
        arguments: Vec<Expression>,
    },
    Cast {
        operand: Box<Expression>,
        data_type: DataType,
    },
    Exists(Box<SelectStatement>),
    Subquery(Box<SelectStatement>),
    InList {
        negated: bool,
        operand: Box<Expression>,
        candidates: Vec<Expression>,
    },
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },
    Binary {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Ternary {
        op: TernaryOperator,
        first: Box<Expression>,
        second: Box<Expression>,
        third: Box<Expression>,
    },
}

impl Expression {
    pub fn new(kind: ExpressionKind, location: Location) -> Self {
        Expression { kind, location }
    }

    // Location-free constructors, mostly for building expected trees

    pub fn number(text: &str) -> Self {
        Self::new(ExpressionKind::Number(text.to_string()), Location::default())
    }

    pub fn string(text: &str) -> Self {
        Self::new(ExpressionKind::StringLiteral(text.to_string()), Location::default())
    }

    pub fn null() -> Self {
        Self::new(ExpressionKind::Null, Location::default())
    }

    pub fn name(name: &str) -> Self {
        Self::new(
            ExpressionKind::QualifiedName {
                name: QualifiedName::from(name),
                star: false,
            },
            Location::default(),
        )
    }

    pub fn unary(op: UnaryOperator, operand: Expression) -> Self {
        Self::new(
            ExpressionKind::Unary {
                op,
                operand: Box::new(operand),
            },
            Location::default(),
        )
    }

    pub fn binary(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Self::new(
            ExpressionKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            Location::default(),
        )
    }

    pub fn ternary(op: TernaryOperator, first: Expression, second: Expression, third: Expression) -> Self {
        Self::new(
            ExpressionKind::Ternary {
                op,
                first: Box::new(first),
                second: Box::new(second),
                third: Box::new(third),
            },
            Location::default(),
        )
    }

    /// The referenced name, if this expression is a plain qualified name
    pub fn as_name(&self) -> Option<&QualifiedName> {
        match &self.kind {
            ExpressionKind::QualifiedName { name, star: false } => Some(name),
            _ => None,
        }
    }

    /// Render an operand, parenthesizing operator nodes
    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpressionKind::Binary { .. } | ExpressionKind::Ternary { .. } => write!(f, "({})", self),
            _ => write!(f, "{}", self),
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpressionKind::Number(number) => write!(f, "{}", number),
            ExpressionKind::StringLiteral(text) => write!(f, "'{}'", text.replace('\'', "''")),
            ExpressionKind::Null => write!(f, "NULL"),
            ExpressionKind::ParameterRef(name) => write!(f, "{}", name),
            ExpressionKind::QualifiedName { name, star } => {
                match (name.names.is_empty(), star) {
                    (true, _) => write!(f, "*"),
                    (false, true) => write!(f, "{}.*", name),
                    (false, false) => write!(f, "{}", name),
                }
            }
            ExpressionKind::Call { function, arguments } => {
                write!(f, "{}(", function)?;
                write_list(f, arguments)?;
                write!(f, ")")
            }
            ExpressionKind::Cast { operand, data_type } => {
                write!(f, "CAST({} AS {})", operand, data_type)
            }
            ExpressionKind::Exists(query) => write!(f, "EXISTS ({})", query),
            ExpressionKind::Subquery(query) => write!(f, "({})", query),
            ExpressionKind::InList { negated, operand, candidates } => {
                operand.fmt_operand(f)?;
                write!(f, "{} IN (", if *negated { " NOT" } else { "" })?;
                write_list(f, candidates)?;
                write!(f, ")")
            }
            ExpressionKind::Unary { op, operand } => match op {
                UnaryOperator::BitNot => {
                    write!(f, "~")?;
                    operand.fmt_operand(f)
                }
                UnaryOperator::Negate => {
                    write!(f, "-")?;
                    operand.fmt_operand(f)
                }
                UnaryOperator::Not => {
                    write!(f, "NOT ")?;
                    operand.fmt_operand(f)
                }
                UnaryOperator::IsNull => {
                    operand.fmt_operand(f)?;
                    write!(f, " IS NULL")
                }
                UnaryOperator::IsNotNull => {
                    operand.fmt_operand(f)?;
                    write!(f, " IS NOT NULL")
                }
            },
            ExpressionKind::Binary { op, left, right } => {
                left.fmt_operand(f)?;
                write!(f, " {} ", op.symbol())?;
                right.fmt_operand(f)
            }
            ExpressionKind::Ternary { op, first, second, third } => {
                first.fmt_operand(f)?;
                let keyword = match op {
                    TernaryOperator::Between => "BETWEEN",
                    TernaryOperator::NotBetween => "NOT BETWEEN",
                };
                write!(f, " {} ", keyword)?;
                second.fmt_operand(f)?;
                write!(f, " AND ")?;
                third.fmt_operand(f)
            }
        }
    }
}

/// `ALL` or `DISTINCT` before the select list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SelectQuantifier {
    All,
    Distinct,
}

/// T-SQL `TOP n [PERCENT] [WITH TIES]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Top {
    pub count: Expression,
    pub percent: bool,
    pub with_ties: bool,
}

/// Item of a select list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SelectColumn {
    Wildcard,
    Expression {
        expr: Expression,
        alias: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TableSource {
    Named(QualifiedName),
    Subquery(Box<SelectStatement>),
}

/// A table in a FROM list or JOIN
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableReference {
    pub source: TableSource,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub table: TableReference,
    pub condition: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderByItem {
    pub expr: Expression,
    pub descending: bool,
}

/// Named window from a `WINDOW name AS (...)` clause
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowDefinition {
    pub name: String,
    pub partition_by: Vec<Expression>,
    pub order_by: Vec<OrderByItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Limit {
    pub count: Expression,
    pub offset: Option<Expression>,
}

/// SELECT statement
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectStatement {
    pub quantifier: Option<SelectQuantifier>,
    pub top: Option<Top>,
    pub columns: Vec<SelectColumn>,
    pub from: Vec<TableReference>,
    pub joins: Vec<JoinClause>,
    pub where_clause: Option<Expression>,
    pub group_by: Vec<Expression>,
    pub having: Option<Expression>,
    pub order_by: Vec<OrderByItem>,
    pub windows: Vec<WindowDefinition>,
    pub limit: Option<Limit>,
}

impl fmt::Display for TableReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            TableSource::Named(name) => write!(f, "{}", name)?,
            TableSource::Subquery(query) => write!(f, "({})", query)?,
        }
        if let Some(alias) = &self.alias {
            write!(f, " AS {}", alias)?;
        }
        Ok(())
    }
}

impl fmt::Display for OrderByItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.expr, if self.descending { " DESC" } else { "" })
    }
}

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT")?;
        match self.quantifier {
            Some(SelectQuantifier::All) => write!(f, " ALL")?,
            Some(SelectQuantifier::Distinct) => write!(f, " DISTINCT")?,
            None => {}
        }
        if let Some(top) = &self.top {
            write!(f, " TOP {}", top.count)?;
            if top.percent {
                write!(f, " PERCENT")?;
            }
            if top.with_ties {
                write!(f, " WITH TIES")?;
            }
        }
        for (i, column) in self.columns.iter().enumerate() {
            write!(f, "{}", if i == 0 { " " } else { ", " })?;
            match column {
                SelectColumn::Wildcard => write!(f, "*")?,
                SelectColumn::Expression { expr, alias } => {
                    write!(f, "{}", expr)?;
                    if let Some(alias) = alias {
                        write!(f, " AS {}", alias)?;
                    }
                }
            }
        }
        if !self.from.is_empty() {
            write!(f, " FROM ")?;
            write_list(f, &self.from)?;
        }
        for join in &self.joins {
            let keyword = match join.join_type {
                JoinType::Inner => "JOIN",
                JoinType::Left => "LEFT JOIN",
                JoinType::Right => "RIGHT JOIN",
                JoinType::Full => "FULL JOIN",
                JoinType::Cross => "CROSS JOIN",
            };
            write!(f, " {} {}", keyword, join.table)?;
            if let Some(condition) = &join.condition {
                write!(f, " ON {}", condition)?;
            }
        }
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE {}", where_clause)?;
        }
        if !self.group_by.is_empty() {
            write!(f, " GROUP BY ")?;
            write_list(f, &self.group_by)?;
        }
        if let Some(having) = &self.having {
            write!(f, " HAVING {}", having)?;
        }
        if !self.order_by.is_empty() {
            write!(f, " ORDER BY ")?;
            write_list(f, &self.order_by)?;
        }
        if let Some(limit) = &self.limit {
            write!(f, " LIMIT {}", limit.count)?;
            if let Some(offset) = &limit.offset {
                write!(f, " OFFSET {}", offset)?;
            }
        }
        Ok(())
    }
}

/// Source rows of an INSERT
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InsertSource {
    Values(Vec<Vec<Expression>>),
    Query(Box<SelectStatement>),
}

/// `column = value` in an UPDATE
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub column: QualifiedName,
    pub value: Expression,
}

/// Shared shape of the DROP statements
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropStatement {
    pub if_exists: bool,
    pub names: Vec<QualifiedName>,
}

/// Constraints named by `ALTER TABLE ... CHECK|NOCHECK CONSTRAINT`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ConstraintSelection {
    All,
    Named(Vec<String>),
}

/// `DECLARE @name type [= default]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDeclaration {
    pub name: String,
    pub data_type: DataType,
    pub default: Option<Expression>,
}

/// Argument of an EXEC call: `[@name =] value [OUTPUT]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcedureArgument {
    pub name: Option<String>,
    pub value: Expression,
    pub output: bool,
}

/// SQL statement types
#[derive(Debug, Clone, Serialize)]
pub enum Statement {
    CreateTable(Table),
    AlterTableAdd {
        table: QualifiedName,
        check: Option<bool>,
        elements: Vec<TableElement>,
        location: Location,
    },
    AlterTableCheckConstraints {
        table: QualifiedName,
        check: bool,
        constraints: ConstraintSelection,
    },
    AlterTableOwner {
        table: QualifiedName,
        owner: String,
    },
    AlterDatabaseSet {
        database: QualifiedName,
        options: Vec<String>,
    },
    CreateDatabase {
        name: QualifiedName,
        if_not_exists: bool,
        options: Vec<String>,
    },
    CreateIndex {
        table: QualifiedName,
        index: Index,
    },
    View {
        name: QualifiedName,
        columns: Vec<String>,
        query: SelectStatement,
    },
    DropTable(DropStatement),
    DropView(DropStatement),
    DropProcedure(DropStatement),
    DropDatabase(DropStatement),
    Insert {
        table: QualifiedName,
        columns: Vec<String>,
        source: InsertSource,
    },
    Update {
        table: QualifiedName,
        assignments: Vec<Assignment>,
        where_clause: Option<Expression>,
    },
    Delete {
        table: QualifiedName,
        where_clause: Option<Expression>,
    },
    Select(SelectStatement),
    If {
        condition: Expression,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
    },
    Block(Vec<Statement>),
    Declare(Vec<VariableDeclaration>),
    ExecuteProcedure {
        return_variable: Option<String>,
        procedure: Option<QualifiedName>,
        arguments: Vec<ProcedureArgument>,
    },
    Raiserror {
        arguments: Vec<Expression>,
        options: Vec<String>,
    },
    Print(Expression),
    SetGlobal {
        name: String,
        values: Vec<Expression>,
    },
    SetIdentityInsert {
        table: QualifiedName,
        enabled: bool,
    },
    Pragma {
        name: QualifiedName,
        value: Option<Expression>,
    },
    Use(QualifiedName),
    LockTables(Vec<QualifiedName>),
    UnlockTables,
    Checkpoint,
    Start,
    Commit,
    Rollback,
}

impl Statement {
    /// Short statement kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::CreateTable(_) => "CREATE TABLE",
            Statement::AlterTableAdd { .. } => "ALTER TABLE ADD",
            Statement::AlterTableCheckConstraints { .. } => "ALTER TABLE CHECK CONSTRAINT",
            Statement::AlterTableOwner { .. } => "ALTER TABLE OWNER",
            Statement::AlterDatabaseSet { .. } => "ALTER DATABASE",
            Statement::CreateDatabase { .. } => "CREATE DATABASE",
            Statement::CreateIndex { .. } => "CREATE INDEX",
            Statement::View { .. } => "CREATE VIEW",
            Statement::DropTable(_) => "DROP TABLE",
            Statement::DropView(_) => "DROP VIEW",
            Statement::DropProcedure(_) => "DROP PROCEDURE",
            Statement::DropDatabase(_) => "DROP DATABASE",
            Statement::Insert { .. } => "INSERT",
            Statement::Update { .. } => "UPDATE",
            Statement::Delete { .. } => "DELETE",
            Statement::Select(_) => "SELECT",
            Statement::If { .. } => "IF",
            Statement::Block(_) => "BEGIN",
            Statement::Declare(_) => "DECLARE",
            Statement::ExecuteProcedure { .. } => "EXECUTE",
            Statement::Raiserror { .. } => "RAISERROR",
            Statement::Print(_) => "PRINT",
            Statement::SetGlobal { .. } => "SET",
            Statement::SetIdentityInsert { .. } => "SET IDENTITY_INSERT",
            Statement::Pragma { .. } => "PRAGMA",
            Statement::Use(_) => "USE",
            Statement::LockTables(_) => "LOCK TABLES",
            Statement::UnlockTables => "UNLOCK TABLES",
            Statement::Checkpoint => "CHECKPOINT",
            Statement::Start => "START TRANSACTION",
            Statement::Commit => "COMMIT",
            Statement::Rollback => "ROLLBACK",
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::CreateTable(table) => write!(f, "CREATE TABLE {}", table.name()),
            Statement::AlterTableAdd { table, elements, .. } => {
                write!(f, "ALTER TABLE {} ADD ({} elements)", table, elements.len())
            }
            Statement::AlterTableCheckConstraints { table, check, .. } => {
                write!(f, "ALTER TABLE {} {} CONSTRAINT", table, if *check { "CHECK" } else { "NOCHECK" })
            }
            Statement::AlterTableOwner { table, owner } => write!(f, "ALTER TABLE {} OWNER TO {}", table, owner),
            Statement::AlterDatabaseSet { database, .. } => write!(f, "ALTER DATABASE {} SET", database),
            Statement::CreateDatabase { name, .. } => write!(f, "CREATE DATABASE {}", name),
            Statement::CreateIndex { table, index } => write!(f, "CREATE INDEX {} ON {}", index.name.as_deref().unwrap_or(""), table),
            Statement::View { name, .. } => write!(f, "CREATE VIEW {}", name),
            Statement::DropTable(drop)
            | Statement::DropView(drop)
            | Statement::DropProcedure(drop)
            | Statement::DropDatabase(drop) => {
                write!(f, "{} ", self.kind())?;
                write_list(f, &drop.names)
            }
            Statement::Insert { table, .. } => write!(f, "INSERT INTO {}", table),
            Statement::Update { table, .. } => write!(f, "UPDATE {}", table),
            Statement::Delete { table, .. } => write!(f, "DELETE FROM {}", table),
            Statement::Select(query) => write!(f, "{}", query),
            Statement::If { condition, .. } => write!(f, "IF {}", condition),
            Statement::Block(statements) => write!(f, "BEGIN ({} statements) END", statements.len()),
            Statement::ExecuteProcedure { procedure: Some(procedure), .. } => write!(f, "EXECUTE {}", procedure),
            Statement::Print(expr) => write!(f, "PRINT {}", expr),
            Statement::SetGlobal { name, .. } => write!(f, "SET {}", name),
            Statement::SetIdentityInsert { table, enabled } => {
                write!(f, "SET IDENTITY_INSERT {} {}", table, if *enabled { "ON" } else { "OFF" })
            }
            Statement::Pragma { name, .. } => write!(f, "PRAGMA {}", name),
            Statement::Use(database) => write!(f, "USE {}", database),
            other => write!(f, "{}", other.kind()),
        }
    }
}
