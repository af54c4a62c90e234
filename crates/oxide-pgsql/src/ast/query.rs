//! Query AST types: `SELECT`, set operations, `FROM` items and clauses.

use serde::{Deserialize, Serialize};

use super::{Expr, Ident, ObjectName, OrderByExpr, SourceSpan, Statement, TableAlias, TypeName, WindowSpec};

/// A complete query: optional `WITH`, a body, and the trailing clauses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// `WITH` clause.
    pub with: Option<With>,
    /// Query body.
    pub body: SetExpr,
    /// `ORDER BY` clause.
    pub order_by: Vec<OrderByExpr>,
    /// `LIMIT` or `FETCH FIRST` clause.
    pub limit: Option<LimitClause>,
    /// `OFFSET` clause.
    pub offset: Option<Expr>,
    /// `FOR UPDATE` / `FOR SHARE` clauses.
    pub locking: Vec<LockingClause>,
    /// Source range.
    pub span: SourceSpan,
}

impl Query {
    /// Wraps a body with no clauses.
    #[must_use]
    pub fn from_body(body: SetExpr, span: SourceSpan) -> Self {
        Self {
            with: None,
            body,
            order_by: Vec::new(),
            limit: None,
            offset: None,
            locking: Vec::new(),
            span,
        }
    }

    /// Returns true if the query has none of the clauses that surround a body.
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.with.is_none()
            && self.order_by.is_empty()
            && self.limit.is_none()
            && self.offset.is_none()
            && self.locking.is_empty()
    }
}

/// `WITH [RECURSIVE] cte, ...`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct With {
    pub recursive: bool,
    pub ctes: Vec<Cte>,
    pub span: SourceSpan,
}

/// A common table expression: `name [(cols)] AS [[NOT] MATERIALIZED] (stmt)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cte {
    pub name: Ident,
    pub columns: Vec<Ident>,
    /// `MATERIALIZED` is `Some(true)`, `NOT MATERIALIZED` is `Some(false)`.
    pub materialized: Option<bool>,
    /// `SELECT`, `INSERT`, `UPDATE` or `DELETE`.
    pub statement: Box<Statement>,
    pub span: SourceSpan,
}

/// The body of a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SetExpr {
    /// `SELECT ...`
    Select(Box<Select>),
    /// `VALUES (...), ...`
    Values(Values),
    /// `TABLE name`
    Table(RelationExpr),
    /// `left UNION|INTERSECT|EXCEPT [ALL|DISTINCT] right`
    SetOperation {
        op: SetOperator,
        quantifier: SetQuantifier,
        left: Box<SetExpr>,
        right: Box<SetExpr>,
    },
    /// A parenthesised query that carries its own clauses.
    Query(Box<Query>),
}

/// Set operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetOperator {
    Union,
    Intersect,
    Except,
}

impl SetOperator {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::Intersect => "INTERSECT",
            Self::Except => "EXCEPT",
        }
    }

    /// `INTERSECT` binds tighter than `UNION` and `EXCEPT`.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Union | Self::Except => 1,
            Self::Intersect => 2,
        }
    }
}

/// `ALL` / `DISTINCT` after a set operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetQuantifier {
    None,
    All,
    Distinct,
}

/// `VALUES` rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Values {
    pub rows: Vec<Vec<Expr>>,
    pub span: SourceSpan,
}

/// A `SELECT` core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Select {
    /// `DISTINCT [ON (...)]`
    pub distinct: Option<Distinct>,
    /// The target list.
    pub targets: Vec<SelectItem>,
    /// `INTO [TEMP] table`
    pub into: Option<IntoClause>,
    /// `FROM` items.
    pub from: Vec<TableRef>,
    /// `WHERE` condition.
    pub selection: Option<Expr>,
    /// `GROUP BY` elements.
    pub group_by: Vec<GroupingElement>,
    /// `HAVING` condition.
    pub having: Option<Expr>,
    /// `WINDOW` definitions.
    pub windows: Vec<NamedWindow>,
    /// Source range.
    pub span: SourceSpan,
}

/// `DISTINCT` or `DISTINCT ON (...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Distinct {
    Distinct,
    On(Vec<Expr>),
}

/// A select-list item (also used for `RETURNING`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectItem {
    pub expr: Expr,
    pub alias: Option<Ident>,
    pub span: SourceSpan,
}

/// Table persistence for `SELECT INTO` and `CREATE SEQUENCE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Persistence {
    Temporary,
    Unlogged,
}

/// `INTO [TEMPORARY|UNLOGGED] [TABLE] name`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntoClause {
    pub persistence: Option<Persistence>,
    pub name: ObjectName,
}

/// A `GROUP BY` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GroupingElement {
    /// Plain expression.
    Expr(Expr),
    /// `()`
    Empty,
    /// `ROLLUP (...)`
    Rollup(Vec<Expr>),
    /// `CUBE (...)`
    Cube(Vec<Expr>),
    /// `GROUPING SETS (...)`
    Sets(Vec<GroupingElement>),
}

/// `WINDOW name AS (spec)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedWindow {
    pub name: Ident,
    pub spec: WindowSpec,
    pub span: SourceSpan,
}

/// `LIMIT` forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LimitClause {
    /// `LIMIT n`
    Limit(Expr),
    /// `LIMIT ALL`
    All,
    /// `FETCH FIRST [n] ROWS ONLY | WITH TIES`
    FetchFirst {
        count: Option<Expr>,
        with_ties: bool,
    },
}

/// Row lock strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockStrength {
    Update,
    NoKeyUpdate,
    Share,
    KeyShare,
}

impl LockStrength {
    /// Returns the SQL text after `FOR`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Update => "UPDATE",
            Self::NoKeyUpdate => "NO KEY UPDATE",
            Self::Share => "SHARE",
            Self::KeyShare => "KEY SHARE",
        }
    }
}

/// `NOWAIT` / `SKIP LOCKED`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockWait {
    Nowait,
    SkipLocked,
}

/// `FOR strength [OF tables] [NOWAIT | SKIP LOCKED]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockingClause {
    pub strength: LockStrength,
    pub of: Vec<ObjectName>,
    pub wait: Option<LockWait>,
    pub span: SourceSpan,
}

/// A relation reference: `[ONLY] name [*]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationExpr {
    pub name: ObjectName,
    pub only: bool,
    /// Trailing `*` (include descendants).
    pub inherit_star: bool,
    pub span: SourceSpan,
}

/// `TABLESAMPLE method (args) [REPEATABLE (seed)]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSample {
    pub method: ObjectName,
    pub args: Vec<Expr>,
    pub repeatable: Option<Expr>,
}

/// A column definition in a function alias: `AS t (a int, b text)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: Ident,
    pub data_type: TypeName,
}

/// One function in `ROWS FROM (...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowsFromItem {
    pub function: Expr,
    pub column_defs: Vec<ColumnDef>,
}

/// `XMLTABLE(...)` in `FROM`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XmlTable {
    /// `XMLNAMESPACES(...)` declarations.
    pub namespaces: Vec<XmlNamespace>,
    /// The XPath expression that produces rows.
    pub row_expr: Expr,
    /// The document after `PASSING`.
    pub document: Expr,
    pub columns: Vec<XmlTableColumn>,
    pub span: SourceSpan,
}

/// `uri AS name`, or `DEFAULT uri` when `name` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XmlNamespace {
    pub uri: Expr,
    pub name: Option<Ident>,
}

/// One entry of `XMLTABLE(... COLUMNS ...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XmlTableColumn {
    pub name: Ident,
    pub kind: XmlTableColumnKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum XmlTableColumnKind {
    /// `FOR ORDINALITY`
    Ordinality,
    /// `type [PATH expr] [DEFAULT expr] [NOT NULL | NULL]`
    Typed {
        data_type: TypeName,
        path: Option<Expr>,
        default: Option<Expr>,
        /// `Some(true)` for `NOT NULL`, `Some(false)` for an explicit `NULL`.
        not_null: Option<bool>,
    },
}

/// A `FROM` item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRef {
    pub kind: TableRefKind,
    pub span: SourceSpan,
}

/// `FROM` item variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableRefKind {
    /// A table or view.
    Relation {
        relation: RelationExpr,
        alias: Option<TableAlias>,
        sample: Option<TableSample>,
    },
    /// A set-returning function.
    Function {
        lateral: bool,
        function: Expr,
        ordinality: bool,
        alias: Option<TableAlias>,
        column_defs: Vec<ColumnDef>,
    },
    /// `ROWS FROM (f(), g())`
    RowsFrom {
        lateral: bool,
        functions: Vec<RowsFromItem>,
        ordinality: bool,
        alias: Option<TableAlias>,
    },
    /// `XMLTABLE(...)`
    XmlTable {
        lateral: bool,
        table: Box<XmlTable>,
        alias: Option<TableAlias>,
    },
    /// A subquery in parentheses.
    Subquery {
        lateral: bool,
        query: Box<Query>,
        alias: Option<TableAlias>,
    },
    /// A join of two items.
    Join(Box<Join>),
    /// A parenthesised join, optionally aliased.
    Nested {
        table: Box<TableRef>,
        alias: Option<TableAlias>,
    },
}

/// Join types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    /// Returns the SQL keywords for the join.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inner => "JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

/// `ON condition` or `USING (cols)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JoinConstraint {
    On(Expr),
    Using(Vec<Ident>),
}

/// A join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub left: TableRef,
    pub right: TableRef,
    pub kind: JoinKind,
    pub natural: bool,
    pub constraint: Option<JoinConstraint>,
}
