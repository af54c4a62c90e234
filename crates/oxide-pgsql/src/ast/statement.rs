//! Statement AST types.

use serde::{Deserialize, Serialize};

use super::{
    Expr, Ident, NullOrdering, ObjectName, OrderDirection, Persistence, Query, RelationExpr,
    SelectItem, SourceSpan, Spanned, TableRef, TypeName, With,
};
use crate::lexer::Span;

/// A SQL statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// `SELECT`, `VALUES`, `TABLE` or a set operation.
    Select(Box<Query>),
    /// `INSERT`
    Insert(Box<InsertStatement>),
    /// `UPDATE`
    Update(Box<UpdateStatement>),
    /// `DELETE`
    Delete(Box<DeleteStatement>),
    /// `COPY`
    Copy(Box<CopyStatement>),
    /// `LOCK`
    Lock(LockStatement),
    /// `CHECKPOINT`
    Checkpoint(CheckpointStatement),
    /// `DO`
    Do(DoStatement),
    /// `FETCH` / `MOVE`
    Fetch(FetchStatement),
    /// `DECLARE ... CURSOR`
    DeclareCursor(Box<DeclareCursorStatement>),
    /// `CLOSE`
    ClosePortal(ClosePortalStatement),
    /// `CREATE SEQUENCE`
    CreateSequence(CreateSequenceStatement),
    /// `ALTER SEQUENCE`
    AlterSequence(AlterSequenceStatement),
    /// `DROP SEQUENCE`
    DropSequence(DropSequenceStatement),
    /// `SET var ...`
    SetVariable(SetVariableStatement),
    /// `SET TRANSACTION ...`
    SetTransaction(SetTransactionStatement),
    /// `RESET`
    ResetVariable(ResetStatement),
    /// `SHOW`
    ShowVariable(ShowStatement),
    /// Transaction control.
    Transaction(TransactionStatement),
}

impl Statement {
    /// Returns a short name for the statement kind.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Select(_) => "select",
            Self::Insert(_) => "insert",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
            Self::Copy(_) => "copy",
            Self::Lock(_) => "lock",
            Self::Checkpoint(_) => "checkpoint",
            Self::Do(_) => "do",
            Self::Fetch(_) => "fetch",
            Self::DeclareCursor(_) => "declare_cursor",
            Self::ClosePortal(_) => "close",
            Self::CreateSequence(_) => "create_sequence",
            Self::AlterSequence(_) => "alter_sequence",
            Self::DropSequence(_) => "drop_sequence",
            Self::SetVariable(_) => "set",
            Self::SetTransaction(_) => "set_transaction",
            Self::ResetVariable(_) => "reset",
            Self::ShowVariable(_) => "show",
            Self::Transaction(_) => "transaction",
        }
    }
}

impl Spanned for Statement {
    fn span(&self) -> Span {
        match self {
            Self::Select(s) => s.span(),
            Self::Insert(s) => s.span(),
            Self::Update(s) => s.span(),
            Self::Delete(s) => s.span(),
            Self::Copy(s) => s.span(),
            Self::Lock(s) => s.span(),
            Self::Checkpoint(s) => s.span(),
            Self::Do(s) => s.span(),
            Self::Fetch(s) => s.span(),
            Self::DeclareCursor(s) => s.span(),
            Self::ClosePortal(s) => s.span(),
            Self::CreateSequence(s) => s.span(),
            Self::AlterSequence(s) => s.span(),
            Self::DropSequence(s) => s.span(),
            Self::SetVariable(s) => s.span(),
            Self::SetTransaction(s) => s.span(),
            Self::ResetVariable(s) => s.span(),
            Self::ShowVariable(s) => s.span(),
            Self::Transaction(s) => s.span(),
        }
    }
}

// --- DML ---

/// `OVERRIDING SYSTEM VALUE` / `OVERRIDING USER VALUE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Overriding {
    System,
    User,
}

/// The rows an `INSERT` adds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InsertSource {
    /// `VALUES ...` or `SELECT ...`
    Query(Box<Query>),
    /// `DEFAULT VALUES`
    DefaultValues,
}

/// `ON CONFLICT` target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConflictTarget {
    /// `(index_elem, ...) [WHERE predicate]`
    Columns {
        columns: Vec<IndexElem>,
        selection: Option<Expr>,
    },
    /// `ON CONSTRAINT name`
    Constraint(Ident),
}

/// `ON CONFLICT` action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConflictAction {
    /// `DO NOTHING`
    DoNothing,
    /// `DO UPDATE SET ... [WHERE ...]`
    DoUpdate {
        assignments: Vec<Assignment>,
        selection: Option<Expr>,
    },
}

/// `ON CONFLICT [target] action`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnConflict {
    pub target: Option<ConflictTarget>,
    pub action: ConflictAction,
    pub span: SourceSpan,
}

/// An `INSERT` statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertStatement {
    pub with: Option<With>,
    pub table: ObjectName,
    pub alias: Option<Ident>,
    pub columns: Vec<TargetColumn>,
    pub overriding: Option<Overriding>,
    pub source: InsertSource,
    pub on_conflict: Option<OnConflict>,
    pub returning: Vec<SelectItem>,
    pub span: SourceSpan,
}

/// A column assigned by `INSERT` or `UPDATE`, possibly narrowed to a field
/// or an array element: `col`, `col.field`, `col[1]`, `col[1:2].field`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetColumn {
    pub name: Ident,
    pub indirection: Vec<Indirection>,
    pub span: SourceSpan,
}

/// One step of a [`TargetColumn`] path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Indirection {
    /// `.field`
    Field(Ident),
    /// `[index]`
    Subscript(Expr),
    /// `[lower:upper]`; either bound may be omitted.
    Slice {
        lower: Option<Expr>,
        upper: Option<Expr>,
    },
}

/// One element of an `ON CONFLICT (...)` inference clause:
/// `expr [COLLATE collation] [opclass] [ASC | DESC] [NULLS FIRST | LAST]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexElem {
    pub expr: Expr,
    pub collation: Option<ObjectName>,
    pub opclass: Option<ObjectName>,
    pub direction: Option<OrderDirection>,
    pub nulls: Option<NullOrdering>,
    pub span: SourceSpan,
}

/// A `SET` assignment: `col = value` or `(a, b) = row`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Target columns.
    pub columns: Vec<TargetColumn>,
    /// Assigned value.
    pub value: Expr,
    /// Whether the parenthesised multi-column form was used.
    pub multi: bool,
    pub span: SourceSpan,
}

/// A `WHERE` clause of `UPDATE` / `DELETE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Selection {
    /// `WHERE condition`
    Condition(Expr),
    /// `WHERE CURRENT OF cursor`
    CurrentOf(Ident),
}

/// An `UPDATE` statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatement {
    pub with: Option<With>,
    pub table: RelationExpr,
    pub alias: Option<Ident>,
    pub assignments: Vec<Assignment>,
    pub from: Vec<TableRef>,
    pub selection: Option<Selection>,
    pub returning: Vec<SelectItem>,
    pub span: SourceSpan,
}

/// A `DELETE` statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteStatement {
    pub with: Option<With>,
    pub table: RelationExpr,
    pub alias: Option<Ident>,
    pub using: Vec<TableRef>,
    pub selection: Option<Selection>,
    pub returning: Vec<SelectItem>,
    pub span: SourceSpan,
}

// --- COPY ---

/// What a `COPY` reads or writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CopySource {
    /// `table [(columns)]`
    Table {
        name: ObjectName,
        columns: Vec<Ident>,
    },
    /// `(statement)`
    Query(Box<Statement>),
}

/// `FROM` / `TO`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CopyDirection {
    From,
    To,
}

/// The far end of a `COPY`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CopyTarget {
    Stdin,
    Stdout,
    File(String),
    Program(String),
}

/// A value in an option list (`COPY`, `SET`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionValue {
    /// A string constant.
    String(String),
    /// A bare word (`on`, `true`, `csv`), folded to lower case.
    Word(String),
    /// A possibly signed number, as written.
    Number(String),
    /// `*`
    Star,
    /// `(v, ...)`
    List(Vec<OptionValue>),
}

/// An old-style `COPY` option (without parentheses).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CopyLegacyOption {
    Binary,
    Freeze,
    Delimiter(String),
    Null(String),
    Csv,
    Header,
    Quote(String),
    Escape(String),
    /// `FORCE QUOTE cols`; an empty list means `*`.
    ForceQuote(Vec<Ident>),
    ForceNotNull(Vec<Ident>),
    ForceNull(Vec<Ident>),
    Encoding(String),
}

/// A parenthesised `COPY` option: `name [value]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyOption {
    pub name: Ident,
    pub arg: Option<OptionValue>,
}

/// `COPY` option syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CopyOptions {
    /// `WITH CSV HEADER ...`
    Legacy(Vec<CopyLegacyOption>),
    /// `WITH (FORMAT csv, ...)`
    Generic(Vec<CopyOption>),
}

impl CopyOptions {
    /// Returns true if the options choose the data format.
    #[must_use]
    pub fn sets_format(&self) -> bool {
        match self {
            Self::Legacy(options) => options
                .iter()
                .any(|option| matches!(option, CopyLegacyOption::Binary | CopyLegacyOption::Csv)),
            Self::Generic(options) => options.iter().any(|option| option.name.value == "format"),
        }
    }
}

/// A `COPY` statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopyStatement {
    /// Old `COPY BINARY table` spelling.
    pub binary: bool,
    pub source: CopySource,
    pub direction: CopyDirection,
    pub target: CopyTarget,
    pub options: CopyOptions,
    pub selection: Option<Expr>,
    pub span: SourceSpan,
}

// --- Utility statements ---

/// Table lock modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockMode {
    AccessShare,
    RowShare,
    RowExclusive,
    ShareUpdateExclusive,
    Share,
    ShareRowExclusive,
    Exclusive,
    AccessExclusive,
}

impl LockMode {
    /// Returns the SQL text of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccessShare => "ACCESS SHARE",
            Self::RowShare => "ROW SHARE",
            Self::RowExclusive => "ROW EXCLUSIVE",
            Self::ShareUpdateExclusive => "SHARE UPDATE EXCLUSIVE",
            Self::Share => "SHARE",
            Self::ShareRowExclusive => "SHARE ROW EXCLUSIVE",
            Self::Exclusive => "EXCLUSIVE",
            Self::AccessExclusive => "ACCESS EXCLUSIVE",
        }
    }
}

/// `LOCK [TABLE] tables [IN mode MODE] [NOWAIT]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockStatement {
    pub tables: Vec<RelationExpr>,
    pub mode: Option<LockMode>,
    pub nowait: bool,
    pub span: SourceSpan,
}

/// `CHECKPOINT`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointStatement {
    pub span: SourceSpan,
}

/// `DO [LANGUAGE lang] 'code'`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoStatement {
    pub code: String,
    pub language: Option<String>,
    pub span: SourceSpan,
}

/// Cursor movement for `FETCH` / `MOVE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchDirection {
    Next,
    Prior,
    First,
    Last,
    Absolute(i64),
    Relative(i64),
    /// A bare count: `FETCH 5 FROM c`.
    Count(i64),
    All,
    Forward(Option<i64>),
    ForwardAll,
    Backward(Option<i64>),
    BackwardAll,
}

/// `FETCH` or `MOVE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchStatement {
    /// `MOVE` rather than `FETCH`.
    pub is_move: bool,
    pub direction: FetchDirection,
    pub cursor: Ident,
    pub span: SourceSpan,
}

/// `DECLARE name [options] CURSOR [WITH|WITHOUT HOLD] FOR query`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclareCursorStatement {
    pub name: Ident,
    pub binary: bool,
    pub insensitive: bool,
    /// `SCROLL` is `Some(true)`, `NO SCROLL` is `Some(false)`.
    pub scroll: Option<bool>,
    pub hold: bool,
    pub query: Box<Query>,
    pub span: SourceSpan,
}

/// `CLOSE name | ALL`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosePortalStatement {
    /// `None` for `CLOSE ALL`.
    pub name: Option<Ident>,
    pub span: SourceSpan,
}

// --- Sequences ---

/// A sequence option element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SequenceOption {
    As(TypeName),
    Cache(String),
    Cycle(bool),
    IncrementBy(String),
    /// `MAXVALUE n`, or `NO MAXVALUE` as `None`.
    MaxValue(Option<String>),
    /// `MINVALUE n`, or `NO MINVALUE` as `None`.
    MinValue(Option<String>),
    /// `OWNED BY col`, or `OWNED BY NONE` as `None`.
    OwnedBy(Option<ObjectName>),
    SequenceName(ObjectName),
    Start(String),
    /// `RESTART [[WITH] n]`
    Restart(Option<String>),
}

impl SequenceOption {
    /// Returns the option keyword, used to detect repeated options.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::As(_) => "AS",
            Self::Cache(_) => "CACHE",
            Self::Cycle(_) => "CYCLE",
            Self::IncrementBy(_) => "INCREMENT",
            Self::MaxValue(_) => "MAXVALUE",
            Self::MinValue(_) => "MINVALUE",
            Self::OwnedBy(_) => "OWNED BY",
            Self::SequenceName(_) => "SEQUENCE NAME",
            Self::Start(_) => "START",
            Self::Restart(_) => "RESTART",
        }
    }
}

/// `CREATE [TEMP] SEQUENCE [IF NOT EXISTS] name [options]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSequenceStatement {
    pub persistence: Option<Persistence>,
    pub if_not_exists: bool,
    pub name: ObjectName,
    pub options: Vec<SequenceOption>,
    pub span: SourceSpan,
}

/// `ALTER SEQUENCE [IF EXISTS] name options`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterSequenceStatement {
    pub if_exists: bool,
    pub name: ObjectName,
    pub options: Vec<SequenceOption>,
    pub span: SourceSpan,
}

/// `CASCADE` / `RESTRICT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropBehavior {
    Cascade,
    Restrict,
}

/// `DROP SEQUENCE [IF EXISTS] names [CASCADE|RESTRICT]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropSequenceStatement {
    pub if_exists: bool,
    pub names: Vec<ObjectName>,
    pub behavior: Option<DropBehavior>,
    pub span: SourceSpan,
}

// --- Session ---

/// `SESSION` / `LOCAL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetScope {
    Session,
    Local,
}

/// What a `SET` changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetTarget {
    /// A configuration parameter.
    Variable(ObjectName),
    /// `TIME ZONE`
    TimeZone,
    /// `SCHEMA`
    Schema,
    /// `NAMES`
    Names,
    /// `ROLE`
    Role,
    /// `SESSION AUTHORIZATION`
    SessionAuthorization,
}

/// The new value in a `SET`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SetValue {
    Values(Vec<OptionValue>),
    /// `TIME ZONE INTERVAL '...' [qualifier]`, held as a typed literal.
    Interval(Expr),
    Default,
    /// `FROM CURRENT`
    FromCurrent,
    /// `TIME ZONE LOCAL`
    Local,
}

/// `SET [SESSION|LOCAL] target {TO|=} value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetVariableStatement {
    pub scope: Option<SetScope>,
    pub target: SetTarget,
    pub value: SetValue,
    pub span: SourceSpan,
}

/// Transaction isolation levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IsolationLevel {
    Serializable,
    RepeatableRead,
    ReadCommitted,
    ReadUncommitted,
}

impl IsolationLevel {
    /// Returns the SQL text of the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Serializable => "SERIALIZABLE",
            Self::RepeatableRead => "REPEATABLE READ",
            Self::ReadCommitted => "READ COMMITTED",
            Self::ReadUncommitted => "READ UNCOMMITTED",
        }
    }
}

/// A transaction characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionMode {
    IsolationLevel(IsolationLevel),
    ReadOnly,
    ReadWrite,
    Deferrable,
    NotDeferrable,
}

impl TransactionMode {
    /// Modes in the same group conflict with each other.
    #[must_use]
    pub const fn group(self) -> u8 {
        match self {
            Self::IsolationLevel(_) => 0,
            Self::ReadOnly | Self::ReadWrite => 1,
            Self::Deferrable | Self::NotDeferrable => 2,
        }
    }
}

/// `SET [SESSION|LOCAL] TRANSACTION modes` or
/// `SET SESSION CHARACTERISTICS AS TRANSACTION modes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetTransactionStatement {
    pub scope: Option<SetScope>,
    pub session_characteristics: bool,
    pub modes: Vec<TransactionMode>,
    pub span: SourceSpan,
}

/// The parameter named by `RESET` / `SHOW`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableTarget {
    All,
    TimeZone,
    TransactionIsolation,
    SessionAuthorization,
    Name(ObjectName),
}

/// `RESET target`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetStatement {
    pub target: VariableTarget,
    pub span: SourceSpan,
}

/// `SHOW target`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowStatement {
    pub target: VariableTarget,
    pub span: SourceSpan,
}

/// Transaction control variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// `BEGIN [WORK|TRANSACTION] [modes]`
    Begin(Vec<TransactionMode>),
    /// `START TRANSACTION [modes]`
    Start(Vec<TransactionMode>),
    /// `COMMIT` / `END [AND [NO] CHAIN]`
    Commit { chain: bool },
    /// `ROLLBACK` / `ABORT [AND [NO] CHAIN]`
    Rollback { chain: bool },
    /// `SAVEPOINT name`
    Savepoint(Ident),
    /// `RELEASE [SAVEPOINT] name`
    Release(Ident),
    /// `ROLLBACK TO [SAVEPOINT] name`
    RollbackTo(Ident),
}

/// A transaction control statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionStatement {
    pub kind: TransactionKind,
    pub span: SourceSpan,
}
