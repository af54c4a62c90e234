//! Abstract Syntax Tree (AST) types for PostgreSQL statements.
//!
//! Every node owns its children and records the byte range it was parsed
//! from. Spans are stored as [`SourceSpan`], which never takes part in
//! equality: two trees parsed from differently formatted text compare equal
//! when their structure is the same.

mod display;
mod expression;
mod name;
pub(crate) mod precedence;
mod query;
mod statement;
mod types;

use serde::{Deserialize, Serialize};

use crate::lexer::Span;

pub use expression::{
    BinaryOp, CaseWhen, CastSyntax, ExprKind, Expr, ExtractField, FrameBound, FrameExclusion,
    FrameUnits, FunctionArg, FunctionCall, LikeKind, Literal, NormalForm, NullOrdering,
    OrderByExpr, OrderDirection, Parameter, QualifiedOperator, QuantifiedRhs, Quantifier,
    TrimSide, TruthValue, UnaryOp, ValueFunction, WindowFrame, WindowRef, WindowSpec,
    XmlAttribute, XmlOption, XmlStandalone,
};
pub use name::{Ident, ObjectName, TableAlias};
pub use query::{
    ColumnDef, Cte, Distinct, GroupingElement, IntoClause, Join, JoinConstraint, JoinKind,
    LimitClause, LockStrength, LockWait, LockingClause, NamedWindow, Persistence, Query,
    RelationExpr, RowsFromItem, Select, SelectItem, SetExpr, SetOperator, SetQuantifier,
    TableRef, TableRefKind, TableSample, Values, With, XmlNamespace, XmlTable, XmlTableColumn,
    XmlTableColumnKind,
};
pub use statement::{
    AlterSequenceStatement, Assignment, CheckpointStatement, ClosePortalStatement,
    ConflictAction, ConflictTarget, CopyDirection, CopyLegacyOption, CopyOption, CopyOptions,
    CopySource, CopyStatement, CopyTarget, CreateSequenceStatement, DeclareCursorStatement,
    DeleteStatement, DoStatement, DropBehavior, DropSequenceStatement, FetchDirection,
    FetchStatement, IndexElem, Indirection, InsertSource, InsertStatement, IsolationLevel,
    LockMode, LockStatement, OnConflict, OptionValue, Overriding, ResetStatement, Selection,
    SequenceOption, SetScope, SetTarget, SetTransactionStatement, SetValue, SetVariableStatement,
    ShowStatement, Statement, TargetColumn, TransactionKind, TransactionMode,
    TransactionStatement, UpdateStatement, VariableTarget,
};
pub use types::{IntervalField, IntervalFields, TypeKind, TypeName};

/// The source range of an AST node.
///
/// Always compares equal to any other `SourceSpan` so that derived
/// `PartialEq` on AST types is structural. Use [`Spanned::span`] to read the
/// actual offsets.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceSpan(pub Span);

impl SourceSpan {
    /// Returns the wrapped span.
    #[must_use]
    pub const fn get(self) -> Span {
        self.0
    }
}

impl PartialEq for SourceSpan {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for SourceSpan {}

impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        Self(span)
    }
}

/// AST nodes that know their source range.
pub trait Spanned {
    /// Returns the byte range of the node in the parsed text.
    fn span(&self) -> Span;
}

macro_rules! impl_spanned {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Spanned for $ty {
                fn span(&self) -> Span {
                    self.span.get()
                }
            }
        )*
    };
}

impl_spanned!(
    Ident,
    ObjectName,
    TableAlias,
    TypeName,
    Expr,
    FunctionCall,
    OrderByExpr,
    WindowSpec,
    Query,
    With,
    Cte,
    Select,
    SelectItem,
    Values,
    TableRef,
    RelationExpr,
    NamedWindow,
    LockingClause,
    InsertStatement,
    UpdateStatement,
    DeleteStatement,
    Assignment,
    TargetColumn,
    IndexElem,
    OnConflict,
    CopyStatement,
    LockStatement,
    CheckpointStatement,
    DoStatement,
    FetchStatement,
    DeclareCursorStatement,
    ClosePortalStatement,
    CreateSequenceStatement,
    AlterSequenceStatement,
    DropSequenceStatement,
    SetVariableStatement,
    SetTransactionStatement,
    ResetStatement,
    ShowStatement,
    TransactionStatement,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_span_always_equal() {
        assert_eq!(SourceSpan(Span::new(0, 3)), SourceSpan(Span::new(10, 20)));
    }

    #[test]
    fn test_source_span_serializes_as_span() {
        let json = serde_json::to_string(&SourceSpan(Span::new(1, 4))).unwrap();
        assert_eq!(json, r#"{"start":1,"end":4}"#);
    }

    #[test]
    fn test_spanned_reads_real_offsets() {
        let ident = Ident::new("a").with_span(Span::new(7, 8));
        assert_eq!(ident.span(), Span::new(7, 8));
    }
}
