//! Expression AST types.

use serde::{Deserialize, Serialize};

use super::precedence;
use super::{Ident, ObjectName, Query, SourceSpan, TypeName};
use crate::lexer::Span;

/// A literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// Integer literal that fits in an `i64`.
    Integer(i64),
    /// Any other numeric literal, kept as written.
    Numeric(String),
    /// String literal.
    String(String),
    /// Bit-string literal (`B'0101'`).
    BitString(String),
    /// Hexadecimal bit-string literal (`X'1F'`).
    HexString(String),
    /// `TRUE` / `FALSE`
    Boolean(bool),
    /// `NULL`
    Null,
}

/// A query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parameter {
    /// `$n`
    Numbered(u32),
    /// `?`, numbered by position starting at 1.
    Marker(u32),
}

/// An operator written as `OPERATOR(schema.op)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualifiedOperator {
    /// Schema path.
    pub schema: Vec<Ident>,
    /// Operator text.
    pub op: String,
}

/// Binary operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Exponent,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,

    // String and JSON
    Concat,
    Arrow,
    LongArrow,
    HashArrow,
    HashLongArrow,
    AtArrow,
    ArrowAt,
    Question,
    QuestionPipe,
    QuestionAnd,
    HashMinus,
    AtQuestion,
    AtAt,

    /// `row OVERLAPS row`
    Overlaps,
    /// Any other operator (`~`, `&&`, `<<`, ...).
    Custom(String),
    /// `OPERATOR(schema.op)`
    Qualified(QualifiedOperator),
}

impl BinaryOp {
    /// Returns the SQL representation of the operator, if it has a plain one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        Some(match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Exponent => "^",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Concat => "||",
            Self::Arrow => "->",
            Self::LongArrow => "->>",
            Self::HashArrow => "#>",
            Self::HashLongArrow => "#>>",
            Self::AtArrow => "@>",
            Self::ArrowAt => "<@",
            Self::Question => "?",
            Self::QuestionPipe => "?|",
            Self::QuestionAnd => "?&",
            Self::HashMinus => "#-",
            Self::AtQuestion => "@?",
            Self::AtAt => "@@",
            Self::Overlaps => "OVERLAPS",
            Self::Custom(op) => op,
            Self::Qualified(_) => return None,
        })
    }

    /// Returns the precedence of the operator (higher = binds tighter).
    ///
    /// The levels match the parser's left binding powers.
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Or => precedence::OR,
            Self::And => precedence::AND,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => {
                precedence::COMPARISON
            }
            Self::Plus | Self::Minus => precedence::ADDITIVE,
            Self::Multiply | Self::Divide | Self::Modulo => precedence::MULTIPLICATIVE,
            Self::Exponent => precedence::EXPONENT,
            _ => precedence::OTHER_OP,
        }
    }

    /// Returns true for non-associative operators (`a < b < c` is an error).
    #[must_use]
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq
        )
    }
}

/// Unary prefix operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// `-`
    Minus,
    /// `+`
    Plus,
    /// `NOT`
    Not,
    /// Any other prefix operator (`~`, `@`, `|/`, ...).
    Custom(String),
    /// `OPERATOR(schema.op)`
    Qualified(QualifiedOperator),
}

impl UnaryOp {
    /// Returns the precedence of the operator.
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Not => precedence::NOT,
            Self::Minus | Self::Plus => precedence::UNARY,
            Self::Custom(_) | Self::Qualified(_) => precedence::OTHER_OP,
        }
    }
}

/// `IS [NOT] TRUE | FALSE | UNKNOWN`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TruthValue {
    True,
    False,
    Unknown,
}

/// Unicode normal forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalForm {
    Nfc,
    Nfd,
    Nfkc,
    Nfkd,
}

/// The pattern-matching operator family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LikeKind {
    /// `LIKE`
    Like,
    /// `ILIKE`
    ILike,
    /// `SIMILAR TO`
    SimilarTo,
}

/// `ANY` / `SOME` / `ALL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quantifier {
    /// `ANY` or `SOME`
    Any,
    /// `ALL`
    All,
}

/// The right-hand side of a quantified comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuantifiedRhs {
    /// `= ANY (SELECT ...)`
    Subquery(Box<Query>),
    /// `= ANY (array_expr)`
    Expr(Box<Expr>),
}

/// How a cast was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastSyntax {
    /// `CAST(x AS t)`
    Cast,
    /// `x::t`
    DoubleColon,
}

/// The field of an `EXTRACT`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractField {
    /// A field name (`year`, `epoch`), folded to lower case.
    Word(String),
    /// A string constant (`'year'`).
    String(String),
}

/// `TRIM` direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrimSide {
    Both,
    Leading,
    Trailing,
}

/// SQL value functions that take no parenthesised arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueFunction {
    CurrentDate,
    CurrentTime,
    CurrentTimestamp,
    LocalTime,
    LocalTimestamp,
    CurrentRole,
    CurrentUser,
    SessionUser,
    User,
    CurrentCatalog,
    CurrentSchema,
}

impl ValueFunction {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CurrentDate => "CURRENT_DATE",
            Self::CurrentTime => "CURRENT_TIME",
            Self::CurrentTimestamp => "CURRENT_TIMESTAMP",
            Self::LocalTime => "LOCALTIME",
            Self::LocalTimestamp => "LOCALTIMESTAMP",
            Self::CurrentRole => "CURRENT_ROLE",
            Self::CurrentUser => "CURRENT_USER",
            Self::SessionUser => "SESSION_USER",
            Self::User => "USER",
            Self::CurrentCatalog => "CURRENT_CATALOG",
            Self::CurrentSchema => "CURRENT_SCHEMA",
        }
    }

    /// Returns true if the function accepts a precision argument.
    #[must_use]
    pub const fn takes_precision(self) -> bool {
        matches!(
            self,
            Self::CurrentTime | Self::CurrentTimestamp | Self::LocalTime | Self::LocalTimestamp
        )
    }
}

/// `DOCUMENT` or `CONTENT` in XML functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum XmlOption {
    Document,
    Content,
}

/// `STANDALONE YES | NO | NO VALUE` in `XMLROOT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum XmlStandalone {
    Yes,
    No,
    NoValue,
}

/// An `XMLATTRIBUTES` / `XMLFOREST` element: `value [AS name]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XmlAttribute {
    pub value: Expr,
    pub name: Option<Ident>,
}

/// One `WHEN ... THEN ...` arm of a `CASE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseWhen {
    pub condition: Expr,
    pub result: Expr,
}

/// A function argument, optionally named (`name => value`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionArg {
    pub name: Option<Ident>,
    pub value: Expr,
}

/// A function call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Function name.
    pub name: ObjectName,
    /// Arguments.
    pub args: Vec<FunctionArg>,
    /// `count(*)`
    pub star: bool,
    /// `DISTINCT` aggregate.
    pub distinct: bool,
    /// `VARIADIC` applied to the last argument.
    pub variadic: bool,
    /// `ORDER BY` inside the argument list.
    pub order_by: Vec<OrderByExpr>,
    /// `WITHIN GROUP (ORDER BY ...)`
    pub within_group: Vec<OrderByExpr>,
    /// `FILTER (WHERE ...)`
    pub filter: Option<Box<Expr>>,
    /// `OVER ...`
    pub over: Option<WindowRef>,
    /// Source range.
    pub span: SourceSpan,
}

impl FunctionCall {
    /// Creates a plain call `name(args)`.
    #[must_use]
    pub fn new(name: ObjectName, args: Vec<Expr>) -> Self {
        Self {
            name,
            args: args
                .into_iter()
                .map(|value| FunctionArg { name: None, value })
                .collect(),
            star: false,
            distinct: false,
            variadic: false,
            order_by: Vec::new(),
            within_group: Vec::new(),
            filter: None,
            over: None,
            span: SourceSpan::default(),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderDirection {
    /// `ASC`
    Asc,
    /// `DESC`
    Desc,
    /// `USING op`
    Using(String),
}

/// `NULLS FIRST` / `NULLS LAST`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NullOrdering {
    First,
    Last,
}

/// An `ORDER BY` item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByExpr {
    pub expr: Expr,
    pub direction: Option<OrderDirection>,
    pub nulls: Option<NullOrdering>,
    pub span: SourceSpan,
}

/// The window of an `OVER` clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WindowRef {
    /// `OVER w`
    Named(Ident),
    /// `OVER (...)`
    Spec(WindowSpec),
}

/// A window specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSpec {
    /// Name of a window this one refines.
    pub existing: Option<Ident>,
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<OrderByExpr>,
    pub frame: Option<WindowFrame>,
    pub span: SourceSpan,
}

/// `ROWS` / `RANGE` / `GROUPS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameUnits {
    Rows,
    Range,
    Groups,
}

/// One end of a window frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FrameBound {
    UnboundedPreceding,
    Preceding(Box<Expr>),
    CurrentRow,
    Following(Box<Expr>),
    UnboundedFollowing,
}

impl FrameBound {
    /// Position of the bound kind on the frame axis, used to reject frames
    /// that start after they end.
    #[must_use]
    pub const fn rank(&self) -> u8 {
        match self {
            Self::UnboundedPreceding => 0,
            Self::Preceding(_) => 1,
            Self::CurrentRow => 2,
            Self::Following(_) => 3,
            Self::UnboundedFollowing => 4,
        }
    }
}

/// `EXCLUDE ...` frame option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameExclusion {
    CurrentRow,
    Group,
    Ties,
    NoOthers,
}

/// A window frame clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowFrame {
    pub units: FrameUnits,
    pub start: FrameBound,
    /// End bound of a `BETWEEN ... AND ...` frame.
    pub end: Option<FrameBound>,
    pub exclusion: Option<FrameExclusion>,
}

/// An expression with its source range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    /// The expression variant.
    pub kind: ExprKind,
    /// Source range.
    pub span: SourceSpan,
}

impl Expr {
    /// Creates an expression.
    #[must_use]
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Self {
            kind,
            span: SourceSpan(span),
        }
    }

    /// Creates a literal with an empty span.
    #[must_use]
    pub fn literal(literal: Literal) -> Self {
        Self::new(ExprKind::Literal(literal), Span::default())
    }

    /// Creates a column reference with an empty span.
    #[must_use]
    pub fn column(name: &str) -> Self {
        Self::new(
            ExprKind::Column(ObjectName::from(Ident::new(name))),
            Span::default(),
        )
    }

    /// Returns true for row constructors, explicit or implicit.
    #[must_use]
    pub const fn is_row(&self) -> bool {
        matches!(self.kind, ExprKind::Row { .. })
    }
}

/// Expression variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    /// Literal value.
    Literal(Literal),
    /// Typed string constant: `DATE '2024-01-01'`, `INTERVAL '1' DAY`.
    TypedString { data_type: TypeName, value: String },
    /// Column reference, possibly qualified.
    Column(ObjectName),
    /// `*` or `t.*`
    Wildcard(Option<ObjectName>),
    /// Query parameter.
    Parameter(Parameter),

    /// Prefix operator.
    Unary { op: UnaryOp, expr: Box<Expr> },
    /// Binary operator.
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },

    /// `IS [NOT] NULL`, `ISNULL`, `NOTNULL`
    IsNull { expr: Box<Expr>, negated: bool },
    /// `IS [NOT] TRUE | FALSE | UNKNOWN`
    IsTruth {
        expr: Box<Expr>,
        value: TruthValue,
        negated: bool,
    },
    /// `IS [NOT] DISTINCT FROM`
    IsDistinctFrom {
        left: Box<Expr>,
        right: Box<Expr>,
        negated: bool,
    },
    /// `IS [NOT] DOCUMENT`
    IsDocument { expr: Box<Expr>, negated: bool },
    /// `IS [NOT] [form] NORMALIZED`
    IsNormalized {
        expr: Box<Expr>,
        form: Option<NormalForm>,
        negated: bool,
    },
    /// `[NOT] BETWEEN [SYMMETRIC] low AND high`
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
        symmetric: bool,
    },
    /// `[NOT] LIKE | ILIKE | SIMILAR TO pattern [ESCAPE e]`
    Like {
        expr: Box<Expr>,
        kind: LikeKind,
        pattern: Box<Expr>,
        escape: Option<Box<Expr>>,
        negated: bool,
    },
    /// `[NOT] IN (list)`
    InList {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },
    /// `[NOT] IN (subquery)`
    InSubquery {
        expr: Box<Expr>,
        subquery: Box<Query>,
        negated: bool,
    },
    /// `left op ANY|SOME|ALL (...)`
    Quantified {
        left: Box<Expr>,
        op: BinaryOp,
        quantifier: Quantifier,
        right: QuantifiedRhs,
    },
    /// `EXISTS (subquery)`
    Exists(Box<Query>),
    /// Scalar subquery.
    Subquery(Box<Query>),
    /// `ARRAY(subquery)`
    ArraySubquery(Box<Query>),
    /// `ARRAY[...]`, nested brackets included.
    Array(Vec<Expr>),
    /// `ROW(...)` when `explicit`, otherwise `(a, b)`.
    Row { exprs: Vec<Expr>, explicit: bool },
    /// `CASE`
    Case {
        operand: Option<Box<Expr>>,
        conditions: Vec<CaseWhen>,
        else_result: Option<Box<Expr>>,
    },
    /// `CAST(x AS t)` or `x::t`
    Cast {
        expr: Box<Expr>,
        data_type: TypeName,
        syntax: CastSyntax,
    },
    /// Function call.
    Function(Box<FunctionCall>),

    /// `EXTRACT(field FROM expr)`
    Extract { field: ExtractField, expr: Box<Expr> },
    /// `OVERLAY(expr PLACING placing FROM from [FOR length])`
    Overlay {
        expr: Box<Expr>,
        placing: Box<Expr>,
        from: Box<Expr>,
        length: Option<Box<Expr>>,
    },
    /// `POSITION(substring IN string)`
    Position {
        substring: Box<Expr>,
        string: Box<Expr>,
    },
    /// `SUBSTRING(expr [FROM from] [FOR length])`
    Substring {
        expr: Box<Expr>,
        from: Option<Box<Expr>>,
        length: Option<Box<Expr>>,
    },
    /// `SUBSTRING(expr SIMILAR pattern ESCAPE escape)`
    SubstringSimilar {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        escape: Box<Expr>,
    },
    /// `TRIM([side] [characters] FROM exprs)`
    Trim {
        side: Option<TrimSide>,
        characters: Option<Box<Expr>>,
        exprs: Vec<Expr>,
    },
    /// `TREAT(expr AS type)`
    Treat { expr: Box<Expr>, data_type: TypeName },
    /// `CURRENT_DATE`, `CURRENT_TIMESTAMP(3)`, `SESSION_USER`, ...
    ValueFunction {
        func: ValueFunction,
        precision: Option<u32>,
    },
    /// `COLLATION FOR (expr)`
    CollationFor(Box<Expr>),
    /// `NORMALIZE(expr [, form])`
    Normalize {
        expr: Box<Expr>,
        form: Option<NormalForm>,
    },

    /// `XMLELEMENT(NAME n [, XMLATTRIBUTES(...)] [, content...])`
    XmlElement {
        name: Ident,
        attributes: Vec<XmlAttribute>,
        content: Vec<Expr>,
    },
    /// `XMLFOREST(...)`
    XmlForest(Vec<XmlAttribute>),
    /// `XMLPARSE(DOCUMENT|CONTENT expr [PRESERVE|STRIP WHITESPACE])`
    XmlParse {
        option: XmlOption,
        expr: Box<Expr>,
        preserve_whitespace: bool,
    },
    /// `XMLPI(NAME n [, content])`
    XmlPi {
        name: Ident,
        content: Option<Box<Expr>>,
    },
    /// `XMLROOT(expr, VERSION version [, STANDALONE ...])`; a `None`
    /// version is `VERSION NO VALUE`.
    XmlRoot {
        expr: Box<Expr>,
        version: Option<Box<Expr>>,
        standalone: Option<XmlStandalone>,
    },
    /// `XMLSERIALIZE(DOCUMENT|CONTENT expr AS type)`
    XmlSerialize {
        option: XmlOption,
        expr: Box<Expr>,
        data_type: TypeName,
    },
    /// `XMLEXISTS(path PASSING argument)`
    XmlExists {
        path: Box<Expr>,
        argument: Box<Expr>,
    },

    /// `expr COLLATE collation`
    Collate {
        expr: Box<Expr>,
        collation: ObjectName,
    },
    /// `expr AT TIME ZONE zone`
    AtTimeZone { expr: Box<Expr>, zone: Box<Expr> },
    /// `GROUPING(...)`
    Grouping(Vec<Expr>),
    /// `DEFAULT` in a `VALUES` row or `SET` clause.
    Default,
    /// `expr[index]`
    Subscript { expr: Box<Expr>, index: Box<Expr> },
    /// `expr[lower:upper]`
    Slice {
        expr: Box<Expr>,
        lower: Option<Box<Expr>>,
        upper: Option<Box<Expr>>,
    },
    /// `(expr).field`
    Field { expr: Box<Expr>, field: Ident },
    /// `(expr).*`
    FieldWildcard(Box<Expr>),
}

impl ExprKind {
    /// Returns the display precedence of the expression. Atoms rank highest.
    #[must_use]
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Binary { op, .. } | Self::Quantified { op, .. } => op.precedence(),
            Self::Unary { op, .. } => op.precedence(),
            Self::IsNull { .. }
            | Self::IsTruth { .. }
            | Self::IsDistinctFrom { .. }
            | Self::IsDocument { .. }
            | Self::IsNormalized { .. } => precedence::IS,
            Self::Between { .. }
            | Self::Like { .. }
            | Self::InList { .. }
            | Self::InSubquery { .. } => precedence::PATTERN,
            Self::AtTimeZone { .. } => precedence::AT_TIME_ZONE,
            Self::Collate { .. } => precedence::COLLATE,
            Self::Literal(Literal::Integer(i)) if *i < 0 => precedence::UNARY,
            Self::Literal(Literal::Numeric(n)) if n.starts_with('-') => precedence::UNARY,
            _ => precedence::ATOM,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_op_precedence() {
        assert!(BinaryOp::Multiply.precedence() > BinaryOp::Plus.precedence());
        assert!(BinaryOp::Plus.precedence() > BinaryOp::Arrow.precedence());
        assert!(BinaryOp::Arrow.precedence() > BinaryOp::Eq.precedence());
        assert!(BinaryOp::Eq.precedence() > BinaryOp::And.precedence());
        assert!(BinaryOp::And.precedence() > BinaryOp::Or.precedence());
        assert_eq!(
            BinaryOp::Custom(String::from("~")).precedence(),
            BinaryOp::Concat.precedence()
        );
    }

    #[test]
    fn test_binary_op_as_str() {
        assert_eq!(BinaryOp::LongArrow.as_str(), Some("->>"));
        assert_eq!(BinaryOp::Custom(String::from("&&")).as_str(), Some("&&"));
        let qualified = BinaryOp::Qualified(QualifiedOperator {
            schema: vec![Ident::new("pg_catalog")],
            op: String::from("+"),
        });
        assert_eq!(qualified.as_str(), None);
    }

    #[test]
    fn test_negative_literal_precedence() {
        assert_eq!(ExprKind::Literal(Literal::Integer(-1)).precedence(), precedence::UNARY);
        assert_eq!(ExprKind::Literal(Literal::Integer(1)).precedence(), precedence::ATOM);
    }

    #[test]
    fn test_frame_bound_rank() {
        assert!(FrameBound::CurrentRow.rank() < FrameBound::UnboundedFollowing.rank());
    }
}
