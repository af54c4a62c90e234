//! SQL pretty-printing via `fmt::Display` for AST nodes.
//!
//! Every AST type implements `Display` and prints SQL that parses back to an
//! equal tree. Identifiers are quoted only when needed, and parentheses are
//! inserted from operator precedence rather than from the original text.

use std::fmt;

use super::precedence::{self, ATOM};
use super::types::write_interval_qualifier;
#[allow(clippy::wildcard_imports)]
use super::*;
use crate::lexer::Keyword;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Writes a comma-separated list.
pub(super) fn comma_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Returns true if `name` lexes as a single unquoted identifier with the
/// same value.
fn is_plain_word(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_lowercase() || first == '_' || !first.is_ascii()) {
        return false;
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '$' || !c.is_ascii())
}

/// Writes `name`, quoting it unless it is a plain word whose keyword (if
/// any) is accepted by `keyword_ok`.
fn write_name(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    keyword_ok: fn(Keyword) -> bool,
) -> fmt::Result {
    let bare = is_plain_word(name) && Keyword::from_str(name).is_none_or(keyword_ok);
    if bare {
        f.write_str(name)
    } else {
        write!(f, "\"{}\"", name.replace('"', "\"\""))
    }
}

/// Identifiers in expression position: only unreserved keywords stay bare.
fn write_ident(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    write_name(f, name, Keyword::is_bare_label)
}

fn write_col_label(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    write_name(f, name, |_| true)
}

/// Writes a type or function name.
pub(super) fn write_type_function_name(f: &mut fmt::Formatter<'_>, name: &ObjectName) -> fmt::Result {
    match name.parts.as_slice() {
        [only] => write_name(f, &only.value, Keyword::is_type_function_name),
        _ => write!(f, "{name}"),
    }
}

/// Writes a dotted path where every part is a `ColId`.
fn write_col_id_path(f: &mut fmt::Formatter<'_>, name: &ObjectName) -> fmt::Result {
    for (i, part) in name.parts.iter().enumerate() {
        if i > 0 {
            f.write_str(".")?;
        }
        write_name(f, &part.value, Keyword::is_col_id)?;
    }
    Ok(())
}

/// Writes a string constant.
fn write_string(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    write!(f, "'{}'", value.replace('\'', "''"))
}

/// An identifier printed where any keyword is accepted (`AS label`, `t.label`).
struct Label<'a>(&'a Ident);

impl fmt::Display for Label<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_col_label(f, &self.0.value)
    }
}

/// Writes `expr`, in parentheses if it binds looser than `min`.
fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, min: u8) -> fmt::Result {
    if expr.kind.precedence() < min {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

fn write_not(f: &mut fmt::Formatter<'_>, negated: bool) -> fmt::Result {
    if negated {
        f.write_str(" NOT")
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_ident(f, &self.value)
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i == 0 {
                write_ident(f, &part.value)?;
            } else {
                f.write_str(".")?;
                write_col_label(f, &part.value)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for TableAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.columns.is_empty() {
            f.write_str(" (")?;
            comma_list(f, &self.columns)?;
            f.write_str(")")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Numeric(text) => f.write_str(text),
            Self::String(s) => write_string(f, s),
            Self::BitString(bits) => write!(f, "B'{bits}'"),
            Self::HexString(hex) => write!(f, "X'{hex}'"),
            Self::Boolean(true) => f.write_str("TRUE"),
            Self::Boolean(false) => f.write_str("FALSE"),
            Self::Null => f.write_str("NULL"),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numbered(n) => write!(f, "${n}"),
            Self::Marker(_) => f.write_str("?"),
        }
    }
}

impl fmt::Display for QualifiedOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OPERATOR(")?;
        for part in &self.schema {
            write!(f, "{part}.")?;
        }
        write!(f, "{})", self.op)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Qualified(op) => write!(f, "{op}"),
            other => f.write_str(other.as_str().unwrap_or_default()),
        }
    }
}

impl fmt::Display for TruthValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Unknown => "UNKNOWN",
        })
    }
}

impl fmt::Display for NormalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Nfc => "NFC",
            Self::Nfd => "NFD",
            Self::Nfkc => "NFKC",
            Self::Nfkd => "NFKD",
        })
    }
}

impl fmt::Display for XmlOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Document => "DOCUMENT",
            Self::Content => "CONTENT",
        })
    }
}

impl fmt::Display for XmlStandalone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Yes => "YES",
            Self::No => "NO",
            Self::NoValue => "NO VALUE",
        })
    }
}

impl fmt::Display for XmlAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        if let Some(name) = &self.name {
            write!(f, " AS {}", Label(name))?;
        }
        Ok(())
    }
}

impl fmt::Display for FunctionArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{name} => ")?;
        }
        write!(f, "{}", self.value)
    }
}

/// Functions with their own grammar rule that print as a bare keyword.
const KEYWORD_FUNCTIONS: &[&str] = &[
    "coalesce",
    "greatest",
    "least",
    "nullif",
    "overlay",
    "substring",
    "xmlconcat",
];

impl FunctionCall {
    fn is_plain(&self) -> bool {
        !self.star
            && !self.distinct
            && !self.variadic
            && self.order_by.is_empty()
            && self.within_group.is_empty()
            && self.filter.is_none()
            && self.over.is_none()
            && self.args.iter().all(|arg| arg.name.is_none())
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name.parts.as_slice() {
            [only] if self.is_plain() && KEYWORD_FUNCTIONS.contains(&only.value.as_str()) => {
                f.write_str(&only.value.to_ascii_uppercase())?;
            }
            _ => write_type_function_name(f, &self.name)?,
        }
        f.write_str("(")?;
        if self.distinct {
            f.write_str("DISTINCT ")?;
        }
        if self.star {
            f.write_str("*")?;
        }
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if self.variadic && i + 1 == self.args.len() {
                f.write_str("VARIADIC ")?;
            }
            write!(f, "{arg}")?;
        }
        if !self.order_by.is_empty() {
            f.write_str(" ORDER BY ")?;
            comma_list(f, &self.order_by)?;
        }
        f.write_str(")")?;
        if !self.within_group.is_empty() {
            f.write_str(" WITHIN GROUP (ORDER BY ")?;
            comma_list(f, &self.within_group)?;
            f.write_str(")")?;
        }
        if let Some(filter) = &self.filter {
            write!(f, " FILTER (WHERE {filter})")?;
        }
        match &self.over {
            Some(WindowRef::Named(name)) => write!(f, " OVER {name}")?,
            Some(WindowRef::Spec(spec)) => write!(f, " OVER ({spec})")?,
            None => {}
        }
        Ok(())
    }
}

impl fmt::Display for OrderByExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)?;
        match &self.direction {
            Some(OrderDirection::Asc) => f.write_str(" ASC")?,
            Some(OrderDirection::Desc) => f.write_str(" DESC")?,
            Some(OrderDirection::Using(op)) => write!(f, " USING {op}")?,
            None => {}
        }
        match self.nulls {
            Some(NullOrdering::First) => f.write_str(" NULLS FIRST"),
            Some(NullOrdering::Last) => f.write_str(" NULLS LAST"),
            None => Ok(()),
        }
    }
}

impl fmt::Display for WindowSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        if let Some(existing) = &self.existing {
            write!(f, "{existing}")?;
            sep = " ";
        }
        if !self.partition_by.is_empty() {
            write!(f, "{sep}PARTITION BY ")?;
            comma_list(f, &self.partition_by)?;
            sep = " ";
        }
        if !self.order_by.is_empty() {
            write!(f, "{sep}ORDER BY ")?;
            comma_list(f, &self.order_by)?;
            sep = " ";
        }
        if let Some(frame) = &self.frame {
            write!(f, "{sep}{frame}")?;
        }
        Ok(())
    }
}

impl fmt::Display for FrameBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundedPreceding => f.write_str("UNBOUNDED PRECEDING"),
            Self::Preceding(offset) => {
                write_operand(f, offset, ATOM)?;
                f.write_str(" PRECEDING")
            }
            Self::CurrentRow => f.write_str("CURRENT ROW"),
            Self::Following(offset) => {
                write_operand(f, offset, ATOM)?;
                f.write_str(" FOLLOWING")
            }
            Self::UnboundedFollowing => f.write_str("UNBOUNDED FOLLOWING"),
        }
    }
}

impl fmt::Display for WindowFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.units {
            FrameUnits::Rows => "ROWS ",
            FrameUnits::Range => "RANGE ",
            FrameUnits::Groups => "GROUPS ",
        })?;
        match &self.end {
            Some(end) => write!(f, "BETWEEN {} AND {end}", self.start)?,
            None => write!(f, "{}", self.start)?,
        }
        match self.exclusion {
            Some(FrameExclusion::CurrentRow) => f.write_str(" EXCLUDE CURRENT ROW"),
            Some(FrameExclusion::Group) => f.write_str(" EXCLUDE GROUP"),
            Some(FrameExclusion::Ties) => f.write_str(" EXCLUDE TIES"),
            Some(FrameExclusion::NoOthers) => f.write_str(" EXCLUDE NO OTHERS"),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

/// Writes the operand of a prefix operator written as a word or symbol run.
fn write_prefix_operand(f: &mut fmt::Formatter<'_>, expr: &Expr) -> fmt::Result {
    write_operand(f, expr, ATOM)
}

impl fmt::Display for ExprKind {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(lit) => write!(f, "{lit}"),
            Self::TypedString { data_type, value } => {
                data_type.kind.fmt_base(f)?;
                f.write_str(" ")?;
                write_string(f, value)?;
                if let TypeKind::Interval {
                    fields: Some(fields),
                    precision,
                } = &data_type.kind
                {
                    f.write_str(" ")?;
                    write_interval_qualifier(f, *fields, *precision)?;
                }
                Ok(())
            }
            Self::Column(name) => write!(f, "{name}"),
            Self::Wildcard(None) => f.write_str("*"),
            Self::Wildcard(Some(qualifier)) => write!(f, "{qualifier}.*"),
            Self::Parameter(p) => write!(f, "{p}"),

            Self::Unary { op, expr } => match op {
                UnaryOp::Minus => {
                    f.write_str("-")?;
                    write_prefix_operand(f, expr)
                }
                UnaryOp::Plus => {
                    f.write_str("+")?;
                    write_prefix_operand(f, expr)
                }
                UnaryOp::Not => {
                    f.write_str("NOT ")?;
                    write_operand(f, expr, UnaryOp::Not.precedence())
                }
                UnaryOp::Custom(text) => {
                    write!(f, "{text} ")?;
                    write_prefix_operand(f, expr)
                }
                UnaryOp::Qualified(q) => {
                    write!(f, "{q} ")?;
                    write_prefix_operand(f, expr)
                }
            },
            Self::Binary { left, op, right } => {
                let prec = op.precedence();
                let left_min = if op.is_comparison() { prec + 1 } else { prec };
                write_operand(f, left, left_min)?;
                write!(f, " {op} ")?;
                write_operand(f, right, prec + 1)
            }

            Self::IsNull { expr, negated } => {
                write_operand(f, expr, precedence::IS + 1)?;
                f.write_str(" IS")?;
                write_not(f, *negated)?;
                f.write_str(" NULL")
            }
            Self::IsTruth {
                expr,
                value,
                negated,
            } => {
                write_operand(f, expr, precedence::IS + 1)?;
                f.write_str(" IS")?;
                write_not(f, *negated)?;
                write!(f, " {value}")
            }
            Self::IsDistinctFrom {
                left,
                right,
                negated,
            } => {
                write_operand(f, left, precedence::IS + 1)?;
                f.write_str(" IS")?;
                write_not(f, *negated)?;
                f.write_str(" DISTINCT FROM ")?;
                write_operand(f, right, precedence::IS + 1)
            }
            Self::IsDocument { expr, negated } => {
                write_operand(f, expr, precedence::IS + 1)?;
                f.write_str(" IS")?;
                write_not(f, *negated)?;
                f.write_str(" DOCUMENT")
            }
            Self::IsNormalized {
                expr,
                form,
                negated,
            } => {
                write_operand(f, expr, precedence::IS + 1)?;
                f.write_str(" IS")?;
                write_not(f, *negated)?;
                if let Some(form) = form {
                    write!(f, " {form}")?;
                }
                f.write_str(" NORMALIZED")
            }
            Self::Between {
                expr,
                low,
                high,
                negated,
                symmetric,
            } => {
                write_operand(f, expr, precedence::PATTERN + 1)?;
                write_not(f, *negated)?;
                f.write_str(" BETWEEN ")?;
                if *symmetric {
                    f.write_str("SYMMETRIC ")?;
                }
                write_operand(f, low, precedence::PATTERN + 1)?;
                f.write_str(" AND ")?;
                write_operand(f, high, precedence::PATTERN + 1)
            }
            Self::Like {
                expr,
                kind,
                pattern,
                escape,
                negated,
            } => {
                write_operand(f, expr, precedence::PATTERN + 1)?;
                write_not(f, *negated)?;
                f.write_str(match kind {
                    LikeKind::Like => " LIKE ",
                    LikeKind::ILike => " ILIKE ",
                    LikeKind::SimilarTo => " SIMILAR TO ",
                })?;
                write_operand(f, pattern, precedence::PATTERN + 1)?;
                if let Some(escape) = escape {
                    f.write_str(" ESCAPE ")?;
                    write_operand(f, escape, precedence::PATTERN + 1)?;
                }
                Ok(())
            }
            Self::InList {
                expr,
                list,
                negated,
            } => {
                write_operand(f, expr, precedence::PATTERN + 1)?;
                write_not(f, *negated)?;
                f.write_str(" IN (")?;
                comma_list(f, list)?;
                f.write_str(")")
            }
            Self::InSubquery {
                expr,
                subquery,
                negated,
            } => {
                write_operand(f, expr, precedence::PATTERN + 1)?;
                write_not(f, *negated)?;
                write!(f, " IN ({subquery})")
            }
            Self::Quantified {
                left,
                op,
                quantifier,
                right,
            } => {
                let prec = op.precedence();
                let left_min = if op.is_comparison() { prec + 1 } else { prec };
                write_operand(f, left, left_min)?;
                write!(f, " {op} ")?;
                f.write_str(match quantifier {
                    Quantifier::Any => "ANY",
                    Quantifier::All => "ALL",
                })?;
                match right {
                    QuantifiedRhs::Subquery(query) => write!(f, " ({query})"),
                    QuantifiedRhs::Expr(expr) => write!(f, " ({expr})"),
                }
            }
            Self::Exists(query) => write!(f, "EXISTS ({query})"),
            Self::Subquery(query) => write!(f, "({query})"),
            Self::ArraySubquery(query) => write!(f, "ARRAY({query})"),
            Self::Array(elements) => {
                f.write_str("ARRAY[")?;
                comma_list(f, elements)?;
                f.write_str("]")
            }
            Self::Row { exprs, explicit } => {
                if *explicit || exprs.len() < 2 {
                    f.write_str("ROW")?;
                }
                f.write_str("(")?;
                comma_list(f, exprs)?;
                f.write_str(")")
            }
            Self::Case {
                operand,
                conditions,
                else_result,
            } => {
                f.write_str("CASE")?;
                if let Some(operand) = operand {
                    write!(f, " {operand}")?;
                }
                for arm in conditions {
                    write!(f, " WHEN {} THEN {}", arm.condition, arm.result)?;
                }
                if let Some(else_result) = else_result {
                    write!(f, " ELSE {else_result}")?;
                }
                f.write_str(" END")
            }
            Self::Cast {
                expr,
                data_type,
                syntax: CastSyntax::Cast,
            } => write!(f, "CAST({expr} AS {data_type})"),
            Self::Cast {
                expr,
                data_type,
                syntax: CastSyntax::DoubleColon,
            } => {
                write_operand(f, expr, ATOM)?;
                write!(f, "::{data_type}")
            }
            Self::Function(call) => write!(f, "{call}"),

            Self::Extract { field, expr } => {
                f.write_str("EXTRACT(")?;
                match field {
                    ExtractField::Word(word) => write_col_label(f, word)?,
                    ExtractField::String(s) => write_string(f, s)?,
                }
                write!(f, " FROM {expr})")
            }
            Self::Overlay {
                expr,
                placing,
                from,
                length,
            } => {
                write!(f, "OVERLAY({expr} PLACING {placing} FROM {from}")?;
                if let Some(length) = length {
                    write!(f, " FOR {length}")?;
                }
                f.write_str(")")
            }
            Self::Position { substring, string } => {
                f.write_str("POSITION(")?;
                write_operand(f, substring, precedence::PATTERN + 1)?;
                f.write_str(" IN ")?;
                write_operand(f, string, precedence::PATTERN + 1)?;
                f.write_str(")")
            }
            Self::Substring { expr, from, length } => {
                write!(f, "SUBSTRING({expr}")?;
                if let Some(from) = from {
                    write!(f, " FROM {from}")?;
                }
                if let Some(length) = length {
                    write!(f, " FOR {length}")?;
                }
                f.write_str(")")
            }
            Self::SubstringSimilar {
                expr,
                pattern,
                escape,
            } => write!(f, "SUBSTRING({expr} SIMILAR {pattern} ESCAPE {escape})"),
            Self::Trim {
                side,
                characters,
                exprs,
            } => {
                f.write_str("TRIM(")?;
                match side {
                    Some(TrimSide::Both) => f.write_str("BOTH ")?,
                    Some(TrimSide::Leading) => f.write_str("LEADING ")?,
                    Some(TrimSide::Trailing) => f.write_str("TRAILING ")?,
                    None => {}
                }
                if let Some(characters) = characters {
                    write!(f, "{characters} FROM ")?;
                }
                comma_list(f, exprs)?;
                f.write_str(")")
            }
            Self::Treat { expr, data_type } => write!(f, "TREAT({expr} AS {data_type})"),
            Self::ValueFunction { func, precision } => {
                f.write_str(func.as_str())?;
                if let Some(p) = precision {
                    write!(f, "({p})")?;
                }
                Ok(())
            }
            Self::CollationFor(expr) => write!(f, "COLLATION FOR ({expr})"),
            Self::Normalize { expr, form } => {
                write!(f, "NORMALIZE({expr}")?;
                if let Some(form) = form {
                    write!(f, ", {form}")?;
                }
                f.write_str(")")
            }

            Self::XmlElement {
                name,
                attributes,
                content,
            } => {
                write!(f, "XMLELEMENT(NAME {}", Label(name))?;
                if !attributes.is_empty() {
                    f.write_str(", XMLATTRIBUTES(")?;
                    comma_list(f, attributes)?;
                    f.write_str(")")?;
                }
                for item in content {
                    write!(f, ", {item}")?;
                }
                f.write_str(")")
            }
            Self::XmlForest(items) => {
                f.write_str("XMLFOREST(")?;
                comma_list(f, items)?;
                f.write_str(")")
            }
            Self::XmlParse {
                option,
                expr,
                preserve_whitespace,
            } => {
                write!(f, "XMLPARSE({option} {expr}")?;
                if *preserve_whitespace {
                    f.write_str(" PRESERVE WHITESPACE")?;
                }
                f.write_str(")")
            }
            Self::XmlPi { name, content } => {
                write!(f, "XMLPI(NAME {}", Label(name))?;
                if let Some(content) = content {
                    write!(f, ", {content}")?;
                }
                f.write_str(")")
            }
            Self::XmlRoot {
                expr,
                version,
                standalone,
            } => {
                write!(f, "XMLROOT({expr}, VERSION ")?;
                match version {
                    Some(version) => write!(f, "{version}")?,
                    None => f.write_str("NO VALUE")?,
                }
                if let Some(standalone) = standalone {
                    write!(f, ", STANDALONE {standalone}")?;
                }
                f.write_str(")")
            }
            Self::XmlSerialize {
                option,
                expr,
                data_type,
            } => write!(f, "XMLSERIALIZE({option} {expr} AS {data_type})"),
            Self::XmlExists { path, argument } => {
                f.write_str("XMLEXISTS(")?;
                write_operand(f, path, ATOM)?;
                f.write_str(" PASSING ")?;
                write_operand(f, argument, ATOM)?;
                f.write_str(")")
            }

            Self::Collate { expr, collation } => {
                write_operand(f, expr, precedence::COLLATE)?;
                write!(f, " COLLATE {collation}")
            }
            Self::AtTimeZone { expr, zone } => {
                write_operand(f, expr, precedence::AT_TIME_ZONE)?;
                f.write_str(" AT TIME ZONE ")?;
                write_operand(f, zone, precedence::AT_TIME_ZONE + 1)
            }
            Self::Grouping(exprs) => {
                f.write_str("GROUPING(")?;
                comma_list(f, exprs)?;
                f.write_str(")")
            }
            Self::Default => f.write_str("DEFAULT"),
            Self::Subscript { expr, index } => {
                write_subscripted(f, expr)?;
                write!(f, "[{index}]")
            }
            Self::Slice { expr, lower, upper } => {
                write_subscripted(f, expr)?;
                f.write_str("[")?;
                if let Some(lower) = lower {
                    write!(f, "{lower}")?;
                }
                f.write_str(":")?;
                if let Some(upper) = upper {
                    write!(f, "{upper}")?;
                }
                f.write_str("]")
            }
            Self::Field { expr, field } => write!(f, "({expr}).{}", Label(field)),
            Self::FieldWildcard(expr) => write!(f, "({expr}).*"),
        }
    }
}

/// `x::int[1]` would read as an array type, so casts are parenthesised.
fn write_subscripted(f: &mut fmt::Formatter<'_>, expr: &Expr) -> fmt::Result {
    match expr.kind {
        ExprKind::Cast {
            syntax: CastSyntax::DoubleColon,
            ..
        } => write!(f, "({expr})"),
        _ => write_operand(f, expr, ATOM),
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(with) = &self.with {
            write!(f, "{with} ")?;
        }
        write!(f, "{}", self.body)?;
        if !self.order_by.is_empty() {
            f.write_str(" ORDER BY ")?;
            comma_list(f, &self.order_by)?;
        }
        match &self.limit {
            Some(LimitClause::Limit(count)) => write!(f, " LIMIT {count}")?,
            Some(LimitClause::All) => f.write_str(" LIMIT ALL")?,
            Some(LimitClause::FetchFirst { count, with_ties }) => {
                f.write_str(" FETCH FIRST ")?;
                if let Some(count) = count {
                    write_operand(f, count, ATOM)?;
                    f.write_str(" ")?;
                }
                f.write_str(if *with_ties {
                    "ROWS WITH TIES"
                } else {
                    "ROWS ONLY"
                })?;
            }
            None => {}
        }
        if let Some(offset) = &self.offset {
            write!(f, " OFFSET {offset}")?;
        }
        for lock in &self.locking {
            write!(f, " {lock}")?;
        }
        Ok(())
    }
}

impl fmt::Display for With {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WITH ")?;
        if self.recursive {
            f.write_str("RECURSIVE ")?;
        }
        comma_list(f, &self.ctes)
    }
}

impl fmt::Display for Cte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.columns.is_empty() {
            f.write_str(" (")?;
            comma_list(f, &self.columns)?;
            f.write_str(")")?;
        }
        f.write_str(" AS ")?;
        match self.materialized {
            Some(true) => f.write_str("MATERIALIZED ")?,
            Some(false) => f.write_str("NOT MATERIALIZED ")?,
            None => {}
        }
        write!(f, "({})", self.statement)
    }
}

impl SetExpr {
    /// Set-operation precedence; plain bodies bind tightest.
    const fn precedence(&self) -> u8 {
        match self {
            Self::SetOperation { op, .. } => op.precedence(),
            _ => 3,
        }
    }
}

impl fmt::Display for SetExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(select) => write!(f, "{select}"),
            Self::Values(values) => write!(f, "{values}"),
            Self::Table(relation) => write!(f, "TABLE {relation}"),
            Self::SetOperation {
                op,
                quantifier,
                left,
                right,
            } => {
                let prec = op.precedence();
                if left.precedence() < prec {
                    write!(f, "({left})")?;
                } else {
                    write!(f, "{left}")?;
                }
                write!(f, " {}", op.as_str())?;
                match quantifier {
                    SetQuantifier::All => f.write_str(" ALL")?,
                    SetQuantifier::Distinct => f.write_str(" DISTINCT")?,
                    SetQuantifier::None => {}
                }
                if right.precedence() <= prec {
                    write!(f, " ({right})")
                } else {
                    write!(f, " {right}")
                }
            }
            Self::Query(query) => write!(f, "({query})"),
        }
    }
}

impl fmt::Display for Values {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VALUES ")?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str("(")?;
            comma_list(f, row)?;
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT ")?;
        match &self.distinct {
            Some(Distinct::Distinct) => f.write_str("DISTINCT ")?,
            Some(Distinct::On(exprs)) => {
                f.write_str("DISTINCT ON (")?;
                comma_list(f, exprs)?;
                f.write_str(") ")?;
            }
            None => {}
        }
        comma_list(f, &self.targets)?;
        if let Some(into) = &self.into {
            write!(f, " {into}")?;
        }
        if !self.from.is_empty() {
            f.write_str(" FROM ")?;
            comma_list(f, &self.from)?;
        }
        if let Some(selection) = &self.selection {
            write!(f, " WHERE {selection}")?;
        }
        if !self.group_by.is_empty() {
            f.write_str(" GROUP BY ")?;
            comma_list(f, &self.group_by)?;
        }
        if let Some(having) = &self.having {
            write!(f, " HAVING {having}")?;
        }
        if !self.windows.is_empty() {
            f.write_str(" WINDOW ")?;
            comma_list(f, &self.windows)?;
        }
        Ok(())
    }
}

impl fmt::Display for SelectItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {}", Label(alias))?;
        }
        Ok(())
    }
}

impl fmt::Display for Persistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Temporary => "TEMPORARY",
            Self::Unlogged => "UNLOGGED",
        })
    }
}

impl fmt::Display for IntoClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("INTO ")?;
        if let Some(persistence) = self.persistence {
            write!(f, "{persistence} ")?;
        }
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for GroupingElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expr(expr) => write!(f, "{expr}"),
            Self::Empty => f.write_str("()"),
            Self::Rollup(exprs) => {
                f.write_str("ROLLUP (")?;
                comma_list(f, exprs)?;
                f.write_str(")")
            }
            Self::Cube(exprs) => {
                f.write_str("CUBE (")?;
                comma_list(f, exprs)?;
                f.write_str(")")
            }
            Self::Sets(elements) => {
                f.write_str("GROUPING SETS (")?;
                comma_list(f, elements)?;
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for NamedWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} AS ({})", self.name, self.spec)
    }
}

impl fmt::Display for LockingClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FOR {}", self.strength.as_str())?;
        if !self.of.is_empty() {
            f.write_str(" OF ")?;
            comma_list(f, &self.of)?;
        }
        match self.wait {
            Some(LockWait::Nowait) => f.write_str(" NOWAIT"),
            Some(LockWait::SkipLocked) => f.write_str(" SKIP LOCKED"),
            None => Ok(()),
        }
    }
}

impl fmt::Display for RelationExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.only {
            f.write_str("ONLY ")?;
        }
        write!(f, "{}", self.name)?;
        if self.inherit_star {
            f.write_str(" *")?;
        }
        Ok(())
    }
}

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)
    }
}

fn write_column_defs(
    f: &mut fmt::Formatter<'_>,
    alias: Option<&TableAlias>,
    column_defs: &[ColumnDef],
) -> fmt::Result {
    if column_defs.is_empty() {
        if let Some(alias) = alias {
            write!(f, " AS {alias}")?;
        }
        return Ok(());
    }
    f.write_str(" AS ")?;
    if let Some(alias) = alias {
        write!(f, "{} ", alias.name)?;
    }
    f.write_str("(")?;
    comma_list(f, column_defs)?;
    f.write_str(")")
}

impl fmt::Display for XmlTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("XMLTABLE(")?;
        if !self.namespaces.is_empty() {
            f.write_str("XMLNAMESPACES(")?;
            comma_list(f, &self.namespaces)?;
            f.write_str("), ")?;
        }
        write_operand(f, &self.row_expr, ATOM)?;
        f.write_str(" PASSING ")?;
        write_operand(f, &self.document, ATOM)?;
        f.write_str(" COLUMNS ")?;
        comma_list(f, &self.columns)?;
        f.write_str(")")
    }
}

impl fmt::Display for XmlNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => {
                write_operand(f, &self.uri, ATOM)?;
                write!(f, " AS {}", Label(name))
            }
            None => {
                f.write_str("DEFAULT ")?;
                write_operand(f, &self.uri, ATOM)
            }
        }
    }
}

impl fmt::Display for XmlTableColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        match &self.kind {
            XmlTableColumnKind::Ordinality => f.write_str(" FOR ORDINALITY"),
            XmlTableColumnKind::Typed {
                data_type,
                path,
                default,
                not_null,
            } => {
                write!(f, " {data_type}")?;
                if let Some(path) = path {
                    f.write_str(" PATH ")?;
                    write_operand(f, path, ATOM)?;
                }
                if let Some(default) = default {
                    f.write_str(" DEFAULT ")?;
                    write_operand(f, default, ATOM)?;
                }
                match not_null {
                    Some(true) => f.write_str(" NOT NULL"),
                    Some(false) => f.write_str(" NULL"),
                    None => Ok(()),
                }
            }
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl fmt::Display for TableRefKind {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relation {
                relation,
                alias,
                sample,
            } => {
                write!(f, "{relation}")?;
                if let Some(alias) = alias {
                    write!(f, " AS {alias}")?;
                }
                if let Some(sample) = sample {
                    f.write_str(" TABLESAMPLE ")?;
                    write_type_function_name(f, &sample.method)?;
                    f.write_str(" (")?;
                    comma_list(f, &sample.args)?;
                    f.write_str(")")?;
                    if let Some(seed) = &sample.repeatable {
                        write!(f, " REPEATABLE ({seed})")?;
                    }
                }
                Ok(())
            }
            Self::Function {
                lateral,
                function,
                ordinality,
                alias,
                column_defs,
            } => {
                if *lateral {
                    f.write_str("LATERAL ")?;
                }
                write!(f, "{function}")?;
                if *ordinality {
                    f.write_str(" WITH ORDINALITY")?;
                }
                write_column_defs(f, alias.as_ref(), column_defs)
            }
            Self::RowsFrom {
                lateral,
                functions,
                ordinality,
                alias,
            } => {
                if *lateral {
                    f.write_str("LATERAL ")?;
                }
                f.write_str("ROWS FROM (")?;
                for (i, item) in functions.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item.function)?;
                    write_column_defs(f, None, &item.column_defs)?;
                }
                f.write_str(")")?;
                if *ordinality {
                    f.write_str(" WITH ORDINALITY")?;
                }
                if let Some(alias) = alias {
                    write!(f, " AS {alias}")?;
                }
                Ok(())
            }
            Self::XmlTable {
                lateral,
                table,
                alias,
            } => {
                if *lateral {
                    f.write_str("LATERAL ")?;
                }
                write!(f, "{table}")?;
                if let Some(alias) = alias {
                    write!(f, " AS {alias}")?;
                }
                Ok(())
            }
            Self::Subquery {
                lateral,
                query,
                alias,
            } => {
                if *lateral {
                    f.write_str("LATERAL ")?;
                }
                write!(f, "({query})")?;
                if let Some(alias) = alias {
                    write!(f, " AS {alias}")?;
                }
                Ok(())
            }
            Self::Join(join) => write!(f, "{join}"),
            Self::Nested { table, alias } => {
                write!(f, "({table})")?;
                if let Some(alias) = alias {
                    write!(f, " AS {alias}")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.left)?;
        if self.natural {
            f.write_str("NATURAL ")?;
        }
        f.write_str(self.kind.as_str())?;
        if matches!(self.right.kind, TableRefKind::Join(_)) {
            write!(f, " ({})", self.right)?;
        } else {
            write!(f, " {}", self.right)?;
        }
        match &self.constraint {
            Some(JoinConstraint::On(condition)) => write!(f, " ON {condition}"),
            Some(JoinConstraint::Using(columns)) => {
                f.write_str(" USING (")?;
                comma_list(f, columns)?;
                f.write_str(")")
            }
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// DML
// ---------------------------------------------------------------------------

fn write_returning(f: &mut fmt::Formatter<'_>, returning: &[SelectItem]) -> fmt::Result {
    if returning.is_empty() {
        return Ok(());
    }
    f.write_str(" RETURNING ")?;
    comma_list(f, returning)
}

fn write_with(f: &mut fmt::Formatter<'_>, with: Option<&With>) -> fmt::Result {
    match with {
        Some(with) => write!(f, "{with} "),
        None => Ok(()),
    }
}

impl fmt::Display for InsertStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_with(f, self.with.as_ref())?;
        write!(f, "INSERT INTO {}", self.table)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {alias}")?;
        }
        if !self.columns.is_empty() {
            f.write_str(" (")?;
            comma_list(f, &self.columns)?;
            f.write_str(")")?;
        }
        match self.overriding {
            Some(Overriding::System) => f.write_str(" OVERRIDING SYSTEM VALUE")?,
            Some(Overriding::User) => f.write_str(" OVERRIDING USER VALUE")?,
            None => {}
        }
        match &self.source {
            InsertSource::Query(query) => write!(f, " {query}")?,
            InsertSource::DefaultValues => f.write_str(" DEFAULT VALUES")?,
        }
        if let Some(on_conflict) = &self.on_conflict {
            write!(f, " {on_conflict}")?;
        }
        write_returning(f, &self.returning)
    }
}

impl fmt::Display for OnConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ON CONFLICT")?;
        match &self.target {
            Some(ConflictTarget::Columns { columns, selection }) => {
                f.write_str(" (")?;
                comma_list(f, columns)?;
                f.write_str(")")?;
                if let Some(selection) = selection {
                    write!(f, " WHERE {selection}")?;
                }
            }
            Some(ConflictTarget::Constraint(name)) => write!(f, " ON CONSTRAINT {name}")?,
            None => {}
        }
        match &self.action {
            ConflictAction::DoNothing => f.write_str(" DO NOTHING"),
            ConflictAction::DoUpdate {
                assignments,
                selection,
            } => {
                f.write_str(" DO UPDATE SET ")?;
                comma_list(f, assignments)?;
                if let Some(selection) = selection {
                    write!(f, " WHERE {selection}")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for IndexElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expr.kind {
            ExprKind::Column(name) if name.parts.len() == 1 => write!(f, "{}", self.expr)?,
            ExprKind::Function(_) => write!(f, "{}", self.expr)?,
            _ => write!(f, "({})", self.expr)?,
        }
        if let Some(collation) = &self.collation {
            write!(f, " COLLATE {collation}")?;
        }
        if let Some(opclass) = &self.opclass {
            write!(f, " {opclass}")?;
        }
        match self.direction {
            Some(OrderDirection::Asc) => f.write_str(" ASC")?,
            Some(OrderDirection::Desc) => f.write_str(" DESC")?,
            Some(OrderDirection::Using(_)) | None => {}
        }
        match self.nulls {
            Some(NullOrdering::First) => f.write_str(" NULLS FIRST"),
            Some(NullOrdering::Last) => f.write_str(" NULLS LAST"),
            None => Ok(()),
        }
    }
}

impl fmt::Display for TargetColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for step in &self.indirection {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Indirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(field) => write!(f, ".{}", Label(field)),
            Self::Subscript(index) => write!(f, "[{index}]"),
            Self::Slice { lower, upper } => {
                f.write_str("[")?;
                if let Some(lower) = lower {
                    write!(f, "{lower}")?;
                }
                f.write_str(":")?;
                if let Some(upper) = upper {
                    write!(f, "{upper}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.multi {
            f.write_str("(")?;
            comma_list(f, &self.columns)?;
            f.write_str(")")?;
        } else {
            comma_list(f, &self.columns)?;
        }
        write!(f, " = {}", self.value)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Condition(expr) => write!(f, "WHERE {expr}"),
            Self::CurrentOf(cursor) => write!(f, "WHERE CURRENT OF {cursor}"),
        }
    }
}

impl fmt::Display for UpdateStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_with(f, self.with.as_ref())?;
        write!(f, "UPDATE {}", self.table)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {alias}")?;
        }
        f.write_str(" SET ")?;
        comma_list(f, &self.assignments)?;
        if !self.from.is_empty() {
            f.write_str(" FROM ")?;
            comma_list(f, &self.from)?;
        }
        if let Some(selection) = &self.selection {
            write!(f, " {selection}")?;
        }
        write_returning(f, &self.returning)
    }
}

impl fmt::Display for DeleteStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_with(f, self.with.as_ref())?;
        write!(f, "DELETE FROM {}", self.table)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {alias}")?;
        }
        if !self.using.is_empty() {
            f.write_str(" USING ")?;
            comma_list(f, &self.using)?;
        }
        if let Some(selection) = &self.selection {
            write!(f, " {selection}")?;
        }
        write_returning(f, &self.returning)
    }
}

// ---------------------------------------------------------------------------
// COPY and utility statements
// ---------------------------------------------------------------------------

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write_string(f, s),
            Self::Word(word) if matches!(word.as_str(), "on" | "true" | "false") => {
                f.write_str(word)
            }
            Self::Word(word) => write_name(f, word, Keyword::is_non_reserved_word),
            Self::Number(n) => f.write_str(n),
            Self::Star => f.write_str("*"),
            Self::List(values) => {
                f.write_str("(")?;
                comma_list(f, values)?;
                f.write_str(")")
            }
        }
    }
}

fn write_column_list(f: &mut fmt::Formatter<'_>, columns: &[Ident]) -> fmt::Result {
    if columns.is_empty() {
        f.write_str("*")
    } else {
        comma_list(f, columns)
    }
}

impl fmt::Display for CopyLegacyOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => f.write_str("BINARY"),
            Self::Freeze => f.write_str("FREEZE"),
            Self::Delimiter(s) => {
                f.write_str("DELIMITER ")?;
                write_string(f, s)
            }
            Self::Null(s) => {
                f.write_str("NULL ")?;
                write_string(f, s)
            }
            Self::Csv => f.write_str("CSV"),
            Self::Header => f.write_str("HEADER"),
            Self::Quote(s) => {
                f.write_str("QUOTE ")?;
                write_string(f, s)
            }
            Self::Escape(s) => {
                f.write_str("ESCAPE ")?;
                write_string(f, s)
            }
            Self::ForceQuote(columns) => {
                f.write_str("FORCE QUOTE ")?;
                write_column_list(f, columns)
            }
            Self::ForceNotNull(columns) => {
                f.write_str("FORCE NOT NULL ")?;
                comma_list(f, columns)
            }
            Self::ForceNull(columns) => {
                f.write_str("FORCE NULL ")?;
                comma_list(f, columns)
            }
            Self::Encoding(s) => {
                f.write_str("ENCODING ")?;
                write_string(f, s)
            }
        }
    }
}

impl fmt::Display for CopyOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Label(&self.name))?;
        if let Some(arg) = &self.arg {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

impl fmt::Display for CopyStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("COPY ")?;
        if self.binary {
            f.write_str("BINARY ")?;
        }
        match &self.source {
            CopySource::Table { name, columns } => {
                write!(f, "{name}")?;
                if !columns.is_empty() {
                    f.write_str(" (")?;
                    comma_list(f, columns)?;
                    f.write_str(")")?;
                }
            }
            CopySource::Query(statement) => write!(f, "({statement})")?,
        }
        f.write_str(match self.direction {
            CopyDirection::From => " FROM ",
            CopyDirection::To => " TO ",
        })?;
        match &self.target {
            CopyTarget::Stdin => f.write_str("STDIN")?,
            CopyTarget::Stdout => f.write_str("STDOUT")?,
            CopyTarget::File(path) => write_string(f, path)?,
            CopyTarget::Program(command) => {
                f.write_str("PROGRAM ")?;
                write_string(f, command)?;
            }
        }
        match &self.options {
            CopyOptions::Legacy(options) if !options.is_empty() => {
                f.write_str(" WITH")?;
                for option in options {
                    write!(f, " {option}")?;
                }
            }
            CopyOptions::Generic(options) if !options.is_empty() => {
                f.write_str(" WITH (")?;
                comma_list(f, options)?;
                f.write_str(")")?;
            }
            _ => {}
        }
        if let Some(selection) = &self.selection {
            write!(f, " WHERE {selection}")?;
        }
        Ok(())
    }
}

impl fmt::Display for LockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LOCK TABLE ")?;
        comma_list(f, &self.tables)?;
        if let Some(mode) = self.mode {
            write!(f, " IN {} MODE", mode.as_str())?;
        }
        if self.nowait {
            f.write_str(" NOWAIT")?;
        }
        Ok(())
    }
}

impl fmt::Display for DoStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DO ")?;
        if let Some(language) = &self.language {
            f.write_str("LANGUAGE ")?;
            write_string(f, language)?;
            f.write_str(" ")?;
        }
        write_string(f, &self.code)
    }
}

impl fmt::Display for FetchDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Next => f.write_str("NEXT"),
            Self::Prior => f.write_str("PRIOR"),
            Self::First => f.write_str("FIRST"),
            Self::Last => f.write_str("LAST"),
            Self::Absolute(n) => write!(f, "ABSOLUTE {n}"),
            Self::Relative(n) => write!(f, "RELATIVE {n}"),
            Self::Count(n) => write!(f, "{n}"),
            Self::All => f.write_str("ALL"),
            Self::Forward(None) => f.write_str("FORWARD"),
            Self::Forward(Some(n)) => write!(f, "FORWARD {n}"),
            Self::ForwardAll => f.write_str("FORWARD ALL"),
            Self::Backward(None) => f.write_str("BACKWARD"),
            Self::Backward(Some(n)) => write!(f, "BACKWARD {n}"),
            Self::BackwardAll => f.write_str("BACKWARD ALL"),
        }
    }
}

impl fmt::Display for FetchStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_move { "MOVE " } else { "FETCH " })?;
        write!(f, "{} FROM {}", self.direction, self.cursor)
    }
}

impl fmt::Display for DeclareCursorStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DECLARE {}", self.name)?;
        if self.binary {
            f.write_str(" BINARY")?;
        }
        if self.insensitive {
            f.write_str(" INSENSITIVE")?;
        }
        match self.scroll {
            Some(true) => f.write_str(" SCROLL")?,
            Some(false) => f.write_str(" NO SCROLL")?,
            None => {}
        }
        f.write_str(" CURSOR")?;
        if self.hold {
            f.write_str(" WITH HOLD")?;
        }
        write!(f, " FOR {}", self.query)
    }
}

impl fmt::Display for SequenceOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::As(data_type) => write!(f, "AS {data_type}"),
            Self::Cache(n) => write!(f, "CACHE {n}"),
            Self::Cycle(true) => f.write_str("CYCLE"),
            Self::Cycle(false) => f.write_str("NO CYCLE"),
            Self::IncrementBy(n) => write!(f, "INCREMENT BY {n}"),
            Self::MaxValue(Some(n)) => write!(f, "MAXVALUE {n}"),
            Self::MaxValue(None) => f.write_str("NO MAXVALUE"),
            Self::MinValue(Some(n)) => write!(f, "MINVALUE {n}"),
            Self::MinValue(None) => f.write_str("NO MINVALUE"),
            Self::OwnedBy(Some(name)) => write!(f, "OWNED BY {name}"),
            Self::OwnedBy(None) => f.write_str("OWNED BY NONE"),
            Self::SequenceName(name) => write!(f, "SEQUENCE NAME {name}"),
            Self::Start(n) => write!(f, "START WITH {n}"),
            Self::Restart(Some(n)) => write!(f, "RESTART WITH {n}"),
            Self::Restart(None) => f.write_str("RESTART"),
        }
    }
}

fn write_sequence_options(f: &mut fmt::Formatter<'_>, options: &[SequenceOption]) -> fmt::Result {
    for option in options {
        write!(f, " {option}")?;
    }
    Ok(())
}

impl fmt::Display for CreateSequenceStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CREATE ")?;
        if let Some(persistence) = self.persistence {
            write!(f, "{persistence} ")?;
        }
        f.write_str("SEQUENCE ")?;
        if self.if_not_exists {
            f.write_str("IF NOT EXISTS ")?;
        }
        write!(f, "{}", self.name)?;
        write_sequence_options(f, &self.options)
    }
}

impl fmt::Display for AlterSequenceStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ALTER SEQUENCE ")?;
        if self.if_exists {
            f.write_str("IF EXISTS ")?;
        }
        write!(f, "{}", self.name)?;
        write_sequence_options(f, &self.options)
    }
}

impl fmt::Display for DropSequenceStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DROP SEQUENCE ")?;
        if self.if_exists {
            f.write_str("IF EXISTS ")?;
        }
        comma_list(f, &self.names)?;
        match self.behavior {
            Some(DropBehavior::Cascade) => f.write_str(" CASCADE"),
            Some(DropBehavior::Restrict) => f.write_str(" RESTRICT"),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Session and transactions
// ---------------------------------------------------------------------------

fn write_scope(f: &mut fmt::Formatter<'_>, scope: Option<SetScope>) -> fmt::Result {
    match scope {
        Some(SetScope::Session) => f.write_str("SESSION "),
        Some(SetScope::Local) => f.write_str("LOCAL "),
        None => Ok(()),
    }
}

impl fmt::Display for SetVariableStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SET ")?;
        write_scope(f, self.scope)?;
        let keyword_target = match &self.target {
            SetTarget::Variable(name) => {
                write_col_id_path(f, name)?;
                false
            }
            SetTarget::TimeZone => {
                f.write_str("TIME ZONE")?;
                true
            }
            SetTarget::Schema => {
                f.write_str("SCHEMA")?;
                true
            }
            SetTarget::Names => {
                f.write_str("NAMES")?;
                true
            }
            SetTarget::Role => {
                f.write_str("ROLE")?;
                true
            }
            SetTarget::SessionAuthorization => {
                f.write_str("SESSION AUTHORIZATION")?;
                true
            }
        };
        match &self.value {
            SetValue::Values(values) if values.is_empty() => Ok(()),
            SetValue::Values(values) => {
                f.write_str(if keyword_target { " " } else { " TO " })?;
                comma_list(f, values)
            }
            SetValue::Default if keyword_target => f.write_str(" DEFAULT"),
            SetValue::Default => f.write_str(" TO DEFAULT"),
            SetValue::FromCurrent => f.write_str(" FROM CURRENT"),
            SetValue::Local => f.write_str(" LOCAL"),
            SetValue::Interval(interval) => write!(f, " {interval}"),
        }
    }
}

impl fmt::Display for TransactionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IsolationLevel(level) => write!(f, "ISOLATION LEVEL {}", level.as_str()),
            Self::ReadOnly => f.write_str("READ ONLY"),
            Self::ReadWrite => f.write_str("READ WRITE"),
            Self::Deferrable => f.write_str("DEFERRABLE"),
            Self::NotDeferrable => f.write_str("NOT DEFERRABLE"),
        }
    }
}

impl fmt::Display for SetTransactionStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.session_characteristics {
            f.write_str("SET SESSION CHARACTERISTICS AS TRANSACTION ")?;
        } else {
            f.write_str("SET ")?;
            write_scope(f, self.scope)?;
            f.write_str("TRANSACTION ")?;
        }
        comma_list(f, &self.modes)
    }
}

impl fmt::Display for VariableTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("ALL"),
            Self::TimeZone => f.write_str("TIME ZONE"),
            Self::TransactionIsolation => f.write_str("TRANSACTION ISOLATION LEVEL"),
            Self::SessionAuthorization => f.write_str("SESSION AUTHORIZATION"),
            Self::Name(name) => write_col_id_path(f, name),
        }
    }
}

impl fmt::Display for TransactionStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (head, modes) = match &self.kind {
            TransactionKind::Begin(modes) => ("BEGIN", modes),
            TransactionKind::Start(modes) => ("START TRANSACTION", modes),
            TransactionKind::Commit { chain } => {
                f.write_str("COMMIT")?;
                return if *chain { f.write_str(" AND CHAIN") } else { Ok(()) };
            }
            TransactionKind::Rollback { chain } => {
                f.write_str("ROLLBACK")?;
                return if *chain { f.write_str(" AND CHAIN") } else { Ok(()) };
            }
            TransactionKind::Savepoint(name) => return write!(f, "SAVEPOINT {name}"),
            TransactionKind::Release(name) => return write!(f, "RELEASE SAVEPOINT {name}"),
            TransactionKind::RollbackTo(name) => {
                return write!(f, "ROLLBACK TO SAVEPOINT {name}");
            }
        };
        f.write_str(head)?;
        if !modes.is_empty() {
            f.write_str(" ")?;
            comma_list(f, modes)?;
        }
        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(query) => write!(f, "{query}"),
            Self::Insert(s) => write!(f, "{s}"),
            Self::Update(s) => write!(f, "{s}"),
            Self::Delete(s) => write!(f, "{s}"),
            Self::Copy(s) => write!(f, "{s}"),
            Self::Lock(s) => write!(f, "{s}"),
            Self::Checkpoint(_) => f.write_str("CHECKPOINT"),
            Self::Do(s) => write!(f, "{s}"),
            Self::Fetch(s) => write!(f, "{s}"),
            Self::DeclareCursor(s) => write!(f, "{s}"),
            Self::ClosePortal(s) => match &s.name {
                Some(name) => write!(f, "CLOSE {name}"),
                None => f.write_str("CLOSE ALL"),
            },
            Self::CreateSequence(s) => write!(f, "{s}"),
            Self::AlterSequence(s) => write!(f, "{s}"),
            Self::DropSequence(s) => write!(f, "{s}"),
            Self::SetVariable(s) => write!(f, "{s}"),
            Self::SetTransaction(s) => write!(f, "{s}"),
            Self::ResetVariable(s) => write!(f, "RESET {}", s.target),
            Self::ShowVariable(s) => write!(f, "SHOW {}", s.target),
            Self::Transaction(s) => write!(f, "{s}"),
        }
    }
}
