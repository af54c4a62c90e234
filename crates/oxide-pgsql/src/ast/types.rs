//! SQL type names.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::display::{comma_list, write_type_function_name};
use super::{Expr, ObjectName, SourceSpan};

/// A type name as written in a cast, column definition or typed literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeName {
    /// `SETOF` prefix.
    pub setof: bool,
    /// The base type.
    pub kind: TypeKind,
    /// Array dimensions; `[]` is `None`, `[3]` is `Some(3)`.
    pub array_bounds: Vec<Option<i64>>,
    /// Source range.
    pub span: SourceSpan,
}

impl TypeName {
    /// Creates a scalar type name.
    #[must_use]
    pub fn new(kind: TypeKind) -> Self {
        Self {
            setof: false,
            kind,
            array_bounds: Vec::new(),
            span: SourceSpan::default(),
        }
    }
}

/// Built-in and user-defined types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeKind {
    /// `smallint`
    SmallInt,
    /// `integer` / `int`
    Integer,
    /// `bigint`
    BigInt,
    /// `real`, or `float(p)` with `p <= 24`.
    Real,
    /// `double precision`, `float`, or `float(p)` with `p >= 25`.
    Double,
    /// `numeric`, `decimal`, `dec`.
    Numeric {
        /// Total number of digits.
        precision: Option<u32>,
        /// Digits after the decimal point.
        scale: Option<u32>,
    },
    /// `boolean`
    Boolean,
    /// `character [varying] (n)`, `char`, `varchar`, `nchar`.
    Character {
        /// `VARYING`
        varying: bool,
        /// Declared length.
        length: Option<u32>,
    },
    /// `bit [varying] (n)`
    Bit {
        /// `VARYING`
        varying: bool,
        /// Declared length.
        length: Option<u32>,
    },
    /// `timestamp [(p)] [with|without time zone]`
    Timestamp {
        /// Fractional seconds precision.
        precision: Option<u32>,
        /// `WITH TIME ZONE`
        with_time_zone: bool,
    },
    /// `time [(p)] [with|without time zone]`
    Time {
        /// Fractional seconds precision.
        precision: Option<u32>,
        /// `WITH TIME ZONE`
        with_time_zone: bool,
    },
    /// `interval [fields] [(p)]`
    Interval {
        /// Field restriction (`YEAR TO MONTH`, `SECOND`, ...).
        fields: Option<IntervalFields>,
        /// Fractional seconds precision.
        precision: Option<u32>,
    },
    /// Any other type, with optional type modifiers: `varchar2(10)`, `public.mytype`.
    Generic {
        /// The type name.
        name: ObjectName,
        /// Type modifiers in parentheses.
        modifiers: Vec<Expr>,
    },
}

/// A field of an interval qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntervalField {
    /// `YEAR`
    Year,
    /// `MONTH`
    Month,
    /// `DAY`
    Day,
    /// `HOUR`
    Hour,
    /// `MINUTE`
    Minute,
    /// `SECOND`
    Second,
}

impl IntervalField {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Year => "YEAR",
            Self::Month => "MONTH",
            Self::Day => "DAY",
            Self::Hour => "HOUR",
            Self::Minute => "MINUTE",
            Self::Second => "SECOND",
        }
    }
}

/// An interval qualifier: `DAY`, `DAY TO SECOND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalFields {
    /// Leading field.
    pub from: IntervalField,
    /// Trailing field of a `TO` range.
    pub to: Option<IntervalField>,
}

impl fmt::Display for IntervalFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.from.as_str())?;
        if let Some(to) = self.to {
            write!(f, " TO {}", to.as_str())?;
        }
        Ok(())
    }
}

/// Writes an interval qualifier with its precision, which belongs to the
/// trailing `SECOND` field.
pub(super) fn write_interval_qualifier(
    f: &mut fmt::Formatter<'_>,
    fields: IntervalFields,
    precision: Option<u32>,
) -> fmt::Result {
    write!(f, "{fields}")?;
    if let Some(p) = precision {
        write!(f, "({p})")?;
    }
    Ok(())
}

fn write_precision(f: &mut fmt::Formatter<'_>, precision: Option<u32>) -> fmt::Result {
    match precision {
        Some(p) => write!(f, "({p})"),
        None => Ok(()),
    }
}

impl TypeKind {
    /// Writes the type without interval fields, which typed literals print
    /// after the string.
    pub(super) fn fmt_base(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interval { fields: Some(_), .. } => f.write_str("INTERVAL"),
            other => write!(f, "{other}"),
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SmallInt => f.write_str("SMALLINT"),
            Self::Integer => f.write_str("INTEGER"),
            Self::BigInt => f.write_str("BIGINT"),
            Self::Real => f.write_str("REAL"),
            Self::Double => f.write_str("DOUBLE PRECISION"),
            Self::Numeric { precision, scale } => {
                f.write_str("NUMERIC")?;
                match (precision, scale) {
                    (Some(p), Some(s)) => write!(f, "({p}, {s})"),
                    (Some(p), None) => write!(f, "({p})"),
                    _ => Ok(()),
                }
            }
            Self::Boolean => f.write_str("BOOLEAN"),
            Self::Character { varying, length } => {
                f.write_str(if *varying {
                    "CHARACTER VARYING"
                } else {
                    "CHARACTER"
                })?;
                write_precision(f, *length)
            }
            Self::Bit { varying, length } => {
                f.write_str(if *varying { "BIT VARYING" } else { "BIT" })?;
                write_precision(f, *length)
            }
            Self::Timestamp {
                precision,
                with_time_zone,
            } => {
                f.write_str("TIMESTAMP")?;
                write_precision(f, *precision)?;
                if *with_time_zone {
                    f.write_str(" WITH TIME ZONE")?;
                }
                Ok(())
            }
            Self::Time {
                precision,
                with_time_zone,
            } => {
                f.write_str("TIME")?;
                write_precision(f, *precision)?;
                if *with_time_zone {
                    f.write_str(" WITH TIME ZONE")?;
                }
                Ok(())
            }
            Self::Interval { fields, precision } => {
                f.write_str("INTERVAL")?;
                match fields {
                    Some(fields) => {
                        f.write_str(" ")?;
                        write_interval_qualifier(f, *fields, *precision)
                    }
                    None => write_precision(f, *precision),
                }
            }
            Self::Generic { name, modifiers } => {
                write_type_function_name(f, name)?;
                if !modifiers.is_empty() {
                    f.write_str("(")?;
                    comma_list(f, modifiers)?;
                    f.write_str(")")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.setof {
            f.write_str("SETOF ")?;
        }
        write!(f, "{}", self.kind)?;
        for bound in &self.array_bounds {
            match bound {
                Some(n) => write!(f, "[{n}]")?,
                None => f.write_str("[]")?,
            }
        }
        Ok(())
    }
}
