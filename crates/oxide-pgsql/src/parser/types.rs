//! Type name parsing.

use super::parser::Parser;
use crate::ast::{IntervalField, IntervalFields, ObjectName, TypeKind, TypeName};
use crate::error::Result;
use crate::lexer::{Keyword, TokenKind};

impl<'a> Parser<'a> {
    /// Parses `[SETOF] SimpleTypename [array bounds]`.
    pub(super) fn parse_type_name(&mut self) -> Result<TypeName> {
        let start = self.current.span.start;
        let setof = self.consume_keyword(Keyword::Setof);
        let mut data_type = self.parse_simple_type_name()?;
        data_type.setof = setof;

        if self.consume_keyword(Keyword::Array) {
            let bound = if self.consume(&TokenKind::LeftBracket) {
                let n = self.parse_iconst()?;
                self.expect(&TokenKind::RightBracket)?;
                Some(n)
            } else {
                None
            };
            data_type.array_bounds.push(bound);
        } else {
            while self.consume(&TokenKind::LeftBracket) {
                let bound = if self.check(&TokenKind::RightBracket) {
                    None
                } else {
                    Some(self.parse_iconst()?)
                };
                self.expect(&TokenKind::RightBracket)?;
                data_type.array_bounds.push(bound);
            }
        }

        data_type.span = self.span_from(start).into();
        Ok(data_type)
    }

    /// Parses a type name without `SETOF` or array bounds.
    #[allow(clippy::too_many_lines)]
    pub(super) fn parse_simple_type_name(&mut self) -> Result<TypeName> {
        let start = self.current.span.start;
        let kind = match self.current.kind.keyword() {
            Some(Keyword::Int | Keyword::Integer) => {
                self.advance();
                TypeKind::Integer
            }
            Some(Keyword::Smallint) => {
                self.advance();
                TypeKind::SmallInt
            }
            Some(Keyword::Bigint) => {
                self.advance();
                TypeKind::BigInt
            }
            Some(Keyword::Real) => {
                self.advance();
                TypeKind::Real
            }
            Some(Keyword::Float) => {
                self.advance();
                if self.check(&TokenKind::LeftParen) {
                    let precision_start = self.current.span.start;
                    self.advance();
                    let precision = self.parse_iconst()?;
                    self.expect(&TokenKind::RightParen)?;
                    self.float_kind(precision, self.span_from(precision_start))?
                } else {
                    TypeKind::Double
                }
            }
            Some(Keyword::Double) if self.peek_keyword(1) == Some(Keyword::Precision) => {
                self.advance();
                self.advance();
                TypeKind::Double
            }
            Some(Keyword::Decimal | Keyword::Dec | Keyword::Numeric) => {
                self.advance();
                let (precision, scale) = if self.consume(&TokenKind::LeftParen) {
                    let precision = self.parse_u32_const()?;
                    let scale = if self.consume(&TokenKind::Comma) {
                        Some(self.parse_u32_const()?)
                    } else {
                        None
                    };
                    self.expect(&TokenKind::RightParen)?;
                    (Some(precision), scale)
                } else {
                    (None, None)
                };
                TypeKind::Numeric { precision, scale }
            }
            Some(Keyword::Boolean) => {
                self.advance();
                TypeKind::Boolean
            }
            Some(Keyword::Bit) => {
                self.advance();
                let varying = self.consume_keyword(Keyword::Varying);
                TypeKind::Bit {
                    varying,
                    length: self.parse_opt_length()?,
                }
            }
            Some(Keyword::National)
                if matches!(
                    self.peek_keyword(1),
                    Some(Keyword::Character | Keyword::Char)
                ) =>
            {
                self.advance();
                self.advance();
                self.parse_character_rest(false)?
            }
            Some(Keyword::Character | Keyword::Char | Keyword::Nchar) => {
                self.advance();
                self.parse_character_rest(false)?
            }
            Some(Keyword::Varchar) => {
                self.advance();
                self.parse_character_rest(true)?
            }
            Some(kw @ (Keyword::Timestamp | Keyword::Time)) => {
                self.advance();
                let precision = self.parse_opt_length()?;
                let with_time_zone =
                    if self.consume_keywords(&[Keyword::With, Keyword::Time, Keyword::Zone]) {
                        true
                    } else {
                        self.consume_keywords(&[Keyword::Without, Keyword::Time, Keyword::Zone]);
                        false
                    };
                if kw == Keyword::Timestamp {
                    TypeKind::Timestamp {
                        precision,
                        with_time_zone,
                    }
                } else {
                    TypeKind::Time {
                        precision,
                        with_time_zone,
                    }
                }
            }
            Some(Keyword::Interval) => {
                self.advance();
                if self.check(&TokenKind::LeftParen) {
                    TypeKind::Interval {
                        fields: None,
                        precision: self.parse_opt_length()?,
                    }
                } else {
                    match self.parse_opt_interval()? {
                        Some((fields, precision)) => TypeKind::Interval {
                            fields: Some(fields),
                            precision,
                        },
                        None => TypeKind::Interval {
                            fields: None,
                            precision: None,
                        },
                    }
                }
            }
            _ => self.parse_generic_type()?,
        };
        let mut data_type = TypeName::new(kind);
        data_type.span = self.span_from(start).into();
        Ok(data_type)
    }

    /// `type_function_name [.attr]* [(modifiers)]`
    fn parse_generic_type(&mut self) -> Result<TypeKind> {
        if !Self::is_type_function_name_token(&self.current.kind) {
            return Err(self.unexpected("type name"));
        }
        let mut parts = vec![self.parse_type_function_name()?];
        while self.consume(&TokenKind::Dot) {
            parts.push(self.parse_col_label()?);
        }
        let modifiers = if self.consume(&TokenKind::LeftParen) {
            let modifiers = self.parse_expr_list()?;
            self.expect(&TokenKind::RightParen)?;
            modifiers
        } else {
            Vec::new()
        };
        Ok(TypeKind::Generic {
            name: ObjectName::new(parts),
            modifiers,
        })
    }

    /// Parses `[VARYING] [(n)]` after a character type keyword.
    fn parse_character_rest(&mut self, varying: bool) -> Result<TypeKind> {
        let varying = varying || self.consume_keyword(Keyword::Varying);
        Ok(TypeKind::Character {
            varying,
            length: self.parse_opt_length()?,
        })
    }

    /// Parses an optional `(n)`.
    fn parse_opt_length(&mut self) -> Result<Option<u32>> {
        if !self.consume(&TokenKind::LeftParen) {
            return Ok(None);
        }
        let n = self.parse_u32_const()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(Some(n))
    }

    /// Parses an optional interval qualifier and the precision of its
    /// `SECOND` field.
    pub(super) fn parse_opt_interval(&mut self) -> Result<Option<(IntervalFields, Option<u32>)>> {
        let Some(from) = self.current.kind.keyword().and_then(interval_field) else {
            return Ok(None);
        };
        self.advance();

        let to = match self.peek_keyword(1).and_then(interval_field) {
            Some(to) if self.check_keyword(Keyword::To) => {
                let valid = matches!(
                    (from, to),
                    (IntervalField::Year, IntervalField::Month)
                        | (
                            IntervalField::Day,
                            IntervalField::Hour | IntervalField::Minute | IntervalField::Second
                        )
                        | (
                            IntervalField::Hour,
                            IntervalField::Minute | IntervalField::Second
                        )
                        | (IntervalField::Minute, IntervalField::Second)
                );
                self.advance();
                if !valid {
                    return Err(self.unexpected("a later interval field"));
                }
                self.advance();
                Some(to)
            }
            _ => None,
        };

        let precision = if to.unwrap_or(from) == IntervalField::Second {
            self.parse_opt_length()?
        } else {
            None
        };
        Ok(Some((IntervalFields { from, to }, precision)))
    }
}

/// Maps an interval field keyword to its field.
const fn interval_field(kw: Keyword) -> Option<IntervalField> {
    match kw {
        Keyword::Year => Some(IntervalField::Year),
        Keyword::Month => Some(IntervalField::Month),
        Keyword::Day => Some(IntervalField::Day),
        Keyword::Hour => Some(IntervalField::Hour),
        Keyword::Minute => Some(IntervalField::Minute),
        Keyword::Second => Some(IntervalField::Second),
        _ => None,
    }
}
