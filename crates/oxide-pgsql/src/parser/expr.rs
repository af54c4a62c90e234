//! Expression parsing.
//!
//! `a_expr` and `b_expr` share one precedence-climbing loop; the
//! `restricted` flag switches off the operators `b_expr` lacks (boolean
//! connectives, pattern matching, `IN`, `BETWEEN` and most `IS` tests).
//! Atoms (`c_expr`) and the SQL special forms are parsed by the methods
//! further down.

use super::parser::Parser;
use super::pratt::{
    bp, infix_binding_power, like_operator, prefix_binding_power, token_to_binary_op, InfixOp,
};
use crate::ast::{
    BinaryOp, CaseWhen, CastSyntax, Expr, ExprKind, ExtractField, FrameBound, FrameExclusion,
    FrameUnits, FunctionArg, FunctionCall, Ident, LikeKind, Literal, NormalForm, NullOrdering,
    ObjectName, OrderByExpr, OrderDirection, Parameter, QualifiedOperator, QuantifiedRhs,
    Quantifier, Query, TrimSide, TruthValue, TypeKind, TypeName, UnaryOp, ValueFunction,
    WindowFrame, WindowRef, WindowSpec, XmlAttribute, XmlOption, XmlStandalone,
};
use crate::error::Result;
use crate::lexer::{Keyword, Span, TokenKind};

/// What a parenthesised list turned out to hold.
pub(super) enum ParenContent {
    /// `(SELECT ...)`
    Query(Box<Query>),
    /// `(a)` or `(a, b, ...)`
    Exprs(Vec<Expr>),
}

impl<'a> Parser<'a> {
    /// Parses a full expression (`a_expr`).
    pub(super) fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_expr_bp(0, false)
    }

    /// Parses a restricted expression (`b_expr`).
    pub(super) fn parse_b_expr(&mut self) -> Result<Expr> {
        self.parse_expr_bp(0, true)
    }

    /// Parses `expr, expr, ...`.
    pub(super) fn parse_expr_list(&mut self) -> Result<Vec<Expr>> {
        self.parse_comma_list(Self::parse_expr)
    }

    /// Parses an expression whose operators bind at least as tightly as `min_bp`.
    pub(super) fn parse_expr_bp(&mut self, min_bp: u8, restricted: bool) -> Result<Expr> {
        self.nested(|p| p.parse_expr_bp_inner(min_bp, restricted))
    }

    fn parse_expr_bp_inner(&mut self, min_bp: u8, restricted: bool) -> Result<Expr> {
        let start = self.current.span.start;
        let mut lhs = self.parse_prefix(restricted)?;
        // Level of the last operator applied, if it was non-associative.
        let mut last_non_assoc: Option<u8> = None;

        while let Some(op) = self.peek_infix(restricted) {
            let (l_bp, r_bp) = infix_binding_power(&op);
            if l_bp < min_bp {
                break;
            }
            let non_assoc = op.is_non_associative();
            if non_assoc && last_non_assoc == Some(l_bp) {
                return Err(self.parse_error(
                    format!(
                        "syntax error at or near \"{}\": operator is not associative",
                        self.current.text
                    ),
                    self.current.span,
                ));
            }
            self.extend_chain()?;
            lhs = self.parse_infix(lhs, op, r_bp, restricted, start)?;
            last_non_assoc = non_assoc.then_some(l_bp);
        }

        Ok(lhs)
    }

    // --- Prefix operators ---

    fn parse_prefix(&mut self, restricted: bool) -> Result<Expr> {
        let start = self.current.span.start;

        if !restricted && self.check_keyword(Keyword::Not) {
            self.advance();
            let operand = self.parse_expr_bp(bp::NOT, false)?;
            return Ok(self.unary(UnaryOp::Not, operand, start));
        }

        if self.at_qualified_operator() {
            let op = self.parse_qualified_operator()?;
            let operand = self.parse_expr_bp(bp::OTHER_OP + 1, restricted)?;
            return Ok(self.unary(UnaryOp::Qualified(op), operand, start));
        }

        let Some(r_bp) = prefix_binding_power(&self.current.kind) else {
            return self.parse_c_expr();
        };
        let op = match &self.current.kind {
            TokenKind::Minus => UnaryOp::Minus,
            TokenKind::Plus => UnaryOp::Plus,
            other => UnaryOp::Custom(other.operator_text().unwrap_or_default().to_string()),
        };
        self.advance();
        let operand = self.parse_expr_bp(r_bp, restricted)?;
        Ok(match op {
            UnaryOp::Minus => self.negate(operand, start),
            op => self.unary(op, operand, start),
        })
    }

    fn unary(&self, op: UnaryOp, operand: Expr, start: usize) -> Expr {
        Expr::new(
            ExprKind::Unary {
                op,
                expr: Box::new(operand),
            },
            self.span_from(start),
        )
    }

    /// Applies unary minus, folding it into a numeric literal operand.
    fn negate(&self, operand: Expr, start: usize) -> Expr {
        let span = self.span_from(start);
        let literal = match operand.kind {
            ExprKind::Literal(Literal::Integer(n)) => match n.checked_neg() {
                Some(negated) => Literal::Integer(negated),
                None => Literal::Numeric(format!("{}", i128::from(n).abs())),
            },
            ExprKind::Literal(Literal::Numeric(text)) => {
                let negated = match text.strip_prefix('-') {
                    Some(rest) => rest.to_string(),
                    None => format!("-{text}"),
                };
                negated
                    .parse::<i64>()
                    .map_or(Literal::Numeric(negated), Literal::Integer)
            }
            kind => {
                let operand = Expr {
                    kind,
                    span: operand.span,
                };
                return self.unary(UnaryOp::Minus, operand, start);
            }
        };
        Expr::new(ExprKind::Literal(literal), span)
    }

    /// Returns true at `OPERATOR(`.
    fn at_qualified_operator(&mut self) -> bool {
        self.check_keyword(Keyword::Operator)
            && matches!(self.peek_nth(1).kind, TokenKind::LeftParen)
    }

    /// Parses `OPERATOR(schema.op)`.
    pub(super) fn parse_qualified_operator(&mut self) -> Result<QualifiedOperator> {
        self.expect_keyword(Keyword::Operator)?;
        self.expect(&TokenKind::LeftParen)?;
        let mut schema = Vec::new();
        while !self.current.kind.is_operator() {
            schema.push(self.parse_col_id()?);
            self.expect(&TokenKind::Dot)?;
        }
        let op = match self.current.kind.operator_text() {
            Some(text) => text.to_string(),
            None => return Err(self.unexpected("operator")),
        };
        self.advance();
        self.expect(&TokenKind::RightParen)?;
        Ok(QualifiedOperator { schema, op })
    }

    // --- Infix operators ---

    /// Identifies the operator at the current position without consuming it.
    fn peek_infix(&mut self, restricted: bool) -> Option<InfixOp> {
        if let Some(op) = token_to_binary_op(&self.current.kind) {
            return Some(InfixOp::Binary(op));
        }
        let op = match self.current.kind.keyword()? {
            Keyword::And => InfixOp::Binary(BinaryOp::And),
            Keyword::Or => InfixOp::Binary(BinaryOp::Or),
            Keyword::Overlaps => InfixOp::Binary(BinaryOp::Overlaps),
            Keyword::Is => {
                if restricted {
                    let n = if self.peek_keyword(1) == Some(Keyword::Not) { 2 } else { 1 };
                    if !matches!(
                        self.peek_keyword(n),
                        Some(Keyword::Distinct | Keyword::Document)
                    ) {
                        return None;
                    }
                }
                return Some(InfixOp::Is);
            }
            Keyword::Isnull => InfixOp::IsNull,
            Keyword::Notnull => InfixOp::NotNull,
            Keyword::Between => InfixOp::Between { negated: false },
            Keyword::In => InfixOp::In { negated: false },
            Keyword::Like => InfixOp::Like {
                kind: LikeKind::Like,
                negated: false,
            },
            Keyword::Ilike => InfixOp::Like {
                kind: LikeKind::ILike,
                negated: false,
            },
            Keyword::Similar if self.peek_keyword(1) == Some(Keyword::To) => InfixOp::Like {
                kind: LikeKind::SimilarTo,
                negated: false,
            },
            Keyword::Not => match self.peek_keyword(1)? {
                Keyword::Between => InfixOp::Between { negated: true },
                Keyword::In => InfixOp::In { negated: true },
                Keyword::Like => InfixOp::Like {
                    kind: LikeKind::Like,
                    negated: true,
                },
                Keyword::Ilike => InfixOp::Like {
                    kind: LikeKind::ILike,
                    negated: true,
                },
                Keyword::Similar if self.peek_keyword(2) == Some(Keyword::To) => InfixOp::Like {
                    kind: LikeKind::SimilarTo,
                    negated: true,
                },
                _ => return None,
            },
            Keyword::At
                if self.peek_keyword(1) == Some(Keyword::Time)
                    && self.peek_keyword(2) == Some(Keyword::Zone) =>
            {
                InfixOp::AtTimeZone
            }
            Keyword::Collate => InfixOp::Collate,
            Keyword::Operator if matches!(self.peek_nth(1).kind, TokenKind::LeftParen) => {
                InfixOp::Qualified
            }
            _ => return None,
        };

        let allowed_in_b_expr = match &op {
            InfixOp::Binary(op) => !matches!(op, BinaryOp::And | BinaryOp::Or | BinaryOp::Overlaps),
            InfixOp::Qualified => true,
            _ => false,
        };
        (!restricted || allowed_in_b_expr).then_some(op)
    }

    /// Parses the operator at the current position and its right operand.
    fn parse_infix(
        &mut self,
        lhs: Expr,
        op: InfixOp,
        r_bp: u8,
        restricted: bool,
        start: usize,
    ) -> Result<Expr> {
        let kind = match op {
            InfixOp::Binary(op) => {
                if op == BinaryOp::Overlaps && !lhs.is_row() {
                    return Err(self.parse_error(
                        "syntax error at or near \"OVERLAPS\": expected a row constructor on the left",
                        self.current.span,
                    ));
                }
                self.advance();
                return self.parse_binary_rhs(lhs, op, r_bp, restricted, start);
            }
            InfixOp::Qualified => {
                let op = BinaryOp::Qualified(self.parse_qualified_operator()?);
                return self.parse_binary_rhs(lhs, op, r_bp, restricted, start);
            }
            InfixOp::Is => {
                self.expect_keyword(Keyword::Is)?;
                return self.parse_is_test(lhs, r_bp, restricted, start);
            }
            InfixOp::IsNull => {
                self.advance();
                ExprKind::IsNull {
                    expr: Box::new(lhs),
                    negated: false,
                }
            }
            InfixOp::NotNull => {
                self.advance();
                ExprKind::IsNull {
                    expr: Box::new(lhs),
                    negated: true,
                }
            }
            InfixOp::Between { negated } => self.parse_between(lhs, negated, r_bp)?,
            InfixOp::In { negated } => self.parse_in(lhs, negated)?,
            InfixOp::Like { kind, negated } => {
                if negated {
                    self.advance();
                }
                self.advance();
                if kind == LikeKind::SimilarTo {
                    self.expect_keyword(Keyword::To)?;
                }
                if self.at_quantifier() {
                    let Some(op) = like_operator(kind, negated) else {
                        return Err(self.unexpected("expression"));
                    };
                    return self.parse_quantified(lhs, op, start);
                }
                self.parse_like_pattern(lhs, kind, negated, r_bp)?
            }
            InfixOp::AtTimeZone => {
                self.advance();
                self.advance();
                self.advance();
                let zone = self.parse_expr_bp(r_bp, false)?;
                ExprKind::AtTimeZone {
                    expr: Box::new(lhs),
                    zone: Box::new(zone),
                }
            }
            InfixOp::Collate => {
                self.advance();
                ExprKind::Collate {
                    expr: Box::new(lhs),
                    collation: self.parse_qualified_name()?,
                }
            }
        };
        Ok(Expr::new(kind, self.span_from(start)))
    }

    /// Parses `[NOT] BETWEEN [SYMMETRIC | ASYMMETRIC] low AND high`.
    fn parse_between(&mut self, lhs: Expr, negated: bool, r_bp: u8) -> Result<ExprKind> {
        if negated {
            self.advance();
        }
        self.expect_keyword(Keyword::Between)?;
        let symmetric = self.consume_keyword(Keyword::Symmetric);
        if !symmetric {
            self.consume_keyword(Keyword::Asymmetric);
        }
        let low = self.parse_b_expr()?;
        self.expect_keyword(Keyword::And)?;
        let high = self.parse_expr_bp(r_bp, false)?;
        Ok(ExprKind::Between {
            expr: Box::new(lhs),
            low: Box::new(low),
            high: Box::new(high),
            negated,
            symmetric,
        })
    }

    /// Parses `[NOT] IN (list)` or `[NOT] IN (query)`.
    fn parse_in(&mut self, lhs: Expr, negated: bool) -> Result<ExprKind> {
        if negated {
            self.advance();
        }
        self.expect_keyword(Keyword::In)?;
        self.expect(&TokenKind::LeftParen)?;
        let content = self.parse_paren_content(true)?;
        self.expect(&TokenKind::RightParen)?;
        let expr = Box::new(lhs);
        Ok(match content {
            ParenContent::Query(subquery) => ExprKind::InSubquery {
                expr,
                subquery,
                negated,
            },
            ParenContent::Exprs(list) => match <[Expr; 1]>::try_from(list) {
                Ok([Expr {
                    kind: ExprKind::Subquery(subquery),
                    ..
                }]) => ExprKind::InSubquery {
                    expr,
                    subquery,
                    negated,
                },
                Ok(single) => ExprKind::InList {
                    expr,
                    list: single.into(),
                    negated,
                },
                Err(list) => ExprKind::InList {
                    expr,
                    list,
                    negated,
                },
            },
        })
    }

    /// Parses the pattern and optional `ESCAPE` of a `LIKE`-family test.
    fn parse_like_pattern(
        &mut self,
        lhs: Expr,
        kind: LikeKind,
        negated: bool,
        r_bp: u8,
    ) -> Result<ExprKind> {
        let pattern = self.parse_expr_bp(r_bp, false)?;
        let escape = if self.consume_keyword(Keyword::Escape) {
            Some(Box::new(self.parse_expr_bp(r_bp, false)?))
        } else {
            None
        };
        Ok(ExprKind::Like {
            expr: Box::new(lhs),
            kind,
            pattern: Box::new(pattern),
            escape,
            negated,
        })
    }

    fn parse_binary_rhs(
        &mut self,
        lhs: Expr,
        op: BinaryOp,
        r_bp: u8,
        restricted: bool,
        start: usize,
    ) -> Result<Expr> {
        if !restricted && self.at_quantifier() {
            return self.parse_quantified(lhs, op, start);
        }
        let rhs = self.parse_expr_bp(r_bp, restricted)?;
        if op == BinaryOp::Overlaps {
            self.check_overlaps(&lhs, &rhs)?;
        }
        Ok(Expr::new(
            ExprKind::Binary {
                left: Box::new(lhs),
                op,
                right: Box::new(rhs),
            },
            self.span_from(start),
        ))
    }

    /// Parses what follows `IS`.
    fn parse_is_test(
        &mut self,
        lhs: Expr,
        r_bp: u8,
        restricted: bool,
        start: usize,
    ) -> Result<Expr> {
        let negated = self.consume_keyword(Keyword::Not);
        let expr = Box::new(lhs);
        let kind = match self.current.kind.keyword() {
            Some(Keyword::Null) => {
                self.advance();
                ExprKind::IsNull { expr, negated }
            }
            Some(kw @ (Keyword::True | Keyword::False | Keyword::Unknown)) => {
                self.advance();
                let value = match kw {
                    Keyword::True => TruthValue::True,
                    Keyword::False => TruthValue::False,
                    _ => TruthValue::Unknown,
                };
                ExprKind::IsTruth {
                    expr,
                    value,
                    negated,
                }
            }
            Some(Keyword::Distinct) => {
                self.advance();
                self.expect_keyword(Keyword::From)?;
                let right = self.parse_expr_bp(r_bp, restricted)?;
                ExprKind::IsDistinctFrom {
                    left: expr,
                    right: Box::new(right),
                    negated,
                }
            }
            Some(Keyword::Document) => {
                self.advance();
                ExprKind::IsDocument { expr, negated }
            }
            Some(Keyword::Normalized) => {
                self.advance();
                ExprKind::IsNormalized {
                    expr,
                    form: None,
                    negated,
                }
            }
            Some(kw) if normal_form(kw).is_some() => {
                let form = normal_form(kw);
                self.advance();
                self.expect_keyword(Keyword::Normalized)?;
                ExprKind::IsNormalized {
                    expr,
                    form,
                    negated,
                }
            }
            _ => {
                return Err(self.unexpected(
                    "NULL, TRUE, FALSE, UNKNOWN, DISTINCT FROM, DOCUMENT or NORMALIZED",
                ))
            }
        };
        Ok(Expr::new(kind, self.span_from(start)))
    }

    /// Returns true at `ANY (`, `SOME (` or `ALL (`.
    fn at_quantifier(&mut self) -> bool {
        matches!(
            self.current.kind.keyword(),
            Some(Keyword::Any | Keyword::Some | Keyword::All)
        ) && matches!(self.peek_nth(1).kind, TokenKind::LeftParen)
    }

    /// Parses `ANY|SOME|ALL (...)` after a comparison operator.
    fn parse_quantified(&mut self, left: Expr, op: BinaryOp, start: usize) -> Result<Expr> {
        let quantifier = if self.consume_keyword(Keyword::All) {
            Quantifier::All
        } else {
            self.advance();
            Quantifier::Any
        };
        self.expect(&TokenKind::LeftParen)?;
        let right = match self.parse_paren_content(false)? {
            ParenContent::Query(query) => QuantifiedRhs::Subquery(query),
            ParenContent::Exprs(exprs) => match <[Expr; 1]>::try_from(exprs) {
                Ok([Expr {
                    kind: ExprKind::Subquery(query),
                    ..
                }]) => QuantifiedRhs::Subquery(query),
                Ok([expr]) => QuantifiedRhs::Expr(Box::new(expr)),
                Err(_) => return Err(self.unexpected("\")\"")),
            },
        };
        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::new(
            ExprKind::Quantified {
                left: Box::new(left),
                op,
                quantifier,
                right,
            },
            self.span_from(start),
        ))
    }

    // --- Parenthesised content ---

    /// Returns true if the current token starts a query.
    pub(super) fn at_query_start(&self) -> bool {
        matches!(
            self.current.kind.keyword(),
            Some(Keyword::Select | Keyword::Values | Keyword::Table | Keyword::With)
        )
    }

    /// Returns true if the current token continues a parenthesised query.
    fn at_query_continuation(&mut self) -> bool {
        match self.current.kind.keyword() {
            Some(
                Keyword::Union
                | Keyword::Intersect
                | Keyword::Except
                | Keyword::Order
                | Keyword::Limit
                | Keyword::Offset,
            ) => true,
            Some(Keyword::Fetch) => {
                matches!(self.peek_keyword(1), Some(Keyword::First | Keyword::Next))
            }
            Some(Keyword::For) => self.at_locking_clause(),
            _ => false,
        }
    }

    /// Parses what follows `(`: a query, or one expression or more.
    ///
    /// A parenthesised subquery followed by a set operator or a trailing
    /// query clause is continued as a query: `((SELECT 1) UNION (SELECT 2))`.
    pub(super) fn parse_paren_content(&mut self, allow_list: bool) -> Result<ParenContent> {
        if self.at_query_start() {
            return self.parse_boxed_query().map(ParenContent::Query);
        }
        let start = self.current.span.start;
        let first = self.parse_expr()?;
        let first = match first.kind {
            ExprKind::Subquery(query) if self.at_query_continuation() => {
                return self.continue_query(query, start).map(ParenContent::Query);
            }
            kind => Expr {
                kind,
                span: first.span,
            },
        };
        let mut exprs = vec![first];
        if allow_list {
            while self.consume(&TokenKind::Comma) {
                exprs.push(self.parse_expr()?);
            }
        }
        Ok(ParenContent::Exprs(exprs))
    }

    /// Parses `(...)` in expression position.
    fn parse_paren_expr(&mut self) -> Result<Expr> {
        let start = self.current.span.start;
        self.expect(&TokenKind::LeftParen)?;
        let content = self.parse_paren_content(true)?;
        self.expect(&TokenKind::RightParen)?;
        let span = self.span_from(start);
        Ok(match content {
            ParenContent::Query(query) => Expr::new(ExprKind::Subquery(query), span),
            ParenContent::Exprs(exprs) => match <[Expr; 1]>::try_from(exprs) {
                Ok([expr]) => expr,
                Err(exprs) => Expr::new(
                    ExprKind::Row {
                        exprs,
                        explicit: false,
                    },
                    span,
                ),
            },
        })
    }

    // --- Atoms ---

    /// Parses an atom followed by any subscripts, field selections and `::`
    /// casts (`c_expr` with indirection).
    pub(super) fn parse_c_expr(&mut self) -> Result<Expr> {
        let start = self.current.span.start;
        let primary = self.parse_primary()?;
        self.parse_postfix(primary, start)
    }

    fn parse_postfix(&mut self, mut expr: Expr, start: usize) -> Result<Expr> {
        loop {
            if matches!(
                self.current.kind,
                TokenKind::LeftBracket | TokenKind::Dot | TokenKind::DoubleColon
            ) {
                self.extend_chain()?;
            }
            let kind = match self.current.kind {
                TokenKind::LeftBracket => {
                    self.advance();
                    let lower = if self.check(&TokenKind::Colon) {
                        None
                    } else {
                        Some(Box::new(self.parse_expr()?))
                    };
                    if self.consume(&TokenKind::Colon) {
                        let upper = if self.check(&TokenKind::RightBracket) {
                            None
                        } else {
                            Some(Box::new(self.parse_expr()?))
                        };
                        self.expect(&TokenKind::RightBracket)?;
                        ExprKind::Slice {
                            expr: Box::new(expr),
                            lower,
                            upper,
                        }
                    } else {
                        let Some(index) = lower else {
                            return Err(self.unexpected("expression"));
                        };
                        self.expect(&TokenKind::RightBracket)?;
                        ExprKind::Subscript {
                            expr: Box::new(expr),
                            index,
                        }
                    }
                }
                TokenKind::Dot => {
                    self.advance();
                    if self.consume(&TokenKind::Star) {
                        ExprKind::FieldWildcard(Box::new(expr))
                    } else {
                        ExprKind::Field {
                            expr: Box::new(expr),
                            field: self.parse_col_label()?,
                        }
                    }
                }
                TokenKind::DoubleColon => {
                    self.advance();
                    ExprKind::Cast {
                        expr: Box::new(expr),
                        data_type: self.parse_type_name()?,
                        syntax: CastSyntax::DoubleColon,
                    }
                }
                _ => return Ok(expr),
            };
            expr = Expr::new(kind, self.span_from(start));
        }
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let start = self.current.span.start;
        let kind = match &self.current.kind {
            TokenKind::Integer(n) => {
                let n = *n;
                self.advance();
                ExprKind::Literal(Literal::Integer(n))
            }
            TokenKind::Numeric(text) => {
                let text = text.clone();
                self.advance();
                ExprKind::Literal(Literal::Numeric(text))
            }
            TokenKind::String(s) => {
                let s = s.clone();
                self.advance();
                ExprKind::Literal(Literal::String(s))
            }
            TokenKind::BitString(bits) => {
                let bits = bits.clone();
                self.advance();
                ExprKind::Literal(Literal::BitString(bits))
            }
            TokenKind::HexString(hex) => {
                let hex = hex.clone();
                self.advance();
                ExprKind::Literal(Literal::HexString(hex))
            }
            TokenKind::Parameter(n) => {
                let n = *n;
                self.advance();
                ExprKind::Parameter(Parameter::Numbered(n))
            }
            TokenKind::Question if self.options.allow_question_mark_parameters => {
                self.advance();
                self.param_counter += 1;
                ExprKind::Parameter(Parameter::Marker(self.param_counter))
            }
            TokenKind::LeftParen => return self.parse_paren_expr(),
            TokenKind::Keyword(kw) => return self.parse_keyword_primary(*kw),
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => {
                return self.parse_name_primary()
            }
            _ => return Err(self.unexpected("expression")),
        };
        Ok(Expr::new(kind, self.span_from(start)))
    }

    /// Parses an atom that starts with a keyword.
    fn parse_keyword_primary(&mut self, kw: Keyword) -> Result<Expr> {
        let start = self.current.span.start;
        let next_is_paren = matches!(self.peek_nth(1).kind, TokenKind::LeftParen);
        let kind = match kw {
            Keyword::True | Keyword::False | Keyword::Null => {
                self.advance();
                ExprKind::Literal(match kw {
                    Keyword::True => Literal::Boolean(true),
                    Keyword::False => Literal::Boolean(false),
                    _ => Literal::Null,
                })
            }
            Keyword::Default => {
                self.advance();
                ExprKind::Default
            }
            Keyword::Case => self.parse_case()?,
            Keyword::Cast => self.parse_cast()?,
            Keyword::Exists if next_is_paren => {
                self.advance();
                ExprKind::Exists(self.parse_paren_query()?)
            }
            Keyword::Array if next_is_paren => {
                self.advance();
                ExprKind::ArraySubquery(self.parse_paren_query()?)
            }
            Keyword::Array if matches!(self.peek_nth(1).kind, TokenKind::LeftBracket) => {
                self.advance();
                ExprKind::Array(self.parse_array_elements()?)
            }
            Keyword::Row if next_is_paren => self.parse_row_constructor()?,
            Keyword::Grouping if next_is_paren => {
                self.advance();
                ExprKind::Grouping(self.parse_paren_expr_list()?)
            }
            Keyword::CurrentSchema if next_is_paren => return self.parse_name_primary(),
            Keyword::CurrentDate
            | Keyword::CurrentTime
            | Keyword::CurrentTimestamp
            | Keyword::Localtime
            | Keyword::Localtimestamp
            | Keyword::CurrentRole
            | Keyword::CurrentUser
            | Keyword::SessionUser
            | Keyword::User
            | Keyword::CurrentCatalog
            | Keyword::CurrentSchema => self.parse_value_function(kw)?,
            Keyword::Collation if self.peek_keyword(1) == Some(Keyword::For) => {
                self.advance();
                self.advance();
                ExprKind::CollationFor(Box::new(self.parse_paren_single_expr()?))
            }
            Keyword::Interval
                if matches!(
                    self.peek_nth(1).kind,
                    TokenKind::String(_) | TokenKind::LeftParen
                ) =>
            {
                return self.parse_typed_literal();
            }
            Keyword::Extract
            | Keyword::Overlay
            | Keyword::Position
            | Keyword::Substring
            | Keyword::Trim
            | Keyword::Treat
            | Keyword::Normalize
            | Keyword::Coalesce
            | Keyword::Greatest
            | Keyword::Least
            | Keyword::Nullif
            | Keyword::Xmlconcat
            | Keyword::Xmlelement
            | Keyword::Xmlexists
            | Keyword::Xmlforest
            | Keyword::Xmlparse
            | Keyword::Xmlpi
            | Keyword::Xmlroot
            | Keyword::Xmlserialize
                if next_is_paren =>
            {
                return self.parse_special_function(kw);
            }
            _ if self.at_const_type_literal(kw) => return self.parse_typed_literal(),
            _ => return self.parse_name_primary(),
        };
        Ok(Expr::new(kind, self.span_from(start)))
    }

    /// Parses `CAST(expr AS type)`.
    fn parse_cast(&mut self) -> Result<ExprKind> {
        self.expect_keyword(Keyword::Cast)?;
        self.expect(&TokenKind::LeftParen)?;
        let expr = self.parse_expr()?;
        self.expect_keyword(Keyword::As)?;
        let data_type = self.parse_type_name()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(ExprKind::Cast {
            expr: Box::new(expr),
            data_type,
            syntax: CastSyntax::Cast,
        })
    }

    /// Parses `ROW(expr, ...)`; the list may be empty.
    fn parse_row_constructor(&mut self) -> Result<ExprKind> {
        self.expect_keyword(Keyword::Row)?;
        self.expect(&TokenKind::LeftParen)?;
        let exprs = if self.check(&TokenKind::RightParen) {
            Vec::new()
        } else {
            self.parse_expr_list()?
        };
        self.expect(&TokenKind::RightParen)?;
        Ok(ExprKind::Row {
            exprs,
            explicit: true,
        })
    }

    /// Parses `(expr)`.
    fn parse_paren_single_expr(&mut self) -> Result<Expr> {
        self.expect(&TokenKind::LeftParen)?;
        let expr = self.parse_expr()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(expr)
    }

    /// Parses `(query)`.
    fn parse_paren_query(&mut self) -> Result<Box<Query>> {
        self.expect(&TokenKind::LeftParen)?;
        let query = self.parse_boxed_query()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(query)
    }

    /// Parses `[a, b]` or `[[a], [b]]` after `ARRAY` (or a nested `[`).
    fn parse_array_elements(&mut self) -> Result<Vec<Expr>> {
        self.expect(&TokenKind::LeftBracket)?;
        if self.consume(&TokenKind::RightBracket) {
            return Ok(Vec::new());
        }
        let elements = self.parse_comma_list(|p| {
            if p.check(&TokenKind::LeftBracket) {
                let start = p.current.span.start;
                let nested = p.nested(Self::parse_array_elements)?;
                Ok(Expr::new(ExprKind::Array(nested), p.span_from(start)))
            } else {
                p.parse_expr()
            }
        })?;
        self.expect(&TokenKind::RightBracket)?;
        Ok(elements)
    }

    fn parse_case(&mut self) -> Result<ExprKind> {
        self.expect_keyword(Keyword::Case)?;
        let operand = if self.check_keyword(Keyword::When) {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };
        let mut conditions = Vec::new();
        while self.consume_keyword(Keyword::When) {
            let condition = self.parse_expr()?;
            self.expect_keyword(Keyword::Then)?;
            let result = self.parse_expr()?;
            conditions.push(CaseWhen { condition, result });
        }
        if conditions.is_empty() {
            return Err(self.unexpected("WHEN"));
        }
        let else_result = if self.consume_keyword(Keyword::Else) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        self.expect_keyword(Keyword::End)?;
        Ok(ExprKind::Case {
            operand,
            conditions,
            else_result,
        })
    }

    fn parse_value_function(&mut self, kw: Keyword) -> Result<ExprKind> {
        let func = match kw {
            Keyword::CurrentDate => ValueFunction::CurrentDate,
            Keyword::CurrentTime => ValueFunction::CurrentTime,
            Keyword::CurrentTimestamp => ValueFunction::CurrentTimestamp,
            Keyword::Localtime => ValueFunction::LocalTime,
            Keyword::Localtimestamp => ValueFunction::LocalTimestamp,
            Keyword::CurrentRole => ValueFunction::CurrentRole,
            Keyword::CurrentUser => ValueFunction::CurrentUser,
            Keyword::SessionUser => ValueFunction::SessionUser,
            Keyword::User => ValueFunction::User,
            Keyword::CurrentCatalog => ValueFunction::CurrentCatalog,
            _ => ValueFunction::CurrentSchema,
        };
        self.advance();
        let precision = if func.takes_precision() && self.consume(&TokenKind::LeftParen) {
            let p = self.parse_u32_const()?;
            self.expect(&TokenKind::RightParen)?;
            Some(p)
        } else {
            None
        };
        Ok(ExprKind::ValueFunction { func, precision })
    }

    /// Returns true if `kw` starts a built-in type name used as a typed
    /// literal prefix (`TIMESTAMP '...'`, `CHAR(3) '...'`).
    fn at_const_type_literal(&mut self, kw: Keyword) -> bool {
        match &self.peek_nth(1).kind {
            TokenKind::String(_) => matches!(
                kw,
                Keyword::Smallint
                    | Keyword::Int
                    | Keyword::Integer
                    | Keyword::Bigint
                    | Keyword::Real
                    | Keyword::Float
                    | Keyword::Decimal
                    | Keyword::Dec
                    | Keyword::Numeric
                    | Keyword::Boolean
                    | Keyword::Bit
                    | Keyword::Character
                    | Keyword::Char
                    | Keyword::Varchar
                    | Keyword::Nchar
                    | Keyword::Timestamp
                    | Keyword::Time
            ),
            TokenKind::LeftParen => matches!(
                kw,
                Keyword::Float
                    | Keyword::Decimal
                    | Keyword::Dec
                    | Keyword::Numeric
                    | Keyword::Bit
                    | Keyword::Character
                    | Keyword::Char
                    | Keyword::Varchar
                    | Keyword::Nchar
                    | Keyword::Timestamp
                    | Keyword::Time
            ),
            TokenKind::Keyword(Keyword::Varying) => matches!(
                kw,
                Keyword::Bit | Keyword::Character | Keyword::Char | Keyword::Nchar
            ),
            TokenKind::Keyword(Keyword::Precision) => kw == Keyword::Double,
            TokenKind::Keyword(Keyword::With | Keyword::Without) => {
                matches!(kw, Keyword::Timestamp | Keyword::Time)
            }
            TokenKind::Keyword(Keyword::Character | Keyword::Char) => kw == Keyword::National,
            _ => false,
        }
    }

    /// Parses `type 'string'` for built-in types.
    fn parse_typed_literal(&mut self) -> Result<Expr> {
        if self.check_keyword(Keyword::Interval) {
            return self.parse_interval_literal();
        }
        let start = self.current.span.start;
        let data_type = self.parse_simple_type_name()?;
        let value = self.parse_sconst()?;
        Ok(Expr::new(
            ExprKind::TypedString { data_type, value },
            self.span_from(start),
        ))
    }

    /// Parses `INTERVAL 'string' [qualifier]` or `INTERVAL (p) 'string'`.
    pub(super) fn parse_interval_literal(&mut self) -> Result<Expr> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Interval)?;
        let leading_precision = if self.consume(&TokenKind::LeftParen) {
            let p = self.parse_u32_const()?;
            self.expect(&TokenKind::RightParen)?;
            Some(p)
        } else {
            None
        };
        let type_span = self.span_from(start);
        let value = self.parse_sconst()?;
        let (fields, precision) = match leading_precision {
            Some(p) => (None, Some(p)),
            None => match self.parse_opt_interval()? {
                Some((fields, p)) => (Some(fields), p),
                None => (None, None),
            },
        };
        let mut data_type = TypeName::new(TypeKind::Interval { fields, precision });
        data_type.span = type_span.into();
        Ok(Expr::new(
            ExprKind::TypedString { data_type, value },
            self.span_from(start),
        ))
    }

    /// Parses a column reference, qualified wildcard, function call or
    /// `func_name 'string'` typed literal.
    fn parse_name_primary(&mut self) -> Result<Expr> {
        let start = self.current.span.start;
        if Self::is_type_function_name_token(&self.current.kind) {
            let next_is_paren = matches!(self.peek_nth(1).kind, TokenKind::LeftParen);
            let next_is_string = matches!(self.peek_nth(1).kind, TokenKind::String(_));
            if next_is_paren {
                let name = ObjectName::from(self.parse_type_function_name()?);
                return self.parse_function_call(name, start);
            }
            if next_is_string {
                let name = ObjectName::from(self.parse_type_function_name()?);
                return self.parse_generic_typed_literal(name, Vec::new(), start);
            }
        }
        if !self.at_col_id() {
            return Err(self.unexpected("expression"));
        }

        let mut parts = vec![self.parse_col_id()?];
        while self.check(&TokenKind::Dot) {
            let next = &self.peek_nth(1).kind;
            if matches!(next, TokenKind::Star) {
                self.advance();
                self.advance();
                return Ok(Expr::new(
                    ExprKind::Wildcard(Some(ObjectName::new(parts))),
                    self.span_from(start),
                ));
            }
            if !Self::is_col_label_token(next) {
                break;
            }
            self.advance();
            parts.push(self.parse_col_label()?);
        }
        let name = ObjectName::new(parts);
        if name.parts.len() > 1 {
            match self.current.kind {
                TokenKind::LeftParen => return self.parse_function_call(name, start),
                TokenKind::String(_) => {
                    return self.parse_generic_typed_literal(name, Vec::new(), start)
                }
                _ => {}
            }
        }
        Ok(Expr::new(ExprKind::Column(name), self.span_from(start)))
    }

    fn parse_generic_typed_literal(
        &mut self,
        name: ObjectName,
        modifiers: Vec<Expr>,
        start: usize,
    ) -> Result<Expr> {
        let mut data_type = TypeName::new(TypeKind::Generic { name, modifiers });
        data_type.span = self.span_from(start).into();
        let value = self.parse_sconst()?;
        Ok(Expr::new(
            ExprKind::TypedString { data_type, value },
            self.span_from(start),
        ))
    }

    // --- Function calls ---

    /// Parses `name(args) [WITHIN GROUP (...)] [FILTER (...)] [OVER ...]`.
    fn parse_function_call(&mut self, name: ObjectName, start: usize) -> Result<Expr> {
        self.expect(&TokenKind::LeftParen)?;
        let mut call = FunctionCall::new(name, Vec::new());
        if self.consume(&TokenKind::Star) {
            call.star = true;
        } else if !self.check(&TokenKind::RightParen) {
            if self.consume_keyword(Keyword::Distinct) {
                call.distinct = true;
            } else {
                self.consume_keyword(Keyword::All);
            }
            loop {
                if self.consume_keyword(Keyword::Variadic) {
                    call.variadic = true;
                    call.args.push(self.parse_function_arg()?);
                    break;
                }
                call.args.push(self.parse_function_arg()?);
                if !self.consume(&TokenKind::Comma) {
                    break;
                }
            }
            if self.consume_keywords(&[Keyword::Order, Keyword::By]) {
                call.order_by = self.parse_order_by_list()?;
            }
        }
        self.expect(&TokenKind::RightParen)?;

        let plain = !call.star
            && !call.distinct
            && !call.variadic
            && call.order_by.is_empty()
            && call.args.iter().all(|arg| arg.name.is_none());
        if plain && matches!(self.current.kind, TokenKind::String(_)) {
            let modifiers = call.args.into_iter().map(|arg| arg.value).collect();
            return self.parse_generic_typed_literal(call.name, modifiers, start);
        }

        if self.check_keyword(Keyword::Within) && self.peek_keyword(1) == Some(Keyword::Group) {
            let clause_start = self.current.span.start;
            self.advance();
            self.advance();
            self.expect(&TokenKind::LeftParen)?;
            self.expect_keyword(Keyword::Order)?;
            self.expect_keyword(Keyword::By)?;
            call.within_group = self.parse_order_by_list()?;
            self.expect(&TokenKind::RightParen)?;
            let span = self.span_from(clause_start);
            if !call.order_by.is_empty() {
                return Err(self.semantic(
                    "cannot use multiple ORDER BY clauses with WITHIN GROUP",
                    span,
                ));
            }
            if call.distinct {
                return Err(self.semantic("cannot use DISTINCT with WITHIN GROUP", span));
            }
            if call.variadic {
                return Err(self.semantic("cannot use VARIADIC with WITHIN GROUP", span));
            }
        }

        if self.check_keyword(Keyword::Filter)
            && matches!(self.peek_nth(1).kind, TokenKind::LeftParen)
        {
            self.advance();
            self.advance();
            self.expect_keyword(Keyword::Where)?;
            call.filter = Some(Box::new(self.parse_expr()?));
            self.expect(&TokenKind::RightParen)?;
        }

        if self.check_keyword(Keyword::Over) {
            let next = &self.peek_nth(1).kind;
            if matches!(next, TokenKind::LeftParen) || Self::is_col_id_token(next) {
                self.advance();
                call.over = Some(self.parse_over_clause()?);
            }
        }

        let span = self.span_from(start);
        call.span = span.into();
        Ok(Expr::new(ExprKind::Function(Box::new(call)), span))
    }

    /// Parses `[name => | name :=] value`.
    fn parse_function_arg(&mut self) -> Result<FunctionArg> {
        let named = Self::is_type_function_name_token(&self.current.kind)
            && matches!(
                self.peek_nth(1).kind,
                TokenKind::FatArrow | TokenKind::ColonEquals
            );
        let name = if named {
            let name = self.parse_type_function_name()?;
            self.advance();
            Some(name)
        } else {
            None
        };
        Ok(FunctionArg {
            name,
            value: self.parse_expr()?,
        })
    }

    /// Builds a plain call for the keyword functions with ordinary argument lists.
    fn keyword_call(&self, name: &str, name_span: Span, args: Vec<Expr>, start: usize) -> Expr {
        let name = ObjectName::from(Ident::new(name).with_span(name_span));
        let mut call = FunctionCall::new(name, args);
        let span = self.span_from(start);
        call.span = span.into();
        Expr::new(ExprKind::Function(Box::new(call)), span)
    }

    /// Parses the functions with SQL-standard argument syntax.
    fn parse_special_function(&mut self, kw: Keyword) -> Result<Expr> {
        let start = self.current.span.start;
        let name_span = self.current.span;
        self.advance();
        self.expect(&TokenKind::LeftParen)?;
        let kind = match kw {
            Keyword::Coalesce | Keyword::Greatest | Keyword::Least | Keyword::Xmlconcat => {
                let args = self.parse_expr_list()?;
                self.expect(&TokenKind::RightParen)?;
                let name = kw.as_str().to_ascii_lowercase();
                return Ok(self.keyword_call(&name, name_span, args, start));
            }
            Keyword::Nullif => {
                let left = self.parse_expr()?;
                self.expect(&TokenKind::Comma)?;
                let right = self.parse_expr()?;
                self.expect(&TokenKind::RightParen)?;
                return Ok(self.keyword_call("nullif", name_span, vec![left, right], start));
            }
            Keyword::Overlay | Keyword::Substring => {
                return self.parse_overlay_or_substring(kw, name_span, start);
            }
            Keyword::Extract => self.parse_extract_args()?,
            Keyword::Position => {
                let substring = self.parse_b_expr()?;
                self.expect_keyword(Keyword::In)?;
                let string = self.parse_b_expr()?;
                ExprKind::Position {
                    substring: Box::new(substring),
                    string: Box::new(string),
                }
            }
            Keyword::Trim => self.parse_trim_args()?,
            Keyword::Treat => {
                let expr = self.parse_expr()?;
                self.expect_keyword(Keyword::As)?;
                ExprKind::Treat {
                    expr: Box::new(expr),
                    data_type: self.parse_type_name()?,
                }
            }
            Keyword::Normalize => self.parse_normalize_args()?,
            Keyword::Xmlelement => self.parse_xmlelement_args()?,
            Keyword::Xmlforest => {
                ExprKind::XmlForest(self.parse_comma_list(Self::parse_xml_attribute)?)
            }
            Keyword::Xmlexists => {
                let path = self.parse_c_expr()?;
                let argument = self.parse_xml_passing()?;
                ExprKind::XmlExists {
                    path: Box::new(path),
                    argument: Box::new(argument),
                }
            }
            Keyword::Xmlparse => self.parse_xmlparse_args()?,
            Keyword::Xmlpi => {
                self.expect_keyword(Keyword::Name)?;
                let name = self.parse_col_label()?;
                let content = if self.consume(&TokenKind::Comma) {
                    Some(Box::new(self.parse_expr()?))
                } else {
                    None
                };
                ExprKind::XmlPi { name, content }
            }
            Keyword::Xmlroot => self.parse_xmlroot_args()?,
            Keyword::Xmlserialize => {
                let option = self.parse_xml_option()?;
                let expr = self.parse_expr()?;
                self.expect_keyword(Keyword::As)?;
                ExprKind::XmlSerialize {
                    option,
                    expr: Box::new(expr),
                    data_type: self.parse_simple_type_name()?,
                }
            }
            _ => return Err(self.unexpected("function")),
        };
        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::new(kind, self.span_from(start)))
    }

    fn parse_extract_args(&mut self) -> Result<ExprKind> {
        let field = match &self.current.kind {
            TokenKind::Identifier(word) | TokenKind::QuotedIdentifier(word) => {
                ExtractField::Word(word.clone())
            }
            TokenKind::String(s) => ExtractField::String(s.clone()),
            TokenKind::Keyword(
                Keyword::Year
                | Keyword::Month
                | Keyword::Day
                | Keyword::Hour
                | Keyword::Minute
                | Keyword::Second,
            ) => ExtractField::Word(self.current.text.to_ascii_lowercase()),
            _ => return Err(self.unexpected("field name")),
        };
        self.advance();
        self.expect_keyword(Keyword::From)?;
        let expr = self.parse_expr()?;
        Ok(ExprKind::Extract {
            field,
            expr: Box::new(expr),
        })
    }

    /// Parses the arguments of `OVERLAY` or `SUBSTRING` up to the closing
    /// parenthesis. Both fall back to a plain call for the comma form.
    fn parse_overlay_or_substring(
        &mut self,
        kw: Keyword,
        name_span: Span,
        start: usize,
    ) -> Result<Expr> {
        let name = if kw == Keyword::Overlay {
            "overlay"
        } else {
            "substring"
        };
        if self.consume(&TokenKind::RightParen) {
            return Ok(self.keyword_call(name, name_span, Vec::new(), start));
        }
        let expr = Box::new(self.parse_expr()?);
        let kind = match self.current.kind.keyword() {
            Some(Keyword::Placing) if kw == Keyword::Overlay => {
                self.advance();
                let placing = Box::new(self.parse_expr()?);
                self.expect_keyword(Keyword::From)?;
                let from = Box::new(self.parse_expr()?);
                let length = self.parse_opt_for_expr()?;
                ExprKind::Overlay {
                    expr,
                    placing,
                    from,
                    length,
                }
            }
            Some(Keyword::From) if kw == Keyword::Substring => {
                self.advance();
                let from = Some(Box::new(self.parse_expr()?));
                let length = self.parse_opt_for_expr()?;
                ExprKind::Substring { expr, from, length }
            }
            Some(Keyword::For) if kw == Keyword::Substring => {
                self.advance();
                let length = Some(Box::new(self.parse_expr()?));
                let from = if self.consume_keyword(Keyword::From) {
                    Some(Box::new(self.parse_expr()?))
                } else {
                    None
                };
                ExprKind::Substring { expr, from, length }
            }
            Some(Keyword::Similar) if kw == Keyword::Substring => {
                self.advance();
                let pattern = Box::new(self.parse_expr()?);
                self.expect_keyword(Keyword::Escape)?;
                let escape = Box::new(self.parse_expr()?);
                ExprKind::SubstringSimilar {
                    expr,
                    pattern,
                    escape,
                }
            }
            _ => {
                let mut args = vec![*expr];
                while self.consume(&TokenKind::Comma) {
                    args.push(self.parse_expr()?);
                }
                self.expect(&TokenKind::RightParen)?;
                return Ok(self.keyword_call(name, name_span, args, start));
            }
        };
        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::new(kind, self.span_from(start)))
    }

    /// Parses an optional `FOR expr`.
    fn parse_opt_for_expr(&mut self) -> Result<Option<Box<Expr>>> {
        if self.consume_keyword(Keyword::For) {
            Ok(Some(Box::new(self.parse_expr()?)))
        } else {
            Ok(None)
        }
    }

    fn parse_trim_args(&mut self) -> Result<ExprKind> {
        let side = match self.current.kind.keyword() {
            Some(Keyword::Both) => Some(TrimSide::Both),
            Some(Keyword::Leading) => Some(TrimSide::Leading),
            Some(Keyword::Trailing) => Some(TrimSide::Trailing),
            _ => None,
        };
        if side.is_some() {
            self.advance();
        }
        let (characters, exprs) = if self.consume_keyword(Keyword::From) {
            (None, self.parse_expr_list()?)
        } else {
            let first = self.parse_expr()?;
            if self.consume_keyword(Keyword::From) {
                (Some(Box::new(first)), self.parse_expr_list()?)
            } else {
                let mut exprs = vec![first];
                while self.consume(&TokenKind::Comma) {
                    exprs.push(self.parse_expr()?);
                }
                (None, exprs)
            }
        };
        Ok(ExprKind::Trim {
            side,
            characters,
            exprs,
        })
    }

    fn parse_normalize_args(&mut self) -> Result<ExprKind> {
        let expr = self.parse_expr()?;
        let form = if self.consume(&TokenKind::Comma) {
            match self.current.kind.keyword().and_then(normal_form) {
                Some(form) => {
                    self.advance();
                    Some(form)
                }
                None => return Err(self.unexpected("NFC, NFD, NFKC or NFKD")),
            }
        } else {
            None
        };
        Ok(ExprKind::Normalize {
            expr: Box::new(expr),
            form,
        })
    }

    fn parse_xmlelement_args(&mut self) -> Result<ExprKind> {
        self.expect_keyword(Keyword::Name)?;
        let name = self.parse_col_label()?;
        let mut attributes = Vec::new();
        let mut content = Vec::new();
        while self.consume(&TokenKind::Comma) {
            let attributes_next = self.check_keyword(Keyword::Xmlattributes)
                && matches!(self.peek_nth(1).kind, TokenKind::LeftParen);
            if attributes_next && attributes.is_empty() && content.is_empty() {
                self.advance();
                self.advance();
                attributes = self.parse_comma_list(Self::parse_xml_attribute)?;
                self.expect(&TokenKind::RightParen)?;
            } else {
                content.push(self.parse_expr()?);
            }
        }
        Ok(ExprKind::XmlElement {
            name,
            attributes,
            content,
        })
    }

    fn parse_xmlparse_args(&mut self) -> Result<ExprKind> {
        let option = self.parse_xml_option()?;
        let expr = self.parse_expr()?;
        let preserve_whitespace =
            if self.consume_keywords(&[Keyword::Preserve, Keyword::Whitespace]) {
                true
            } else {
                self.consume_keywords(&[Keyword::Strip, Keyword::Whitespace]);
                false
            };
        Ok(ExprKind::XmlParse {
            option,
            expr: Box::new(expr),
            preserve_whitespace,
        })
    }

    /// Parses `xml, VERSION {expr | NO VALUE} [, STANDALONE {YES | NO | NO VALUE}]`.
    fn parse_xmlroot_args(&mut self) -> Result<ExprKind> {
        let expr = self.parse_expr()?;
        self.expect(&TokenKind::Comma)?;
        self.expect_keyword(Keyword::Version)?;
        let version = if self.consume_keywords(&[Keyword::No, Keyword::Value]) {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };
        let standalone = if self.consume(&TokenKind::Comma) {
            self.expect_keyword(Keyword::Standalone)?;
            Some(if self.consume_keyword(Keyword::Yes) {
                XmlStandalone::Yes
            } else {
                self.expect_keyword(Keyword::No)?;
                if self.consume_keyword(Keyword::Value) {
                    XmlStandalone::NoValue
                } else {
                    XmlStandalone::No
                }
            })
        } else {
            None
        };
        Ok(ExprKind::XmlRoot {
            expr: Box::new(expr),
            version,
            standalone,
        })
    }

    /// Parses `PASSING [BY REF | BY VALUE] c_expr [BY REF | BY VALUE]`.
    pub(super) fn parse_xml_passing(&mut self) -> Result<Expr> {
        self.expect_keyword(Keyword::Passing)?;
        self.parse_xml_passing_mechanism()?;
        let argument = self.parse_c_expr()?;
        self.parse_xml_passing_mechanism()?;
        Ok(argument)
    }

    fn parse_xml_attribute(&mut self) -> Result<XmlAttribute> {
        let value = self.parse_expr()?;
        let name = if self.consume_keyword(Keyword::As) {
            Some(self.parse_col_label()?)
        } else {
            None
        };
        Ok(XmlAttribute { value, name })
    }

    fn parse_xml_option(&mut self) -> Result<XmlOption> {
        if self.consume_keyword(Keyword::Document) {
            Ok(XmlOption::Document)
        } else if self.consume_keyword(Keyword::Content) {
            Ok(XmlOption::Content)
        } else {
            Err(self.unexpected("DOCUMENT or CONTENT"))
        }
    }

    /// Skips `BY REF` / `BY VALUE`, which do not change the result.
    fn parse_xml_passing_mechanism(&mut self) -> Result<()> {
        if self.consume_keyword(Keyword::By) && !self.consume_keyword(Keyword::Ref) {
            self.expect_keyword(Keyword::Value)?;
        }
        Ok(())
    }

    // --- Ordering and windows ---

    /// Parses `sort_by, ...`.
    pub(super) fn parse_order_by_list(&mut self) -> Result<Vec<OrderByExpr>> {
        self.parse_comma_list(Self::parse_order_by_expr)
    }

    fn parse_order_by_expr(&mut self) -> Result<OrderByExpr> {
        let start = self.current.span.start;
        let expr = self.parse_expr()?;
        let direction = match self.current.kind.keyword() {
            Some(Keyword::Asc) => {
                self.advance();
                Some(OrderDirection::Asc)
            }
            Some(Keyword::Desc) => {
                self.advance();
                Some(OrderDirection::Desc)
            }
            Some(Keyword::Using) => {
                self.advance();
                Some(OrderDirection::Using(self.parse_any_operator()?))
            }
            _ => None,
        };
        let nulls = self.parse_opt_nulls_ordering();
        Ok(OrderByExpr {
            expr,
            direction,
            nulls,
            span: self.span_from(start).into(),
        })
    }

    /// `[NULLS FIRST | NULLS LAST]`
    pub(super) fn parse_opt_nulls_ordering(&mut self) -> Option<NullOrdering> {
        if !self.check_keyword(Keyword::Nulls) {
            return None;
        }
        let nulls = match self.peek_keyword(1) {
            Some(Keyword::First) => NullOrdering::First,
            Some(Keyword::Last) => NullOrdering::Last,
            _ => return None,
        };
        self.advance();
        self.advance();
        Some(nulls)
    }

    /// Parses a plain or `OPERATOR(...)` operator, returned as text.
    fn parse_any_operator(&mut self) -> Result<String> {
        if self.at_qualified_operator() {
            return Ok(self.parse_qualified_operator()?.to_string());
        }
        match self.current.kind.operator_text() {
            Some(text) => {
                let text = text.to_string();
                self.advance();
                Ok(text)
            }
            None => Err(self.unexpected("operator")),
        }
    }

    fn parse_over_clause(&mut self) -> Result<WindowRef> {
        if self.check(&TokenKind::LeftParen) {
            Ok(WindowRef::Spec(self.parse_window_specification()?))
        } else {
            Ok(WindowRef::Named(self.parse_col_id()?))
        }
    }

    /// Parses `( [existing] [PARTITION BY ...] [ORDER BY ...] [frame] )`.
    pub(super) fn parse_window_specification(&mut self) -> Result<WindowSpec> {
        let start = self.current.span.start;
        self.expect(&TokenKind::LeftParen)?;
        let frame_keyword = matches!(
            self.current.kind.keyword(),
            Some(Keyword::Partition | Keyword::Range | Keyword::Rows | Keyword::Groups)
        );
        let existing = if self.at_col_id() && !frame_keyword {
            Some(self.parse_col_id()?)
        } else {
            None
        };
        let partition_by = if self.consume_keywords(&[Keyword::Partition, Keyword::By]) {
            self.parse_expr_list()?
        } else {
            Vec::new()
        };
        let order_by = if self.consume_keywords(&[Keyword::Order, Keyword::By]) {
            self.parse_order_by_list()?
        } else {
            Vec::new()
        };
        let frame = self.parse_opt_window_frame()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(WindowSpec {
            existing,
            partition_by,
            order_by,
            frame,
            span: self.span_from(start).into(),
        })
    }

    fn parse_opt_window_frame(&mut self) -> Result<Option<WindowFrame>> {
        let units = match self.current.kind.keyword() {
            Some(Keyword::Rows) => FrameUnits::Rows,
            Some(Keyword::Range) => FrameUnits::Range,
            Some(Keyword::Groups) => FrameUnits::Groups,
            _ => return Ok(None),
        };
        let start_offset = self.current.span.start;
        self.advance();
        let (start, end) = if self.consume_keyword(Keyword::Between) {
            let start = self.parse_frame_bound()?;
            self.expect_keyword(Keyword::And)?;
            (start, Some(self.parse_frame_bound()?))
        } else {
            (self.parse_frame_bound()?, None)
        };
        let exclusion = if self.consume_keyword(Keyword::Exclude) {
            Some(match self.current.kind.keyword() {
                Some(Keyword::Current) => {
                    self.advance();
                    self.expect_keyword(Keyword::Row)?;
                    FrameExclusion::CurrentRow
                }
                Some(Keyword::Group) => {
                    self.advance();
                    FrameExclusion::Group
                }
                Some(Keyword::Ties) => {
                    self.advance();
                    FrameExclusion::Ties
                }
                Some(Keyword::No) => {
                    self.advance();
                    self.expect_keyword(Keyword::Others)?;
                    FrameExclusion::NoOthers
                }
                _ => return Err(self.unexpected("CURRENT ROW, GROUP, TIES or NO OTHERS")),
            })
        } else {
            None
        };
        let frame = WindowFrame {
            units,
            start,
            end,
            exclusion,
        };
        self.check_window_frame(&frame, self.span_from(start_offset))?;
        Ok(Some(frame))
    }

    fn parse_frame_bound(&mut self) -> Result<FrameBound> {
        if self.consume_keyword(Keyword::Unbounded) {
            if self.consume_keyword(Keyword::Preceding) {
                return Ok(FrameBound::UnboundedPreceding);
            }
            self.expect_keyword(Keyword::Following)?;
            return Ok(FrameBound::UnboundedFollowing);
        }
        if self.consume_keywords(&[Keyword::Current, Keyword::Row]) {
            return Ok(FrameBound::CurrentRow);
        }
        let offset = Box::new(self.parse_expr()?);
        if self.consume_keyword(Keyword::Preceding) {
            Ok(FrameBound::Preceding(offset))
        } else if self.consume_keyword(Keyword::Following) {
            Ok(FrameBound::Following(offset))
        } else {
            Err(self.unexpected("PRECEDING or FOLLOWING"))
        }
    }
}

/// Maps a normal-form keyword to its form.
const fn normal_form(kw: Keyword) -> Option<NormalForm> {
    match kw {
        Keyword::Nfc => Some(NormalForm::Nfc),
        Keyword::Nfd => Some(NormalForm::Nfd),
        Keyword::Nfkc => Some(NormalForm::Nfkc),
        Keyword::Nfkd => Some(NormalForm::Nfkd),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserOptions;
    use crate::error::Error;

    fn expr(sql: &str) -> Expr {
        let mut parser = Parser::new(sql);
        let expr = parser.parse_expr().unwrap();
        assert!(parser.current.is_eof(), "trailing input in {sql:?}");
        expr
    }

    fn expr_err(sql: &str) -> Error {
        let mut parser = Parser::new(sql);
        match parser.parse_expr() {
            Ok(expr) if parser.current.is_eof() => panic!("{sql:?} parsed as {expr:?}"),
            Ok(_) => parser.unexpected("end of input"),
            Err(e) => e,
        }
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        let e = expr("1 + 2 * 3");
        let ExprKind::Binary { op, right, .. } = e.kind else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Plus);
        assert!(matches!(
            right.kind,
            ExprKind::Binary {
                op: BinaryOp::Multiply,
                ..
            }
        ));
    }

    #[test]
    fn test_json_operators_left_associative() {
        let e = expr("data->'a'->>'b'");
        let ExprKind::Binary { left, op, .. } = e.kind else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::LongArrow);
        assert!(matches!(
            left.kind,
            ExprKind::Binary {
                op: BinaryOp::Arrow,
                ..
            }
        ));
    }

    #[test]
    fn test_comparison_does_not_chain() {
        assert!(matches!(expr_err("a < b < c"), Error::Parse(_)));
        assert!(matches!(expr_err("a IS NULL IS NULL"), Error::Parse(_)));
        // A lower-precedence operator in between is fine.
        expr("a < b AND b < c");
    }

    #[test]
    fn test_minus_folds_into_literal() {
        assert_eq!(expr("-5").kind, ExprKind::Literal(Literal::Integer(-5)));
        assert_eq!(expr("- -5").kind, ExprKind::Literal(Literal::Integer(5)));
        assert_eq!(
            expr("-1.5").kind,
            ExprKind::Literal(Literal::Numeric(String::from("-1.5")))
        );
        assert_eq!(
            expr("-9223372036854775808").kind,
            ExprKind::Literal(Literal::Integer(i64::MIN))
        );
        assert!(matches!(
            expr("-a").kind,
            ExprKind::Unary {
                op: UnaryOp::Minus,
                ..
            }
        ));
    }

    #[test]
    fn test_minus_span_covers_sign() {
        let e = expr("-  42");
        assert_eq!(e.span.get(), Span::new(0, 5));
    }

    #[test]
    fn test_between_low_bound_is_restricted() {
        let e = expr("a BETWEEN 1 AND 2 AND b");
        let ExprKind::Binary { left, op, .. } = e.kind else {
            panic!("expected AND");
        };
        assert_eq!(op, BinaryOp::And);
        assert!(matches!(left.kind, ExprKind::Between { .. }));
    }

    #[test]
    fn test_question_mark_duality() {
        let e = expr("? + ?");
        let ExprKind::Binary { left, right, .. } = e.kind else {
            panic!("expected binary");
        };
        assert_eq!(left.kind, ExprKind::Parameter(Parameter::Marker(1)));
        assert_eq!(right.kind, ExprKind::Parameter(Parameter::Marker(2)));

        let e = expr("doc ? 'key'");
        assert!(matches!(
            e.kind,
            ExprKind::Binary {
                op: BinaryOp::Question,
                ..
            }
        ));

        let options = ParserOptions::default().allow_question_mark_parameters(false);
        let mut parser = Parser::with_options("?", options);
        assert!(parser.parse_expr().is_err());
    }

    #[test]
    fn test_parenthesised_forms() {
        assert_eq!(expr("(a)").kind, expr("a").kind);
        assert!(matches!(
            expr("(a, b)").kind,
            ExprKind::Row {
                explicit: false,
                ..
            }
        ));
        assert!(matches!(expr("(SELECT 1)").kind, ExprKind::Subquery(_)));
        assert!(matches!(
            expr("((SELECT 1) UNION (SELECT 2))").kind,
            ExprKind::Subquery(_)
        ));
    }

    #[test]
    fn test_quantified_comparison() {
        let e = expr("a = ANY (ARRAY[1, 2])");
        assert!(matches!(
            e.kind,
            ExprKind::Quantified {
                quantifier: Quantifier::Any,
                right: QuantifiedRhs::Expr(_),
                ..
            }
        ));
        let e = expr("a <> SOME (SELECT b FROM t)");
        assert!(matches!(
            e.kind,
            ExprKind::Quantified {
                quantifier: Quantifier::Any,
                right: QuantifiedRhs::Subquery(_),
                ..
            }
        ));
        let e = expr("a NOT LIKE ALL (p)");
        let ExprKind::Quantified { op, .. } = e.kind else {
            panic!("expected quantified");
        };
        assert_eq!(op, BinaryOp::Custom(String::from("!~~")));
        assert!(expr_err("a SIMILAR TO ANY (p)").to_string().contains("ANY"));
    }

    #[test]
    fn test_in_list_and_subquery() {
        assert!(matches!(
            expr("a NOT IN (1, 2)").kind,
            ExprKind::InList { negated: true, .. }
        ));
        assert!(matches!(
            expr("a IN (SELECT b FROM t)").kind,
            ExprKind::InSubquery { .. }
        ));
        assert!(matches!(
            expr("a IN ((SELECT b FROM t))").kind,
            ExprKind::InSubquery { .. }
        ));
    }

    #[test]
    fn test_is_tests() {
        assert!(matches!(
            expr("a IS NOT DISTINCT FROM b").kind,
            ExprKind::IsDistinctFrom { negated: true, .. }
        ));
        assert!(matches!(
            expr("a IS NFKC NORMALIZED").kind,
            ExprKind::IsNormalized {
                form: Some(NormalForm::Nfkc),
                ..
            }
        ));
        assert!(matches!(
            expr("a NOTNULL").kind,
            ExprKind::IsNull { negated: true, .. }
        ));
    }

    #[test]
    fn test_typed_literals() {
        let e = expr("DATE '2024-01-01'");
        let ExprKind::TypedString { data_type, value } = e.kind else {
            panic!("expected typed string");
        };
        assert_eq!(value, "2024-01-01");
        assert_eq!(data_type.to_string(), "date");

        let e = expr("INTERVAL '1' DAY TO SECOND(3)");
        let ExprKind::TypedString { data_type, .. } = e.kind else {
            panic!("expected typed string");
        };
        assert_eq!(data_type.to_string(), "INTERVAL DAY TO SECOND(3)");

        let e = expr("TIMESTAMP WITH TIME ZONE 'now'");
        assert!(matches!(e.kind, ExprKind::TypedString { .. }));
    }

    #[test]
    fn test_special_functions() {
        assert!(matches!(
            expr("EXTRACT(YEAR FROM d)").kind,
            ExprKind::Extract { .. }
        ));
        assert!(matches!(
            expr("SUBSTRING(s FOR 2 FROM 1)").kind,
            ExprKind::Substring { .. }
        ));
        assert!(matches!(
            expr("substring(s, 1, 2)").kind,
            ExprKind::Function(_)
        ));
        assert!(matches!(
            expr("TRIM(LEADING 'x' FROM s)").kind,
            ExprKind::Trim {
                side: Some(TrimSide::Leading),
                ..
            }
        ));
        assert!(matches!(
            expr("POSITION('a' IN s)").kind,
            ExprKind::Position { .. }
        ));
        assert!(matches!(
            expr("CURRENT_TIMESTAMP(3)").kind,
            ExprKind::ValueFunction {
                func: ValueFunction::CurrentTimestamp,
                precision: Some(3)
            }
        ));
    }

    #[test]
    fn test_aggregate_clauses() {
        let e = expr("percentile_cont(0.5) WITHIN GROUP (ORDER BY x) FILTER (WHERE x > 0)");
        let ExprKind::Function(call) = e.kind else {
            panic!("expected function");
        };
        assert_eq!(call.within_group.len(), 1);
        assert!(call.filter.is_some());

        assert!(matches!(
            expr_err("f(DISTINCT x) WITHIN GROUP (ORDER BY x)"),
            Error::Semantic(_)
        ));
    }

    #[test]
    fn test_variadic_must_be_last() {
        expr("f(a, VARIADIC b)");
        assert!(matches!(expr_err("f(VARIADIC a, b)"), Error::Parse(_)));
    }

    #[test]
    fn test_window_frame_validation() {
        expr("sum(x) OVER (ORDER BY y ROWS BETWEEN 1 PRECEDING AND CURRENT ROW)");
        let err = expr_err("sum(x) OVER (ROWS UNBOUNDED FOLLOWING)");
        assert!(err
            .to_string()
            .contains("frame start cannot be UNBOUNDED FOLLOWING"));
        let err = expr_err("sum(x) OVER (ROWS BETWEEN CURRENT ROW AND 1 PRECEDING)");
        assert!(matches!(err, Error::Semantic(_)));
    }

    #[test]
    fn test_postfix_chain() {
        let e = expr("(a).b[1]::text");
        let ExprKind::Cast { expr: inner, .. } = e.kind else {
            panic!("expected cast");
        };
        assert!(matches!(inner.kind, ExprKind::Subscript { .. }));
        assert!(matches!(expr("a[1:]").kind, ExprKind::Slice { upper: None, .. }));
    }

    #[test]
    fn test_overlaps_requires_pairs() {
        expr("(a, b) OVERLAPS (c, d)");
        let err = expr_err("(a, b, c) OVERLAPS (c, d)");
        assert!(err.to_string().contains("left side of OVERLAPS"));
    }
}
