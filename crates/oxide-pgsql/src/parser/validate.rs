//! Cross-clause checks.
//!
//! These run once the tokens of a clause have been accepted by the grammar
//! and reject combinations PostgreSQL reports as errors, such as a frame
//! that ends before it starts or an `INSERT` with more values than columns.
//! All of them produce [`SemanticError`](super::SemanticError)s.

use std::collections::HashSet;

use super::parser::Parser;
use crate::ast::{
    Expr, ExprKind, FrameBound, InsertSource, SequenceOption, SetExpr, TargetColumn,
    TransactionMode, TypeKind, WindowFrame,
};
use crate::error::Result;
use crate::lexer::Span;

impl<'a> Parser<'a> {
    /// Both sides of `OVERLAPS` must be two-element rows.
    pub(super) fn check_overlaps(&self, lhs: &Expr, rhs: &Expr) -> Result<()> {
        if !is_pair(lhs) {
            return Err(self.semantic(
                "wrong number of parameters on left side of OVERLAPS expression",
                lhs.span.get(),
            ));
        }
        if !is_pair(rhs) {
            return Err(self.semantic(
                "wrong number of parameters on right side of OVERLAPS expression",
                rhs.span.get(),
            ));
        }
        Ok(())
    }

    pub(super) fn check_window_frame(&self, frame: &WindowFrame, span: Span) -> Result<()> {
        if frame.start == FrameBound::UnboundedFollowing {
            return Err(self.semantic("frame start cannot be UNBOUNDED FOLLOWING", span));
        }
        let Some(end) = &frame.end else {
            if matches!(frame.start, FrameBound::Following(_)) {
                return Err(self.semantic(
                    "frame starting from following row cannot end with current row",
                    span,
                ));
            }
            return Ok(());
        };
        if *end == FrameBound::UnboundedPreceding {
            return Err(self.semantic("frame end cannot be UNBOUNDED PRECEDING", span));
        }
        match (&frame.start, end) {
            (FrameBound::CurrentRow, FrameBound::Preceding(_)) => Err(self.semantic(
                "frame starting from current row cannot have preceding rows",
                span,
            )),
            (FrameBound::Following(_), FrameBound::Preceding(_)) => Err(self.semantic(
                "frame starting from following row cannot have preceding rows",
                span,
            )),
            (FrameBound::Following(_), FrameBound::CurrentRow) => Err(self.semantic(
                "frame starting from following row cannot end with current row",
                span,
            )),
            _ => Ok(()),
        }
    }

    /// Maps `float(p)` to `real` or `double precision`.
    pub(super) fn float_kind(&self, precision: i64, span: Span) -> Result<TypeKind> {
        match precision {
            p if p < 1 => Err(self.semantic("precision for type float must be at least 1 bit", span)),
            1..=24 => Ok(TypeKind::Real),
            25..=53 => Ok(TypeKind::Double),
            _ => Err(self.semantic("precision for type float must be less than 54 bits", span)),
        }
    }

    pub(super) fn check_values_rows(&self, rows: &[Vec<Expr>], span: Span) -> Result<()> {
        let Some(first) = rows.first() else {
            return Ok(());
        };
        if rows.iter().any(|row| row.len() != first.len()) {
            return Err(self.semantic("VALUES lists must all be the same length", span));
        }
        Ok(())
    }

    /// Checks an `INSERT` source against its target column list.
    pub(super) fn check_insert_source(
        &self,
        columns: &[TargetColumn],
        source: &InsertSource,
        span: Span,
    ) -> Result<()> {
        let InsertSource::Query(query) = source else {
            return Ok(());
        };
        if let SetExpr::SetOperation { .. } = &query.body {
            let (values, selects) = count_set_leaves(&query.body);
            if values > 0 && selects > 0 {
                return Err(self.semantic(
                    "INSERT has both a VALUES list and a sub-SELECT",
                    span,
                ));
            }
        }
        if columns.is_empty() {
            return Ok(());
        }
        let SetExpr::Values(values) = &query.body else {
            return Ok(());
        };
        let Some(width) = values.rows.first().map(Vec::len) else {
            return Ok(());
        };
        if width > columns.len() {
            return Err(self.semantic("INSERT has more expressions than target columns", span));
        }
        if width < columns.len() {
            return Err(self.semantic("INSERT has more target columns than expressions", span));
        }
        Ok(())
    }

    /// Checks the source of `SET (a, b) = source`.
    pub(super) fn check_multi_assignment(
        &self,
        columns: &[TargetColumn],
        value: &Expr,
    ) -> Result<()> {
        match &value.kind {
            ExprKind::Row { exprs, .. } if exprs.len() != columns.len() => Err(self.semantic(
                "number of columns does not match number of values",
                value.span.get(),
            )),
            ExprKind::Row { .. } | ExprKind::Subquery(_) => Ok(()),
            _ => Err(self.semantic(
                "source for a multiple-column UPDATE item must be a sub-SELECT or ROW() expression",
                value.span.get(),
            )),
        }
    }

    /// Rejects a sequence option given twice.
    pub(super) fn check_sequence_options(
        &self,
        options: &[SequenceOption],
        span: Span,
    ) -> Result<()> {
        let mut seen = HashSet::new();
        for option in options {
            if !seen.insert(option.name()) {
                return Err(self.semantic("conflicting or redundant options", span));
            }
        }
        Ok(())
    }

    /// Rejects two transaction modes that set the same characteristic.
    pub(super) fn check_transaction_modes(
        &self,
        modes: &[TransactionMode],
        span: Span,
    ) -> Result<()> {
        let mut seen = [false; 3];
        for mode in modes {
            let group = usize::from(mode.group());
            if seen[group] {
                return Err(self.semantic("conflicting or redundant options", span));
            }
            seen[group] = true;
        }
        Ok(())
    }
}

fn is_pair(expr: &Expr) -> bool {
    matches!(&expr.kind, ExprKind::Row { exprs, .. } if exprs.len() == 2)
}

/// Counts the `VALUES` and `SELECT` operands of a set operation tree.
fn count_set_leaves(body: &SetExpr) -> (usize, usize) {
    match body {
        SetExpr::Values(_) => (1, 0),
        SetExpr::Select(_) | SetExpr::Table(_) => (0, 1),
        SetExpr::Query(query) => count_set_leaves(&query.body),
        SetExpr::SetOperation { left, right, .. } => {
            let (lv, ls) = count_set_leaves(left);
            let (rv, rs) = count_set_leaves(right);
            (lv + rv, ls + rs)
        }
    }
}
