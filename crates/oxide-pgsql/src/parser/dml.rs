//! `INSERT`, `UPDATE` and `DELETE`.

use super::parser::Parser;
use crate::ast::{
    Assignment, ConflictAction, ConflictTarget, DeleteStatement, Ident, IndexElem, Indirection,
    InsertSource, InsertStatement, OnConflict, OrderDirection, Overriding, SelectItem, Selection,
    TargetColumn, UpdateStatement, With,
};
use crate::error::Result;
use crate::lexer::{Keyword, TokenKind};

impl<'a> Parser<'a> {
    /// Parses `INSERT INTO ...`; `start` is the offset of a leading `WITH`.
    pub(super) fn parse_insert(
        &mut self,
        with: Option<With>,
        start: usize,
    ) -> Result<InsertStatement> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;
        let table = self.parse_qualified_name()?;
        let alias = if self.consume_keyword(Keyword::As) {
            Some(self.parse_col_id()?)
        } else {
            None
        };
        let columns = if self.check(&TokenKind::LeftParen) && !self.paren_starts_query() {
            self.advance();
            let columns = self.parse_comma_list(Self::parse_target_column)?;
            self.expect(&TokenKind::RightParen)?;
            columns
        } else {
            Vec::new()
        };

        let overriding = if self.consume_keyword(Keyword::Overriding) {
            let overriding = if self.consume_keyword(Keyword::System) {
                Overriding::System
            } else {
                self.expect_keyword(Keyword::User)?;
                Overriding::User
            };
            self.expect_keyword(Keyword::Value)?;
            Some(overriding)
        } else {
            None
        };

        let source_start = self.current.span.start;
        let source = if self.consume_keywords(&[Keyword::Default, Keyword::Values]) {
            InsertSource::DefaultValues
        } else {
            InsertSource::Query(self.parse_boxed_query()?)
        };
        self.check_insert_source(&columns, &source, self.span_from(source_start))?;

        let on_conflict = if self.check_keyword(Keyword::On)
            && self.peek_keyword(1) == Some(Keyword::Conflict)
        {
            Some(self.parse_on_conflict()?)
        } else {
            None
        };
        let returning = self.parse_returning()?;

        Ok(InsertStatement {
            with,
            table,
            alias,
            columns,
            overriding,
            source,
            on_conflict,
            returning,
            span: self.span_from(start).into(),
        })
    }

    fn parse_on_conflict(&mut self) -> Result<OnConflict> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::On)?;
        self.expect_keyword(Keyword::Conflict)?;

        let target = if self.consume(&TokenKind::LeftParen) {
            let columns = self.parse_comma_list(Self::parse_index_elem)?;
            self.expect(&TokenKind::RightParen)?;
            let selection = if self.consume_keyword(Keyword::Where) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            Some(ConflictTarget::Columns { columns, selection })
        } else if self.consume_keywords(&[Keyword::On, Keyword::Constraint]) {
            Some(ConflictTarget::Constraint(self.parse_col_id()?))
        } else {
            None
        };

        self.expect_keyword(Keyword::Do)?;
        let action = if self.consume_keyword(Keyword::Nothing) {
            ConflictAction::DoNothing
        } else {
            self.expect_keyword(Keyword::Update)?;
            self.expect_keyword(Keyword::Set)?;
            let assignments = self.parse_comma_list(Self::parse_assignment)?;
            let selection = if self.consume_keyword(Keyword::Where) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            ConflictAction::DoUpdate {
                assignments,
                selection,
            }
        };

        let span = self.span_from(start);
        if target.is_none() && matches!(action, ConflictAction::DoUpdate { .. }) {
            return Err(self.semantic(
                "ON CONFLICT DO UPDATE requires inference specification or constraint name",
                span,
            ));
        }
        Ok(OnConflict {
            target,
            action,
            span: span.into(),
        })
    }

    /// `index_elem` of an inference clause.
    fn parse_index_elem(&mut self) -> Result<IndexElem> {
        let start = self.current.span.start;
        let expr = self.parse_c_expr()?;
        let collation = if self.consume_keyword(Keyword::Collate) {
            Some(self.parse_qualified_name()?)
        } else {
            None
        };
        let nulls_follow = self.check_keyword(Keyword::Nulls)
            && matches!(self.peek_keyword(1), Some(Keyword::First | Keyword::Last));
        let opclass = if self.at_col_id() && !nulls_follow {
            Some(self.parse_qualified_name()?)
        } else {
            None
        };
        let direction = if self.consume_keyword(Keyword::Asc) {
            Some(OrderDirection::Asc)
        } else if self.consume_keyword(Keyword::Desc) {
            Some(OrderDirection::Desc)
        } else {
            None
        };
        let nulls = self.parse_opt_nulls_ordering();
        Ok(IndexElem {
            expr,
            collation,
            opclass,
            direction,
            nulls,
            span: self.span_from(start).into(),
        })
    }

    /// `ColId opt_indirection` as the target of an assignment.
    fn parse_target_column(&mut self) -> Result<TargetColumn> {
        let start = self.current.span.start;
        let name = self.parse_col_id()?;
        let mut indirection = Vec::new();
        loop {
            if self.consume(&TokenKind::Dot) {
                if self.check(&TokenKind::Star) {
                    return Err(self.semantic(
                        "row expansion via \"*\" is not supported here",
                        self.current.span,
                    ));
                }
                indirection.push(Indirection::Field(self.parse_col_label()?));
            } else if self.consume(&TokenKind::LeftBracket) {
                let lower = if self.check(&TokenKind::Colon) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                let step = if self.consume(&TokenKind::Colon) {
                    let upper = if self.check(&TokenKind::RightBracket) {
                        None
                    } else {
                        Some(self.parse_expr()?)
                    };
                    Indirection::Slice { lower, upper }
                } else {
                    let Some(index) = lower else {
                        return Err(self.unexpected("expression"));
                    };
                    Indirection::Subscript(index)
                };
                self.expect(&TokenKind::RightBracket)?;
                indirection.push(step);
            } else {
                break;
            }
        }
        Ok(TargetColumn {
            name,
            indirection,
            span: self.span_from(start).into(),
        })
    }

    /// Parses `col = value` or `(col, ...) = source`.
    fn parse_assignment(&mut self) -> Result<Assignment> {
        let start = self.current.span.start;
        let (columns, multi) = if self.consume(&TokenKind::LeftParen) {
            let columns = self.parse_comma_list(Self::parse_target_column)?;
            self.expect(&TokenKind::RightParen)?;
            (columns, true)
        } else {
            (vec![self.parse_target_column()?], false)
        };
        self.expect(&TokenKind::Eq)?;
        let value = self.parse_expr()?;
        if multi {
            self.check_multi_assignment(&columns, &value)?;
        }
        Ok(Assignment {
            columns,
            value,
            multi,
            span: self.span_from(start).into(),
        })
    }

    /// Parses `UPDATE ...`; `start` is the offset of a leading `WITH`.
    pub(super) fn parse_update(
        &mut self,
        with: Option<With>,
        start: usize,
    ) -> Result<UpdateStatement> {
        self.expect_keyword(Keyword::Update)?;
        let table = self.parse_relation_expr()?;
        let alias = self.parse_dml_alias(Some(Keyword::Set))?;
        self.expect_keyword(Keyword::Set)?;
        let assignments = self.parse_comma_list(Self::parse_assignment)?;
        let from = if self.consume_keyword(Keyword::From) {
            self.parse_from_list()?
        } else {
            Vec::new()
        };
        let selection = self.parse_dml_selection()?;
        let returning = self.parse_returning()?;
        Ok(UpdateStatement {
            with,
            table,
            alias,
            assignments,
            from,
            selection,
            returning,
            span: self.span_from(start).into(),
        })
    }

    /// Parses `DELETE FROM ...`; `start` is the offset of a leading `WITH`.
    pub(super) fn parse_delete(
        &mut self,
        with: Option<With>,
        start: usize,
    ) -> Result<DeleteStatement> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        let table = self.parse_relation_expr()?;
        let alias = self.parse_dml_alias(None)?;
        let using = if self.consume_keyword(Keyword::Using) {
            self.parse_from_list()?
        } else {
            Vec::new()
        };
        let selection = self.parse_dml_selection()?;
        let returning = self.parse_returning()?;
        Ok(DeleteStatement {
            with,
            table,
            alias,
            using,
            selection,
            returning,
            span: self.span_from(start).into(),
        })
    }

    // --- Helpers ---

    /// Parses `[AS] alias` after the target of `UPDATE` / `DELETE`. Without
    /// `AS`, `stop` is not taken as an alias.
    fn parse_dml_alias(&mut self, stop: Option<Keyword>) -> Result<Option<Ident>> {
        if self.consume_keyword(Keyword::As) {
            return Ok(Some(self.parse_col_id()?));
        }
        let stopped = stop.is_some_and(|kw| self.check_keyword(kw));
        if self.at_col_id() && !stopped {
            Ok(Some(self.parse_col_id()?))
        } else {
            Ok(None)
        }
    }

    /// Parses `WHERE condition` or `WHERE CURRENT OF cursor`.
    fn parse_dml_selection(&mut self) -> Result<Option<Selection>> {
        if !self.consume_keyword(Keyword::Where) {
            return Ok(None);
        }
        if self.consume_keywords(&[Keyword::Current, Keyword::Of]) {
            return Ok(Some(Selection::CurrentOf(self.parse_col_id()?)));
        }
        Ok(Some(Selection::Condition(self.parse_expr()?)))
    }

    fn parse_returning(&mut self) -> Result<Vec<SelectItem>> {
        if self.consume_keyword(Keyword::Returning) {
            self.parse_target_list()
        } else {
            Ok(Vec::new())
        }
    }
}
