//! Query parsing: `WITH`, set operations, `SELECT`, `VALUES`, `FROM` items
//! and the trailing `ORDER BY` / `LIMIT` / `OFFSET` / `FOR UPDATE` clauses.

use super::parser::Parser;
use crate::ast::{
    ColumnDef, Cte, Distinct, Expr, ExprKind, GroupingElement, IntoClause, Join, JoinConstraint,
    JoinKind, LimitClause, LockStrength, LockWait, LockingClause, NamedWindow, ObjectName,
    Persistence, Query, RelationExpr, RowsFromItem, Select, SelectItem, SetExpr, SetOperator,
    SetQuantifier, SourceSpan, Statement, TableAlias, TableRef, TableRefKind, TableSample,
    Values, With, XmlNamespace, XmlTable, XmlTableColumn, XmlTableColumnKind,
};
use crate::error::Result;
use crate::lexer::{Keyword, TokenKind};

impl<'a> Parser<'a> {
    // --- Queries ---

    /// Parses a complete query, including an optional leading `WITH`.
    pub(super) fn parse_query(&mut self) -> Result<Query> {
        let start = self.current.span.start;
        self.nested(|p| {
            let with = if p.check_keyword(Keyword::With) {
                Some(p.parse_with_clause()?)
            } else {
                None
            };
            let body = p.parse_set_expr(0)?;
            p.finish_query(with, body, start)
        })
    }

    /// Parses a query whose `WITH` clause has already been consumed.
    pub(super) fn parse_query_with(&mut self, with: Option<With>, start: usize) -> Result<Query> {
        self.nested(|p| {
            let body = p.parse_set_expr(0)?;
            p.finish_query(with, body, start)
        })
    }

    /// Parses a query straight into a box.
    pub(super) fn parse_boxed_query(&mut self) -> Result<Box<Query>> {
        self.parse_query().map(Box::new)
    }

    /// Continues a query whose first parenthesised operand has already been
    /// parsed: `(SELECT 1) UNION (SELECT 2)`, `(SELECT 1) ORDER BY 1`.
    pub(super) fn continue_query(&mut self, first: Box<Query>, start: usize) -> Result<Box<Query>> {
        let first = Self::set_operand(first);
        let body = self.parse_set_expr_from(first, 0)?;
        self.finish_query(None, body, start).map(Box::new)
    }

    /// Parses `WITH [RECURSIVE] cte, ...`.
    pub(super) fn parse_with_clause(&mut self) -> Result<With> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::With)?;
        let recursive = self.consume_keyword(Keyword::Recursive);
        let ctes = self.parse_comma_list(Self::parse_cte)?;
        Ok(With {
            recursive,
            ctes,
            span: self.span_from(start).into(),
        })
    }

    fn parse_cte(&mut self) -> Result<Cte> {
        let start = self.current.span.start;
        let name = self.parse_col_id()?;
        let columns = if self.check(&TokenKind::LeftParen) {
            self.parse_paren_name_list()?
        } else {
            Vec::new()
        };
        self.expect_keyword(Keyword::As)?;
        let materialized = if self.consume_keyword(Keyword::Materialized) {
            Some(true)
        } else if self.consume_keywords(&[Keyword::Not, Keyword::Materialized]) {
            Some(false)
        } else {
            None
        };
        self.expect(&TokenKind::LeftParen)?;
        let statement = match self.current.kind.keyword() {
            Some(Keyword::Insert | Keyword::Update | Keyword::Delete) => self.parse_stmt()?,
            _ if self.at_query_start() || self.check(&TokenKind::LeftParen) => {
                Statement::Select(self.parse_boxed_query()?)
            }
            _ => return Err(self.unexpected("SELECT, VALUES, INSERT, UPDATE or DELETE")),
        };
        self.expect(&TokenKind::RightParen)?;
        Ok(Cte {
            name,
            columns,
            materialized,
            statement: Box::new(statement),
            span: self.span_from(start).into(),
        })
    }

    // --- Set operations ---

    fn parse_set_expr(&mut self, min_prec: u8) -> Result<SetExpr> {
        let left = self.parse_set_primary()?;
        self.parse_set_expr_from(left, min_prec)
    }

    fn parse_set_expr_from(&mut self, mut left: SetExpr, min_prec: u8) -> Result<SetExpr> {
        loop {
            let op = match self.current.kind.keyword() {
                Some(Keyword::Union) => SetOperator::Union,
                Some(Keyword::Intersect) => SetOperator::Intersect,
                Some(Keyword::Except) => SetOperator::Except,
                _ => break,
            };
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.extend_chain()?;
            self.advance();
            let quantifier = if self.consume_keyword(Keyword::All) {
                SetQuantifier::All
            } else if self.consume_keyword(Keyword::Distinct) {
                SetQuantifier::Distinct
            } else {
                SetQuantifier::None
            };
            let right = self.nested(|p| p.parse_set_expr(prec + 1))?;
            left = SetExpr::SetOperation {
                op,
                quantifier,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_set_primary(&mut self) -> Result<SetExpr> {
        match self.current.kind.keyword() {
            Some(Keyword::Select) => Ok(SetExpr::Select(Box::new(self.parse_simple_select()?))),
            Some(Keyword::Values) => Ok(SetExpr::Values(self.parse_values()?)),
            Some(Keyword::Table) => {
                self.advance();
                Ok(SetExpr::Table(self.parse_relation_expr()?))
            }
            _ if self.check(&TokenKind::LeftParen) => {
                self.advance();
                let query = self.parse_boxed_query()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(Self::set_operand(query))
            }
            _ => Err(self.unexpected("SELECT, VALUES, TABLE or \"(\"")),
        }
    }

    /// Unwraps a parenthesised query that has no clauses of its own.
    fn set_operand(query: Box<Query>) -> SetExpr {
        if query.is_bare() {
            query.body
        } else {
            SetExpr::Query(query)
        }
    }

    /// Parses the trailing clauses and folds them into a parenthesised body.
    fn finish_query(&mut self, with: Option<With>, body: SetExpr, start: usize) -> Result<Query> {
        let order_by = if self.consume_keywords(&[Keyword::Order, Keyword::By]) {
            self.parse_order_by_list()?
        } else {
            Vec::new()
        };
        let mut clauses = Query::from_body(body, SourceSpan::default());
        clauses.with = with;
        clauses.order_by = order_by;
        if self.at_locking_clause() {
            clauses.locking = self.parse_locking_clauses()?;
            self.parse_select_limit(&mut clauses)?;
        } else {
            self.parse_select_limit(&mut clauses)?;
            clauses.locking = self.parse_locking_clauses()?;
        }
        let span = self.span_from(start);

        let Query {
            with,
            body,
            order_by,
            limit,
            offset,
            locking,
            ..
        } = clauses;
        let mut query = match body {
            SetExpr::Query(inner) => *inner,
            body => Query::from_body(body, SourceSpan::default()),
        };
        if let Some(with) = with {
            if query.with.is_some() {
                return Err(self.semantic("multiple WITH clauses not allowed", span));
            }
            query.with = Some(with);
        }
        if !order_by.is_empty() {
            if !query.order_by.is_empty() {
                return Err(self.semantic("multiple ORDER BY clauses not allowed", span));
            }
            query.order_by = order_by;
        }
        if let Some(limit) = limit {
            if query.limit.is_some() {
                return Err(self.semantic("multiple LIMIT clauses not allowed", span));
            }
            query.limit = Some(limit);
        }
        if let Some(offset) = offset {
            if query.offset.is_some() {
                return Err(self.semantic("multiple OFFSET clauses not allowed", span));
            }
            query.offset = Some(offset);
        }
        query.locking.extend(locking);

        let with_ties = matches!(
            query.limit,
            Some(LimitClause::FetchFirst {
                with_ties: true,
                ..
            })
        );
        if with_ties && query.order_by.is_empty() {
            return Err(self.semantic(
                "WITH TIES cannot be specified without ORDER BY clause",
                span,
            ));
        }
        query.span = span.into();
        Ok(query)
    }

    /// Parses `LIMIT`, `OFFSET` and `FETCH FIRST` in any order.
    fn parse_select_limit(&mut self, query: &mut Query) -> Result<()> {
        loop {
            let start = self.current.span.start;
            match self.current.kind.keyword() {
                Some(Keyword::Limit) => {
                    self.advance();
                    let limit = if self.consume_keyword(Keyword::All) {
                        LimitClause::All
                    } else {
                        LimitClause::Limit(self.parse_expr()?)
                    };
                    if self.check(&TokenKind::Comma) {
                        return Err(self.semantic(
                            "LIMIT #,# syntax is not supported",
                            self.span_from(start),
                        ));
                    }
                    self.set_limit(query, limit, start)?;
                }
                Some(Keyword::Fetch)
                    if matches!(self.peek_keyword(1), Some(Keyword::First | Keyword::Next)) =>
                {
                    self.advance();
                    self.advance();
                    let limit = self.parse_fetch_first()?;
                    self.set_limit(query, limit, start)?;
                }
                Some(Keyword::Offset) => {
                    self.advance();
                    let offset = self.parse_expr()?;
                    if !self.consume_keyword(Keyword::Row) {
                        self.consume_keyword(Keyword::Rows);
                    }
                    if query.offset.is_some() {
                        return Err(self.semantic(
                            "multiple OFFSET clauses not allowed",
                            self.span_from(start),
                        ));
                    }
                    query.offset = Some(offset);
                }
                _ => return Ok(()),
            }
        }
    }

    fn set_limit(&self, query: &mut Query, limit: LimitClause, start: usize) -> Result<()> {
        if query.limit.is_some() {
            return Err(self.semantic(
                "multiple LIMIT clauses not allowed",
                self.span_from(start),
            ));
        }
        query.limit = Some(limit);
        Ok(())
    }

    /// Parses what follows `FETCH FIRST|NEXT`.
    fn parse_fetch_first(&mut self) -> Result<LimitClause> {
        let count = if matches!(self.current.kind.keyword(), Some(Keyword::Row | Keyword::Rows)) {
            None
        } else if matches!(self.current.kind, TokenKind::Minus | TokenKind::Plus) {
            Some(self.parse_expr_bp(u8::MAX, true)?)
        } else {
            Some(self.parse_c_expr()?)
        };
        if !self.consume_keyword(Keyword::Row) {
            self.expect_keyword(Keyword::Rows)?;
        }
        let with_ties = if self.consume_keywords(&[Keyword::With, Keyword::Ties]) {
            true
        } else {
            self.expect_keyword(Keyword::Only)?;
            false
        };
        Ok(LimitClause::FetchFirst { count, with_ties })
    }

    // --- Locking ---

    /// Returns true at `FOR UPDATE`, `FOR SHARE`, `FOR NO KEY UPDATE`,
    /// `FOR KEY SHARE` or `FOR READ ONLY`.
    pub(super) fn at_locking_clause(&mut self) -> bool {
        self.check_keyword(Keyword::For)
            && matches!(
                self.peek_keyword(1),
                Some(Keyword::Update | Keyword::No | Keyword::Share | Keyword::Key | Keyword::Read)
            )
    }

    fn parse_locking_clauses(&mut self) -> Result<Vec<LockingClause>> {
        let mut clauses = Vec::new();
        while self.at_locking_clause() {
            if self.consume_keywords(&[Keyword::For, Keyword::Read, Keyword::Only]) {
                continue;
            }
            let start = self.current.span.start;
            self.advance();
            let strength = match self.current.kind.keyword() {
                Some(Keyword::Update) => {
                    self.advance();
                    LockStrength::Update
                }
                Some(Keyword::Share) => {
                    self.advance();
                    LockStrength::Share
                }
                Some(Keyword::No) => {
                    self.advance();
                    self.expect_keyword(Keyword::Key)?;
                    self.expect_keyword(Keyword::Update)?;
                    LockStrength::NoKeyUpdate
                }
                _ => {
                    self.expect_keyword(Keyword::Key)?;
                    self.expect_keyword(Keyword::Share)?;
                    LockStrength::KeyShare
                }
            };
            let of = if self.consume_keyword(Keyword::Of) {
                self.parse_comma_list(Self::parse_qualified_name)?
            } else {
                Vec::new()
            };
            let wait = if self.consume_keyword(Keyword::Nowait) {
                Some(LockWait::Nowait)
            } else if self.consume_keywords(&[Keyword::Skip, Keyword::Locked]) {
                Some(LockWait::SkipLocked)
            } else {
                None
            };
            clauses.push(LockingClause {
                strength,
                of,
                wait,
                span: self.span_from(start).into(),
            });
        }
        Ok(clauses)
    }

    // --- SELECT ---

    fn parse_simple_select(&mut self) -> Result<Select> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Select)?;

        let distinct = if self.consume_keyword(Keyword::Distinct) {
            if self.consume_keyword(Keyword::On) {
                self.expect(&TokenKind::LeftParen)?;
                let exprs = self.parse_expr_list()?;
                self.expect(&TokenKind::RightParen)?;
                Some(Distinct::On(exprs))
            } else {
                Some(Distinct::Distinct)
            }
        } else {
            self.consume_keyword(Keyword::All);
            None
        };

        if self.at_target_list_end() {
            return Err(self.unexpected("targetList"));
        }
        let targets = self.parse_target_list()?;

        let into = if self.consume_keyword(Keyword::Into) {
            Some(self.parse_into_target()?)
        } else {
            None
        };
        let from = if self.consume_keyword(Keyword::From) {
            self.parse_from_list()?
        } else {
            Vec::new()
        };
        let selection = if self.consume_keyword(Keyword::Where) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let group_by = if self.consume_keywords(&[Keyword::Group, Keyword::By]) {
            self.consume_keyword(Keyword::All);
            self.parse_comma_list(Self::parse_grouping_element)?
        } else {
            Vec::new()
        };
        let having = if self.consume_keyword(Keyword::Having) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let windows = if self.consume_keyword(Keyword::Window) {
            self.parse_comma_list(Self::parse_named_window)?
        } else {
            Vec::new()
        };

        Ok(Select {
            distinct,
            targets,
            into,
            from,
            selection,
            group_by,
            having,
            windows,
            span: self.span_from(start).into(),
        })
    }

    /// Returns true where a target list would have to start but cannot.
    fn at_target_list_end(&self) -> bool {
        match &self.current.kind {
            TokenKind::Eof | TokenKind::Semicolon | TokenKind::RightParen => true,
            TokenKind::Keyword(kw) => matches!(
                kw,
                Keyword::From
                    | Keyword::Where
                    | Keyword::Group
                    | Keyword::Having
                    | Keyword::Window
                    | Keyword::Union
                    | Keyword::Intersect
                    | Keyword::Except
                    | Keyword::Order
                    | Keyword::Limit
                    | Keyword::Offset
                    | Keyword::Fetch
                    | Keyword::For
                    | Keyword::Into
            ),
            _ => false,
        }
    }

    /// Parses `target, ...` for `SELECT` and `RETURNING`.
    pub(super) fn parse_target_list(&mut self) -> Result<Vec<SelectItem>> {
        self.parse_comma_list(Self::parse_select_item)
    }

    fn parse_select_item(&mut self) -> Result<SelectItem> {
        let start = self.current.span.start;
        if self.check(&TokenKind::Star) {
            self.advance();
            let span = self.span_from(start);
            return Ok(SelectItem {
                expr: Expr::new(ExprKind::Wildcard(None), span),
                alias: None,
                span: span.into(),
            });
        }
        let expr = self.parse_expr()?;
        let alias = if self.consume_keyword(Keyword::As) {
            Some(self.parse_col_label()?)
        } else if self.at_bare_label() {
            Some(self.parse_col_label()?)
        } else {
            None
        };
        Ok(SelectItem {
            expr,
            alias,
            span: self.span_from(start).into(),
        })
    }

    /// Returns true if the current token can be an alias without `AS`.
    fn at_bare_label(&self) -> bool {
        match &self.current.kind {
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => true,
            TokenKind::Keyword(kw) => kw.is_bare_label(),
            _ => false,
        }
    }

    /// Parses the target of `SELECT ... INTO`.
    fn parse_into_target(&mut self) -> Result<IntoClause> {
        let persistence = match self.current.kind.keyword() {
            Some(Keyword::Temporary | Keyword::Temp) => {
                self.advance();
                Some(Persistence::Temporary)
            }
            Some(Keyword::Local | Keyword::Global)
                if matches!(
                    self.peek_keyword(1),
                    Some(Keyword::Temporary | Keyword::Temp)
                ) =>
            {
                self.advance();
                self.advance();
                Some(Persistence::Temporary)
            }
            Some(Keyword::Unlogged) => {
                self.advance();
                Some(Persistence::Unlogged)
            }
            _ => None,
        };
        self.consume_keyword(Keyword::Table);
        Ok(IntoClause {
            persistence,
            name: self.parse_qualified_name()?,
        })
    }

    fn parse_grouping_element(&mut self) -> Result<GroupingElement> {
        let next_is_paren = matches!(self.peek_nth(1).kind, TokenKind::LeftParen);
        if self.check(&TokenKind::LeftParen)
            && matches!(self.peek_nth(1).kind, TokenKind::RightParen)
        {
            self.advance();
            self.advance();
            return Ok(GroupingElement::Empty);
        }
        match self.current.kind.keyword() {
            Some(Keyword::Rollup) if next_is_paren => {
                self.advance();
                Ok(GroupingElement::Rollup(self.parse_paren_expr_list()?))
            }
            Some(Keyword::Cube) if next_is_paren => {
                self.advance();
                Ok(GroupingElement::Cube(self.parse_paren_expr_list()?))
            }
            Some(Keyword::Grouping) if self.peek_keyword(1) == Some(Keyword::Sets) => {
                self.advance();
                self.advance();
                self.expect(&TokenKind::LeftParen)?;
                let elements = self.nested(|p| p.parse_comma_list(Self::parse_grouping_element))?;
                self.expect(&TokenKind::RightParen)?;
                Ok(GroupingElement::Sets(elements))
            }
            _ => Ok(GroupingElement::Expr(self.parse_expr()?)),
        }
    }

    /// Parses `(expr, ...)`.
    pub(super) fn parse_paren_expr_list(&mut self) -> Result<Vec<Expr>> {
        self.expect(&TokenKind::LeftParen)?;
        let exprs = self.parse_expr_list()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(exprs)
    }

    fn parse_named_window(&mut self) -> Result<NamedWindow> {
        let start = self.current.span.start;
        let name = self.parse_col_id()?;
        self.expect_keyword(Keyword::As)?;
        let spec = self.parse_window_specification()?;
        Ok(NamedWindow {
            name,
            spec,
            span: self.span_from(start).into(),
        })
    }

    /// Parses `VALUES (row), ...`.
    fn parse_values(&mut self) -> Result<Values> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Values)?;
        let rows = self.parse_comma_list(Self::parse_paren_expr_list)?;
        let span = self.span_from(start);
        self.check_values_rows(&rows, span)?;
        Ok(Values {
            rows,
            span: span.into(),
        })
    }

    // --- FROM ---

    /// Parses `table_ref, ...`.
    pub(super) fn parse_from_list(&mut self) -> Result<Vec<TableRef>> {
        self.parse_comma_list(Self::parse_table_ref)
    }

    /// Parses a FROM item with any joins chained onto it.
    fn parse_table_ref(&mut self) -> Result<TableRef> {
        self.nested(|p| {
            let start = p.current.span.start;
            let mut left = p.parse_table_primary()?;
            while let Some((kind, natural)) = p.parse_join_operator()? {
                p.extend_chain()?;
                let right = p.parse_table_primary()?;
                let constraint = if natural || kind == JoinKind::Cross {
                    None
                } else if p.consume_keyword(Keyword::On) {
                    Some(JoinConstraint::On(p.parse_expr()?))
                } else if p.consume_keyword(Keyword::Using) {
                    Some(JoinConstraint::Using(p.parse_paren_name_list()?))
                } else {
                    return Err(p.unexpected("ON or USING"));
                };
                left = TableRef {
                    kind: TableRefKind::Join(Box::new(Join {
                        left,
                        right,
                        kind,
                        natural,
                        constraint,
                    })),
                    span: p.span_from(start).into(),
                };
            }
            Ok(left)
        })
    }

    /// Consumes a join operator, returning its kind and whether it is `NATURAL`.
    fn parse_join_operator(&mut self) -> Result<Option<(JoinKind, bool)>> {
        let natural = self.consume_keyword(Keyword::Natural);
        let kind = match self.current.kind.keyword() {
            Some(Keyword::Cross) if !natural => {
                self.advance();
                JoinKind::Cross
            }
            Some(Keyword::Join) => JoinKind::Inner,
            Some(Keyword::Inner) => {
                self.advance();
                JoinKind::Inner
            }
            Some(kw @ (Keyword::Left | Keyword::Right | Keyword::Full)) => {
                self.advance();
                self.consume_keyword(Keyword::Outer);
                match kw {
                    Keyword::Left => JoinKind::Left,
                    Keyword::Right => JoinKind::Right,
                    _ => JoinKind::Full,
                }
            }
            _ if natural => return Err(self.unexpected("JOIN")),
            _ => return Ok(None),
        };
        self.expect_keyword(Keyword::Join)?;
        Ok(Some((kind, natural)))
    }

    fn parse_table_primary(&mut self) -> Result<TableRef> {
        let start = self.current.span.start;
        let lateral = self.consume_keyword(Keyword::Lateral);

        let kind = if self.check(&TokenKind::LeftParen) {
            if self.paren_starts_query() {
                self.advance();
                let query = self.parse_boxed_query()?;
                self.expect(&TokenKind::RightParen)?;
                TableRefKind::Subquery {
                    lateral,
                    query,
                    alias: self.parse_opt_alias()?,
                }
            } else if lateral {
                return Err(self.unexpected("subquery or function"));
            } else {
                let paren_start = self.current.span.start;
                self.advance();
                let table = self.parse_table_ref()?;
                self.expect(&TokenKind::RightParen)?;
                if !matches!(table.kind, TableRefKind::Join(_)) {
                    return Err(self.parse_error(
                        "syntax error: a parenthesized FROM item must be a join",
                        self.span_from(paren_start),
                    ));
                }
                match self.parse_opt_alias()? {
                    None => return Ok(table),
                    alias => TableRefKind::Nested {
                        table: Box::new(table),
                        alias,
                    },
                }
            }
        } else if self.check_keyword(Keyword::Rows) && self.peek_keyword(1) == Some(Keyword::From)
        {
            self.advance();
            self.advance();
            self.expect(&TokenKind::LeftParen)?;
            let functions = self.parse_comma_list(Self::parse_rows_from_item)?;
            self.expect(&TokenKind::RightParen)?;
            let ordinality = self.consume_keywords(&[Keyword::With, Keyword::Ordinality]);
            TableRefKind::RowsFrom {
                lateral,
                functions,
                ordinality,
                alias: self.parse_opt_alias()?,
            }
        } else if self.check_keyword(Keyword::Xmltable)
            && matches!(self.peek_nth(1).kind, TokenKind::LeftParen)
        {
            TableRefKind::XmlTable {
                lateral,
                table: Box::new(self.parse_xml_table()?),
                alias: self.parse_opt_alias()?,
            }
        } else if self.at_function_table() {
            let function = self.parse_c_expr()?;
            let ordinality = self.consume_keywords(&[Keyword::With, Keyword::Ordinality]);
            let (alias, column_defs) = self.parse_func_alias()?;
            TableRefKind::Function {
                lateral,
                function,
                ordinality,
                alias,
                column_defs,
            }
        } else if lateral {
            return Err(self.unexpected("subquery or function"));
        } else {
            let relation = self.parse_relation_expr()?;
            let alias = self.parse_opt_alias()?;
            let sample = if self.consume_keyword(Keyword::Tablesample) {
                Some(self.parse_table_sample()?)
            } else {
                None
            };
            TableRefKind::Relation {
                relation,
                alias,
                sample,
            }
        };

        Ok(TableRef {
            kind,
            span: self.span_from(start).into(),
        })
    }

    /// Looks past any opening parentheses for a query keyword.
    pub(super) fn paren_starts_query(&mut self) -> bool {
        let mut n = 0;
        while matches!(self.peek_nth(n).kind, TokenKind::LeftParen) {
            n += 1;
        }
        matches!(
            self.peek_nth(n).kind.keyword(),
            Some(Keyword::Select | Keyword::Values | Keyword::Table | Keyword::With)
        )
    }

    /// Returns true if a (possibly qualified) name followed by `(` starts here.
    fn at_function_table(&mut self) -> bool {
        if !Self::is_type_function_name_token(&self.current.kind) && !self.at_col_id() {
            return false;
        }
        let mut n = 1;
        loop {
            match &self.peek_nth(n).kind {
                TokenKind::LeftParen => return true,
                TokenKind::Dot => {}
                _ => return false,
            }
            if !Self::is_col_label_token(&self.peek_nth(n + 1).kind) {
                return false;
            }
            n += 2;
        }
    }

    /// Parses `XMLTABLE([XMLNAMESPACES(...),] row PASSING document COLUMNS ...)`.
    fn parse_xml_table(&mut self) -> Result<XmlTable> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Xmltable)?;
        self.expect(&TokenKind::LeftParen)?;
        let namespaces = if self.check_keyword(Keyword::Xmlnamespaces) {
            self.advance();
            self.expect(&TokenKind::LeftParen)?;
            let namespaces = self.parse_comma_list(Self::parse_xml_namespace)?;
            self.expect(&TokenKind::RightParen)?;
            self.expect(&TokenKind::Comma)?;
            namespaces
        } else {
            Vec::new()
        };
        let row_expr = self.parse_c_expr()?;
        let document = self.parse_xml_passing()?;
        self.expect_keyword(Keyword::Columns)?;
        let columns = self.parse_comma_list(Self::parse_xml_table_column)?;
        self.expect(&TokenKind::RightParen)?;
        Ok(XmlTable {
            namespaces,
            row_expr,
            document,
            columns,
            span: self.span_from(start).into(),
        })
    }

    fn parse_xml_namespace(&mut self) -> Result<XmlNamespace> {
        if self.consume_keyword(Keyword::Default) {
            return Ok(XmlNamespace {
                uri: self.parse_b_expr()?,
                name: None,
            });
        }
        let uri = self.parse_b_expr()?;
        self.expect_keyword(Keyword::As)?;
        Ok(XmlNamespace {
            uri,
            name: Some(self.parse_col_label()?),
        })
    }

    fn parse_xml_table_column(&mut self) -> Result<XmlTableColumn> {
        let name = self.parse_col_id()?;
        if self.consume_keywords(&[Keyword::For, Keyword::Ordinality]) {
            return Ok(XmlTableColumn {
                name,
                kind: XmlTableColumnKind::Ordinality,
            });
        }
        let data_type = self.parse_type_name()?;
        let mut path = None;
        let mut default = None;
        let mut not_null = None;
        loop {
            let option_start = self.current.span.start;
            if self.consume_keyword(Keyword::Default) {
                let value = self.parse_b_expr()?;
                if default.replace(value).is_some() {
                    return Err(self.semantic(
                        "only one DEFAULT value is allowed",
                        self.span_from(option_start),
                    ));
                }
            } else if self.check_keyword(Keyword::Not) || self.check_keyword(Keyword::Null) {
                let value = self.consume_keyword(Keyword::Not);
                self.expect_keyword(Keyword::Null)?;
                if not_null.replace(value).is_some() {
                    return Err(self.semantic(
                        format!(
                            "conflicting or redundant NULL / NOT NULL declarations for column \"{}\"",
                            name.value
                        ),
                        self.span_from(option_start),
                    ));
                }
            } else if let TokenKind::Identifier(word) = &self.current.kind {
                if word != "path" {
                    return Err(self.semantic(
                        format!("unrecognized column option \"{word}\""),
                        self.current.span,
                    ));
                }
                self.advance();
                let value = self.parse_b_expr()?;
                if path.replace(value).is_some() {
                    return Err(self.semantic(
                        "only one PATH value per column is allowed",
                        self.span_from(option_start),
                    ));
                }
            } else {
                break;
            }
        }
        Ok(XmlTableColumn {
            name,
            kind: XmlTableColumnKind::Typed {
                data_type,
                path,
                default,
                not_null,
            },
        })
    }

    fn parse_rows_from_item(&mut self) -> Result<RowsFromItem> {
        let function = self.parse_c_expr()?;
        let column_defs = if self.consume_keyword(Keyword::As) {
            self.parse_column_defs()?
        } else {
            Vec::new()
        };
        Ok(RowsFromItem {
            function,
            column_defs,
        })
    }

    /// Parses `(name type, ...)`.
    fn parse_column_defs(&mut self) -> Result<Vec<ColumnDef>> {
        self.expect(&TokenKind::LeftParen)?;
        let defs = self.parse_comma_list(|p| {
            let name = p.parse_col_id()?;
            let data_type = p.parse_type_name()?;
            Ok(ColumnDef { name, data_type })
        })?;
        self.expect(&TokenKind::RightParen)?;
        Ok(defs)
    }

    /// Parses the alias of a function table, which may declare column types.
    fn parse_func_alias(&mut self) -> Result<(Option<TableAlias>, Vec<ColumnDef>)> {
        let start = self.current.span.start;
        let has_as = self.consume_keyword(Keyword::As);
        if has_as && self.check(&TokenKind::LeftParen) {
            return Ok((None, self.parse_column_defs()?));
        }
        if !has_as && !self.at_col_id() {
            return Ok((None, Vec::new()));
        }
        let name = self.parse_col_id()?;
        if !self.check(&TokenKind::LeftParen) {
            let alias = TableAlias {
                name,
                columns: Vec::new(),
                span: self.span_from(start).into(),
            };
            return Ok((Some(alias), Vec::new()));
        }
        let names_only = Self::is_col_id_token(&self.peek_nth(1).kind)
            && matches!(
                self.peek_nth(2).kind,
                TokenKind::Comma | TokenKind::RightParen
            );
        if names_only {
            let columns = self.parse_paren_name_list()?;
            let alias = TableAlias {
                name,
                columns,
                span: self.span_from(start).into(),
            };
            return Ok((Some(alias), Vec::new()));
        }
        let alias_span = self.span_from(start);
        let column_defs = self.parse_column_defs()?;
        let alias = TableAlias {
            name,
            columns: Vec::new(),
            span: alias_span.into(),
        };
        Ok((Some(alias), column_defs))
    }

    /// Parses `[AS] name [(column, ...)]`.
    pub(super) fn parse_opt_alias(&mut self) -> Result<Option<TableAlias>> {
        let start = self.current.span.start;
        if !self.consume_keyword(Keyword::As) && !self.at_col_id() {
            return Ok(None);
        }
        let name = self.parse_col_id()?;
        let columns = if self.check(&TokenKind::LeftParen) {
            self.parse_paren_name_list()?
        } else {
            Vec::new()
        };
        Ok(Some(TableAlias {
            name,
            columns,
            span: self.span_from(start).into(),
        }))
    }

    /// Parses `[ONLY] name [*]` or `ONLY (name)`.
    pub(super) fn parse_relation_expr(&mut self) -> Result<RelationExpr> {
        let start = self.current.span.start;
        let (name, only, inherit_star) = if self.consume_keyword(Keyword::Only) {
            let name = if self.consume(&TokenKind::LeftParen) {
                let name = self.parse_qualified_name()?;
                self.expect(&TokenKind::RightParen)?;
                name
            } else {
                self.parse_qualified_name()?
            };
            (name, true, false)
        } else {
            let name = self.parse_qualified_name()?;
            let inherit_star = self.consume(&TokenKind::Star);
            (name, false, inherit_star)
        };
        Ok(RelationExpr {
            name,
            only,
            inherit_star,
            span: self.span_from(start).into(),
        })
    }

    /// Parses what follows `TABLESAMPLE`.
    fn parse_table_sample(&mut self) -> Result<TableSample> {
        let mut parts = vec![self.parse_type_function_name()?];
        while self.consume(&TokenKind::Dot) {
            parts.push(self.parse_col_label()?);
        }
        let args = self.parse_paren_expr_list()?;
        let repeatable = if self.consume_keyword(Keyword::Repeatable) {
            self.expect(&TokenKind::LeftParen)?;
            let seed = self.parse_expr()?;
            self.expect(&TokenKind::RightParen)?;
            Some(seed)
        } else {
            None
        };
        Ok(TableSample {
            method: ObjectName::new(parts),
            args,
            repeatable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::lexer::Span;

    fn query(sql: &str) -> Query {
        let mut parser = Parser::new(sql);
        let query = parser.parse_query().unwrap();
        assert!(parser.current.is_eof(), "trailing input in {sql:?}");
        query
    }

    fn query_err(sql: &str) -> Error {
        match Parser::new(sql).parse_statement() {
            Ok(statement) => panic!("{sql:?} parsed as {statement:?}"),
            Err(e) => e,
        }
    }

    fn select(sql: &str) -> Select {
        match query(sql).body {
            SetExpr::Select(select) => *select,
            other => panic!("expected SELECT, got {other:?}"),
        }
    }

    #[test]
    fn test_intersect_binds_tighter_than_union() {
        let q = query("SELECT 1 UNION SELECT 2 INTERSECT SELECT 3");
        let SetExpr::SetOperation { op, right, .. } = q.body else {
            panic!("expected set operation");
        };
        assert_eq!(op, SetOperator::Union);
        assert!(matches!(
            *right,
            SetExpr::SetOperation {
                op: SetOperator::Intersect,
                ..
            }
        ));
    }

    #[test]
    fn test_parenthesised_clauses_merge() {
        let q = query("(SELECT a FROM t ORDER BY a) LIMIT 5");
        assert_eq!(q.order_by.len(), 1);
        assert!(matches!(q.limit, Some(LimitClause::Limit(_))));
        assert!(matches!(q.body, SetExpr::Select(_)));

        let err = query_err("(SELECT 1 ORDER BY 1) ORDER BY 1");
        assert!(matches!(err, Error::Semantic(_)));
        assert!(err.to_string().contains("multiple ORDER BY"));
    }

    #[test]
    fn test_limit_offset_fetch() {
        let q = query("SELECT a FROM t OFFSET 10 ROWS FETCH FIRST 5 ROWS ONLY");
        assert!(q.offset.is_some());
        assert!(matches!(
            q.limit,
            Some(LimitClause::FetchFirst {
                count: Some(_),
                with_ties: false
            })
        ));
        assert!(matches!(query("SELECT 1 LIMIT ALL").limit, Some(LimitClause::All)));
        assert!(matches!(
            query_err("SELECT 1 LIMIT 1, 2"),
            Error::Semantic(_)
        ));
        assert!(matches!(
            query_err("SELECT 1 FETCH FIRST 1 ROW WITH TIES"),
            Error::Semantic(_)
        ));
    }

    #[test]
    fn test_locking_clauses() {
        let q = query("SELECT * FROM t FOR UPDATE OF t SKIP LOCKED FOR KEY SHARE");
        assert_eq!(q.locking.len(), 2);
        assert_eq!(q.locking[0].wait, Some(LockWait::SkipLocked));
        assert_eq!(q.locking[1].strength, LockStrength::KeyShare);
        assert!(query("SELECT 1 FOR READ ONLY").locking.is_empty());
    }

    #[test]
    fn test_empty_target_list() {
        let err = query_err("SELECT FROM t");
        let Error::Parse(e) = &err else {
            panic!("expected parse error, got {err:?}");
        };
        assert_eq!(e.span, Span::new(7, 11));
        assert!(e.message.contains("targetList"));
    }

    #[test]
    fn test_select_aliases() {
        let s = select("SELECT a AS user, b c, d");
        assert_eq!(s.targets[0].alias.as_ref().map(|a| a.value.as_str()), Some("user"));
        assert_eq!(s.targets[1].alias.as_ref().map(|a| a.value.as_str()), Some("c"));
        assert!(s.targets[2].alias.is_none());
    }

    #[test]
    fn test_joins() {
        let s = select("SELECT * FROM a LEFT JOIN b USING (id) NATURAL JOIN c CROSS JOIN d");
        let TableRefKind::Join(join) = &s.from[0].kind else {
            panic!("expected join");
        };
        assert_eq!(join.kind, JoinKind::Cross);
        assert!(matches!(query_err("SELECT * FROM a JOIN b"), Error::Parse(_)));
    }

    #[test]
    fn test_parenthesised_join_is_transparent() {
        let s = select("SELECT * FROM (a JOIN b ON true)");
        assert!(matches!(s.from[0].kind, TableRefKind::Join(_)));
        let s = select("SELECT * FROM (a JOIN b ON true) AS j");
        assert!(matches!(s.from[0].kind, TableRefKind::Nested { .. }));
        assert!(matches!(query_err("SELECT * FROM (a)"), Error::Parse(_)));
    }

    #[test]
    fn test_function_tables() {
        let s = select("SELECT * FROM generate_series(1, 3) WITH ORDINALITY AS g (n, i)");
        let TableRefKind::Function {
            ordinality, alias, ..
        } = &s.from[0].kind
        else {
            panic!("expected function table");
        };
        assert!(ordinality);
        assert_eq!(alias.as_ref().map(|a| a.columns.len()), Some(2));

        let s = select("SELECT * FROM json_to_record(j) AS x (a int, b text)");
        let TableRefKind::Function { column_defs, .. } = &s.from[0].kind else {
            panic!("expected function table");
        };
        assert_eq!(column_defs.len(), 2);

        let s = select("SELECT * FROM ROWS FROM (f(1), g(2) AS (x int)) AS r");
        assert!(matches!(s.from[0].kind, TableRefKind::RowsFrom { .. }));
    }

    #[test]
    fn test_relation_forms() {
        let s = select("SELECT * FROM ONLY (s.t) TABLESAMPLE bernoulli (10) REPEATABLE (1)");
        let TableRefKind::Relation {
            relation, sample, ..
        } = &s.from[0].kind
        else {
            panic!("expected relation");
        };
        assert!(relation.only);
        assert!(sample.as_ref().is_some_and(|s| s.repeatable.is_some()));
    }

    #[test]
    fn test_grouping_elements() {
        let s = select("SELECT a FROM t GROUP BY GROUPING SETS ((a), ()), ROLLUP (a, b), CUBE (c)");
        assert!(matches!(s.group_by[0], GroupingElement::Sets(_)));
        assert!(matches!(s.group_by[1], GroupingElement::Rollup(_)));
        assert!(matches!(s.group_by[2], GroupingElement::Cube(_)));
    }

    #[test]
    fn test_values_rows_must_match() {
        let err = query_err("VALUES (1, 2), (3)");
        assert!(err.to_string().contains("VALUES lists must all be the same length"));
    }

    #[test]
    fn test_with_clause() {
        let q = query("WITH RECURSIVE r (n) AS NOT MATERIALIZED (SELECT 1) SELECT n FROM r");
        let with = q.with.expect("with clause");
        assert!(with.recursive);
        assert_eq!(with.ctes[0].materialized, Some(false));

        let q = query("WITH d AS (DELETE FROM t RETURNING *) SELECT * FROM d");
        let with = q.with.expect("with clause");
        assert!(matches!(*with.ctes[0].statement, Statement::Delete(_)));
    }

    #[test]
    fn test_select_into() {
        let s = select("SELECT * INTO TEMP TABLE x FROM t");
        let into = s.into.expect("into clause");
        assert_eq!(into.persistence, Some(Persistence::Temporary));
    }
}
