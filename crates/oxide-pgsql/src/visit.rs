//! Tree traversal.
//!
//! [`Node`] borrows one AST node of any family. [`Node::children`] lists the
//! direct children in source order and [`walk`] visits a whole tree in
//! pre-order, stopping as soon as the callback returns
//! [`ControlFlow::Break`].
//!
//! ```
//! use std::ops::ControlFlow;
//! use oxide_pgsql::visit::{walk, Node};
//!
//! let statement = oxide_pgsql::parse_one("SELECT a FROM t WHERE b > 1").unwrap();
//! let mut columns = Vec::new();
//! let _ = walk(Node::Statement(&statement), &mut |node| {
//!     if let Node::Expr(expr) = node {
//!         if let oxide_pgsql::ast::ExprKind::Column(name) = &expr.kind {
//!             columns.push(name.to_string());
//!         }
//!     }
//!     ControlFlow::<()>::Continue(())
//! });
//! assert_eq!(columns, ["a", "b"]);
//! ```

use std::ops::ControlFlow;

use crate::ast::{
    Assignment, CaseWhen, ConflictAction, ConflictTarget, CopySource, Cte, Distinct, Expr,
    ExprKind, FrameBound, FunctionCall, GroupingElement, Ident, IndexElem, Indirection,
    InsertSource, JoinConstraint, LimitClause, ObjectName, OrderByExpr, QuantifiedRhs, Query,
    RelationExpr, Select, SelectItem, Selection, SequenceOption, SetExpr, SetTarget, SetValue, Spanned,
    Statement, TableAlias, TableRef, TableRefKind, TargetColumn, TransactionKind, TypeKind,
    TypeName, VariableTarget, WindowRef, WindowSpec, With, XmlTableColumnKind,
};
use crate::lexer::Span;

/// A borrowed AST node.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Statement(&'a Statement),
    Query(&'a Query),
    Cte(&'a Cte),
    SetExpr(&'a SetExpr),
    Select(&'a Select),
    SelectItem(&'a SelectItem),
    TableRef(&'a TableRef),
    Relation(&'a RelationExpr),
    Expr(&'a Expr),
    FunctionCall(&'a FunctionCall),
    OrderBy(&'a OrderByExpr),
    WindowSpec(&'a WindowSpec),
    Assignment(&'a Assignment),
    TypeName(&'a TypeName),
    ObjectName(&'a ObjectName),
    Ident(&'a Ident),
}

impl<'a> Node<'a> {
    /// Returns the source range of the node.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Statement(n) => n.span(),
            Self::Query(n) => n.span(),
            Self::Cte(n) => n.span(),
            Self::SetExpr(n) => set_expr_span(n),
            Self::Select(n) => n.span(),
            Self::SelectItem(n) => n.span(),
            Self::TableRef(n) => n.span(),
            Self::Relation(n) => n.span(),
            Self::Expr(n) => n.span(),
            Self::FunctionCall(n) => n.span(),
            Self::OrderBy(n) => n.span(),
            Self::WindowSpec(n) => n.span(),
            Self::Assignment(n) => n.span(),
            Self::TypeName(n) => n.span(),
            Self::ObjectName(n) => n.span(),
            Self::Ident(n) => n.span(),
        }
    }

    /// Returns the direct children of the node in source order.
    #[must_use]
    pub fn children(&self) -> Vec<Node<'a>> {
        let mut out = Children(Vec::new());
        match *self {
            Self::Statement(statement) => out.statement(statement),
            Self::Query(query) => out.query(query),
            Self::Cte(cte) => {
                out.ident(&cte.name);
                out.idents(&cte.columns);
                out.0.push(Node::Statement(&cte.statement));
            }
            Self::SetExpr(body) => out.set_expr(body),
            Self::Select(select) => out.select(select),
            Self::SelectItem(item) => {
                out.expr(&item.expr);
                out.opt_ident(item.alias.as_ref());
            }
            Self::TableRef(table) => out.table_ref(table),
            Self::Relation(relation) => out.0.push(Node::ObjectName(&relation.name)),
            Self::Expr(expr) => out.expr_kind(&expr.kind),
            Self::FunctionCall(call) => out.function_call(call),
            Self::OrderBy(item) => out.expr(&item.expr),
            Self::WindowSpec(spec) => out.window_spec(spec),
            Self::Assignment(assignment) => {
                out.target_columns(&assignment.columns);
                out.expr(&assignment.value);
            }
            Self::TypeName(data_type) => {
                if let TypeKind::Generic { name, modifiers } = &data_type.kind {
                    out.0.push(Node::ObjectName(name));
                    out.exprs(modifiers);
                }
            }
            Self::ObjectName(name) => out.idents(&name.parts),
            Self::Ident(_) => {}
        }
        out.0
    }
}

/// Visits `node` and its descendants in pre-order.
///
/// Returns the first [`ControlFlow::Break`] produced by `f`.
pub fn walk<'a, B>(
    node: Node<'a>,
    f: &mut impl FnMut(Node<'a>) -> ControlFlow<B>,
) -> ControlFlow<B> {
    f(node)?;
    for child in node.children() {
        walk(child, f)?;
    }
    ControlFlow::Continue(())
}

fn set_expr_span(body: &SetExpr) -> Span {
    match body {
        SetExpr::Select(select) => select.span(),
        SetExpr::Values(values) => values.span(),
        SetExpr::Table(relation) => relation.span(),
        SetExpr::SetOperation { left, right, .. } => {
            set_expr_span(left).merge(set_expr_span(right))
        }
        SetExpr::Query(query) => query.span(),
    }
}

/// Accumulates child nodes.
struct Children<'a>(Vec<Node<'a>>);

impl<'a> Children<'a> {
    fn expr(&mut self, expr: &'a Expr) {
        self.0.push(Node::Expr(expr));
    }

    fn opt_expr(&mut self, expr: Option<&'a Expr>) {
        if let Some(expr) = expr {
            self.expr(expr);
        }
    }

    fn exprs(&mut self, exprs: &'a [Expr]) {
        self.0.extend(exprs.iter().map(Node::Expr));
    }

    fn ident(&mut self, ident: &'a Ident) {
        self.0.push(Node::Ident(ident));
    }

    fn opt_ident(&mut self, ident: Option<&'a Ident>) {
        if let Some(ident) = ident {
            self.ident(ident);
        }
    }

    fn idents(&mut self, idents: &'a [Ident]) {
        self.0.extend(idents.iter().map(Node::Ident));
    }

    fn target_columns(&mut self, columns: &'a [TargetColumn]) {
        for column in columns {
            self.ident(&column.name);
            for step in &column.indirection {
                match step {
                    Indirection::Field(field) => self.ident(field),
                    Indirection::Subscript(index) => self.expr(index),
                    Indirection::Slice { lower, upper } => {
                        self.opt_expr(lower.as_ref());
                        self.opt_expr(upper.as_ref());
                    }
                }
            }
        }
    }

    fn index_elems(&mut self, elems: &'a [IndexElem]) {
        for elem in elems {
            self.expr(&elem.expr);
            if let Some(collation) = &elem.collation {
                self.0.push(Node::ObjectName(collation));
            }
            if let Some(opclass) = &elem.opclass {
                self.0.push(Node::ObjectName(opclass));
            }
        }
    }

    fn alias(&mut self, alias: Option<&'a TableAlias>) {
        if let Some(alias) = alias {
            self.ident(&alias.name);
            self.idents(&alias.columns);
        }
    }

    fn order_by(&mut self, items: &'a [OrderByExpr]) {
        self.0.extend(items.iter().map(Node::OrderBy));
    }

    fn targets(&mut self, items: &'a [SelectItem]) {
        self.0.extend(items.iter().map(Node::SelectItem));
    }

    fn tables(&mut self, tables: &'a [TableRef]) {
        self.0.extend(tables.iter().map(Node::TableRef));
    }

    fn with(&mut self, with: Option<&'a With>) {
        if let Some(with) = with {
            self.0.extend(with.ctes.iter().map(Node::Cte));
        }
    }

    fn selection(&mut self, selection: Option<&'a Selection>) {
        match selection {
            Some(Selection::Condition(expr)) => self.expr(expr),
            Some(Selection::CurrentOf(cursor)) => self.ident(cursor),
            None => {}
        }
    }

    fn statement(&mut self, statement: &'a Statement) {
        match statement {
            Statement::Select(query) => self.0.push(Node::Query(query)),
            Statement::Insert(insert) => {
                self.with(insert.with.as_ref());
                self.0.push(Node::ObjectName(&insert.table));
                self.opt_ident(insert.alias.as_ref());
                self.target_columns(&insert.columns);
                if let InsertSource::Query(query) = &insert.source {
                    self.0.push(Node::Query(query));
                }
                if let Some(on_conflict) = &insert.on_conflict {
                    match &on_conflict.target {
                        Some(ConflictTarget::Columns { columns, selection }) => {
                            self.index_elems(columns);
                            self.opt_expr(selection.as_ref());
                        }
                        Some(ConflictTarget::Constraint(name)) => self.ident(name),
                        None => {}
                    }
                    if let ConflictAction::DoUpdate {
                        assignments,
                        selection,
                    } = &on_conflict.action
                    {
                        self.0.extend(assignments.iter().map(Node::Assignment));
                        self.opt_expr(selection.as_ref());
                    }
                }
                self.targets(&insert.returning);
            }
            Statement::Update(update) => {
                self.with(update.with.as_ref());
                self.0.push(Node::Relation(&update.table));
                self.opt_ident(update.alias.as_ref());
                self.0.extend(update.assignments.iter().map(Node::Assignment));
                self.tables(&update.from);
                self.selection(update.selection.as_ref());
                self.targets(&update.returning);
            }
            Statement::Delete(delete) => {
                self.with(delete.with.as_ref());
                self.0.push(Node::Relation(&delete.table));
                self.opt_ident(delete.alias.as_ref());
                self.tables(&delete.using);
                self.selection(delete.selection.as_ref());
                self.targets(&delete.returning);
            }
            Statement::Copy(copy) => {
                match &copy.source {
                    CopySource::Table { name, columns } => {
                        self.0.push(Node::ObjectName(name));
                        self.idents(columns);
                    }
                    CopySource::Query(statement) => self.0.push(Node::Statement(statement)),
                }
                self.opt_expr(copy.selection.as_ref());
            }
            Statement::Lock(lock) => self.0.extend(lock.tables.iter().map(Node::Relation)),
            Statement::Checkpoint(_) | Statement::Do(_) | Statement::SetTransaction(_) => {}
            Statement::Fetch(fetch) => self.ident(&fetch.cursor),
            Statement::DeclareCursor(declare) => {
                self.ident(&declare.name);
                self.0.push(Node::Query(&declare.query));
            }
            Statement::ClosePortal(close) => self.opt_ident(close.name.as_ref()),
            Statement::CreateSequence(create) => {
                self.0.push(Node::ObjectName(&create.name));
                self.sequence_options(&create.options);
            }
            Statement::AlterSequence(alter) => {
                self.0.push(Node::ObjectName(&alter.name));
                self.sequence_options(&alter.options);
            }
            Statement::DropSequence(drop) => {
                self.0.extend(drop.names.iter().map(Node::ObjectName));
            }
            Statement::SetVariable(set) => {
                if let SetTarget::Variable(name) = &set.target {
                    self.0.push(Node::ObjectName(name));
                }
                if let SetValue::Interval(interval) = &set.value {
                    self.expr(interval);
                }
            }
            Statement::ResetVariable(reset) => self.variable_target(&reset.target),
            Statement::ShowVariable(show) => self.variable_target(&show.target),
            Statement::Transaction(transaction) => match &transaction.kind {
                TransactionKind::Savepoint(name)
                | TransactionKind::Release(name)
                | TransactionKind::RollbackTo(name) => self.ident(name),
                TransactionKind::Begin(_)
                | TransactionKind::Start(_)
                | TransactionKind::Commit { .. }
                | TransactionKind::Rollback { .. } => {}
            },
        }
    }

    fn sequence_options(&mut self, options: &'a [SequenceOption]) {
        for option in options {
            match option {
                SequenceOption::As(data_type) => self.0.push(Node::TypeName(data_type)),
                SequenceOption::OwnedBy(Some(name)) | SequenceOption::SequenceName(name) => {
                    self.0.push(Node::ObjectName(name));
                }
                _ => {}
            }
        }
    }

    fn variable_target(&mut self, target: &'a VariableTarget) {
        if let VariableTarget::Name(name) = target {
            self.0.push(Node::ObjectName(name));
        }
    }

    fn query(&mut self, query: &'a Query) {
        self.with(query.with.as_ref());
        self.0.push(Node::SetExpr(&query.body));
        self.order_by(&query.order_by);
        match &query.limit {
            Some(LimitClause::Limit(expr)) => self.expr(expr),
            Some(LimitClause::FetchFirst {
                count: Some(expr), ..
            }) => self.expr(expr),
            _ => {}
        }
        self.opt_expr(query.offset.as_ref());
        for locking in &query.locking {
            self.0.extend(locking.of.iter().map(Node::ObjectName));
        }
    }

    fn set_expr(&mut self, body: &'a SetExpr) {
        match body {
            SetExpr::Select(select) => self.0.push(Node::Select(select)),
            SetExpr::Values(values) => {
                for row in &values.rows {
                    self.exprs(row);
                }
            }
            SetExpr::Table(relation) => self.0.push(Node::Relation(relation)),
            SetExpr::SetOperation { left, right, .. } => {
                self.0.push(Node::SetExpr(left));
                self.0.push(Node::SetExpr(right));
            }
            SetExpr::Query(query) => self.0.push(Node::Query(query)),
        }
    }

    fn select(&mut self, select: &'a Select) {
        if let Some(Distinct::On(exprs)) = &select.distinct {
            self.exprs(exprs);
        }
        self.targets(&select.targets);
        if let Some(into) = &select.into {
            self.0.push(Node::ObjectName(&into.name));
        }
        self.tables(&select.from);
        self.opt_expr(select.selection.as_ref());
        for element in &select.group_by {
            self.grouping_element(element);
        }
        self.opt_expr(select.having.as_ref());
        for window in &select.windows {
            self.ident(&window.name);
            self.0.push(Node::WindowSpec(&window.spec));
        }
    }

    fn grouping_element(&mut self, element: &'a GroupingElement) {
        match element {
            GroupingElement::Expr(expr) => self.expr(expr),
            GroupingElement::Empty => {}
            GroupingElement::Rollup(exprs) | GroupingElement::Cube(exprs) => self.exprs(exprs),
            GroupingElement::Sets(elements) => {
                for element in elements {
                    self.grouping_element(element);
                }
            }
        }
    }

    fn table_ref(&mut self, table: &'a TableRef) {
        match &table.kind {
            TableRefKind::Relation {
                relation,
                alias,
                sample,
            } => {
                self.0.push(Node::Relation(relation));
                self.alias(alias.as_ref());
                if let Some(sample) = sample {
                    self.0.push(Node::ObjectName(&sample.method));
                    self.exprs(&sample.args);
                    self.opt_expr(sample.repeatable.as_ref());
                }
            }
            TableRefKind::Function {
                function,
                alias,
                column_defs,
                ..
            } => {
                self.expr(function);
                self.alias(alias.as_ref());
                for def in column_defs {
                    self.ident(&def.name);
                    self.0.push(Node::TypeName(&def.data_type));
                }
            }
            TableRefKind::RowsFrom {
                functions, alias, ..
            } => {
                for item in functions {
                    self.expr(&item.function);
                    for def in &item.column_defs {
                        self.ident(&def.name);
                        self.0.push(Node::TypeName(&def.data_type));
                    }
                }
                self.alias(alias.as_ref());
            }
            TableRefKind::XmlTable { table, alias, .. } => {
                for namespace in &table.namespaces {
                    self.expr(&namespace.uri);
                    self.opt_ident(namespace.name.as_ref());
                }
                self.expr(&table.row_expr);
                self.expr(&table.document);
                for column in &table.columns {
                    self.ident(&column.name);
                    if let XmlTableColumnKind::Typed {
                        data_type,
                        path,
                        default,
                        ..
                    } = &column.kind
                    {
                        self.0.push(Node::TypeName(data_type));
                        self.opt_expr(path.as_ref());
                        self.opt_expr(default.as_ref());
                    }
                }
                self.alias(alias.as_ref());
            }
            TableRefKind::Subquery { query, alias, .. } => {
                self.0.push(Node::Query(query));
                self.alias(alias.as_ref());
            }
            TableRefKind::Join(join) => {
                self.0.push(Node::TableRef(&join.left));
                self.0.push(Node::TableRef(&join.right));
                match &join.constraint {
                    Some(JoinConstraint::On(expr)) => self.expr(expr),
                    Some(JoinConstraint::Using(columns)) => self.idents(columns),
                    None => {}
                }
            }
            TableRefKind::Nested { table, alias } => {
                self.0.push(Node::TableRef(table));
                self.alias(alias.as_ref());
            }
        }
    }

    fn function_call(&mut self, call: &'a FunctionCall) {
        self.0.push(Node::ObjectName(&call.name));
        for arg in &call.args {
            self.opt_ident(arg.name.as_ref());
            self.expr(&arg.value);
        }
        self.order_by(&call.order_by);
        self.order_by(&call.within_group);
        if let Some(filter) = &call.filter {
            self.expr(filter);
        }
        match &call.over {
            Some(WindowRef::Named(name)) => self.ident(name),
            Some(WindowRef::Spec(spec)) => self.0.push(Node::WindowSpec(spec)),
            None => {}
        }
    }

    fn window_spec(&mut self, spec: &'a WindowSpec) {
        self.opt_ident(spec.existing.as_ref());
        self.exprs(&spec.partition_by);
        self.order_by(&spec.order_by);
        if let Some(frame) = &spec.frame {
            for bound in std::iter::once(&frame.start).chain(frame.end.as_ref()) {
                if let FrameBound::Preceding(expr) | FrameBound::Following(expr) = bound {
                    self.expr(expr);
                }
            }
        }
    }

    #[allow(clippy::too_many_lines)]
    fn expr_kind(&mut self, kind: &'a ExprKind) {
        match kind {
            ExprKind::Literal(_)
            | ExprKind::Parameter(_)
            | ExprKind::Default
            | ExprKind::ValueFunction { .. }
            | ExprKind::Wildcard(None) => {}
            ExprKind::TypedString { data_type, .. } => self.0.push(Node::TypeName(data_type)),
            ExprKind::Column(name) | ExprKind::Wildcard(Some(name)) => {
                self.0.push(Node::ObjectName(name));
            }
            ExprKind::Unary { expr, .. }
            | ExprKind::IsNull { expr, .. }
            | ExprKind::IsTruth { expr, .. }
            | ExprKind::IsDocument { expr, .. }
            | ExprKind::IsNormalized { expr, .. }
            | ExprKind::Extract { expr, .. }
            | ExprKind::CollationFor(expr)
            | ExprKind::Normalize { expr, .. }
            | ExprKind::XmlParse { expr, .. }
            | ExprKind::FieldWildcard(expr) => self.expr(expr),
            ExprKind::Binary { left, right, .. }
            | ExprKind::IsDistinctFrom { left, right, .. } => {
                self.expr(left);
                self.expr(right);
            }
            ExprKind::Between {
                expr, low, high, ..
            } => {
                self.expr(expr);
                self.expr(low);
                self.expr(high);
            }
            ExprKind::Like {
                expr,
                pattern,
                escape,
                ..
            } => {
                self.expr(expr);
                self.expr(pattern);
                self.opt_expr(escape.as_deref());
            }
            ExprKind::InList { expr, list, .. } => {
                self.expr(expr);
                self.exprs(list);
            }
            ExprKind::InSubquery { expr, subquery, .. } => {
                self.expr(expr);
                self.0.push(Node::Query(subquery));
            }
            ExprKind::Quantified { left, right, .. } => {
                self.expr(left);
                match right {
                    QuantifiedRhs::Subquery(query) => self.0.push(Node::Query(query)),
                    QuantifiedRhs::Expr(expr) => self.expr(expr),
                }
            }
            ExprKind::Exists(query) | ExprKind::Subquery(query) | ExprKind::ArraySubquery(query) => {
                self.0.push(Node::Query(query));
            }
            ExprKind::Array(exprs) | ExprKind::Row { exprs, .. } | ExprKind::Grouping(exprs) => {
                self.exprs(exprs);
            }
            ExprKind::Case {
                operand,
                conditions,
                else_result,
            } => {
                self.opt_expr(operand.as_deref());
                for CaseWhen { condition, result } in conditions {
                    self.expr(condition);
                    self.expr(result);
                }
                self.opt_expr(else_result.as_deref());
            }
            ExprKind::Cast {
                expr, data_type, ..
            }
            | ExprKind::Treat { expr, data_type }
            | ExprKind::XmlSerialize {
                expr, data_type, ..
            } => {
                self.expr(expr);
                self.0.push(Node::TypeName(data_type));
            }
            ExprKind::Function(call) => self.0.push(Node::FunctionCall(call)),
            ExprKind::Overlay {
                expr,
                placing,
                from,
                length,
            } => {
                self.expr(expr);
                self.expr(placing);
                self.expr(from);
                self.opt_expr(length.as_deref());
            }
            ExprKind::Position { substring, string } => {
                self.expr(substring);
                self.expr(string);
            }
            ExprKind::Substring { expr, from, length } => {
                self.expr(expr);
                self.opt_expr(from.as_deref());
                self.opt_expr(length.as_deref());
            }
            ExprKind::SubstringSimilar {
                expr,
                pattern,
                escape,
            } => {
                self.expr(expr);
                self.expr(pattern);
                self.expr(escape);
            }
            ExprKind::Trim {
                characters, exprs, ..
            } => {
                self.opt_expr(characters.as_deref());
                self.exprs(exprs);
            }
            ExprKind::XmlElement {
                name,
                attributes,
                content,
            } => {
                self.ident(name);
                for attribute in attributes {
                    self.expr(&attribute.value);
                    self.opt_ident(attribute.name.as_ref());
                }
                self.exprs(content);
            }
            ExprKind::XmlForest(attributes) => {
                for attribute in attributes {
                    self.expr(&attribute.value);
                    self.opt_ident(attribute.name.as_ref());
                }
            }
            ExprKind::XmlPi { name, content } => {
                self.ident(name);
                self.opt_expr(content.as_deref());
            }
            ExprKind::XmlExists { path, argument } => {
                self.expr(path);
                self.expr(argument);
            }
            ExprKind::XmlRoot { expr, version, .. } => {
                self.expr(expr);
                self.opt_expr(version.as_deref());
            }
            ExprKind::Collate { expr, collation } => {
                self.expr(expr);
                self.0.push(Node::ObjectName(collation));
            }
            ExprKind::AtTimeZone { expr, zone } => {
                self.expr(expr);
                self.expr(zone);
            }
            ExprKind::Subscript { expr, index } => {
                self.expr(expr);
                self.expr(index);
            }
            ExprKind::Slice { expr, lower, upper } => {
                self.expr(expr);
                self.opt_expr(lower.as_deref());
                self.opt_expr(upper.as_deref());
            }
            ExprKind::Field { expr, field } => {
                self.expr(expr);
                self.ident(field);
            }
        }
    }
}
