//! Session and transaction statements: `SET`, `RESET`, `SHOW`, `BEGIN`,
//! `COMMIT`, `ROLLBACK` and savepoints.

use super::parser::Parser;
use crate::ast::{
    Expr, ExprKind, IntervalField, IsolationLevel, ObjectName, OptionValue, ResetStatement, SetScope, SetTarget,
    SetTransactionStatement, SetValue, SetVariableStatement, ShowStatement, Statement,
    TransactionKind, TransactionMode, TransactionStatement, TypeKind, VariableTarget,
};
use crate::error::Result;
use crate::lexer::{Keyword, TokenKind};

impl<'a> Parser<'a> {
    /// Parses any `SET` statement.
    pub(super) fn parse_set(&mut self) -> Result<Statement> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Set)?;

        if self.consume_keywords(&[Keyword::Session, Keyword::Characteristics]) {
            self.expect_keyword(Keyword::As)?;
            self.expect_keyword(Keyword::Transaction)?;
            let modes = self.parse_transaction_modes(true)?;
            return Ok(Statement::SetTransaction(SetTransactionStatement {
                scope: None,
                session_characteristics: true,
                modes,
                span: self.span_from(start).into(),
            }));
        }

        let scope = match self.current.kind.keyword() {
            Some(Keyword::Session) if self.peek_keyword(1) != Some(Keyword::Authorization) => {
                self.advance();
                Some(SetScope::Session)
            }
            Some(Keyword::Local) => {
                self.advance();
                Some(SetScope::Local)
            }
            _ => None,
        };

        if self.consume_keyword(Keyword::Transaction) {
            let modes = self.parse_transaction_modes(true)?;
            return Ok(Statement::SetTransaction(SetTransactionStatement {
                scope,
                session_characteristics: false,
                modes,
                span: self.span_from(start).into(),
            }));
        }

        let (target, value) = self.parse_set_rest()?;
        Ok(Statement::SetVariable(SetVariableStatement {
            scope,
            target,
            value,
            span: self.span_from(start).into(),
        }))
    }

    fn parse_set_rest(&mut self) -> Result<(SetTarget, SetValue)> {
        if self.consume_keywords(&[Keyword::Time, Keyword::Zone]) {
            let value = if self.consume_keyword(Keyword::Local) {
                SetValue::Local
            } else if self.consume_keyword(Keyword::Default) {
                SetValue::Default
            } else if self.check_keyword(Keyword::Interval) {
                SetValue::Interval(self.parse_zone_interval()?)
            } else {
                SetValue::Values(vec![self.parse_option_value()?])
            };
            return Ok((SetTarget::TimeZone, value));
        }
        if self.consume_keywords(&[Keyword::Session, Keyword::Authorization]) {
            let value = if self.consume_keyword(Keyword::Default) {
                SetValue::Default
            } else {
                SetValue::Values(vec![self.parse_word_value()?])
            };
            return Ok((SetTarget::SessionAuthorization, value));
        }
        match self.current.kind.keyword() {
            Some(Keyword::Schema) => {
                self.advance();
                let value = OptionValue::String(self.parse_sconst()?);
                return Ok((SetTarget::Schema, SetValue::Values(vec![value])));
            }
            Some(Keyword::Names) => {
                self.advance();
                let value = if self.consume_keyword(Keyword::Default) {
                    SetValue::Default
                } else if matches!(self.current.kind, TokenKind::String(_)) {
                    SetValue::Values(vec![OptionValue::String(self.parse_sconst()?)])
                } else {
                    SetValue::Values(Vec::new())
                };
                return Ok((SetTarget::Names, value));
            }
            Some(Keyword::Role) => {
                self.advance();
                return Ok((SetTarget::Role, SetValue::Values(vec![self.parse_word_value()?])));
            }
            _ => {}
        }

        let name = self.parse_var_name()?;
        if self.consume_keywords(&[Keyword::From, Keyword::Current]) {
            return Ok((SetTarget::Variable(name), SetValue::FromCurrent));
        }
        if !self.consume(&TokenKind::Eq) {
            self.expect_keyword(Keyword::To)?;
        }
        let value = if self.consume_keyword(Keyword::Default) {
            SetValue::Default
        } else {
            SetValue::Values(self.parse_comma_list(Self::parse_option_value)?)
        };
        Ok((SetTarget::Variable(name), value))
    }

    /// `INTERVAL 'value' [HOUR | MINUTE | HOUR TO MINUTE]` or
    /// `INTERVAL (p) 'value'` as a time zone offset.
    fn parse_zone_interval(&mut self) -> Result<Expr> {
        let interval = self.parse_interval_literal()?;
        if let ExprKind::TypedString { data_type, .. } = &interval.kind {
            if let TypeKind::Interval {
                fields: Some(fields),
                ..
            } = &data_type.kind
            {
                let hour_or_minute =
                    |field: IntervalField| matches!(field, IntervalField::Hour | IntervalField::Minute);
                if !hour_or_minute(fields.from) || !fields.to.is_none_or(hour_or_minute) {
                    return Err(self.semantic(
                        "time zone interval must be HOUR or HOUR TO MINUTE",
                        interval.span.get(),
                    ));
                }
            }
        }
        Ok(interval)
    }

    /// Parses a non-reserved word or string constant.
    fn parse_word_value(&mut self) -> Result<OptionValue> {
        if matches!(self.current.kind, TokenKind::String(_)) {
            return Ok(OptionValue::String(self.parse_sconst()?));
        }
        Ok(OptionValue::Word(self.parse_non_reserved_word()?.value))
    }

    /// `ColId ('.' ColId)*`
    fn parse_var_name(&mut self) -> Result<ObjectName> {
        let mut parts = vec![self.parse_col_id()?];
        while self.consume(&TokenKind::Dot) {
            parts.push(self.parse_col_id()?);
        }
        Ok(ObjectName::new(parts))
    }

    pub(super) fn parse_reset(&mut self) -> Result<ResetStatement> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Reset)?;
        let target = self.parse_variable_target()?;
        Ok(ResetStatement {
            target,
            span: self.span_from(start).into(),
        })
    }

    pub(super) fn parse_show(&mut self) -> Result<ShowStatement> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Show)?;
        let target = self.parse_variable_target()?;
        Ok(ShowStatement {
            target,
            span: self.span_from(start).into(),
        })
    }

    fn parse_variable_target(&mut self) -> Result<VariableTarget> {
        if self.consume_keyword(Keyword::All) {
            return Ok(VariableTarget::All);
        }
        if self.consume_keywords(&[Keyword::Time, Keyword::Zone]) {
            return Ok(VariableTarget::TimeZone);
        }
        if self.consume_keywords(&[Keyword::Transaction, Keyword::Isolation, Keyword::Level]) {
            return Ok(VariableTarget::TransactionIsolation);
        }
        if self.consume_keywords(&[Keyword::Session, Keyword::Authorization]) {
            return Ok(VariableTarget::SessionAuthorization);
        }
        Ok(VariableTarget::Name(self.parse_var_name()?))
    }

    // --- Transactions ---

    pub(super) fn parse_transaction(&mut self) -> Result<TransactionStatement> {
        let start = self.current.span.start;
        let Some(keyword) = self.current.kind.keyword() else {
            return Err(self.unexpected("transaction statement"));
        };
        self.advance();

        let kind = match keyword {
            Keyword::Begin => {
                self.consume_work_or_transaction();
                TransactionKind::Begin(self.parse_transaction_modes(false)?)
            }
            Keyword::Start => {
                self.expect_keyword(Keyword::Transaction)?;
                TransactionKind::Start(self.parse_transaction_modes(false)?)
            }
            Keyword::Commit | Keyword::End => {
                self.consume_work_or_transaction();
                TransactionKind::Commit {
                    chain: self.parse_opt_chain()?,
                }
            }
            Keyword::Rollback | Keyword::Abort => {
                self.consume_work_or_transaction();
                if keyword == Keyword::Rollback && self.consume_keyword(Keyword::To) {
                    self.consume_keyword(Keyword::Savepoint);
                    TransactionKind::RollbackTo(self.parse_col_id()?)
                } else {
                    TransactionKind::Rollback {
                        chain: self.parse_opt_chain()?,
                    }
                }
            }
            Keyword::Savepoint => TransactionKind::Savepoint(self.parse_col_id()?),
            Keyword::Release => {
                self.consume_keyword(Keyword::Savepoint);
                TransactionKind::Release(self.parse_col_id()?)
            }
            _ => return Err(self.unexpected("transaction statement")),
        };
        Ok(TransactionStatement {
            kind,
            span: self.span_from(start).into(),
        })
    }

    fn consume_work_or_transaction(&mut self) {
        if !self.consume_keyword(Keyword::Work) {
            self.consume_keyword(Keyword::Transaction);
        }
    }

    /// Parses `[AND [NO] CHAIN]`.
    fn parse_opt_chain(&mut self) -> Result<bool> {
        if !self.consume_keyword(Keyword::And) {
            return Ok(false);
        }
        let no = self.consume_keyword(Keyword::No);
        self.expect_keyword(Keyword::Chain)?;
        Ok(!no)
    }

    /// Parses transaction modes separated by commas or whitespace.
    fn parse_transaction_modes(&mut self, required: bool) -> Result<Vec<TransactionMode>> {
        let start = self.current.span.start;
        let mut modes = Vec::new();
        loop {
            let mode = match self.current.kind.keyword() {
                Some(Keyword::Isolation) => {
                    self.advance();
                    self.expect_keyword(Keyword::Level)?;
                    TransactionMode::IsolationLevel(self.parse_isolation_level()?)
                }
                Some(Keyword::Read) => {
                    self.advance();
                    if self.consume_keyword(Keyword::Only) {
                        TransactionMode::ReadOnly
                    } else {
                        self.expect_keyword(Keyword::Write)?;
                        TransactionMode::ReadWrite
                    }
                }
                Some(Keyword::Deferrable) => {
                    self.advance();
                    TransactionMode::Deferrable
                }
                Some(Keyword::Not) if self.peek_keyword(1) == Some(Keyword::Deferrable) => {
                    self.advance();
                    self.advance();
                    TransactionMode::NotDeferrable
                }
                _ if modes.is_empty() && !required => break,
                _ => return Err(self.unexpected("transaction mode")),
            };
            modes.push(mode);
            if !self.consume(&TokenKind::Comma) && !self.at_transaction_mode() {
                break;
            }
        }
        self.check_transaction_modes(&modes, self.span_from(start))?;
        Ok(modes)
    }

    fn at_transaction_mode(&mut self) -> bool {
        match self.current.kind.keyword() {
            Some(Keyword::Isolation | Keyword::Read | Keyword::Deferrable) => true,
            Some(Keyword::Not) => self.peek_keyword(1) == Some(Keyword::Deferrable),
            _ => false,
        }
    }

    fn parse_isolation_level(&mut self) -> Result<IsolationLevel> {
        if self.consume_keyword(Keyword::Serializable) {
            return Ok(IsolationLevel::Serializable);
        }
        if self.consume_keywords(&[Keyword::Repeatable, Keyword::Read]) {
            return Ok(IsolationLevel::RepeatableRead);
        }
        if self.consume_keywords(&[Keyword::Read, Keyword::Committed]) {
            return Ok(IsolationLevel::ReadCommitted);
        }
        if self.consume_keywords(&[Keyword::Read, Keyword::Uncommitted]) {
            return Ok(IsolationLevel::ReadUncommitted);
        }
        Err(self.unexpected("isolation level"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn statement(sql: &str) -> Statement {
        Parser::new(sql).parse_statement().unwrap()
    }

    fn set_variable(sql: &str) -> SetVariableStatement {
        match statement(sql) {
            Statement::SetVariable(set) => set,
            other => panic!("expected SET, got {other:?}"),
        }
    }

    fn transaction(sql: &str) -> TransactionKind {
        match statement(sql) {
            Statement::Transaction(t) => t.kind,
            other => panic!("expected transaction statement, got {other:?}"),
        }
    }

    #[test]
    fn test_set_variable_forms() {
        let set = set_variable("SET LOCAL search_path = public, 'x', 3");
        assert_eq!(set.scope, Some(SetScope::Local));
        let SetValue::Values(values) = &set.value else {
            panic!("expected values");
        };
        assert_eq!(values.len(), 3);
        assert_eq!(values[2], OptionValue::Number("3".into()));

        assert_eq!(set_variable("SET a.b TO DEFAULT").value, SetValue::Default);
        assert_eq!(set_variable("SET work_mem FROM CURRENT").value, SetValue::FromCurrent);
    }

    #[test]
    fn test_set_special_targets() {
        let set = set_variable("SET TIME ZONE LOCAL");
        assert_eq!(set.target, SetTarget::TimeZone);
        assert_eq!(set.value, SetValue::Local);

        let set = set_variable("SET SESSION AUTHORIZATION alice");
        assert_eq!(set.scope, None);
        assert_eq!(set.target, SetTarget::SessionAuthorization);

        let set = set_variable("SET SESSION SESSION AUTHORIZATION DEFAULT");
        assert_eq!(set.scope, Some(SetScope::Session));
        assert_eq!(set.value, SetValue::Default);

        assert_eq!(set_variable("SET NAMES 'UTF8'").target, SetTarget::Names);
        assert_eq!(set_variable("SET ROLE admin").target, SetTarget::Role);
    }

    #[test]
    fn test_set_time_zone_interval() {
        let set = set_variable("SET TIME ZONE INTERVAL '+00:00' HOUR TO MINUTE");
        let SetValue::Interval(interval) = &set.value else {
            panic!("expected interval, got {:?}", set.value);
        };
        assert!(matches!(
            &interval.kind,
            ExprKind::TypedString { value, .. } if value == "+00:00"
        ));
        assert_eq!(
            Statement::SetVariable(set).to_string(),
            "SET TIME ZONE INTERVAL '+00:00' HOUR TO MINUTE"
        );

        let set = set_variable("SET TIME ZONE INTERVAL(3) '-08:00'");
        assert!(matches!(set.value, SetValue::Interval(_)));

        match Parser::new("SET TIME ZONE INTERVAL '1' DAY").parse_statement() {
            Err(Error::Semantic(e)) => {
                assert_eq!(e.message, "time zone interval must be HOUR or HOUR TO MINUTE");
            }
            other => panic!("expected semantic error, got {other:?}"),
        }
    }

    #[test]
    fn test_set_transaction() {
        let Statement::SetTransaction(set) =
            statement("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY NOT DEFERRABLE")
        else {
            panic!("expected SET TRANSACTION");
        };
        assert_eq!(
            set.modes,
            vec![
                TransactionMode::IsolationLevel(IsolationLevel::RepeatableRead),
                TransactionMode::ReadOnly,
                TransactionMode::NotDeferrable,
            ]
        );

        let Statement::SetTransaction(set) =
            statement("SET SESSION CHARACTERISTICS AS TRANSACTION READ WRITE")
        else {
            panic!("expected SET SESSION CHARACTERISTICS");
        };
        assert!(set.session_characteristics);

        let err = Parser::new("BEGIN READ ONLY, READ WRITE").parse_statement().unwrap_err();
        assert!(matches!(err, Error::Semantic(_)));
    }

    #[test]
    fn test_reset_and_show() {
        let Statement::ResetVariable(reset) = statement("RESET TRANSACTION ISOLATION LEVEL")
        else {
            panic!("expected RESET");
        };
        assert_eq!(reset.target, VariableTarget::TransactionIsolation);

        let Statement::ShowVariable(show) = statement("SHOW search_path") else {
            panic!("expected SHOW");
        };
        assert!(matches!(show.target, VariableTarget::Name(_)));
    }

    #[test]
    fn test_transaction_control() {
        assert_eq!(transaction("BEGIN"), TransactionKind::Begin(Vec::new()));
        assert_eq!(
            transaction("START TRANSACTION READ ONLY"),
            TransactionKind::Start(vec![TransactionMode::ReadOnly])
        );
        assert_eq!(
            transaction("END WORK AND CHAIN"),
            TransactionKind::Commit { chain: true }
        );
        assert_eq!(
            transaction("ABORT AND NO CHAIN"),
            TransactionKind::Rollback { chain: false }
        );
        assert!(matches!(
            transaction("ROLLBACK TRANSACTION TO sp"),
            TransactionKind::RollbackTo(_)
        ));
        assert!(matches!(transaction("RELEASE sp"), TransactionKind::Release(_)));
        assert!(matches!(transaction("SAVEPOINT sp"), TransactionKind::Savepoint(_)));
    }
}
