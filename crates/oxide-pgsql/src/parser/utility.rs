//! Utility statements: `COPY`, `LOCK`, `CHECKPOINT`, `DO`, cursors and
//! sequences.

use std::collections::HashSet;
use std::mem;

use super::parser::Parser;
use crate::ast::{
    AlterSequenceStatement, CheckpointStatement, ClosePortalStatement, CopyDirection,
    CopyLegacyOption, CopyOption, CopyOptions, CopySource, CopyStatement, CopyTarget,
    CreateSequenceStatement, DeclareCursorStatement, DoStatement, DropBehavior,
    DropSequenceStatement, FetchDirection, FetchStatement, Ident, LockMode, LockStatement,
    OptionValue, Persistence, SequenceOption, Statement,
};
use crate::error::Result;
use crate::lexer::{Keyword, TokenKind};

impl<'a> Parser<'a> {
    // --- COPY ---

    pub(super) fn parse_copy(&mut self) -> Result<CopyStatement> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Copy)?;
        let binary = self.consume_keyword(Keyword::Binary);

        let source = if !binary && self.consume(&TokenKind::LeftParen) {
            let statement = match self.current.kind.keyword() {
                Some(Keyword::Insert | Keyword::Update | Keyword::Delete) => self.parse_stmt()?,
                _ => Statement::Select(self.parse_boxed_query()?),
            };
            self.expect(&TokenKind::RightParen)?;
            CopySource::Query(Box::new(statement))
        } else {
            let name = self.parse_qualified_name()?;
            let columns = if self.check(&TokenKind::LeftParen) {
                self.parse_paren_name_list()?
            } else {
                Vec::new()
            };
            CopySource::Table { name, columns }
        };

        let direction = if matches!(source, CopySource::Query(_)) {
            self.expect_keyword(Keyword::To)?;
            CopyDirection::To
        } else if self.consume_keyword(Keyword::From) {
            CopyDirection::From
        } else {
            self.expect_keyword(Keyword::To)?;
            CopyDirection::To
        };

        let target_start = self.current.span.start;
        let program = self.consume_keyword(Keyword::Program);
        let target = match self.current.kind.keyword() {
            Some(Keyword::Stdin) => {
                self.advance();
                CopyTarget::Stdin
            }
            Some(Keyword::Stdout) => {
                self.advance();
                CopyTarget::Stdout
            }
            _ => CopyTarget::File(self.parse_sconst()?),
        };
        let target = match target {
            CopyTarget::File(command) if program => CopyTarget::Program(command),
            CopyTarget::Stdin | CopyTarget::Stdout if program => {
                return Err(self.semantic(
                    "STDIN/STDOUT not allowed with PROGRAM",
                    self.span_from(target_start),
                ));
            }
            target => target,
        };

        let options = self.parse_copy_options()?;
        if binary && options.sets_format() {
            return Err(self.semantic("conflicting or redundant options", self.span_from(start)));
        }

        let selection = if self.check_keyword(Keyword::Where) {
            let where_start = self.current.span.start;
            self.advance();
            let selection = self.parse_expr()?;
            if direction == CopyDirection::To {
                return Err(self.semantic(
                    "WHERE clause not allowed with COPY TO",
                    self.span_from(where_start),
                ));
            }
            Some(selection)
        } else {
            None
        };

        Ok(CopyStatement {
            binary,
            source,
            direction,
            target,
            options,
            selection,
            span: self.span_from(start).into(),
        })
    }

    fn parse_copy_options(&mut self) -> Result<CopyOptions> {
        let start = self.current.span.start;
        let with = self.consume_keyword(Keyword::With);
        if self.consume(&TokenKind::LeftParen) {
            let options = self.parse_comma_list(|p| {
                let name = p.parse_col_label()?;
                let arg = if matches!(p.current.kind, TokenKind::Comma | TokenKind::RightParen) {
                    None
                } else {
                    Some(p.parse_option_value()?)
                };
                Ok(CopyOption { name, arg })
            })?;
            self.expect(&TokenKind::RightParen)?;
            let mut seen = HashSet::new();
            if !options.iter().all(|option| seen.insert(option.name.value.as_str())) {
                return Err(self.semantic("conflicting or redundant options", self.span_from(start)));
            }
            return Ok(CopyOptions::Generic(options));
        }

        let mut options = Vec::new();
        while let Some(option) = self.parse_copy_legacy_option()? {
            options.push(option);
        }
        if options.is_empty() && with {
            return Err(self.unexpected("COPY option"));
        }
        let mut seen = HashSet::new();
        if !options.iter().all(|option| seen.insert(mem::discriminant(option))) {
            return Err(self.semantic("conflicting or redundant options", self.span_from(start)));
        }
        Ok(CopyOptions::Legacy(options))
    }

    fn parse_copy_legacy_option(&mut self) -> Result<Option<CopyLegacyOption>> {
        let Some(kw) = self.current.kind.keyword() else {
            return Ok(None);
        };
        let option = match kw {
            Keyword::Binary => CopyLegacyOption::Binary,
            Keyword::Freeze => CopyLegacyOption::Freeze,
            Keyword::Csv => CopyLegacyOption::Csv,
            Keyword::Header => CopyLegacyOption::Header,
            Keyword::Delimiter
            | Keyword::Null
            | Keyword::Quote
            | Keyword::Escape
            | Keyword::Encoding => {
                self.advance();
                if kw != Keyword::Encoding {
                    self.consume_keyword(Keyword::As);
                }
                let value = self.parse_sconst()?;
                return Ok(Some(match kw {
                    Keyword::Delimiter => CopyLegacyOption::Delimiter(value),
                    Keyword::Null => CopyLegacyOption::Null(value),
                    Keyword::Quote => CopyLegacyOption::Quote(value),
                    Keyword::Escape => CopyLegacyOption::Escape(value),
                    _ => CopyLegacyOption::Encoding(value),
                }));
            }
            Keyword::Force => {
                self.advance();
                return self.parse_copy_force_option().map(Some);
            }
            _ => return Ok(None),
        };
        self.advance();
        Ok(Some(option))
    }

    /// Parses what follows `FORCE`.
    fn parse_copy_force_option(&mut self) -> Result<CopyLegacyOption> {
        if self.consume_keyword(Keyword::Quote) {
            if self.consume(&TokenKind::Star) {
                return Ok(CopyLegacyOption::ForceQuote(Vec::new()));
            }
            return Ok(CopyLegacyOption::ForceQuote(self.parse_column_name_list()?));
        }
        if self.consume_keywords(&[Keyword::Not, Keyword::Null]) {
            return Ok(CopyLegacyOption::ForceNotNull(self.parse_column_name_list()?));
        }
        self.expect_keyword(Keyword::Null)?;
        Ok(CopyLegacyOption::ForceNull(self.parse_column_name_list()?))
    }

    fn parse_column_name_list(&mut self) -> Result<Vec<Ident>> {
        self.parse_comma_list(Self::parse_col_id)
    }

    /// Parses an option argument shared by `COPY (...)` and `SET`.
    pub(super) fn parse_option_value(&mut self) -> Result<OptionValue> {
        let value = match &self.current.kind {
            TokenKind::String(s) => OptionValue::String(s.clone()),
            TokenKind::Integer(_) | TokenKind::Numeric(_) | TokenKind::Minus | TokenKind::Plus => {
                return Ok(OptionValue::Number(self.parse_numeric_only()?));
            }
            TokenKind::Star => OptionValue::Star,
            TokenKind::LeftParen => {
                self.advance();
                let values = self.parse_comma_list(Self::parse_option_value)?;
                self.expect(&TokenKind::RightParen)?;
                return Ok(OptionValue::List(values));
            }
            TokenKind::Identifier(word) | TokenKind::QuotedIdentifier(word) => {
                OptionValue::Word(word.clone())
            }
            TokenKind::Keyword(kw @ (Keyword::True | Keyword::False | Keyword::On)) => {
                OptionValue::Word(kw.as_str().to_ascii_lowercase())
            }
            TokenKind::Keyword(kw) if kw.is_non_reserved_word() => {
                OptionValue::Word(kw.as_str().to_ascii_lowercase())
            }
            _ => return Err(self.unexpected("option value")),
        };
        self.advance();
        Ok(value)
    }

    /// Parses an identifier or string constant as a plain string.
    fn parse_word_or_sconst(&mut self) -> Result<String> {
        if matches!(self.current.kind, TokenKind::String(_)) {
            return self.parse_sconst();
        }
        Ok(self.parse_non_reserved_word()?.value)
    }

    // --- LOCK, CHECKPOINT, DO ---

    pub(super) fn parse_lock(&mut self) -> Result<LockStatement> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Lock)?;
        self.consume_keyword(Keyword::Table);
        let tables = self.parse_comma_list(Self::parse_relation_expr)?;
        let mode = if self.consume_keyword(Keyword::In) {
            let mode = self.parse_lock_mode()?;
            self.expect_keyword(Keyword::Mode)?;
            Some(mode)
        } else {
            None
        };
        let nowait = self.consume_keyword(Keyword::Nowait);
        Ok(LockStatement {
            tables,
            mode,
            nowait,
            span: self.span_from(start).into(),
        })
    }

    fn parse_lock_mode(&mut self) -> Result<LockMode> {
        let mode = match self.current.kind.keyword() {
            Some(Keyword::Access) => {
                self.advance();
                if self.consume_keyword(Keyword::Share) {
                    LockMode::AccessShare
                } else {
                    self.expect_keyword(Keyword::Exclusive)?;
                    LockMode::AccessExclusive
                }
            }
            Some(Keyword::Row) => {
                self.advance();
                if self.consume_keyword(Keyword::Share) {
                    LockMode::RowShare
                } else {
                    self.expect_keyword(Keyword::Exclusive)?;
                    LockMode::RowExclusive
                }
            }
            Some(Keyword::Share) => {
                self.advance();
                if self.consume_keywords(&[Keyword::Update, Keyword::Exclusive]) {
                    LockMode::ShareUpdateExclusive
                } else if self.consume_keywords(&[Keyword::Row, Keyword::Exclusive]) {
                    LockMode::ShareRowExclusive
                } else {
                    LockMode::Share
                }
            }
            Some(Keyword::Exclusive) => {
                self.advance();
                LockMode::Exclusive
            }
            _ => return Err(self.unexpected("lock mode")),
        };
        Ok(mode)
    }

    pub(super) fn parse_checkpoint(&mut self) -> Result<CheckpointStatement> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Checkpoint)?;
        Ok(CheckpointStatement {
            span: self.span_from(start).into(),
        })
    }

    /// Parses `DO [LANGUAGE lang] 'code'` with the items in either order.
    pub(super) fn parse_do(&mut self) -> Result<DoStatement> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Do)?;
        let mut code = None;
        let mut language = None;
        loop {
            let item_start = self.current.span.start;
            let redundant = if matches!(self.current.kind, TokenKind::String(_)) {
                code.replace(self.parse_sconst()?).is_some()
            } else if self.consume_keyword(Keyword::Language) {
                language.replace(self.parse_word_or_sconst()?).is_some()
            } else {
                break;
            };
            if redundant {
                return Err(self.semantic(
                    "conflicting or redundant options",
                    self.span_from(item_start),
                ));
            }
        }
        let span = self.span_from(start);
        let Some(code) = code else {
            return Err(self.semantic("no inline code specified", span));
        };
        Ok(DoStatement {
            code,
            language,
            span: span.into(),
        })
    }

    // --- Cursors ---

    /// Parses `FETCH` or `MOVE`.
    pub(super) fn parse_fetch(&mut self) -> Result<FetchStatement> {
        let start = self.current.span.start;
        let is_move = self.check_keyword(Keyword::Move);
        self.advance();

        let direction = match self.current.kind.keyword() {
            Some(Keyword::Next) => self.fetch_keyword(FetchDirection::Next),
            Some(Keyword::Prior) => self.fetch_keyword(FetchDirection::Prior),
            Some(Keyword::First) => self.fetch_keyword(FetchDirection::First),
            Some(Keyword::Last) => self.fetch_keyword(FetchDirection::Last),
            Some(Keyword::All) => self.fetch_keyword(FetchDirection::All),
            Some(Keyword::Absolute) => {
                self.advance();
                FetchDirection::Absolute(self.parse_signed_iconst()?)
            }
            Some(Keyword::Relative) => {
                self.advance();
                FetchDirection::Relative(self.parse_signed_iconst()?)
            }
            Some(Keyword::Forward) => {
                self.advance();
                if self.consume_keyword(Keyword::All) {
                    FetchDirection::ForwardAll
                } else {
                    FetchDirection::Forward(self.parse_opt_signed_iconst()?)
                }
            }
            Some(Keyword::Backward) => {
                self.advance();
                if self.consume_keyword(Keyword::All) {
                    FetchDirection::BackwardAll
                } else {
                    FetchDirection::Backward(self.parse_opt_signed_iconst()?)
                }
            }
            _ => match self.parse_opt_signed_iconst()? {
                Some(n) => FetchDirection::Count(n),
                None => FetchDirection::Next,
            },
        };

        if !self.consume_keyword(Keyword::From) {
            self.consume_keyword(Keyword::In);
        }
        let cursor = self.parse_col_id()?;
        Ok(FetchStatement {
            is_move,
            direction,
            cursor,
            span: self.span_from(start).into(),
        })
    }

    fn fetch_keyword(&mut self, direction: FetchDirection) -> FetchDirection {
        self.advance();
        direction
    }

    fn parse_opt_signed_iconst(&mut self) -> Result<Option<i64>> {
        if matches!(
            self.current.kind,
            TokenKind::Integer(_) | TokenKind::Minus | TokenKind::Plus
        ) {
            Ok(Some(self.parse_signed_iconst()?))
        } else {
            Ok(None)
        }
    }

    pub(super) fn parse_declare_cursor(&mut self) -> Result<DeclareCursorStatement> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Declare)?;
        let name = self.parse_col_id()?;

        let mut binary = false;
        let mut insensitive = false;
        let mut scroll = None;
        loop {
            let option_start = self.current.span.start;
            let value = match self.current.kind.keyword() {
                Some(Keyword::Binary) => {
                    self.advance();
                    binary = true;
                    continue;
                }
                Some(Keyword::Insensitive) => {
                    self.advance();
                    insensitive = true;
                    continue;
                }
                Some(Keyword::Scroll) => {
                    self.advance();
                    true
                }
                Some(Keyword::No) if self.peek_keyword(1) == Some(Keyword::Scroll) => {
                    self.advance();
                    self.advance();
                    false
                }
                _ => break,
            };
            if scroll.is_some_and(|previous| previous != value) {
                return Err(self.semantic(
                    "cannot specify both SCROLL and NO SCROLL",
                    self.span_from(option_start),
                ));
            }
            scroll = Some(value);
        }

        self.expect_keyword(Keyword::Cursor)?;
        let hold = if self.consume_keywords(&[Keyword::With, Keyword::Hold]) {
            true
        } else {
            self.consume_keywords(&[Keyword::Without, Keyword::Hold]);
            false
        };
        self.expect_keyword(Keyword::For)?;
        let query = self.parse_query()?;
        Ok(DeclareCursorStatement {
            name,
            binary,
            insensitive,
            scroll,
            hold,
            query: Box::new(query),
            span: self.span_from(start).into(),
        })
    }

    pub(super) fn parse_close(&mut self) -> Result<ClosePortalStatement> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Close)?;
        let name = if self.consume_keyword(Keyword::All) {
            None
        } else {
            Some(self.parse_col_id()?)
        };
        Ok(ClosePortalStatement {
            name,
            span: self.span_from(start).into(),
        })
    }

    // --- Sequences ---

    pub(super) fn parse_create_sequence(&mut self) -> Result<CreateSequenceStatement> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Create)?;
        let persistence = match self.current.kind.keyword() {
            Some(Keyword::Temp | Keyword::Temporary) => {
                self.advance();
                Some(Persistence::Temporary)
            }
            Some(Keyword::Local | Keyword::Global) => {
                self.advance();
                if !self.consume_keyword(Keyword::Temp) {
                    self.expect_keyword(Keyword::Temporary)?;
                }
                Some(Persistence::Temporary)
            }
            Some(Keyword::Unlogged) => {
                self.advance();
                Some(Persistence::Unlogged)
            }
            _ => None,
        };
        self.expect_keyword(Keyword::Sequence)?;
        let if_not_exists = self.consume_keywords(&[Keyword::If, Keyword::Not, Keyword::Exists]);
        let name = self.parse_qualified_name()?;
        let options = self.parse_sequence_options()?;
        let span = self.span_from(start);
        self.check_sequence_options(&options, span)?;
        Ok(CreateSequenceStatement {
            persistence,
            if_not_exists,
            name,
            options,
            span: span.into(),
        })
    }

    pub(super) fn parse_alter_sequence(&mut self) -> Result<AlterSequenceStatement> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Alter)?;
        self.expect_keyword(Keyword::Sequence)?;
        let if_exists = self.consume_keywords(&[Keyword::If, Keyword::Exists]);
        let name = self.parse_qualified_name()?;
        let options = self.parse_sequence_options()?;
        if options.is_empty() {
            return Err(self.unexpected("sequence option"));
        }
        let span = self.span_from(start);
        self.check_sequence_options(&options, span)?;
        Ok(AlterSequenceStatement {
            if_exists,
            name,
            options,
            span: span.into(),
        })
    }

    pub(super) fn parse_drop_sequence(&mut self) -> Result<DropSequenceStatement> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Drop)?;
        self.expect_keyword(Keyword::Sequence)?;
        let if_exists = self.consume_keywords(&[Keyword::If, Keyword::Exists]);
        let names = self.parse_comma_list(Self::parse_qualified_name)?;
        let behavior = if self.consume_keyword(Keyword::Cascade) {
            Some(DropBehavior::Cascade)
        } else if self.consume_keyword(Keyword::Restrict) {
            Some(DropBehavior::Restrict)
        } else {
            None
        };
        Ok(DropSequenceStatement {
            if_exists,
            names,
            behavior,
            span: self.span_from(start).into(),
        })
    }

    fn parse_sequence_options(&mut self) -> Result<Vec<SequenceOption>> {
        let mut options = Vec::new();
        while let Some(option) = self.parse_sequence_option()? {
            options.push(option);
        }
        Ok(options)
    }

    fn parse_sequence_option(&mut self) -> Result<Option<SequenceOption>> {
        let option = match self.current.kind.keyword() {
            Some(Keyword::As) => {
                self.advance();
                SequenceOption::As(self.parse_simple_type_name()?)
            }
            Some(Keyword::Cache) => {
                self.advance();
                SequenceOption::Cache(self.parse_numeric_only()?)
            }
            Some(Keyword::Cycle) => {
                self.advance();
                SequenceOption::Cycle(true)
            }
            Some(Keyword::No) => {
                self.advance();
                match self.current.kind.keyword() {
                    Some(Keyword::Cycle) => {
                        self.advance();
                        SequenceOption::Cycle(false)
                    }
                    Some(Keyword::Maxvalue) => {
                        self.advance();
                        SequenceOption::MaxValue(None)
                    }
                    Some(Keyword::Minvalue) => {
                        self.advance();
                        SequenceOption::MinValue(None)
                    }
                    _ => return Err(self.unexpected("CYCLE, MAXVALUE or MINVALUE")),
                }
            }
            Some(Keyword::Increment) => {
                self.advance();
                self.consume_keyword(Keyword::By);
                SequenceOption::IncrementBy(self.parse_numeric_only()?)
            }
            Some(Keyword::Maxvalue) => {
                self.advance();
                SequenceOption::MaxValue(Some(self.parse_numeric_only()?))
            }
            Some(Keyword::Minvalue) => {
                self.advance();
                SequenceOption::MinValue(Some(self.parse_numeric_only()?))
            }
            Some(Keyword::Owned) => {
                self.advance();
                self.expect_keyword(Keyword::By)?;
                let none = self.check_keyword(Keyword::None)
                    && !matches!(self.peek_nth(1).kind, TokenKind::Dot);
                if none {
                    self.advance();
                    SequenceOption::OwnedBy(None)
                } else {
                    SequenceOption::OwnedBy(Some(self.parse_qualified_name()?))
                }
            }
            Some(Keyword::Sequence) => {
                self.advance();
                self.expect_keyword(Keyword::Name)?;
                SequenceOption::SequenceName(self.parse_qualified_name()?)
            }
            Some(Keyword::Start) => {
                self.advance();
                self.consume_keyword(Keyword::With);
                SequenceOption::Start(self.parse_numeric_only()?)
            }
            Some(Keyword::Restart) => {
                self.advance();
                let with = self.consume_keyword(Keyword::With);
                let at_number = matches!(
                    self.current.kind,
                    TokenKind::Integer(_) | TokenKind::Numeric(_) | TokenKind::Minus | TokenKind::Plus
                );
                if with || at_number {
                    SequenceOption::Restart(Some(self.parse_numeric_only()?))
                } else {
                    SequenceOption::Restart(None)
                }
            }
            _ => return Ok(None),
        };
        Ok(Some(option))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn statement(sql: &str) -> Statement {
        Parser::new(sql).parse_statement().unwrap()
    }

    fn semantic_message(sql: &str) -> String {
        match Parser::new(sql).parse_statement() {
            Err(Error::Semantic(e)) => e.message,
            other => panic!("expected semantic error for {sql:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_copy_generic_options() {
        let Statement::Copy(copy) =
            statement("COPY t (a, b) FROM STDIN WITH (FORMAT csv, HEADER, FORCE_QUOTE *)")
        else {
            panic!("expected COPY");
        };
        assert_eq!(copy.direction, CopyDirection::From);
        assert_eq!(copy.target, CopyTarget::Stdin);
        let CopyOptions::Generic(options) = &copy.options else {
            panic!("expected generic options");
        };
        assert_eq!(options[0].arg, Some(OptionValue::Word("csv".into())));
        assert_eq!(options[1].arg, None);
        assert_eq!(options[2].arg, Some(OptionValue::Star));
    }

    #[test]
    fn test_copy_legacy_options() {
        let Statement::Copy(copy) = statement(
            "COPY t TO '/tmp/t.csv' WITH CSV HEADER DELIMITER AS ';' FORCE QUOTE a, b",
        ) else {
            panic!("expected COPY");
        };
        let CopyOptions::Legacy(options) = &copy.options else {
            panic!("expected legacy options");
        };
        assert_eq!(options.len(), 4);
        assert_eq!(options[2], CopyLegacyOption::Delimiter(";".into()));
    }

    #[test]
    fn test_copy_query_and_program() {
        let Statement::Copy(copy) =
            statement("COPY (SELECT * FROM t) TO PROGRAM 'gzip > /tmp/t.gz'")
        else {
            panic!("expected COPY");
        };
        assert!(matches!(copy.source, CopySource::Query(_)));
        assert_eq!(copy.target, CopyTarget::Program("gzip > /tmp/t.gz".into()));
    }

    #[test]
    fn test_copy_leading_binary() {
        let Statement::Copy(copy) = statement("COPY BINARY t FROM STDIN") else {
            panic!("expected COPY");
        };
        assert!(copy.binary);
        assert!(matches!(copy.source, CopySource::Table { .. }));
        assert_eq!(copy.to_string(), "COPY BINARY t FROM STDIN");

        assert_eq!(
            semantic_message("COPY BINARY t TO STDOUT CSV"),
            "conflicting or redundant options"
        );
        assert_eq!(
            semantic_message("COPY BINARY t TO STDOUT WITH (FORMAT text)"),
            "conflicting or redundant options"
        );
        assert!(Parser::new("COPY BINARY (SELECT 1) TO STDOUT").parse_statement().is_err());
    }

    #[test]
    fn test_copy_errors() {
        assert_eq!(
            semantic_message("COPY t TO STDOUT WHERE a > 1"),
            "WHERE clause not allowed with COPY TO"
        );
        assert_eq!(
            semantic_message("COPY t FROM PROGRAM STDIN"),
            "STDIN/STDOUT not allowed with PROGRAM"
        );
        assert_eq!(
            semantic_message("COPY t FROM STDIN WITH (format csv, format text)"),
            "conflicting or redundant options"
        );
        assert!(Parser::new("COPY (SELECT 1) FROM STDIN").parse_statement().is_err());
    }

    #[test]
    fn test_lock_modes() {
        let Statement::Lock(lock) =
            statement("LOCK TABLE a, ONLY b IN SHARE ROW EXCLUSIVE MODE NOWAIT")
        else {
            panic!("expected LOCK");
        };
        assert_eq!(lock.tables.len(), 2);
        assert_eq!(lock.mode, Some(LockMode::ShareRowExclusive));
        assert!(lock.nowait);
    }

    #[test]
    fn test_do_blocks() {
        let Statement::Do(block) = statement("DO 'BEGIN NULL; END' LANGUAGE plpgsql") else {
            panic!("expected DO");
        };
        assert_eq!(block.language.as_deref(), Some("plpgsql"));
        assert_eq!(semantic_message("DO LANGUAGE plpgsql"), "no inline code specified");
        assert_eq!(semantic_message("DO 'a' 'b'"), "conflicting or redundant options");
    }

    #[test]
    fn test_fetch_directions() {
        let cases = [
            ("FETCH c", FetchDirection::Next),
            ("FETCH PRIOR FROM c", FetchDirection::Prior),
            ("FETCH ABSOLUTE -2 IN c", FetchDirection::Absolute(-2)),
            ("FETCH 5 c", FetchDirection::Count(5)),
            ("MOVE FORWARD ALL FROM c", FetchDirection::ForwardAll),
            ("MOVE BACKWARD 3 c", FetchDirection::Backward(Some(3))),
            ("FETCH FORWARD FROM c", FetchDirection::Forward(None)),
        ];
        for (sql, expected) in cases {
            let Statement::Fetch(fetch) = statement(sql) else {
                panic!("expected FETCH for {sql:?}");
            };
            assert_eq!(fetch.direction, expected, "{sql}");
            assert_eq!(fetch.cursor.value, "c");
        }
    }

    #[test]
    fn test_declare_cursor() {
        let Statement::DeclareCursor(declare) =
            statement("DECLARE c BINARY NO SCROLL CURSOR WITH HOLD FOR SELECT 1")
        else {
            panic!("expected DECLARE");
        };
        assert!(declare.binary);
        assert_eq!(declare.scroll, Some(false));
        assert!(declare.hold);
        assert_eq!(
            semantic_message("DECLARE c SCROLL NO SCROLL CURSOR FOR SELECT 1"),
            "cannot specify both SCROLL and NO SCROLL"
        );
    }

    #[test]
    fn test_close() {
        let Statement::ClosePortal(close) = statement("CLOSE ALL") else {
            panic!("expected CLOSE");
        };
        assert!(close.name.is_none());
    }

    #[test]
    fn test_sequences() {
        let Statement::CreateSequence(create) = statement(
            "CREATE TEMP SEQUENCE IF NOT EXISTS s AS bigint INCREMENT BY -1 NO MAXVALUE \
             START WITH 10 OWNED BY NONE",
        ) else {
            panic!("expected CREATE SEQUENCE");
        };
        assert_eq!(create.persistence, Some(Persistence::Temporary));
        assert!(create.if_not_exists);
        assert_eq!(create.options[1], SequenceOption::IncrementBy("-1".into()));
        assert_eq!(create.options[4], SequenceOption::OwnedBy(None));

        let Statement::AlterSequence(alter) = statement("ALTER SEQUENCE s RESTART") else {
            panic!("expected ALTER SEQUENCE");
        };
        assert_eq!(alter.options, vec![SequenceOption::Restart(None)]);

        let Statement::DropSequence(drop) = statement("DROP SEQUENCE IF EXISTS a, b CASCADE")
        else {
            panic!("expected DROP SEQUENCE");
        };
        assert_eq!(drop.names.len(), 2);
        assert_eq!(drop.behavior, Some(DropBehavior::Cascade));

        assert_eq!(
            semantic_message("CREATE SEQUENCE s CACHE 1 CACHE 2"),
            "conflicting or redundant options"
        );
    }
}
