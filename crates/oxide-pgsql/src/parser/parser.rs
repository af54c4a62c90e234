//! SQL Parser implementation.
//!
//! The parser is split across several files, one per grammar area; this one
//! holds the token window, the shared helpers and statement dispatch.

use std::collections::VecDeque;

use tracing::trace;

use super::error::{ParseError, SemanticError};
use crate::ast::{Ident, ObjectName, Statement};
use crate::config::ParserOptions;
use crate::error::{Error, Result};
use crate::lexer::{Keyword, LexError, LexErrorKind, Lexer, Span, Token, TokenKind};

/// SQL Parser.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    /// The full input text.
    pub(super) input: &'a str,
    pub(super) current: Token<'a>,
    pub(super) previous: Token<'a>,
    /// Tokens read ahead of `current`.
    lookahead: VecDeque<Token<'a>>,
    /// Parameter counter for ? placeholders.
    pub(super) param_counter: u32,
    /// Current nesting depth.
    depth: usize,
    /// Open links of loop-built operator, postfix and join chains.
    chain: usize,
    pub(super) options: ParserOptions,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self::with_options(input, ParserOptions::default())
    }

    /// Creates a new parser with explicit options.
    ///
    /// Inputs over `max_input_len` are rejected by the first parse call
    /// without being lexed.
    #[must_use]
    pub fn with_options(input: &'a str, options: ParserOptions) -> Self {
        let eof = Token::new(TokenKind::Eof, "", Span::new(0, 0));
        match options.max_input_len {
            Some(max) if input.len() > max => {
                let kind = LexErrorKind::InputTooLarge {
                    len: input.len(),
                    max,
                };
                Self {
                    lexer: Lexer::at(input, input.len()),
                    input,
                    current: Token::new(TokenKind::Error(kind), "", Span::new(0, input.len())),
                    previous: eof,
                    lookahead: VecDeque::new(),
                    param_counter: 0,
                    depth: 0,
                    chain: 0,
                    options,
                }
            }
            _ => {
                let mut lexer = Lexer::new(input);
                let current = lexer.next_token();
                Self {
                    lexer,
                    input,
                    current,
                    previous: eof,
                    lookahead: VecDeque::new(),
                    param_counter: 0,
                    depth: 0,
                    chain: 0,
                    options,
                }
            }
        }
    }

    /// Parses a `;`-separated script, returning one statement per entry.
    ///
    /// Empty statements (`;;`) are skipped.
    ///
    /// # Errors
    ///
    /// Returns the first lex, parse or semantic error.
    pub fn parse_statements(&mut self) -> Result<Vec<Statement>> {
        let mut statements = Vec::new();
        loop {
            while self.consume(&TokenKind::Semicolon) {}
            if self.current.is_eof() {
                return Ok(statements);
            }
            statements.push(self.parse_stmt()?);
            if !self.current.is_eof() && !self.check(&TokenKind::Semicolon) {
                return Err(self.unexpected("\";\" or end of input"));
            }
        }
    }

    /// Parses exactly one statement, optionally followed by `;`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a single valid statement.
    pub fn parse_statement(&mut self) -> Result<Statement> {
        let statement = self.parse_stmt()?;
        self.consume(&TokenKind::Semicolon);
        if !self.current.is_eof() {
            return Err(self.unexpected("end of input"));
        }
        Ok(statement)
    }

    /// Parses one statement of any kind.
    pub(super) fn parse_stmt(&mut self) -> Result<Statement> {
        let start = self.current.span.start;
        let statement = match self.current.kind.keyword() {
            Some(Keyword::With) => {
                let with = self.parse_with_clause()?;
                match self.current.kind.keyword() {
                    Some(Keyword::Insert) => {
                        Statement::Insert(Box::new(self.parse_insert(Some(with), start)?))
                    }
                    Some(Keyword::Update) => {
                        Statement::Update(Box::new(self.parse_update(Some(with), start)?))
                    }
                    Some(Keyword::Delete) => {
                        Statement::Delete(Box::new(self.parse_delete(Some(with), start)?))
                    }
                    _ => Statement::Select(Box::new(self.parse_query_with(Some(with), start)?)),
                }
            }
            Some(Keyword::Select | Keyword::Values | Keyword::Table) => {
                Statement::Select(self.parse_boxed_query()?)
            }
            Some(Keyword::Insert) => Statement::Insert(Box::new(self.parse_insert(None, start)?)),
            Some(Keyword::Update) => Statement::Update(Box::new(self.parse_update(None, start)?)),
            Some(Keyword::Delete) => Statement::Delete(Box::new(self.parse_delete(None, start)?)),
            Some(Keyword::Copy) => Statement::Copy(Box::new(self.parse_copy()?)),
            Some(Keyword::Lock) => Statement::Lock(self.parse_lock()?),
            Some(Keyword::Checkpoint) => Statement::Checkpoint(self.parse_checkpoint()?),
            Some(Keyword::Do) => Statement::Do(self.parse_do()?),
            Some(Keyword::Fetch | Keyword::Move) => Statement::Fetch(self.parse_fetch()?),
            Some(Keyword::Declare) => {
                Statement::DeclareCursor(Box::new(self.parse_declare_cursor()?))
            }
            Some(Keyword::Close) => Statement::ClosePortal(self.parse_close()?),
            Some(Keyword::Create) => Statement::CreateSequence(self.parse_create_sequence()?),
            Some(Keyword::Alter) => Statement::AlterSequence(self.parse_alter_sequence()?),
            Some(Keyword::Drop) => Statement::DropSequence(self.parse_drop_sequence()?),
            Some(Keyword::Set) => self.parse_set()?,
            Some(Keyword::Reset) => Statement::ResetVariable(self.parse_reset()?),
            Some(Keyword::Show) => Statement::ShowVariable(self.parse_show()?),
            Some(
                Keyword::Begin
                | Keyword::Start
                | Keyword::Commit
                | Keyword::End
                | Keyword::Rollback
                | Keyword::Abort
                | Keyword::Savepoint
                | Keyword::Release,
            ) => Statement::Transaction(self.parse_transaction()?),
            None if self.check(&TokenKind::LeftParen) => {
                Statement::Select(self.parse_boxed_query()?)
            }
            _ => return Err(self.unexpected("statement")),
        };
        trace!(kind = statement.kind_name(), "parsed statement");
        Ok(statement)
    }

    // --- Name productions ---

    /// Parses an identifier allowed by `keyword_ok` for keyword tokens.
    fn parse_name(&mut self, expected: &str, keyword_ok: fn(Keyword) -> bool) -> Result<Ident> {
        let ident = match &self.current.kind {
            TokenKind::Identifier(value) => Ident::new(value.clone()),
            TokenKind::QuotedIdentifier(value) => Ident::quoted(value.clone()),
            TokenKind::Keyword(kw) if keyword_ok(*kw) => {
                Ident::new(self.current.text.to_ascii_lowercase())
            }
            _ => return Err(self.unexpected(expected)),
        };
        let span = self.current.span;
        self.advance();
        Ok(ident.with_span(span))
    }

    /// `ColId`: identifier, unreserved or column-name keyword.
    pub(super) fn parse_col_id(&mut self) -> Result<Ident> {
        self.parse_name("identifier", Keyword::is_col_id)
    }

    /// `ColLabel`: identifier or any keyword.
    pub(super) fn parse_col_label(&mut self) -> Result<Ident> {
        self.parse_name("label", |_| true)
    }

    /// `type_function_name`: identifier, unreserved or type/function keyword.
    pub(super) fn parse_type_function_name(&mut self) -> Result<Ident> {
        self.parse_name("type or function name", Keyword::is_type_function_name)
    }

    /// `NonReservedWord`: identifier or any non-reserved keyword.
    pub(super) fn parse_non_reserved_word(&mut self) -> Result<Ident> {
        self.parse_name("identifier", Keyword::is_non_reserved_word)
    }

    /// Returns true if the current token can be parsed as a `ColId`.
    pub(super) fn at_col_id(&self) -> bool {
        Self::is_col_id_token(&self.current.kind)
    }

    /// Returns true if `kind` can be parsed as a `ColId`.
    pub(super) fn is_col_id_token(kind: &TokenKind) -> bool {
        match kind {
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => true,
            TokenKind::Keyword(kw) => kw.is_col_id(),
            _ => false,
        }
    }

    /// Returns true if `kind` can be parsed as a `type_function_name`.
    pub(super) fn is_type_function_name_token(kind: &TokenKind) -> bool {
        match kind {
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => true,
            TokenKind::Keyword(kw) => kw.is_type_function_name(),
            _ => false,
        }
    }

    /// Returns true if `kind` can be parsed as a `ColLabel`.
    pub(super) fn is_col_label_token(kind: &TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) | TokenKind::Keyword(_)
        )
    }

    /// `qualified_name`: `ColId ('.' ColLabel)*`.
    pub(super) fn parse_qualified_name(&mut self) -> Result<ObjectName> {
        let mut parts = vec![self.parse_col_id()?];
        while self.check(&TokenKind::Dot) {
            self.advance();
            parts.push(self.parse_col_label()?);
        }
        Ok(ObjectName::new(parts))
    }

    /// `(name, ...)` with `ColId` names.
    pub(super) fn parse_paren_name_list(&mut self) -> Result<Vec<Ident>> {
        self.expect(&TokenKind::LeftParen)?;
        let names = self.parse_comma_list(Self::parse_col_id)?;
        self.expect(&TokenKind::RightParen)?;
        Ok(names)
    }

    // --- Constants ---

    /// Parses a string constant.
    pub(super) fn parse_sconst(&mut self) -> Result<String> {
        match &self.current.kind {
            TokenKind::String(s) => {
                let s = s.clone();
                self.advance();
                Ok(s)
            }
            _ => Err(self.unexpected("string constant")),
        }
    }

    /// Parses an unsigned integer constant.
    pub(super) fn parse_iconst(&mut self) -> Result<i64> {
        match self.current.kind {
            TokenKind::Integer(i) => {
                self.advance();
                Ok(i)
            }
            _ => Err(self.unexpected("integer constant")),
        }
    }

    /// Parses an optionally signed integer constant.
    pub(super) fn parse_signed_iconst(&mut self) -> Result<i64> {
        let negative = match self.current.kind {
            TokenKind::Minus => true,
            TokenKind::Plus => false,
            _ => return self.parse_iconst(),
        };
        self.advance();
        let value = self.parse_iconst()?;
        Ok(if negative { -value } else { value })
    }

    /// Parses a non-negative integer that fits in a `u32` (lengths, precisions).
    pub(super) fn parse_u32_const(&mut self) -> Result<u32> {
        let span = self.current.span;
        let value = self.parse_iconst()?;
        u32::try_from(value)
            .map_err(|_| ParseError::new("integer out of range", span, self.input).into())
    }

    /// Parses a possibly signed numeric constant, returned as written.
    pub(super) fn parse_numeric_only(&mut self) -> Result<String> {
        let sign = match self.current.kind {
            TokenKind::Minus => {
                self.advance();
                "-"
            }
            TokenKind::Plus => {
                self.advance();
                ""
            }
            _ => "",
        };
        match &self.current.kind {
            TokenKind::Integer(_) | TokenKind::Numeric(_) => {
                let text = format!("{sign}{}", self.current.text);
                self.advance();
                Ok(text)
            }
            _ => Err(self.unexpected("numeric constant")),
        }
    }

    // --- Depth guard ---

    /// Runs `f` one nesting level deeper, failing once `max_depth` is reached.
    ///
    /// Chain links opened inside `f` are released when it returns.
    pub(super) fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= self.options.max_depth {
            return Err(self.parse_error(
                format!(
                    "statement nesting exceeds the maximum depth of {}",
                    self.options.max_depth
                ),
                self.current.span,
            ));
        }
        let chain = self.chain;
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        self.chain = chain;
        result
    }

    /// Opens one more link of a chain that a loop builds into a left-deep
    /// tree (`a + b + c`, `x[1][2]`, `a JOIN b JOIN c`, `q UNION q UNION q`).
    pub(super) fn extend_chain(&mut self) -> Result<()> {
        if self.chain >= self.options.max_chain_len {
            return Err(self.parse_error(
                format!(
                    "operator chain exceeds the maximum length of {}",
                    self.options.max_chain_len
                ),
                self.current.span,
            ));
        }
        self.chain += 1;
        Ok(())
    }

    // --- Error helpers ---

    /// Builds an error for the current token.
    ///
    /// A malformed token turns into the lexer's error.
    pub(super) fn unexpected(&self, expected: &str) -> Error {
        match &self.current.kind {
            TokenKind::Error(kind) => {
                LexError::new(kind.clone(), self.current.span, self.input).into()
            }
            TokenKind::Eof => {
                ParseError::unexpected_eof(expected, self.current.span, self.input).into()
            }
            _ => ParseError::unexpected(expected, self.current.text, self.current.span, self.input)
                .into(),
        }
    }

    /// Builds a parse error with a custom message.
    pub(super) fn parse_error(&self, message: impl Into<String>, span: Span) -> Error {
        ParseError::new(message, span, self.input).into()
    }

    /// Builds a semantic error.
    pub(super) fn semantic(&self, message: impl Into<String>, span: Span) -> Error {
        SemanticError::new(message, span, self.input).into()
    }

    /// Returns the span from `start` to the end of the last consumed token.
    pub(super) fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.previous.span.end.max(start))
    }

    // --- Helper methods ---

    /// Advances to the next token.
    pub(super) fn advance(&mut self) {
        let next = match self.lookahead.pop_front() {
            Some(token) => token,
            None => self.lexer.next_token(),
        };
        self.previous = core::mem::replace(&mut self.current, next);
    }

    /// Returns the token `n` positions ahead (`0` is the current token).
    pub(super) fn peek_nth(&mut self, n: usize) -> &Token<'a> {
        if n == 0 {
            return &self.current;
        }
        while self.lookahead.len() < n {
            let token = self.lexer.next_token();
            self.lookahead.push_back(token);
        }
        &self.lookahead[n - 1]
    }

    /// Returns the keyword `n` positions ahead, if any.
    pub(super) fn peek_keyword(&mut self, n: usize) -> Option<Keyword> {
        self.peek_nth(n).kind.keyword()
    }

    /// Checks if the current token matches the given kind.
    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        core::mem::discriminant(&self.current.kind) == core::mem::discriminant(kind)
    }

    /// Checks if the current token is the given keyword.
    pub(super) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current.is(keyword)
    }

    /// Consumes the current token if it matches the given kind.
    pub(super) fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the current token if it is the given keyword.
    pub(super) fn consume_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the given keywords if they all follow in sequence.
    pub(super) fn consume_keywords(&mut self, keywords: &[Keyword]) -> bool {
        for (i, kw) in keywords.iter().enumerate() {
            if self.peek_keyword(i) != Some(*kw) {
                return false;
            }
        }
        for _ in keywords {
            self.advance();
        }
        true
    }

    /// Expects the current token to be the given kind.
    pub(super) fn expect(&mut self, kind: &TokenKind) -> Result<()> {
        if self.consume(kind) {
            Ok(())
        } else {
            Err(self.unexpected(&describe(kind)))
        }
    }

    /// Expects the current token to be the given keyword.
    pub(super) fn expect_keyword(&mut self, keyword: Keyword) -> Result<()> {
        if self.consume_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(keyword.as_str()))
        }
    }

    /// Parses one or more items separated by commas.
    pub(super) fn parse_comma_list<T>(
        &mut self,
        mut f: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<Vec<T>> {
        let mut items = vec![f(self)?];
        while self.consume(&TokenKind::Comma) {
            items.push(f(self)?);
        }
        Ok(items)
    }
}

/// Describes an expected token for error messages.
fn describe(kind: &TokenKind) -> String {
    let text = match kind {
        TokenKind::LeftParen => "(",
        TokenKind::RightParen => ")",
        TokenKind::LeftBracket => "[",
        TokenKind::RightBracket => "]",
        TokenKind::Comma => ",",
        TokenKind::Semicolon => ";",
        TokenKind::Dot => ".",
        TokenKind::Colon => ":",
        TokenKind::DoubleColon => "::",
        other => match other.operator_text() {
            Some(op) => op,
            None => return format!("{other:?}"),
        },
    };
    format!("\"{text}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_nth_does_not_consume() {
        let mut parser = Parser::new("a b c");
        assert_eq!(parser.peek_nth(2).text, "c");
        assert_eq!(parser.current.text, "a");
        parser.advance();
        assert_eq!(parser.current.text, "b");
        assert_eq!(parser.previous.text, "a");
        parser.advance();
        assert_eq!(parser.current.text, "c");
    }

    #[test]
    fn test_consume_keywords_all_or_nothing() {
        let mut parser = Parser::new("NOT NULL x");
        assert!(!parser.consume_keywords(&[Keyword::Not, Keyword::Like]));
        assert!(parser.check_keyword(Keyword::Not));
        assert!(parser.consume_keywords(&[Keyword::Not, Keyword::Null]));
        assert_eq!(parser.current.text, "x");
    }

    #[test]
    fn test_col_id_rejects_type_func_keyword() {
        let mut parser = Parser::new("left");
        assert!(parser.parse_col_id().is_err());
        let mut parser = Parser::new("left");
        assert_eq!(parser.parse_type_function_name().unwrap().value, "left");
    }

    #[test]
    fn test_col_label_accepts_reserved() {
        let mut parser = Parser::new("USER");
        let ident = parser.parse_col_label().unwrap();
        assert_eq!(ident.value, "user");
        assert!(!ident.quoted);
    }

    #[test]
    fn test_input_too_large_is_reported_before_lexing() {
        let options = ParserOptions::default().max_input_len(4);
        let mut parser = Parser::with_options("SELECT 'unterminated", options);
        let err = parser.parse_statements().unwrap_err();
        assert!(matches!(
            err,
            Error::Lex(LexError {
                kind: LexErrorKind::InputTooLarge { len: 20, max: 4 },
                ..
            })
        ));
    }

    #[test]
    fn test_signed_constants() {
        let mut parser = Parser::new("-5 +1.5");
        assert_eq!(parser.parse_signed_iconst().unwrap(), -5);
        assert_eq!(parser.parse_numeric_only().unwrap(), "1.5");
    }

    #[test]
    fn test_empty_script() {
        assert!(Parser::new(" ; ;; ").parse_statements().unwrap().is_empty());
    }
}
