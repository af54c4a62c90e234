//! SQL tokenizer implementation.

use super::{Keyword, LexError, LexErrorKind, Span, Token, TokenKind};

/// Characters that may appear in an operator.
const OPERATOR_CHARS: &[u8] = b"~!@#^&|`?+-*/%<>=";

/// Characters that allow a multi-character operator to end in `+` or `-`.
const OPERATOR_SPECIAL_CHARS: &[u8] = b"~!@#^&|`?%";

/// Operators containing `?` that are kept whole. Any other run containing `?`
/// is split so that `?` can act as a parameter marker (`id=?`).
const QUESTION_OPERATORS: &[&str] = &["?||", "?-|", "?|", "?&", "?#", "?-", "@?", "?"];

/// A lexer that tokenizes SQL input.
///
/// Tokens are produced lazily by [`Lexer::next_token`]. The lexer can be
/// restarted from any byte offset with [`Lexer::reset`].
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
    /// Set once a malformed token has been produced.
    failed: bool,
    /// Set once the iterator has yielded its last item.
    exhausted: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
            failed: false,
            exhausted: false,
        }
    }

    /// Creates a lexer that starts scanning at `offset`.
    #[must_use]
    pub fn at(input: &'a str, offset: usize) -> Self {
        let mut lexer = Self::new(input);
        lexer.reset(offset);
        lexer
    }

    /// Restarts scanning at `offset`, clamped to the previous character
    /// boundary inside the input.
    pub fn reset(&mut self, offset: usize) {
        let mut offset = offset.min(self.input.len());
        while !self.input.is_char_boundary(offset) {
            offset -= 1;
        }
        self.pos = offset;
        self.start = offset;
        self.failed = false;
        self.exhausted = false;
    }

    /// Returns the current byte offset.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.pos
    }

    /// Returns the input being scanned.
    #[must_use]
    pub const fn input(&self) -> &'a str {
        self.input
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skips whitespace, `--` comments and (nested) `/* */` comments.
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexErrorKind> {
        loop {
            while self.peek().is_some_and(is_whitespace) {
                self.advance();
            }

            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                self.start = self.pos;
                self.advance();
                self.advance();
                let mut depth = 1usize;
                while depth > 0 {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            depth -= 1;
                        }
                        Some('/') if self.peek() == Some('*') => {
                            self.advance();
                            depth += 1;
                        }
                        Some(_) => {}
                        None => return Err(LexErrorKind::UnterminatedBlockComment),
                    }
                }
                continue;
            }

            return Ok(());
        }
    }

    /// Creates a span from start to current position.
    const fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    /// Creates a token with the current span.
    fn make_token(&self, kind: TokenKind) -> Token<'a> {
        Token::new(kind, &self.input[self.start..self.pos], self.make_span())
    }

    /// Creates an error token and stops further scanning.
    fn error_token(&mut self, kind: LexErrorKind) -> Token<'a> {
        self.failed = true;
        self.make_token(TokenKind::Error(kind))
    }

    /// Wraps a scan result into a token.
    fn finish(&mut self, result: Result<TokenKind, LexErrorKind>) -> Token<'a> {
        match result {
            Ok(kind) => self.make_token(kind),
            Err(kind) => self.error_token(kind),
        }
    }

    /// Scans an identifier or keyword.
    fn scan_identifier(&mut self) -> Token<'a> {
        while self.peek().is_some_and(is_identifier_char) {
            self.advance();
        }

        let text = &self.input[self.start..self.pos];
        match Keyword::from_str(text) {
            Some(keyword) => self.make_token(TokenKind::Keyword(keyword)),
            None => self.make_token(TokenKind::Identifier(text.to_ascii_lowercase())),
        }
    }

    /// Scans the body of a `"..."` identifier, starting at the opening quote.
    fn scan_quoted_identifier_body(&mut self) -> Result<String, LexErrorKind> {
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.advance() {
                Some('"') if self.peek() == Some('"') => {
                    self.advance();
                    value.push('"');
                }
                Some('"') => break,
                Some(c) => value.push(c),
                None => return Err(LexErrorKind::UnterminatedQuotedIdentifier),
            }
        }
        if value.is_empty() {
            return Err(LexErrorKind::ZeroLengthIdentifier);
        }
        Ok(value)
    }

    /// Consumes whitespace containing a newline followed by a quote, which
    /// continues the previous string literal. Returns false (and consumes
    /// nothing) otherwise.
    fn continue_string(&mut self) -> bool {
        let saved = self.pos;
        let mut saw_newline = false;
        while let Some(c) = self.peek() {
            if c == '\n' || c == '\r' {
                saw_newline = true;
            } else if !is_whitespace(c) {
                break;
            }
            self.advance();
        }
        if saw_newline && self.peek() == Some('\'') {
            self.advance();
            true
        } else {
            self.pos = saved;
            false
        }
    }

    /// Scans a single-quoted string starting at the opening quote.
    ///
    /// With `escapes` set, backslash escapes are resolved as in `E'...'`.
    fn scan_string_body(&mut self, escapes: bool) -> Result<String, LexErrorKind> {
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.advance() {
                Some('\'') if self.peek() == Some('\'') => {
                    self.advance();
                    value.push('\'');
                }
                Some('\'') => {
                    if !self.continue_string() {
                        break;
                    }
                }
                Some('\\') if escapes => self.scan_escape(&mut value)?,
                Some(c) => value.push(c),
                None => return Err(LexErrorKind::UnterminatedString),
            }
        }
        Ok(value)
    }

    /// Resolves one backslash escape in an `E'...'` string.
    fn scan_escape(&mut self, value: &mut String) -> Result<(), LexErrorKind> {
        let c = self.advance().ok_or(LexErrorKind::UnterminatedString)?;
        match c {
            'b' => value.push('\u{8}'),
            'f' => value.push('\u{c}'),
            'n' => value.push('\n'),
            'r' => value.push('\r'),
            't' => value.push('\t'),
            '0'..='7' => {
                let mut code = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            self.advance();
                        }
                        None => break,
                    }
                }
                value.push(char::from_u32(code).ok_or(LexErrorKind::InvalidUnicodeEscape)?);
            }
            'x' => {
                let mut code = None;
                for _ in 0..2 {
                    match self.peek().and_then(|d| d.to_digit(16)) {
                        Some(d) => {
                            code = Some(code.unwrap_or(0) * 16 + d);
                            self.advance();
                        }
                        None => break,
                    }
                }
                match code {
                    Some(code) => {
                        value.push(char::from_u32(code).ok_or(LexErrorKind::InvalidUnicodeEscape)?);
                    }
                    None => value.push('x'),
                }
            }
            'u' | 'U' => {
                let digits = if c == 'u' { 4 } else { 8 };
                let code = self
                    .read_hex(digits)
                    .ok_or(LexErrorKind::InvalidUnicodeEscape)?;
                let ch = if (0xD800..=0xDBFF).contains(&code) {
                    // High surrogate: a `\uXXXX` low surrogate must follow.
                    if self.peek() != Some('\\') || self.peek_next() != Some('u') {
                        return Err(LexErrorKind::InvalidUnicodeEscape);
                    }
                    self.advance();
                    self.advance();
                    let low = self.read_hex(4).ok_or(LexErrorKind::InvalidUnicodeEscape)?;
                    combine_surrogates(code, low)?
                } else {
                    char::from_u32(code).ok_or(LexErrorKind::InvalidUnicodeEscape)?
                };
                value.push(ch);
            }
            other => value.push(other),
        }
        Ok(())
    }

    /// Reads exactly `n` hex digits.
    fn read_hex(&mut self, n: usize) -> Option<u32> {
        let mut code = 0u32;
        for _ in 0..n {
            let d = self.peek()?.to_digit(16)?;
            self.advance();
            code = code * 16 + d;
        }
        Some(code)
    }

    /// Scans a `B'...'` or `X'...'` literal starting at the opening quote.
    fn scan_bit_string(&mut self, hex: bool) -> Result<TokenKind, LexErrorKind> {
        self.advance(); // opening quote
        let mut digits = String::new();
        loop {
            match self.advance() {
                Some('\'') => {
                    if !self.continue_string() {
                        break;
                    }
                }
                Some(c) if hex && c.is_ascii_hexdigit() => digits.push(c),
                Some(c @ ('0' | '1')) if !hex => digits.push(c),
                Some(c) if hex => return Err(LexErrorKind::InvalidHexDigit(c)),
                Some(c) => return Err(LexErrorKind::InvalidBinaryDigit(c)),
                None if hex => return Err(LexErrorKind::UnterminatedHexString),
                None => return Err(LexErrorKind::UnterminatedBitString),
            }
        }
        Ok(if hex {
            TokenKind::HexString(digits)
        } else {
            TokenKind::BitString(digits)
        })
    }

    /// Scans a `U&'...'` string or `U&"..."` identifier; the position is on
    /// the opening quote.
    fn scan_unicode(&mut self) -> Result<TokenKind, LexErrorKind> {
        let identifier = self.peek() == Some('"');
        let raw = if identifier {
            self.scan_quoted_identifier_body()?
        } else {
            self.scan_string_body(false)?
        };
        let escape = self.scan_uescape()?.unwrap_or('\\');
        let value = decode_unicode_escapes(&raw, escape)?;
        Ok(if identifier {
            TokenKind::QuotedIdentifier(value)
        } else {
            TokenKind::String(value)
        })
    }

    /// Consumes an optional `UESCAPE 'c'` clause.
    fn scan_uescape(&mut self) -> Result<Option<char>, LexErrorKind> {
        let saved = self.pos;
        while self.peek().is_some_and(is_whitespace) {
            self.advance();
        }
        let word_start = self.pos;
        while self.peek().is_some_and(is_identifier_char) {
            self.advance();
        }
        if !self.input[word_start..self.pos].eq_ignore_ascii_case("uescape") {
            self.pos = saved;
            return Ok(None);
        }
        while self.peek().is_some_and(is_whitespace) {
            self.advance();
        }
        if self.advance() != Some('\'') {
            return Err(LexErrorKind::InvalidUescape);
        }
        let escape = self.advance().ok_or(LexErrorKind::InvalidUescape)?;
        if self.advance() != Some('\'')
            || escape.is_ascii_hexdigit()
            || is_whitespace(escape)
            || matches!(escape, '+' | '\'' | '"')
        {
            return Err(LexErrorKind::InvalidUescape);
        }
        Ok(Some(escape))
    }

    /// Scans what follows a `$`: a parameter (`$1`) or a dollar-quoted
    /// string (`$tag$...$tag$`).
    fn scan_dollar(&mut self) -> Result<TokenKind, LexErrorKind> {
        if self.peek().is_some_and(|c| c.is_ascii_digit()) {
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
            return self.input[self.start + 1..self.pos]
                .parse::<u32>()
                .map(TokenKind::Parameter)
                .map_err(|_| LexErrorKind::InvalidParameter);
        }

        if self.peek().is_some_and(is_identifier_start) {
            while self.peek().is_some_and(|c| c != '$' && is_identifier_char(c)) {
                self.advance();
            }
        }
        if self.peek() != Some('$') {
            self.pos = self.start + 1;
            return Err(LexErrorKind::UnexpectedCharacter('$'));
        }
        self.advance();

        let delimiter = &self.input[self.start..self.pos];
        let body_start = self.pos;
        match self.input[body_start..].find(delimiter) {
            Some(len) => {
                self.pos = body_start + len + delimiter.len();
                Ok(TokenKind::String(
                    self.input[body_start..body_start + len].to_string(),
                ))
            }
            None => {
                self.pos = self.input.len();
                Err(LexErrorKind::UnterminatedDollarQuote)
            }
        }
    }

    /// Scans a number (integer or numeric).
    fn scan_number(&mut self) -> Token<'a> {
        let mut is_integer = true;

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        // `1..2` lexes as `1` followed by dots.
        if self.peek() == Some('.') && self.peek_next() != Some('.') {
            is_integer = false;
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        // An exponent needs at least one digit; `1e` lexes as `1` then `e`.
        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            let rest = &self.input.as_bytes()[self.pos + 1..];
            let exponent_len = match rest {
                [b'+' | b'-', d, ..] if d.is_ascii_digit() => Some(2),
                [d, ..] if d.is_ascii_digit() => Some(1),
                _ => None,
            };
            if let Some(len) = exponent_len {
                is_integer = false;
                self.pos += len;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        let text = &self.input[self.start..self.pos];
        match text.parse::<i64>() {
            Ok(i) if is_integer => self.make_token(TokenKind::Integer(i)),
            _ => self.make_token(TokenKind::Numeric(text.to_string())),
        }
    }

    /// Scans an operator using the longest-match rule.
    fn scan_operator(&mut self) -> Token<'a> {
        let bytes = self.input.as_bytes();
        let mut end = self.start;
        while end < bytes.len() && OPERATOR_CHARS.contains(&bytes[end]) {
            if end > self.start {
                let rest = &bytes[end..];
                if rest.starts_with(b"--") || rest.starts_with(b"/*") {
                    break;
                }
            }
            end += 1;
        }

        let mut len = trim_operator(&bytes[self.start..end]);
        let text = &self.input[self.start..self.start + len];
        if text.contains('?') && !QUESTION_OPERATORS.contains(&text) {
            len = match text.find('?') {
                Some(0) => QUESTION_OPERATORS
                    .iter()
                    .find(|op| text.starts_with(**op))
                    .map_or(1, |op| op.len()),
                Some(at) => trim_operator(&bytes[self.start..self.start + at]),
                None => len,
            };
        }

        self.pos = self.start + len;
        let text = &self.input[self.start..self.pos];
        self.make_token(TokenKind::from_operator(text))
    }

    /// Scans the next token.
    #[must_use]
    pub fn next_token(&mut self) -> Token<'a> {
        if self.failed {
            self.start = self.pos;
            return self.make_token(TokenKind::Eof);
        }
        if let Err(kind) = self.skip_whitespace_and_comments() {
            return self.error_token(kind);
        }
        self.start = self.pos;

        let Some(c) = self.advance() else {
            return self.make_token(TokenKind::Eof);
        };

        match c {
            // Single-character tokens
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            '[' => self.make_token(TokenKind::LeftBracket),
            ']' => self.make_token(TokenKind::RightBracket),
            ',' => self.make_token(TokenKind::Comma),
            ';' => self.make_token(TokenKind::Semicolon),

            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                self.pos = self.start;
                self.scan_number()
            }
            '.' => self.make_token(TokenKind::Dot),
            ':' => match self.peek() {
                Some(':') => {
                    self.advance();
                    self.make_token(TokenKind::DoubleColon)
                }
                Some('=') => {
                    self.advance();
                    self.make_token(TokenKind::ColonEquals)
                }
                _ => self.make_token(TokenKind::Colon),
            },

            // String literals
            '\'' => {
                self.pos = self.start;
                let result = self.scan_string_body(false).map(TokenKind::String);
                self.finish(result)
            }
            'e' | 'E' if self.peek() == Some('\'') => {
                let result = self.scan_string_body(true).map(TokenKind::String);
                self.finish(result)
            }
            'n' | 'N' if self.peek() == Some('\'') => {
                let result = self.scan_string_body(false).map(TokenKind::String);
                self.finish(result)
            }
            'b' | 'B' if self.peek() == Some('\'') => {
                let result = self.scan_bit_string(false);
                self.finish(result)
            }
            'x' | 'X' if self.peek() == Some('\'') => {
                let result = self.scan_bit_string(true);
                self.finish(result)
            }
            'u' | 'U'
                if self.peek() == Some('&') && matches!(self.peek_next(), Some('\'' | '"')) =>
            {
                self.advance(); // &
                let result = self.scan_unicode();
                self.finish(result)
            }

            // Quoted identifiers
            '"' => {
                self.pos = self.start;
                let result = self
                    .scan_quoted_identifier_body()
                    .map(TokenKind::QuotedIdentifier);
                self.finish(result)
            }

            // Parameters and dollar quoting
            '$' => {
                let result = self.scan_dollar();
                self.finish(result)
            }

            // Numbers
            c if c.is_ascii_digit() => {
                self.pos = self.start;
                self.scan_number()
            }

            // Identifiers and keywords
            c if is_identifier_start(c) => {
                self.pos = self.start;
                self.scan_identifier()
            }

            // Operators
            c if c.is_ascii() && OPERATOR_CHARS.contains(&(c as u8)) => self.scan_operator(),

            _ => self.error_token(LexErrorKind::UnexpectedCharacter(c)),
        }
    }

    /// Tokenizes the entire input, including the final EOF token.
    ///
    /// # Errors
    ///
    /// Returns the first `LexError` encountered.
    pub fn tokenize(&mut self) -> Result<Vec<Token<'a>>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            match token.kind {
                TokenKind::Error(kind) => {
                    return Err(LexError::new(kind, token.span, self.input));
                }
                TokenKind::Eof => {
                    tokens.push(token);
                    return Ok(tokens);
                }
                _ => tokens.push(token),
            }
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let token = self.next_token();
        match token.kind {
            TokenKind::Eof => {
                self.exhausted = true;
                None
            }
            TokenKind::Error(kind) => {
                self.exhausted = true;
                Some(Err(LexError::new(kind, token.span, self.input)))
            }
            _ => Some(Ok(token)),
        }
    }
}

const fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{b}' | '\u{c}')
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$' || !c.is_ascii()
}

/// Returns the operator length after dropping trailing `+`/`-` characters,
/// which are only allowed when the operator contains a special character.
fn trim_operator(run: &[u8]) -> usize {
    let mut len = run.len();
    if len > 1
        && matches!(run[len - 1], b'+' | b'-')
        && !run[..len - 1]
            .iter()
            .any(|b| OPERATOR_SPECIAL_CHARS.contains(b))
    {
        while len > 1 && matches!(run[len - 1], b'+' | b'-') {
            len -= 1;
        }
    }
    len
}

fn combine_surrogates(high: u32, low: u32) -> Result<char, LexErrorKind> {
    if !(0xDC00..=0xDFFF).contains(&low) {
        return Err(LexErrorKind::InvalidUnicodeEscape);
    }
    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
    char::from_u32(code).ok_or(LexErrorKind::InvalidUnicodeEscape)
}

/// Decodes `\XXXX` and `\+XXXXXX` escapes in a `U&` literal.
fn decode_unicode_escapes(raw: &str, escape: char) -> Result<String, LexErrorKind> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    let mut pending_high: Option<u32> = None;

    while let Some(c) = chars.next() {
        if c != escape {
            if pending_high.is_some() {
                return Err(LexErrorKind::InvalidUnicodeEscape);
            }
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&escape) {
            chars.next();
            out.push(escape);
            continue;
        }
        let digits = if chars.peek() == Some(&'+') {
            chars.next();
            6
        } else {
            4
        };
        let mut code = 0u32;
        for _ in 0..digits {
            let d = chars
                .next()
                .and_then(|d| d.to_digit(16))
                .ok_or(LexErrorKind::InvalidUnicodeEscape)?;
            code = code * 16 + d;
        }
        match pending_high.take() {
            Some(high) => out.push(combine_surrogates(high, code)?),
            None if (0xD800..=0xDBFF).contains(&code) => pending_high = Some(code),
            None => out.push(char::from_u32(code).ok_or(LexErrorKind::InvalidUnicodeEscape)?),
        }
    }
    if pending_high.is_some() {
        return Err(LexErrorKind::InvalidUnicodeEscape);
    }
    Ok(out)
}
