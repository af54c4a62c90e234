//! Lexer error types.

use serde::{Deserialize, Serialize};

use super::{Location, Span};

/// What went wrong while scanning a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum LexErrorKind {
    /// A `'...'` literal without its closing quote.
    #[error("unterminated quoted string")]
    UnterminatedString,
    /// A `"..."` identifier without its closing quote.
    #[error("unterminated quoted identifier")]
    UnterminatedQuotedIdentifier,
    /// A `/* ...` comment without its closing `*/`.
    #[error("unterminated /* comment")]
    UnterminatedBlockComment,
    /// A `$tag$...` string without its closing tag.
    #[error("unterminated dollar-quoted string")]
    UnterminatedDollarQuote,
    /// A `B'...'` literal without its closing quote.
    #[error("unterminated bit string literal")]
    UnterminatedBitString,
    /// A `X'...'` literal without its closing quote.
    #[error("unterminated hexadecimal string literal")]
    UnterminatedHexString,
    /// `""` used as an identifier.
    #[error("zero-length delimited identifier")]
    ZeroLengthIdentifier,
    /// A character that is not a binary digit inside `B'...'`.
    #[error("\"{0}\" is not a valid binary digit")]
    InvalidBinaryDigit(char),
    /// A character that is not a hexadecimal digit inside `X'...'`.
    #[error("\"{0}\" is not a valid hexadecimal digit")]
    InvalidHexDigit(char),
    /// A malformed Unicode escape (`\u`, `\U`, `U&` strings).
    #[error("invalid Unicode escape value")]
    InvalidUnicodeEscape,
    /// A bad `UESCAPE` character.
    #[error("invalid Unicode escape character")]
    InvalidUescape,
    /// A `$` followed by digits that do not form a valid parameter number.
    #[error("invalid parameter number")]
    InvalidParameter,
    /// A character that cannot start any token.
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),
    /// The input exceeds the configured size limit.
    #[error("input of {len} bytes exceeds the limit of {max} bytes")]
    InputTooLarge {
        /// Input length in bytes.
        len: usize,
        /// Configured maximum.
        max: usize,
    },
}

/// A lexer error with its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind} at {location}")]
pub struct LexError {
    /// What went wrong.
    pub kind: LexErrorKind,
    /// The offending source range.
    pub span: Span,
    /// Line and column of the start of `span`.
    pub location: Location,
}

impl LexError {
    /// Creates a new lex error, computing the location from `source`.
    #[must_use]
    pub fn new(kind: LexErrorKind, span: Span, source: &str) -> Self {
        Self {
            kind,
            span,
            location: Location::from_offset(source, span.start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_error_display() {
        let err = LexError::new(
            LexErrorKind::UnterminatedString,
            Span::new(7, 12),
            "SELECT 'abc",
        );
        assert_eq!(err.to_string(), "unterminated quoted string at line 1, column 8");
    }

    #[test]
    fn test_input_too_large_message() {
        let kind = LexErrorKind::InputTooLarge { len: 10, max: 4 };
        assert_eq!(
            kind.to_string(),
            "input of 10 bytes exceeds the limit of 4 bytes"
        );
    }
}
