//! Error types for the parser.

use serde::Serialize;

use crate::lexer::{LexError, Location, Span};
use crate::parser::{ParseError, SemanticError};

/// Errors that can occur while turning SQL text into an AST.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
pub enum Error {
    /// A malformed token.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// A token sequence that matches no grammar alternative.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A well-formed statement that violates a cross-clause constraint.
    #[error(transparent)]
    Semantic(#[from] SemanticError),
}

impl Error {
    /// Returns the byte span of the offending input.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Lex(e) => e.span,
            Self::Parse(e) => e.span,
            Self::Semantic(e) => e.span,
        }
    }

    /// Returns the 1-based line and column of the offending input.
    #[must_use]
    pub const fn location(&self) -> Location {
        match self {
            Self::Lex(e) => e.location,
            Self::Parse(e) => e.location,
            Self::Semantic(e) => e.location,
        }
    }

    /// Returns a short name for the error kind.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Lex(_) => "lex",
            Self::Parse(_) => "parse",
            Self::Semantic(_) => "semantic",
        }
    }
}

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::LexErrorKind;

    #[test]
    fn test_lex_error_converts() {
        let lex = LexError::new(LexErrorKind::UnterminatedString, Span::new(2, 4), "a\n'b");
        let err: Error = lex.into();
        assert_eq!(err.kind_name(), "lex");
        assert_eq!(err.span(), Span::new(2, 4));
        assert_eq!(err.location(), Location { line: 2, column: 1 });
        assert_eq!(err.to_string(), "unterminated quoted string at line 2, column 1");
    }

    #[test]
    fn test_semantic_error_converts() {
        let err: Error = SemanticError::new("bad", Span::new(0, 1), "x").into();
        assert!(matches!(err, Error::Semantic(_)));
        assert_eq!(err.location(), Location::default());
    }
}
