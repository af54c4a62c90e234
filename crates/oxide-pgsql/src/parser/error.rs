//! Parser error types.

use serde::{Deserialize, Serialize};

use crate::lexer::{Location, Span};

/// A parse error: the token sequence matches no grammar alternative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message} at {location}")]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// The location of the error.
    pub span: Span,
    /// Line and column of the start of `span`.
    pub location: Location,
    /// The expected production or token (if applicable).
    pub expected: Option<String>,
    /// The source text of the offending token; empty at end of input.
    pub found: Option<String>,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, span: Span, source: &str) -> Self {
        Self {
            message: message.into(),
            span,
            location: Location::from_offset(source, span.start),
            expected: None,
            found: None,
        }
    }

    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected(expected: impl Into<String>, found: &str, span: Span, source: &str) -> Self {
        let expected: String = expected.into();
        Self {
            message: format!("syntax error at or near \"{found}\": expected {expected}"),
            span,
            location: Location::from_offset(source, span.start),
            expected: Some(expected),
            found: Some(found.to_string()),
        }
    }

    /// Creates an "unexpected end of input" error.
    #[must_use]
    pub fn unexpected_eof(expected: impl Into<String>, span: Span, source: &str) -> Self {
        let expected: String = expected.into();
        Self {
            message: format!("syntax error at end of input: expected {expected}"),
            span,
            location: Location::from_offset(source, span.start),
            expected: Some(expected),
            found: Some(String::new()),
        }
    }
}

/// A semantic error: the statement is well-formed but violates a
/// constraint between its clauses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message} at {location}")]
pub struct SemanticError {
    /// The error message.
    pub message: String,
    /// The offending source range.
    pub span: Span,
    /// Line and column of the start of `span`.
    pub location: Location,
}

impl SemanticError {
    /// Creates a new semantic error.
    #[must_use]
    pub fn new(message: impl Into<String>, span: Span, source: &str) -> Self {
        Self {
            message: message.into(),
            span,
            location: Location::from_offset(source, span.start),
        }
    }
}
