//! # oxide-pgsql
//!
//! A PostgreSQL-dialect SQL parser producing a typed, span-carrying AST.
//!
//! This crate provides:
//! - A lexer that understands PostgreSQL's string, number, parameter and
//!   operator forms
//! - A hand-written recursive descent parser with Pratt expression parsing
//!   that follows PostgreSQL's grammar and keyword categories
//! - An AST that prints back to SQL and serializes with serde
//! - A borrowing walker over the tree ([`visit`])
//!
//! ## Parsing
//!
//! ```rust
//! use oxide_pgsql::ast::{SetExpr, Statement};
//!
//! let statement = oxide_pgsql::parse_one("SELECT id, name FROM users WHERE active").unwrap();
//! let Statement::Select(query) = &statement else {
//!     unreachable!()
//! };
//! assert!(matches!(query.body, SetExpr::Select(_)));
//! assert_eq!(statement.to_string(), "SELECT id, name FROM users WHERE active");
//! ```
//!
//! ## Errors
//!
//! Errors carry the byte span and the 1-based line and column of the
//! offending input:
//!
//! ```rust
//! let err = oxide_pgsql::parse_one("SELECT FROM t").unwrap_err();
//! assert_eq!(err.span().start, 7);
//! assert_eq!(err.location().column, 8);
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod visit;

use tracing::debug;

pub use ast::{Expr, ExprKind, Query, Spanned, Statement};
pub use config::ParserOptions;
pub use error::{Error, Result};
pub use lexer::{LexError, LexErrorKind, Lexer, Location, Span, Token, TokenKind};
pub use parser::{ParseError, Parser, SemanticError};

/// Parses a `;`-separated script.
///
/// # Errors
///
/// Returns the first lex, parse or semantic error.
pub fn parse_sql(sql: &str) -> Result<Vec<Statement>> {
    parse_sql_with_options(sql, ParserOptions::default())
}

/// Parses a script with explicit options.
///
/// # Errors
///
/// Returns the first lex, parse or semantic error.
pub fn parse_sql_with_options(sql: &str, options: ParserOptions) -> Result<Vec<Statement>> {
    debug!(len = sql.len(), "parsing script");
    Parser::with_options(sql, options)
        .parse_statements()
        .inspect_err(|e| debug!(error = %e, kind = e.kind_name(), "parse failed"))
}

/// Parses exactly one statement, optionally followed by `;`.
///
/// # Errors
///
/// Returns an error if the input is not a single valid statement.
pub fn parse_one(sql: &str) -> Result<Statement> {
    parse_one_with_options(sql, ParserOptions::default())
}

/// Parses one statement with explicit options.
///
/// # Errors
///
/// Returns an error if the input is not a single valid statement.
pub fn parse_one_with_options(sql: &str, options: ParserOptions) -> Result<Statement> {
    debug!(len = sql.len(), "parsing statement");
    Parser::with_options(sql, options)
        .parse_statement()
        .inspect_err(|e| debug!(error = %e, kind = e.kind_name(), "parse failed"))
}
