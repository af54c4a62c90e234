//! SQL Lexer
//!
//! Converts PostgreSQL source text into tokens. Besides the usual literals and
//! operators it understands the PostgreSQL-specific forms: `E'...'`, `B'...'`,
//! `X'...'` and `U&'...'` strings, dollar quoting, `$n` parameters, nested
//! block comments and user-defined operator runs.

mod error;
mod keywords;
mod span;
mod token;
mod tokenizer;

pub use error::{LexError, LexErrorKind};
pub use keywords::{Keyword, KeywordCategory};
pub use span::{Location, Span};
pub use token::{Token, TokenKind};
pub use tokenizer::Lexer;
