//! SQL Parser
//!
//! A hand-written recursive descent parser with Pratt expression parsing.
//! The grammar follows PostgreSQL's: one method per production, bounded
//! lookahead, no backtracking.

mod dml;
mod error;
mod expr;
mod parser;
mod pratt;
mod query;
mod session;
mod types;
mod utility;
mod validate;

pub use error::{ParseError, SemanticError};
pub use parser::Parser;
