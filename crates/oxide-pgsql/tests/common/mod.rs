#![allow(dead_code)]

use oxide_pgsql::ast::{
    DeleteStatement, InsertStatement, Query, Select, SetExpr, Statement, UpdateStatement,
};
use oxide_pgsql::{Error, ParseError, Parser, SemanticError};

pub fn parse(sql: &str) -> Statement {
    Parser::new(sql)
        .parse_statement()
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse_err(sql: &str) -> Error {
    Parser::new(sql)
        .parse_statement()
        .expect_err(&format!("Expected error for: {sql}"))
}

pub fn parse_syntax_err(sql: &str) -> ParseError {
    match parse_err(sql) {
        Error::Parse(e) => e,
        other => panic!("Expected parse error for: {sql}, got {other:?}"),
    }
}

pub fn parse_semantic_err(sql: &str) -> SemanticError {
    match parse_err(sql) {
        Error::Semantic(e) => e,
        other => panic!("Expected semantic error for: {sql}, got {other:?}"),
    }
}

pub fn parse_query(sql: &str) -> Query {
    match parse(sql) {
        Statement::Select(q) => *q,
        other => panic!("Expected SELECT, got {other:?}"),
    }
}

pub fn parse_select(sql: &str) -> Select {
    match parse_query(sql).body {
        SetExpr::Select(s) => *s,
        other => panic!("Expected a simple SELECT, got {other:?}"),
    }
}

pub fn parse_insert(sql: &str) -> InsertStatement {
    match parse(sql) {
        Statement::Insert(i) => *i,
        other => panic!("Expected INSERT, got {other:?}"),
    }
}

pub fn parse_update(sql: &str) -> UpdateStatement {
    match parse(sql) {
        Statement::Update(u) => *u,
        other => panic!("Expected UPDATE, got {other:?}"),
    }
}

pub fn parse_delete(sql: &str) -> DeleteStatement {
    match parse(sql) {
        Statement::Delete(d) => *d,
        other => panic!("Expected DELETE, got {other:?}"),
    }
}

/// Verifies that `to_string()` produces a fixed point:
/// parse(sql).to_string() can be re-parsed into an equal tree and
/// yields the same string again.
pub fn round_trip(sql: &str) {
    let ast1 = parse(sql);
    let rendered1 = ast1.to_string();
    let ast2 = parse(&rendered1);
    assert_eq!(
        ast1, ast2,
        "Re-parse differs.\n  Input:    {sql}\n  Rendered: {rendered1}"
    );
    let rendered2 = ast2.to_string();
    assert_eq!(
        rendered1, rendered2,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
}

/// Asserts that `sql` prints back exactly as written.
pub fn prints_as_written(sql: &str) {
    assert_eq!(parse(sql).to_string(), sql);
}
