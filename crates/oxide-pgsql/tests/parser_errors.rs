//! Tests for lex, parse and semantic errors and their positions.

mod common;
use common::*;

use oxide_pgsql::{
    parse_one_with_options, parse_sql, Error, LexErrorKind, Location, Parser, ParserOptions, Span,
};

// ===================================================================
// Parse errors
// ===================================================================

#[test]
fn error_empty_input() {
    let _ = parse_syntax_err("");
}

#[test]
fn error_empty_target_list() {
    let e = parse_syntax_err("SELECT FROM t");
    assert_eq!(e.expected.as_deref(), Some("targetList"));
    assert_eq!(e.found.as_deref(), Some("FROM"));
    assert_eq!(e.span, Span::new(7, 11));
    assert_eq!(e.location, Location { line: 1, column: 8 });
    assert_eq!(
        e.to_string(),
        "syntax error at or near \"FROM\": expected targetList at line 1, column 8"
    );
}

#[test]
fn error_location_on_later_line() {
    let e = parse_syntax_err("SELECT a,\n       b\nFROM t WHERE");
    assert_eq!(e.location.line, 3);
    assert_eq!(e.found.as_deref(), Some(""));
}

#[test]
fn error_unexpected_statement() {
    let e = parse_syntax_err("TRUNCATE users");
    assert_eq!(e.found.as_deref(), Some("TRUNCATE"));
}

#[test]
fn error_unclosed_paren() {
    let _ = parse_syntax_err("SELECT (1 + 2");
}

#[test]
fn error_trailing_tokens() {
    let _ = parse_syntax_err("SELECT 1 2");
}

#[test]
fn error_limit_comma_syntax() {
    let e = parse_semantic_err("SELECT * FROM t LIMIT 1, 2");
    assert_eq!(e.message, "LIMIT #,# syntax is not supported");
}

#[test]
fn error_script_reports_first_failure() {
    let err = parse_sql("SELECT 1; SELEC 2; SELECT 3").unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    assert_eq!(err.location(), Location { line: 1, column: 11 });
}

// ===================================================================
// Lex errors
// ===================================================================

#[test]
fn lex_errors() {
    for (sql, check) in [
        ("SELECT 'abc", "unterminated quoted string"),
        ("SELECT \"abc", "unterminated quoted identifier"),
        ("SELECT 1 /* open", "unterminated /* comment"),
        ("SELECT $$abc", "unterminated dollar-quoted string"),
        ("SELECT \"\"", "zero-length delimited identifier"),
        ("SELECT B'102'", "not a valid binary digit"),
        ("SELECT X'zz'", "not a valid hexadecimal digit"),
    ] {
        let err = parse_err(sql);
        let Error::Lex(e) = &err else {
            panic!("expected lex error for {sql}, got {err:?}");
        };
        assert!(
            e.to_string().to_lowercase().contains(check),
            "{sql}: {e}"
        );
    }
}

#[test]
fn input_size_limit() {
    let options = ParserOptions::new().max_input_len(16);
    assert!(parse_one_with_options("SELECT 1", options.clone()).is_ok());
    let err = parse_one_with_options("SELECT 1 FROM a_rather_long_table", options).unwrap_err();
    let Error::Lex(e) = err else {
        panic!("expected lex error");
    };
    assert!(matches!(e.kind, LexErrorKind::InputTooLarge { max: 16, .. }));
}

// ===================================================================
// Semantic errors
// ===================================================================

#[test]
fn semantic_duplicate_clauses() {
    let e = parse_semantic_err("(SELECT 1 ORDER BY 1) ORDER BY 1");
    assert_eq!(e.message, "multiple ORDER BY clauses not allowed");
    let e = parse_semantic_err("(SELECT 1 LIMIT 1) LIMIT 2");
    assert_eq!(e.message, "multiple LIMIT clauses not allowed");
    let e = parse_semantic_err("(SELECT 1 OFFSET 1) OFFSET 2");
    assert_eq!(e.message, "multiple OFFSET clauses not allowed");
    let e = parse_semantic_err("WITH a AS (SELECT 1) (WITH b AS (SELECT 2) SELECT 3)");
    assert_eq!(e.message, "multiple WITH clauses not allowed");
}

#[test]
fn semantic_with_ties_requires_order_by() {
    let e = parse_semantic_err("SELECT * FROM t FETCH FIRST 1 ROW WITH TIES");
    assert_eq!(e.message, "WITH TIES cannot be specified without ORDER BY clause");
}

#[test]
fn semantic_window_frames() {
    let e = parse_semantic_err("SELECT sum(a) OVER (ROWS BETWEEN CURRENT ROW AND UNBOUNDED PRECEDING) FROM t");
    assert_eq!(e.message, "frame end cannot be UNBOUNDED PRECEDING");
    let e = parse_semantic_err("SELECT sum(a) OVER (ROWS BETWEEN 1 FOLLOWING AND 1 PRECEDING) FROM t");
    assert_eq!(e.message, "frame starting from following row cannot have preceding rows");
}

#[test]
fn semantic_float_precision() {
    let e = parse_semantic_err("SELECT CAST(a AS float(0))");
    assert_eq!(e.message, "precision for type float must be at least 1 bit");
    let e = parse_semantic_err("SELECT a::float(54)");
    assert_eq!(e.message, "precision for type float must be less than 54 bits");
}

#[test]
fn semantic_error_carries_location() {
    let e = parse_semantic_err("INSERT INTO t (a)\nVALUES (1, 2)");
    assert_eq!(e.location, Location { line: 2, column: 1 });
    assert!(e.to_string().ends_with("at line 2, column 1"));
    assert_eq!(Error::Semantic(e).kind_name(), "semantic");
}

// ===================================================================
// Nesting limit
// ===================================================================

fn run_with_stack(size: usize, f: impl FnOnce() + Send + 'static) {
    std::thread::Builder::new()
        .stack_size(size)
        .spawn(f)
        .unwrap()
        .join()
        .unwrap();
}

fn run_with_large_stack(f: impl FnOnce() + Send + 'static) {
    run_with_stack(64 * 1024 * 1024, f);
}

/// Grows `shape` one level at a time until the depth limit rejects it and
/// returns the deepest nesting that parsed.
fn deepest_accepted(shape: fn(usize) -> String) -> usize {
    let max_depth = ParserOptions::default().max_depth;
    let message = format!("statement nesting exceeds the maximum depth of {max_depth}");
    for levels in 1..=max_depth + 1 {
        let sql = shape(levels);
        match Parser::new(&sql).parse_statement() {
            Ok(_) => {}
            Err(err) => {
                assert!(err.to_string().contains(&message), "{sql}: {err}");
                return levels - 1;
            }
        }
    }
    panic!("nesting of {} levels was accepted", max_depth + 1);
}

#[test]
fn nesting_limit_is_an_error() {
    run_with_large_stack(|| {
        let depth = 1000;
        let sql = format!("SELECT {}1{}", "(".repeat(depth), ")".repeat(depth));
        let err = parse_err(&sql);
        assert!(matches!(err, Error::Parse(_)));
        assert!(err.to_string().contains("maximum depth"));
    });
}

#[test]
fn nesting_within_limit_parses() {
    run_with_large_stack(|| {
        let depth = 50;
        let sql = format!("SELECT {}1{}", "(".repeat(depth), ")".repeat(depth));
        let _ = parse(&sql);

        let nested = format!(
            "SELECT * FROM {}t{}",
            "(SELECT * FROM ".repeat(20),
            ") AS s".repeat(20)
        );
        let _ = parse(&nested);
    });
}

#[test]
fn nesting_up_to_the_limit_fits_a_two_megabyte_stack() {
    run_with_stack(2 << 20, || {
        let shapes: [(&str, fn(usize) -> String); 7] = [
            ("parens", |n| format!("SELECT {}1{}", "(".repeat(n), ")".repeat(n))),
            ("subqueries", |n| {
                format!("SELECT {}1{}", "(SELECT ".repeat(n), ")".repeat(n))
            }),
            ("calls", |n| format!("SELECT {}1{}", "f(".repeat(n), ")".repeat(n))),
            ("joins", |n| {
                format!(
                    "SELECT * FROM {}a JOIN b ON true{}",
                    "(".repeat(n),
                    ") JOIN b ON true".repeat(n)
                )
            }),
            ("case", |n| {
                format!("SELECT {}1{}", "CASE WHEN true THEN ".repeat(n), " END".repeat(n))
            }),
            ("cast", |n| format!("SELECT {}1{}", "CAST(".repeat(n), " AS int)".repeat(n))),
            ("in", |n| format!("SELECT {}1{}", "1 IN (".repeat(n), ")".repeat(n))),
        ];
        let max_depth = ParserOptions::default().max_depth;
        for (name, shape) in shapes {
            let deepest = deepest_accepted(shape);
            assert!(deepest >= max_depth / 2 - 2, "{name}: only {deepest} levels");
        }
    });
}

#[test]
fn nesting_limit_is_configurable() {
    let options = ParserOptions::new().max_depth(4);
    let err = parse_one_with_options("SELECT ((((((1))))))", options).unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
}

// ===================================================================
// Chain limit
// ===================================================================

fn chain(term: &str, separator: &str, terms: usize) -> String {
    vec![term; terms].join(separator)
}

#[test]
fn long_operator_chain_is_an_error() {
    let max = ParserOptions::default().max_chain_len;
    let sql = format!("SELECT {}", chain("1", " + ", max + 44));
    let err = parse_err(&sql);
    assert!(matches!(err, Error::Parse(_)));
    let message = format!("operator chain exceeds the maximum length of {max}");
    assert!(err.to_string().contains(&message), "{err}");
}

#[test]
fn chain_within_limit_clones_and_compares() {
    let sql = format!(
        "SELECT {} FROM t WHERE {}",
        chain("a", " || ", 100),
        chain("b", " AND ", 100)
    );
    let statement = parse(&sql);
    let copy = statement.clone();
    assert_eq!(copy, statement);
    assert_eq!(copy.to_string(), sql);
}

#[test]
fn chain_budget_is_released_by_parentheses() {
    let group = format!("({})", chain("1", " + ", 200));
    let sql = format!("SELECT {}", chain(&group, " * ", 2));
    round_trip(&sql);
}

#[test]
fn other_chains_are_limited() {
    let max = ParserOptions::default().max_chain_len;
    for sql in [
        chain("SELECT 1", " UNION ", max + 2),
        format!("SELECT * FROM {}", chain("t", " CROSS JOIN ", max + 2)),
        format!("SELECT x{}", "[1]".repeat(max + 1)),
    ] {
        let err = parse_err(&sql);
        assert!(err.to_string().contains("operator chain exceeds"), "{err}");
    }
    let _ = parse(&chain("SELECT 1", " UNION ALL ", max));
}

#[test]
fn chain_limit_is_configurable() {
    let options = ParserOptions::new().max_chain_len(3);
    assert!(parse_one_with_options("SELECT 1 + 2 + 3 + 4", options.clone()).is_ok());
    let err = parse_one_with_options("SELECT 1 + 2 + 3 + 4 + 5", options).unwrap_err();
    assert!(err.to_string().contains("maximum length of 3"), "{err}");
}
