//! Tests for expressions: precedence, predicates, special forms and the
//! keyword categories that decide where a word may be used as a name.

mod common;
use common::*;

use oxide_pgsql::ast::{
    BinaryOp, CastSyntax, Expr, ExprKind, LikeKind, Literal, Parameter, Quantifier,
    QuantifiedRhs, UnaryOp, ValueFunction, XmlStandalone,
};
use oxide_pgsql::Error;

fn target(sql: &str) -> Expr {
    parse_select(sql).targets.remove(0).expr
}

fn selection(sql: &str) -> Expr {
    parse_select(sql).selection.expect("expected WHERE")
}

// ===================================================================
// Precedence
// ===================================================================

#[test]
fn precedence_arithmetic() {
    let e = target("SELECT a + b * c");
    let ExprKind::Binary { op, right, .. } = &e.kind else {
        panic!("expected binary");
    };
    assert_eq!(*op, BinaryOp::Plus);
    assert!(matches!(
        right.kind,
        ExprKind::Binary {
            op: BinaryOp::Multiply,
            ..
        }
    ));
    prints_as_written("SELECT a + b * c");
    prints_as_written("SELECT (a + b) * c");
}

#[test]
fn precedence_json_chain() {
    let e = target("SELECT a->b->>c");
    let ExprKind::Binary { left, op, .. } = &e.kind else {
        panic!("expected binary");
    };
    assert_eq!(*op, BinaryOp::LongArrow);
    assert!(matches!(
        left.kind,
        ExprKind::Binary {
            op: BinaryOp::Arrow,
            ..
        }
    ));
    round_trip("SELECT a->b->>c");
}

#[test]
fn precedence_json_operators() {
    for (sql, op) in [
        ("SELECT a #> b", BinaryOp::HashArrow),
        ("SELECT a #>> b", BinaryOp::HashLongArrow),
        ("SELECT a @> b", BinaryOp::AtArrow),
        ("SELECT a <@ b", BinaryOp::ArrowAt),
        ("SELECT a ?| b", BinaryOp::QuestionPipe),
        ("SELECT a ?& b", BinaryOp::QuestionAnd),
        ("SELECT a #- b", BinaryOp::HashMinus),
        ("SELECT a @? b", BinaryOp::AtQuestion),
        ("SELECT a @@ b", BinaryOp::AtAt),
        ("SELECT a || b", BinaryOp::Concat),
    ] {
        let e = target(sql);
        assert!(
            matches!(&e.kind, ExprKind::Binary { op: found, .. } if *found == op),
            "{sql}: {e:?}"
        );
        prints_as_written(sql);
    }
}

#[test]
fn precedence_boolean_connectives() {
    let e = selection("SELECT 1 FROM t WHERE a OR b AND NOT c");
    let ExprKind::Binary { op, right, .. } = &e.kind else {
        panic!("expected OR");
    };
    assert_eq!(*op, BinaryOp::Or);
    let ExprKind::Binary { op, right, .. } = &right.kind else {
        panic!("expected AND");
    };
    assert_eq!(*op, BinaryOp::And);
    assert!(matches!(
        right.kind,
        ExprKind::Unary {
            op: UnaryOp::Not,
            ..
        }
    ));
    round_trip("SELECT 1 FROM t WHERE (a OR b) AND NOT c");
}

#[test]
fn precedence_comparison_is_non_associative() {
    assert!(matches!(parse_err("SELECT a = b = c"), Error::Parse(_)));
}

#[test]
fn user_defined_and_qualified_operators() {
    let e = target("SELECT a <-> b");
    assert!(matches!(
        &e.kind,
        ExprKind::Binary { op: BinaryOp::Custom(op), .. } if op == "<->"
    ));
    let e = target("SELECT a OPERATOR(pg_catalog.+) b");
    assert!(matches!(
        e.kind,
        ExprKind::Binary {
            op: BinaryOp::Qualified(_),
            ..
        }
    ));
    round_trip("SELECT a OPERATOR(pg_catalog.+) b");
}

// ===================================================================
// Predicates
// ===================================================================

#[test]
fn predicates() {
    assert!(matches!(
        selection("SELECT 1 FROM t WHERE a NOT BETWEEN SYMMETRIC 1 AND 2").kind,
        ExprKind::Between {
            negated: true,
            symmetric: true,
            ..
        }
    ));
    assert!(matches!(
        selection("SELECT 1 FROM t WHERE a ILIKE 'x%' ESCAPE '!'").kind,
        ExprKind::Like {
            kind: LikeKind::ILike,
            escape: Some(_),
            ..
        }
    ));
    assert!(matches!(
        selection("SELECT 1 FROM t WHERE a NOT SIMILAR TO 'x'").kind,
        ExprKind::Like {
            kind: LikeKind::SimilarTo,
            negated: true,
            ..
        }
    ));
    assert!(matches!(
        selection("SELECT 1 FROM t WHERE a IS DISTINCT FROM b").kind,
        ExprKind::IsDistinctFrom { negated: false, .. }
    ));
    assert!(matches!(
        selection("SELECT 1 FROM t WHERE a IS NOT UNKNOWN").kind,
        ExprKind::IsTruth { negated: true, .. }
    ));
    assert!(matches!(
        selection("SELECT 1 FROM t WHERE EXISTS (SELECT 1 FROM u)").kind,
        ExprKind::Exists(_)
    ));
    round_trip("SELECT 1 FROM t WHERE a NOT BETWEEN SYMMETRIC 1 AND 2");
    round_trip("SELECT 1 FROM t WHERE a ILIKE 'x%' ESCAPE '!'");
    round_trip("SELECT 1 FROM t WHERE a IS NOT DISTINCT FROM b AND c IS NOT NULL");
}

#[test]
fn quantified_comparisons() {
    let e = selection("SELECT 1 FROM t WHERE a >= ALL (SELECT b FROM u)");
    assert!(matches!(
        e.kind,
        ExprKind::Quantified {
            op: BinaryOp::GtEq,
            quantifier: Quantifier::All,
            right: QuantifiedRhs::Subquery(_),
            ..
        }
    ));
    round_trip("SELECT 1 FROM t WHERE a = ANY (ARRAY[1, 2, 3])");
}

#[test]
fn overlaps() {
    let e = selection("SELECT 1 FROM t WHERE (a, b) OVERLAPS (c, d)");
    assert!(matches!(
        e.kind,
        ExprKind::Binary {
            op: BinaryOp::Overlaps,
            ..
        }
    ));
    let err = parse_semantic_err("SELECT (a, b) OVERLAPS (c, d, e)");
    assert!(err.message.contains("right side of OVERLAPS"));
}

// ===================================================================
// Atoms
// ===================================================================

#[test]
fn literals_and_parameters() {
    let s = parse_select("SELECT 1, 1.5, 'a''b', TRUE, NULL, $1, B'101', X'ff'");
    let kinds: Vec<_> = s.targets.iter().map(|t| t.expr.kind.clone()).collect();
    assert_eq!(kinds[0], ExprKind::Literal(Literal::Integer(1)));
    assert_eq!(kinds[1], ExprKind::Literal(Literal::Numeric("1.5".into())));
    assert_eq!(kinds[2], ExprKind::Literal(Literal::String("a'b".into())));
    assert_eq!(kinds[3], ExprKind::Literal(Literal::Boolean(true)));
    assert_eq!(kinds[4], ExprKind::Literal(Literal::Null));
    assert_eq!(kinds[5], ExprKind::Parameter(Parameter::Numbered(1)));
    assert!(matches!(kinds[6], ExprKind::Literal(Literal::BitString(_))));
    assert!(matches!(kinds[7], ExprKind::Literal(Literal::HexString(_))));
    round_trip("SELECT 1, 1.5, 'a''b', TRUE, NULL, $1, B'101', X'ff'");
}

#[test]
fn string_forms_decode() {
    let e = target("SELECT E'a\\nb'");
    assert_eq!(e.kind, ExprKind::Literal(Literal::String("a\nb".into())));
    let e = target("SELECT $tag$it's$tag$");
    assert_eq!(e.kind, ExprKind::Literal(Literal::String("it's".into())));
    let e = target("SELECT 'a'\n'b'");
    assert_eq!(e.kind, ExprKind::Literal(Literal::String("ab".into())));
}

#[test]
fn question_mark_parameters() {
    let s = parse_select("SELECT * FROM t WHERE id=? AND doc ? 'k'");
    let ExprKind::Binary { left, right, .. } = &s.selection.unwrap().kind else {
        panic!("expected AND");
    };
    assert!(matches!(
        &left.kind,
        ExprKind::Binary { right, .. } if right.kind == ExprKind::Parameter(Parameter::Marker(1))
    ));
    assert!(matches!(
        right.kind,
        ExprKind::Binary {
            op: BinaryOp::Question,
            ..
        }
    ));
}

#[test]
fn casts() {
    let e = target("SELECT a::int[]");
    let ExprKind::Cast {
        data_type, syntax, ..
    } = &e.kind
    else {
        panic!("expected cast");
    };
    assert_eq!(*syntax, CastSyntax::DoubleColon);
    assert_eq!(data_type.array_bounds, vec![None]);
    assert!(matches!(
        target("SELECT CAST(a AS varchar(10))").kind,
        ExprKind::Cast {
            syntax: CastSyntax::Cast,
            ..
        }
    ));
    round_trip("SELECT CAST(a AS numeric(10, 2)), b::double precision, c::timestamp(3) with time zone");
}

#[test]
fn case_expressions() {
    let e = target("SELECT CASE a WHEN 1 THEN 'one' WHEN 2 THEN 'two' ELSE 'many' END");
    let ExprKind::Case {
        operand,
        conditions,
        else_result,
    } = &e.kind
    else {
        panic!("expected CASE");
    };
    assert!(operand.is_some());
    assert_eq!(conditions.len(), 2);
    assert!(else_result.is_some());
    round_trip("SELECT CASE WHEN a > 0 THEN 1 END");
}

#[test]
fn function_calls() {
    let e = target("SELECT string_agg(DISTINCT name, ',' ORDER BY name) FILTER (WHERE active)");
    let ExprKind::Function(call) = &e.kind else {
        panic!("expected function");
    };
    assert!(call.distinct);
    assert_eq!(call.args.len(), 2);
    assert_eq!(call.order_by.len(), 1);
    assert!(call.filter.is_some());

    let e = target("SELECT count(*)");
    let ExprKind::Function(call) = &e.kind else {
        panic!("expected function");
    };
    assert!(call.star);

    let e = target("SELECT make_interval(days => 1, hours := 2)");
    let ExprKind::Function(call) = &e.kind else {
        panic!("expected function");
    };
    assert!(call.args.iter().all(|arg| arg.name.is_some()));

    round_trip("SELECT string_agg(DISTINCT name, ',' ORDER BY name) FILTER (WHERE active)");
    round_trip("SELECT rank() OVER (PARTITION BY a ORDER BY b DESC ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW)");
}

#[test]
fn sql_special_forms() {
    for sql in [
        "SELECT EXTRACT(epoch FROM ts)",
        "SELECT OVERLAY(s PLACING 'x' FROM 2 FOR 3)",
        "SELECT POSITION('a' IN s)",
        "SELECT SUBSTRING(s FROM 1 FOR 2)",
        "SELECT SUBSTRING(s SIMILAR 'a%' ESCAPE '!')",
        "SELECT TRIM(BOTH 'x' FROM s)",
        "SELECT TREAT(a AS text)",
        "SELECT COLLATION FOR (a)",
        "SELECT NORMALIZE(a, NFC)",
        "SELECT COALESCE(a, b, 0)",
        "SELECT NULLIF(a, b)",
        "SELECT GREATEST(a, b)",
        "SELECT CURRENT_DATE, LOCALTIMESTAMP(2), CURRENT_USER",
    ] {
        round_trip(sql);
    }
    assert!(matches!(
        target("SELECT user").kind,
        ExprKind::ValueFunction {
            func: ValueFunction::User,
            ..
        }
    ));
}

#[test]
fn xml_forms() {
    for sql in [
        "SELECT XMLELEMENT(NAME foo, XMLATTRIBUTES(a AS bar), 'content')",
        "SELECT XMLFOREST(a, b AS c)",
        "SELECT XMLPARSE(DOCUMENT '<a/>')",
        "SELECT XMLPI(NAME php, 'echo')",
        "SELECT XMLSERIALIZE(CONTENT doc AS text)",
        "SELECT 1 WHERE XMLEXISTS('//a' PASSING BY REF doc)",
        "SELECT 1 WHERE doc IS DOCUMENT",
    ] {
        round_trip(sql);
    }
}

#[test]
fn xmlroot_forms() {
    let ExprKind::XmlRoot {
        version,
        standalone,
        ..
    } = target("SELECT XMLROOT(doc, VERSION '1.0', STANDALONE YES)").kind
    else {
        panic!("expected XMLROOT");
    };
    assert!(version.is_some());
    assert_eq!(standalone, Some(XmlStandalone::Yes));

    let ExprKind::XmlRoot {
        version,
        standalone,
        ..
    } = target("SELECT XMLROOT(doc, VERSION NO VALUE, STANDALONE NO VALUE)").kind
    else {
        panic!("expected XMLROOT");
    };
    assert!(version.is_none());
    assert_eq!(standalone, Some(XmlStandalone::NoValue));

    prints_as_written("SELECT XMLROOT(doc, VERSION '1.0', STANDALONE NO)");
    prints_as_written("SELECT XMLROOT(XMLPARSE(DOCUMENT d), VERSION NO VALUE)");
}

#[test]
fn constructors_and_indirection() {
    assert!(matches!(
        target("SELECT ARRAY[1, 2]").kind,
        ExprKind::Array(_)
    ));
    assert!(matches!(
        target("SELECT ARRAY(SELECT 1)").kind,
        ExprKind::ArraySubquery(_)
    ));
    assert!(matches!(
        target("SELECT ROW(1, 2)").kind,
        ExprKind::Row { explicit: true, .. }
    ));
    assert!(matches!(
        target("SELECT (a).b").kind,
        ExprKind::Field { .. }
    ));
    assert!(matches!(
        target("SELECT (a).*").kind,
        ExprKind::FieldWildcard(_)
    ));
    assert!(matches!(
        target("SELECT a[1:2]").kind,
        ExprKind::Slice { .. }
    ));
    for sql in [
        "SELECT ARRAY[[1, 2], [3, 4]]",
        "SELECT ROW(1, 'a'), (1, 2)",
        "SELECT (a).b, a[1], a[1:2][3]",
        "SELECT ts AT TIME ZONE 'UTC'",
        "SELECT name COLLATE \"C\"",
        "SELECT -a, +b, - -c",
        "SELECT a IN (1, 2), b NOT IN (SELECT 1)",
        "SELECT GROUPING(a, b) FROM t GROUP BY a, b",
    ] {
        round_trip(sql);
    }
}

// ===================================================================
// Keyword matrix
// ===================================================================

#[test]
fn reserved_keyword_as_label() {
    let s = parse_select("SELECT 1 AS user, 2 AS select, 3 AS from");
    let labels: Vec<_> = s
        .targets
        .iter()
        .map(|t| t.alias.as_ref().unwrap().value.clone())
        .collect();
    assert_eq!(labels, ["user", "select", "from"]);
    round_trip("SELECT 1 AS user, 2 AS select, 3 AS from");
}

#[test]
fn reserved_keyword_is_not_a_bare_label() {
    let _ = parse_syntax_err("SELECT 1 user");
}

#[test]
fn unreserved_keywords_are_names() {
    let s = parse_select("SELECT action, data.value FROM data");
    assert!(matches!(s.targets[0].expr.kind, ExprKind::Column(_)));
    round_trip("SELECT action, data.value FROM data");
}

#[test]
fn col_name_keyword_as_column() {
    // `position` and `nullif` are colName keywords: names, but not functions.
    let s = parse_select("SELECT position FROM t");
    assert!(matches!(s.targets[0].expr.kind, ExprKind::Column(_)));
}

#[test]
fn type_func_name_keyword_rejected_as_col_id() {
    let _ = parse_syntax_err("SELECT * FROM t AS left");
    let _ = parse_syntax_err("SELECT * FROM join");
}

#[test]
fn type_func_name_keyword_as_function() {
    let e = target("SELECT left('abc', 2)");
    assert!(matches!(e.kind, ExprKind::Function(_)));
}

#[test]
fn quoted_reserved_word_is_a_name() {
    let s = parse_select("SELECT \"select\" FROM \"from\"");
    assert!(matches!(s.targets[0].expr.kind, ExprKind::Column(_)));
    prints_as_written("SELECT \"select\" FROM \"from\"");
}
