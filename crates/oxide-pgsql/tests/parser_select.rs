//! Tests for queries: target lists, FROM items, clauses and set operations.

mod common;
use common::*;

use oxide_pgsql::ast::{
    Distinct, ExprKind, GroupingElement, JoinConstraint, JoinKind, LimitClause, LockStrength,
    LockWait, SetExpr, SetOperator, SetQuantifier, Statement, TableRefKind, XmlTableColumnKind,
};

// ===================================================================
// Target list
// ===================================================================

#[test]
fn select_star_and_qualified_star() {
    let s = parse_select("SELECT *, t.* FROM t");
    assert!(matches!(s.targets[0].expr.kind, ExprKind::Wildcard(None)));
    assert!(matches!(s.targets[1].expr.kind, ExprKind::Wildcard(Some(_))));
    prints_as_written("SELECT *, t.* FROM t");
}

#[test]
fn select_aliases() {
    let s = parse_select("SELECT a AS x, b y, c AS user, d AS \"Mixed\"");
    let aliases: Vec<_> = s
        .targets
        .iter()
        .map(|t| t.alias.as_ref().map(|a| a.value.clone()))
        .collect();
    assert_eq!(
        aliases,
        [
            Some("x".to_string()),
            Some("y".to_string()),
            Some("user".to_string()),
            Some("Mixed".to_string()),
        ]
    );
    round_trip("SELECT a AS x, b y, c AS user, d AS \"Mixed\"");
}

#[test]
fn select_distinct_on() {
    let s = parse_select("SELECT DISTINCT ON (a, b) a, b, c FROM t ORDER BY a, b");
    let Some(Distinct::On(exprs)) = &s.distinct else {
        panic!("expected DISTINCT ON");
    };
    assert_eq!(exprs.len(), 2);
    assert_eq!(s.distinct, parse_select("SELECT DISTINCT ON (a, b) 1").distinct);
    assert_eq!(parse_select("SELECT DISTINCT a").distinct, Some(Distinct::Distinct));
    assert_eq!(parse_select("SELECT ALL a").distinct, None);
}

// ===================================================================
// FROM
// ===================================================================

#[test]
fn from_list_and_aliases() {
    let s = parse_select("SELECT * FROM a x, b AS y (c1, c2), ONLY c, d *");
    assert_eq!(s.from.len(), 4);
    let TableRefKind::Relation { alias, .. } = &s.from[1].kind else {
        panic!("expected relation");
    };
    let alias = alias.as_ref().unwrap();
    assert_eq!(alias.name.value, "y");
    assert_eq!(alias.columns.len(), 2);
    let TableRefKind::Relation { relation, .. } = &s.from[2].kind else {
        panic!("expected relation");
    };
    assert!(relation.only);
    let TableRefKind::Relation { relation, .. } = &s.from[3].kind else {
        panic!("expected relation");
    };
    assert!(relation.inherit_star);
    round_trip("SELECT * FROM a x, b AS y (c1, c2), ONLY c, d *");
}

#[test]
fn from_joins_are_left_deep() {
    let s = parse_select("SELECT * FROM a JOIN b ON a.id = b.id LEFT OUTER JOIN c USING (id)");
    let TableRefKind::Join(outer) = &s.from[0].kind else {
        panic!("expected join");
    };
    assert_eq!(outer.kind, JoinKind::Left);
    assert!(matches!(outer.constraint, Some(JoinConstraint::Using(_))));
    let TableRefKind::Join(inner) = &outer.left.kind else {
        panic!("expected nested join on the left");
    };
    assert_eq!(inner.kind, JoinKind::Inner);
    assert!(matches!(inner.constraint, Some(JoinConstraint::On(_))));
    prints_as_written("SELECT * FROM a JOIN b ON a.id = b.id LEFT JOIN c USING (id)");
}

#[test]
fn from_natural_and_cross_joins() {
    let s = parse_select("SELECT * FROM a NATURAL FULL JOIN b CROSS JOIN c");
    let TableRefKind::Join(outer) = &s.from[0].kind else {
        panic!("expected join");
    };
    assert_eq!(outer.kind, JoinKind::Cross);
    assert!(outer.constraint.is_none());
    let TableRefKind::Join(inner) = &outer.left.kind else {
        panic!("expected join");
    };
    assert!(inner.natural);
    assert_eq!(inner.kind, JoinKind::Full);
    round_trip("SELECT * FROM a NATURAL FULL JOIN b CROSS JOIN c");
}

#[test]
fn from_join_requires_qualification() {
    let _ = parse_syntax_err("SELECT * FROM a JOIN b");
    let _ = parse_syntax_err("SELECT * FROM a LEFT JOIN b WHERE true");
}

#[test]
fn from_parenthesised_join_with_alias() {
    let s = parse_select("SELECT * FROM (a JOIN b USING (id)) AS j");
    assert!(matches!(s.from[0].kind, TableRefKind::Nested { .. }));
    round_trip("SELECT * FROM (a JOIN b USING (id)) AS j");
    round_trip("SELECT * FROM a JOIN (b JOIN c ON b.x = c.x) ON a.y = b.y");
}

#[test]
fn from_subqueries_and_lateral() {
    let s = parse_select("SELECT * FROM t, LATERAL (SELECT * FROM u WHERE u.a = t.a) AS s");
    let TableRefKind::Subquery { lateral, alias, .. } = &s.from[1].kind else {
        panic!("expected subquery");
    };
    assert!(*lateral);
    assert_eq!(alias.as_ref().unwrap().name.value, "s");
    round_trip("SELECT * FROM t, LATERAL (SELECT * FROM u WHERE u.a = t.a) AS s");
}

#[test]
fn from_function_tables() {
    round_trip("SELECT * FROM generate_series(1, 10) WITH ORDINALITY AS g (n, i)");
    round_trip("SELECT * FROM json_to_record('{}') AS r (a integer, b text)");
    round_trip("SELECT * FROM ROWS FROM (f(1), g(2) AS (x int)) WITH ORDINALITY AS r");
    round_trip("SELECT * FROM t TABLESAMPLE system (10) REPEATABLE (42)");
}

#[test]
fn from_xmltable() {
    let sql = "SELECT t.* FROM docs, XMLTABLE(XMLNAMESPACES('http://x' AS x, DEFAULT 'http://d'), \
               '/r/row' PASSING BY VALUE docs.body COLUMNS id int PATH '@id' NOT NULL, \
               name text DEFAULT 'none', n FOR ORDINALITY) AS t";
    let s = parse_select(sql);
    let TableRefKind::XmlTable { table, alias, .. } = &s.from[1].kind else {
        panic!("expected XMLTABLE");
    };
    assert_eq!(table.namespaces.len(), 2);
    assert!(table.namespaces[1].name.is_none());
    assert_eq!(table.columns.len(), 3);
    assert!(matches!(
        &table.columns[0].kind,
        XmlTableColumnKind::Typed {
            path: Some(_),
            not_null: Some(true),
            ..
        }
    ));
    assert!(matches!(table.columns[2].kind, XmlTableColumnKind::Ordinality));
    assert_eq!(alias.as_ref().unwrap().name.value, "t");
    round_trip(sql);
    round_trip("SELECT * FROM LATERAL XMLTABLE('/a' PASSING d COLUMNS v text) x");
}

#[test]
fn xmltable_column_options_are_checked() {
    for (sql, message) in [
        (
            "SELECT * FROM XMLTABLE('/a' PASSING d COLUMNS v text DEFAULT 1 DEFAULT 2)",
            "only one DEFAULT value is allowed",
        ),
        (
            "SELECT * FROM XMLTABLE('/a' PASSING d COLUMNS v text NULL NOT NULL)",
            "conflicting or redundant NULL / NOT NULL declarations for column \"v\"",
        ),
        (
            "SELECT * FROM XMLTABLE('/a' PASSING d COLUMNS v text PATH 'x' PATH 'y')",
            "only one PATH value per column is allowed",
        ),
        (
            "SELECT * FROM XMLTABLE('/a' PASSING d COLUMNS v text width 3)",
            "unrecognized column option \"width\"",
        ),
    ] {
        assert_eq!(parse_semantic_err(sql).message, message, "{sql}");
    }
}

// ===================================================================
// Clauses
// ===================================================================

#[test]
fn where_group_having_window() {
    let s = parse_select(
        "SELECT a, count(*) OVER w FROM t WHERE b > 0 GROUP BY a HAVING count(*) > 1 \
         WINDOW w AS (PARTITION BY a ORDER BY b)",
    );
    assert!(s.selection.is_some());
    assert_eq!(s.group_by.len(), 1);
    assert!(s.having.is_some());
    assert_eq!(s.windows.len(), 1);
    assert_eq!(s.windows[0].name.value, "w");
}

#[test]
fn group_by_grouping_sets() {
    let s = parse_select("SELECT a, b FROM t GROUP BY ROLLUP (a, b), CUBE (a), GROUPING SETS ((a), ())");
    assert!(matches!(s.group_by[0], GroupingElement::Rollup(_)));
    assert!(matches!(s.group_by[1], GroupingElement::Cube(_)));
    let GroupingElement::Sets(sets) = &s.group_by[2] else {
        panic!("expected GROUPING SETS");
    };
    assert_eq!(sets.len(), 2);
    assert_eq!(sets[1], GroupingElement::Empty);
}

#[test]
fn order_by_limit_offset() {
    let q = parse_query("SELECT a FROM t ORDER BY a DESC NULLS LAST, b LIMIT 10 OFFSET 5");
    assert_eq!(q.order_by.len(), 2);
    assert!(matches!(q.limit, Some(LimitClause::Limit(_))));
    assert!(q.offset.is_some());
    prints_as_written("SELECT a FROM t ORDER BY a DESC NULLS LAST, b LIMIT 10 OFFSET 5");
}

#[test]
fn offset_before_limit() {
    let q = parse_query("SELECT a FROM t OFFSET 5 ROWS LIMIT ALL");
    assert_eq!(q.limit, Some(LimitClause::All));
    assert!(q.offset.is_some());
}

#[test]
fn fetch_first() {
    let q = parse_query("SELECT a FROM t ORDER BY a FETCH FIRST 3 ROWS WITH TIES");
    let Some(LimitClause::FetchFirst { count, with_ties }) = &q.limit else {
        panic!("expected FETCH FIRST");
    };
    assert!(count.is_some());
    assert!(*with_ties);
    let q = parse_query("SELECT a FROM t FETCH NEXT ROW ONLY");
    assert!(matches!(
        q.limit,
        Some(LimitClause::FetchFirst {
            count: None,
            with_ties: false
        })
    ));
    round_trip("SELECT a FROM t ORDER BY a FETCH FIRST 3 ROWS WITH TIES");
}

#[test]
fn locking_clauses() {
    let q = parse_query("SELECT * FROM a, b FOR UPDATE OF a NOWAIT FOR KEY SHARE SKIP LOCKED");
    assert_eq!(q.locking.len(), 2);
    assert_eq!(q.locking[0].strength, LockStrength::Update);
    assert_eq!(q.locking[0].wait, Some(LockWait::Nowait));
    assert_eq!(q.locking[1].strength, LockStrength::KeyShare);
    assert_eq!(q.locking[1].wait, Some(LockWait::SkipLocked));
    prints_as_written("SELECT * FROM a, b FOR UPDATE OF a NOWAIT FOR KEY SHARE SKIP LOCKED");
}

#[test]
fn select_into() {
    let s = parse_select("SELECT a INTO TEMP new_t FROM t");
    let into = s.into.unwrap();
    assert_eq!(into.name.to_string(), "new_t");
}

// ===================================================================
// Set operations
// ===================================================================

#[test]
fn union_is_left_associative() {
    let q = parse_query("SELECT 1 UNION SELECT 2 EXCEPT SELECT 3");
    let SetExpr::SetOperation { op, left, .. } = &q.body else {
        panic!("expected set operation");
    };
    assert_eq!(*op, SetOperator::Except);
    assert!(matches!(
        **left,
        SetExpr::SetOperation {
            op: SetOperator::Union,
            ..
        }
    ));
}

#[test]
fn intersect_binds_tighter() {
    let q = parse_query("SELECT 1 UNION ALL SELECT 2 INTERSECT SELECT 3");
    let SetExpr::SetOperation {
        op,
        quantifier,
        right,
        ..
    } = &q.body
    else {
        panic!("expected set operation");
    };
    assert_eq!(*op, SetOperator::Union);
    assert_eq!(*quantifier, SetQuantifier::All);
    assert!(matches!(
        **right,
        SetExpr::SetOperation {
            op: SetOperator::Intersect,
            ..
        }
    ));
    round_trip("(SELECT 1 UNION SELECT 2) INTERSECT SELECT 3");
}

#[test]
fn set_operation_with_trailing_clauses() {
    let q = parse_query("SELECT a FROM t UNION SELECT b FROM u ORDER BY 1 LIMIT 2");
    assert!(matches!(q.body, SetExpr::SetOperation { .. }));
    assert_eq!(q.order_by.len(), 1);
    assert!(q.limit.is_some());
}

#[test]
fn parenthesised_query_clauses_merge() {
    let q = parse_query("(SELECT a FROM t ORDER BY a) LIMIT 1");
    assert_eq!(q.order_by.len(), 1);
    assert!(q.limit.is_some());
    assert!(matches!(q.body, SetExpr::Select(_)));
}

#[test]
fn values_and_table_bodies() {
    let q = parse_query("VALUES (1, 'a'), (2, 'b') ORDER BY 1");
    let SetExpr::Values(values) = &q.body else {
        panic!("expected VALUES");
    };
    assert_eq!(values.rows.len(), 2);
    assert!(matches!(parse_query("TABLE t").body, SetExpr::Table(_)));
    prints_as_written("VALUES (1, 'a'), (2, 'b') ORDER BY 1");
}

// ===================================================================
// WITH
// ===================================================================

#[test]
fn with_recursive() {
    let q = parse_query(
        "WITH RECURSIVE r (n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM r WHERE n < 10) SELECT n FROM r",
    );
    let with = q.with.unwrap();
    assert!(with.recursive);
    assert_eq!(with.ctes[0].columns.len(), 1);
    assert!(matches!(*with.ctes[0].statement, Statement::Select(_)));
}

#[test]
fn with_data_modifying_cte() {
    let q = parse_query(
        "WITH moved AS MATERIALIZED (DELETE FROM a WHERE x RETURNING *) SELECT * FROM moved",
    );
    let cte = &q.with.unwrap().ctes[0];
    assert_eq!(cte.materialized, Some(true));
    assert!(matches!(*cte.statement, Statement::Delete(_)));
    round_trip("WITH moved AS MATERIALIZED (DELETE FROM a WHERE x RETURNING *) SELECT * FROM moved");
}
